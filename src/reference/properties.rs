//! Reference configuration values.
//!
//! [`ReferenceProperties`] captures how a compilation consumes a referenced image: whether it
//! is a stand-alone assembly or a module that gets merged into the referencing assembly, which
//! extern aliases the image is visible under, and whether interop types are embedded instead of
//! referenced.
//!
//! Properties are immutable. Every `with_*` method returns a new, validated value; invalid
//! combinations are rejected with an [`crate::Error`] instead of being coerced.
//!
//! # Alias Rule
//!
//! An alias must be non-empty, start with `_` or an alphabetic character, and contain only `_`
//! and alphanumeric characters afterwards (Unicode aware). An alias sequence may not repeat an
//! alias. Module references carry no aliases at all.

use std::{collections::HashSet, fmt, sync::Arc};

use crate::{Error, Result};

/// Whether a referenced image is a top-level assembly or an embedded module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ImageKind {
    /// A stand-alone assembly with its own manifest
    #[default]
    Assembly,
    /// A module, linked into the referencing assembly
    Module,
}

impl fmt::Display for ImageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageKind::Assembly => write!(f, "assembly"),
            ImageKind::Module => write!(f, "module"),
        }
    }
}

/// Immutable configuration of a [`crate::Reference`].
///
/// Equality and hashing are structural: two values with the same kind, the same alias
/// sequence and the same interop flag are interchangeable.
///
/// # Examples
///
/// ```rust
/// use metaref::reference::{ImageKind, ReferenceProperties};
///
/// let properties = ReferenceProperties::assembly().with_aliases(["Foo", "Bar"])?;
/// assert_eq!(properties.kind(), ImageKind::Assembly);
/// assert_eq!(properties.aliases(), ["Foo", "Bar"]);
///
/// // Interop types can only be embedded from assemblies
/// assert!(ReferenceProperties::module().with_embed_interop_types(true).is_err());
/// # Ok::<(), metaref::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReferenceProperties {
    kind: ImageKind,
    aliases: Arc<[String]>,
    embed_interop_types: bool,
}

impl Default for ReferenceProperties {
    fn default() -> Self {
        ReferenceProperties {
            kind: ImageKind::Assembly,
            aliases: Arc::from(Vec::<String>::new()),
            embed_interop_types: false,
        }
    }
}

impl ReferenceProperties {
    /// The alias every assembly is visible under when no alias is given.
    pub const GLOBAL_ALIAS: &'static str = "global";

    /// Creates a validated properties value.
    ///
    /// # Errors
    /// - [`Error::InvalidAlias`] or [`Error::DuplicateAlias`] if the aliases break the alias rule
    /// - [`Error::ModuleAliases`] if aliases are given for a module
    /// - [`Error::EmbedInteropTypesNotSupported`] if `embed_interop_types` is set for a module
    pub fn new<I, S>(kind: ImageKind, aliases: I, embed_interop_types: bool) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let aliases: Vec<String> = aliases.into_iter().map(Into::into).collect();
        let properties = ReferenceProperties {
            kind,
            aliases: aliases.into(),
            embed_interop_types,
        };
        properties.validate()?;

        Ok(properties)
    }

    /// Properties of a plain assembly reference: no aliases, no embedded interop types.
    #[must_use]
    pub fn assembly() -> Self {
        ReferenceProperties::default()
    }

    /// Properties of a module reference.
    #[must_use]
    pub fn module() -> Self {
        ReferenceProperties {
            kind: ImageKind::Module,
            ..ReferenceProperties::default()
        }
    }

    /// The image kind.
    pub fn kind(&self) -> ImageKind {
        self.kind
    }

    /// The alias sequence, in the order it was given.
    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    /// Whether interop types are embedded from the referenced assembly.
    pub fn embed_interop_types(&self) -> bool {
        self.embed_interop_types
    }

    /// Returns a copy with `aliases` replacing the alias sequence.
    ///
    /// # Errors
    /// Same as [`ReferenceProperties::new`].
    pub fn with_aliases<I, S>(&self, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(self.kind, aliases, self.embed_interop_types)
    }

    /// Returns a copy with the interop embedding flag set to `value`.
    ///
    /// # Errors
    /// Returns [`Error::EmbedInteropTypesNotSupported`] if `value` is `true` for a module.
    pub fn with_embed_interop_types(&self, value: bool) -> Result<Self> {
        let properties = ReferenceProperties {
            embed_interop_types: value,
            ..self.clone()
        };
        properties.validate()?;

        Ok(properties)
    }

    /// Checks the kind/alias/flag combination.
    ///
    /// # Errors
    /// Same as [`ReferenceProperties::new`].
    pub fn validate(&self) -> Result<()> {
        if self.kind == ImageKind::Module {
            if self.embed_interop_types {
                return Err(Error::EmbedInteropTypesNotSupported(self.kind));
            }
            if !self.aliases.is_empty() {
                return Err(Error::ModuleAliases);
            }
        }

        validate_aliases(&self.aliases)
    }
}

/// Checks a single alias against the alias rule.
///
/// # Errors
/// Returns [`Error::InvalidAlias`] describing the first violation.
pub fn validate_alias(alias: &str) -> Result<()> {
    let invalid = |reason| Error::InvalidAlias {
        alias: alias.to_string(),
        reason,
    };

    let mut chars = alias.chars();
    match chars.next() {
        None => Err(invalid("alias is empty")),
        Some(first) if first != '_' && !first.is_alphabetic() => {
            Err(invalid("alias must start with a letter or '_'"))
        }
        Some(_) => {
            if chars.all(|c| c == '_' || c.is_alphanumeric()) {
                Ok(())
            } else {
                Err(invalid("alias may only contain letters, digits and '_'"))
            }
        }
    }
}

/// Checks every alias of a sequence and rejects repetitions.
///
/// # Errors
/// Returns [`Error::InvalidAlias`] or [`Error::DuplicateAlias`] for the first offending alias.
pub fn validate_aliases(aliases: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(aliases.len());
    for alias in aliases {
        validate_alias(alias)?;
        if !seen.insert(alias.as_str()) {
            return Err(Error::DuplicateAlias(alias.clone()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let assembly = ReferenceProperties::assembly();
        assert_eq!(assembly.kind(), ImageKind::Assembly);
        assert!(assembly.aliases().is_empty());
        assert!(!assembly.embed_interop_types());

        let module = ReferenceProperties::module();
        assert_eq!(module.kind(), ImageKind::Module);
        assert_ne!(assembly, module);
    }

    #[test]
    fn test_structural_equality() {
        let first = ReferenceProperties::new(ImageKind::Assembly, ["A", "B"], true).unwrap();
        let second = ReferenceProperties::assembly()
            .with_aliases(vec!["A".to_string(), "B".to_string()])
            .unwrap()
            .with_embed_interop_types(true)
            .unwrap();
        assert_eq!(first, second);

        let reordered = first.with_aliases(["B", "A"]).unwrap();
        assert_ne!(first, reordered);
    }

    #[test]
    fn test_module_rejects_embed() {
        let result = ReferenceProperties::module().with_embed_interop_types(true);
        assert!(matches!(
            result,
            Err(Error::EmbedInteropTypesNotSupported(ImageKind::Module))
        ));

        assert!(ReferenceProperties::module()
            .with_embed_interop_types(false)
            .is_ok());
    }

    #[test]
    fn test_module_rejects_aliases() {
        let result = ReferenceProperties::new(ImageKind::Module, ["Foo"], false);
        assert!(matches!(result, Err(Error::ModuleAliases)));
    }

    #[test]
    fn test_alias_rule() {
        assert!(validate_alias("Foo").is_ok());
        assert!(validate_alias("_internal2").is_ok());
        assert!(validate_alias("Äpfel").is_ok());
        assert!(validate_alias(ReferenceProperties::GLOBAL_ALIAS).is_ok());

        for bad in ["", "1abc", "foo bar", "a.b", "-x"] {
            assert!(
                matches!(validate_alias(bad), Err(Error::InvalidAlias { .. })),
                "alias {bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_duplicate_alias() {
        let result = ReferenceProperties::assembly().with_aliases(["Foo", "Bar", "Foo"]);
        match result {
            Err(Error::DuplicateAlias(alias)) => assert_eq!(alias, "Foo"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_with_aliases_keeps_flag() {
        let properties = ReferenceProperties::assembly()
            .with_embed_interop_types(true)
            .unwrap()
            .with_aliases(["X"])
            .unwrap();
        assert!(properties.embed_interop_types());
        assert_eq!(properties.aliases(), ["X"]);
    }
}
