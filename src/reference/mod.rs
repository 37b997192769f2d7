//! References to compiled module images.
//!
//! A [`Reference`] is the handle a compilation holds for every assembly or module it consumes.
//! It combines an optional file path, an immutable [`ReferenceProperties`] value and a lazily
//! bound documentation provider. What the reference actually points at is described by a
//! [`ReferenceSource`]; the built-in sources are [`FileImage`] and [`MemoryImage`].
//!
//! # Identity
//!
//! `Reference` is a cheap handle around shared state. Cloning it keeps the identity, and
//! equality and hashing compare identity, not content. This lets an external cache key decoded
//! images by reference. The update methods rely on this: when nothing changes they return the
//! same reference, so entries keyed by it stay valid.
//!
//! # Examples
//!
//! ```rust,no_run
//! use metaref::{reference::ReferenceProperties, Reference};
//!
//! let reference = Reference::from_file("lib.dll", ReferenceProperties::assembly())?;
//! let aliased = reference.with_aliases(["Foo", "Bar"])?;
//!
//! assert_eq!(aliased.file_path(), reference.file_path());
//! assert_eq!(aliased.properties().aliases(), ["Foo", "Bar"]);
//! assert!(!Reference::ptr_eq(&reference, &aliased));
//!
//! let metadata = aliased.get_metadata()?;
//! println!("{}: {} bytes", aliased, metadata.len());
//! # Ok::<(), metaref::Error>(())
//! ```

mod binder;
mod properties;
mod source;

pub use binder::DocumentationBinder;
pub use properties::{validate_alias, validate_aliases, ImageKind, ReferenceProperties};
pub use source::{DocumentationLookup, FileImage, FileImageOptions, MemoryImage, ReferenceSource};

use std::{
    borrow::Cow,
    fmt,
    hash::{Hash, Hasher},
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::debug;

use crate::{
    diagnostics::{translate, Diagnostic, Location, MessageProvider},
    documentation::DocumentationProviderRc,
    metadata::Metadata,
    LoadError, LoadResult, Result,
};

/// A reference counted image source.
pub type ReferenceSourceRc = Arc<dyn ReferenceSource>;

/// Handle to a compiled module image.
#[derive(Clone)]
pub struct Reference {
    inner: Arc<ReferenceInner>,
}

struct ReferenceInner {
    file_path: Option<PathBuf>,
    properties: ReferenceProperties,
    documentation: DocumentationBinder,
    source: ReferenceSourceRc,
}

impl Reference {
    /// Creates a reference to the image described by `source`.
    ///
    /// # Arguments
    ///
    /// * `source` - The concrete image source
    /// * `file_path` - Path of the image, if it has one
    /// * `properties` - Initial properties
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if `source` rejects `properties`.
    pub fn new(
        source: ReferenceSourceRc,
        file_path: Option<PathBuf>,
        properties: ReferenceProperties,
    ) -> Result<Self> {
        source.validate_properties(&properties)?;

        Ok(Self::from_parts(
            source,
            file_path,
            properties,
            DocumentationBinder::new(),
        ))
    }

    /// Creates a reference to an image file, with default [`FileImageOptions`].
    ///
    /// The file is not touched until metadata or documentation is requested.
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if `properties` is invalid.
    pub fn from_file(path: impl Into<PathBuf>, properties: ReferenceProperties) -> Result<Self> {
        Self::from_file_with_options(path, properties, FileImageOptions::default())
    }

    /// Creates a reference to an image file.
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if `properties` is invalid.
    pub fn from_file_with_options(
        path: impl Into<PathBuf>,
        properties: ReferenceProperties,
        options: FileImageOptions,
    ) -> Result<Self> {
        let path = path.into();
        let source = Arc::new(FileImage::new(path.clone(), options));

        Self::new(source, Some(path), properties)
    }

    /// Creates a reference to an image held in memory.
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if `properties` is invalid.
    pub fn from_mem(data: impl Into<Arc<[u8]>>, properties: ReferenceProperties) -> Result<Self> {
        Self::from_image(MemoryImage::new(data), properties)
    }

    /// Creates a reference to a configured [`MemoryImage`].
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if `properties` is invalid.
    pub fn from_image(image: MemoryImage, properties: ReferenceProperties) -> Result<Self> {
        Self::new(Arc::new(image), None, properties)
    }

    fn from_parts(
        source: ReferenceSourceRc,
        file_path: Option<PathBuf>,
        properties: ReferenceProperties,
        documentation: DocumentationBinder,
    ) -> Self {
        Reference {
            inner: Arc::new(ReferenceInner {
                file_path,
                properties,
                documentation,
                source,
            }),
        }
    }

    /// Text identifying this reference in diagnostics and user interfaces.
    ///
    /// This is the file path if there is one, otherwise the source's fallback text. Never use it
    /// to compare references.
    pub fn display(&self) -> Cow<'_, str> {
        match &self.inner.file_path {
            Some(path) => path.to_string_lossy(),
            None => self.inner.source.fallback_display(&self.inner.properties),
        }
    }

    /// Path of the referenced image, if it has one.
    pub fn file_path(&self) -> Option<&Path> {
        self.inner.file_path.as_deref()
    }

    /// The properties of this reference.
    pub fn properties(&self) -> &ReferenceProperties {
        &self.inner.properties
    }

    /// Shortcut for `properties().kind()`.
    pub fn kind(&self) -> ImageKind {
        self.inner.properties.kind()
    }

    /// The image source behind this reference.
    pub fn source(&self) -> &ReferenceSourceRc {
        &self.inner.source
    }

    /// The documentation provider of this reference.
    ///
    /// The first call binds the provider the source creates; every later call, on any thread,
    /// returns that same provider.
    pub fn documentation(&self) -> &DocumentationProviderRc {
        let source = &self.inner.source;
        self.inner
            .documentation
            .get_or_bind(|| source.create_documentation_provider())
    }

    /// Returns `true` once the documentation provider has been bound.
    pub fn is_documentation_bound(&self) -> bool {
        self.inner.documentation.is_bound()
    }

    /// Returns a reference with `aliases` as alias sequence; kind and interop flag stay.
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if an alias is invalid or repeated, or if this
    /// is a module reference.
    pub fn with_aliases<I, S>(&self, aliases: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let properties = self.inner.properties.with_aliases(aliases)?;
        self.with_properties(properties)
    }

    /// Returns a reference with the interop embedding flag set to `value`.
    ///
    /// # Errors
    /// Returns [`crate::Error::EmbedInteropTypesNotSupported`] if `value` is set on a module
    /// reference.
    pub fn with_embed_interop_types(&self, value: bool) -> Result<Self> {
        let properties = self.inner.properties.with_embed_interop_types(value)?;
        self.with_properties(properties)
    }

    /// Returns a reference with `properties`.
    ///
    /// If `properties` equals the current properties this reference itself is returned, keeping
    /// its identity. Otherwise the source validates the new properties and a new reference to
    /// the same image is created; `self` is left untouched.
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] if the source rejects `properties`.
    pub fn with_properties(&self, properties: ReferenceProperties) -> Result<Self> {
        if properties == self.inner.properties {
            return Ok(self.clone());
        }

        self.inner.source.validate_properties(&properties)?;
        debug!(reference = %self.display(), ?properties, "updating reference properties");

        let documentation = match self.inner.documentation.get() {
            Some(provider) => DocumentationBinder::bound(Arc::clone(provider)),
            None => DocumentationBinder::new(),
        };

        Ok(Self::from_parts(
            Arc::clone(&self.inner.source),
            self.inner.file_path.clone(),
            properties,
            documentation,
        ))
    }

    /// Loads the referenced image.
    ///
    /// Every call goes to the source; nothing is cached here. Concurrent calls are independent.
    ///
    /// # Errors
    /// Returns the source's [`LoadError`] untranslated. Use [`Reference::translate_failure`] or
    /// [`crate::diagnostics::translate`] to report it.
    pub fn get_metadata(&self) -> LoadResult<Metadata> {
        debug!(reference = %self.display(), kind = %self.kind(), "loading metadata");

        let result = self.inner.source.load(&self.inner.properties);
        match &result {
            Ok(metadata) => {
                debug!(reference = %self.display(), size = metadata.len(), "metadata loaded");
            }
            Err(error) => {
                debug!(reference = %self.display(), %error, "metadata load failed");
            }
        }

        result
    }

    /// Translates a failure of [`Reference::get_metadata`] using this reference's display name
    /// and kind.
    ///
    /// # Errors
    /// [`LoadError::Unexpected`] is handed back unmodified.
    pub fn translate_failure(
        &self,
        failure: LoadError,
        messages: &dyn MessageProvider,
        location: Location,
    ) -> std::result::Result<Diagnostic, LoadError> {
        translate(failure, messages, location, &self.display(), self.kind())
    }

    /// Returns `true` if both handles are the same reference.
    pub fn ptr_eq(this: &Reference, other: &Reference) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

impl PartialEq for Reference {
    fn eq(&self, other: &Self) -> bool {
        Reference::ptr_eq(self, other)
    }
}

impl Eq for Reference {}

impl Hash for Reference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(Arc::as_ptr(&self.inner), state);
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl fmt::Debug for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reference")
            .field("display", &self.display())
            .field("properties", &self.inner.properties)
            .field("documentation_bound", &self.is_documentation_bound())
            .field("source", &self.inner.source)
            .finish()
    }
}
