use std::path::Path;

use thiserror::Error;

use crate::reference::ImageKind;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::LoadError::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::LoadError::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Most variants describe configuration problems: an invalid combination of
/// [`crate::reference::ReferenceProperties`] that was rejected while constructing or updating a
/// [`crate::Reference`]. The caller may retry with corrected input. Failures that happen while
/// loading an image are carried by [`LoadError`], which can be wrapped into this type through
/// [`Error::Load`].
///
/// # Error Categories
///
/// ## Configuration Errors
/// - [`Error::InvalidAlias`] - An alias is not a valid identifier
/// - [`Error::DuplicateAlias`] - The same alias appears twice in one sequence
/// - [`Error::ModuleAliases`] - Aliases were requested for a module reference
/// - [`Error::EmbedInteropTypesNotSupported`] - Interop embedding requested for a module
///
/// ## Loading Errors
/// - [`Error::Load`] - A [`LoadError`] raised by an image source
///
/// # Examples
///
/// ```rust
/// use metaref::{Error, reference::{ImageKind, ReferenceProperties}};
///
/// match ReferenceProperties::new(ImageKind::Module, Vec::<String>::new(), true) {
///     Ok(_) => unreachable!(),
///     Err(Error::EmbedInteropTypesNotSupported(kind)) => {
///         assert_eq!(kind, ImageKind::Module);
///     }
///     Err(e) => panic!("unexpected error: {}", e),
/// }
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// An alias does not satisfy the alias validity rule.
    ///
    /// Aliases must be non-empty, start with `_` or an alphabetic character and continue with
    /// `_` or alphanumeric characters only.
    #[error("Invalid alias '{alias}' - {reason}")]
    InvalidAlias {
        /// The rejected alias
        alias: String,
        /// Why the alias was rejected
        reason: &'static str,
    },

    /// The same alias was given more than once.
    #[error("Duplicate alias '{0}'")]
    DuplicateAlias(String),

    /// Module references can not carry aliases.
    #[error("Module references can not have aliases")]
    ModuleAliases,

    /// Embedding interop types is only possible for assembly references.
    #[error("Interop types can not be embedded from a {0} reference")]
    EmbedInteropTypesNotSupported(ImageKind),

    /// Loading the referenced image failed.
    #[error(transparent)]
    Load(#[from] LoadError),
}

impl Error {
    /// Returns `true` if this error is a rejected property combination.
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        !matches!(self, Error::Load(_))
    }
}

/// Failure raised while loading a referenced image.
///
/// The first three variants form the closed set of recognized resource-access failures. Each of
/// them can be turned into a user-facing [`crate::diagnostics::Diagnostic`] through
/// [`crate::diagnostics::translate`]. Anything else a source runs into is reported as
/// [`LoadError::Unexpected`]; those are defects and are never converted into diagnostics.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The image was found and read, but its content is damaged.
    ///
    /// The error includes the source location where the malformation was detected.
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// The image, or a resource it depends on, does not exist.
    #[error("Could not find '{}'", .name.as_deref().unwrap_or("<unknown>"))]
    NotFound {
        /// Name of the missing resource, if known
        name: Option<String>,
    },

    /// Any other I/O failure while opening or reading the image.
    #[error("{0}")]
    Io(std::io::Error),

    /// A failure outside of the recognized set.
    #[error("Unexpected fault - {0}")]
    Unexpected(Box<dyn std::error::Error + Send + Sync>),
}

impl LoadError {
    /// Classifies an I/O error at the loader boundary.
    ///
    /// [`std::io::ErrorKind::NotFound`] becomes [`LoadError::NotFound`] carrying `path` as the
    /// missing resource name, every other kind stays an [`LoadError::Io`].
    pub fn from_io(error: std::io::Error, path: Option<&Path>) -> Self {
        if error.kind() == std::io::ErrorKind::NotFound {
            LoadError::NotFound {
                name: path.map(|path| path.display().to_string()),
            }
        } else {
            LoadError::Io(error)
        }
    }

    /// Wraps an arbitrary error as [`LoadError::Unexpected`].
    pub fn unexpected<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        LoadError::Unexpected(error.into())
    }

    /// Returns `true` for the failures that may be translated into a diagnostic.
    #[must_use]
    pub fn is_recognized(&self) -> bool {
        !matches!(self, LoadError::Unexpected(_))
    }

    /// The underlying message, without the source location of [`LoadError::Malformed`].
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            LoadError::Malformed { message, .. } => message.clone(),
            LoadError::Io(error) => error.to_string(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(error: std::io::Error) -> Self {
        LoadError::from_io(error, None)
    }
}
