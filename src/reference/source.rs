//! Image sources behind a [`crate::Reference`].
//!
//! A [`ReferenceSource`] provides everything a reference needs from its concrete kind: the
//! fallback display text, validation of property updates, the metadata loader and the
//! documentation factory. Two sources ship with the crate:
//!
//! - [`FileImage`] - an image file on disk, optionally memory-mapped, with its XML documentation
//!   file looked up on demand
//! - [`MemoryImage`] - an image already held in memory, with optional attached documentation
//!
//! Other sources (a decoder cache, a build system's in-flight outputs, ...) plug in by
//! implementing the trait and passing it to [`crate::Reference::new`].

use std::{
    borrow::Cow,
    fmt,
    path::{Path, PathBuf},
    sync::Arc,
};

use tracing::{debug, warn};

use super::{ImageKind, ReferenceProperties};
use crate::{
    documentation::{DocumentationProviderRc, XmlDocumentationProvider},
    metadata::Metadata,
    LoadError, LoadResult, Result,
};

/// Capabilities a concrete reference kind provides.
pub trait ReferenceSource: Send + Sync + fmt::Debug {
    /// Text shown for a reference without a file path.
    fn fallback_display(&self, properties: &ReferenceProperties) -> Cow<'_, str> {
        Cow::Borrowed(in_memory_display(properties.kind()))
    }

    /// Checks whether a reference of this kind can take on `properties`.
    ///
    /// # Errors
    /// Returns a configuration [`crate::Error`] for unsupported combinations. The default accepts
    /// every combination [`ReferenceProperties::validate`] accepts.
    fn validate_properties(&self, properties: &ReferenceProperties) -> Result<()> {
        properties.validate()
    }

    /// Loads the image as described by `properties`.
    ///
    /// # Errors
    /// Failures are classified into [`LoadError`] at this boundary.
    fn load(&self, properties: &ReferenceProperties) -> LoadResult<Metadata>;

    /// Builds the documentation provider for this image, if there is one.
    fn create_documentation_provider(&self) -> Option<DocumentationProviderRc>;
}

fn in_memory_display(kind: ImageKind) -> &'static str {
    match kind {
        ImageKind::Assembly => "<in-memory assembly>",
        ImageKind::Module => "<in-memory module>",
    }
}

/// Where the documentation of a [`FileImage`] comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DocumentationLookup {
    /// The image has no documentation
    None,
    /// The file next to the image with the same stem and an `.xml` extension
    #[default]
    SideBySide,
    /// An explicit documentation file
    Path(PathBuf),
}

/// Configuration for file-backed references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileImageOptions {
    /// Memory-map the image instead of reading it into a buffer
    pub memory_map: bool,
    /// Where to look for documentation
    pub documentation: DocumentationLookup,
}

impl Default for FileImageOptions {
    fn default() -> Self {
        FileImageOptions {
            memory_map: true,
            documentation: DocumentationLookup::SideBySide,
        }
    }
}

/// An image file on disk.
///
/// Every [`ReferenceSource::load`] opens the file anew; nothing is cached between loads.
#[derive(Debug, Clone)]
pub struct FileImage {
    path: PathBuf,
    options: FileImageOptions,
}

impl FileImage {
    /// Creates a source for the image at `path`.
    pub fn new(path: impl Into<PathBuf>, options: FileImageOptions) -> Self {
        FileImage {
            path: path.into(),
            options,
        }
    }

    /// The image path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The options this source was created with.
    pub fn options(&self) -> &FileImageOptions {
        &self.options
    }

    /// The documentation file this source reads, if any.
    pub fn documentation_path(&self) -> Option<Cow<'_, Path>> {
        match &self.options.documentation {
            DocumentationLookup::None => None,
            DocumentationLookup::SideBySide => Some(Cow::Owned(self.path.with_extension("xml"))),
            DocumentationLookup::Path(path) => Some(Cow::Borrowed(path.as_path())),
        }
    }
}

impl ReferenceSource for FileImage {
    fn fallback_display(&self, _properties: &ReferenceProperties) -> Cow<'_, str> {
        self.path.to_string_lossy()
    }

    fn load(&self, properties: &ReferenceProperties) -> LoadResult<Metadata> {
        Metadata::from_file(properties.kind(), &self.path, self.options.memory_map)
    }

    fn create_documentation_provider(&self) -> Option<DocumentationProviderRc> {
        let path = self.documentation_path()?;

        match XmlDocumentationProvider::from_file(&path) {
            Ok(provider) => {
                debug!(path = %path.display(), members = provider.len(), "documentation loaded");
                Some(Arc::new(provider))
            }
            Err(LoadError::NotFound { .. }) => None,
            Err(error) => {
                warn!(path = %path.display(), %error, "ignoring unreadable documentation");
                None
            }
        }
    }
}

/// An image held in memory.
#[derive(Debug, Clone)]
pub struct MemoryImage {
    data: Arc<[u8]>,
    display: Option<String>,
    documentation: Option<DocumentationProviderRc>,
}

impl MemoryImage {
    /// Creates a source over `data`.
    pub fn new(data: impl Into<Arc<[u8]>>) -> Self {
        MemoryImage {
            data: data.into(),
            display: None,
            documentation: None,
        }
    }

    /// Sets the text shown for references to this image.
    #[must_use]
    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    /// Attaches a documentation provider.
    #[must_use]
    pub fn with_documentation(mut self, provider: DocumentationProviderRc) -> Self {
        self.documentation = Some(provider);
        self
    }

    /// The image bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ReferenceSource for MemoryImage {
    fn fallback_display(&self, properties: &ReferenceProperties) -> Cow<'_, str> {
        match &self.display {
            Some(display) => Cow::Borrowed(display.as_str()),
            None => Cow::Borrowed(in_memory_display(properties.kind())),
        }
    }

    fn load(&self, properties: &ReferenceProperties) -> LoadResult<Metadata> {
        Metadata::from_mem(properties.kind(), Arc::clone(&self.data))
    }

    fn create_documentation_provider(&self) -> Option<DocumentationProviderRc> {
        self.documentation.clone()
    }
}
