//! Documentation providers for referenced images.
//!
//! A [`DocumentationProvider`] supplies the doc-comment text of the symbols defined in a
//! referenced image, keyed by documentation id (`T:Namespace.Type`, `M:Namespace.Type.Method`,
//! ...). Every [`crate::Reference`] binds exactly one provider, lazily, the first time it is asked
//! for one. References without documentation bind [`NoDocumentation`].
//!
//! # Key Components
//!
//! - [`DocumentationProvider`] - Trait implemented by every provider
//! - [`XmlDocumentationProvider`] - Reads the XML documentation files emitted next to compiled images
//! - [`NoDocumentation`] - The empty marker provider

mod xml;

pub use xml::XmlDocumentationProvider;

use std::{fmt, sync::Arc};

/// A reference counted documentation provider.
pub type DocumentationProviderRc = Arc<dyn DocumentationProvider>;

/// Supplies documentation text keyed by documentation id.
pub trait DocumentationProvider: Send + Sync + fmt::Debug {
    /// The documentation of the symbol with the given id, if any.
    fn documentation(&self, documentation_id: &str) -> Option<&str>;

    /// Returns `true` if this provider can never return documentation.
    fn is_empty(&self) -> bool {
        false
    }
}

/// Marker provider for references without documentation.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NoDocumentation;

impl NoDocumentation {
    /// A shared handle to the marker.
    pub fn shared() -> DocumentationProviderRc {
        Arc::new(NoDocumentation)
    }
}

impl DocumentationProvider for NoDocumentation {
    fn documentation(&self, _documentation_id: &str) -> Option<&str> {
        None
    }

    fn is_empty(&self) -> bool {
        true
    }
}
