use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::{
    documentation::{DocumentationProviderRc, XmlDocumentationProvider},
    metadata::Metadata,
    reference::{ReferenceProperties, ReferenceSource},
    Error, LoadError, LoadResult, Result,
};

/// In-memory source that counts how often it is asked to load or to build documentation.
#[derive(Debug)]
pub struct CountingSource {
    data: Arc<[u8]>,
    documentation: Option<String>,
    pub loads: AtomicUsize,
    pub documentation_calls: AtomicUsize,
}

impl CountingSource {
    pub fn new(data: Vec<u8>) -> Self {
        CountingSource {
            data: data.into(),
            documentation: None,
            loads: AtomicUsize::new(0),
            documentation_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_documentation(mut self, xml: &str) -> Self {
        self.documentation = Some(xml.to_string());
        self
    }
}

impl ReferenceSource for CountingSource {
    fn load(&self, properties: &ReferenceProperties) -> LoadResult<Metadata> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Metadata::from_mem(properties.kind(), Arc::clone(&self.data))
    }

    fn create_documentation_provider(&self) -> Option<DocumentationProviderRc> {
        self.documentation_calls.fetch_add(1, Ordering::SeqCst);
        let xml = self.documentation.as_deref()?;
        let provider = XmlDocumentationProvider::parse(xml).ok()?;
        Some(Arc::new(provider))
    }
}

#[derive(Debug)]
enum Failure {
    Malformed(String),
    NotFound(Option<String>),
    Io(io::ErrorKind, String),
    Unexpected(String),
}

/// Source whose every load fails the same way.
#[derive(Debug)]
pub struct FailingSource {
    failure: Failure,
}

impl FailingSource {
    pub fn malformed(message: &str) -> Self {
        FailingSource {
            failure: Failure::Malformed(message.to_string()),
        }
    }

    pub fn not_found(name: Option<&str>) -> Self {
        FailingSource {
            failure: Failure::NotFound(name.map(str::to_string)),
        }
    }

    pub fn io(kind: io::ErrorKind, message: &str) -> Self {
        FailingSource {
            failure: Failure::Io(kind, message.to_string()),
        }
    }

    pub fn unexpected(message: &str) -> Self {
        FailingSource {
            failure: Failure::Unexpected(message.to_string()),
        }
    }
}

impl ReferenceSource for FailingSource {
    fn load(&self, _properties: &ReferenceProperties) -> LoadResult<Metadata> {
        Err(match &self.failure {
            Failure::Malformed(message) => malformed_error!(message),
            Failure::NotFound(name) => LoadError::NotFound { name: name.clone() },
            Failure::Io(kind, message) => LoadError::Io(io::Error::new(*kind, message.clone())),
            Failure::Unexpected(message) => LoadError::unexpected(message.clone()),
        })
    }

    fn create_documentation_provider(&self) -> Option<DocumentationProviderRc> {
        None
    }
}

/// Source that additionally rejects the alias `Forbidden`.
#[derive(Debug)]
pub struct StrictSource;

impl ReferenceSource for StrictSource {
    fn validate_properties(&self, properties: &ReferenceProperties) -> Result<()> {
        properties.validate()?;

        match properties.aliases().iter().find(|alias| *alias == "Forbidden") {
            Some(alias) => Err(Error::InvalidAlias {
                alias: alias.clone(),
                reason: "alias is reserved by this source",
            }),
            None => Ok(()),
        }
    }

    fn load(&self, properties: &ReferenceProperties) -> LoadResult<Metadata> {
        Metadata::from_mem(properties.kind(), b"MZ".to_vec())
    }

    fn create_documentation_provider(&self) -> Option<DocumentationProviderRc> {
        None
    }
}
