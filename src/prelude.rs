//! # metaref Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the metaref library. Import this module to get quick access to the essential
//! types for working with references.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all metaref operations
pub use crate::Error;

/// The failure type of metadata loading
pub use crate::LoadError;

/// The result types used throughout metaref
pub use crate::{LoadResult, Result};

// ================================================================================================
// References
// ================================================================================================

/// The reference handle and its configuration
pub use crate::reference::{ImageKind, Reference, ReferenceProperties};

/// Built-in and pluggable image sources
pub use crate::reference::{
    DocumentationLookup, FileImage, FileImageOptions, MemoryImage, ReferenceSource,
};

/// Loaded images
pub use crate::metadata::Metadata;

// ================================================================================================
// Documentation
// ================================================================================================

/// Documentation providers
pub use crate::documentation::{
    DocumentationProvider, DocumentationProviderRc, NoDocumentation, XmlDocumentationProvider,
};

// ================================================================================================
// Diagnostics
// ================================================================================================

/// Load failure translation and reporting
pub use crate::diagnostics::{
    translate, DefaultMessages, Diagnostic, DiagnosticCode, DiagnosticSeverity, Diagnostics,
    Location, MessageProvider,
};
