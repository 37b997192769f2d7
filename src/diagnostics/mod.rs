//! Diagnostics for reference loading failures.
//!
//! This module turns the recognized [`crate::LoadError`] kinds into user-facing
//! [`Diagnostic`]s and collects them for reporting. Translation is always an explicit step:
//! [`crate::Reference::get_metadata`] returns raw failures, so they stay available for logging,
//! and the caller decides which ones to report through [`translate`].
//!
//! # Key Components
//!
//! - [`translate`] - Maps a load failure to a diagnostic, re-raising unexpected faults
//! - [`Diagnostic`] - Individual diagnostic entry with code, location and arguments
//! - [`Diagnostics`] - Thread-safe container for diagnostic entries
//! - [`DiagnosticCode`] / [`MessageProvider`] - The code set and pluggable message catalogs
//!
//! # Usage Examples
//!
//! ```rust
//! use metaref::{
//!     diagnostics::{translate, DefaultMessages, DiagnosticCode, Diagnostics, Location},
//!     reference::ImageKind,
//!     LoadError,
//! };
//!
//! let diagnostics = Diagnostics::new();
//! let failure = LoadError::NotFound { name: Some("foo.dll".into()) };
//!
//! let diagnostic = translate(failure, &DefaultMessages, Location::None, "foo.dll", ImageKind::Assembly)?;
//! assert_eq!(diagnostic.code, DiagnosticCode::MetadataFileNotFound);
//! diagnostics.push(diagnostic);
//!
//! assert!(diagnostics.has_errors());
//! # Ok::<(), metaref::LoadError>(())
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are [`Send`] and [`Sync`]. The [`Diagnostics`] container uses
//! `boxcar::Vec` internally, which provides lock-free concurrent append operations.

mod codes;
mod translate;

pub use codes::{format_template, DefaultMessages, DiagnosticCode, MessageProvider};
pub use translate::translate;

use std::fmt::{self, Write};

/// Severity level of a diagnostic entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DiagnosticSeverity {
    /// Informational message, not indicating a problem.
    Info,

    /// Warning; compilation can continue with the reference.
    Warning,

    /// Error; the reference can not be used.
    Error,
}

impl fmt::Display for DiagnosticSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiagnosticSeverity::Info => write!(f, "info"),
            DiagnosticSeverity::Warning => write!(f, "warning"),
            DiagnosticSeverity::Error => write!(f, "error"),
        }
    }
}

/// Where a diagnostic applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Location {
    /// No source location, e.g. a reference passed on the command line
    #[default]
    None,
    /// A position in a source file
    Source {
        /// The source file
        path: String,
        /// One-based line
        line: u32,
        /// One-based column
        column: u32,
    },
}

impl Location {
    /// A position in a source file.
    pub fn source(path: impl Into<String>, line: u32, column: u32) -> Self {
        Location::Source {
            path: path.into(),
            line,
            column,
        }
    }

    /// Returns `true` for [`Location::None`].
    pub fn is_none(&self) -> bool {
        matches!(self, Location::None)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::None => Ok(()),
            Location::Source { path, line, column } => write!(f, "{path}({line},{column})"),
        }
    }
}

/// A single diagnostic entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity level of this diagnostic.
    pub severity: DiagnosticSeverity,

    /// The diagnostic code.
    pub code: DiagnosticCode,

    /// The rendered id, e.g. `MR0006`.
    pub id: String,

    /// Where the diagnostic applies.
    pub location: Location,

    /// The message arguments, in placeholder order.
    pub arguments: Vec<String>,

    /// The rendered message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic, rendering id, severity and message from `messages`.
    ///
    /// # Arguments
    ///
    /// * `code` - The diagnostic code
    /// * `messages` - Catalog providing the template and severity
    /// * `location` - Where the diagnostic applies
    /// * `arguments` - Values for the template placeholders
    pub fn new(
        code: DiagnosticCode,
        messages: &dyn MessageProvider,
        location: Location,
        arguments: Vec<String>,
    ) -> Self {
        Self {
            severity: messages.severity(code),
            code,
            id: messages.id(code),
            message: messages.format(code, &arguments),
            location,
            arguments,
        }
    }

    /// Replaces the location.
    #[must_use]
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = location;
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.location.is_none() {
            write!(f, "{}: ", self.location)?;
        }

        write!(f, "{} {}: {}", self.severity, self.id, self.message)
    }
}

/// Thread-safe container for collecting diagnostic entries.
///
/// Uses `boxcar::Vec` internally for lock-free concurrent append operations.
/// Multiple threads can safely add diagnostics simultaneously.
#[derive(Debug)]
pub struct Diagnostics {
    entries: boxcar::Vec<Diagnostic>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagnostics {
    /// Creates a new empty diagnostics container.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: boxcar::Vec::new(),
        }
    }

    /// Adds a diagnostic entry.
    pub fn push(&self, diagnostic: Diagnostic) {
        self.entries.push(diagnostic);
    }

    /// Returns true if any diagnostics have been collected.
    pub fn has_any(&self) -> bool {
        self.entries.count() > 0
    }

    /// Returns true if any error-level diagnostics have been collected.
    pub fn has_errors(&self) -> bool {
        self.iter().any(|d| d.severity == DiagnosticSeverity::Error)
    }

    /// Returns the total number of diagnostics.
    pub fn count(&self) -> usize {
        self.entries.count()
    }

    /// Returns the number of diagnostics with the given severity.
    pub fn count_of(&self, severity: DiagnosticSeverity) -> usize {
        self.iter().filter(|d| d.severity == severity).count()
    }

    /// Returns an iterator over all diagnostics, in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().map(|(_, d)| d)
    }

    /// Returns all errors as a vector.
    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.iter()
            .filter(|d| d.severity == DiagnosticSeverity::Error)
            .collect()
    }

    /// Returns diagnostics filtered by code.
    pub fn by_code(&self, code: DiagnosticCode) -> Vec<&Diagnostic> {
        self.iter().filter(|d| d.code == code).collect()
    }

    /// Formats a summary of all diagnostics for display.
    pub fn summary(&self) -> String {
        let mut output = String::new();

        let _ = writeln!(
            output,
            "Diagnostics: {} error(s), {} warning(s), {} info(s)",
            self.count_of(DiagnosticSeverity::Error),
            self.count_of(DiagnosticSeverity::Warning),
            self.count_of(DiagnosticSeverity::Info)
        );

        for diagnostic in self.iter() {
            let _ = writeln!(output, "  {diagnostic}");
        }

        output
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.summary())
    }
}
