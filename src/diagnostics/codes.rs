//! Diagnostic codes and message catalogs.

use std::fmt;

use strum::{EnumCount, EnumIter, IntoStaticStr};

use super::DiagnosticSeverity;

/// The diagnostics this crate can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount, IntoStaticStr)]
pub enum DiagnosticCode {
    /// A referenced file does not exist.
    ///
    /// Arguments: missing resource name (empty if unknown)
    MetadataFileNotFound,

    /// A referenced assembly could be read but its metadata is invalid.
    ///
    /// Arguments: display name, underlying message
    InvalidAssemblyMetadata,

    /// A referenced module could be read but its metadata is invalid.
    ///
    /// Arguments: display name, underlying message
    InvalidModuleMetadata,

    /// A referenced assembly could not be opened.
    ///
    /// Arguments: display name, underlying message
    ErrorOpeningAssemblyFile,

    /// A referenced module could not be opened.
    ///
    /// Arguments: display name, underlying message
    ErrorOpeningModuleFile,
}

impl DiagnosticCode {
    /// The stable number of this code.
    pub fn number(self) -> u32 {
        match self {
            DiagnosticCode::MetadataFileNotFound => 6,
            DiagnosticCode::InvalidAssemblyMetadata => 9,
            DiagnosticCode::InvalidModuleMetadata => 10,
            DiagnosticCode::ErrorOpeningAssemblyFile => 11,
            DiagnosticCode::ErrorOpeningModuleFile => 12,
        }
    }

    /// The name of this code.
    pub fn name(self) -> &'static str {
        self.into()
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A catalog of diagnostic messages.
///
/// Templates use positional placeholders: `{0}` is replaced by the first argument, `{1}` by the
/// second and so on. `{{` and `}}` produce literal braces.
pub trait MessageProvider: Send + Sync {
    /// Prefix of rendered diagnostic ids, e.g. `MR` for `MR0006`.
    fn prefix(&self) -> &str;

    /// The message template of `code`.
    fn template(&self, code: DiagnosticCode) -> &str;

    /// The severity `code` is reported with.
    fn severity(&self, _code: DiagnosticCode) -> DiagnosticSeverity {
        DiagnosticSeverity::Error
    }

    /// Renders the id of `code`.
    fn id(&self, code: DiagnosticCode) -> String {
        format!("{}{:04}", self.prefix(), code.number())
    }

    /// Renders the message of `code` with `arguments`.
    fn format(&self, code: DiagnosticCode, arguments: &[String]) -> String {
        format_template(self.template(code), arguments)
    }
}

/// The built-in English catalog.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultMessages;

impl MessageProvider for DefaultMessages {
    fn prefix(&self) -> &str {
        "MR"
    }

    fn template(&self, code: DiagnosticCode) -> &str {
        match code {
            DiagnosticCode::MetadataFileNotFound => "Metadata file '{0}' could not be found",
            DiagnosticCode::InvalidAssemblyMetadata => {
                "An assembly with invalid metadata was referenced: '{0}' -- {1}"
            }
            DiagnosticCode::InvalidModuleMetadata => {
                "A module with invalid metadata was referenced: '{0}' -- {1}"
            }
            DiagnosticCode::ErrorOpeningAssemblyFile => "Error opening assembly file '{0}' -- {1}",
            DiagnosticCode::ErrorOpeningModuleFile => "Error opening module file '{0}' -- {1}",
        }
    }
}

/// Substitutes positional placeholders in `template`.
///
/// Placeholders without a matching argument are kept as they are.
pub fn format_template(template: &str, arguments: &[String]) -> String {
    let mut output = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(position) = rest.find(|c: char| c == '{' || c == '}') {
        output.push_str(&rest[..position]);
        let tail = &rest[position..];

        if tail.starts_with("{{") || tail.starts_with("}}") {
            output.push_str(&tail[..1]);
            rest = &tail[2..];
            continue;
        }

        if let Some(close) = tail.find('}').filter(|_| tail.starts_with('{')) {
            if let Some(argument) = tail[1..close]
                .parse::<usize>()
                .ok()
                .and_then(|index| arguments.get(index))
            {
                output.push_str(argument);
                rest = &tail[close + 1..];
                continue;
            }
        }

        output.push_str(&tail[..1]);
        rest = &tail[1..];
    }
    output.push_str(rest);

    output
}
