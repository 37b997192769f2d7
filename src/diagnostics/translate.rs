use tracing::debug;

use super::{Diagnostic, DiagnosticCode, Location, MessageProvider};
use crate::{reference::ImageKind, LoadError};

/// Converts a recognized load failure into a diagnostic.
///
/// | Failure | Code | Arguments |
/// |---|---|---|
/// | [`LoadError::Malformed`] | [`DiagnosticCode::InvalidAssemblyMetadata`] / [`DiagnosticCode::InvalidModuleMetadata`] | display name, message |
/// | [`LoadError::NotFound`] | [`DiagnosticCode::MetadataFileNotFound`] | resource name, or `""` |
/// | [`LoadError::Io`] | [`DiagnosticCode::ErrorOpeningAssemblyFile`] / [`DiagnosticCode::ErrorOpeningModuleFile`] | display name, message |
///
/// The assembly or module variant of a code is picked by `image_kind`.
///
/// # Arguments
///
/// * `failure` - The failure returned by [`crate::Reference::get_metadata`]
/// * `messages` - Catalog used to render the diagnostic
/// * `location` - Where the reference was declared
/// * `display_name` - The display name of the failing reference
/// * `image_kind` - The kind the reference was loaded as
///
/// # Errors
///
/// [`LoadError::Unexpected`] is outside of the translatable set and is handed back unmodified.
pub fn translate(
    failure: LoadError,
    messages: &dyn MessageProvider,
    location: Location,
    display_name: &str,
    image_kind: ImageKind,
) -> Result<Diagnostic, LoadError> {
    let (code, arguments) = match failure {
        LoadError::Malformed { message, .. } => {
            let code = match image_kind {
                ImageKind::Assembly => DiagnosticCode::InvalidAssemblyMetadata,
                ImageKind::Module => DiagnosticCode::InvalidModuleMetadata,
            };
            (code, vec![display_name.to_string(), message])
        }
        LoadError::NotFound { name } => (
            DiagnosticCode::MetadataFileNotFound,
            vec![name.unwrap_or_default()],
        ),
        LoadError::Io(error) => {
            let code = match image_kind {
                ImageKind::Assembly => DiagnosticCode::ErrorOpeningAssemblyFile,
                ImageKind::Module => DiagnosticCode::ErrorOpeningModuleFile,
            };
            (code, vec![display_name.to_string(), error.to_string()])
        }
        LoadError::Unexpected(error) => return Err(LoadError::Unexpected(error)),
    };

    debug!(reference = display_name, %code, "translated load failure");
    Ok(Diagnostic::new(code, messages, location, arguments))
}
