/// Metadata-specific errors
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `MetadataError`
pub type Result<T> = std::result::Result<T, MetadataError>;

/// Metadata error types
#[derive(Error, Debug)]
pub enum MetadataError {
    /// File or media root not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    /// Media root could not be read
    #[error("Access denied: {0}")]
    AccessDenied(PathBuf),

    /// Catalog could not be loaded or saved
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// I/O error
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Lofty error
    #[error(transparent)]
    Lofty(#[from] lofty::error::LoftyError),
}

impl From<MetadataError> for aura_core::AuraError {
    fn from(err: MetadataError) -> Self {
        match err {
            MetadataError::FileNotFound(path) => {
                aura_core::AuraError::not_found("media root", path.display().to_string())
            }
            MetadataError::AccessDenied(path) => {
                aura_core::AuraError::permission_denied(path.display().to_string())
            }
            MetadataError::Io(e) => aura_core::AuraError::Io(e),
            other => aura_core::AuraError::metadata(other.to_string()),
        }
    }
}
