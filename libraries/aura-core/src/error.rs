/// Core error types for Aura Player
use thiserror::Error;

use crate::types::PlaylistId;

/// Result type alias using `AuraError`
pub type Result<T> = std::result::Result<T, AuraError>;

/// Core error type for Aura Player
#[derive(Error, Debug)]
pub enum AuraError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Playback engine or session errors
    #[error("Playback error: {0}")]
    Playback(String),

    /// Metadata parsing errors
    #[error("Metadata error: {0}")]
    Metadata(String),

    /// Entity not found
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Kind of entity, e.g. "media root"
        entity: String,
        /// Identifier that was looked up
        id: String,
    },

    /// Playlist not found
    #[error("Playlist not found: {0}")]
    PlaylistNotFound(PlaylistId),

    /// Access to the media index was denied
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// I/O errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// Database errors (for storage implementations)
    #[error("Database error: {0}")]
    Database(String),
}

impl AuraError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a playback error
    pub fn playback(msg: impl Into<String>) -> Self {
        Self::Playback(msg.into())
    }

    /// Create a metadata error
    pub fn metadata(msg: impl Into<String>) -> Self {
        Self::Metadata(msg.into())
    }

    /// Create a not found error
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Create a permission denied error
    pub fn permission_denied(msg: impl Into<String>) -> Self {
        Self::PermissionDenied(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Whether this error means the media index could not be read at all
    pub fn is_access_denied(&self) -> bool {
        match self {
            Self::PermissionDenied(_) => true,
            Self::Io(e) => e.kind() == std::io::ErrorKind::PermissionDenied,
            _ => false,
        }
    }
}

#[cfg(feature = "sqlx-support")]
impl From<sqlx::Error> for AuraError {
    fn from(err: sqlx::Error) -> Self {
        Self::Database(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message() {
        let err = AuraError::not_found("Playlist", "5");
        assert_eq!(err.to_string(), "Playlist not found: 5");
    }

    #[test]
    fn access_denied_detection() {
        assert!(AuraError::permission_denied("no access").is_access_denied());

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert!(AuraError::from(io).is_access_denied());

        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(!AuraError::from(io).is_access_denied());
    }
}
