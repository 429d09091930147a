/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

impl From<StorageError> for aura_core::AuraError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(e) => aura_core::AuraError::from(e),
            other => aura_core::AuraError::storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::AuraError;

    #[test]
    fn database_errors_keep_their_kind() {
        let err: AuraError = StorageError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, AuraError::Database(_)));
    }

    #[test]
    fn serialization_errors_become_storage_errors() {
        let err: AuraError = StorageError::SerializationError("bad json".into()).into();
        assert_eq!(err.to_string(), "Storage error: Serialization error: bad json");
    }
}
