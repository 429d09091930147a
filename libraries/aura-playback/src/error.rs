//! Error types for playback management

use thiserror::Error;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// The session was torn down and the engine released
    #[error("No active playback session")]
    NoSession,

    /// Queue is empty
    #[error("Queue is empty")]
    QueueEmpty,

    /// Start index outside the queue
    #[error("Index out of bounds: {index} (queue length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    /// Engine rejected a command
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;

impl From<aura_core::AuraError> for PlaybackError {
    fn from(err: aura_core::AuraError) -> Self {
        Self::Engine(err.to_string())
    }
}

impl From<PlaybackError> for aura_core::AuraError {
    fn from(err: PlaybackError) -> Self {
        aura_core::AuraError::playback(err.to_string())
    }
}
