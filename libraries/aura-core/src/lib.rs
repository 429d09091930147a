//! Aura Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Aura Player.
//!
//! This crate provides the building blocks shared by the media index, the
//! playlist store, the playback session and the state coordinator.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `Track`, `Playlist`, `PlaybackSnapshot`, etc.
//! - **Core Traits**: `MediaIndex`, `PlaybackEngine`, `PlaylistStore`
//! - **Error Handling**: Unified `AuraError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use aura_core::types::{PlaybackSnapshot, RepeatMode, Track, TrackId};
//! use std::path::PathBuf;
//!
//! let track = Track::new(TrackId::new(7), "Yesterday", PathBuf::from("/music/yesterday.mp3"));
//! let snapshot = PlaybackSnapshot::default();
//!
//! assert!(snapshot.current_track.is_none());
//! assert_eq!(snapshot.repeat_mode, RepeatMode::Off);
//! assert_eq!(track.id.get(), 7);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod storage;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{AuraError, Result};
pub use storage::{PlaylistStore, TableChange, SETTING_DARK_THEME};
pub use traits::{EngineEvent, EngineEventSender, MediaIndex, PlaybackEngine};

pub use types::{
    // Library
    LibraryStatus, MediaOrder, MediaQuery, SortOrder,
    // Playback
    PlaybackSnapshot, RepeatMode,
    // Playlists
    Playlist, PlaylistId, PlaylistTrack, PlaylistWithTracks,
    // Tracks
    Track, TrackId,
    album_art_for, format_time, ALBUM_ART_BASE, UNKNOWN_ARTIST,
};
