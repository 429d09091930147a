/// Playlist domain types
use crate::types::{PlaylistId, Track, TrackId};
use serde::{Deserialize, Serialize};

/// User-defined playlist
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Playlist {
    /// Store-generated identifier
    pub id: PlaylistId,

    /// Playlist name
    pub name: String,
}

impl Playlist {
    /// Create a playlist with a specific ID (for database loading)
    pub fn with_id(id: PlaylistId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Association row linking one playlist to one track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlaylistTrack {
    /// Playlist ID
    pub playlist_id: PlaylistId,

    /// Track ID
    pub track_id: TrackId,
}

impl PlaylistTrack {
    /// Create a new association
    pub fn new(playlist_id: PlaylistId, track_id: TrackId) -> Self {
        Self {
            playlist_id,
            track_id,
        }
    }
}

/// A playlist joined with its tracks in insertion order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaylistWithTracks {
    /// The playlist itself
    pub playlist: Playlist,

    /// Tracks ordered by their position in the playlist
    pub tracks: Vec<Track>,
}

impl PlaylistWithTracks {
    /// Whether the playlist contains the given track
    pub fn contains(&self, track_id: TrackId) -> bool {
        self.tracks.iter().any(|t| t.id == track_id)
    }
}
