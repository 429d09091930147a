/// Track domain type
use crate::types::TrackId;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Base reference for album artwork, keyed by album id
pub const ALBUM_ART_BASE: &str = "content://media/external/audio/albumart";

/// Artist placeholder used when a file carries no artist tag
pub const UNKNOWN_ARTIST: &str = "<unknown>";

/// Audio track as reported by the media index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable identifier assigned by the media index
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Album artwork reference
    pub album_art: String,

    /// Track duration in milliseconds
    pub duration_ms: u64,

    /// File path on disk
    pub file_path: PathBuf,
}

impl Track {
    /// Create a new track with minimal metadata
    pub fn new(id: TrackId, title: impl Into<String>, file_path: PathBuf) -> Self {
        Self {
            id,
            title: title.into(),
            artist: UNKNOWN_ARTIST.to_string(),
            album_art: String::new(),
            duration_ms: 0,
            file_path,
        }
    }

    /// Set the artist
    #[must_use]
    pub fn with_artist(mut self, artist: impl Into<String>) -> Self {
        self.artist = artist.into();
        self
    }

    /// Set the duration in milliseconds
    #[must_use]
    pub fn with_duration_ms(mut self, duration_ms: u64) -> Self {
        self.duration_ms = duration_ms;
        self
    }

    /// Set the artwork reference from an album id
    #[must_use]
    pub fn with_album_id(mut self, album_id: i64) -> Self {
        self.album_art = album_art_for(album_id);
        self
    }

    /// Get the track duration as a Duration
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Case-insensitive substring match over title and artist
    ///
    /// `needle` must already be lowercased.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        self.title.to_lowercase().contains(needle) || self.artist.to_lowercase().contains(needle)
    }
}

/// Artwork reference for an album id
pub fn album_art_for(album_id: i64) -> String {
    format!("{}/{}", ALBUM_ART_BASE, album_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_creation() {
        let track = Track::new(TrackId::new(1), "Test Song", PathBuf::from("/music/song.mp3"));
        assert_eq!(track.title, "Test Song");
        assert_eq!(track.file_path, PathBuf::from("/music/song.mp3"));
        assert_eq!(track.artist, UNKNOWN_ARTIST);
    }

    #[test]
    fn album_art_is_derived_from_album_id() {
        let track = Track::new(TrackId::new(1), "Song", PathBuf::from("/song.mp3")).with_album_id(12);
        assert_eq!(track.album_art, "content://media/external/audio/albumart/12");
    }

    #[test]
    fn duration_conversion() {
        let track =
            Track::new(TrackId::new(1), "Song", PathBuf::from("/song.mp3")).with_duration_ms(180_000);
        assert_eq!(track.duration(), Duration::from_secs(180));
    }

    #[test]
    fn matches_title_or_artist_ignoring_case() {
        let track = Track::new(TrackId::new(2), "Today", PathBuf::from("/today.mp3"))
            .with_artist("Tame Impala");

        assert!(track.matches_lowercase("to"));
        assert!(track.matches_lowercase("impala"));
        assert!(!track.matches_lowercase("beatles"));
    }
}
