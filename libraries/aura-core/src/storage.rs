//! Storage trait for the playlist store

use crate::error::Result;
use crate::types::{Playlist, PlaylistId, PlaylistWithTracks, Track, TrackId};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Settings key of the dark theme flag
pub const SETTING_DARK_THEME: &str = "ui.dark_theme";

/// Table touched by a committed write
///
/// Emitted on the store's change feed so live queries know when to re-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableChange {
    /// Playlist rows changed
    Playlists,
    /// Track cache rows changed
    Tracks,
    /// Playlist/track association rows changed
    Associations,
    /// Settings rows changed
    Settings,
}

/// Storage context providing access to playlist operations
///
/// Mutations report failures through their `Result`; nothing is swallowed.
#[async_trait]
pub trait PlaylistStore: Send + Sync {
    /// Subscribe to the change feed fired after every committed write
    fn changes(&self) -> broadcast::Receiver<TableChange>;

    // ========================================================================
    // Playlists
    // ========================================================================

    /// All playlists ordered by name
    async fn get_playlists(&self) -> Result<Vec<Playlist>>;

    /// A playlist joined with its ordered tracks
    async fn get_playlist_with_tracks(&self, id: PlaylistId)
        -> Result<Option<PlaylistWithTracks>>;

    /// Create a new playlist with a generated id
    async fn create_playlist(&self, name: &str) -> Result<Playlist>;

    /// Insert or replace a playlist by id
    async fn save_playlist(&self, playlist: &Playlist) -> Result<()>;

    /// Rename a playlist
    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()>;

    /// Delete a playlist and all of its association rows
    async fn delete_playlist(&self, id: PlaylistId) -> Result<()>;

    // ========================================================================
    // Track cache
    // ========================================================================

    /// Cache tracks, ignoring ones already present
    ///
    /// Returns the number of rows inserted.
    async fn cache_tracks(&self, tracks: &[Track]) -> Result<u64>;

    // ========================================================================
    // Associations
    // ========================================================================

    /// Add a track to a playlist; a duplicate is a no-op
    async fn add_track_to_playlist(&self, playlist_id: PlaylistId, track_id: TrackId)
        -> Result<()>;

    /// Add several tracks to a playlist in one transaction
    async fn add_tracks_to_playlist(
        &self,
        playlist_id: PlaylistId,
        track_ids: &[TrackId],
    ) -> Result<()>;

    /// Remove a track from a playlist
    async fn remove_track_from_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<()>;

    // ========================================================================
    // Settings
    // ========================================================================

    /// Read a boolean setting
    async fn get_flag(&self, key: &str) -> Result<Option<bool>>;

    /// Write a boolean setting
    async fn set_flag(&self, key: &str, value: bool) -> Result<()>;
}
