use crate::{playlists, settings, tracks};
use async_trait::async_trait;
use aura_core::{error::Result, storage::PlaylistStore, types::*, TableChange};
use sqlx::SqlitePool;
use tokio::sync::broadcast;

/// Capacity of the change feed; slow subscribers see `Lagged` and re-query
const CHANGE_FEED_CAPACITY: usize = 64;

/// Local storage context using `SQLite`
pub struct LocalStorageContext {
    pool: SqlitePool,
    changes: broadcast::Sender<TableChange>,
}

impl LocalStorageContext {
    pub fn new(pool: SqlitePool) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_FEED_CAPACITY);
        Self { pool, changes }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn notify(&self, change: TableChange) {
        // No subscribers is fine
        let _ = self.changes.send(change);
    }
}

#[async_trait]
impl PlaylistStore for LocalStorageContext {
    fn changes(&self) -> broadcast::Receiver<TableChange> {
        self.changes.subscribe()
    }

    // Playlists
    async fn get_playlists(&self) -> Result<Vec<Playlist>> {
        playlists::get_all(&self.pool).await
    }

    async fn get_playlist_with_tracks(
        &self,
        id: PlaylistId,
    ) -> Result<Option<PlaylistWithTracks>> {
        playlists::get_with_tracks(&self.pool, id).await
    }

    async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let playlist = playlists::create(&self.pool, name).await?;
        tracing::debug!(id = %playlist.id, name, "Created playlist");
        self.notify(TableChange::Playlists);
        Ok(playlist)
    }

    async fn save_playlist(&self, playlist: &Playlist) -> Result<()> {
        playlists::save(&self.pool, playlist).await?;
        self.notify(TableChange::Playlists);
        Ok(())
    }

    async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        playlists::rename(&self.pool, id, name).await?;
        self.notify(TableChange::Playlists);
        Ok(())
    }

    async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        playlists::delete(&self.pool, id).await?;
        tracing::debug!(id = %id, "Deleted playlist");
        self.notify(TableChange::Playlists);
        self.notify(TableChange::Associations);
        Ok(())
    }

    // Track cache
    async fn cache_tracks(&self, tracks: &[Track]) -> Result<u64> {
        let inserted = tracks::insert_if_absent(&self.pool, tracks).await?;
        if inserted > 0 {
            tracing::debug!(inserted, "Cached new tracks");
            self.notify(TableChange::Tracks);
        }
        Ok(inserted)
    }

    // Associations
    async fn add_track_to_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<()> {
        playlists::add_track(&self.pool, playlist_id, track_id).await?;
        self.notify(TableChange::Associations);
        Ok(())
    }

    async fn add_tracks_to_playlist(
        &self,
        playlist_id: PlaylistId,
        track_ids: &[TrackId],
    ) -> Result<()> {
        playlists::add_tracks(&self.pool, playlist_id, track_ids).await?;
        self.notify(TableChange::Associations);
        Ok(())
    }

    async fn remove_track_from_playlist(
        &self,
        playlist_id: PlaylistId,
        track_id: TrackId,
    ) -> Result<()> {
        playlists::remove_track(&self.pool, playlist_id, track_id).await?;
        self.notify(TableChange::Associations);
        Ok(())
    }

    // Settings
    async fn get_flag(&self, key: &str) -> Result<Option<bool>> {
        settings::get_bool(&self.pool, key).await.map_err(Into::into)
    }

    async fn set_flag(&self, key: &str, value: bool) -> Result<()> {
        settings::set_setting(&self.pool, key, &serde_json::Value::Bool(value)).await?;
        self.notify(TableChange::Settings);
        Ok(())
    }
}
