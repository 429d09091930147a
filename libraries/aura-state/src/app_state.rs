//! Application state coordinator
//!
//! Holds the library view inputs (search text, sort key, raw track list)
//! and republishes the derived visible list whenever one of them changes.
//! Playlists and the theme flag are forwarded from the store.

use crate::view::{queue_start, visible_tracks};
use aura_core::{
    AuraError, LibraryStatus, MediaIndex, MediaQuery, Playlist, PlaylistId, PlaylistStore,
    PlaylistWithTracks, Result, SortOrder, Track, TrackId, SETTING_DARK_THEME,
};
use aura_storage::live::{watch_playlist, watch_playlists};
use aura_storage::LiveQuery;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Theme used until the user toggles it
pub const DEFAULT_DARK_THEME: bool = true;

/// Shared application state
pub struct AppState {
    index: Arc<dyn MediaIndex>,
    store: Arc<dyn PlaylistStore>,

    raw_tracks: watch::Sender<Vec<Track>>,
    search_query: watch::Sender<String>,
    sort_order: watch::Sender<SortOrder>,
    visible: watch::Sender<Vec<Track>>,
    /// Serializes re-derivation so the last input change publishes last
    derive_lock: Mutex<()>,

    library_status: watch::Sender<LibraryStatus>,
    dark_theme: watch::Sender<bool>,
    playlists: LiveQuery<Vec<Playlist>>,
}

impl AppState {
    /// Create the coordinator
    ///
    /// Reads the persisted theme flag and starts the playlist live query.
    /// The library stays `Loading` until [`load_library`](Self::load_library)
    /// runs.
    pub async fn new(index: Arc<dyn MediaIndex>, store: Arc<dyn PlaylistStore>) -> Result<Self> {
        let dark_theme = store
            .get_flag(SETTING_DARK_THEME)
            .await?
            .unwrap_or(DEFAULT_DARK_THEME);

        let playlists = watch_playlists(Arc::clone(&store));

        Ok(Self {
            index,
            store,
            raw_tracks: watch::Sender::new(Vec::new()),
            search_query: watch::Sender::new(String::new()),
            sort_order: watch::Sender::new(SortOrder::default()),
            visible: watch::Sender::new(Vec::new()),
            derive_lock: Mutex::new(()),
            library_status: watch::Sender::new(LibraryStatus::Loading),
            dark_theme: watch::Sender::new(dark_theme),
            playlists,
        })
    }

    // ===== Observables =====

    /// Visible track list (filtered and sorted)
    pub fn tracks(&self) -> watch::Receiver<Vec<Track>> {
        self.visible.subscribe()
    }

    pub fn search_query(&self) -> watch::Receiver<String> {
        self.search_query.subscribe()
    }

    pub fn sort_order(&self) -> watch::Receiver<SortOrder> {
        self.sort_order.subscribe()
    }

    pub fn library_status(&self) -> watch::Receiver<LibraryStatus> {
        self.library_status.subscribe()
    }

    pub fn dark_theme(&self) -> watch::Receiver<bool> {
        self.dark_theme.subscribe()
    }

    /// All playlists ordered by name
    pub fn playlists(&self) -> watch::Receiver<Vec<Playlist>> {
        self.playlists.receiver()
    }

    /// One playlist with its tracks, kept current by the store
    pub fn playlist(&self, id: PlaylistId) -> LiveQuery<Option<PlaylistWithTracks>> {
        watch_playlist(Arc::clone(&self.store), id)
    }

    // ===== Library view inputs =====

    pub fn set_search_query(&self, query: impl Into<String>) {
        let _guard = self.lock_derive();
        self.search_query.send_replace(query.into());
        self.rederive();
    }

    pub fn set_sort_order(&self, order: SortOrder) {
        let _guard = self.lock_derive();
        self.sort_order.send_replace(order);
        self.rederive();
    }

    fn set_raw_tracks(&self, tracks: Vec<Track>) {
        let _guard = self.lock_derive();
        self.raw_tracks.send_replace(tracks);
        self.rederive();
    }

    fn lock_derive(&self) -> MutexGuard<'_, ()> {
        self.derive_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Caller holds `derive_lock`
    fn rederive(&self) {
        let visible = visible_tracks(
            &self.raw_tracks.borrow(),
            &self.search_query.borrow(),
            *self.sort_order.borrow(),
        );
        self.visible.send_replace(visible);
    }

    /// Query the media index and publish the result
    ///
    /// The query runs on its own task. A failing index leaves an empty
    /// list and `PermissionRequired`. Tracks are cached in the store
    /// after they are published.
    pub async fn load_library(&self) -> Result<LibraryStatus> {
        self.library_status.send_replace(LibraryStatus::Loading);

        let index = Arc::clone(&self.index);
        let result = tokio::spawn(async move { index.query(&MediaQuery::default()).await })
            .await
            .map_err(|e| AuraError::metadata(format!("Library task failed: {}", e)))
            .and_then(|result| result);

        let tracks = match result {
            Ok(tracks) => tracks,
            Err(e) => {
                if e.is_access_denied() {
                    tracing::warn!("Music folders not readable: {}", e);
                } else {
                    tracing::error!("Media index query failed: {}", e);
                }
                self.set_raw_tracks(Vec::new());
                self.library_status
                    .send_replace(LibraryStatus::PermissionRequired);
                return Ok(LibraryStatus::PermissionRequired);
            }
        };

        let status = LibraryStatus::Ready {
            count: tracks.len(),
        };
        self.set_raw_tracks(tracks.clone());
        self.library_status.send_replace(status);
        tracing::info!(count = tracks.len(), "Library loaded");

        let inserted = logged("cache tracks", self.store.cache_tracks(&tracks).await)?;
        tracing::debug!(inserted, "Track cache updated");

        Ok(status)
    }

    /// The visible list and the index of `track`, for "play from here"
    pub fn queue_from(&self, track: TrackId) -> Option<(Vec<Track>, usize)> {
        let visible = self.visible.borrow().clone();
        let start = queue_start(&visible, track)?;
        Some((visible, start))
    }

    // ===== Playlist mutations =====

    pub async fn create_playlist(&self, name: &str) -> Result<Playlist> {
        let name = validate_name(name)?;
        logged("create playlist", self.store.create_playlist(name).await)
    }

    pub async fn rename_playlist(&self, id: PlaylistId, name: &str) -> Result<()> {
        let name = validate_name(name)?;
        logged("rename playlist", self.store.rename_playlist(id, name).await)
    }

    pub async fn delete_playlist(&self, id: PlaylistId) -> Result<()> {
        logged("delete playlist", self.store.delete_playlist(id).await)
    }

    pub async fn add_track_to_playlist(&self, playlist: PlaylistId, track: TrackId) -> Result<()> {
        logged(
            "add track to playlist",
            self.store.add_track_to_playlist(playlist, track).await,
        )
    }

    pub async fn add_tracks_to_playlist(
        &self,
        playlist: PlaylistId,
        tracks: &[TrackId],
    ) -> Result<()> {
        logged(
            "add tracks to playlist",
            self.store.add_tracks_to_playlist(playlist, tracks).await,
        )
    }

    pub async fn remove_track_from_playlist(
        &self,
        playlist: PlaylistId,
        track: TrackId,
    ) -> Result<()> {
        logged(
            "remove track from playlist",
            self.store.remove_track_from_playlist(playlist, track).await,
        )
    }

    // ===== Settings =====

    /// Flip and persist the theme flag, returning the new value
    ///
    /// The published flag only changes once the store accepted the write.
    pub async fn toggle_theme(&self) -> Result<bool> {
        let dark = !*self.dark_theme.borrow();
        logged(
            "persist theme",
            self.store.set_flag(SETTING_DARK_THEME, dark).await,
        )?;
        self.dark_theme.send_replace(dark);
        Ok(dark)
    }
}

fn validate_name(name: &str) -> Result<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(AuraError::invalid_input("playlist name must not be blank"));
    }
    Ok(trimmed)
}

fn logged<T>(operation: &str, result: Result<T>) -> Result<T> {
    if let Err(e) = &result {
        tracing::warn!(operation, "Store write failed: {}", e);
    }
    result
}
