//! Live queries
//!
//! A live query runs once on creation and again after every committed write
//! to one of the tables it depends on. Results are delivered through a
//! `tokio::sync::watch` channel, so readers always see the latest value and
//! never block a writer.

use aura_core::{
    error::Result, Playlist, PlaylistId, PlaylistStore, PlaylistWithTracks, TableChange,
};
use std::future::Future;
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

/// Long-lived subscription to a store query
///
/// The refresh task stops when the `LiveQuery` is dropped.
pub struct LiveQuery<T> {
    rx: watch::Receiver<T>,
    task: JoinHandle<()>,
}

impl<T> LiveQuery<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Start a live query
    ///
    /// `initial` is visible until the first query completes. A failing
    /// query keeps the previous value and is logged.
    pub fn spawn<S, F, Fut>(
        store: Arc<S>,
        tables: &'static [TableChange],
        initial: T,
        query: F,
    ) -> Self
    where
        S: PlaylistStore + ?Sized + 'static,
        F: Fn(Arc<S>) -> Fut + Send + 'static,
        Fut: Future<Output = Result<T>> + Send,
    {
        let (tx, rx) = watch::channel(initial);
        // Subscribe before the first query so no write slips between them
        let mut changes = store.changes();

        let task = tokio::spawn(async move {
            loop {
                match query(Arc::clone(&store)).await {
                    Ok(value) => {
                        if tx.send(value).is_err() {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!("Live query failed: {}", e),
                }

                // Wait for a relevant change
                loop {
                    match changes.recv().await {
                        Ok(change) if tables.contains(&change) => break,
                        Ok(_) => continue,
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            tracing::debug!(skipped, "Live query lagged, refreshing");
                            break;
                        }
                        Err(broadcast::error::RecvError::Closed) => return,
                    }
                }
            }
        });

        Self { rx, task }
    }

    /// Latest value
    pub fn latest(&self) -> T {
        self.rx.borrow().clone()
    }

    /// Wait until a new value is published
    ///
    /// Returns `false` once the query has stopped.
    pub async fn changed(&mut self) -> bool {
        self.rx.changed().await.is_ok()
    }

    /// Wait until the latest value satisfies `predicate`
    ///
    /// Returns `None` once the query has stopped.
    pub async fn wait_for(&mut self, predicate: impl FnMut(&T) -> bool) -> Option<T> {
        self.rx.wait_for(predicate).await.ok().map(|value| value.clone())
    }

    /// A receiver that shares this query's values
    pub fn receiver(&self) -> watch::Receiver<T> {
        self.rx.clone()
    }
}

impl<T> Drop for LiveQuery<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// All playlists ordered by name, re-emitted on every playlist change
pub fn watch_playlists<S>(store: Arc<S>) -> LiveQuery<Vec<Playlist>>
where
    S: PlaylistStore + ?Sized + 'static,
{
    LiveQuery::spawn(
        store,
        &[TableChange::Playlists],
        Vec::new(),
        |store: Arc<S>| async move { store.get_playlists().await },
    )
}

/// One playlist with its ordered tracks
///
/// Emits `None` while the playlist does not exist (or after it is deleted).
pub fn watch_playlist<S>(store: Arc<S>, id: PlaylistId) -> LiveQuery<Option<PlaylistWithTracks>>
where
    S: PlaylistStore + ?Sized + 'static,
{
    LiveQuery::spawn(
        store,
        &[
            TableChange::Playlists,
            TableChange::Associations,
            TableChange::Tracks,
        ],
        None,
        move |store: Arc<S>| async move { store.get_playlist_with_tracks(id).await },
    )
}
