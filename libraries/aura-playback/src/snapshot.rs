//! Shared playback snapshot
//!
//! The host creates one [`SnapshotHandle`] and hands clones to the playback
//! service (the only writer) and to every reader.

use aura_core::PlaybackSnapshot;
use std::sync::Arc;
use tokio::sync::watch;

/// Cloneable holder of the latest [`PlaybackSnapshot`]
#[derive(Debug, Clone)]
pub struct SnapshotHandle {
    tx: Arc<watch::Sender<PlaybackSnapshot>>,
}

impl SnapshotHandle {
    /// Create a handle holding the default snapshot
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(PlaybackSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    /// Latest snapshot
    pub fn get(&self) -> PlaybackSnapshot {
        self.tx.borrow().clone()
    }

    /// Receiver notified on every change and on every [`refresh`](Self::refresh)
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.tx.subscribe()
    }

    /// Replace the snapshot
    ///
    /// Readers are only woken if the value actually changed.
    pub fn publish(&self, snapshot: PlaybackSnapshot) {
        self.tx.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    /// Replace the snapshot and wake readers even when it is unchanged
    ///
    /// Used for the periodic tick, so readers observe every refresh.
    pub fn refresh(&self, snapshot: PlaybackSnapshot) {
        self.tx.send_replace(snapshot);
    }
}

impl Default for SnapshotHandle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let handle = SnapshotHandle::new();
        let reader = handle.clone();

        handle.publish(PlaybackSnapshot {
            is_playing: true,
            position_ms: 1_000,
            ..PlaybackSnapshot::default()
        });

        assert!(reader.get().is_playing);
        assert_eq!(reader.get().position_ms, 1_000);
    }

    #[tokio::test]
    async fn identical_publish_does_not_wake_readers() {
        let handle = SnapshotHandle::new();
        let mut rx = handle.subscribe();

        handle.publish(PlaybackSnapshot::default());
        assert!(!rx.has_changed().unwrap());

        handle.publish(PlaybackSnapshot {
            shuffle_enabled: true,
            ..PlaybackSnapshot::default()
        });
        assert!(rx.has_changed().unwrap());
    }

    #[tokio::test]
    async fn refresh_wakes_readers_without_change() {
        let handle = SnapshotHandle::new();
        let mut rx = handle.subscribe();

        handle.refresh(PlaybackSnapshot::default());
        assert!(rx.has_changed().unwrap());
        rx.mark_unchanged();

        handle.refresh(PlaybackSnapshot::default());
        assert!(rx.has_changed().unwrap());
    }
}
