//! Aura Player Playback
//!
//! Playback session service for Aura Player.
//!
//! This crate provides:
//! - [`PlaybackService`]: owns one [`PlaybackEngine`](aura_core::PlaybackEngine)
//!   for the life of a session and republishes a [`PlaybackSnapshot`] after
//!   every engine event and once per poll interval
//! - [`SnapshotHandle`]: the injectable holder readers subscribe to
//! - [`QueueEngine`]: a clock-driven reference engine with shuffle and
//!   repeat sequencing
//!
//! # Example
//!
//! ```rust,no_run
//! use aura_playback::{PlaybackConfig, PlaybackService, QueueEngine, SnapshotHandle};
//! # async fn example(tracks: Vec<aura_core::Track>) -> Result<(), aura_playback::PlaybackError> {
//! let snapshot = SnapshotHandle::new();
//! let service = PlaybackService::start(QueueEngine::new(), snapshot.clone(), PlaybackConfig::default());
//!
//! service.play_queue(tracks, 0)?;
//! service.cycle_repeat()?;
//!
//! let mut updates = snapshot.subscribe();
//! updates.changed().await.ok();
//! println!("{:?}", updates.borrow().current_track);
//! # Ok(())
//! # }
//! ```
//!
//! [`PlaybackSnapshot`]: aura_core::PlaybackSnapshot

mod engine;
mod error;
mod queue;
mod service;
mod shuffle;
mod snapshot;

pub use engine::{QueueEngine, MAX_SEEK_TO_PREVIOUS};
pub use error::{PlaybackError, Result};
pub use queue::PlayOrder;
pub use service::{PlaybackConfig, PlaybackService, TaskRemoval, DEFAULT_POLL_INTERVAL};
pub use shuffle::{shuffled_order, shuffled_order_with};
pub use snapshot::SnapshotHandle;
