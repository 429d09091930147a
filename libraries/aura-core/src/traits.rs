/// Core traits for Aura Player
use crate::error::Result;
use crate::types::{MediaQuery, RepeatMode, Track};
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Media index trait
///
/// Implementers expose the catalog of audio files visible on the device.
/// Queries are potentially slow and must not be issued from the
/// interactive thread.
#[async_trait]
pub trait MediaIndex: Send + Sync {
    /// Return every track matching `query`, in the query's order
    ///
    /// # Errors
    /// Returns `AuraError::PermissionDenied` if the index cannot be read
    async fn query(&self, query: &MediaQuery) -> Result<Vec<Track>>;
}

/// Events reported by a playback engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineEvent {
    /// The current item changed (skip, auto-advance, new queue)
    MediaItemTransition {
        /// Index of the new item in the queue as it was handed over
        index: Option<usize>,
    },
    /// Playing flag flipped
    IsPlayingChanged(bool),
    /// Shuffle was toggled
    ShuffleModeChanged(bool),
    /// Repeat mode changed
    RepeatModeChanged(RepeatMode),
    /// Position jumped (seek or item restart)
    PositionDiscontinuity,
    /// Engine became ready after `prepare`
    Ready,
    /// Playback reached the end of the queue
    Ended,
}

/// Channel through which an engine reports events
pub type EngineEventSender = UnboundedSender<EngineEvent>;

/// Playback engine control surface
///
/// The engine owns sequencing: given an ordered queue and a start index it
/// decides what plays next under the active shuffle and repeat modes.
/// Indices exchanged through this trait always refer to the queue as it
/// was passed to [`PlaybackEngine::set_queue`].
pub trait PlaybackEngine: Send {
    /// Register the sink for engine events, replacing any previous one
    fn attach(&mut self, events: EngineEventSender);

    /// Replace the queue and position the engine on `start_index`
    ///
    /// # Errors
    /// Returns an error if `start_index` is out of range for a non-empty queue
    fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> Result<()>;

    /// Prepare the current item for playback
    fn prepare(&mut self);

    /// Start or resume playback
    fn play(&mut self);

    /// Pause playback
    fn pause(&mut self);

    /// Seek within the current item
    fn seek_to(&mut self, position: Duration);

    /// Move to the next item, if any
    fn skip_next(&mut self);

    /// Move to the previous item or restart the current one
    fn skip_previous(&mut self);

    /// Enable or disable shuffle
    fn set_shuffle(&mut self, enabled: bool);

    /// Set the repeat mode
    fn set_repeat(&mut self, mode: RepeatMode);

    /// Drive time-based progression
    ///
    /// Engines that advance on their own leave this a no-op.
    fn poll(&mut self) {}

    /// Whether audio is currently playing
    fn is_playing(&self) -> bool;

    /// Whether playback will proceed once the engine is ready
    fn play_when_ready(&self) -> bool;

    /// Position within the current item
    fn position(&self) -> Duration;

    /// Duration of the current item, if known
    fn duration(&self) -> Option<Duration>;

    /// Index of the current item in the queue as handed over
    fn current_index(&self) -> Option<usize>;

    /// Number of queued items
    fn item_count(&self) -> usize;

    /// Whether shuffle is enabled
    fn shuffle_enabled(&self) -> bool;

    /// Active repeat mode
    fn repeat_mode(&self) -> RepeatMode;

    /// Release engine resources; the engine is unusable afterwards
    fn release(&mut self);
}
