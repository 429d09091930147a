//! Reference queue engine
//!
//! `QueueEngine` keeps a virtual play head driven by the tokio clock. It
//! produces no audio; it sequences the queue, tracks position and reports
//! the same events a platform player would.

use crate::queue::PlayOrder;
use aura_core::{
    AuraError, EngineEvent, EngineEventSender, PlaybackEngine, RepeatMode, Track,
};
use std::time::Duration;
use tokio::time::Instant;

/// Skipping back within this window moves to the previous item;
/// past it the current item restarts.
pub const MAX_SEEK_TO_PREVIOUS: Duration = Duration::from_secs(3);

/// Clock-driven engine over an in-memory queue
#[derive(Debug, Default)]
pub struct QueueEngine {
    tracks: Vec<Track>,
    order: PlayOrder,
    events: Option<EngineEventSender>,

    prepared: bool,
    play_when_ready: bool,
    ended: bool,
    released: bool,

    /// Position at `started_at` (or the frozen position while paused)
    position_base: Duration,
    started_at: Option<Instant>,

    shuffle: bool,
    repeat: RepeatMode,
}

impl QueueEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track at the current position
    pub fn current_track(&self) -> Option<&Track> {
        self.order.current().and_then(|i| self.tracks.get(i))
    }

    pub fn is_released(&self) -> bool {
        self.released
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            // Receiver gone means nobody is listening anymore
            let _ = events.send(event);
        }
    }

    fn current_duration(&self) -> Duration {
        self.current_track()
            .map(Track::duration)
            .unwrap_or_default()
    }

    fn should_run(&self) -> bool {
        self.prepared && self.play_when_ready && !self.ended && self.order.current().is_some()
    }

    fn raw_position(&self) -> Duration {
        match self.started_at {
            Some(started) => self.position_base + started.elapsed(),
            None => self.position_base,
        }
    }

    /// Apply a state change and report a playing-flag flip
    ///
    /// The clock is frozen before `change` runs, so `change` may overwrite
    /// `position_base`.
    fn update_playing<F: FnOnce(&mut Self)>(&mut self, change: F) {
        let was_playing = self.is_playing();
        self.position_base = self.raw_position();
        change(self);
        self.started_at = self.should_run().then(Instant::now);

        let playing = self.is_playing();
        if playing != was_playing {
            self.emit(EngineEvent::IsPlayingChanged(playing));
        }
    }

    fn set_position(&mut self, position: Duration) {
        self.position_base = position;
        self.started_at = self.should_run().then(Instant::now);
    }

    fn move_to_current_item(&mut self, carry: Duration) {
        self.ended = false;
        self.set_position(carry);
        self.emit(EngineEvent::MediaItemTransition {
            index: self.order.current(),
        });
    }

    fn on_item_end(&mut self, overflow: Duration) {
        match self.repeat {
            RepeatMode::One => {
                self.set_position(overflow);
                self.emit(EngineEvent::MediaItemTransition {
                    index: self.order.current(),
                });
            }
            RepeatMode::All | RepeatMode::Off => {
                let wrap = self.repeat == RepeatMode::All;
                if self.order.advance(wrap).is_some() {
                    self.move_to_current_item(overflow);
                } else {
                    self.position_base = self.current_duration();
                    self.started_at = None;
                    self.ended = true;
                    self.emit(EngineEvent::IsPlayingChanged(false));
                    self.emit(EngineEvent::Ended);
                }
            }
        }
    }
}

impl PlaybackEngine for QueueEngine {
    fn attach(&mut self, events: EngineEventSender) {
        self.events = Some(events);
    }

    fn set_queue(&mut self, tracks: Vec<Track>, start_index: usize) -> aura_core::Result<()> {
        if self.released {
            return Err(AuraError::playback("engine released"));
        }
        if !tracks.is_empty() && start_index >= tracks.len() {
            return Err(AuraError::invalid_input(format!(
                "start index {} out of range for {} tracks",
                start_index,
                tracks.len()
            )));
        }

        let len = tracks.len();
        self.update_playing(|engine| {
            engine.tracks = tracks;
            engine.order = PlayOrder::new(len, start_index, engine.shuffle);
            engine.prepared = false;
            engine.ended = false;
        });
        self.set_position(Duration::ZERO);
        self.emit(EngineEvent::MediaItemTransition {
            index: self.order.current(),
        });
        Ok(())
    }

    fn prepare(&mut self) {
        if self.released || self.order.is_empty() {
            return;
        }
        self.update_playing(|engine| engine.prepared = true);
        self.emit(EngineEvent::Ready);
    }

    fn play(&mut self) {
        if self.released {
            return;
        }
        self.update_playing(|engine| {
            if engine.ended {
                // Playing again after the end restarts the last item
                engine.ended = false;
                engine.position_base = Duration::ZERO;
            }
            engine.play_when_ready = true;
        });
    }

    fn pause(&mut self) {
        if self.released {
            return;
        }
        self.update_playing(|engine| engine.play_when_ready = false);
    }

    fn seek_to(&mut self, position: Duration) {
        if self.released || self.order.current().is_none() {
            return;
        }
        let target = position.min(self.current_duration());
        self.update_playing(|engine| engine.ended = false);
        self.set_position(target);
        self.emit(EngineEvent::PositionDiscontinuity);
    }

    fn skip_next(&mut self) {
        if self.released {
            return;
        }
        // Repeat One navigates like Off
        let wrap = self.repeat == RepeatMode::All;
        if self.order.advance(wrap).is_some() {
            self.update_playing(|engine| engine.ended = false);
            self.move_to_current_item(Duration::ZERO);
        }
    }

    fn skip_previous(&mut self) {
        if self.released || self.order.current().is_none() {
            return;
        }
        let wrap = self.repeat == RepeatMode::All;
        if self.position() <= MAX_SEEK_TO_PREVIOUS && self.order.has_previous(wrap) {
            self.order.go_back(wrap);
            self.update_playing(|engine| engine.ended = false);
            self.move_to_current_item(Duration::ZERO);
        } else {
            self.seek_to(Duration::ZERO);
        }
    }

    fn set_shuffle(&mut self, enabled: bool) {
        if self.released || self.shuffle == enabled {
            return;
        }
        self.shuffle = enabled;
        self.order.set_shuffled(enabled);
        self.emit(EngineEvent::ShuffleModeChanged(enabled));
    }

    fn set_repeat(&mut self, mode: RepeatMode) {
        if self.released || self.repeat == mode {
            return;
        }
        self.repeat = mode;
        self.emit(EngineEvent::RepeatModeChanged(mode));
    }

    fn poll(&mut self) {
        // Bounded so a long stall cannot spin forever on short items
        for _ in 0..=self.order.len() {
            if !self.is_playing() {
                return;
            }
            let duration = self.current_duration();
            if duration.is_zero() {
                return;
            }
            let position = self.raw_position();
            if position < duration {
                return;
            }
            self.on_item_end((position - duration).min(duration));
        }
    }

    fn is_playing(&self) -> bool {
        !self.released && self.should_run()
    }

    fn play_when_ready(&self) -> bool {
        self.play_when_ready
    }

    fn position(&self) -> Duration {
        let position = self.raw_position();
        match self.current_duration() {
            d if d.is_zero() => position,
            d => position.min(d),
        }
    }

    fn duration(&self) -> Option<Duration> {
        self.current_track().map(Track::duration)
    }

    fn current_index(&self) -> Option<usize> {
        self.order.current()
    }

    fn item_count(&self) -> usize {
        self.tracks.len()
    }

    fn shuffle_enabled(&self) -> bool {
        self.shuffle
    }

    fn repeat_mode(&self) -> RepeatMode {
        self.repeat
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.update_playing(|engine| engine.play_when_ready = false);
        self.released = true;
        self.tracks.clear();
        self.order = PlayOrder::default();
        self.events = None;
        tracing::debug!("Queue engine released");
    }
}
