//! Playback session service
//!
//! Owns one engine for the lifetime of a session. While the session is
//! active a background loop republishes the shared snapshot after every
//! engine event and on every poll tick, so position readers stay current.

use crate::error::{PlaybackError, Result};
use crate::snapshot::SnapshotHandle;
use aura_core::{EngineEvent, PlaybackEngine, PlaybackSnapshot, RepeatMode, Track};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default snapshot refresh interval
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Service configuration
#[derive(Debug, Clone)]
pub struct PlaybackConfig {
    /// How often the session refreshes position while active
    pub poll_interval: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }
}

/// Outcome of [`PlaybackService::on_task_removed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskRemoval {
    /// Nothing was queued or playback was not set to play
    Stopped,
    /// Playback continues in the background
    KeepRunning,
}

struct Session {
    engine: Mutex<Option<Box<dyn PlaybackEngine>>>,
    queue: Mutex<Vec<Track>>,
    snapshot: SnapshotHandle,
}

impl Session {
    fn engine(&self) -> MutexGuard<'_, Option<Box<dyn PlaybackEngine>>> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn queue(&self) -> MutexGuard<'_, Vec<Track>> {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `f` against the live engine, then publish
    fn with_engine<T>(
        &self,
        f: impl FnOnce(&mut (dyn PlaybackEngine + 'static)) -> T,
    ) -> Result<T> {
        let value = {
            let mut guard = self.engine();
            let engine = guard.as_deref_mut().ok_or(PlaybackError::NoSession)?;
            f(engine)
        };
        self.publish();
        Ok(value)
    }

    fn read<T>(&self, f: impl FnOnce(&dyn PlaybackEngine) -> T) -> Result<T> {
        let guard = self.engine();
        let engine = guard.as_deref().ok_or(PlaybackError::NoSession)?;
        Ok(f(engine))
    }

    /// Tick: advance the engine clock and republish unconditionally
    fn poll(&self) {
        if let Some(engine) = self.engine().as_deref_mut() {
            engine.poll();
        }
        if let Some(snapshot) = self.build() {
            self.snapshot.refresh(snapshot);
        }
    }

    fn publish(&self) {
        if let Some(snapshot) = self.build() {
            self.snapshot.publish(snapshot);
        }
    }

    /// Build a snapshot from the engine and the handed-over queue
    fn build(&self) -> Option<PlaybackSnapshot> {
        let guard = self.engine();
        let engine = guard.as_deref()?;
        let queue = self.queue();
        let current_track = engine.current_index().and_then(|i| queue.get(i)).cloned();
        let duration_ms = engine
            .duration()
            .map(millis)
            .or_else(|| current_track.as_ref().map(|t| t.duration_ms))
            .unwrap_or(0);

        Some(PlaybackSnapshot {
            current_track,
            is_playing: engine.is_playing(),
            position_ms: millis(engine.position()),
            duration_ms,
            shuffle_enabled: engine.shuffle_enabled(),
            repeat_mode: engine.repeat_mode(),
        })
    }

    /// Release the engine; returns false if it was already gone
    fn teardown(&self) -> bool {
        let Some(mut engine) = self.engine().take() else {
            return false;
        };
        engine.release();
        self.queue().clear();

        // Readers keep the last track but must not see it as playing
        let mut last = self.snapshot.get();
        last.is_playing = false;
        self.snapshot.publish(last);
        true
    }
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

/// Long-running playback session
///
/// Must be started from within a tokio runtime.
pub struct PlaybackService {
    session: Arc<Session>,
    shutdown: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl PlaybackService {
    /// Take ownership of `engine` and start the session loop
    pub fn start<E>(engine: E, snapshot: SnapshotHandle, config: PlaybackConfig) -> Self
    where
        E: PlaybackEngine + 'static,
    {
        let mut engine: Box<dyn PlaybackEngine> = Box::new(engine);
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        engine.attach(event_tx);

        let session = Arc::new(Session {
            engine: Mutex::new(Some(engine)),
            queue: Mutex::new(Vec::new()),
            snapshot,
        });
        session.publish();

        let (shutdown, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(run_session(
            Arc::clone(&session),
            event_rx,
            shutdown_rx,
            config.poll_interval,
        ));

        tracing::info!(poll_interval = ?config.poll_interval, "Playback session started");

        Self {
            session,
            shutdown,
            task: Mutex::new(Some(task)),
        }
    }

    /// Whether the session still owns an engine
    pub fn is_active(&self) -> bool {
        self.session.engine().is_some()
    }

    /// Handle to the snapshot this service publishes into
    pub fn snapshot(&self) -> &SnapshotHandle {
        &self.session.snapshot
    }

    /// The queue most recently handed to the session
    pub fn queue(&self) -> Vec<Track> {
        self.session.queue().clone()
    }

    /// Replace the queue, prepare and start playing at `start_index`
    pub fn play_queue(&self, tracks: Vec<Track>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }
        if start_index >= tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds {
                index: start_index,
                len: tracks.len(),
            });
        }

        tracing::debug!(len = tracks.len(), start_index, "Starting queue");

        self.session.with_engine(|engine| {
            engine.set_queue(tracks.clone(), start_index)?;
            *self.session.queue() = tracks;
            engine.prepare();
            engine.play();
            Ok::<_, PlaybackError>(())
        })?
    }

    pub fn play(&self) -> Result<()> {
        self.session.with_engine(|engine| engine.play())
    }

    pub fn pause(&self) -> Result<()> {
        self.session.with_engine(|engine| engine.pause())
    }

    /// Pause when playing, play otherwise
    pub fn toggle_play_pause(&self) -> Result<()> {
        self.session.with_engine(|engine| {
            if engine.is_playing() {
                engine.pause();
            } else {
                engine.play();
            }
        })
    }

    pub fn seek_to(&self, position: Duration) -> Result<()> {
        self.session.with_engine(|engine| engine.seek_to(position))
    }

    pub fn skip_next(&self) -> Result<()> {
        self.session.with_engine(|engine| engine.skip_next())
    }

    pub fn skip_previous(&self) -> Result<()> {
        self.session.with_engine(|engine| engine.skip_previous())
    }

    pub fn set_shuffle(&self, enabled: bool) -> Result<()> {
        self.session.with_engine(|engine| engine.set_shuffle(enabled))
    }

    /// Flip shuffle, returning the new state
    pub fn toggle_shuffle(&self) -> Result<bool> {
        self.session.with_engine(|engine| {
            let enabled = !engine.shuffle_enabled();
            engine.set_shuffle(enabled);
            enabled
        })
    }

    pub fn set_repeat(&self, mode: RepeatMode) -> Result<()> {
        self.session.with_engine(|engine| engine.set_repeat(mode))
    }

    /// Advance Off → All → One → Off, returning the new mode
    pub fn cycle_repeat(&self) -> Result<RepeatMode> {
        self.session.with_engine(|engine| {
            let mode = engine.repeat_mode().next();
            engine.set_repeat(mode);
            mode
        })
    }

    /// Current playing flag as reported by the engine
    pub fn is_playing(&self) -> Result<bool> {
        self.session.read(|engine| engine.is_playing())
    }

    /// The host removed the task that owned this session
    ///
    /// Stops the session unless something is queued and set to play.
    pub fn on_task_removed(&self) -> Result<TaskRemoval> {
        let keep = self
            .session
            .read(|engine| engine.play_when_ready() && engine.item_count() > 0)?;

        if keep {
            tracing::debug!("Task removed, playback continues");
            Ok(TaskRemoval::KeepRunning)
        } else {
            tracing::info!("Task removed with nothing playing, stopping session");
            self.shutdown();
            Ok(TaskRemoval::Stopped)
        }
    }

    /// Stop the session loop and release the engine
    ///
    /// Idempotent.
    pub fn shutdown(&self) {
        let _ = self.shutdown.send(true);
        if self.session.teardown() {
            tracing::info!("Playback session stopped");
        }
    }

    /// Wait for the session loop to exit after [`shutdown`](Self::shutdown)
    pub async fn join(&self) {
        let task = self
            .task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!("Playback session task failed: {}", e);
            }
        }
    }
}

impl Drop for PlaybackService {
    fn drop(&mut self) {
        self.shutdown();
        if let Some(task) = self
            .task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            task.abort();
        }
    }
}

async fn run_session(
    session: Arc<Session>,
    mut events: mpsc::UnboundedReceiver<EngineEvent>,
    mut shutdown: watch::Receiver<bool>,
    poll_interval: Duration,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            Some(event) = events.recv() => {
                tracing::trace!(?event, "Engine event");
                session.publish();
            }
            _ = ticker.tick() => {
                session.poll();
            }
        }
    }

    tracing::debug!("Playback session loop exited");
}
