/// Player transport controls read from stdin during `aura play`
use aura_core::RepeatMode;
use aura_playback::{PlaybackError, PlaybackService};
use std::time::Duration;

/// Help line printed when playback starts
pub const HELP: &str =
    "Enter: play/pause  n: next  p: previous  s: shuffle  r: repeat  seek <secs>  q: quit";

/// One transport intent of the player screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TogglePlayPause,
    SkipNext,
    SkipPrevious,
    ToggleShuffle,
    CycleRepeat,
    SeekTo(Duration),
    Quit,
}

impl Control {
    /// Parse one input line; `None` for anything unrecognised
    pub fn parse(line: &str) -> Option<Self> {
        let mut words = line.split_whitespace();
        let Some(command) = words.next() else {
            // A bare Enter toggles playback
            return Some(Self::TogglePlayPause);
        };

        let control = match command.to_lowercase().as_str() {
            "space" | "t" | "toggle" => Self::TogglePlayPause,
            "n" | "next" => Self::SkipNext,
            "p" | "prev" | "previous" => Self::SkipPrevious,
            "s" | "shuffle" => Self::ToggleShuffle,
            "r" | "repeat" => Self::CycleRepeat,
            "q" | "quit" => Self::Quit,
            "seek" => {
                let secs: f64 = words.next()?.parse().ok()?;
                if !secs.is_finite() || secs < 0.0 {
                    return None;
                }
                Self::SeekTo(Duration::from_secs_f64(secs))
            }
            _ => return None,
        };

        words.next().is_none().then_some(control)
    }
}

/// Apply `control` to the session
///
/// Returns a short confirmation for controls whose effect is not visible
/// in the status line. `Quit` is left to the caller.
pub fn apply(service: &PlaybackService, control: Control) -> Result<Option<String>, PlaybackError> {
    match control {
        Control::TogglePlayPause => service.toggle_play_pause()?,
        Control::SkipNext => service.skip_next()?,
        Control::SkipPrevious => service.skip_previous()?,
        Control::SeekTo(position) => service.seek_to(position)?,
        Control::ToggleShuffle => {
            let enabled = service.toggle_shuffle()?;
            return Ok(Some(format!("Shuffle {}", if enabled { "on" } else { "off" })));
        }
        Control::CycleRepeat => {
            let mode = service.cycle_repeat()?;
            return Ok(Some(match mode {
                RepeatMode::Off => "Repeat off".to_string(),
                mode => format!("Repeat {}", mode),
            }));
        }
        Control::Quit => {}
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aura_core::{Track, TrackId};
    use aura_playback::{PlaybackConfig, QueueEngine, SnapshotHandle};
    use std::path::PathBuf;

    fn queue() -> Vec<Track> {
        (1..=3)
            .map(|i| {
                Track::new(TrackId::new(i), format!("Song {}", i), PathBuf::from("/m.mp3"))
                    .with_duration_ms(120_000)
            })
            .collect()
    }

    fn current_id(service: &PlaybackService) -> Option<i64> {
        service.snapshot().get().current_track.map(|t| t.id.get())
    }

    fn send(service: &PlaybackService, line: &str) -> Option<String> {
        let control = Control::parse(line).expect("known control");
        apply(service, control).unwrap()
    }

    #[test]
    fn parses_controls() {
        assert_eq!(Control::parse(""), Some(Control::TogglePlayPause));
        assert_eq!(Control::parse("  "), Some(Control::TogglePlayPause));
        assert_eq!(Control::parse("N"), Some(Control::SkipNext));
        assert_eq!(Control::parse("prev"), Some(Control::SkipPrevious));
        assert_eq!(Control::parse("s"), Some(Control::ToggleShuffle));
        assert_eq!(Control::parse("r"), Some(Control::CycleRepeat));
        assert_eq!(Control::parse("q"), Some(Control::Quit));
        assert_eq!(
            Control::parse("seek 42.5"),
            Some(Control::SeekTo(Duration::from_millis(42_500)))
        );
    }

    #[test]
    fn rejects_unknown_input() {
        assert_eq!(Control::parse("dance"), None);
        assert_eq!(Control::parse("seek"), None);
        assert_eq!(Control::parse("seek -3"), None);
        assert_eq!(Control::parse("seek abc"), None);
        assert_eq!(Control::parse("n n"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatches_to_session() {
        let service =
            PlaybackService::start(QueueEngine::new(), SnapshotHandle::new(), PlaybackConfig::default());
        service.play_queue(queue(), 0).unwrap();

        assert_eq!(send(&service, "n"), None);
        assert_eq!(current_id(&service), Some(2));

        assert_eq!(send(&service, "p"), None);
        assert_eq!(current_id(&service), Some(1));

        send(&service, "");
        assert!(!service.snapshot().get().is_playing);
        send(&service, "");
        assert!(service.snapshot().get().is_playing);

        send(&service, "seek 30");
        assert_eq!(service.snapshot().get().position_ms, 30_000);

        assert_eq!(send(&service, "s").as_deref(), Some("Shuffle on"));
        assert!(service.snapshot().get().shuffle_enabled);
        assert_eq!(send(&service, "s").as_deref(), Some("Shuffle off"));

        assert_eq!(send(&service, "r").as_deref(), Some("Repeat all"));
        assert_eq!(send(&service, "r").as_deref(), Some("Repeat one"));
        assert_eq!(send(&service, "r").as_deref(), Some("Repeat off"));
        assert_eq!(service.snapshot().get().repeat_mode, RepeatMode::Off);
    }

    #[tokio::test(start_paused = true)]
    async fn controls_fail_after_shutdown() {
        let service =
            PlaybackService::start(QueueEngine::new(), SnapshotHandle::new(), PlaybackConfig::default());
        service.shutdown();

        assert!(matches!(
            apply(&service, Control::SkipNext),
            Err(PlaybackError::NoSession)
        ));
    }
}
