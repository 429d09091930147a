/// Command handlers
use crate::config::AppConfig;
use crate::controls::{self, Control};
use anyhow::{bail, Context as _};
use aura_core::{
    format_time, LibraryStatus, PlaybackSnapshot, Playlist, PlaylistId, PlaylistWithTracks,
    RepeatMode, SortOrder, Track, TrackId,
};
use aura_metadata::FsMediaIndex;
use aura_playback::{PlaybackConfig, PlaybackService, QueueEngine, SnapshotHandle, TaskRemoval};
use aura_state::AppState;
use aura_storage::LocalStorageContext;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncBufReadExt;

/// Upper bound for the first result of a store live query
const LIVE_QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opened store, index and coordinator
pub struct Context {
    pub config: AppConfig,
    pub store: Arc<LocalStorageContext>,
    pub state: AppState,
}

impl Context {
    pub async fn open(config: AppConfig) -> anyhow::Result<Self> {
        ensure_database_dir(&config.storage.database_url)?;

        let pool = aura_storage::create_pool(&config.storage.database_url)
            .await
            .with_context(|| format!("Failed to open database {}", config.storage.database_url))?;
        aura_storage::run_migrations(&pool).await?;
        let store = Arc::new(LocalStorageContext::new(pool));

        let index = FsMediaIndex::new(config.library.roots.clone())
            .with_catalog(&config.storage.catalog_path)?;

        let state = AppState::new(Arc::new(index), store.clone()).await?;

        Ok(Self {
            config,
            store,
            state,
        })
    }

    async fn load_library(&self) -> anyhow::Result<usize> {
        match self.state.load_library().await? {
            LibraryStatus::Ready { count } => Ok(count),
            LibraryStatus::PermissionRequired => bail!(
                "Music folders are not readable: {}",
                display_roots(&self.config)
            ),
            LibraryStatus::Loading => Ok(0),
        }
    }
}

fn ensure_database_dir(database_url: &str) -> anyhow::Result<()> {
    let Some(path) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() || path == ":memory:" {
        return Ok(());
    }
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create database directory {}", parent.display())
            })?;
        }
    }
    Ok(())
}

fn display_roots(config: &AppConfig) -> String {
    config
        .library
        .roots
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One line per track: id, title, artist and duration
pub fn format_track(track: &Track) -> String {
    format!(
        "{:>6}  {} - {}  [{}]",
        track.id.get(),
        track.title,
        track.artist,
        format_time(track.duration_ms)
    )
}

/// Status line for a playback snapshot
pub fn format_snapshot(snapshot: &PlaybackSnapshot) -> String {
    let Some(track) = &snapshot.current_track else {
        return "(nothing playing)".to_string();
    };

    let mut line = format!(
        "{} {} - {}  {} / {}",
        if snapshot.is_playing { ">" } else { "||" },
        track.title,
        track.artist,
        format_time(snapshot.position_ms),
        format_time(snapshot.duration_ms),
    );
    if snapshot.shuffle_enabled {
        line.push_str("  [shuffle]");
    }
    if snapshot.repeat_mode != RepeatMode::Off {
        line.push_str(&format!("  [repeat {}]", snapshot.repeat_mode));
    }
    line
}

// ===== Library =====

pub async fn scan(ctx: &Context) -> anyhow::Result<()> {
    let count = ctx.load_library().await?;
    println!("{} tracks in {}", count, display_roots(&ctx.config));
    Ok(())
}

pub async fn tracks(ctx: &Context, search: Option<String>, sort: SortOrder) -> anyhow::Result<()> {
    ctx.load_library().await?;
    ctx.state.set_sort_order(sort);
    if let Some(search) = search {
        ctx.state.set_search_query(search);
    }

    let visible = ctx.state.tracks();
    for track in visible.borrow().iter() {
        println!("{}", format_track(track));
    }
    Ok(())
}

// ===== Playlists =====

/// All playlists by name, as published by the coordinator
pub async fn list_playlists(ctx: &Context) -> anyhow::Result<Vec<Playlist>> {
    let mut playlists = ctx.state.playlists();
    tokio::time::timeout(LIVE_QUERY_TIMEOUT, playlists.changed())
        .await
        .context("Timed out reading playlists")?
        .context("Playlist query stopped")?;
    let current = playlists.borrow_and_update().clone();
    Ok(current)
}

/// One playlist with its tracks, as published by the coordinator
pub async fn load_playlist(ctx: &Context, id: PlaylistId) -> anyhow::Result<PlaylistWithTracks> {
    let mut live = ctx.state.playlist(id);
    let loaded = tokio::time::timeout(LIVE_QUERY_TIMEOUT, live.changed())
        .await
        .with_context(|| format!("Timed out reading playlist {}", id))?;
    if !loaded {
        bail!("Playlist query stopped");
    }
    live.latest()
        .with_context(|| format!("Playlist {} not found", id))
}

pub async fn playlists(ctx: &Context) -> anyhow::Result<()> {
    for playlist in list_playlists(ctx).await? {
        println!("{:>6}  {}", playlist.id.get(), playlist.name);
    }
    Ok(())
}

pub async fn create_playlist(ctx: &Context, name: &str) -> anyhow::Result<()> {
    let playlist = ctx.state.create_playlist(name).await?;
    println!("Created playlist {} ({})", playlist.name, playlist.id);
    Ok(())
}

pub async fn rename_playlist(ctx: &Context, id: PlaylistId, name: &str) -> anyhow::Result<()> {
    ctx.state.rename_playlist(id, name).await?;
    println!("Renamed playlist {}", id);
    Ok(())
}

pub async fn delete_playlist(ctx: &Context, id: PlaylistId) -> anyhow::Result<()> {
    ctx.state.delete_playlist(id).await?;
    println!("Deleted playlist {}", id);
    Ok(())
}

pub async fn show_playlist(ctx: &Context, id: PlaylistId) -> anyhow::Result<()> {
    let playlist = load_playlist(ctx, id).await?;

    println!("{} ({} tracks)", playlist.playlist.name, playlist.tracks.len());
    for track in &playlist.tracks {
        println!("{}", format_track(track));
    }
    Ok(())
}

pub async fn add_to_playlist(
    ctx: &Context,
    id: PlaylistId,
    tracks: &[TrackId],
) -> anyhow::Result<()> {
    // Associations reference the track cache, so refresh it first
    ctx.load_library().await?;
    ctx.state.add_tracks_to_playlist(id, tracks).await?;
    println!("Added {} track(s) to playlist {}", tracks.len(), id);
    Ok(())
}

pub async fn remove_from_playlist(
    ctx: &Context,
    id: PlaylistId,
    track: TrackId,
) -> anyhow::Result<()> {
    ctx.state.remove_track_from_playlist(id, track).await?;
    println!("Removed track {} from playlist {}", track, id);
    Ok(())
}

// ===== Theme =====

pub fn show_theme(ctx: &Context) {
    let dark = *ctx.state.dark_theme().borrow();
    println!("{}", if dark { "dark" } else { "light" });
}

pub async fn toggle_theme(ctx: &Context) -> anyhow::Result<()> {
    let dark = ctx.state.toggle_theme().await?;
    println!("Theme: {}", if dark { "dark" } else { "light" });
    Ok(())
}

// ===== Playback =====

/// Options of the `play` command
#[derive(Debug, Clone, Default)]
pub struct PlayOptions {
    pub playlist: Option<PlaylistId>,
    pub start: Option<TrackId>,
    pub shuffle: bool,
    pub repeat: RepeatMode,
    /// Stop after this long; `None` runs until the queue ends or Ctrl-C
    pub duration: Option<Duration>,
    /// Read transport controls from stdin
    pub interactive: bool,
}

pub async fn play(ctx: &Context, options: PlayOptions) -> anyhow::Result<()> {
    let (queue, start_index) = build_queue(ctx, &options).await?;

    let snapshot = SnapshotHandle::new();
    let service = PlaybackService::start(
        QueueEngine::new(),
        snapshot.clone(),
        PlaybackConfig {
            poll_interval: ctx.config.poll_interval(),
        },
    );

    service.set_repeat(options.repeat)?;
    service.play_queue(queue, start_index)?;
    if options.shuffle {
        service.set_shuffle(true)?;
    }

    let mut updates = snapshot.subscribe();
    println!("{}", format_snapshot(&updates.borrow_and_update()));

    let mut input = tokio::io::BufReader::new(tokio::io::stdin()).lines();
    let mut reading = options.interactive;
    if reading {
        println!("{}", controls::HELP);
    }

    let deadline = options
        .duration
        .map(|d| tokio::time::Instant::now() + d);

    loop {
        let stop = async {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let current = updates.borrow_and_update().clone();
                println!("{}", format_snapshot(&current));
                if has_ended(&current) {
                    break;
                }
            }
            line = input.next_line(), if reading => {
                match line {
                    Ok(Some(line)) => match Control::parse(&line) {
                        Some(Control::Quit) => break,
                        Some(control) => {
                            if let Some(message) = controls::apply(&service, control)? {
                                println!("{}", message);
                            }
                        }
                        None => println!("{}", controls::HELP),
                    },
                    Ok(None) => reading = false,
                    Err(e) => {
                        tracing::warn!("Stopped reading controls: {}", e);
                        reading = false;
                    }
                }
            }
            _ = stop => break,
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    service.pause()?;
    if service.on_task_removed()? == TaskRemoval::Stopped {
        tracing::debug!("Session stopped");
    }
    service.join().await;
    Ok(())
}

/// Stopped at the end of the last item
fn has_ended(snapshot: &PlaybackSnapshot) -> bool {
    !snapshot.is_playing && snapshot.duration_ms > 0 && snapshot.position_ms >= snapshot.duration_ms
}

async fn build_queue(ctx: &Context, options: &PlayOptions) -> anyhow::Result<(Vec<Track>, usize)> {
    if let Some(id) = options.playlist {
        let playlist = load_playlist(ctx, id).await?;
        if playlist.tracks.is_empty() {
            bail!("Playlist {} is empty", playlist.playlist.name);
        }
        let start = match options.start {
            Some(track) => playlist
                .tracks
                .iter()
                .position(|t| t.id == track)
                .with_context(|| format!("Track {} is not in playlist {}", track, id))?,
            None => 0,
        };
        return Ok((playlist.tracks, start));
    }

    ctx.load_library().await?;
    match options.start {
        Some(track) => ctx
            .state
            .queue_from(track)
            .with_context(|| format!("Track {} is not in the library", track)),
        None => {
            let visible = ctx.state.tracks().borrow().clone();
            if visible.is_empty() {
                bail!("The library is empty");
            }
            Ok((visible, 0))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn track() -> Track {
        Track::new(TrackId::new(7), "Song", PathBuf::from("/s.mp3"))
            .with_artist("Band")
            .with_duration_ms(185_000)
    }

    #[test]
    fn formats_track_line() {
        assert_eq!(format_track(&track()), "     7  Song - Band  [03:05]");
    }

    #[test]
    fn formats_snapshot_line() {
        let snapshot = PlaybackSnapshot {
            current_track: Some(track()),
            is_playing: true,
            position_ms: 61_000,
            duration_ms: 185_000,
            shuffle_enabled: true,
            repeat_mode: RepeatMode::All,
        };
        assert_eq!(
            format_snapshot(&snapshot),
            "> Song - Band  01:01 / 03:05  [shuffle]  [repeat all]"
        );
    }

    #[test]
    fn formats_empty_snapshot() {
        assert_eq!(
            format_snapshot(&PlaybackSnapshot::default()),
            "(nothing playing)"
        );
    }

    #[test]
    fn database_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("nested/aura.db");
        ensure_database_dir(&format!("sqlite://{}", db.display())).unwrap();
        assert!(db.parent().unwrap().exists());
    }
}
