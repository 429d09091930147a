/// Aura - local music library and player
use aura_cli::commands::{self, Context, PlayOptions};
use aura_cli::config::AppConfig;
use aura_core::{PlaylistId, RepeatMode, SortOrder, TrackId};
use clap::{Parser, Subcommand, ValueEnum};
use std::io::IsTerminal;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "aura")]
#[command(about = "Aura local music library and player", long_about = None)]
struct Cli {
    /// Configuration file path (defaults to ./aura.toml when present)
    #[arg(short, long, global = true, env = "AURA_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan the music folders and refresh the track cache
    Scan,
    /// List library tracks
    Tracks {
        /// Case-insensitive filter over title and artist
        #[arg(short, long)]
        search: Option<String>,
        /// Sort key
        #[arg(long, value_enum, default_value_t = SortArg::Recent)]
        sort: SortArg,
    },
    /// List playlists
    Playlists,
    /// Manage one playlist
    Playlist {
        #[command(subcommand)]
        command: PlaylistCommand,
    },
    /// Play the library or a playlist
    Play {
        /// Play this playlist instead of the library
        #[arg(short, long)]
        playlist: Option<i64>,
        /// Start at this track id
        #[arg(short, long)]
        start: Option<i64>,
        /// Enable shuffle
        #[arg(long)]
        shuffle: bool,
        /// Repeat mode
        #[arg(long, value_enum, default_value_t = RepeatArg::Off)]
        repeat: RepeatArg,
        /// Stop after this many seconds
        #[arg(long)]
        seconds: Option<u64>,
        /// Ignore stdin transport controls
        #[arg(long)]
        no_input: bool,
    },
    /// Show or toggle the theme
    Theme {
        #[command(subcommand)]
        command: ThemeCommand,
    },
}

#[derive(Subcommand)]
enum PlaylistCommand {
    /// Create a playlist
    Create { name: String },
    /// Rename a playlist
    Rename { id: i64, name: String },
    /// Delete a playlist
    Delete { id: i64 },
    /// Show a playlist and its tracks
    Show { id: i64 },
    /// Add tracks to a playlist
    Add {
        id: i64,
        #[arg(required = true)]
        tracks: Vec<i64>,
    },
    /// Remove a track from a playlist
    Remove { id: i64, track: i64 },
}

#[derive(Subcommand)]
enum ThemeCommand {
    /// Print the current theme
    Show,
    /// Switch between dark and light
    Toggle,
}

#[derive(Clone, Copy, ValueEnum)]
enum SortArg {
    Title,
    Artist,
    Recent,
}

impl From<SortArg> for SortOrder {
    fn from(arg: SortArg) -> Self {
        match arg {
            SortArg::Title => SortOrder::Title,
            SortArg::Artist => SortOrder::Artist,
            SortArg::Recent => SortOrder::DateAdded,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum RepeatArg {
    Off,
    All,
    One,
}

impl From<RepeatArg> for RepeatMode {
    fn from(arg: RepeatArg) -> Self {
        match arg {
            RepeatArg::Off => RepeatMode::Off,
            RepeatArg::All => RepeatMode::All,
            RepeatArg::One => RepeatMode::One,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run());
    // A pending stdin read cannot be cancelled; do not wait for it
    runtime.shutdown_background();
    result
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "aura=info,sqlx=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from(Some(path))?,
        None => AppConfig::load()?,
    };
    tracing::debug!(?config, "Configuration loaded");

    let ctx = Context::open(config).await?;

    match cli.command {
        Commands::Scan => commands::scan(&ctx).await?,
        Commands::Tracks { search, sort } => commands::tracks(&ctx, search, sort.into()).await?,
        Commands::Playlists => commands::playlists(&ctx).await?,
        Commands::Playlist { command } => run_playlist(&ctx, command).await?,
        Commands::Play {
            playlist,
            start,
            shuffle,
            repeat,
            seconds,
            no_input,
        } => {
            let options = PlayOptions {
                playlist: playlist.map(PlaylistId::new),
                start: start.map(TrackId::new),
                shuffle,
                repeat: repeat.into(),
                duration: seconds.map(Duration::from_secs),
                interactive: !no_input && std::io::stdin().is_terminal(),
            };
            commands::play(&ctx, options).await?;
        }
        Commands::Theme { command } => match command {
            ThemeCommand::Show => commands::show_theme(&ctx),
            ThemeCommand::Toggle => commands::toggle_theme(&ctx).await?,
        },
    }

    Ok(())
}

async fn run_playlist(ctx: &Context, command: PlaylistCommand) -> anyhow::Result<()> {
    match command {
        PlaylistCommand::Create { name } => commands::create_playlist(ctx, &name).await,
        PlaylistCommand::Rename { id, name } => {
            commands::rename_playlist(ctx, PlaylistId::new(id), &name).await
        }
        PlaylistCommand::Delete { id } => commands::delete_playlist(ctx, PlaylistId::new(id)).await,
        PlaylistCommand::Show { id } => commands::show_playlist(ctx, PlaylistId::new(id)).await,
        PlaylistCommand::Add { id, tracks } => {
            let tracks: Vec<TrackId> = tracks.into_iter().map(TrackId::new).collect();
            commands::add_to_playlist(ctx, PlaylistId::new(id), &tracks).await
        }
        PlaylistCommand::Remove { id, track } => {
            commands::remove_from_playlist(ctx, PlaylistId::new(id), TrackId::new(track)).await
        }
    }
}
