//! Aura Player Storage
//!
//! `SQLite` persistence for playlists, the cached track list and settings.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: Each feature owns its own queries (`playlists`,
//!   `tracks`, `settings`)
//! - **Change Feed**: [`LocalStorageContext`] broadcasts a
//!   [`TableChange`](aura_core::TableChange) after every committed write
//! - **Live Queries**: [`live::watch_playlists`] and [`live::watch_playlist`]
//!   re-run their query whenever a relevant table changes
//!
//! # Example
//!
//! ```rust,no_run
//! use aura_storage::{create_pool, run_migrations, LocalStorageContext};
//! use aura_core::PlaylistStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://aura.db").await?;
//! run_migrations(&pool).await?;
//!
//! let storage = Arc::new(LocalStorageContext::new(pool));
//! storage.create_playlist("Road Trip").await?;
//!
//! let mut playlists = aura_storage::live::watch_playlists(storage.clone());
//! playlists.changed().await;
//! println!("{:?}", playlists.latest());
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod playlists;
pub mod settings;
pub mod tracks;

// Reactive reads
pub mod live;

pub use context::LocalStorageContext;
pub use error::StorageError;
pub use live::LiveQuery;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// This should be called once when the application starts to ensure
/// the database schema is up to date.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `<sqlite://aura.db>`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true) // association rows cascade with their playlist
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    tracing::debug!("SQLite pool ready");

    Ok(pool)
}
