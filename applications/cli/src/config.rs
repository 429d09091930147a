/// Application configuration
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Default config file, read from the working directory when present
pub const DEFAULT_CONFIG_FILE: &str = "aura.toml";

/// Prefix of environment overrides, e.g. `AURA_STORAGE__DATABASE_URL`
pub const ENV_PREFIX: &str = "AURA";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    #[serde(default)]
    pub library: LibrarySettings,

    #[serde(default)]
    pub storage: StorageSettings,

    #[serde(default)]
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LibrarySettings {
    /// Folders walked by the media index
    #[serde(default = "default_roots")]
    pub roots: Vec<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageSettings {
    #[serde(default = "default_database_url")]
    pub database_url: String,

    /// Track and album id catalog of the media index
    #[serde(default = "default_catalog_path")]
    pub catalog_path: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PlaybackSettings {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
}

impl AppConfig {
    /// Load `aura.toml` (if present) and environment overrides
    pub fn load() -> Result<Self, config::ConfigError> {
        let default_file = PathBuf::from(DEFAULT_CONFIG_FILE);
        Self::load_from(default_file.exists().then_some(default_file.as_path()))
    }

    /// Load an explicit config file (if given) and environment overrides
    pub fn load_from(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut settings = config::Config::builder();

        if let Some(path) = path {
            settings = settings.add_source(config::File::from(path.to_path_buf()));
        }

        // Double underscore separates sections so keys may contain `_`
        settings = settings.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("library.roots")
                .try_parsing(true),
        );

        settings.build()?.try_deserialize()
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.playback.poll_interval_ms.max(1))
    }
}

// Default values
fn default_roots() -> Vec<PathBuf> {
    vec![PathBuf::from("./music")]
}

fn default_database_url() -> String {
    "sqlite://./data/aura.db".to_string()
}

fn default_catalog_path() -> PathBuf {
    PathBuf::from("./data/catalog.json")
}

fn default_poll_interval_ms() -> u64 {
    1000
}

impl Default for LibrarySettings {
    fn default() -> Self {
        Self {
            roots: default_roots(),
        }
    }
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            database_url: default_database_url(),
            catalog_path: default_catalog_path(),
        }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
        }
    }
}
