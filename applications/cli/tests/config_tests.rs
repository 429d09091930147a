//! Configuration loading tests

use aura_cli::config::AppConfig;
use std::path::PathBuf;
use std::time::Duration;

#[test]
fn test_defaults_without_file() {
    let config = AppConfig::load_from(None).unwrap();

    assert_eq!(config.storage.database_url, "sqlite://./data/aura.db");
    assert_eq!(config.library.roots, vec![PathBuf::from("./music")]);
    assert_eq!(config.poll_interval(), Duration::from_secs(1));
}

#[test]
fn test_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("aura.toml");
    std::fs::write(
        &path,
        r#"
[library]
roots = ["/srv/music", "/home/me/Music"]

[storage]
database_url = "sqlite:///tmp/aura-test.db"

[playback]
poll_interval_ms = 250
"#,
    )
    .unwrap();

    let config = AppConfig::load_from(Some(path.as_path())).unwrap();

    assert_eq!(
        config.library.roots,
        vec![PathBuf::from("/srv/music"), PathBuf::from("/home/me/Music")]
    );
    assert_eq!(config.storage.database_url, "sqlite:///tmp/aura-test.db");
    // Unset keys keep their defaults
    assert_eq!(config.storage.catalog_path, PathBuf::from("./data/catalog.json"));
    assert_eq!(config.poll_interval(), Duration::from_millis(250));
}

#[test]
fn test_missing_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.toml");

    assert!(AppConfig::load_from(Some(missing.as_path())).is_err());
}
