//! Integration tests for the filesystem media index
//!
//! Audio fixtures are tiny PCM WAV files generated on the fly.

use aura_core::{AuraError, MediaIndex, MediaQuery, ALBUM_ART_BASE, UNKNOWN_ARTIST};
use aura_metadata::FsMediaIndex;
use std::path::Path;
use std::time::{Duration, SystemTime};
use tempfile::TempDir;

/// Write `millis` of 8 kHz mono 16-bit silence
fn write_wav(path: &Path, millis: u32) {
    const SAMPLE_RATE: u32 = 8_000;
    let data_len = SAMPLE_RATE * 2 * millis / 1000;

    let mut bytes = Vec::with_capacity(44 + data_len as usize);
    bytes.extend_from_slice(b"RIFF");
    bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
    bytes.extend_from_slice(b"WAVE");
    bytes.extend_from_slice(b"fmt ");
    bytes.extend_from_slice(&16u32.to_le_bytes());
    bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
    bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
    bytes.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
    bytes.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
    bytes.extend_from_slice(&2u16.to_le_bytes());
    bytes.extend_from_slice(&16u16.to_le_bytes());
    bytes.extend_from_slice(b"data");
    bytes.extend_from_slice(&data_len.to_le_bytes());
    bytes.resize(44 + data_len as usize, 0);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, bytes).unwrap();
}

fn set_mtime(path: &Path, secs_after_epoch: u64) {
    let file = std::fs::File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(secs_after_epoch))
        .unwrap();
}

fn music_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[tokio::test]
async fn test_indexes_wav_files() {
    let dir = music_dir();
    write_wav(&dir.path().join("Morning Light.wav"), 1000);

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);
    let tracks = index.query(&MediaQuery::default()).await.unwrap();

    assert_eq!(tracks.len(), 1);
    let track = &tracks[0];
    assert_eq!(track.title, "Morning Light");
    assert_eq!(track.artist, UNKNOWN_ARTIST);
    assert!(track.duration_ms >= 900 && track.duration_ms <= 1100);
    assert!(track.album_art.starts_with(ALBUM_ART_BASE));
    assert_eq!(track.file_path, dir.path().join("Morning Light.wav"));
}

#[tokio::test]
async fn test_music_only_excludes_unreadable_files() {
    let dir = music_dir();
    write_wav(&dir.path().join("song.wav"), 500);
    std::fs::write(dir.path().join("voice-memo.mp3"), b"definitely not audio").unwrap();
    std::fs::write(dir.path().join("notes.txt"), b"text").unwrap();

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);

    let music = index.query(&MediaQuery::default()).await.unwrap();
    assert_eq!(music.len(), 1);
    assert_eq!(music[0].title, "song");

    let everything = index
        .query(&MediaQuery {
            music_only: false,
            ..MediaQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(everything.len(), 2);
    assert!(everything.iter().any(|t| t.title == "voice-memo" && t.duration_ms == 0));
}

#[tokio::test]
async fn test_walks_nested_directories() {
    let dir = music_dir();
    write_wav(&dir.path().join("a/b/c/deep.wav"), 300);
    write_wav(&dir.path().join("top.wav"), 300);

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);
    let tracks = index.query(&MediaQuery::default()).await.unwrap();

    assert_eq!(tracks.len(), 2);
}

#[tokio::test]
async fn test_ids_follow_modification_order() {
    let dir = music_dir();
    let older = dir.path().join("zz-older.wav");
    let newer = dir.path().join("aa-newer.wav");
    write_wav(&older, 200);
    write_wav(&newer, 200);
    set_mtime(&older, 1_000);
    set_mtime(&newer, 2_000);

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);
    let tracks = index.query(&MediaQuery::default()).await.unwrap();

    // Same scan, so ordering falls back to descending id
    assert_eq!(tracks[0].title, "aa-newer");
    assert_eq!(tracks[0].id.get(), 2);
    assert_eq!(tracks[1].title, "zz-older");
    assert_eq!(tracks[1].id.get(), 1);
}

#[tokio::test]
async fn test_ids_stable_and_new_files_first() {
    let dir = music_dir();
    write_wav(&dir.path().join("one.wav"), 200);
    write_wav(&dir.path().join("two.wav"), 200);

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);
    let first = index.query(&MediaQuery::default()).await.unwrap();

    write_wav(&dir.path().join("three.wav"), 200);
    let second = index.query(&MediaQuery::default()).await.unwrap();

    assert_eq!(second.len(), 3);
    assert_eq!(second[0].title, "three");
    assert_eq!(second[0].id.get(), 3);

    for track in &first {
        let again = second.iter().find(|t| t.file_path == track.file_path).unwrap();
        assert_eq!(again.id, track.id);
    }
}

#[tokio::test]
async fn test_catalog_persists_across_instances() {
    let dir = music_dir();
    let state = tempfile::tempdir().unwrap();
    let catalog = state.path().join("catalog.json");
    write_wav(&dir.path().join("keep.wav"), 200);

    let first = FsMediaIndex::new(vec![dir.path().to_path_buf()])
        .with_catalog(&catalog)
        .unwrap()
        .query(&MediaQuery::default())
        .await
        .unwrap();
    assert!(catalog.exists());

    write_wav(&dir.path().join("later.wav"), 200);

    let second = FsMediaIndex::new(vec![dir.path().to_path_buf()])
        .with_catalog(&catalog)
        .unwrap()
        .query(&MediaQuery::default())
        .await
        .unwrap();

    let kept = second.iter().find(|t| t.title == "keep").unwrap();
    assert_eq!(kept.id, first[0].id);
    let later = second.iter().find(|t| t.title == "later").unwrap();
    assert!(later.id > kept.id);
}

#[tokio::test]
async fn test_same_directory_shares_album_art() {
    let dir = music_dir();
    write_wav(&dir.path().join("album/1.wav"), 200);
    write_wav(&dir.path().join("album/2.wav"), 200);
    write_wav(&dir.path().join("single/3.wav"), 200);

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);
    let tracks = index.query(&MediaQuery::default()).await.unwrap();

    let art = |title: &str| {
        tracks
            .iter()
            .find(|t| t.title == title)
            .map(|t| t.album_art.clone())
            .unwrap()
    };
    assert_eq!(art("1"), art("2"));
    assert_ne!(art("1"), art("3"));
}

#[tokio::test]
async fn test_missing_root_is_not_found() {
    let dir = music_dir();
    let missing = dir.path().join("nope");

    let index = FsMediaIndex::new(vec![missing]);
    let result = index.query(&MediaQuery::default()).await;

    assert!(matches!(result, Err(AuraError::NotFound { .. })));
}

#[tokio::test]
async fn test_empty_root() {
    let dir = music_dir();

    let index = FsMediaIndex::new(vec![dir.path().to_path_buf()]);
    let tracks = index.query(&MediaQuery::default()).await.unwrap();

    assert!(tracks.is_empty());
}
