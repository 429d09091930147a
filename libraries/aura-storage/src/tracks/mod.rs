//! Track cache
//!
//! Keeps a copy of every track the media index reported so playlist
//! associations survive rescans. Rows are never updated once cached.

use aura_core::{error::Result, types::*};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};
use std::path::PathBuf;

/// Insert tracks that are not cached yet
///
/// Existing rows are left untouched. Returns the number of rows inserted.
pub async fn insert_if_absent(pool: &SqlitePool, tracks: &[Track]) -> Result<u64> {
    if tracks.is_empty() {
        return Ok(0);
    }

    let mut tx = pool.begin().await?;
    let mut inserted = 0;

    for track in tracks {
        let result = sqlx::query(
            r#"
            INSERT INTO tracks (id, title, artist, album_art, duration_ms, file_path)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO NOTHING
            "#,
        )
        .bind(track.id)
        .bind(&track.title)
        .bind(&track.artist)
        .bind(&track.album_art)
        .bind(track.duration_ms as i64)
        .bind(track.file_path.to_string_lossy().to_string())
        .execute(&mut *tx)
        .await?;

        inserted += result.rows_affected();
    }

    tx.commit().await?;

    Ok(inserted)
}

/// Get a cached track by ID
pub async fn get_by_id(pool: &SqlitePool, id: TrackId) -> Result<Option<Track>> {
    let row = sqlx::query(
        "SELECT id, title, artist, album_art, duration_ms, file_path FROM tracks WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| from_row(&row)))
}

/// Get all cached tracks, most recently discovered first
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Track>> {
    let rows = sqlx::query(
        "SELECT id, title, artist, album_art, duration_ms, file_path FROM tracks ORDER BY id DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(from_row).collect())
}

/// Number of cached tracks
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM tracks")
        .fetch_one(pool)
        .await?;

    Ok(row.get("count"))
}

pub(crate) fn from_row(row: &SqliteRow) -> Track {
    Track {
        id: row.get("id"),
        title: row.get("title"),
        artist: row.get("artist"),
        album_art: row.get("album_art"),
        duration_ms: row.get::<i64, _>("duration_ms").max(0) as u64,
        file_path: PathBuf::from(row.get::<String, _>("file_path")),
    }
}
