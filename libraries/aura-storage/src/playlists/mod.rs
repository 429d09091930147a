use aura_core::{error::Result, types::*, AuraError};
use sqlx::{Row, SqlitePool};

use crate::tracks;

/// Get all playlists ordered by name
pub async fn get_all(pool: &SqlitePool) -> Result<Vec<Playlist>> {
    let rows = sqlx::query("SELECT id, name FROM playlists ORDER BY name ASC, id ASC")
        .fetch_all(pool)
        .await?;

    Ok(rows
        .into_iter()
        .map(|row| Playlist {
            id: row.get("id"),
            name: row.get("name"),
        })
        .collect())
}

/// Get playlist by ID
pub async fn get_by_id(pool: &SqlitePool, id: PlaylistId) -> Result<Option<Playlist>> {
    let row = sqlx::query("SELECT id, name FROM playlists WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(|row| Playlist {
        id: row.get("id"),
        name: row.get("name"),
    }))
}

/// Get playlist with all tracks, in the order they were added
pub async fn get_with_tracks(
    pool: &SqlitePool,
    id: PlaylistId,
) -> Result<Option<PlaylistWithTracks>> {
    let Some(playlist) = get_by_id(pool, id).await? else {
        return Ok(None);
    };

    let track_rows = sqlx::query(
        r#"
        SELECT t.id, t.title, t.artist, t.album_art, t.duration_ms, t.file_path
        FROM playlist_tracks pt
        INNER JOIN tracks t ON pt.track_id = t.id
        WHERE pt.playlist_id = ?
        ORDER BY pt.position
        "#,
    )
    .bind(id)
    .fetch_all(pool)
    .await?;

    Ok(Some(PlaylistWithTracks {
        playlist,
        tracks: track_rows.iter().map(tracks::from_row).collect(),
    }))
}

/// Create new playlist
pub async fn create(pool: &SqlitePool, name: &str) -> Result<Playlist> {
    let result = sqlx::query("INSERT INTO playlists (name) VALUES (?)")
        .bind(name)
        .execute(pool)
        .await?;

    let id = PlaylistId::new(result.last_insert_rowid());

    get_by_id(pool, id)
        .await?
        .ok_or_else(|| AuraError::storage("Failed to retrieve created playlist"))
}

/// Insert or replace a playlist by ID
///
/// Replacing keeps the playlist's association rows.
pub async fn save(pool: &SqlitePool, playlist: &Playlist) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO playlists (id, name)
        VALUES (?, ?)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name, updated_at = datetime('now')
        "#,
    )
    .bind(playlist.id)
    .bind(&playlist.name)
    .execute(pool)
    .await?;

    Ok(())
}

/// Rename playlist
pub async fn rename(pool: &SqlitePool, id: PlaylistId, name: &str) -> Result<()> {
    let result =
        sqlx::query("UPDATE playlists SET name = ?, updated_at = datetime('now') WHERE id = ?")
            .bind(name)
            .bind(id)
            .execute(pool)
            .await?;

    if result.rows_affected() == 0 {
        return Err(AuraError::PlaylistNotFound(id));
    }

    Ok(())
}

/// Delete playlist together with its association rows
pub async fn delete(pool: &SqlitePool, id: PlaylistId) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM playlists WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AuraError::PlaylistNotFound(id));
    }

    tx.commit().await?;

    Ok(())
}

/// Add track to playlist
///
/// Adding a track that is already in the playlist is a no-op.
pub async fn add_track(pool: &SqlitePool, playlist_id: PlaylistId, track_id: TrackId) -> Result<()> {
    add_tracks(pool, playlist_id, &[track_id]).await
}

/// Add several tracks to a playlist in one transaction
///
/// Tracks already in the playlist keep their position; new ones are
/// appended in the given order.
pub async fn add_tracks(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_ids: &[TrackId],
) -> Result<()> {
    let mut tx = pool.begin().await?;

    for track_id in track_ids {
        sqlx::query(
            r#"
            INSERT INTO playlist_tracks (playlist_id, track_id, position)
            VALUES (
                ?1,
                ?2,
                (SELECT COALESCE(MAX(position), -1) + 1 FROM playlist_tracks WHERE playlist_id = ?1)
            )
            ON CONFLICT(playlist_id, track_id) DO NOTHING
            "#,
        )
        .bind(playlist_id)
        .bind(*track_id)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("UPDATE playlists SET updated_at = datetime('now') WHERE id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// Remove track from playlist
pub async fn remove_track(
    pool: &SqlitePool,
    playlist_id: PlaylistId,
    track_id: TrackId,
) -> Result<()> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM playlist_tracks WHERE playlist_id = ? AND track_id = ?")
        .bind(playlist_id)
        .bind(track_id)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE playlists SET updated_at = datetime('now') WHERE id = ?")
        .bind(playlist_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    Ok(())
}

/// All association rows of a playlist, in playlist order
pub async fn associations(pool: &SqlitePool, playlist_id: PlaylistId) -> Result<Vec<PlaylistTrack>> {
    let rows = sqlx::query(
        "SELECT playlist_id, track_id FROM playlist_tracks WHERE playlist_id = ? ORDER BY position",
    )
    .bind(playlist_id)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PlaylistTrack {
            playlist_id: row.get("playlist_id"),
            track_id: row.get("track_id"),
        })
        .collect())
}
