//! Application settings
//!
//! Settings are stored as key-value pairs with JSON-serialized values.
//!
//! # Example
//!
//! ```rust,no_run
//! use aura_storage::settings;
//! # async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//! settings::set_setting(pool, settings::SETTING_DARK_THEME, &serde_json::json!(false)).await?;
//!
//! let dark = settings::get_setting(pool, settings::SETTING_DARK_THEME).await?;
//! # Ok(())
//! # }
//! ```

use sqlx::{Row, SqlitePool};

use crate::error::{Result, StorageError};

pub use aura_core::storage::SETTING_DARK_THEME;

/// Get a single setting value
///
/// Returns `Ok(None)` if the key was never written.
pub async fn get_setting(pool: &SqlitePool, key: &str) -> Result<Option<serde_json::Value>> {
    let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
        .bind(key)
        .fetch_optional(pool)
        .await?;

    match row {
        Some(row) => {
            let raw: String = row.get("value");
            let value = serde_json::from_str(&raw)
                .map_err(|e| StorageError::SerializationError(e.to_string()))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

/// Set a setting value, replacing any previous one
pub async fn set_setting(pool: &SqlitePool, key: &str, value: &serde_json::Value) -> Result<()> {
    let raw = serde_json::to_string(value)
        .map_err(|e| StorageError::SerializationError(e.to_string()))?;

    sqlx::query(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, datetime('now'))
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
        "#,
    )
    .bind(key)
    .bind(raw)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete a setting
pub async fn delete_setting(pool: &SqlitePool, key: &str) -> Result<()> {
    sqlx::query("DELETE FROM settings WHERE key = ?")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(())
}

/// Read a boolean setting
///
/// A stored value that is not a JSON boolean is reported as an error.
pub async fn get_bool(pool: &SqlitePool, key: &str) -> Result<Option<bool>> {
    match get_setting(pool, key).await? {
        Some(serde_json::Value::Bool(value)) => Ok(Some(value)),
        Some(other) => Err(StorageError::SerializationError(format!(
            "setting {} is not a boolean: {}",
            key, other
        ))),
        None => Ok(None),
    }
}
