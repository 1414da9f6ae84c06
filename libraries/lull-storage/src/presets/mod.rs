//! Preset persistence
//!
//! Presets are stored as JSON documents with their list position. Saving
//! replaces the whole list inside one transaction.

use lull_core::types::Preset;
use sqlx::{Row, SqlitePool};

use crate::error::Result;

/// Load all presets in list order
pub async fn load_all(pool: &SqlitePool) -> Result<Vec<Preset>> {
    let rows = sqlx::query("SELECT id, data FROM presets ORDER BY position")
        .fetch_all(pool)
        .await?;

    let mut presets = Vec::with_capacity(rows.len());
    for row in rows {
        let raw: String = row.try_get("data")?;
        match serde_json::from_str::<Preset>(&raw) {
            Ok(preset) => presets.push(preset),
            Err(e) => {
                let id: String = row.try_get("id")?;
                tracing::warn!(preset_id = %id, "skipping unreadable preset: {}", e);
            }
        }
    }
    Ok(presets)
}

/// Replace the stored preset list
pub async fn replace_all(pool: &SqlitePool, presets: &[Preset]) -> Result<()> {
    let now = chrono::Utc::now().timestamp();
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM presets").execute(&mut *tx).await?;

    for (position, preset) in presets.iter().enumerate() {
        let data = serde_json::to_string(preset)?;
        sqlx::query(
            "INSERT INTO presets (id, position, is_default, data, updated_at)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(preset.id.as_str())
        .bind(position as i64)
        .bind(preset.is_default)
        .bind(data)
        .bind(now)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    Ok(())
}

/// Count stored presets
pub async fn count(pool: &SqlitePool) -> Result<i64> {
    let row = sqlx::query("SELECT COUNT(*) AS n FROM presets")
        .fetch_one(pool)
        .await?;
    Ok(row.try_get("n")?)
}
