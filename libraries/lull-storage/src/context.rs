use async_trait::async_trait;
use lull_core::{error::Result, storage::SettingsStore, types::Preset};
use sqlx::SqlitePool;

use crate::{presets, settings};

/// Settings store backed by a local `SQLite` file
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    pool: SqlitePool,
}

impl SqliteSettingsStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn get_setting(&self, key: &str) -> Result<Option<serde_json::Value>> {
        Ok(settings::get_setting(&self.pool, key).await?)
    }

    async fn set_setting(&self, key: &str, value: &serde_json::Value) -> Result<()> {
        Ok(settings::set_setting(&self.pool, key, value).await?)
    }

    async fn delete_setting(&self, key: &str) -> Result<()> {
        Ok(settings::delete_setting(&self.pool, key).await?)
    }

    async fn load_presets(&self) -> Result<Vec<Preset>> {
        Ok(presets::load_all(&self.pool).await?)
    }

    async fn save_presets(&self, list: &[Preset]) -> Result<()> {
        Ok(presets::replace_all(&self.pool, list).await?)
    }
}
