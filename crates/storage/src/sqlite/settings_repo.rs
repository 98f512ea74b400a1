use async_trait::async_trait;
use quiz_core::model::{AppSettings, Theme};
use sqlx::Row;

use crate::repository::{SettingsRepository, StorageError};

use super::SqliteRepository;

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

#[async_trait]
impl SettingsRepository for SqliteRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT theme, music_volume
            FROM app_settings
            WHERE id = 1
            ",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(None);
        };

        let theme: String = row.try_get("theme").map_err(ser)?;
        let music_volume: f64 = row.try_get("music_volume").map_err(ser)?;
        let theme = theme.parse::<Theme>().map_err(ser)?;

        #[allow(clippy::cast_possible_truncation)]
        let music_volume = music_volume as f32;
        Ok(Some(AppSettings::new(theme, music_volume)))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO app_settings (id, theme, music_volume)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(id) DO UPDATE SET
                theme = excluded.theme,
                music_volume = excluded.music_volume
            ",
        )
        .bind(1_i64)
        .bind(settings.theme().as_str())
        .bind(f64::from(settings.music_volume()))
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}
