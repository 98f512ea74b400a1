use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quiz_core::model::{LeaderboardEntry, Theme};
use sqlx::Row;

use super::SqliteRepository;
use crate::repository::{RecordRepository, StorageError};

fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

fn map_record_row(row: &sqlx::sqlite::SqliteRow) -> Result<LeaderboardEntry, StorageError> {
    let name: String = row.try_get("name").map_err(ser)?;
    let score: i64 = row.try_get("score").map_err(ser)?;
    let recorded_at: DateTime<Utc> = row.try_get("recorded_at").map_err(ser)?;
    let theme: String = row.try_get("theme").map_err(ser)?;

    let score = u64::try_from(score)
        .map_err(|_| StorageError::Serialization(format!("invalid score: {score}")))?;
    let theme = theme.parse::<Theme>().map_err(ser)?;
    Ok(LeaderboardEntry::new(&name, score, recorded_at, theme))
}

#[async_trait]
impl RecordRepository for SqliteRepository {
    async fn load_records(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let rows = sqlx::query(
            r"
                SELECT name, score, recorded_at, theme
                FROM records
                ORDER BY position ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        rows.iter().map(map_record_row).collect()
    }

    async fn save_records(&self, records: &[LeaderboardEntry]) -> Result<(), StorageError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        sqlx::query("DELETE FROM records")
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for (position, entry) in records.iter().enumerate() {
            let position = i64::try_from(position)
                .map_err(|_| StorageError::Serialization("position overflow".into()))?;
            let score = i64::try_from(entry.score())
                .map_err(|_| StorageError::Serialization("score overflow".into()))?;

            sqlx::query(
                r"
                    INSERT INTO records (position, name, score, recorded_at, theme)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                ",
            )
            .bind(position)
            .bind(entry.name())
            .bind(score)
            .bind(entry.recorded_at())
            .bind(entry.theme().as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(())
    }
}
