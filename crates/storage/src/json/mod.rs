//! File-backed adapters: one JSON file per question set, plus `records.json`
//! and `settings.json` in the data directory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use quiz_core::model::{AppSettings, DEFAULT_MUSIC_VOLUME, LeaderboardEntry, Question, Theme};
use quiz_core::time::{format_record_date, parse_record_date};
use serde::{Deserialize, Serialize};

use crate::repository::{
    QuestionRecord, QuestionSetSource, RecordRepository, SettingsRepository, Storage,
    StorageError,
};

pub const QUESTIONS_DIR: &str = "questions";
pub const RECORDS_FILE: &str = "records.json";
pub const SETTINGS_FILE: &str = "settings.json";

/// Reads `<dir>/<name>.json` question sets.
#[derive(Debug, Clone)]
pub struct JsonQuestionDir {
    dir: PathBuf,
}

impl JsonQuestionDir {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn set_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Write a question set file, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the file cannot be serialized or written.
    pub fn write_set(&self, name: &str, questions: &[Question]) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        let records: Vec<QuestionRecord> =
            questions.iter().map(QuestionRecord::from_question).collect();
        let body = serde_json::to_string_pretty(&records)?;
        std::fs::write(self.set_path(name), body)?;
        Ok(())
    }
}

impl QuestionSetSource for JsonQuestionDir {
    fn load_set(&self, name: &str) -> Result<Vec<Question>, StorageError> {
        let path = self.set_path(name);
        let body = match std::fs::read_to_string(&path) {
            Ok(body) => body,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound);
            }
            Err(err) => return Err(err.into()),
        };

        let records: Vec<QuestionRecord> = serde_json::from_str(&body)?;
        records
            .into_iter()
            .enumerate()
            .map(|(idx, record)| {
                record.into_question().map_err(|err| {
                    StorageError::Serialization(format!("{name} question {}: {err}", idx + 1))
                })
            })
            .collect()
    }
}

//
// ─── RECORDS + SETTINGS FILES ─────────────────────────────────────────────────
//

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RecordFileEntry {
    name: String,
    score: u64,
    date: String,
    #[serde(default)]
    theme: Theme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SettingsFile {
    #[serde(default)]
    theme: Option<String>,
    #[serde(default)]
    music_volume: Option<f32>,
}

/// Stores records and settings as JSON documents in a data directory.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    data_dir: PathBuf,
}

impl JsonFileRepository {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    fn records_path(&self) -> PathBuf {
        self.data_dir.join(RECORDS_FILE)
    }

    fn settings_path(&self) -> PathBuf {
        self.data_dir.join(SETTINGS_FILE)
    }

    async fn read_optional(path: &Path) -> Result<Option<String>, StorageError> {
        match tokio::fs::read_to_string(path).await {
            Ok(body) => Ok(Some(body)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    async fn write(&self, path: &Path, body: String) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.data_dir).await?;
        tokio::fs::write(path, body).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordRepository for JsonFileRepository {
    async fn load_records(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let Some(body) = Self::read_optional(&self.records_path()).await? else {
            return Ok(Vec::new());
        };
        let rows: Vec<RecordFileEntry> = serde_json::from_str(&body)?;

        let mut entries = Vec::with_capacity(rows.len());
        for row in rows {
            match parse_record_date(&row.date) {
                Ok(at) => entries.push(LeaderboardEntry::new(&row.name, row.score, at, row.theme)),
                Err(err) => {
                    tracing::warn!(name = %row.name, date = %row.date, %err, "skipping record with unreadable date");
                }
            }
        }
        Ok(entries)
    }

    async fn save_records(&self, records: &[LeaderboardEntry]) -> Result<(), StorageError> {
        let rows: Vec<RecordFileEntry> = records
            .iter()
            .map(|entry| RecordFileEntry {
                name: entry.name().to_owned(),
                score: entry.score(),
                date: format_record_date(entry.recorded_at()),
                theme: entry.theme(),
            })
            .collect();
        let body = serde_json::to_string_pretty(&rows)?;
        self.write(&self.records_path(), body).await
    }
}

#[async_trait]
impl SettingsRepository for JsonFileRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let Some(body) = Self::read_optional(&self.settings_path()).await? else {
            return Ok(None);
        };
        let file: SettingsFile = serde_json::from_str(&body)?;

        let theme = match file.theme.as_deref().map(str::parse::<Theme>) {
            Some(Ok(theme)) => theme,
            Some(Err(err)) => {
                tracing::warn!(%err, "falling back to default theme");
                Theme::default()
            }
            None => Theme::default(),
        };
        let music_volume = file.music_volume.unwrap_or(DEFAULT_MUSIC_VOLUME);
        Ok(Some(AppSettings::new(theme, music_volume)))
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        let file = SettingsFile {
            theme: Some(settings.theme().as_str().to_owned()),
            music_volume: Some(settings.music_volume()),
        };
        let body = serde_json::to_string_pretty(&file)?;
        self.write(&self.settings_path(), body).await
    }
}

impl Storage {
    /// Build a `Storage` backed by JSON files under `data_dir`.
    ///
    /// Question sets are read from `<data_dir>/questions`.
    #[must_use]
    pub fn json(data_dir: impl Into<PathBuf>) -> Self {
        let data_dir = data_dir.into();
        let repo = JsonFileRepository::new(data_dir.clone());
        let questions: Arc<dyn QuestionSetSource> =
            Arc::new(JsonQuestionDir::new(data_dir.join(QUESTIONS_DIR)));
        let records: Arc<dyn RecordRepository> = Arc::new(repo.clone());
        let settings: Arc<dyn SettingsRepository> = Arc::new(repo);
        Self {
            questions,
            records,
            settings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::time::fixed_now;

    fn question(prompt: &str, correct: usize) -> Question {
        Question::new(
            prompt,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct,
        )
        .unwrap()
    }

    #[test]
    fn reads_reference_set_layout() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("set1.json"),
            r#"[
                {"question": "2 + 2?", "options": ["3", "4", "5", "6"], "correct_answer": 1}
            ]"#,
        )
        .unwrap();

        let source = JsonQuestionDir::new(dir.path());
        let questions = source.load_set("set1").unwrap();
        assert_eq!(questions.len(), 1);
        assert_eq!(questions[0].prompt(), "2 + 2?");
        assert_eq!(questions[0].correct_answer(), 1);
    }

    #[test]
    fn missing_set_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonQuestionDir::new(dir.path());
        assert!(matches!(source.load_set("set4"), Err(StorageError::NotFound)));
    }

    #[test]
    fn malformed_question_is_a_serialization_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("set2.json"),
            r#"[{"question": "Q", "options": ["a", "b"], "correct_answer": 0}]"#,
        )
        .unwrap();
        let source = JsonQuestionDir::new(dir.path());
        assert!(matches!(
            source.load_set("set2"),
            Err(StorageError::Serialization(_))
        ));
    }

    #[test]
    fn write_set_then_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let source = JsonQuestionDir::new(dir.path().join("nested"));
        let questions = vec![question("Q1", 0), question("Q2", 3)];
        source.write_set("set5", &questions).unwrap();
        assert_eq!(source.load_set("set5").unwrap(), questions);
    }

    #[tokio::test]
    async fn settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert_eq!(repo.get_settings().await.unwrap(), None);

        let settings = AppSettings::new(Theme::Light, 0.42);
        repo.save_settings(&settings).await.unwrap();
        assert_eq!(repo.get_settings().await.unwrap(), Some(settings));
    }

    #[tokio::test]
    async fn settings_with_unknown_theme_fall_back() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(SETTINGS_FILE),
            r#"{"theme": "neon", "music_volume": 0.3}"#,
        )
        .unwrap();
        let repo = JsonFileRepository::new(dir.path());
        let settings = repo.get_settings().await.unwrap().unwrap();
        assert_eq!(settings.theme(), Theme::Dark);
        assert!((settings.music_volume() - 0.3).abs() < f32::EPSILON);
    }

    #[tokio::test]
    async fn records_round_trip_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert!(repo.load_records().await.unwrap().is_empty());

        let records = vec![
            LeaderboardEntry::new("Ada", 1_000_000, fixed_now(), Theme::Light),
            LeaderboardEntry::new("Bob", 5_000, fixed_now(), Theme::Dark),
        ];
        repo.save_records(&records).await.unwrap();
        assert_eq!(repo.load_records().await.unwrap(), records);
    }

    #[tokio::test]
    async fn corrupt_records_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(RECORDS_FILE), "not json").unwrap();
        let repo = JsonFileRepository::new(dir.path());
        assert!(matches!(
            repo.load_records().await,
            Err(StorageError::Serialization(_))
        ));
    }
}
