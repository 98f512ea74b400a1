use async_trait::async_trait;
use quiz_core::model::{AppSettings, LeaderboardEntry, Question, QuestionError};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("io error: {0}")]
    Io(String),
}

impl From<std::io::Error> for StorageError {
    fn from(err: std::io::Error) -> Self {
        StorageError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        StorageError::Serialization(err.to_string())
    }
}

/// Persisted shape for a question inside a set file.
///
/// Mirrors the domain `Question` so adapters can serialize/deserialize without
/// leaking storage concerns into the domain layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

impl QuestionRecord {
    #[must_use]
    pub fn from_question(question: &Question) -> Self {
        Self {
            question: question.prompt().to_owned(),
            options: question.options().to_vec(),
            correct_answer: question.correct_answer(),
        }
    }

    /// Convert the record back into a domain `Question`.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the record fails validation.
    pub fn into_question(self) -> Result<Question, QuestionError> {
        Question::new(self.question, self.options, self.correct_answer)
    }
}

/// Source of named question sets (`set1`, `set2`, ...).
///
/// Loading is synchronous: sets are read once at startup.
pub trait QuestionSetSource: Send + Sync {
    /// Load every question of the named set.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the set does not exist, or other
    /// storage errors if it cannot be read or parsed.
    fn load_set(&self, name: &str) -> Result<Vec<Question>, StorageError>;
}

/// Repository contract for the high-score table.
#[async_trait]
pub trait RecordRepository: Send + Sync {
    /// Load persisted entries in stored order (empty if nothing was saved yet).
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if stored records cannot be read.
    async fn load_records(&self) -> Result<Vec<LeaderboardEntry>, StorageError>;

    /// Replace the stored table with `records`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the records cannot be written.
    async fn save_records(&self, records: &[LeaderboardEntry]) -> Result<(), StorageError>;
}

/// Repository contract for user preferences.
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Fetch persisted settings, `None` on first launch.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if stored settings cannot be read.
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError>;

    /// Persist settings, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the settings cannot be written.
    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    sets: Arc<Mutex<HashMap<String, Vec<Question>>>>,
    records: Arc<Mutex<Vec<LeaderboardEntry>>>,
    settings: Arc<Mutex<Option<AppSettings>>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a question set under `name`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the lock is poisoned.
    pub fn insert_set(&self, name: &str, questions: Vec<Question>) -> Result<(), StorageError> {
        let mut guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(name.to_owned(), questions);
        Ok(())
    }

    /// Make every subsequent write fail, to exercise degraded persistence.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Io("writes disabled".into()));
        }
        Ok(())
    }
}

impl QuestionSetSource for InMemoryRepository {
    fn load_set(&self, name: &str) -> Result<Vec<Question>, StorageError> {
        let guard = self
            .sets
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.get(name).cloned().ok_or(StorageError::NotFound)
    }
}

#[async_trait]
impl RecordRepository for InMemoryRepository {
    async fn load_records(&self) -> Result<Vec<LeaderboardEntry>, StorageError> {
        let guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.clone())
    }

    async fn save_records(&self, records: &[LeaderboardEntry]) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut guard = self
            .records
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = records.to_vec();
        Ok(())
    }
}

#[async_trait]
impl SettingsRepository for InMemoryRepository {
    async fn get_settings(&self) -> Result<Option<AppSettings>, StorageError> {
        let guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(*guard)
    }

    async fn save_settings(&self, settings: &AppSettings) -> Result<(), StorageError> {
        self.check_writable()?;
        let mut guard = self
            .settings
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        *guard = Some(*settings);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSetSource>,
    pub records: Arc<dyn RecordRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self::from_in_memory(InMemoryRepository::new())
    }

    /// Wrap an existing in-memory repository (tests keep a handle to seed it).
    #[must_use]
    pub fn from_in_memory(repo: InMemoryRepository) -> Self {
        let questions: Arc<dyn QuestionSetSource> = Arc::new(repo.clone());
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
    use quiz_core::model::Theme;
    use quiz_core::time::fixed_now;

    fn question(prompt: &str) -> Question {
        Question::new(
            prompt,
            vec!["A".into(), "B".into(), "C".into(), "D".into()],
            1,
        )
        .unwrap()
    }

    #[test]
    fn question_record_round_trips() {
        let original = question("Capital of France?");
        let record = QuestionRecord::from_question(&original);
        assert_eq!(record.clone().into_question().unwrap(), original);
    }

    #[test]
    fn question_record_rejects_bad_answer_index() {
        let record = QuestionRecord {
            question: "Q".into(),
            options: vec!["A".into(), "B".into(), "C".into(), "D".into()],
            correct_answer: 9,
        };
        assert_eq!(
            record.into_question().unwrap_err(),
            QuestionError::CorrectAnswerOutOfRange(9)
        );
    }

    #[test]
    fn missing_set_is_not_found() {
        let repo = InMemoryRepository::new();
        repo.insert_set("set1", vec![question("Q1")]).unwrap();
        assert_eq!(repo.load_set("set1").unwrap().len(), 1);
        assert!(matches!(
            repo.load_set("set2"),
            Err(StorageError::NotFound)
        ));
    }

    #[tokio::test]
    async fn failed_writes_leave_previous_records() {
        let repo = InMemoryRepository::new();
        let entry = LeaderboardEntry::new("Ada", 500, fixed_now(), Theme::Dark);
        repo.save_records(std::slice::from_ref(&entry)).await.unwrap();

        repo.set_fail_writes(true);
        assert!(repo.save_records(&[]).await.is_err());
        assert_eq!(repo.load_records().await.unwrap(), vec![entry]);
    }
}
