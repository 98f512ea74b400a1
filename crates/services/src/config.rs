use std::path::PathBuf;
use std::time::Duration;

use storage::json::QUESTIONS_DIR;

use crate::game::DEFAULT_SET_COUNT;

/// Startup configuration resolved by the binary from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Root of question sets and, without `db_url`, records and settings.
    pub data_dir: PathBuf,
    /// `SQLite` URL for records and settings; JSON files when `None`.
    pub db_url: Option<String>,
    /// Fixed seed for hint randomness.
    pub seed: Option<u64>,
    pub set_count: u32,
    pub delays: TransitionDelays,
}

impl AppConfig {
    #[must_use]
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            db_url: None,
            seed: None,
            set_count: DEFAULT_SET_COUNT,
            delays: TransitionDelays::default(),
        }
    }

    #[must_use]
    pub fn questions_dir(&self) -> PathBuf {
        self.data_dir.join(QUESTIONS_DIR)
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new("data")
    }
}

/// How long the answer feedback stays on screen before moving on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionDelays {
    pub after_correct: Duration,
    pub after_wrong: Duration,
}

impl TransitionDelays {
    /// No pauses at all (tests and scripted runs).
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            after_correct: Duration::ZERO,
            after_wrong: Duration::ZERO,
        }
    }
}

impl Default for TransitionDelays {
    fn default() -> Self {
        Self {
            after_correct: Duration::from_secs(3),
            after_wrong: Duration::from_secs(8),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_layout() {
        let config = AppConfig::default();
        assert_eq!(config.questions_dir(), PathBuf::from("data").join("questions"));
        assert_eq!(config.set_count, 7);
        assert_eq!(config.db_url, None);
        assert_eq!(config.delays.after_correct, Duration::from_secs(3));
        assert_eq!(config.delays.after_wrong, Duration::from_secs(8));
    }
}
