use std::sync::Arc;

use quiz_core::model::{Leaderboard, LeaderboardEntry};
use storage::repository::RecordRepository;
use tokio::sync::Mutex;

use crate::Clock;
use crate::settings_service::SettingsService;

/// Top-ten leaderboard kept in memory and mirrored to storage.
///
/// The in-memory board is authoritative: a failed save is logged and the
/// next successful save writes the full board again.
pub struct RecordStore {
    clock: Clock,
    repo: Arc<dyn RecordRepository>,
    settings: Arc<SettingsService>,
    board: Mutex<Leaderboard>,
}

impl RecordStore {
    /// Read persisted records; unreadable storage starts an empty board.
    pub async fn load(
        clock: Clock,
        repo: Arc<dyn RecordRepository>,
        settings: Arc<SettingsService>,
    ) -> Self {
        let entries = match repo.load_records().await {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(%err, "failed to load records, starting empty");
                Vec::new()
            }
        };
        let board = Leaderboard::from_entries(entries);
        tracing::debug!(records = board.len(), "records loaded");
        Self {
            clock,
            repo,
            settings,
            board: Mutex::new(board),
        }
    }

    /// Record a finished game and persist the board.
    ///
    /// Blank names become the anonymous name. The theme is the one active when
    /// the score is recorded. Returns the entry and its rank, `None` if it
    /// did not make the top ten.
    pub async fn add_record(&self, name: &str, score: u64) -> (LeaderboardEntry, Option<usize>) {
        let theme = self.settings.theme().await;
        let entry = LeaderboardEntry::new(name, score, self.clock.now(), theme);

        // Held through the save so writes land in the order they were made.
        let mut board = self.board.lock().await;
        let rank = board.insert(entry.clone());
        tracing::info!(name = entry.name(), score, ?rank, "record added");

        if rank.is_some() {
            if let Err(err) = self.repo.save_records(board.entries()).await {
                tracing::error!(%err, "failed to persist records");
            }
        }
        (entry, rank)
    }

    /// Current board, highest score first.
    pub async fn list_records(&self) -> Vec<LeaderboardEntry> {
        self.board.lock().await.entries().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::{ANONYMOUS_NAME, LEADERBOARD_CAPACITY, Theme};
    use quiz_core::time::fixed_clock;
    use storage::repository::InMemoryRepository;

    async fn store(repo: &InMemoryRepository) -> RecordStore {
        let settings = Arc::new(SettingsService::load(Arc::new(repo.clone())).await);
        RecordStore::load(fixed_clock(), Arc::new(repo.clone()), settings).await
    }

    #[tokio::test]
    async fn records_sorted_and_capped() {
        let repo = InMemoryRepository::new();
        let store = store(&repo).await;
        for score in 1..=12_u64 {
            store.add_record(&format!("p{score}"), score * 1_000).await;
        }

        let records = store.list_records().await;
        assert_eq!(records.len(), LEADERBOARD_CAPACITY);
        assert_eq!(records[0].score(), 12_000);
        assert_eq!(records[9].score(), 3_000);
        assert_eq!(repo.load_records().await.unwrap(), records);
    }

    #[tokio::test]
    async fn blank_name_is_anonymous_and_names_are_trimmed() {
        let repo = InMemoryRepository::new();
        let store = store(&repo).await;
        let (blank, _) = store.add_record("   ", 500).await;
        let (padded, _) = store.add_record("  Ada ", 1_000).await;
        assert_eq!(blank.name(), ANONYMOUS_NAME);
        assert_eq!(padded.name(), "Ada");
    }

    #[tokio::test]
    async fn entry_carries_current_theme_and_clock() {
        let repo = InMemoryRepository::new();
        let settings = Arc::new(SettingsService::load(Arc::new(repo.clone())).await);
        settings.set_theme(Theme::Light).await;
        let store = RecordStore::load(fixed_clock(), Arc::new(repo.clone()), settings).await;

        let (entry, rank) = store.add_record("Ada", 5_000).await;
        assert_eq!(rank, Some(0));
        assert_eq!(entry.theme(), Theme::Light);
        assert_eq!(entry.recorded_at(), fixed_clock().now());
    }

    #[tokio::test]
    async fn failed_save_keeps_in_memory_board() {
        let repo = InMemoryRepository::new();
        let store = store(&repo).await;
        repo.set_fail_writes(true);

        store.add_record("Ada", 5_000).await;
        assert_eq!(store.list_records().await.len(), 1);
        assert!(repo.load_records().await.unwrap().is_empty());

        repo.set_fail_writes(false);
        store.add_record("Bob", 1_000).await;
        assert_eq!(repo.load_records().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn persisted_records_reload() {
        let repo = InMemoryRepository::new();
        store(&repo).await.add_record("Ada", 5_000).await;

        let reloaded = store(&repo).await;
        let records = reloaded.list_records().await;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name(), "Ada");
    }
}
