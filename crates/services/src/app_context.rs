use std::sync::Arc;

use storage::repository::{Storage, StorageError};

use crate::Clock;
use crate::config::AppConfig;
use crate::error::AppContextError;
use crate::game::{GameController, ProgressionEngine, QuestionRepository};
use crate::record_store::RecordStore;
use crate::settings_service::SettingsService;

/// Everything the app needs, built once at startup and passed down.
pub struct AppContext {
    config: AppConfig,
    settings: Arc<SettingsService>,
    records: Arc<RecordStore>,
    game: GameController,
}

impl AppContext {
    /// Open storage as configured and load settings, records and questions.
    ///
    /// Records and settings go to `SQLite` when `db_url` is set, JSON files
    /// under `data_dir` otherwise. Question sets are always read from
    /// `<data_dir>/questions`.
    ///
    /// # Errors
    ///
    /// Returns `AppContextError` if the data directory cannot be created or
    /// the database cannot be opened and migrated.
    pub async fn open(config: AppConfig, clock: Clock) -> Result<Self, AppContextError> {
        tokio::fs::create_dir_all(&config.data_dir)
            .await
            .map_err(StorageError::from)?;

        let storage = match &config.db_url {
            Some(url) => {
                tracing::info!(%url, "using sqlite storage");
                Storage::sqlite(url, config.questions_dir()).await?
            }
            None => {
                tracing::info!(dir = %config.data_dir.display(), "using json storage");
                Storage::json(&config.data_dir)
            }
        };
        Ok(Self::from_storage(storage, config, clock).await)
    }

    /// Build on already opened storage.
    pub async fn from_storage(storage: Storage, config: AppConfig, clock: Clock) -> Self {
        let settings = Arc::new(SettingsService::load(Arc::clone(&storage.settings)).await);
        let records = Arc::new(
            RecordStore::load(clock, Arc::clone(&storage.records), Arc::clone(&settings)).await,
        );

        let questions = QuestionRepository::load(storage.questions.as_ref(), config.set_count);
        if questions.is_empty() {
            tracing::error!(
                dir = %config.questions_dir().display(),
                "no question sets could be loaded"
            );
        }
        let engine = match config.seed {
            Some(seed) => ProgressionEngine::with_seed(questions, seed),
            None => ProgressionEngine::new(questions),
        };
        let game = GameController::new(engine, config.delays);

        Self {
            config,
            settings,
            records,
            game,
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    #[must_use]
    pub fn settings(&self) -> Arc<SettingsService> {
        Arc::clone(&self.settings)
    }

    #[must_use]
    pub fn records(&self) -> Arc<RecordStore> {
        Arc::clone(&self.records)
    }

    #[must_use]
    pub fn game(&self) -> &GameController {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut GameController {
        &mut self.game
    }
}
