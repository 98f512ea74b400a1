#![forbid(unsafe_code)]

pub mod app_context;
pub mod config;
pub mod error;
pub mod game;
pub mod host;
pub mod record_store;
pub mod settings_service;
pub mod transitions;

pub use quiz_core::Clock;

pub use app_context::AppContext;
pub use config::{AppConfig, TransitionDelays};
pub use error::{AppContextError, QuestionLoadError};
pub use game::{
    AnswerOutcome, GameController, GameEvent, PoseOutcome, ProgressionEngine, QuestionRepository,
};
pub use host::{GameHost, MenuAction, dispatch};
pub use record_store::RecordStore;
pub use settings_service::SettingsService;
pub use transitions::{TransitionScheduler, TransitionToken};
