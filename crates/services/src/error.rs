//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::QuestionError;
use storage::repository::StorageError;
use storage::sqlite::SqliteInitError;

/// Why a single question set could not be loaded.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuestionLoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Invalid(#[from] QuestionError),
}

/// Errors emitted while bootstrapping the app context.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppContextError {
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
