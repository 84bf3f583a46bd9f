//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::tracker::AnswerError;
use storage::catalog::CatalogLoadError;
use storage::sqlite::SqliteInitError;

/// Errors emitted by `QuizSession`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz already submitted")]
    Completed,
    #[error("{} question(s) still unanswered", missing.len())]
    Incomplete { missing: Vec<usize> },
    #[error(transparent)]
    Answer(#[from] AnswerError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Catalog(#[from] CatalogLoadError),
    #[error(transparent)]
    Sqlite(#[from] SqliteInitError),
}
