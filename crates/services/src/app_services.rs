use std::path::Path;
use std::sync::Arc;

use quiz_core::model::QuestionCatalog;
use storage::catalog::load_catalog_dir;
use storage::repository::Storage;

use crate::error::AppServicesError;
use crate::sessions::{QuizBuilder, QuizSession, SessionStore, ShuffleSource};

/// Assembles the catalog, storage and session services for the app.
#[derive(Clone)]
pub struct AppServices {
    catalog: Arc<QuestionCatalog>,
    storage: Storage,
    persistent: bool,
    shuffle: ShuffleSource,
}

impl AppServices {
    /// Services over an already loaded catalog and storage backend.
    #[must_use]
    pub fn new(catalog: Arc<QuestionCatalog>, storage: Storage) -> Self {
        Self {
            catalog,
            storage,
            persistent: false,
            shuffle: ShuffleSource::default(),
        }
    }

    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be loaded or storage
    /// initialization fails.
    pub async fn new_sqlite(catalog_dir: &Path, db_url: &str) -> Result<Self, AppServicesError> {
        let catalog = load_catalog_dir(catalog_dir)?;
        let storage = Storage::sqlite(db_url).await?;
        let mut services = Self::new(Arc::new(catalog), storage);
        services.persistent = true;
        Ok(services)
    }

    /// Build services whose session state lives only as long as the process.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the catalog cannot be loaded.
    pub fn new_in_memory(catalog_dir: &Path) -> Result<Self, AppServicesError> {
        let catalog = load_catalog_dir(catalog_dir)?;
        Ok(Self::new(Arc::new(catalog), Storage::in_memory()))
    }

    #[must_use]
    pub fn with_shuffle_source(mut self, shuffle: ShuffleSource) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<QuestionCatalog> {
        Arc::clone(&self.catalog)
    }

    /// True when session state survives a restart.
    #[must_use]
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    #[must_use]
    pub fn session_store(&self) -> SessionStore {
        SessionStore::new(Arc::clone(&self.storage.session_state))
    }

    /// Restore the stored session or start a fresh one.
    pub async fn start_session(&self) -> QuizSession {
        let builder = QuizBuilder::new(self.catalog()).with_shuffle_source(self.shuffle.clone());
        QuizSession::start(builder, self.session_store()).await
    }
}
