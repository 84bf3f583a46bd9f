use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// The independently persisted pieces of a quiz session.
///
/// Each key maps to one JSON document; the names are the on-disk keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateKey {
    QuizSettings,
    Quiz,
    CurrentQuestion,
    QuizAnswers,
}

impl StateKey {
    pub const ALL: [StateKey; 4] = [
        StateKey::QuizSettings,
        StateKey::Quiz,
        StateKey::CurrentQuestion,
        StateKey::QuizAnswers,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StateKey::QuizSettings => "quizSettings",
            StateKey::Quiz => "quiz",
            StateKey::CurrentQuestion => "currentQuestion",
            StateKey::QuizAnswers => "quizAnswers",
        }
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Repository contract for keyed session state.
///
/// Values are opaque JSON text; decoding (and tolerating bad data) is the
/// caller's concern.
#[async_trait]
pub trait SessionStateRepository: Send + Sync {
    /// Fetch the raw value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be read.
    async fn load_state(&self, key: StateKey) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the value cannot be stored.
    async fn save_state(&self, key: StateKey, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the backend cannot be written.
    async fn clear_state(&self, key: StateKey) -> Result<(), StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    state: Arc<Mutex<HashMap<StateKey, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl SessionStateRepository for InMemoryRepository {
    async fn load_state(&self, key: StateKey) -> Result<Option<String>, StorageError> {
        let guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(&key).cloned())
    }

    async fn save_state(&self, key: StateKey, value: &str) -> Result<(), StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(key, value.to_owned());
        Ok(())
    }

    async fn clear_state(&self, key: StateKey) -> Result<(), StorageError> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&key);
        Ok(())
    }
}

/// Aggregates repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub session_state: Arc<dyn SessionStateRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let session_state: Arc<dyn SessionStateRepository> = Arc::new(InMemoryRepository::new());
        Self { session_state }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_keys_use_the_persisted_names() {
        let names: Vec<&str> = StateKey::ALL.iter().map(|key| key.as_str()).collect();
        assert_eq!(names, ["quizSettings", "quiz", "currentQuestion", "quizAnswers"]);
        assert_eq!(StateKey::CurrentQuestion.to_string(), "currentQuestion");
    }

    #[tokio::test]
    async fn keys_are_stored_independently() {
        let repo = InMemoryRepository::new();
        repo.save_state(StateKey::Quiz, "[]").await.unwrap();
        repo.save_state(StateKey::CurrentQuestion, "3").await.unwrap();
        repo.save_state(StateKey::CurrentQuestion, "4").await.unwrap();

        assert_eq!(repo.load_state(StateKey::Quiz).await.unwrap().as_deref(), Some("[]"));
        assert_eq!(
            repo.load_state(StateKey::CurrentQuestion).await.unwrap().as_deref(),
            Some("4")
        );
        assert_eq!(repo.load_state(StateKey::QuizAnswers).await.unwrap(), None);

        repo.clear_state(StateKey::Quiz).await.unwrap();
        assert_eq!(repo.load_state(StateKey::Quiz).await.unwrap(), None);
    }
}
