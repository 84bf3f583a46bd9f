use serde::Serialize;
use serde::de::DeserializeOwned;
use std::sync::Arc;

use quiz_core::model::{ActiveQuiz, AnswerRecord, QuizConfiguration};
use storage::repository::{SessionStateRepository, StateKey};

/// What a previous process left behind. Each field is independent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoredSession {
    pub config: Option<QuizConfiguration>,
    pub quiz: Option<ActiveQuiz>,
    pub position: Option<usize>,
    pub answers: Option<AnswerRecord>,
}

/// Typed, best-effort persistence for session state.
///
/// Reads treat missing or undecodable records as absent. Writes never fail
/// the caller: a failed write is logged and the next change overwrites it.
#[derive(Clone)]
pub struct SessionStore {
    repo: Arc<dyn SessionStateRepository>,
}

impl SessionStore {
    #[must_use]
    pub fn new(repo: Arc<dyn SessionStateRepository>) -> Self {
        Self { repo }
    }

    pub async fn restore(&self) -> RestoredSession {
        RestoredSession {
            config: self.load(StateKey::QuizSettings).await,
            quiz: self.load(StateKey::Quiz).await,
            position: self.load(StateKey::CurrentQuestion).await,
            answers: self.load(StateKey::QuizAnswers).await,
        }
    }

    pub async fn save(
        &self,
        config: &QuizConfiguration,
        quiz: &ActiveQuiz,
        position: usize,
        answers: &AnswerRecord,
    ) {
        self.save_config(config).await;
        self.save_quiz(quiz).await;
        self.save_position(position).await;
        self.save_answers(answers).await;
    }

    pub async fn save_config(&self, config: &QuizConfiguration) {
        self.write(StateKey::QuizSettings, config).await;
    }

    pub async fn save_quiz(&self, quiz: &ActiveQuiz) {
        self.write(StateKey::Quiz, quiz).await;
    }

    pub async fn save_position(&self, position: usize) {
        self.write(StateKey::CurrentQuestion, &position).await;
    }

    pub async fn save_answers(&self, answers: &AnswerRecord) {
        self.write(StateKey::QuizAnswers, answers).await;
    }

    /// Forget every stored record.
    pub async fn clear(&self) {
        for key in StateKey::ALL {
            if let Err(err) = self.repo.clear_state(key).await {
                tracing::warn!(key = %key, error = %err, "failed to clear session state");
            }
        }
    }

    async fn load<T: DeserializeOwned>(&self, key: StateKey) -> Option<T> {
        let raw = match self.repo.load_state(key).await {
            Ok(raw) => raw?,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to read session state");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "ignoring undecodable session state");
                None
            }
        }
    }

    async fn write<T: Serialize + ?Sized>(&self, key: StateKey, value: &T) {
        let raw = match serde_json::to_string(value) {
            Ok(raw) => raw,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to encode session state");
                return;
            }
        };
        if let Err(err) = self.repo.save_state(key, &raw).await {
            tracing::warn!(key = %key, error = %err, "failed to persist session state");
        }
    }
}
