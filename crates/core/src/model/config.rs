use serde::{Deserialize, Serialize};

use crate::model::catalog::QuestionCatalog;
use crate::model::ids::SourceKey;

/// Question count used when no configuration has been stored yet.
pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// Which sources feed the quiz and how many questions to draw.
///
/// `source_keys` keeps selection order and never holds duplicates. The
/// requested count is kept as entered; the builder clamps it to what the
/// selected sources can supply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "ConfigurationRecord")]
#[serde(rename_all = "camelCase")]
pub struct QuizConfiguration {
    #[serde(rename = "quizKeys")]
    source_keys: Vec<SourceKey>,
    question_count: usize,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigurationRecord {
    quiz_keys: Vec<SourceKey>,
    question_count: usize,
}

impl From<ConfigurationRecord> for QuizConfiguration {
    fn from(record: ConfigurationRecord) -> Self {
        Self::new(record.quiz_keys, record.question_count)
    }
}

impl QuizConfiguration {
    #[must_use]
    pub fn new(source_keys: impl IntoIterator<Item = SourceKey>, question_count: usize) -> Self {
        Self {
            source_keys: dedup_in_order(source_keys),
            question_count,
        }
    }

    /// Every catalog source, in catalog order, with the default count.
    #[must_use]
    pub fn defaults_for(catalog: &QuestionCatalog) -> Self {
        Self::new(catalog.keys().cloned(), DEFAULT_QUESTION_COUNT)
    }

    #[must_use]
    pub fn source_keys(&self) -> &[SourceKey] {
        &self.source_keys
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.question_count
    }

    #[must_use]
    pub fn with_source_keys(mut self, source_keys: impl IntoIterator<Item = SourceKey>) -> Self {
        self.source_keys = dedup_in_order(source_keys);
        self
    }

    #[must_use]
    pub fn with_question_count(mut self, question_count: usize) -> Self {
        self.question_count = question_count;
        self
    }
}

fn dedup_in_order(keys: impl IntoIterator<Item = SourceKey>) -> Vec<SourceKey> {
    let mut out: Vec<SourceKey> = Vec::new();
    for key in keys {
        if !out.contains(&key) {
            out.push(key);
        }
    }
    out
}
