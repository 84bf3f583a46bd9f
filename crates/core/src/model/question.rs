use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question must offer at least one answer")]
    NoAnswers,

    #[error("correct answer index {index} is out of range for {len} answers")]
    KeyOutOfRange { index: usize, len: usize },
}

//
// ─── ANSWER KEY ────────────────────────────────────────────────────────────────
//

/// Whether a question expects exactly one answer or any number of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Single,
    Multi,
}

/// The correct answer of a question.
///
/// On the wire a bare number is a single-select key and an array of numbers is
/// a multi-select key. Duplicate indices in a multi-select key collapse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnswerKey {
    Single(usize),
    Multi(BTreeSet<usize>),
}

impl AnswerKey {
    #[must_use]
    pub fn modality(&self) -> Modality {
        match self {
            AnswerKey::Single(_) => Modality::Single,
            AnswerKey::Multi(_) => Modality::Multi,
        }
    }

    /// Returns true if `answer_index` is part of the key.
    #[must_use]
    pub fn contains(&self, answer_index: usize) -> bool {
        match self {
            AnswerKey::Single(index) => *index == answer_index,
            AnswerKey::Multi(set) => set.contains(&answer_index),
        }
    }

    fn max_index(&self) -> Option<usize> {
        match self {
            AnswerKey::Single(index) => Some(*index),
            AnswerKey::Multi(set) => set.last().copied(),
        }
    }
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// Wire shape of a question, before validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QuestionRecord {
    question: String,
    answers: Vec<String>,
    correct_answer: AnswerKey,
}

/// A catalog question. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "QuestionRecord", into = "QuestionRecord")]
pub struct Question {
    prompt: String,
    answers: Vec<String>,
    key: AnswerKey,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError::NoAnswers` if `answers` is empty, or
    /// `QuestionError::KeyOutOfRange` if the key addresses a missing answer.
    pub fn new(
        prompt: impl Into<String>,
        answers: Vec<String>,
        key: AnswerKey,
    ) -> Result<Self, QuestionError> {
        if answers.is_empty() {
            return Err(QuestionError::NoAnswers);
        }
        if let Some(index) = key.max_index() {
            if index >= answers.len() {
                return Err(QuestionError::KeyOutOfRange {
                    index,
                    len: answers.len(),
                });
            }
        }

        Ok(Self {
            prompt: prompt.into(),
            answers,
            key,
        })
    }

    /// Convenience constructor for a single-select question.
    ///
    /// # Errors
    ///
    /// Same as [`Question::new`].
    pub fn single<S: Into<String>>(
        prompt: impl Into<String>,
        answers: impl IntoIterator<Item = S>,
        correct: usize,
    ) -> Result<Self, QuestionError> {
        let answers = answers.into_iter().map(Into::into).collect();
        Self::new(prompt, answers, AnswerKey::Single(correct))
    }

    /// Convenience constructor for a multi-select question.
    ///
    /// # Errors
    ///
    /// Same as [`Question::new`].
    pub fn multi<S: Into<String>>(
        prompt: impl Into<String>,
        answers: impl IntoIterator<Item = S>,
        correct: impl IntoIterator<Item = usize>,
    ) -> Result<Self, QuestionError> {
        let answers = answers.into_iter().map(Into::into).collect();
        Self::new(prompt, answers, AnswerKey::Multi(correct.into_iter().collect()))
    }

    #[must_use]
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    #[must_use]
    pub fn answers(&self) -> &[String] {
        &self.answers
    }

    #[must_use]
    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    #[must_use]
    pub fn modality(&self) -> Modality {
        self.key.modality()
    }
}

impl TryFrom<QuestionRecord> for Question {
    type Error = QuestionError;

    fn try_from(record: QuestionRecord) -> Result<Self, Self::Error> {
        Self::new(record.question, record.answers, record.correct_answer)
    }
}

impl From<Question> for QuestionRecord {
    fn from(question: Question) -> Self {
        Self {
            question: question.prompt,
            answers: question.answers,
            correct_answer: question.key,
        }
    }
}
