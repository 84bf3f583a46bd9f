use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::question::Modality;

/// A test-taker's stored answer for one question.
///
/// The variant mirrors the question's modality: a single chosen index, or the
/// set of checked indices. On the wire these are a number and an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Single(usize),
    Multi(BTreeSet<usize>),
}

impl Answer {
    #[must_use]
    pub fn modality(&self) -> Modality {
        match self {
            Answer::Single(_) => Modality::Single,
            Answer::Multi(_) => Modality::Multi,
        }
    }

    /// Returns true if `answer_index` is selected by this answer.
    #[must_use]
    pub fn selects(&self, answer_index: usize) -> bool {
        match self {
            Answer::Single(index) => *index == answer_index,
            Answer::Multi(set) => set.contains(&answer_index),
        }
    }
}

/// Answers indexed by question position.
///
/// Absent entries mean "unanswered". Persisted as a JSON array with `null`
/// holes, so a record written for a longer quiz still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerRecord {
    entries: Vec<Option<Answer>>,
}

impl AnswerRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn from_entries(entries: Vec<Option<Answer>>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[Option<Answer>] {
        &self.entries
    }

    /// Stored answer at `question_index`, if any.
    #[must_use]
    pub fn answer(&self, question_index: usize) -> Option<&Answer> {
        self.entries.get(question_index).and_then(Option::as_ref)
    }

    #[must_use]
    pub fn is_answered(&self, question_index: usize) -> bool {
        self.answer(question_index).is_some()
    }

    /// Number of defined entries.
    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_some()).count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.answered_count() == 0
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn set(&mut self, question_index: usize, answer: Answer) {
        if self.entries.len() <= question_index {
            self.entries.resize(question_index + 1, None);
        }
        self.entries[question_index] = Some(answer);
    }

    /// Drop the entry at `question_index`, leaving it unanswered.
    pub(crate) fn remove(&mut self, question_index: usize) {
        if let Some(entry) = self.entries.get_mut(question_index) {
            *entry = None;
        }
    }

    /// Drop entries at or beyond `len`.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }
}
