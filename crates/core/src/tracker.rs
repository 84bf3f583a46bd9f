//! Answer tracking for the active quiz.
//!
//! The tracker is the only writer of [`AnswerRecord`] entries. Every write is
//! checked against the question's modality so a single-select question never
//! holds a set and a multi-select question never holds a bare index.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::model::{ActiveQuiz, Answer, AnswerRecord, Modality, Question};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AnswerError {
    #[error("question {index} does not exist (quiz has {len} questions)")]
    QuestionOutOfRange { index: usize, len: usize },

    #[error("answer {index} does not exist (question has {len} answers)")]
    AnswerOutOfRange { index: usize, len: usize },

    #[error("question {index} is {actual:?}-select")]
    ModalityMismatch { index: usize, actual: Modality },
}

impl AnswerRecord {
    /// Record the chosen answer of a single-select question.
    ///
    /// Last write wins.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if either index is out of range or the question is
    /// multi-select. The record is left untouched on error.
    pub fn record_single(
        &mut self,
        quiz: &ActiveQuiz,
        question_index: usize,
        answer_index: usize,
    ) -> Result<(), AnswerError> {
        checked_question(quiz, question_index, answer_index, Modality::Single)?;
        self.set(question_index, Answer::Single(answer_index));
        Ok(())
    }

    /// Flip one answer of a multi-select question in or out of its selection.
    ///
    /// A question without an entry starts from the empty set.
    ///
    /// # Errors
    ///
    /// Returns `AnswerError` if either index is out of range or the question is
    /// single-select. The record is left untouched on error.
    pub fn toggle_multi(
        &mut self,
        quiz: &ActiveQuiz,
        question_index: usize,
        answer_index: usize,
    ) -> Result<(), AnswerError> {
        checked_question(quiz, question_index, answer_index, Modality::Multi)?;

        // A stale bare index (from an older persisted record) counts as nothing selected.
        let mut selected = match self.answer(question_index) {
            Some(Answer::Multi(set)) => set.clone(),
            _ => BTreeSet::new(),
        };
        if !selected.remove(&answer_index) {
            selected.insert(answer_index);
        }
        self.set(question_index, Answer::Multi(selected));
        Ok(())
    }

    /// True iff every question in `[0, len)` has an entry.
    ///
    /// An empty multi-select set is an entry and counts as answered.
    #[must_use]
    pub fn all_answered(&self, len: usize) -> bool {
        (0..len).all(|index| self.is_answered(index))
    }

    /// Indices in `[0, len)` that have no entry yet.
    #[must_use]
    pub fn unanswered(&self, len: usize) -> Vec<usize> {
        (0..len).filter(|&index| !self.is_answered(index)).collect()
    }

    /// Drop entries that fall outside `quiz` or whose shape does not match
    /// their question. Returns how many entries were dropped.
    pub fn retain_consistent(&mut self, quiz: &ActiveQuiz) -> usize {
        let before = self.answered_count();
        self.truncate(quiz.len());
        for (index, question) in quiz.iter().enumerate() {
            let consistent = self
                .answer(index)
                .is_none_or(|answer| answer_fits(question, answer));
            if !consistent {
                self.remove(index);
            }
        }
        before - self.answered_count()
    }
}

fn checked_question(
    quiz: &ActiveQuiz,
    question_index: usize,
    answer_index: usize,
    expected: Modality,
) -> Result<&Question, AnswerError> {
    let question = quiz
        .get(question_index)
        .ok_or(AnswerError::QuestionOutOfRange {
            index: question_index,
            len: quiz.len(),
        })?;
    if question.modality() != expected {
        return Err(AnswerError::ModalityMismatch {
            index: question_index,
            actual: question.modality(),
        });
    }
    if answer_index >= question.answers().len() {
        return Err(AnswerError::AnswerOutOfRange {
            index: answer_index,
            len: question.answers().len(),
        });
    }
    Ok(question)
}

fn answer_fits(question: &Question, answer: &Answer) -> bool {
    let len = question.answers().len();
    answer.modality() == question.modality()
        && match answer {
            Answer::Single(index) => *index < len,
            Answer::Multi(set) => set.iter().all(|index| *index < len),
        }
}
