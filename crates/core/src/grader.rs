//! Grading of a submitted quiz.

use crate::model::{ActiveQuiz, Answer, AnswerKey, AnswerRecord};

/// Outcome of grading one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeReport {
    results: Vec<bool>,
    score: usize,
    percentage: u32,
}

impl GradeReport {
    /// Per-question correctness, in quiz order.
    #[must_use]
    pub fn results(&self) -> &[bool] {
        &self.results
    }

    #[must_use]
    pub fn is_correct(&self, question_index: usize) -> Option<bool> {
        self.results.get(question_index).copied()
    }

    /// Number of correct questions.
    #[must_use]
    pub fn score(&self) -> usize {
        self.score
    }

    /// Number of graded questions.
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// `round(100 * score / total)`, halves rounding up; 0 for an empty quiz.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        self.percentage
    }
}

/// Grade `answers` against the keys of `quiz`.
///
/// Multi-select questions need the exact key set (order and duplicates are
/// irrelevant); single-select questions need the exact index. A missing or
/// wrongly shaped answer is simply incorrect.
#[must_use]
pub fn grade(quiz: &ActiveQuiz, answers: &AnswerRecord) -> GradeReport {
    let results: Vec<bool> = quiz
        .iter()
        .enumerate()
        .map(|(index, question)| is_correct(question.key(), answers.answer(index)))
        .collect();
    let score = results.iter().filter(|correct| **correct).count();

    GradeReport {
        percentage: percentage(score, results.len()),
        results,
        score,
    }
}

fn is_correct(key: &AnswerKey, answer: Option<&Answer>) -> bool {
    match (key, answer) {
        (AnswerKey::Single(expected), Some(Answer::Single(given))) => expected == given,
        (AnswerKey::Multi(expected), Some(Answer::Multi(given))) => expected == given,
        _ => false,
    }
}

fn percentage(score: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (score.saturating_mul(200) + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Question;
    use std::collections::BTreeSet;

    fn multi_quiz() -> ActiveQuiz {
        ActiveQuiz::new(vec![
            Question::multi("pick", ["a", "b", "c", "d"], [0, 2]).unwrap(),
        ])
    }

    #[test]
    fn multi_select_is_order_independent() {
        let answers: AnswerRecord = serde_json::from_str("[[2,0]]").unwrap();
        let report = grade(&multi_quiz(), &answers);
        assert_eq!(report.results(), &[true]);
    }

    #[test]
    fn multi_select_needs_the_whole_set() {
        let answers = AnswerRecord::from_entries(vec![Some(Answer::Multi(BTreeSet::from([0])))]);
        assert_eq!(grade(&multi_quiz(), &answers).results(), &[false]);

        let answers = AnswerRecord::from_entries(vec![Some(Answer::Multi(BTreeSet::from([0, 1, 2])))]);
        assert_eq!(grade(&multi_quiz(), &answers).results(), &[false]);
    }

    #[test]
    fn duplicate_selections_collapse_to_a_set() {
        let answers: AnswerRecord = serde_json::from_str("[[0,2,2]]").unwrap();
        assert_eq!(grade(&multi_quiz(), &answers).results(), &[true]);
    }

    #[test]
    fn shape_mismatch_is_incorrect() {
        let quiz = ActiveQuiz::new(vec![
            Question::single("one", ["a", "b"], 0).unwrap(),
            Question::multi("many", ["a", "b"], [0]).unwrap(),
        ]);
        let answers = AnswerRecord::from_entries(vec![
            Some(Answer::Multi(BTreeSet::from([0]))),
            Some(Answer::Single(0)),
        ]);
        let report = grade(&quiz, &answers);
        assert_eq!(report.results(), &[false, false]);
        assert_eq!(report.score(), 0);
    }

    #[test]
    fn absent_answers_are_incorrect() {
        let report = grade(&multi_quiz(), &AnswerRecord::new());
        assert_eq!(report.results(), &[false]);
    }

    #[test]
    fn empty_quiz_scores_zero_percent() {
        let report = grade(&ActiveQuiz::default(), &AnswerRecord::new());
        assert_eq!(report.total(), 0);
        assert_eq!(report.percentage(), 0);
    }

    #[test]
    fn percentage_rounds_half_up() {
        assert_eq!(percentage(1, 2), 50);
        assert_eq!(percentage(1, 3), 33);
        assert_eq!(percentage(2, 3), 67);
        assert_eq!(percentage(1, 8), 13);
        assert_eq!(percentage(3, 3), 100);
    }

    #[test]
    fn grading_is_repeatable() {
        let quiz = multi_quiz();
        let answers: AnswerRecord = serde_json::from_str("[[0,2]]").unwrap();
        assert_eq!(grade(&quiz, &answers), grade(&quiz, &answers));
    }
}
