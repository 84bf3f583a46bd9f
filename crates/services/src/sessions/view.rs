use quiz_core::grader::GradeReport;
use quiz_core::model::{ActiveQuiz, AnswerRecord, Modality};

/// How one answer option should be shown in the review.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerMark {
    pub text: String,
    pub is_correct: bool,
    pub is_selected: bool,
}

/// Read-only review entry for one graded question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub index: usize,
    pub prompt: String,
    pub modality: Modality,
    pub is_correct: bool,
    pub marks: Vec<AnswerMark>,
}

pub(crate) fn build_review(
    quiz: &ActiveQuiz,
    answers: &AnswerRecord,
    report: &GradeReport,
) -> Vec<ReviewItem> {
    quiz.iter()
        .enumerate()
        .map(|(index, question)| {
            let given = answers.answer(index);
            let marks = question
                .answers()
                .iter()
                .enumerate()
                .map(|(pos, text)| AnswerMark {
                    text: text.clone(),
                    is_correct: question.key().contains(pos),
                    // Only an answer of the question's own shape marks anything.
                    is_selected: given.is_some_and(|answer| {
                        answer.modality() == question.modality() && answer.selects(pos)
                    }),
                })
                .collect();

            ReviewItem {
                index,
                prompt: question.prompt().to_owned(),
                modality: question.modality(),
                is_correct: report.is_correct(index).unwrap_or(false),
                marks,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::grader::grade;
    use quiz_core::model::Question;

    #[test]
    fn marks_key_and_selection_per_option() {
        let quiz = ActiveQuiz::new(vec![
            Question::single("one", ["a", "b", "c"], 1).unwrap(),
            Question::multi("many", ["a", "b", "c"], [0, 2]).unwrap(),
        ]);
        let mut answers = AnswerRecord::new();
        answers.record_single(&quiz, 0, 2).unwrap();
        answers.toggle_multi(&quiz, 1, 0).unwrap();
        answers.toggle_multi(&quiz, 1, 2).unwrap();
        let report = grade(&quiz, &answers);

        let review = build_review(&quiz, &answers, &report);
        assert_eq!(review.len(), 2);

        let first = &review[0];
        assert!(!first.is_correct);
        let flags: Vec<(bool, bool)> =
            first.marks.iter().map(|m| (m.is_correct, m.is_selected)).collect();
        assert_eq!(flags, [(false, false), (true, false), (false, true)]);

        let second = &review[1];
        assert!(second.is_correct);
        assert_eq!(second.modality, Modality::Multi);
        let flags: Vec<(bool, bool)> =
            second.marks.iter().map(|m| (m.is_correct, m.is_selected)).collect();
        assert_eq!(flags, [(true, true), (false, false), (true, true)]);
    }
}
