/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizProgress {
    pub position: usize,
    pub total: usize,
    pub answered: usize,
    pub all_answered: bool,
    pub is_complete: bool,
}

impl QuizProgress {
    /// True when the current question is the last one.
    #[must_use]
    pub fn on_last_question(&self) -> bool {
        self.total > 0 && self.position + 1 == self.total
    }
}
