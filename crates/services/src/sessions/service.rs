use quiz_core::grader::{GradeReport, grade};
use quiz_core::model::{
    ActiveQuiz, AnswerRecord, Modality, Question, QuizConfiguration, SourceKey,
};

use super::plan::QuizBuilder;
use super::progress::QuizProgress;
use super::store::{RestoredSession, SessionStore};
use super::view::{ReviewItem, build_review};
use crate::error::SessionError;

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// The state of one test-taker's quiz, with write-through persistence.
///
/// Every mutation goes through this type: it rebuilds the quiz via
/// `QuizBuilder`, records answers through the tracker, grades on submit and
/// writes each changed field to the `SessionStore` right away.
pub struct QuizSession {
    builder: QuizBuilder,
    store: SessionStore,
    config: QuizConfiguration,
    quiz: ActiveQuiz,
    position: usize,
    answers: AnswerRecord,
    report: Option<GradeReport>,
}

impl QuizSession {
    /// Restore the previous session, or build a fresh quiz when none was stored.
    ///
    /// A stored quiz is used verbatim. Without one, the restored (or default)
    /// configuration is built with shuffling and the new state is persisted.
    /// Restored values themselves are not written back.
    pub async fn start(builder: QuizBuilder, store: SessionStore) -> Self {
        let restored = store.restore().await;
        Self::from_restored(builder, store, restored).await
    }

    async fn from_restored(
        mut builder: QuizBuilder,
        store: SessionStore,
        restored: RestoredSession,
    ) -> Self {
        let RestoredSession {
            config,
            quiz,
            position,
            answers,
        } = restored;
        let config = config.unwrap_or_else(|| QuizConfiguration::defaults_for(builder.catalog()));

        let Some(quiz) = quiz else {
            let quiz = builder.build(&config, true);
            tracing::debug!(questions = quiz.len(), "no stored quiz; built a fresh one");
            let session = Self {
                builder,
                store,
                config,
                quiz,
                position: 0,
                answers: AnswerRecord::new(),
                report: None,
            };
            session.persist_quiz_state().await;
            return session;
        };

        let mut answers = answers.unwrap_or_default();
        let dropped = answers.retain_consistent(&quiz);
        if dropped > 0 {
            tracing::warn!(dropped, "dropped restored answers that do not fit the quiz");
        }
        let position = clamp_position(position.unwrap_or(0), quiz.len());
        tracing::debug!(
            questions = quiz.len(),
            position,
            answered = answers.answered_count(),
            "restored stored quiz"
        );

        Self {
            builder,
            store,
            config,
            quiz,
            position,
            answers,
            report: None,
        }
    }

    //
    // ─── READ ACCESS ───────────────────────────────────────────────────────────
    //

    #[must_use]
    pub fn config(&self) -> &QuizConfiguration {
        &self.config
    }

    #[must_use]
    pub fn quiz(&self) -> &ActiveQuiz {
        &self.quiz
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerRecord {
        &self.answers
    }

    /// Grading outcome of the last submission, if the quiz is completed.
    #[must_use]
    pub fn report(&self) -> Option<&GradeReport> {
        self.report.as_ref()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.report.is_some()
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.get(self.position)
    }

    #[must_use]
    pub fn all_answered(&self) -> bool {
        self.answers.all_answered(self.quiz.len())
    }

    /// Questions the configured sources can supply.
    #[must_use]
    pub fn total_available(&self) -> usize {
        self.builder.total_available(&self.config)
    }

    #[must_use]
    pub fn progress(&self) -> QuizProgress {
        QuizProgress {
            position: self.position,
            total: self.quiz.len(),
            answered: self.answers.answered_count(),
            all_answered: self.all_answered(),
            is_complete: self.is_complete(),
        }
    }

    /// Per-question review after submission; `None` before.
    #[must_use]
    pub fn review(&self) -> Option<Vec<ReviewItem>> {
        self.report
            .as_ref()
            .map(|report| build_review(&self.quiz, &self.answers, report))
    }

    //
    // ─── CONFIGURATION ─────────────────────────────────────────────────────────
    //

    /// Switch to a new source selection and rebuild with a fresh shuffle.
    ///
    /// Keys the catalog does not know are kept but contribute no questions.
    pub async fn select_sources(&mut self, keys: impl IntoIterator<Item = SourceKey>) {
        let config = self.config.clone().with_source_keys(keys);
        for key in config.source_keys() {
            if !self.builder.catalog().contains(key) {
                tracing::warn!(source = %key, "selected source is not in the catalog");
            }
        }
        self.rebuild(config, true).await;
    }

    /// Change how many questions to draw; keeps the current source order.
    pub async fn set_question_count(&mut self, count: usize) {
        let config = self.config.clone().with_question_count(count);
        self.rebuild(config, false).await;
    }

    /// Draw a new random quiz from the current configuration.
    pub async fn shuffle(&mut self) {
        let config = self.config.clone();
        self.rebuild(config, true).await;
    }

    /// Take every available question of the selected sources, unshuffled.
    pub async fn show_all(&mut self) {
        let total = self.total_available();
        let config = self.config.clone().with_question_count(total);
        self.rebuild(config, false).await;
    }

    /// Forget everything stored and begin again as on a first launch: default
    /// configuration, a freshly shuffled quiz and no answers.
    pub async fn start_over(&mut self) {
        self.store.clear().await;
        self.config = QuizConfiguration::defaults_for(self.builder.catalog());
        self.quiz = self.builder.build(&self.config, true);
        self.answers.clear();
        self.report = None;
        self.position = 0;
        self.persist_quiz_state().await;
    }

    async fn rebuild(&mut self, config: QuizConfiguration, shuffle: bool) {
        self.quiz = self.builder.build(&config, shuffle);
        self.answers.clear();
        self.report = None;
        self.position = 0;
        if config != self.config {
            self.config = config;
            self.store.save_config(&self.config).await;
        }
        self.persist_quiz_state().await;
    }

    async fn persist_quiz_state(&self) {
        self.store.save_quiz(&self.quiz).await;
        self.store.save_position(self.position).await;
        self.store.save_answers(&self.answers).await;
    }

    //
    // ─── ANSWERS ───────────────────────────────────────────────────────────────
    //

    /// Record the answer of a single-select question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission, or
    /// `SessionError::Answer` if the tracker rejects the write.
    pub async fn record_single(
        &mut self,
        question_index: usize,
        answer_index: usize,
    ) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.answers
            .record_single(&self.quiz, question_index, answer_index)?;
        self.store.save_answers(&self.answers).await;
        Ok(())
    }

    /// Toggle one choice of a multi-select question.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission, or
    /// `SessionError::Answer` if the tracker rejects the write.
    pub async fn toggle_multi(
        &mut self,
        question_index: usize,
        answer_index: usize,
    ) -> Result<(), SessionError> {
        self.ensure_open()?;
        self.answers
            .toggle_multi(&self.quiz, question_index, answer_index)?;
        self.store.save_answers(&self.answers).await;
        Ok(())
    }

    /// Pick `answer_index` on the current question: a single-select question
    /// records it, a multi-select question toggles it.
    ///
    /// # Errors
    ///
    /// Same as [`QuizSession::record_single`] and [`QuizSession::toggle_multi`].
    pub async fn choose(&mut self, answer_index: usize) -> Result<(), SessionError> {
        let position = self.position;
        match self.current_question().map(Question::modality) {
            Some(Modality::Multi) => self.toggle_multi(position, answer_index).await,
            _ => self.record_single(position, answer_index).await,
        }
    }

    fn ensure_open(&self) -> Result<(), SessionError> {
        if self.is_complete() {
            return Err(SessionError::Completed);
        }
        Ok(())
    }

    //
    // ─── NAVIGATION ────────────────────────────────────────────────────────────
    //

    /// Move to `index` if it addresses a question; returns whether it did.
    pub async fn navigate(&mut self, index: usize) -> bool {
        if index >= self.quiz.len() {
            return false;
        }
        if index != self.position {
            self.position = index;
            self.store.save_position(self.position).await;
        }
        true
    }

    pub async fn next(&mut self) -> bool {
        self.navigate(self.position.saturating_add(1)).await
    }

    pub async fn previous(&mut self) -> bool {
        match self.position.checked_sub(1) {
            Some(index) => self.navigate(index).await,
            None => false,
        }
    }

    //
    // ─── SUBMISSION ────────────────────────────────────────────────────────────
    //

    /// Grade the quiz once every question has an answer.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Incomplete` listing unanswered questions, or
    /// `SessionError::Completed` if the quiz was already submitted.
    pub async fn submit(&mut self) -> Result<&GradeReport, SessionError> {
        self.ensure_open()?;
        let missing = self.answers.unanswered(self.quiz.len());
        if !missing.is_empty() {
            return Err(SessionError::Incomplete { missing });
        }

        let report = grade(&self.quiz, &self.answers);
        tracing::info!(
            score = report.score(),
            total = report.total(),
            percentage = report.percentage(),
            "quiz submitted"
        );
        Ok(self.report.insert(report))
    }

    /// Clear answers and results to take the same quiz again.
    pub async fn reset(&mut self) {
        self.answers.clear();
        self.report = None;
        self.store.save_answers(&self.answers).await;
    }
}

fn clamp_position(position: usize, len: usize) -> usize {
    position.min(len.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::QuestionCatalog;
    use std::sync::Arc;
    use storage::repository::InMemoryRepository;

    use crate::sessions::ShuffleSource;

    fn catalog() -> Arc<QuestionCatalog> {
        let single = (0..4)
            .map(|i| Question::single(format!("s{i}"), ["a", "b", "c"], i % 3).unwrap())
            .collect();
        let multi = vec![Question::multi("m0", ["a", "b", "c"], [1, 2]).unwrap()];
        Arc::new(QuestionCatalog::new([
            (SourceKey::from("single"), single),
            (SourceKey::from("multi"), multi),
        ]))
    }

    async fn session() -> QuizSession {
        let builder = QuizBuilder::new(catalog()).with_shuffle_source(ShuffleSource::seeded(1));
        let store = SessionStore::new(Arc::new(InMemoryRepository::new()));
        QuizSession::start(builder, store).await
    }

    #[tokio::test]
    async fn fresh_start_uses_defaults() {
        let session = session().await;
        assert_eq!(session.config().source_keys().len(), 2);
        assert_eq!(session.config().question_count(), 5);
        assert_eq!(session.quiz().len(), 5);
        assert_eq!(session.position(), 0);
        assert!(session.answers().is_empty());
    }

    #[tokio::test]
    async fn navigation_stays_in_bounds() {
        let mut session = session().await;
        assert!(!session.previous().await);
        assert!(session.navigate(4).await);
        assert!(!session.next().await);
        assert!(!session.navigate(5).await);
        assert_eq!(session.position(), 4);
        assert!(session.progress().on_last_question());
    }

    #[tokio::test]
    async fn submit_requires_every_answer() {
        let mut session = session().await;
        session.set_question_count(2).await;
        session.select_sources([SourceKey::from("single")]).await;
        session.set_question_count(2).await;
        session.record_single(0, 0).await.unwrap();

        match session.submit().await {
            Err(SessionError::Incomplete { missing }) => assert_eq!(missing, vec![1]),
            other => panic!("unexpected submit outcome: {other:?}"),
        }
        assert!(!session.is_complete());
    }

    #[tokio::test]
    async fn answers_are_frozen_after_submit_until_reset() {
        let mut session = session().await;
        session.select_sources([SourceKey::from("single")]).await;
        session.set_question_count(1).await;
        session.record_single(0, 0).await.unwrap();
        session.submit().await.unwrap();

        assert!(matches!(session.record_single(0, 1).await, Err(SessionError::Completed)));
        assert!(matches!(session.submit().await, Err(SessionError::Completed)));

        session.reset().await;
        assert!(!session.is_complete());
        assert!(session.answers().is_empty());
        session.record_single(0, 1).await.unwrap();
    }

    #[tokio::test]
    async fn start_over_returns_to_defaults() {
        let mut session = session().await;
        session.select_sources([SourceKey::from("multi")]).await;
        session.toggle_multi(0, 1).await.unwrap();
        session.submit().await.unwrap();

        session.start_over().await;
        assert!(!session.is_complete());
        assert_eq!(session.config().source_keys().len(), 2);
        assert_eq!(session.quiz().len(), 5);
        assert_eq!(session.position(), 0);
        assert!(session.answers().is_empty());
    }

    #[tokio::test]
    async fn choose_dispatches_on_modality() {
        let mut session = session().await;
        session.select_sources([SourceKey::from("multi"), SourceKey::from("single")]).await;
        session.set_question_count(2).await;

        assert_eq!(session.current_question().unwrap().modality(), Modality::Multi);
        session.choose(2).await.unwrap();
        session.choose(1).await.unwrap();
        session.next().await;
        session.choose(0).await.unwrap();

        let report = session.submit().await.unwrap();
        assert_eq!(report.results(), &[true, true]);
    }

    #[test]
    fn position_clamps_to_last_question() {
        assert_eq!(clamp_position(9, 3), 2);
        assert_eq!(clamp_position(1, 3), 1);
        assert_eq!(clamp_position(4, 0), 0);
    }
}
