use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::sync::Arc;

use quiz_core::model::{ActiveQuiz, Question, QuestionCatalog, QuizConfiguration};

/// Where shuffle randomness comes from.
///
/// `Entropy` draws a fresh order on every call. `Seeded` replays the same
/// sequence of orders for the same seed, which keeps tests deterministic.
#[derive(Debug, Clone, Default)]
pub enum ShuffleSource {
    #[default]
    Entropy,
    Seeded(StdRng),
}

impl ShuffleSource {
    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::Seeded(StdRng::seed_from_u64(seed))
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        match self {
            ShuffleSource::Entropy => items.shuffle(&mut rand::rng()),
            ShuffleSource::Seeded(rng) => items.shuffle(rng),
        }
    }
}

/// Assembles an active quiz from the catalog.
pub struct QuizBuilder {
    catalog: Arc<QuestionCatalog>,
    shuffle: ShuffleSource,
}

impl QuizBuilder {
    #[must_use]
    pub fn new(catalog: Arc<QuestionCatalog>) -> Self {
        Self {
            catalog,
            shuffle: ShuffleSource::default(),
        }
    }

    /// Replace the randomness source used when shuffling.
    #[must_use]
    pub fn with_shuffle_source(mut self, shuffle: ShuffleSource) -> Self {
        self.shuffle = shuffle;
        self
    }

    #[must_use]
    pub fn catalog(&self) -> &QuestionCatalog {
        &self.catalog
    }

    /// Number of questions the configured sources can supply.
    #[must_use]
    pub fn total_available(&self, config: &QuizConfiguration) -> usize {
        self.catalog.total_available(config.source_keys())
    }

    /// Build a quiz from `config`.
    ///
    /// - Sources are concatenated in selection order, each keeping its own order;
    ///   unknown sources contribute nothing.
    /// - With `shuffle`, the whole concatenation is permuted before truncation.
    /// - The result holds `min(question_count, total_available)` questions.
    pub fn build(&mut self, config: &QuizConfiguration, shuffle: bool) -> ActiveQuiz {
        let mut questions: Vec<Question> = config
            .source_keys()
            .iter()
            .filter_map(|key| self.catalog.questions(key))
            .flatten()
            .cloned()
            .collect();

        if shuffle {
            self.shuffle.shuffle(&mut questions);
        }

        let count = config.question_count().min(questions.len());
        questions.truncate(count);

        tracing::debug!(
            sources = config.source_keys().len(),
            requested = config.question_count(),
            built = questions.len(),
            shuffle,
            "built quiz"
        );
        ActiveQuiz::new(questions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quiz_core::model::SourceKey;

    fn source(prefix: &str, n: usize) -> Vec<Question> {
        (0..n)
            .map(|i| Question::single(format!("{prefix}{i}"), ["x", "y"], 0).unwrap())
            .collect()
    }

    fn catalog() -> Arc<QuestionCatalog> {
        Arc::new(QuestionCatalog::new([
            (SourceKey::from("a"), source("a", 3)),
            (SourceKey::from("b"), source("b", 4)),
        ]))
    }

    fn prompts(quiz: &ActiveQuiz) -> Vec<String> {
        quiz.iter().map(|q| q.prompt().to_owned()).collect()
    }

    #[test]
    fn unshuffled_build_concatenates_in_selection_order() {
        let mut builder = QuizBuilder::new(catalog());
        let config = QuizConfiguration::new(["b", "a"].map(SourceKey::from), 5);
        let quiz = builder.build(&config, false);
        assert_eq!(prompts(&quiz), ["b0", "b1", "b2", "b3", "a0"]);
    }

    #[test]
    fn length_is_min_of_count_and_available() {
        let mut builder = QuizBuilder::new(catalog());
        for count in [0, 1, 3, 7, 8, 100] {
            for keys in [vec!["a"], vec!["b"], vec!["a", "b"], vec![], vec!["nope"]] {
                let config = QuizConfiguration::new(keys.into_iter().map(SourceKey::from), count);
                let available = builder.total_available(&config);
                let quiz = builder.build(&config, false);
                assert_eq!(quiz.len(), count.min(available));
            }
        }
    }

    #[test]
    fn shuffled_build_is_a_permutation_of_the_pool() {
        let mut builder = QuizBuilder::new(catalog()).with_shuffle_source(ShuffleSource::seeded(7));
        let config = QuizConfiguration::new(["a", "b"].map(SourceKey::from), 7);

        let mut shuffled = prompts(&builder.build(&config, true));
        let mut ordered = prompts(&builder.build(&config, false));
        shuffled.sort();
        ordered.sort();
        assert_eq!(shuffled, ordered);
    }

    #[test]
    fn shuffled_truncation_takes_a_prefix_of_one_permutation() {
        let config_all = QuizConfiguration::new(["a", "b"].map(SourceKey::from), 7);
        let config_three = config_all.clone().with_question_count(3);

        let mut full = QuizBuilder::new(catalog()).with_shuffle_source(ShuffleSource::seeded(11));
        let mut partial = QuizBuilder::new(catalog()).with_shuffle_source(ShuffleSource::seeded(11));

        let all = prompts(&full.build(&config_all, true));
        let three = prompts(&partial.build(&config_three, true));
        assert_eq!(three, all[..3]);
    }

    #[test]
    fn same_seed_gives_same_order() {
        let config = QuizConfiguration::new(["a", "b"].map(SourceKey::from), 7);
        let mut first = QuizBuilder::new(catalog()).with_shuffle_source(ShuffleSource::seeded(3));
        let mut second = QuizBuilder::new(catalog()).with_shuffle_source(ShuffleSource::seeded(3));
        assert_eq!(first.build(&config, true), second.build(&config, true));
    }
}
