use std::collections::HashMap;

use crate::model::ids::SourceKey;
use crate::model::question::Question;

/// Immutable mapping from source key to its ordered questions.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalog {
    sources: Vec<(SourceKey, Vec<Question>)>,
    index: HashMap<SourceKey, usize>,
}

impl QuestionCatalog {
    /// Builds a catalog from `(key, questions)` pairs, keeping their order.
    ///
    /// A repeated key keeps its first occurrence.
    #[must_use]
    pub fn new(sources: impl IntoIterator<Item = (SourceKey, Vec<Question>)>) -> Self {
        let mut catalog = Self::default();
        for (key, questions) in sources {
            if catalog.index.contains_key(&key) {
                continue;
            }
            catalog.index.insert(key.clone(), catalog.sources.len());
            catalog.sources.push((key, questions));
        }
        catalog
    }

    /// Source keys in catalog order.
    pub fn keys(&self) -> impl Iterator<Item = &SourceKey> {
        self.sources.iter().map(|(key, _)| key)
    }

    /// Whether `key` names a source of this catalog.
    #[must_use]
    pub fn contains(&self, key: &SourceKey) -> bool {
        self.index.contains_key(key)
    }

    /// Questions of `key`, or `None` for an unknown source.
    #[must_use]
    pub fn questions(&self, key: &SourceKey) -> Option<&[Question]> {
        self.index
            .get(key)
            .map(|&pos| self.sources[pos].1.as_slice())
    }

    /// Number of questions the given sources can supply together.
    ///
    /// Unknown keys contribute nothing; a repeated key is counted once.
    #[must_use]
    pub fn total_available(&self, keys: &[SourceKey]) -> usize {
        let mut seen: Vec<&SourceKey> = Vec::with_capacity(keys.len());
        let mut total = 0_usize;
        for key in keys {
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            total = total.saturating_add(self.questions(key).map_or(0, <[Question]>::len));
        }
        total
    }

    #[must_use]
    pub fn source_count(&self) -> usize {
        self.sources.len()
    }
}
