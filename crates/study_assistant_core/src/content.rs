//! crates/study_assistant_core/src/content.rs
//!
//! The per-feature artifact store. Every feature always owns exactly one slot,
//! and writing a slot never touches another.

use crate::domain::{Artifact, Feature, Flashcard, MultipleChoiceQuestion, QuizQuestion};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentStore {
    slots: BTreeMap<Feature, Artifact>,
}

impl Default for ContentStore {
    fn default() -> Self {
        let slots = Feature::ALL
            .into_iter()
            .map(|feature| (feature, Artifact::empty(feature)))
            .collect();
        Self { slots }
    }
}

impl ContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, feature: Feature) -> &Artifact {
        // Slots are populated for every feature on construction and never removed.
        &self.slots[&feature]
    }

    /// Writes an artifact into the slot of its own feature.
    pub fn put(&mut self, artifact: Artifact) {
        self.slots.insert(artifact.feature(), artifact);
    }

    /// Resets one slot to its empty default.
    pub fn clear(&mut self, feature: Feature) {
        self.slots.insert(feature, Artifact::empty(feature));
    }

    pub fn clear_all(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self, feature: Feature) -> bool {
        self.get(feature).is_empty()
    }

    pub fn summary(&self) -> &str {
        match self.get(Feature::Summary) {
            Artifact::Summary(text) => text,
            _ => "",
        }
    }

    pub fn quiz(&self) -> &[QuizQuestion] {
        match self.get(Feature::Quiz) {
            Artifact::Quiz(items) => items,
            _ => &[],
        }
    }

    pub fn flashcards(&self) -> &[Flashcard] {
        match self.get(Feature::Flashcards) {
            Artifact::Flashcards(items) => items,
            _ => &[],
        }
    }

    pub fn plan(&self) -> &str {
        match self.get(Feature::Plan) {
            Artifact::Plan(text) => text,
            _ => "",
        }
    }

    pub fn questions(&self) -> &[MultipleChoiceQuestion] {
        match self.get(Feature::Questions) {
            Artifact::Questions(items) => items,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_store_has_every_slot_empty() {
        let store = ContentStore::new();
        for feature in Feature::ALL {
            assert!(store.is_empty(feature), "{feature:?} should start empty");
        }
    }

    #[test]
    fn put_and_clear_touch_only_one_slot() {
        let mut store = ContentStore::new();
        store.put(Artifact::Summary("resumo".to_string()));
        store.put(Artifact::Plan("## Dia 1".to_string()));

        store.clear(Feature::Summary);

        assert_eq!(store.summary(), "");
        assert_eq!(store.plan(), "## Dia 1");
    }
}
