//! crates/study_assistant_core/src/presentation.rs
//!
//! Decides what the result panel shows. A pure, total function of the active
//! feature, the content store and the busy flag.

use crate::content::ContentStore;
use crate::domain::{Feature, Flashcard, MultipleChoiceQuestion, QuizQuestion};

pub const EMPTY_STATE_TITLE: &str = "Pronto para começar?";
pub const EMPTY_STATE_HINT: &str = "Cole seu material de estudo, escolha uma ferramenta e clique em 'Gerar' para transformar seu conteúdo em resumos, quizzes ou flashcards interativos.";

/// The feature-specific view model of a generated artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactView<'a> {
    Summary(&'a str),
    Quiz(&'a [QuizQuestion]),
    Flashcards(&'a [Flashcard]),
    Plan(&'a str),
    Questions(&'a [MultipleChoiceQuestion]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presentation<'a> {
    Loading,
    Empty(Feature),
    Rendered(ArtifactView<'a>),
}

/// Loading wins over Empty, which wins over Rendered.
pub fn select(feature: Feature, store: &ContentStore, busy: bool) -> Presentation<'_> {
    if busy {
        return Presentation::Loading;
    }
    if store.is_empty(feature) {
        return Presentation::Empty(feature);
    }
    let view = match feature {
        Feature::Summary => ArtifactView::Summary(store.summary()),
        Feature::Quiz => ArtifactView::Quiz(store.quiz()),
        Feature::Flashcards => ArtifactView::Flashcards(store.flashcards()),
        Feature::Plan => ArtifactView::Plan(store.plan()),
        Feature::Questions => ArtifactView::Questions(store.questions()),
    };
    Presentation::Rendered(view)
}
