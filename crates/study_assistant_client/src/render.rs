//! crates/study_assistant_client/src/render.rs
//!
//! Plain-text rendering of a presentation for the terminal front end.

use std::fmt::Write;
use study_assistant_core::{
    domain::{AnswerLabel, Flashcard, MultipleChoiceQuestion, QuizQuestion, QuizQuestionKind},
    presentation::{ArtifactView, Presentation, EMPTY_STATE_HINT, EMPTY_STATE_TITLE},
};

pub fn render(presentation: &Presentation<'_>) -> String {
    match presentation {
        Presentation::Loading => "Gerando...\n".to_string(),
        Presentation::Empty(_) => format!("{EMPTY_STATE_TITLE}\n{EMPTY_STATE_HINT}\n"),
        Presentation::Rendered(view) => render_view(view),
    }
}

fn render_view(view: &ArtifactView<'_>) -> String {
    match view {
        ArtifactView::Summary(text) | ArtifactView::Plan(text) => format!("{}\n", text.trim_end()),
        ArtifactView::Quiz(questions) => render_quiz(questions),
        ArtifactView::Flashcards(cards) => render_flashcards(cards),
        ArtifactView::Questions(questions) => render_questions(questions),
    }
}

fn render_quiz(questions: &[QuizQuestion]) -> String {
    let mut out = String::new();
    for (i, question) in questions.iter().enumerate() {
        let kind = match question.kind {
            QuizQuestionKind::MultipleChoice => "Múltipla escolha",
            QuizQuestionKind::TrueFalse => "Verdadeiro ou falso",
            QuizQuestionKind::Open => "Aberta",
        };
        let _ = writeln!(out, "{}. [{}] {}", i + 1, kind, question.prompt);
        for option in question.options.iter().flatten() {
            let _ = writeln!(out, "   - {option}");
        }
        let _ = writeln!(out, "   Resposta Correta: {}", question.correct_answer);
        let _ = writeln!(out, "   Explicação: {}", question.explanation);
        out.push('\n');
    }
    out
}

fn render_flashcards(cards: &[Flashcard]) -> String {
    let mut out = String::new();
    for (i, card) in cards.iter().enumerate() {
        let _ = writeln!(out, "Card {}", i + 1);
        let _ = writeln!(out, "  Frente: {}", card.front);
        let _ = writeln!(out, "  Verso:  {}", card.back);
        out.push('\n');
    }
    out
}

fn render_questions(questions: &[MultipleChoiceQuestion]) -> String {
    let mut out = String::new();
    for (i, question) in questions.iter().enumerate() {
        let _ = writeln!(out, "{}. {}", i + 1, question.prompt);
        for label in AnswerLabel::ALL {
            let _ = writeln!(out, "   {label}) {}", question.alternatives.get(label));
        }
        let _ = writeln!(out, "   Resposta Correta: {}", question.correct_answer);
        out.push('\n');
    }
    out
}
