//! crates/study_assistant_core/src/domain.rs
//!
//! Defines the core data structures for the study assistant.
//! The serde attributes pin the JSON names used by the backend contract, so the
//! same types travel unchanged between the client, the core and the service.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

//=========================================================================================
// Enumerated Selections
//=========================================================================================

/// The student's education level. Selected once, applies to every generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum StudentLevel {
    #[serde(rename = "Ensino Fundamental")]
    Fundamental,
    #[default]
    #[serde(rename = "Ensino Médio")]
    Medio,
    #[serde(rename = "Graduação")]
    Graduacao,
}

impl StudentLevel {
    pub const ALL: [StudentLevel; 3] = [Self::Fundamental, Self::Medio, Self::Graduacao];

    pub fn label(self) -> &'static str {
        match self {
            Self::Fundamental => "Ensino Fundamental",
            Self::Medio => "Ensino Médio",
            Self::Graduacao => "Graduação",
        }
    }

    /// Parses either the display label or a short ASCII alias.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "ensino fundamental" | "fundamental" => Some(Self::Fundamental),
            "ensino médio" | "ensino medio" | "medio" | "médio" => Some(Self::Medio),
            "graduação" | "graduacao" => Some(Self::Graduacao),
            _ => None,
        }
    }
}

impl fmt::Display for StudentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Difficulty of a generated multiple-choice question bank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum QuestionDifficulty {
    #[serde(rename = "Fácil")]
    Easy,
    #[default]
    #[serde(rename = "Médio")]
    Medium,
    #[serde(rename = "Difícil")]
    Hard,
}

impl QuestionDifficulty {
    pub fn label(self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Medium => "Médio",
            Self::Hard => "Difícil",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "fácil" | "facil" | "easy" => Some(Self::Easy),
            "médio" | "medio" | "medium" => Some(Self::Medium),
            "difícil" | "dificil" | "hard" => Some(Self::Hard),
            _ => None,
        }
    }
}

impl fmt::Display for QuestionDifficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which auxiliary parameter panel a feature needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamsPanel {
    None,
    PlanDays,
    QuestionBank,
}

/// The five content-generation modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    #[default]
    #[serde(rename = "resumo")]
    Summary,
    Quiz,
    Flashcards,
    #[serde(rename = "plano")]
    Plan,
    #[serde(rename = "perguntas")]
    Questions,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Self::Summary,
        Self::Quiz,
        Self::Flashcards,
        Self::Plan,
        Self::Questions,
    ];

    /// The tab label shown to the user.
    pub fn label(self) -> &'static str {
        match self {
            Self::Summary => "Resumo",
            Self::Quiz => "Quiz",
            Self::Flashcards => "Flashcards",
            Self::Plan => "Plano",
            Self::Questions => "Perguntas",
        }
    }

    pub fn params_panel(self) -> ParamsPanel {
        match self {
            Self::Plan => ParamsPanel::PlanDays,
            Self::Questions => ParamsPanel::QuestionBank,
            Self::Summary | Self::Quiz | Self::Flashcards => ParamsPanel::None,
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "resumo" | "summary" => Some(Self::Summary),
            "quiz" => Some(Self::Quiz),
            "flashcards" => Some(Self::Flashcards),
            "plano" | "plan" => Some(Self::Plan),
            "perguntas" | "questions" => Some(Self::Questions),
            _ => None,
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

//=========================================================================================
// Generation Parameters
//=========================================================================================

pub const MIN_PLAN_DAYS: u32 = 1;
pub const MAX_PLAN_DAYS: u32 = 30;
pub const MIN_QUESTION_COUNT: u32 = 1;
pub const MAX_QUESTION_COUNT: u32 = 20;

/// Per-feature auxiliary configuration. Values are clamped into range on the way in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationParams {
    days: u32,
    question_count: u32,
    pub difficulty: QuestionDifficulty,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            days: 7,
            question_count: 5,
            difficulty: QuestionDifficulty::default(),
        }
    }
}

impl GenerationParams {
    pub fn new(days: u32, question_count: u32, difficulty: QuestionDifficulty) -> Self {
        Self {
            days: clamp_days(days),
            question_count: clamp_question_count(question_count),
            difficulty,
        }
    }

    pub fn days(&self) -> u32 {
        self.days
    }

    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    pub fn set_days(&mut self, days: u32) {
        self.days = clamp_days(days);
    }

    pub fn set_question_count(&mut self, count: u32) {
        self.question_count = clamp_question_count(count);
    }
}

pub fn clamp_days(days: u32) -> u32 {
    days.clamp(MIN_PLAN_DAYS, MAX_PLAN_DAYS)
}

pub fn clamp_question_count(count: u32) -> u32 {
    count.clamp(MIN_QUESTION_COUNT, MAX_QUESTION_COUNT)
}

//=========================================================================================
// Generated Artifacts
//=========================================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizQuestionKind {
    #[serde(rename = "multipla_escolha")]
    MultipleChoice,
    #[serde(rename = "verdadeiro_falso")]
    TrueFalse,
    #[serde(rename = "aberta")]
    Open,
}

/// One question of a mixed-format quiz.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(rename = "pergunta")]
    pub prompt: String,
    #[serde(rename = "tipo")]
    pub kind: QuizQuestionKind,
    #[serde(rename = "opcoes", default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(rename = "resposta_correta")]
    pub correct_answer: String,
    #[serde(rename = "explicacao")]
    pub explanation: String,
}

impl QuizQuestion {
    /// Options are present exactly when the question is multiple choice.
    pub fn is_well_formed(&self) -> bool {
        let has_options = self.options.as_ref().is_some_and(|o| !o.is_empty());
        match self.kind {
            QuizQuestionKind::MultipleChoice => has_options,
            QuizQuestionKind::TrueFalse | QuizQuestionKind::Open => !has_options,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(rename = "frente")]
    pub front: String,
    #[serde(rename = "verso")]
    pub back: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnswerLabel {
    A,
    B,
    C,
    D,
}

impl AnswerLabel {
    pub const ALL: [AnswerLabel; 4] = [Self::A, Self::B, Self::C, Self::D];
}

impl fmt::Display for AnswerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
        };
        f.write_str(s)
    }
}

/// The four labeled alternatives of a question. All four are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alternatives {
    #[serde(rename = "A")]
    pub a: String,
    #[serde(rename = "B")]
    pub b: String,
    #[serde(rename = "C")]
    pub c: String,
    #[serde(rename = "D")]
    pub d: String,
}

impl Alternatives {
    pub fn get(&self, label: AnswerLabel) -> &str {
        match label {
            AnswerLabel::A => &self.a,
            AnswerLabel::B => &self.b,
            AnswerLabel::C => &self.c,
            AnswerLabel::D => &self.d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultipleChoiceQuestion {
    #[serde(rename = "pergunta")]
    pub prompt: String,
    #[serde(rename = "alternativas")]
    pub alternatives: Alternatives,
    #[serde(rename = "resposta_correta")]
    pub correct_answer: AnswerLabel,
}

/// The generated content for one feature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Artifact {
    Summary(String),
    Quiz(Vec<QuizQuestion>),
    Flashcards(Vec<Flashcard>),
    Plan(String),
    Questions(Vec<MultipleChoiceQuestion>),
}

impl Artifact {
    /// The default, empty-typed value of a feature's slot.
    pub fn empty(feature: Feature) -> Self {
        match feature {
            Feature::Summary => Self::Summary(String::new()),
            Feature::Quiz => Self::Quiz(Vec::new()),
            Feature::Flashcards => Self::Flashcards(Vec::new()),
            Feature::Plan => Self::Plan(String::new()),
            Feature::Questions => Self::Questions(Vec::new()),
        }
    }

    pub fn feature(&self) -> Feature {
        match self {
            Self::Summary(_) => Feature::Summary,
            Self::Quiz(_) => Feature::Quiz,
            Self::Flashcards(_) => Feature::Flashcards,
            Self::Plan(_) => Feature::Plan,
            Self::Questions(_) => Feature::Questions,
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Self::Summary(text) | Self::Plan(text) => text.is_empty(),
            Self::Quiz(items) => items.is_empty(),
            Self::Flashcards(items) => items.is_empty(),
            Self::Questions(items) => items.is_empty(),
        }
    }
}

//=========================================================================================
// Uploads
//=========================================================================================

pub const PDF_MIME_TYPE: &str = "application/pdf";

/// A file selected by the user, held in memory until it is sent for extraction.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub data: Bytes,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, mime_type: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    pub fn is_document(&self) -> bool {
        self.mime_type
            .split(';')
            .next()
            .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME_TYPE))
    }
}

/// The separator placed between extracted chunks to form the input text.
pub const CHUNK_SEPARATOR: &str = "\n\n";

/// Upload-derived input: raw text, its chunks, the file name and the in-flight flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadState {
    pub input_text: String,
    pub chunks: Vec<String>,
    pub file_name: Option<String>,
    pub uploading: bool,
}

impl UploadState {
    pub fn from_chunks(file_name: Option<String>, chunks: Vec<String>) -> Self {
        Self {
            input_text: chunks.join(CHUNK_SEPARATOR),
            chunks,
            file_name,
            uploading: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_clamped_into_range() {
        let mut params = GenerationParams::new(0, 99, QuestionDifficulty::Hard);
        assert_eq!(params.days(), 1);
        assert_eq!(params.question_count(), 20);
        params.set_days(45);
        params.set_question_count(0);
        assert_eq!(params.days(), 30);
        assert_eq!(params.question_count(), 1);
    }

    #[test]
    fn wire_names_match_backend_contract() {
        assert_eq!(serde_json::to_string(&StudentLevel::Medio).unwrap(), "\"Ensino Médio\"");
        assert_eq!(serde_json::to_string(&QuestionDifficulty::Medium).unwrap(), "\"Médio\"");
        assert_eq!(serde_json::to_string(&Feature::Plan).unwrap(), "\"plano\"");
        assert_eq!(serde_json::to_string(&Feature::Flashcards).unwrap(), "\"flashcards\"");
    }

    #[test]
    fn multiple_choice_question_parses_from_backend_json() {
        let raw = r#"{
            "pergunta": "Qual organela realiza a fotossíntese?",
            "alternativas": {"A": "Mitocôndria", "B": "Cloroplasto", "C": "Ribossomo", "D": "Núcleo"},
            "resposta_correta": "B"
        }"#;
        let question: MultipleChoiceQuestion = serde_json::from_str(raw).unwrap();
        assert_eq!(question.correct_answer, AnswerLabel::B);
        assert_eq!(question.alternatives.get(AnswerLabel::B), "Cloroplasto");
    }

    #[test]
    fn multiple_choice_question_requires_all_four_alternatives() {
        let raw = r#"{
            "pergunta": "?",
            "alternativas": {"A": "1", "B": "2", "C": "3"},
            "resposta_correta": "A"
        }"#;
        assert!(serde_json::from_str::<MultipleChoiceQuestion>(raw).is_err());
    }

    #[test]
    fn quiz_options_present_only_for_multiple_choice() {
        let mut question = QuizQuestion {
            prompt: "A água ferve a 100 °C ao nível do mar?".to_string(),
            kind: QuizQuestionKind::TrueFalse,
            options: None,
            correct_answer: "Verdadeiro".to_string(),
            explanation: "Pressão de 1 atm.".to_string(),
        };
        assert!(question.is_well_formed());
        question.kind = QuizQuestionKind::MultipleChoice;
        assert!(!question.is_well_formed());
        question.options = Some(vec!["Sim".to_string(), "Não".to_string()]);
        assert!(question.is_well_formed());
    }

    #[test]
    fn empty_artifacts_match_their_feature() {
        for feature in Feature::ALL {
            let artifact = Artifact::empty(feature);
            assert_eq!(artifact.feature(), feature);
            assert!(artifact.is_empty());
        }
    }

    #[test]
    fn only_pdf_counts_as_document() {
        assert!(UploadFile::new("a.pdf", "application/pdf", Vec::new()).is_document());
        assert!(UploadFile::new("a.pdf", "Application/PDF; charset=binary", Vec::new()).is_document());
        assert!(!UploadFile::new("a.png", "image/png", Vec::new()).is_document());
    }

    #[test]
    fn upload_state_joins_chunks_with_blank_line() {
        let state = UploadState::from_chunks(None, vec!["A".to_string(), "B".to_string()]);
        assert_eq!(state.input_text, "A\n\nB");
    }
}
