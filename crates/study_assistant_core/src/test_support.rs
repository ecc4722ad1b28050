//! Hand-written port fakes shared by the unit tests.

use crate::domain::{
    Alternatives, AnswerLabel, Artifact, Feature, Flashcard, MultipleChoiceQuestion,
    QuestionDifficulty, QuizQuestion, QuizQuestionKind, StudentLevel, UploadFile,
};
use crate::ports::{DocumentExtractionService, PortError, PortResult, StudyContentService};
use async_trait::async_trait;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Holds a port call open until the test releases it.
#[derive(Default)]
pub struct Gate {
    entered: Notify,
    released: Notify,
}

impl Gate {
    async fn pass(&self) {
        self.entered.notify_one();
        self.released.notified().await;
    }
}

pub fn sample_flashcards() -> Vec<Flashcard> {
    vec![Flashcard {
        front: "O que é clorofila?".to_string(),
        back: "Pigmento verde que absorve luz.".to_string(),
    }]
}

#[derive(Default)]
pub struct FakeContentService {
    summary: Option<String>,
    failure: Option<PortError>,
    gate: Option<Gate>,
    calls: Mutex<Vec<Feature>>,
    summary_requests: Mutex<Vec<(Vec<String>, StudentLevel)>>,
    plan_days: Mutex<Vec<u32>>,
    question_requests: Mutex<Vec<(u32, QuestionDifficulty)>>,
}

impl FakeContentService {
    pub fn failing(error: PortError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_summary(mut self, summary: &str) -> Self {
        self.summary = Some(summary.to_string());
        self
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Gate::default());
        self
    }

    pub async fn wait_until_entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.released.notify_one();
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn summary_requests(&self) -> Vec<(Vec<String>, StudentLevel)> {
        self.summary_requests.lock().unwrap().clone()
    }

    pub fn plan_days(&self) -> Vec<u32> {
        self.plan_days.lock().unwrap().clone()
    }

    pub fn question_requests(&self) -> Vec<(u32, QuestionDifficulty)> {
        self.question_requests.lock().unwrap().clone()
    }

    /// A non-empty artifact for `feature` whose text carries `tag`.
    pub fn artifact_for(&self, feature: Feature, tag: &str) -> Artifact {
        match feature {
            Feature::Summary => Artifact::Summary(format!("## Resumo {tag}")),
            Feature::Quiz => Artifact::Quiz(vec![QuizQuestion {
                prompt: format!("Pergunta {tag}"),
                kind: QuizQuestionKind::Open,
                options: None,
                correct_answer: "Resposta".to_string(),
                explanation: "Explicação".to_string(),
            }]),
            Feature::Flashcards => Artifact::Flashcards(vec![Flashcard {
                front: format!("Frente {tag}"),
                back: "Verso".to_string(),
            }]),
            Feature::Plan => Artifact::Plan(format!("## Dia 1 {tag}")),
            Feature::Questions => Artifact::Questions(vec![MultipleChoiceQuestion {
                prompt: format!("Questão {tag}"),
                alternatives: Alternatives {
                    a: "1".to_string(),
                    b: "2".to_string(),
                    c: "3".to_string(),
                    d: "4".to_string(),
                },
                correct_answer: AnswerLabel::C,
            }]),
        }
    }

    async fn respond(&self, feature: Feature) -> PortResult<Artifact> {
        self.calls.lock().unwrap().push(feature);
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        match (feature, &self.summary) {
            (Feature::Summary, Some(summary)) => Ok(Artifact::Summary(summary.clone())),
            _ => Ok(self.artifact_for(feature, "novo")),
        }
    }
}

#[async_trait]
impl StudyContentService for FakeContentService {
    async fn generate_summary(&self, chunks: &[String], level: StudentLevel) -> PortResult<String> {
        self.summary_requests.lock().unwrap().push((chunks.to_vec(), level));
        match self.respond(Feature::Summary).await? {
            Artifact::Summary(text) => Ok(text),
            other => Err(PortError::Unexpected(format!("{other:?}"))),
        }
    }

    async fn generate_quiz(&self, _text: &str, _level: StudentLevel) -> PortResult<Vec<QuizQuestion>> {
        match self.respond(Feature::Quiz).await? {
            Artifact::Quiz(items) => Ok(items),
            other => Err(PortError::Unexpected(format!("{other:?}"))),
        }
    }

    async fn generate_flashcards(&self, _text: &str, _level: StudentLevel) -> PortResult<Vec<Flashcard>> {
        match self.respond(Feature::Flashcards).await? {
            Artifact::Flashcards(items) => Ok(items),
            other => Err(PortError::Unexpected(format!("{other:?}"))),
        }
    }

    async fn generate_study_plan(&self, _text: &str, _level: StudentLevel, days: u32) -> PortResult<String> {
        self.plan_days.lock().unwrap().push(days);
        match self.respond(Feature::Plan).await? {
            Artifact::Plan(text) => Ok(text),
            other => Err(PortError::Unexpected(format!("{other:?}"))),
        }
    }

    async fn generate_questions(
        &self,
        _text: &str,
        count: u32,
        difficulty: QuestionDifficulty,
    ) -> PortResult<Vec<MultipleChoiceQuestion>> {
        self.question_requests.lock().unwrap().push((count, difficulty));
        match self.respond(Feature::Questions).await? {
            Artifact::Questions(items) => Ok(items),
            other => Err(PortError::Unexpected(format!("{other:?}"))),
        }
    }
}

pub struct FakeExtractionService {
    result: PortResult<Vec<String>>,
    gate: Option<Gate>,
    calls: Mutex<usize>,
}

impl FakeExtractionService {
    pub fn returning(chunks: Vec<&str>) -> Self {
        Self {
            result: Ok(chunks.into_iter().map(str::to_string).collect()),
            gate: None,
            calls: Mutex::new(0),
        }
    }

    pub fn failing(error: PortError) -> Self {
        Self {
            result: Err(error),
            gate: None,
            calls: Mutex::new(0),
        }
    }

    pub fn gated(mut self) -> Self {
        self.gate = Some(Gate::default());
        self
    }

    pub async fn wait_until_entered(&self) {
        if let Some(gate) = &self.gate {
            gate.entered.notified().await;
        }
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.released.notify_one();
        }
    }

    pub fn call_count(&self) -> usize {
        *self.calls.lock().unwrap()
    }
}

#[async_trait]
impl DocumentExtractionService for FakeExtractionService {
    async fn extract_chunks(&self, _file: &UploadFile) -> PortResult<Vec<String>> {
        *self.calls.lock().unwrap() += 1;
        if let Some(gate) = &self.gate {
            gate.pass().await;
        }
        self.result.clone()
    }
}
