//! crates/study_assistant_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! The first group is consumed by the orchestration layer and implemented by the HTTP
//! client; the second group is consumed by the backend service and implemented by its
//! adapters (language model, PDF extraction, summary cache).

use async_trait::async_trait;
use uuid::Uuid;
use crate::domain::{
    Feature, Flashcard, MultipleChoiceQuestion, QuestionDifficulty, QuizQuestion, StudentLevel,
    UploadFile,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., HTTP, database, LLM).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PortError {
    /// The request never produced a response (connection refused, DNS, TLS, ...).
    #[error("Network error: {0}")]
    Network(String),
    /// The remote side answered with a non-success status.
    #[error("Server returned HTTP {status}: {}", detail.as_deref().unwrap_or("<no detail>"))]
    Server { status: u16, detail: Option<String> },
    /// A successful response that carried nothing usable.
    #[error("The model returned an empty output")]
    EmptyModelOutput,
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// The server-provided message, when the failure carried one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Server { detail, .. } => detail.as_deref(),
            _ => None,
        }
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Client-Side Ports (used by the orchestration session)
//=========================================================================================

/// One backend operation per feature.
#[async_trait]
pub trait StudyContentService: Send + Sync {
    async fn generate_summary(&self, chunks: &[String], level: StudentLevel) -> PortResult<String>;

    async fn generate_quiz(&self, text: &str, level: StudentLevel) -> PortResult<Vec<QuizQuestion>>;

    async fn generate_flashcards(
        &self,
        text: &str,
        level: StudentLevel,
    ) -> PortResult<Vec<Flashcard>>;

    async fn generate_study_plan(
        &self,
        text: &str,
        level: StudentLevel,
        days: u32,
    ) -> PortResult<String>;

    async fn generate_questions(
        &self,
        text: &str,
        count: u32,
        difficulty: QuestionDifficulty,
    ) -> PortResult<Vec<MultipleChoiceQuestion>>;
}

#[async_trait]
pub trait DocumentExtractionService: Send + Sync {
    /// Sends a document to the extraction service and returns its ordered text chunks.
    async fn extract_chunks(&self, file: &UploadFile) -> PortResult<Vec<String>>;
}

//=========================================================================================
// Backend Ports (used by the API service)
//=========================================================================================

/// The shape a language model call must produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Free text (markdown).
    Text,
    /// JSON matching the fixed schema of the given feature.
    Structured(Feature),
}

#[async_trait]
pub trait LanguageModelService: Send + Sync {
    /// Runs one prompt under the fixed system instruction and returns the raw model text.
    async fn complete(&self, prompt: &str, format: OutputFormat) -> PortResult<String>;
}

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts the plain text of a PDF document.
    async fn extract_text(&self, pdf_bytes: &[u8]) -> PortResult<String>;
}

#[async_trait]
pub trait SummaryCacheService: Send + Sync {
    async fn get_cached_summary(
        &self,
        document_id: Uuid,
        level: StudentLevel,
    ) -> PortResult<Option<String>>;

    async fn save_summary(
        &self,
        document_id: Uuid,
        level: StudentLevel,
        summary_text: &str,
    ) -> PortResult<()>;
}
