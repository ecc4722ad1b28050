//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::chunking::{chunk_text, CHUNK_OVERLAP, CHUNK_SIZE};
use crate::error::{ErrorBody, HttpError};
use crate::web::state::AppState;
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use study_assistant_core::domain::{
    Flashcard, MultipleChoiceQuestion, QuestionDifficulty, QuizQuestion, StudentLevel,
};
use tracing::{error, info, warn};
use utoipa::{OpenApi, ToSchema};

const DEFAULT_PLAN_DAYS: u32 = 7;
const DEFAULT_QUESTION_COUNT: u32 = 5;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        health_handler,
        upload_pdf_handler,
        generate_summary_handler,
        generate_quiz_handler,
        generate_flashcards_handler,
        generate_study_plan_handler,
        generate_questions_handler,
    ),
    components(
        schemas(
            HealthResponse,
            UploadResponse,
            SummaryRequest,
            SummaryResponse,
            StudyTextRequest,
            StudyPlanRequest,
            QuestionsRequest,
            QuizResponse,
            FlashcardResponse,
            StudyPlanResponse,
            QuestionResponse,
            ErrorBody,
        )
    ),
    tags(
        (name = "Study Assistant API", description = "Endpoints that turn study material into summaries, quizzes, flashcards, study plans and question banks.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    status: String,
    message: String,
}

/// The result of uploading a PDF: its extracted text, split into chunks.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub filename: String,
    pub total_chunks: usize,
    pub chunks: Vec<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct SummaryRequest {
    #[serde(default)]
    pub chunks: Vec<String>,
    #[serde(default)]
    #[schema(value_type = String, example = "Ensino Médio")]
    pub level: StudentLevel,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyTextRequest {
    pub text: String,
    #[serde(default)]
    #[schema(value_type = String, example = "Ensino Médio")]
    pub student_level: StudentLevel,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudyPlanRequest {
    pub text: String,
    #[serde(default)]
    #[schema(value_type = String, example = "Ensino Médio")]
    pub student_level: StudentLevel,
    #[serde(default = "default_plan_days")]
    pub days: u32,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct QuestionsRequest {
    pub text: String,
    #[serde(default = "default_question_count")]
    pub count: u32,
    #[serde(default)]
    #[schema(value_type = String, example = "Médio")]
    pub difficulty: QuestionDifficulty,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuizResponse {
    #[schema(value_type = Vec<Object>)]
    pub quiz: Vec<QuizQuestion>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FlashcardResponse {
    #[schema(value_type = Vec<Object>)]
    pub flashcards: Vec<Flashcard>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct StudyPlanResponse {
    pub plan: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct QuestionResponse {
    #[schema(value_type = Vec<Object>)]
    pub perguntas: Vec<MultipleChoiceQuestion>,
}

fn default_plan_days() -> u32 {
    DEFAULT_PLAN_DAYS
}

fn default_question_count() -> u32 {
    DEFAULT_QUESTION_COUNT
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Health check.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "The service is running", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        message: "Study Assistant API is running.".to_string(),
    })
}

/// Upload a PDF and split its text into chunks.
///
/// Accepts a multipart/form-data request with a `file` part.
#[utoipa::path(
    post,
    path = "/api/v1/upload-pdf/",
    request_body(content_type = "multipart/form-data", description = "The PDF to upload."),
    responses(
        (status = 200, description = "Text extracted and chunked", body = UploadResponse),
        (status = 400, description = "Missing file or not a PDF", body = ErrorBody),
        (status = 422, description = "The PDF has no extractable text", body = ErrorBody)
    )
)]
pub async fn upload_pdf_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, HttpError> {
    let mut upload = None;
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!(error = %e, "Failed to read multipart data");
        HttpError::new(e.status(), "Não foi possível ler o arquivo enviado.")
    })? {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or_default().to_string();
        let data = field.bytes().await.map_err(|e| {
            warn!(error = %e, "Failed to read file bytes");
            HttpError::new(e.status(), "Não foi possível ler o arquivo enviado.")
        })?;
        upload = Some((name, data));
        break;
    }

    let (filename, data) =
        upload.ok_or_else(|| HttpError::bad_request("Nenhum arquivo foi enviado."))?;

    if !filename.to_lowercase().ends_with(".pdf") {
        return Err(HttpError::bad_request(
            "Formato de arquivo inválido. Por favor, envie um PDF.",
        ));
    }

    let text = app_state
        .pdf_extractor
        .extract_text(&data)
        .await
        .map_err(|e| {
            warn!(%filename, error = %e, "PDF text extraction failed");
            HttpError::unprocessable("Não foi possível extrair o texto do PDF.")
        })?;

    if text.trim().is_empty() {
        return Err(HttpError::unprocessable(
            "O PDF parece estar vazio ou não contém texto extraível.",
        ));
    }

    let chunks = chunk_text(&text, CHUNK_SIZE, CHUNK_OVERLAP);
    info!(%filename, total_chunks = chunks.len(), "PDF processed");

    Ok(Json(UploadResponse {
        filename,
        total_chunks: chunks.len(),
        chunks,
    }))
}

/// Generate a level-adapted summary of a chunked document.
#[utoipa::path(
    post,
    path = "/api/v1/generate-summary/",
    request_body = SummaryRequest,
    responses(
        (status = 200, description = "Summary generated", body = SummaryResponse),
        (status = 422, description = "No chunks were sent", body = ErrorBody),
        (status = 503, description = "Model provider unavailable", body = ErrorBody),
        (status = 504, description = "Model call timed out", body = ErrorBody)
    )
)]
pub async fn generate_summary_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, HttpError> {
    info!(chunks = request.chunks.len(), level = %request.level, "Generating summary");
    let summary = app_state
        .generator
        .summarize(&request.chunks, request.level)
        .await
        .map_err(log_failure("summary"))?;
    Ok(Json(SummaryResponse { summary }))
}

/// Generate a five-question mixed quiz.
#[utoipa::path(
    post,
    path = "/api/v1/generate-quiz/",
    request_body = StudyTextRequest,
    responses(
        (status = 200, description = "Quiz generated", body = QuizResponse),
        (status = 500, description = "The model answered with an invalid quiz", body = ErrorBody),
        (status = 503, description = "Model provider unavailable", body = ErrorBody),
        (status = 504, description = "Model call timed out", body = ErrorBody)
    )
)]
pub async fn generate_quiz_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<StudyTextRequest>,
) -> Result<Json<QuizResponse>, HttpError> {
    let quiz = app_state
        .generator
        .quiz(&request.text, request.student_level)
        .await
        .map_err(log_failure("quiz"))?;
    Ok(Json(QuizResponse { quiz }))
}

/// Generate question-and-answer flashcards.
#[utoipa::path(
    post,
    path = "/api/v1/generate-flashcards/",
    request_body = StudyTextRequest,
    responses(
        (status = 200, description = "Flashcards generated", body = FlashcardResponse),
        (status = 500, description = "The model answered with invalid flashcards", body = ErrorBody),
        (status = 503, description = "Model provider unavailable", body = ErrorBody),
        (status = 504, description = "Model call timed out", body = ErrorBody)
    )
)]
pub async fn generate_flashcards_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<StudyTextRequest>,
) -> Result<Json<FlashcardResponse>, HttpError> {
    let flashcards = app_state
        .generator
        .flashcards(&request.text, request.student_level)
        .await
        .map_err(log_failure("flashcards"))?;
    Ok(Json(FlashcardResponse { flashcards }))
}

/// Generate a day-by-day study plan in markdown.
#[utoipa::path(
    post,
    path = "/api/v1/generate-study-plan/",
    request_body = StudyPlanRequest,
    responses(
        (status = 200, description = "Study plan generated", body = StudyPlanResponse),
        (status = 503, description = "Model provider unavailable", body = ErrorBody),
        (status = 504, description = "Model call timed out", body = ErrorBody)
    )
)]
pub async fn generate_study_plan_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<StudyPlanRequest>,
) -> Result<Json<StudyPlanResponse>, HttpError> {
    let plan = app_state
        .generator
        .study_plan(&request.text, request.student_level, request.days)
        .await
        .map_err(log_failure("study plan"))?;
    Ok(Json(StudyPlanResponse { plan }))
}

/// Generate a bank of A–D multiple-choice questions.
#[utoipa::path(
    post,
    path = "/api/v1/generate-questions/",
    request_body = QuestionsRequest,
    responses(
        (status = 200, description = "Questions generated", body = QuestionResponse),
        (status = 500, description = "The model answered with invalid questions", body = ErrorBody),
        (status = 503, description = "Model provider unavailable", body = ErrorBody),
        (status = 504, description = "Model call timed out", body = ErrorBody)
    )
)]
pub async fn generate_questions_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuestionsRequest>,
) -> Result<Json<QuestionResponse>, HttpError> {
    let perguntas = app_state
        .generator
        .questions(&request.text, request.count, request.difficulty)
        .await
        .map_err(log_failure("questions"))?;
    Ok(Json(QuestionResponse { perguntas }))
}

fn log_failure(
    what: &'static str,
) -> impl FnOnce(crate::generation::GenerationFailure) -> HttpError {
    move |failure| {
        error!(error = %failure, "Failed to generate {what}");
        HttpError::from(failure)
    }
}
