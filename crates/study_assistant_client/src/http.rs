//! crates/study_assistant_client/src/http.rs
//!
//! The HTTP adapter for the backend contract. It implements both client-side ports
//! from the `core` crate: `StudyContentService` and `DocumentExtractionService`.

use crate::config::ApiBase;
use async_trait::async_trait;
use reqwest::{multipart, RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use study_assistant_core::{
    domain::{
        Flashcard, MultipleChoiceQuestion, QuestionDifficulty, QuizQuestion, StudentLevel,
        UploadFile,
    },
    ports::{DocumentExtractionService, PortError, PortResult, StudyContentService},
};
use tracing::{debug, error};

pub const UPLOAD_PDF_PATH: &str = "/upload-pdf/";
pub const SUMMARY_PATH: &str = "/generate-summary/";
pub const QUIZ_PATH: &str = "/generate-quiz/";
pub const FLASHCARDS_PATH: &str = "/generate-flashcards/";
pub const STUDY_PLAN_PATH: &str = "/generate-study-plan/";
pub const QUESTIONS_PATH: &str = "/generate-questions/";

//=========================================================================================
// Wire Payloads
//=========================================================================================

#[derive(Serialize)]
struct SummaryRequest<'a> {
    chunks: &'a [String],
    level: StudentLevel,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct StudyTextRequest<'a> {
    text: &'a str,
    student_level: StudentLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    days: Option<u32>,
}

#[derive(Serialize)]
struct QuestionsRequest<'a> {
    text: &'a str,
    count: u32,
    difficulty: QuestionDifficulty,
}

// Every field defaults so that a 204 decodes as an empty payload.
#[derive(Deserialize)]
struct SummaryResponse {
    #[serde(default)]
    summary: String,
}

#[derive(Deserialize)]
struct QuizResponse {
    #[serde(default)]
    quiz: Vec<QuizQuestion>,
}

#[derive(Deserialize)]
struct FlashcardResponse {
    #[serde(default)]
    flashcards: Vec<Flashcard>,
}

#[derive(Deserialize)]
struct StudyPlanResponse {
    #[serde(default)]
    plan: String,
}

#[derive(Deserialize)]
struct QuestionResponse {
    #[serde(default)]
    perguntas: Vec<MultipleChoiceQuestion>,
}

#[derive(Deserialize)]
struct UploadResponse {
    #[serde(default)]
    chunks: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<String>,
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

#[derive(Clone, Debug)]
pub struct HttpStudyClient {
    base: ApiBase,
    client: reqwest::Client,
}

impl HttpStudyClient {
    pub fn new(base: ApiBase) -> PortResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent("study-assistant-client")
            .build()
            .map_err(|e| PortError::Unexpected(format!("failed to initialize HTTP client: {e}")))?;
        Ok(Self { base, client })
    }

    pub fn base(&self) -> &ApiBase {
        &self.base
    }

    async fn post_json<B, T>(&self, endpoint: &str, body: &B) -> PortResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.client.post(self.base.url(endpoint)).json(body);
        self.execute(endpoint, request).await
    }

    async fn execute<T: DeserializeOwned>(&self, endpoint: &str, request: RequestBuilder) -> PortResult<T> {
        let response = request.send().await.map_err(|e| {
            error!(endpoint, error = %e, "Request to backend failed");
            PortError::Network(e.to_string())
        })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| PortError::Network(format!("failed to read response body: {e}")))?;
        debug!(endpoint, status = status.as_u16(), "Backend responded");

        if !status.is_success() {
            let detail = serde_json::from_str::<ErrorBody>(&body)
                .ok()
                .and_then(|b| b.detail);
            error!(endpoint, status = status.as_u16(), ?detail, "Backend returned an error");
            return Err(PortError::Server {
                status: status.as_u16(),
                detail,
            });
        }

        let body = if status == StatusCode::NO_CONTENT || body.trim().is_empty() {
            "{}"
        } else {
            body.as_str()
        };
        serde_json::from_str(body).map_err(|e| {
            error!(endpoint, error = %e, "Backend response was not valid JSON");
            PortError::MalformedResponse(e.to_string())
        })
    }
}

//=========================================================================================
// Port Implementations
//=========================================================================================

#[async_trait]
impl StudyContentService for HttpStudyClient {
    async fn generate_summary(&self, chunks: &[String], level: StudentLevel) -> PortResult<String> {
        let response: SummaryResponse = self
            .post_json(SUMMARY_PATH, &SummaryRequest { chunks, level })
            .await?;
        Ok(response.summary)
    }

    async fn generate_quiz(&self, text: &str, level: StudentLevel) -> PortResult<Vec<QuizQuestion>> {
        let body = StudyTextRequest {
            text,
            student_level: level,
            days: None,
        };
        let response: QuizResponse = self.post_json(QUIZ_PATH, &body).await?;
        Ok(response.quiz)
    }

    async fn generate_flashcards(
        &self,
        text: &str,
        level: StudentLevel,
    ) -> PortResult<Vec<Flashcard>> {
        let body = StudyTextRequest {
            text,
            student_level: level,
            days: None,
        };
        let response: FlashcardResponse = self.post_json(FLASHCARDS_PATH, &body).await?;
        Ok(response.flashcards)
    }

    async fn generate_study_plan(
        &self,
        text: &str,
        level: StudentLevel,
        days: u32,
    ) -> PortResult<String> {
        let body = StudyTextRequest {
            text,
            student_level: level,
            days: Some(days),
        };
        let response: StudyPlanResponse = self.post_json(STUDY_PLAN_PATH, &body).await?;
        Ok(response.plan)
    }

    async fn generate_questions(
        &self,
        text: &str,
        count: u32,
        difficulty: QuestionDifficulty,
    ) -> PortResult<Vec<MultipleChoiceQuestion>> {
        let body = QuestionsRequest {
            text,
            count,
            difficulty,
        };
        let response: QuestionResponse = self.post_json(QUESTIONS_PATH, &body).await?;
        Ok(response.perguntas)
    }
}

#[async_trait]
impl DocumentExtractionService for HttpStudyClient {
    async fn extract_chunks(&self, file: &UploadFile) -> PortResult<Vec<String>> {
        let part = multipart::Part::bytes(file.data.to_vec())
            .file_name(file.name.clone())
            .mime_str(&file.mime_type)
            .map_err(|e| PortError::Unexpected(format!("invalid MIME type: {e}")))?;
        let form = multipart::Form::new().part("file", part);

        let request = self.client.post(self.base.url(UPLOAD_PDF_PATH)).multipart(form);
        let response: UploadResponse = self.execute(UPLOAD_PDF_PATH, request).await?;
        Ok(response.chunks)
    }
}
