//! crates/study_assistant_core/src/dispatcher.rs
//!
//! Turns a requested feature into exactly one backend call and merges the
//! result back into the content store. One generation may be in flight per session.

use crate::domain::{Artifact, Feature, GenerationParams, StudentLevel, CHUNK_SEPARATOR};
use crate::ports::{PortError, PortResult, StudyContentService};
use crate::session::{SessionState, SharedSession};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shown when generation is triggered without study material.
pub const EMPTY_INPUT_MESSAGE: &str = "Por favor, insira o material de estudo.";

/// Shown for every non-validation failure. Internal error kinds are only logged.
pub const GENERATION_FAILED_MESSAGE: &str =
    "Ocorreu um erro ao gerar o conteúdo. Por favor, tente novamente.";

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("No study material was provided")]
    EmptyInput,
    #[error("Another operation is already in progress")]
    Busy,
    /// The study material was cleared or replaced while the call was in flight,
    /// so the result was dropped.
    #[error("The study material changed while generating; the result was discarded")]
    Superseded,
    #[error("Generation failed: {0}")]
    Service(#[from] PortError),
}

/// Everything one backend call needs, captured when the call is issued.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub feature: Feature,
    pub text: String,
    pub chunks: Vec<String>,
    pub level: StudentLevel,
    pub params: GenerationParams,
}

impl GenerationRequest {
    pub fn from_state(state: &SessionState, feature: Feature) -> Self {
        let upload = &state.upload;
        // Uploaded chunks are only reused while the text still matches them.
        let chunks = if !upload.chunks.is_empty()
            && upload.chunks.join(CHUNK_SEPARATOR) == upload.input_text
        {
            upload.chunks.clone()
        } else {
            vec![upload.input_text.trim().to_string()]
        };

        Self {
            feature,
            text: upload.input_text.clone(),
            chunks,
            level: state.level,
            params: state.params,
        }
    }
}

#[derive(Clone)]
pub struct GenerationDispatcher {
    service: Arc<dyn StudyContentService>,
    session: SharedSession,
}

impl GenerationDispatcher {
    pub fn new(service: Arc<dyn StudyContentService>, session: SharedSession) -> Self {
        Self { service, session }
    }

    /// Generates `feature` from the session's current input and parameters.
    ///
    /// Rejected with `Busy` (and no state change) while any generation or upload is
    /// pending. Rejected with `EmptyInput` before any network call when the input is
    /// blank. Otherwise the target slot is cleared, the backend is called once, and the
    /// typed result lands in that slot; other slots are never touched. If the material
    /// is cleared or replaced before the call returns, the outcome is dropped and
    /// `Superseded` is returned.
    pub async fn generate(&self, feature: Feature) -> Result<Artifact, GenerationError> {
        let (request, epoch) = {
            let mut state = self.session.lock().await;
            if state.is_busy() {
                warn!(?feature, "Generation ignored: session is busy");
                return Err(GenerationError::Busy);
            }
            if !state.has_input() {
                state.error = Some(EMPTY_INPUT_MESSAGE.to_string());
                return Err(GenerationError::EmptyInput);
            }
            state.is_generating = true;
            state.error = None;
            state.content.clear(feature);
            (GenerationRequest::from_state(&state, feature), state.content_epoch)
        };

        info!(?feature, level = %request.level, "Generation started");
        let result = self.call_backend(&request).await.and_then(|artifact| {
            if artifact.is_empty() {
                Err(PortError::EmptyModelOutput)
            } else {
                Ok(artifact)
            }
        });

        let mut state = self.session.lock().await;
        state.is_generating = false;
        if state.content_epoch != epoch {
            match &result {
                Ok(_) => info!(?feature, "Discarding generation result for a replaced document"),
                Err(e) => info!(?feature, error = %e, "Ignoring generation failure for a replaced document"),
            }
            return Err(GenerationError::Superseded);
        }
        match result {
            Ok(artifact) => {
                state.content.put(artifact.clone());
                state.error = None;
                info!(?feature, "Generation finished");
                Ok(artifact)
            }
            Err(e) => {
                error!(?feature, error = %e, "Generation failed");
                state.error = Some(GENERATION_FAILED_MESSAGE.to_string());
                Err(GenerationError::Service(e))
            }
        }
    }

    async fn call_backend(&self, request: &GenerationRequest) -> PortResult<Artifact> {
        let service = &self.service;
        match request.feature {
            Feature::Summary => service
                .generate_summary(&request.chunks, request.level)
                .await
                .map(Artifact::Summary),
            Feature::Quiz => service
                .generate_quiz(&request.text, request.level)
                .await
                .map(Artifact::Quiz),
            Feature::Flashcards => service
                .generate_flashcards(&request.text, request.level)
                .await
                .map(Artifact::Flashcards),
            Feature::Plan => service
                .generate_study_plan(&request.text, request.level, request.params.days())
                .await
                .map(Artifact::Plan),
            Feature::Questions => service
                .generate_questions(
                    &request.text,
                    request.params.question_count(),
                    request.params.difficulty,
                )
                .await
                .map(Artifact::Questions),
        }
    }
}
