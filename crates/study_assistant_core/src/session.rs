//! crates/study_assistant_core/src/session.rs
//!
//! The top-level orchestration session. It owns the only copy of the mutable
//! state (content, upload, busy flags, error message) and hands shared access to
//! the generation dispatcher and the upload coordinator.

use crate::content::ContentStore;
use crate::dispatcher::{GenerationDispatcher, GenerationError};
use crate::domain::{
    Artifact, Feature, GenerationParams, ParamsPanel, QuestionDifficulty, StudentLevel,
    UploadFile, UploadState,
};
use crate::ports::{DocumentExtractionService, StudyContentService};
use crate::presentation::{self, Presentation};
use crate::upload::{UploadCoordinator, UploadError, UploadOutcome};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

//=========================================================================================
// SessionState
//=========================================================================================

/// Everything the user sees, in one place. Only the dispatcher and the upload
/// coordinator write to it, and only between suspension points.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub level: StudentLevel,
    pub params: GenerationParams,
    pub active_feature: Feature,
    pub upload: UploadState,
    pub content: ContentStore,
    pub is_generating: bool,
    pub error: Option<String>,
    /// Bumped by every `set_file` call; an upload completion only lands if it still matches.
    pub(crate) upload_seq: u64,
    /// Bumped whenever the content store is wiped; a generation only lands if it still matches.
    pub(crate) content_epoch: u64,
}

impl SessionState {
    /// The combined busy flag that disables every trigger.
    pub fn is_busy(&self) -> bool {
        self.is_generating || self.upload.uploading
    }

    pub fn has_input(&self) -> bool {
        !self.upload.input_text.trim().is_empty()
    }
}

pub type SharedSession = Arc<Mutex<SessionState>>;

//=========================================================================================
// StudySession
//=========================================================================================

/// The coordinating context a front end drives.
pub struct StudySession {
    state: SharedSession,
    dispatcher: GenerationDispatcher,
    uploader: UploadCoordinator,
}

impl StudySession {
    pub fn new(
        content_service: Arc<dyn StudyContentService>,
        extraction_service: Arc<dyn DocumentExtractionService>,
    ) -> Self {
        let state: SharedSession = Arc::new(Mutex::new(SessionState::default()));
        Self {
            dispatcher: GenerationDispatcher::new(content_service, state.clone()),
            uploader: UploadCoordinator::new(extraction_service, state.clone()),
            state,
        }
    }

    pub fn dispatcher(&self) -> &GenerationDispatcher {
        &self.dispatcher
    }

    pub fn uploader(&self) -> &UploadCoordinator {
        &self.uploader
    }

    // --- Feature selection ---

    /// Changes which panel is shown. Never triggers generation or clears a slot.
    pub async fn select_feature(&self, feature: Feature) {
        let mut state = self.state.lock().await;
        debug!(from = ?state.active_feature, to = ?feature, "Feature selected");
        state.active_feature = feature;
    }

    pub async fn active_feature(&self) -> Feature {
        self.state.lock().await.active_feature
    }

    /// The parameter panel for the active feature, whether or not it has been generated.
    pub async fn params_panel(&self) -> ParamsPanel {
        self.state.lock().await.active_feature.params_panel()
    }

    // --- Parameters ---

    pub async fn set_level(&self, level: StudentLevel) {
        self.state.lock().await.level = level;
    }

    pub async fn set_plan_days(&self, days: u32) {
        self.state.lock().await.params.set_days(days);
    }

    pub async fn set_question_count(&self, count: u32) {
        self.state.lock().await.params.set_question_count(count);
    }

    pub async fn set_difficulty(&self, difficulty: QuestionDifficulty) {
        self.state.lock().await.params.difficulty = difficulty;
    }

    /// Replaces the study material with typed or pasted text.
    pub async fn set_input_text(&self, text: impl Into<String>) {
        self.state.lock().await.upload.input_text = text.into();
    }

    // --- Actions ---

    /// Generates the artifact for the active feature.
    pub async fn generate(&self) -> Result<Artifact, GenerationError> {
        let feature = self.active_feature().await;
        self.dispatcher.generate(feature).await
    }

    pub async fn set_file(&self, file: Option<UploadFile>) -> Result<UploadOutcome, UploadError> {
        self.uploader.set_file(file).await
    }

    // --- Read side ---

    /// Whether the generate trigger should be enabled.
    pub async fn can_generate(&self) -> bool {
        let state = self.state.lock().await;
        !state.is_busy() && state.has_input()
    }

    pub async fn error(&self) -> Option<String> {
        self.state.lock().await.error.clone()
    }

    pub async fn snapshot(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    /// Runs `f` against the presentation of the active feature.
    pub async fn render<R>(&self, f: impl FnOnce(&Presentation<'_>) -> R) -> R {
        let state = self.state.lock().await;
        let view = presentation::select(state.active_feature, &state.content, state.is_busy());
        f(&view)
    }
}
