//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use crate::config::Config;
use crate::generation::StudyGenerator;
use std::sync::Arc;
use study_assistant_core::ports::TextExtractionService;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub generator: StudyGenerator,
    pub pdf_extractor: Arc<dyn TextExtractionService>,
}
