pub mod rest;
pub mod state;


use axum::{
    extract::DefaultBodyLimit,
    http::Method,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

pub use rest::ApiDoc;
pub use state::AppState;

/// Builds the service router: the health check at the root and the study
/// endpoints under `/api/v1`.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    let api = Router::new()
        .route("/upload-pdf/", post(rest::upload_pdf_handler))
        .route("/generate-summary/", post(rest::generate_summary_handler))
        .route("/generate-quiz/", post(rest::generate_quiz_handler))
        .route("/generate-flashcards/", post(rest::generate_flashcards_handler))
        .route("/generate-study-plan/", post(rest::generate_study_plan_handler))
        .route("/generate-questions/", post(rest::generate_questions_handler));

    Router::new()
        .route("/", get(rest::health_handler))
        .nest("/api/v1", api)
        .layer(DefaultBodyLimit::max(state.config.max_upload_bytes))
        .layer(cors)
        .with_state(state)
}
