//! crates/study_assistant_core/src/upload.rs
//!
//! Converts a selected file into study material through the external extraction
//! service. Each call is tagged with a sequence number; a completion that no
//! longer matches the latest call is dropped.

use crate::domain::{UploadFile, UploadState};
use crate::ports::{DocumentExtractionService, PortError};
use crate::session::SharedSession;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Blocking alert shown for a file that is not a document.
pub const UNSUPPORTED_FILE_MESSAGE: &str = "Por favor, selecione um arquivo PDF.";

/// Used when the extraction service failed without a detail message.
pub const UPLOAD_FAILED_MESSAGE: &str = "Ocorreu um erro na comunicação com o servidor.";

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    #[error("Unsupported file type: {mime_type}")]
    UnsupportedFileType { mime_type: String },
    #[error("Extraction failed: {0}")]
    Extraction(#[from] PortError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The file was removed and the session reset.
    Cleared,
    /// Extraction succeeded and the chunks became the input text.
    Extracted { chunk_count: usize },
    /// A newer `set_file` call replaced this one before it finished.
    Superseded,
}

#[derive(Clone)]
pub struct UploadCoordinator {
    service: Arc<dyn DocumentExtractionService>,
    session: SharedSession,
}

impl UploadCoordinator {
    pub fn new(service: Arc<dyn DocumentExtractionService>, session: SharedSession) -> Self {
        Self { service, session }
    }

    pub async fn set_file(&self, file: Option<UploadFile>) -> Result<UploadOutcome, UploadError> {
        let Some(file) = file else {
            let mut state = self.session.lock().await;
            state.upload_seq += 1;
            state.upload = UploadState::default();
            state.content.clear_all();
            state.content_epoch += 1;
            state.error = None;
            return Ok(UploadOutcome::Cleared);
        };

        if !file.is_document() {
            warn!(file_name = %file.name, mime_type = %file.mime_type, "Rejected non-document upload");
            return Err(UploadError::UnsupportedFileType {
                mime_type: file.mime_type,
            });
        }

        let seq = {
            let mut state = self.session.lock().await;
            state.upload_seq += 1;
            state.upload = UploadState {
                file_name: Some(file.name.clone()),
                uploading: true,
                ..UploadState::default()
            };
            state.content.clear_all();
            state.content_epoch += 1;
            state.error = None;
            state.upload_seq
        };

        info!(file_name = %file.name, bytes = file.data.len(), "Upload started");
        let result = self.service.extract_chunks(&file).await;

        let mut state = self.session.lock().await;
        if state.upload_seq != seq {
            info!(file_name = %file.name, "Discarding result of a superseded upload");
            return Ok(UploadOutcome::Superseded);
        }

        match result {
            Ok(chunks) => {
                let chunk_count = chunks.len();
                state.upload = UploadState::from_chunks(Some(file.name.clone()), chunks);
                info!(file_name = %file.name, chunk_count, "Upload finished");
                Ok(UploadOutcome::Extracted { chunk_count })
            }
            Err(e) => {
                error!(file_name = %file.name, error = %e, "Upload failed");
                state.error = Some(e.detail().unwrap_or(UPLOAD_FAILED_MESSAGE).to_string());
                state.upload.file_name = None;
                state.upload.uploading = false;
                Err(UploadError::Extraction(e))
            }
        }
    }
}
