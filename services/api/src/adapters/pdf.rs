//! services/api/src/adapters/pdf.rs
//!
//! Implements the `TextExtractionService` port with `pdf-extract`. Parsing is CPU-bound,
//! so it runs on the blocking pool.

use async_trait::async_trait;
use study_assistant_core::ports::{PortError, PortResult, TextExtractionService};
use tracing::warn;

#[derive(Clone, Default)]
pub struct PdfTextAdapter;

impl PdfTextAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TextExtractionService for PdfTextAdapter {
    async fn extract_text(&self, pdf_bytes: &[u8]) -> PortResult<String> {
        let bytes = pdf_bytes.to_vec();
        tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
            .await
            .map_err(|e| PortError::Unexpected(format!("PDF extraction task failed: {e}")))?
            .map_err(|e| {
                warn!(error = %e, "Could not read PDF");
                PortError::MalformedResponse(e.to_string())
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn bytes_that_are_not_a_pdf_are_rejected() {
        let err = PdfTextAdapter::new()
            .extract_text(b"definitely not a pdf")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            PortError::MalformedResponse(_) | PortError::Unexpected(_)
        ));
    }
}
