//! In-memory stand-ins for the model provider, the summary cache and the PDF reader.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use study_assistant_core::domain::{Feature, StudentLevel};
use study_assistant_core::ports::{
    LanguageModelService, OutputFormat, PortError, PortResult, SummaryCacheService,
    TextExtractionService,
};
use uuid::Uuid;

const TEXT_ANSWER: &str = "## Visão Geral\nA fotossíntese converte luz em energia química.";

fn structured_answer(feature: Feature) -> String {
    match feature {
        Feature::Quiz => r#"{"quiz":[
            {"pergunta":"Onde ocorre a fotossíntese?","tipo":"multipla_escolha","opcoes":["Cloroplasto","Mitocôndria","Núcleo","Ribossomo"],"resposta_correta":"Cloroplasto","explicacao":"Os cloroplastos contêm clorofila."},
            {"pergunta":"A fotossíntese libera oxigênio.","tipo":"verdadeiro_falso","opcoes":null,"resposta_correta":"Verdadeiro","explicacao":"O oxigênio vem da água."}
        ]}"#
        .to_string(),
        Feature::Flashcards => {
            r#"{"flashcards":[{"frente":"O que é clorofila?","verso":"O pigmento que absorve luz."}]}"#
                .to_string()
        }
        Feature::Questions => r#"{"perguntas":[{"pergunta":"Qual pigmento absorve luz?","alternativas":{"A":"Clorofila","B":"Melanina","C":"Queratina","D":"Hemoglobina"},"resposta_correta":"A"}]}"#
            .to_string(),
        Feature::Summary | Feature::Plan => TEXT_ANSWER.to_string(),
    }
}

#[derive(Default)]
pub struct FakeLanguageModel {
    prompts: Mutex<Vec<String>>,
    delay: Option<Duration>,
    failure: Option<PortError>,
    structured_override: Option<String>,
    fenced: bool,
}

impl FakeLanguageModel {
    pub fn failing(error: PortError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn with_structured_answer(mut self, answer: &str) -> Self {
        self.structured_override = Some(answer.to_string());
        self
    }

    /// Wraps structured answers in a markdown code fence.
    pub fn fenced(mut self) -> Self {
        self.fenced = true;
        self
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn text_answer(&self) -> String {
        TEXT_ANSWER.to_string()
    }
}

#[async_trait]
impl LanguageModelService for FakeLanguageModel {
    async fn complete(&self, prompt: &str, format: OutputFormat) -> PortResult<String> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = &self.failure {
            return Err(error.clone());
        }
        match format {
            OutputFormat::Text => Ok(TEXT_ANSWER.to_string()),
            OutputFormat::Structured(feature) => {
                let answer = self
                    .structured_override
                    .clone()
                    .unwrap_or_else(|| structured_answer(feature));
                if self.fenced {
                    Ok(format!("```json\n{answer}\n```"))
                } else {
                    Ok(answer)
                }
            }
        }
    }
}

#[derive(Default)]
pub struct InMemorySummaryCache {
    entries: Mutex<HashMap<(Uuid, StudentLevel), String>>,
    broken: bool,
}

impl InMemorySummaryCache {
    /// A cache whose every operation fails.
    pub fn broken() -> Self {
        Self {
            broken: true,
            ..Self::default()
        }
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl SummaryCacheService for InMemorySummaryCache {
    async fn get_cached_summary(
        &self,
        document_id: Uuid,
        level: StudentLevel,
    ) -> PortResult<Option<String>> {
        if self.broken {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(&(document_id, level)).cloned())
    }

    async fn save_summary(
        &self,
        document_id: Uuid,
        level: StudentLevel,
        summary_text: &str,
    ) -> PortResult<()> {
        if self.broken {
            return Err(PortError::Unexpected("connection refused".to_string()));
        }
        self.entries
            .lock()
            .unwrap()
            .insert((document_id, level), summary_text.to_string());
        Ok(())
    }
}

/// Treats the uploaded bytes as the document's UTF-8 text.
#[derive(Default)]
pub struct FakePdfExtractor;

#[async_trait]
impl TextExtractionService for FakePdfExtractor {
    async fn extract_text(&self, pdf_bytes: &[u8]) -> PortResult<String> {
        String::from_utf8(pdf_bytes.to_vec()).map_err(|e| PortError::MalformedResponse(e.to_string()))
    }
}
