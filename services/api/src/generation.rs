//! services/api/src/generation.rs
//!
//! The content pipelines behind the generation endpoints. Every model call goes
//! through `StudyGenerator::call`, which enforces the request timeout and turns
//! provider failures into the service's user-facing errors.

use crate::error::HttpError;
use axum::http::StatusCode;
use futures::future::try_join_all;
use serde::{de::DeserializeOwned, Deserialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use study_assistant_core::{
    domain::{
        clamp_days, clamp_question_count, Feature, Flashcard, MultipleChoiceQuestion,
        QuestionDifficulty, QuizQuestion, StudentLevel,
    },
    ports::{LanguageModelService, OutputFormat, PortError, SummaryCacheService},
};
use tracing::{error, info, warn};
use uuid::Uuid;

/// Only the first chunks of a long document are summarized.
pub const MAX_CHUNKS_FOR_SUMMARY: usize = 10;

const PARTIAL_SUMMARY_SEPARATOR: &str = "\n\n---\n\n";

//=========================================================================================
// Structured Payloads
//=========================================================================================

#[derive(Deserialize)]
struct QuizPayload {
    quiz: Vec<QuizQuestion>,
}

#[derive(Deserialize)]
struct FlashcardPayload {
    flashcards: Vec<Flashcard>,
}

#[derive(Deserialize)]
struct QuestionPayload {
    perguntas: Vec<MultipleChoiceQuestion>,
}

//=========================================================================================
// Failures
//=========================================================================================

#[derive(Debug, thiserror::Error)]
pub enum GenerationFailure {
    #[error("There are no chunks to summarize")]
    NoContent,
    #[error("The model call timed out")]
    Timeout,
    #[error("The model provider failed: {0}")]
    Unavailable(PortError),
    #[error("The model returned an invalid {feature:?} payload: {reason}")]
    InvalidFormat { feature: Feature, reason: String },
}

impl From<GenerationFailure> for HttpError {
    fn from(failure: GenerationFailure) -> Self {
        match failure {
            GenerationFailure::NoContent => {
                HttpError::unprocessable("Não há conteúdo (chunks) para gerar um resumo.")
            }
            GenerationFailure::Timeout => HttpError::new(
                StatusCode::GATEWAY_TIMEOUT,
                "A geração de conteúdo demorou demais para responder.",
            ),
            GenerationFailure::Unavailable(_) => HttpError::new(
                StatusCode::SERVICE_UNAVAILABLE,
                "O serviço de IA está indisponível no momento.",
            ),
            GenerationFailure::InvalidFormat { feature, .. } => {
                let noun = match feature {
                    Feature::Quiz => "quiz",
                    Feature::Flashcards => "flashcards",
                    Feature::Questions => "perguntas",
                    Feature::Summary => "resumo",
                    Feature::Plan => "plano de estudos",
                };
                HttpError::internal(format!("Formato de resposta da IA para {noun} inválido."))
            }
        }
    }
}

//=========================================================================================
// Prompts
//=========================================================================================

fn chunk_summary_prompt(chunk: &str) -> String {
    format!(
        "Resuma o seguinte fragmento de texto de forma concisa em português do Brasil, \
         extraindo os pontos mais importantes:\n---\n{chunk}"
    )
}

fn reduce_prompt(level: StudentLevel, combined: &str) -> String {
    format!(
        "Combine os seguintes resumos parciais em um único resumo final, coeso e \
         bem-estruturado em português do Brasil. Adapte a linguagem para um estudante de \
         nível '{level}'. Organize com cabeçalhos e listas em markdown.\n\nResumos:\n---\n{combined}"
    )
}

fn quiz_prompt(text: &str, level: StudentLevel) -> String {
    format!(
        "Com base no texto fornecido, gere um quiz com 5 perguntas para avaliar o conhecimento. \
         Inclua 2 perguntas de múltipla escolha (com 4 opções, uma correta), 2 perguntas de \
         verdadeiro ou falso, e 1 pergunta aberta. Forneça uma explicação concisa para cada \
         resposta. Nível do aluno: {level}. Texto:\n\n---\n\n{text}"
    )
}

fn flashcards_prompt(text: &str, level: StudentLevel) -> String {
    format!(
        "Crie 5 flashcards do tipo 'pergunta e resposta' com base nos conceitos mais importantes \
         do texto a seguir. As perguntas (frente do card) devem ser diretas e as respostas (verso \
         do card) concisas e informativas. Nível do aluno: {level}. Texto:\n\n---\n\n{text}"
    )
}

fn study_plan_prompt(text: &str, level: StudentLevel, days: u32) -> String {
    format!(
        "Crie um plano de estudos detalhado de {days} dias com base no seguinte texto. Para cada \
         dia, liste os principais tópicos a serem estudados e sugira uma atividade prática (como \
         responder a perguntas ou criar um mapa mental). Formate a resposta usando markdown com \
         cabeçalhos para cada dia (ex: '## Dia 1'). Nível do aluno: {level}. Texto:\n\n---\n\n{text}"
    )
}

fn questions_prompt(text: &str, count: u32, difficulty: QuestionDifficulty) -> String {
    format!(
        "Usando apenas o conteúdo abaixo, gere um quiz em português do Brasil. Regras: total de \
         {count} perguntas, nível de dificuldade '{difficulty}', apenas múltipla escolha com 4 \
         alternativas (A, B, C, D) e uma correta. Indique a resposta correta. Não inclua \
         explicações. Baseie-se estritamente no conteúdo. Conteúdo:\n{text}"
    )
}

//=========================================================================================
// StudyGenerator
//=========================================================================================

/// The deterministic cache key of a chunked document.
pub fn document_id(chunks: &[String]) -> Uuid {
    Uuid::new_v5(&Uuid::NAMESPACE_OID, chunks.concat().as_bytes())
}

#[derive(Clone)]
pub struct StudyGenerator {
    llm: Arc<dyn LanguageModelService>,
    cache: Arc<dyn SummaryCacheService>,
    timeout: Duration,
}

impl StudyGenerator {
    pub fn new(
        llm: Arc<dyn LanguageModelService>,
        cache: Arc<dyn SummaryCacheService>,
        timeout: Duration,
    ) -> Self {
        Self { llm, cache, timeout }
    }

    async fn call(&self, prompt: &str, format: OutputFormat) -> Result<String, GenerationFailure> {
        match tokio::time::timeout(self.timeout, self.llm.complete(prompt, format)).await {
            Err(_) => {
                error!(timeout = ?self.timeout, "Model call timed out");
                Err(GenerationFailure::Timeout)
            }
            Ok(Err(e)) => {
                error!(error = %e, "Model call failed");
                Err(GenerationFailure::Unavailable(e))
            }
            Ok(Ok(text)) => Ok(text),
        }
    }

    /// Summarizes a chunked document, reusing a cached summary for the same level.
    pub async fn summarize(
        &self,
        chunks: &[String],
        level: StudentLevel,
    ) -> Result<String, GenerationFailure> {
        if chunks.is_empty() {
            return Err(GenerationFailure::NoContent);
        }
        let document_id = document_id(chunks);

        match self.cache.get_cached_summary(document_id, level).await {
            Ok(Some(summary)) => {
                info!(%document_id, %level, "Summary cache hit");
                return Ok(summary);
            }
            Ok(None) => info!(%document_id, %level, "Summary cache miss"),
            Err(e) => warn!(%document_id, error = %e, "Summary cache lookup failed"),
        }

        let summary = self.map_reduce(chunks, level).await?;

        if let Err(e) = self.cache.save_summary(document_id, level, &summary).await {
            warn!(%document_id, error = %e, "Failed to store summary in cache");
        }
        Ok(summary)
    }

    async fn map_reduce(
        &self,
        chunks: &[String],
        level: StudentLevel,
    ) -> Result<String, GenerationFailure> {
        if chunks.len() > MAX_CHUNKS_FOR_SUMMARY {
            warn!(
                chunk_count = chunks.len(),
                limit = MAX_CHUNKS_FOR_SUMMARY,
                "Too many chunks; only the first ones are summarized"
            );
        }
        let limited = &chunks[..chunks.len().min(MAX_CHUNKS_FOR_SUMMARY)];

        let map_start = Instant::now();
        let prompts: Vec<String> = limited.iter().map(|c| chunk_summary_prompt(c)).collect();
        let partials = try_join_all(
            prompts
                .iter()
                .map(|prompt| self.call(prompt, OutputFormat::Text)),
        )
        .await?;
        info!(elapsed = ?map_start.elapsed(), chunks = limited.len(), "Map phase finished");

        let reduce_start = Instant::now();
        let combined = partials.join(PARTIAL_SUMMARY_SEPARATOR);
        let summary = self
            .call(&reduce_prompt(level, &combined), OutputFormat::Text)
            .await?;
        info!(elapsed = ?reduce_start.elapsed(), "Reduce phase finished");
        Ok(summary)
    }

    pub async fn quiz(
        &self,
        text: &str,
        level: StudentLevel,
    ) -> Result<Vec<QuizQuestion>, GenerationFailure> {
        let raw = self
            .call(&quiz_prompt(text, level), OutputFormat::Structured(Feature::Quiz))
            .await?;
        let payload: QuizPayload = parse_payload(Feature::Quiz, &raw)?;
        if let Some(bad) = payload.quiz.iter().position(|q| !q.is_well_formed()) {
            return Err(GenerationFailure::InvalidFormat {
                feature: Feature::Quiz,
                reason: format!("question {} has options that do not match its type", bad + 1),
            });
        }
        Ok(payload.quiz)
    }

    pub async fn flashcards(
        &self,
        text: &str,
        level: StudentLevel,
    ) -> Result<Vec<Flashcard>, GenerationFailure> {
        let raw = self
            .call(
                &flashcards_prompt(text, level),
                OutputFormat::Structured(Feature::Flashcards),
            )
            .await?;
        let payload: FlashcardPayload = parse_payload(Feature::Flashcards, &raw)?;
        Ok(payload.flashcards)
    }

    pub async fn study_plan(
        &self,
        text: &str,
        level: StudentLevel,
        days: u32,
    ) -> Result<String, GenerationFailure> {
        let days = clamp_days(days);
        self.call(&study_plan_prompt(text, level, days), OutputFormat::Text)
            .await
    }

    pub async fn questions(
        &self,
        text: &str,
        count: u32,
        difficulty: QuestionDifficulty,
    ) -> Result<Vec<MultipleChoiceQuestion>, GenerationFailure> {
        let count = clamp_question_count(count);
        let raw = self
            .call(
                &questions_prompt(text, count, difficulty),
                OutputFormat::Structured(Feature::Questions),
            )
            .await?;
        let payload: QuestionPayload = parse_payload(Feature::Questions, &raw)?;
        Ok(payload.perguntas)
    }
}

/// Decodes a structured model answer, tolerating a surrounding markdown code fence.
fn parse_payload<T: DeserializeOwned>(feature: Feature, raw: &str) -> Result<T, GenerationFailure> {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| {
        error!(?feature, error = %e, "Failed to parse model JSON");
        GenerationFailure::InvalidFormat {
            feature,
            reason: e.to_string(),
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{FakeLanguageModel, InMemorySummaryCache};

    fn generator(llm: Arc<FakeLanguageModel>, cache: Arc<InMemorySummaryCache>) -> StudyGenerator {
        StudyGenerator::new(llm, cache, Duration::from_secs(5))
    }

    fn chunks(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("parte {i}")).collect()
    }

    #[tokio::test]
    async fn summary_maps_each_chunk_then_reduces() {
        let llm = Arc::new(FakeLanguageModel::default());
        let generator = generator(llm.clone(), Arc::new(InMemorySummaryCache::default()));

        let summary = generator.summarize(&chunks(3), StudentLevel::Medio).await.unwrap();

        let prompts = llm.prompts();
        assert_eq!(prompts.len(), 4);
        let reduce = prompts.last().unwrap();
        assert!(reduce.contains("nível 'Ensino Médio'"));
        assert_eq!(reduce.matches(PARTIAL_SUMMARY_SEPARATOR).count(), 2);
        assert_eq!(summary, llm.text_answer());
    }

    #[tokio::test]
    async fn summary_uses_at_most_ten_chunks() {
        let llm = Arc::new(FakeLanguageModel::default());
        let generator = generator(llm.clone(), Arc::new(InMemorySummaryCache::default()));

        generator.summarize(&chunks(14), StudentLevel::Graduacao).await.unwrap();

        assert_eq!(llm.prompts().len(), MAX_CHUNKS_FOR_SUMMARY + 1);
    }

    #[tokio::test]
    async fn cached_summary_skips_the_model() {
        let llm = Arc::new(FakeLanguageModel::default());
        let cache = Arc::new(InMemorySummaryCache::default());
        let generator = generator(llm.clone(), cache.clone());

        let first = generator.summarize(&chunks(2), StudentLevel::Medio).await.unwrap();
        let calls_after_first = llm.prompts().len();
        let second = generator.summarize(&chunks(2), StudentLevel::Medio).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(llm.prompts().len(), calls_after_first);

        // A different level is a different cache entry.
        generator.summarize(&chunks(2), StudentLevel::Fundamental).await.unwrap();
        assert!(llm.prompts().len() > calls_after_first);
    }

    #[tokio::test]
    async fn cache_failures_do_not_fail_the_summary() {
        let llm = Arc::new(FakeLanguageModel::default());
        let generator = generator(llm.clone(), Arc::new(InMemorySummaryCache::broken()));

        let summary = generator.summarize(&chunks(1), StudentLevel::Medio).await.unwrap();

        assert_eq!(summary, llm.text_answer());
    }

    #[tokio::test]
    async fn fresh_summaries_are_stored() {
        let cache = Arc::new(InMemorySummaryCache::default());
        let generator = generator(Arc::new(FakeLanguageModel::default()), cache.clone());

        generator.summarize(&chunks(2), StudentLevel::Medio).await.unwrap();

        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn empty_chunks_are_rejected() {
        let generator = generator(
            Arc::new(FakeLanguageModel::default()),
            Arc::new(InMemorySummaryCache::default()),
        );
        let err = generator.summarize(&[], StudentLevel::Medio).await.unwrap_err();
        assert_eq!(HttpError::from(err).status, StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn slow_model_times_out() {
        let llm = Arc::new(FakeLanguageModel::default().with_delay(Duration::from_millis(200)));
        let generator = StudyGenerator::new(
            llm,
            Arc::new(InMemorySummaryCache::default()),
            Duration::from_millis(20),
        );

        let err = generator.study_plan("Texto", StudentLevel::Medio, 3).await.unwrap_err();

        let http = HttpError::from(err);
        assert_eq!(http.status, StatusCode::GATEWAY_TIMEOUT);
        assert_eq!(http.detail, "A geração de conteúdo demorou demais para responder.");
    }

    #[tokio::test]
    async fn provider_failure_is_unavailable() {
        let llm = Arc::new(FakeLanguageModel::failing(PortError::Unexpected("503".to_string())));
        let generator = generator(llm, Arc::new(InMemorySummaryCache::default()));

        let err = generator.flashcards("Texto", StudentLevel::Medio).await.unwrap_err();

        assert_eq!(HttpError::from(err).status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn structured_answers_are_parsed_even_inside_code_fences() {
        let llm = Arc::new(FakeLanguageModel::default().fenced());
        let generator = generator(llm, Arc::new(InMemorySummaryCache::default()));

        let questions = generator
            .questions("Texto", 3, QuestionDifficulty::Easy)
            .await
            .unwrap();

        assert_eq!(questions.len(), 1);
    }

    #[tokio::test]
    async fn invalid_json_reports_feature_specific_detail() {
        let llm = Arc::new(FakeLanguageModel::default().with_structured_answer("não é json"));
        let generator = generator(llm, Arc::new(InMemorySummaryCache::default()));

        let err = generator.quiz("Texto", StudentLevel::Medio).await.unwrap_err();

        let http = HttpError::from(err);
        assert_eq!(http.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(http.detail, "Formato de resposta da IA para quiz inválido.");
    }

    #[tokio::test]
    async fn quiz_with_mismatched_options_is_invalid() {
        let answer = r#"{"quiz":[{"pergunta":"?","tipo":"aberta","opcoes":["a","b"],"resposta_correta":"a","explicacao":"."}]}"#;
        let llm = Arc::new(FakeLanguageModel::default().with_structured_answer(answer));
        let generator = generator(llm, Arc::new(InMemorySummaryCache::default()));

        let err = generator.quiz("Texto", StudentLevel::Medio).await.unwrap_err();

        assert!(matches!(err, GenerationFailure::InvalidFormat { feature: Feature::Quiz, .. }));
    }

    #[tokio::test]
    async fn parameters_are_clamped_into_prompts() {
        let llm = Arc::new(FakeLanguageModel::default());
        let generator = generator(llm.clone(), Arc::new(InMemorySummaryCache::default()));

        generator.study_plan("Texto", StudentLevel::Medio, 90).await.unwrap();
        generator.questions("Texto", 0, QuestionDifficulty::Hard).await.unwrap();

        let prompts = llm.prompts();
        assert!(prompts[0].contains("plano de estudos detalhado de 30 dias"));
        assert!(prompts[1].contains("total de 1 perguntas, nível de dificuldade 'Difícil'"));
    }

    #[test]
    fn document_id_is_deterministic() {
        assert_eq!(document_id(&chunks(2)), document_id(&chunks(2)));
        assert_ne!(document_id(&chunks(2)), document_id(&chunks(3)));
    }
}
