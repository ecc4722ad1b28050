//! crates/study_assistant_client/src/bin/study.rs
//!
//! Terminal front end: loads study material (pasted text or a PDF), generates one
//! feature through the backend and prints the result panel.

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use study_assistant_client::{render::render, ApiBase, HttpStudyClient};
use study_assistant_core::{
    domain::{Feature, QuestionDifficulty, StudentLevel, UploadFile},
    StudySession,
};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(
    name = "study",
    about = "Gera resumos, quizzes, flashcards, planos de estudo e perguntas a partir do seu material."
)]
struct Cli {
    /// Origin the front end is served from; decides which backend base is used.
    #[arg(long, default_value = "http://localhost:5173")]
    origin: String,

    /// Ensino Fundamental | Ensino Médio | Graduação
    #[arg(long, default_value = "Ensino Médio", value_parser = parse_level)]
    level: StudentLevel,

    /// resumo | quiz | flashcards | plano | perguntas
    #[arg(long, default_value = "resumo", value_parser = parse_feature)]
    feature: Feature,

    /// Study plan length in days (1-30).
    #[arg(long, default_value_t = 7)]
    days: u32,

    /// Number of questions in the question bank (1-20).
    #[arg(long, default_value_t = 5)]
    count: u32,

    /// Fácil | Médio | Difícil
    #[arg(long, default_value = "Médio", value_parser = parse_difficulty)]
    difficulty: QuestionDifficulty,

    /// A PDF whose extracted text becomes the study material.
    #[arg(long, conflicts_with = "text")]
    file: Option<PathBuf>,

    /// Study material given inline.
    #[arg(long)]
    text: Option<String>,

    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn parse_level(value: &str) -> Result<StudentLevel, String> {
    StudentLevel::parse(value).ok_or_else(|| format!("nível desconhecido: '{value}'"))
}

fn parse_feature(value: &str) -> Result<Feature, String> {
    Feature::parse(value).ok_or_else(|| format!("ferramenta desconhecida: '{value}'"))
}

fn parse_difficulty(value: &str) -> Result<QuestionDifficulty, String> {
    QuestionDifficulty::parse(value).ok_or_else(|| format!("dificuldade desconhecida: '{value}'"))
}

fn mime_type_for(path: &std::path::Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("pdf") => "application/pdf",
        _ => "application/octet-stream",
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&cli.log_level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let base = match ApiBase::from_env_or(&cli.origin) {
        Ok(base) => base,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!(base = base.as_str(), "Using backend");

    let client = match HttpStudyClient::new(base) {
        Ok(client) => Arc::new(client),
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::FAILURE;
        }
    };
    let session = StudySession::new(client.clone(), client);

    session.set_level(cli.level).await;
    session.select_feature(cli.feature).await;
    session.set_plan_days(cli.days).await;
    session.set_question_count(cli.count).await;
    session.set_difficulty(cli.difficulty).await;

    if let Some(path) = &cli.file {
        let data = match tokio::fs::read(path).await {
            Ok(data) => data,
            Err(e) => {
                eprintln!("Não foi possível ler {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        };
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "documento.pdf".to_string());
        let file = UploadFile::new(name, mime_type_for(path), data);
        if let Err(e) = session.set_file(Some(file)).await {
            error!(error = %e, "Upload failed");
            let message = session
                .error()
                .await
                .unwrap_or_else(|| study_assistant_core::upload::UNSUPPORTED_FILE_MESSAGE.to_string());
            eprintln!("Erro: {message}");
            return ExitCode::FAILURE;
        }
    } else if let Some(text) = cli.text {
        session.set_input_text(text).await;
    }

    if let Err(e) = session.generate().await {
        error!(error = %e, "Generation failed");
        let message = session.error().await.unwrap_or_else(|| e.to_string());
        eprintln!("Erro: {message}");
        return ExitCode::FAILURE;
    }

    let output = session.render(render).await;
    print!("{output}");
    ExitCode::SUCCESS
}
