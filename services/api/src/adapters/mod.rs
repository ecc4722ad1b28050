pub mod db;
pub mod llm;
pub mod pdf;

pub use db::DbAdapter;
pub use llm::OpenAiGenerationAdapter;
pub use pdf::PdfTextAdapter;
