pub mod content;
pub mod dispatcher;
pub mod domain;
pub mod ports;
pub mod presentation;
pub mod session;
pub mod upload;

#[cfg(test)]
mod test_support;

pub use content::ContentStore;
pub use dispatcher::{GenerationDispatcher, GenerationError, GenerationRequest};
pub use domain::{
    Alternatives, AnswerLabel, Artifact, Feature, Flashcard, GenerationParams,
    MultipleChoiceQuestion, ParamsPanel, QuestionDifficulty, QuizQuestion, QuizQuestionKind,
    StudentLevel, UploadFile, UploadState,
};
pub use ports::{
    DocumentExtractionService, LanguageModelService, OutputFormat, PortError, PortResult,
    StudyContentService, SummaryCacheService, TextExtractionService,
};
pub use presentation::{ArtifactView, Presentation};
pub use session::{SessionState, SharedSession, StudySession};
pub use upload::{UploadCoordinator, UploadError, UploadOutcome};
