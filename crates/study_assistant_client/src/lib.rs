pub mod config;
pub mod http;
pub mod render;

pub use config::{ApiBase, ConfigError};
pub use http::HttpStudyClient;
