//! crates/study_assistant_client/src/config.rs
//!
//! Resolves where the backend lives. Local development talks to the service on
//! port 8000 directly; any other host is served from the same origin under `/api/v1`.

use reqwest::Url;

/// The versioned path every backend route lives under.
pub const API_PREFIX: &str = "/api/v1";

/// The explicit base used when the front end runs on a developer machine.
pub const LOCAL_API_BASE: &str = "http://localhost:8000/api/v1";

/// Overrides host-based resolution when set.
pub const API_BASE_ENV: &str = "STUDY_API_BASE_URL";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
    #[error("Invalid front-end origin '{0}': {1}")]
    InvalidOrigin(String, String),
}

/// The absolute base URL all endpoint paths are appended to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiBase(String);

impl ApiBase {
    pub fn new(base: impl Into<String>) -> Self {
        Self(base.into().trim_end_matches('/').to_string())
    }

    /// Picks the base from the origin the front end is served from. Only the
    /// scheme, host and port of `origin` matter; path, query and fragment are ignored.
    pub fn resolve(origin: &str) -> Result<Self, ConfigError> {
        let url = Url::parse(origin)
            .map_err(|e| ConfigError::InvalidOrigin(origin.to_string(), e.to_string()))?;
        match url.host_str() {
            Some("localhost" | "127.0.0.1") => Ok(Self::new(LOCAL_API_BASE)),
            Some(_) => Ok(Self::new(format!(
                "{}{}",
                url.origin().ascii_serialization(),
                API_PREFIX
            ))),
            None => Err(ConfigError::InvalidOrigin(
                origin.to_string(),
                "the origin has no host".to_string(),
            )),
        }
    }

    /// Uses `STUDY_API_BASE_URL` when present, otherwise resolves from `origin`.
    pub fn from_env_or(origin: &str) -> Result<Self, ConfigError> {
        match std::env::var(API_BASE_ENV) {
            Ok(value) => match Url::parse(&value) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => Ok(Self::new(value)),
                _ => Err(ConfigError::InvalidValue(
                    API_BASE_ENV.to_string(),
                    format!("'{}' is not an absolute http(s) URL", value),
                )),
            },
            Err(_) => Self::resolve(origin),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Joins an endpoint path such as `/generate-quiz/` onto the base.
    pub fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.0, endpoint.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolved(origin: &str) -> String {
        ApiBase::resolve(origin).unwrap().as_str().to_string()
    }

    #[test]
    fn local_hosts_use_the_explicit_dev_base() {
        assert_eq!(resolved("http://localhost:5173"), LOCAL_API_BASE);
        assert_eq!(resolved("http://127.0.0.1:3000/"), LOCAL_API_BASE);
    }

    #[test]
    fn host_comparison_ignores_case_and_query() {
        assert_eq!(resolved("http://LOCALHOST:5173"), LOCAL_API_BASE);
        assert_eq!(resolved("http://localhost?dev=1"), LOCAL_API_BASE);
    }

    #[test]
    fn other_hosts_use_the_same_origin_prefix() {
        assert_eq!(resolved("https://estudos.example.com/"), "https://estudos.example.com/api/v1");
        assert_eq!(
            resolved("https://localhost.example.com"),
            "https://localhost.example.com/api/v1"
        );
    }

    #[test]
    fn path_query_and_fragment_are_dropped_from_the_origin() {
        assert_eq!(
            resolved("https://site.example/app/index.html"),
            "https://site.example/api/v1"
        );
        assert_eq!(
            resolved("https://Site.Example:8443/?tab=quiz#top"),
            "https://site.example:8443/api/v1"
        );
    }

    #[test]
    fn origins_that_are_not_urls_are_rejected() {
        assert!(matches!(
            ApiBase::resolve("estudos.example.com"),
            Err(ConfigError::InvalidOrigin(..))
        ));
    }

    #[test]
    fn endpoint_urls_keep_trailing_slash() {
        let base = ApiBase::new("http://localhost:8000/api/v1/");
        assert_eq!(base.url("/generate-summary/"), "http://localhost:8000/api/v1/generate-summary/");
    }
}
