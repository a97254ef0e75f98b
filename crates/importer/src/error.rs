use thiserror::Error;

pub type Result<T> = std::result::Result<T, ImporterError>;

#[derive(Error, Debug)]
pub enum ImporterError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Failed to parse JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Storage error: {0}")]
    StorageError(#[from] storage::error::StorageError),

    #[error("Rate limited by upstream after {attempts} attempts: {url}")]
    RateLimited { url: String, attempts: u32 },

    #[error("Upstream returned HTTP {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("No session results available yet for event {0}")]
    ResultsUnavailable(String),

    #[error("Invalid provider configuration: {0}")]
    InvalidConfig(String),
}
