//! Error taxonomy for the dashboard.
//!
//! Most of these never reach the user: the article source recovers from every
//! upstream failure by serving the built-in sample set, and a corrupt settings
//! store falls back to default rates. They surface only at the CLI boundary
//! (bad config file, negative rate, unwritable export directory).

use crate::utils::looks_truncated;

/// Every failure the crate can report.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("no news API credential configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("news API responded with status: {status}")]
    Status { status: u16 },

    #[error("news API rejected the request ({code}): {message}")]
    Upstream { code: String, message: String },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config error: {0}")]
    Config(#[from] serde_yaml::Error),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("invalid {name} rate: {value} (must be a finite number >= 0)")]
    InvalidRate { name: &'static str, value: f64 },
}

impl NewsError {
    /// Whether retrying the same request could plausibly succeed.
    ///
    /// Transport failures, rate limiting (429), server errors (5xx) and
    /// bodies cut off mid-stream are transient; everything else is not.
    pub fn is_retryable(&self) -> bool {
        match self {
            NewsError::Http(e) => !e.is_builder(),
            NewsError::Status { status } => *status == 429 || *status >= 500,
            NewsError::Decode(e) => looks_truncated(e),
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, NewsError>;
