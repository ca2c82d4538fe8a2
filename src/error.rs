//! Error types for each stage of the pipeline.
//!
//! Every stage owns a small `thiserror` enum so callers can tell a failed API
//! call apart from an unparseable response or a broken config file. `main`
//! collapses all of them into `Box<dyn Error>`.

use thiserror::Error;

/// Failures while loading or validating `config.yaml`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("failed to load topics from CSV: {0}")]
    TopicsCsv(#[source] TopicsCsvError),

    #[error("failed to load .env file: {0}")]
    Env(#[from] dotenvy::Error),
}

/// Failures reading or writing a topics CSV file.
#[derive(Debug, Error)]
pub enum TopicsCsvError {
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("CSV file must have header and at least one data row")]
    MissingRows,

    #[error("CSV must have 'name' column")]
    MissingNameColumn,
}

/// Failures talking to the generation API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The API answered with a non-2xx status.
    #[error("API request failed with status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request timeout")]
    Timeout,

    #[error("request cancelled")]
    Cancelled,

    #[error("deadline exceeded")]
    DeadlineExceeded,

    #[error("no content in response")]
    NoContent,

    #[error("failed to decode API response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("max retries exceeded after {attempts} attempts: {source}")]
    MaxRetriesExceeded {
        attempts: usize,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// True for cancellation and deadline signals. These are never retried.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ApiError::Cancelled | ApiError::DeadlineExceeded)
    }

    /// Whether another attempt could plausibly succeed.
    ///
    /// Server errors (5xx), rate limiting (429) and timeouts are transient.
    /// Transport errors are retried on any connect failure reported by
    /// reqwest, which is broader than "connection refused" alone: DNS
    /// resolution failures are retried too. Everything
    /// else, including cancellation, is returned to the caller straight away.
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::Cancelled | ApiError::DeadlineExceeded => false,
            ApiError::Status { status, .. } => *status == 429 || (500..600).contains(status),
            ApiError::Timeout => true,
            ApiError::Transport(e) => {
                e.is_timeout() || e.is_connect() || message_looks_transient(&e.to_string())
            }
            ApiError::NoContent | ApiError::Decode(_) | ApiError::MaxRetriesExceeded { .. } => {
                false
            }
        }
    }
}

/// Fallback classification for errors that only carry a message, such as
/// transport errors wrapping an OS-level failure.
fn message_looks_transient(message: &str) -> bool {
    let message = message.to_lowercase();
    message.contains("status 5")
        || message.contains("429")
        || message.contains("timeout")
        || message.contains("timed out")
        || message.contains("connection refused")
}

/// Failures extracting an article from the raw model text.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("no JSON found in response")]
    NoJson,

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Terminal failures of a generation run, tagged with the stage that failed.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("failed to call API: {0}")]
    Api(#[source] ApiError),

    #[error("failed to parse response: {0}")]
    Parse(#[source] ParseError),
}

impl GenerateError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerateError::Api(e) if e.is_cancelled())
    }
}

/// Failures publishing to Medium.
#[derive(Debug, Error)]
pub enum PublishError {
    #[error("{stage} failed (status {status}): {body}")]
    Status {
        stage: &'static str,
        status: u16,
        body: String,
    },

    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid Medium API URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("failed to decode Medium response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("publish interrupted: {0}")]
    Interrupted(ApiError),
}

/// Failures reading or writing the article history file.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("history file I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("history file is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}
