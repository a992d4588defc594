//! Unified Error Type System
//!
//! Single error type for the entire application. Variants carry enough
//! context to decide whether a failure aborts the run (persistence write),
//! degrades it (per-page fetch), or is retried (analysis API rate limits).

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExporterError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    /// Wiki.js API failure: transport errors, non-2xx responses, or
    /// GraphQL-level errors embedded in a 200 response.
    #[error("Wiki.js API error: {0}")]
    Api(String),

    /// Content-analysis API failure. `retryable` marks rate limits and
    /// transient server errors that the backoff loop may retry.
    #[error("Analysis API error: {message}")]
    Analysis { message: String, retryable: bool },

    /// Metadata persistence failure. Fatal for the run; the previous
    /// metadata file on disk is left untouched.
    #[error("Metadata error: {0}")]
    Metadata(String),
}

impl ExporterError {
    /// Create a non-retryable analysis error
    pub fn analysis(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
            retryable: false,
        }
    }

    /// Create a retryable analysis error (rate limit, transient 5xx)
    pub fn analysis_retryable(message: impl Into<String>) -> Self {
        Self::Analysis {
            message: message.into(),
            retryable: true,
        }
    }

    /// Check if this error may be retried with backoff
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Analysis { retryable: true, .. })
    }
}

pub type Result<T> = std::result::Result<T, ExporterError>;
