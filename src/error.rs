//! Error types for the video generation workflow.

use std::time::Duration;

/// Errors that can end a generation run.
#[derive(Debug, thiserror::Error)]
pub enum VeoGenError {
    /// Required setting (e.g. the API key) missing or invalid.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The submit endpoint answered with something other than 200.
    #[error("failed to start video generation: {status} - {body}")]
    Submission {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// The provider reported a terminal failure for the operation.
    #[error("generation failed: {0}")]
    Generation(String),

    /// The artifact fetch returned a failing status.
    #[error("failed to download video: HTTP {status}")]
    Download {
        /// HTTP status code.
        status: u16,
    },

    /// The status endpoint returned a failing status while polling.
    #[error("API error: {status} - {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, trimmed.
        message: String,
    },

    /// A successful response was missing a required field.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Polling hit the configured attempt cap before a terminal status.
    #[error("operation still pending after {attempts} polls")]
    PollLimitExceeded {
        /// Number of polls made.
        attempts: u32,
    },

    /// Polling exceeded the configured timeout.
    #[error("operation timed out after {0:?}")]
    Timeout(Duration),

    /// Network or HTTP transport error.
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// I/O error (e.g., saving the video).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// reqwest includes the request URL in its Display output, and ours carry the
// API key in the query string.
impl From<reqwest::Error> for VeoGenError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.without_url())
    }
}

/// Result type alias for the generation workflow.
pub type Result<T> = std::result::Result<T, VeoGenError>;

/// Trims an error body for display, keeping the first 500 characters.
pub(crate) fn truncate_body(text: &str) -> String {
    const MAX_CHARS: usize = 500;
    let text = text.trim();
    match text.char_indices().nth(MAX_CHARS) {
        Some((idx, _)) => format!("{}...", &text[..idx]),
        None => text.to_string(),
    }
}
