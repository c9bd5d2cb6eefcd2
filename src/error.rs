//! Error types for gist-client.
//!
//! Configuration and credential errors are raised before any request leaves
//! the process. Transport errors carry the failing URL and are never retried
//! here.

use thiserror::Error;

/// Main error type for gist operations.
#[derive(Error, Debug)]
pub enum GistError {
    /// The targeted collection or resource needs a token and none is set.
    #[error("A token is required for this operation. Set one with set_token() or GITHUB_TOKEN")]
    AuthRequired,

    /// Invalid filter combination or malformed filter value.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Non-2xx response from the API.
    #[error("API request failed: {status} ({url})")]
    Transport { status: u16, url: String },

    /// Network-level failure (connect, TLS, body read).
    #[error("HTTP error: {0}")]
    Request(#[from] reqwest::Error),

    /// Response body was not the JSON we expected.
    #[error("Failed to parse response JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl GistError {
    /// True for both non-2xx responses and network failures.
    pub fn is_transport(&self) -> bool {
        matches!(self, GistError::Transport { .. } | GistError::Request(_))
    }

    /// HTTP status, when the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            GistError::Transport { status, .. } => Some(*status),
            GistError::Request(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, GistError>;

/// Format an error for display on the command line
pub fn format_gist_error(error: &GistError) -> String {
    match error.status() {
        Some(401) => "Authentication failed. Check your token.".to_string(),
        Some(403) => "Permission denied or rate limit exceeded.".to_string(),
        Some(404) => "Gist not found.".to_string(),
        Some(422) => "Invalid request. Check your parameters.".to_string(),
        Some(s) if s >= 500 => "GitHub service temporarily unavailable. Please try again.".to_string(),
        _ => error.to_string(),
    }
}
