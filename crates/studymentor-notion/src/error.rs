//! Notion-specific error types.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotionError {
    #[error("Unauthorized - integration token rejected")]
    Unauthorized,

    #[error("Object not found or not shared with the integration: {0}")]
    NotFound(String),

    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),
}

/// Error body returned by the Notion API.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl NotionError {
    /// Map a non-success status and its body text.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| {
                if b.code.is_empty() {
                    b.message
                } else {
                    format!("{}: {}", b.code, b.message)
                }
            })
            .unwrap_or_else(|_| body.to_string());

        match status {
            401 => Self::Unauthorized,
            404 => Self::NotFound(message),
            400 => Self::Validation(message),
            _ => Self::ApiError(format!("{}: {}", status, message)),
        }
    }
}
