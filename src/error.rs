//! Error types for the slash command response layer
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use thiserror::Error;

/// Errors surfaced by payload validation and the interaction endpoints
#[derive(Debug, Error)]
pub enum SlashError {
    /// User-supplied response arguments were invalid (mutually exclusive
    /// options used together, embed cap exceeded, editing without a message
    /// id, ...)
    #[error("incorrect format: {0}")]
    IncorrectFormat(String),

    /// Discord answered with a non-2xx status
    #[error("request failed with status {status}: {body}")]
    RequestFailure { status: u16, body: String },

    #[error("http transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("payload encode/decode error: {0}")]
    Json(#[from] serde_json::Error),

    /// The background acknowledgement task panicked or was cancelled
    #[error("acknowledgement task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, SlashError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incorrect_format_display() {
        let err = SlashError::IncorrectFormat("you can't use both embed and embeds".into());
        assert_eq!(
            err.to_string(),
            "incorrect format: you can't use both embed and embeds"
        );
    }

    #[test]
    fn test_request_failure_display() {
        let err = SlashError::RequestFailure {
            status: 404,
            body: "Unknown Webhook".into(),
        };
        assert!(err.to_string().contains("404"));
        assert!(err.to_string().contains("Unknown Webhook"));
    }
}
