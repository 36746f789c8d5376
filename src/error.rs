//! Error types for the GrupoPaz client

use serde::Deserialize;
use thiserror::Error;

/// Client error types
#[derive(Error, Debug)]
pub enum ClientError {
    /// Transport failure. Never retried.
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response after at most one refresh-retry.
    ///
    /// `body` is the raw response text, or a generated message carrying the
    /// status code when the server sent nothing.
    #[error("{body}")]
    Http { status: u16, body: String },

    /// 2xx response whose body is not the expected JSON.
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[derive(Deserialize)]
struct UpstreamMessage {
    message: String,
}

impl ClientError {
    pub(crate) fn http(status: u16, body: String) -> Self {
        let body = if body.is_empty() {
            format!("HTTP error {status}")
        } else {
            body
        };
        ClientError::Http { status, body }
    }

    /// HTTP status when this is an `Http` error
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message suitable for display.
    ///
    /// Some API error bodies are JSON with a nested `message`; that message is
    /// returned instead of the raw body.
    pub fn message(&self) -> String {
        match self {
            ClientError::Http { body, .. } => serde_json::from_str::<UpstreamMessage>(body)
                .map(|m| m.message)
                .unwrap_or_else(|_| body.clone()),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
