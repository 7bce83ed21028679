use slyd_core::{FormError, InvalidJson};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Caught before anything was sent.
    #[error("{0}")]
    Validation(String),

    #[error(transparent)]
    Form(#[from] FormError),

    /// Raw editor text that is not JSON.
    #[error("Invalid JSON format")]
    InvalidJson(#[from] InvalidJson),

    /// The call itself failed: connection, timeout, TLS.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered but said no.
    #[error("{message}")]
    Rejected {
        message: String,
        details: Option<String>,
    },

    #[error("Could not encode request: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Unexpected response from {endpoint} (HTTP {status}): {reason}")]
    Decode {
        endpoint: String,
        status: u16,
        reason: String,
    },
}

impl ClientError {
    pub fn rejected(message: Option<String>, fallback: &str) -> Self {
        ClientError::Rejected {
            message: message
                .filter(|m| !m.trim().is_empty())
                .unwrap_or_else(|| fallback.to_string()),
            details: None,
        }
    }

    pub fn with_details(self, extra: Option<String>) -> Self {
        match self {
            ClientError::Rejected { message, .. } => ClientError::Rejected {
                message,
                details: extra,
            },
            other => other,
        }
    }

    /// Whether the request reached the server at all.
    pub fn is_local(&self) -> bool {
        matches!(
            self,
            ClientError::Validation(_) | ClientError::Form(_) | ClientError::InvalidJson(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
