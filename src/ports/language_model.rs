//! Language model port.
//!
//! The form treats the model as an opaque completion service: one prompt
//! string in, the full response text out. Streaming backends concatenate
//! their chunks before returning, so callers never deal with partial
//! output. What the text *means* is decided entirely on the caller's side
//! by the best-effort parsers in the form domain.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Completion backend the form session talks to.
///
/// There is deliberately no retry in the trait or in any implementation:
/// transport failures surface as [`ModelError`] and malformed text degrades
/// at the parsing layer instead.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Sends one prompt and returns the model's whole reply.
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;

    /// Identifies the backend for logging.
    fn model_info(&self) -> ModelInfo;
}

/// Name of a backend and the model it serves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelInfo {
    /// Adapter name, e.g. "openai" or "mock".
    pub name: String,
    /// Model identifier, e.g. "gpt-4o-mini".
    pub model: String,
}

impl ModelInfo {
    pub fn new(name: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model: model.into(),
        }
    }
}

/// Transport-level failure of a completion call.
///
/// These classify what went wrong between the session and the backend.
/// Unusable response *content* is never an error; the parsers treat it as
/// a negative or empty answer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ModelError {
    /// The backend asked us to slow down.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    /// The backend reported a server-side failure.
    #[error("backend unavailable: {message}")]
    Unavailable { message: String },

    /// The API key was rejected.
    #[error("authentication rejected")]
    AuthenticationFailed,

    /// The request never produced a usable HTTP exchange.
    #[error("network failure: {0}")]
    Network(String),

    /// The response envelope could not be decoded.
    #[error("malformed backend response: {0}")]
    Parse(String),

    /// The backend rejected the request as malformed.
    #[error("request rejected: {0}")]
    InvalidRequest(String),

    /// No response arrived within the configured window.
    #[error("no response within {timeout_secs}s")]
    Timeout { timeout_secs: u32 },
}

impl ModelError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }
}
