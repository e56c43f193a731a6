mod client;
pub mod retry;

use thiserror::Error;

pub use client::{mock_response, CompletionClient, ProbeReport, MOCK_RESPONSE_PREFIX};
pub use retry::{RetryPolicy, RetryState};

/// Classified failure of a completion call.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompletionError {
    #[error("completion service rate limit exceeded")]
    RateLimited,

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("model unavailable: {0}")]
    ModelUnavailable(String),

    #[error("completion request timed out")]
    Timeout,

    #[error("transport error: {0}")]
    Transport(String),

    #[error("malformed completion response: {0}")]
    MalformedResponse(String),
}

impl CompletionError {
    /// Text stored as the turn's response when the call ends in this error.
    ///
    /// Every variant renders with one of the failure prefixes recognised by
    /// the concept extractor, so failed turns never feed the graph.
    pub fn fallback_response(&self) -> String {
        match self {
            Self::RateLimited => "I'm sorry, the completion service is receiving too many \
                                  requests right now. Please try again in a moment."
                .to_string(),
            Self::Timeout => {
                "Error processing request: the completion service timed out".to_string()
            }
            Self::BadRequest(message) => format!("API Error: {message}"),
            Self::ModelUnavailable(message) => format!("API Error: model unavailable: {message}"),
            Self::Transport(message) => format!("Error processing request: {message}"),
            Self::MalformedResponse(message) => {
                format!("Unexpected response format from completion service: {message}")
            }
        }
    }
}
