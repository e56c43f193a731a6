use std::sync::Arc;
use std::time::Duration;

use async_openai::types::{
    ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequest,
    CreateChatCompletionRequestArgs, CreateChatCompletionResponse,
};
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::config::LlmConfig;
use crate::error::{Result, SequelError};

use super::retry::{RetryPolicy, RetryState};
use super::CompletionError;

/// Literal that starts every mock-mode response.
pub const MOCK_RESPONSE_PREFIX: &str = "Mock response to:";

const TEMPERATURE: f32 = 0.7;
const MAX_OUTPUT_TOKENS: u32 = 1024;
const APP_TITLE: &str = "Sequel AI";

/// Result of a single diagnostic call against the completion service.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ProbeReport {
    pub model: String,
    pub key_preview: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions endpoint.
///
/// Without an API key the client runs in mock mode and never touches the
/// network.
#[derive(Clone)]
pub struct CompletionClient {
    http: reqwest::Client,
    config: Arc<LlmConfig>,
    policy: RetryPolicy,
}

impl CompletionClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| {
                SequelError::Internal(format!("Failed to create completion HTTP client: {error}"))
            })?;

        Ok(Self {
            http,
            config: Arc::new(config.clone()),
            policy: RetryPolicy::new(config.max_retries),
        })
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn is_mock(&self) -> bool {
        self.config.api_key.is_none()
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    /// Complete `prompt`, rendering any terminal failure as response text.
    ///
    /// Never fails: the returned text is what gets logged for the turn.
    pub async fn complete(&self, prompt: &str) -> String {
        match self.try_complete(prompt).await {
            Ok(text) => text,
            Err(error) => {
                tracing::error!(error = %error, model = %self.config.model, "Completion failed");
                error.fallback_response()
            }
        }
    }

    /// Complete `prompt`, driving the retry policy until a terminal state.
    pub async fn try_complete(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        if self.is_mock() {
            return Ok(mock_response(prompt));
        }

        let mut state = RetryState::initial();
        loop {
            state = match state {
                RetryState::Attempting { attempt } => {
                    tracing::debug!(attempt, model = %self.config.model, "Sending completion request");
                    let outcome = self.send(prompt).await;
                    self.policy.transition(attempt, outcome)
                }
                RetryState::Backoff {
                    attempt,
                    delay,
                    ref cause,
                } => {
                    tracing::warn!(
                        attempt,
                        max_attempts = self.policy.max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        cause = %cause,
                        "Completion attempt failed, backing off"
                    );
                    tokio::time::sleep(delay).await;
                    self.policy.resume(state)
                }
                RetryState::Succeeded(text) => return Ok(text),
                RetryState::Failed(error) => return Err(error),
            };
        }
    }

    /// One un-retried "Hello!" round trip, or `None` in mock mode.
    pub async fn probe(&self) -> Option<ProbeReport> {
        let key = self.config.api_key.as_deref()?;

        let mut report = ProbeReport {
            model: self.config.model.clone(),
            key_preview: key_preview(key),
            status: "ok".to_string(),
            response: None,
            error: None,
        };

        match self.send("Hello!").await {
            Ok(text) => report.response = Some(text),
            Err(error) => {
                report.status = "error".to_string();
                report.error = Some(error.to_string());
            }
        }

        Some(report)
    }

    async fn send(&self, prompt: &str) -> std::result::Result<String, CompletionError> {
        let request = self.build_request(prompt)?;
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );

        let response = self
            .http
            .post(url)
            .bearer_auth(self.config.api_key.as_deref().unwrap_or_default())
            .header("X-Title", APP_TITLE)
            .json(&request)
            .send()
            .await
            .map_err(classify_reqwest_error)?;

        let status = response.status();
        let body = response.text().await.map_err(classify_reqwest_error)?;

        if status.is_success() {
            return extract_content(&body);
        }

        let message = upstream_error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
        Err(classify_status(status, message))
    }

    fn build_request(
        &self,
        prompt: &str,
    ) -> std::result::Result<CreateChatCompletionRequest, CompletionError> {
        let message = ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
            .build()
            .map_err(|error| CompletionError::BadRequest(format!("Invalid user prompt: {error}")))?;

        CreateChatCompletionRequestArgs::default()
            .model(self.config.model.clone())
            .messages(vec![message.into()])
            .temperature(TEMPERATURE)
            .max_tokens(MAX_OUTPUT_TOKENS)
            .build()
            .map_err(|error| {
                CompletionError::BadRequest(format!("Invalid completion request: {error}"))
            })
    }
}

pub fn mock_response(prompt: &str) -> String {
    format!(
        "{MOCK_RESPONSE_PREFIX} {prompt} (Please set OPENROUTER_API_KEY environment variable)"
    )
}

fn classify_reqwest_error(error: reqwest::Error) -> CompletionError {
    if error.is_timeout() {
        CompletionError::Timeout
    } else if error.is_decode() {
        CompletionError::MalformedResponse(error.to_string())
    } else {
        CompletionError::Transport(error.to_string())
    }
}

fn classify_status(status: StatusCode, message: String) -> CompletionError {
    match status {
        StatusCode::TOO_MANY_REQUESTS => CompletionError::RateLimited,
        StatusCode::BAD_REQUEST => CompletionError::BadRequest(message),
        StatusCode::NOT_FOUND => CompletionError::ModelUnavailable(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => CompletionError::Timeout,
        other => CompletionError::Transport(format!("HTTP {}: {message}", other.as_u16())),
    }
}

/// `{"error": {...}}` payload returned by OpenRouter-style gateways.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: UpstreamError,
}

#[derive(Debug, Deserialize)]
struct UpstreamError {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    code: Option<u16>,
}

fn upstream_error(body: &str) -> Option<UpstreamError> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .map(|envelope| envelope.error)
}

/// `error.message` from an upstream error payload, if the body has one.
fn upstream_error_message(body: &str) -> Option<String> {
    upstream_error(body)?.message
}

fn extract_content(body: &str) -> std::result::Result<String, CompletionError> {
    // Some gateways report upstream failures inside a 200 body.
    if let Some(error) = upstream_error(body) {
        let status = error
            .code
            .and_then(|code| StatusCode::from_u16(code).ok())
            .unwrap_or(StatusCode::BAD_GATEWAY);
        let message = error.message.unwrap_or_else(|| "unknown error".to_string());
        return Err(classify_status(status, message));
    }

    let response: CreateChatCompletionResponse = serde_json::from_str(body).map_err(|error| {
        tracing::debug!(
            response_preview = %body.chars().take(100).collect::<String>(),
            error = %error,
            "Failed to parse completion response"
        );
        CompletionError::MalformedResponse(format!("unexpected completion payload: {error}"))
    })?;

    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| {
            CompletionError::MalformedResponse("completion contained no message content".to_string())
        })?;

    if content.trim().is_empty() {
        return Err(CompletionError::MalformedResponse(
            "empty message content".to_string(),
        ));
    }

    Ok(content)
}

fn key_preview(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 10 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..5].iter().collect();
    let tail: String = chars[chars.len() - 5..].iter().collect();
    format!("{head}...{tail}")
}
