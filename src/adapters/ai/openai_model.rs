//! OpenAI-compatible adapter for the language model port.
//!
//! Talks to a `/chat/completions` endpoint with streaming always on. The
//! Server-Sent Events response is consumed chunk by chunk and the content
//! deltas are concatenated into the single string the form layer parses.
//! Network chunk boundaries do not align with SSE line boundaries, so
//! partial lines are buffered until their newline arrives.
//!
//! There is no retry on failure: a dropped turn surfaces as an error and
//! the user simply sends their message again.

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::{Client, Response, StatusCode};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::ports::{LanguageModel, ModelError, ModelInfo};

const DEFAULT_MODEL: &str = "gpt-4o-mini";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Assumed when a 429 body carries no usable retry hint.
const FALLBACK_RETRY_AFTER_SECS: u32 = 30;

/// Connection settings for [`OpenAIModel`].
///
/// ```ignore
/// let config = OpenAIConfig::new(api_key)
///     .with_model("gpt-4o-mini")
///     .with_timeout(Duration::from_secs(30));
/// let model = OpenAIModel::new(config);
/// ```
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    api_key: Secret<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Streaming chat-completions client implementing [`LanguageModel`].
pub struct OpenAIModel {
    config: OpenAIConfig,
    client: Client,
}

impl OpenAIModel {
    /// Builds the adapter and its HTTP client.
    ///
    /// Client construction only fails when the TLS backend cannot
    /// initialize, which is unrecoverable at startup anyway.
    pub fn new(config: OpenAIConfig) -> Self {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .expect("http client construction");

        Self { config, client }
    }

    /// Posts the prompt as a single user message and checks the status.
    async fn request_stream(&self, prompt: &str) -> Result<Response, ModelError> {
        let payload = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            stream: true,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(self.config.api_key.expose_secret())
            .json(&payload)
            .send()
            .await
            .map_err(|err| self.transport_error(err))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(status_error(status, body))
    }

    fn transport_error(&self, err: reqwest::Error) -> ModelError {
        if err.is_timeout() {
            ModelError::Timeout {
                timeout_secs: self.config.timeout.as_secs() as u32,
            }
        } else {
            ModelError::network(err.to_string())
        }
    }

    /// Drains the SSE body and concatenates all content deltas.
    async fn collect_stream(&self, response: Response) -> Result<String, ModelError> {
        let mut body = response.bytes_stream();
        let mut accumulator = SseAccumulator::new();

        while let Some(chunk) = body.next().await {
            let bytes = chunk.map_err(|err| ModelError::network(err.to_string()))?;
            accumulator.feed(&bytes)?;
        }

        accumulator.finish()
    }
}

#[async_trait]
impl LanguageModel for OpenAIModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        let response = self.request_stream(prompt).await?;
        self.collect_stream(response).await
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new("openai", &self.config.model)
    }
}

/// Maps a non-success HTTP status onto the port's error taxonomy.
fn status_error(status: StatusCode, body: String) -> ModelError {
    match status.as_u16() {
        401 => ModelError::AuthenticationFailed,
        429 => ModelError::rate_limited(
            retry_after_hint(&body).unwrap_or(FALLBACK_RETRY_AFTER_SECS),
        ),
        400 => ModelError::InvalidRequest(body),
        500..=599 => ModelError::unavailable(format!("status {}: {}", status.as_u16(), body)),
        _ => ModelError::network(format!("unexpected status {}: {}", status.as_u16(), body)),
    }
}

/// Pulls the "try again in Ns" hint OpenAI sometimes embeds in 429 bodies.
fn retry_after_hint(body: &str) -> Option<u32> {
    let parsed: serde_json::Value = serde_json::from_str(body).ok()?;
    let message = parsed.pointer("/error/message")?.as_str()?;
    let (_, rest) = message.split_once("try again in ")?;
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Accumulates SSE content deltas across network chunks.
///
/// A chunk may end mid-line, so an incomplete line stays buffered until
/// its terminating newline arrives in a later chunk.
struct SseAccumulator {
    buffer: String,
    content: String,
}

impl SseAccumulator {
    fn new() -> Self {
        Self {
            buffer: String::new(),
            content: String::new(),
        }
    }

    /// Feeds raw bytes from the network, consuming any complete lines.
    fn feed(&mut self, bytes: &[u8]) -> Result<(), ModelError> {
        self.buffer.push_str(&String::from_utf8_lossy(bytes));

        while let Some(newline) = self.buffer.find('\n') {
            let line: String = self.buffer.drain(..=newline).collect();
            if let Some(delta) = parse_sse_line(line.trim_end())? {
                self.content.push_str(&delta);
            }
        }

        Ok(())
    }

    /// Flushes any unterminated final line and returns the full content.
    fn finish(mut self) -> Result<String, ModelError> {
        if !self.buffer.trim().is_empty() {
            let line = std::mem::take(&mut self.buffer);
            if let Some(delta) = parse_sse_line(line.trim_end())? {
                self.content.push_str(&delta);
            }
        }

        Ok(self.content)
    }
}

/// Parses one SSE line, returning the content delta if the line carries one.
fn parse_sse_line(line: &str) -> Result<Option<String>, ModelError> {
    let data = match line.strip_prefix("data: ") {
        Some(data) => data,
        // Comments, event names, and blank keep-alive lines carry no data
        None => return Ok(None),
    };

    if data == "[DONE]" || data.trim().is_empty() {
        return Ok(None);
    }

    let chunk: ChatChunk = serde_json::from_str(data)
        .map_err(|err| ModelError::parse(format!("bad SSE chunk: {}", err)))?;

    Ok(chunk
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.delta.content)
        .filter(|content| !content.is_empty()))
}

// ----- wire format -----

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatChunk {
    choices: Vec<ChunkChoice>,
}

#[derive(Debug, Deserialize)]
struct ChunkChoice {
    delta: ChunkDelta,
}

#[derive(Debug, Deserialize)]
struct ChunkDelta {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config {
        use super::*;

        #[test]
        fn defaults_target_the_public_api() {
            let config = OpenAIConfig::new("sk-test");
            assert_eq!(config.model, DEFAULT_MODEL);
            assert_eq!(config.base_url, DEFAULT_BASE_URL);
            assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        }

        #[test]
        fn builder_overrides_every_setting() {
            let config = OpenAIConfig::new("sk-test")
                .with_model("gpt-4o")
                .with_base_url("https://proxy.internal/v1")
                .with_timeout(Duration::from_secs(10));

            assert_eq!(config.model, "gpt-4o");
            assert_eq!(config.base_url, "https://proxy.internal/v1");
            assert_eq!(config.timeout, Duration::from_secs(10));
        }

        #[test]
        fn model_info_reports_the_configured_model() {
            let model = OpenAIModel::new(OpenAIConfig::new("sk-test").with_model("gpt-4o"));
            let info = model.model_info();
            assert_eq!(info.name, "openai");
            assert_eq!(info.model, "gpt-4o");
        }
    }

    mod status_mapping {
        use super::*;

        fn status(code: u16) -> StatusCode {
            StatusCode::from_u16(code).unwrap()
        }

        #[test]
        fn unauthorized_maps_to_authentication() {
            let err = status_error(status(401), String::new());
            assert!(matches!(err, ModelError::AuthenticationFailed));
        }

        #[test]
        fn rate_limit_uses_the_hint_from_the_body() {
            let body = r#"{"error":{"message":"Rate limit reached, try again in 7s."}}"#;
            let err = status_error(status(429), body.to_string());
            assert!(matches!(err, ModelError::RateLimited { retry_after_secs: 7 }));
        }

        #[test]
        fn rate_limit_without_a_hint_uses_the_fallback() {
            let err = status_error(status(429), "busy".to_string());
            assert!(matches!(
                err,
                ModelError::RateLimited {
                    retry_after_secs: FALLBACK_RETRY_AFTER_SECS
                }
            ));
        }

        #[test]
        fn bad_request_carries_the_body() {
            let err = status_error(status(400), "model does not exist".to_string());
            assert!(matches!(err, ModelError::InvalidRequest(body) if body.contains("exist")));
        }

        #[test]
        fn server_errors_map_to_unavailable() {
            let err = status_error(status(503), "maintenance".to_string());
            assert!(matches!(err, ModelError::Unavailable { .. }));
        }

        #[test]
        fn retry_hint_requires_the_exact_phrase() {
            assert_eq!(
                retry_after_hint(r#"{"error":{"message":"try again in 12s"}}"#),
                Some(12)
            );
            assert_eq!(retry_after_hint(r#"{"error":{"message":"slow down"}}"#), None);
            assert_eq!(retry_after_hint("not json"), None);
        }
    }

    mod sse {
        use super::*;

        #[test]
        fn content_line_yields_its_delta() {
            let line = r#"data: {"id":"chatcmpl-1","choices":[{"delta":{"content":"Hello"},"finish_reason":null}]}"#;
            assert_eq!(parse_sse_line(line).unwrap(), Some("Hello".to_string()));
        }

        #[test]
        fn done_marker_and_non_data_lines_yield_nothing() {
            assert_eq!(parse_sse_line("data: [DONE]").unwrap(), None);
            assert_eq!(parse_sse_line("").unwrap(), None);
            assert_eq!(parse_sse_line(": keep-alive").unwrap(), None);
            assert_eq!(parse_sse_line("event: ping").unwrap(), None);
        }

        #[test]
        fn final_chunk_without_content_yields_nothing() {
            let line = r#"data: {"choices":[{"delta":{},"finish_reason":"stop"}]}"#;
            assert_eq!(parse_sse_line(line).unwrap(), None);
        }

        #[test]
        fn unparseable_data_line_is_a_parse_error() {
            assert!(matches!(
                parse_sse_line("data: {not json"),
                Err(ModelError::Parse(_))
            ));
        }

        #[test]
        fn accumulator_joins_a_line_split_across_chunks() {
            let mut accumulator = SseAccumulator::new();

            accumulator
                .feed(br#"data: {"choices":[{"delta":{"con"#)
                .unwrap();
            accumulator
                .feed(b"tent\":\"Hello\"},\"finish_reason\":null}]}\n")
                .unwrap();

            assert_eq!(accumulator.finish().unwrap(), "Hello");
        }

        #[test]
        fn accumulator_concatenates_deltas_in_order() {
            let sse = concat!(
                "data: {\"choices\":[{\"delta\":{\"content\":\"Hello\"}}]}\n",
                "\n",
                "data: {\"choices\":[{\"delta\":{\"content\":\" world\"}}]}\n",
                "\n",
                "data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n",
                "\n",
                "data: [DONE]\n",
            );

            let mut accumulator = SseAccumulator::new();
            accumulator.feed(sse.as_bytes()).unwrap();

            assert_eq!(accumulator.finish().unwrap(), "Hello world");
        }

        #[test]
        fn accumulator_flushes_an_unterminated_final_line() {
            let mut accumulator = SseAccumulator::new();

            // No trailing newline after the last event
            accumulator
                .feed(b"data: {\"choices\":[{\"delta\":{\"content\":\"tail\"}}]}")
                .unwrap();

            assert_eq!(accumulator.finish().unwrap(), "tail");
        }
    }
}
