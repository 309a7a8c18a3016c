//! Scripted language model for tests.
//!
//! Replies are queued up front and served in order, and every prompt the
//! model receives is recorded so tests can assert on what was sent. When
//! the script runs dry the model falls back to a fixed benign reply, so a
//! partially-scripted test degrades instead of panicking.
//!
//! # Example
//!
//! ```ignore
//! let model = MockLanguageModel::new()
//!     .with_response(" false\n}\n```")
//!     .with_error(ModelError::rate_limited(30));
//!
//! assert_eq!(model.complete("exit?").await.unwrap(), " false\n}\n```");
//! assert!(model.complete("exit?").await.is_err());
//! assert_eq!(model.call_count(), 2);
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{LanguageModel, ModelError, ModelInfo};

/// Served once the scripted replies are exhausted.
const OUT_OF_SCRIPT_REPLY: &str = "Mock response";

/// Scripted stand-in for a completion backend.
///
/// Clones share the same script and prompt log, so a test can hold one
/// handle for assertions while the session owns another.
#[derive(Debug, Clone, Default)]
pub struct MockLanguageModel {
    script: Arc<Mutex<VecDeque<Result<String, ModelError>>>>,
    prompts: Arc<Mutex<Vec<String>>>,
    delay: Duration,
}

impl MockLanguageModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn with_response(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().push_back(Ok(text.into()));
        self
    }

    /// Queues a transport failure.
    pub fn with_error(self, error: ModelError) -> Self {
        self.script.lock().unwrap().push_back(Err(error));
        self
    }

    /// Adds artificial latency to every completion.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of completions requested so far.
    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    /// Every prompt received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for MockLanguageModel {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError> {
        self.prompts.lock().unwrap().push(prompt.to_string());

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(OUT_OF_SCRIPT_REPLY.to_string()))
    }

    fn model_info(&self) -> ModelInfo {
        ModelInfo::new("mock", "scripted")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replies_come_back_in_script_order() {
        let model = MockLanguageModel::new()
            .with_response("first")
            .with_response("second");

        assert_eq!(model.complete("a").await.unwrap(), "first");
        assert_eq!(model.complete("b").await.unwrap(), "second");
    }

    #[tokio::test]
    async fn exhausted_script_falls_back_to_the_benign_reply() {
        let model = MockLanguageModel::new().with_response("only one");

        model.complete("a").await.unwrap();
        assert_eq!(model.complete("b").await.unwrap(), OUT_OF_SCRIPT_REPLY);
    }

    #[tokio::test]
    async fn scripted_errors_surface_as_errors() {
        let model = MockLanguageModel::new()
            .with_error(ModelError::rate_limited(30))
            .with_response("after the error");

        let err = model.complete("a").await.unwrap_err();
        assert!(matches!(err, ModelError::RateLimited { retry_after_secs: 30 }));

        assert_eq!(model.complete("b").await.unwrap(), "after the error");
    }

    #[tokio::test]
    async fn every_prompt_is_recorded_in_order() {
        let model = MockLanguageModel::new();

        model.complete("first prompt").await.unwrap();
        model.complete("second prompt").await.unwrap();

        assert_eq!(model.call_count(), 2);
        assert_eq!(model.prompts(), vec!["first prompt", "second prompt"]);
    }

    #[tokio::test]
    async fn clones_share_the_script_and_the_log() {
        let model = MockLanguageModel::new().with_response("shared");
        let handle = model.clone();

        model.complete("from the session").await.unwrap();

        assert_eq!(handle.call_count(), 1);
        assert_eq!(handle.complete("next").await.unwrap(), OUT_OF_SCRIPT_REPLY);
    }

    #[tokio::test]
    async fn delay_is_applied_per_completion() {
        let model = MockLanguageModel::new().with_delay(Duration::from_millis(50));

        let start = std::time::Instant::now();
        model.complete("slow").await.unwrap();
        assert!(start.elapsed() >= Duration::from_millis(50));
    }
}
