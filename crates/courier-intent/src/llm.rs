//! Language model client abstraction.
//!
//! The resolver only needs "prompt in, text out, may fail". Concrete clients
//! live behind [`LanguageModelClient`]; this module also holds the wrappers
//! the composition root layers on top.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::LlmError;

/// Prompt in, fully assembled text out.
///
/// Implementations may stream internally but must return the whole text.
/// Network and auth failures are errors; an empty answer is `Ok("")`.
#[async_trait]
pub trait LanguageModelClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Short name used in logs.
    fn name(&self) -> &str {
        "llm"
    }
}

#[async_trait]
impl LanguageModelClient for Box<dyn LanguageModelClient> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        (**self).complete(prompt).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Bounds every call of the wrapped client.
pub struct TimeoutClient<C> {
    inner: C,
    timeout: Duration,
}

impl<C: LanguageModelClient> TimeoutClient<C> {
    pub fn new(inner: C, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<C: LanguageModelClient> LanguageModelClient for TimeoutClient<C> {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        match tokio::time::timeout(self.timeout, self.inner.complete(prompt)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(
                    client = self.inner.name(),
                    timeout_secs = self.timeout.as_secs(),
                    "Language model call timed out"
                );
                Err(LlmError::Timeout(self.timeout.as_secs()))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Client for matcher-only deployments; every call fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledClient;

#[async_trait]
impl LanguageModelClient for DisabledClient {
    async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::Unavailable)
    }

    fn name(&self) -> &str {
        "disabled"
    }
}

/// Replays canned responses and counts calls.
///
/// Once the script runs out the last response repeats. An empty script
/// answers `Unavailable`.
pub struct ScriptedClient {
    responses: Mutex<VecDeque<Result<String, LlmError>>>,
    last: Mutex<Option<Result<String, LlmError>>>,
    calls: AtomicUsize,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(responses: Vec<Result<String, LlmError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            last: Mutex::new(None),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Always answer `text`.
    pub fn always(text: impl Into<String>) -> Self {
        Self::new(vec![Ok(text.into())])
    }

    /// Always fail with `error`.
    pub fn failing(error: LlmError) -> Self {
        Self::new(vec![Err(error)])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl LanguageModelClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }

        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front());
        let mut last = self
            .last
            .lock()
            .map_err(|_| LlmError::InvalidResponse("script lock poisoned".to_string()))?;
        if let Some(response) = next {
            *last = Some(response);
        }
        last.clone().unwrap_or(Err(LlmError::Unavailable))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct SlowClient;

    #[async_trait]
    impl LanguageModelClient for SlowClient {
        async fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok("late".to_string())
        }
    }

    #[tokio::test]
    async fn test_disabled_client() {
        let err = DisabledClient.complete("anything").await.unwrap_err();
        assert_eq!(err, LlmError::Unavailable);
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_client_expires() {
        let client = TimeoutClient::new(SlowClient, Duration::from_secs(2));
        let err = client.complete("prompt").await.unwrap_err();
        assert_eq!(err, LlmError::Timeout(2));
    }

    #[tokio::test]
    async fn test_timeout_client_passes_through() {
        let client = TimeoutClient::new(ScriptedClient::always("{}"), Duration::from_secs(5));
        assert_eq!(client.complete("prompt").await.unwrap(), "{}");
        assert_eq!(client.name(), "scripted");
        assert_eq!(client.timeout(), Duration::from_secs(5));
    }

    #[tokio::test]
    async fn test_scripted_client_sequence() {
        let client = ScriptedClient::new(vec![
            Ok("first".to_string()),
            Err(LlmError::Auth("expired".to_string())),
            Ok("last".to_string()),
        ]);
        assert_eq!(client.complete("a").await.unwrap(), "first");
        assert!(matches!(client.complete("b").await, Err(LlmError::Auth(_))));
        assert_eq!(client.complete("c").await.unwrap(), "last");
        // Repeats the final response once exhausted.
        assert_eq!(client.complete("d").await.unwrap(), "last");
        assert_eq!(client.call_count(), 4);
        assert_eq!(client.prompts(), vec!["a", "b", "c", "d"]);
    }

    #[tokio::test]
    async fn test_scripted_client_empty_script() {
        let client = ScriptedClient::new(Vec::new());
        assert_eq!(client.complete("a").await.unwrap_err(), LlmError::Unavailable);
    }
}
