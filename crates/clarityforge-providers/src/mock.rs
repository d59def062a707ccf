//! Mock provider for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use clarityforge_core::error::ProviderError;
use clarityforge_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, TokenUsage};

/// A mock provider for exercising the gateway and session without real API calls.
///
/// Returns configurable raw text based on prompt content matching.
pub struct MockProvider {
    /// Map of prompt substring → response text.
    responses: HashMap<String, String>,
    /// Response if no prompt matches. `None` simulates an empty body.
    default_response: Option<String>,
    /// Returned instead of any response when set.
    failure: Option<ProviderError>,
    /// Artificial latency before answering.
    delay: Option<Duration>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<GenerateRequest>>,
}

impl MockProvider {
    /// Create a new mock provider with the given prompt→response mappings.
    pub fn new(responses: HashMap<String, String>) -> Self {
        Self {
            responses,
            default_response: None,
            failure: None,
            delay: None,
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            default_response: Some(response.to_string()),
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock whose every call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            failure: Some(error),
            ..Self::new(HashMap::new())
        }
    }

    /// Create a mock that answers with no text at all.
    pub fn empty() -> Self {
        Self::new(HashMap::new())
    }

    /// Wait `delay` before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }

        // Find a matching response based on prompt content
        let text = self
            .responses
            .iter()
            .find(|(key, _)| request.prompt.contains(key.as_str()))
            .map(|(_, v)| v.clone())
            .or_else(|| self.default_response.clone());

        let completion_tokens = text.as_ref().map_or(0, |t| (t.len() / 4) as u32); // Rough estimate
        let prompt_tokens = (request.prompt.len() / 4) as u32;

        Ok(GenerateResponse {
            text,
            model: request.model().to_string(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                thinking_tokens: 0,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use clarityforge_core::bundle::AnalysisBundle;

    fn request(prompt: &str) -> GenerateRequest {
        GenerateRequest::new(prompt, Arc::new(AnalysisBundle::for_model("mock-model")))
    }

    #[tokio::test]
    async fn fixed_response() {
        let provider = MockProvider::with_fixed_response("{\"score\": 10}");
        let response = provider.generate(&request("anything")).await.unwrap();
        assert_eq!(response.text.as_deref(), Some("{\"score\": 10}"));
        assert_eq!(response.model, "mock-model");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.last_request().unwrap().prompt, "anything");
    }

    #[tokio::test]
    async fn prompt_matching() {
        let mut responses = HashMap::new();
        responses.insert("Gravity".to_string(), "gravity-analysis".to_string());
        responses.insert("Entropy".to_string(), "entropy-analysis".to_string());
        let provider = MockProvider::new(responses);

        let resp = provider
            .generate(&request("Topic: Gravity\n\nUser Explanation: things fall"))
            .await
            .unwrap();
        assert_eq!(resp.text.as_deref(), Some("gravity-analysis"));

        let resp = provider
            .generate(&request("Topic: Optics\n\nUser Explanation: light bends"))
            .await
            .unwrap();
        assert!(resp.text.is_none());
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn failing_mock() {
        let provider = MockProvider::failing(ProviderError::Timeout(3));
        let err = provider.generate(&request("x")).await.unwrap_err();
        assert_eq!(err, ProviderError::Timeout(3));
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delayed_mock_waits() {
        let provider = MockProvider::with_fixed_response("{}").with_delay(Duration::from_secs(30));
        let started = tokio::time::Instant::now();
        provider.generate(&request("x")).await.unwrap();
        assert!(started.elapsed() >= Duration::from_secs(30));
    }
}
