//! The seam between the analysis gateway and concrete model backends.
//!
//! Implemented by the `clarityforge-providers` crate.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::bundle::AnalysisBundle;
use crate::error::ProviderError;

/// Trait for remote model services that can answer with structured JSON.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "gemini").
    fn name(&self) -> &str;

    /// Send one prompt and return the raw response text.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

/// One outbound model call.
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    /// The user-turn prompt.
    pub prompt: String,
    /// Model, instructions, schema and generation parameters.
    pub bundle: Arc<AnalysisBundle>,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>, bundle: Arc<AnalysisBundle>) -> Self {
        Self {
            prompt: prompt.into(),
            bundle,
        }
    }

    pub fn model(&self) -> &str {
        &self.bundle.model
    }
}

/// Response from a model call, before any parsing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The response text, if the service produced any.
    pub text: Option<String>,
    /// Model that actually generated the response.
    pub model: String,
    /// Token usage.
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    /// Tokens spent on hidden reasoning, where the service reports them.
    #[serde(default)]
    pub thinking_tokens: u32,
    pub total_tokens: u32,
}
