//! Analysis request gateway.
//!
//! The only component that talks to the remote model: it composes the
//! prompt, calls the provider once, and turns the raw text into a
//! validated [`ClarityAnalysis`] or a typed failure.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::bundle::AnalysisBundle;
use crate::error::{AnalysisError, SchemaError};
use crate::model::{AnalysisRequest, ClarityAnalysis};
use crate::schema::ResponseSchema;
use crate::traits::{GenerateRequest, LlmProvider};

/// Sends analysis requests through a provider and validates the answers.
#[derive(Clone)]
pub struct AnalysisGateway {
    provider: Arc<dyn LlmProvider>,
    bundle: Arc<AnalysisBundle>,
}

impl AnalysisGateway {
    pub fn new(provider: Arc<dyn LlmProvider>, bundle: Arc<AnalysisBundle>) -> Self {
        Self { provider, bundle }
    }

    pub fn bundle(&self) -> &AnalysisBundle {
        &self.bundle
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Run one analysis. No retries, no post-processing of the result.
    ///
    /// Blank explanations are the caller's responsibility; the gateway
    /// sends whatever it is given.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ClarityAnalysis, AnalysisError> {
        let start = Instant::now();
        let generate = GenerateRequest::new(request.prompt(), Arc::clone(&self.bundle));

        debug!(
            provider = self.provider.name(),
            model = %self.bundle.model,
            topic = request.effective_topic(),
            "sending analysis request"
        );

        let response = self.provider.generate(&generate).await.map_err(|e| {
            warn!(provider = self.provider.name(), error = %e, "model call failed");
            AnalysisError::from(e)
        })?;

        let analysis = parse_analysis(response.text.as_deref(), &self.bundle.schema)?;

        info!(
            provider = self.provider.name(),
            model = %response.model,
            score = analysis.score,
            latency_ms = start.elapsed().as_millis() as u64,
            total_tokens = response.token_usage.total_tokens,
            "analysis complete"
        );
        Ok(analysis)
    }
}

/// Parse and validate raw model output.
///
/// A missing or blank body fails immediately instead of being treated as `{}`.
pub fn parse_analysis(
    text: Option<&str>,
    schema: &ResponseSchema,
) -> Result<ClarityAnalysis, SchemaError> {
    let text = text.map(str::trim).filter(|t| !t.is_empty());
    let Some(text) = text else {
        return Err(SchemaError::EmptyResponse);
    };

    let body = strip_code_fence(text);
    let value: Value =
        serde_json::from_str(body).map_err(|e| SchemaError::MalformedJson(e.to_string()))?;
    schema.validate(&value)?;

    // Validation covers the declared shape; anything serde still rejects is
    // outside it (e.g. a non-string `thinkingProcess`).
    serde_json::from_value(value).map_err(|e| SchemaError::MalformedJson(e.to_string()))
}

/// Unwrap a response that arrived inside a Markdown code fence.
///
/// Handles ```` ```json ```` and bare ```` ``` ```` fences, including an
/// unterminated trailing fence. Unfenced text is returned as-is.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(newline) = rest.find('\n') else {
        return trimmed;
    };
    let lang = rest[..newline].trim().to_lowercase();
    if !lang.is_empty() && lang != "json" {
        return trimmed;
    }
    let body = &rest[newline + 1..];
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}


#[cfg(test)]
mod tests {
    use super::testing::ScriptedProvider;
    use super::*;
    use crate::error::ProviderError;
    use crate::model::fixtures::sample_analysis;

    fn sample_json() -> String {
        serde_json::to_string(&sample_analysis()).unwrap()
    }

    fn gateway(provider: Arc<ScriptedProvider>) -> AnalysisGateway {
        AnalysisGateway::new(provider, Arc::new(AnalysisBundle::default()))
    }

    #[tokio::test]
    async fn returns_parsed_result_unchanged() {
        let provider = Arc::new(ScriptedProvider::new().push_text(&sample_json()));
        let result = gateway(provider.clone())
            .analyze(&AnalysisRequest::new("", "Gravity pulls things down."))
            .await
            .unwrap();

        assert_eq!(result, sample_analysis());
        assert_eq!(provider.calls(), 1);
        assert_eq!(
            provider.prompts(),
            ["Topic: General Knowledge\n\nUser Explanation: Gravity pulls things down."]
        );
    }

    #[tokio::test]
    async fn out_of_range_score_is_passed_through() {
        let mut analysis = sample_analysis();
        analysis.score = 140.5;
        let text = serde_json::to_string(&analysis).unwrap();
        let provider = Arc::new(ScriptedProvider::new().push_text(&text));

        let result = gateway(provider)
            .analyze(&AnalysisRequest::new("Physics", "F = ma"))
            .await
            .unwrap();
        assert_eq!(result.score, 140.5);
    }

    #[tokio::test]
    async fn transport_failure_is_surfaced() {
        let provider = Arc::new(
            ScriptedProvider::new().push(Err(ProviderError::NetworkError("connection reset".into()))),
        );
        let err = gateway(provider)
            .analyze(&AnalysisRequest::new("", "x"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "transport");
        assert!(err.to_string().contains("connection reset"));
    }

    #[tokio::test]
    async fn missing_body_fails_fast() {
        let provider = Arc::new(ScriptedProvider::new().push(Ok(None)));
        let err = gateway(provider)
            .analyze(&AnalysisRequest::new("", "x"))
            .await
            .unwrap_err();
        assert_eq!(err, AnalysisError::Schema(SchemaError::EmptyResponse));
    }

    #[test]
    fn malformed_json_is_a_schema_error() {
        let err = parse_analysis(Some("{\"score\": 5"), &ResponseSchema::clarity_analysis())
            .unwrap_err();
        assert!(matches!(err, SchemaError::MalformedJson(_)));
    }

    #[test]
    fn empty_object_is_rejected_not_partially_filled() {
        let err = parse_analysis(Some("{}"), &ResponseSchema::clarity_analysis()).unwrap_err();
        assert_eq!(
            err,
            SchemaError::MissingField {
                path: "$.score".into()
            }
        );
    }

    #[test]
    fn blank_body_is_empty_response() {
        let err = parse_analysis(Some("  \n"), &ResponseSchema::clarity_analysis()).unwrap_err();
        assert_eq!(err, SchemaError::EmptyResponse);
    }

    #[test]
    fn fenced_json_is_accepted() {
        let text = format!("```json\n{}\n```", sample_json());
        let analysis = parse_analysis(Some(&text), &ResponseSchema::clarity_analysis()).unwrap();
        assert_eq!(analysis, sample_analysis());
    }

    #[test]
    fn strip_code_fence_variants() {
        assert_eq!(strip_code_fence("{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```JSON\n{\"a\":1}"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```python\nx = 1\n```"), "```python\nx = 1\n```");
    }

    #[test]
    fn thinking_process_is_kept_when_present() {
        let mut value = serde_json::to_value(sample_analysis()).unwrap();
        value["thinkingProcess"] = serde_json::json!("started from the claim");
        let analysis = parse_analysis(
            Some(&value.to_string()),
            &ResponseSchema::clarity_analysis(),
        )
        .unwrap();
        assert_eq!(
            analysis.thinking_process.as_deref(),
            Some("started from the claim")
        );
    }
}
