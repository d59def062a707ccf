//! HTTP plumbing shared by the remote backends.

use std::time::Duration;

use serde::Deserialize;

use clarityforge_core::error::{AnalysisError, ProviderError};

/// Seconds a single HTTP call may take before it is abandoned.
pub(crate) const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Error envelope used by both Gemini and OpenAI: `{"error": {"message": ...}}`.
#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, AnalysisError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| AnalysisError::Configuration(format!("failed to build HTTP client: {e}")))
}

/// Reject blank credentials before a provider is ever constructed.
pub(crate) fn require_api_key(provider: &str, api_key: &str) -> Result<String, AnalysisError> {
    let key = api_key.trim();
    if key.is_empty() {
        return Err(AnalysisError::Configuration(format!(
            "no API key configured for {provider}; set CLARITYFORGE_API_KEY or add api_key to clarityforge.toml"
        )));
    }
    Ok(key.to_string())
}

/// Map a failed `send()` into a provider error.
pub(crate) fn send_error(e: reqwest::Error, timeout: Duration) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout(timeout.as_secs())
    } else {
        ProviderError::NetworkError(e.to_string())
    }
}

/// Pass 2xx responses through; turn everything else into a provider error.
pub(crate) async fn check_status(
    response: reqwest::Response,
    model: &str,
) -> Result<reqwest::Response, ProviderError> {
    let status = response.status().as_u16();
    if status < 400 {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(5)
            * 1000;
        return Err(ProviderError::RateLimited {
            retry_after_ms: retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorEnvelope>(&body)
        .map(|e| e.error.message)
        .unwrap_or(body);

    Err(match status {
        401 | 403 => ProviderError::AuthenticationFailed(message),
        404 => ProviderError::ModelNotFound(model.to_string()),
        _ => ProviderError::ApiError { status, message },
    })
}
