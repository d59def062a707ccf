//! Error taxonomy for the analysis pipeline.
//!
//! Every failure a session can hit is an [`AnalysisError`]. Provider
//! backends raise [`ProviderError`] and response validation raises
//! [`SchemaError`]; both convert into the matching `AnalysisError` kind.

use thiserror::Error;

/// Errors that can occur when talking to a remote model service.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid or revoked API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

/// The model answered, but not with a usable analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// The service returned no text at all.
    #[error("the model returned an empty response")]
    EmptyResponse,

    /// The text was not valid JSON.
    #[error("response is not valid JSON: {0}")]
    MalformedJson(String),

    /// A required field was absent.
    #[error("missing required field `{path}`")]
    MissingField { path: String },

    /// A field was present with the wrong JSON type.
    #[error("field `{path}` should be {expected}, found {found}")]
    WrongType {
        path: String,
        expected: &'static str,
        found: &'static str,
    },
}

/// A failed analysis. The `Display` text is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    /// Input rejected before any request was built.
    #[error("{0}")]
    Validation(String),

    /// The application is not configured well enough to make a request.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The remote service could not be reached or refused the request.
    #[error("model service error: {0}")]
    Transport(#[from] ProviderError),

    /// The remote service answered with something that is not a valid analysis.
    #[error("invalid analysis response: {0}")]
    Schema(#[from] SchemaError),
}

impl AnalysisError {
    /// Short machine-readable kind, used in logs and JSON output.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Validation(_) => "validation",
            AnalysisError::Configuration(_) => "configuration",
            AnalysisError::Transport(_) => "transport",
            AnalysisError::Schema(_) => "schema",
        }
    }
}
