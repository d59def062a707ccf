//! clarityforge-providers: remote model backends.
//!
//! Implements the `LlmProvider` trait for Google Gemini and
//! OpenAI-compatible chat-completion services, plus a mock for tests, and
//! loads the configuration that selects between them.

pub mod config;
pub mod gemini;
mod http;
pub mod mock;
pub mod openai;

pub use config::{create_provider, load_config_from, ClarityConfig, ProviderKind};
pub use gemini::GeminiProvider;
pub use mock::MockProvider;
pub use openai::OpenAiProvider;
