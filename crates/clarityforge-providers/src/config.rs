//! Configuration loading and provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use clarityforge_core::bundle::{AnalysisBundle, DEFAULT_MODEL, DEFAULT_THINKING_BUDGET};
use clarityforge_core::error::AnalysisError;
use clarityforge_core::traits::LlmProvider;

use crate::gemini::GeminiProvider;
use crate::openai::OpenAiProvider;

/// Which remote service to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAI,
}

impl ProviderKind {
    /// Provider-specific environment variable consulted for the API key.
    fn key_env_var(self) -> &'static str {
        match self {
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::OpenAI => "OPENAI_API_KEY",
        }
    }
}

/// Top-level clarityforge configuration.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ClarityConfig {
    /// Remote service.
    #[serde(default)]
    pub provider: ProviderKind,
    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,
    /// Override for the service base URL.
    #[serde(default)]
    pub base_url: Option<String>,
    /// API key. `${VAR}` references are resolved from the environment.
    #[serde(default)]
    pub api_key: Option<String>,
    /// OpenAI organization id.
    #[serde(default)]
    pub org_id: Option<String>,
    /// Reasoning-effort hint passed through to the model.
    #[serde(default = "default_thinking_budget")]
    pub thinking_budget: u32,
    /// Upper bound on one analysis, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ClarityConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClarityConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("org_id", &self.org_id)
            .field("thinking_budget", &self.thinking_budget)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}
fn default_thinking_budget() -> u32 {
    DEFAULT_THINKING_BUDGET
}
fn default_timeout_secs() -> u64 {
    120
}

impl Default for ClarityConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: default_model(),
            base_url: None,
            api_key: None,
            org_id: None,
            thinking_budget: default_thinking_budget(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClarityConfig {
    /// The immutable request bundle for this configuration.
    pub fn bundle(&self) -> AnalysisBundle {
        AnalysisBundle::for_model(self.model.clone()).with_thinking_budget(Some(self.thinking_budget))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = lookup(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Apply environment overrides and resolve `${VAR}` references.
///
/// Key precedence: `CLARITYFORGE_API_KEY`, the config file, the provider's own
/// variable (`GEMINI_API_KEY` / `OPENAI_API_KEY`), then `API_KEY`.
fn apply_env(config: &mut ClarityConfig, lookup: &dyn Fn(&str) -> Option<String>) {
    let resolve = |v: &Option<String>| {
        v.as_ref()
            .map(|s| resolve_env_vars(s, lookup))
            .filter(|s| !s.trim().is_empty())
    };
    config.api_key = resolve(&config.api_key);
    config.base_url = resolve(&config.base_url);
    config.org_id = resolve(&config.org_id);

    let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

    if let Some(key) = non_blank("CLARITYFORGE_API_KEY") {
        config.api_key = Some(key);
    }
    if config.api_key.is_none() {
        config.api_key = non_blank(config.provider.key_env_var()).or_else(|| non_blank("API_KEY"));
    }
    if let Some(model) = non_blank("CLARITYFORGE_MODEL") {
        config.model = model;
    }
    if let Some(url) = non_blank("CLARITYFORGE_BASE_URL") {
        config.base_url = Some(url);
    }
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order when `path` is `None`:
/// 1. `clarityforge.toml` in the current directory
/// 2. `~/.config/clarityforge/config.toml`
///
/// Environment variable overrides: `CLARITYFORGE_API_KEY`, `CLARITYFORGE_MODEL`,
/// `CLARITYFORGE_BASE_URL`.
pub fn load_config_from(path: Option<&Path>) -> Result<ClarityConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("clarityforge.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            toml::from_str::<ClarityConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => ClarityConfig::default(),
    };

    apply_env(&mut config, &|name: &str| std::env::var(name).ok());
    tracing::debug!(?config, "configuration loaded");
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("clarityforge"))
}

/// Create the configured provider.
///
/// Fails with a configuration error when no API key is available, so no
/// request is ever attempted with an empty credential.
pub fn create_provider(config: &ClarityConfig) -> Result<Arc<dyn LlmProvider>, AnalysisError> {
    let api_key = config.api_key.as_deref().unwrap_or_default();
    let timeout = config.timeout();
    match config.provider {
        ProviderKind::Gemini => Ok(Arc::new(GeminiProvider::with_timeout(
            api_key,
            config.base_url.clone(),
            timeout,
        )?)),
        ProviderKind::OpenAI => Ok(Arc::new(OpenAiProvider::with_timeout(
            api_key,
            config.base_url.clone(),
            config.org_id.clone(),
            timeout,
        )?)),
    }
}
