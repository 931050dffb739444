//! Memoized construction of the shared model client.
//!
//! The client moves from uninitialized to ready exactly once, on the first
//! call that finds a credential. Failed attempts cache nothing, so a missing
//! key is reported on every call until the process is restarted with one.

use super::anthropic::AnthropicProvider;
use super::gemini::GeminiProvider;
use super::openai::OpenAiProvider;
use super::provider::{resolve_env_var, LlmProvider};
use crate::config::LlmConfig;
use crate::error::ConfigError;
use once_cell::sync::OnceCell;
use std::sync::Arc;

/// Shared handle to the configured provider.
pub type ClientHandle = Arc<dyn LlmProvider>;

type Builder = Box<dyn Fn() -> Result<ClientHandle, ConfigError> + Send + Sync>;

/// Lazily builds and then hands out a single [`ClientHandle`].
pub struct ClientFactory {
    builder: Builder,
    client: OnceCell<ClientHandle>,
}

impl ClientFactory {
    /// Factory that builds the provider named by `config.provider`.
    pub fn from_config(config: LlmConfig) -> Self {
        Self::from_builder(move || build_provider(&config))
    }

    /// Factory around an arbitrary constructor.
    pub fn from_builder<F>(builder: F) -> Self
    where
        F: Fn() -> Result<ClientHandle, ConfigError> + Send + Sync + 'static,
    {
        Self {
            builder: Box::new(builder),
            client: OnceCell::new(),
        }
    }

    /// Return the shared client, constructing it on the first successful call.
    pub fn get_client(&self) -> Result<ClientHandle, ConfigError> {
        self.client
            .get_or_try_init(|| {
                let client = (self.builder)()?;
                tracing::debug!("Initialized {} client", client.name());
                Ok(client)
            })
            .cloned()
    }

    pub fn is_initialized(&self) -> bool {
        self.client.get().is_some()
    }
}

/// Construct the provider selected in the LLM config.
pub fn build_provider(config: &LlmConfig) -> Result<ClientHandle, ConfigError> {
    match config.provider.as_str() {
        "gemini" => {
            let cfg = config.gemini.clone().unwrap_or_default();
            let api_key = require_key(&cfg.api_key, "Gemini", "GEMINI_API_KEY")?;
            Ok(Arc::new(GeminiProvider::new(
                &cfg.endpoint,
                &api_key,
                &cfg.model,
            )))
        }
        "anthropic" => {
            let cfg = config.anthropic.clone().unwrap_or_default();
            let api_key = require_key(&cfg.api_key, "Anthropic", "ANTHROPIC_API_KEY")?;
            Ok(Arc::new(AnthropicProvider::new(&api_key, &cfg.model)))
        }
        "openai" => {
            let cfg = config.openai.clone().unwrap_or_default();
            let api_key = require_key(&cfg.api_key, "OpenAI", "OPENAI_API_KEY")?;
            Ok(Arc::new(OpenAiProvider::new(
                &cfg.endpoint,
                &api_key,
                &cfg.model,
            )))
        }
        other => Err(ConfigError::ValidationError(format!(
            "Unknown LLM provider: {other}"
        ))),
    }
}

fn require_key(
    value: &str,
    provider: &'static str,
    default_env: &str,
) -> Result<String, ConfigError> {
    resolve_env_var(value).ok_or_else(|| ConfigError::MissingCredential {
        provider,
        hint: format!("Set {default_env} or the api_key in your config file."),
    })
}
