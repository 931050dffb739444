//! Configuration validation.

use crate::error::ConfigError;

use super::{Config, KNOWN_PROVIDERS};

const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];
const LOG_FORMATS: &[&str] = &["pretty", "json"];

impl Config {
    /// Validate that enumerated settings hold known values.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !KNOWN_PROVIDERS.contains(&self.llm.provider.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "llm.provider must be one of {}, got '{}'",
                KNOWN_PROVIDERS.join(", "),
                self.llm.provider
            )));
        }
        if let Some(ref gemini) = self.llm.gemini {
            if gemini.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "llm.gemini.model must not be empty".into(),
                ));
            }
        }
        if let Some(ref anthropic) = self.llm.anthropic {
            if anthropic.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "llm.anthropic.model must not be empty".into(),
                ));
            }
        }
        if let Some(ref openai) = self.llm.openai {
            if openai.model.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "llm.openai.model must not be empty".into(),
                ));
            }
        }
        if !LOG_LEVELS.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "logging.level must be one of {}",
                LOG_LEVELS.join(", ")
            )));
        }
        if !LOG_FORMATS.contains(&self.logging.format.as_str()) {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}
