//! Configuration Types
//!
//! All configuration structures with sensible defaults.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::constants::{credential, llm, network, retry};
use crate::types::{ForgeError, Result};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Completion endpoint settings
    pub llm: LlmConfig,

    /// Rate-limit retry settings
    pub retry: RetryConfig,

    /// Where to look for the API key
    pub credential: CredentialConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            llm: LlmConfig::default(),
            retry: RetryConfig::default(),
            credential: CredentialConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub fn validate(&self) -> Result<()> {
        if let Some(temperature) = self.llm.temperature
            && !(0.0..=2.0).contains(&temperature)
        {
            return Err(ForgeError::Config(format!(
                "LLM temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        if self.llm.timeout_secs == 0 {
            return Err(ForgeError::Config(
                "LLM timeout_secs must be greater than 0".to_string(),
            ));
        }

        if self.llm.max_tokens == Some(0) {
            return Err(ForgeError::Config(
                "LLM max_tokens must be greater than 0".to_string(),
            ));
        }

        let api_base = url::Url::parse(&self.llm.api_base).map_err(|e| {
            ForgeError::Config(format!("Invalid LLM api_base '{}': {}", self.llm.api_base, e))
        })?;
        if !matches!(api_base.scheme(), "http" | "https") {
            return Err(ForgeError::Config(format!(
                "LLM api_base must use http or https, got '{}'",
                api_base.scheme()
            )));
        }

        if self.retry.max_attempts == 0 {
            return Err(ForgeError::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }

        if self.credential.env_var.trim().is_empty() {
            return Err(ForgeError::Config(
                "credential env_var must not be empty".to_string(),
            ));
        }

        if self.credential.secrets_key.trim().is_empty() {
            return Err(ForgeError::Config(
                "credential secrets_key must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// LLM Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name
    pub provider: String,

    /// Model name
    pub model: String,

    /// Base URL of the OpenAI-compatible API
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,

    /// Sampling temperature used when a step does not set one
    pub temperature: Option<f32>,

    /// Response-size bound used when a step does not set one
    pub max_tokens: Option<u32>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: llm::DEFAULT_PROVIDER.to_string(),
            model: llm::DEFAULT_MODEL.to_string(),
            api_base: network::DEFAULT_API_BASE.to_string(),
            timeout_secs: network::DEFAULT_TIMEOUT_SECS,
            temperature: None,
            max_tokens: None,
        }
    }
}

// =============================================================================
// Retry Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Attempts per completion call, first try included
    pub max_attempts: u32,

    /// Delay before the first retry in milliseconds; doubles per retry
    pub initial_delay_ms: u64,

    /// Pause between workflow steps in milliseconds
    pub pacing_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: retry::DEFAULT_MAX_ATTEMPTS,
            initial_delay_ms: retry::DEFAULT_INITIAL_DELAY_MS,
            pacing_ms: retry::DEFAULT_PACING_MS,
        }
    }
}

// =============================================================================
// Credential Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Environment variable holding the API key
    pub env_var: String,

    /// Optional TOML secrets file
    pub secrets_file: Option<PathBuf>,

    /// Dotted key path inside the secrets file
    pub secrets_key: String,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            env_var: credential::DEFAULT_ENV_VAR.to_string(),
            secrets_file: None,
            secrets_key: credential::DEFAULT_SECRETS_KEY.to_string(),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.retry.max_attempts, 3);
        assert_eq!(config.retry.initial_delay_ms, 2_000);
        assert_eq!(config.credential.env_var, "OPENAI_API_KEY");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut config = Config::default();
        config.llm.temperature = Some(3.5);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.retry.max_attempts = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.api_base = "not a url".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.api_base = "ftp://example.com".to_string();
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.llm.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: Config = toml::from_str(
            r#"
            [retry]
            max_attempts = 5
            "#,
        )
        .unwrap();
        assert_eq!(config.retry.max_attempts, 5);
        assert_eq!(config.retry.initial_delay_ms, 2_000);
        assert_eq!(config.llm.model, "gpt-4-turbo");
    }
}
