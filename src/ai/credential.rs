//! API Credential
//!
//! The credential is resolved once per command and handed to the provider
//! constructor. Lookup order:
//!
//! 1. Value supplied at runtime (`--api-key`)
//! 2. Environment variable (default `OPENAI_API_KEY`)
//! 3. Secrets TOML file at a dotted key path (default `general.OPENAI_API_KEY`)
//!
//! Blank values count as absent.

use std::path::Path;

use secrecy::{ExposeSecret, SecretString};
use tracing::debug;

use crate::config::CredentialConfig;
use crate::types::{ForgeError, Result};

/// API key stored securely - never exposed in logs or debug output
#[derive(Clone)]
pub struct Credential(SecretString);

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([REDACTED])")
    }
}

impl Credential {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretString::from(value.into()))
    }

    pub(crate) fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Resolve a credential from the configured sources
    pub fn resolve(explicit: Option<&str>, config: &CredentialConfig) -> Result<Self> {
        if let Some(value) = non_blank(explicit) {
            debug!("Using credential supplied at runtime");
            return Ok(Self::new(value));
        }

        if let Ok(value) = std::env::var(&config.env_var)
            && let Some(value) = non_blank(Some(&value))
        {
            debug!(env_var = %config.env_var, "Using credential from environment");
            return Ok(Self::new(value));
        }

        if let Some(path) = &config.secrets_file
            && path.exists()
            && let Some(value) = read_secrets_file(path, &config.secrets_key)?
        {
            debug!(path = %path.display(), "Using credential from secrets file");
            return Ok(Self::new(value));
        }

        Err(ForgeError::MissingCredential {
            env_var: config.env_var.clone(),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Look up a dotted key path such as `general.OPENAI_API_KEY`
fn read_secrets_file(path: &Path, key_path: &str) -> Result<Option<String>> {
    let content = std::fs::read_to_string(path).map_err(|e| ForgeError::Secrets {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| ForgeError::Secrets {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut segments = key_path.split('.');
    let Some(first) = segments.next() else {
        return Ok(None);
    };
    let mut current = table.get(first);
    for segment in segments {
        current = current.and_then(|value| value.get(segment));
    }

    Ok(current
        .and_then(|value| value.as_str())
        .and_then(|value| non_blank(Some(value)))
        .map(str::to_string))
}
