//! Completion Provider Abstraction
//!
//! Defines the `CompletionProvider` trait implemented by remote
//! text-generation endpoints. Providers report failures as classified
//! [`LlmError`]s so the retry layer can decide without inspecting messages.

mod openai;

pub use openai::OpenAiProvider;

use async_trait::async_trait;
use std::sync::Arc;

use super::credential::Credential;
use super::request::{Completion, CompletionRequest};
use crate::config::LlmConfig;
use crate::types::{ForgeError, LlmError, Result};

/// Shared provider type
pub type SharedProvider = Arc<dyn CompletionProvider>;

/// Remote text-generation endpoint
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Run one completion attempt
    async fn complete(&self, request: &CompletionRequest)
    -> std::result::Result<Completion, LlmError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model name currently in use
    fn model(&self) -> &str;

    /// Check if the endpoint is reachable with the configured credential
    async fn health_check(&self) -> Result<bool>;
}

/// Create a shared provider from configuration and an injected credential
pub fn create_provider(config: &LlmConfig, credential: Credential) -> Result<SharedProvider> {
    match config.provider.as_str() {
        "openai" => Ok(Arc::new(OpenAiProvider::new(config, credential)?)),
        _ => Err(ForgeError::Config(format!(
            "Unknown provider: {}. Supported: openai",
            config.provider
        ))),
    }
}
