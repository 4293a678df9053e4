//! CLI Common Utilities
//!
//! Configuration loading and caller construction shared by the commands.

use std::path::Path;
use std::time::Duration;

use crate::ai::{Credential, ResilientCaller, RetryPolicy, create_provider};
use crate::config::{Config, ConfigLoader};
use crate::types::Result;
use crate::workflow::WorkflowRunner;

/// Command execution context
#[derive(Debug, Clone)]
pub struct CommandContext {
    pub config: Config,
}

impl CommandContext {
    /// Load configuration from `config_path`, or the full resolution chain when absent
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = match config_path {
            Some(path) => ConfigLoader::load_from_file(path)?,
            None => ConfigLoader::load()?,
        };
        Ok(Self { config })
    }

    /// Resolve the credential and wrap the configured provider in the retry policy
    pub fn caller(&self, api_key: Option<&str>) -> Result<ResilientCaller> {
        let credential = Credential::resolve(api_key, &self.config.credential)?;
        let provider = create_provider(&self.config.llm, credential)?;
        let policy = RetryPolicy::from_config(&self.config.retry)?;
        Ok(ResilientCaller::new(provider, policy))
    }

    pub fn runner(&self, api_key: Option<&str>) -> Result<WorkflowRunner> {
        let pacing = Duration::from_millis(self.config.retry.pacing_ms);
        Ok(WorkflowRunner::new(self.caller(api_key)?).with_pacing(pacing))
    }
}
