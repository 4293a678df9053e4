//! Check Command
//!
//! Verify configuration, credential, and provider reachability without
//! spending completion tokens.

use std::path::Path;

use tokio::runtime::Runtime;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::types::{ForgeError, Result};

pub fn run(config_path: Option<&Path>, api_key: Option<&str>) -> Result<()> {
    let out = Output::new();
    out.header("Provider check");

    let ctx = CommandContext::load(config_path)?;
    out.success("Configuration valid");

    let caller = ctx.caller(api_key)?;
    out.success("Credential found");

    let provider = caller.provider();
    out.field("Provider", provider.name());
    out.field("Model", provider.model());
    out.field("Endpoint", &ctx.config.llm.api_base);
    out.field(
        "Retry",
        &format!(
            "{} attempts, {}ms initial delay",
            caller.policy().max_attempts(),
            caller.policy().initial_delay().as_millis()
        ),
    );

    let rt = Runtime::new()?;
    if rt.block_on(provider.health_check())? {
        out.success("Provider reachable");
        Ok(())
    } else {
        Err(ForgeError::Config(format!(
            "{} did not accept the credential at {}",
            provider.name(),
            ctx.config.llm.api_base
        )))
    }
}
