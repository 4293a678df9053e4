//! Config Command
//!
//! Manage ideaforge configuration.
//!
//! Usage:
//!   ideaforge config show [--json]
//!   ideaforge config path
//!   ideaforge config init [-g] [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::cli::util::CommandContext;
use crate::config::ConfigLoader;
use crate::types::Result;

/// Show the effective configuration
pub fn show(config_path: Option<&Path>, as_json: bool) -> Result<()> {
    let ctx = CommandContext::load(config_path)?;
    ConfigLoader::show_config(&ctx.config, as_json)
}

/// Show configuration paths
pub fn path() -> Result<()> {
    ConfigLoader::show_path();
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = if global {
        ConfigLoader::init_global(force)?
    } else {
        ConfigLoader::init_project(force)?
    };
    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!(
        "Initialized {} configuration: {}",
        scope,
        path.display()
    ));
    Ok(())
}
