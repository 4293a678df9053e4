//! ideaforge - Idea Analysis Workflows over a Resilient LLM Client
//!
//! Form-driven workflows that turn a problem or startup idea into a set of
//! LLM-written analyses. Every completion goes through a caller that retries
//! only on rate limits, doubling the wait each time, up to a fixed budget.
//!
//! ## Quick Start
//!
//! ```ignore
//! use ideaforge::{ConfigLoader, FormSubmission, WorkflowRunner};
//! use ideaforge::cli::CommandContext;
//! use ideaforge::workflow::catalog;
//!
//! let ctx = CommandContext::load(None)?;
//! let runner = ctx.runner(None)?;
//! let mut form = FormSubmission::new();
//! form.insert("problem", "Manual invoice matching");
//! form.insert("audience", "Small accounting firms");
//! let report = runner.run(catalog::find("solutions")?, &form, None).await?;
//! ```
//!
//! ## Modules
//!
//! - [`ai`]: completion provider, credential lookup, retry policy
//! - [`workflow`]: forms, prompt templates, step runner, reports
//! - [`config`]: layered configuration
//! - [`cli`]: command handlers

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod types;
pub mod workflow;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::error::{ErrorCategory, ForgeError, LlmError, Result};

// =============================================================================
// AI Re-exports
// =============================================================================

pub use ai::{
    Completion, CompletionProvider, CompletionRequest, Credential, OpenAiProvider,
    ResilientCaller, RetryPolicy, RetryStats, SharedProvider,
};

// =============================================================================
// Workflow Re-exports
// =============================================================================

pub use workflow::{FormSubmission, OpportunityMatrix, OutputFormat, Report, WorkflowRunner};
