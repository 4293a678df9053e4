//! AI Integration Layer
//!
//! Completion providers, credential handling and the resilient remote call.

pub mod credential;
pub mod provider;
pub mod request;
pub mod retry;

pub use credential::Credential;
pub use provider::{CompletionProvider, OpenAiProvider, SharedProvider, create_provider};
pub use request::{Completion, CompletionRequest, TokenUsage};
pub use retry::{AttemptOutcome, ResilientCaller, RetryPolicy, RetryStats};
