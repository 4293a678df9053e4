//! Global Constants
//!
//! Centralized constants for configuration and tuning.

/// Resilient remote call constants
pub mod retry {
    /// Total attempts per logical call (first try included)
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Delay before the first retry (milliseconds); doubles after each retry
    pub const DEFAULT_INITIAL_DELAY_MS: u64 = 2_000;

    /// Pause between consecutive workflow steps (milliseconds)
    pub const DEFAULT_PACING_MS: u64 = 0;
}

/// HTTP/Network constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

    /// Default OpenAI-compatible API base
    pub const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
}

/// LLM defaults
pub mod llm {
    pub const DEFAULT_PROVIDER: &str = "openai";

    pub const DEFAULT_MODEL: &str = "gpt-4-turbo";
}

/// Credential lookup defaults
pub mod credential {
    pub const DEFAULT_ENV_VAR: &str = "OPENAI_API_KEY";

    /// Dotted key path inside a secrets TOML file
    pub const DEFAULT_SECRETS_KEY: &str = "general.OPENAI_API_KEY";
}

/// Opportunity matrix constants
pub mod matrix {
    /// Upper bound of both score axes
    pub const SCALE_MAX: f32 = 10.0;
}
