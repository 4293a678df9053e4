//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Remote-call failures are classified into categories so the retry loop can
//! branch on an explicit outcome instead of on error identity.
//!
//! ## Error Categories
//!
//! - **RateLimit**: Endpoint over capacity (the only recoverable category)
//! - **Auth**: Credential rejected (fail fast)
//! - **BadRequest**: Request rejected as malformed (fail fast)
//! - **Network**: Transport failure (surfaced, not retried)
//! - **Unavailable**: Endpoint missing or erroring (surfaced, not retried)
//! - **ParseError**: Response body could not be understood

use std::path::PathBuf;

use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// Categories for remote-call failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited or over capacity - wait then retry
    RateLimit,
    /// Authentication failed - fail fast
    Auth,
    /// Invalid request - fix request
    BadRequest,
    /// Network/connectivity issues
    Network,
    /// Endpoint unavailable or server-side failure
    Unavailable,
    /// Response could not be parsed
    ParseError,
    /// Unknown error
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Network => write!(f, "NETWORK"),
            Self::Unavailable => write!(f, "UNAVAILABLE"),
            Self::ParseError => write!(f, "PARSE_ERROR"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Whether the retry policy applies to this category.
    ///
    /// Only temporary over-capacity is recoverable; everything else is
    /// surfaced to the caller on the first occurrence.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::RateLimit)
    }
}

// =============================================================================
// LLM Error
// =============================================================================

/// Remote-call error with category and provider context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LlmError {
    /// Error category for routing decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Provider that produced the error
    pub provider: Option<String>,
}

impl std::fmt::Display for LlmError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(provider) = &self.provider {
            write!(f, "[{}:{}] {}", provider, self.category, self.message)
        } else {
            write!(f, "[{}] {}", self.category, self.message)
        }
    }
}

impl std::error::Error for LlmError {}

impl LlmError {
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            provider: None,
        }
    }

    pub fn with_provider(
        category: ErrorCategory,
        message: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            category,
            message: message.into(),
            provider: Some(provider.into()),
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.category.is_recoverable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Maps raw provider failures onto [`ErrorCategory`]
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an HTTP status code (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str, provider: &str) -> LlmError {
        let category = match status {
            429 => ErrorCategory::RateLimit,
            401 | 403 => ErrorCategory::Auth,
            400 | 413 | 422 => ErrorCategory::BadRequest,
            404 | 500..=599 => ErrorCategory::Unavailable,
            _ => Self::classify(message, provider).category,
        };
        LlmError::with_provider(category, message, provider)
    }

    /// Classify an error message by its wording
    pub fn classify(message: &str, provider: &str) -> LlmError {
        let lower = message.to_lowercase();

        let category = if lower.contains("rate limit")
            || lower.contains("rate_limit")
            || lower.contains("too many requests")
            || lower.contains("insufficient_quota")
            || lower.contains("overloaded")
        {
            ErrorCategory::RateLimit
        } else if lower.contains("unauthorized")
            || lower.contains("invalid api key")
            || lower.contains("incorrect api key")
            || lower.contains("permission denied")
        {
            ErrorCategory::Auth
        } else if lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timed out")
            || lower.contains("timeout")
            || lower.contains("unreachable")
        {
            ErrorCategory::Network
        } else if lower.contains("service unavailable")
            || lower.contains("server error")
            || lower.contains("bad gateway")
        {
            ErrorCategory::Unavailable
        } else if lower.contains("bad request") || lower.contains("invalid_request") {
            ErrorCategory::BadRequest
        } else if lower.contains("parse") || lower.contains("decode") || lower.contains("json") {
            ErrorCategory::ParseError
        } else {
            ErrorCategory::Unknown
        };

        LlmError::with_provider(category, message, provider)
    }

    /// Classify a transport error raised by `reqwest` before any status is seen
    pub fn classify_transport(err: &reqwest::Error, provider: &str) -> LlmError {
        let category = if err.is_decode() {
            ErrorCategory::ParseError
        } else if err.is_builder() {
            ErrorCategory::BadRequest
        } else if let Some(status) = err.status() {
            return Self::classify_http_status(status.as_u16(), &err.to_string(), provider);
        } else {
            ErrorCategory::Network
        };
        LlmError::with_provider(category, err.to_string(), provider)
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum ForgeError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    // -------------------------------------------------------------------------
    // Remote Call Errors
    // -------------------------------------------------------------------------
    /// Non-recoverable failure from the completion endpoint
    #[error("{0}")]
    Llm(LlmError),

    /// Every attempt hit the rate limit
    #[error("Rate limit exceeded after {attempts} attempts. Please try again later.")]
    RetriesExhausted { attempts: u32, last: LlmError },

    #[error(
        "API key not found. Pass --api-key, set {env_var}, or configure a secrets file"
    )]
    MissingCredential { env_var: String },

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Please fill in all required fields: {}", .missing.join(", "))]
    IncompleteInput { missing: Vec<String> },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Template error: {0}")]
    Template(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Failed to read secrets file {path}: {message}")]
    Secrets { path: PathBuf, message: String },
}

impl From<LlmError> for ForgeError {
    fn from(err: LlmError) -> Self {
        ForgeError::Llm(err)
    }
}

pub type Result<T> = std::result::Result<T, ForgeError>;

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
        assert_eq!(ErrorCategory::ParseError.to_string(), "PARSE_ERROR");
    }

    #[test]
    fn test_only_rate_limit_is_recoverable() {
        assert!(ErrorCategory::RateLimit.is_recoverable());
        assert!(!ErrorCategory::Auth.is_recoverable());
        assert!(!ErrorCategory::BadRequest.is_recoverable());
        assert!(!ErrorCategory::Network.is_recoverable());
        assert!(!ErrorCategory::Unavailable.is_recoverable());
        assert!(!ErrorCategory::ParseError.is_recoverable());
        assert!(!ErrorCategory::Unknown.is_recoverable());
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "slow down", "openai");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);
        assert!(rate_limit.is_recoverable());

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized", "openai");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let bad = ErrorClassifier::classify_http_status(400, "bad", "openai");
        assert_eq!(bad.category, ErrorCategory::BadRequest);

        let server = ErrorClassifier::classify_http_status(503, "down", "openai");
        assert_eq!(server.category, ErrorCategory::Unavailable);
        assert!(!server.is_recoverable());
    }

    #[test]
    fn test_classify_unknown_status_falls_back_to_message() {
        let err = ErrorClassifier::classify_http_status(418, "Rate limit reached", "openai");
        assert_eq!(err.category, ErrorCategory::RateLimit);
    }

    #[test]
    fn test_classify_messages() {
        assert_eq!(
            ErrorClassifier::classify("Rate limit reached for gpt-4", "openai").category,
            ErrorCategory::RateLimit
        );
        assert_eq!(
            ErrorClassifier::classify("Incorrect API key provided", "openai").category,
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorClassifier::classify("Connection reset by peer", "openai").category,
            ErrorCategory::Network
        );
        assert_eq!(
            ErrorClassifier::classify("Something weird happened", "openai").category,
            ErrorCategory::Unknown
        );
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::with_provider(ErrorCategory::RateLimit, "Too many requests", "openai");
        assert_eq!(err.to_string(), "[openai:RATE_LIMIT] Too many requests");

        let err_no_provider = LlmError::new(ErrorCategory::Network, "Connection failed");
        assert_eq!(err_no_provider.to_string(), "[NETWORK] Connection failed");
    }

    #[test]
    fn test_incomplete_input_lists_fields() {
        let err = ForgeError::IncompleteInput {
            missing: vec!["Core problem".into(), "Affected parties".into()],
        };
        assert_eq!(
            err.to_string(),
            "Please fill in all required fields: Core problem, Affected parties"
        );
    }

    #[test]
    fn test_exhausted_message() {
        let err = ForgeError::RetriesExhausted {
            attempts: 3,
            last: LlmError::new(ErrorCategory::RateLimit, "429"),
        };
        assert_eq!(
            err.to_string(),
            "Rate limit exceeded after 3 attempts. Please try again later."
        );
    }
}
