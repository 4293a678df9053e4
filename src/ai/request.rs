//! Completion Request
//!
//! An immutable instruction payload: one system message, one user message and
//! optional sampling bounds. The same value is re-sent on every attempt of a
//! logical call.

use serde::Serialize;

/// Immutable chat-completion request
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    system: String,
    user: String,
    max_tokens: Option<u32>,
    temperature: Option<f32>,
}

impl CompletionRequest {
    pub fn new(system: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            max_tokens: None,
            temperature: None,
        }
    }

    /// Bound the size of the generated response
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub fn temperature(&self) -> Option<f32> {
        self.temperature
    }
}

/// Token usage reported by the endpoint
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TokenUsage {
    pub input_tokens: u32,
    pub output_tokens: u32,
}

impl TokenUsage {
    pub fn total(&self) -> u32 {
        self.input_tokens.saturating_add(self.output_tokens)
    }
}

/// Generated text returned by a provider
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    /// Generated text, surrounding whitespace trimmed
    pub text: String,
    pub model: String,
    pub usage: TokenUsage,
}

impl Completion {
    /// Build a completion, trimming the generated text
    pub fn new(text: &str, model: impl Into<String>, usage: TokenUsage) -> Self {
        Self {
            text: text.trim().to_string(),
            model: model.into(),
            usage,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_total_saturates() {
        let usage = TokenUsage {
            input_tokens: u32::MAX,
            output_tokens: 10,
        };
        assert_eq!(usage.total(), u32::MAX);
    }

    #[test]
    fn test_request_builders() {
        let request = CompletionRequest::new("sys", "user")
            .with_max_tokens(500)
            .with_temperature(0.7);

        assert_eq!(request.system(), "sys");
        assert_eq!(request.user(), "user");
        assert_eq!(request.max_tokens(), Some(500));
        assert_eq!(request.temperature(), Some(0.7));
    }

    #[test]
    fn test_request_defaults_have_no_bounds() {
        let request = CompletionRequest::new("sys", "user");
        assert_eq!(request.max_tokens(), None);
        assert_eq!(request.temperature(), None);
    }

    #[test]
    fn test_completion_trims_text() {
        let completion = Completion::new("\n  five ideas \n\n", "gpt-4", TokenUsage::default());
        assert_eq!(completion.text, "five ideas");
    }

    #[test]
    fn test_token_usage_total() {
        let usage = TokenUsage {
            input_tokens: 100,
            output_tokens: 50,
        };
        assert_eq!(usage.total(), 150);
    }
}
