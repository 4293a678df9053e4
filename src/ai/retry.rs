//! Resilient Remote Call
//!
//! Wraps a [`CompletionProvider`] with a bounded retry loop:
//!
//! 1. Send the request and classify the result as success, recoverable
//!    (rate limited) or fatal.
//! 2. On a recoverable failure with attempts left, sleep for the current
//!    delay, double it, and try again.
//! 3. A recoverable failure on the last attempt becomes
//!    [`ForgeError::RetriesExhausted`]; a fatal failure is returned at once.
//!
//! The attempt counter and the delay live on the stack of a single call and
//! are never shared between calls.

use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use super::provider::SharedProvider;
use super::request::{Completion, CompletionRequest};
use crate::config::RetryConfig;
use crate::constants::retry as retry_constants;
use crate::types::{ForgeError, LlmError, Result};

/// Attempt budget and base delay for one logical call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    max_attempts: u32,
    initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: retry_constants::DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(retry_constants::DEFAULT_INITIAL_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Create a policy; `max_attempts` counts the first try and must be at least 1
    pub fn new(max_attempts: u32, initial_delay: Duration) -> Result<Self> {
        if max_attempts == 0 {
            return Err(ForgeError::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(Self {
            max_attempts,
            initial_delay,
        })
    }

    pub fn from_config(config: &RetryConfig) -> Result<Self> {
        Self::new(
            config.max_attempts,
            Duration::from_millis(config.initial_delay_ms),
        )
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn initial_delay(&self) -> Duration {
        self.initial_delay
    }

    /// Delay slept before the `retry`-th retry (1-based): `initial * 2^(retry-1)`
    pub fn delay_before_retry(&self, retry: u32) -> Duration {
        let factor = 2u32.checked_pow(retry.saturating_sub(1));
        factor
            .and_then(|f| self.initial_delay.checked_mul(f))
            .unwrap_or(Duration::MAX)
    }
}

/// Milliseconds for log fields, saturating instead of truncating
fn whole_millis(delay: Duration) -> u64 {
    u64::try_from(delay.as_millis()).unwrap_or(u64::MAX)
}

/// Classified result of a single attempt
#[derive(Debug)]
pub enum AttemptOutcome {
    Success(Completion),
    /// Temporary over-capacity; the retry policy applies
    Recoverable(LlmError),
    /// Anything else; surfaced without retry
    Fatal(LlmError),
}

impl From<std::result::Result<Completion, LlmError>> for AttemptOutcome {
    fn from(result: std::result::Result<Completion, LlmError>) -> Self {
        match result {
            Ok(completion) => Self::Success(completion),
            Err(err) if err.is_recoverable() => Self::Recoverable(err),
            Err(err) => Self::Fatal(err),
        }
    }
}

/// What one logical call cost
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetryStats {
    /// Attempts made, first try included
    pub attempts: u32,
    /// Delays slept before each retry, in order
    pub delays: Vec<Duration>,
}

impl RetryStats {
    pub fn total_delay(&self) -> Duration {
        self.delays.iter().sum()
    }
}

/// Provider wrapped with the bounded retry policy
#[derive(Clone)]
pub struct ResilientCaller {
    provider: SharedProvider,
    policy: RetryPolicy,
}

impl ResilientCaller {
    pub fn new(provider: SharedProvider, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn provider(&self) -> &SharedProvider {
        &self.provider
    }

    /// Execute the request and return the trimmed generated text
    pub async fn call(&self, request: &CompletionRequest) -> Result<String> {
        let (completion, _stats) = self.call_with_stats(request).await?;
        Ok(completion.text)
    }

    /// Execute the request, also reporting attempts and delays
    #[instrument(
        skip(self, request),
        fields(provider = %self.provider.name(), max_attempts = self.policy.max_attempts)
    )]
    pub async fn call_with_stats(
        &self,
        request: &CompletionRequest,
    ) -> Result<(Completion, RetryStats)> {
        let mut stats = RetryStats::default();
        let mut delay = self.policy.initial_delay;

        loop {
            stats.attempts += 1;
            let attempt = stats.attempts;
            debug!(attempt, "Completion attempt");

            match AttemptOutcome::from(self.provider.complete(request).await) {
                AttemptOutcome::Success(completion) => {
                    info!(
                        attempt,
                        tokens = completion.usage.total(),
                        "Completion succeeded"
                    );
                    return Ok((completion, stats));
                }
                AttemptOutcome::Fatal(err) => {
                    warn!(attempt, category = %err.category, error = %err, "Completion failed");
                    return Err(ForgeError::Llm(err));
                }
                AttemptOutcome::Recoverable(err) => {
                    if attempt >= self.policy.max_attempts {
                        warn!(attempts = attempt, error = %err, "Retries exhausted");
                        return Err(ForgeError::RetriesExhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }

                    info!(
                        attempt,
                        wait_ms = whole_millis(delay),
                        "Rate limited, waiting before retry"
                    );
                    sleep(delay).await;
                    stats.delays.push(delay);
                    delay = delay.saturating_mul(2);
                }
            }
        }
    }
}
