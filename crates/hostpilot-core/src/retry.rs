//! Bounded retry with exponential backoff for control-plane calls.

use crate::Result;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use tracing::warn;

/// Retry policy for a single control-plane call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetryConfig {
    /// Maximum number of retries (0 = no retries, call once).
    pub max_retries: u32,

    /// Base delay for exponential backoff between retries (milliseconds).
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 2,
            backoff_base_ms: 500,
        }
    }
}

impl RetryConfig {
    /// Policy that never retries; failures propagate on the first attempt.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            backoff_base_ms: 0,
        }
    }

    /// Backoff delay before the retry following `attempt` (1-based).
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.backoff_base_ms * 2u64.pow(attempt.saturating_sub(1)))
    }
}

/// Run `call` until it succeeds or the retry budget is exhausted.
///
/// `operation` names the call for log lines. The last error is returned
/// unchanged once all attempts fail.
pub async fn with_retries<T, F, Fut>(config: &RetryConfig, operation: &str, call: F) -> Result<T>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let max_attempts = config.max_retries + 1;

    let mut attempt = 1;
    loop {
        match call().await {
            Ok(value) => return Ok(value),
            Err(err) if attempt < max_attempts => {
                let delay = config.backoff_delay(attempt);
                warn!(
                    operation,
                    attempt,
                    max_attempts,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Call failed, backing off before retry"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
