use crate::config::RetryConfig;
use crate::error::UpstreamError;
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Capped exponential backoff: attempt `n` (0-based) waits `min(cap, base * 2^n)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Backoff {
    pub base: Duration,
    pub cap: Duration,
}

impl Backoff {
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let factor = 1u32.checked_shl(attempt).unwrap_or(u32::MAX);
        self.base.saturating_mul(factor).min(self.cap)
    }

    /// Total sleep before attempt `k` (1-based) starts.
    #[cfg(test)]
    pub fn total_before(&self, k: u32) -> Duration {
        (0..k.saturating_sub(1)).map(|i| self.delay_after(i)).sum()
    }
}

impl From<&RetryConfig> for Backoff {
    fn from(config: &RetryConfig) -> Self {
        Self {
            base: Duration::from_millis(config.base_delay_ms),
            cap: Duration::from_millis(config.max_delay_ms),
        }
    }
}

/// Errors that know whether another attempt could help
pub trait Retryable {
    fn is_retryable(&self) -> bool;
}

impl Retryable for UpstreamError {
    fn is_retryable(&self) -> bool {
        UpstreamError::is_retryable(self)
    }
}

#[derive(Debug)]
pub struct Attempted<T, E> {
    pub result: Result<T, E>,
    pub attempts: u32,
}

/// Execute an async operation up to `retries + 1` times with capped exponential backoff.
/// The operation receives the 0-based attempt index.
pub async fn retry_with_backoff<F, Fut, T, E>(
    backoff: Backoff,
    retries: u32,
    label: &str,
    mut operation: F,
) -> Attempted<T, E>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display + Retryable,
{
    let mut attempt = 0;

    loop {
        match operation(attempt).await {
            Ok(result) => {
                return Attempted {
                    result: Ok(result),
                    attempts: attempt + 1,
                }
            }
            Err(e) if attempt >= retries || !e.is_retryable() => {
                warn!("{}: giving up after {} attempt(s): {}", label, attempt + 1, e);
                return Attempted {
                    result: Err(e),
                    attempts: attempt + 1,
                };
            }
            Err(e) => {
                let delay = backoff.delay_after(attempt);
                warn!(
                    "{}: attempt {} failed: {}. Retrying in {:?}...",
                    label,
                    attempt + 1,
                    e,
                    delay
                );

                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
