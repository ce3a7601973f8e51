//! Retry policy for recommendation queries.

use std::future::Future;
use std::time::Duration;

use crate::error::Result;
use crate::models::QueryConfig;

/// How often and how patiently a failed query is retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt. Default: 2
    pub retries: u32,
    /// Delay before the first retry, doubled for each further one
    pub base_delay: Duration,
    /// Upper bound for any single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::from_config(&QueryConfig::default())
    }
}

impl RetryPolicy {
    pub fn from_config(config: &QueryConfig) -> Self {
        Self {
            retries: config.retries,
            base_delay: Duration::from_millis(config.retry_base_delay_ms),
            max_delay: Duration::from_millis(config.retry_max_delay_ms),
        }
    }

    /// Delay before retry number `attempt` (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let factor = 2u32.saturating_pow(attempt);
        self.base_delay.saturating_mul(factor).min(self.max_delay)
    }

    /// Run `op` until it succeeds, fails permanently, or retries run out.
    ///
    /// Only errors for which [`AppError::is_retryable`] holds are retried.
    ///
    /// [`AppError::is_retryable`]: crate::error::AppError::is_retryable
    pub async fn run<T, F, Fut>(&self, label: &str, mut op: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut attempt = 0;
        loop {
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() && attempt < self.retries => {
                    let delay = self.delay_for(attempt);
                    attempt += 1;
                    log::warn!(
                        "{} failed ({}), retry {}/{} in {:?}",
                        label,
                        err,
                        attempt,
                        self.retries,
                        delay
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(err) => {
                    if attempt > 0 {
                        log::error!("{} failed after {} retries: {}", label, attempt, err);
                    }
                    return Err(err);
                }
            }
        }
    }
}
