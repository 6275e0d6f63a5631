//! Bounded backoff-and-retry around a single page request.
//!
//! Only HTTP 429 is retried. The wait is the server's `Retry-After` when sent,
//! otherwise a fixed delay plus up to 50% random jitter, capped at `max_delay`.

use crate::config::Config;
use crate::error::ShopError;
use crate::shopify::client::CatalogSource;
use crate::shopify::models::Page;
use std::time::Duration;
use tracing::warn;

/// Retry budget for rate-limited page requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Wait used when the server gives no `Retry-After`
    pub fallback_delay: Duration,
    /// Upper bound on any single wait
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            fallback_delay: Duration::from_secs(2),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Builds the policy from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_retries: config.max_retries,
            fallback_delay: Duration::from_millis(config.retry_delay_ms),
            ..Self::default()
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self { max_retries: 0, ..Self::default() }
    }

    /// Returns how long to wait before the next attempt.
    pub fn delay_for(&self, retry_after: Option<Duration>) -> Duration {
        let delay = match retry_after {
            Some(advised) => advised,
            None => self.fallback_delay + self.jitter(),
        };
        delay.min(self.max_delay)
    }

    fn jitter(&self) -> Duration {
        let half_ms = (self.fallback_delay.as_millis() / 2) as u64;
        if half_ms == 0 {
            return Duration::ZERO;
        }
        Duration::from_millis(rand::random_range(0..=half_ms))
    }
}

/// Fetches one page, retrying the same request on [`ShopError::RateLimited`].
///
/// Any other error is returned on the first occurrence. Once the budget is spent
/// the last rate-limit error is returned.
pub async fn fetch_page_with_retry<S>(
    source: &S,
    cursor: Option<&str>,
    limit: u32,
    policy: &RetryPolicy,
) -> Result<Page, ShopError>
where
    S: CatalogSource + ?Sized,
{
    let mut retries = 0;

    loop {
        match source.fetch_page(cursor, limit).await {
            Err(ShopError::RateLimited { retry_after }) if retries < policy.max_retries => {
                retries += 1;
                let delay = policy.delay_for(retry_after);
                warn!(
                    "Rate limited; retry {}/{} in {}ms",
                    retries,
                    policy.max_retries,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }
            result => return result,
        }
    }
}
