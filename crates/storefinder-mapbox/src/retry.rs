//! Bounded retries for Mapbox requests.
//!
//! Only transient failures are retried: connect errors and timeouts, `429`
//! and `5xx`. A bad token or a malformed body fails on the first attempt.

use std::future::Future;
use std::time::Duration;

use crate::error::MapboxError;

const MAX_DELAY: Duration = Duration::from_secs(10);

/// How many extra attempts a request gets and how long to wait between them.
///
/// The default performs a single attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_retries: u32,
    pub backoff_base: Duration,
}

impl RetryPolicy {
    #[must_use]
    pub fn new(max_retries: u32, backoff_base_ms: u64) -> Self {
        Self {
            max_retries,
            backoff_base: Duration::from_millis(backoff_base_ms),
        }
    }

    /// Un-jittered wait before retry number `retry` (1-based): the base
    /// doubled per retry, capped at ten seconds.
    fn nominal_delay(self, retry: u32) -> Duration {
        let factor = 1u32 << retry.saturating_sub(1).min(10);
        self.backoff_base.saturating_mul(factor).min(MAX_DELAY)
    }

    /// Runs `request`, retrying transient failures up to `max_retries` times.
    pub(crate) async fn run<T, F, Fut>(self, mut request: F) -> Result<T, MapboxError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, MapboxError>>,
    {
        let mut retry = 0u32;
        loop {
            let err = match request().await {
                Ok(value) => return Ok(value),
                Err(err) => err,
            };
            if retry >= self.max_retries || !is_transient(&err) {
                return Err(err);
            }
            retry += 1;

            // Jitter in [0.75, 1.25) so concurrent brand branches spread out.
            let delay = self
                .nominal_delay(retry)
                .mul_f64(0.75 + rand::random::<f64>() * 0.5);
            tracing::warn!(
                retry,
                max_retries = self.max_retries,
                delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                error = %err,
                "transient Mapbox failure, retrying"
            );
            tokio::time::sleep(delay).await;
        }
    }
}

pub(crate) fn is_transient(err: &MapboxError) -> bool {
    match err {
        MapboxError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        MapboxError::UnexpectedStatus { status, .. } => *status == 429 || *status >= 500,
        MapboxError::Deserialize { .. } | MapboxError::InvalidBaseUrl { .. } => false,
    }
}
