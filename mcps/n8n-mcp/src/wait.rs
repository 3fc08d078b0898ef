//! Bounded polling with multiplicative backoff
//!
//! Used wherever the platform is eventually consistent, e.g. reading an
//! execution right after triggering it.

use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, Instant};

use crate::error::{N8nError, N8nResult};

#[derive(Debug, Clone, PartialEq)]
pub struct PollPolicy {
    /// Total time budget across all attempts
    pub max_wait: Duration,
    pub initial_interval: Duration,
    pub max_interval: Duration,
    pub multiplier: f64,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            max_wait: Duration::from_secs(30),
            initial_interval: Duration::from_millis(500),
            max_interval: Duration::from_secs(5),
            multiplier: 2.0,
        }
    }
}

impl PollPolicy {
    /// Interval following `current`, capped at `max_interval`
    pub fn next_interval(&self, current: Duration) -> Duration {
        current.mul_f64(self.multiplier.max(1.0)).min(self.max_interval)
    }

    pub fn with_max_wait(mut self, max_wait: Duration) -> Self {
        self.max_wait = max_wait;
        self
    }
}

/// Call `fetch` until `ready` accepts its value
///
/// Fetch errors are returned immediately. Fails with
/// [`N8nError::Timeout`] when the next sleep would overrun `max_wait`.
pub async fn poll_until<T, F, Fut, P>(
    policy: &PollPolicy,
    what: &str,
    mut fetch: F,
    ready: P,
) -> N8nResult<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = N8nResult<T>>,
    P: Fn(&T) -> bool,
{
    let started = Instant::now();
    let mut interval = policy.initial_interval;
    let mut attempts = 0u32;

    loop {
        attempts += 1;
        let value = fetch().await?;
        if ready(&value) {
            tracing::debug!("{} ready after {} attempt(s)", what, attempts);
            return Ok(value);
        }

        let elapsed = started.elapsed();
        if elapsed + interval > policy.max_wait {
            return Err(N8nError::Timeout {
                what: what.to_string(),
                waited: elapsed,
            });
        }

        sleep(interval).await;
        interval = policy.next_interval(interval);
    }
}
