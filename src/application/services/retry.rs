use std::future::Future;
use std::time::Duration;

use rand::Rng;

/// Transient-fault retry applied at the acquisition and invocation stages.
/// Exponential backoff with a bounded jitter factor, after the original
/// throttling handling this pipeline replaces.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    /// Backoff before the retry following failure number `attempt` (1-based):
    /// `initial * 2^(attempt-1)`, scaled by a jitter factor in [0.8, 1.2).
    /// The jitter band is narrow enough that sampled delays never decrease
    /// from one attempt to the next.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        let base =
            self.initial_delay.as_secs_f64() * f64::from(2u32.saturating_pow(attempt.saturating_sub(1)));
        let jitter = 0.8 + rand::rng().random::<f64>() * 0.4;
        Duration::from_secs_f64(base * jitter)
    }

    /// Run `operation`, retrying transient faults up to `max_attempts` total
    /// attempts. Permanent faults and exhaustion return the last error.
    pub async fn run<T, E, F, Fut, P>(
        &self,
        stage: &'static str,
        is_transient: P,
        mut operation: F,
    ) -> Result<T, E>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        P: Fn(&E) -> bool,
        E: std::fmt::Display,
    {
        let mut attempt: u32 = 1;
        loop {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if is_transient(&e) && attempt < self.max_attempts => {
                    let delay = self.backoff_delay(attempt);
                    tracing::warn!(
                        stage,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient fault, backing off before retry"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
