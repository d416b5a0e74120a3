use std::time::Duration;

#[derive(Clone)]
pub struct RetryConfig {
    pub max_attempts: usize,
    pub base_backoff: Duration,
    pub max_backoff: Duration,
    pub jitter_max: Option<Duration>,
}

impl RetryConfig {
    /// Single retry with backoff for the idempotent distance oracle call.
    /// Scoring mutations are never retried.
    pub fn oracle() -> Self {
        Self {
            max_attempts: 2,
            base_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_millis(500),
            jitter_max: Some(Duration::from_millis(50)),
        }
    }

    fn backoff_for(&self, attempt: usize) -> Duration {
        let exponential = self
            .base_backoff
            .saturating_mul(1u32 << attempt.min(16) as u32);
        let capped = std::cmp::min(exponential, self.max_backoff);
        match self.jitter_max {
            Some(jitter_max) if !jitter_max.is_zero() => {
                let jitter_ms = jitter_max.as_millis() as u64;
                capped + Duration::from_millis(rand::random::<u64>() % (jitter_ms + 1))
            }
            _ => capped,
        }
    }
}

/// Runs `f` until it succeeds or the attempt budget is spent, sleeping an
/// exponentially growing, jittered backoff between attempts. The last error
/// is returned as-is.
pub async fn retry_async_with_config<F, Fut, T, E>(config: RetryConfig, mut f: F) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, E>>,
{
    let mut attempt = 0;
    loop {
        match f().await {
            Ok(value) => return Ok(value),
            Err(e) => {
                attempt += 1;
                if attempt >= config.max_attempts {
                    return Err(e);
                }
                tokio::time::sleep(config.backoff_for(attempt - 1)).await;
            }
        }
    }
}
