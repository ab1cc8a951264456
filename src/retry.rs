//! Retry coordination: run a loader under a per-attempt deadline, retrying
//! with linear backoff until the budget is exhausted.

use std::time::Duration;

use crate::config::LoadConfig;
use crate::error::LoadError;
use crate::loader::Loader;

/// Run a single attempt under the per-attempt deadline.
///
/// This races the loader against a timer. The losing future is dropped, which
/// stops polling it; work the loader already handed off elsewhere (a spawned
/// task, an in-progress network request) is not forcibly cancelled.
async fn run_attempt<T, L>(loader: &L, timeout_ms: u64) -> Result<T, LoadError>
where
    L: Loader<T> + ?Sized,
{
    match tokio::time::timeout(Duration::from_millis(timeout_ms), loader.load()).await {
        Ok(Ok(resource)) => Ok(resource),
        Ok(Err(error)) => Err(LoadError::loader(error)),
        Err(_) => Err(LoadError::Timeout { timeout_ms }),
    }
}

/// Run the loader with bounded retries.
///
/// `retry_count = 3` means up to 4 total attempts. The delay after failed
/// attempt `n` is `retry_delay_ms * n`, growing linearly. Timeouts and loader
/// failures are retried identically; the error from the last attempt is
/// wrapped in [`LoadError::Exhausted`] when the budget runs out.
pub(crate) async fn load_with_retry<T, L>(
    key: &str,
    loader: &L,
    config: &LoadConfig,
) -> Result<T, LoadError>
where
    L: Loader<T> + ?Sized,
{
    let attempts = config.total_attempts();
    let mut attempt = 1;

    loop {
        match run_attempt(loader, config.timeout_ms).await {
            Ok(resource) => return Ok(resource),
            Err(error) => {
                tracing::warn!(
                    "load attempt failed: key={}, attempt={}/{}, error={}",
                    key,
                    attempt,
                    attempts,
                    error
                );

                if attempt >= attempts {
                    return Err(LoadError::Exhausted {
                        key: key.to_string(),
                        attempts,
                        last: Box::new(error),
                    });
                }
            }
        }

        if config.retry_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(
                config.retry_delay_ms * u64::from(attempt),
            ))
            .await;
        }
        attempt += 1;
    }
}
