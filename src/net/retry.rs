//! Retry loop for auth requests.

#[cfg(test)]
#[path = "retry_test.rs"]
mod retry_test;

use std::future::Future;

use crate::config::RetryPolicy;
use crate::error::AuthError;

/// Run `op` until it succeeds, fails with a non-retryable error, or the policy
/// runs out of attempts. Returns the last error.
///
/// # Errors
///
/// Returns the error of the final attempt.
pub async fn with_retry<T, F, Fut>(policy: RetryPolicy, mut op: F) -> Result<T, AuthError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AuthError>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts() && e.is_retryable() => {
                leptos::logging::warn!("auth request attempt {attempt} failed, retrying: {e}");
                attempt += 1;
                sleep_ms(policy.delay_ms).await;
            }
            Err(e) => return Err(e),
        }
    }
}

async fn sleep_ms(ms: u32) {
    #[cfg(feature = "hydrate")]
    {
        if ms > 0 {
            gloo_timers::future::sleep(std::time::Duration::from_millis(u64::from(ms))).await;
        }
    }
    #[cfg(not(feature = "hydrate"))]
    {
        let _ = ms;
    }
}
