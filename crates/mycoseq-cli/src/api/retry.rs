//! Retry with exponential backoff for idempotent requests

use crate::error::{CliError, Result};
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// Attempts per request, including the first
pub const MAX_RETRIES: u32 = 3;

/// Backoff before the second attempt; doubles afterwards
pub const INITIAL_BACKOFF_MS: u64 = 100;

/// Run `op` until it succeeds, fails permanently, or runs out of attempts
///
/// Only errors reported as transient by [`CliError::is_transient`] are
/// retried.
pub async fn with_retry<T, F, Fut>(what: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match op().await {
            Ok(value) => {
                if attempt > 1 {
                    debug!(request = what, attempt = attempt, "Request succeeded after retry");
                }
                return Ok(value);
            },
            Err(e) if e.is_transient() && attempt < MAX_RETRIES => {
                let backoff_ms = INITIAL_BACKOFF_MS * 2_u64.pow(attempt - 1);
                warn!(
                    request = what,
                    attempt = attempt,
                    backoff_ms = backoff_ms,
                    error = %e,
                    "Request failed, retrying..."
                );
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            },
            Err(e) => return Err(e),
        }
    }
}

/// Turn a non-success response into an error
///
/// 5xx and 429 stay `Http` errors so [`with_retry`] repeats them; other
/// statuses become `Api` errors naming the request.
pub async fn check_status(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status.is_server_error() || status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        return response.error_for_status().map_err(CliError::Http);
    }

    let body = response.text().await.unwrap_or_default();
    debug!(request = what, status = %status, body = %body, "Request rejected");

    Err(CliError::api(format!("{} failed with HTTP {}", what, status)))
}
