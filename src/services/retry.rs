// src/services/retry.rs

use std::future::Future;

use crate::{config::RetryConfig, error::AppError};

/// Runs a store write, re-running it while the store reports `AppError::Conflict`.
///
/// Any other error, or a conflict on the last allowed try, is returned as is.
/// The pause grows linearly with the try number.
pub async fn retry_on_conflict<T, F, Fut>(
    retry: RetryConfig,
    operation: &str,
    mut write: F,
) -> Result<T, AppError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, AppError>>,
{
    let max_attempts = retry.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match write().await {
            Err(err) if err.is_conflict() && attempt < max_attempts => {
                tracing::warn!(
                    "{} hit a write conflict (try {}/{}): {}",
                    operation,
                    attempt,
                    max_attempts,
                    err
                );
                tokio::time::sleep(retry.backoff * attempt).await;
                attempt += 1;
            }
            outcome => return outcome,
        }
    }
}
