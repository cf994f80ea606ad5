//! Attempt-with-fallback helper shared by every pipeline stage
//!
//! Each stage that calls an external service runs the call through
//! [`with_fallback`]: a failure is logged once with the stage label and the
//! deterministic fallback value is returned instead. Nothing is retried.

use std::fmt::Display;
use std::future::Future;

use tracing::warn;

/// Await `attempt`; on error, log it against `stage` and return `fallback()`
pub async fn with_fallback<T, E, Fut, F>(stage: &str, attempt: Fut, fallback: F) -> T
where
    E: Display,
    Fut: Future<Output = Result<T, E>>,
    F: FnOnce() -> T,
{
    match attempt.await {
        Ok(value) => value,
        Err(e) => {
            warn!("{} failed, using fallback: {}", stage, e);
            fallback()
        }
    }
}
