//! Best-effort step helper
//!
//! Reconciliation steps are attempted exactly once per start: a failure is
//! logged with its error text and execution continues. No retry, no backoff.

use std::fmt::Display;
use std::future::Future;
use tracing::warn;

/// Run a fallible future, logging and swallowing its error.
///
/// Returns `Some(value)` on success, `None` on failure.
pub async fn attempt<T, E, F>(step: &str, fut: F) -> Option<T>
where
    E: Display,
    F: Future<Output = std::result::Result<T, E>>,
{
    match fut.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!("{} failed: {}", step, err);
            None
        }
    }
}
