//! Async utilities and patterns
//!
//! Timeouts and bounded fan-out used by the research pipeline

use crate::error::{DeepmailError, DeepmailResult, ErrorContext};
use futures::stream::{self, StreamExt};
use tokio::time::{timeout, Duration};
use tracing::{debug, warn};

/// Timeout wrapper for async operations
pub async fn with_timeout<F, T>(
    future: F,
    limit: Duration,
    operation_name: &str,
) -> DeepmailResult<T>
where
    F: std::future::Future<Output = T>,
{
    match timeout(limit, future).await {
        Ok(result) => Ok(result),
        Err(_) => {
            let duration_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
            Err(DeepmailError::Timeout {
                operation: operation_name.to_string(),
                duration_ms,
                context: ErrorContext::new("async_utils")
                    .with_operation("timeout")
                    .with_metadata("timeout_ms", &duration_ms.to_string())
                    .with_suggestion("Increase timeout duration")
                    .with_suggestion("Check network connectivity"),
            })
        }
    }
}

/// Run `processor` over every item with at most `max_concurrent` futures in flight.
///
/// Results are gathered in completion order. Items whose future fails or
/// yields `None` are dropped. `on_progress(completed, total)` is called after
/// every finished item, successful or not. The futures are polled in place,
/// so dropping the returned future cancels whatever is still running.
pub async fn collect_as_completed<T, R, F, Fut, P>(
    items: Vec<T>,
    max_concurrent: usize,
    processor: F,
    mut on_progress: P,
) -> Vec<R>
where
    F: Fn(T) -> Fut,
    Fut: std::future::Future<Output = DeepmailResult<Option<R>>>,
    P: FnMut(usize, usize),
{
    let total = items.len();
    let mut completed = 0;
    let mut results = Vec::with_capacity(total);

    let mut pending = stream::iter(items)
        .map(&processor)
        .buffer_unordered(max_concurrent.max(1));

    while let Some(outcome) = pending.next().await {
        completed += 1;
        match outcome {
            Ok(Some(result)) => results.push(result),
            Ok(None) => debug!(completed, total, "Task produced no result"),
            Err(e) => warn!(completed, total, error = %e, "Task failed, dropping result"),
        }
        on_progress(completed, total);
    }

    results
}
