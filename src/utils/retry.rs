//! Bounded retry around fallible storage calls.
//!
//! The connection pool re-establishes dropped connections on the next
//! checkout, so "reconnect and try again" is simply calling the operation
//! again after a short pause.

use std::future::Future;
use std::time::Duration;

use tracing::warn;

use crate::utils::errors::LedgerError;

/// Default attempt budget for storage operations.
pub const RETRY_ATTEMPTS: u32 = 3;

const BASE_DELAY: Duration = Duration::from_millis(200);

/// Run `op` up to `attempts` times, sleeping with doubling backoff between
/// tries. Only transient connectivity errors are retried; anything else is
/// surfaced immediately. When the budget is exhausted the last transient
/// error comes back as `StorageUnavailable`. A budget of zero is treated
/// as one attempt, so the operation always runs.
pub async fn with_retries<T, F, Fut>(
    op_name: &str,
    attempts: u32,
    mut op: F,
) -> Result<T, LedgerError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let attempts = attempts.max(1);
    let mut delay = BASE_DELAY;
    let mut last_error = None;

    for attempt in 1..=attempts {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if is_transient(&e) => {
                warn!(
                    operation = op_name,
                    attempt,
                    attempts,
                    error = %e,
                    "transient storage failure, retrying"
                );
                last_error = Some(e);
                if attempt < attempts {
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                }
            }
            Err(e) => return Err(LedgerError::Storage(e)),
        }
    }

    Err(LedgerError::StorageUnavailable {
        attempts,
        // Loop ran at least once, so a transient error was recorded.
        source: last_error.expect("retry loop exited without an error"),
    })
}

fn is_transient(error: &sqlx::Error) -> bool {
    matches!(
        error,
        sqlx::Error::Io(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Tls(_)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn io_error() -> sqlx::Error {
        sqlx::Error::Io(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        ))
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let calls = AtomicU32::new(0);
        let result = with_retries("test", 3, || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n < 2 {
                    Err(io_error())
                } else {
                    Ok(7_i64)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 7);
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn gives_up_after_attempt_budget() {
        let calls = AtomicU32::new(0);
        let result: Result<i64, _> = with_retries("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(io_error()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert!(matches!(
            result,
            Err(LedgerError::StorageUnavailable { attempts: 3, .. })
        ));
    }

    #[tokio::test]
    async fn zero_attempt_budget_still_runs_once() {
        let calls = AtomicU32::new(0);
        let result: Result<i64, _> = with_retries("test", 0, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(io_error()) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(
            result,
            Err(LedgerError::StorageUnavailable { attempts: 1, .. })
        ));
    }

    #[tokio::test]
    async fn non_transient_errors_are_not_retried() {
        let calls = AtomicU32::new(0);
        let result: Result<i64, _> = with_retries("test", 3, || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err(sqlx::Error::RowNotFound) }
        })
        .await;

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(result, Err(LedgerError::Storage(_))));
    }
}
