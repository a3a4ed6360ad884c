//! Best-effort store keep-alive.
//!
//! Some hosts drop idle database connections; a periodic trivial query
//! keeps the pool warm. Failures are logged and ignored, nothing depends
//! on this loop for correctness.

use std::time::{Duration, Instant};

use sqlx::mysql::MySqlPool;
use tracing::{debug, warn};

/// One store health check, returning the round-trip time.
pub async fn ping(pool: &MySqlPool) -> Result<Duration, sqlx::Error> {
    let start = Instant::now();
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(start.elapsed())
}

/// Ping the store every `interval` until the task is dropped.
pub async fn run_keepalive(pool: MySqlPool, interval: Duration) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        match ping(&pool).await {
            Ok(latency) => debug!(latency_ms = latency.as_millis() as u64, "store keep-alive ok"),
            Err(e) => warn!("store keep-alive failed: {}", e),
        }
    }
}
