use std::sync::Arc;
use tokio::time::{Duration, interval};

use crate::metrics::RATE_LIMIT_ENTRIES;
use crate::rate_limit::RateLimiter;

// Drops expired entries on a timer so abandoned identifiers don't pile up
pub async fn sweeper(limiter: Arc<RateLimiter>, sweep_interval: Duration) {
    let mut interval = interval(sweep_interval);

    tracing::info!(interval = ?sweep_interval, "Rate limit sweeper started");

    loop {
        interval.tick().await;

        let removed = limiter.sweep_expired();
        RATE_LIMIT_ENTRIES.set(limiter.entry_count() as f64);

        if removed > 0 {
            tracing::debug!(removed, remaining = limiter.entry_count(), "Swept expired rate limit entries");
        }
    }
}
