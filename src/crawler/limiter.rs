//! Process-wide request gate
//!
//! Every outbound HTTP call (robots.txt, pages, search) runs through one
//! [`RateLimiter`]. It allows a single call in flight and keeps a minimum
//! spacing between call starts derived from the requests-per-minute budget.

use std::future::Future;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Serializes operations and spaces their starts
///
/// Waiting callers are served in FIFO order, since `tokio::sync::Mutex` is fair.
#[derive(Debug)]
pub struct RateLimiter {
    spacing: Duration,

    /// Start time of the most recent operation; holding the guard means owning the gate
    last_start: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Creates a limiter for the given requests-per-minute budget
    ///
    /// A budget of zero is treated as one request per minute.
    pub fn new(requests_per_minute: u32) -> Self {
        Self::with_spacing(spacing_for_rpm(requests_per_minute))
    }

    /// Creates a limiter with an explicit minimum spacing
    pub fn with_spacing(spacing: Duration) -> Self {
        Self {
            spacing,
            last_start: Mutex::new(None),
        }
    }

    /// Runs `operation` once the gate is free and the spacing has elapsed
    ///
    /// The gate stays held until the operation's future completes, so no two
    /// scheduled operations ever overlap. Whatever the operation returns,
    /// including errors, is handed back unchanged.
    pub async fn schedule<F, Fut, T>(&self, operation: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        let mut last_start = self.last_start.lock().await;

        if let Some(previous) = *last_start {
            let ready_at = previous + self.spacing;
            let now = Instant::now();
            if ready_at > now {
                tracing::trace!("Rate limiter waiting {:?}", ready_at - now);
                tokio::time::sleep_until(ready_at).await;
            }
        }

        *last_start = Some(Instant::now());
        operation().await
    }
}

/// Spacing in milliseconds: ceil(60000 / rpm)
pub fn spacing_for_rpm(requests_per_minute: u32) -> Duration {
    let rpm = u64::from(requests_per_minute.max(1));
    Duration::from_millis(60_000u64.div_ceil(rpm))
}
