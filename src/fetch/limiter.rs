// src/fetch/limiter.rs
// =============================================================================
// Polite request spacing.
//
// The API asks clients to go slowly, so every request goes through one
// `RateLimiter`:
// 1. Wait until `min_interval` has passed since the last request FINISHED
// 2. Run exactly one request
// 3. Stamp the finish time (success or failure) for the next caller
//
// The lock is held for the whole request, so two requests never overlap even
// when several tasks share the limiter through an Arc.
// =============================================================================

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::debug;

pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(2000);

#[derive(Debug)]
pub struct RateLimiter {
    // Stored as milliseconds so it can change while requests are queued
    min_interval_ms: AtomicU64,
    // When the previous request completed (None before the first one)
    last_completion: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval_ms: AtomicU64::new(min_interval.as_millis() as u64),
            last_completion: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms.load(Ordering::Relaxed))
    }

    /// Changes the spacing. Takes effect from the next admitted request.
    pub fn set_min_interval(&self, interval: Duration) {
        self.min_interval_ms
            .store(interval.as_millis() as u64, Ordering::Relaxed);
    }

    // Runs `request` once it is this caller's turn
    //
    // wait = max(0, last_completion + min_interval - now)
    //
    // Returns whatever the request returns; the limiter does not look at it.
    pub async fn admit<F, T>(&self, request: F) -> T
    where
        F: Future<Output = T>,
    {
        let mut last = self.last_completion.lock().await;

        if let Some(finished) = *last {
            let ready_at = finished + self.min_interval();
            let wait = ready_at.saturating_duration_since(Instant::now());
            if !wait.is_zero() {
                debug!(wait_ms = wait.as_millis() as u64, "rate limit: waiting");
                tokio::time::sleep(wait).await;
            }
        }

        let output = request.await;
        *last = Some(Instant::now());
        output
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MIN_INTERVAL)
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why tokio::sync::Mutex and not std::sync::Mutex?
//    - We hold the lock across `.await` (the sleep and the request)
//    - A std MutexGuard held across an await can deadlock: another task on
//      the same thread blocks in lock() and the holder never gets to run
//    - tokio's Mutex yields to other tasks while waiting for the lock
//
// 2. Why AtomicU64 for the interval?
//    - The interval can change while another task holds the lock
//    - An atomic can be read and written without taking the lock
//
// 3. What is saturating_duration_since?
//    - Like `a - b` for Instants, but returns zero instead of panicking
//      when b is later than a (the gap has already passed)
// -----------------------------------------------------------------------------
