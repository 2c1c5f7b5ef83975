//! Fixed pacing between page requests

use std::time::Duration;

/// Sleeps a constant interval between consecutive page fetches.
///
/// There is no backoff: a 429 from Strava is an error, not a signal to slow
/// down.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    delay: Duration,
    pauses: u32,
}

impl RateLimiter {
    pub fn new(delay: Duration) -> Self {
        Self { delay, pauses: 0 }
    }

    /// Wait before the next request
    pub async fn pause(&mut self) {
        self.pauses += 1;
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Number of pauses taken so far
    pub fn pauses(&self) -> u32 {
        self.pauses
    }
}
