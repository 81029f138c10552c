use std::time::Duration;

use tokio::time::{sleep, Instant};

/// Spaces consecutive operations at least `interval` apart.
///
/// The first `wait()` returns immediately; each later one sleeps until `interval` has
/// passed since the previous slot. N paced calls therefore take about (N-1) x interval.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Reserve the next slot and return how long the caller must wait for it.
    pub fn reserve(&mut self) -> Duration {
        let now = Instant::now();
        let start = match self.next {
            Some(next) if next > now => next,
            _ => now,
        };
        self.next = Some(start + self.interval);
        start.saturating_duration_since(now)
    }

    pub async fn wait(&mut self) {
        let wait = self.reserve();
        if !wait.is_zero() {
            sleep(wait).await;
        }
    }
}
