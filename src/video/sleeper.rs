//! Delay between status polls.

use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;

/// Waits between polls and tells the time the poll timeout is measured
/// against. Swapped out in tests to avoid real delays.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the caller for `duration`.
    async fn sleep(&self, duration: Duration);

    /// Current instant on this sleeper's clock.
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_waits() {
        let start = tokio::time::Instant::now();
        TokioSleeper.sleep(Duration::from_secs(10)).await;
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_sleeper_clock_follows_paused_time() {
        let before = TokioSleeper.now();
        TokioSleeper.sleep(Duration::from_secs(25)).await;
        assert_eq!(TokioSleeper.now() - before, Duration::from_secs(25));
    }
}
