use std::time::Duration;

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(400);

/// Delay between ticks. Only paces the animation; the tick itself never
/// waits on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacer {
    interval: Duration,
}

impl Default for Pacer {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_INTERVAL)
    }
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn pause(&self) {
        if self.interval.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::Instant;

    use super::{Pacer, DEFAULT_TICK_INTERVAL};

    #[test]
    fn default_interval_is_four_hundred_millis() {
        assert_eq!(Pacer::default().interval(), Duration::from_millis(400));
        assert_eq!(DEFAULT_TICK_INTERVAL, Duration::from_millis(400));
    }

    #[tokio::test(start_paused = true)]
    async fn pause_waits_for_the_interval() {
        let pacer = Pacer::new(Duration::from_millis(250));
        let started = Instant::now();

        pacer.pause().await;

        assert!(started.elapsed() >= Duration::from_millis(250));
    }

    #[tokio::test(start_paused = true)]
    async fn disabled_pacer_does_not_advance_time() {
        let started = Instant::now();

        Pacer::disabled().pause().await;

        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
