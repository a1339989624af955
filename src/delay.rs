//! Artificial latency for mock replies.

use std::time::Duration;

pub const DEFAULT_MIN_DELAY_MS: u64 = 500;
pub const DEFAULT_SPREAD_MS: u64 = 5000;

/// Source of the wait applied before each mock reply.
pub trait DelayProvider: Send + Sync {
    fn next_delay(&self) -> Duration;
}

/// `min + random() * spread`, drawn fresh for every reply.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RandomDelay {
    pub min: Duration,
    pub spread: Duration,
}

impl RandomDelay {
    pub fn new(min: Duration, spread: Duration) -> Self {
        Self { min, spread }
    }

    pub fn from_millis(min_ms: u64, spread_ms: u64) -> Self {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(spread_ms))
    }
}

impl Default for RandomDelay {
    fn default() -> Self {
        Self::from_millis(DEFAULT_MIN_DELAY_MS, DEFAULT_SPREAD_MS)
    }
}

impl DelayProvider for RandomDelay {
    fn next_delay(&self) -> Duration {
        let factor: f64 = rand::random();
        self.min + self.spread.mul_f64(factor)
    }
}

/// Same delay every time. `FixedDelay::default()` is zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedDelay(pub Duration);

impl DelayProvider for FixedDelay {
    fn next_delay(&self) -> Duration {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_delay_bounds() {
        let delay = RandomDelay::default();
        for _ in 0..200 {
            let d = delay.next_delay();
            assert!(d >= Duration::from_millis(500));
            assert!(d <= Duration::from_millis(5500));
        }
    }

    #[test]
    fn test_random_delay_zero_spread() {
        let delay = RandomDelay::from_millis(250, 0);
        assert_eq!(delay.next_delay(), Duration::from_millis(250));
    }

    #[test]
    fn test_fixed_delay() {
        assert_eq!(FixedDelay::default().next_delay(), Duration::ZERO);
        assert_eq!(
            FixedDelay(Duration::from_secs(1)).next_delay(),
            Duration::from_secs(1)
        );
    }
}
