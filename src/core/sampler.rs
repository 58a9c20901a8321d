//! Sources of simulated instrument latency and measurement deviation

use std::collections::VecDeque;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::core::error::BenchError;

/// Inclusive range of simulated instrument latency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelayRange {
    min: Duration,
    max: Duration,
}

impl DelayRange {
    pub const DEFAULT_MIN_MS: u64 = 100;
    pub const DEFAULT_MAX_MS: u64 = 500;

    pub fn new(min: Duration, max: Duration) -> Result<Self, BenchError> {
        if min > max {
            return Err(BenchError::configuration(format!(
                "delay minimum ({} ms) exceeds maximum ({} ms)",
                min.as_millis(),
                max.as_millis()
            )));
        }
        if u64::try_from(max.as_nanos()).is_err() {
            return Err(BenchError::configuration(format!(
                "delay maximum ({} ms) is too large",
                max.as_millis()
            )));
        }
        Ok(Self { min, max })
    }

    pub fn from_millis(min_ms: u64, max_ms: u64) -> Result<Self, BenchError> {
        Self::new(Duration::from_millis(min_ms), Duration::from_millis(max_ms))
    }

    pub fn min(&self) -> Duration {
        self.min
    }

    pub fn max(&self) -> Duration {
        self.max
    }
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_millis(Self::DEFAULT_MIN_MS),
            max: Duration::from_millis(Self::DEFAULT_MAX_MS),
        }
    }
}

/// Draws the random inputs of one simulated measurement.
///
/// Implementations are called from a single task, in batch order, before any
/// measurement starts.
pub trait Sampler {
    /// Latency for one measurement, within `range`
    fn delay(&mut self, range: &DelayRange) -> Duration;

    /// Deviation as a fraction of the allowed tolerance band, in `[-1, 1]`
    fn deviation_fraction(&mut self) -> f64;
}

/// Uniform draws from a pseudo-random generator
#[derive(Debug, Clone)]
pub struct RandomSampler<R = StdRng> {
    rng: R,
}

impl<R: Rng> RandomSampler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomSampler<StdRng> {
    /// Reproducible sampler for a given seed
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    /// Sampler seeded from the operating system
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }
}

impl<R: Rng> Sampler for RandomSampler<R> {
    fn delay(&mut self, range: &DelayRange) -> Duration {
        // DelayRange::new guarantees both bounds fit in u64 nanoseconds
        let min = u64::try_from(range.min.as_nanos()).unwrap_or(u64::MAX);
        let max = u64::try_from(range.max.as_nanos()).unwrap_or(u64::MAX);
        Duration::from_nanos(self.rng.random_range(min..=max))
    }

    fn deviation_fraction(&mut self) -> f64 {
        self.rng.random_range(-1.0..=1.0)
    }
}

/// Same delay and deviation for every component
#[derive(Debug, Clone, Copy)]
pub struct FixedSampler {
    pub delay: Duration,
    pub fraction: f64,
}

impl FixedSampler {
    pub fn new(delay: Duration, fraction: f64) -> Self {
        Self { delay, fraction }
    }
}

impl Sampler for FixedSampler {
    fn delay(&mut self, _range: &DelayRange) -> Duration {
        self.delay
    }

    fn deviation_fraction(&mut self) -> f64 {
        self.fraction
    }
}

/// Replays a scripted list of `(delay, fraction)` draws, one per component.
///
/// Once the script runs out it falls back to zero delay and zero deviation.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSampler {
    delays: VecDeque<Duration>,
    fractions: VecDeque<f64>,
}

impl ScriptedSampler {
    pub fn new(draws: impl IntoIterator<Item = (Duration, f64)>) -> Self {
        let (delays, fractions) = draws.into_iter().unzip();
        Self { delays, fractions }
    }
}

impl Sampler for ScriptedSampler {
    fn delay(&mut self, _range: &DelayRange) -> Duration {
        self.delays.pop_front().unwrap_or_default()
    }

    fn deviation_fraction(&mut self) -> f64 {
        self.fractions.pop_front().unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delay_range_validation() {
        assert!(DelayRange::from_millis(100, 500).is_ok());
        assert!(DelayRange::from_millis(250, 250).is_ok());
        assert!(DelayRange::from_millis(500, 100).is_err());
    }

    #[test]
    fn test_oversized_delay_is_rejected() {
        let err = DelayRange::from_millis(0, u64::MAX).unwrap_err();
        assert!(matches!(err, BenchError::Configuration { .. }));

        // Largest whole-millisecond maximum that still fits in u64 nanoseconds
        let limit_ms = u64::MAX / 1_000_000;
        assert!(DelayRange::from_millis(0, limit_ms).is_ok());
        assert!(DelayRange::from_millis(0, limit_ms + 1).is_err());
    }

    #[test]
    fn test_sampled_delay_respects_large_range() {
        let limit_ms = u64::MAX / 1_000_000;
        let range = DelayRange::from_millis(limit_ms - 1, limit_ms).unwrap();
        let mut sampler = RandomSampler::seeded(5);

        for _ in 0..100 {
            let delay = sampler.delay(&range);
            assert!(delay >= range.min() && delay <= range.max());
        }
    }

    #[test]
    fn test_default_delay_range() {
        let range = DelayRange::default();
        assert_eq!(range.min(), Duration::from_millis(100));
        assert_eq!(range.max(), Duration::from_millis(500));
    }

    #[test]
    fn test_random_sampler_stays_in_bounds() {
        let range = DelayRange::default();
        let mut sampler = RandomSampler::seeded(7);

        for _ in 0..1000 {
            let delay = sampler.delay(&range);
            assert!(delay >= range.min() && delay <= range.max());

            let fraction = sampler.deviation_fraction();
            assert!((-1.0..=1.0).contains(&fraction));
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let range = DelayRange::default();
        let mut a = RandomSampler::seeded(42);
        let mut b = RandomSampler::seeded(42);

        for _ in 0..20 {
            assert_eq!(a.delay(&range), b.delay(&range));
            assert_eq!(a.deviation_fraction(), b.deviation_fraction());
        }
    }

    #[test]
    fn test_zero_width_range() {
        let range = DelayRange::from_millis(0, 0).unwrap();
        let mut sampler = RandomSampler::seeded(1);
        assert_eq!(sampler.delay(&range), Duration::ZERO);
    }

    #[test]
    fn test_scripted_sampler_replays_then_defaults() {
        let range = DelayRange::default();
        let mut sampler = ScriptedSampler::new([(Duration::from_millis(30), 0.5)]);

        assert_eq!(sampler.delay(&range), Duration::from_millis(30));
        assert_eq!(sampler.deviation_fraction(), 0.5);
        assert_eq!(sampler.delay(&range), Duration::ZERO);
        assert_eq!(sampler.deviation_fraction(), 0.0);
    }
}
