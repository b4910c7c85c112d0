//! Per-worker random sources.
//!
//! Every [`Any`](crate::Any) owns one [`RandomSource`]; nothing here is shared
//! between workers. Unseeded sources draw their seed from a process-wide base
//! (taken from the wall clock once) plus a counter, so two sources created in
//! the same process never start from the same seed.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

static BASE_SEED: OnceLock<u64> = OnceLock::new();
static SEED_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Next seed for an unseeded source: coarse time base plus a monotonic counter
pub fn next_seed() -> u64 {
    let base = *BASE_SEED.get_or_init(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    });
    base.wrapping_add(SEED_COUNTER.fetch_add(1, Ordering::Relaxed))
}

/// Pseudo-random number stream owned by a single worker
pub struct RandomSource {
    inner: Box<dyn RngCore + Send>,
    seed: Option<u64>,
}

impl RandomSource {
    /// Create a source with a fresh, never reused seed
    pub fn new() -> Self {
        let seed = next_seed();
        Self {
            inner: Box::new(StdRng::seed_from_u64(seed)),
            seed: Some(seed),
        }
    }

    /// Create a deterministic source
    pub fn seeded(seed: u64) -> Self {
        Self {
            inner: Box::new(StdRng::seed_from_u64(seed)),
            seed: Some(seed),
        }
    }

    /// Wrap an arbitrary generator
    pub fn from_rng<R: RngCore + Send + 'static>(rng: R) -> Self {
        Self {
            inner: Box::new(rng),
            seed: None,
        }
    }

    /// Seed this source was created with, if it was created from one
    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Draw an integer in `[min, max)`; returns `min` when the range is empty
    pub fn next(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// Draw a double in `[0, 1)`
    pub fn next_double(&mut self) -> f64 {
        self.inner.r#gen::<f64>()
    }
}

impl Default for RandomSource {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RandomSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RandomSource")
            .field("seed", &self.seed)
            .finish_non_exhaustive()
    }
}

impl RngCore for RandomSource {
    fn next_u32(&mut self) -> u32 {
        self.inner.next_u32()
    }

    fn next_u64(&mut self) -> u64 {
        self.inner.next_u64()
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.inner.fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.inner.try_fill_bytes(dest)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::mock::StepRng;

    #[test]
    fn test_seeded_sources_repeat() {
        let mut first = RandomSource::seeded(12345);
        let mut second = RandomSource::seeded(12345);

        for _ in 0..100 {
            assert_eq!(first.next(0, 1_000_000), second.next(0, 1_000_000));
        }
        assert_eq!(first.seed(), Some(12345));
    }

    #[test]
    fn test_unseeded_sources_get_distinct_seeds() {
        let first = RandomSource::new();
        let second = RandomSource::new();
        assert_ne!(first.seed(), second.seed());
    }

    #[test]
    fn test_next_stays_in_range() {
        let mut source = RandomSource::seeded(7);
        for _ in 0..10_000 {
            let value = source.next(-5, 5);
            assert!((-5..5).contains(&value));
        }
        assert_eq!(source.next(3, 3), 3);
        assert_eq!(source.next(9, 2), 9);
    }

    #[test]
    fn test_next_double_unit_interval() {
        let mut source = RandomSource::seeded(99);
        for _ in 0..10_000 {
            let value = source.next_double();
            assert!((0.0..1.0).contains(&value));
        }
    }

    #[test]
    fn test_from_rng_uses_injected_generator() {
        let mut source = RandomSource::from_rng(StepRng::new(0, 0));
        assert_eq!(source.next_u64(), 0);
        assert_eq!(source.seed(), None);
    }
}
