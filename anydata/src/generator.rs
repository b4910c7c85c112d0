//! The [`Any`] generator handle.

use tracing::{debug, trace};

use crate::anonymous::{Anonymous, Enumeration};
use crate::config::{AnyConfig, ConfigError};
use crate::context::{Context, Fill, Request};
use crate::error::{AnyError, Result};
use crate::rng::RandomSource;
use crate::unique::{Unique, UniquePool};

use rand::Rng;

/// Anonymous value generator.
///
/// Each handle owns its random source and configuration, so handles can be
/// moved to worker threads freely. Primitive generators live in
/// [`primitives`](crate::primitives) and [`temporal`](crate::temporal).
#[derive(Debug, Default)]
pub struct Any {
    source: RandomSource,
    config: AnyConfig,
}

impl Any {
    /// Create a generator with a fresh random source
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a deterministic generator
    pub fn seeded(seed: u64) -> Self {
        Self::with_source(RandomSource::seeded(seed))
    }

    pub fn with_source(source: RandomSource) -> Self {
        Self {
            source,
            config: AnyConfig::default(),
        }
    }

    /// Replace the configuration after validating it
    pub fn with_config(mut self, config: AnyConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(self)
    }

    pub fn config(&self) -> &AnyConfig {
        &self.config
    }

    pub fn source(&mut self) -> &mut RandomSource {
        &mut self.source
    }

    pub(crate) fn set_config(&mut self, config: AnyConfig) -> Result<(), ConfigError> {
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub(crate) fn set_source(&mut self, source: RandomSource) {
        self.source = source;
    }

    /// Draw until `reject` accepts a value, at most `retry_limit` times
    pub(crate) fn redraw<T>(
        &mut self,
        mut draw: impl FnMut(&mut Any) -> Result<T>,
        mut reject: impl FnMut(&T) -> bool,
    ) -> Result<T> {
        let limit = self.config.retry_limit;
        for attempt in 1..=limit {
            let value = draw(&mut *self)?;
            if !reject(&value) {
                return Ok(value);
            }
            trace!(attempt, type_name = std::any::type_name::<T>(), "redrawing");
        }
        debug!(
            attempts = limit,
            type_name = std::any::type_name::<T>(),
            "retry limit reached"
        );
        Err(AnyError::exhausted::<T>(limit))
    }

    /// Uniformly pick one of `items`, or `T::default()` when there are none
    pub fn pick<T: Clone + Default>(&mut self, items: &[T]) -> T {
        if items.is_empty() {
            return T::default();
        }
        let index = self.source.gen_range(0..items.len());
        items[index].clone()
    }

    /// Uniformly pick one declared variant of `E`
    pub fn pick_enum<E: Enumeration>(&mut self) -> Result<E> {
        let mut variants = E::variants();
        if variants.is_empty() {
            return Err(AnyError::unsupported::<E>("enumeration declares no variants"));
        }
        let index = self.source.gen_range(0..variants.len());
        Ok(variants.swap_remove(index))
    }

    /// A single anonymous value of `T`
    pub fn value<T: Anonymous>(&mut self) -> Result<T> {
        let request = Request::root(0, Fill::Shallow);
        T::instantiate(&mut Context::new(self), &request)
    }

    /// An anonymous value of `T` not contained in `exclusions`
    pub fn except<T: Anonymous + PartialEq>(&mut self, exclusions: &[T]) -> Result<T> {
        self.redraw(|any| any.value::<T>(), |value| exclusions.contains(value))
    }

    /// Collect `count` values produced by `generate`
    pub fn list<T>(&mut self, count: usize, mut generate: impl FnMut(&mut Any) -> T) -> Vec<T> {
        (0..count).map(|_| generate(&mut *self)).collect()
    }

    /// Instance of `T` with every visible member filled one level deep.
    ///
    /// Containers get exactly one element (or key/value pair); nested
    /// composites only get their terminal members. No exclusions apply.
    pub fn of<T: Anonymous + Default>(&mut self) -> Result<T> {
        let request = Request::root(1, Fill::Shallow);
        let mut cx = Context::new(self);
        if T::kind().is_collection() {
            return Ok(T::generate(&mut cx, &request)?.unwrap_or_default());
        }
        T::instantiate(&mut cx, &request)
    }

    /// Generators whose results never repeat within `pool`
    pub fn unique<'a>(&'a mut self, pool: &'a mut UniquePool) -> Unique<'a> {
        Unique::new(Context::new(self).with_unique(pool))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Shade {
        Light,
        Dark,
        Unknown,
    }

    impl Enumeration for Shade {
        fn variants() -> Vec<Self> {
            vec![Shade::Light, Shade::Dark, Shade::Unknown]
        }
    }

    #[test]
    fn test_with_config_validates() {
        let err = Any::new()
            .with_config(AnyConfig::default().retry_limit(0))
            .unwrap_err();
        assert_eq!(err, ConfigError::InvalidRetryLimit(0));
    }

    #[test]
    fn test_pick() {
        let mut any = Any::seeded(1);
        let items = ["a", "b", "c"];
        for _ in 0..100 {
            assert!(items.contains(&any.pick(&items)));
        }
        let empty: [u32; 0] = [];
        assert_eq!(any.pick(&empty), 0);
    }

    #[test]
    fn test_pick_enum_reaches_every_variant() {
        let mut any = Any::seeded(2);
        let mut seen = Vec::new();
        for _ in 0..200 {
            let shade = any.pick_enum::<Shade>().unwrap();
            if !seen.contains(&shade) {
                seen.push(shade);
            }
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_except() {
        let mut any = Any::seeded(3);
        for _ in 0..100 {
            let value = any.except(&[true]).unwrap();
            assert!(!value);
        }
    }

    #[test]
    fn test_except_exhausts() {
        let mut any = Any::seeded(4)
            .with_config(AnyConfig::default().retry_limit(50))
            .unwrap();
        let err = any.except(&[true, false]).unwrap_err();
        assert_eq!(err, AnyError::exhausted::<bool>(50));
    }

    #[test]
    fn test_list() {
        let mut any = Any::seeded(5);
        let values = any.list(7, |any| any.int());
        assert_eq!(values.len(), 7);
    }

    #[test]
    fn test_seeded_generators_repeat() {
        let mut first = Any::seeded(42);
        let mut second = Any::seeded(42);
        assert_eq!(first.string(), second.string());
        assert_eq!(first.guid(), second.guid());
    }
}
