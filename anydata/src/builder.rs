//! Fluent, depth-bounded construction of whole object graphs.

use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use tracing::debug;

use crate::anonymous::Anonymous;
use crate::classify::TypeKind;
use crate::config::AnyConfig;
use crate::context::{Context, Fill, Request};
use crate::error::{AnyError, Result};
use crate::exclusion::{ExclusionMapping, ExclusionPath, ExclusionSet, Operation};
use crate::generator::Any;
use crate::rng::RandomSource;
use crate::unique::UniquePool;

/// Builder for anonymous instances of `T`.
///
/// ```ignore
/// let customer = Builder::<Customer>::new()
///     .depth(1)
///     .exclude(["id", "orders.total"])
///     .build()?;
/// ```
pub struct Builder<'p, T> {
    any: Any,
    config: Option<AnyConfig>,
    mapping: Option<Arc<dyn ExclusionMapping>>,
    operation: Operation,
    exclusions: Option<Vec<String>>,
    depth: usize,
    random_values: bool,
    pool: Option<&'p mut UniquePool>,
    _phantom: PhantomData<fn() -> T>,
}

impl<'p, T: Anonymous> Builder<'p, T> {
    /// Create a builder with a fresh generator, depth 0 and no exclusions
    pub fn new() -> Self {
        Self {
            any: Any::new(),
            config: None,
            mapping: None,
            operation: Operation::Default,
            exclusions: None,
            depth: 0,
            random_values: true,
            pool: None,
            _phantom: PhantomData,
        }
    }

    /// Use an existing generator (its source and configuration)
    pub fn with_any(mut self, any: Any) -> Self {
        self.any = any;
        self
    }

    /// Set the random seed for reproducible graphs
    pub fn seed(mut self, seed: u64) -> Self {
        self.any.set_source(RandomSource::seeded(seed));
        self
    }

    /// Replace the generator configuration; validated when building
    pub fn config(mut self, config: AnyConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Consult `mapping` for exclusions not given explicitly
    pub fn mapping(mut self, mapping: Arc<dyn ExclusionMapping>) -> Self {
        self.mapping = Some(mapping);
        self
    }

    /// Operation whose mapping entries apply
    pub fn for_operation(mut self, operation: Operation) -> Self {
        self.operation = operation;
        self
    }

    /// Skip the given member paths. Explicit exclusions, even none at all,
    /// replace the mapping entry of the root type.
    pub fn exclude<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclusions
            .get_or_insert_with(Vec::new)
            .extend(paths.into_iter().map(|path| path.as_ref().to_string()));
        self
    }

    /// Skip one member path, typically built with [`path!`](crate::path)
    pub fn exclude_path(mut self, path: ExclusionPath) -> Self {
        self.exclusions
            .get_or_insert_with(Vec::new)
            .push(path.to_string());
        self
    }

    /// Number of levels of composite and collection members to populate
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    /// When `false`, instances are only constructed, never filled.
    /// Only composite roots can be built this way.
    pub fn random_values(mut self, random: bool) -> Self {
        self.random_values = random;
        self
    }

    /// Never repeat a wide terminal value already recorded in `pool`
    pub fn unique(mut self, pool: &'p mut UniquePool) -> Self {
        self.pool = Some(pool);
        self
    }

    fn prepare(&mut self) -> Result<Request> {
        if T::kind().is_collection() {
            return Err(AnyError::unsupported::<T>(
                "collections cannot be built directly; use build_many for the element type",
            ));
        }
        if !self.random_values && T::kind() != TypeKind::Composite {
            return Err(AnyError::unsupported::<T>(
                "random_values(false) only constructs composite types; terminal roots have nothing to construct",
            ));
        }
        if let Some(config) = self.config.take() {
            self.any.set_config(config)?;
        }

        let fill = if self.random_values {
            Fill::Deep
        } else {
            Fill::Bare
        };
        let request = Request::root(self.depth, fill);
        match &self.exclusions {
            Some(paths) => Ok(request.with_exclusions(ExclusionSet::parse_all(paths)?)),
            None => Ok(request),
        }
    }

    fn build_one(&mut self, request: &Request) -> Result<T> {
        let mut cx = Context::new(&mut self.any);
        if let Some(pool) = self.pool.as_deref_mut() {
            cx = cx.with_unique(pool);
        }
        if let Some(mapping) = &self.mapping {
            cx = cx.with_mapping(Arc::clone(mapping), self.operation);
        }
        T::instantiate(&mut cx, request)
    }

    /// Build one instance
    pub fn build(mut self) -> Result<T> {
        let request = self.prepare()?;
        debug!(
            type_name = std::any::type_name::<T>(),
            depth = self.depth,
            operation = %self.operation,
            "building"
        );
        self.build_one(&request)
    }

    /// Build one instance and let `customize` adjust it
    pub fn build_with(self, customize: impl FnOnce(&mut T)) -> Result<T> {
        let mut value = self.build()?;
        customize(&mut value);
        Ok(value)
    }

    /// Build `count` independent instances
    pub fn build_many(self, count: usize) -> Result<Vec<T>> {
        self.build_many_with(count, |_, _| {})
    }

    /// Build `count` instances; `customize` receives each one with its 1-based index
    pub fn build_many_with(
        mut self,
        count: usize,
        mut customize: impl FnMut(&mut T, usize),
    ) -> Result<Vec<T>> {
        if count < 1 {
            return Err(AnyError::invalid_argument(
                "count",
                "must build at least one instance",
            ));
        }
        let request = self.prepare()?;
        debug!(
            type_name = std::any::type_name::<T>(),
            count,
            depth = self.depth,
            "building many"
        );

        let mut items = Vec::with_capacity(count);
        for index in 1..=count {
            let mut value = self.build_one(&request)?;
            customize(&mut value, index);
            items.push(value);
        }
        Ok(items)
    }
}

impl<T: Anonymous> Default for Builder<'_, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Builder<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builder")
            .field("type", &std::any::type_name::<T>())
            .field("depth", &self.depth)
            .field("operation", &self.operation)
            .field("exclusions", &self.exclusions)
            .field("random_values", &self.random_values)
            .field("unique", &self.pool.is_some())
            .finish_non_exhaustive()
    }
}

/// Wrap a single value in a one-element list
pub trait AsList: Sized {
    fn as_list(self) -> Vec<Self> {
        vec![self]
    }
}

impl<T> AsList for T {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collections_are_rejected() {
        let err = Builder::<Vec<String>>::new().build().unwrap_err();
        assert!(matches!(err, AnyError::UnsupportedType { .. }));
    }

    #[test]
    fn test_build_many_counts_from_one() {
        let mut seen = Vec::new();
        let values = Builder::<String>::new()
            .seed(1)
            .build_many_with(3, |_, index| seen.push(index))
            .unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(seen, vec![1, 2, 3]);

        assert!(matches!(
            Builder::<String>::new().build_many(0),
            Err(AnyError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn test_invalid_config_surfaces_at_build() {
        let err = Builder::<String>::new()
            .config(AnyConfig::default().nested_collection_len(0))
            .build()
            .unwrap_err();
        assert!(matches!(err, AnyError::Config(_)));
    }

    #[test]
    fn test_invalid_exclusion_path() {
        assert!(Builder::<String>::new().exclude(["a..b"]).build().is_err());
    }

    #[test]
    fn test_terminal_roots_need_random_values() {
        let err = Builder::<String>::new()
            .random_values(false)
            .build()
            .unwrap_err();
        assert!(matches!(err, AnyError::UnsupportedType { .. }));
        assert!(Builder::<i64>::new().random_values(false).build_many(2).is_err());
    }

    #[test]
    fn test_as_list() {
        assert_eq!(5.as_list(), vec![5]);
    }
}
