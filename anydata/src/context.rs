//! Per-call generation state: the request describing one member and the
//! context carrying the generator, uniqueness pool and exclusion mapping.

use std::sync::Arc;

use tracing::trace;

use crate::config::AnyConfig;
use crate::error::Result;
use crate::exclusion::{ExclusionMapping, ExclusionSet, Operation, TargetType};
use crate::generator::Any;
use crate::unique::{Tracked, UniquePool};

/// How far a composite is populated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Fill {
    /// Builder semantics: recursive, depth bounded, exclusions honoured
    Deep,
    /// `Any::of` semantics: one element per container, no exclusions
    Shallow,
    /// Construct only, leave every member at its default
    Bare,
}

/// Generation request for one member in one recursion frame
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    /// Member name hint; empty for roots and collection elements
    pub member: &'static str,
    /// Remaining hierarchy depth
    pub depth: usize,
    /// Active exclusions; `None` means "resolve from the mapping"
    pub exclusions: Option<ExclusionSet>,
    pub fill: Fill,
}

impl Request {
    pub fn root(depth: usize, fill: Fill) -> Self {
        Self {
            member: "",
            depth,
            exclusions: None,
            fill,
        }
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = Some(exclusions);
        self
    }

    /// Same frame, naming `member`
    pub fn member(&self, member: &'static str) -> Self {
        Self {
            member,
            ..self.clone()
        }
    }

    /// Child frame one level down, with exclusions re-scoped to the current member
    pub fn descend(&self) -> Self {
        let exclusions = self
            .exclusions
            .as_ref()
            .map(|set| set.descend(self.member))
            .filter(|set| !set.is_empty());
        Self {
            member: "",
            depth: self.depth.saturating_sub(1),
            exclusions,
            fill: self.fill,
        }
    }

    pub fn excludes(&self, member: &str) -> bool {
        self.exclusions
            .as_ref()
            .is_some_and(|set| set.excludes(member))
    }
}

/// Mutable state threaded through one generation call
pub struct Context<'a> {
    any: &'a mut Any,
    unique: Option<&'a mut UniquePool>,
    mapping: Option<(Arc<dyn ExclusionMapping>, Operation)>,
}

impl<'a> Context<'a> {
    pub fn new(any: &'a mut Any) -> Self {
        Self {
            any,
            unique: None,
            mapping: None,
        }
    }

    /// Track every wide terminal value in `pool`
    pub fn with_unique(mut self, pool: &'a mut UniquePool) -> Self {
        self.unique = Some(pool);
        self
    }

    pub fn with_mapping(mut self, mapping: Arc<dyn ExclusionMapping>, operation: Operation) -> Self {
        self.mapping = Some((mapping, operation));
        self
    }

    pub fn any(&mut self) -> &mut Any {
        &mut *self.any
    }

    pub fn config(&self) -> &AnyConfig {
        self.any.config()
    }

    pub fn is_unique(&self) -> bool {
        self.unique.is_some()
    }

    /// Run `draw`, redrawing until the value is new to the pool when one is attached
    pub fn draw<T: Tracked>(&mut self, mut draw: impl FnMut(&mut Any) -> Result<T>) -> Result<T> {
        match self.unique.as_deref_mut() {
            Some(pool) => self.any.redraw(draw, |value| !pool.reserve(value)),
            None => draw(&mut *self.any),
        }
    }

    /// Exclusions the mapping declares for `T`, empty without a mapping
    pub fn resolve_exclusions<T: 'static>(&self) -> Result<ExclusionSet> {
        let Some((mapping, operation)) = &self.mapping else {
            return Ok(ExclusionSet::new());
        };
        let target = TargetType::of::<T>();
        let paths = mapping.exclusions_for(*operation, target);
        trace!(
            type_name = target.name,
            operation = %operation,
            count = paths.len(),
            "resolved mapped exclusions"
        );
        ExclusionSet::parse_all(paths)
    }
}
