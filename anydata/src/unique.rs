//! Uniqueness tracking across generated values.
//!
//! A [`UniquePool`] remembers every value it has handed out, per type. The
//! pool is never cleared implicitly; call [`UniquePool::reset`] between
//! independent scenarios.

use std::any::{Any as StdAny, TypeId};
use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::context::Context;
use crate::error::{AnyError, Result};
use crate::generator::Any;
use crate::primitives::{EmailAddress, IntSpec, StringSpec, Uri};
use crate::temporal::{DateTimeSpec, TimeSpanSpec};

/// Smallest digit count accepted for unique integers
pub const MIN_UNIQUE_DIGITS: u32 = 5;

/// Smallest explicit range accepted for unique integers
pub const MIN_UNIQUE_RANGE: i64 = 10_000;

/// Types whose values can be tracked for uniqueness
pub trait Tracked: 'static {
    /// Equality key recorded in the pool
    type Key: Eq + Hash + Send + 'static;

    fn unique_key(&self) -> Self::Key;
}

macro_rules! impl_tracked_by_value {
    ($($t:ty),*) => {
        $(
            impl Tracked for $t {
                type Key = $t;

                fn unique_key(&self) -> Self::Key {
                    self.clone()
                }
            }
        )*
    };
}

impl_tracked_by_value!(
    i16, u16, i32, u32, i64, u64, isize, usize, String, Decimal, Uuid,
    NaiveDateTime, DateTime<Utc>, TimeDelta
);

impl Tracked for f32 {
    type Key = u32;

    fn unique_key(&self) -> u32 {
        self.to_bits()
    }
}

impl Tracked for f64 {
    type Key = u64;

    fn unique_key(&self) -> u64 {
        self.to_bits()
    }
}

// Compared through their canonical text
impl Tracked for Uri {
    type Key = String;

    fn unique_key(&self) -> String {
        self.to_string()
    }
}

impl Tracked for EmailAddress {
    type Key = String;

    fn unique_key(&self) -> String {
        self.to_string().to_lowercase()
    }
}

/// Per-type record of values already handed out
#[derive(Default)]
pub struct UniquePool {
    seen: HashMap<TypeId, Box<dyn StdAny + Send>>,
}

impl UniquePool {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `value`; returns `true` when it had not been seen before
    pub fn reserve<T: Tracked>(&mut self, value: &T) -> bool {
        self.seen
            .entry(TypeId::of::<T>())
            .or_insert_with(|| Box::new(HashSet::<T::Key>::new()))
            .downcast_mut::<HashSet<T::Key>>()
            .is_some_and(|set| set.insert(value.unique_key()))
    }

    /// Record `value` and hand it back with a duplicate flag
    pub fn try_reserve<T: Tracked>(&mut self, value: T) -> (T, bool) {
        let duplicate = !self.reserve(&value);
        (value, duplicate)
    }

    /// Number of distinct values recorded for `T`
    pub fn len_of<T: Tracked>(&self) -> usize {
        self.seen
            .get(&TypeId::of::<T>())
            .and_then(|set| set.downcast_ref::<HashSet<T::Key>>())
            .map_or(0, HashSet::len)
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    /// Forget every recorded value of every type
    pub fn reset(&mut self) {
        self.seen.clear();
    }
}

impl std::fmt::Debug for UniquePool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UniquePool")
            .field("types", &self.seen.len())
            .finish()
    }
}

/// Generators that never repeat a value within their pool
pub struct Unique<'a> {
    cx: Context<'a>,
}

impl<'a> Unique<'a> {
    pub(crate) fn new(cx: Context<'a>) -> Self {
        Self { cx }
    }

    /// Draw with an arbitrary generator, redrawing duplicates
    pub fn draw<T: Tracked>(&mut self, draw: impl FnMut(&mut Any) -> Result<T>) -> Result<T> {
        self.cx.draw(draw)
    }

    pub fn int(&mut self) -> Result<i32> {
        self.draw(|any| Ok(any.int()))
    }

    /// Unique integer; needs at least 5 digits and a domain of 10 000 values
    pub fn int_with(&mut self, spec: &IntSpec) -> Result<i32> {
        if spec.max_digits < MIN_UNIQUE_DIGITS {
            return Err(AnyError::invalid_argument(
                "max_digits",
                format!(
                    "unique integers need at least {} digits, got {}",
                    MIN_UNIQUE_DIGITS, spec.max_digits
                ),
            ));
        }
        let (low, high, allow_zero) = self.cx.any().int_domain(spec)?;
        let excluded_zero = !allow_zero && (low..high).contains(&0);
        let size = high - low - i64::from(excluded_zero);
        if size < MIN_UNIQUE_RANGE {
            return Err(AnyError::invalid_argument(
                "max",
                format!(
                    "unique integers need at least {} distinct values, [{}, {}) holds {}",
                    MIN_UNIQUE_RANGE, low, high, size
                ),
            ));
        }
        self.draw(|any| any.int_with(spec))
    }

    pub fn long(&mut self) -> Result<i64> {
        self.draw(|any| Ok(any.long()))
    }

    pub fn double(&mut self) -> Result<f64> {
        self.draw(|any| Ok(any.double()))
    }

    pub fn decimal(&mut self) -> Result<Decimal> {
        self.draw(|any| Ok(any.decimal()))
    }

    pub fn string(&mut self) -> Result<String> {
        self.draw(|any| Ok(any.string()))
    }

    pub fn string_with(&mut self, spec: &StringSpec) -> Result<String> {
        self.draw(|any| any.string_with(spec))
    }

    pub fn guid(&mut self) -> Result<Uuid> {
        self.draw(|any| Ok(any.guid()))
    }

    pub fn email(&mut self) -> Result<EmailAddress> {
        self.draw(|any| Ok(any.email_address()))
    }

    pub fn uri(&mut self) -> Result<Uri> {
        self.draw(|any| Ok(any.uri()))
    }

    pub fn date_time(&mut self) -> Result<NaiveDateTime> {
        self.draw(|any| any.date_time())
    }

    pub fn date_time_with(&mut self, spec: &DateTimeSpec) -> Result<NaiveDateTime> {
        self.draw(|any| any.date_time_with(spec))
    }

    pub fn time_span(&mut self) -> Result<TimeDelta> {
        self.draw(|any| any.time_span())
    }

    pub fn time_span_with(&mut self, spec: &TimeSpanSpec) -> Result<TimeDelta> {
        self.draw(|any| any.time_span_with(spec))
    }
}
