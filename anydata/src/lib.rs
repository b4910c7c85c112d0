//! # anydata - anonymous test data for Rust
//!
//! anydata fills test fixtures with random values that carry no meaning of
//! their own: numbers, strings, ids, dates, whole object graphs.
//!
//! ## Quick Start
//!
//! ```rust
//! use anydata::{Any, IntSpec, StringSpec};
//!
//! let mut any = Any::seeded(7);
//!
//! let count = any.int_with(&IntSpec::digits(3)).unwrap();
//! assert!((0..999).contains(&count));
//!
//! let name = any.string_with(&StringSpec::prefixed("Name").length(20)).unwrap();
//! assert!(name.starts_with("Name"));
//! assert_eq!(name.chars().count(), 20);
//! ```
//!
//! Composite types derive [`Anonymous`] and are built with a [`Builder`]:
//!
//! ```rust,ignore
//! #[derive(Debug, Default, anydata::Anonymous)]
//! pub struct Customer {
//!     pub id: i64,
//!     pub email: String,
//!     pub address: Option<Address>,
//! }
//!
//! let customer = anydata::Builder::<Customer>::new()
//!     .depth(1)
//!     .exclude(["address.zip"])
//!     .build()?;
//! ```

extern crate self as anydata;

pub mod anonymous;
pub mod builder;
pub mod classify;
pub mod collections;
pub mod config;
pub mod context;
pub mod error;
pub mod exclusion;
pub mod generator;
pub mod graph;
pub mod primitives;
pub mod rng;
pub mod temporal;
pub mod unique;

pub use anonymous::{Anonymous, Enumeration};
pub use builder::{AsList, Builder};
pub use classify::TypeKind;
pub use config::{AnyConfig, ConfigError};
pub use context::{Context, Fill, Request};
pub use error::{AnyError, Result};
pub use exclusion::{
    ExclusionMapping, ExclusionPath, ExclusionSet, ExclusionTable, Operation, TargetType,
};
pub use generator::Any;
pub use graph::{Composite, Member};
pub use primitives::{CharSet, EmailAddress, FloatSpec, IntSpec, StringSpec, Uri};
pub use rng::RandomSource;
pub use temporal::{DateTimeSpec, TimeSpanSpec};
pub use unique::{Tracked, Unique, UniquePool};

#[cfg(feature = "derive")]
pub use anydata_derive::Anonymous;
