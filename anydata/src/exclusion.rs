//! Member exclusion: dot paths, per-frame exclusion sets and operation mappings.
//!
//! A path such as `customer.address.zip` is scoped to the root type being
//! built. Every recursion frame only looks at single-segment paths; paths
//! with more segments are handed to the child whose member name matches the
//! first segment, with that segment stripped.

use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use crate::error::{AnyError, Result};

/// Canonical lowercase dot path naming a member to skip
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExclusionPath {
    segments: Vec<String>,
}

impl ExclusionPath {
    /// Parse a dot-delimited path; empty segments are rejected
    pub fn parse(path: &str) -> Result<Self> {
        let segments = path
            .split('.')
            .map(|segment| segment.trim().to_lowercase())
            .collect::<Vec<_>>();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(AnyError::invalid_argument(
                "path",
                format!("{:?} is not a valid member path", path),
            ));
        }
        Ok(Self { segments })
    }

    #[doc(hidden)]
    pub fn __from_idents(segments: &[&str]) -> Self {
        Self {
            segments: segments
                .iter()
                .map(|segment| segment.trim_start_matches("r#").to_lowercase())
                .collect(),
        }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Whether this path targets a member of the current frame
    pub fn is_leaf(&self) -> bool {
        self.segments.len() == 1
    }
}

impl fmt::Display for ExclusionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("."))
    }
}

impl FromStr for ExclusionPath {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Build an [`ExclusionPath`] from member identifiers.
///
/// ```ignore
/// let zip = anydata::path!(address.zip_code);
/// assert_eq!(zip.to_string(), "address.zip_code");
/// ```
#[macro_export]
macro_rules! path {
    ($($segment:ident).+) => {
        $crate::ExclusionPath::__from_idents(&[$(stringify!($segment)),+])
    };
}

/// Exclusions active for one recursion frame
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    paths: Vec<ExclusionPath>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse every entry of `paths`
    pub fn parse_all<I, S>(paths: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        paths
            .into_iter()
            .map(|path| ExclusionPath::parse(path.as_ref()))
            .collect()
    }

    pub fn insert(&mut self, path: ExclusionPath) {
        if !self.paths.contains(&path) {
            self.paths.push(path);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExclusionPath> {
        self.paths.iter()
    }

    /// Whether `member` of the current frame is excluded (case-insensitive)
    pub fn excludes(&self, member: &str) -> bool {
        let member = member.to_lowercase();
        self.paths
            .iter()
            .any(|path| path.is_leaf() && path.segments[0] == member)
    }

    /// Exclusions handed to the child frame built for `member`
    pub fn descend(&self, member: &str) -> ExclusionSet {
        let member = member.to_lowercase();
        self.paths
            .iter()
            .filter(|path| !path.is_leaf() && path.segments[0] == member)
            .map(|path| ExclusionPath {
                segments: path.segments[1..].to_vec(),
            })
            .collect()
    }
}

impl FromIterator<ExclusionPath> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = ExclusionPath>>(iter: I) -> Self {
        let mut set = ExclusionSet::new();
        for path in iter {
            set.insert(path);
        }
        set
    }
}

/// Operation a fixture is built for; selects the exclusion mapping entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Operation {
    #[default]
    Default,
    Create,
    Update,
    Delete,
    Persistence,
    UnitTestsCreate,
    UnitTestsUpdate,
    UnitTestsDelete,
    E2ETestsCreate,
    E2ETestsUpdate,
    E2ETestsDelete,
}

impl Operation {
    pub const ALL: [Operation; 11] = [
        Operation::Default,
        Operation::Create,
        Operation::Update,
        Operation::Delete,
        Operation::Persistence,
        Operation::UnitTestsCreate,
        Operation::UnitTestsUpdate,
        Operation::UnitTestsDelete,
        Operation::E2ETestsCreate,
        Operation::E2ETestsUpdate,
        Operation::E2ETestsDelete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Operation::Default => "Default",
            Operation::Create => "Create",
            Operation::Update => "Update",
            Operation::Delete => "Delete",
            Operation::Persistence => "Persistence",
            Operation::UnitTestsCreate => "UnitTestsCreate",
            Operation::UnitTestsUpdate => "UnitTestsUpdate",
            Operation::UnitTestsDelete => "UnitTestsDelete",
            Operation::E2ETestsCreate => "E2ETestsCreate",
            Operation::E2ETestsUpdate => "E2ETestsUpdate",
            Operation::E2ETestsDelete => "E2ETestsDelete",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = AnyError;

    fn from_str(s: &str) -> Result<Self> {
        Operation::ALL
            .into_iter()
            .find(|operation| operation.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                AnyError::invalid_argument("operation", format!("unknown operation {:?}", s))
            })
    }
}

/// Identity of the type an exclusion lookup is made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TargetType {
    pub id: TypeId,
    pub name: &'static str,
}

impl TargetType {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Type name without its module path or generic arguments
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        base.rsplit("::").next().unwrap_or(base)
    }
}

/// Source of per-operation exclusions, injected into a [`Builder`](crate::Builder)
pub trait ExclusionMapping: Send + Sync {
    /// Member paths to skip when building `target` for `operation`
    fn exclusions_for(&self, operation: Operation, target: TargetType) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum TableKey {
    Id(TypeId),
    Name(String),
}

/// In-memory exclusion mapping keyed by operation and type
#[derive(Debug, Clone, Default)]
pub struct ExclusionTable {
    entries: HashMap<(Operation, TableKey), Vec<String>>,
}

impl ExclusionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register exclusions for `T`
    pub fn insert<T: 'static, I, S>(&mut self, operation: Operation, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry((operation, TableKey::Id(TypeId::of::<T>())))
            .or_default()
            .extend(paths.into_iter().map(Into::into));
        self
    }

    /// Register exclusions for a type known only by name (short or fully qualified)
    pub fn insert_named<I, S>(&mut self, operation: Operation, type_name: &str, paths: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entries
            .entry((operation, TableKey::Name(type_name.to_string())))
            .or_default()
            .extend(paths.into_iter().map(Into::into));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Load a table shaped `{ "<operation>": { "<type name>": ["path", ...] } }`
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: HashMap<String, HashMap<String, Vec<String>>> = serde_json::from_str(json)
            .map_err(|e| AnyError::invalid_argument("json", e.to_string()))?;

        let mut table = ExclusionTable::new();
        for (operation, types) in raw {
            let operation = operation.parse::<Operation>()?;
            for (type_name, paths) in types {
                for path in &paths {
                    ExclusionPath::parse(path)?;
                }
                table.insert_named(operation, &type_name, paths);
            }
        }
        Ok(table)
    }
}

impl ExclusionMapping for ExclusionTable {
    fn exclusions_for(&self, operation: Operation, target: TargetType) -> Vec<String> {
        let keys = [
            TableKey::Id(target.id),
            TableKey::Name(target.name.to_string()),
            TableKey::Name(target.short_name().to_string()),
        ];
        keys.into_iter()
            .filter_map(|key| self.entries.get(&(operation, key)))
            .flatten()
            .cloned()
            .collect()
    }
}
