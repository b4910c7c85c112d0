//! Configuration types controlling generation behaviour.
//!
//! Every switch that used to be process-wide state lives here and travels
//! with the [`Any`](crate::Any) handle that owns it.

use crate::primitives::CharSet;

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// Invalid number of children per nested collection (must be > 0)
    InvalidCollectionLength(usize),
    /// Invalid retry ceiling (must be > 0)
    InvalidRetryLimit(usize),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidCollectionLength(n) => {
                write!(f, "Invalid nested collection length: {} (must be > 0)", n)
            }
            ConfigError::InvalidRetryLimit(n) => {
                write!(f, "Invalid retry limit: {} (must be > 0)", n)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Number of children created for each collection member during deep builds
pub const DEFAULT_NESTED_COLLECTION_LEN: usize = 5;

/// Ceiling of every redraw loop (uniqueness and default avoidance)
pub const DEFAULT_RETRY_LIMIT: usize = 10_000;

/// Configuration for an [`Any`](crate::Any) generator
#[derive(Debug, Clone, PartialEq)]
pub struct AnyConfig {
    /// Never produce a value equal to the type's default
    pub exclude_defaults: bool,
    /// Depth-exhausted collections become `None` instead of empty
    pub null_collections: bool,
    /// Children created per collection member when a build expands it
    pub nested_collection_len: usize,
    /// Also populate members that are not `pub`
    pub fill_private_members: bool,
    /// Character set used for member strings and chars
    pub charset: CharSet,
    /// Maximum attempts of any redraw loop
    pub retry_limit: usize,
}

impl Default for AnyConfig {
    fn default() -> Self {
        Self {
            exclude_defaults: false,
            null_collections: false,
            nested_collection_len: DEFAULT_NESTED_COLLECTION_LEN,
            fill_private_members: false,
            charset: CharSet::Alphanumeric,
            retry_limit: DEFAULT_RETRY_LIMIT,
        }
    }
}

impl AnyConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.nested_collection_len == 0 {
            return Err(ConfigError::InvalidCollectionLength(
                self.nested_collection_len,
            ));
        }
        if self.retry_limit == 0 {
            return Err(ConfigError::InvalidRetryLimit(self.retry_limit));
        }
        Ok(())
    }

    /// Avoid default values in every generator
    pub fn exclude_defaults(mut self, exclude: bool) -> Self {
        self.exclude_defaults = exclude;
        self
    }

    /// Leave depth-exhausted collections as `None`
    pub fn null_collections(mut self, null: bool) -> Self {
        self.null_collections = null;
        self
    }

    /// Set the number of children per expanded collection
    pub fn nested_collection_len(mut self, len: usize) -> Self {
        self.nested_collection_len = len;
        self
    }

    /// Populate non-`pub` members as well
    pub fn fill_private_members(mut self, fill: bool) -> Self {
        self.fill_private_members = fill;
        self
    }

    /// Set the character set for member strings
    pub fn charset(mut self, charset: CharSet) -> Self {
        self.charset = charset;
        self
    }

    /// Set the retry ceiling
    pub fn retry_limit(mut self, limit: usize) -> Self {
        self.retry_limit = limit;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = AnyConfig::default();
        assert!(!config.exclude_defaults);
        assert!(!config.null_collections);
        assert!(!config.fill_private_members);
        assert_eq!(config.nested_collection_len, 5);
        assert_eq!(config.retry_limit, 10_000);
        assert_eq!(config.charset, CharSet::Alphanumeric);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let config = AnyConfig::default().nested_collection_len(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidCollectionLength(0))
        );

        let config = AnyConfig::default().retry_limit(0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidRetryLimit(0)));
    }

    #[test]
    fn test_config_error_display() {
        assert_eq!(
            ConfigError::InvalidRetryLimit(0).to_string(),
            "Invalid retry limit: 0 (must be > 0)"
        );
    }
}
