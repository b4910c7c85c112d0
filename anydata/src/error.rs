//! Error types and result handling for anonymous data generation.

use std::fmt;

use crate::config::ConfigError;

/// Comprehensive error type for generation failures
#[derive(Debug, Clone, PartialEq)]
pub enum AnyError {
    /// A length, digit count, range or time bound was out of its supported domain
    InvalidArgument {
        message: String,
        parameter: Option<&'static str>,
    },

    /// The requested type cannot be produced the way it was asked for
    UnsupportedType {
        type_name: &'static str,
        message: String,
    },

    /// A redraw loop hit the configured retry ceiling
    ExhaustedRetries {
        type_name: &'static str,
        attempts: usize,
    },

    /// Failure raised by a user supplied member generator
    Custom { message: String },

    /// Invalid generator configuration
    Config(ConfigError),
}

impl fmt::Display for AnyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyError::InvalidArgument { message, parameter } => {
                write!(f, "Invalid argument: {}", message)?;
                if let Some(name) = parameter {
                    write!(f, " (parameter: {})", name)?;
                }
                Ok(())
            }
            AnyError::UnsupportedType { type_name, message } => {
                write!(f, "Unsupported type {}: {}", type_name, message)
            }
            AnyError::ExhaustedRetries {
                type_name,
                attempts,
            } => write!(
                f,
                "Exceeded {} attempts to draw a {} value; the requested range or length is too small for the requested volume",
                attempts, type_name
            ),
            AnyError::Custom { message } => write!(f, "Generation failed: {}", message),
            AnyError::Config(err) => write!(f, "Configuration error: {}", err),
        }
    }
}

impl std::error::Error for AnyError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AnyError::Config(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ConfigError> for AnyError {
    fn from(err: ConfigError) -> Self {
        AnyError::Config(err)
    }
}

/// Result alias used throughout the crate
pub type Result<T, E = AnyError> = std::result::Result<T, E>;

/// Helper functions for creating AnyError instances
impl AnyError {
    /// Create an invalid argument error naming the offending parameter
    pub fn invalid_argument(parameter: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            parameter: Some(parameter),
        }
    }

    /// Create an unsupported type error
    pub fn unsupported<T: ?Sized>(message: impl Into<String>) -> Self {
        Self::UnsupportedType {
            type_name: std::any::type_name::<T>(),
            message: message.into(),
        }
    }

    /// Create an exhausted retries error for type `T`
    pub fn exhausted<T: ?Sized>(attempts: usize) -> Self {
        Self::ExhaustedRetries {
            type_name: std::any::type_name::<T>(),
            attempts,
        }
    }

    /// Create an error from a custom member generator
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }

    /// Whether a nested child build may swallow this error and degrade.
    ///
    /// Retry exhaustion signals misuse of the uniqueness or default-avoidance
    /// settings and always reaches the caller.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, AnyError::ExhaustedRetries { .. })
    }
}
