//! Error types for ID generation and parsing.

use thiserror::Error;

use crate::strategy::Strategy;

/// Errors that can occur when generating, configuring, or parsing IDs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// An external generator could not be constructed.
    #[error("failed to initialize {generator} generator: {message}")]
    GeneratorInit {
        generator: &'static str,
        message: String,
    },

    /// The snowflake worker id is outside the accepted range.
    #[error("worker id {worker_id} out of range: must be between 0 and {max}")]
    NodeIdOutOfRange { worker_id: i64, max: i64 },

    /// A configured external generator failed to mint an ID.
    #[error("{generator} generator failed: {message}")]
    GeneratorFailed {
        generator: &'static str,
        message: String,
    },

    /// A generator-backed strategy was requested but never configured.
    #[error("strategy '{0}' requires a generator that is not configured")]
    GeneratorNotConfigured(Strategy),

    /// The strategy name is not recognized.
    #[error("unknown strategy: '{0}'")]
    UnknownStrategy(String),

    /// The configuration is invalid.
    #[error("invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The ID string is empty.
    #[error("ID cannot be empty")]
    Empty,

    /// The ID is missing the dash separator.
    #[error("ID missing '-' separator")]
    MissingSeparator,

    /// The ID has an invalid kind prefix.
    #[error("invalid ID prefix: expected '{expected}', got '{actual}'")]
    InvalidPrefix { expected: String, actual: String },

    /// The code portion of a resource ID is invalid.
    #[error("invalid resource code: {message}")]
    InvalidCode { message: String },
}

impl IdError {
    /// Returns true if this error came from an external generator.
    pub fn is_generator_error(&self) -> bool {
        matches!(
            self,
            IdError::GeneratorInit { .. }
                | IdError::NodeIdOutOfRange { .. }
                | IdError::GeneratorFailed { .. }
                | IdError::GeneratorNotConfigured(_)
        )
    }

    /// Returns true if this error came from parsing a resource ID.
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            IdError::Empty
                | IdError::MissingSeparator
                | IdError::InvalidPrefix { .. }
                | IdError::InvalidCode { .. }
        )
    }

    pub(crate) fn invalid_config(message: impl Into<String>) -> Self {
        IdError::InvalidConfig {
            message: message.into(),
        }
    }

    pub(crate) fn invalid_code(message: impl Into<String>) -> Self {
        IdError::InvalidCode {
            message: message.into(),
        }
    }
}
