//! Resource identifiers: `{kind}-{code}`.
//!
//! The code is derived from a caller-supplied row counter by a
//! [`CodeEncoder`], so the same counter and salt always give the same ID
//! and the counter can be recovered from it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{define_resource_id, CodeEncoder, IdError};

// =============================================================================
// Typed IDs
// =============================================================================

define_resource_id!(UserId, "user");
define_resource_id!(OrderId, "order");

// =============================================================================
// Dynamic kinds
// =============================================================================

/// A resource kind known only at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceKind(String);

impl ResourceKind {
    #[must_use]
    pub fn new(kind: impl Into<String>) -> Self {
        Self(kind.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Formats the ID for `counter`.
    #[must_use]
    pub fn new_id(&self, counter: u64, encoder: &CodeEncoder) -> String {
        format!("{}-{}", self.0, encoder.encode(counter))
    }

    /// Recovers the counter from an ID of this kind.
    pub fn decode(&self, id: &str, encoder: &CodeEncoder) -> Result<u64, IdError> {
        let code = split_resource_id(id, &self.0)?;
        encoder.decode(code)
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ResourceKind {
    fn from(kind: &str) -> Self {
        Self::new(kind)
    }
}

/// Splits `{kind}-{code}` and checks the kind, returning the code.
///
/// Codes are alphanumeric, so the last `-` is the separator and kinds may
/// contain dashes themselves.
pub fn split_resource_id<'a>(s: &'a str, expected_kind: &str) -> Result<&'a str, IdError> {
    if s.is_empty() {
        return Err(IdError::Empty);
    }

    let Some((kind, code)) = s.rsplit_once('-') else {
        return Err(IdError::MissingSeparator);
    };

    if kind != expected_kind {
        return Err(IdError::InvalidPrefix {
            expected: expected_kind.to_string(),
            actual: kind.to_string(),
        });
    }

    if code.is_empty() {
        return Err(IdError::invalid_code("code is empty"));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(IdError::invalid_code(format!("'{code}' is not alphanumeric")));
    }

    Ok(code)
}

// =============================================================================
// Tests
// =============================================================================
