//! Type-safe identifiers.
//!
//! Newtype wrappers keep session-assigned IDs from mixing with plain strings.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// ElementId
// ============================================================================

/// Identifier of a native element reference, assigned by the session.
///
/// Two references with the same ID denote the same DOM node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ElementId(String);

impl ElementId {
    /// Creates an element ID.
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the ID as a string slice.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ElementId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
