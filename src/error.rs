//! Error types for page object bindings.
//!
//! This module defines all error types used throughout the crate.
//!
//! # Usage
//!
//! All fallible operations return [`Result<T>`] which uses [`Error`]:
//!
//! ```ignore
//! use page_object::{Error, Result};
//!
//! async fn example(page: &SearchPage) -> Result<()> {
//!     page.search_box.clear().await?;
//!     page.search_box.send_keys("python").await?;
//!     Ok(())
//! }
//! ```
//!
//! # Error Categories
//!
//! | Category | Variants | Retried |
//! |----------|----------|---------|
//! | Configuration | [`Error::Validation`], [`Error::InvalidUrl`] | never |
//! | Waiting | [`Error::Timeout`] | never |
//! | Transient | [`Error::StaleElement`], [`Error::DriverFault`] | up to the retry cap |
//! | Lookup | [`Error::IndexOutOfRange`], [`Error::ElementNotFound`], [`Error::ScopeDropped`] | never |

// ============================================================================
// Imports
// ============================================================================

use std::result::Result as StdResult;

use thiserror::Error;

use crate::identifiers::ElementId;

// ============================================================================
// Result Alias
// ============================================================================

/// Result type alias using crate [`enum@Error`].
///
/// All fallible operations in this crate return this type.
pub type Result<T> = StdResult<T, Error>;

// ============================================================================
// Error Enum
// ============================================================================

/// Main error type for the crate.
///
/// Each variant includes the context needed to diagnose it: the locator,
/// the index, or the element involved.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Malformed binding configuration.
    ///
    /// Returned at construction time, before any session interaction.
    #[error("Validation error: {message}")]
    Validation {
        /// Description of the validation failure.
        message: String,
    },

    /// Page URL could not be parsed.
    #[error("Invalid URL '{url}': {message}")]
    InvalidUrl {
        /// The URL as declared by the page.
        url: String,
        /// Parser message.
        message: String,
    },

    // ========================================================================
    // Waiting Errors
    // ========================================================================
    /// Wait condition never held within the timeout.
    #[error("Timeout after {timeout_ms}ms: {operation}")]
    Timeout {
        /// Description of the wait, including the locator.
        operation: String,
        /// Milliseconds waited before timeout.
        timeout_ms: u64,
    },

    // ========================================================================
    // Transient Errors
    // ========================================================================
    /// Element is stale (no longer in DOM).
    ///
    /// Returned by the session when a previously valid reference is used.
    #[error("Stale element: {element_id}")]
    StaleElement {
        /// The stale element's ID.
        element_id: ElementId,
    },

    /// Generic fault reported by the underlying session.
    #[error("Driver fault: {message}")]
    DriverFault {
        /// Description of the fault.
        message: String,
    },

    // ========================================================================
    // Lookup Errors
    // ========================================================================
    /// Index-scoped binding points past the end of its list.
    #[error("Index {index} out of range for {locator} ({len} elements)")]
    IndexOutOfRange {
        /// Locator of the list.
        locator: String,
        /// Requested position.
        index: usize,
        /// Number of elements in the freshly resolved list.
        len: usize,
    },

    /// Wait condition held but no element exists to bind.
    #[error("Element not found: {locator}")]
    ElementNotFound {
        /// Locator that was waited on.
        locator: String,
    },

    /// The parent scope of a binding has been dropped.
    #[error("Parent scope dropped for {locator}")]
    ScopeDropped {
        /// Locator of the orphaned binding.
        locator: String,
    },
}

// ============================================================================
// Error Constructors
// ============================================================================

impl Error {
    /// Creates a validation error.
    #[inline]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Creates an invalid URL error.
    #[inline]
    pub fn invalid_url(url: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Creates a timeout error.
    #[inline]
    pub fn timeout(operation: impl Into<String>, timeout_ms: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            timeout_ms,
        }
    }

    /// Creates a stale element error.
    #[inline]
    pub fn stale_element(element_id: ElementId) -> Self {
        Self::StaleElement { element_id }
    }

    /// Creates a driver fault error.
    #[inline]
    pub fn driver_fault(message: impl Into<String>) -> Self {
        Self::DriverFault {
            message: message.into(),
        }
    }

    /// Creates an index out of range error.
    #[inline]
    pub fn index_out_of_range(locator: impl Into<String>, index: usize, len: usize) -> Self {
        Self::IndexOutOfRange {
            locator: locator.into(),
            index,
            len,
        }
    }

    /// Creates an element not found error.
    #[inline]
    pub fn element_not_found(locator: impl Into<String>) -> Self {
        Self::ElementNotFound {
            locator: locator.into(),
        }
    }

    /// Creates a scope dropped error.
    #[inline]
    pub fn scope_dropped(locator: impl Into<String>) -> Self {
        Self::ScopeDropped {
            locator: locator.into(),
        }
    }
}

// ============================================================================
// Error Predicates
// ============================================================================

impl Error {
    /// Returns `true` if this is a timeout error.
    #[inline]
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if this is a stale element error.
    #[inline]
    #[must_use]
    pub fn is_stale(&self) -> bool {
        matches!(self, Self::StaleElement { .. })
    }

    /// Returns `true` if this error may succeed after re-resolution.
    ///
    /// Only transient errors are retried by bindings.
    #[inline]
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::StaleElement { .. } | Self::DriverFault { .. })
    }

    /// Returns `true` if this error is never retried by a binding.
    #[inline]
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        !self.is_transient() && !self.is_timeout()
    }
}

// ============================================================================
// Tests
// ============================================================================
