//! Locators and wait policy.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`By`] | Locator strategy and value |
//! | [`WaitCondition`] | Readiness condition name |
//! | [`ConditionRegistry`] | Condition-to-predicate table, one per [`Arity`] |
//! | [`LocatorSpec`] | Validated locator plus wait policy |

// ============================================================================
// Submodules
// ============================================================================

/// Wait conditions and their registries.
pub mod condition;

/// Element locator strategies.
pub mod selector;

/// Validated locator specifications.
pub mod spec;

// ============================================================================
// Re-exports
// ============================================================================

pub use condition::{
    Arity, CollectionPredicate, ConditionRegistry, ElementPredicate, WaitCondition,
    collection_conditions, element_conditions,
};
pub use selector::By;
pub use spec::{DEFAULT_WAIT_TIMEOUT_SECS, LocatorSpec};
