//! Lazy element bindings with staleness recovery.
//!
//! Bindings are declared up front (typically as fields of a page struct) and
//! resolved on first use. Every action retries transient failures, healing
//! the parent chain when a scope element went stale.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`ElementBinding`] | One element, resolved lazily and memoized |
//! | [`ElementListBinding`] | An ordered list; indexing yields positional bindings |
//! | [`Section`] | A [`Component`] bound under a root element |
//! | [`BindingOptions`] | Retry and resolution policy |

// ============================================================================
// Submodules
// ============================================================================

/// Single-element bindings.
pub mod element;

/// Element-list bindings.
pub mod list;

/// Retry and resolution options.
pub mod options;

/// Components and sections.
pub mod section;

mod scope;

// ============================================================================
// Re-exports
// ============================================================================

pub use element::ElementBinding;
pub use list::ElementListBinding;
pub use options::{
    BindingOptions, DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRY_DELAY, ResolvePolicy, RetryPolicy,
};
pub use section::{Component, Section};
