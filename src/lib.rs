//! Page Object - Lazy element bindings with staleness recovery.
//!
//! This library lets a page be declared as a struct of element bindings.
//! Nothing is located when the page is built; each binding finds its element
//! on first use, waits for a readiness condition, and transparently recovers
//! when the element is re-rendered underneath it.
//!
//! # Architecture
//!
//! - **Locators**: [`LocatorSpec`] pairs a [`By`] strategy with a
//!   [`WaitCondition`] and a timeout, validated at declaration time
//! - **Bindings**: [`ElementBinding`] and [`ElementListBinding`] resolve
//!   lazily through a [`Session`] and memoize the result
//! - **Recovery**: stale references are re-resolved, healing the parent
//!   chain from the outermost stale ancestor inward
//!
//! Key design principles:
//!
//! - Child bindings hold weak parent pointers; a page struct or [`Section`]
//!   owns the parents
//! - List items are positional: a stale item re-runs the list query and
//!   takes whatever is at the same index
//! - Transient failures are retried a bounded number of times
//!
//! # Quick Start
//!
//! ```ignore
//! use page_object::{By, LocatorSpec, Page, Result};
//!
//! async fn search(session: Arc<dyn Session>) -> Result<()> {
//!     let page = Page::new(session);
//!     let search_box = page.element(LocatorSpec::single(By::name("q")))?;
//!     let results = page.elements(LocatorSpec::collection(By::css("div.g")))?;
//!
//!     search_box.send_keys("python").await?;
//!     search_box.submit().await?;
//!
//!     println!("{} results", results.len().await?);
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`binding`] | [`ElementBinding`], [`ElementListBinding`], [`Section`] |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`identifiers`] | Type-safe ID wrappers |
//! | [`locator`] | [`By`], [`WaitCondition`], [`LocatorSpec`] |
//! | [`page`] | [`Page`] and the [`PageObject`] trait |
//! | [`session`] | The [`Session`] capability bindings consume |

// ============================================================================
// Modules
// ============================================================================

/// Lazy element bindings.
///
/// - [`ElementBinding`] - One element
/// - [`ElementListBinding`] - An ordered list of elements
/// - [`Section`] - A [`Component`] scoped under a root element
pub mod binding;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Type-safe identifiers.
pub mod identifiers;

/// Locator strategies, wait conditions and locator specs.
pub mod locator;

/// Page objects.
pub mod page;

/// Driver capability consumed by bindings.
pub mod session;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Re-exports
// ============================================================================

// Binding types
pub use binding::{
    BindingOptions, Component, ElementBinding, ElementListBinding, ResolvePolicy, RetryPolicy,
    Section,
};

// Error types
pub use error::{Error, Result};

// Identifier types
pub use identifiers::ElementId;

// Locator types
pub use locator::{Arity, By, LocatorSpec, WaitCondition};

// Page types
pub use page::{Page, PageObject, normalize_url};

// Session types
pub use session::{ElementRef, NativeElement, Scope, Session};
