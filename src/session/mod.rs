//! Driver capability consumed by bindings.
//!
//! Bindings never talk to a browser directly. They go through a [`Session`],
//! which locates elements under a [`Scope`] while polling a predicate, and
//! through the [`NativeElement`] references it returns.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Session`] | Locate-and-wait primitive plus session-level commands |
//! | [`NativeElement`] | Operations on one live element reference |
//! | [`Scope`] | Whole document, or the subtree of an element |
//! | [`poll_until`] | Bounded polling helper for session implementations |
//!
//! # Staleness
//!
//! A [`NativeElement`] is only valid while its node is attached. Once the
//! node is replaced or removed, every operation on it (and every search
//! scoped under it) must return [`Error::StaleElement`](crate::Error::StaleElement).
//! I/O-level failures are reported as [`Error::DriverFault`](crate::Error::DriverFault).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::identifiers::ElementId;
use crate::locator::{By, CollectionPredicate, ElementPredicate};

// ============================================================================
// Submodules
// ============================================================================

mod wait;

pub use wait::{DEFAULT_POLL_INTERVAL, poll_until};

// ============================================================================
// Types
// ============================================================================

/// Shared handle to a native element reference.
pub type ElementRef = Arc<dyn NativeElement>;

/// Where a locator query is evaluated.
#[derive(Clone)]
pub enum Scope {
    /// The whole document.
    Document,
    /// Descendants of an element.
    Element(ElementRef),
}

impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Document => f.write_str("Document"),
            Self::Element(element) => f.debug_tuple("Element").field(element.id()).finish(),
        }
    }
}

// ============================================================================
// Session
// ============================================================================

/// A live browser session.
///
/// Implementations block (asynchronously) inside `find_until` /
/// `find_all_until` until the predicate holds or the timeout elapses.
#[async_trait]
pub trait Session: Send + Sync {
    /// Waits until `predicate` holds for `by` under `scope`.
    ///
    /// Returns the matching element, or `None` when the predicate holds
    /// without a node ([`ElementPredicate::Invisible`] on an absent element).
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`](crate::Error::Timeout) if the predicate never held
    /// - [`Error::StaleElement`](crate::Error::StaleElement) if the scope element is gone
    async fn find_until(
        &self,
        scope: &Scope,
        by: &By,
        predicate: ElementPredicate,
        timeout: Duration,
    ) -> Result<Option<ElementRef>>;

    /// Waits until `predicate` holds for the collection `by` under `scope`.
    ///
    /// Returns the matches in document order.
    async fn find_all_until(
        &self,
        scope: &Scope,
        by: &By,
        predicate: CollectionPredicate,
        timeout: Duration,
    ) -> Result<Vec<ElementRef>>;

    /// Navigates to a URL.
    async fn goto(&self, url: &str) -> Result<()>;

    /// Returns the current page title.
    async fn title(&self) -> Result<String>;

    /// Ends the session.
    async fn quit(&self) -> Result<()>;
}

// ============================================================================
// NativeElement
// ============================================================================

/// A reference to one DOM node, valid until the node is detached.
#[async_trait]
pub trait NativeElement: Send + Sync {
    /// Returns the session-assigned ID of this reference.
    fn id(&self) -> &ElementId;

    /// Clicks the element.
    async fn click(&self) -> Result<()>;

    /// Types text into the element.
    async fn send_keys(&self, text: &str) -> Result<()>;

    /// Clears the element's value.
    async fn clear(&self) -> Result<()>;

    /// Gets the element's visible text.
    async fn text(&self) -> Result<String>;

    /// Gets an attribute value, `None` if absent.
    async fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Checks if the element is displayed.
    async fn is_displayed(&self) -> Result<bool>;

    /// Submits the form the element belongs to.
    async fn submit(&self) -> Result<()>;

    /// Checks if the element is enabled.
    async fn is_enabled(&self) -> Result<bool>;

    /// Checks if the element is selected.
    async fn is_selected(&self) -> Result<bool>;
}

impl fmt::Debug for dyn NativeElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeElement")
            .field("id", self.id())
            .finish_non_exhaustive()
    }
}
