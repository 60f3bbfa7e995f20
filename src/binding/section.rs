//! Reusable page fragments scoped under a root element.
//!
//! A [`Component`] declares its bindings relative to a root element. A
//! [`Section`] owns that root together with the bound component, which keeps
//! the root alive for as long as the component's bindings may need it.
//!
//! # Example
//!
//! ```ignore
//! struct SearchResult {
//!     title: ElementBinding,
//!     summary: ElementBinding,
//! }
//!
//! impl Component for SearchResult {
//!     fn bind(root: &ElementBinding) -> Result<Self> {
//!         Ok(Self {
//!             title: root.child(LocatorSpec::single(By::xpath(".//h3/a")))?,
//!             summary: root.child(LocatorSpec::single(By::xpath(".//span[@class=\"st\"]")))?,
//!         })
//!     }
//! }
//!
//! let first = results.section::<SearchResult>(0).await?;
//! println!("{}", first.title.text().await?);
//! ```

use std::fmt;
use std::ops::Deref;

use crate::error::Result;

use super::element::ElementBinding;

// ============================================================================
// Component
// ============================================================================

/// A group of bindings declared relative to a root element.
pub trait Component: Sized {
    /// Declares the component's bindings under `root`.
    ///
    /// Must not contact the session.
    fn bind(root: &ElementBinding) -> Result<Self>;
}

// ============================================================================
// Section
// ============================================================================

/// A component together with the root binding that scopes it.
pub struct Section<C> {
    root: ElementBinding,
    component: C,
}

impl<C: Component> Section<C> {
    /// Binds `C` under `root`.
    ///
    /// # Errors
    ///
    /// Any error returned by [`Component::bind`].
    pub fn new(root: ElementBinding) -> Result<Self> {
        let component = C::bind(&root)?;
        Ok(Self { root, component })
    }
}

impl<C> Section<C> {
    /// Returns the root binding.
    #[inline]
    #[must_use]
    pub fn root(&self) -> &ElementBinding {
        &self.root
    }

    /// Splits the section into its root and component.
    ///
    /// The component's bindings stop resolving once the returned root is
    /// dropped.
    #[must_use]
    pub fn into_parts(self) -> (ElementBinding, C) {
        (self.root, self.component)
    }
}

impl<C> Deref for Section<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.component
    }
}

impl<C: fmt::Debug> fmt::Debug for Section<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Section")
            .field("root", &self.root)
            .field("component", &self.component)
            .finish()
    }
}

// ============================================================================
// Tests
// ============================================================================
