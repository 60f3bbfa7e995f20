//! Lazily resolved element-list bindings.
//!
//! An [`ElementListBinding`] resolves to an ordered sequence of elements.
//! Indexing yields an [`ElementBinding`] whose identity is positional: when
//! it needs to re-resolve, it re-runs the whole list query and takes
//! whatever is now at the same index.
//!
//! # Example
//!
//! ```ignore
//! let results = page.elements(LocatorSpec::collection(By::css("div.g")))?;
//!
//! for index in 0..results.len().await? {
//!     let result = results.section::<SearchResult>(index).await?;
//!     println!("{}", result.title.text().await?);
//! }
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tracing::debug;

use crate::error::{Error, Result};
use crate::locator::{Arity, LocatorSpec};
use crate::session::{ElementRef, Session};

use super::element::{BindingInner, ElementBinding};
use super::options::{BindingOptions, ResolvePolicy};
use super::scope::find_in_scope;
use super::section::{Component, Section};

// ============================================================================
// Types
// ============================================================================

/// Internal shared state for a list binding.
pub(crate) struct ListInner {
    /// Locator and wait policy.
    pub spec: LocatorSpec,

    /// Session used for lookups.
    pub session: Arc<dyn Session>,

    /// Parent binding, `None` for document scope.
    pub parent: Option<Weak<BindingInner>>,

    /// Retry and resolution options.
    pub options: BindingOptions,

    /// Memoized references, in document order.
    pub resolved: Mutex<Option<Vec<ElementRef>>>,
}

// ============================================================================
// ElementListBinding
// ============================================================================

/// A declared, lazily resolved handle to an ordered list of elements.
#[derive(Clone)]
pub struct ElementListBinding {
    pub(crate) inner: Arc<ListInner>,
}

impl fmt::Debug for ElementListBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElementListBinding")
            .field("spec", &self.inner.spec)
            .field("cached_len", &self.cached_len())
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ElementListBinding - Constructors
// ============================================================================

impl ElementListBinding {
    /// Creates a list binding that runs `spec` under `parent`.
    pub(crate) fn new(
        spec: LocatorSpec,
        session: Arc<dyn Session>,
        parent: Option<Weak<BindingInner>>,
        options: BindingOptions,
    ) -> Result<Self> {
        spec.expect_arity(Arity::Collection)?;
        options.validate()?;

        Ok(Self {
            inner: Arc::new(ListInner {
                spec,
                session,
                parent,
                options,
                resolved: Mutex::new(None),
            }),
        })
    }

    pub(crate) fn from_inner(inner: Arc<ListInner>) -> Self {
        Self { inner }
    }
}

// ============================================================================
// ElementListBinding - Accessors
// ============================================================================

impl ElementListBinding {
    /// Returns the locator spec.
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &LocatorSpec {
        &self.inner.spec
    }

    /// Returns the parent binding, if any and still alive.
    #[must_use]
    pub fn parent(&self) -> Option<ElementBinding> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(ElementBinding::from_inner)
    }

    /// Returns `true` if a sequence is memoized.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.lock().is_some()
    }

    /// Returns the memoized references without contacting the session.
    #[must_use]
    pub fn resolved(&self) -> Option<Vec<ElementRef>> {
        self.inner.resolved.lock().clone()
    }

    /// Returns the length of the last resolved sequence.
    #[must_use]
    pub fn cached_len(&self) -> Option<usize> {
        self.inner.resolved.lock().as_ref().map(Vec::len)
    }
}

// ============================================================================
// ElementListBinding - Resolution
// ============================================================================

impl ElementListBinding {
    /// Returns the elements, resolving them on first use.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the collection condition never held
    /// - [`Error::StaleElement`] if the parent scope stayed stale
    pub async fn resolve(&self) -> Result<Vec<ElementRef>> {
        if self.inner.options.resolve == ResolvePolicy::Memoize {
            let cached = self.resolved();
            if let Some(elements) = cached {
                return Ok(elements);
            }
        }
        self.find().await
    }

    /// Drops the memoized sequence and resolves again.
    pub async fn refresh(&self) -> Result<Vec<ElementRef>> {
        self.invalidate();
        self.find().await
    }

    /// Drops the memoized sequence without contacting the session.
    pub fn invalidate(&self) {
        *self.inner.resolved.lock() = None;
    }

    /// Returns the number of elements, resolving them if needed.
    pub async fn len(&self) -> Result<usize> {
        Ok(self.resolve().await?.len())
    }

    /// Returns `true` if the resolved sequence is empty.
    pub async fn is_empty(&self) -> Result<bool> {
        Ok(self.len().await? == 0)
    }

    /// Returns a binding scoped to position `index`.
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] if `index` is past the end of the list.
    pub async fn at(&self, index: usize) -> Result<ElementBinding> {
        let elements = self.resolve().await?;
        let element = elements.get(index).cloned().ok_or_else(|| {
            Error::index_out_of_range(self.inner.spec.to_string(), index, elements.len())
        })?;
        Ok(ElementBinding::positional(self, index, element))
    }

    /// Returns one index-scoped binding per resolved element.
    pub async fn bindings(&self) -> Result<Vec<ElementBinding>> {
        let elements = self.resolve().await?;
        Ok(elements
            .into_iter()
            .enumerate()
            .map(|(index, element)| ElementBinding::positional(self, index, element))
            .collect())
    }

    /// Binds a component rooted at position `index`.
    pub async fn section<C: Component>(&self, index: usize) -> Result<Section<C>> {
        Section::new(self.at(index).await?)
    }

    async fn find(&self) -> Result<Vec<ElementRef>> {
        let inner = &self.inner;
        let spec = &inner.spec;
        let predicate = spec
            .collection_predicate()
            .ok_or_else(|| Error::validation(format!("{spec} is not a collection locator")))?;

        debug!(locator = %spec, scoped = inner.parent.is_some(), "Finding elements");

        let session = &inner.session;
        let by = spec.by();
        let timeout = spec.wait_timeout();

        let elements = find_in_scope(spec, inner.parent.as_ref(), &inner.options.retry, |scope| async move {
            session.find_all_until(&scope, by, predicate, timeout).await
        })
        .await?;

        debug!(locator = %spec, count = elements.len(), "Found elements");
        *inner.resolved.lock() = Some(elements.clone());
        Ok(elements)
    }
}

// ============================================================================
// Tests
// ============================================================================
