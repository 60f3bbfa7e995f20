//! Lazily resolved single-element bindings.
//!
//! An [`ElementBinding`] stores a [`LocatorSpec`] and its parent scope, and
//! only contacts the session when an action needs the element. The resolved
//! reference is memoized until it is found stale.
//!
//! # Example
//!
//! ```ignore
//! let search_box = page.element(LocatorSpec::single(By::name("q")))?;
//! assert!(!search_box.is_resolved());
//!
//! search_box.clear().await?;            // resolves, then clears
//! search_box.send_keys("python").await?; // reuses the resolved element
//! search_box.submit().await?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Weak};

use futures_util::FutureExt;
use futures_util::future::BoxFuture;
use parking_lot::Mutex;
use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::locator::{Arity, LocatorSpec};
use crate::session::{ElementRef, Session};

use super::list::{ElementListBinding, ListInner};
use super::options::{BindingOptions, ResolvePolicy};
use super::scope::find_in_scope;
use super::section::{Component, Section};

// ============================================================================
// Types
// ============================================================================

/// How a binding finds its element.
pub(crate) enum Origin {
    /// Run the binding's own locator under its parent scope.
    Query,
    /// Re-run a list query and take the element at `index`.
    Position {
        list: Weak<ListInner>,
        index: usize,
    },
}

/// Internal shared state for a binding.
pub(crate) struct BindingInner {
    /// Locator and wait policy.
    pub spec: LocatorSpec,

    /// Session used for lookups.
    pub session: Arc<dyn Session>,

    /// Parent binding, `None` for document scope.
    pub parent: Option<Weak<BindingInner>>,

    /// Lookup strategy.
    pub origin: Origin,

    /// Retry and resolution options.
    pub options: BindingOptions,

    /// Memoized reference.
    pub resolved: Mutex<Option<ElementRef>>,
}

/// Tag naming an element action in log lines.
///
/// Actions are invoked through the typed methods on [`ElementBinding`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Action {
    /// Click the element.
    Click,
    /// Type text.
    SendKeys,
    /// Clear the value.
    Clear,
    /// Read the visible text.
    Text,
    /// Read an attribute.
    GetAttribute,
    /// Check visibility.
    IsDisplayed,
    /// Submit the enclosing form.
    Submit,
    /// Check the enabled state.
    IsEnabled,
    /// Check the selected state.
    IsSelected,
}

impl Action {
    /// Returns the action name used in logs.
    #[must_use]
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::SendKeys => "send_keys",
            Self::Clear => "clear",
            Self::Text => "text",
            Self::GetAttribute => "get_attribute",
            Self::IsDisplayed => "is_displayed",
            Self::Submit => "submit",
            Self::IsEnabled => "is_enabled",
            Self::IsSelected => "is_selected",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// ElementBinding
// ============================================================================

/// A declared, lazily resolved handle to one element.
///
/// Cloning is cheap and clones share the resolved reference. Child bindings
/// hold a weak pointer to their parent, so the parent must be kept alive by
/// its owner (a page struct or a [`Section`]).
#[derive(Clone)]
pub struct ElementBinding {
    pub(crate) inner: Arc<BindingInner>,
}

// ============================================================================
// ElementBinding - Display
// ============================================================================

impl fmt::Debug for ElementBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let resolved = self.resolved().map(|element| element.id().clone());
        f.debug_struct("ElementBinding")
            .field("spec", &self.inner.spec)
            .field("index", &self.index())
            .field("resolved", &resolved)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// ElementBinding - Constructors
// ============================================================================

impl ElementBinding {
    /// Creates a binding that runs `spec` under `parent`.
    pub(crate) fn new(
        spec: LocatorSpec,
        session: Arc<dyn Session>,
        parent: Option<Weak<BindingInner>>,
        options: BindingOptions,
    ) -> Result<Self> {
        spec.expect_arity(Arity::Single)?;
        options.validate()?;

        Ok(Self::from_parts(BindingInner {
            spec,
            session,
            parent,
            origin: Origin::Query,
            options,
            resolved: Mutex::new(None),
        }))
    }

    /// Creates a binding for position `index` of `list`, seeded with `element`.
    pub(crate) fn positional(list: &ElementListBinding, index: usize, element: ElementRef) -> Self {
        let list_inner = &list.inner;
        Self::from_parts(BindingInner {
            spec: list_inner.spec.clone(),
            session: Arc::clone(&list_inner.session),
            parent: list_inner.parent.clone(),
            origin: Origin::Position {
                list: Arc::downgrade(list_inner),
                index,
            },
            options: list_inner.options,
            resolved: Mutex::new(Some(element)),
        })
    }

    fn from_parts(inner: BindingInner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    pub(crate) fn from_inner(inner: Arc<BindingInner>) -> Self {
        Self { inner }
    }

    /// Declares a child element scoped under this binding.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if `spec` is a collection spec.
    pub fn child(&self, spec: LocatorSpec) -> Result<ElementBinding> {
        ElementBinding::new(
            spec,
            Arc::clone(&self.inner.session),
            Some(Arc::downgrade(&self.inner)),
            self.inner.options,
        )
    }

    /// Declares a child element list scoped under this binding.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if `spec` is a single-element spec.
    pub fn children(&self, spec: LocatorSpec) -> Result<ElementListBinding> {
        ElementListBinding::new(
            spec,
            Arc::clone(&self.inner.session),
            Some(Arc::downgrade(&self.inner)),
            self.inner.options,
        )
    }

    /// Binds a component rooted at this element.
    pub fn section<C: Component>(&self) -> Result<Section<C>> {
        Section::new(self.clone())
    }
}

// ============================================================================
// ElementBinding - Accessors
// ============================================================================

impl ElementBinding {
    /// Returns the locator spec.
    ///
    /// For index-scoped bindings this is the spec of the list.
    #[inline]
    #[must_use]
    pub fn spec(&self) -> &LocatorSpec {
        &self.inner.spec
    }

    /// Returns the position within the list, for index-scoped bindings.
    #[must_use]
    pub fn index(&self) -> Option<usize> {
        match self.inner.origin {
            Origin::Query => None,
            Origin::Position { index, .. } => Some(index),
        }
    }

    /// Returns the parent binding, if any and still alive.
    #[must_use]
    pub fn parent(&self) -> Option<ElementBinding> {
        self.inner
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(Self::from_inner)
    }

    /// Returns the options this binding was declared with.
    #[inline]
    #[must_use]
    pub fn options(&self) -> BindingOptions {
        self.inner.options
    }

    /// Returns `true` if a reference is memoized.
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.inner.resolved.lock().is_some()
    }

    /// Returns the memoized reference without contacting the session.
    #[must_use]
    pub fn resolved(&self) -> Option<ElementRef> {
        self.inner.resolved.lock().clone()
    }

    /// Returns `true` if both handles share the same binding state.
    #[inline]
    #[must_use]
    pub fn same_binding(&self, other: &ElementBinding) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn label(&self) -> String {
        match self.index() {
            Some(index) => format!("{}[{index}]", self.inner.spec),
            None => self.inner.spec.to_string(),
        }
    }
}

// ============================================================================
// ElementBinding - Resolution
// ============================================================================

impl ElementBinding {
    /// Returns the element, resolving it on first use.
    ///
    /// With [`ResolvePolicy::AlwaysRefind`] every call runs the lookup.
    ///
    /// # Errors
    ///
    /// - [`Error::Timeout`] if the wait condition never held
    /// - [`Error::ElementNotFound`] if the condition held with no element
    /// - [`Error::IndexOutOfRange`] if an index-scoped binding's list shrank
    /// - [`Error::StaleElement`] if the parent scope stayed stale
    pub async fn resolve(&self) -> Result<ElementRef> {
        if self.inner.options.resolve == ResolvePolicy::Memoize {
            let cached = self.resolved();
            if let Some(element) = cached {
                return Ok(element);
            }
        }

        self.lookup()
            .await?
            .ok_or_else(|| Error::element_not_found(self.label()))
    }

    /// Drops the memoized reference and resolves again.
    pub async fn refresh(&self) -> Result<ElementRef> {
        debug!(locator = %self.label(), "Refreshing element");
        self.invalidate();
        self.lookup()
            .await?
            .ok_or_else(|| Error::element_not_found(self.label()))
    }

    /// Drops the memoized reference without contacting the session.
    pub fn invalidate(&self) {
        *self.inner.resolved.lock() = None;
    }

    /// Waits for the wait condition only.
    ///
    /// Unlike [`resolve`](Self::resolve), succeeds when the condition holds
    /// without an element, e.g. `invisible` on an element that is gone.
    pub async fn wait_until(&self) -> Result<()> {
        self.lookup().await.map(|_| ())
    }

    /// Runs the lookup and memoizes the result.
    fn lookup(&self) -> BoxFuture<'_, Result<Option<ElementRef>>> {
        async move {
            let found = match &self.inner.origin {
                Origin::Query => self.query().await?,
                Origin::Position { list, index } => Some(self.reselect(list, *index).await?),
            };
            *self.inner.resolved.lock() = found.clone();
            Ok(found)
        }
        .boxed()
    }

    /// Runs this binding's own locator under the parent scope.
    async fn query(&self) -> Result<Option<ElementRef>> {
        let inner = &self.inner;
        let spec = &inner.spec;
        let predicate = spec
            .element_predicate()
            .ok_or_else(|| Error::validation(format!("{spec} is not a single-element locator")))?;

        debug!(locator = %spec, scoped = inner.parent.is_some(), "Finding element");

        let session = &inner.session;
        let by = spec.by();
        let timeout = spec.wait_timeout();

        find_in_scope(spec, inner.parent.as_ref(), &inner.options.retry, |scope| async move {
            session.find_until(&scope, by, predicate, timeout).await
        })
        .await
    }

    /// Replays the list query and takes the element at `index`.
    async fn reselect(&self, list: &Weak<ListInner>, index: usize) -> Result<ElementRef> {
        let list = list
            .upgrade()
            .map(ElementListBinding::from_inner)
            .ok_or_else(|| Error::scope_dropped(self.label()))?;

        debug!(locator = %list.spec(), index, "Re-selecting element by position");

        let elements = list.refresh().await?;
        elements
            .get(index)
            .cloned()
            .ok_or_else(|| Error::index_out_of_range(list.spec().to_string(), index, elements.len()))
    }
}

// ============================================================================
// ElementBinding - Actions
// ============================================================================

impl ElementBinding {
    /// Clicks the element.
    pub async fn click(&self) -> Result<()> {
        self.perform(Action::Click, |element| async move { element.click().await })
            .await
    }

    /// Types text into the element.
    pub async fn send_keys(&self, text: &str) -> Result<()> {
        debug!(locator = %self.label(), text_len = text.len(), "Typing text");
        self.perform(Action::SendKeys, |element| async move {
            element.send_keys(text).await
        })
        .await
    }

    /// Clears the element's value.
    pub async fn clear(&self) -> Result<()> {
        self.perform(Action::Clear, |element| async move { element.clear().await })
            .await
    }

    /// Gets the element's visible text.
    pub async fn text(&self) -> Result<String> {
        self.perform(Action::Text, |element| async move { element.text().await })
            .await
    }

    /// Gets an attribute value.
    ///
    /// Returns `None` if the attribute doesn't exist.
    pub async fn attribute(&self, name: &str) -> Result<Option<String>> {
        self.perform(Action::GetAttribute, |element| async move {
            element.attribute(name).await
        })
        .await
    }

    /// Checks if the element is displayed.
    pub async fn is_displayed(&self) -> Result<bool> {
        self.perform(Action::IsDisplayed, |element| async move {
            element.is_displayed().await
        })
        .await
    }

    /// Submits the form the element belongs to.
    pub async fn submit(&self) -> Result<()> {
        self.perform(Action::Submit, |element| async move { element.submit().await })
            .await
    }

    /// Checks if the element is enabled.
    pub async fn is_enabled(&self) -> Result<bool> {
        self.perform(Action::IsEnabled, |element| async move {
            element.is_enabled().await
        })
        .await
    }

    /// Checks if the element is selected.
    pub async fn is_selected(&self) -> Result<bool> {
        self.perform(Action::IsSelected, |element| async move {
            element.is_selected().await
        })
        .await
    }

    /// Types `value` into the element unless it renders empty.
    ///
    /// Returns `true` if text was typed.
    pub async fn set_text(&self, value: impl fmt::Display) -> Result<bool> {
        let value = value.to_string();
        if value.is_empty() {
            return Ok(false);
        }
        self.send_keys(&value).await?;
        Ok(true)
    }
}

// ============================================================================
// ElementBinding - Internal
// ============================================================================

impl ElementBinding {
    /// Runs `op` against the resolved element, retrying transient failures.
    ///
    /// Each transient failure invalidates this binding so the next attempt
    /// resolves afresh; the parent chain is only refreshed if that lookup
    /// finds the parent stale too.
    async fn perform<T, F, Fut>(&self, action: Action, op: F) -> Result<T>
    where
        F: Fn(ElementRef) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let retry = self.inner.options.retry;
        let mut attempt: u32 = 1;

        loop {
            let element = self.resolve().await?;

            let err = match op(element).await {
                Ok(value) => return Ok(value),
                Err(err) if err.is_transient() => err,
                Err(err) => return Err(err),
            };

            if !retry.allows_retry(attempt) {
                error!(
                    locator = %self.label(),
                    action = action.as_str(),
                    attempts = attempt,
                    error = %err,
                    "Action failed after retries"
                );
                return Err(err);
            }

            debug!(
                locator = %self.label(),
                action = action.as_str(),
                attempt,
                error = %err,
                "Retrying action"
            );
            retry.pause().await;
            self.invalidate();
            attempt += 1;
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
