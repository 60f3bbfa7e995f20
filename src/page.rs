//! Page objects.
//!
//! A [`Page`] wraps a session and is the factory for top-level bindings. A
//! page struct implements [`PageObject`] and declares its bindings as fields,
//! so nothing is located until a field is used.
//!
//! # Example
//!
//! ```ignore
//! struct SearchPage {
//!     page: Page,
//!     search_box: ElementBinding,
//! }
//!
//! impl SearchPage {
//!     fn new(session: Arc<dyn Session>) -> Result<Self> {
//!         let page = Page::new(session);
//!         Ok(Self {
//!             search_box: page.element(LocatorSpec::single(By::name("q")))?,
//!             page,
//!         })
//!     }
//! }
//!
//! impl PageObject for SearchPage {
//!     fn page(&self) -> &Page {
//!         &self.page
//!     }
//!
//!     fn url(&self) -> Option<&str> {
//!         Some("www.google.com")
//!     }
//! }
//!
//! let search = SearchPage::new(session)?;
//! search.open().await?;
//! search.search_box.send_keys("python").await?;
//! ```

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::binding::{BindingOptions, ElementBinding, ElementListBinding};
use crate::error::{Error, Result};
use crate::locator::{Arity, LocatorSpec};
use crate::session::Session;

// ============================================================================
// Page
// ============================================================================

/// A session plus the options new bindings are declared with.
#[derive(Clone)]
pub struct Page {
    session: Arc<dyn Session>,
    options: BindingOptions,
}

impl fmt::Debug for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Page")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Page {
    /// Creates a page with default binding options.
    #[must_use]
    pub fn new(session: Arc<dyn Session>) -> Self {
        Self {
            session,
            options: BindingOptions::new(),
        }
    }

    /// Creates a page with custom binding options.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if `options` are invalid.
    pub fn with_options(session: Arc<dyn Session>, options: BindingOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { session, options })
    }

    /// Returns the session.
    #[inline]
    #[must_use]
    pub fn session(&self) -> &Arc<dyn Session> {
        &self.session
    }

    /// Returns the default binding options.
    #[inline]
    #[must_use]
    pub fn options(&self) -> BindingOptions {
        self.options
    }

    /// Returns the current document title.
    pub async fn title(&self) -> Result<String> {
        self.session.title().await
    }
}

// ============================================================================
// Page - Binding Factories
// ============================================================================

impl Page {
    /// Declares a document-scoped element.
    pub fn element(&self, spec: LocatorSpec) -> Result<ElementBinding> {
        self.element_with(spec, self.options)
    }

    /// Declares a document-scoped element with its own options.
    pub fn element_with(&self, spec: LocatorSpec, options: BindingOptions) -> Result<ElementBinding> {
        ElementBinding::new(spec, Arc::clone(&self.session), None, options)
    }

    /// Declares a document-scoped element list.
    pub fn elements(&self, spec: LocatorSpec) -> Result<ElementListBinding> {
        self.elements_with(spec, self.options)
    }

    /// Declares a document-scoped element list with its own options.
    pub fn elements_with(
        &self,
        spec: LocatorSpec,
        options: BindingOptions,
    ) -> Result<ElementListBinding> {
        ElementListBinding::new(spec, Arc::clone(&self.session), None, options)
    }

    /// Declares an element from a configuration map such as
    /// `{"name": "q", "wait_condition": "clickable"}`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the map is not a valid single-element locator.
    pub fn element_from_config(&self, config: &Value) -> Result<ElementBinding> {
        self.element(LocatorSpec::from_config(config, Arity::Single)?)
    }

    /// Declares an element list from a configuration map.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the map is not a valid collection locator.
    pub fn elements_from_config(&self, config: &Value) -> Result<ElementListBinding> {
        self.elements(LocatorSpec::from_config(config, Arity::Collection)?)
    }
}

// ============================================================================
// PageObject
// ============================================================================

/// A page struct whose fields are bindings.
#[async_trait]
pub trait PageObject: Send + Sync {
    /// Returns the underlying page.
    fn page(&self) -> &Page;

    /// Returns the address [`open`](Self::open) navigates to.
    fn url(&self) -> Option<&str> {
        None
    }

    /// Navigates to [`url`](Self::url).
    ///
    /// # Errors
    ///
    /// - [`Error::Validation`] if the page has no URL
    /// - [`Error::InvalidUrl`] if the URL cannot be parsed
    async fn open(&self) -> Result<()> {
        let raw = self
            .url()
            .ok_or_else(|| Error::validation("page object has no url"))?;
        let url = normalize_url(raw)?;

        debug!(url = %url, "Opening page");
        self.page().session().goto(url.as_str()).await
    }

    /// Returns the current document title.
    async fn title(&self) -> Result<String> {
        self.page().title().await
    }
}

// ============================================================================
// URL Normalization
// ============================================================================

/// Parses a page address, assuming `http://` when no scheme is given.
///
/// # Errors
///
/// [`Error::InvalidUrl`] if the address cannot be parsed.
pub fn normalize_url(raw: &str) -> Result<Url> {
    let raw = raw.trim();
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("http://{raw}")
    };

    Url::parse(&candidate).map_err(|e| Error::invalid_url(raw, e.to_string()))
}

// ============================================================================
// Tests
// ============================================================================
