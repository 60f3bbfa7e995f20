//! Element locator strategies.
//!
//! Provides Selenium-like `By` selectors for finding elements.
//!
//! # Example
//!
//! ```ignore
//! use page_object::By;
//!
//! let search = By::name("q");
//! let results = By::xpath("//div[@id='rso']//div[@class='g']");
//! let submit = By::css("button[type='submit']");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// By Enum
// ============================================================================

/// Element locator strategy (like Selenium's `By`).
///
/// The serialized strategy names double as the keys accepted in a locator
/// configuration map.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "strategy", content = "value")]
pub enum By {
    /// CSS selector.
    #[serde(rename = "css")]
    Css(String),

    /// Element ID attribute.
    #[serde(rename = "id")]
    Id(String),

    /// Name attribute.
    ///
    /// # Example
    /// ```ignore
    /// By::Name("q".into())  // equivalent to By::Css("[name='q']")
    /// ```
    #[serde(rename = "name")]
    Name(String),

    /// XPath expression.
    ///
    /// Relative expressions (`.//h3/a`) are evaluated under the parent scope.
    #[serde(rename = "xpath")]
    XPath(String),

    /// Exact link text (for `<a>` elements).
    #[serde(rename = "link_text")]
    LinkText(String),

    /// Partial link text (for `<a>` elements).
    #[serde(rename = "partial_link_text")]
    PartialLinkText(String),

    /// Tag name.
    #[serde(rename = "tag_name")]
    TagName(String),

    /// Class name (single class).
    #[serde(rename = "class_name")]
    ClassName(String),
}

impl By {
    /// Strategy keys recognized in a locator configuration map.
    pub const STRATEGIES: [&'static str; 8] = [
        "css",
        "id",
        "name",
        "xpath",
        "link_text",
        "partial_link_text",
        "tag_name",
        "class_name",
    ];

    /// Creates a CSS selector.
    #[inline]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Creates an ID selector.
    #[inline]
    pub fn id(id: impl Into<String>) -> Self {
        Self::Id(id.into())
    }

    /// Creates a name attribute selector.
    #[inline]
    pub fn name(name: impl Into<String>) -> Self {
        Self::Name(name.into())
    }

    /// Creates an XPath selector.
    #[inline]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Creates a link text selector.
    #[inline]
    pub fn link_text(text: impl Into<String>) -> Self {
        Self::LinkText(text.into())
    }

    /// Creates a partial link text selector.
    #[inline]
    pub fn partial_link_text(text: impl Into<String>) -> Self {
        Self::PartialLinkText(text.into())
    }

    /// Creates a tag name selector.
    #[inline]
    pub fn tag_name(tag: impl Into<String>) -> Self {
        Self::TagName(tag.into())
    }

    /// Creates a class name selector.
    #[inline]
    pub fn class_name(class: impl Into<String>) -> Self {
        Self::ClassName(class.into())
    }

    /// Builds a locator from a configuration key and value.
    ///
    /// Returns `None` if `key` is not one of [`By::STRATEGIES`].
    #[must_use]
    pub fn from_key(key: &str, value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let by = match key {
            "css" => Self::Css(value),
            "id" => Self::Id(value),
            "name" => Self::Name(value),
            "xpath" => Self::XPath(value),
            "link_text" => Self::LinkText(value),
            "partial_link_text" => Self::PartialLinkText(value),
            "tag_name" => Self::TagName(value),
            "class_name" => Self::ClassName(value),
            _ => return None,
        };
        Some(by)
    }

    /// Returns `true` if `key` names a locator strategy.
    #[inline]
    #[must_use]
    pub fn is_strategy(key: &str) -> bool {
        Self::STRATEGIES.contains(&key)
    }

    /// Returns the strategy name.
    #[must_use]
    pub fn strategy(&self) -> &'static str {
        match self {
            Self::Css(_) => "css",
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::XPath(_) => "xpath",
            Self::LinkText(_) => "link_text",
            Self::PartialLinkText(_) => "partial_link_text",
            Self::TagName(_) => "tag_name",
            Self::ClassName(_) => "class_name",
        }
    }

    /// Returns the selector value.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Self::Css(v)
            | Self::Id(v)
            | Self::Name(v)
            | Self::XPath(v)
            | Self::LinkText(v)
            | Self::PartialLinkText(v)
            | Self::TagName(v)
            | Self::ClassName(v) => v,
        }
    }
}

impl fmt::Display for By {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.strategy(), self.value())
    }
}

// ============================================================================
// From implementations for ergonomics
// ============================================================================

impl From<&str> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: &str) -> Self {
        Self::Css(s.to_string())
    }
}

impl From<String> for By {
    /// Converts a string to CSS selector (default).
    fn from(s: String) -> Self {
        Self::Css(s)
    }
}

// ============================================================================
// Tests
// ============================================================================
