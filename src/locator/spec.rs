//! Validated locator specifications.
//!
//! A [`LocatorSpec`] pairs a [`By`] locator with the wait policy used to
//! resolve it. Specs are immutable and always valid for their [`Arity`]:
//! every check happens at construction, before any session is contacted.
//!
//! # Example
//!
//! ```ignore
//! use page_object::{Arity, By, LocatorSpec, WaitCondition};
//! use serde_json::json;
//!
//! // From a configuration map
//! let search = LocatorSpec::from_config(&json!({"name": "q"}), Arity::Single)?;
//!
//! // Typed
//! let button = LocatorSpec::single(By::name("btnG"))
//!     .with_condition(WaitCondition::Clickable)?
//!     .with_timeout_secs(5)?;
//! ```

use std::fmt;
use std::time::Duration;

use serde_json::Value;

use crate::error::{Error, Result};

use super::condition::{
    Arity, CollectionPredicate, ElementPredicate, WaitCondition, collection_conditions,
    element_conditions,
};
use super::selector::By;

// ============================================================================
// Constants
// ============================================================================

/// Default wait timeout in seconds.
pub const DEFAULT_WAIT_TIMEOUT_SECS: u64 = 10;

/// Maximum number of keys in a locator configuration map.
const MAX_CONFIG_KEYS: usize = 2;

/// Configuration key for the wait condition.
const KEY_WAIT_CONDITION: &str = "wait_condition";

/// Configuration key for the wait timeout.
const KEY_WAIT_TIMEOUT: &str = "wait_timeout";

// ============================================================================
// LocatorSpec
// ============================================================================

/// Immutable description of how to find and wait for elements.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LocatorSpec {
    by: By,
    wait_condition: WaitCondition,
    wait_timeout_secs: u64,
    arity: Arity,
}

// ============================================================================
// LocatorSpec - Constructors
// ============================================================================

impl LocatorSpec {
    /// Creates a single-element spec with the default wait policy.
    #[must_use]
    pub fn single(by: impl Into<By>) -> Self {
        Self::with_defaults(by.into(), Arity::Single)
    }

    /// Creates a collection spec with the default wait policy.
    #[must_use]
    pub fn collection(by: impl Into<By>) -> Self {
        Self::with_defaults(by.into(), Arity::Collection)
    }

    fn with_defaults(by: By, arity: Arity) -> Self {
        Self {
            by,
            wait_condition: WaitCondition::default(),
            wait_timeout_secs: DEFAULT_WAIT_TIMEOUT_SECS,
            arity,
        }
    }

    /// Replaces the wait condition.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the condition is not registered for this
    /// spec's arity.
    pub fn with_condition(mut self, condition: WaitCondition) -> Result<Self> {
        if !self.arity.supports(condition) {
            return Err(Error::validation(format!(
                "wait_condition '{condition}' is not valid for a {} binding",
                self.arity
            )));
        }
        self.wait_condition = condition;
        Ok(self)
    }

    /// Replaces the wait timeout.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if `secs` is zero.
    pub fn with_timeout_secs(mut self, secs: u64) -> Result<Self> {
        if secs == 0 {
            return Err(Error::validation("wait_timeout must be a positive integer"));
        }
        self.wait_timeout_secs = secs;
        Ok(self)
    }

    /// Builds a spec from a configuration map.
    ///
    /// The map holds exactly one strategy key (see [`By::STRATEGIES`]) and at
    /// most one of `wait_condition` / `wait_timeout`.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] when the map is not an object, has no strategy
    /// key, more than one strategy key, more than two keys, an unrecognized
    /// key, a condition unknown to this arity, or a timeout that is not a
    /// positive integer.
    pub fn from_config(config: &Value, arity: Arity) -> Result<Self> {
        let map = config
            .as_object()
            .ok_or_else(|| Error::validation("locator configuration must be an object"))?;

        if map.len() > MAX_CONFIG_KEYS {
            return Err(Error::validation(format!(
                "locator takes at most {MAX_CONFIG_KEYS} keys, {} given",
                map.len()
            )));
        }

        let mut by = None;
        let mut condition = None;
        let mut timeout = None;

        for (key, value) in map {
            if By::is_strategy(key) {
                if by.is_some() {
                    return Err(Error::validation("more than one locator strategy given"));
                }
                let selector = value.as_str().ok_or_else(|| {
                    Error::validation(format!("locator '{key}' must be a string"))
                })?;
                by = By::from_key(key, selector);
                continue;
            }

            match key.as_str() {
                KEY_WAIT_CONDITION => {
                    let name = value.as_str().ok_or_else(|| {
                        Error::validation("wait_condition must be a string")
                    })?;
                    condition = Some(name.parse::<WaitCondition>()?);
                }
                KEY_WAIT_TIMEOUT => {
                    let secs = value
                        .as_u64()
                        .filter(|secs| *secs > 0)
                        .ok_or_else(|| {
                            Error::validation("wait_timeout must be a positive integer")
                        })?;
                    timeout = Some(secs);
                }
                other => {
                    return Err(Error::validation(format!(
                        "unrecognized locator key '{other}'"
                    )));
                }
            }
        }

        let by = by.ok_or_else(|| Error::validation("no locator strategy given"))?;
        let mut spec = Self::with_defaults(by, arity);
        if let Some(condition) = condition {
            spec = spec.with_condition(condition)?;
        }
        if let Some(secs) = timeout {
            spec = spec.with_timeout_secs(secs)?;
        }
        Ok(spec)
    }
}

// ============================================================================
// LocatorSpec - Accessors
// ============================================================================

impl LocatorSpec {
    /// Returns the locator.
    #[inline]
    #[must_use]
    pub fn by(&self) -> &By {
        &self.by
    }

    /// Returns the wait condition.
    #[inline]
    #[must_use]
    pub fn wait_condition(&self) -> WaitCondition {
        self.wait_condition
    }

    /// Returns the wait timeout.
    #[inline]
    #[must_use]
    pub fn wait_timeout(&self) -> Duration {
        Duration::from_secs(self.wait_timeout_secs)
    }

    /// Returns the wait timeout in whole seconds.
    #[inline]
    #[must_use]
    pub fn wait_timeout_secs(&self) -> u64 {
        self.wait_timeout_secs
    }

    /// Returns the arity this spec was validated for.
    #[inline]
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Returns the single-element predicate, if this is a single spec.
    #[must_use]
    pub fn element_predicate(&self) -> Option<ElementPredicate> {
        match self.arity {
            Arity::Single => element_conditions().get(self.wait_condition),
            Arity::Collection => None,
        }
    }

    /// Returns the collection predicate, if this is a collection spec.
    #[must_use]
    pub fn collection_predicate(&self) -> Option<CollectionPredicate> {
        match self.arity {
            Arity::Single => None,
            Arity::Collection => collection_conditions().get(self.wait_condition),
        }
    }

    /// Ensures this spec was built for `arity`.
    pub(crate) fn expect_arity(&self, arity: Arity) -> Result<()> {
        if self.arity == arity {
            Ok(())
        } else {
            Err(Error::validation(format!(
                "{self} is a {} locator, expected {arity}",
                self.arity
            )))
        }
    }
}

impl fmt::Display for LocatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ({}s)",
            self.wait_condition, self.by, self.wait_timeout_secs
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let spec = LocatorSpec::from_config(&json!({"name": "q"}), Arity::Single).unwrap();
        assert_eq!(spec.by(), &By::name("q"));
        assert_eq!(spec.wait_condition(), WaitCondition::Visible);
        assert_eq!(spec.wait_timeout(), Duration::from_secs(10));
        assert_eq!(spec.element_predicate(), Some(ElementPredicate::Visible));
        assert_eq!(spec.collection_predicate(), None);
    }

    #[test]
    fn test_condition_and_timeout() {
        let spec = LocatorSpec::from_config(
            &json!({"css": "#go", "wait_condition": "clickable"}),
            Arity::Single,
        )
        .unwrap();
        assert_eq!(spec.wait_condition(), WaitCondition::Clickable);

        let spec =
            LocatorSpec::from_config(&json!({"id": "go", "wait_timeout": 5}), Arity::Single)
                .unwrap();
        assert_eq!(spec.wait_timeout_secs(), 5);
    }

    #[test]
    fn test_three_keys_rejected() {
        let err = LocatorSpec::from_config(
            &json!({"css": ".x", "xpath": "//y", "wait_timeout": 5}),
            Arity::Single,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_two_strategies_rejected() {
        let err = LocatorSpec::from_config(&json!({"css": ".x", "xpath": "//y"}), Arity::Single)
            .unwrap_err();
        assert_eq!(
            err,
            Error::validation("more than one locator strategy given")
        );
    }

    #[test]
    fn test_missing_strategy_rejected() {
        for config in [json!({}), json!({"wait_timeout": 3})] {
            let err = LocatorSpec::from_config(&config, Arity::Single).unwrap_err();
            assert_eq!(err, Error::validation("no locator strategy given"));
        }
    }

    #[test]
    fn test_unrecognized_key_rejected() {
        let err = LocatorSpec::from_config(&json!({"css": ".x", "retries": 2}), Arity::Single)
            .unwrap_err();
        assert_eq!(err, Error::validation("unrecognized locator key 'retries'"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(LocatorSpec::from_config(&json!("css=.x"), Arity::Single).is_err());
    }

    #[test]
    fn test_non_integer_timeout_rejected() {
        for timeout in [json!(0), json!(-3), json!(2.5), json!("10")] {
            let config = json!({"css": ".x", "wait_timeout": timeout});
            assert!(LocatorSpec::from_config(&config, Arity::Single).is_err());
        }
    }

    #[test]
    fn test_collection_rejects_element_only_conditions() {
        let err = LocatorSpec::from_config(
            &json!({"xpath": "//div", "wait_condition": "clickable"}),
            Arity::Collection,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));

        let spec = LocatorSpec::from_config(
            &json!({"xpath": "//div", "wait_condition": "presence"}),
            Arity::Collection,
        )
        .unwrap();
        assert_eq!(
            spec.collection_predicate(),
            Some(CollectionPredicate::AllPresent)
        );
    }

    #[test]
    fn test_typed_builder_validates() {
        assert!(LocatorSpec::single(By::id("x")).with_timeout_secs(0).is_err());
        assert!(
            LocatorSpec::collection(By::id("x"))
                .with_condition(WaitCondition::Selected)
                .is_err()
        );
        let spec = LocatorSpec::single(By::id("x"))
            .with_condition(WaitCondition::Selected)
            .unwrap();
        assert_eq!(spec.element_predicate(), Some(ElementPredicate::Selected));
    }

    #[test]
    fn test_expect_arity() {
        let spec = LocatorSpec::collection(By::css(".g"));
        assert!(spec.expect_arity(Arity::Collection).is_ok());
        assert!(spec.expect_arity(Arity::Single).is_err());
    }

    #[test]
    fn test_display() {
        let spec = LocatorSpec::single(By::name("q"));
        assert_eq!(spec.to_string(), "visible name=q (10s)");
    }

    fn strategy_key() -> impl Strategy<Value = &'static str> {
        prop::sample::select(By::STRATEGIES.to_vec())
    }

    proptest! {
        #[test]
        fn prop_single_strategy_key_always_accepted(key in strategy_key(), value in "[a-z#./]{1,12}") {
            let config = json!({ key: value.clone() });
            let spec = LocatorSpec::from_config(&config, Arity::Single).unwrap();
            prop_assert_eq!(spec.by().strategy(), key);
            prop_assert_eq!(spec.by().value(), value.as_str());
        }

        #[test]
        fn prop_positive_timeout_accepted(key in strategy_key(), secs in 1u64..3600) {
            let config = json!({ key: "v", "wait_timeout": secs });
            let spec = LocatorSpec::from_config(&config, Arity::Collection).unwrap();
            prop_assert_eq!(spec.wait_timeout_secs(), secs);
        }

        #[test]
        fn prop_non_positive_timeout_rejected(key in strategy_key(), secs in -3600i64..=0) {
            let config = json!({ key: "v", "wait_timeout": secs });
            prop_assert!(LocatorSpec::from_config(&config, Arity::Single).is_err());
        }

        #[test]
        fn prop_unknown_condition_rejected(key in strategy_key(), name in "[a-z]{3,10}") {
            prop_assume!(name.parse::<WaitCondition>().is_err());
            let config = json!({ key: "v", "wait_condition": name });
            prop_assert!(LocatorSpec::from_config(&config, Arity::Single).is_err());
        }

        #[test]
        fn prop_more_than_two_keys_rejected(key in strategy_key(), secs in 1u64..60) {
            let config = json!({ key: "v", "wait_timeout": secs, "wait_condition": "visible" });
            prop_assert!(LocatorSpec::from_config(&config, Arity::Single).is_err());
        }
    }
}
