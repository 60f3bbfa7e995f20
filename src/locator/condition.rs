//! Wait conditions and their registries.
//!
//! A [`WaitCondition`] is the name a page declares; the registries map each
//! name to the predicate the session evaluates while polling. There is one
//! registry per binding arity:
//!
//! | Condition | Single element | Collection |
//! |-----------|----------------|------------|
//! | `presence` | [`ElementPredicate::Present`] | [`CollectionPredicate::AllPresent`] |
//! | `visible` | [`ElementPredicate::Visible`] | [`CollectionPredicate::AnyVisible`] |
//! | `frame_available` | [`ElementPredicate::FrameAvailable`] | - |
//! | `invisible` | [`ElementPredicate::Invisible`] | - |
//! | `nopresence` | [`ElementPredicate::Invisible`] | - |
//! | `clickable` | [`ElementPredicate::Clickable`] | - |
//! | `selected` | [`ElementPredicate::Selected`] | - |
//!
//! Both registries are built once and never mutated.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

// ============================================================================
// WaitCondition
// ============================================================================

/// Readiness condition declared on a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaitCondition {
    /// Element is attached to the DOM.
    Presence,
    /// Element is attached and displayed.
    Visible,
    /// Element is a frame and the session switched into it.
    FrameAvailable,
    /// Element is hidden or absent.
    Invisible,
    /// Element is absent (evaluated like `invisible`).
    Nopresence,
    /// Element is displayed and enabled.
    Clickable,
    /// Element is selected.
    Selected,
}

impl Default for WaitCondition {
    fn default() -> Self {
        Self::Visible
    }
}

impl WaitCondition {
    /// All condition names, in declaration order.
    pub const ALL: [WaitCondition; 7] = [
        Self::Presence,
        Self::Visible,
        Self::FrameAvailable,
        Self::Invisible,
        Self::Nopresence,
        Self::Clickable,
        Self::Selected,
    ];

    /// Returns the configuration name of this condition.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Presence => "presence",
            Self::Visible => "visible",
            Self::FrameAvailable => "frame_available",
            Self::Invisible => "invisible",
            Self::Nopresence => "nopresence",
            Self::Clickable => "clickable",
            Self::Selected => "selected",
        }
    }
}

impl fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for WaitCondition {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| Error::validation(format!("unknown wait_condition '{s}'")))
    }
}

// ============================================================================
// Predicates
// ============================================================================

/// Predicate a session polls for a single element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementPredicate {
    /// At least one node matches.
    Present,
    /// A matching node is displayed.
    Visible,
    /// A matching frame exists; the session switches into it.
    FrameAvailable,
    /// No matching node is displayed (absence counts).
    Invisible,
    /// A matching node is displayed and enabled.
    Clickable,
    /// A matching node is selected.
    Selected,
}

impl ElementPredicate {
    /// Returns `true` if the predicate can hold with no matching node.
    #[inline]
    #[must_use]
    pub fn allows_absence(&self) -> bool {
        matches!(self, Self::Invisible)
    }
}

/// Predicate a session polls for a collection of elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionPredicate {
    /// At least one node matches; yields all matches.
    AllPresent,
    /// At least one match is displayed; yields the displayed matches.
    AnyVisible,
}

// ============================================================================
// Arity
// ============================================================================

/// Whether a locator binds one element or a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Arity {
    /// One element, resolved with [`ElementPredicate`]s.
    Single,
    /// An ordered collection, resolved with [`CollectionPredicate`]s.
    Collection,
}

impl Arity {
    /// Returns `true` if this arity's registry knows `condition`.
    #[must_use]
    pub fn supports(&self, condition: WaitCondition) -> bool {
        match self {
            Self::Single => element_conditions().contains(condition),
            Self::Collection => collection_conditions().contains(condition),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single => f.write_str("single"),
            Self::Collection => f.write_str("collection"),
        }
    }
}

// ============================================================================
// ConditionRegistry
// ============================================================================

/// Immutable lookup table from condition name to predicate.
#[derive(Debug)]
pub struct ConditionRegistry<P> {
    entries: FxHashMap<WaitCondition, P>,
}

impl<P: Copy> ConditionRegistry<P> {
    fn from_entries(entries: impl IntoIterator<Item = (WaitCondition, P)>) -> Self {
        Self {
            entries: entries.into_iter().collect(),
        }
    }

    /// Looks up the predicate for a condition.
    #[inline]
    #[must_use]
    pub fn get(&self, condition: WaitCondition) -> Option<P> {
        self.entries.get(&condition).copied()
    }

    /// Returns `true` if the condition is registered.
    #[inline]
    #[must_use]
    pub fn contains(&self, condition: WaitCondition) -> bool {
        self.entries.contains_key(&condition)
    }

    /// Returns the number of registered conditions.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if nothing is registered.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

static ELEMENT_CONDITIONS: LazyLock<ConditionRegistry<ElementPredicate>> = LazyLock::new(|| {
    ConditionRegistry::from_entries([
        (WaitCondition::Presence, ElementPredicate::Present),
        (WaitCondition::Visible, ElementPredicate::Visible),
        (WaitCondition::FrameAvailable, ElementPredicate::FrameAvailable),
        (WaitCondition::Invisible, ElementPredicate::Invisible),
        (WaitCondition::Nopresence, ElementPredicate::Invisible),
        (WaitCondition::Clickable, ElementPredicate::Clickable),
        (WaitCondition::Selected, ElementPredicate::Selected),
    ])
});

static COLLECTION_CONDITIONS: LazyLock<ConditionRegistry<CollectionPredicate>> =
    LazyLock::new(|| {
        ConditionRegistry::from_entries([
            (WaitCondition::Presence, CollectionPredicate::AllPresent),
            (WaitCondition::Visible, CollectionPredicate::AnyVisible),
        ])
    });

/// Registry of single-element conditions.
#[inline]
#[must_use]
pub fn element_conditions() -> &'static ConditionRegistry<ElementPredicate> {
    &ELEMENT_CONDITIONS
}

/// Registry of collection conditions.
#[inline]
#[must_use]
pub fn collection_conditions() -> &'static ConditionRegistry<CollectionPredicate> {
    &COLLECTION_CONDITIONS
}

// ============================================================================
// Tests
// ============================================================================
