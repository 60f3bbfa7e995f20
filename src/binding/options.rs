//! Retry and resolution options for bindings.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use page_object::{BindingOptions, ResolvePolicy, RetryPolicy};
//!
//! let options = BindingOptions::new()
//!     .with_retry(RetryPolicy::new().with_max_attempts(5))
//!     .with_resolve(ResolvePolicy::AlwaysRefind);
//! ```

use std::time::Duration;

use tokio::time::sleep;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default number of attempts per action or lookup.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// Default delay between attempts (1 second).
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_secs(1);

// ============================================================================
// RetryPolicy
// ============================================================================

/// Bounds how transient failures are retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one.
    pub max_attempts: u32,

    /// Pause before each retry.
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryPolicy {
    /// Creates the default policy: 3 attempts, 1 second apart.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: DEFAULT_RETRY_DELAY,
        }
    }

    /// Creates a policy that retries without pausing.
    #[inline]
    #[must_use]
    pub const fn immediate() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            delay: Duration::ZERO,
        }
    }

    /// Sets the total number of attempts.
    #[inline]
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the pause between attempts.
    #[inline]
    #[must_use]
    pub const fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns `true` if another attempt may follow attempt number `attempt`.
    #[inline]
    #[must_use]
    pub const fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }

    /// Sleeps for the configured delay.
    pub(crate) async fn pause(&self) {
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
    }

    /// Validates the policy.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if `max_attempts` is zero.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(Error::validation("max_attempts must be at least 1"));
        }
        Ok(())
    }
}

// ============================================================================
// ResolvePolicy
// ============================================================================

/// When a binding contacts the session to resolve its element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResolvePolicy {
    /// Resolve once and reuse the reference until it is invalidated.
    #[default]
    Memoize,

    /// Re-run the lookup before every action.
    ///
    /// For content that is re-rendered without the old node becoming stale,
    /// where only a fresh lookup sees the new node.
    AlwaysRefind,
}

// ============================================================================
// BindingOptions
// ============================================================================

/// Options shared by the bindings of a page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BindingOptions {
    /// Retry policy for actions and lookups.
    pub retry: RetryPolicy,

    /// Resolution policy.
    pub resolve: ResolvePolicy,
}

impl BindingOptions {
    /// Creates options with default settings.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            retry: RetryPolicy::new(),
            resolve: ResolvePolicy::Memoize,
        }
    }

    /// Sets the retry policy.
    #[inline]
    #[must_use]
    pub const fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Sets the resolution policy.
    #[inline]
    #[must_use]
    pub const fn with_resolve(mut self, resolve: ResolvePolicy) -> Self {
        self.resolve = resolve;
        self
    }

    /// Validates the options.
    ///
    /// # Errors
    ///
    /// [`Error::Validation`] if the retry policy is invalid.
    pub fn validate(&self) -> Result<()> {
        self.retry.validate()
    }
}

// ============================================================================
// Tests
// ============================================================================
