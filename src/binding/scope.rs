//! Parent scope lookup and stale-scope recovery.

use std::future::Future;
use std::sync::Weak;

use tracing::{debug, error};

use crate::error::{Error, Result};
use crate::locator::LocatorSpec;
use crate::session::Scope;

use super::element::{BindingInner, ElementBinding};
use super::options::RetryPolicy;

// ============================================================================
// Scope Resolution
// ============================================================================

/// Upgrades a weak parent pointer, failing if the parent was dropped.
pub(crate) fn upgrade_parent(
    parent: &Weak<BindingInner>,
    spec: &LocatorSpec,
) -> Result<ElementBinding> {
    parent
        .upgrade()
        .map(ElementBinding::from_inner)
        .ok_or_else(|| Error::scope_dropped(spec.to_string()))
}

/// Returns the scope a query runs under, resolving the parent if needed.
async fn scope_of(parent: Option<&Weak<BindingInner>>, spec: &LocatorSpec) -> Result<Scope> {
    match parent {
        None => Ok(Scope::Document),
        Some(weak) => {
            let parent = upgrade_parent(weak, spec)?;
            Ok(Scope::Element(parent.resolve().await?))
        }
    }
}

/// Runs `query` under the parent scope, healing a stale parent chain.
///
/// A stale error from the query means the scope element is gone: the parent
/// is refreshed (which heals its own ancestors first) and the query runs
/// again, up to `retry.max_attempts` times in total. Timeouts are reported
/// with `spec` prefixed to the session's description.
pub(crate) async fn find_in_scope<T, F, Fut>(
    spec: &LocatorSpec,
    parent: Option<&Weak<BindingInner>>,
    retry: &RetryPolicy,
    mut query: F,
) -> Result<T>
where
    F: FnMut(Scope) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt: u32 = 1;

    loop {
        let scope = scope_of(parent, spec).await?;

        let err = match query(scope).await {
            Ok(found) => return Ok(found),
            Err(err) if err.is_stale() => err,
            Err(Error::Timeout {
                operation,
                timeout_ms,
            }) => return Err(Error::timeout(format!("{spec}: {operation}"), timeout_ms)),
            Err(err) => return Err(err),
        };

        // Staleness at document scope has no parent to heal.
        let Some(weak) = parent else {
            return Err(err);
        };

        if !retry.allows_retry(attempt) {
            error!(locator = %spec, attempts = attempt, error = %err, "Scope still stale after retries");
            return Err(err);
        }

        debug!(locator = %spec, attempt, "Scope went stale, refreshing parent");
        upgrade_parent(weak, spec)?.refresh().await?;
        retry.pause().await;
        attempt += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
