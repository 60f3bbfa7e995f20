//! Bounded polling.

use std::future::Future;
use std::time::Duration;

use tokio::time::{Instant, sleep};
use tracing::trace;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Default interval between probes (500 ms).
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// poll_until
// ============================================================================

/// Runs `probe` until it yields a value or `timeout` elapses.
///
/// The probe runs at least once, even with a zero timeout. Errors from the
/// probe end the wait immediately.
///
/// # Errors
///
/// - [`Error::Timeout`] carrying `description` when the deadline passes
/// - Any error returned by `probe`
///
/// # Example
///
/// ```ignore
/// let element = poll_until("visible name=q", timeout, DEFAULT_POLL_INTERVAL, || async {
///     Ok(dom.query(&by).filter(|node| node.visible))
/// })
/// .await?;
/// ```
pub async fn poll_until<T, F, Fut>(
    description: &str,
    timeout: Duration,
    interval: Duration,
    mut probe: F,
) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>>>,
{
    let deadline = Instant::now() + timeout;
    let mut probes: u32 = 0;

    loop {
        probes += 1;
        if let Some(value) = probe().await? {
            trace!(description, probes, "Wait condition satisfied");
            return Ok(value);
        }

        let now = Instant::now();
        if now >= deadline {
            return Err(Error::timeout(description, timeout.as_millis() as u64));
        }

        sleep(interval.min(deadline - now)).await;
    }
}

// ============================================================================
// Tests
// ============================================================================
