// Timeout settings - layered defaults for actions and navigations
//
// A page's settings sit on top of its context's settings, which are seeded
// from TestConfig. Lookups walk per-call override -> page -> context and stop
// at the first value that was set. A value of zero is "set" and means no
// limit; an unset chain means no limit as well.

use crate::error::{Error, Result};
use parking_lot::Mutex;
use serde::Serialize;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Level of the timeout hierarchy, from broadest to narrowest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TimeoutScope {
    /// Whole run (`globalTimeout`)
    Global,
    /// One test including its hooks (`timeout`)
    Test,
    /// One interactive or extraction call (`actionTimeout`)
    Action,
    /// `goto`, `reload`, `wait_for_load_state` (`navigationTimeout`)
    Navigation,
    /// One polling assertion (`expect.timeout`)
    Assertion,
}

impl fmt::Display for TimeoutScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeoutScope::Global => "Global",
            TimeoutScope::Test => "Test",
            TimeoutScope::Action => "Action",
            TimeoutScope::Navigation => "Navigation",
            TimeoutScope::Assertion => "Assertion",
        };
        f.write_str(name)
    }
}

/// Maps "zero means unlimited" onto `None`.
pub fn limit(timeout: Duration) -> Option<Duration> {
    (!timeout.is_zero()).then_some(timeout)
}

/// Converts a per-call millisecond override (as taken by the option builders).
pub(crate) fn from_millis(ms: f64) -> Duration {
    if ms.is_finite() && ms > 0.0 {
        Duration::from_secs_f64(ms / 1000.0)
    } else {
        Duration::ZERO
    }
}

pub(crate) fn as_millis(timeout: Duration) -> u64 {
    u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX)
}

/// Default action and navigation timeouts for one level (context or page).
#[derive(Debug, Default)]
pub struct TimeoutSettings {
    parent: Option<Arc<TimeoutSettings>>,
    default_timeout: Mutex<Option<Duration>>,
    default_navigation_timeout: Mutex<Option<Duration>>,
}

impl TimeoutSettings {
    /// Root settings (a browser context).
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings layered over `parent` (a page over its context).
    pub fn with_parent(parent: Arc<TimeoutSettings>) -> Self {
        Self {
            parent: Some(parent),
            ..Self::default()
        }
    }

    pub fn set_default_timeout(&self, timeout: Duration) {
        *self.default_timeout.lock() = Some(timeout);
    }

    pub fn set_default_navigation_timeout(&self, timeout: Duration) {
        *self.default_navigation_timeout.lock() = Some(timeout);
    }

    fn action_default(&self) -> Option<Duration> {
        let own = *self.default_timeout.lock();
        own.or_else(|| self.parent.as_ref().and_then(|p| p.action_default()))
    }

    fn navigation_default(&self) -> Option<Duration> {
        let own = *self.default_navigation_timeout.lock();
        let own = own.or(*self.default_timeout.lock());
        own.or_else(|| self.parent.as_ref().and_then(|p| p.navigation_default()))
    }

    /// Timeout for an action; `None` means wait indefinitely.
    pub fn timeout(&self, per_call: Option<Duration>) -> Option<Duration> {
        per_call.or_else(|| self.action_default()).and_then(limit)
    }

    /// Timeout for a navigation; falls back to the action default of the
    /// same level before consulting the parent.
    pub fn navigation_timeout(&self, per_call: Option<Duration>) -> Option<Duration> {
        per_call.or_else(|| self.navigation_default()).and_then(limit)
    }
}

/// Start time and budget of one timed operation.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    start: Instant,
    timeout: Option<Duration>,
}

impl Deadline {
    pub fn new(timeout: Option<Duration>) -> Self {
        Self {
            start: Instant::now(),
            timeout,
        }
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Budget in milliseconds, 0 when unlimited.
    pub fn timeout_ms(&self) -> u64 {
        self.timeout.map(as_millis).unwrap_or(0)
    }

    pub fn is_expired(&self) -> bool {
        self.timeout
            .is_some_and(|t| self.start.elapsed() >= t)
    }

    /// How long to sleep before the next poll: `interval`, cut short so the
    /// deadline itself is observed.
    pub fn next_sleep(&self, interval: Duration) -> Duration {
        match self.timeout {
            Some(t) => interval.min(t.saturating_sub(self.start.elapsed())),
            None => interval,
        }
    }
}

/// Runs `future` under `timeout`, reporting expiry as a timeout of `scope`.
///
/// The future is dropped when the budget runs out, which cancels every
/// operation nested inside it.
pub async fn run_with_timeout<T, F>(
    scope: TimeoutScope,
    timeout: Option<Duration>,
    context: impl Into<String>,
    future: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match timeout {
        None => future.await,
        Some(limit) => match tokio::time::timeout(limit, future).await {
            Ok(result) => result,
            Err(_) => {
                let context = context.into();
                tracing::warn!(%scope, timeout_ms = as_millis(limit), %context, "Timeout exceeded");
                Err(Error::Timeout {
                    scope,
                    timeout_ms: as_millis(limit),
                    context: (!context.is_empty()).then_some(context),
                })
            }
        },
    }
}
