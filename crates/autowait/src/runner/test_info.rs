// TestInfo - per-test state shared with the test body
//
// Carries the test's title, its adjustable timeout and the soft assertion
// failures recorded so far. The runner watches `deadline()` and is woken
// through a Notify whenever the body changes the timeout.

use crate::assertions::Expectation;
use crate::error::Error;
use crate::protocol::Locator;
use crate::protocol::timeout_settings::{from_millis, limit};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::sync::futures::Notified;
use tokio::time::Instant;

/// Information about the running test.
///
/// Cloning is cheap; every clone refers to the same test.
///
/// See: <https://playwright.dev/docs/api/class-testinfo>
#[derive(Clone)]
pub struct TestInfo {
    inner: Arc<Inner>,
}

struct Inner {
    suite: String,
    title: String,
    started: Instant,
    timeout: Mutex<Option<Duration>>,
    timeout_changed: Notify,
    assertion_timeout: Option<Duration>,
    soft_failures: Mutex<Vec<String>>,
}

impl TestInfo {
    pub(crate) fn new(
        suite: &str,
        title: &str,
        timeout: Option<Duration>,
        assertion_timeout: Option<Duration>,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                suite: suite.to_string(),
                title: title.to_string(),
                started: Instant::now(),
                timeout: Mutex::new(timeout),
                timeout_changed: Notify::new(),
                assertion_timeout,
                soft_failures: Mutex::new(Vec::new()),
            }),
        }
    }

    /// A TestInfo not driven by a runner, with the default timeouts.
    ///
    /// Useful for collecting soft assertion failures in plain `#[tokio::test]`
    /// functions.
    pub fn detached(title: &str) -> Self {
        Self::new(
            "",
            title,
            Some(crate::DEFAULT_TEST_TIMEOUT),
            Some(crate::DEFAULT_ASSERTION_TIMEOUT),
        )
    }

    pub fn title(&self) -> &str {
        &self.inner.title
    }

    pub fn suite(&self) -> &str {
        &self.inner.suite
    }

    /// Changes the running test's timeout, in milliseconds, measured from the
    /// start of the test. Zero disables it.
    ///
    /// See: <https://playwright.dev/docs/api/class-test#test-set-timeout>
    pub fn set_timeout(&self, timeout_ms: f64) {
        let timeout = limit(from_millis(timeout_ms));
        *self.inner.timeout.lock() = timeout;
        tracing::debug!(test = %self.inner.title, ?timeout, "Test timeout changed");
        self.inner.timeout_changed.notify_one();
    }

    /// Current timeout of the test; `None` when disabled.
    pub fn timeout(&self) -> Option<Duration> {
        *self.inner.timeout.lock()
    }

    /// Time since the test (including its hooks) started.
    pub fn elapsed(&self) -> Duration {
        self.inner.started.elapsed()
    }

    pub(crate) fn deadline(&self) -> Option<Instant> {
        self.timeout().map(|t| self.inner.started + t)
    }

    pub(crate) fn timeout_changed(&self) -> Notified<'_> {
        self.inner.timeout_changed.notified()
    }

    pub(crate) fn record_soft_failure(&self, error: &Error) {
        tracing::warn!(test = %self.inner.title, %error, "Soft assertion failed");
        self.inner.soft_failures.lock().push(error.to_string());
    }

    /// Messages of the soft assertions that failed so far.
    pub fn soft_failures(&self) -> Vec<String> {
        self.inner.soft_failures.lock().clone()
    }

    pub fn has_soft_failures(&self) -> bool {
        !self.inner.soft_failures.lock().is_empty()
    }

    /// `expect(locator)` using the run's configured assertion timeout.
    pub fn expect(&self, locator: Locator) -> Expectation {
        Expectation::new(locator).with_timeout(self.inner.assertion_timeout.unwrap_or_default())
    }

    /// `expect.soft(locator)`: failures are recorded on this test.
    pub fn expect_soft(&self, locator: Locator) -> Expectation {
        self.expect(locator).soft(self)
    }
}

impl fmt::Debug for TestInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestInfo")
            .field("suite", &self.inner.suite)
            .field("title", &self.inner.title)
            .field("timeout", &self.timeout())
            .field("soft_failures", &self.inner.soft_failures.lock().len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_timeout_moves_deadline() {
        let info = TestInfo::new("suite", "t", Some(Duration::from_secs(30)), None);
        let start = Instant::now();
        tokio::time::advance(Duration::from_secs(1)).await;
        info.set_timeout(5000.0);
        assert_eq!(info.deadline(), Some(start + Duration::from_secs(5)));

        info.set_timeout(0.0);
        assert_eq!(info.deadline(), None);
    }

    #[tokio::test]
    async fn test_timeout_change_is_not_lost() {
        let info = TestInfo::detached("t");
        info.set_timeout(1000.0);
        // The permit stored by set_timeout completes the next wait at once.
        info.timeout_changed().await;
    }

    #[tokio::test]
    async fn test_soft_failures_accumulate() {
        let info = TestInfo::detached("t");
        assert!(!info.has_soft_failures());
        info.record_soft_failure(&Error::AssertionFailed("one".to_string()));
        info.clone()
            .record_soft_failure(&Error::AssertionFailed("two".to_string()));
        assert_eq!(
            info.soft_failures(),
            vec!["Assertion failed: one", "Assertion failed: two"]
        );
    }
}
