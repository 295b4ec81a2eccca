// TestRunner - schedules suites on parallel workers
//
// Every test becomes a tokio task that waits for a worker permit, opens its
// own context and page, and runs hooks plus body under the per-test
// timeout. The run-wide timeout races each task as a whole: a test that is
// still running when it fires is interrupted, one that never got a worker
// is skipped. Timeouts cancel by dropping the future.

use crate::api::TestConfig;
use crate::error::{Error, Result};
use crate::protocol::timeout_settings::{as_millis, TimeoutScope};
use crate::protocol::{Browser, Playwright};
use crate::runner::report::{RunReport, TestResult, TestStatus};
use crate::runner::suite::{Fixtures, Suite, TestCase};
use crate::runner::TestInfo;
use crate::server::WebApp;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::time::Instant;

/// Runs suites against a fixture app with the timeouts and worker count of
/// a [`TestConfig`].
///
/// # Example
///
/// ```ignore
/// use autowait::{fixtures, Suite, TestConfig, TestRunner};
///
/// let runner = TestRunner::new(fixtures::ajax_demo(), TestConfig::new().workers(2))?;
/// let report = runner
///     .run(vec![Suite::new("AJAX").test("loads", |t| async move {
///         t.page.goto(fixtures::AJAX_URL, None).await?;
///         Ok(())
///     })])
///     .await?;
/// println!("{report}");
/// ```
#[derive(Debug)]
pub struct TestRunner {
    playwright: Playwright,
    config: TestConfig,
}

impl TestRunner {
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is out of range.
    pub fn new(app: WebApp, config: TestConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            playwright: Playwright::launch(app),
            config,
        })
    }

    pub fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Runs one suite.
    pub async fn run_suite(&self, suite: Suite) -> Result<RunReport> {
        self.run(vec![suite]).await
    }

    /// Runs every test of `suites` and reports them in declaration order.
    ///
    /// Test failures are part of the report; the `Err` case is reserved for
    /// problems launching or closing the browser.
    pub async fn run(&self, suites: Vec<Suite>) -> Result<RunReport> {
        let browser = self
            .playwright
            .chromium()
            .launch_with_options(self.config.launch_options())
            .await?;
        let started = Instant::now();
        let global_deadline = self.config.run_timeout().map(|t| started + t);
        let workers = Arc::new(Semaphore::new(self.config.worker_count()));
        let total: usize = suites.iter().map(Suite::len).sum();
        tracing::info!(tests = total, workers = self.config.worker_count(), "Starting run");

        let mut handles = Vec::with_capacity(total);
        for suite in suites {
            let suite = Arc::new(suite);
            for case in suite.tests() {
                let job = Job {
                    suite: Arc::clone(&suite),
                    case: case.clone(),
                    browser: browser.clone(),
                    config: self.config.clone(),
                    workers: Arc::clone(&workers),
                    global_deadline,
                };
                let names = (suite.name().to_string(), case.title.clone());
                handles.push((names, tokio::spawn(job.run())));
            }
        }

        let mut results = Vec::with_capacity(handles.len());
        for ((suite, title), handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => TestResult {
                    suite,
                    title,
                    status: TestStatus::Failed,
                    duration: Duration::ZERO,
                    error: Some(format!("test task failed: {}", e)),
                    soft_failures: Vec::new(),
                },
            };
            results.push(result);
        }
        browser.close().await?;

        let report = RunReport {
            interrupted: results
                .iter()
                .any(|r| matches!(r.status, TestStatus::Interrupted | TestStatus::Skipped)),
            results,
            duration: started.elapsed(),
        };
        tracing::info!(
            passed = report.passed(),
            failed = report.failed().len(),
            duration_ms = as_millis(report.duration),
            "Run finished"
        );
        Ok(report)
    }
}

/// One scheduled test.
struct Job {
    suite: Arc<Suite>,
    case: TestCase,
    browser: Browser,
    config: TestConfig,
    workers: Arc<Semaphore>,
    global_deadline: Option<Instant>,
}

impl Job {
    async fn run(self) -> TestResult {
        let started = AtomicBool::new(false);
        tokio::select! {
            result = self.execute(&started) => result,
            _ = sleep_until(self.global_deadline) => {
                let timeout_ms = self.config.run_timeout().map(as_millis).unwrap_or(0);
                let running = started.load(Ordering::SeqCst);
                let (status, error) = if running {
                    let error = Error::Timeout {
                        scope: TimeoutScope::Global,
                        timeout_ms,
                        context: None,
                    };
                    tracing::warn!(test = %self.case.title, %error, "Test interrupted");
                    (TestStatus::Interrupted, Some(error.to_string()))
                } else {
                    (TestStatus::Skipped, None)
                };
                self.result(status, Duration::ZERO, error, Vec::new())
            }
        }
    }

    async fn execute(&self, started: &AtomicBool) -> TestResult {
        let Ok(_permit) = self.workers.acquire().await else {
            return self.result(TestStatus::Skipped, Duration::ZERO, None, Vec::new());
        };
        started.store(true, Ordering::SeqCst);
        tracing::info!(suite = %self.suite.name(), test = %self.case.title, "Running test");

        let (context, page) = match self.open().await {
            Ok(opened) => opened,
            Err(e) => {
                return self.result(TestStatus::Failed, Duration::ZERO, Some(e.to_string()), Vec::new())
            }
        };
        let info = TestInfo::new(
            self.suite.name(),
            &self.case.title,
            self.config.test_timeout(),
            self.config.assertion_timeout(),
        );
        let fixtures = Fixtures {
            page,
            context: context.clone(),
            info: info.clone(),
        };
        let outcome = with_test_timeout(&info, self.suite.run_test(&self.case, fixtures)).await;
        if let Err(e) = context.close().await {
            tracing::debug!(error = %e, "Closing test context failed");
        }

        let soft_failures = info.soft_failures();
        let (status, error) = match outcome {
            Ok(()) if soft_failures.is_empty() => (TestStatus::Passed, None),
            Ok(()) => (TestStatus::Failed, None),
            Err(e) if e.timeout_scope() == Some(TimeoutScope::Test) => {
                (TestStatus::TimedOut, Some(e.to_string()))
            }
            Err(e) => (TestStatus::Failed, Some(e.to_string())),
        };
        match &error {
            Some(error) => tracing::warn!(test = %self.case.title, %status, %error, "Test finished"),
            None => tracing::info!(test = %self.case.title, %status, "Test finished"),
        }
        self.result(status, info.elapsed(), error, soft_failures)
    }

    async fn open(&self) -> Result<(crate::protocol::BrowserContext, crate::protocol::Page)> {
        let context = self
            .browser
            .new_context_with_options(self.config.context_options())
            .await?;
        let page = context.new_page().await?;
        Ok((context, page))
    }

    fn result(
        &self,
        status: TestStatus,
        duration: Duration,
        error: Option<String>,
        soft_failures: Vec<String>,
    ) -> TestResult {
        TestResult {
            suite: self.suite.name().to_string(),
            title: self.case.title.clone(),
            status,
            duration,
            error,
            soft_failures,
        }
    }
}

async fn sleep_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}

/// Drives `body` until it finishes or the test's deadline passes. The
/// deadline is re-read whenever `TestInfo::set_timeout` is called.
pub(crate) async fn with_test_timeout<F>(info: &TestInfo, body: F) -> Result<()>
where
    F: Future<Output = Result<()>>,
{
    tokio::pin!(body);
    loop {
        let changed = info.timeout_changed();
        let deadline = info.deadline();
        tokio::select! {
            biased;
            outcome = &mut body => return outcome,
            _ = changed => continue,
            _ = sleep_until(deadline) => {
                return Err(Error::Timeout {
                    scope: TimeoutScope::Test,
                    timeout_ms: info.timeout().map(as_millis).unwrap_or(0),
                    context: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_set_timeout_inside_body_applies() {
        let info = TestInfo::new("s", "t", Some(Duration::from_secs(30)), None);
        let body_info = info.clone();
        let err = with_test_timeout(&info, async move {
            body_info.set_timeout(5000.0);
            tokio::time::sleep(Duration::from_secs(6)).await;
            Ok(())
        })
        .await
        .unwrap_err();
        assert_eq!(err.to_string(), "Test timeout of 5000ms exceeded");
        assert_eq!(info.elapsed(), Duration::from_secs(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extending_timeout_lets_body_finish() {
        let info = TestInfo::new("s", "t", Some(Duration::from_secs(1)), None);
        let body_info = info.clone();
        with_test_timeout(&info, async move {
            body_info.set_timeout(10_000.0);
            tokio::time::sleep(Duration::from_secs(3)).await;
            Ok(())
        })
        .await
        .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_runner_rejects_bad_config() {
        let err = TestRunner::new(WebApp::new(), TestConfig::new().workers(0)).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
