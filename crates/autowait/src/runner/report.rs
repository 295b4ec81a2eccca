// Run report
//
// One TestResult per scheduled test, in declaration order, plus run-level
// totals. Serializes to JSON for tooling.

use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// Final status of one test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TestStatus {
    Passed,
    /// An error, a hard assertion or at least one soft assertion failed
    Failed,
    /// The per-test timeout elapsed
    TimedOut,
    /// The run-wide timeout elapsed while the test was running
    Interrupted,
    /// The run-wide timeout elapsed before the test started
    Skipped,
}

impl TestStatus {
    pub fn is_ok(self) -> bool {
        matches!(self, TestStatus::Passed | TestStatus::Skipped)
    }
}

impl fmt::Display for TestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestStatus::Passed => "passed",
            TestStatus::Failed => "failed",
            TestStatus::TimedOut => "timedOut",
            TestStatus::Interrupted => "interrupted",
            TestStatus::Skipped => "skipped",
        };
        f.write_str(s)
    }
}

/// Outcome of one test.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResult {
    pub suite: String,
    pub title: String,
    pub status: TestStatus,
    #[serde(serialize_with = "as_millis")]
    pub duration: Duration,
    /// The hard error that ended the test
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub soft_failures: Vec<String>,
}

impl TestResult {
    /// `suite > title`
    pub fn full_title(&self) -> String {
        if self.suite.is_empty() {
            self.title.clone()
        } else {
            format!("{} > {}", self.suite, self.title)
        }
    }
}

fn as_millis<S: serde::Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(crate::protocol::timeout_settings::as_millis(*duration))
}

/// Outcome of a whole run.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub results: Vec<TestResult>,
    #[serde(serialize_with = "as_millis")]
    pub duration: Duration,
    /// The run-wide timeout fired
    pub interrupted: bool,
}

impl RunReport {
    pub fn count(&self, status: TestStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn passed(&self) -> usize {
        self.count(TestStatus::Passed)
    }

    /// Tests that failed or timed out.
    pub fn failed(&self) -> Vec<&TestResult> {
        self.results.iter().filter(|r| !r.status.is_ok()).collect()
    }

    pub fn all_passed(&self) -> bool {
        !self.interrupted && self.results.iter().all(|r| r.status == TestStatus::Passed)
    }

    /// Looks a result up by test title.
    pub fn result(&self, title: &str) -> Option<&TestResult> {
        self.results.iter().find(|r| r.title == title)
    }

    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for result in &self.results {
            writeln!(
                f,
                "  {:<11} {} ({}ms)",
                result.status,
                result.full_title(),
                result.duration.as_millis()
            )?;
            if let Some(error) = &result.error {
                writeln!(f, "      {}", error)?;
            }
            for soft in &result.soft_failures {
                writeln!(f, "      soft: {}", soft)?;
            }
        }
        write!(
            f,
            "{} passed, {} failed, {} timed out, {} interrupted, {} skipped ({}ms)",
            self.passed(),
            self.count(TestStatus::Failed),
            self.count(TestStatus::TimedOut),
            self.count(TestStatus::Interrupted),
            self.count(TestStatus::Skipped),
            self.duration.as_millis()
        )
    }
}
