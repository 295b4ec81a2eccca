// TestConfig - run configuration
//
// Loaded from JSON shaped like a Playwright config object:
//
//   {
//     "timeout": 30000,
//     "globalTimeout": 60000,
//     "workers": 2,
//     "expect": { "timeout": 10000 },
//     "use": { "actionTimeout": 3000, "navigationTimeout": 5000,
//              "baseURL": "http://localhost:4200", "pollInterval": 50 }
//   }
//
// Every value is in milliseconds and optional. Zero disables a timeout.

use crate::api::LaunchOptions;
use crate::dom::Viewport;
use crate::error::{Error, Result};
use crate::protocol::BrowserContextOptions;
use crate::protocol::timeout_settings::{from_millis, limit};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// `expect` section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ExpectConfig {
    /// Polling assertion timeout (default 5000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
}

/// `use` section: defaults for every context the runner creates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UseOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_timeout: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub navigation_timeout: Option<f64>,
    #[serde(rename = "baseURL", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poll_interval: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub viewport: Option<Viewport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub launch_options: Option<LaunchOptions>,
}

/// Configuration of a test run.
///
/// # Example
///
/// ```ignore
/// use autowait::TestConfig;
///
/// let config = TestConfig::from_json_str(r#"{ "timeout": 5000, "use": { "actionTimeout": 3000 } }"#)?;
/// assert_eq!(config.test_timeout(), Some(std::time::Duration::from_secs(5)));
///
/// let config = TestConfig::new().workers(4).expect_timeout(10_000.0);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TestConfig {
    /// Per-test timeout (default 30000)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<f64>,
    /// Whole-run timeout (default unbounded)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub global_timeout: Option<f64>,
    /// Parallel workers (default 1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workers: Option<usize>,
    #[serde(default)]
    pub expect: ExpectConfig,
    #[serde(default, rename = "use")]
    pub use_options: UseOptions,
}

impl TestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: TestConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::from(e).context(format!("reading {}", path.display())))?;
        Self::from_json_str(&json).map_err(|e| e.context(format!("loading {}", path.display())))
    }

    /// Checks value ranges; called by the loaders and by the runner.
    pub fn validate(&self) -> Result<()> {
        let timeouts = [
            ("timeout", self.timeout),
            ("globalTimeout", self.global_timeout),
            ("expect.timeout", self.expect.timeout),
            ("use.actionTimeout", self.use_options.action_timeout),
            ("use.navigationTimeout", self.use_options.navigation_timeout),
        ];
        for (name, value) in timeouts {
            if let Some(ms) = value
                && (!ms.is_finite() || ms < 0.0)
            {
                return Err(Error::Config(format!(
                    "{} must be a non-negative number of milliseconds, got {}",
                    name, ms
                )));
            }
        }
        if let Some(ms) = self.use_options.poll_interval
            && (!ms.is_finite() || ms <= 0.0)
        {
            return Err(Error::Config(format!(
                "use.pollInterval must be positive, got {}",
                ms
            )));
        }
        if self.workers == Some(0) {
            return Err(Error::Config("workers must be at least 1".to_string()));
        }
        if let Some(base_url) = &self.use_options.base_url {
            Url::parse(base_url)
                .map_err(|e| Error::Config(format!("use.baseURL '{}': {}", base_url, e)))?;
        }
        if let Some(launch) = &self.use_options.launch_options {
            launch
                .validate()
                .map_err(|e| Error::Config(e.to_string()))?;
        }
        Ok(())
    }

    /// Sets the per-test timeout in milliseconds
    pub fn timeout(mut self, ms: f64) -> Self {
        self.timeout = Some(ms);
        self
    }

    /// Sets the whole-run timeout in milliseconds
    pub fn global_timeout(mut self, ms: f64) -> Self {
        self.global_timeout = Some(ms);
        self
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    /// Sets the polling assertion timeout in milliseconds
    pub fn expect_timeout(mut self, ms: f64) -> Self {
        self.expect.timeout = Some(ms);
        self
    }

    pub fn action_timeout(mut self, ms: f64) -> Self {
        self.use_options.action_timeout = Some(ms);
        self
    }

    pub fn navigation_timeout(mut self, ms: f64) -> Self {
        self.use_options.navigation_timeout = Some(ms);
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.use_options.base_url = Some(base_url.into());
        self
    }

    pub fn poll_interval(mut self, ms: f64) -> Self {
        self.use_options.poll_interval = Some(ms);
        self
    }

    /// Effective per-test timeout; `None` when disabled.
    pub fn test_timeout(&self) -> Option<Duration> {
        match self.timeout {
            Some(ms) => limit(from_millis(ms)),
            None => Some(crate::DEFAULT_TEST_TIMEOUT),
        }
    }

    /// Effective whole-run timeout; `None` when unbounded.
    pub fn run_timeout(&self) -> Option<Duration> {
        self.global_timeout.map(from_millis).and_then(limit)
    }

    /// Effective polling assertion timeout; `None` when disabled.
    pub fn assertion_timeout(&self) -> Option<Duration> {
        match self.expect.timeout {
            Some(ms) => limit(from_millis(ms)),
            None => Some(crate::DEFAULT_ASSERTION_TIMEOUT),
        }
    }

    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or(1).max(1)
    }

    /// Options for the context each test runs in.
    pub fn context_options(&self) -> BrowserContextOptions {
        BrowserContextOptions {
            viewport: self.use_options.viewport,
            base_url: self.use_options.base_url.clone(),
            timeout: self.use_options.action_timeout,
            navigation_timeout: self.use_options.navigation_timeout,
            poll_interval: self.use_options.poll_interval,
        }
    }

    pub fn launch_options(&self) -> LaunchOptions {
        self.use_options.launch_options.clone().unwrap_or_default()
    }
}
