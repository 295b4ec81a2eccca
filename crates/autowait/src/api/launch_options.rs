// Launch options for BrowserType::launch()
//
// See: https://playwright.dev/docs/api/class-browsertype#browser-type-launch

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Options for launching a browser
///
/// All options are optional. They can be built in code or read from the
/// `use.launchOptions` section of a [`TestConfig`](crate::TestConfig).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchOptions {
    /// Slow down every action by N milliseconds
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slow_mo: Option<f64>,
}

impl LaunchOptions {
    /// Creates a new LaunchOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Slow down operations by N milliseconds
    pub fn slow_mo(mut self, ms: f64) -> Self {
        self.slow_mo = Some(ms);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        match self.slow_mo {
            Some(ms) if !ms.is_finite() || ms < 0.0 => Err(Error::InvalidArgument(format!(
                "slow_mo must be a non-negative number of milliseconds, got {}",
                ms
            ))),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_launch_options_default() {
        let opts = LaunchOptions::default();
        assert!(opts.slow_mo.is_none());
        assert!(opts.validate().is_ok());
    }

    #[test]
    fn test_launch_options_deserialize_camel_case() {
        let opts: LaunchOptions = serde_json::from_str(r#"{"slowMo": 250}"#).unwrap();
        assert_eq!(opts, LaunchOptions::new().slow_mo(250.0));
    }

    #[test]
    fn test_launch_options_rejects_nan() {
        assert!(LaunchOptions::new().slow_mo(f64::NAN).validate().is_err());
    }
}
