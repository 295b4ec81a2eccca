// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// BrowserType - launches engine instances against a fixture app

use crate::api::LaunchOptions;
use crate::error::Result;
use crate::protocol::browser::Browser;
use crate::protocol::timeout_settings::from_millis;
use crate::server::WebApp;
use std::sync::Arc;

/// BrowserType launches browsers that serve pages from one [`WebApp`].
///
/// # Example
///
/// ```ignore
/// use autowait::{fixtures, LaunchOptions, Playwright};
///
/// let playwright = Playwright::launch(fixtures::form_layouts());
/// let chromium = playwright.chromium();
/// assert_eq!(chromium.name(), "chromium");
///
/// let browser = chromium
///     .launch_with_options(LaunchOptions::new().slow_mo(100.0))
///     .await?;
/// browser.close().await?;
/// ```
///
/// See: <https://playwright.dev/docs/api/class-browsertype>
#[derive(Debug, Clone)]
pub struct BrowserType {
    name: String,
    app: Arc<WebApp>,
}

impl BrowserType {
    pub(crate) fn new(name: &str, app: Arc<WebApp>) -> Self {
        Self {
            name: name.to_string(),
            app,
        }
    }

    /// Returns the browser type name ("chromium").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Launches a browser instance with default options.
    ///
    /// See: <https://playwright.dev/docs/api/class-browsertype#browser-type-launch>
    pub async fn launch(&self) -> Result<Browser> {
        self.launch_with_options(LaunchOptions::default()).await
    }

    /// Launches a browser instance with custom options.
    ///
    /// # Errors
    ///
    /// Returns error if the options are invalid (negative `slow_mo`).
    ///
    /// See: <https://playwright.dev/docs/api/class-browsertype#browser-type-launch>
    pub async fn launch_with_options(&self, options: LaunchOptions) -> Result<Browser> {
        options.validate()?;
        let slow_mo = options.slow_mo.map(from_millis).unwrap_or_default();
        tracing::debug!(
            browser = %self.name,
            routes = self.app.len(),
            slow_mo_ms = slow_mo.as_millis() as u64,
            "Launching browser"
        );
        Ok(Browser::new(&self.name, Arc::clone(&self.app), slow_mo))
    }
}
