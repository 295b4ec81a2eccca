// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Playwright - root object

use crate::protocol::browser_type::BrowserType;
use crate::server::WebApp;
use std::sync::Arc;

/// Playwright is the root object that provides access to browser types.
///
/// Where a real driver spawns a server process, this engine runs in process:
/// launching only binds the fixture app that every browser will navigate
/// against.
///
/// # Example
///
/// ```ignore
/// use autowait::{fixtures, Playwright};
///
/// #[tokio::main]
/// async fn main() -> autowait::Result<()> {
///     let playwright = Playwright::launch(fixtures::ajax_demo());
///     let browser = playwright.chromium().launch().await?;
///     let page = browser.new_page().await?;
///     page.goto(fixtures::AJAX_URL, None).await?;
///     browser.close().await?;
///     Ok(())
/// }
/// ```
///
/// See: <https://playwright.dev/docs/api/class-playwright>
#[derive(Debug, Clone)]
pub struct Playwright {
    app: Arc<WebApp>,
    chromium: BrowserType,
}

impl Playwright {
    /// Binds `app` and returns a handle to the browser types.
    pub fn launch(app: WebApp) -> Self {
        let app = Arc::new(app);
        tracing::debug!(routes = app.len(), "Starting engine");
        Self {
            chromium: BrowserType::new("chromium", Arc::clone(&app)),
            app,
        }
    }

    /// Returns the Chromium browser type.
    pub fn chromium(&self) -> &BrowserType {
        &self.chromium
    }

    /// The fixture app pages are served from.
    pub fn app(&self) -> &WebApp {
        &self.app
    }
}
