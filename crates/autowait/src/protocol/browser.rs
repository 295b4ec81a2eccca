// Browser - an engine instance created by BrowserType::launch()
//
// Holds the fixture app every page navigates against and the contexts it
// has handed out, so closing the browser closes everything below it.

use crate::error::{Error, Result};
use crate::protocol::browser_context::{BrowserContext, BrowserContextOptions};
use crate::protocol::page::Page;
use crate::server::WebApp;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Browser represents a browser instance.
///
/// A Browser is created when you call `BrowserType::launch()`. It provides methods
/// to create browser contexts and pages.
///
/// # Example
///
/// ```ignore
/// use autowait::{fixtures, Playwright};
///
/// let playwright = Playwright::launch(fixtures::ajax_demo());
/// let browser = playwright.chromium().launch().await?;
/// assert!(browser.is_connected());
///
/// let context = browser.new_context().await?;
/// let page = context.new_page().await?;
///
/// // Convenience: create page directly (auto-creates default context)
/// let page2 = browser.new_page().await?;
///
/// browser.close().await?;
/// assert!(!browser.is_connected());
/// ```
///
/// See: <https://playwright.dev/docs/api/class-browser>
#[derive(Clone)]
pub struct Browser {
    name: String,
    app: Arc<WebApp>,
    slow_mo: Duration,
    contexts: Arc<Mutex<Vec<BrowserContext>>>,
    is_connected: Arc<AtomicBool>,
}

impl Browser {
    pub(crate) fn new(name: &str, app: Arc<WebApp>, slow_mo: Duration) -> Self {
        Self {
            name: name.to_string(),
            app,
            slow_mo,
            contexts: Arc::new(Mutex::new(Vec::new())),
            is_connected: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Returns the browser name (e.g., "chromium").
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns true if the browser has not been closed.
    ///
    /// See: <https://playwright.dev/docs/api/class-browser#browser-is-connected>
    pub fn is_connected(&self) -> bool {
        self.is_connected.load(Ordering::SeqCst)
    }

    /// Returns the open contexts of this browser.
    pub fn contexts(&self) -> Vec<BrowserContext> {
        self.contexts
            .lock()
            .iter()
            .filter(|c| !c.is_closed())
            .cloned()
            .collect()
    }

    /// Creates a new isolated browser context with default options.
    ///
    /// See: <https://playwright.dev/docs/api/class-browser#browser-new-context>
    pub async fn new_context(&self) -> Result<BrowserContext> {
        self.new_context_with_options(BrowserContextOptions::default())
            .await
    }

    /// Creates a new browser context with custom options.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - Browser has been closed
    /// - `base_url` is not an absolute URL
    ///
    /// See: <https://playwright.dev/docs/api/class-browser#browser-new-context>
    pub async fn new_context_with_options(
        &self,
        options: BrowserContextOptions,
    ) -> Result<BrowserContext> {
        if !self.is_connected() {
            return Err(Error::TargetClosed {
                target_type: "Browser".to_string(),
                context: "new_context".to_string(),
            });
        }
        let context = BrowserContext::new(Arc::clone(&self.app), options, self.slow_mo)?;
        let mut contexts = self.contexts.lock();
        contexts.retain(|c| !c.is_closed());
        contexts.push(context.clone());
        Ok(context)
    }

    /// Creates a new page in a new browser context.
    ///
    /// Equivalent to `browser.new_context().await?.new_page().await?`.
    ///
    /// See: <https://playwright.dev/docs/api/class-browser#browser-new-page>
    pub async fn new_page(&self) -> Result<Page> {
        let context = self.new_context().await?;
        context.new_page().await
    }

    /// Closes the browser and every context it created.
    ///
    /// See: <https://playwright.dev/docs/api/class-browser#browser-close>
    pub async fn close(&self) -> Result<()> {
        if !self.is_connected.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        let contexts: Vec<BrowserContext> = self.contexts.lock().drain(..).collect();
        tracing::debug!(browser = %self.name, contexts = contexts.len(), "Closing browser");
        for context in contexts {
            context.close().await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Browser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Browser")
            .field("name", &self.name)
            .field("is_connected", &self.is_connected())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_close_disconnects_and_closes_pages() {
        let browser = Browser::new("chromium", Arc::new(WebApp::new()), Duration::ZERO);
        let page = browser.new_page().await.unwrap();
        assert_eq!(browser.contexts().len(), 1);

        browser.close().await.unwrap();
        assert!(!browser.is_connected());
        assert!(page.is_closed());
        assert!(matches!(
            browser.new_context().await,
            Err(Error::TargetClosed { .. })
        ));
        // Closing twice is a no-op
        browser.close().await.unwrap();
    }
}
