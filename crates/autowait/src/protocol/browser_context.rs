// BrowserContext - an isolated session within a browser
//
// Each context owns the root of the timeout hierarchy below the runner:
// its defaults are seeded from the options (usually derived from
// TestConfig) and every page it opens layers its own settings on top.

use crate::dom::Viewport;
use crate::error::{Error, Result};
use crate::protocol::frame::FrameOptions;
use crate::protocol::page::Page;
use crate::protocol::timeout_settings::{from_millis, TimeoutSettings};
use crate::server::WebApp;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use url::Url;

/// BrowserContext represents an isolated browser session.
///
/// Pages of different contexts share nothing but the fixture app they are
/// served from; the runner gives every test a fresh context.
///
/// # Example
///
/// ```ignore
/// use autowait::{fixtures, BrowserContextOptions, Playwright};
///
/// let playwright = Playwright::launch(fixtures::form_layouts());
/// let browser = playwright.chromium().launch().await?;
/// let context = browser
///     .new_context_with_options(
///         BrowserContextOptions::builder()
///             .base_url(fixtures::FORMS_APP_URL.to_string())
///             .timeout(3000.0)
///             .build(),
///     )
///     .await?;
/// let page = context.new_page().await?;
/// page.goto("/pages/forms/layouts", None).await?;
/// ```
///
/// See: <https://playwright.dev/docs/api/class-browsercontext>
#[derive(Clone)]
pub struct BrowserContext {
    inner: Arc<ContextInner>,
}

struct ContextInner {
    app: Arc<WebApp>,
    settings: Arc<TimeoutSettings>,
    frame_options: FrameOptions,
    pages: Mutex<Vec<Page>>,
    closed: AtomicBool,
}

impl BrowserContext {
    pub(crate) fn new(
        app: Arc<WebApp>,
        options: BrowserContextOptions,
        slow_mo: Duration,
    ) -> Result<Self> {
        let base_url = options
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| Error::InvalidArgument(format!("invalid base_url: {}", e)))?;

        let settings = Arc::new(TimeoutSettings::new());
        if let Some(ms) = options.timeout {
            settings.set_default_timeout(from_millis(ms));
        }
        if let Some(ms) = options.navigation_timeout {
            settings.set_default_navigation_timeout(from_millis(ms));
        }

        let mut frame_options = FrameOptions {
            base_url,
            slow_mo,
            ..FrameOptions::default()
        };
        if let Some(viewport) = options.viewport {
            frame_options.viewport = viewport;
        }
        if let Some(ms) = options.poll_interval {
            let interval = from_millis(ms);
            if interval.is_zero() {
                return Err(Error::InvalidArgument(
                    "poll_interval must be positive".to_string(),
                ));
            }
            frame_options.poll_interval = interval;
        }

        Ok(Self {
            inner: Arc::new(ContextInner {
                app,
                settings,
                frame_options,
                pages: Mutex::new(Vec::new()),
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Creates a new page in the browser context.
    ///
    /// # Errors
    ///
    /// Returns error if the context has been closed.
    ///
    /// See: <https://playwright.dev/docs/api/class-browsercontext#browser-context-new-page>
    pub async fn new_page(&self) -> Result<Page> {
        if self.is_closed() {
            return Err(Error::TargetClosed {
                target_type: "BrowserContext".to_string(),
                context: "new_page".to_string(),
            });
        }
        let page = Page::new(
            Arc::clone(&self.inner.app),
            Arc::clone(&self.inner.settings),
            self.inner.frame_options.clone(),
        );
        self.inner.pages.lock().push(page.clone());
        tracing::debug!(pages = self.inner.pages.lock().len(), "Opened page");
        Ok(page)
    }

    /// Returns all open pages in the context.
    ///
    /// See: <https://playwright.dev/docs/api/class-browsercontext#browser-context-pages>
    pub fn pages(&self) -> Vec<Page> {
        self.inner
            .pages
            .lock()
            .iter()
            .filter(|p| !p.is_closed())
            .cloned()
            .collect()
    }

    /// Sets the default action timeout for every page of this context, in
    /// milliseconds. Page-level defaults still take precedence.
    ///
    /// See: <https://playwright.dev/docs/api/class-browsercontext#browser-context-set-default-timeout>
    pub fn set_default_timeout(&self, timeout_ms: f64) {
        self.inner.settings.set_default_timeout(from_millis(timeout_ms));
    }

    /// See: <https://playwright.dev/docs/api/class-browsercontext#browser-context-set-default-navigation-timeout>
    pub fn set_default_navigation_timeout(&self, timeout_ms: f64) {
        self.inner
            .settings
            .set_default_navigation_timeout(from_millis(timeout_ms));
    }

    /// Closes the browser context and all its pages.
    ///
    /// See: <https://playwright.dev/docs/api/class-browsercontext#browser-context-close>
    pub async fn close(&self) -> Result<()> {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        let pages: Vec<Page> = self.inner.pages.lock().drain(..).collect();
        for page in pages {
            page.close().await?;
        }
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for BrowserContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BrowserContext")
            .field("pages", &self.inner.pages.lock().len())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Options for creating a new browser context.
///
/// Timeouts and the poll interval are in milliseconds; a zero timeout
/// disables that scope.
///
/// See: <https://playwright.dev/docs/api/class-browser#browser-new-context>
#[derive(Debug, Clone, Default)]
pub struct BrowserContextOptions {
    /// Viewport of every page in the context
    pub viewport: Option<Viewport>,
    /// Base URL that relative `goto` URLs are resolved against
    pub base_url: Option<String>,
    /// Default action timeout
    pub timeout: Option<f64>,
    /// Default navigation timeout
    pub navigation_timeout: Option<f64>,
    /// Actionability polling interval
    pub poll_interval: Option<f64>,
}

impl BrowserContextOptions {
    /// Creates a new builder for BrowserContextOptions
    pub fn builder() -> BrowserContextOptionsBuilder {
        BrowserContextOptionsBuilder::default()
    }
}

/// Builder for BrowserContextOptions
#[derive(Debug, Clone, Default)]
pub struct BrowserContextOptionsBuilder {
    viewport: Option<Viewport>,
    base_url: Option<String>,
    timeout: Option<f64>,
    navigation_timeout: Option<f64>,
    poll_interval: Option<f64>,
}

impl BrowserContextOptionsBuilder {
    /// Sets the viewport dimensions
    pub fn viewport(mut self, viewport: Viewport) -> Self {
        self.viewport = Some(viewport);
        self
    }

    /// Sets the base URL for relative navigation
    pub fn base_url(mut self, base_url: String) -> Self {
        self.base_url = Some(base_url);
        self
    }

    /// Sets the default action timeout in milliseconds
    pub fn timeout(mut self, ms: f64) -> Self {
        self.timeout = Some(ms);
        self
    }

    /// Sets the default navigation timeout in milliseconds
    pub fn navigation_timeout(mut self, ms: f64) -> Self {
        self.navigation_timeout = Some(ms);
        self
    }

    /// Sets the actionability polling interval in milliseconds
    pub fn poll_interval(mut self, ms: f64) -> Self {
        self.poll_interval = Some(ms);
        self
    }

    /// Builds the BrowserContextOptions
    pub fn build(self) -> BrowserContextOptions {
        BrowserContextOptions {
            viewport: self.viewport,
            base_url: self.base_url,
            timeout: self.timeout,
            navigation_timeout: self.navigation_timeout,
            poll_interval: self.poll_interval,
        }
    }
}
