// Page - one tab of a browser context
//
// A page owns its main frame and a layer of timeout settings sitting on top
// of its context's. Navigation, locator construction and document access
// all delegate to the frame.

use crate::dom::{Document, TextMatch, Viewport};
use crate::error::Result;
use crate::protocol::frame::{Frame, FrameOptions};
use crate::protocol::locator::{FilterOptions, Locator, RoleOptions, Selector, Step};
use crate::protocol::timeout_settings::{from_millis, TimeoutSettings};
use crate::server::WebApp;
use std::sync::Arc;
use std::time::Duration;

/// Page represents a web page within a browser context.
///
/// A Page is created with `BrowserContext::new_page()` or `Browser::new_page()`.
/// Initially, pages are at "about:blank".
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
///
///     page.goto(fixtures::AJAX_URL, None).await?;
///     assert_eq!(page.title().await?, "AJAX Data");
///
///     page.get_by_text("Button Triggering AJAX Request").click(None).await?;
///     page.locator(".bg-success").wait_for(None).await?;
///
///     browser.close().await?;
///     Ok(())
/// }
/// ```
///
/// See: <https://playwright.dev/docs/api/class-page>
#[derive(Clone)]
pub struct Page {
    frame: Arc<Frame>,
}

impl Page {
    pub(crate) fn new(
        app: Arc<WebApp>,
        context_settings: Arc<TimeoutSettings>,
        options: FrameOptions,
    ) -> Self {
        let settings = Arc::new(TimeoutSettings::with_parent(context_settings));
        Self {
            frame: Arc::new(Frame::new(app, settings, options)),
        }
    }

    /// Returns the main frame of the page.
    pub fn main_frame(&self) -> Arc<Frame> {
        Arc::clone(&self.frame)
    }

    /// Returns the current URL of the page.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-url>
    pub fn url(&self) -> String {
        self.frame.url()
    }

    /// Navigates to the specified URL.
    ///
    /// Relative URLs are resolved against the context's `base_url`. Returns
    /// `None` for `about:blank`.
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - URL is invalid or not served by the app
    /// - Navigation timeout elapses (per-call, page, then context default)
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-goto>
    pub async fn goto(&self, url: &str, options: Option<GotoOptions>) -> Result<Option<Response>> {
        self.frame.goto(url, options).await
    }

    /// Reloads the current page.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-reload>
    pub async fn reload(&self, options: Option<GotoOptions>) -> Result<Option<Response>> {
        self.frame.reload(options).await
    }

    /// Replaces the page's document with `html`.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-set-content>
    pub async fn set_content(&self, html: &str) -> Result<()> {
        self.frame.set_content(html).await
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-wait-for-load-state>
    pub async fn wait_for_load_state(&self, state: Option<LoadState>) -> Result<()> {
        self.frame.wait_for_load_state(state).await
    }

    /// Waits for the given time. Prefer locator waits and assertions.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-wait-for-timeout>
    pub async fn wait_for_timeout(&self, timeout_ms: f64) {
        self.frame.wait_for_timeout(timeout_ms).await
    }

    /// Returns the page's title.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-title>
    pub async fn title(&self) -> Result<String> {
        self.frame.title().await
    }

    /// Returns the full HTML content of the page, including the DOCTYPE.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-content>
    pub async fn content(&self) -> Result<String> {
        self.frame.content().await
    }

    /// Runs `f` against the live document.
    ///
    /// This is the in-process counterpart of `page.evaluate()`: tests use it
    /// to mutate the page (remove an overlay, start an animation) while
    /// actions are waiting.
    pub fn evaluate<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T> {
        self.frame.evaluate(f)
    }

    /// Sets the default timeout for actions on this page, in milliseconds.
    /// Zero disables the timeout.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-set-default-timeout>
    pub fn set_default_timeout(&self, timeout_ms: f64) {
        self.frame.settings().set_default_timeout(from_millis(timeout_ms));
    }

    /// Sets the default navigation timeout for this page, in milliseconds.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-set-default-navigation-timeout>
    pub fn set_default_navigation_timeout(&self, timeout_ms: f64) {
        self.frame
            .settings()
            .set_default_navigation_timeout(from_millis(timeout_ms));
    }

    pub fn viewport_size(&self) -> Viewport {
        self.frame.viewport()
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-set-viewport-size>
    pub fn set_viewport_size(&self, viewport: Viewport) {
        self.frame.set_viewport(viewport);
    }

    /// Timers the page has scheduled that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.frame.pending_timers()
    }

    /// Closes the page. Pending timers are cancelled and later operations
    /// fail with `TargetClosed`.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-close>
    pub async fn close(&self) -> Result<()> {
        tracing::debug!(url = %self.url(), "Closing page");
        self.frame.close();
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.frame.is_closed()
    }

    fn root_locator(&self, step: Step) -> Locator {
        Locator::new(self.main_frame(), Selector::single(step))
    }

    /// Creates a locator for finding elements on the page.
    ///
    /// Locators don't execute queries until an action is performed.
    ///
    /// See: <https://playwright.dev/docs/api/class-page#page-locator>
    pub fn locator(&self, selector: &str) -> Locator {
        Locator::new(self.main_frame(), Selector::css(selector))
    }

    /// `page.locator(selector, { hasText, has, ... })`
    pub fn locator_with(&self, selector: &str, options: FilterOptions) -> Locator {
        self.locator(selector).filter(options)
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-role>
    pub fn get_by_role(&self, role: &str, options: Option<RoleOptions>) -> Locator {
        self.root_locator(Step::Role {
            role: role.to_ascii_lowercase(),
            options: options.unwrap_or_default(),
        })
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-text>
    pub fn get_by_text(&self, text: impl Into<TextMatch>) -> Locator {
        self.root_locator(Step::Text(text.into()))
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-label>
    pub fn get_by_label(&self, text: impl Into<TextMatch>) -> Locator {
        self.root_locator(Step::Label(text.into()))
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-placeholder>
    pub fn get_by_placeholder(&self, text: impl Into<TextMatch>) -> Locator {
        self.root_locator(Step::Placeholder(text.into()))
    }

    pub fn get_by_alt_text(&self, text: impl Into<TextMatch>) -> Locator {
        self.root_locator(Step::AltText(text.into()))
    }

    /// See: <https://playwright.dev/docs/api/class-page#page-get-by-title>
    pub fn get_by_title(&self, text: impl Into<TextMatch>) -> Locator {
        self.root_locator(Step::Title(text.into()))
    }

    pub fn get_by_test_id(&self, test_id: &str) -> Locator {
        self.root_locator(Step::TestId(test_id.to_string()))
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page")
            .field("url", &self.url())
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Options for page.goto() and page.reload()
#[derive(Debug, Clone, Default)]
pub struct GotoOptions {
    /// Maximum time in milliseconds, 0 disables the timeout
    pub timeout: Option<f64>,
    /// When to consider operation succeeded
    pub wait_until: Option<WaitUntil>,
}

impl GotoOptions {
    /// Creates new GotoOptions with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeout in milliseconds
    pub fn timeout(mut self, timeout: f64) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the wait_until option
    pub fn wait_until(mut self, wait_until: WaitUntil) -> Self {
        self.wait_until = Some(wait_until);
        self
    }

    pub(crate) fn timeout_override(&self) -> Option<Duration> {
        self.timeout.map(from_millis)
    }
}

/// When to consider navigation succeeded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WaitUntil {
    /// Consider operation to be finished when the `load` event is fired
    Load,
    /// Consider operation to be finished when the `DOMContentLoaded` event is fired
    DomContentLoaded,
    /// Consider operation to be finished when there are no pending timers for at least 500ms
    NetworkIdle,
    /// Consider operation to be finished when the response is received
    Commit,
}

impl WaitUntil {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            WaitUntil::Load => "load",
            WaitUntil::DomContentLoaded => "domcontentloaded",
            WaitUntil::NetworkIdle => "networkidle",
            WaitUntil::Commit => "commit",
        }
    }
}

/// Load state for `wait_for_load_state`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadState {
    #[default]
    Load,
    DomContentLoaded,
    NetworkIdle,
}

/// Response from navigation operations
#[derive(Debug, Clone)]
pub struct Response {
    /// URL of the response (after any client-side redirect)
    pub url: String,
    /// HTTP status code
    pub status: u16,
    /// HTTP status text
    pub status_text: String,
    /// Whether the response was successful (status 200-299)
    pub ok: bool,
}

impl Response {
    pub(crate) fn new(url: String, status: u16) -> Self {
        let status_text = match status {
            200 => "OK",
            404 => "Not Found",
            _ => "",
        };
        Self {
            url,
            status,
            status_text: status_text.to_string(),
            ok: (200..300).contains(&status),
        }
    }

    /// Returns the URL of the response
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Returns the HTTP status code
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Returns the HTTP status text
    pub fn status_text(&self) -> &str {
        &self.status_text
    }

    /// Returns whether the response was successful (status 200-299)
    pub fn ok(&self) -> bool {
        self.ok
    }
}
