// Frame - where navigation and element operations actually happen
//
// A frame owns one document behind a mutex, the timers that document
// scheduled, and the timeout settings of its page. Every locator operation
// ends up in one polling loop:
//
//   1. lock the document and lay it out at the current instant
//   2. resolve the locator and evaluate what the operation needs
//   3. either finish (performing the action under the same lock) or record
//      the first unmet predicate
//   4. release the lock and sleep for the poll interval, or give up when
//      the deadline has passed
//
// Nothing is held across an await point, so page timers keep running
// between polls.

use crate::dom::selector::QueryContext;
use crate::dom::{Document, EventType, Layout, NodeId, Rect, Viewport};
use crate::error::{Error, Result};
use crate::protocol::actionability::{describe, evaluate, ActionKind, Observation, Predicate, Readiness};
use crate::protocol::click::{MouseButton, Position};
use crate::protocol::locator::{Resolved, Selector};
use crate::protocol::page::{GotoOptions, LoadState, Response, WaitUntil};
use crate::protocol::timeout_settings::{run_with_timeout, Deadline, TimeoutScope, TimeoutSettings};
use crate::protocol::{
    CheckOptions, ClickOptions, FillOptions, HoverOptions, PressOptions, SelectOption,
    SelectOptions, WaitForOptions, WaitForState,
};
use crate::server::timers::TimerQueue;
use crate::server::web_app::{Route, WebApp};
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::time::Instant;
use url::Url;

/// Per-page settings a frame is created with.
#[derive(Debug, Clone)]
pub(crate) struct FrameOptions {
    pub viewport: Viewport,
    pub base_url: Option<Url>,
    pub poll_interval: Duration,
    pub slow_mo: Duration,
}

impl Default for FrameOptions {
    fn default() -> Self {
        Self {
            viewport: Viewport::default(),
            base_url: None,
            poll_interval: crate::DEFAULT_POLL_INTERVAL,
            slow_mo: Duration::ZERO,
        }
    }
}

/// Result of one poll.
enum Poll<T> {
    Done(Result<T>),
    Waiting {
        predicate: Predicate,
        detail: Option<String>,
    },
}

/// Element an action lands on: the locator's match and the element hit at
/// the action point inside it.
#[derive(Debug, Clone, Copy)]
struct Target {
    node: NodeId,
    hit: NodeId,
}

/// Everything the actionability loop needs to know about one call.
struct ActionRequest<'a> {
    selector: &'a Selector,
    kind: ActionKind,
    force: bool,
    trial: bool,
    timeout: Option<Duration>,
    position: Option<Position>,
}

/// Frame represents the document of a page.
///
/// Pages have exactly one frame; `Page` delegates navigation and every
/// locator operation to it.
///
/// See: <https://playwright.dev/docs/api/class-frame>
pub struct Frame {
    app: Arc<WebApp>,
    document: Arc<Mutex<Document>>,
    timers: TimerQueue,
    settings: Arc<TimeoutSettings>,
    viewport: Mutex<Viewport>,
    base_url: Option<Url>,
    poll_interval: Duration,
    slow_mo: Duration,
    closed: AtomicBool,
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame")
            .field("url", &self.url())
            .field("closed", &self.is_closed())
            .finish()
    }
}

impl Frame {
    pub(crate) fn new(app: Arc<WebApp>, settings: Arc<TimeoutSettings>, options: FrameOptions) -> Self {
        Self {
            app,
            document: Arc::new(Mutex::new(Document::new())),
            timers: TimerQueue::new(),
            settings,
            viewport: Mutex::new(options.viewport),
            base_url: options.base_url,
            poll_interval: options.poll_interval,
            slow_mo: options.slow_mo,
            closed: AtomicBool::new(false),
        }
    }

    pub(crate) fn settings(&self) -> &Arc<TimeoutSettings> {
        &self.settings
    }

    /// Returns the current URL of the frame. Initially "about:blank".
    pub fn url(&self) -> String {
        self.document.lock().url().to_string()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.lock()
    }

    pub(crate) fn set_viewport(&self, viewport: Viewport) {
        *self.viewport.lock() = viewport;
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn ensure_open(&self) -> Result<()> {
        if self.is_closed() {
            return Err(Error::TargetClosed {
                target_type: "Page".to_string(),
                context: "The page has been closed".to_string(),
            });
        }
        Ok(())
    }

    /// Hands timers the document scheduled to the runtime.
    fn flush_timers(&self, doc: &mut Document) {
        self.timers.schedule(&self.document, doc.take_scheduled());
    }

    /// Number of page timers that have not fired yet.
    pub fn pending_timers(&self) -> usize {
        self.timers.pending()
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    fn resolve_url(&self, url: &str) -> Result<Url> {
        let parsed = match &self.base_url {
            Some(base) => base.join(url),
            None => Url::parse(url),
        };
        parsed.map_err(|e| Error::NavigationFailed {
            url: url.to_string(),
            reason: format!("invalid URL: {}", e),
        })
    }

    /// Navigates the frame to `url`, resolved against the base URL.
    ///
    /// Returns `None` for `about:blank`. Hosts registered as unreachable
    /// never answer, so the call ends with a navigation timeout (or never,
    /// if navigation timeouts are disabled).
    ///
    /// See: <https://playwright.dev/docs/api/class-frame#frame-goto>
    pub async fn goto(&self, url: &str, options: Option<GotoOptions>) -> Result<Option<Response>> {
        self.ensure_open()?;
        let options = options.unwrap_or_default();
        let target = self.resolve_url(url)?;
        let wait_until = options.wait_until.unwrap_or(WaitUntil::Load);
        let timeout = self.settings.navigation_timeout(options.timeout_override());
        tracing::debug!(url = %target, ?wait_until, ?timeout, "Navigating");
        let context = format!(
            "navigating to \"{}\", waiting until \"{}\"",
            target,
            wait_until.as_str()
        );
        run_with_timeout(
            TimeoutScope::Navigation,
            timeout,
            context,
            self.navigate(target, wait_until),
        )
        .await
    }

    async fn navigate(&self, target: Url, wait_until: WaitUntil) -> Result<Option<Response>> {
        if target.as_str() == "about:blank" {
            self.timers.reset();
            *self.document.lock() = Document::new();
            return Ok(None);
        }
        let page = match self.app.resolve(&target)? {
            Route::Page(page) => page.clone(),
            Route::Unreachable => {
                tracing::debug!(url = %target, "Host does not answer");
                return std::future::pending().await;
            }
        };
        tokio::time::sleep(page.get_latency()).await;
        let document = page.build(target.as_str())?;
        self.timers.reset();
        let url = {
            let mut current = self.document.lock();
            *current = document;
            self.flush_timers(&mut current);
            current.url().to_string()
        };
        if wait_until == WaitUntil::NetworkIdle {
            self.network_idle().await;
        }
        tracing::debug!(url = %url, "Navigation committed");
        Ok(Some(Response::new(url, 200)))
    }

    /// Navigates to the current URL again.
    ///
    /// See: <https://playwright.dev/docs/api/class-frame#frame-reload>
    pub async fn reload(&self, options: Option<GotoOptions>) -> Result<Option<Response>> {
        let url = self.url();
        self.goto(&url, options).await
    }

    /// Replaces the document with `html`, keeping the URL.
    pub async fn set_content(&self, html: &str) -> Result<()> {
        self.ensure_open()?;
        self.timers.reset();
        let mut current = self.document.lock();
        let url = current.url().to_string();
        let mut document = Document::from_html(html);
        document.set_url(url);
        *current = document;
        Ok(())
    }

    /// Waits until the page reaches `state` (`Load` when `None`).
    ///
    /// Documents are loaded as soon as navigation returns, so only
    /// `NetworkIdle` can wait: it resolves once no timer has been pending
    /// for 500ms. Uses the navigation timeout.
    ///
    /// See: <https://playwright.dev/docs/api/class-frame#frame-wait-for-load-state>
    pub async fn wait_for_load_state(&self, state: Option<LoadState>) -> Result<()> {
        self.ensure_open()?;
        let state = state.unwrap_or(LoadState::Load);
        if state != LoadState::NetworkIdle {
            return Ok(());
        }
        let timeout = self.settings.navigation_timeout(None);
        run_with_timeout(
            TimeoutScope::Navigation,
            timeout,
            "waiting for load state \"networkidle\"",
            async {
                self.network_idle().await;
                Ok(())
            },
        )
        .await
    }

    async fn network_idle(&self) {
        let mut idle_since: Option<Instant> = None;
        loop {
            if self.timers.pending() == 0 {
                let since = *idle_since.get_or_insert_with(Instant::now);
                if since.elapsed() >= crate::NETWORK_IDLE {
                    return;
                }
            } else {
                idle_since = None;
            }
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Sleeps unconditionally. Only the enclosing test timeout can cut it short.
    ///
    /// See: <https://playwright.dev/docs/api/class-frame#frame-wait-for-timeout>
    pub async fn wait_for_timeout(&self, timeout_ms: f64) {
        tokio::time::sleep(crate::protocol::timeout_settings::from_millis(timeout_ms)).await;
    }

    /// Runs `f` against the live document; timers it schedules start running.
    pub fn evaluate<T>(&self, f: impl FnOnce(&mut Document) -> T) -> Result<T> {
        self.ensure_open()?;
        let mut doc = self.document.lock();
        let value = f(&mut doc);
        self.flush_timers(&mut doc);
        Ok(value)
    }

    /// Returns the frame's title.
    ///
    /// See: <https://playwright.dev/docs/api/class-frame#frame-title>
    pub async fn title(&self) -> Result<String> {
        self.ensure_open()?;
        Ok(self.document.lock().title().to_string())
    }

    /// Returns the serialised document, including the doctype.
    ///
    /// See: <https://playwright.dev/docs/api/class-frame#frame-content>
    pub async fn content(&self) -> Result<String> {
        self.ensure_open()?;
        let doc = self.document.lock();
        Ok(format!("<!DOCTYPE html>{}", doc.outer_html(doc.root())))
    }

    pub(crate) fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            self.timers.reset();
        }
    }

    // ------------------------------------------------------------------
    // Polling core
    // ------------------------------------------------------------------

    async fn poll<T>(
        &self,
        timeout: Option<Duration>,
        mut attempt: impl FnMut(&mut Document, &Layout) -> Poll<T>,
        on_timeout: impl FnOnce(u64, Predicate, Option<String>) -> Error,
    ) -> Result<T> {
        let deadline = Deadline::new(timeout);
        let mut waiting_on = (Predicate::Attached, None);
        loop {
            self.ensure_open()?;
            let outcome = {
                let mut doc = self.document.lock();
                let layout = Layout::compute(&doc, self.viewport(), Instant::now());
                let outcome = attempt(&mut doc, &layout);
                self.flush_timers(&mut doc);
                outcome
            };
            match outcome {
                Poll::Done(result) => return result,
                Poll::Waiting { predicate, detail } => {
                    if waiting_on.0 != predicate {
                        tracing::trace!(%predicate, "Waiting for element");
                    }
                    waiting_on = (predicate, detail);
                }
            }
            if deadline.is_expired() {
                let (predicate, detail) = waiting_on;
                return Err(on_timeout(deadline.timeout_ms(), predicate, detail));
            }
            tokio::time::sleep(deadline.next_sleep(self.poll_interval)).await;
        }
    }

    /// Resolves `selector` once, without waiting.
    pub(crate) fn inspect<T>(
        &self,
        selector: &Selector,
        f: impl FnOnce(&QueryContext<'_>, Resolved) -> T,
    ) -> Result<T> {
        self.ensure_open()?;
        let doc = self.document.lock();
        let layout = Layout::compute(&doc, self.viewport(), Instant::now());
        let cx = QueryContext {
            doc: &doc,
            layout: &layout,
        };
        let resolved = selector.resolve(&cx)?;
        Ok(f(&cx, resolved))
    }

    pub(crate) fn single(selector: &Selector, resolved: &Resolved) -> std::result::Result<Option<NodeId>, Error> {
        match resolved.nodes.as_slice() {
            [] => Ok(None),
            [node] => Ok(Some(*node)),
            nodes => Err(Error::StrictModeViolation {
                selector: selector.to_string(),
                count: nodes.len(),
            }),
        }
    }

    /// Waits for actionability, then runs `perform` under the same lock.
    ///
    /// Returns `None` for trial runs.
    async fn act<T>(
        &self,
        request: ActionRequest<'_>,
        mut perform: impl FnMut(&mut Document, Target) -> Result<T>,
    ) -> Result<Option<T>> {
        let ActionRequest {
            selector,
            kind,
            force,
            trial,
            timeout,
            position,
        } = request;
        let timeout = self.settings.timeout(timeout);
        let required: &[Predicate] = if force { &[Predicate::Attached] } else { kind.required() };
        let point = position.map(|p| (p.x, p.y));
        let mut previous: Option<Observation> = None;
        tracing::debug!(action = kind.name(), selector = %selector, ?timeout, force, trial, "Performing action");

        let attempt = |doc: &mut Document, layout: &Layout| -> Poll<Option<T>> {
            let resolved = {
                let cx = QueryContext { doc, layout };
                match selector.resolve(&cx) {
                    Ok(resolved) => resolved,
                    Err(e) => return Poll::Done(Err(e)),
                }
            };
            let node = match Self::single(selector, &resolved) {
                Ok(Some(node)) => node,
                Ok(None) => {
                    previous = None;
                    return Poll::Waiting {
                        predicate: Predicate::Attached,
                        detail: resolved.detail,
                    };
                }
                Err(e) => return Poll::Done(Err(e)),
            };
            if kind.needs_text_target() && doc.is_editable(doc.retarget_control(node)).is_none() {
                let tag = doc.element(node).map(|el| el.tag().to_string()).unwrap_or_default();
                return Poll::Done(Err(Error::NotEditable {
                    selector: selector.to_string(),
                    tag,
                }));
            }
            match evaluate(doc, layout, node, required, point, &mut previous) {
                Readiness::Waiting { predicate, detail } => Poll::Waiting { predicate, detail },
                Readiness::Failed(e) => Poll::Done(Err(e)),
                Readiness::Ready(_) if trial => Poll::Done(Ok(None)),
                Readiness::Ready(node) => {
                    let hit = layout
                        .rect(node)
                        .and_then(|rect| {
                            let (x, y) = match point {
                                Some((dx, dy)) => (rect.x + dx, rect.y + dy),
                                None => rect.center(),
                            };
                            layout.hit_test(x, y)
                        })
                        .filter(|hit| doc.contains(node, *hit))
                        .unwrap_or(node);
                    tracing::trace!(target = %describe(doc, hit), "Element is actionable");
                    Poll::Done(perform(doc, Target { node, hit }).map(Some))
                }
            }
        };
        let on_timeout = |timeout_ms, predicate, detail| Error::ActionTimeout {
            action: kind.name().to_string(),
            selector: selector.to_string(),
            predicate,
            timeout_ms,
            detail,
        };
        let outcome = self.poll(timeout, attempt, on_timeout).await?;
        if !self.slow_mo.is_zero() {
            tokio::time::sleep(self.slow_mo).await;
        }
        Ok(outcome)
    }

    /// Waits for the locator to resolve to one attached element, then reads it.
    async fn read<T>(
        &self,
        selector: &Selector,
        action: &'static str,
        mut extract: impl FnMut(&Document, &Layout, NodeId) -> Result<T>,
    ) -> Result<T> {
        let timeout = self.settings.timeout(None);
        let attempt = |doc: &mut Document, layout: &Layout| -> Poll<T> {
            let cx = QueryContext { doc, layout };
            let resolved = match selector.resolve(&cx) {
                Ok(resolved) => resolved,
                Err(e) => return Poll::Done(Err(e)),
            };
            match Self::single(selector, &resolved) {
                Ok(Some(node)) => Poll::Done(extract(doc, layout, node)),
                Ok(None) => Poll::Waiting {
                    predicate: Predicate::Attached,
                    detail: resolved.detail,
                },
                Err(e) => Poll::Done(Err(e)),
            }
        };
        let on_timeout = |timeout_ms, predicate, detail| Error::ActionTimeout {
            action: action.to_string(),
            selector: selector.to_string(),
            predicate,
            timeout_ms,
            detail,
        };
        self.poll(timeout, attempt, on_timeout).await
    }

    // ------------------------------------------------------------------
    // Locator queries that never wait
    // ------------------------------------------------------------------

    pub(crate) async fn locator_count(&self, selector: &Selector) -> Result<usize> {
        self.inspect(selector, |_, resolved| resolved.nodes.len())
    }

    pub(crate) async fn locator_all_text_contents(&self, selector: &Selector) -> Result<Vec<String>> {
        self.inspect(selector, |cx, resolved| {
            resolved
                .nodes
                .iter()
                .map(|n| cx.doc.text_content(*n))
                .collect()
        })
    }

    pub(crate) async fn locator_all_inner_texts(&self, selector: &Selector) -> Result<Vec<String>> {
        self.inspect(selector, |cx, resolved| {
            resolved
                .nodes
                .iter()
                .map(|n| cx.doc.inner_text(cx.layout, *n))
                .collect()
        })
    }

    pub(crate) async fn locator_is_visible(&self, selector: &Selector) -> Result<bool> {
        self.inspect(selector, |cx, resolved| -> Result<bool> {
            Ok(Self::single(selector, &resolved)?.is_some_and(|n| cx.layout.is_visible(n)))
        })?
    }

    // ------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------

    pub(crate) async fn locator_text_content(&self, selector: &Selector) -> Result<Option<String>> {
        self.read(selector, "text_content", |doc, _, node| Ok(Some(doc.text_content(node))))
            .await
    }

    pub(crate) async fn locator_inner_text(&self, selector: &Selector) -> Result<String> {
        self.read(selector, "inner_text", |doc, layout, node| Ok(doc.inner_text(layout, node)))
            .await
    }

    pub(crate) async fn locator_inner_html(&self, selector: &Selector) -> Result<String> {
        self.read(selector, "inner_html", |doc, _, node| Ok(doc.inner_html(node)))
            .await
    }

    pub(crate) async fn locator_get_attribute(
        &self,
        selector: &Selector,
        name: &str,
    ) -> Result<Option<String>> {
        self.read(selector, "get_attribute", |doc, _, node| {
            Ok(doc.get_attribute(node, name).map(str::to_string))
        })
        .await
    }

    pub(crate) async fn locator_input_value(&self, selector: &Selector) -> Result<String> {
        self.read(selector, "input_value", |doc, _, node| {
            let control = doc.retarget_control(node);
            match doc.element(control).map(|el| el.tag()) {
                Some("input" | "textarea" | "select") => Ok(doc.value(control).unwrap_or_default()),
                _ => Err(Error::InvalidArgument(
                    "Node is not an <input>, <textarea> or <select> element".to_string(),
                )),
            }
        })
        .await
    }

    pub(crate) async fn locator_is_enabled(&self, selector: &Selector) -> Result<bool> {
        self.read(selector, "is_enabled", |doc, _, node| {
            Ok(doc.is_enabled(doc.retarget_control(node)))
        })
        .await
    }

    pub(crate) async fn locator_is_checked(&self, selector: &Selector) -> Result<bool> {
        self.read(selector, "is_checked", |doc, _, node| {
            doc.is_checked(doc.retarget_control(node)).ok_or_else(|| {
                Error::InvalidArgument("Not a checkbox or radio button".to_string())
            })
        })
        .await
    }

    pub(crate) async fn locator_is_editable(&self, selector: &Selector) -> Result<bool> {
        self.read(selector, "is_editable", |doc, _, node| {
            doc.is_editable(doc.retarget_control(node))
                .ok_or_else(|| Error::NotEditable {
                    selector: selector.to_string(),
                    tag: doc.element(node).map(|el| el.tag().to_string()).unwrap_or_default(),
                })
        })
        .await
    }

    pub(crate) async fn locator_is_focused(&self, selector: &Selector) -> Result<bool> {
        self.read(selector, "is_focused", |doc, _, node| Ok(doc.focused() == Some(node)))
            .await
    }

    pub(crate) async fn locator_bounding_box(&self, selector: &Selector) -> Result<Option<Rect>> {
        self.read(selector, "bounding_box", |_, layout, node| {
            Ok(layout.rect(node).filter(|_| layout.is_rendered(node)))
        })
        .await
    }

    // ------------------------------------------------------------------
    // Actions
    // ------------------------------------------------------------------

    pub(crate) async fn locator_click(
        &self,
        selector: &Selector,
        options: Option<ClickOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let click_count = options.click_count.unwrap_or(1);
        let button = options.button.unwrap_or_default();
        let kind = if click_count >= 2 {
            ActionKind::DblClick
        } else {
            ActionKind::Click
        };
        let request = ActionRequest {
            selector,
            kind,
            force: options.force.unwrap_or(false),
            trial: options.trial.unwrap_or(false),
            timeout: options.timeout_override(),
            position: options.position,
        };
        self.act(request, |doc, target| {
            match button {
                MouseButton::Left => doc.click(target.hit, click_count),
                MouseButton::Right => doc.context_click(target.hit),
                MouseButton::Middle => doc.aux_click(target.hit),
            }
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_tap(
        &self,
        selector: &Selector,
        options: Option<ClickOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind: ActionKind::Tap,
            force: options.force.unwrap_or(false),
            trial: options.trial.unwrap_or(false),
            timeout: options.timeout_override(),
            position: options.position,
        };
        self.act(request, |doc, target| {
            doc.click(target.hit, 1);
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_hover(
        &self,
        selector: &Selector,
        options: Option<HoverOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind: ActionKind::Hover,
            force: options.force.unwrap_or(false),
            trial: options.trial.unwrap_or(false),
            timeout: options.timeout_override(),
            position: options.position,
        };
        self.act(request, |doc, target| {
            doc.hover(target.hit);
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_set_checked(
        &self,
        selector: &Selector,
        checked: bool,
        options: Option<CheckOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind: if checked {
                ActionKind::Check
            } else {
                ActionKind::Uncheck
            },
            force: options.force.unwrap_or(false),
            trial: options.trial.unwrap_or(false),
            timeout: options.timeout_override(),
            position: options.position,
        };
        self.act(request, |doc, target| {
            let control = doc.retarget_control(target.node);
            let Some(before) = doc.is_checked(control) else {
                return Err(Error::InvalidArgument(
                    "Not a checkbox or radio button".to_string(),
                ));
            };
            if before == checked {
                return Ok(());
            }
            doc.click(target.hit, 1);
            if doc.is_checked(control) != Some(checked) {
                return Err(Error::InvalidArgument(format!(
                    "Clicking the checkbox did not change its state [selector: {}]",
                    selector
                )));
            }
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_fill(
        &self,
        selector: &Selector,
        text: &str,
        options: Option<FillOptions>,
    ) -> Result<()> {
        self.fill_with(selector, ActionKind::Fill, text, options).await
    }

    pub(crate) async fn locator_clear(
        &self,
        selector: &Selector,
        options: Option<FillOptions>,
    ) -> Result<()> {
        self.fill_with(selector, ActionKind::Clear, "", options).await
    }

    async fn fill_with(
        &self,
        selector: &Selector,
        kind: ActionKind,
        text: &str,
        options: Option<FillOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind,
            force: options.force.unwrap_or(false),
            trial: false,
            timeout: options.timeout_override(),
            position: None,
        };
        self.act(request, |doc, target| {
            doc.fill(doc.retarget_control(target.node), text)
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_type(
        &self,
        selector: &Selector,
        text: &str,
        options: Option<PressOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind: ActionKind::Type,
            force: false,
            trial: false,
            timeout: options.timeout_override(),
            position: None,
        };
        self.act(request, |doc, target| {
            doc.type_text(doc.retarget_control(target.node), text)
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_press(
        &self,
        selector: &Selector,
        key: &str,
        options: Option<PressOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind: ActionKind::Press,
            force: false,
            trial: false,
            timeout: options.timeout_override(),
            position: None,
        };
        self.act(request, |doc, target| doc.press(target.node, key))
            .await?;
        Ok(())
    }

    pub(crate) async fn locator_focus(&self, selector: &Selector) -> Result<()> {
        let request = ActionRequest {
            selector,
            kind: ActionKind::Focus,
            force: false,
            trial: false,
            timeout: None,
            position: None,
        };
        self.act(request, |doc, target| {
            doc.focus(target.node);
            Ok(())
        })
        .await?;
        Ok(())
    }

    pub(crate) async fn locator_select_option(
        &self,
        selector: &Selector,
        value: SelectOption,
        options: Option<SelectOptions>,
    ) -> Result<Vec<String>> {
        let options = options.unwrap_or_default();
        let request = ActionRequest {
            selector,
            kind: ActionKind::SelectOption,
            force: options.force.unwrap_or(false),
            trial: false,
            timeout: options.timeout_override(),
            position: None,
        };
        let selected = self
            .act(request, |doc, target| {
                let select = target.node;
                if doc.element(select).map(|el| el.tag()) != Some("select") {
                    return Err(Error::InvalidArgument(
                        "Element is not a <select> element".to_string(),
                    ));
                }
                let chosen = doc
                    .descendants(select)
                    .into_iter()
                    .filter(|n| doc.element(*n).is_some_and(|el| el.tag() == "option"))
                    .enumerate()
                    .find(|(index, option)| {
                        let label = doc.text_content(*option);
                        value.matches(*index, &doc.option_value(*option), &label)
                    })
                    .map(|(_, option)| doc.option_value(option))
                    .ok_or_else(|| {
                        Error::InvalidArgument(format!("No option matching {:?}", value))
                    })?;
                doc.set_value(select, &chosen)?;
                doc.dispatch_event(select, EventType::Input);
                doc.dispatch_event(select, EventType::Change);
                Ok(vec![chosen])
            })
            .await?;
        Ok(selected.unwrap_or_default())
    }

    /// Waits for the locator to reach `options.state` under the action timeout.
    pub(crate) async fn locator_wait_for(
        &self,
        selector: &Selector,
        options: Option<WaitForOptions>,
    ) -> Result<()> {
        let options = options.unwrap_or_default();
        let state = options.state.unwrap_or_default();
        let timeout = self.settings.timeout(options.timeout_override());
        tracing::debug!(selector = %selector, state = state.as_str(), ?timeout, "Waiting for locator");

        let attempt = |doc: &mut Document, layout: &Layout| -> Poll<()> {
            let cx = QueryContext { doc, layout };
            let resolved = match selector.resolve(&cx) {
                Ok(resolved) => resolved,
                Err(e) => return Poll::Done(Err(e)),
            };
            let node = match Self::single(selector, &resolved) {
                Ok(node) => node,
                Err(e) => return Poll::Done(Err(e)),
            };
            let visible = node.is_some_and(|n| layout.is_visible(n));
            let reached = match state {
                WaitForState::Attached => node.is_some(),
                WaitForState::Detached => node.is_none(),
                WaitForState::Visible => visible,
                WaitForState::Hidden => !visible,
            };
            if reached {
                return Poll::Done(Ok(()));
            }
            let predicate = if node.is_none() {
                Predicate::Attached
            } else {
                Predicate::Visible
            };
            Poll::Waiting {
                predicate,
                detail: resolved.detail,
            }
        };
        let on_timeout = |timeout_ms, predicate, detail| match state {
            WaitForState::Attached | WaitForState::Visible => Error::ActionTimeout {
                action: "wait_for".to_string(),
                selector: selector.to_string(),
                predicate,
                timeout_ms,
                detail,
            },
            WaitForState::Detached | WaitForState::Hidden => Error::Timeout {
                scope: TimeoutScope::Action,
                timeout_ms,
                context: Some(format!(
                    "waiting for locator('{}') to be {}",
                    selector,
                    state.as_str()
                )),
            },
        };
        self.poll(timeout, attempt, on_timeout).await
    }
}
