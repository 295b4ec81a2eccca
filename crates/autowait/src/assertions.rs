// Assertions - auto-retrying and static expectations
//
// `expect(locator)` matchers re-resolve the locator every poll until the
// expected state is observed or the assertion timeout elapses. `expect_value`
// matchers compare a plain value once. Either kind can be made soft: the
// mismatch is recorded on the running test's TestInfo and the call returns
// Ok so the test keeps going.
//
// See: https://playwright.dev/docs/test-assertions

use crate::dom::NodeId;
use crate::dom::selector::QueryContext;
use crate::dom::text::normalize_whitespace;
use crate::error::{Error, Result};
use crate::protocol::Locator;
use crate::protocol::actionability::Predicate;
use crate::protocol::frame::Frame;
use crate::protocol::locator::{Resolved, Selector};
use crate::protocol::timeout_settings::{Deadline, limit};
use crate::runner::TestInfo;
use regex::Regex;
use std::fmt::Debug;
use std::time::Duration;

/// Polling interval for locator assertions (100ms)
const ASSERTION_POLL_INTERVAL: Duration = Duration::from_millis(100);

const NOT_FOUND: &str = "<element(s) not found>";

/// Creates an expectation for a locator with auto-retry behavior.
///
/// Assertions will retry until they pass or timeout (default: 5 seconds).
///
/// # Example
///
/// ```ignore
/// use autowait::{expect, fixtures, Playwright};
/// use std::time::Duration;
///
/// let playwright = Playwright::launch(fixtures::ajax_demo());
/// let browser = playwright.chromium().launch().await?;
/// let page = browser.new_page().await?;
/// page.goto(fixtures::AJAX_URL, None).await?;
/// page.get_by_text("Button Triggering AJAX Request").click(None).await?;
///
/// expect(page.locator(".bg-success"))
///     .with_timeout(Duration::from_secs(20))
///     .to_have_text(fixtures::AJAX_SUCCESS_TEXT)
///     .await?;
/// expect(page.locator("#spinner")).to_be_hidden().await?;
/// ```
///
/// See: <https://playwright.dev/docs/test-assertions>
pub fn expect(locator: Locator) -> Expectation {
    Expectation::new(locator)
}

/// Creates a static expectation that checks `actual` once.
///
/// ```ignore
/// let texts = page.locator("nb-radio").all_text_contents().await?;
/// expect_value(texts.len()).to_be(3)?;
/// expect_value(texts).to_contain("Option 1")?;
/// ```
pub fn expect_value<T>(actual: T) -> ValueExpectation<T> {
    ValueExpectation {
        actual,
        negate: false,
        soft: None,
    }
}

/// What one poll saw. `matched` is `None` when the element the matcher
/// needs is missing, which fails the matcher whether or not it is negated.
struct Observed {
    matched: Option<bool>,
    actual: String,
}

impl Observed {
    fn found(matched: bool, actual: impl Into<String>) -> Self {
        Self {
            matched: Some(matched),
            actual: actual.into(),
        }
    }

    fn missing() -> Self {
        Self {
            matched: None,
            actual: NOT_FOUND.to_string(),
        }
    }
}

/// Expectation wraps a locator and provides assertion methods with auto-retry.
#[derive(Debug, Clone)]
pub struct Expectation {
    locator: Locator,
    timeout: Option<Duration>,
    poll_interval: Duration,
    negate: bool,
    soft: Option<TestInfo>,
}

// to_* methods consume self, matching the chained expect API
#[allow(clippy::wrong_self_convention)]
impl Expectation {
    pub(crate) fn new(locator: Locator) -> Self {
        Self {
            locator,
            timeout: Some(crate::DEFAULT_ASSERTION_TIMEOUT),
            poll_interval: ASSERTION_POLL_INTERVAL,
            negate: false,
            soft: None,
        }
    }

    /// Sets a custom timeout for this assertion. Zero polls without limit.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = limit(timeout);
        self
    }

    /// Sets a custom poll interval for this assertion.
    ///
    /// Default is 100ms.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval.max(Duration::from_millis(1));
        self
    }

    /// Negates the assertion.
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Makes the assertion soft: a failure is recorded on `info` and the
    /// matcher returns `Ok(())`.
    pub fn soft(mut self, info: &TestInfo) -> Self {
        self.soft = Some(info.clone());
        self
    }

    pub(crate) fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Asserts that the element is visible.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-visible>
    pub async fn to_be_visible(self) -> Result<()> {
        self.run("to_be_visible", "visible".to_string(), |cx, selector, resolved| {
            let visible = Frame::single(selector, &resolved)?.is_some_and(|n| cx.layout.is_visible(n));
            Ok(Observed::found(visible, if visible { "visible" } else { "hidden" }))
        })
        .await
    }

    /// Asserts that the element is hidden or missing.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-hidden>
    pub async fn to_be_hidden(self) -> Result<()> {
        self.run("to_be_hidden", "hidden".to_string(), |cx, selector, resolved| {
            let visible = Frame::single(selector, &resolved)?.is_some_and(|n| cx.layout.is_visible(n));
            Ok(Observed::found(!visible, if visible { "visible" } else { "hidden" }))
        })
        .await
    }

    /// Asserts that the locator resolves to an element in the document.
    pub async fn to_be_attached(self) -> Result<()> {
        self.run("to_be_attached", "attached".to_string(), |_, selector, resolved| {
            let attached = Frame::single(selector, &resolved)?.is_some();
            Ok(Observed::found(attached, if attached { "attached" } else { "detached" }))
        })
        .await
    }

    /// Asserts that the locator resolves to exactly `count` elements.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-count>
    pub async fn to_have_count(self, count: usize) -> Result<()> {
        self.run("to_have_count", count.to_string(), move |_, _, resolved| {
            let actual = resolved.nodes.len();
            Ok(Observed::found(actual == count, actual.to_string()))
        })
        .await
    }

    /// Asserts that the element's text equals `expected` after whitespace
    /// normalisation.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-text>
    pub async fn to_have_text(self, expected: &str) -> Result<()> {
        let want = normalize_whitespace(expected);
        self.text_matcher("to_have_text", format!("{:?}", expected), move |text| text == want)
            .await
    }

    /// Asserts that the element's text matches the regex pattern.
    pub async fn to_have_text_regex(self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        self.text_matcher("to_have_text", format!("/{}/", pattern), move |text| re.is_match(text))
            .await
    }

    /// Asserts that the element's text contains `expected` (case-sensitive).
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-contain-text>
    pub async fn to_contain_text(self, expected: &str) -> Result<()> {
        let want = normalize_whitespace(expected);
        self.text_matcher("to_contain_text", format!("{:?}", expected), move |text| {
            text.contains(&want)
        })
        .await
    }

    /// Asserts that part of the element's text matches the regex pattern.
    pub async fn to_contain_text_regex(self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        self.text_matcher("to_contain_text", format!("/{}/", pattern), move |text| {
            re.is_match(text)
        })
        .await
    }

    /// Asserts that the input element has the specified value.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-value>
    pub async fn to_have_value(self, expected: &str) -> Result<()> {
        let want = expected.to_string();
        self.value_matcher(format!("{:?}", expected), move |value| value == want)
            .await
    }

    /// Asserts that the input element's value matches the regex pattern.
    pub async fn to_have_value_regex(self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        self.value_matcher(format!("/{}/", pattern), move |value| re.is_match(value))
            .await
    }

    /// Asserts that the element's `class` attribute equals `expected`.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-class>
    pub async fn to_have_class(self, expected: &str) -> Result<()> {
        let want = normalize_whitespace(expected);
        self.class_matcher(format!("{:?}", expected), move |class| {
            normalize_whitespace(class) == want
        })
        .await
    }

    /// Asserts that the element's `class` attribute matches the regex
    /// pattern, as in `toHaveClass(/checked/)`.
    pub async fn to_have_class_regex(self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        self.class_matcher(format!("/{}/", pattern), move |class| re.is_match(class))
            .await
    }

    /// Asserts that the element has attribute `name` equal to `value`.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-have-attribute>
    pub async fn to_have_attribute(self, name: &str, value: &str) -> Result<()> {
        let expected = format!("{}={:?}", name, value);
        self.run("to_have_attribute", expected, |cx, selector, resolved| {
            let Some(node) = Frame::single(selector, &resolved)? else {
                return Ok(Observed::missing());
            };
            Ok(match cx.doc.get_attribute(node, name) {
                Some(actual) => Observed::found(actual == value, format!("{}={:?}", name, actual)),
                None => Observed::found(false, format!("no {} attribute", name)),
            })
        })
        .await
    }

    /// Asserts that the element (or the control its label targets) is enabled.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-enabled>
    pub async fn to_be_enabled(self) -> Result<()> {
        self.state_matcher("to_be_enabled", |cx, _, node| {
            let enabled = cx.doc.is_enabled(cx.doc.retarget_control(node));
            Ok(Observed::found(enabled, if enabled { "enabled" } else { "disabled" }))
        })
        .await
    }

    /// Asserts that the element is disabled.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-disabled>
    pub async fn to_be_disabled(self) -> Result<()> {
        self.state_matcher("to_be_disabled", |cx, _, node| {
            let enabled = cx.doc.is_enabled(cx.doc.retarget_control(node));
            Ok(Observed::found(!enabled, if enabled { "enabled" } else { "disabled" }))
        })
        .await
    }

    /// Asserts that the checkbox or radio is checked.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-checked>
    pub async fn to_be_checked(self) -> Result<()> {
        self.checked_matcher("to_be_checked", true).await
    }

    /// Asserts that the checkbox or radio is not checked.
    pub async fn to_be_unchecked(self) -> Result<()> {
        self.checked_matcher("to_be_unchecked", false).await
    }

    /// Asserts that the element is editable.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-editable>
    pub async fn to_be_editable(self) -> Result<()> {
        self.state_matcher("to_be_editable", |cx, selector, node| {
            let editable = cx.doc.is_editable(cx.doc.retarget_control(node)).ok_or_else(|| {
                Error::NotEditable {
                    selector: selector.to_string(),
                    tag: cx
                        .doc
                        .element(node)
                        .map(|el| el.tag().to_string())
                        .unwrap_or_default(),
                }
            })?;
            Ok(Observed::found(editable, if editable { "editable" } else { "readonly" }))
        })
        .await
    }

    /// Asserts that the element has focus.
    ///
    /// See: <https://playwright.dev/docs/test-assertions#locator-assertions-to-be-focused>
    pub async fn to_be_focused(self) -> Result<()> {
        self.state_matcher("to_be_focused", |cx, _, node| {
            let focused = cx.doc.focused() == Some(node);
            Ok(Observed::found(focused, if focused { "focused" } else { "not focused" }))
        })
        .await
    }

    async fn text_matcher(
        self,
        matcher: &'static str,
        expected: String,
        accept: impl Fn(&str) -> bool,
    ) -> Result<()> {
        self.run(matcher, expected, |cx, selector, resolved| {
            let Some(node) = Frame::single(selector, &resolved)? else {
                return Ok(Observed::missing());
            };
            let text = normalize_whitespace(&cx.doc.text_content(node));
            Ok(Observed::found(accept(&text), format!("{:?}", text)))
        })
        .await
    }

    async fn value_matcher(self, expected: String, accept: impl Fn(&str) -> bool) -> Result<()> {
        self.run("to_have_value", expected, |cx, selector, resolved| {
            let Some(node) = Frame::single(selector, &resolved)? else {
                return Ok(Observed::missing());
            };
            let control = cx.doc.retarget_control(node);
            match cx.doc.element(control).map(|el| el.tag()) {
                Some("input" | "textarea" | "select") => {
                    let value = cx.doc.value(control).unwrap_or_default();
                    Ok(Observed::found(accept(&value), format!("{:?}", value)))
                }
                _ => Err(Error::InvalidArgument(
                    "Node is not an <input>, <textarea> or <select> element".to_string(),
                )),
            }
        })
        .await
    }

    async fn class_matcher(self, expected: String, accept: impl Fn(&str) -> bool) -> Result<()> {
        self.run("to_have_class", expected, |cx, selector, resolved| {
            let Some(node) = Frame::single(selector, &resolved)? else {
                return Ok(Observed::missing());
            };
            let class = cx.doc.get_attribute(node, "class").unwrap_or_default();
            Ok(Observed::found(accept(class), format!("{:?}", class)))
        })
        .await
    }

    async fn checked_matcher(self, matcher: &'static str, want: bool) -> Result<()> {
        self.state_matcher(matcher, move |cx, _, node| {
            let checked = cx
                .doc
                .is_checked(cx.doc.retarget_control(node))
                .ok_or_else(|| Error::InvalidArgument("Not a checkbox or radio button".to_string()))?;
            Ok(Observed::found(checked == want, if checked { "checked" } else { "unchecked" }))
        })
        .await
    }

    /// Matchers about the state of one element; a missing element never
    /// satisfies them.
    async fn state_matcher(
        self,
        matcher: &'static str,
        probe: impl Fn(&QueryContext<'_>, &Selector, NodeId) -> Result<Observed>,
    ) -> Result<()> {
        let expected = matcher.trim_start_matches("to_be_").to_string();
        self.run(matcher, expected, |cx, selector, resolved| {
            match Frame::single(selector, &resolved)? {
                Some(node) => probe(cx, selector, node),
                None => Ok(Observed::missing()),
            }
        })
        .await
    }

    /// Polls `probe`, then applies soft mode to the outcome.
    async fn run<F>(self, matcher: &'static str, expected: String, probe: F) -> Result<()>
    where
        F: FnMut(&QueryContext<'_>, &Selector, Resolved) -> Result<Observed>,
    {
        let outcome = self.poll(matcher, &expected, probe).await;
        match (outcome, &self.soft) {
            (Err(e), Some(info)) => {
                info.record_soft_failure(&e);
                Ok(())
            }
            (outcome, _) => outcome,
        }
    }

    async fn poll<F>(&self, matcher: &'static str, expected: &str, mut probe: F) -> Result<()>
    where
        F: FnMut(&QueryContext<'_>, &Selector, Resolved) -> Result<Observed>,
    {
        let frame = self.locator.frame();
        let selector = self.locator.query();
        let deadline = Deadline::new(self.timeout);
        tracing::debug!(matcher, %selector, negate = self.negate, timeout = ?self.timeout, "Polling assertion");
        loop {
            let observed = frame.inspect(selector, |cx, resolved| probe(cx, selector, resolved))??;
            if observed.matched.is_some_and(|m| m != self.negate) {
                return Ok(());
            }
            if deadline.is_expired() {
                return Err(Error::AssertionTimeout {
                    message: format!(
                        "expect(locator('{}')){}.{}({}) failed after {}ms: received {}",
                        selector,
                        if self.negate { ".not()" } else { "" },
                        matcher,
                        expected,
                        deadline.timeout_ms(),
                        observed.actual
                    ),
                    predicate: observed.matched.is_none().then_some(Predicate::Attached),
                });
            }
            tokio::time::sleep(deadline.next_sleep(self.poll_interval)).await;
        }
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| Error::InvalidArgument(format!("Invalid regex: {}", e)))
}

/// Static expectation over a plain value. Matchers evaluate once and never
/// wait.
#[derive(Debug)]
pub struct ValueExpectation<T> {
    actual: T,
    negate: bool,
    soft: Option<TestInfo>,
}

#[allow(clippy::wrong_self_convention)]
impl<T: Debug> ValueExpectation<T> {
    #[allow(clippy::should_implement_trait)]
    pub fn not(mut self) -> Self {
        self.negate = !self.negate;
        self
    }

    /// Records a mismatch on `info` instead of returning it.
    pub fn soft(mut self, info: &TestInfo) -> Self {
        self.soft = Some(info.clone());
        self
    }

    fn check(&self, matcher: &str, passed: bool, expected: impl Debug) -> Result<()> {
        if passed != self.negate {
            return Ok(());
        }
        let err = Error::AssertionFailed(format!(
            "expect({:?}){}.{}({:?})",
            self.actual,
            if self.negate { ".not()" } else { "" },
            matcher,
            expected
        ));
        match &self.soft {
            Some(info) => {
                info.record_soft_failure(&err);
                Ok(())
            }
            None => Err(err),
        }
    }

    /// Asserts `actual == expected`.
    pub fn to_be<U>(&self, expected: U) -> Result<()>
    where
        T: PartialEq<U>,
        U: Debug,
    {
        self.check("to_be", self.actual == expected, expected)
    }

    /// Structural equality; identical to [`to_be`](Self::to_be) for Rust values.
    pub fn to_equal<U>(&self, expected: U) -> Result<()>
    where
        T: PartialEq<U>,
        U: Debug,
    {
        self.check("to_equal", self.actual == expected, expected)
    }
}

impl<T: Debug> ValueExpectation<Vec<T>> {
    /// Asserts that the list holds an item equal to `item`.
    pub fn to_contain<U>(&self, item: U) -> Result<()>
    where
        T: PartialEq<U>,
        U: Debug,
    {
        let found = self.actual.iter().any(|a| *a == item);
        self.check("to_contain", found, item)
    }

    pub fn to_have_length(&self, length: usize) -> Result<()> {
        self.check("to_have_length", self.actual.len() == length, length)
    }
}

impl ValueExpectation<String> {
    /// Asserts that the string contains `needle`.
    pub fn to_contain(&self, needle: &str) -> Result<()> {
        self.check("to_contain", self.actual.contains(needle), needle)
    }

    /// Asserts that the string matches the regex pattern.
    pub fn to_match(&self, pattern: &str) -> Result<()> {
        let re = compile(pattern)?;
        self.check("to_match", re.is_match(&self.actual), pattern)
    }
}

impl ValueExpectation<Option<String>> {
    /// Asserts `Some(expected)`; convenient for `text_content()` results.
    pub fn to_be_text(&self, expected: &str) -> Result<()> {
        let passed = self.actual.as_deref() == Some(expected);
        self.check("to_be", passed, expected)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{Page, Playwright};
    use crate::server::WebApp;

    async fn page(html: &str) -> Page {
        let playwright = Playwright::launch(WebApp::new());
        let browser = playwright.chromium().launch().await.unwrap();
        let page = browser.new_page().await.unwrap();
        page.set_content(html).await.unwrap();
        page
    }

    #[tokio::test(start_paused = true)]
    async fn test_expectation_defaults() {
        let page = page("<p>hi</p>").await;
        let expectation = expect(page.locator("p"));
        assert_eq!(expectation.timeout(), Some(Duration::from_secs(5)));
        assert_eq!(
            expectation.with_timeout(Duration::ZERO).timeout(),
            None
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_to_have_text_waits_for_late_element() {
        let page = page("<div id='content'></div>").await;
        page.evaluate(|doc| {
            doc.set_timeout(Duration::from_secs(2), |doc| {
                if let Some(content) = doc.get_element_by_id("content") {
                    let _ = doc.append_html(content, "<p class='bg-success'>Data   loaded</p>");
                }
            });
        })
        .unwrap();

        expect(page.locator(".bg-success"))
            .to_have_text("Data loaded")
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_reports_received_value() {
        let page = page("<button>Submit</button>").await;
        let err = expect(page.locator("button"))
            .with_timeout(Duration::from_millis(500))
            .to_have_text("Submittt")
            .await
            .unwrap_err();
        let message = err.to_string();
        assert!(matches!(err, Error::AssertionTimeout { .. }));
        assert!(message.contains("to_have_text(\"Submittt\")"), "{message}");
        assert!(message.contains("received \"Submit\""), "{message}");
        assert!(message.contains("500ms"), "{message}");
        assert!(!message.contains("waiting for element"), "{message}");
        assert_eq!(err.unsatisfied_predicate(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_element_fails_negated_state_matchers() {
        let page = page("<p>none</p>").await;
        let err = expect(page.locator("input"))
            .not()
            .with_timeout(Duration::from_millis(200))
            .to_be_enabled()
            .await
            .unwrap_err();
        assert!(err.to_string().contains(NOT_FOUND));
        assert_eq!(err.unsatisfied_predicate(), Some(Predicate::Attached));

        expect(page.locator("input")).to_be_hidden().await.unwrap();
        expect(page.locator("input")).not().to_be_attached().await.unwrap();
        expect(page.locator("input")).to_have_count(0).await.unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_strict_violation_is_immediate() {
        let page = page("<p>a</p><p>b</p>").await;
        let err = expect(page.locator("p"))
            .to_have_text("a")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::StrictModeViolation { count: 2, .. }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_class_and_value_matchers() {
        let page = page(
            "<span class='custom-checkbox checked'></span><input id='email' value='a@b.c'>",
        )
        .await;
        expect(page.locator(".custom-checkbox"))
            .to_have_class_regex("checked")
            .await
            .unwrap();
        expect(page.locator(".custom-checkbox"))
            .to_have_class("custom-checkbox  checked")
            .await
            .unwrap();
        expect(page.locator("#email")).to_have_value("a@b.c").await.unwrap();
        expect(page.locator("#email"))
            .to_have_attribute("id", "email")
            .await
            .unwrap();
    }

    #[tokio::test(start_paused = true)]
    async fn test_soft_failure_is_recorded() {
        let page = page("<button>Submit</button>").await;
        let info = TestInfo::detached("soft");
        expect(page.locator("button"))
            .soft(&info)
            .with_timeout(Duration::from_millis(300))
            .to_have_text("Submittt")
            .await
            .unwrap();
        expect_value(1).soft(&info).to_be(2).unwrap();
        let failures = info.soft_failures();
        assert_eq!(failures.len(), 2);
        assert!(failures[0].contains("Submittt"));
    }

    #[test]
    fn test_static_matchers() {
        expect_value(5).to_equal(5).unwrap();
        expect_value(5).not().to_be(6).unwrap();
        let texts = vec!["Option 1".to_string(), "Option 2".to_string()];
        expect_value(texts.clone()).to_contain("Option 1").unwrap();
        expect_value(texts).to_have_length(2).unwrap();
        expect_value(Some("Submit".to_string())).to_be_text("Submit").unwrap();
        expect_value("Data loaded".to_string()).to_match("^Data").unwrap();

        let err = expect_value(vec![1, 2]).to_contain(3).unwrap_err();
        assert!(matches!(err, Error::AssertionFailed(_)));
    }
}
