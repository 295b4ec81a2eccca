// Locator - Lazy element selector with auto-waiting
//
// Locators are the central piece of auto-waiting and retry-ability.
// They represent a way to find element(s) on the page at any given moment.
//
// Key characteristics:
// - Lazy: building one never looks at the document and never fails
// - Retryable: every action re-resolves and waits for actionability
// - Chainable: sub-locators via locator(), get_by_*(), filter(), nth()
//
// Architecture:
// - A Locator is a frame reference plus an immutable list of steps
// - Each step maps the current candidate set to a new one
// - Actions and reads delegate to Frame, which resolves under the document lock
//
// See: https://playwright.dev/docs/api/class-locator

use crate::dom::role::{
    accessible_name, heading_level, is_hidden_from_accessibility, label_texts, role_of,
};
use crate::dom::selector::{QueryContext, SelectorList};
use crate::dom::{NodeId, Rect, TextMatch};
use crate::error::{Error, Result};
use crate::protocol::{
    CheckOptions, ClickOptions, FillOptions, Frame, HoverOptions, PressOptions, SelectOption,
    SelectOptions, WaitForOptions,
};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Options for [`Locator::get_by_role`].
///
/// ```ignore
/// let email = page.get_by_role("textbox", Some(RoleOptions::new().name("Email")));
/// let submit = page.get_by_role("button", Some(RoleOptions::new().name("Submit").exact(true)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RoleOptions {
    /// Accessible name; substring and case-insensitive unless `exact`
    pub name: Option<TextMatch>,
    /// Match the name exactly (case-sensitive, whole string)
    pub exact: Option<bool>,
    /// Also match elements hidden from the accessibility tree
    pub include_hidden: Option<bool>,
    /// `checked` / `aria-checked` state
    pub checked: Option<bool>,
    /// `disabled` / `aria-disabled` state
    pub disabled: Option<bool>,
    /// Heading level
    pub level: Option<u32>,
}

impl RoleOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<TextMatch>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact = Some(exact);
        self
    }

    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = Some(include_hidden);
        self
    }

    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = Some(disabled);
        self
    }

    pub fn level(mut self, level: u32) -> Self {
        self.level = Some(level);
        self
    }

    fn name_matcher(&self) -> Option<TextMatch> {
        let name = self.name.clone()?;
        Some(match (name, self.exact.unwrap_or(false)) {
            (TextMatch::Substring(text), true) => TextMatch::Exact(text),
            (name, _) => name,
        })
    }
}

/// Narrowing predicates for [`Locator::filter`] and
/// [`Page::locator_with`](crate::protocol::Page::locator_with).
///
/// Every predicate must hold for an element to be kept. Adding the same
/// predicate twice requires both, which is what makes
/// `a.filter(x).filter(y)` equal to `a.filter(x.and(y))`.
///
/// ```ignore
/// let basic_form = page.locator("nb-card").filter(FilterOptions::new().has_text("Basic form"));
/// let grid = page.locator_with("nb-card", FilterOptions::new().has(page.locator("#inputEmail1")));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterOptions {
    has_text: Vec<TextMatch>,
    has_not_text: Vec<TextMatch>,
    has: Vec<Locator>,
    has_not: Vec<Locator>,
    visible: Vec<bool>,
}

impl FilterOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep elements whose text contains (or matches) `text`.
    pub fn has_text(mut self, text: impl Into<TextMatch>) -> Self {
        self.has_text.push(text.into());
        self
    }

    /// Keep elements whose text does not contain (or match) `text`.
    pub fn has_not_text(mut self, text: impl Into<TextMatch>) -> Self {
        self.has_not_text.push(text.into());
        self
    }

    /// Keep elements containing a match of `inner`, resolved relative to them.
    pub fn has(mut self, inner: Locator) -> Self {
        self.has.push(inner);
        self
    }

    /// Keep elements containing no match of `inner`.
    pub fn has_not(mut self, inner: Locator) -> Self {
        self.has_not.push(inner);
        self
    }

    /// Keep only visible (or only hidden) elements.
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible.push(visible);
        self
    }

    /// Conjunction of both filters.
    pub fn and(mut self, other: FilterOptions) -> Self {
        self.has_text.extend(other.has_text);
        self.has_not_text.extend(other.has_not_text);
        self.has.extend(other.has);
        self.has_not.extend(other.has_not);
        self.visible.extend(other.visible);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.has_text.is_empty()
            && self.has_not_text.is_empty()
            && self.has.is_empty()
            && self.has_not.is_empty()
            && self.visible.is_empty()
    }

    fn accepts(&self, cx: &QueryContext<'_>, node: NodeId) -> Result<bool> {
        let text = cx.doc.text_content(node);
        if !self.has_text.iter().all(|m| m.matches(&text)) {
            return Ok(false);
        }
        if self.has_not_text.iter().any(|m| m.matches(&text)) {
            return Ok(false);
        }
        if self.visible.iter().any(|v| cx.layout.is_visible(node) != *v) {
            return Ok(false);
        }
        for inner in &self.has {
            if inner.selector.resolve_from(cx, node)?.nodes.is_empty() {
                return Ok(false);
            }
        }
        for inner in &self.has_not {
            if !inner.selector.resolve_from(cx, node)?.nodes.is_empty() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn describe(&self) -> Vec<String> {
        let mut parts = Vec::new();
        parts.extend(
            self.has_text
                .iter()
                .map(|m| format!("internal:has-text={}", m.describe())),
        );
        parts.extend(
            self.has_not_text
                .iter()
                .map(|m| format!("internal:has-not-text={}", m.describe())),
        );
        parts.extend(
            self.has
                .iter()
                .map(|l| format!("internal:has={:?}", l.selector.to_string())),
        );
        parts.extend(
            self.has_not
                .iter()
                .map(|l| format!("internal:has-not={:?}", l.selector.to_string())),
        );
        parts.extend(self.visible.iter().map(|v| format!("visible={}", v)));
        parts
    }
}

/// One narrowing step of a locator.
#[derive(Debug, Clone)]
pub(crate) enum Step {
    Css(String),
    Role { role: String, options: RoleOptions },
    Text(TextMatch),
    Label(TextMatch),
    Placeholder(TextMatch),
    AltText(TextMatch),
    Title(TextMatch),
    TestId(String),
    Filter(FilterOptions),
    Nth(i32),
}

/// Candidates after resolution, plus why the set is empty when it is.
#[derive(Debug, Default)]
pub(crate) struct Resolved {
    pub nodes: Vec<NodeId>,
    pub detail: Option<String>,
}

/// The step list of a locator, resolvable against a document snapshot.
#[derive(Debug, Clone, Default)]
pub(crate) struct Selector {
    steps: Vec<Step>,
}

impl Selector {
    pub(crate) fn css(selector: &str) -> Self {
        Self {
            steps: vec![Step::Css(selector.to_string())],
        }
    }

    pub(crate) fn single(step: Step) -> Self {
        Self { steps: vec![step] }
    }

    fn then(&self, step: Step) -> Self {
        let mut steps = self.steps.clone();
        steps.push(step);
        Self { steps }
    }

    fn chain(&self, other: &Selector) -> Self {
        let mut steps = self.steps.clone();
        steps.extend(other.steps.iter().cloned());
        Self { steps }
    }

    /// Resolves against the whole document.
    pub(crate) fn resolve(&self, cx: &QueryContext<'_>) -> Result<Resolved> {
        self.resolve_from(cx, cx.doc.root())
    }

    /// Resolves with `scope`'s descendants as the first search space.
    pub(crate) fn resolve_from(&self, cx: &QueryContext<'_>, scope: NodeId) -> Result<Resolved> {
        let mut current = vec![scope];
        let mut detail = None;
        for step in &self.steps {
            current = match step {
                Step::Nth(index) => {
                    let len = current.len() as i64;
                    let position = if *index < 0 {
                        len + i64::from(*index)
                    } else {
                        i64::from(*index)
                    };
                    if position >= 0 && position < len {
                        vec![current[position as usize]]
                    } else {
                        if len > 0 {
                            detail = Some(format!(
                                "nth={} is out of range, locator resolved to {} element{}",
                                index,
                                len,
                                if len == 1 { "" } else { "s" }
                            ));
                        }
                        Vec::new()
                    }
                }
                Step::Filter(filter) => {
                    let mut kept = Vec::with_capacity(current.len());
                    for node in current {
                        if filter.accepts(cx, node)? {
                            kept.push(node);
                        }
                    }
                    kept
                }
                query => {
                    let mut matched: Vec<NodeId> = Vec::new();
                    for parent in &current {
                        matched.extend(query_descendants(cx, query, *parent)?);
                    }
                    if current.len() > 1 {
                        in_document_order(cx, matched)
                    } else {
                        matched
                    }
                }
            };
            if current.is_empty() {
                break;
            }
        }
        Ok(Resolved {
            nodes: current,
            detail,
        })
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = Vec::new();
        for step in &self.steps {
            match step {
                Step::Css(css) => parts.push(css.clone()),
                Step::Role { role, options } => {
                    let mut part = format!("internal:role={}", role);
                    if let Some(name) = options.name_matcher() {
                        part.push_str(&format!("[name={}]", name.describe()));
                    }
                    if let Some(checked) = options.checked {
                        part.push_str(&format!("[checked={}]", checked));
                    }
                    if let Some(disabled) = options.disabled {
                        part.push_str(&format!("[disabled={}]", disabled));
                    }
                    if let Some(level) = options.level {
                        part.push_str(&format!("[level={}]", level));
                    }
                    if options.include_hidden == Some(true) {
                        part.push_str("[include-hidden=true]");
                    }
                    parts.push(part);
                }
                Step::Text(m) => parts.push(format!("internal:text={}", m.describe())),
                Step::Label(m) => parts.push(format!("internal:label={}", m.describe())),
                Step::Placeholder(m) => {
                    parts.push(format!("internal:attr=[placeholder={}]", m.describe()))
                }
                Step::AltText(m) => parts.push(format!("internal:attr=[alt={}]", m.describe())),
                Step::Title(m) => parts.push(format!("internal:attr=[title={}]", m.describe())),
                Step::TestId(id) => parts.push(format!("internal:testid=[data-testid={:?}s]", id)),
                Step::Filter(filter) => parts.extend(filter.describe()),
                Step::Nth(i) => parts.push(format!("nth={}", i)),
            }
        }
        f.write_str(&parts.join(" >> "))
    }
}

fn in_document_order(cx: &QueryContext<'_>, nodes: Vec<NodeId>) -> Vec<NodeId> {
    let wanted: HashSet<NodeId> = nodes.into_iter().collect();
    cx.doc
        .descendants(cx.doc.root())
        .into_iter()
        .filter(|n| wanted.contains(n))
        .collect()
}

/// Elements under `scope` whose own text matches and none of whose element
/// children match, i.e. the smallest elements carrying the text.
fn smallest_with_text(cx: &QueryContext<'_>, scope: NodeId, m: &TextMatch) -> Vec<NodeId> {
    cx.doc
        .descendants(scope)
        .into_iter()
        .filter(|n| {
            m.matches(&cx.doc.text_content(*n))
                && !cx
                    .doc
                    .element_children(*n)
                    .into_iter()
                    .any(|c| m.matches(&cx.doc.text_content(c)))
        })
        .collect()
}

fn with_attribute(cx: &QueryContext<'_>, scope: NodeId, name: &str, m: &TextMatch) -> Vec<NodeId> {
    cx.doc
        .descendants(scope)
        .into_iter()
        .filter(|n| cx.doc.get_attribute(*n, name).is_some_and(|v| m.matches(v)))
        .collect()
}

fn query_descendants(cx: &QueryContext<'_>, step: &Step, scope: NodeId) -> Result<Vec<NodeId>> {
    let doc = cx.doc;
    let found = match step {
        Step::Css(css) => {
            let list = SelectorList::parse(css).map_err(|reason| Error::InvalidSelector {
                selector: css.clone(),
                reason,
            })?;
            list.query_all(cx, scope)
        }
        Step::Role { role, options } => {
            let name = options.name_matcher();
            doc.descendants(scope)
                .into_iter()
                .filter(|n| role_of(doc, *n).as_deref() == Some(role.as_str()))
                .filter(|n| {
                    options.include_hidden == Some(true)
                        || !is_hidden_from_accessibility(doc, cx.layout, *n)
                })
                .filter(|n| {
                    options
                        .checked
                        .is_none_or(|c| doc.is_checked(*n).unwrap_or(false) == c)
                })
                .filter(|n| options.disabled.is_none_or(|d| !doc.is_enabled(*n) == d))
                .filter(|n| options.level.is_none_or(|l| heading_level(doc, *n) == Some(l)))
                .filter(|n| {
                    name.as_ref()
                        .is_none_or(|m| m.matches(&accessible_name(doc, *n)))
                })
                .collect()
        }
        Step::Text(m) => smallest_with_text(cx, scope, m),
        Step::Label(m) => doc
            .descendants(scope)
            .into_iter()
            .filter(|n| label_texts(doc, *n).iter().any(|t| m.matches(t)))
            .collect(),
        Step::Placeholder(m) => with_attribute(cx, scope, "placeholder", m),
        Step::AltText(m) => with_attribute(cx, scope, "alt", m),
        Step::Title(m) => with_attribute(cx, scope, "title", m),
        Step::TestId(id) => with_attribute(cx, scope, "data-testid", &TextMatch::Exact(id.clone())),
        Step::Filter(_) | Step::Nth(_) => vec![scope],
    };
    Ok(found)
}

/// Locator represents a way to find element(s) on the page at any given moment.
///
/// Locators are lazy: they don't query the document until an action or
/// assertion runs, and they query it again on every attempt.
///
/// # Examples
///
/// ```ignore
/// use autowait::{FilterOptions, RoleOptions};
///
/// let basic_form = page.locator("nb-card").filter(FilterOptions::new().has_text("Basic form"));
/// let email = basic_form.get_by_role("textbox", Some(RoleOptions::new().name("Email")));
/// email.fill("johndoe@example.com", None).await?;
/// assert_eq!(email.input_value().await?, "johndoe@example.com");
/// ```
///
/// See: <https://playwright.dev/docs/api/class-locator>
#[derive(Clone)]
pub struct Locator {
    frame: Arc<Frame>,
    selector: Selector,
}

impl fmt::Debug for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Locator")
            .field("selector", &self.selector.to_string())
            .finish()
    }
}

impl Locator {
    /// Creates a new Locator (internal use only)
    ///
    /// Use `page.locator()` or one of the `page.get_by_*()` methods in application code.
    pub(crate) fn new(frame: Arc<Frame>, selector: Selector) -> Self {
        Self { frame, selector }
    }

    fn then(&self, step: Step) -> Locator {
        Locator::new(Arc::clone(&self.frame), self.selector.then(step))
    }

    /// Returns the selector string for this locator, as used in error messages.
    pub fn selector(&self) -> String {
        self.selector.to_string()
    }

    pub(crate) fn frame(&self) -> &Arc<Frame> {
        &self.frame
    }

    pub(crate) fn query(&self) -> &Selector {
        &self.selector
    }

    /// Creates a locator for the first matching element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-first>
    pub fn first(&self) -> Locator {
        self.then(Step::Nth(0))
    }

    /// Creates a locator for the last matching element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-last>
    pub fn last(&self) -> Locator {
        self.then(Step::Nth(-1))
    }

    /// Creates a locator for the nth matching element (0-indexed, negative
    /// counts from the end).
    ///
    /// An index past the end resolves to nothing: `count()` is 0 and
    /// `all_text_contents()` is empty, while actions and single-element reads
    /// wait for `Attached` and time out with the number of elements the
    /// locator did resolve to.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-nth>
    pub fn nth(&self, index: i32) -> Locator {
        self.then(Step::Nth(index))
    }

    /// Creates a sub-locator within this locator's subtree.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-locator>
    pub fn locator(&self, selector: &str) -> Locator {
        self.then(Step::Css(selector.to_string()))
    }

    /// Sub-locator with a filter applied to its matches.
    pub fn locator_with(&self, selector: &str, options: FilterOptions) -> Locator {
        self.locator(selector).filter(options)
    }

    /// Matches of `other` inside this locator's matches.
    pub fn chain(&self, other: &Locator) -> Locator {
        Locator::new(Arc::clone(&self.frame), self.selector.chain(&other.selector))
    }

    /// Narrows this locator's matches; never adds new ones.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-filter>
    pub fn filter(&self, options: FilterOptions) -> Locator {
        self.then(Step::Filter(options))
    }

    /// Elements by ARIA role and accessible name.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-get-by-role>
    pub fn get_by_role(&self, role: &str, options: Option<RoleOptions>) -> Locator {
        self.then(Step::Role {
            role: role.to_ascii_lowercase(),
            options: options.unwrap_or_default(),
        })
    }

    /// Smallest elements containing `text`.
    pub fn get_by_text(&self, text: impl Into<TextMatch>) -> Locator {
        self.then(Step::Text(text.into()))
    }

    /// Controls labelled by `text` (`<label>`, `aria-label`, `aria-labelledby`).
    pub fn get_by_label(&self, text: impl Into<TextMatch>) -> Locator {
        self.then(Step::Label(text.into()))
    }

    pub fn get_by_placeholder(&self, text: impl Into<TextMatch>) -> Locator {
        self.then(Step::Placeholder(text.into()))
    }

    pub fn get_by_alt_text(&self, text: impl Into<TextMatch>) -> Locator {
        self.then(Step::AltText(text.into()))
    }

    pub fn get_by_title(&self, text: impl Into<TextMatch>) -> Locator {
        self.then(Step::Title(text.into()))
    }

    /// Elements whose `data-testid` equals `test_id`.
    pub fn get_by_test_id(&self, test_id: &str) -> Locator {
        self.then(Step::TestId(test_id.to_string()))
    }

    // Queries that never wait

    /// Returns the number of elements matching this locator.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-count>
    pub async fn count(&self) -> Result<usize> {
        self.frame.locator_count(&self.selector).await
    }

    /// `textContent` of every match.
    pub async fn all_text_contents(&self) -> Result<Vec<String>> {
        self.frame.locator_all_text_contents(&self.selector).await
    }

    /// `innerText` of every match.
    pub async fn all_inner_texts(&self) -> Result<Vec<String>> {
        self.frame.locator_all_inner_texts(&self.selector).await
    }

    /// One locator per current match, each pinned with `nth`.
    pub async fn all(&self) -> Result<Vec<Locator>> {
        let count = self.count().await?;
        Ok((0..count).map(|i| self.nth(i as i32)).collect())
    }

    /// Whether the single match is visible; `false` when nothing matches.
    pub async fn is_visible(&self) -> Result<bool> {
        self.frame.locator_is_visible(&self.selector).await
    }

    pub async fn is_hidden(&self) -> Result<bool> {
        Ok(!self.is_visible().await?)
    }

    // Reads (wait for the element to be attached)

    pub async fn text_content(&self) -> Result<Option<String>> {
        self.frame.locator_text_content(&self.selector).await
    }

    pub async fn inner_text(&self) -> Result<String> {
        self.frame.locator_inner_text(&self.selector).await
    }

    pub async fn inner_html(&self) -> Result<String> {
        self.frame.locator_inner_html(&self.selector).await
    }

    pub async fn get_attribute(&self, name: &str) -> Result<Option<String>> {
        self.frame.locator_get_attribute(&self.selector, name).await
    }

    /// Returns the value of the input, textarea, or select element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-input-value>
    pub async fn input_value(&self) -> Result<String> {
        self.frame.locator_input_value(&self.selector).await
    }

    pub async fn is_enabled(&self) -> Result<bool> {
        self.frame.locator_is_enabled(&self.selector).await
    }

    pub async fn is_disabled(&self) -> Result<bool> {
        Ok(!self.is_enabled().await?)
    }

    pub async fn is_checked(&self) -> Result<bool> {
        self.frame.locator_is_checked(&self.selector).await
    }

    pub async fn is_editable(&self) -> Result<bool> {
        self.frame.locator_is_editable(&self.selector).await
    }

    pub async fn is_focused(&self) -> Result<bool> {
        self.frame.locator_is_focused(&self.selector).await
    }

    /// Box of the element in page coordinates, `None` when it has none.
    pub async fn bounding_box(&self) -> Result<Option<Rect>> {
        self.frame.locator_bounding_box(&self.selector).await
    }

    // Action methods

    /// Clicks the element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-click>
    pub async fn click(&self, options: Option<ClickOptions>) -> Result<()> {
        self.frame.locator_click(&self.selector, options).await
    }

    /// Double clicks the element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-dblclick>
    pub async fn dblclick(&self, options: Option<ClickOptions>) -> Result<()> {
        let mut options = options.unwrap_or_default();
        options.click_count = Some(2);
        self.frame.locator_click(&self.selector, Some(options)).await
    }

    /// Taps the element (a left click without hover).
    pub async fn tap(&self, options: Option<ClickOptions>) -> Result<()> {
        self.frame.locator_tap(&self.selector, options).await
    }

    /// Fills the element with text.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-fill>
    pub async fn fill(&self, text: &str, options: Option<FillOptions>) -> Result<()> {
        self.frame.locator_fill(&self.selector, text, options).await
    }

    /// Clears the element's value.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-clear>
    pub async fn clear(&self, options: Option<FillOptions>) -> Result<()> {
        self.frame.locator_clear(&self.selector, options).await
    }

    /// Types text one character at a time, appending to the current value.
    pub async fn type_text(&self, text: &str, options: Option<PressOptions>) -> Result<()> {
        self.frame.locator_type(&self.selector, text, options).await
    }

    /// Presses a key on the element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-press>
    pub async fn press(&self, key: &str, options: Option<PressOptions>) -> Result<()> {
        self.frame.locator_press(&self.selector, key, options).await
    }

    /// Focuses the element.
    pub async fn focus(&self) -> Result<()> {
        self.frame.locator_focus(&self.selector).await
    }

    /// Ensures the checkbox or radio button is checked.
    ///
    /// This method is idempotent - if already checked, does nothing.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-check>
    pub async fn check(&self, options: Option<CheckOptions>) -> Result<()> {
        self.frame.locator_set_checked(&self.selector, true, options).await
    }

    /// Ensures the checkbox is unchecked.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-uncheck>
    pub async fn uncheck(&self, options: Option<CheckOptions>) -> Result<()> {
        self.frame.locator_set_checked(&self.selector, false, options).await
    }

    /// Sets the checkbox or radio button to the specified checked state.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-set-checked>
    pub async fn set_checked(&self, checked: bool, options: Option<CheckOptions>) -> Result<()> {
        self.frame
            .locator_set_checked(&self.selector, checked, options)
            .await
    }

    /// Hovers the mouse over the element.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-hover>
    pub async fn hover(&self, options: Option<HoverOptions>) -> Result<()> {
        self.frame.locator_hover(&self.selector, options).await
    }

    /// Selects an option in a `<select>` element.
    ///
    /// Returns the values of the selected options.
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-select-option>
    pub async fn select_option(
        &self,
        value: impl Into<SelectOption>,
        options: Option<SelectOptions>,
    ) -> Result<Vec<String>> {
        self.frame
            .locator_select_option(&self.selector, value.into(), options)
            .await
    }

    /// Waits until the element reaches `options.state` (visible by default).
    ///
    /// See: <https://playwright.dev/docs/api/class-locator#locator-wait-for>
    pub async fn wait_for(&self, options: Option<WaitForOptions>) -> Result<()> {
        self.frame.locator_wait_for(&self.selector, options).await
    }
}
