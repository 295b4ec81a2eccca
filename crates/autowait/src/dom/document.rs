// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Document - in-process element tree the engine resolves locators against
//
// Architecture:
// - Nodes live in an arena and are addressed by NodeId; ids are never reused
// - Removing a node only detaches it, so stale ids answer "not attached"
// - Listeners are plain Rust closures keyed by (node, event type)
// - Timers requested by listeners are queued here and drained by the Frame,
//   which runs them on the tokio runtime

use super::html;
use super::layout::{Layout, Viewport};
use super::selector::{QueryContext, SelectorList};
use super::style::InlineStyle;
use crate::error::{Error, Result};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Identifier of a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Position of the node in creation order.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Payload of a node.
#[derive(Debug, Clone)]
pub enum NodeData {
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    data: NodeData,
}

/// A translation animation running on an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: (f64, f64),
    to: (f64, f64),
    start: Instant,
    duration: Duration,
}

impl Transition {
    /// Offset of the element at `now`; the final offset sticks once finished.
    pub fn offset_at(&self, now: Instant) -> (f64, f64) {
        let elapsed = now.saturating_duration_since(self.start);
        if self.duration.is_zero() || elapsed >= self.duration {
            return self.to;
        }
        let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (
            self.from.0 + (self.to.0 - self.from.0) * t,
            self.from.1 + (self.to.1 - self.from.1) * t,
        )
    }

    /// Whether the animation is still moving the element at `now`.
    pub fn is_running(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) < self.duration
    }
}

/// An element node: tag, attributes and live form state.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    value: Option<String>,
    checked: Option<bool>,
    transition: Option<Transition>,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attributes: Vec::new(),
            value: None,
            checked: None,
            transition: None,
        }
    }

    /// Lower-case tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn id(&self) -> Option<&str> {
        self.attribute("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or("").split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// `type` of an `<input>`, lower-cased, defaulting to `text`.
    pub fn input_type(&self) -> Option<String> {
        (self.tag == "input").then(|| {
            self.attribute("type")
                .map(|t| t.trim().to_ascii_lowercase())
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| "text".to_string())
        })
    }

    /// Inline style, with the `hidden` attribute and hidden inputs folded in.
    pub fn style(&self) -> InlineStyle {
        let mut style = InlineStyle::parse(self.attribute("style").unwrap_or(""));
        if self.has_attribute("hidden") || self.input_type().as_deref() == Some("hidden") {
            style.display_none = true;
        }
        if matches!(self.tag.as_str(), "script" | "style" | "template" | "head" | "title") {
            style.display_none = true;
        }
        style
    }

    /// Translation applied by a running or finished transition.
    pub fn transition_offset(&self, now: Instant) -> (f64, f64) {
        self.transition
            .map(|t| t.offset_at(now))
            .unwrap_or((0.0, 0.0))
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value.to_string(),
            None => self.attributes.push((name, value.to_string())),
        }
    }

    fn remove_attribute(&mut self, name: &str) {
        self.attributes.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
    }
}

/// DOM events the document can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    Click,
    DblClick,
    ContextMenu,
    AuxClick,
    MouseOver,
    Focus,
    Blur,
    Input,
    Change,
    KeyDown,
    KeyUp,
    Submit,
}

/// Callback installed with [`Document::add_event_listener`].
pub type EventHandler = Arc<dyn Fn(&mut EventContext<'_>) + Send + Sync>;

/// Deferred mutation scheduled with [`Document::set_timeout`].
pub type TimerCallback = Box<dyn FnOnce(&mut Document) + Send>;

/// A timer waiting to be handed to the runtime.
pub struct Timer {
    pub(crate) delay: Duration,
    pub(crate) callback: TimerCallback,
}

impl fmt::Debug for Timer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Timer").field("delay", &self.delay).finish()
    }
}

struct Listener {
    node: NodeId,
    event: EventType,
    handler: EventHandler,
}

/// What a listener sees while an event is dispatched.
pub struct EventContext<'a> {
    document: &'a mut Document,
    event: EventType,
    target: NodeId,
    current_target: NodeId,
    key: Option<String>,
    default_prevented: bool,
}

impl EventContext<'_> {
    pub fn document(&mut self) -> &mut Document {
        self.document
    }

    pub fn event_type(&self) -> EventType {
        self.event
    }

    /// The node the event was dispatched on.
    pub fn target(&self) -> NodeId {
        self.target
    }

    /// The node whose listener is running (differs from target while bubbling).
    pub fn current_target(&self) -> NodeId {
        self.current_target
    }

    /// Key name for keyboard events.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Suppresses the default action (checkbox toggle, label forwarding, submit).
    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    /// Schedules `callback` to mutate the document after `delay`.
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce(&mut Document) + Send + 'static,
    {
        self.document.set_timeout(delay, callback);
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An element tree with live form state, listeners and pending timers.
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    head: NodeId,
    body: NodeId,
    title: String,
    url: String,
    focused: Option<NodeId>,
    listeners: Vec<Listener>,
    scheduled: Vec<Timer>,
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("url", &self.url)
            .field("title", &self.title)
            .field("nodes", &self.nodes.len())
            .field("listeners", &self.listeners.len())
            .field("scheduled", &self.scheduled.len())
            .finish()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates `about:blank`: an `<html>` with empty `<head>` and `<body>`.
    pub fn new() -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            root: NodeId(0),
            head: NodeId(0),
            body: NodeId(0),
            title: String::new(),
            url: "about:blank".to_string(),
            focused: None,
            listeners: Vec::new(),
            scheduled: Vec::new(),
        };
        let root = doc.push(NodeData::Element(Element::new("html")));
        let head = doc.push(NodeData::Element(Element::new("head")));
        let body = doc.push(NodeData::Element(Element::new("body")));
        doc.attach(root, head);
        doc.attach(root, body);
        doc.root = root;
        doc.head = head;
        doc.body = body;
        doc
    }

    /// Creates a document whose body holds the parsed `html`.
    pub fn from_html(markup: &str) -> Self {
        let mut doc = Self::new();
        let body = doc.body;
        html::parse_into(&mut doc, body, markup);
        doc
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn head(&self) -> NodeId {
        self.head
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub(crate) fn set_url(&mut self, url: impl Into<String>) {
        self.url = url.into();
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: None,
            children: Vec::new(),
            data,
        });
        id
    }

    fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    fn attach(&mut self, parent: NodeId, child: NodeId) {
        self.nodes[child.0].parent = Some(parent);
        self.nodes[parent.0].children.push(child);
    }

    fn detach(&mut self, child: NodeId) {
        if let Some(parent) = self.nodes[child.0].parent.take() {
            self.nodes[parent.0].children.retain(|c| *c != child);
        }
    }

    // ------------------------------------------------------------------
    // Tree access
    // ------------------------------------------------------------------

    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id)?.data {
            NodeData::Element(el) => Some(el),
            NodeData::Text(_) => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut Element> {
        match self.nodes.get_mut(id.0).map(|n| &mut n.data) {
            Some(NodeData::Element(el)) => Ok(el),
            _ => Err(Error::InvalidArgument(format!(
                "node {} is not an element",
                id.0
            ))),
        }
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match &self.node(id)?.data {
            NodeData::Text(text) => Some(text),
            NodeData::Element(_) => None,
        }
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id)?.parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Element children in document order.
    pub fn element_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children(id)
            .iter()
            .copied()
            .filter(|c| self.element(*c).is_some())
            .collect()
    }

    /// Ancestors from the parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(node) = current {
            out.push(node);
            current = self.parent(node);
        }
        out
    }

    /// Whether `node` is connected to the document root.
    pub fn is_attached(&self, id: NodeId) -> bool {
        id == self.root || self.ancestors(id).last() == Some(&self.root)
    }

    /// Inclusive containment: a node contains itself.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        node == ancestor || self.ancestors(node).contains(&ancestor)
    }

    /// Element descendants of `id` in document (pre-)order, excluding `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.children(id).iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            if self.element(node).is_some() {
                out.push(node);
                stack.extend(self.children(node).iter().rev().copied());
            }
        }
        out
    }

    /// Nearest inclusive ancestor element with the given tag.
    pub fn closest(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find(|n| self.element(*n).is_some_and(|el| el.tag() == tag))
    }

    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.root)
            .into_iter()
            .find(|n| self.element(*n).and_then(Element::id) == Some(id))
    }

    // ------------------------------------------------------------------
    // Text and markup
    // ------------------------------------------------------------------

    /// Concatenated text of every descendant text node (`textContent`).
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out, None);
        out
    }

    /// Text of rendered descendants only, whitespace-normalised (`innerText`).
    pub fn inner_text(&self, layout: &Layout, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out, Some(layout));
        super::text::normalize_whitespace(&out)
    }

    fn collect_text(&self, id: NodeId, out: &mut String, layout: Option<&Layout>) {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(text),
            Some(NodeData::Element(_)) => {
                if layout.is_some_and(|l| !l.is_rendered(id)) {
                    return;
                }
                for child in self.children(id) {
                    if layout.is_some() && self.element(*child).is_some() && !out.ends_with(' ') {
                        out.push(' ');
                    }
                    self.collect_text(*child, out, layout);
                }
            }
            None => {}
        }
    }

    /// Serialised children of `id` (`innerHTML`).
    pub fn inner_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        for child in self.children(id) {
            self.serialize(*child, &mut out);
        }
        out
    }

    /// Serialised `id` including its own tag (`outerHTML`).
    pub fn outer_html(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize(id, &mut out);
        out
    }

    fn serialize(&self, id: NodeId, out: &mut String) {
        match self.node(id).map(|n| &n.data) {
            Some(NodeData::Text(text)) => out.push_str(&html::escape_text(text)),
            Some(NodeData::Element(el)) => {
                out.push('<');
                out.push_str(el.tag());
                for (name, value) in el.attributes() {
                    out.push(' ');
                    out.push_str(name);
                    if !value.is_empty() {
                        out.push_str("=\"");
                        out.push_str(&html::escape_attribute(value));
                        out.push('"');
                    }
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&el.tag()) {
                    return;
                }
                for child in self.children(id) {
                    self.serialize(*child, out);
                }
                out.push_str("</");
                out.push_str(el.tag());
                out.push('>');
            }
            None => {}
        }
    }

    // ------------------------------------------------------------------
    // Mutation
    // ------------------------------------------------------------------

    /// Creates a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element::new(tag)))
    }

    /// Creates a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text(text.to_string()))
    }

    /// Moves `child` under `parent`, as the last child.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if self.element(parent).is_none() || self.node(child).is_none() {
            return Err(Error::InvalidArgument(
                "append_child needs an element parent and an existing child".to_string(),
            ));
        }
        if self.contains(child, parent) {
            return Err(Error::InvalidArgument(
                "cannot append a node to its own subtree".to_string(),
            ));
        }
        self.detach(child);
        self.attach(parent, child);
        Ok(())
    }

    /// Detaches `id` (and its subtree) from the document.
    pub fn remove(&mut self, id: NodeId) {
        if id == self.root || self.node(id).is_none() {
            return;
        }
        if self.focused.is_some_and(|f| self.contains(id, f)) {
            self.focused = None;
        }
        self.detach(id);
    }

    /// Parses `markup` and appends the resulting nodes to `parent`.
    pub fn append_html(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>> {
        self.element_mut(parent)?;
        Ok(html::parse_into(self, parent, markup))
    }

    /// Replaces the children of `parent` with parsed `markup`.
    pub fn set_inner_html(&mut self, parent: NodeId, markup: &str) -> Result<Vec<NodeId>> {
        self.element_mut(parent)?;
        for child in self.children(parent).to_vec() {
            self.remove(child);
        }
        Ok(html::parse_into(self, parent, markup))
    }

    /// Replaces the children of `id` with a single text node.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.element_mut(id)?;
        for child in self.children(id).to_vec() {
            self.remove(child);
        }
        if !text.is_empty() {
            let node = self.create_text(text);
            self.attach(id, node);
        }
        Ok(())
    }

    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id)?.attribute(name)
    }

    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: &str) -> Result<()> {
        self.element_mut(id)?.set_attribute(name, value);
        Ok(())
    }

    pub fn remove_attribute(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.element_mut(id)?.remove_attribute(name);
        Ok(())
    }

    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        let el = self.element_mut(id)?;
        if !el.has_class(class) {
            let mut classes: Vec<&str> = el.classes().collect();
            classes.push(class);
            let joined = classes.join(" ");
            el.set_attribute("class", &joined);
        }
        Ok(())
    }

    pub fn remove_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        let el = self.element_mut(id)?;
        let joined = el
            .classes()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        el.set_attribute("class", &joined);
        Ok(())
    }

    /// Toggles `class`; returns whether it is present afterwards.
    pub fn toggle_class(&mut self, id: NodeId, class: &str) -> Result<bool> {
        if self.element_mut(id)?.has_class(class) {
            self.remove_class(id, class)?;
            Ok(false)
        } else {
            self.add_class(id, class)?;
            Ok(true)
        }
    }

    /// Starts moving `id` from its current offset by (`dx`, `dy`) over `duration`.
    pub fn start_transition(
        &mut self,
        id: NodeId,
        dx: f64,
        dy: f64,
        duration: Duration,
    ) -> Result<()> {
        let now = Instant::now();
        let el = self.element_mut(id)?;
        let from = el.transition_offset(now);
        el.transition = Some(Transition {
            from,
            to: (from.0 + dx, from.1 + dy),
            start: now,
            duration,
        });
        Ok(())
    }

    // ------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------

    /// First element matching a CSS selector.
    pub fn query_selector(&self, selector: &str) -> Result<Option<NodeId>> {
        Ok(self.query_selector_all(selector)?.into_iter().next())
    }

    /// Every element matching a CSS selector, in document order.
    pub fn query_selector_all(&self, selector: &str) -> Result<Vec<NodeId>> {
        let list = SelectorList::parse(selector).map_err(|reason| Error::InvalidSelector {
            selector: selector.to_string(),
            reason,
        })?;
        let layout = Layout::compute(self, Viewport::default(), Instant::now());
        let cx = QueryContext {
            doc: self,
            layout: &layout,
        };
        Ok(list.query_all(&cx, self.root))
    }

    // ------------------------------------------------------------------
    // Form state
    // ------------------------------------------------------------------

    /// Current value of an `<input>`, `<textarea>`, `<select>` or editable host.
    pub fn value(&self, id: NodeId) -> Option<String> {
        let el = self.element(id)?;
        match el.tag() {
            "input" => Some(
                el.value
                    .clone()
                    .or_else(|| el.attribute("value").map(str::to_string))
                    .unwrap_or_default(),
            ),
            "textarea" => Some(el.value.clone().unwrap_or_else(|| self.text_content(id))),
            "select" => {
                if let Some(value) = &el.value {
                    return Some(value.clone());
                }
                let options: Vec<NodeId> = self
                    .descendants(id)
                    .into_iter()
                    .filter(|n| self.element(*n).is_some_and(|e| e.tag() == "option"))
                    .collect();
                let selected = options
                    .iter()
                    .find(|o| self.element(**o).is_some_and(|e| e.has_attribute("selected")))
                    .or(options.first());
                Some(selected.map(|o| self.option_value(*o)).unwrap_or_default())
            }
            _ if self.is_content_editable(id) => Some(self.text_content(id)),
            _ => None,
        }
    }

    /// `value` attribute of an `<option>`, or its text.
    pub fn option_value(&self, option: NodeId) -> String {
        self.get_attribute(option, "value")
            .map(str::to_string)
            .unwrap_or_else(|| super::text::normalize_whitespace(&self.text_content(option)))
    }

    /// Sets the live value of a form control or the text of an editable host.
    pub fn set_value(&mut self, id: NodeId, value: &str) -> Result<()> {
        if self.is_content_editable(id) && !self.is_text_control(id) {
            return self.set_text_content(id, value);
        }
        self.element_mut(id)?.value = Some(value.to_string());
        Ok(())
    }

    /// Checked state of checkboxes, radios and `aria-checked` widgets.
    pub fn is_checked(&self, id: NodeId) -> Option<bool> {
        let el = self.element(id)?;
        match el.input_type().as_deref() {
            Some("checkbox") | Some("radio") => {
                Some(el.checked.unwrap_or_else(|| el.has_attribute("checked")))
            }
            _ => el.attribute("aria-checked").map(|v| v == "true"),
        }
    }

    /// Sets checkedness; checking a radio unchecks the rest of its group.
    pub fn set_checked(&mut self, id: NodeId, checked: bool) -> Result<()> {
        let (is_radio, group) = {
            let el = self.element_mut(id)?;
            el.checked = Some(checked);
            (
                el.input_type().as_deref() == Some("radio"),
                el.attribute("name").map(str::to_string),
            )
        };
        if is_radio && checked {
            if let Some(group) = group {
                let others: Vec<NodeId> = self
                    .descendants(self.root)
                    .into_iter()
                    .filter(|n| *n != id)
                    .filter(|n| {
                        self.element(*n).is_some_and(|e| {
                            e.input_type().as_deref() == Some("radio")
                                && e.attribute("name") == Some(group.as_str())
                        })
                    })
                    .collect();
                for other in others {
                    self.element_mut(other)?.checked = Some(false);
                }
            }
        }
        Ok(())
    }

    fn is_text_control(&self, id: NodeId) -> bool {
        self.element(id)
            .is_some_and(|el| matches!(el.tag(), "input" | "textarea" | "select"))
    }

    fn is_content_editable(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .find_map(|n| self.get_attribute(n, "contenteditable"))
            .is_some_and(|v| !v.eq_ignore_ascii_case("false"))
    }

    /// `false` for natively disabled controls, controls in a disabled
    /// `<fieldset>`, and anything under `aria-disabled="true"`.
    pub fn is_enabled(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };
        let native = matches!(
            el.tag(),
            "button" | "input" | "select" | "textarea" | "option" | "optgroup" | "fieldset"
        );
        if native && el.has_attribute("disabled") {
            return false;
        }
        for ancestor in self.ancestors(id) {
            let Some(a) = self.element(ancestor) else {
                continue;
            };
            if native && a.tag() == "fieldset" && a.has_attribute("disabled") {
                return false;
            }
            if matches!(el.tag(), "option" | "optgroup")
                && matches!(a.tag(), "select" | "optgroup")
                && a.has_attribute("disabled")
            {
                return false;
            }
            if a.attribute("aria-disabled") == Some("true") {
                return false;
            }
        }
        el.attribute("aria-disabled") != Some("true")
    }

    /// `None` when the element cannot hold text at all; otherwise whether it
    /// currently accepts input (enabled and not read-only).
    pub fn is_editable(&self, id: NodeId) -> Option<bool> {
        let el = self.element(id)?;
        let text_input = match el.input_type().as_deref() {
            Some(
                "checkbox" | "radio" | "button" | "submit" | "reset" | "image" | "file" | "hidden"
                | "range" | "color",
            ) => false,
            Some(_) => true,
            None => matches!(el.tag(), "textarea" | "select"),
        };
        if !text_input && !self.is_content_editable(id) {
            return None;
        }
        let readonly = (matches!(el.tag(), "input" | "textarea") && el.has_attribute("readonly"))
            || el.attribute("aria-readonly") == Some("true");
        Some(self.is_enabled(id) && !readonly)
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.focused
    }

    /// Moves focus to `id`, dispatching blur/focus when it changes.
    pub fn focus(&mut self, id: NodeId) {
        if self.focused == Some(id) {
            return;
        }
        if let Some(previous) = self.focused.take() {
            self.dispatch(previous, EventType::Blur, None);
        }
        self.focused = Some(id);
        self.dispatch(id, EventType::Focus, None);
    }

    fn is_focusable(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| {
            matches!(el.tag(), "input" | "textarea" | "select" | "button")
                || (el.tag() == "a" && el.has_attribute("href"))
                || el.has_attribute("tabindex")
        }) || self.get_attribute(id, "contenteditable").is_some()
    }

    // ------------------------------------------------------------------
    // Events and timers
    // ------------------------------------------------------------------

    /// Registers `handler` for `event` on `node`. Events bubble to ancestors.
    pub fn add_event_listener<F>(&mut self, node: NodeId, event: EventType, handler: F)
    where
        F: Fn(&mut EventContext<'_>) + Send + Sync + 'static,
    {
        self.listeners.push(Listener {
            node,
            event,
            handler: Arc::new(handler),
        });
    }

    /// Registers the same handler on every element matching `selector`.
    ///
    /// Returns how many elements received the listener.
    pub fn on<F>(&mut self, selector: &str, event: EventType, handler: F) -> Result<usize>
    where
        F: Fn(&mut EventContext<'_>) + Send + Sync + 'static,
    {
        let nodes = self.query_selector_all(selector)?;
        let handler: EventHandler = Arc::new(handler);
        for node in &nodes {
            self.listeners.push(Listener {
                node: *node,
                event,
                handler: Arc::clone(&handler),
            });
        }
        Ok(nodes.len())
    }

    /// Dispatches `event` on `target`; returns whether a listener prevented
    /// the default action.
    pub fn dispatch_event(&mut self, target: NodeId, event: EventType) -> bool {
        self.dispatch(target, event, None)
    }

    fn dispatch(&mut self, target: NodeId, event: EventType, key: Option<&str>) -> bool {
        let mut path = vec![target];
        path.extend(self.ancestors(target));
        let mut prevented = false;
        for current in path {
            let handlers: Vec<EventHandler> = self
                .listeners
                .iter()
                .filter(|l| l.node == current && l.event == event)
                .map(|l| Arc::clone(&l.handler))
                .collect();
            for handler in handlers {
                let mut cx = EventContext {
                    document: self,
                    event,
                    target,
                    current_target: current,
                    key: key.map(str::to_string),
                    default_prevented: prevented,
                };
                handler(&mut cx);
                prevented = cx.default_prevented;
            }
        }
        tracing::trace!(?event, target = target.0, prevented, "Dispatched event");
        prevented
    }

    /// Queues `callback` to run after `delay` on the page's runtime.
    pub fn set_timeout<F>(&mut self, delay: Duration, callback: F)
    where
        F: FnOnce(&mut Document) + Send + 'static,
    {
        self.scheduled.push(Timer {
            delay,
            callback: Box::new(callback),
        });
    }

    /// Drains timers queued since the last call.
    pub(crate) fn take_scheduled(&mut self) -> Vec<Timer> {
        std::mem::take(&mut self.scheduled)
    }

    // ------------------------------------------------------------------
    // Interactions (applied once actionability checks passed)
    // ------------------------------------------------------------------

    /// Left click on `target`: focus, click listeners, then default actions.
    pub(crate) fn click(&mut self, target: NodeId, click_count: u32) {
        if let Some(focusable) = std::iter::once(target)
            .chain(self.ancestors(target))
            .find(|n| self.is_focusable(*n))
        {
            self.focus(focusable);
        }
        for i in 0..click_count.max(1) {
            self.activate(target);
            if i == 1 {
                self.dispatch(target, EventType::DblClick, None);
            }
        }
    }

    pub(crate) fn context_click(&mut self, target: NodeId) {
        self.dispatch(target, EventType::ContextMenu, None);
    }

    pub(crate) fn aux_click(&mut self, target: NodeId) {
        self.dispatch(target, EventType::AuxClick, None);
    }

    fn is_checkable_input(&self, id: NodeId) -> bool {
        self.element(id)
            .and_then(Element::input_type)
            .is_some_and(|t| t == "checkbox" || t == "radio")
    }

    fn is_interactive_control(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| {
            matches!(el.tag(), "input" | "textarea" | "select" | "button")
                || (el.tag() == "a" && el.has_attribute("href"))
        })
    }

    fn activate(&mut self, target: NodeId) {
        if self.is_interactive_control(target) && !self.is_enabled(target) {
            return;
        }

        let toggled = if self.is_checkable_input(target) {
            let before = self.is_checked(target).unwrap_or(false);
            let is_radio = self.element(target).and_then(Element::input_type).as_deref()
                == Some("radio");
            let after = if is_radio { true } else { !before };
            let _ = self.set_checked(target, after);
            Some((before, after))
        } else {
            None
        };

        let prevented = self.dispatch(target, EventType::Click, None);

        if let Some((before, after)) = toggled {
            if prevented {
                let _ = self.set_checked(target, before);
            } else if before != after {
                self.dispatch(target, EventType::Input, None);
                self.dispatch(target, EventType::Change, None);
            }
        }
        if prevented {
            return;
        }

        if !self.is_interactive_control(target) {
            if let Some(control) = self
                .closest(target, "label")
                .and_then(|label| self.labeled_control(label))
            {
                if control != target {
                    self.activate(control);
                    return;
                }
            }
        }

        if self.is_submit_button(target) {
            if let Some(form) = self.closest(target, "form") {
                self.dispatch(form, EventType::Submit, None);
            }
        }
    }

    fn is_submit_button(&self, id: NodeId) -> bool {
        self.element(id).is_some_and(|el| match el.tag() {
            "button" => el
                .attribute("type")
                .is_none_or(|t| t.eq_ignore_ascii_case("submit")),
            "input" => el.input_type().as_deref() == Some("submit"),
            _ => false,
        })
    }

    /// The control a `<label>` activates: its `for` target or first nested control.
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        if let Some(for_id) = self.get_attribute(label, "for") {
            return self.get_element_by_id(for_id);
        }
        self.descendants(label).into_iter().find(|n| {
            self.element(*n).is_some_and(|el| {
                matches!(el.tag(), "input" | "textarea" | "select" | "button")
                    && el.input_type().as_deref() != Some("hidden")
            })
        })
    }

    /// The control whose state `id` stands for: itself when it is a control,
    /// otherwise the control of an enclosing `<label>`.
    pub fn retarget_control(&self, id: NodeId) -> NodeId {
        if self.is_interactive_control(id) {
            return id;
        }
        self.closest(id, "label")
            .and_then(|label| self.labeled_control(label))
            .unwrap_or(id)
    }

    /// Replaces the value of an editable element, firing input and change.
    pub(crate) fn fill(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.focus(id);
        self.set_value(id, text)?;
        self.dispatch(id, EventType::Input, None);
        self.dispatch(id, EventType::Change, None);
        Ok(())
    }

    /// Types `text` one character at a time.
    pub(crate) fn type_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        self.focus(id);
        for ch in text.chars() {
            let key = ch.to_string();
            let prevented = self.dispatch(id, EventType::KeyDown, Some(&key));
            if !prevented {
                let mut value = self.value(id).unwrap_or_default();
                value.push(ch);
                self.set_value(id, &value)?;
                self.dispatch(id, EventType::Input, None);
            }
            self.dispatch(id, EventType::KeyUp, Some(&key));
        }
        Ok(())
    }

    /// Presses a named key (`Enter`, `Backspace`, `a`, ...) on `id`.
    pub(crate) fn press(&mut self, id: NodeId, key: &str) -> Result<()> {
        self.focus(id);
        let prevented = self.dispatch(id, EventType::KeyDown, Some(key));
        if !prevented {
            match key {
                "Enter" => {
                    if self.element(id).is_some_and(|el| el.tag() == "input") {
                        if let Some(form) = self.closest(id, "form") {
                            self.dispatch(form, EventType::Submit, None);
                        }
                    }
                }
                "Backspace" => {
                    if let Some(mut value) = self.value(id) {
                        value.pop();
                        self.set_value(id, &value)?;
                        self.dispatch(id, EventType::Input, None);
                    }
                }
                k if k.chars().count() == 1 && self.is_editable(id) == Some(true) => {
                    let mut value = self.value(id).unwrap_or_default();
                    value.push_str(k);
                    self.set_value(id, &value)?;
                    self.dispatch(id, EventType::Input, None);
                }
                _ => {}
            }
        }
        self.dispatch(id, EventType::KeyUp, Some(key));
        Ok(())
    }

    pub(crate) fn hover(&mut self, id: NodeId) {
        self.dispatch(id, EventType::MouseOver, None);
    }
}
