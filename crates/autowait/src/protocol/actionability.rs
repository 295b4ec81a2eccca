// Actionability - predicates an element must satisfy before an action
//
// One poll takes a fresh layout of the document, resolves the locator and
// evaluates the required predicates in order. The first one that fails is
// reported; when none fails the element is ready and the caller performs the
// action while still holding the document lock.
//
// `Stable` compares against the previous poll, so readiness always needs at
// least two consecutive observations of the same box.

use crate::dom::{Document, Layout, NodeId, Rect};
use crate::error::Error;
use serde::Serialize;
use std::fmt;

/// One actionability predicate, in the order they are evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Predicate {
    /// The locator resolves to exactly one element connected to the document
    Attached,
    /// Non-empty box, not hidden by display, visibility or the hidden attribute
    Visible,
    /// Same box as on the previous poll
    Stable,
    /// Hit testing the action point lands on the element or a descendant
    ReceivesEvents,
    /// Not disabled natively, by a fieldset, or through aria-disabled
    Enabled,
    /// Enabled and not read-only
    Editable,
}

impl Predicate {
    pub const ALL: [Predicate; 6] = [
        Predicate::Attached,
        Predicate::Visible,
        Predicate::Stable,
        Predicate::ReceivesEvents,
        Predicate::Enabled,
        Predicate::Editable,
    ];
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Predicate::Attached => "attached",
            Predicate::Visible => "visible",
            Predicate::Stable => "stable",
            Predicate::ReceivesEvents => "receiving events",
            Predicate::Enabled => "enabled",
            Predicate::Editable => "editable",
        };
        f.write_str(name)
    }
}

/// Kind of operation, which decides the predicates it waits for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Click,
    DblClick,
    Check,
    Uncheck,
    Tap,
    Hover,
    Fill,
    Clear,
    Type,
    SelectOption,
    Focus,
    Press,
    /// Data extraction: text, attributes, values
    Read,
}

const POINTER: &[Predicate] = &[
    Predicate::Attached,
    Predicate::Visible,
    Predicate::Stable,
    Predicate::ReceivesEvents,
    Predicate::Enabled,
];
const HOVER: &[Predicate] = &[
    Predicate::Attached,
    Predicate::Visible,
    Predicate::Stable,
    Predicate::ReceivesEvents,
];
const TEXT_INPUT: &[Predicate] = &[
    Predicate::Attached,
    Predicate::Visible,
    Predicate::Stable,
    Predicate::ReceivesEvents,
    Predicate::Enabled,
    Predicate::Editable,
];
const SELECT: &[Predicate] = &[Predicate::Attached, Predicate::Visible, Predicate::Enabled];
const ATTACHED: &[Predicate] = &[Predicate::Attached];

impl ActionKind {
    /// Name used in error messages and logs.
    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Click => "click",
            ActionKind::DblClick => "dblclick",
            ActionKind::Check => "check",
            ActionKind::Uncheck => "uncheck",
            ActionKind::Tap => "tap",
            ActionKind::Hover => "hover",
            ActionKind::Fill => "fill",
            ActionKind::Clear => "clear",
            ActionKind::Type => "type",
            ActionKind::SelectOption => "select_option",
            ActionKind::Focus => "focus",
            ActionKind::Press => "press",
            ActionKind::Read => "read",
        }
    }

    /// Predicates this kind of action waits for, in evaluation order.
    pub fn required(self) -> &'static [Predicate] {
        match self {
            ActionKind::Click
            | ActionKind::DblClick
            | ActionKind::Check
            | ActionKind::Uncheck
            | ActionKind::Tap => POINTER,
            ActionKind::Hover => HOVER,
            ActionKind::Fill | ActionKind::Clear | ActionKind::Type => TEXT_INPUT,
            ActionKind::SelectOption => SELECT,
            ActionKind::Focus | ActionKind::Press | ActionKind::Read => ATTACHED,
        }
    }

    /// Text input fails immediately on elements that can never hold text.
    pub(crate) fn needs_text_target(self) -> bool {
        matches!(self, ActionKind::Fill | ActionKind::Clear | ActionKind::Type)
    }
}

/// Outcome of one poll.
#[derive(Debug)]
pub(crate) enum Readiness {
    /// Every required predicate held
    Ready(NodeId),
    /// `predicate` is the first one that did not hold
    Waiting {
        predicate: Predicate,
        detail: Option<String>,
    },
    /// No amount of waiting can help
    Failed(Error),
}

/// Box observed on the previous poll, for the `Stable` check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Observation {
    pub node: NodeId,
    pub rect: Rect,
}

/// Evaluates `required` (minus `Attached`, which resolution decides) on `node`.
///
/// `previous` is updated with this poll's box. `point` is the hit offset
/// inside the box; the centre when `None`.
pub(crate) fn evaluate(
    doc: &Document,
    layout: &Layout,
    node: NodeId,
    required: &[Predicate],
    point: Option<(f64, f64)>,
    previous: &mut Option<Observation>,
) -> Readiness {
    let rect = layout.rect(node);
    let last = previous.take();
    *previous = rect.map(|rect| Observation { node, rect });

    for predicate in required {
        let ok = match predicate {
            Predicate::Attached => doc.is_attached(node),
            Predicate::Visible => layout.is_visible(node),
            Predicate::Stable => {
                rect.is_some() && last == rect.map(|rect| Observation { node, rect })
            }
            Predicate::ReceivesEvents => match rect {
                Some(rect) => {
                    let (x, y) = match point {
                        Some((dx, dy)) => (rect.x + dx, rect.y + dy),
                        None => rect.center(),
                    };
                    match layout.hit_test(x, y) {
                        Some(hit) if doc.contains(node, hit) => true,
                        Some(hit) => {
                            return Readiness::Waiting {
                                predicate: *predicate,
                                detail: Some(format!("{} intercepts pointer events", describe(doc, hit))),
                            };
                        }
                        None => false,
                    }
                }
                None => false,
            },
            Predicate::Enabled => doc.is_enabled(doc.retarget_control(node)),
            Predicate::Editable => doc.is_editable(doc.retarget_control(node)) == Some(true),
        };
        if !ok {
            return Readiness::Waiting {
                predicate: *predicate,
                detail: None,
            };
        }
    }
    Readiness::Ready(node)
}

/// Short element description for logs: `<div class="overlay">`.
pub(crate) fn describe(doc: &Document, node: NodeId) -> String {
    let Some(el) = doc.element(node) else {
        return "#text".to_string();
    };
    let mut out = format!("<{}", el.tag());
    if let Some(id) = el.id() {
        out.push_str(&format!(" id=\"{}\"", id));
    }
    if let Some(class) = el.attribute("class").filter(|c| !c.is_empty()) {
        out.push_str(&format!(" class=\"{}\"", class));
    }
    out.push('>');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Viewport;
    use tokio::time::Instant;

    fn poll(doc: &Document, node: NodeId, kind: ActionKind, previous: &mut Option<Observation>) -> Readiness {
        let layout = Layout::compute(doc, Viewport::default(), Instant::now());
        evaluate(doc, &layout, node, kind.required(), None, previous)
    }

    #[test]
    fn test_required_sets() {
        assert_eq!(ActionKind::Click.required().len(), 5);
        assert!(!ActionKind::Hover.required().contains(&Predicate::Enabled));
        assert_eq!(ActionKind::Fill.required().last(), Some(&Predicate::Editable));
        assert_eq!(ActionKind::Read.required(), &[Predicate::Attached]);
    }

    #[test]
    fn test_first_poll_is_never_stable() {
        let doc = Document::from_html("<button id='b'>Go</button>");
        let b = doc.get_element_by_id("b").unwrap();
        let mut previous = None;
        assert!(matches!(
            poll(&doc, b, ActionKind::Click, &mut previous),
            Readiness::Waiting { predicate: Predicate::Stable, .. }
        ));
        assert!(matches!(
            poll(&doc, b, ActionKind::Click, &mut previous),
            Readiness::Ready(n) if n == b
        ));
    }

    #[test]
    fn test_predicates_fail_in_order() {
        let doc = Document::from_html(
            "<button id='hidden' style='display:none'>x</button>\
             <button id='disabled' disabled>x</button>\
             <input id='ro' readonly>\
             <button id='under'>x</button>\
             <div class='overlay' style='position:fixed;left:0;top:0;width:1280px;height:720px;z-index:5'></div>",
        );
        let id = |n: &str| doc.get_element_by_id(n).unwrap();
        let mut previous = None;
        assert!(matches!(
            poll(&doc, id("hidden"), ActionKind::Click, &mut previous),
            Readiness::Waiting { predicate: Predicate::Visible, .. }
        ));

        let mut previous = None;
        poll(&doc, id("under"), ActionKind::Click, &mut previous);
        match poll(&doc, id("under"), ActionKind::Click, &mut previous) {
            Readiness::Waiting {
                predicate: Predicate::ReceivesEvents,
                detail: Some(detail),
            } => assert!(detail.contains("overlay")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_enabled_and_editable() {
        let doc = Document::from_html("<button id='d' disabled>x</button><input id='ro' readonly>");
        let d = doc.get_element_by_id("d").unwrap();
        let ro = doc.get_element_by_id("ro").unwrap();
        let mut previous = None;
        poll(&doc, d, ActionKind::Click, &mut previous);
        assert!(matches!(
            poll(&doc, d, ActionKind::Click, &mut previous),
            Readiness::Waiting { predicate: Predicate::Enabled, .. }
        ));
        let mut previous = None;
        poll(&doc, ro, ActionKind::Fill, &mut previous);
        assert!(matches!(
            poll(&doc, ro, ActionKind::Fill, &mut previous),
            Readiness::Waiting { predicate: Predicate::Editable, .. }
        ));
        assert_eq!(Predicate::ReceivesEvents.to_string(), "receiving events");
    }

    #[test]
    fn test_label_text_reports_its_control_state() {
        let doc = Document::from_html(
            "<label><input type='radio' disabled><span id='t'>Disabled Option</span></label>",
        );
        let t = doc.get_element_by_id("t").unwrap();
        let mut previous = None;
        poll(&doc, t, ActionKind::Check, &mut previous);
        assert!(matches!(
            poll(&doc, t, ActionKind::Check, &mut previous),
            Readiness::Waiting { predicate: Predicate::Enabled, .. }
        ));
    }
}
