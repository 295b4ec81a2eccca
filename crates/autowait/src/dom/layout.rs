// Block layout and hit testing
//
// Every rendered element is a block stacked below its previous sibling.
// Absolutely and fixed positioned elements leave the flow and sit at their
// left/top. Text contributes one line. That is enough to answer the
// questions the engine asks: does the element have a box, where is it, and
// which element is on top at a given point.

use super::document::{Document, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio::time::Instant;

/// Height of one line of text.
pub const LINE_HEIGHT: f64 = 20.0;

/// Browser viewport size in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 720,
        }
    }
}

/// An axis-aligned box in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Clone, Copy)]
struct LayoutBox {
    rect: Rect,
    rendered: bool,
    hit_testable: bool,
    z: i32,
    order: usize,
}

#[derive(Debug, Clone, Copy)]
struct Inherited {
    visibility_hidden: bool,
    pointer_events_none: bool,
    z: i32,
    offset: (f64, f64),
}

/// Boxes for every laid-out element of a document at one instant.
#[derive(Debug, Clone)]
pub struct Layout {
    boxes: HashMap<NodeId, LayoutBox>,
    viewport: Viewport,
}

impl Layout {
    /// Lays out `doc` as it looks at `now` (transitions are sampled at `now`).
    pub fn compute(doc: &Document, viewport: Viewport, now: Instant) -> Self {
        let mut layout = Layout {
            boxes: HashMap::new(),
            viewport,
        };
        let inherited = Inherited {
            visibility_hidden: false,
            pointer_events_none: false,
            z: 0,
            offset: (0.0, 0.0),
        };
        let mut order = 1;
        let width = f64::from(viewport.width);
        let body_height = layout.place(doc, doc.body(), 0.0, 0.0, width, inherited, now, &mut order);
        layout.boxes.insert(
            doc.root(),
            LayoutBox {
                rect: Rect {
                    x: 0.0,
                    y: 0.0,
                    width,
                    height: body_height.max(f64::from(viewport.height)),
                },
                rendered: true,
                hit_testable: true,
                z: 0,
                order: 0,
            },
        );
        layout
    }

    #[allow(clippy::too_many_arguments)]
    fn place(
        &mut self,
        doc: &Document,
        id: NodeId,
        x: f64,
        y: f64,
        available_width: f64,
        inherited: Inherited,
        now: Instant,
        order: &mut usize,
    ) -> f64 {
        let Some(el) = doc.element(id) else {
            return 0.0;
        };
        let style = el.style();
        let my_order = *order;
        *order += 1;
        if style.display_none {
            return 0.0;
        }

        let visibility_hidden = style
            .visibility_hidden
            .unwrap_or(inherited.visibility_hidden);
        let pointer_events_none = style
            .pointer_events_none
            .unwrap_or(inherited.pointer_events_none);
        let z = match style.position {
            super::style::Positioning::Static => inherited.z,
            _ => style.z_index.unwrap_or(inherited.z),
        };
        let (dx, dy) = el.transition_offset(now);
        let offset = (inherited.offset.0 + dx, inherited.offset.1 + dy);

        let out_of_flow = style.position.is_out_of_flow();
        let bx = if out_of_flow { style.left.unwrap_or(0.0) } else { x };
        let by = if out_of_flow { style.top.unwrap_or(y) } else { y };

        let (intrinsic_width, intrinsic_height) = intrinsic_size(doc, id);
        let width = style.width.or(intrinsic_width).unwrap_or(available_width);

        let mut cursor = by;
        if has_direct_text(doc, id) {
            cursor += LINE_HEIGHT;
        }
        let for_children = Inherited {
            visibility_hidden,
            pointer_events_none,
            z,
            offset,
        };
        for child in doc.element_children(id) {
            cursor += self.place(doc, child, bx, cursor, width, for_children, now, order);
        }
        let content_height = cursor - by;
        let height = style
            .height
            .unwrap_or_else(|| content_height.max(intrinsic_height.unwrap_or(0.0)));

        self.boxes.insert(
            id,
            LayoutBox {
                rect: Rect {
                    x: bx + offset.0,
                    y: by + offset.1,
                    width,
                    height,
                },
                rendered: !visibility_hidden,
                hit_testable: !visibility_hidden && !pointer_events_none,
                z,
                order: my_order,
            },
        );

        if out_of_flow { 0.0 } else { height }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Bounding box, or `None` when the element is detached or not rendered.
    pub fn rect(&self, id: NodeId) -> Option<Rect> {
        self.boxes.get(&id).map(|b| b.rect)
    }

    /// Has a box and is not `visibility: hidden`. Zero-sized boxes count.
    pub fn is_rendered(&self, id: NodeId) -> bool {
        self.boxes.get(&id).is_some_and(|b| b.rendered)
    }

    /// Rendered with a non-empty box.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.boxes
            .get(&id)
            .is_some_and(|b| b.rendered && !b.rect.is_empty())
    }

    /// Topmost element at (`x`, `y`): highest z-index, then latest in tree order.
    pub fn hit_test(&self, x: f64, y: f64) -> Option<NodeId> {
        self.boxes
            .iter()
            .filter(|(_, b)| b.hit_testable && !b.rect.is_empty() && b.rect.contains(x, y))
            .max_by_key(|(_, b)| (b.z, b.order))
            .map(|(id, _)| *id)
    }
}

fn has_direct_text(doc: &Document, id: NodeId) -> bool {
    doc.children(id)
        .iter()
        .any(|c| doc.text(*c).is_some_and(|t| !t.trim().is_empty()))
}

fn dimension(doc: &Document, id: NodeId, name: &str) -> Option<f64> {
    doc.get_attribute(id, name)?.trim().parse().ok()
}

fn intrinsic_size(doc: &Document, id: NodeId) -> (Option<f64>, Option<f64>) {
    let Some(el) = doc.element(id) else {
        return (None, None);
    };
    match el.tag() {
        "input" => match el.input_type().as_deref() {
            Some("checkbox") | Some("radio") => (Some(16.0), Some(16.0)),
            _ => (None, Some(32.0)),
        },
        "textarea" => (None, Some(64.0)),
        "select" | "button" => (None, Some(32.0)),
        "img" => (
            Some(dimension(doc, id, "width").unwrap_or(0.0)),
            Some(dimension(doc, id, "height").unwrap_or(0.0)),
        ),
        "br" => (None, Some(LINE_HEIGHT)),
        _ => (None, None),
    }
}
