// Copyright 2026 Paul Adamson
// Licensed under the Apache License, Version 2.0
//
// Document model
//
// The engine drives an in-process element tree instead of a browser. This
// module owns that tree and answers every question actionability asks of it:
// attachment, layout boxes, hit testing, enabled/editable state.

pub mod document;
pub mod html;
pub mod layout;
pub mod role;
pub mod selector;
pub mod style;
pub mod text;

pub use document::{
    Document, Element, EventContext, EventHandler, EventType, NodeData, NodeId, TimerCallback,
    Transition,
};
pub use layout::{Layout, Rect, Viewport};
pub use text::TextMatch;
