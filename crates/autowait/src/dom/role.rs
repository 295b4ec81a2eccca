// ARIA roles and accessible names
//
// Covers the implicit roles of the elements fixtures use and a reduced
// accessible-name computation: aria-labelledby, aria-label, associated
// labels, content for roles named from content, then title and placeholder.

use super::document::{Document, Element, NodeId};
use super::layout::Layout;
use super::text::normalize_whitespace;

/// Explicit `role` (first token) or the implicit role of the element.
pub fn role_of(doc: &Document, id: NodeId) -> Option<String> {
    let el = doc.element(id)?;
    if let Some(explicit) = el
        .attribute("role")
        .and_then(|r| r.split_whitespace().next())
    {
        return Some(explicit.to_ascii_lowercase());
    }
    implicit_role(el).map(str::to_string)
}

fn implicit_role(el: &Element) -> Option<&'static str> {
    let role = match el.tag() {
        "a" | "area" if el.has_attribute("href") => "link",
        "button" => "button",
        "input" => match el.input_type()?.as_str() {
            "button" | "image" | "reset" | "submit" => "button",
            "checkbox" => "checkbox",
            "radio" => "radio",
            "range" => "slider",
            "number" => "spinbutton",
            "search" => "searchbox",
            "hidden" | "file" | "color" => return None,
            _ if el.has_attribute("list") => "combobox",
            _ => "textbox",
        },
        "textarea" => "textbox",
        "select" => {
            let size = el
                .attribute("size")
                .and_then(|s| s.parse::<u32>().ok())
                .unwrap_or(0);
            if el.has_attribute("multiple") || size > 1 {
                "listbox"
            } else {
                "combobox"
            }
        }
        "option" => "option",
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => "heading",
        "img" => {
            if el.attribute("alt") == Some("") {
                "presentation"
            } else {
                "img"
            }
        }
        "ul" | "ol" => "list",
        "li" => "listitem",
        "nav" => "navigation",
        "main" => "main",
        "header" => "banner",
        "footer" => "contentinfo",
        "aside" => "complementary",
        "form" => "form",
        "table" => "table",
        "tr" => "row",
        "td" => "cell",
        "th" => "columnheader",
        "dialog" => "dialog",
        "article" => "article",
        "p" => "paragraph",
        "hr" => "separator",
        "fieldset" => "group",
        "progress" => "progressbar",
        _ => return None,
    };
    Some(role)
}

fn named_from_content(role: &str) -> bool {
    matches!(
        role,
        "button"
            | "link"
            | "heading"
            | "option"
            | "cell"
            | "columnheader"
            | "checkbox"
            | "radio"
            | "switch"
            | "tab"
            | "menuitem"
            | "menuitemcheckbox"
            | "menuitemradio"
            | "treeitem"
            | "row"
            | "tooltip"
    )
}

/// Texts of everything that labels `id`: `aria-labelledby` targets,
/// `aria-label`, `<label for>` and a wrapping `<label>`.
pub fn label_texts(doc: &Document, id: NodeId) -> Vec<String> {
    let mut out = Vec::new();
    let Some(el) = doc.element(id) else {
        return out;
    };
    if let Some(ids) = el.attribute("aria-labelledby") {
        let text = ids
            .split_whitespace()
            .filter_map(|i| doc.get_element_by_id(i))
            .map(|n| normalize_whitespace(&doc.text_content(n)))
            .collect::<Vec<_>>()
            .join(" ");
        if !text.is_empty() {
            out.push(text);
        }
    }
    if let Some(label) = el.attribute("aria-label").map(normalize_whitespace) {
        if !label.is_empty() {
            out.push(label);
        }
    }
    let labelable = matches!(
        el.tag(),
        "input" | "textarea" | "select" | "button" | "meter" | "output" | "progress"
    );
    if labelable {
        if let Some(own_id) = el.id() {
            for node in doc.descendants(doc.root()) {
                let is_label = doc.element(node).is_some_and(|e| {
                    e.tag() == "label" && e.attribute("for") == Some(own_id)
                });
                if is_label {
                    out.push(normalize_whitespace(&doc.text_content(node)));
                }
            }
        }
        if let Some(label) = doc
            .ancestors(id)
            .into_iter()
            .find(|a| doc.element(*a).is_some_and(|e| e.tag() == "label"))
        {
            if doc.get_attribute(label, "for").is_none() {
                out.push(normalize_whitespace(&doc.text_content(label)));
            }
        }
    }
    out
}

/// Accessible name of `id`.
pub fn accessible_name(doc: &Document, id: NodeId) -> String {
    let Some(el) = doc.element(id) else {
        return String::new();
    };
    if let Some(first) = label_texts(doc, id).into_iter().find(|t| !t.is_empty()) {
        return first;
    }
    match el.input_type().as_deref() {
        Some("submit") => {
            return el.attribute("value").unwrap_or("Submit").to_string();
        }
        Some("reset") => {
            return el.attribute("value").unwrap_or("Reset").to_string();
        }
        Some("button") => {
            return el.attribute("value").unwrap_or_default().to_string();
        }
        Some("image") => {
            if let Some(alt) = el.attribute("alt") {
                return alt.to_string();
            }
        }
        _ => {}
    }
    if el.tag() == "img" {
        if let Some(alt) = el.attribute("alt") {
            return normalize_whitespace(alt);
        }
    }
    if role_of(doc, id).is_some_and(|r| named_from_content(&r)) {
        let text = normalize_whitespace(&doc.text_content(id));
        if !text.is_empty() {
            return text;
        }
    }
    el.attribute("title")
        .or_else(|| el.attribute("placeholder"))
        .map(normalize_whitespace)
        .unwrap_or_default()
}

/// Excluded from the accessibility tree: not rendered or under `aria-hidden`.
pub fn is_hidden_from_accessibility(doc: &Document, layout: &Layout, id: NodeId) -> bool {
    !layout.is_rendered(id)
        || std::iter::once(id)
            .chain(doc.ancestors(id))
            .any(|n| doc.get_attribute(n, "aria-hidden") == Some("true"))
}

/// Heading level for `h1`..`h6` or `aria-level`.
pub fn heading_level(doc: &Document, id: NodeId) -> Option<u32> {
    let el = doc.element(id)?;
    if let Some(level) = el.attribute("aria-level").and_then(|l| l.parse().ok()) {
        return Some(level);
    }
    el.tag()
        .strip_prefix('h')
        .and_then(|n| n.parse().ok())
        .filter(|n| (1..=6).contains(n))
}
