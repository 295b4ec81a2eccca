// HTML fragment parser
//
// Tolerant, single pass, no tree-construction error recovery beyond popping
// to the nearest matching open tag. `<html>`, `<head>` and `<body>` tags are
// ignored so whole pages can be fed in; `<title>` sets the document title;
// script and style content is dropped. Whitespace-only text between tags
// collapses to a single space, and is dropped at the top level.

use super::document::{Document, NodeId};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const IGNORED_TAGS: &[&str] = &["html", "head", "body"];

/// Parses `markup` and appends the nodes to `parent`. Returns the top-level
/// nodes that were created.
pub(crate) fn parse_into(doc: &mut Document, parent: NodeId, markup: &str) -> Vec<NodeId> {
    let mut stack = vec![parent];
    let mut top_level = Vec::new();
    let mut rest = markup;

    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("<!--") {
            rest = after.find("-->").map(|i| &after[i + 3..]).unwrap_or("");
            continue;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            rest = rest.find('>').map(|i| &rest[i + 1..]).unwrap_or("");
            continue;
        }
        if let Some(after) = rest.strip_prefix("</") {
            let end = after.find('>').unwrap_or(after.len());
            let name = after[..end].trim().to_ascii_lowercase();
            rest = after.get(end + 1..).unwrap_or("");
            if IGNORED_TAGS.contains(&name.as_str()) {
                continue;
            }
            let open = stack
                .iter()
                .enumerate()
                .skip(1)
                .rev()
                .find(|(_, n)| doc.element(**n).is_some_and(|el| el.tag() == name))
                .map(|(i, _)| i);
            if let Some(pos) = open {
                stack.truncate(pos);
            }
            continue;
        }
        if rest.len() > 1
            && rest.starts_with('<')
            && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic())
        {
            let tag = parse_start_tag(&rest[1..]);
            rest = tag.rest;
            if IGNORED_TAGS.contains(&tag.name.as_str()) {
                continue;
            }
            if matches!(tag.name.as_str(), "title" | "script" | "style") {
                let close = format!("</{}", tag.name);
                let end = find_ignore_case(rest, &close).unwrap_or(rest.len());
                if tag.name == "title" {
                    doc.set_title(super::text::normalize_whitespace(&decode_entities(
                        &rest[..end],
                    )));
                }
                rest = &rest[end..];
                rest = rest.find('>').map(|i| &rest[i + 1..]).unwrap_or("");
                continue;
            }

            let node = doc.create_element(&tag.name);
            for (name, value) in &tag.attributes {
                let _ = doc.set_attribute(node, name, value);
            }
            append(doc, &stack, &mut top_level, node);
            if !tag.self_closing && !VOID_ELEMENTS.contains(&tag.name.as_str()) {
                stack.push(node);
            }
            continue;
        }

        let end = if rest.starts_with('<') {
            1 + rest[1..].find('<').unwrap_or(rest.len() - 1)
        } else {
            rest.find('<').unwrap_or(rest.len())
        };
        let text = &rest[..end];
        rest = &rest[end..];
        if !text.trim().is_empty() {
            let node = doc.create_text(&decode_entities(text));
            append(doc, &stack, &mut top_level, node);
        } else if stack.len() > 1 {
            let node = doc.create_text(" ");
            append(doc, &stack, &mut top_level, node);
        }
    }
    top_level
}

fn append(doc: &mut Document, stack: &[NodeId], top_level: &mut Vec<NodeId>, node: NodeId) {
    let Some(&parent) = stack.last() else {
        return;
    };
    if doc.append_child(parent, node).is_ok() && stack.len() == 1 {
        top_level.push(node);
    }
}

fn find_ignore_case(haystack: &str, needle: &str) -> Option<usize> {
    haystack
        .to_ascii_lowercase()
        .find(&needle.to_ascii_lowercase())
}

struct StartTag<'a> {
    name: String,
    attributes: Vec<(String, String)>,
    self_closing: bool,
    rest: &'a str,
}

/// Parses the inside of a start tag; `input` begins right after `<`.
fn parse_start_tag(input: &str) -> StartTag<'_> {
    let name_end = input
        .find(|c: char| c.is_whitespace() || c == '/' || c == '>')
        .unwrap_or(input.len());
    let name = input[..name_end].to_ascii_lowercase();
    let mut rest = &input[name_end..];
    let mut attributes = Vec::new();
    let mut self_closing = false;

    loop {
        rest = rest.trim_start();
        if rest.is_empty() {
            break;
        }
        if let Some(after) = rest.strip_prefix("/>") {
            self_closing = true;
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('>') {
            rest = after;
            break;
        }
        if let Some(after) = rest.strip_prefix('/') {
            rest = after;
            continue;
        }

        let attr_end = rest
            .find(|c: char| c.is_whitespace() || c == '=' || c == '>' || c == '/')
            .unwrap_or(rest.len());
        let attr_name = rest[..attr_end].to_ascii_lowercase();
        rest = rest[attr_end..].trim_start();

        let mut value = String::new();
        if let Some(after) = rest.strip_prefix('=') {
            let after = after.trim_start();
            if let Some(quote) = after.chars().next().filter(|c| *c == '"' || *c == '\'') {
                let body = &after[1..];
                let close = body.find(quote).unwrap_or(body.len());
                value = decode_entities(&body[..close]);
                rest = body.get(close + 1..).unwrap_or("");
            } else {
                let end = after
                    .find(|c: char| c.is_whitespace() || c == '>')
                    .unwrap_or(after.len());
                value = decode_entities(&after[..end]);
                rest = &after[end..];
            }
        }
        if !attr_name.is_empty() {
            attributes.push((attr_name, value));
        }
    }

    StartTag {
        name,
        attributes,
        self_closing,
        rest,
    }
}

/// Decodes the named entities the fixtures use plus numeric references.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('&') {
        out.push_str(&rest[..start]);
        rest = &rest[start..];
        let decoded = rest.find(';').filter(|end| *end <= 10).and_then(|end| {
            let entity = &rest[1..end];
            let ch = match entity {
                "amp" => Some('&'),
                "lt" => Some('<'),
                "gt" => Some('>'),
                "quot" => Some('"'),
                "apos" => Some('\''),
                "nbsp" => Some('\u{a0}'),
                _ => entity
                    .strip_prefix("#x")
                    .or_else(|| entity.strip_prefix("#X"))
                    .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                    .or_else(|| entity.strip_prefix('#').and_then(|d| d.parse().ok()))
                    .and_then(char::from_u32),
            };
            ch.map(|c| (c, end))
        });
        match decoded {
            Some((ch, end)) => {
                out.push(ch);
                rest = &rest[end + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

pub(crate) fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub(crate) fn escape_attribute(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_markup_and_attributes() {
        let doc = Document::from_html(
            r#"<nb-card id="grid"><nb-card-header>Using the Grid</nb-card-header>
               <input id="inputEmail1" type="email" placeholder="Email" disabled>
               <label for=x class='label'>Email</label></nb-card>"#,
        );
        let card = doc.get_element_by_id("grid").unwrap();
        assert_eq!(doc.element_children(card).len(), 3);
        let input = doc.get_element_by_id("inputEmail1").unwrap();
        let el = doc.element(input).unwrap();
        assert_eq!(el.attribute("placeholder"), Some("Email"));
        assert!(el.has_attribute("disabled"));
        assert_eq!(el.attribute("disabled"), Some(""));
        assert_eq!(
            doc.text_content(card).split_whitespace().collect::<Vec<_>>(),
            ["Using", "the", "Grid", "Email"]
        );
    }

    #[test]
    fn test_page_wrappers_title_and_scripts() {
        let doc = Document::from_html(
            "<!DOCTYPE html><html><head><title>Form &amp; Layouts</title>\
             <script>if (a < b) {}</script></head><body><p>hi</p></body></html>",
        );
        assert_eq!(doc.title(), "Form & Layouts");
        let body = doc.body();
        let children = doc.element_children(body);
        assert_eq!(children.len(), 1);
        assert_eq!(doc.element(children[0]).unwrap().tag(), "p");
    }

    #[test]
    fn test_entities_and_serialization() {
        assert_eq!(decode_entities("a &lt;b&gt; &#65;&#x42; & c"), "a <b> AB & c");
        let doc = Document::from_html("<p class=\"x\">1 &lt; 2<br></p>");
        let p = doc.query_selector("p").unwrap().unwrap();
        assert_eq!(doc.outer_html(p), "<p class=\"x\">1 &lt; 2<br></p>");
    }

    #[test]
    fn test_unclosed_tags_are_closed_by_ancestor_end_tag() {
        let doc = Document::from_html("<div id='a'><span>one<span>two</div><p id='b'></p>");
        let a = doc.get_element_by_id("a").unwrap();
        let b = doc.get_element_by_id("b").unwrap();
        assert_eq!(doc.parent(b), Some(doc.body()));
        assert_eq!(doc.text_content(a), "onetwo");
    }
}
