// CSS selector subset
//
// Grammar:
//   list      := complex ("," complex)*
//   complex   := compound (combinator compound)*
//   combinator:= whitespace | ">"
//   compound  := (tag | "*")? simple*
//   simple    := "#" ident | "." ident | "[" attr (op value)? "]" | ":" pseudo
//   pseudo    := text(...) | text-is(...) | has-text(...) | visible
//
// Matching walks right to left, like browsers do.

use super::document::{Document, NodeId};
use super::layout::Layout;
use super::text::TextMatch;

/// Everything a selector needs to look at while matching.
pub struct QueryContext<'a> {
    pub doc: &'a Document,
    pub layout: &'a Layout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    Descendant,
    Child,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrOp {
    Equals,
    Contains,
    Prefix,
    Suffix,
    Word,
}

#[derive(Debug, Clone)]
enum Simple {
    Id(String),
    Class(String),
    Attr {
        name: String,
        op: Option<(AttrOp, String)>,
        ignore_case: bool,
    },
    Text(TextMatch),
    TextIs(TextMatch),
    HasText(TextMatch),
    Visible,
}

#[derive(Debug, Clone, Default)]
struct Compound {
    tag: Option<String>,
    simples: Vec<Simple>,
}

#[derive(Debug, Clone)]
struct Complex {
    /// `parts[0].0` is unused; every later combinator joins part i-1 to part i.
    parts: Vec<(Combinator, Compound)>,
}

/// A parsed, comma-separated selector list.
#[derive(Debug, Clone)]
pub struct SelectorList {
    selectors: Vec<Complex>,
}

impl SelectorList {
    /// Parses `source`, returning a human-readable reason on failure.
    pub fn parse(source: &str) -> Result<Self, String> {
        let mut parser = Parser {
            chars: source.chars().collect(),
            pos: 0,
        };
        let list = parser.list()?;
        Ok(SelectorList { selectors: list })
    }

    pub fn matches(&self, cx: &QueryContext<'_>, node: NodeId) -> bool {
        self.selectors
            .iter()
            .any(|complex| match_from(cx, &complex.parts, complex.parts.len() - 1, node))
    }

    /// Descendants of `scope` (excluding `scope`) that match, in document order.
    pub fn query_all(&self, cx: &QueryContext<'_>, scope: NodeId) -> Vec<NodeId> {
        cx.doc
            .descendants(scope)
            .into_iter()
            .filter(|n| self.matches(cx, *n))
            .collect()
    }
}

fn match_from(
    cx: &QueryContext<'_>,
    parts: &[(Combinator, Compound)],
    index: usize,
    node: NodeId,
) -> bool {
    let (combinator, compound) = &parts[index];
    if !compound_matches(cx, compound, node) {
        return false;
    }
    if index == 0 {
        return true;
    }
    match combinator {
        Combinator::Child => cx
            .doc
            .parent(node)
            .is_some_and(|p| match_from(cx, parts, index - 1, p)),
        Combinator::Descendant => cx
            .doc
            .ancestors(node)
            .into_iter()
            .any(|a| match_from(cx, parts, index - 1, a)),
    }
}

fn compound_matches(cx: &QueryContext<'_>, compound: &Compound, node: NodeId) -> bool {
    let Some(el) = cx.doc.element(node) else {
        return false;
    };
    if let Some(tag) = &compound.tag {
        if el.tag() != tag {
            return false;
        }
    }
    compound.simples.iter().all(|simple| match simple {
        Simple::Id(id) => el.id() == Some(id.as_str()),
        Simple::Class(class) => el.has_class(class),
        Simple::Attr {
            name,
            op,
            ignore_case,
        } => {
            let Some(actual) = el.attribute(name) else {
                return false;
            };
            let Some((op, expected)) = op else {
                return true;
            };
            let (actual, expected) = if *ignore_case {
                (actual.to_lowercase(), expected.to_lowercase())
            } else {
                (actual.to_string(), expected.clone())
            };
            match op {
                AttrOp::Equals => actual == expected,
                AttrOp::Contains => !expected.is_empty() && actual.contains(&expected),
                AttrOp::Prefix => !expected.is_empty() && actual.starts_with(&expected),
                AttrOp::Suffix => !expected.is_empty() && actual.ends_with(&expected),
                AttrOp::Word => actual.split_whitespace().any(|w| w == expected),
            }
        }
        Simple::Text(m) | Simple::TextIs(m) => {
            m.matches(&cx.doc.text_content(node))
                && !cx
                    .doc
                    .element_children(node)
                    .into_iter()
                    .any(|child| m.matches(&cx.doc.text_content(child)))
        }
        Simple::HasText(m) => m.matches(&cx.doc.text_content(node)),
        Simple::Visible => cx.layout.is_visible(node),
    })
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_whitespace(&mut self) -> bool {
        let start = self.pos;
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
        self.pos > start
    }

    fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn list(&mut self) -> Result<Vec<Complex>, String> {
        let mut selectors = vec![self.complex()?];
        while self.eat(',') {
            selectors.push(self.complex()?);
        }
        if let Some(c) = self.peek() {
            return Err(format!("unexpected '{}' at position {}", c, self.pos));
        }
        Ok(selectors)
    }

    fn complex(&mut self) -> Result<Complex, String> {
        self.skip_whitespace();
        let mut parts = vec![(Combinator::Descendant, self.compound()?)];
        loop {
            let had_space = self.skip_whitespace();
            let combinator = if self.eat('>') {
                self.skip_whitespace();
                Combinator::Child
            } else if had_space && !matches!(self.peek(), None | Some(',')) {
                Combinator::Descendant
            } else {
                break;
            };
            parts.push((combinator, self.compound()?));
        }
        Ok(Complex { parts })
    }

    fn compound(&mut self) -> Result<Compound, String> {
        let mut compound = Compound::default();
        if self.eat('*') {
            compound.tag = None;
        } else if self.peek().is_some_and(is_ident_char) {
            compound.tag = Some(self.ident()?.to_ascii_lowercase());
        } else if !matches!(self.peek(), Some('#' | '.' | '[' | ':')) {
            return Err(match self.peek() {
                Some(c) => format!("unexpected '{}' at position {}", c, self.pos),
                None => "unexpected end of selector".to_string(),
            });
        }
        loop {
            match self.peek() {
                Some('#') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Id(self.ident()?));
                }
                Some('.') => {
                    self.pos += 1;
                    compound.simples.push(Simple::Class(self.ident()?));
                }
                Some('[') => {
                    self.pos += 1;
                    compound.simples.push(self.attribute()?);
                }
                Some(':') => {
                    self.pos += 1;
                    compound.simples.push(self.pseudo()?);
                }
                _ => break,
            }
        }
        Ok(compound)
    }

    fn ident(&mut self) -> Result<String, String> {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_char) {
            self.pos += 1;
        }
        if start == self.pos {
            return Err(format!("expected identifier at position {}", self.pos));
        }
        Ok(self.chars[start..self.pos].iter().collect())
    }

    fn attribute(&mut self) -> Result<Simple, String> {
        self.skip_whitespace();
        let name = self.ident()?.to_ascii_lowercase();
        self.skip_whitespace();
        let op = match self.peek() {
            Some(']') => None,
            Some('=') => {
                self.pos += 1;
                Some(AttrOp::Equals)
            }
            Some(c @ ('*' | '^' | '$' | '~')) => {
                self.pos += 1;
                if !self.eat('=') {
                    return Err(format!("expected '=' after '{}' in attribute selector", c));
                }
                Some(match c {
                    '*' => AttrOp::Contains,
                    '^' => AttrOp::Prefix,
                    '$' => AttrOp::Suffix,
                    _ => AttrOp::Word,
                })
            }
            _ => return Err(format!("malformed attribute selector at position {}", self.pos)),
        };
        let op = match op {
            Some(op) => {
                self.skip_whitespace();
                let value = match self.peek() {
                    Some('"' | '\'') => self.quoted()?,
                    _ => self.ident()?,
                };
                Some((op, value))
            }
            None => None,
        };
        self.skip_whitespace();
        let mut ignore_case = false;
        if matches!(self.peek(), Some('i' | 'I')) {
            self.pos += 1;
            ignore_case = true;
            self.skip_whitespace();
        } else if matches!(self.peek(), Some('s' | 'S')) {
            self.pos += 1;
            self.skip_whitespace();
        }
        if !self.eat(']') {
            return Err("unterminated attribute selector".to_string());
        }
        Ok(Simple::Attr {
            name,
            op,
            ignore_case,
        })
    }

    fn quoted(&mut self) -> Result<String, String> {
        let Some(quote) = self.peek() else {
            return Err("expected string".to_string());
        };
        self.pos += 1;
        let mut out = String::new();
        loop {
            match self.peek() {
                None => return Err("unterminated string".to_string()),
                Some('\\') => {
                    self.pos += 1;
                    if let Some(c) = self.peek() {
                        out.push(c);
                        self.pos += 1;
                    }
                }
                Some(c) if c == quote => {
                    self.pos += 1;
                    return Ok(out);
                }
                Some(c) => {
                    out.push(c);
                    self.pos += 1;
                }
            }
        }
    }

    fn pseudo_argument(&mut self) -> Result<String, String> {
        if !self.eat('(') {
            return Err("expected '(' after pseudo-class".to_string());
        }
        self.skip_whitespace();
        let value = if matches!(self.peek(), Some('"' | '\'')) {
            self.quoted()?
        } else {
            let start = self.pos;
            while self.peek().is_some_and(|c| c != ')') {
                self.pos += 1;
            }
            self.chars[start..self.pos].iter().collect::<String>().trim().to_string()
        };
        self.skip_whitespace();
        if !self.eat(')') {
            return Err("expected ')'".to_string());
        }
        Ok(value)
    }

    fn pseudo(&mut self) -> Result<Simple, String> {
        let name = self.ident()?.to_ascii_lowercase();
        match name.as_str() {
            "visible" => Ok(Simple::Visible),
            "text" => Ok(Simple::Text(TextMatch::Substring(self.pseudo_argument()?))),
            "text-is" => Ok(Simple::TextIs(TextMatch::Exact(self.pseudo_argument()?))),
            "has-text" => Ok(Simple::HasText(TextMatch::Substring(self.pseudo_argument()?))),
            other => Err(format!("unsupported pseudo-class ':{}'", other)),
        }
    }
}

fn is_ident_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}
