//! Markup fragment parser
//!
//! Just enough HTML to host rendered component content: elements with quoted
//! or bare attributes, text, comments (dropped), void and self-closing
//! elements. Entities are kept verbatim.

use regex::Regex;
use std::sync::OnceLock;

use crate::{DomError, Result};

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// A parsed markup node
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MarkupNode {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<MarkupNode>,
    },
    Text(String),
}

pub fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn attribute_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"([^\s=/"'>]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+)))?"#)
            .expect("attribute pattern is valid")
    })
}

struct Open {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<MarkupNode>,
    offset: usize,
}

/// Parse a fragment into its top-level nodes
pub fn parse_fragment(src: &str) -> Result<Vec<MarkupNode>> {
    let mut top = Vec::new();
    let mut stack: Vec<Open> = Vec::new();
    let mut pos = 0;

    while pos < src.len() {
        let rest = &src[pos..];

        if let Some(after) = rest.strip_prefix("<!--") {
            let end = after
                .find("-->")
                .ok_or_else(|| markup_error(pos, "unterminated comment"))?;
            pos += 4 + end + 3;
            continue;
        }

        if let Some(after) = rest.strip_prefix("</") {
            let end = after
                .find('>')
                .ok_or_else(|| markup_error(pos, "unterminated closing tag"))?;
            let name = after[..end].trim().to_ascii_lowercase();
            let open = stack
                .pop()
                .ok_or_else(|| markup_error(pos, format!("unexpected </{name}>")))?;
            if open.tag != name {
                return Err(markup_error(
                    pos,
                    format!("expected </{}>, found </{}>", open.tag, name),
                ));
            }
            push(
                &mut stack,
                &mut top,
                MarkupNode::Element {
                    tag: open.tag,
                    attributes: open.attributes,
                    children: open.children,
                },
            );
            pos += 2 + end + 1;
            continue;
        }

        if rest.starts_with('<') && rest[1..].starts_with(|c: char| c.is_ascii_alphabetic()) {
            let end = tag_end(rest).ok_or_else(|| markup_error(pos, "unterminated tag"))?;
            let inner = &rest[1..end];
            let (inner, self_closing) = match inner.trim_end().strip_suffix('/') {
                Some(stripped) => (stripped, true),
                None => (inner, false),
            };
            let name_len = inner
                .find(|c: char| c.is_whitespace())
                .unwrap_or(inner.len());
            let tag = inner[..name_len].to_ascii_lowercase();
            let attributes = parse_attributes(&inner[name_len..]);

            if self_closing || is_void(&tag) {
                push(
                    &mut stack,
                    &mut top,
                    MarkupNode::Element {
                        tag,
                        attributes,
                        children: Vec::new(),
                    },
                );
            } else {
                stack.push(Open {
                    tag,
                    attributes,
                    children: Vec::new(),
                    offset: pos,
                });
            }
            pos += end + 1;
            continue;
        }

        // Text runs up to the next '<', always consuming at least one char
        let first = rest.chars().next().map_or(1, char::len_utf8);
        let len = rest[first..].find('<').map_or(rest.len(), |i| i + first);
        push(&mut stack, &mut top, MarkupNode::Text(rest[..len].to_string()));
        pos += len;
    }

    if let Some(open) = stack.pop() {
        return Err(markup_error(open.offset, format!("unclosed <{}>", open.tag)));
    }

    Ok(top)
}

fn push(stack: &mut [Open], top: &mut Vec<MarkupNode>, node: MarkupNode) {
    let siblings = match stack.last_mut() {
        Some(open) => &mut open.children,
        None => top,
    };
    if let (MarkupNode::Text(text), Some(MarkupNode::Text(prev))) = (&node, siblings.last_mut()) {
        prev.push_str(text);
        return;
    }
    siblings.push(node);
}

/// Byte index of the `>` closing a tag, skipping quoted attribute values
fn tag_end(rest: &str) -> Option<usize> {
    let mut quote = None;
    for (i, c) in rest.char_indices() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => return Some(i),
            None => {}
        }
    }
    None
}

fn parse_attributes(src: &str) -> Vec<(String, String)> {
    attribute_pattern()
        .captures_iter(src)
        .map(|caps| {
            let name = caps[1].to_ascii_lowercase();
            let value = caps
                .get(2)
                .or_else(|| caps.get(3))
                .or_else(|| caps.get(4))
                .map_or_else(String::new, |m| m.as_str().to_string());
            (name, value)
        })
        .collect()
}

fn markup_error(offset: usize, message: impl Into<String>) -> DomError {
    DomError::Markup {
        offset,
        message: message.into(),
    }
}

/// Escape an attribute value for double-quoted output
pub fn escape_attribute(value: &str) -> String {
    value.replace('"', "&quot;")
}
