use std::fmt::Write;

use crate::ast::{Element, Node, PropertyValue, join_items};

/// Elements that never have content or a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// Elements whose whitespace-only text children are dropped.
const TABLE_ELEMENTS: &[&str] = &["table", "tbody", "thead", "tfoot", "tr"];

const TABLE_CELL_ELEMENTS: &[&str] = &["td", "th"];

/// Attributes whose list values are joined with commas instead of spaces.
const COMMA_SEPARATED: &[&str] = &["accept", "coords", "srcset"];

/// Serialize a tree to HTML.
///
/// Raw nodes are written as escaped text: a tree that skipped the post pass
/// still cannot inject markup.
pub fn to_html(node: &Node) -> String {
    let mut out = String::new();
    write_node(&mut out, node, None);
    out
}

fn write_node(out: &mut String, node: &Node, parent: Option<&Element>) {
    match node {
        Node::Root { children } => {
            for child in children {
                write_node(out, child, None);
            }
        }
        Node::Element(element) => write_element(out, element),
        Node::Text { value } => {
            let in_table = parent.is_some_and(|p| TABLE_ELEMENTS.contains(&p.tag_name.as_str()));
            if !(in_table && is_whitespace(value)) {
                escape_text(out, value);
            }
        }
        Node::Raw { value } => escape_text(out, value),
        Node::Comment { value } => {
            out.push_str("<!--");
            escape_text(out, value);
            out.push_str("-->");
        }
        Node::Doctype => out.push_str("<!doctype html>"),
    }
}

fn write_element(out: &mut String, element: &Element) {
    let tag = element.tag_name.as_str();
    if !is_valid_name(tag) {
        // Unnameable elements render as their content only.
        for child in &element.children {
            write_node(out, child, Some(element));
        }
        return;
    }

    out.push('<');
    out.push_str(tag);
    for (name, value) in attributes(element) {
        match value {
            None => {
                let _ = write!(out, " {name}");
            }
            Some(value) => {
                let _ = write!(out, " {name}=\"");
                escape_attribute(out, &value);
                out.push('"');
            }
        }
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&tag) {
        return;
    }
    for child in &element.children {
        write_node(out, child, Some(element));
    }
    let _ = write!(out, "</{tag}>");
}

/// Attribute name and value pairs as they should be written. `None` marks a
/// boolean attribute written without a value.
pub fn attributes(element: &Element) -> Vec<(String, Option<String>)> {
    let mut attrs = Vec::new();
    let mut align = None;

    for (name, value) in &element.properties {
        if !is_valid_name(name) {
            continue;
        }
        let value = match value {
            PropertyValue::Bool(false) => continue,
            PropertyValue::Bool(true) => None,
            PropertyValue::Number(n) if n.is_nan() => continue,
            PropertyValue::List(items) if COMMA_SEPARATED.contains(&name.as_str()) => {
                Some(join_items(items, ", ").trim().to_string())
            }
            PropertyValue::List(items) => Some(join_items(items, " ").trim().to_string()),
            other => Some(other.to_string()),
        };

        if name == "align" && TABLE_CELL_ELEMENTS.contains(&element.tag_name.as_str()) {
            if let Some(value) = value.filter(|v| !v.is_empty()) {
                align = Some(value);
            }
            continue;
        }
        attrs.push((name.clone(), value));
    }

    if let Some(align) = align {
        let declaration = format!("text-align: {align}");
        match attrs.iter_mut().find(|(name, _)| name == "style") {
            Some((_, Some(style))) if !style.trim().is_empty() => {
                *style = format!("{}; {declaration}", style.trim().trim_end_matches(';'));
            }
            Some((_, style)) => *style = Some(declaration),
            None => attrs.push(("style".to_string(), Some(declaration))),
        }
    }
    attrs
}

fn is_whitespace(value: &str) -> bool {
    value.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\x0c' | '\r'))
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
}

fn escape_text(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
