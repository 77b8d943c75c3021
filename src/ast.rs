use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A node in the element tree produced from markdown.
///
/// Wire format mirrors hast: `{"type": "element", "tag_name": "a", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    Root { children: Vec<Node> },
    Element(Element),
    Text { value: String },
    Comment { value: String },
    Doctype,
    /// Raw HTML passed through by the markdown parser.
    Raw { value: String },
}

/// Attribute bag of an element, keyed by HTML attribute name.
pub type Properties = BTreeMap<String, PropertyValue>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub properties: Properties,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Node>,
}

/// Loosely typed attribute value. An absent attribute is a missing key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Bool(bool),
    Number(f64),
    List(Vec<ListItem>),
}

/// One entry of a space- or comma-separated attribute list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ListItem {
    String(String),
    Number(f64),
}

impl Node {
    pub fn root(children: Vec<Node>) -> Self {
        Self::Root { children }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::Text {
            value: value.into(),
        }
    }

    pub fn children(&self) -> Option<&Vec<Node>> {
        match self {
            Self::Root { children } => Some(children),
            Self::Element(element) => Some(&element.children),
            _ => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Self::Root { children } => Some(children),
            Self::Element(element) => Some(&mut element.children),
            _ => None,
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Concatenated text of this node and all of its descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text { value } => out.push_str(value),
            Self::Root { children } => children.iter().for_each(|c| c.collect_text(out)),
            Self::Element(element) => element.children.iter().for_each(|c| c.collect_text(out)),
            _ => {}
        }
    }

    /// Depth-first search for every element with the given tag name.
    pub fn find_all(&self, tag_name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.collect_elements(tag_name, &mut found);
        found
    }

    fn collect_elements<'a>(&'a self, tag_name: &str, found: &mut Vec<&'a Element>) {
        if let Self::Element(element) = self {
            if element.tag_name == tag_name {
                found.push(element);
            }
        }
        if let Some(children) = self.children() {
            for child in children {
                child.collect_elements(tag_name, found);
            }
        }
    }
}

impl Element {
    pub fn new(tag_name: &str) -> Self {
        Self {
            tag_name: tag_name.to_string(),
            properties: Properties::new(),
            children: Vec::new(),
        }
    }

    pub fn with_property(mut self, name: &str, value: impl Into<PropertyValue>) -> Self {
        self.set_property(name, value);
        self
    }

    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: Vec<Node>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn property(&self, name: &str) -> Option<&PropertyValue> {
        self.properties.get(name)
    }

    /// String value of an attribute, or `default` when absent or not a string.
    pub fn property_str<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        match self.properties.get(name) {
            Some(PropertyValue::String(s)) => s,
            _ => default,
        }
    }

    pub fn set_property(&mut self, name: &str, value: impl Into<PropertyValue>) {
        self.properties.insert(name.to_string(), value.into());
    }

    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::List(items) => f.write_str(&join_items(items, " ")),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(value: Vec<String>) -> Self {
        Self::List(value.into_iter().map(ListItem::String).collect())
    }
}

impl From<Vec<ListItem>> for PropertyValue {
    fn from(value: Vec<ListItem>) -> Self {
        Self::List(value)
    }
}

impl fmt::Display for ListItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for ListItem {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ListItem {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<f64> for ListItem {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Join list items with `separator`.
pub fn join_items(items: &[ListItem], separator: &str) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(separator)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn property_str_falls_back_for_non_strings() {
        let element = Element::new("a")
            .with_property("href", 42.0)
            .with_property("title", "hi");
        assert_eq!(element.property_str("href", "none"), "none");
        assert_eq!(element.property_str("title", "none"), "hi");
        assert_eq!(element.property_str("missing", ""), "");
    }

    #[test]
    fn text_content_flattens_descendants() {
        let tree = Node::root(vec![
            Element::new("p")
                .with_child(Node::text("a "))
                .with_child(Element::new("em").with_child(Node::text("b")).into())
                .into(),
        ]);
        assert_eq!(tree.text_content(), "a b");
    }

    #[test]
    fn json_shape_is_tagged() {
        let node: Node = Element::new("img").with_property("alt", "x").into();
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "element");
        assert_eq!(json["tag_name"], "img");
        assert_eq!(json["properties"]["alt"], "x");
    }

    #[test]
    fn numeric_list_items_deserialize() {
        let json = r#"{"type":"element","tag_name":"area","properties":{"coords":[0,0,82,126],"class":["a",2]}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        let area = node.as_element().unwrap();
        assert_eq!(
            area.property("class"),
            Some(&PropertyValue::List(vec!["a".into(), 2.0.into()]))
        );
        assert_eq!(area.property("coords").unwrap().to_string(), "0 0 82 126");
    }

    #[test]
    fn list_values_display_space_separated() {
        let value = PropertyValue::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(value.to_string(), "a b");
    }
}
