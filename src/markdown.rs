use pulldown_cmark::{Alignment, CodeBlockKind, Event, HeadingLevel, LinkType, Options, Parser, Tag};
use serde::{Deserialize, Serialize};

use crate::ast::{Element, Node, PropertyValue};

/// Deepest element nesting the builder produces. Tags opened below this
/// depth dissolve into the innermost element that was kept.
pub const MAX_NESTING: usize = 256;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkdownOptions {
    /// Tables, strikethrough, task lists and footnotes.
    pub gfm: bool,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self { gfm: true }
    }
}

/// Parse markdown into an element tree rooted at [`Node::Root`].
///
/// Raw HTML is kept as [`Node::Raw`]; the post pass decides what becomes of it.
pub fn parse(content: &str, options: &MarkdownOptions) -> Node {
    let mut parser_options = Options::empty();
    if options.gfm {
        parser_options.insert(Options::ENABLE_TABLES);
        parser_options.insert(Options::ENABLE_STRIKETHROUGH);
        parser_options.insert(Options::ENABLE_TASKLISTS);
        parser_options.insert(Options::ENABLE_FOOTNOTES);
    }

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(content, parser_options) {
        builder.event(event);
    }
    builder.finish()
}

struct PendingImage {
    element: Element,
    alt: String,
    depth: usize,
}

/// Builds the tree from the event stream. Tags that map to no element are
/// opened as nameless fragments and dissolve into their parent on close.
struct TreeBuilder {
    stack: Vec<Element>,
    image: Option<PendingImage>,
    code_language: Option<String>,
    table_alignments: Vec<Alignment>,
    in_table_head: bool,
    cell_index: usize,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Element::new("")],
            image: None,
            code_language: None,
            table_alignments: Vec::new(),
            in_table_head: false,
            cell_index: 0,
        }
    }

    fn event(&mut self, event: Event<'_>) {
        if let Some(image) = self.image.as_mut() {
            match event {
                Event::Start(_) => image.depth += 1,
                Event::End(_) if image.depth > 0 => image.depth -= 1,
                Event::End(_) => self.finish_image(),
                Event::Text(text) | Event::Code(text) => image.alt.push_str(&text),
                Event::SoftBreak | Event::HardBreak => image.alt.push(' '),
                _ => {}
            }
            return;
        }

        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(_) => self.close(),
            Event::Text(text) => self.push(Node::text(text.into_string())),
            Event::Code(text) => self.push(
                Element::new("code")
                    .with_child(Node::text(text.into_string()))
                    .into(),
            ),
            Event::Html(html) | Event::InlineHtml(html) => self.push(Node::Raw {
                value: html.into_string(),
            }),
            Event::SoftBreak => self.push(Node::text("\n")),
            Event::HardBreak => {
                self.push(Element::new("br").into());
                self.push(Node::text("\n"));
            }
            Event::Rule => self.push(Element::new("hr").into()),
            Event::TaskListMarker(checked) => {
                let mut input = Element::new("input")
                    .with_property("type", "checkbox")
                    .with_property("disabled", true);
                if checked {
                    input.set_property("checked", true);
                }
                self.push(input.into());
            }
            Event::FootnoteReference(name) => self.push(
                Element::new("sup")
                    .with_child(Node::text(format!("[{}]", &*name)))
                    .into(),
            ),
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        let element = match tag {
            Tag::Paragraph => Element::new("p"),
            Tag::Heading { level, id, .. } => {
                let mut heading = Element::new(heading_tag(level));
                if let Some(id) = id {
                    heading.set_property("id", id.into_string());
                }
                heading
            }
            Tag::BlockQuote(_) => Element::new("blockquote"),
            Tag::CodeBlock(kind) => {
                self.code_language = match kind {
                    CodeBlockKind::Fenced(info) => info
                        .split_whitespace()
                        .next()
                        .map(|lang| format!("language-{lang}")),
                    CodeBlockKind::Indented => None,
                };
                Element::new("pre")
            }
            Tag::List(None) => Element::new("ul"),
            Tag::List(Some(1)) => Element::new("ol"),
            Tag::List(Some(start)) => Element::new("ol").with_property("start", start as f64),
            Tag::Item => Element::new("li"),
            Tag::Table(alignments) => {
                self.table_alignments = alignments;
                Element::new("table")
            }
            Tag::TableHead => {
                self.in_table_head = true;
                self.cell_index = 0;
                Element::new("thead")
            }
            Tag::TableRow => {
                self.in_table_head = false;
                self.cell_index = 0;
                Element::new("tr")
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.in_table_head { "th" } else { "td" });
                if let Some(align) = self.table_alignments.get(self.cell_index).and_then(alignment)
                {
                    cell.set_property("align", align);
                }
                self.cell_index += 1;
                cell
            }
            Tag::Emphasis => Element::new("em"),
            Tag::Strong => Element::new("strong"),
            Tag::Strikethrough => Element::new("del"),
            Tag::Link {
                link_type,
                dest_url,
                title,
                ..
            } => {
                let href = if link_type == LinkType::Email {
                    format!("mailto:{}", &*dest_url)
                } else {
                    dest_url.into_string()
                };
                let mut anchor = Element::new("a").with_property("href", href);
                if !title.is_empty() {
                    anchor.set_property("title", title.into_string());
                }
                anchor
            }
            Tag::Image {
                dest_url, title, ..
            } => {
                let mut image = Element::new("img").with_property("src", dest_url.into_string());
                if !title.is_empty() {
                    image.set_property("title", title.into_string());
                }
                self.image = Some(PendingImage {
                    element: image,
                    alt: String::new(),
                    depth: 0,
                });
                return;
            }
            Tag::FootnoteDefinition(label) => Element::new("div")
                .with_property("class", PropertyValue::List(vec!["footnote-definition".into()]))
                .with_child(
                    Element::new("sup")
                        .with_child(Node::text(format!("[{}]", &*label)))
                        .into(),
                ),
            _ => Element::new(""),
        };

        // Tree passes recurse once per level.
        let element = if self.stack.len() > MAX_NESTING {
            Element::new("")
        } else {
            element
        };
        self.stack.push(element);
    }

    fn close(&mut self) {
        // The synthetic root is never closed by an event.
        if self.stack.len() < 2 {
            return;
        }
        let Some(mut element) = self.stack.pop() else {
            return;
        };

        match element.tag_name.as_str() {
            "" => {
                for child in element.children {
                    self.push(child);
                }
                return;
            }
            "pre" => {
                let mut code = Element::new("code");
                if let Some(language) = self.code_language.take() {
                    code.set_property("class", PropertyValue::List(vec![language.into()]));
                }
                code.children = std::mem::take(&mut element.children);
                element.children.push(code.into());
            }
            "thead" => {
                self.in_table_head = false;
                let row = Element::new("tr").with_children(std::mem::take(&mut element.children));
                element.children.push(row.into());
            }
            "table" => {
                let mut head = Vec::new();
                let mut rows = Vec::new();
                for child in std::mem::take(&mut element.children) {
                    if matches!(child.as_element(), Some(e) if e.tag_name == "tr") {
                        rows.push(child);
                    } else {
                        head.push(child);
                    }
                }
                element.children = head;
                if !rows.is_empty() {
                    element
                        .children
                        .push(Element::new("tbody").with_children(rows).into());
                }
                self.table_alignments.clear();
            }
            _ => {}
        }
        self.push(element.into());
    }

    fn finish_image(&mut self) {
        if let Some(PendingImage {
            mut element, alt, ..
        }) = self.image.take()
        {
            element.set_property("alt", alt);
            self.push(element.into());
        }
    }

    /// Append to the innermost open element, merging adjacent text.
    fn push(&mut self, node: Node) {
        let Some(parent) = self.stack.last_mut() else {
            return;
        };
        if let (Node::Text { value }, Some(Node::Text { value: last })) =
            (&node, parent.children.last_mut())
        {
            last.push_str(value);
            return;
        }
        parent.children.push(node);
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            self.close();
        }
        let children = self
            .stack
            .pop()
            .map(|root| root.children)
            .unwrap_or_default();
        Node::root(children)
    }
}

fn heading_tag(level: HeadingLevel) -> &'static str {
    match level {
        HeadingLevel::H1 => "h1",
        HeadingLevel::H2 => "h2",
        HeadingLevel::H3 => "h3",
        HeadingLevel::H4 => "h4",
        HeadingLevel::H5 => "h5",
        HeadingLevel::H6 => "h6",
    }
}

fn alignment(align: &Alignment) -> Option<&'static str> {
    match align {
        Alignment::None => None,
        Alignment::Left => Some("left"),
        Alignment::Center => Some("center"),
        Alignment::Right => Some("right"),
    }
}
