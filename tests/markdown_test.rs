use hardmark::ast::{Element, Node, PropertyValue};
use hardmark::markdown::{MAX_NESTING, MarkdownOptions, parse};

fn parse_default(content: &str) -> Node {
    parse(content, &MarkdownOptions::default())
}

fn top_tags(tree: &Node) -> Vec<String> {
    tree.children()
        .unwrap()
        .iter()
        .filter_map(Node::as_element)
        .map(|e| e.tag_name.clone())
        .collect()
}

fn first<'a>(tree: &'a Node, tag: &str) -> &'a Element {
    tree.find_all(tag)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no <{tag}> in {tree:?}"))
}

#[test]
fn headings_and_paragraphs() {
    let tree = parse_default("# Heading 1\n## Heading 2\n\nSome text");
    assert_eq!(top_tags(&tree), ["h1", "h2", "p"]);
    assert_eq!(first(&tree, "h1").text_content(), "Heading 1");
    assert_eq!(first(&tree, "p").text_content(), "Some text");
}

#[test]
fn inline_formatting_keeps_text_boundaries() {
    let tree = parse_default("This is **bold** and *italic*");
    let p = first(&tree, "p");
    assert_eq!(
        p.children,
        vec![
            Node::text("This is "),
            Element::new("strong").with_child(Node::text("bold")).into(),
            Node::text(" and "),
            Element::new("em").with_child(Node::text("italic")).into(),
        ]
    );
}

#[test]
fn links_carry_href_and_title() {
    let tree = parse_default(r#"[label](https://example.com/x "Title")"#);
    let a = first(&tree, "a");
    assert_eq!(a.property_str("href", ""), "https://example.com/x");
    assert_eq!(a.property_str("title", ""), "Title");
    assert_eq!(a.text_content(), "label");
}

#[test]
fn email_autolinks_get_mailto() {
    let tree = parse_default("<foo@bar.com>");
    assert_eq!(first(&tree, "a").property_str("href", ""), "mailto:foo@bar.com");

    let tree = parse_default("<https://example.com>");
    assert_eq!(first(&tree, "a").property_str("href", ""), "https://example.com");
}

#[test]
fn images_collect_alt_text() {
    let tree = parse_default("![an *alt* text](/img.png)");
    let img = first(&tree, "img");
    assert_eq!(img.property_str("src", ""), "/img.png");
    assert_eq!(img.property_str("alt", ""), "an alt text");
    assert!(img.children.is_empty());
}

#[test]
fn image_without_alt_has_empty_alt() {
    let tree = parse_default("![](/img.png)");
    assert_eq!(first(&tree, "img").property("alt"), Some(&PropertyValue::from("")));
}

#[test]
fn lists() {
    let tree = parse_default("- Item 1\n- Item 2");
    let ul = first(&tree, "ul");
    assert_eq!(ul.children.len(), 2);
    assert_eq!(ul.children[1].text_content(), "Item 2");

    let tree = parse_default("1. First\n2. Second");
    assert!(first(&tree, "ol").property("start").is_none());

    let tree = parse_default("3. Third\n4. Fourth");
    assert_eq!(
        first(&tree, "ol").property("start"),
        Some(&PropertyValue::Number(3.0))
    );
}

#[test]
fn fenced_code_gets_language_class() {
    let tree = parse_default("```rust\nfn main() {}\n```");
    let pre = first(&tree, "pre");
    let code = pre.children[0].as_element().unwrap();
    assert_eq!(code.tag_name, "code");
    assert_eq!(
        code.property("class"),
        Some(&PropertyValue::List(vec!["language-rust".into()]))
    );
    assert_eq!(code.text_content(), "fn main() {}\n");
}

#[test]
fn inline_code() {
    let tree = parse_default("use `cargo` here");
    assert_eq!(first(&tree, "code").text_content(), "cargo");
}

#[test]
fn tables_are_grouped() {
    let tree = parse_default("| a | b |\n|:--|--:|\n| 1 | 2 |\n| 3 | 4 |");
    let table = first(&tree, "table");
    let sections: Vec<_> = table
        .children
        .iter()
        .filter_map(Node::as_element)
        .map(|e| e.tag_name.as_str())
        .collect();
    assert_eq!(sections, ["thead", "tbody"]);

    let th = tree.find_all("th");
    assert_eq!(th.len(), 2);
    assert_eq!(th[0].property_str("align", ""), "left");
    assert_eq!(th[1].property_str("align", ""), "right");
    assert_eq!(tree.find_all("td").len(), 4);
    assert_eq!(first(&tree, "tbody").children.len(), 2);
}

#[test]
fn gfm_can_be_disabled() {
    let options = MarkdownOptions { gfm: false };
    let tree = parse("| a | b |\n|---|---|\n| 1 | 2 |\n\n~~gone~~", &options);
    assert!(tree.find_all("table").is_empty());
    assert!(tree.find_all("del").is_empty());

    let tree = parse_default("~~gone~~");
    assert_eq!(first(&tree, "del").text_content(), "gone");
}

#[test]
fn task_list_items_render_checkboxes() {
    let tree = parse_default("- [x] done\n- [ ] todo");
    let inputs = tree.find_all("input");
    assert_eq!(inputs.len(), 2);
    assert_eq!(inputs[0].property("checked"), Some(&PropertyValue::Bool(true)));
    assert!(inputs[1].property("checked").is_none());
    assert_eq!(inputs[1].property("disabled"), Some(&PropertyValue::Bool(true)));
}

#[test]
fn raw_html_is_kept_as_raw_nodes() {
    let tree = parse_default("hello <b>there</b>");
    let p = first(&tree, "p");
    assert!(
        p.children
            .iter()
            .any(|n| matches!(n, Node::Raw { value } if value == "<b>"))
    );

    let tree = parse_default("<div>\nblock\n</div>");
    assert!(matches!(tree.children().unwrap()[0], Node::Raw { .. }));
}

#[test]
fn breaks_and_rules() {
    let tree = parse_default("line one  \nline two\n\n---");
    assert_eq!(tree.find_all("br").len(), 1);
    assert_eq!(tree.find_all("hr").len(), 1);

    let tree = parse_default("soft\nbreak");
    assert_eq!(first(&tree, "p").children, vec![Node::text("soft\nbreak")]);
}

#[test]
fn blockquote_nests_block_content() {
    let tree = parse_default("> quoted [link](/x)");
    let quote = first(&tree, "blockquote");
    assert_eq!(quote.text_content(), "quoted link");
    assert_eq!(first(&tree, "a").property_str("href", ""), "/x");
}

#[test]
fn tree_serializes_to_tagged_json() {
    let tree = parse_default("[a](/b)");
    let json = serde_json::to_value(&tree).unwrap();
    assert_eq!(json["type"], "root");
    assert_eq!(json["children"][0]["tag_name"], "p");
    assert_eq!(json["children"][0]["children"][0]["properties"]["href"], "/b");

    let back: Node = serde_json::from_value(json).unwrap();
    assert_eq!(back, tree);
}

fn depth(node: &Node) -> usize {
    node.children()
        .map(|children| children.iter().map(depth).max().unwrap_or(0) + 1)
        .unwrap_or(0)
}

#[test]
fn nesting_is_capped() {
    let tree = parse_default(&format!("{}inner", ">".repeat(1_000)));
    // root + capped elements + text
    assert!(depth(&tree) <= MAX_NESTING + 2, "depth {}", depth(&tree));
    assert_eq!(tree.find_all("blockquote").len(), MAX_NESTING);
    assert_eq!(tree.text_content(), "inner");
}

#[test]
fn shallow_nesting_is_untouched() {
    let tree = parse_default(&format!("{}inner", "> ".repeat(10)));
    assert_eq!(tree.find_all("blockquote").len(), 10);
    assert_eq!(first(&tree, "p").text_content(), "inner");
}

#[test]
fn footnotes_render_under_gfm() {
    let tree = parse_default("Text[^1]\n\n[^1]: The note");
    let sups = tree.find_all("sup");
    assert_eq!(sups.len(), 2);
    assert_eq!(sups[0].text_content(), "[1]");
    let definition = first(&tree, "div");
    assert_eq!(
        definition.property("class"),
        Some(&PropertyValue::List(vec!["footnote-definition".into()]))
    );
    assert_eq!(definition.text_content(), "[1]The note");

    let tree = parse("Text[^1]\n\n[^1]: The note", &MarkdownOptions { gfm: false });
    assert!(tree.find_all("sup").is_empty());
}
