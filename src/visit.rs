use crate::ast::Node;

/// What the walker does after a visitor callback returns.
#[derive(Debug)]
pub enum Visit {
    /// Descend into the node's children.
    Continue,
    /// Leave the node's subtree alone.
    Skip,
    /// Put this node in place of the visited one. The replacement is not visited.
    Replace(Node),
    /// Put zero or more nodes in place of the visited one. They are visited
    /// next, starting at the same index. A visitor that splices must not
    /// produce a node it would splice again.
    Splice(Vec<Node>),
}

/// Walk `node` and its descendants in document order (parent before
/// children, children in sequence), calling `visitor` once per node.
///
/// The top node has no parent: `Replace` swaps it in place and `Splice`
/// has nothing to splice into, so its children are walked as for `Continue`.
pub fn visit<F>(node: &mut Node, visitor: &mut F)
where
    F: FnMut(&mut Node) -> Visit,
{
    match visitor(node) {
        Visit::Continue | Visit::Splice(_) => visit_children(node, visitor),
        Visit::Skip => {}
        Visit::Replace(replacement) => *node = replacement,
    }
}

/// Walk the children of `node` (not `node` itself).
pub fn visit_children<F>(node: &mut Node, visitor: &mut F)
where
    F: FnMut(&mut Node) -> Visit,
{
    if let Some(children) = node.children_mut() {
        visit_nodes(children, visitor);
    }
}

/// Walk a sibling sequence, applying replacements by index.
pub fn visit_nodes<F>(nodes: &mut Vec<Node>, visitor: &mut F)
where
    F: FnMut(&mut Node) -> Visit,
{
    let mut index = 0;
    while index < nodes.len() {
        match visitor(&mut nodes[index]) {
            Visit::Continue => {
                visit_children(&mut nodes[index], visitor);
                index += 1;
            }
            Visit::Skip => index += 1,
            Visit::Replace(replacement) => {
                nodes[index] = replacement;
                index += 1;
            }
            Visit::Splice(replacement) => {
                nodes.splice(index..=index, replacement);
            }
        }
    }
}
