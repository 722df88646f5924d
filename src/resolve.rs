//! Mapping a cursor location to the syntax node under it.

use abnf_syntax::{Point, SyntaxNode, SyntaxTree};

/// The most specific node whose span contains `offset`.
///
/// Spans are end-exclusive, so a cursor right after a name does not land on
/// it. Offsets outside the root, including the end of the document, give
/// `None`.
pub fn node_at(tree: &SyntaxTree, offset: usize) -> Option<SyntaxNode<'_>> {
    let mut node = tree.root_node();
    if !node.span().contains(offset) {
        return None;
    }

    'descend: loop {
        for child in node.children() {
            if child.span().contains(offset) {
                node = child;
                continue 'descend;
            }
        }
        return Some(node);
    }
}

/// Normalize a covering node to the name node it belongs to.
///
/// A name node is used as-is and a token directly inside one is promoted to
/// it. Anything else is not an identifier target.
pub fn target_node(node: SyntaxNode<'_>) -> Option<SyntaxNode<'_>> {
    if node.kind().is_name() {
        return Some(node);
    }
    node.parent().filter(|parent| parent.kind().is_name())
}

pub fn target_at(tree: &SyntaxTree, offset: usize) -> Option<SyntaxNode<'_>> {
    node_at(tree, offset).and_then(target_node)
}

pub fn target_at_point(tree: &SyntaxTree, point: Point) -> Option<SyntaxNode<'_>> {
    tree.byte_for_point(point)
        .and_then(|offset| target_at(tree, offset))
}
