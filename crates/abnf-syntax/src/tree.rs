use std::fmt;

use crate::kind::SyntaxKind;
use crate::span::{Point, Span};

/// Index of a node inside its [`SyntaxTree`].
///
/// Ids are only meaningful for the tree that produced them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: SyntaxKind,
    span: Span,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable concrete syntax tree together with the text it was parsed from.
#[derive(Clone)]
pub struct SyntaxTree {
    source: String,
    nodes: Vec<NodeData>,
    /// Byte offset of the start of each row.
    line_starts: Vec<usize>,
}

impl SyntaxTree {
    pub fn root_node(&self) -> SyntaxNode<'_> {
        SyntaxNode {
            tree: self,
            id: NodeId(0),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Get a handle to a node by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this tree.
    pub fn node(&self, id: NodeId) -> SyntaxNode<'_> {
        assert!(id.index() < self.nodes.len(), "node id out of range");
        SyntaxNode { tree: self, id }
    }

    /// Convert a byte offset to a row/column point. Offsets past the end clamp.
    pub fn point_for_byte(&self, offset: usize) -> Point {
        let offset = offset.min(self.source.len());
        let row = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        Point::new(row, offset - self.line_starts[row])
    }

    /// Convert a row/column point back to a byte offset.
    ///
    /// Returns `None` when the row does not exist; a column past the end of
    /// its row clamps to the row's end (before the line break).
    pub fn byte_for_point(&self, point: Point) -> Option<usize> {
        let start = *self.line_starts.get(point.row)?;
        let end = match self.line_starts.get(point.row + 1) {
            Some(&next) => start + self.source[start..next].trim_end_matches(['\r', '\n']).len(),
            None => self.source.len(),
        };
        Some(start.saturating_add(point.column).min(end))
    }

    fn data(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }
}

impl fmt::Debug for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyntaxTree")
            .field("root", &self.root_node().to_sexp())
            .finish()
    }
}

/// A cheap, copyable handle to a node in a [`SyntaxTree`].
#[derive(Clone, Copy)]
pub struct SyntaxNode<'tree> {
    tree: &'tree SyntaxTree,
    id: NodeId,
}

impl<'tree> SyntaxNode<'tree> {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn tree(&self) -> &'tree SyntaxTree {
        self.tree
    }

    pub fn kind(&self) -> SyntaxKind {
        self.tree.data(self.id).kind
    }

    pub fn span(&self) -> Span {
        self.tree.data(self.id).span
    }

    pub fn start_byte(&self) -> usize {
        self.span().start
    }

    pub fn end_byte(&self) -> usize {
        self.span().end
    }

    pub fn start_position(&self) -> Point {
        self.tree.point_for_byte(self.start_byte())
    }

    pub fn end_position(&self) -> Point {
        self.tree.point_for_byte(self.end_byte())
    }

    /// The source text covered by this node.
    pub fn text(&self) -> &'tree str {
        let span = self.span();
        &self.tree.source[span.start..span.end]
    }

    pub fn parent(&self) -> Option<SyntaxNode<'tree>> {
        let tree = self.tree;
        tree.data(self.id)
            .parent
            .map(|id| SyntaxNode { tree, id })
    }

    pub fn child_count(&self) -> usize {
        self.tree.data(self.id).children.len()
    }

    pub fn child(&self, index: usize) -> Option<SyntaxNode<'tree>> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .get(index)
            .map(|&id| SyntaxNode { tree, id })
    }

    /// Children in source order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = SyntaxNode<'tree>> + use<'tree> {
        let tree = self.tree;
        tree.data(self.id)
            .children
            .iter()
            .map(move |&id| SyntaxNode { tree, id })
    }

    pub fn is_named(&self) -> bool {
        self.kind().is_named()
    }

    pub fn is_error(&self) -> bool {
        self.kind() == SyntaxKind::Error
    }

    /// Whether this node or any descendant is an `ERROR` node or an unlexable token.
    pub fn has_error(&self) -> bool {
        self.is_error()
            || self.kind() == SyntaxKind::Unknown
            || self.children().any(|child| child.has_error())
    }

    /// Render the named nodes of this subtree as an S-expression.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind().as_str());
        for child in self.children().filter(|child| child.is_named()) {
            out.push(' ');
            child.write_sexp(out);
        }
        out.push(')');
    }
}

impl PartialEq for SyntaxNode<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.id == other.id
    }
}

impl Eq for SyntaxNode<'_> {}

impl fmt::Debug for SyntaxNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = self.span();
        write!(f, "{}@{}..{}", self.kind(), span.start, span.end)
    }
}

/// Assembles a [`SyntaxTree`] from a pre-order stream of node starts, tokens and finishes.
pub(crate) struct TreeBuilder {
    source: String,
    nodes: Vec<NodeData>,
    stack: Vec<NodeId>,
    last_end: usize,
}

impl TreeBuilder {
    pub(crate) fn new(source: &str) -> Self {
        Self {
            source: source.to_owned(),
            nodes: Vec::new(),
            stack: Vec::new(),
            last_end: 0,
        }
    }

    fn push(&mut self, kind: SyntaxKind, span: Span) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let parent = self.stack.last().copied();
        self.nodes.push(NodeData {
            kind,
            span,
            parent,
            children: Vec::new(),
        });
        if let Some(parent) = parent {
            self.nodes[parent.index()].children.push(id);
        }
        id
    }

    pub(crate) fn start_node(&mut self, kind: SyntaxKind) {
        let id = self.push(kind, Span::empty(self.last_end));
        self.stack.push(id);
    }

    pub(crate) fn token(&mut self, kind: SyntaxKind, span: Span) {
        self.push(kind, span);
        self.last_end = span.end;
    }

    pub(crate) fn finish_node(&mut self) {
        let Some(id) = self.stack.pop() else {
            debug_assert!(false, "finish_node without a matching start_node");
            return;
        };
        let children = &self.nodes[id.index()].children;
        let span = match (children.first(), children.last()) {
            (Some(first), Some(last)) => Span::new(
                self.nodes[first.index()].span.start,
                self.nodes[last.index()].span.end,
            ),
            _ => Span::empty(self.last_end),
        };
        self.nodes[id.index()].span = span;
    }

    pub(crate) fn finish(mut self) -> SyntaxTree {
        debug_assert!(self.stack.is_empty(), "unbalanced tree events");
        if self.nodes.is_empty() {
            self.push(SyntaxKind::SourceFile, Span::default());
        }
        // The root always covers the whole document, trailing trivia included.
        self.nodes[0].span = Span::new(0, self.source.len());

        // CRLF, LF and a lone CR each end a line.
        let bytes = self.source.as_bytes();
        let mut line_starts = vec![0];
        line_starts.extend(bytes.iter().enumerate().filter_map(|(i, &b)| {
            let ends_line = b == b'\n' || (b == b'\r' && bytes.get(i + 1) != Some(&b'\n'));
            ends_line.then_some(i + 1)
        }));

        SyntaxTree {
            source: self.source,
            nodes: self.nodes,
            line_starts,
        }
    }
}
