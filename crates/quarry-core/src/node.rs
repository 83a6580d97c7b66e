//! Read-only views over syntax tree nodes.
//!
//! [`NodeView`] is what rules see: a tree-sitter node paired with the source
//! it was parsed from, so text is always at hand. [`NodeInfo`] is the owned
//! snapshot stored in results that outlive the tree.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// Anything carrying a grammar type tag.
pub trait SyntaxNode: Copy {
    fn grammar_type(&self) -> &str;
}

/// One-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl From<tree_sitter::Point> for Position {
    fn from(point: tree_sitter::Point) -> Self {
        Self {
            line: point.row + 1,
            column: point.column + 1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeView<'tree> {
    node: tree_sitter::Node<'tree>,
    source: &'tree str,
}

impl<'tree> NodeView<'tree> {
    pub fn new(node: tree_sitter::Node<'tree>, source: &'tree str) -> Self {
        Self { node, source }
    }

    /// Wraps another node of the same tree.
    pub fn with_node(&self, node: tree_sitter::Node<'tree>) -> Self {
        Self::new(node, self.source)
    }

    pub fn raw(&self) -> tree_sitter::Node<'tree> {
        self.node
    }

    pub fn source(&self) -> &'tree str {
        self.source
    }

    pub fn kind(&self) -> &'static str {
        self.node.kind()
    }

    pub fn is_named(&self) -> bool {
        self.node.is_named()
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.node.byte_range()
    }

    pub fn start(&self) -> Position {
        self.node.start_position().into()
    }

    pub fn end(&self) -> Position {
        self.node.end_position().into()
    }

    pub fn text(&self) -> &'tree str {
        self.source.get(self.node.byte_range()).unwrap_or_default()
    }

    pub fn children(&self) -> Vec<NodeView<'tree>> {
        let mut cursor = self.node.walk();
        self.node
            .children(&mut cursor)
            .map(|child| self.with_node(child))
            .collect()
    }

    pub fn named_children(&self) -> Vec<NodeView<'tree>> {
        let mut cursor = self.node.walk();
        self.node
            .named_children(&mut cursor)
            .map(|child| self.with_node(child))
            .collect()
    }

    pub fn child_by_field_name(&self, field: &str) -> Option<NodeView<'tree>> {
        self.node
            .child_by_field_name(field)
            .map(|child| self.with_node(child))
    }

    pub fn parent(&self) -> Option<NodeView<'tree>> {
        self.node.parent().map(|node| self.with_node(node))
    }

    pub fn prev_sibling(&self) -> Option<NodeView<'tree>> {
        self.node.prev_sibling().map(|node| self.with_node(node))
    }

    pub fn next_sibling(&self) -> Option<NodeView<'tree>> {
        self.node.next_sibling().map(|node| self.with_node(node))
    }

    /// Named descendants in pre-order, excluding `self`.
    pub fn named_descendants(&self) -> Vec<NodeView<'tree>> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeView<'tree>> = self.named_children().into_iter().rev().collect();
        while let Some(node) = stack.pop() {
            out.push(node);
            stack.extend(node.named_children().into_iter().rev());
        }
        out
    }

    pub fn info(&self) -> NodeInfo {
        NodeInfo::from(*self)
    }
}

impl SyntaxNode for NodeView<'_> {
    fn grammar_type(&self) -> &str {
        self.kind()
    }
}

impl fmt::Debug for NodeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let start = self.start();
        write!(
            f,
            "{} [{}:{}] {:?}",
            self.kind(),
            start.line,
            start.column,
            self.text()
        )
    }
}

/// Owned snapshot of a node's location and text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeInfo {
    pub kind: String,
    pub byte_range: Range<usize>,
    pub start: Position,
    pub end: Position,
    pub text: String,
}

impl From<NodeView<'_>> for NodeInfo {
    fn from(node: NodeView<'_>) -> Self {
        Self {
            kind: node.kind().to_string(),
            byte_range: node.byte_range(),
            start: node.start(),
            end: node.end(),
            text: node.text().to_string(),
        }
    }
}

impl SyntaxNode for &NodeInfo {
    fn grammar_type(&self) -> &str {
        &self.kind
    }
}
