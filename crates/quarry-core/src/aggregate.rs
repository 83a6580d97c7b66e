//! Grouping of nodes by grammar type for measurement rules.

use indexmap::IndexMap;
use indexmap::map::{Iter, Keys};

use crate::node::SyntaxNode;

/// Nodes grouped by grammar type.
///
/// Keys keep the order in which each grammar type was first seen and every
/// group keeps its nodes in input order, so both counts and drill-down into
/// individual nodes are available.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeGroups<N> {
    groups: IndexMap<String, Vec<N>>,
}

impl<N> Default for NodeGroups<N> {
    fn default() -> Self {
        Self {
            groups: IndexMap::new(),
        }
    }
}

impl<N: SyntaxNode> NodeGroups<N> {
    pub fn push(&mut self, node: N) {
        match self.groups.get_mut(node.grammar_type()) {
            Some(group) => group.push(node),
            None => {
                self.groups.insert(node.grammar_type().to_string(), vec![node]);
            }
        }
    }
}

impl<N> NodeGroups<N> {
    pub fn get(&self, grammar_type: &str) -> Option<&[N]> {
        self.groups.get(grammar_type).map(Vec::as_slice)
    }

    pub fn count(&self, grammar_type: &str) -> usize {
        self.groups.get(grammar_type).map_or(0, Vec::len)
    }

    pub fn counts(&self) -> IndexMap<String, usize> {
        self.groups
            .iter()
            .map(|(kind, nodes)| (kind.clone(), nodes.len()))
            .collect()
    }

    /// Total number of nodes across all groups.
    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    /// Number of distinct grammar types.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn keys(&self) -> Keys<'_, String, Vec<N>> {
        self.groups.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Vec<N>> {
        self.groups.iter()
    }

    pub fn map_nodes<M>(self, mut f: impl FnMut(N) -> M) -> NodeGroups<M> {
        NodeGroups {
            groups: self
                .groups
                .into_iter()
                .map(|(kind, nodes)| (kind, nodes.into_iter().map(&mut f).collect()))
                .collect(),
        }
    }
}

impl<N: SyntaxNode> FromIterator<N> for NodeGroups<N> {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        let mut groups = Self::default();
        for node in iter {
            groups.push(node);
        }
        groups
    }
}

impl<'a, N> IntoIterator for &'a NodeGroups<N> {
    type Item = (&'a String, &'a Vec<N>);
    type IntoIter = Iter<'a, String, Vec<N>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.iter()
    }
}

/// Groups `nodes` by grammar type, first-seen key order.
pub fn aggregate<N: SyntaxNode>(nodes: &[N]) -> NodeGroups<N> {
    nodes.iter().copied().collect()
}
