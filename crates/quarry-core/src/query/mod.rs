//! Compiled structural queries and their raw output.
//!
//! A [`CompiledQuery`] turns a root node into matches and captures; the
//! [`resolve`] module narrows that output down to the nodes a rule asked
//! for. [`RuleQuery`] is the tree-sitter backed implementation.

pub mod resolve;

pub use resolve::{resolve, select_captures, select_matches};

use streaming_iterator::StreamingIterator;
use tree_sitter::QueryCursor;

use crate::language::SupportedLanguage;
use crate::node::NodeView;

/// Capture name used when a rule does not name one.
pub const DEFAULT_CAPTURE: &str = "target";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capture<'q, N> {
    pub name: &'q str,
    pub node: N,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatch<'q, N> {
    pub pattern_index: usize,
    pub captures: Vec<Capture<'q, N>>,
}

/// Which pattern alternatives of a query to read captures from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PatternSelector {
    /// Ignore match boundaries and read the flat capture list.
    #[default]
    AllPatterns,
    /// Only captures of matches produced by this zero-based pattern.
    Pattern(usize),
}

pub trait CompiledQuery<N> {
    fn pattern_count(&self) -> usize;

    fn declares_capture(&self, name: &str) -> bool;

    /// Every match, in engine order.
    fn matches(&self, root: N) -> Vec<QueryMatch<'_, N>>;

    /// Every capture across all matches, in engine order.
    fn captures(&self, root: N) -> Vec<Capture<'_, N>>;
}

#[derive(Debug, thiserror::Error)]
#[error("invalid {language} query: {source}")]
pub struct QueryError {
    pub language: SupportedLanguage,
    #[source]
    pub source: tree_sitter::QueryError,
}

/// A tree-sitter query compiled for one language.
#[derive(Debug)]
pub struct RuleQuery {
    query: tree_sitter::Query,
    language: SupportedLanguage,
}

impl RuleQuery {
    pub fn new(language: SupportedLanguage, source: &str) -> Result<Self, QueryError> {
        let query = tree_sitter::Query::new(&language.grammar(), source)
            .map_err(|source| QueryError { language, source })?;
        Ok(Self { query, language })
    }

    pub fn language(&self) -> SupportedLanguage {
        self.language
    }

    pub fn capture_names(&self) -> &[&str] {
        self.query.capture_names()
    }
}

impl<'tree> CompiledQuery<NodeView<'tree>> for RuleQuery {
    fn pattern_count(&self) -> usize {
        self.query.pattern_count()
    }

    fn declares_capture(&self, name: &str) -> bool {
        self.capture_names().iter().any(|n| *n == name)
    }

    fn matches(&self, root: NodeView<'tree>) -> Vec<QueryMatch<'_, NodeView<'tree>>> {
        let names = self.query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut matches = cursor.matches(&self.query, root.raw(), root.source().as_bytes());

        let mut out = Vec::new();
        while let Some(m) = matches.next() {
            out.push(QueryMatch {
                pattern_index: m.pattern_index,
                captures: m
                    .captures
                    .iter()
                    .map(|c| Capture {
                        name: names[c.index as usize],
                        node: root.with_node(c.node),
                    })
                    .collect(),
            });
        }
        out
    }

    fn captures(&self, root: NodeView<'tree>) -> Vec<Capture<'_, NodeView<'tree>>> {
        let names = self.query.capture_names();
        let mut cursor = QueryCursor::new();
        let mut captures = cursor.captures(&self.query, root.raw(), root.source().as_bytes());

        let mut out = Vec::new();
        while let Some((m, index)) = captures.next() {
            let capture = &m.captures[*index];
            out.push(Capture {
                name: names[capture.index as usize],
                node: root.with_node(capture.node),
            });
        }
        out
    }
}
