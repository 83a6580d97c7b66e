//! Source parsing into concrete syntax trees.
//!
//! The engine never reads files itself: callers hand over the source text
//! and a filename, and get back a [`ParsedFile`] whose root node view feeds
//! every rule.

use std::path::Path;

use crate::language::SupportedLanguage;
use crate::node::{NodeView, Position};

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("could not determine language for '{filename}'")]
    UnknownLanguage { filename: String },
    #[error("failed to load {language} grammar: {message}")]
    Grammar {
        language: SupportedLanguage,
        message: String,
    },
    #[error("{language} parser produced no tree for '{filename}'")]
    NoTree {
        language: SupportedLanguage,
        filename: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileMetadata {
    pub filename: String,
    pub language: SupportedLanguage,
}

/// A syntax error or missing token reported by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxErrorInfo {
    pub message: String,
    pub start: Position,
}

#[derive(Debug)]
pub struct ParsedFile {
    metadata: FileMetadata,
    source: String,
    tree: tree_sitter::Tree,
}

impl ParsedFile {
    /// Parses `source`, picking the grammar from the filename's extension.
    pub fn from_source(filename: &str, source: &str) -> Result<Self, ParseError> {
        let language = SupportedLanguage::from_path(Path::new(filename)).ok_or_else(|| {
            ParseError::UnknownLanguage {
                filename: filename.to_string(),
            }
        })?;
        Self::parse(filename, source, language)
    }

    pub fn parse(
        filename: &str,
        source: &str,
        language: SupportedLanguage,
    ) -> Result<Self, ParseError> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&language.grammar())
            .map_err(|e| ParseError::Grammar {
                language,
                message: e.to_string(),
            })?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| ParseError::NoTree {
                language,
                filename: filename.to_string(),
            })?;

        Ok(Self {
            metadata: FileMetadata {
                filename: filename.to_string(),
                language,
            },
            source: source.to_string(),
            tree,
        })
    }

    pub fn metadata(&self) -> &FileMetadata {
        &self.metadata
    }

    pub fn language(&self) -> SupportedLanguage {
        self.metadata.language
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> NodeView<'_> {
        NodeView::new(self.tree.root_node(), &self.source)
    }

    pub fn has_errors(&self) -> bool {
        self.tree.root_node().has_error()
    }

    pub fn errors(&self) -> Vec<SyntaxErrorInfo> {
        let mut errors = Vec::new();
        let mut stack = vec![self.root()];
        while let Some(node) = stack.pop() {
            let raw = node.raw();
            if raw.is_error() {
                errors.push(SyntaxErrorInfo {
                    message: "syntax error".to_string(),
                    start: node.start(),
                });
            } else if raw.is_missing() {
                errors.push(SyntaxErrorInfo {
                    message: format!("missing {}", node.kind()),
                    start: node.start(),
                });
            }
            if raw.has_error() {
                stack.extend(node.children().into_iter().rev());
            }
        }
        errors
    }
}
