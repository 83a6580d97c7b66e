//! Results produced by rules and faults recorded by the host.

use serde::Serialize;

use crate::node::{NodeInfo, NodeView};
use crate::rules::{Priority, RuleMetadata, Severity};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    pub rule: String,
    pub priority: Priority,
    pub severity: Severity,
    pub message: String,
    pub suggestion: Option<String>,
    pub node: NodeInfo,
    pub file: Option<String>,
}

impl ScanResult {
    pub fn new(
        rule: impl Into<String>,
        priority: Priority,
        message: impl Into<String>,
        node: NodeView<'_>,
    ) -> Self {
        Self {
            rule: rule.into(),
            priority,
            severity: priority.severity(),
            message: message.into(),
            suggestion: None,
            node: node.info(),
            file: None,
        }
    }

    /// A result carrying the rule's own name, priority, message and
    /// suggestion.
    pub fn from_rule(metadata: &RuleMetadata, node: NodeView<'_>) -> Self {
        let mut result = Self::new(&metadata.name, metadata.priority, &metadata.message, node);
        result.suggestion = metadata.suggestion.clone();
        result
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self.severity = priority.severity();
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn line(&self) -> usize {
        self.node.start.line
    }

    pub fn column(&self) -> usize {
        self.node.start.column
    }
}

/// A rule hook that panicked while the host was evaluating a file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleFault {
    pub rule: String,
    pub file: String,
    pub message: String,
}
