//! duplicate-import: flags modules imported more than once in a file.

use std::collections::HashSet;

use crate::declare_rule;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    DuplicateImport,
    name = "duplicate-import",
    category = "quality",
    message = "Module is imported more than once",
    priority = MEDIUM,
    context = SCAN,
    language = Python,
    suggestion = "Remove the repeated import",
    query = "(import_statement name: (dotted_name) @target)"
);

impl Rule for DuplicateImport {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn configuration(&self) -> &RuleConfiguration {
        &self.configuration
    }

    fn configuration_mut(&mut self) -> &mut RuleConfiguration {
        &mut self.configuration
    }

    fn validate_nodes(&self, nodes: &[NodeView<'_>]) -> Vec<ScanResult> {
        let mut seen = HashSet::new();
        nodes
            .iter()
            .filter(|node| !seen.insert(node.text()))
            .map(|node| {
                ScanResult::from_rule(&self.metadata, *node)
                    .with_message(format!("'{}' is imported more than once", node.text()))
            })
            .collect()
    }
}
