//! no-print: flags calls to the builtin `print`.

use crate::declare_rule;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    NoPrint,
    name = "no-print",
    category = "quality",
    message = "Avoid print() in production code",
    priority = MEDIUM,
    context = SCAN,
    language = Python,
    suggestion = "Use the logging module instead",
    query = r#"((call function: (identifier) @target) (#eq? @target "print"))"#
);

impl Rule for NoPrint {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn configuration(&self) -> &RuleConfiguration {
        &self.configuration
    }

    fn configuration_mut(&mut self) -> &mut RuleConfiguration {
        &mut self.configuration
    }

    fn validate_node(&self, node: NodeView<'_>) -> Vec<ScanResult> {
        vec![ScanResult::from_rule(&self.metadata, node)]
    }
}
