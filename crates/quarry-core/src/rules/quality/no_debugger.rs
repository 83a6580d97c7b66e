//! no-debugger: flags `debugger` statements left in TypeScript.

use crate::declare_rule;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    NoDebugger,
    name = "no-debugger",
    category = "quality",
    message = "Unexpected 'debugger' statement",
    priority = HIGH,
    context = SCAN,
    language = TypeScript,
    suggestion = "Remove the debugger statement",
    query = "(debugger_statement) @target"
);

impl Rule for NoDebugger {
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
