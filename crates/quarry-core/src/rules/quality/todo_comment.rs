//! todo-comment: flags comments carrying TODO, FIXME or XXX markers.

use crate::declare_rule;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    TodoComment,
    name = "todo-comment",
    category = "quality",
    message = "Unresolved marker comment",
    priority = LOW,
    context = SCAN,
    language = Python,
    suggestion = "Resolve the comment or track it in an issue",
    query = "(comment) @target",
    regex = r"\b(TODO|FIXME|XXX)\b"
);

impl Rule for TodoComment {
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
        let text = node.text().trim_start_matches('#').trim();
        vec![
            ScanResult::from_rule(&self.metadata, node)
                .with_message(format!("Unresolved marker comment: {text}")),
        ]
    }
}
