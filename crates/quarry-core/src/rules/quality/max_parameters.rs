//! max-parameters: flags functions taking more parameters than allowed.
//!
//! The limit is read from the `max` option and defaults to 5.

use crate::declare_rule;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

const DEFAULT_MAX_PARAMETERS: usize = 5;

/// Separators and comments inside a parameter list that are not parameters.
const NON_PARAMETER_KINDS: &[&str] = &["comment", "keyword_separator", "positional_separator"];

declare_rule!(
    MaxParameters,
    name = "max-parameters",
    category = "quality",
    message = "Function has too many parameters",
    priority = LOW,
    context = SCAN,
    language = Python,
    suggestion = "Group related parameters into an object",
    query = "(function_definition parameters: (parameters) @target)"
);

impl MaxParameters {
    fn max_parameters(&self) -> usize {
        self.configuration
            .parse("max")
            .unwrap_or(DEFAULT_MAX_PARAMETERS)
    }
}

fn count_parameters(parameters: NodeView<'_>) -> usize {
    parameters
        .named_children()
        .iter()
        .filter(|child| !NON_PARAMETER_KINDS.contains(&child.kind()))
        .count()
}

impl Rule for MaxParameters {
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
        let count = count_parameters(node);
        let max = self.max_parameters();
        if count <= max {
            return Vec::new();
        }

        let function = node
            .parent()
            .and_then(|parent| parent.child_by_field_name("name"))
            .map_or("<anonymous>", |name| name.text());

        vec![
            ScanResult::from_rule(&self.metadata, node).with_message(format!(
                "Function '{function}' has {count} parameters (max {max})"
            )),
        ]
    }
}
