//! singleton-comparison: flags `==`/`!=` comparisons against `None`,
//! `True` or `False`.
//!
//! The query has one pattern for `None` and one for the booleans. Setting
//! `ignore-booleans = true` drops the second pattern.

use crate::declare_rule;
use crate::node::NodeView;
use crate::query::{CompiledQuery, PatternSelector, resolve};
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

const NONE_PATTERN: usize = 0;
const BOOLEAN_PATTERN: usize = 1;

declare_rule!(
    SingletonComparison,
    name = "singleton-comparison",
    category = "quality",
    message = "Comparison to a singleton should use 'is'",
    priority = MEDIUM,
    context = SCAN,
    language = Python,
    query = "(comparison_operator (none) @target)
(comparison_operator [(true) (false)] @target)"
);

impl SingletonComparison {
    fn ignores_booleans(&self) -> bool {
        self.configuration_value("ignore-booleans") == "true"
    }
}

/// The equality operator next to `node`, if any.
fn equality_operator(node: NodeView<'_>) -> Option<&'static str> {
    [node.prev_sibling(), node.next_sibling()]
        .into_iter()
        .flatten()
        .map(|sibling| sibling.kind())
        .find(|kind| matches!(*kind, "==" | "!="))
}

impl Rule for SingletonComparison {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn configuration(&self) -> &RuleConfiguration {
        &self.configuration
    }

    fn configuration_mut(&mut self) -> &mut RuleConfiguration {
        &mut self.configuration
    }

    fn validate_query<'tree>(
        &self,
        query: &dyn CompiledQuery<NodeView<'tree>>,
        root: NodeView<'tree>,
        capture: Option<&str>,
        _selector: PatternSelector,
    ) -> Vec<NodeView<'tree>> {
        let mut nodes = resolve(query, root, capture, PatternSelector::Pattern(NONE_PATTERN));
        if !self.ignores_booleans() {
            nodes.extend(resolve(
                query,
                root,
                capture,
                PatternSelector::Pattern(BOOLEAN_PATTERN),
            ));
        }
        nodes
    }

    fn validate_node(&self, node: NodeView<'_>) -> Vec<ScanResult> {
        let Some(operator) = equality_operator(node) else {
            return Vec::new();
        };
        let replacement = if operator == "==" { "is" } else { "is not" };

        vec![
            ScanResult::from_rule(&self.metadata, node)
                .with_message(format!(
                    "Comparison to {} should use '{replacement}'",
                    node.text()
                ))
                .with_suggestion(format!("Replace '{operator}' with '{replacement}'")),
        ]
    }
}
