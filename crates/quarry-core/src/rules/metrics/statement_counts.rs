//! statement-counts: tallies control-flow statements by kind.

use crate::aggregate::{NodeGroups, aggregate};
use crate::declare_rule;
use crate::node::NodeView;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    StatementCounts,
    name = "statement-counts",
    category = "metrics",
    message = "Control-flow statements by kind",
    priority = LOW,
    context = MEASURE,
    language = Python,
    query = "[(if_statement) (for_statement) (while_statement) (try_statement) (with_statement) (return_statement)] @target"
);

impl Rule for StatementCounts {
    fn metadata(&self) -> &RuleMetadata {
        &self.metadata
    }

    fn configuration(&self) -> &RuleConfiguration {
        &self.configuration
    }

    fn configuration_mut(&mut self) -> &mut RuleConfiguration {
        &mut self.configuration
    }

    fn measure_nodes<'tree>(&self, nodes: &[NodeView<'tree>]) -> NodeGroups<NodeView<'tree>> {
        aggregate(nodes)
    }
}
