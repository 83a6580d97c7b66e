//! definition-counts: tallies function and class definitions.

use crate::aggregate::{NodeGroups, aggregate};
use crate::declare_rule;
use crate::node::NodeView;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    DefinitionCounts,
    name = "definition-counts",
    category = "metrics",
    message = "Function and class definitions",
    priority = LOW,
    context = MEASURE,
    language = Python,
    query = "[(function_definition) (class_definition)] @target"
);

impl Rule for DefinitionCounts {
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
