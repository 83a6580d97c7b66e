//! Rules defined by configuration rather than code.

use crate::aggregate::{NodeGroups, aggregate};
use crate::config::CustomRuleConfig;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleContext, RuleMetadata};

/// A rule whose behaviour is entirely its query (or regex): every resolved
/// node is reported in scan mode and grouped by grammar type in measure
/// mode.
pub struct QueryRule {
    metadata: RuleMetadata,
    configuration: RuleConfiguration,
}

impl QueryRule {
    pub fn new(metadata: RuleMetadata) -> Self {
        Self {
            metadata,
            configuration: RuleConfiguration::default(),
        }
    }

    pub fn from_config(config: &CustomRuleConfig) -> Self {
        let mut metadata = RuleMetadata::new(&config.name)
            .with_category(&config.category)
            .with_message(&config.message)
            .with_priority(config.priority)
            .with_context(RuleContext::parse(&config.context))
            .with_language(config.language);
        metadata.suggestion = config.suggestion.clone();
        metadata.query = config.query.clone();
        metadata.regex = config.regex.clone();
        Self::new(metadata)
    }
}

impl Rule for QueryRule {
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

    fn measure_nodes<'tree>(&self, nodes: &[NodeView<'tree>]) -> NodeGroups<NodeView<'tree>> {
        aggregate(nodes)
    }
}
