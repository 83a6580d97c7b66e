//! Drives rules through their lifecycle against parsed files.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;
use regex::Regex;
use serde::Serialize;

use crate::aggregate::NodeGroups;
use crate::config::Config;
use crate::node::NodeView;
use crate::parser::ParsedFile;
use crate::query::{PatternSelector, QueryError, RuleQuery};
use crate::result::{RuleFault, ScanResult};
use crate::rules::{Rule, RuleRegistry};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("rule '{rule}': {source}")]
    Query {
        rule: String,
        #[source]
        source: QueryError,
    },
    #[error("rule '{rule}' has an invalid regex: {source}")]
    Regex {
        rule: String,
        #[source]
        source: regex::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanReport {
    pub file: String,
    pub results: Vec<ScanResult>,
    pub faults: Vec<RuleFault>,
}

#[derive(Debug)]
pub struct RuleMeasurement<'tree> {
    pub rule: String,
    pub groups: NodeGroups<NodeView<'tree>>,
}

#[derive(Debug)]
pub struct MeasureReport<'tree> {
    pub file: String,
    pub measurements: Vec<RuleMeasurement<'tree>>,
    pub faults: Vec<RuleFault>,
}

impl<'tree> MeasureReport<'tree> {
    pub fn get(&self, rule: &str) -> Option<&NodeGroups<NodeView<'tree>>> {
        self.measurements
            .iter()
            .find(|m| m.rule == rule)
            .map(|m| &m.groups)
    }
}

/// Queries and regex of one enabled rule, compiled once up front.
///
/// A query is compiled for every dialect the rule's language covers, so a
/// TypeScript rule also runs against `.tsx` files.
struct CompiledRule {
    queries: Vec<RuleQuery>,
    regex: Option<Regex>,
}

impl CompiledRule {
    fn compile(rule: &dyn Rule) -> Result<Self, EngineError> {
        let metadata = rule.metadata();
        let queries = match metadata.query.as_deref() {
            Some(source) => metadata
                .language
                .dialects()
                .iter()
                .map(|&dialect| RuleQuery::new(dialect, source))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|source| EngineError::Query {
                    rule: metadata.name.clone(),
                    source,
                })?,
            None => Vec::new(),
        };
        let regex = metadata
            .regex
            .as_deref()
            .map(Regex::new)
            .transpose()
            .map_err(|source| EngineError::Regex {
                rule: metadata.name.clone(),
                source,
            })?;
        Ok(Self { queries, regex })
    }

    fn query_for(&self, file: &ParsedFile) -> Option<&RuleQuery> {
        self.queries
            .iter()
            .find(|query| query.language() == file.language())
    }
}

pub struct Engine {
    registry: RuleRegistry,
    compiled: Vec<CompiledRule>,
}

impl Engine {
    pub fn new(registry: RuleRegistry) -> Result<Self, EngineError> {
        let compiled = registry
            .enabled_rules()
            .map(CompiledRule::compile)
            .collect::<Result<Vec<_>, _>>()?;
        tracing::debug!(rules = compiled.len(), "compiled enabled rules");
        Ok(Self { registry, compiled })
    }

    /// Builtin rules configured from `config`.
    pub fn with_config(config: &Config) -> Result<Self, EngineError> {
        let mut registry = RuleRegistry::with_builtin_rules();
        registry.configure(&config.rules);
        Self::new(registry)
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    fn active_rules(&self) -> impl Iterator<Item = (&dyn Rule, &CompiledRule)> {
        self.registry.enabled_rules().zip(&self.compiled)
    }

    pub fn scan(&self, file: &ParsedFile) -> ScanReport {
        let filename = &file.metadata().filename;
        let _span = tracing::debug_span!("scan", file = %filename).entered();

        let mut results = Vec::new();
        let mut faults = Vec::new();

        for (rule, compiled) in self.active_rules() {
            let metadata = rule.metadata();
            if !metadata.context.scan || !metadata.language.covers(file.language()) {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let nodes = candidates(rule, compiled, file);
                tracing::debug!(rule = %metadata.name, nodes = nodes.len(), "resolved nodes");
                let mut found = rule.validate_nodes(&nodes);
                for node in &nodes {
                    found.extend(rule.validate_node(*node));
                }
                found
            }));

            match outcome {
                Ok(found) => {
                    let priority = self.registry.priority_override(&metadata.name);
                    results.extend(found.into_iter().map(|mut result| {
                        if let Some(priority) = priority {
                            result = result.with_priority(priority);
                        }
                        if result.file.is_none() {
                            result.file = Some(filename.clone());
                        }
                        result
                    }));
                }
                Err(payload) => faults.push(fault(&metadata.name, filename, payload)),
            }
        }

        ScanReport {
            file: filename.clone(),
            results,
            faults,
        }
    }

    pub fn measure<'tree>(&self, file: &'tree ParsedFile) -> MeasureReport<'tree> {
        let filename = &file.metadata().filename;
        let _span = tracing::debug_span!("measure", file = %filename).entered();

        let mut measurements = Vec::new();
        let mut faults = Vec::new();

        for (rule, compiled) in self.active_rules() {
            let metadata = rule.metadata();
            if !metadata.context.measure || !metadata.language.covers(file.language()) {
                continue;
            }

            let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
                let nodes = candidates(rule, compiled, file);
                rule.measure_nodes(&nodes)
            }));

            match outcome {
                Ok(groups) => measurements.push(RuleMeasurement {
                    rule: metadata.name.clone(),
                    groups,
                }),
                Err(payload) => faults.push(fault(&metadata.name, filename, payload)),
            }
        }

        MeasureReport {
            file: filename.clone(),
            measurements,
            faults,
        }
    }

    /// Scans independent files in parallel; reports keep input order.
    pub fn scan_batch(&self, files: &[ParsedFile]) -> Vec<ScanReport> {
        files.par_iter().map(|file| self.scan(file)).collect()
    }
}

/// Runs the root hooks and resolves the nodes the node-consuming hooks get.
fn candidates<'tree>(
    rule: &dyn Rule,
    compiled: &CompiledRule,
    file: &'tree ParsedFile,
) -> Vec<NodeView<'tree>> {
    let root = rule.pre_filter(file.root());
    let root = rule.validate_root(root);

    match (compiled.query_for(file), &compiled.regex) {
        (Some(query), regex) => {
            let mut nodes = rule.validate_query(query, root, None, PatternSelector::AllPatterns);
            if let Some(regex) = regex {
                nodes.retain(|node| regex.is_match(node.text()));
            }
            nodes
        }
        (None, Some(regex)) => innermost_matches(root, regex),
        (None, None) => vec![root],
    }
}

/// Smallest named nodes whose text matches, in source order.
///
/// The stack only ever holds nodes already known to match, so a node is
/// innermost exactly when none of its named children match.
fn innermost_matches<'tree>(root: NodeView<'tree>, regex: &Regex) -> Vec<NodeView<'tree>> {
    let mut out = Vec::new();
    if !regex.is_match(root.text()) {
        return out;
    }

    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        let matching: Vec<_> = node
            .named_children()
            .into_iter()
            .filter(|child| regex.is_match(child.text()))
            .collect();
        if matching.is_empty() {
            out.push(node);
        } else {
            stack.extend(matching.into_iter().rev());
        }
    }
    out
}

fn fault(rule: &str, file: &str, payload: Box<dyn Any + Send>) -> RuleFault {
    let message = panic_message(payload.as_ref());
    tracing::error!(rule, file, error = %message, "rule failed");
    RuleFault {
        rule: rule.to_string(),
        file: file.to_string(),
        message,
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "rule panicked".to_string()
    }
}
