//! Helpers for running a single rule in unit tests.

use indexmap::IndexMap;

use crate::engine::Engine;
use crate::parser::ParsedFile;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleRegistry};

fn engine_for(rule: Box<dyn Rule>) -> Engine {
    let mut registry = RuleRegistry::new();
    registry.register(rule);
    Engine::new(registry).expect("rule should compile")
}

pub(crate) fn scan_source(rule: Box<dyn Rule>, filename: &str, source: &str) -> Vec<ScanResult> {
    let engine = engine_for(rule);
    let file = ParsedFile::from_source(filename, source).expect("source should parse");
    let report = engine.scan(&file);
    assert!(report.faults.is_empty(), "rule faulted: {:?}", report.faults);
    report.results
}

pub(crate) fn measure_counts(
    rule: Box<dyn Rule>,
    filename: &str,
    source: &str,
) -> IndexMap<String, usize> {
    let engine = engine_for(rule);
    let file = ParsedFile::from_source(filename, source).expect("source should parse");
    let report = engine.measure(&file);
    assert!(report.faults.is_empty(), "rule faulted: {:?}", report.faults);
    report
        .measurements
        .first()
        .map(|m| m.groups.counts())
        .unwrap_or_default()
}
