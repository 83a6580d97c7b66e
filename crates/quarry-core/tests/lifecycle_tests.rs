//! Integration tests driving rules through the engine end to end.

use std::fs;
use std::path::Path;

use insta::{assert_json_snapshot, assert_snapshot};
use quarry_core::aggregate::{NodeGroups, aggregate};
use quarry_core::config::{CONFIG_FILENAME, Config, load_config_or_default};
use quarry_core::engine::{Engine, ScanReport};
use quarry_core::node::NodeView;
use quarry_core::parser::ParsedFile;
use quarry_core::query::{PatternSelector, RuleQuery, resolve};
use quarry_core::result::ScanResult;
use quarry_core::rules::{
    Priority, Rule, RuleConfiguration, RuleContext, RuleMetadata, RuleRegistry,
};
use quarry_core::language::SupportedLanguage;

const FIXTURES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

fn read_fixture(relative_path: &str) -> String {
    let path = Path::new(FIXTURES_DIR).join(relative_path);
    fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("Failed to read fixture {}: {}", path.display(), e))
}

fn service_file() -> ParsedFile {
    ParsedFile::from_source("service.py", &read_fixture("python/service.py")).unwrap()
}

fn render(report: &ScanReport) -> String {
    report
        .results
        .iter()
        .map(|r| format!("{}:{} {} [{}]", r.line(), r.column(), r.rule, r.severity))
        .collect::<Vec<_>>()
        .join("\n")
}

struct IdentifierRule {
    metadata: RuleMetadata,
    configuration: RuleConfiguration,
}

impl IdentifierRule {
    fn new(name: &str) -> Self {
        Self {
            metadata: RuleMetadata::new(name)
                .with_message("identifier")
                .with_context(RuleContext::BOTH)
                .with_query("(identifier) @target"),
            configuration: RuleConfiguration::default(),
        }
    }
}

impl Rule for IdentifierRule {
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
        if node.text() == self.configuration_value("explode-on") {
            panic!("cannot handle '{}'", node.text());
        }
        vec![ScanResult::from_rule(&self.metadata, node)]
    }

    fn measure_nodes<'tree>(&self, nodes: &[NodeView<'tree>]) -> NodeGroups<NodeView<'tree>> {
        aggregate(nodes)
    }
}

#[test]
fn identifiers_resolve_in_order_and_aggregate_under_one_kind() {
    let file = ParsedFile::from_source("xyz.py", "x\ny\nz\n").unwrap();
    let query = RuleQuery::new(SupportedLanguage::Python, "(identifier) @target").unwrap();

    let nodes = resolve(&query, file.root(), None, PatternSelector::AllPatterns);
    let texts: Vec<_> = nodes.iter().map(|n| n.text()).collect();
    assert_eq!(texts, vec!["x", "y", "z"]);

    let groups = aggregate(&nodes);
    assert_eq!(groups.len(), 1);
    let grouped: Vec<_> = groups
        .get("identifier")
        .unwrap()
        .iter()
        .map(|n| n.text())
        .collect();
    assert_eq!(grouped, vec!["x", "y", "z"]);
}

#[test]
fn measure_through_engine_matches_direct_aggregation() {
    let mut registry = RuleRegistry::new();
    registry.register(Box::new(IdentifierRule::new("idents")));
    let engine = Engine::new(registry).unwrap();
    let file = ParsedFile::from_source("xyz.py", "x\ny\nz\n").unwrap();

    let report = engine.measure(&file);

    assert!(report.faults.is_empty());
    assert_json_snapshot!(report.get("idents").unwrap().counts(), @r#"
    {
      "identifier": 3
    }
    "#);
}

#[test]
fn default_rules_scan_fixture() {
    let engine = Engine::with_config(&Config::default()).unwrap();

    let report = engine.scan(&service_file());

    assert!(report.faults.is_empty());
    assert_eq!(report.file, "service.py");
    assert_snapshot!(render(&report), @r"
    11:9 no-print [warning]
    6:11 max-parameters [info]
    8:19 singleton-comparison [warning]
    17:20 singleton-comparison [warning]
    7:5 todo-comment [info]
    3:8 duplicate-import [warning]
    ");
}

#[test]
fn default_rules_measure_fixture() {
    let engine = Engine::with_config(&Config::default()).unwrap();
    let file = service_file();

    let report = engine.measure(&file);

    let rules: Vec<_> = report.measurements.iter().map(|m| m.rule.as_str()).collect();
    assert_eq!(rules, vec!["statement-counts", "definition-counts"]);
    assert_json_snapshot!(report.get("statement-counts").unwrap().counts(), @r#"
    {
      "if_statement": 2,
      "return_statement": 4,
      "for_statement": 1
    }
    "#);

    let definitions = report.get("definition-counts").unwrap();
    let names: Vec<_> = definitions
        .get("function_definition")
        .unwrap()
        .iter()
        .filter_map(|n| n.child_by_field_name("name"))
        .map(|n| n.text())
        .collect();
    assert_eq!(names, vec!["handle", "run"]);
    assert_eq!(definitions.count("class_definition"), 1);
}

#[test]
fn config_file_tunes_builtin_rules() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(CONFIG_FILENAME),
        r#"
[rules]
disabled = ["todo-comment", "duplicate-import"]

[rules.priority]
no-print = 2

[rules.options.max-parameters]
max = 6

[rules.options.singleton-comparison]
ignore-booleans = true
"#,
    )
    .unwrap();
    let config = load_config_or_default(dir.path());

    let engine = Engine::with_config(&config).unwrap();
    let report = engine.scan(&service_file());

    assert_snapshot!(render(&report), @r"
    11:9 no-print [error]
    8:19 singleton-comparison [warning]
    ");
    assert_eq!(report.results[0].priority, Priority::HIGH);
}

#[test]
fn faulting_rule_is_isolated_per_file() {
    let mut rule = IdentifierRule::new("fragile");
    rule.set_configuration_value("explode-on", "boom");
    let mut registry = RuleRegistry::with_builtin_rules();
    registry.register(Box::new(rule));
    let engine = Engine::new(registry).unwrap();
    let files = vec![
        ParsedFile::from_source("ok.py", "print(value)\n").unwrap(),
        ParsedFile::from_source("bad.py", "print(boom)\n").unwrap(),
    ];

    let reports = engine.scan_batch(&files);

    assert!(reports[0].faults.is_empty());
    let ok_rules: Vec<_> = reports[0].results.iter().map(|r| r.rule.as_str()).collect();
    assert_eq!(ok_rules, vec!["no-print", "fragile", "fragile"]);

    assert_eq!(reports[1].faults.len(), 1);
    assert_eq!(reports[1].faults[0].rule, "fragile");
    assert_eq!(reports[1].faults[0].file, "bad.py");
    assert_eq!(reports[1].faults[0].message, "cannot handle 'boom'");
    let bad_rules: Vec<_> = reports[1].results.iter().map(|r| r.rule.as_str()).collect();
    assert_eq!(bad_rules, vec!["no-print"]);
}

#[test]
fn custom_rules_from_config_run_alongside_builtins() {
    let config = Config::from_toml(
        r#"
[rules]
enabled = ["no-getenv", "env-reads"]

[[rules.custom]]
name = "no-getenv"
language = "python"
query = '((call function: (attribute attribute: (identifier) @name) @target) (#eq? @name "getenv"))'
message = "Read configuration through the settings module"
priority = 1

[[rules.custom]]
name = "env-reads"
language = "python"
query = '(attribute object: (identifier) @target (#eq? @target "os"))'
context = "measure"
"#,
    )
    .unwrap();
    let engine = Engine::with_config(&config).unwrap();
    let file =
        ParsedFile::from_source("env.py", "import os\nhome = os.getenv('HOME')\npath = os.sep\n")
            .unwrap();

    let scan = engine.scan(&file);
    let measure = engine.measure(&file);

    assert_eq!(scan.results.len(), 1);
    assert_eq!(scan.results[0].rule, "no-getenv");
    assert_eq!(scan.results[0].node.text, "os.getenv");
    assert_eq!(scan.results[0].line(), 2);
    assert_eq!(measure.get("env-reads").unwrap().count("identifier"), 2);
}
