//! no-unwrap: flags `.unwrap()` calls in Rust.

use crate::declare_rule;
use crate::node::NodeView;
use crate::result::ScanResult;
use crate::rules::{Rule, RuleConfiguration, RuleMetadata};

declare_rule!(
    NoUnwrap,
    name = "no-unwrap",
    category = "quality",
    message = "Avoid unwrap(); it panics on None or Err",
    priority = MEDIUM,
    context = SCAN,
    language = Rust,
    suggestion = "Propagate the error with `?` or handle it explicitly",
    query = r#"((call_expression
  function: (field_expression field: (field_identifier) @method)) @target
  (#eq? @method "unwrap"))"#
);

impl Rule for NoUnwrap {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::scan_source;

    fn run(code: &str) -> Vec<ScanResult> {
        scan_source(Box::new(NoUnwrap::new()), "lib.rs", code)
    }

    #[test]
    fn detects_unwrap_call() {
        let results = run("fn main() {\n    let v = parse().unwrap();\n}\n");

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].line(), 2);
        assert_eq!(results[0].node.text, "parse().unwrap()");
    }

    #[test]
    fn ignores_unwrap_or_and_expect() {
        let results = run("fn main() {\n    a.unwrap_or(1);\n    b.expect(\"b\");\n}\n");

        assert!(results.is_empty());
    }
}
