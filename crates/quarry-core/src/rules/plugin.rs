//! Rule sources the registry can load from.

use crate::config::CustomRuleConfig;
use crate::rules::{QueryRule, Rule, metrics, quality};

/// A bundle of rules handed to [`RuleRegistry::register_plugin`].
///
/// [`RuleRegistry::register_plugin`]: crate::rules::RuleRegistry::register_plugin
pub trait RulePlugin {
    fn name(&self) -> &str;

    /// Fresh instances, each with empty configuration.
    fn rules(&self) -> Vec<Box<dyn Rule>>;
}

/// Every rule shipped with the crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinRules;

impl RulePlugin for BuiltinRules {
    fn name(&self) -> &str {
        "builtin"
    }

    fn rules(&self) -> Vec<Box<dyn Rule>> {
        let mut rules = quality::rules();
        rules.extend(metrics::rules());
        rules
    }
}

/// Query rules declared under `[[rules.custom]]`.
#[derive(Debug, Clone, Copy)]
pub struct CustomRules<'a> {
    configs: &'a [CustomRuleConfig],
}

impl<'a> CustomRules<'a> {
    pub fn new(configs: &'a [CustomRuleConfig]) -> Self {
        Self { configs }
    }
}

impl RulePlugin for CustomRules<'_> {
    fn name(&self) -> &str {
        "custom"
    }

    fn rules(&self) -> Vec<Box<dyn Rule>> {
        self.configs
            .iter()
            .map(|config| Box::new(QueryRule::from_config(config)) as Box<dyn Rule>)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use std::collections::HashSet;

    #[test]
    fn builtin_rules_have_unique_names() {
        let rules = BuiltinRules.rules();
        let names: HashSet<_> = rules.iter().map(|r| r.metadata().name.clone()).collect();

        assert_eq!(names.len(), rules.len());
        assert!(names.contains("no-print"));
        assert!(names.contains("statement-counts"));
    }

    #[test]
    fn builtin_rules_start_unconfigured() {
        assert!(
            BuiltinRules
                .rules()
                .iter()
                .all(|rule| rule.configuration().is_empty())
        );
    }

    #[test]
    fn custom_rules_follow_config_order() {
        let config = Config::from_toml(
            r#"
[[rules.custom]]
name = "first"
language = "python"
query = "(identifier) @target"

[[rules.custom]]
name = "second"
language = "rust"
regex = "unsafe"
"#,
        )
        .unwrap();

        let plugin = CustomRules::new(&config.rules.custom);
        let names: Vec<_> = plugin
            .rules()
            .iter()
            .map(|r| r.metadata().name.clone())
            .collect();

        assert_eq!(plugin.name(), "custom");
        assert_eq!(names, vec!["first", "second"]);
    }
}
