use std::collections::{HashMap, HashSet};

use crate::config::RulesConfig;
use crate::rules::{BuiltinRules, CustomRules, Priority, Rule, RulePlugin};

pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
    enabled_rules: HashSet<String>,
    disabled_rules: HashSet<String>,
    priority_overrides: HashMap<String, Priority>,
    /// Names of the rules the last `configure` call registered.
    custom_rules: Vec<String>,
    /// `(rule, key, previous value)` for every option the last `configure`
    /// call applied, in application order.
    applied_options: Vec<(String, String, Option<String>)>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            enabled_rules: HashSet::new(),
            disabled_rules: HashSet::new(),
            priority_overrides: HashMap::new(),
            custom_rules: Vec::new(),
            applied_options: Vec::new(),
        }
    }

    pub fn with_builtin_rules() -> Self {
        let mut registry = Self::new();
        registry.register_plugin(&BuiltinRules);
        registry
    }

    pub fn register(&mut self, rule: Box<dyn Rule>) {
        self.rules.push(rule);
    }

    /// Registers every rule of `plugin` whose name is not taken yet and
    /// returns how many were added.
    pub fn register_plugin(&mut self, plugin: &dyn RulePlugin) -> usize {
        let mut added = 0;
        for rule in plugin.rules() {
            let name = rule.metadata().name.clone();
            if self.get_rule(&name).is_some() {
                tracing::warn!(
                    plugin = plugin.name(),
                    rule = %name,
                    "skipping rule with duplicate name"
                );
                continue;
            }
            self.register(rule);
            added += 1;
        }
        tracing::debug!(plugin = plugin.name(), added, "registered plugin rules");
        added
    }

    /// Applies `config`, replacing whatever an earlier call applied.
    ///
    /// Rules and option values set directly on the registry are kept; only
    /// the custom rules and option values that came from configuration are
    /// rolled back before the new configuration is applied.
    pub fn configure(&mut self, config: &RulesConfig) {
        self.reset_configuration();

        let first_custom = self.rules.len();
        self.register_plugin(&CustomRules::new(&config.custom));
        self.custom_rules = self.rules[first_custom..]
            .iter()
            .map(|rule| rule.metadata().name.clone())
            .collect();

        self.enabled_rules.extend(config.enabled.iter().cloned());
        self.disabled_rules.extend(config.disabled.iter().cloned());

        for (rule_name, priority) in &config.priority {
            self.priority_overrides.insert(rule_name.clone(), *priority);
        }

        for (rule_name, options) in &config.options {
            let Some(rule) = self.get_rule_mut(rule_name) else {
                tracing::warn!(rule = %rule_name, "options given for unknown rule");
                continue;
            };
            let mut applied = Vec::with_capacity(options.len());
            for (key, value) in options {
                let previous = rule
                    .configuration()
                    .contains(key)
                    .then(|| rule.configuration_value(key).to_string());
                rule.set_configuration_value(key, &value.to_string());
                applied.push((rule_name.clone(), key.clone(), previous));
            }
            self.applied_options.extend(applied);
        }
    }

    fn reset_configuration(&mut self) {
        self.enabled_rules.clear();
        self.disabled_rules.clear();
        self.priority_overrides.clear();

        let applied_options = std::mem::take(&mut self.applied_options);
        for (rule_name, key, previous) in applied_options.into_iter().rev() {
            let Some(rule) = self.get_rule_mut(&rule_name) else {
                continue;
            };
            match previous {
                Some(value) => rule.set_configuration_value(&key, &value),
                None => {
                    rule.configuration_mut().remove(&key);
                }
            }
        }

        let custom_rules = std::mem::take(&mut self.custom_rules);
        if !custom_rules.is_empty() {
            self.rules
                .retain(|rule| !custom_rules.contains(&rule.metadata().name));
            tracing::debug!(removed = custom_rules.len(), "dropped previously configured rules");
        }
    }

    pub fn rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules.iter().map(|r| r.as_ref())
    }

    pub fn enabled_rules(&self) -> impl Iterator<Item = &dyn Rule> {
        self.rules().filter(|rule| self.should_run_rule(*rule))
    }

    fn should_run_rule(&self, rule: &dyn Rule) -> bool {
        let name = rule.metadata().name.as_str();

        if !self.enabled_rules.is_empty() && !self.enabled_rules.contains(name) {
            return false;
        }

        !self.disabled_rules.contains(name)
    }

    pub fn is_rule_enabled(&self, name: &str) -> bool {
        self.get_rule(name)
            .is_some_and(|rule| self.should_run_rule(rule))
    }

    /// Effective priority: the configured override, else the rule's own.
    pub fn priority_of(&self, rule: &dyn Rule) -> Priority {
        let metadata = rule.metadata();
        self.priority_overrides
            .get(&metadata.name)
            .copied()
            .unwrap_or(metadata.priority)
    }

    pub fn priority_override(&self, name: &str) -> Option<Priority> {
        self.priority_overrides.get(name).copied()
    }

    pub fn get_rule(&self, name: &str) -> Option<&dyn Rule> {
        self.rules
            .iter()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_ref())
    }

    pub fn get_rule_mut(&mut self, name: &str) -> Option<&mut (dyn Rule + 'static)> {
        self.rules
            .iter_mut()
            .find(|r| r.metadata().name == name)
            .map(|r| r.as_mut())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
