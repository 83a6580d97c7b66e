//! Rule system for code analysis
//!
//! A rule declares its metadata once and overrides only the lifecycle hooks
//! it needs. The host calls the hooks in a fixed order for every file:
//! [`Rule::pre_filter`], [`Rule::validate_root`], [`Rule::validate_query`],
//! then either the validation hooks (scan mode) or
//! [`Rule::measure_nodes`] (measure mode).

pub mod configuration;
pub mod metrics;
pub mod plugin;
pub mod quality;
pub mod query_rule;
pub mod registry;

pub use configuration::RuleConfiguration;
pub use plugin::{BuiltinRules, CustomRules, RulePlugin};
pub use query_rule::QueryRule;
pub use registry::RuleRegistry;

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::aggregate::NodeGroups;
use crate::language::SupportedLanguage;
use crate::node::NodeView;
use crate::query::{CompiledQuery, PatternSelector, resolve};
use crate::result::ScanResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => f.write_str("error"),
            Severity::Warning => f.write_str("warning"),
            Severity::Info => f.write_str("info"),
        }
    }
}

/// Severity ordinal of a rule. Anything above [`Priority::HIGH`] is
/// caller-defined and ranks as high.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Priority(pub u32);

impl Priority {
    pub const LOW: Priority = Priority(0);
    pub const MEDIUM: Priority = Priority(1);
    pub const HIGH: Priority = Priority(2);

    pub fn level(self) -> u32 {
        self.0.min(Self::HIGH.0)
    }

    pub fn severity(self) -> Severity {
        match self.level() {
            0 => Severity::Info,
            1 => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Modes a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct RuleContext {
    pub scan: bool,
    pub measure: bool,
}

impl RuleContext {
    pub const SCAN: RuleContext = RuleContext {
        scan: true,
        measure: false,
    };
    pub const MEASURE: RuleContext = RuleContext {
        scan: false,
        measure: true,
    };
    pub const BOTH: RuleContext = RuleContext {
        scan: true,
        measure: true,
    };

    /// Parses a comma-joined list such as `"measure, scan"`. Order, case and
    /// whitespace do not matter; unknown entries are ignored.
    pub fn parse(value: &str) -> Self {
        let mut context = Self::default();
        for token in value.split(',').map(str::trim).filter(|t| !t.is_empty()) {
            match token.to_ascii_lowercase().as_str() {
                "scan" => context.scan = true,
                "measure" => context.measure = true,
                other => tracing::warn!(context = other, "ignoring unknown rule context"),
            }
        }
        context
    }
}

impl fmt::Display for RuleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.scan, self.measure) {
            (true, true) => f.write_str("scan,measure"),
            (true, false) => f.write_str("scan"),
            (false, true) => f.write_str("measure"),
            (false, false) => Ok(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuleMetadata {
    pub name: String,
    pub category: String,
    pub message: String,
    pub suggestion: Option<String>,
    pub priority: Priority,
    pub context: RuleContext,
    pub language: SupportedLanguage,
    pub query: Option<String>,
    pub regex: Option<String>,
}

impl RuleMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_context(mut self, context: RuleContext) -> Self {
        self.context = context;
        self
    }

    pub fn with_language(mut self, language: SupportedLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex = Some(regex.into());
        self
    }
}

/// A unit of analysis.
///
/// Every hook has a default that passes its input through or produces
/// nothing, so an implementation only overrides what it needs. Hooks must
/// not keep per-invocation state: the same rule instance is reused across
/// files, possibly from several threads.
pub trait Rule: Send + Sync {
    fn metadata(&self) -> &RuleMetadata;

    fn configuration(&self) -> &RuleConfiguration;

    fn configuration_mut(&mut self) -> &mut RuleConfiguration;

    /// Returns the configured value for `key`, or `""` when unset.
    fn configuration_value(&self, key: &str) -> &str {
        self.configuration().get(key)
    }

    fn set_configuration_value(&mut self, key: &str, value: &str) {
        self.configuration_mut().set(key, value);
    }

    /// Narrows or substitutes the root before validation.
    fn pre_filter<'tree>(&self, root: NodeView<'tree>) -> NodeView<'tree> {
        root
    }

    /// Whole-subtree checks on the filtered root.
    fn validate_root<'tree>(&self, root: NodeView<'tree>) -> NodeView<'tree> {
        root
    }

    /// Resolves the nodes the rule works on.
    fn validate_query<'tree>(
        &self,
        query: &dyn CompiledQuery<NodeView<'tree>>,
        root: NodeView<'tree>,
        capture: Option<&str>,
        selector: PatternSelector,
    ) -> Vec<NodeView<'tree>> {
        resolve(query, root, capture, selector)
    }

    /// Reasoning across all resolved nodes at once.
    fn validate_nodes(&self, _nodes: &[NodeView<'_>]) -> Vec<ScanResult> {
        Vec::new()
    }

    /// Reasoning about one node; called once per resolved node.
    fn validate_node(&self, _node: NodeView<'_>) -> Vec<ScanResult> {
        Vec::new()
    }

    fn measure_nodes<'tree>(&self, _nodes: &[NodeView<'tree>]) -> NodeGroups<NodeView<'tree>> {
        NodeGroups::default()
    }
}

#[macro_export]
macro_rules! declare_rule {
    (
        $name:ident,
        name = $rule_name:literal,
        category = $cat:literal,
        message = $msg:literal,
        priority = $prio:ident,
        context = $ctx:ident,
        language = $lang:ident
        $(, suggestion = $suggestion:literal)?
        $(, query = $query:literal)?
        $(, regex = $regex:literal)?
    ) => {
        pub struct $name {
            metadata: $crate::rules::RuleMetadata,
            configuration: $crate::rules::RuleConfiguration,
        }

        impl $name {
            pub fn new() -> Self {
                let metadata = $crate::rules::RuleMetadata::new($rule_name)
                    .with_category($cat)
                    .with_message($msg)
                    .with_priority($crate::rules::Priority::$prio)
                    .with_context($crate::rules::RuleContext::$ctx)
                    .with_language($crate::language::SupportedLanguage::$lang)
                    $(.with_suggestion($suggestion))?
                    $(.with_query($query))?
                    $(.with_regex($regex))?;
                Self {
                    metadata,
                    configuration: $crate::rules::RuleConfiguration::default(),
                }
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }
    };
}
