//! Rule evaluation engine for tree-sitter based static analysis.
//!
//! Rules declare a structural query and/or a regex and override the
//! lifecycle hooks they need; the [`engine::Engine`] resolves nodes for each
//! rule and collects scan results or per-kind node groupings.

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod language;
pub mod node;
pub mod parser;
pub mod query;
pub mod result;
pub mod rules;

#[cfg(test)]
mod testing;

pub use aggregate::{NodeGroups, aggregate};
pub use engine::{Engine, EngineError, MeasureReport, RuleMeasurement, ScanReport};
pub use language::SupportedLanguage;
pub use node::{NodeInfo, NodeView, Position, SyntaxNode};
pub use parser::{ParseError, ParsedFile};
pub use query::{CompiledQuery, PatternSelector, RuleQuery, resolve};
pub use result::{RuleFault, ScanResult};
pub use rules::{Priority, Rule, RuleConfiguration, RuleContext, RuleMetadata, RuleRegistry};
