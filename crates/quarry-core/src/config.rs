//! Configuration loading and parsing for Quarry
//!
//! Provides functionality to load and parse `quarry.toml` configuration files.

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::language::SupportedLanguage;
use crate::rules::Priority;

pub const CONFIG_FILENAME: &str = "quarry.toml";

const KNOWN_TOP_LEVEL_KEYS: &[&str] = &["rules"];
const KNOWN_RULES_KEYS: &[&str] = &["enabled", "disabled", "priority", "options", "custom"];
const KNOWN_CUSTOM_KEYS: &[&str] = &[
    "name",
    "language",
    "query",
    "regex",
    "message",
    "suggestion",
    "priority",
    "context",
    "category",
];

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid TOML in '{path}': {message}")]
    ParseError { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Default)]
pub struct ConfigResult {
    pub config: Config,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub rules: RulesConfig,
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RulesConfig {
    /// When non-empty, only these rules run.
    pub enabled: Vec<String>,
    pub disabled: Vec<String>,
    pub priority: IndexMap<String, Priority>,
    /// Per-rule settings, keyed by rule name.
    pub options: IndexMap<String, IndexMap<String, OptionValue>>,
    pub custom: Vec<CustomRuleConfig>,
}

/// A setting value as written in TOML. Every variant is stored in the
/// rule's configuration as its string form.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OptionValue {
    Boolean(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Boolean(value) => write!(f, "{value}"),
            OptionValue::Integer(value) => write!(f, "{value}"),
            OptionValue::Float(value) => write!(f, "{value}"),
            OptionValue::String(value) => f.write_str(value),
        }
    }
}

/// A query rule defined entirely in configuration.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CustomRuleConfig {
    pub name: String,
    pub language: SupportedLanguage,
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub regex: Option<String>,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub suggestion: Option<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default = "default_custom_context")]
    pub context: String,
    #[serde(default = "default_custom_category")]
    pub category: String,
}

fn default_custom_context() -> String {
    "scan".to_string()
}

fn default_custom_category() -> String {
    "custom".to_string()
}

pub fn find_config_file(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let config_path = current.join(CONFIG_FILENAME);
        if config_path.exists() {
            return Some(config_path);
        }
        if !current.pop() {
            return None;
        }
    }
}

fn read_config(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config = Config::from_toml(&content).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        message: e.message().to_string(),
    })?;

    Ok((config, content))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    read_config(path).map(|(config, _)| config)
}

pub fn load_config_with_warnings(path: &Path) -> Result<ConfigResult, ConfigError> {
    let (config, content) = read_config(path)?;
    let warnings = detect_unknown_keys(&content);
    for warning in &warnings {
        tracing::warn!(path = %path.display(), "{warning}");
    }

    Ok(ConfigResult { config, warnings })
}

fn detect_unknown_keys(content: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    let table: toml::Table = match content.parse() {
        Ok(t) => t,
        Err(_) => return warnings,
    };

    let known_top: HashSet<&str> = KNOWN_TOP_LEVEL_KEYS.iter().copied().collect();
    for key in table.keys() {
        if !known_top.contains(key.as_str()) {
            warnings.push(format!("Unknown config option: '{}'", key));
        }
    }

    let Some(toml::Value::Table(rules)) = table.get("rules") else {
        return warnings;
    };

    let known_rules: HashSet<&str> = KNOWN_RULES_KEYS.iter().copied().collect();
    for key in rules.keys() {
        if !known_rules.contains(key.as_str()) {
            warnings.push(format!("Unknown config option in [rules]: '{}'", key));
        }
    }

    if let Some(toml::Value::Array(custom)) = rules.get("custom") {
        let known_custom: HashSet<&str> = KNOWN_CUSTOM_KEYS.iter().copied().collect();
        for entry in custom.iter().filter_map(toml::Value::as_table) {
            for key in entry.keys() {
                if !known_custom.contains(key.as_str()) {
                    warnings.push(format!(
                        "Unknown config option in [[rules.custom]]: '{}'",
                        key
                    ));
                }
            }
        }
    }

    warnings
}

pub fn load_config_or_default(start_dir: &Path) -> Config {
    find_config_file(start_dir)
        .and_then(|path| load_config(&path).ok())
        .unwrap_or_default()
}

pub fn load_config_or_default_with_warnings(start_dir: &Path) -> ConfigResult {
    match find_config_file(start_dir) {
        Some(path) => load_config_with_warnings(&path).unwrap_or_else(|err| {
            tracing::warn!(error = %err, "falling back to default configuration");
            ConfigResult::default()
        }),
        None => ConfigResult::default(),
    }
}
