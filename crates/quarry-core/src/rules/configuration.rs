//! Per-rule string settings.

use std::collections::HashMap;
use std::str::FromStr;

/// Private key/value settings of one rule instance.
///
/// Reading a key that was never set yields `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleConfiguration {
    values: HashMap<String, String>,
}

impl RuleConfiguration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> &str {
        self.values.get(key).map_or("", String::as_str)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn contains(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.values.remove(key)
    }

    /// Parses the stored value; `None` when unset or unparsable.
    pub fn parse<T: FromStr>(&self, key: &str) -> Option<T> {
        self.values.get(key)?.trim().parse().ok()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
