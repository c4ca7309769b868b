//! Parser configuration: the option map handed to `TextParser::configure`
//! and forwarded to every concrete parser.

use crate::domain::ConfigError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A single option value as it appears in a configuration file or on the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for OptionValue {
    fn from(s: &str) -> Self {
        OptionValue::Text(s.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(s: String) -> Self {
        OptionValue::Text(s)
    }
}

impl From<bool> for OptionValue {
    fn from(b: bool) -> Self {
        OptionValue::Bool(b)
    }
}

impl From<i64> for OptionValue {
    fn from(i: i64) -> Self {
        OptionValue::Integer(i)
    }
}

impl From<f64> for OptionValue {
    fn from(f: f64) -> Self {
        OptionValue::Float(f)
    }
}

impl From<Vec<String>> for OptionValue {
    fn from(list: Vec<String>) -> Self {
        OptionValue::List(list)
    }
}

impl From<Vec<&str>> for OptionValue {
    fn from(list: Vec<&str>) -> Self {
        OptionValue::List(list.into_iter().map(str::to_string).collect())
    }
}

/// Ordered option map for one parser.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParserConfig {
    options: BTreeMap<String, OptionValue>,
}

impl ParserConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style setter.
    pub fn with(mut self, key: &str, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.options.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.options.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.options.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }

    /// Overlays `other` on top of `self`; keys present in both take `other`'s value.
    pub fn merge(&mut self, other: ParserConfig) {
        self.options.extend(other.options);
    }

    /// Text option. Numbers are rendered as text; booleans and lists are rejected.
    pub fn text(&self, key: &str) -> Result<Option<String>, ConfigError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(OptionValue::Text(s)) => Ok(Some(s.clone())),
            Some(OptionValue::Integer(i)) => Ok(Some(i.to_string())),
            Some(OptionValue::Float(f)) => Ok(Some(f.to_string())),
            Some(other) => Err(ConfigError::invalid_option(
                key,
                format!("expected text, got {other:?}"),
            )),
        }
    }

    /// Boolean option; accepts `true/false/yes/no/1/0` text as well.
    pub fn flag(&self, key: &str) -> Result<Option<bool>, ConfigError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(OptionValue::Bool(b)) => Ok(Some(*b)),
            Some(OptionValue::Integer(1)) => Ok(Some(true)),
            Some(OptionValue::Integer(0)) => Ok(Some(false)),
            Some(OptionValue::Text(s)) => match s.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => Ok(Some(true)),
                "false" | "no" | "0" => Ok(Some(false)),
                _ => Err(ConfigError::invalid_option(
                    key,
                    format!("expected a boolean, got '{s}'"),
                )),
            },
            Some(other) => Err(ConfigError::invalid_option(
                key,
                format!("expected a boolean, got {other:?}"),
            )),
        }
    }

    /// List option: a list value, JSON array text (`["a","b"]`) or comma-joined text (`a,b`).
    pub fn list(&self, key: &str) -> Result<Option<Vec<String>>, ConfigError> {
        match self.options.get(key) {
            None => Ok(None),
            Some(OptionValue::List(items)) => Ok(Some(items.clone())),
            Some(OptionValue::Text(s)) if s.trim_start().starts_with('[') => {
                serde_json::from_str::<Vec<String>>(s)
                    .map(Some)
                    .map_err(|e| ConfigError::invalid_option(key, e.to_string()))
            }
            Some(OptionValue::Text(s)) => Ok(Some(
                s.split(',').map(|item| item.trim().to_string()).collect(),
            )),
            Some(other) => Err(ConfigError::invalid_option(
                key,
                format!("expected a list, got {other:?}"),
            )),
        }
    }

    /// Reads options from TOML. A `[parser]` table is used when present,
    /// otherwise the top-level keys are the options.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let mut table: toml::Table = toml::from_str(content)?;
        let section = match table.remove("parser") {
            Some(toml::Value::Table(parser)) => parser,
            Some(_) => {
                return Err(ConfigError::invalid_option(
                    "parser",
                    "expected a table",
                ));
            }
            None => table,
        };
        let config = toml::Value::Table(section).try_into::<ParserConfig>()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}
