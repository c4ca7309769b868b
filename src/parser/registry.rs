//! Format Registry
//!
//! Maps format names to parser factories. Built once during setup, then
//! shared read-only behind an `Arc`.

use super::FormatParser;
use super::formats::{
    Apache2Parser, ApacheErrorParser, ApacheParser, DelimitedParser, JsonParser, LtsvParser,
    MultilineParser, NginxParser, NoneParser, SyslogParser,
};
use super::regexp::{RegexpParser, strip_slashes};
use crate::domain::ConfigError;
use std::collections::HashMap;
use std::sync::Arc;

/// Creates a fresh, unconfigured parser.
pub type ParserFactory =
    Arc<dyn Fn() -> Result<Box<dyn FormatParser>, ConfigError> + Send + Sync>;

pub struct FormatRegistry {
    factories: HashMap<String, ParserFactory>,
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("formats", &self.format_names())
            .finish()
    }
}

impl FormatRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// Registry holding every built-in format.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register("apache", || Ok(Box::new(ApacheParser::new()?)));
        registry.register("apache2", || Ok(Box::new(Apache2Parser::new()?)));
        registry.register("apache_error", || Ok(Box::new(ApacheErrorParser::new()?)));
        registry.register("syslog", || Ok(Box::new(SyslogParser::new()?)));
        registry.register("json", || Ok(Box::new(JsonParser::new())));
        registry.register("nginx", || Ok(Box::new(NginxParser::new()?)));
        registry.register("csv", || Ok(Box::new(DelimitedParser::csv())));
        registry.register("tsv", || Ok(Box::new(DelimitedParser::tsv())));
        registry.register("ltsv", || Ok(Box::new(LtsvParser::new())));
        registry.register("none", || Ok(Box::new(NoneParser::new())));
        registry.register("multiline", || Ok(Box::new(MultilineParser::new())));
        registry
    }

    /// Register a factory under `name`, replacing any previous one.
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Result<Box<dyn FormatParser>, ConfigError> + Send + Sync + 'static,
    {
        let replaced = self
            .factories
            .insert(name.to_string(), Arc::new(factory))
            .is_some();
        tracing::debug!(format = name, replaced = replaced, "Registered parser factory");
    }

    /// Resolve `name` to a factory.
    ///
    /// A `/pattern/` name yields a generic pattern parser compiled on the spot.
    pub fn lookup(&self, name: &str) -> Result<ParserFactory, ConfigError> {
        if let Some(pattern) = strip_slashes(name) {
            let parser = RegexpParser::new(pattern)?;
            tracing::debug!(pattern = pattern, "Compiled inline pattern format");
            let factory: ParserFactory =
                Arc::new(move || -> Result<Box<dyn FormatParser>, ConfigError> {
                    Ok(Box::new(parser.clone()))
                });
            return Ok(factory);
        }

        self.factories
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownFormat {
                name: name.to_string(),
                known: self.format_names().join(", "),
            })
    }

    /// Resolve and invoke the factory in one step.
    pub fn create(&self, name: &str) -> Result<Box<dyn FormatParser>, ConfigError> {
        let factory = self.lookup(name)?;
        factory()
    }

    /// Registered names, sorted.
    pub fn format_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.factories.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }
}
