//! The user-facing parser: resolves a format through the registry and
//! forwards configuration and parsing to it.

use super::FormatParser;
use super::registry::FormatRegistry;
use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use std::sync::Arc;

pub struct TextParser {
    registry: Arc<FormatRegistry>,
    parser: Option<Box<dyn FormatParser>>,
    estimate_current_event: Option<bool>,
}

impl Default for TextParser {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TextParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextParser")
            .field("format", &self.parser.as_ref().map(|p| p.format_name()))
            .field("estimate_current_event", &self.estimate_current_event)
            .finish()
    }
}

impl TextParser {
    /// Facade over the built-in formats.
    pub fn new() -> Self {
        Self::with_registry(Arc::new(FormatRegistry::with_builtins()))
    }

    pub fn with_registry(registry: Arc<FormatRegistry>) -> Self {
        Self {
            registry,
            parser: None,
            estimate_current_event: None,
        }
    }

    pub fn registry(&self) -> &Arc<FormatRegistry> {
        &self.registry
    }

    /// Override applied to the concrete parser on every `configure`,
    /// after the parser's own options.
    pub fn set_estimate_current_event(&mut self, estimate: bool) {
        self.estimate_current_event = Some(estimate);
        if let Some(parser) = self.parser.as_mut() {
            parser.set_estimate_current_event(estimate);
        }
    }

    pub fn estimate_current_event(&self) -> Option<bool> {
        self.estimate_current_event
    }

    pub fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        let format = conf
            .text("format")?
            .ok_or_else(|| ConfigError::MissingOption("format".to_string()))?;

        let mut parser = self.registry.create(&format)?;
        parser.configure(conf)?;
        if let Some(estimate) = self.estimate_current_event {
            parser.set_estimate_current_event(estimate);
        }

        tracing::debug!(
            format = %format,
            parser = parser.format_name(),
            estimate_current_event = parser.estimate_current_event(),
            "Configured text parser"
        );
        self.parser = Some(parser);
        Ok(())
    }

    /// The configured concrete parser.
    pub fn parser(&self) -> Option<&dyn FormatParser> {
        self.parser.as_deref()
    }

    /// Feeds every event produced from `text` to `consumer`, in order.
    /// Returns how many events were produced.
    pub fn parse_each<F>(&self, text: &str, consumer: F) -> Result<usize, ParseError>
    where
        F: FnMut(ParsedEvent),
    {
        let events = self.configured()?.parse(text)?;
        let count = events.len();
        events.into_iter().for_each(consumer);
        Ok(count)
    }

    /// First event produced from `text`, if any.
    pub fn parse(&self, text: &str) -> Result<Option<ParsedEvent>, ParseError> {
        let events = self.configured()?.parse(text)?;
        Ok(events.into_iter().next())
    }

    /// Boundary predicate of the configured parser.
    pub fn firstline(&self, line: &str) -> Option<bool> {
        self.parser.as_ref()?.firstline(line)
    }

    fn configured(&self) -> Result<&dyn FormatParser, ParseError> {
        self.parser.as_deref().ok_or(ParseError::NotConfigured)
    }
}
