//! Labeled tab-separated values (`label:value<TAB>label:value`).

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use crate::parser::FormatParser;
use crate::parser::event::{EventBuilder, FormatDefaults};

pub const DEFAULT_DELIMITER: &str = "\t";
pub const DEFAULT_LABEL_DELIMITER: &str = ":";

#[derive(Debug, Clone)]
pub struct LtsvParser {
    delimiter: String,
    label_delimiter: String,
    builder: EventBuilder,
}

impl Default for LtsvParser {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            label_delimiter: DEFAULT_LABEL_DELIMITER.to_string(),
            builder: EventBuilder::default(),
        }
    }
}

impl LtsvParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn label_delimiter(&self) -> &str {
        &self.label_delimiter
    }
}

fn non_empty(conf: &ParserConfig, key: &str) -> Result<Option<String>, ConfigError> {
    match conf.text(key)? {
        Some(value) if value.is_empty() => {
            Err(ConfigError::invalid_option(key, "must not be empty"))
        }
        other => Ok(other),
    }
}

impl FormatParser for LtsvParser {
    fn format_name(&self) -> &str {
        "ltsv"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        if let Some(delimiter) = non_empty(conf, "delimiter")? {
            self.delimiter = delimiter;
        }
        if let Some(label_delimiter) = non_empty(conf, "label_delimiter")? {
            self.label_delimiter = label_delimiter;
        }
        self.builder.configure(conf, &FormatDefaults::default())
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        let fields = text
            .split(self.delimiter.as_str())
            .filter_map(|cell| cell.split_once(self.label_delimiter.as_str()))
            .map(|(label, value)| (label, Some(value)));

        Ok(vec![self.builder.build(fields)?])
    }

    fn estimate_current_event(&self) -> bool {
        self.builder.estimate_current_event()
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.builder.set_estimate_current_event(estimate);
    }
}
