//! Pass-through format: the whole text becomes one field.

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent, Record, TimeValue};
use crate::parser::FormatParser;

pub const DEFAULT_MESSAGE_KEY: &str = "message";

#[derive(Debug, Clone)]
pub struct NoneParser {
    message_key: String,
    estimate_current_event: bool,
}

impl Default for NoneParser {
    fn default() -> Self {
        Self {
            message_key: DEFAULT_MESSAGE_KEY.to_string(),
            estimate_current_event: true,
        }
    }
}

impl NoneParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn message_key(&self) -> &str {
        &self.message_key
    }
}

impl FormatParser for NoneParser {
    fn format_name(&self) -> &str {
        "none"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.message_key = conf
            .text("message_key")?
            .unwrap_or_else(|| DEFAULT_MESSAGE_KEY.to_string());
        if let Some(estimate) = conf.flag("estimate_current_event")? {
            self.estimate_current_event = estimate;
        }
        Ok(())
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        let mut record = Record::new();
        record.insert(self.message_key.as_str(), text);
        let time = self.estimate_current_event.then(TimeValue::now);
        Ok(vec![ParsedEvent::new(time, record)])
    }

    fn estimate_current_event(&self) -> bool {
        self.estimate_current_event
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.estimate_current_event = estimate;
    }
}
