//! Nginx combined access log format.

use super::apache::APACHE_TIME_FORMAT;
use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use crate::parser::FormatParser;
use crate::parser::event::FormatDefaults;
use crate::parser::generated::pattern_index;
use crate::parser::regexp::RegexpParser;

/// Parser for nginx access logs. All captured fields stay strings.
#[derive(Debug, Clone)]
pub struct NginxParser {
    inner: RegexpParser,
}

impl NginxParser {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = FormatDefaults::new(Some(APACHE_TIME_FORMAT), "");
        Ok(Self {
            inner: RegexpParser::builtin("nginx", pattern_index::NGINX_COMBINED, defaults)?,
        })
    }
}

impl FormatParser for NginxParser {
    fn format_name(&self) -> &str {
        "nginx"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.inner.configure(conf)
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        self.inner.parse(text)
    }

    fn estimate_current_event(&self) -> bool {
        self.inner.estimate_current_event()
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.inner.set_estimate_current_event(estimate);
    }
}
