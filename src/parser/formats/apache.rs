//! Apache access and error log formats.

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use crate::parser::FormatParser;
use crate::parser::event::FormatDefaults;
use crate::parser::generated::pattern_index;
use crate::parser::regexp::RegexpParser;

pub const APACHE_TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";
pub const APACHE_ERROR_TIME_FORMAT: &str = "%a %b %d %H:%M:%S %Y";

/// Fields where a lone `-` means "no value".
const DASH_NULL_FIELDS: [&str; 4] = ["user", "size", "referer", "agent"];

/// Legacy combined-log template: every field stays a string.
#[derive(Debug, Clone)]
pub struct ApacheParser {
    inner: RegexpParser,
}

impl ApacheParser {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = FormatDefaults::new(Some(APACHE_TIME_FORMAT), "");
        Ok(Self {
            inner: RegexpParser::builtin("apache", pattern_index::APACHE_COMBINED, defaults)?,
        })
    }
}

impl FormatParser for ApacheParser {
    fn format_name(&self) -> &str {
        "apache"
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

/// Combined log format with `-` placeholders nulled and numeric status/size.
#[derive(Debug, Clone)]
pub struct Apache2Parser {
    inner: RegexpParser,
}

impl Apache2Parser {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = FormatDefaults::new(Some(APACHE_TIME_FORMAT), "code:integer,size:integer");
        Ok(Self {
            inner: RegexpParser::builtin("apache2", pattern_index::APACHE2_COMBINED, defaults)?,
        })
    }
}

impl FormatParser for Apache2Parser {
    fn format_name(&self) -> &str {
        "apache2"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.inner.configure(conf)
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        let Some(fields) = self.inner.named_captures(text) else {
            self.inner.trace_mismatch(text);
            return Ok(Vec::new());
        };

        let fields = fields.into_iter().map(|(key, value)| {
            let dash = value == "-" && DASH_NULL_FIELDS.contains(&key);
            (key, (!dash).then_some(value))
        });
        Ok(vec![self.inner.builder().build(fields)?])
    }

    fn estimate_current_event(&self) -> bool {
        self.inner.estimate_current_event()
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.inner.set_estimate_current_event(estimate);
    }
}

#[derive(Debug, Clone)]
pub struct ApacheErrorParser {
    inner: RegexpParser,
}

impl ApacheErrorParser {
    pub fn new() -> Result<Self, ConfigError> {
        let defaults = FormatDefaults::new(Some(APACHE_ERROR_TIME_FORMAT), "");
        Ok(Self {
            inner: RegexpParser::builtin("apache_error", pattern_index::APACHE_ERROR, defaults)?,
        })
    }
}

impl FormatParser for ApacheErrorParser {
    fn format_name(&self) -> &str {
        "apache_error"
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
