//! BSD syslog (RFC 3164 style) lines, optionally prefixed with `<PRI>`.

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use crate::parser::FormatParser;
use crate::parser::event::FormatDefaults;
use crate::parser::generated::{VALIDATED_PATTERNS, pattern_index};
use crate::parser::regexp::RegexpParser;

pub const SYSLOG_TIME_FORMAT: &str = "%b %d %H:%M:%S";

const PLAIN: FormatDefaults = FormatDefaults::new(Some(SYSLOG_TIME_FORMAT), "");
const WITH_PRIORITY: FormatDefaults = FormatDefaults::new(Some(SYSLOG_TIME_FORMAT), "pri:integer");

#[derive(Debug, Clone)]
pub struct SyslogParser {
    inner: RegexpParser,
    with_priority: bool,
}

impl SyslogParser {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(Self {
            inner: RegexpParser::builtin("syslog", pattern_index::SYSLOG, PLAIN)?,
            with_priority: false,
        })
    }

    pub fn with_priority(&self) -> bool {
        self.with_priority
    }
}

impl FormatParser for SyslogParser {
    fn format_name(&self) -> &str {
        "syslog"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.with_priority = conf.flag("with_priority")?.unwrap_or(false);
        let (index, defaults) = if self.with_priority {
            (pattern_index::SYSLOG_WITH_PRI, WITH_PRIORITY)
        } else {
            (pattern_index::SYSLOG, PLAIN)
        };

        let regex = VALIDATED_PATTERNS.get(index)?.clone();
        self.inner.replace_pattern(regex, defaults);
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
