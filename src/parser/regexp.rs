//! Generic pattern parser: named capture groups become record fields.

use super::FormatParser;
use super::event::{EventBuilder, FormatDefaults};
use super::generated::VALIDATED_PATTERNS;
use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use regex::Regex;

pub const REGEXP_FORMAT_NAME: &str = "regexp";

/// Inner text of a `/pattern/` value.
pub fn strip_slashes(value: &str) -> Option<&str> {
    value.strip_prefix('/')?.strip_suffix('/')
}

pub(crate) fn compile_pattern(key: &str, pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
        key: key.to_string(),
        source,
    })
}

#[derive(Debug, Clone)]
pub struct RegexpParser {
    name: String,
    regex: Regex,
    defaults: FormatDefaults,
    builder: EventBuilder,
}

impl RegexpParser {
    /// Compiles a user pattern.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let regex = compile_pattern("format", pattern)?;
        Ok(Self::from_regex(
            REGEXP_FORMAT_NAME,
            regex,
            FormatDefaults::default(),
        ))
    }

    pub fn from_regex(name: &str, regex: Regex, defaults: FormatDefaults) -> Self {
        Self {
            name: name.to_string(),
            regex,
            defaults,
            builder: EventBuilder::default(),
        }
    }

    /// Uses one of the build-time validated patterns.
    pub fn builtin(name: &str, index: usize, defaults: FormatDefaults) -> Result<Self, ConfigError> {
        let regex = VALIDATED_PATTERNS.get(index).map_err(|error| {
            tracing::error!(
                format = name,
                pattern = error.pattern_name().unwrap_or("<unknown>"),
                error = %error,
                "Built-in pattern unavailable"
            );
            error
        })?;
        Ok(Self::from_regex(name, regex.clone(), defaults))
    }

    pub(crate) fn replace_pattern(&mut self, regex: Regex, defaults: FormatDefaults) {
        self.regex = regex;
        self.defaults = defaults;
    }

    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    pub fn defaults(&self) -> &FormatDefaults {
        &self.defaults
    }

    pub fn builder(&self) -> &EventBuilder {
        &self.builder
    }

    /// Participating named groups of the first match, in pattern order.
    pub fn named_captures<'a>(&'a self, text: &'a str) -> Option<Vec<(&'a str, &'a str)>> {
        let caps = self.regex.captures(text)?;
        Some(
            self.regex
                .capture_names()
                .flatten()
                .filter_map(|name| caps.name(name).map(|m| (name, m.as_str())))
                .collect(),
        )
    }

    pub(crate) fn trace_mismatch(&self, text: &str) {
        tracing::trace!(
            format = %self.name,
            length = text.len(),
            "Text did not match format pattern"
        );
    }
}

impl FormatParser for RegexpParser {
    fn format_name(&self) -> &str {
        &self.name
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.builder.configure(conf, &self.defaults)
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        let Some(fields) = self.named_captures(text) else {
            self.trace_mismatch(text);
            return Ok(Vec::new());
        };

        let event = self
            .builder
            .build(fields.into_iter().map(|(key, value)| (key, Some(value))))?;
        Ok(vec![event])
    }

    fn estimate_current_event(&self) -> bool {
        self.builder.estimate_current_event()
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.builder.set_estimate_current_event(estimate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, TimeValue, Value};
    use crate::parser::regex_error::RegexError;
    use chrono::{FixedOffset, TimeZone};

    const APACHE_LIKE: &str = r#"^(?<host>[^ ]*) [^ ]* (?<user>[^ ]*) \[(?<time>[^\]]*)\] \[(?<date>[^\]]*)\] "(?<flag>\S+)(?: +(?<path>[^ ]*) +\S*)?" (?<code>[^ ]*) (?<size>[^ ]*)$"#;
    const LINE: &str = r#"192.168.0.1 - - [28/Feb/2013:12:00:00 +0900] [14/Feb/2013:12:00:00 +0900] "true /,/user HTTP/1.1" 200 777"#;

    fn feb_28_noon_jst() -> TimeValue {
        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        TimeValue::from(offset.with_ymd_and_hms(2013, 2, 28, 12, 0, 0).unwrap())
    }

    #[test]
    fn test_typed_fields() {
        let mut parser = RegexpParser::new(APACHE_LIKE).unwrap();
        parser
            .configure(
                &ParserConfig::new()
                    .with("time_format", "%d/%b/%Y:%H:%M:%S %z")
                    .with(
                        "types",
                        "user:string,date:time:%d/%b/%Y:%H:%M:%S %z,flag:bool,path:array,code:float,size:integer",
                    ),
            )
            .unwrap();

        let events = parser.parse(LINE).unwrap();
        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.time, Some(feb_28_noon_jst()));

        let offset = FixedOffset::east_opt(9 * 3600).unwrap();
        let date = TimeValue::from(offset.with_ymd_and_hms(2013, 2, 14, 12, 0, 0).unwrap());
        let expected = Record::from([
            ("user", Value::from("-")),
            ("flag", Value::Bool(true)),
            ("code", Value::Float(200.0)),
            ("size", Value::Integer(777)),
            ("date", Value::Time(date)),
            ("host", Value::from("192.168.0.1")),
            ("path", Value::Array(vec!["/".to_string(), "/user".to_string()])),
        ]);
        assert_eq!(event.record, expected);
    }

    #[test]
    fn test_no_match_is_empty() {
        let parser = RegexpParser::new(APACHE_LIKE).unwrap();
        assert!(parser.parse("garbage").unwrap().is_empty());
    }

    #[test]
    fn test_non_participating_groups_are_absent() {
        let parser = RegexpParser::new(r"^(?<a>\w+)(?: (?<b>\w+))?$").unwrap();
        let events = parser.parse("alpha").unwrap();
        assert_eq!(events[0].record, Record::from([("a", "alpha")]));
    }

    #[test]
    fn test_keep_time_key() {
        let mut parser = RegexpParser::new(APACHE_LIKE).unwrap();
        parser
            .configure(
                &ParserConfig::new()
                    .with("time_format", "%d/%b/%Y:%H:%M:%S %z")
                    .with("keep_time_key", "true"),
            )
            .unwrap();

        let events = parser.parse(LINE).unwrap();
        assert_eq!(
            events[0].record.get("time"),
            Some(&Value::from("28/Feb/2013:12:00:00 +0900"))
        );
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            RegexpParser::new("(?<open"),
            Err(ConfigError::InvalidPattern { .. })
        ));
    }

    #[test]
    fn test_builtin_index_out_of_range() {
        let result = RegexpParser::builtin("apache2", VALIDATED_PATTERNS.len(), FormatDefaults::default());
        assert!(matches!(
            result,
            Err(ConfigError::Pattern(RegexError::IndexOutOfBounds { .. }))
        ));
    }

    #[test]
    fn test_strip_slashes() {
        assert_eq!(strip_slashes("/^(?<a>.*)$/"), Some("^(?<a>.*)$"));
        assert_eq!(strip_slashes("//"), Some(""));
        assert_eq!(strip_slashes("/"), None);
        assert_eq!(strip_slashes("apache2"), None);
    }
}
