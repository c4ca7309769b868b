//! Options shared by every concrete parser and the field-to-event step they all end with.

use super::time_parser::{TimeParser, parse_offset};
use super::types::{DEFAULT_FIELD_DELIMITER, DEFAULT_TYPE_DELIMITER, TypeConverter, TypeSpec};
use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent, Record, TimeValue, Value};
use chrono::{FixedOffset, Offset, Utc};

pub const DEFAULT_TIME_KEY: &str = "time";

/// Per-format defaults layered under user options.
#[derive(Debug, Clone, Copy, Default)]
pub struct FormatDefaults {
    pub time_format: Option<&'static str>,
    /// Type spec merged under the user's `types`.
    pub types: &'static str,
}

impl FormatDefaults {
    pub const fn new(time_format: Option<&'static str>, types: &'static str) -> Self {
        Self { time_format, types }
    }
}

/// Turns named raw fields into a `ParsedEvent`: time extraction, null handling, casting.
#[derive(Debug, Clone)]
pub struct EventBuilder {
    time_key: String,
    keep_time_key: bool,
    time_parser: TimeParser,
    converter: TypeConverter,
    estimate_current_event: bool,
}

impl Default for EventBuilder {
    fn default() -> Self {
        Self {
            time_key: DEFAULT_TIME_KEY.to_string(),
            keep_time_key: false,
            time_parser: TimeParser::default(),
            converter: TypeConverter::default(),
            estimate_current_event: true,
        }
    }
}

impl EventBuilder {
    pub fn configure(
        &mut self,
        conf: &ParserConfig,
        defaults: &FormatDefaults,
    ) -> Result<(), ConfigError> {
        let offset = default_offset(conf)?;

        let time_format = conf
            .text("time_format")?
            .or_else(|| defaults.time_format.map(str::to_string));
        self.time_parser = TimeParser::new(time_format.as_deref())?.with_default_offset(offset);
        self.time_key = conf
            .text("time_key")?
            .unwrap_or_else(|| DEFAULT_TIME_KEY.to_string());
        self.keep_time_key = conf.flag("keep_time_key")?.unwrap_or(false);

        let field_delimiter = conf
            .text("types_delimiter")?
            .unwrap_or_else(|| DEFAULT_FIELD_DELIMITER.to_string());
        let type_delimiter = conf
            .text("types_label_delimiter")?
            .unwrap_or_else(|| DEFAULT_TYPE_DELIMITER.to_string());
        let mut types = TypeSpec::parse(defaults.types)?;
        if let Some(user_types) = conf.text("types")? {
            types.merge(TypeSpec::parse_with(
                &user_types,
                &field_delimiter,
                &type_delimiter,
            )?);
        }

        let mut converter = TypeConverter::new(types.with_default_offset(offset))
            .with_null_empty_string(conf.flag("null_empty_string")?.unwrap_or(false))
            .with_strict(conf.flag("strict_types")?.unwrap_or(false));
        if let Some(pattern) = conf.text("null_value_pattern")? {
            converter = converter.with_null_pattern(&pattern)?;
        }
        self.converter = converter;

        if let Some(estimate) = conf.flag("estimate_current_event")? {
            self.estimate_current_event = estimate;
        }

        Ok(())
    }

    pub fn time_key(&self) -> &str {
        &self.time_key
    }

    pub fn keep_time_key(&self) -> bool {
        self.keep_time_key
    }

    pub fn time_parser(&self) -> &TimeParser {
        &self.time_parser
    }

    pub fn converter(&self) -> &TypeConverter {
        &self.converter
    }

    pub fn estimate_current_event(&self) -> bool {
        self.estimate_current_event
    }

    pub fn set_estimate_current_event(&mut self, estimate: bool) {
        self.estimate_current_event = estimate;
    }

    /// Timestamp for events that carry none of their own.
    pub fn fallback_time(&self) -> Option<TimeValue> {
        self.estimate_current_event.then(TimeValue::now)
    }

    /// Builds an event from named raw fields. A `None` value is already null
    /// and skips time parsing and casting.
    pub fn build<'a, I>(&self, fields: I) -> Result<ParsedEvent, ParseError>
    where
        I: IntoIterator<Item = (&'a str, Option<&'a str>)>,
    {
        let mut time = None;
        let mut record = Record::new();

        for (key, raw) in fields {
            let Some(raw) = raw else {
                record.insert(key, Value::Null);
                continue;
            };

            if key == self.time_key {
                time = Some(self.time_parser.parse(raw)?);
                if !self.keep_time_key {
                    continue;
                }
            }
            record.insert(key, self.converter.convert(key, raw)?);
        }

        Ok(ParsedEvent::new(
            time.or_else(|| self.fallback_time()),
            record,
        ))
    }
}

fn default_offset(conf: &ParserConfig) -> Result<FixedOffset, ConfigError> {
    match conf.text("timezone")? {
        Some(zone) => parse_offset(&zone).ok_or_else(|| {
            ConfigError::invalid_option("timezone", format!("unsupported offset '{zone}'"))
        }),
        None => Ok(Utc.fix()),
    }
}
