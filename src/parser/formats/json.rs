//! One JSON object per text.

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent, Record, TimeValue, Value};
use crate::parser::FormatParser;
use crate::parser::event::{EventBuilder, FormatDefaults};
use crate::parser::generated::{VALIDATED_PATTERNS, pattern_index};
use crate::parser::time_parser::scale_fraction;

const NANOS_PER_SEC: u32 = 1_000_000_000;

#[derive(Debug, Clone, Default)]
pub struct JsonParser {
    builder: EventBuilder,
}

impl JsonParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn parse_time(&self, value: &serde_json::Value) -> Result<TimeValue, ParseError> {
        match value {
            serde_json::Value::Number(number) => match number.as_i64() {
                Some(sec) => Ok(TimeValue::new(sec, 0)),
                None => number
                    .as_f64()
                    .and_then(TimeValue::from_epoch_f64)
                    .ok_or_else(|| ParseError::InvalidTime {
                        value: number.to_string(),
                        format: "epoch seconds".to_string(),
                        reason: "out of range".to_string(),
                    }),
            },
            serde_json::Value::String(text) => {
                let parser = self.builder.time_parser();
                if parser.format().is_some() {
                    return parser.parse(text);
                }
                match epoch_text(text) {
                    Some(time) => Ok(time),
                    None => parser.parse(text),
                }
            }
            _ => Err(ParseError::NonTextualTime),
        }
    }
}

/// Decimal epoch seconds written as text, e.g. `"1362020400"` or `"100.1"`.
fn epoch_text(text: &str) -> Option<TimeValue> {
    let regex = VALIDATED_PATTERNS.get(pattern_index::EPOCH_SECONDS).ok()?;
    let caps = regex.captures(text)?;
    let whole = caps.name("sec")?.as_str();
    let sec: i64 = whole.parse().ok()?;
    let nsec = caps.name("frac").map_or(0, |m| scale_fraction(m.as_str()));

    if whole.starts_with('-') && nsec > 0 {
        return Some(TimeValue::new(sec.checked_sub(1)?, NANOS_PER_SEC - nsec));
    }
    Some(TimeValue::new(sec, nsec))
}

impl FormatParser for JsonParser {
    fn format_name(&self) -> &str {
        "json"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.builder.configure(conf, &FormatDefaults::default())
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        // simd-json parses in place
        let mut bytes = text.as_bytes().to_vec();
        let value: serde_json::Value = simd_json::serde::from_slice(&mut bytes)?;
        let serde_json::Value::Object(object) = value else {
            return Err(ParseError::NotAnObject);
        };

        let mut time = None;
        let mut record = Record::new();
        for (key, value) in object {
            if key == self.builder.time_key() {
                time = Some(self.parse_time(&value)?);
                if !self.builder.keep_time_key() {
                    continue;
                }
            }

            let value = match value {
                serde_json::Value::String(raw) => self.builder.converter().convert(&key, &raw)?,
                other => Value::from(other),
            };
            record.insert(key, value);
        }

        Ok(vec![ParsedEvent::new(
            time.or_else(|| self.builder.fallback_time()),
            record,
        )])
    }

    fn estimate_current_event(&self) -> bool {
        self.builder.estimate_current_event()
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.builder.set_estimate_current_event(estimate);
    }
}
