//! Textual timestamp to `TimeValue` conversion.
//!
//! Without a format the input is read as a loose ISO-8601 timestamp
//! (`YYYY-MM-DD HH:MM:SS[.fraction][ zone]`). With a format, chrono's
//! strptime directives apply, extended with `%N`: a run of digits scaled to
//! nanoseconds. Timestamps that carry no zone use the parser's default offset
//! (UTC unless configured).

use super::generated::{VALIDATED_PATTERNS, pattern_index};
use crate::domain::{ConfigError, ParseError, TimeValue, Value};
use chrono::format::{Item, Parsed, StrftimeItems};
use chrono::{Datelike, FixedOffset, NaiveDate, Offset, TimeZone, Utc};

const LOOSE_ISO_LABEL: &str = "loose ISO-8601";
const FRACTION_DIRECTIVE: &str = "%N";
const NANOS_DIGITS: usize = 9;

/// Directives that pin the year, so the current year must not be filled in.
const YEAR_DIRECTIVES: &[char] = &['Y', 'y', 'G', 'g', 'C', 'D', 'F', 'c', 'x', 's', '+'];

#[derive(Debug, Clone)]
struct TimeFormat {
    source: String,
    /// Format split around every `%N`.
    segments: Vec<String>,
    has_year: bool,
    has_epoch: bool,
}

impl TimeFormat {
    fn compile(source: &str) -> Result<Self, ConfigError> {
        let segments: Vec<String> = source
            .split(FRACTION_DIRECTIVE)
            .map(str::to_string)
            .collect();

        for segment in &segments {
            if StrftimeItems::new(segment).any(|item| matches!(item, Item::Error)) {
                return Err(ConfigError::invalid_option(
                    "time_format",
                    format!("unsupported directive in '{source}'"),
                ));
            }
        }

        let directives = directives(source);
        Ok(Self {
            source: source.to_string(),
            segments,
            has_year: directives.iter().any(|d| YEAR_DIRECTIVES.contains(d)),
            has_epoch: directives.contains(&'s'),
        })
    }
}

/// Conversion directives of a strftime format, ignoring padding modifiers.
fn directives(format: &str) -> Vec<char> {
    let mut found = Vec::new();
    let mut chars = format.chars();
    while let Some(c) = chars.next() {
        if c != '%' {
            continue;
        }
        for next in chars.by_ref() {
            if matches!(next, '-' | '_' | '#' | '.' | ':' | '0'..='9') {
                continue;
            }
            found.push(next);
            break;
        }
    }
    found
}

/// Scales a run of fractional-second digits to nanoseconds; digits past the ninth are dropped.
pub(crate) fn scale_fraction(digits: &str) -> u32 {
    let significant = &digits[..digits.len().min(NANOS_DIGITS)];
    let value: u32 = significant.parse().unwrap_or(0);
    value * 10_u32.pow((NANOS_DIGITS - significant.len()) as u32)
}

/// Parses `Z`, `UTC`, `GMT`, `+HH:MM` and `+HHMM` style offsets.
pub fn parse_offset(text: &str) -> Option<FixedOffset> {
    let text = text.trim();
    if matches!(text, "Z" | "z" | "UTC" | "utc" | "GMT" | "gmt") {
        return Some(Utc.fix());
    }

    let (sign, rest) = match text.as_bytes().first()? {
        b'+' => (1, &text[1..]),
        b'-' => (-1, &text[1..]),
        _ => return None,
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: i32 = digits[..2].parse().ok()?;
    let minutes: i32 = digits[2..].parse().ok()?;
    if minutes >= 60 {
        return None;
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}

#[derive(Debug, Clone)]
pub struct TimeParser {
    format: Option<TimeFormat>,
    default_offset: FixedOffset,
}

impl Default for TimeParser {
    fn default() -> Self {
        Self {
            format: None,
            default_offset: Utc.fix(),
        }
    }
}

impl TimeParser {
    /// Creates a parser; an unsupported strftime directive is a configuration error.
    pub fn new(format: Option<&str>) -> Result<Self, ConfigError> {
        Ok(Self {
            format: format.map(TimeFormat::compile).transpose()?,
            ..Self::default()
        })
    }

    /// Offset applied to timestamps that carry no zone of their own.
    pub fn with_default_offset(mut self, offset: FixedOffset) -> Self {
        self.default_offset = offset;
        self
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_ref().map(|f| f.source.as_str())
    }

    pub fn default_offset(&self) -> FixedOffset {
        self.default_offset
    }

    pub fn parse(&self, text: &str) -> Result<TimeValue, ParseError> {
        match &self.format {
            Some(format) => self.parse_with_format(format, text),
            None => self.parse_loose_iso(text),
        }
    }

    /// Parses a record value; only strings are accepted.
    pub fn parse_value(&self, value: &Value) -> Result<TimeValue, ParseError> {
        match value {
            Value::String(text) => self.parse(text),
            _ => Err(ParseError::NonTextualTime),
        }
    }

    fn parse_loose_iso(&self, text: &str) -> Result<TimeValue, ParseError> {
        let regex = VALIDATED_PATTERNS
            .get(pattern_index::ISO_LOOSE_TIMESTAMP)
            .map_err(|e| self.invalid(text, e.to_string()))?;
        let caps = regex.captures(text).ok_or_else(|| {
            self.invalid(text, "expected YYYY-MM-DD HH:MM:SS[.fraction][ zone]")
        })?;

        let number = |name: &str| -> u32 {
            caps.name(name)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0)
        };
        let year = caps
            .name("year")
            .and_then(|m| m.as_str().parse::<i32>().ok())
            .ok_or_else(|| self.invalid(text, "missing year"))?;

        let nanos = caps
            .name("fraction")
            .map_or(0, |m| scale_fraction(m.as_str()));
        let naive = NaiveDate::from_ymd_opt(year, number("month"), number("day"))
            .and_then(|date| {
                date.and_hms_nano_opt(number("hour"), number("minute"), number("second"), nanos)
            })
            .ok_or_else(|| self.invalid(text, "date or time out of range"))?;

        let offset = match caps.name("zone") {
            Some(zone) => parse_offset(zone.as_str())
                .ok_or_else(|| self.invalid(text, "invalid zone offset"))?,
            None => self.default_offset,
        };

        offset
            .from_local_datetime(&naive)
            .single()
            .map(TimeValue::from)
            .ok_or_else(|| self.invalid(text, "ambiguous local time"))
    }

    fn parse_with_format(&self, format: &TimeFormat, text: &str) -> Result<TimeValue, ParseError> {
        let mut parsed = Parsed::new();
        let mut rest = text;
        let last = format.segments.len().saturating_sub(1);

        for (i, segment) in format.segments.iter().enumerate() {
            if i == last {
                chrono::format::parse(&mut parsed, rest, StrftimeItems::new(segment))
                    .map_err(|e| self.invalid(text, e.to_string()))?;
                break;
            }

            rest = chrono::format::parse_and_remainder(&mut parsed, rest, StrftimeItems::new(segment))
                .map_err(|e| self.invalid(text, e.to_string()))?;
            let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
            if digits == 0 {
                return Err(self.invalid(text, "expected fractional digits for %N"));
            }
            parsed
                .set_nanosecond(i64::from(scale_fraction(&rest[..digits])))
                .map_err(|e| self.invalid(text, e.to_string()))?;
            rest = &rest[digits..];
        }

        if !format.has_year {
            let year = Utc::now().with_timezone(&self.default_offset).year();
            parsed
                .set_year(i64::from(year))
                .map_err(|e| self.invalid(text, e.to_string()))?;
        }

        if let Ok(datetime) = parsed.to_datetime() {
            return Ok(TimeValue::from(datetime));
        }

        // No offset in the input: epoch timestamps are UTC, wall-clock times use the default.
        let offset = if format.has_epoch {
            Utc.fix()
        } else {
            self.default_offset
        };
        let naive = parsed
            .to_naive_datetime_with_offset(0)
            .map_err(|e| self.invalid(text, e.to_string()))?;
        offset
            .from_local_datetime(&naive)
            .single()
            .map(TimeValue::from)
            .ok_or_else(|| self.invalid(text, "ambiguous local time"))
    }

    fn invalid(&self, value: &str, reason: impl Into<String>) -> ParseError {
        ParseError::InvalidTime {
            value: value.to_string(),
            format: self.format().unwrap_or(LOOSE_ISO_LABEL).to_string(),
            reason: reason.into(),
        }
    }
}
