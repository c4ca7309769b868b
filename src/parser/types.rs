//! Field type declarations and raw-string casting.
//!
//! A type spec reads `field:type[:arg]` entries joined by a field delimiter,
//! e.g. `code:integer,date:time:%d/%b/%Y,path:array:|`.

use super::generated::{VALIDATED_PATTERNS, pattern_index};
use super::time_parser::TimeParser;
use crate::domain::{ConfigError, ParseError, Value};
use chrono::FixedOffset;
use regex::Regex;

pub const DEFAULT_FIELD_DELIMITER: &str = ",";
pub const DEFAULT_TYPE_DELIMITER: &str = ":";
pub const DEFAULT_ARRAY_DELIMITER: &str = ",";

#[derive(Debug, Clone)]
pub enum FieldType {
    String,
    Integer,
    Float,
    Bool,
    Time(TimeParser),
    Array { delimiter: String },
}

impl FieldType {
    fn from_parts(tag: &str, arg: Option<&str>) -> Result<Self, String> {
        match tag {
            "string" => Ok(FieldType::String),
            "integer" => Ok(FieldType::Integer),
            "float" => Ok(FieldType::Float),
            "bool" => Ok(FieldType::Bool),
            "time" => TimeParser::new(arg)
                .map(FieldType::Time)
                .map_err(|e| e.to_string()),
            "array" => Ok(FieldType::Array {
                delimiter: arg.unwrap_or(DEFAULT_ARRAY_DELIMITER).to_string(),
            }),
            other => Err(format!("unknown type '{other}'")),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
            FieldType::Float => "float",
            FieldType::Bool => "bool",
            FieldType::Time(_) => "time",
            FieldType::Array { .. } => "array",
        }
    }
}

/// Ordered field name to type mapping.
#[derive(Debug, Clone, Default)]
pub struct TypeSpec {
    fields: Vec<(String, FieldType)>,
}

impl TypeSpec {
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        Self::parse_with(spec, DEFAULT_FIELD_DELIMITER, DEFAULT_TYPE_DELIMITER)
    }

    pub fn parse_with(
        spec: &str,
        field_delimiter: &str,
        type_delimiter: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidTypeSpec {
            spec: spec.to_string(),
            reason,
        };
        if field_delimiter.is_empty() || type_delimiter.is_empty() {
            return Err(invalid("delimiters must not be empty".to_string()));
        }

        let mut types = TypeSpec::default();
        for entry in spec.split(field_delimiter) {
            if entry.trim().is_empty() {
                continue;
            }

            let mut parts = entry.splitn(3, type_delimiter);
            let name = parts.next().map(str::trim).unwrap_or_default();
            if name.is_empty() {
                return Err(invalid(format!("empty field name in '{entry}'")));
            }
            let tag = parts
                .next()
                .map(str::trim)
                .filter(|tag| !tag.is_empty())
                .ok_or_else(|| invalid(format!("missing type for field '{name}'")))?;

            let field_type = FieldType::from_parts(tag, parts.next()).map_err(invalid)?;
            types.insert(name, field_type);
        }

        Ok(types)
    }

    pub fn insert(&mut self, field: &str, field_type: FieldType) {
        match self.fields.iter_mut().find(|(name, _)| name == field) {
            Some((_, existing)) => *existing = field_type,
            None => self.fields.push((field.to_string(), field_type)),
        }
    }

    pub fn get(&self, field: &str) -> Option<&FieldType> {
        self.fields
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, field_type)| field_type)
    }

    /// Overlays `other`; its declarations replace existing ones.
    pub fn merge(&mut self, other: TypeSpec) {
        for (name, field_type) in other.fields {
            self.insert(&name, field_type);
        }
    }

    /// Applies a default offset to every `time` field.
    pub fn with_default_offset(mut self, offset: FixedOffset) -> Self {
        for (_, field_type) in &mut self.fields {
            if let FieldType::Time(parser) = field_type {
                *parser = parser.clone().with_default_offset(offset);
            }
        }
        self
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Null handling plus type casting for raw captured strings.
#[derive(Debug, Clone, Default)]
pub struct TypeConverter {
    types: TypeSpec,
    null_pattern: Option<Regex>,
    null_empty_string: bool,
    strict: bool,
}

impl TypeConverter {
    pub fn new(types: TypeSpec) -> Self {
        Self {
            types,
            ..Self::default()
        }
    }

    /// Values fully matching `pattern` become null.
    pub fn with_null_pattern(mut self, pattern: &str) -> Result<Self, ConfigError> {
        let anchored = format!("^(?:{pattern})$");
        let regex = Regex::new(&anchored).map_err(|source| ConfigError::InvalidPattern {
            key: "null_value_pattern".to_string(),
            source,
        })?;
        self.null_pattern = Some(regex);
        Ok(self)
    }

    pub fn with_null_empty_string(mut self, enabled: bool) -> Self {
        self.null_empty_string = enabled;
        self
    }

    /// Failed integer/float casts become errors instead of 0.
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn types(&self) -> &TypeSpec {
        &self.types
    }

    pub fn is_null(&self, raw: &str) -> bool {
        (self.null_empty_string && raw.is_empty())
            || self
                .null_pattern
                .as_ref()
                .is_some_and(|pattern| pattern.is_match(raw))
    }

    pub fn convert(&self, field: &str, raw: &str) -> Result<Value, ParseError> {
        if self.is_null(raw) {
            return Ok(Value::Null);
        }

        let Some(field_type) = self.types.get(field) else {
            return Ok(Value::from(raw));
        };

        match field_type {
            FieldType::String => Ok(Value::from(raw)),
            FieldType::Integer => self.to_integer(field, raw).map(Value::Integer),
            FieldType::Float => self.to_float(field, raw).map(Value::Float),
            FieldType::Bool => self.to_bool(field, raw).map(Value::Bool),
            FieldType::Time(parser) => parser.parse(raw).map(Value::Time),
            FieldType::Array { delimiter } => Ok(Value::Array(split_array(raw, delimiter))),
        }
    }

    fn to_integer(&self, field: &str, raw: &str) -> Result<i64, ParseError> {
        if self.strict {
            return raw
                .trim()
                .parse()
                .map_err(|_| invalid_cast(field, raw, "integer"));
        }
        Ok(lenient_prefix(raw, pattern_index::INTEGER_PREFIX)
            .and_then(|digits| digits.parse().ok())
            .unwrap_or(0))
    }

    fn to_float(&self, field: &str, raw: &str) -> Result<f64, ParseError> {
        if self.strict {
            return raw
                .trim()
                .parse()
                .map_err(|_| invalid_cast(field, raw, "float"));
        }
        Ok(lenient_prefix(raw, pattern_index::FLOAT_PREFIX)
            .and_then(|number| number.parse().ok())
            .unwrap_or(0.0))
    }

    fn to_bool(&self, field: &str, raw: &str) -> Result<bool, ParseError> {
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if !self.strict || raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(invalid_cast(field, raw, "bool"))
        }
    }
}

/// Leading numeric portion of `raw`, if any.
fn lenient_prefix(raw: &str, index: usize) -> Option<&str> {
    let regex = VALIDATED_PATTERNS.get(index).ok()?;
    regex.find(raw).map(|m| m.as_str().trim_start())
}

fn split_array(raw: &str, delimiter: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }
    raw.split(delimiter).map(str::to_string).collect()
}

fn invalid_cast(field: &str, raw: &str, target: &'static str) -> ParseError {
    ParseError::InvalidCast {
        field: field.to_string(),
        value: raw.to_string(),
        target,
    }
}
