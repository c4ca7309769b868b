use crate::parser::regex_error::RegexError;
use thiserror::Error;

/// Invalid or missing configuration, discovered while configuring a parser.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Missing required option: {0}")]
    MissingOption(String),

    #[error("Unknown format '{name}' (known formats: {known})")]
    UnknownFormat { name: String, known: String },

    #[error("Invalid value for option '{key}': {reason}")]
    InvalidOption { key: String, reason: String },

    #[error("Invalid type spec '{spec}': {reason}")]
    InvalidTypeSpec { spec: String, reason: String },

    #[error("Invalid regexp in '{key}': {source}")]
    InvalidPattern {
        key: String,
        #[source]
        source: regex::Error,
    },

    #[error("Invalid multiline format: {0}")]
    InvalidMultiline(String),

    #[error("Built-in pattern unavailable: {0}")]
    Pattern(#[from] RegexError),

    #[error("File error: {0}")]
    FileError(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    TomlError(#[from] toml::de::Error),
}

impl ConfigError {
    pub(crate) fn invalid_option(key: &str, reason: impl Into<String>) -> Self {
        ConfigError::InvalidOption {
            key: key.to_string(),
            reason: reason.into(),
        }
    }
}

/// Data-shape failure discovered while parsing a line.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("time value must be textual")]
    NonTextualTime,

    #[error("Invalid time '{value}' (format: {format}): {reason}")]
    InvalidTime {
        value: String,
        format: String,
        reason: String,
    },

    #[error("JSON parse error: {0}")]
    JsonError(#[from] simd_json::Error),

    #[error("CSV parse error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON payload is not an object")]
    NotAnObject,

    #[error("Cannot cast field '{field}' value '{value}' to {target}")]
    InvalidCast {
        field: String,
        value: String,
        target: &'static str,
    },

    #[error("Parser is not configured")]
    NotConfigured,
}
