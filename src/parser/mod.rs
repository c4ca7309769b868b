pub mod event;
pub mod formats;
pub mod generated;
pub mod regex_error;
pub mod regex_patterns;
pub mod regexp;
pub mod registry;
pub mod text_parser;
pub mod time_parser;
pub mod types;

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};

pub use event::{EventBuilder, FormatDefaults};
pub use formats::{
    Apache2Parser, ApacheErrorParser, ApacheParser, DelimitedParser, JsonParser, LtsvParser,
    MultilineParser, NginxParser, NoneParser, SyslogParser,
};
pub use regexp::RegexpParser;
pub use registry::{FormatRegistry, ParserFactory};
pub use text_parser::TextParser;
pub use time_parser::TimeParser;
pub use types::{FieldType, TypeConverter, TypeSpec};

/// Capability shared by every format parser.
///
/// A parser is configured once and then used read-only, possibly from
/// several threads at a time.
pub trait FormatParser: Send + Sync {
    /// Registry name of the format (e.g. "apache2", "json").
    fn format_name(&self) -> &str;

    /// Applies options. Called once before any `parse`.
    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError>;

    /// Parses one (possibly multi-line) text into zero or more events.
    ///
    /// Text the format does not recognize yields an empty vector, not an error.
    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError>;

    fn estimate_current_event(&self) -> bool;

    fn set_estimate_current_event(&mut self, estimate: bool);

    /// Whether `line` starts a new multi-line record.
    /// `None` when the format has no boundary predicate.
    fn firstline(&self, _line: &str) -> Option<bool> {
        None
    }
}
