//! Domain layer for rask-log-parser.
//!
//! Contains the canonical types shared across all modules:
//! - `TimeValue`: event timestamp with nanosecond resolution
//! - `Value` / `Record`: the structured fields extracted from a log line
//! - `ParsedEvent`: the (timestamp, record) pair emitted by every parser
//! - `ConfigError` / `ParseError`: configure-time and parse-time failures

pub mod error;
pub mod record;
pub mod time;

pub use error::{ConfigError, ParseError};
pub use record::{ParsedEvent, Record, Value};
pub use time::TimeValue;
