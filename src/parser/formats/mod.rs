//! Built-in formats.

mod apache;
mod delimited;
mod json;
mod ltsv;
mod multiline;
mod nginx;
mod none;
mod syslog;

pub use apache::{
    APACHE_ERROR_TIME_FORMAT, APACHE_TIME_FORMAT, Apache2Parser, ApacheErrorParser, ApacheParser,
};
pub use delimited::{DelimitedParser, Dialect};
pub use json::JsonParser;
pub use ltsv::LtsvParser;
pub use multiline::{FIRSTLINE_KEY, MAX_FRAGMENTS, MultilineParser};
pub use nginx::NginxParser;
pub use none::{DEFAULT_MESSAGE_KEY, NoneParser};
pub use syslog::{SYSLOG_TIME_FORMAT, SyslogParser};
