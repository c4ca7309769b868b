#![deny(rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
// Noisy pedantic lints suppressed with justification:
#![allow(
    clippy::cast_possible_truncation, // Fraction digits and nanos stay within u32
    clippy::cast_possible_wrap,       // Epoch seconds fit in i64
    clippy::cast_precision_loss,      // Epoch range checks on f64
    clippy::cast_sign_loss,           // Rounded nanos are non-negative
    clippy::missing_errors_doc,       // Error enums document themselves
    clippy::module_name_repetitions,  // e.g. ParserConfig in config module
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

pub mod app;
pub mod config;
pub mod domain;
pub mod parser;

// Re-export main types for easy access
pub use config::{OptionValue, ParserConfig};
pub use domain::{ConfigError, ParseError, ParsedEvent, Record, TimeValue, Value};
pub use parser::{FormatParser, FormatRegistry, TextParser};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
