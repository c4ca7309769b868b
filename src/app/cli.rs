use crate::config::ParserConfig;
use crate::domain::ConfigError;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogLevel {
    Error,
    #[default]
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Parse log lines from stdin into JSON events on stdout.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Format name (apache2, syslog, json, ...) or an inline /pattern/
    #[arg(long, env = "RASK_PARSER_FORMAT")]
    pub format: Option<String>,

    /// TOML file holding parser options (top level or a [parser] table)
    #[arg(long, env = "RASK_PARSER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Extra parser option as key=value; may be repeated
    #[arg(long = "option", short = 'o', value_name = "KEY=VALUE")]
    pub options: Vec<String>,

    /// Log level for diagnostics written to stderr
    #[arg(long, env = "LOG_LEVEL", value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Diagnostic output style
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Fail on the first text that does not match or cannot be parsed
    #[arg(long)]
    pub strict: bool,
}

impl Cli {
    /// Merges the config file, `--option` pairs and `--format`, later sources winning.
    pub fn parser_config(&self) -> Result<ParserConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => ParserConfig::from_file(path)?,
            None => ParserConfig::new(),
        };

        for option in &self.options {
            let (key, value) = option.split_once('=').ok_or_else(|| {
                ConfigError::invalid_option(option, "expected KEY=VALUE")
            })?;
            let key = key.trim();
            if key.is_empty() {
                return Err(ConfigError::invalid_option(option, "empty option name"));
            }
            config.set(key, value);
        }

        if let Some(format) = &self.format {
            config.set("format", format.as_str());
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_options_and_format() {
        let cli = Cli::try_parse_from([
            "rask-log-parser",
            "--format",
            "tsv",
            "--option",
            "keys=time,host",
            "-o",
            "time_format=%Y/%m/%d %H:%M:%S",
            "--strict",
        ])
        .unwrap();

        assert!(cli.strict);
        let config = cli.parser_config().unwrap();
        assert_eq!(config.text("format").unwrap().as_deref(), Some("tsv"));
        assert_eq!(
            config.list("keys").unwrap(),
            Some(vec!["time".to_string(), "host".to_string()])
        );
        assert_eq!(
            config.text("time_format").unwrap().as_deref(),
            Some("%Y/%m/%d %H:%M:%S")
        );
    }

    #[test]
    fn test_malformed_option() {
        let cli = Cli::try_parse_from(["rask-log-parser", "-o", "keys"]).unwrap();
        assert!(matches!(
            cli.parser_config(),
            Err(ConfigError::InvalidOption { .. })
        ));
    }

    #[test]
    fn test_config_file_is_overridden_by_flags() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[parser]\nformat = \"csv\"\nkeys = [\"a\", \"b\"]\ndelimiter = \";\"").unwrap();

        let path = file.path().to_string_lossy().to_string();
        let cli = Cli::try_parse_from([
            "rask-log-parser",
            "--config",
            path.as_str(),
            "-o",
            "delimiter=|",
        ])
        .unwrap();

        let config = cli.parser_config().unwrap();
        assert_eq!(config.text("format").unwrap().as_deref(), Some("csv"));
        assert_eq!(config.text("delimiter").unwrap().as_deref(), Some("|"));
    }

    #[test]
    fn test_log_level_names() {
        let cli = Cli::try_parse_from(["rask-log-parser", "--log-level", "debug"]).unwrap();
        assert_eq!(cli.log_level, LogLevel::Debug);
        assert_eq!(cli.log_level.as_str(), "debug");
        assert_eq!(tracing::Level::from(cli.log_level), tracing::Level::DEBUG);
    }

    #[test]
    fn test_log_format_choice() {
        let cli = Cli::try_parse_from(["rask-log-parser", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_format, LogFormat::Json);
        assert!(Cli::try_parse_from(["rask-log-parser", "--log-format", "xml"]).is_err());
    }
}
