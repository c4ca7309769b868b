use super::cli::{LogFormat, LogLevel};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(level: LogLevel) -> String {
    format!("rask_log_parser={}", level.as_str())
}

/// Installs the global subscriber; diagnostics go to stderr so stdout stays pure JSON.
pub fn init_logging(level: LogLevel, format: LogFormat) -> anyhow::Result<()> {
    let env_filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(default_directive(level))?,
    };
    let registry = tracing_subscriber::registry().with(env_filter);

    match format {
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(false)
                    .compact(),
            )
            .try_init()?,
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_current_span(false),
            )
            .try_init()?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_directive_is_valid_filter() {
        for level in [LogLevel::Error, LogLevel::Warn, LogLevel::Trace] {
            let directive = default_directive(level);
            assert!(EnvFilter::try_new(&directive).is_ok(), "{directive}");
        }
        assert_eq!(default_directive(LogLevel::Info), "rask_log_parser=info");
    }
}
