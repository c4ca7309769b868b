//! Command-line driver: stdin lines in, one JSON event per line out.

pub mod cli;
pub mod logging;
pub mod reader;

pub use cli::{Cli, LogFormat, LogLevel};
pub use logging::init_logging;
pub use reader::LineAggregator;

use crate::domain::ParsedEvent;
use crate::parser::TextParser;
use anyhow::{Context, bail};
use clap::Parser;
use std::io::{self, BufRead, BufWriter, Write};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub events: usize,
    pub skipped: usize,
    pub failed: usize,
}

pub fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_format)?;

    let conf = cli
        .parser_config()
        .context("failed to load parser configuration")?;
    let mut parser = TextParser::new();
    parser
        .configure(&conf)
        .context("failed to configure parser")?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    let stats = process(&parser, stdin.lock(), BufWriter::new(stdout.lock()), cli.strict)?;

    tracing::info!(
        events = stats.events,
        skipped = stats.skipped,
        failed = stats.failed,
        "Finished parsing input"
    );
    Ok(())
}

/// Parses `input` line by line (reassembling multi-line records when the
/// format has a boundary) and writes each event as a JSON line.
pub fn process<R, W>(
    parser: &TextParser,
    input: R,
    mut output: W,
    strict: bool,
) -> anyhow::Result<RunStats>
where
    R: BufRead,
    W: Write,
{
    let mut stats = RunStats::default();
    let mut aggregator = LineAggregator::new();

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        match parser.firstline(&line) {
            Some(starts_record) => {
                if let Some(text) = aggregator.push(&line, starts_record) {
                    emit(parser, &text, &mut output, strict, &mut stats)?;
                }
            }
            None => emit(parser, &line, &mut output, strict, &mut stats)?,
        }
    }
    if let Some(text) = aggregator.finish() {
        emit(parser, &text, &mut output, strict, &mut stats)?;
    }

    output.flush()?;
    Ok(stats)
}

fn emit<W: Write>(
    parser: &TextParser,
    text: &str,
    output: &mut W,
    strict: bool,
    stats: &mut RunStats,
) -> anyhow::Result<()> {
    let mut events: Vec<ParsedEvent> = Vec::new();
    let count = match parser.parse_each(text, |event| events.push(event)) {
        Ok(count) => count,
        Err(e) if strict => return Err(e).context("failed to parse input"),
        Err(e) => {
            tracing::warn!(error = %e, "Skipping unparsable input");
            stats.failed += 1;
            return Ok(());
        }
    };

    if count == 0 {
        if strict {
            bail!("input does not match the configured format: {text}");
        }
        tracing::debug!(length = text.len(), "Skipping unmatched input");
        stats.skipped += 1;
        return Ok(());
    }

    for event in &events {
        serde_json::to_writer(&mut *output, event)?;
        output.write_all(b"\n")?;
    }
    stats.events += count;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParserConfig;
    use serde_json::{Value as Json, json};
    use std::io::Cursor;

    fn configured(conf: ParserConfig) -> TextParser {
        let mut parser = TextParser::new();
        parser.configure(&conf).unwrap();
        parser
    }

    fn output_lines(bytes: &[u8]) -> Vec<Json> {
        String::from_utf8(bytes.to_vec())
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn test_process_single_lines() {
        let parser = configured(
            ParserConfig::new()
                .with("format", "ltsv")
                .with("types", "req_id:integer"),
        );
        let input = "time:2013-02-28 12:00:00\thost:a\treq_id:1\nhost:b\treq_id:2\n";
        let mut output = Vec::new();

        let stats = process(&parser, Cursor::new(input), &mut output, false).unwrap();
        assert_eq!(stats.events, 2);

        let lines = output_lines(&output);
        assert_eq!(lines[0]["time"], json!({"sec": 1_362_052_800, "nsec": 0}));
        assert_eq!(lines[0]["record"], json!({"host": "a", "req_id": 1}));
        assert_eq!(lines[1]["record"]["host"], json!("b"));
    }

    #[test]
    fn test_process_reassembles_multiline_records() {
        let parser = configured(
            ParserConfig::new()
                .with("format", "multiline")
                .with("format_firstline", r"/\d{4}-\d{1,2}-\d{1,2}/")
                .with(
                    "format1",
                    r"/^(?<time>\d{4}-\d{1,2}-\d{1,2} \d{1,2}:\d{1,2}:\d{1,2}) \[(?<thread>.*)\] (?<level>[^\s]+)(?<message>.*)/",
                ),
        );
        let input = "2013-3-03 14:27:33 [main] ERROR Main - Exception\n\
                     javax.management.RuntimeErrorException: null\n\
                     \tat Main.main(Main.java:16) ~[bin/:na]\n\
                     2013-3-03 14:27:34 [main] INFO Main - Recovered\n";
        let mut output = Vec::new();

        let stats = process(&parser, Cursor::new(input), &mut output, false).unwrap();
        assert_eq!(stats.events, 2);

        let lines = output_lines(&output);
        assert_eq!(lines[0]["record"]["level"], json!("ERROR"));
        assert_eq!(
            lines[0]["record"]["message"],
            json!(" Main - Exception\njavax.management.RuntimeErrorException: null\n\tat Main.main(Main.java:16) ~[bin/:na]")
        );
        assert_eq!(lines[1]["record"]["level"], json!("INFO"));
    }

    #[test]
    fn test_process_skips_or_fails_on_unmatched_input() {
        let parser = configured(ParserConfig::new().with("format", "apache2"));

        let mut output = Vec::new();
        let stats = process(&parser, Cursor::new("garbage\n"), &mut output, false).unwrap();
        assert_eq!(stats, RunStats { events: 0, skipped: 1, failed: 0 });
        assert!(output.is_empty());

        let strict = process(&parser, Cursor::new("garbage\n"), Vec::new(), true);
        assert!(strict.is_err());
    }

    #[test]
    fn test_process_counts_parse_errors() {
        let parser = configured(ParserConfig::new().with("format", "json"));

        let mut output = Vec::new();
        let stats = process(
            &parser,
            Cursor::new("{\"a\":1}\nnot json\n[1]\n"),
            &mut output,
            false,
        )
        .unwrap();
        assert_eq!(stats.events, 1);
        assert_eq!(stats.failed, 2);

        assert!(process(&parser, Cursor::new("not json\n"), Vec::new(), true).is_err());
    }
}
