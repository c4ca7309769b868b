//! Positional formats: tab-separated and comma-separated values.

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use crate::parser::FormatParser;
use crate::parser::event::{EventBuilder, FormatDefaults};
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// Plain split, no quoting.
    Tsv,
    /// Double-quoted cells with `""` escapes.
    Csv,
}

impl Dialect {
    pub fn name(&self) -> &'static str {
        match self {
            Dialect::Tsv => "tsv",
            Dialect::Csv => "csv",
        }
    }

    pub fn default_delimiter(&self) -> &'static str {
        match self {
            Dialect::Tsv => "\t",
            Dialect::Csv => ",",
        }
    }
}

#[derive(Debug, Clone)]
pub struct DelimitedParser {
    dialect: Dialect,
    delimiter: String,
    keys: Vec<String>,
    builder: EventBuilder,
}

impl DelimitedParser {
    pub fn new(dialect: Dialect) -> Self {
        Self {
            dialect,
            delimiter: dialect.default_delimiter().to_string(),
            keys: Vec::new(),
            builder: EventBuilder::default(),
        }
    }

    pub fn tsv() -> Self {
        Self::new(Dialect::Tsv)
    }

    pub fn csv() -> Self {
        Self::new(Dialect::Csv)
    }

    pub fn dialect(&self) -> Dialect {
        self.dialect
    }

    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    pub fn keys(&self) -> &[String] {
        &self.keys
    }

    fn split<'a>(&self, text: &'a str) -> Result<Vec<Cow<'a, str>>, ParseError> {
        match self.dialect {
            Dialect::Tsv => Ok(text
                .split(self.delimiter.as_str())
                .map(Cow::Borrowed)
                .collect()),
            Dialect::Csv => {
                // configure guarantees a single-byte delimiter
                let delimiter = self.delimiter.as_bytes().first().copied().unwrap_or(b',');
                let mut reader = csv::ReaderBuilder::new()
                    .delimiter(delimiter)
                    .has_headers(false)
                    .flexible(true)
                    .from_reader(text.as_bytes());

                let mut record = csv::StringRecord::new();
                if !reader.read_record(&mut record)? {
                    return Ok(Vec::new());
                }
                Ok(record
                    .iter()
                    .map(|cell| Cow::Owned(cell.to_string()))
                    .collect())
            }
        }
    }
}

impl FormatParser for DelimitedParser {
    fn format_name(&self) -> &str {
        self.dialect.name()
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        self.keys = conf
            .list("keys")?
            .ok_or_else(|| ConfigError::MissingOption("keys".to_string()))?;
        if let Some(delimiter) = conf.text("delimiter")? {
            if delimiter.is_empty() {
                return Err(ConfigError::invalid_option("delimiter", "must not be empty"));
            }
            if self.dialect == Dialect::Csv && delimiter.len() != 1 {
                return Err(ConfigError::invalid_option(
                    "delimiter",
                    format!("csv needs a single-byte delimiter, got '{delimiter}'"),
                ));
            }
            self.delimiter = delimiter;
        }
        self.builder.configure(conf, &FormatDefaults::default())
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        let cells = self.split(text)?;
        let fields = self
            .keys
            .iter()
            .zip(cells.iter())
            .map(|(key, cell)| (key.as_str(), Some(cell.as_ref())));

        Ok(vec![self.builder.build(fields)?])
    }

    fn estimate_current_event(&self) -> bool {
        self.builder.estimate_current_event()
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.builder.set_estimate_current_event(estimate);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Record, TimeValue, Value};

    fn configured(mut parser: DelimitedParser, conf: ParserConfig) -> DelimitedParser {
        parser.configure(&conf).unwrap();
        parser
    }

    #[test]
    fn test_config_params() {
        let parser = DelimitedParser::tsv();
        assert_eq!(parser.delimiter(), "\t");

        for keys in [r#"["a","b"]"#, "a,b"] {
            let parser = configured(
                DelimitedParser::tsv(),
                ParserConfig::new().with("keys", keys).with("delimiter", ","),
            );
            assert_eq!(parser.keys().to_vec(), vec!["a".to_string(), "b".to_string()]);
            assert_eq!(parser.delimiter(), ",");
        }
    }

    #[test]
    fn test_keys_are_required() {
        let mut parser = DelimitedParser::csv();
        assert!(matches!(
            parser.configure(&ParserConfig::new()),
            Err(ConfigError::MissingOption(key)) if key == "keys"
        ));
    }

    #[test]
    fn test_tsv_with_time() {
        let parser = configured(
            DelimitedParser::tsv(),
            ParserConfig::new().with("keys", "time,a,b").with("time_key", "time"),
        );
        let events = parser.parse("2013/02/28 12:00:00\t192.168.0.1\t111").unwrap();

        assert_eq!(events[0].time.map(|t| t.sec()), Some(1_362_052_800));
        assert_eq!(
            events[0].record,
            Record::from([("a", "192.168.0.1"), ("b", "111")])
        );
    }

    #[test]
    fn test_tsv_blank_columns() {
        let cases = [
            ("\t@\t@", ["", "@", "@"]),
            ("@\t\t@", ["@", "", "@"]),
            ("@\t@\t", ["@", "@", ""]),
            ("@\t\t", ["@", "", ""]),
            ("\t\t@", ["", "", "@"]),
            ("\t\t", ["", "", ""]),
        ];
        let parser = configured(DelimitedParser::tsv(), ParserConfig::new().with("keys", "1,2,3"));

        for (line, values) in cases {
            let events = parser.parse(line).unwrap();
            let expected = Record::from([("1", values[0]), ("2", values[1]), ("3", values[2])]);
            assert_eq!(events[0].record, expected, "line {line:?}");
        }
    }

    #[test]
    fn test_missing_cells_are_absent_and_extra_cells_ignored() {
        let parser = configured(DelimitedParser::tsv(), ParserConfig::new().with("keys", "a,b,c"));

        let short = parser.parse("1\t2").unwrap();
        assert_eq!(short[0].record, Record::from([("a", "1"), ("b", "2")]));

        let long = parser.parse("1\t2\t3\t4").unwrap();
        assert_eq!(long[0].record.len(), 3);
    }

    #[test]
    fn test_without_time() {
        let before = TimeValue::now();
        let parser = configured(DelimitedParser::csv(), ParserConfig::new().with("keys", "c,d"));
        let events = parser.parse("192.168.0.1,111").unwrap();
        assert!(events[0].time.is_some_and(|t| t >= before));

        let mut quiet = DelimitedParser::csv();
        quiet.set_estimate_current_event(false);
        let quiet = configured(quiet, ParserConfig::new().with("keys", "c,d"));
        let events = quiet.parse("192.168.0.1,111").unwrap();
        assert_eq!(events[0].time, None);
        assert_eq!(
            events[0].record,
            Record::from([("c", "192.168.0.1"), ("d", "111")])
        );
    }

    #[test]
    fn test_keep_time_key() {
        for parser in [DelimitedParser::tsv(), DelimitedParser::csv()] {
            let parser = configured(
                parser,
                ParserConfig::new()
                    .with("keys", "time")
                    .with("time_format", "%d/%b/%Y:%H:%M:%S %z")
                    .with("keep_time_key", "true"),
            );
            let events = parser.parse("28/Feb/2013:12:00:00 +0900").unwrap();
            assert_eq!(
                events[0].record.get("time"),
                Some(&Value::from("28/Feb/2013:12:00:00 +0900"))
            );
        }
    }

    #[test]
    fn test_null_value_pattern() {
        let conf = ParserConfig::new()
            .with("keys", r#"["a","b","c","d","e","f"]"#)
            .with("null_value_pattern", "^(-|null|NULL)$");
        let tsv = configured(DelimitedParser::tsv(), conf.clone());
        let csv = configured(DelimitedParser::csv(), conf);

        let expected = Record::from([
            ("a", Value::Null),
            ("b", Value::Null),
            ("c", Value::Null),
            ("d", Value::from("")),
            ("e", Value::from("--")),
            ("f", Value::from("nuLL")),
        ]);
        assert_eq!(tsv.parse("-\tnull\tNULL\t\t--\tnuLL").unwrap()[0].record, expected);
        assert_eq!(csv.parse("-,null,NULL,,--,nuLL").unwrap()[0].record, expected);
    }

    #[test]
    fn test_null_empty_string() {
        let conf = ParserConfig::new()
            .with("keys", "a,b")
            .with("null_empty_string", true);
        let tsv = configured(DelimitedParser::tsv(), conf.clone());
        let csv = configured(DelimitedParser::csv(), conf);

        let expected = Record::from([("a", Value::Null), ("b", Value::from(" "))]);
        assert_eq!(tsv.parse("\t ").unwrap()[0].record, expected);
        assert_eq!(csv.parse(", ").unwrap()[0].record, expected);
    }

    #[test]
    fn test_csv_quoting() {
        let parser = configured(
            DelimitedParser::csv(),
            ParserConfig::new().with("keys", "a,b,c,d,e"),
        );
        let events = parser.parse(r#"a,"b,c","say ""hi""",,"""#).unwrap();
        assert_eq!(
            events[0].record,
            Record::from([
                ("a", "a"),
                ("b", "b,c"),
                ("c", r#"say "hi""#),
                ("d", ""),
                ("e", ""),
            ])
        );

        let semicolon = configured(
            DelimitedParser::csv(),
            ParserConfig::new().with("keys", "a,b").with("delimiter", ";"),
        );
        let events = semicolon.parse("x;y").unwrap();
        assert_eq!(events[0].record, Record::from([("a", "x"), ("b", "y")]));
    }

    #[test]
    fn test_csv_delimiter_must_be_one_byte() {
        for delimiter in ["::", "\u{2603}", ""] {
            let mut parser = DelimitedParser::csv();
            let result = parser.configure(
                &ParserConfig::new()
                    .with("keys", "a,b")
                    .with("delimiter", delimiter),
            );
            assert!(
                matches!(result, Err(ConfigError::InvalidOption { ref key, .. }) if key == "delimiter"),
                "{delimiter:?} should be rejected"
            );
        }

        let tsv = configured(
            DelimitedParser::tsv(),
            ParserConfig::new().with("keys", "a,b").with("delimiter", "::"),
        );
        assert_eq!(
            tsv.parse("1::2").unwrap()[0].record,
            Record::from([("a", "1"), ("b", "2")])
        );
    }
}
