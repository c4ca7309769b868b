use rask_log_parser::{ConfigError, ParserConfig, TextParser, Value};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_parser_section_from_file() {
    let file = write_config(
        r#"
[parser]
format = "tsv"
keys = ["host", "size", "ratio"]
types = "size:integer,ratio:float"
estimate_current_event = false
"#,
    );

    let conf = ParserConfig::from_file(file.path()).unwrap();
    let mut parser = TextParser::new();
    parser.configure(&conf).unwrap();

    let event = parser.parse("web01\t512\t0.25").unwrap().unwrap();
    assert_eq!(event.time, None);
    assert_eq!(event.record.get("host"), Some(&Value::from("web01")));
    assert_eq!(event.record.get("size"), Some(&Value::Integer(512)));
    assert_eq!(event.record.get("ratio"), Some(&Value::Float(0.25)));
}

#[test]
fn test_top_level_options_from_file() {
    let file = write_config(
        r#"
format = "ltsv"
delimiter = ","
label_delimiter = "="
"#,
    );

    let conf = ParserConfig::from_file(file.path()).unwrap();
    let mut parser = TextParser::new();
    parser.configure(&conf).unwrap();

    let event = parser.parse("host=web01,path=/").unwrap().unwrap();
    assert_eq!(event.record.get("path"), Some(&Value::from("/")));
}

#[test]
fn test_command_line_overrides_file() {
    let file = write_config("format = \"none\"\nmessage_key = \"log\"\n");

    let mut conf = ParserConfig::from_file(file.path()).unwrap();
    conf.merge(ParserConfig::new().with("message_key", "line"));

    let mut parser = TextParser::new();
    parser.configure(&conf).unwrap();
    let event = parser.parse("hello").unwrap().unwrap();
    assert_eq!(event.record.get("line"), Some(&Value::from("hello")));
    assert!(!event.record.contains_key("log"));
}

#[test]
fn test_invalid_toml_is_rejected() {
    let file = write_config("format = \n");
    assert!(matches!(
        ParserConfig::from_file(file.path()),
        Err(ConfigError::TomlError(_))
    ));
}

#[test]
fn test_missing_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");
    assert!(matches!(
        ParserConfig::from_file(&path),
        Err(ConfigError::FileError(_))
    ));
}

#[test]
fn test_invalid_option_values_surface_at_configure() {
    let cases = [
        ParserConfig::new()
            .with("format", "apache2")
            .with("keep_time_key", "maybe"),
        ParserConfig::new()
            .with("format", "ltsv")
            .with("types", "size:bignum"),
        ParserConfig::new()
            .with("format", "ltsv")
            .with("null_value_pattern", "(unclosed"),
        ParserConfig::new().with("format", "csv"),
        ParserConfig::new()
            .with("format", "json")
            .with("timezone", "Mars/Olympus"),
    ];

    for conf in cases {
        let mut parser = TextParser::new();
        assert!(parser.configure(&conf).is_err(), "{conf:?} should be rejected");
    }
}
