// Build-time validation of every built-in regex pattern
use regex::Regex;
use std::fs::File;
use std::io::Write;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=Cargo.toml");

    // All built-in regex patterns used in the codebase
    let patterns = &[
        // Access and error log formats (parser/formats)
        (
            r#"^(?<host>[^ ]*) [^ ]* (?<user>[^ ]*) \[(?<time>[^\]]*)\] "(?<method>\S+)(?: +(?<path>[^ ]*) +\S*)?" (?<code>[^ ]*) (?<size>[^ ]*)(?: "(?<referer>[^"]*)" "(?<agent>[^"]*)")?$"#,
            "apache_combined",
        ),
        (
            r#"^(?<host>[^ ]*) [^ ]* (?<user>[^ ]*) \[(?<time>[^\]]*)\] "(?<method>\S+)(?: +(?<path>(?:[^"]|\\.)*?)(?: +\S*)?)?" (?<code>[^ ]*) (?<size>[^ ]*)(?: "(?<referer>(?:[^"]|\\.)*)" "(?<agent>(?:[^"]|\\.)*)")?$"#,
            "apache2_combined",
        ),
        (
            r#"^\[(?<time>[^\]]*)\] \[(?<level>[^\]]*)\](?: \[pid (?<pid>[^\]]*)\])?(?: \[client (?<client>[^\]]*)\])? (?<message>.*)$"#,
            "apache_error",
        ),
        (
            r#"^(?<remote>[^ ]*) (?<host>[^ ]*) (?<user>[^ ]*) \[(?<time>[^\]]*)\] "(?<method>\S+)(?: +(?<path>[^"]*?)(?: +\S*)?)?" (?<code>[^ ]*) (?<size>[^ ]*)(?: "(?<referer>[^"]*)" "(?<agent>[^"]*)")?$"#,
            "nginx_combined",
        ),
        (
            r#"^(?<time>[^ ]*\s*[^ ]* [^ ]*) (?<host>[^ ]*) (?<ident>[a-zA-Z0-9_/.\-]*)(?:\[(?<pid>[0-9]+)\])?(?:[^:]*:)? *(?<message>.*)$"#,
            "syslog",
        ),
        (
            r#"^<(?<pri>[0-9]+)>(?<time>[^ ]* {1,2}[^ ]* [^ ]*) (?<host>[^ ]*) (?<ident>[a-zA-Z0-9_/.\-]*)(?:\[(?<pid>[0-9]+)\])?(?:[^:]*:)? *(?<message>.*)$"#,
            "syslog_with_pri",
        ),
        // Time parsing (parser/time_parser.rs, parser/formats/json.rs)
        (
            r#"^\s*(?<year>[0-9]{4})[-/](?<month>[0-9]{1,2})[-/](?<day>[0-9]{1,2})(?:[T ]+(?<hour>[0-9]{1,2}):(?<minute>[0-9]{1,2})(?::(?<second>[0-9]{1,2}))?(?:[.,](?<fraction>[0-9]+))?)?\s*(?<zone>Z|UTC|GMT|[+-][0-9]{2}:?[0-9]{2})?\s*$"#,
            "iso_loose_timestamp",
        ),
        (
            r#"^\s*(?<sec>-?[0-9]+)(?:\.(?<frac>[0-9]*))?\s*$"#,
            "epoch_seconds",
        ),
        // Lenient numeric casts (parser/types.rs)
        (r#"^\s*[+-]?[0-9]+"#, "integer_prefix"),
        (
            r#"^\s*[+-]?(?:[0-9]+(?:\.[0-9]*)?|\.[0-9]+)(?:[eE][+-]?[0-9]+)?"#,
            "float_prefix",
        ),
        // Multi-line fragment keys (parser/formats/multiline.rs)
        (r#"^format(?<index>\d+)$"#, "multiline_format_key"),
    ];

    println!("cargo:info=Starting regex pattern validation...");

    let mut valid_patterns = Vec::new();
    let mut invalid_patterns = Vec::new();

    for &(pattern, name) in patterns {
        match Regex::new(pattern) {
            Ok(_) => valid_patterns.push((pattern, name)),
            Err(e) => {
                println!("cargo:warning=Invalid regex pattern '{}': {}", name, e);
                invalid_patterns.push((pattern, name, e));
            }
        }
    }

    if !invalid_patterns.is_empty() {
        let mut error_msg = String::from("Build failed due to invalid regex patterns:\n");
        for (pattern, name, error) in &invalid_patterns {
            error_msg.push_str(&format!(
                "  - '{}': {} (pattern: {})\n",
                name, error, pattern
            ));
        }
        panic!("{}", error_msg);
    }

    if let Err(e) = generate_validated_regexes(&valid_patterns) {
        panic!("Failed to generate regex patterns: {}", e);
    }

    println!(
        "cargo:info=All {} regex patterns validated successfully",
        valid_patterns.len()
    );
}

fn generate_validated_regexes(patterns: &[(&str, &str)]) -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = std::env::var("OUT_DIR")?;
    let dest_path = std::path::Path::new(&out_dir).join("validated_regexes.rs");
    let mut file = File::create(dest_path)?;

    writeln!(file, "// Auto-generated regex patterns (validated by build.rs)")?;
    writeln!(file, "use crate::parser::regex_patterns::StaticRegexSet;")?;
    writeln!(file)?;
    writeln!(file, "/// All validated built-in regex patterns")?;
    writeln!(
        file,
        "pub static VALIDATED_PATTERNS: StaticRegexSet = StaticRegexSet::new(&["
    )?;

    for (pattern, name) in patterns {
        writeln!(file, "    (r#\"{}\"#, \"{}\"),", pattern, name)?;
    }

    writeln!(file, "]);")?;
    writeln!(file)?;

    writeln!(file, "/// Pattern indices for type-safe access")?;
    writeln!(file, "pub mod pattern_index {{")?;
    for (i, (_, name)) in patterns.iter().enumerate() {
        writeln!(file, "    pub const {}: usize = {};", name.to_uppercase(), i)?;
    }
    writeln!(file, "}}")?;

    writeln!(file)?;
    writeln!(file, "/// Pattern name lookup")?;
    writeln!(
        file,
        "pub fn get_pattern_name(index: usize) -> Option<&'static str> {{"
    )?;
    writeln!(file, "    match index {{")?;
    for (i, (_, name)) in patterns.iter().enumerate() {
        writeln!(file, "        {} => Some(\"{}\"),", i, name)?;
    }
    writeln!(file, "        _ => None,")?;
    writeln!(file, "    }}")?;
    writeln!(file, "}}")?;

    Ok(())
}
