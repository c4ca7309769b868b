// Include build-time validated regex patterns
include!(concat!(env!("OUT_DIR"), "/validated_regexes.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_patterns_exist() {
        assert!(!VALIDATED_PATTERNS.is_empty());

        let pattern_names = VALIDATED_PATTERNS.pattern_names();
        assert!(pattern_names.contains(&"apache2_combined"));
        assert!(pattern_names.contains(&"nginx_combined"));
        assert!(pattern_names.contains(&"syslog_with_pri"));
        assert!(pattern_names.contains(&"iso_loose_timestamp"));
    }

    #[test]
    fn test_pattern_index_constants() {
        assert_eq!(
            get_pattern_name(pattern_index::APACHE_ERROR),
            Some("apache_error")
        );
        assert_eq!(get_pattern_name(pattern_index::SYSLOG), Some("syslog"));
        assert_eq!(
            get_pattern_name(pattern_index::EPOCH_SECONDS),
            Some("epoch_seconds")
        );
        assert_eq!(
            get_pattern_name(pattern_index::MULTILINE_FORMAT_KEY),
            Some("multiline_format_key")
        );
        assert_eq!(get_pattern_name(VALIDATED_PATTERNS.len()), None);
    }

    #[test]
    fn test_pattern_compilation() {
        for i in 0..VALIDATED_PATTERNS.len() {
            let result = VALIDATED_PATTERNS.get(i);
            assert!(result.is_ok(), "Pattern at index {i} should compile successfully");
        }
    }

    #[test]
    fn test_format_patterns_expose_time_group() {
        for index in [
            pattern_index::APACHE_COMBINED,
            pattern_index::APACHE2_COMBINED,
            pattern_index::APACHE_ERROR,
            pattern_index::NGINX_COMBINED,
            pattern_index::SYSLOG,
            pattern_index::SYSLOG_WITH_PRI,
        ] {
            let regex = VALIDATED_PATTERNS.get(index).unwrap();
            assert!(
                regex.capture_names().flatten().any(|name| name == "time"),
                "{:?} should capture a time group",
                get_pattern_name(index)
            );
        }
    }
}
