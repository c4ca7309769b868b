//! Multi-line records described by `format1..formatN` fragments.
//!
//! Buffering lines into records is the caller's job; this parser only
//! exposes the boundary predicate and parses an already reassembled text.

use crate::config::ParserConfig;
use crate::domain::{ConfigError, ParseError, ParsedEvent};
use crate::parser::FormatParser;
use crate::parser::event::FormatDefaults;
use crate::parser::generated::{VALIDATED_PATTERNS, pattern_index};
use crate::parser::regexp::{RegexpParser, compile_pattern, strip_slashes};
use regex::Regex;
use std::collections::BTreeMap;

pub const FIRSTLINE_KEY: &str = "format_firstline";
pub const MAX_FRAGMENTS: usize = 20;

#[derive(Debug, Clone)]
pub struct MultilineParser {
    firstline: Option<Regex>,
    inner: Option<RegexpParser>,
    estimate_current_event: bool,
}

impl Default for MultilineParser {
    fn default() -> Self {
        Self {
            firstline: None,
            inner: None,
            estimate_current_event: true,
        }
    }
}

impl MultilineParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Combined fragment pattern, once configured.
    pub fn regex(&self) -> Option<&Regex> {
        self.inner.as_ref().map(RegexpParser::regex)
    }

    fn fragments(conf: &ParserConfig) -> Result<String, ConfigError> {
        let key_pattern = VALIDATED_PATTERNS.get(pattern_index::MULTILINE_FORMAT_KEY)?;
        let mut fragments = BTreeMap::new();

        for key in conf.keys() {
            if !key.starts_with("format") || key == "format" || key == FIRSTLINE_KEY {
                continue;
            }

            let index = key_pattern
                .captures(key)
                .and_then(|caps| caps.name("index"))
                .and_then(|m| m.as_str().parse::<usize>().ok())
                .filter(|index| (1..=MAX_FRAGMENTS).contains(index))
                .ok_or_else(|| {
                    ConfigError::InvalidMultiline(format!(
                        "unexpected key '{key}' (expected format1..format{MAX_FRAGMENTS})"
                    ))
                })?;
            let value = conf.text(key)?.unwrap_or_default();
            let fragment = strip_slashes(&value).ok_or_else(|| {
                ConfigError::InvalidMultiline(format!("{key} must be enclosed in '/'"))
            })?;

            if fragments.insert(index, fragment.to_string()).is_some() {
                return Err(ConfigError::InvalidMultiline(format!(
                    "format{index} is given more than once"
                )));
            }
        }

        if fragments.is_empty() {
            return Err(ConfigError::InvalidMultiline(
                "format1 is required".to_string(),
            ));
        }
        for (expected, index) in (1..).zip(fragments.keys()) {
            if *index != expected {
                return Err(ConfigError::InvalidMultiline(format!(
                    "format{expected} is missing before format{index}"
                )));
            }
        }

        Ok(fragments.into_values().collect())
    }

    fn firstline_pattern(conf: &ParserConfig) -> Result<Option<Regex>, ConfigError> {
        let Some(value) = conf.text(FIRSTLINE_KEY)? else {
            return Ok(None);
        };
        let pattern = strip_slashes(&value).ok_or_else(|| {
            ConfigError::InvalidMultiline(format!("{FIRSTLINE_KEY} must be enclosed in '/'"))
        })?;
        compile_pattern(FIRSTLINE_KEY, &format!("^(?:{pattern})")).map(Some)
    }
}

impl FormatParser for MultilineParser {
    fn format_name(&self) -> &str {
        "multiline"
    }

    fn configure(&mut self, conf: &ParserConfig) -> Result<(), ConfigError> {
        let joined = Self::fragments(conf)?;
        let regex = compile_pattern("format1", &format!("(?s){joined}"))?;
        if regex.capture_names().flatten().next().is_none() {
            return Err(ConfigError::InvalidMultiline(
                "fragments define no named group".to_string(),
            ));
        }
        let firstline = Self::firstline_pattern(conf)?;

        let mut inner = RegexpParser::from_regex("multiline", regex, FormatDefaults::default());
        inner.set_estimate_current_event(self.estimate_current_event);
        inner.configure(conf)?;

        tracing::debug!(
            named_groups = inner.regex().capture_names().flatten().count(),
            has_firstline = firstline.is_some(),
            "Configured multiline parser"
        );

        self.estimate_current_event = inner.estimate_current_event();
        self.firstline = firstline;
        self.inner = Some(inner);
        Ok(())
    }

    fn parse(&self, text: &str) -> Result<Vec<ParsedEvent>, ParseError> {
        match &self.inner {
            Some(inner) => inner.parse(text),
            None => Err(ParseError::NotConfigured),
        }
    }

    fn estimate_current_event(&self) -> bool {
        self.estimate_current_event
    }

    fn set_estimate_current_event(&mut self, estimate: bool) {
        self.estimate_current_event = estimate;
        if let Some(inner) = self.inner.as_mut() {
            inner.set_estimate_current_event(estimate);
        }
    }

    fn firstline(&self, line: &str) -> Option<bool> {
        self.firstline.as_ref().map(|regex| regex.is_match(line))
    }
}
