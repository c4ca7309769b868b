//! Storage for the built-in patterns listed in `build.rs`.
//!
//! Every pattern is compiled on first access to the set and kept for the
//! life of the process. A pattern that fails to compile only poisons its own
//! slot.

use super::regex_error::RegexError;
use regex::Regex;
use std::sync::OnceLock;

/// `(pattern, name)` pairs with lazily compiled regexes.
pub struct StaticRegexSet {
    entries: &'static [(&'static str, &'static str)],
    compiled: OnceLock<Vec<Result<Regex, RegexError>>>,
}

impl StaticRegexSet {
    pub const fn new(entries: &'static [(&'static str, &'static str)]) -> Self {
        Self {
            entries,
            compiled: OnceLock::new(),
        }
    }

    fn slots(&self) -> &[Result<Regex, RegexError>] {
        self.compiled.get_or_init(|| {
            self.entries
                .iter()
                .map(|&(pattern, name)| {
                    Regex::new(pattern).map_err(|source| RegexError::CompilationFailed {
                        pattern: pattern.to_string(),
                        name: name.to_string(),
                        source,
                    })
                })
                .collect()
        })
    }

    /// Compiled regex at `index`, as numbered by `pattern_index`.
    pub fn get(&self, index: usize) -> Result<&Regex, RegexError> {
        match self.slots().get(index) {
            Some(Ok(regex)) => Ok(regex),
            Some(Err(error)) => Err(error.clone()),
            None => Err(RegexError::IndexOutOfBounds {
                index,
                max: self.entries.len(),
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn pattern_names(&self) -> Vec<&'static str> {
        self.entries.iter().map(|&(_, name)| name).collect()
    }
}
