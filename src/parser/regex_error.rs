// Errors raised by the build-time validated pattern set
use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum RegexError {
    #[error("Regex compilation failed for pattern '{pattern}' (name: {name}): {source}")]
    CompilationFailed {
        pattern: String,
        name: String,
        #[source]
        source: regex::Error,
    },

    #[error("Regex index out of bounds: {index} >= {max}")]
    IndexOutOfBounds { index: usize, max: usize },
}

impl RegexError {
    /// Name of the pattern involved, when known.
    pub fn pattern_name(&self) -> Option<&str> {
        match self {
            RegexError::CompilationFailed { name, .. } => Some(name),
            RegexError::IndexOutOfBounds { .. } => None,
        }
    }
}
