//! Reassembly of multi-line records from a line stream.

/// Buffers lines until the next record boundary.
///
/// Lines seen before the first boundary form a record of their own.
#[derive(Debug, Default)]
pub struct LineAggregator {
    buffer: Option<String>,
}

impl LineAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line. Returns the previous record when `starts_record` closes it.
    pub fn push(&mut self, line: &str, starts_record: bool) -> Option<String> {
        if starts_record {
            return self.buffer.replace(line.to_string());
        }

        match self.buffer.as_mut() {
            Some(buffer) => {
                buffer.push('\n');
                buffer.push_str(line);
            }
            None => self.buffer = Some(line.to_string()),
        }
        None
    }

    /// Drains the record still buffered at end of input.
    pub fn finish(&mut self) -> Option<String> {
        self.buffer.take()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_none()
    }
}
