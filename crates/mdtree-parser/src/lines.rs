//! Byte offset to line number mapping.

use std::ops::Range;

/// Start offsets of every line in a source string.
#[derive(Debug, Clone)]
pub struct LineIndex {
    starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(source: &str) -> Self {
        let starts = std::iter::once(0)
            .chain(source.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { starts }
    }

    /// 0-based line containing `offset`. A newline belongs to the line it
    /// terminates.
    pub fn line_of(&self, offset: usize) -> usize {
        match self.starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next.saturating_sub(1),
        }
    }

    /// Line range `[start, end)` covered by a byte range.
    pub fn map(&self, range: &Range<usize>) -> (usize, usize) {
        let start = self.line_of(range.start);
        let end = if range.end > range.start {
            self.line_of(range.end - 1) + 1
        } else {
            start + 1
        };
        (start, end)
    }
}
