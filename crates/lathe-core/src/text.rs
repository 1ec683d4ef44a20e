//! Text model primitives: spans and line/column conversion.

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};
use text_size::{TextRange, TextSize};

/// A half-open text span `[start, end)` in UTF-8 byte offsets.
///
/// An empty span is a caret position; a non-empty span is a drag selection.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

impl TextSpan {
    pub fn new(start: usize, end: usize) -> Self {
        assert!(start <= end, "invalid span: {start}..{end}");
        Self { start, end }
    }

    /// An empty span (caret) at `offset`.
    pub fn at(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    pub fn from_len(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    pub fn len(self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// `start <= offset < end`.
    pub fn contains(self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// `start <= offset <= end`; an empty span contains its own offset.
    pub fn contains_inclusive(self, offset: usize) -> bool {
        self.start <= offset && offset <= self.end
    }

    /// True iff `other` lies completely inside `self`.
    pub fn contains_span(self, other: TextSpan) -> bool {
        self.start <= other.start && other.end <= self.end
    }

    /// True iff the spans share at least one offset, touching ends included.
    pub fn intersects(self, other: TextSpan) -> bool {
        self.start <= other.end && other.start <= self.end
    }

    /// True iff the spans share at least one character.
    pub fn overlaps(self, other: TextSpan) -> bool {
        self.start.max(other.start) < self.end.min(other.end)
    }

    pub fn cover(self, other: TextSpan) -> TextSpan {
        TextSpan {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    pub fn as_range(self) -> Range<usize> {
        self.start..self.end
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.start, self.end)
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        Self {
            start: u32::from(range.start()) as usize,
            end: u32::from(range.end()) as usize,
        }
    }
}

impl From<TextSpan> for TextRange {
    fn from(span: TextSpan) -> Self {
        TextRange::new(
            TextSize::from(span.start as u32),
            TextSize::from(span.end as u32),
        )
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// Pre-computed line start offsets for a particular text snapshot.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LineIndex {
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\n' => line_starts.push(i + 1),
                b'\r' if bytes.get(i + 1) != Some(&b'\n') => line_starts.push(i + 1),
                _ => {}
            }
            i += 1;
        }
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset to zero-based line/column (column in bytes).
    pub fn line_col(&self, offset: usize) -> LineCol {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        LineCol {
            line: line as u32,
            col: (offset - self.line_starts[line]) as u32,
        }
    }

    pub fn offset(&self, line_col: LineCol) -> Option<usize> {
        let start = *self.line_starts.get(line_col.line as usize)?;
        let offset = start + line_col.col as usize;
        (offset <= self.len).then_some(offset)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn span_relations() {
        let outer = TextSpan::new(2, 10);
        assert!(outer.contains_span(TextSpan::new(2, 10)));
        assert!(outer.contains_span(TextSpan::at(10)));
        assert!(!outer.contains_span(TextSpan::new(1, 3)));
        assert!(outer.contains(2));
        assert!(!outer.contains(10));
        assert!(outer.contains_inclusive(10));
        assert!(outer.intersects(TextSpan::new(10, 12)));
        assert!(!outer.overlaps(TextSpan::new(10, 12)));
        assert!(TextSpan::at(4).is_empty());
    }

    #[test]
    fn text_range_conversion() {
        let range = TextRange::new(TextSize::from(3), TextSize::from(7));
        let span = TextSpan::from(range);
        assert_eq!(span, TextSpan::new(3, 7));
        assert_eq!(TextRange::from(span), range);
    }

    #[test]
    fn line_index_handles_crlf() {
        let index = LineIndex::new("a\r\nbc\nd");
        assert_eq!(index.line_count(), 3);
        assert_eq!(index.line_col(4), LineCol { line: 1, col: 1 });
        assert_eq!(index.offset(LineCol { line: 2, col: 0 }), Some(6));
        assert_eq!(index.offset(LineCol { line: 2, col: 5 }), None);
    }
}
