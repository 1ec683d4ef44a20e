use std::fmt;

use thiserror::Error;

use crate::TextSpan;

/// Identifier for a document handed to the engine by the host.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileId(pub String);

impl FileId {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A replacement of `range` in one document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextEdit {
    pub range: TextSpan,
    pub replacement: String,
}

impl TextEdit {
    pub fn insert(offset: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextSpan::at(offset),
            replacement: text.into(),
        }
    }

    pub fn replace(range: TextSpan, text: impl Into<String>) -> Self {
        Self {
            range,
            replacement: text.into(),
        }
    }

    pub fn delete(range: TextSpan) -> Self {
        Self {
            range,
            replacement: String::new(),
        }
    }

    /// The smallest single edit turning `before` into `after`.
    ///
    /// Common prefix and suffix are trimmed on `char` boundaries.
    pub fn diff(before: &str, after: &str) -> Self {
        let prefix = before
            .char_indices()
            .zip(after.chars())
            .find(|((_, a), b)| a != b)
            .map(|((idx, _), _)| idx)
            .unwrap_or_else(|| before.len().min(after.len()));
        let prefix = floor_char_boundary(after, prefix);

        let max_suffix = (before.len() - prefix).min(after.len() - prefix);
        let suffix = before[prefix..]
            .chars()
            .rev()
            .zip(after[prefix..].chars().rev())
            .take_while(|(a, b)| a == b)
            .map(|(a, _)| a.len_utf8())
            .scan(0usize, |acc, len| {
                *acc += len;
                Some(*acc)
            })
            .take_while(|&total| total <= max_suffix)
            .last()
            .unwrap_or(0);

        Self {
            range: TextSpan::new(prefix, before.len() - suffix),
            replacement: after[prefix..after.len() - suffix].to_string(),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.range.is_empty() && self.replacement.is_empty()
    }
}

fn floor_char_boundary(text: &str, mut idx: usize) -> usize {
    while idx > 0 && !text.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EditError {
    #[error("overlapping edits: {first:?} overlaps {second:?}")]
    OverlappingEdits { first: TextSpan, second: TextSpan },
    #[error("text edit range {range:?} is outside the document bounds (len={len})")]
    OutOfBounds { range: TextSpan, len: usize },
    #[error("text edit range {range:?} does not fall on a char boundary")]
    NotCharBoundary { range: TextSpan },
}

/// Apply a set of edits to `original` and return the modified text.
///
/// Edits must be non-overlapping; inserts at the same offset apply in input order.
pub fn apply_text_edits(original: &str, edits: &[TextEdit]) -> Result<String, EditError> {
    if edits.is_empty() {
        return Ok(original.to_string());
    }

    let mut sorted: Vec<(usize, &TextEdit)> = edits.iter().enumerate().collect();
    sorted.sort_by(|(ia, a), (ib, b)| {
        a.range
            .start
            .cmp(&b.range.start)
            .then_with(|| a.range.end.cmp(&b.range.end))
            .then_with(|| ia.cmp(ib))
    });

    for pair in sorted.windows(2) {
        let (first, second) = (pair[0].1.range, pair[1].1.range);
        if second.start < first.end {
            return Err(EditError::OverlappingEdits { first, second });
        }
    }

    let mut out = String::with_capacity(original.len());
    let mut cursor = 0;
    for (_, edit) in sorted {
        let range = edit.range;
        if range.end > original.len() {
            return Err(EditError::OutOfBounds {
                range,
                len: original.len(),
            });
        }
        if !original.is_char_boundary(range.start) || !original.is_char_boundary(range.end) {
            return Err(EditError::NotCharBoundary { range });
        }
        out.push_str(&original[cursor..range.start]);
        out.push_str(&edit.replacement);
        cursor = range.end;
    }
    out.push_str(&original[cursor..]);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn applies_edits_in_offset_order() {
        let edits = vec![
            TextEdit::replace(TextSpan::new(6, 11), "there"),
            TextEdit::insert(0, ">> "),
            TextEdit::delete(TextSpan::new(5, 6)),
        ];
        assert_eq!(apply_text_edits("hello world", &edits).unwrap(), ">> hellothere");
    }

    #[test]
    fn rejects_overlap_and_out_of_bounds() {
        let overlapping = vec![
            TextEdit::replace(TextSpan::new(0, 4), "a"),
            TextEdit::replace(TextSpan::new(2, 6), "b"),
        ];
        assert!(matches!(
            apply_text_edits("abcdefgh", &overlapping),
            Err(EditError::OverlappingEdits { .. })
        ));
        assert_eq!(
            apply_text_edits("abc", &[TextEdit::delete(TextSpan::new(1, 9))]),
            Err(EditError::OutOfBounds {
                range: TextSpan::new(1, 9),
                len: 3
            })
        );
    }

    #[test]
    fn diff_trims_common_prefix_and_suffix() {
        let edit = TextEdit::diff("do { x++; } while (c);", "while (c) { x++; }");
        let applied = apply_text_edits("do { x++; } while (c);", &[edit]).unwrap();
        assert_eq!(applied, "while (c) { x++; }");

        let edit = TextEdit::diff("a + b", "b + a");
        assert_eq!(edit, TextEdit::replace(TextSpan::new(0, 5), "b + a"));

        let edit = TextEdit::diff("int x = 1;", "int xy = 1;");
        assert_eq!(edit, TextEdit::insert(5, "y"));

        assert!(TextEdit::diff("same", "same").is_noop());
    }
}
