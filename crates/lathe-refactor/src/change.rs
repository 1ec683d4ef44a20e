use std::sync::Arc;

use lathe_core::{apply_text_edits, TextEdit, TextSpan};
use lathe_syntax::{GreenNode, SyntaxNode, SyntaxRewriter};
use similar::TextDiff;

use crate::{Document, RefactorError};

/// Result of applying one refactoring.
#[derive(Debug, Clone)]
pub struct SourceChange {
    /// The rewritten document; shares every untouched subtree with the input.
    pub document: Document,
    /// Minimal single edit turning the old text into the new one.
    pub edit: TextEdit,
    /// Ranges in the new text the host's formatter should normalise.
    pub reformat: Vec<TextSpan>,
    original: Arc<str>,
}

impl SourceChange {
    pub(crate) fn new(before: &Document, green: GreenNode) -> Self {
        let document = before.with_green(green);
        let edit = TextEdit::diff(before.text(), document.text());
        Self {
            document,
            edit,
            reformat: Vec::new(),
            original: before.shared_text(),
        }
    }

    /// Apply `rewriter` to the tree rooted at `root`, which must be the red
    /// root of `before`.
    pub(crate) fn from_rewrite(before: &Document, root: &SyntaxNode, rewriter: &SyntaxRewriter) -> Self {
        Self::new(before, rewriter.rewrite(root))
    }

    /// Mark the whole edited region for reformatting.
    pub(crate) fn reformatted(mut self) -> Self {
        if !self.edit.is_noop() {
            self.reformat
                .push(TextSpan::from_len(self.edit.range.start, self.edit.replacement.len()));
        }
        self
    }

    pub fn new_text(&self) -> &str {
        self.document.text()
    }

    pub fn original_text(&self) -> &str {
        &self.original
    }

    /// Unified diff of the change, for previews.
    pub fn unified_diff(&self) -> String {
        let path = self.document.id().to_string();
        TextDiff::from_lines(&*self.original, self.document.text())
            .unified_diff()
            .context_radius(3)
            .header(&format!("a/{path}"), &format!("b/{path}"))
            .to_string()
    }

    /// Replay the edit on `text`, which must equal the original text.
    pub fn apply_to(&self, text: &str) -> Result<String, RefactorError> {
        Ok(apply_text_edits(text, std::slice::from_ref(&self.edit))?)
    }
}
