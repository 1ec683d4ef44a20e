//! Whitespace decisions for synthesized code.
//!
//! Rules copy existing trivia wherever they can; these helpers cover the
//! places where new layout has to be invented (a fresh block, a statement on
//! its own line) using the document's own indentation unit and line ending.

use lathe_syntax::{
    make, rewrite::green_of, trivia, GreenElement, GreenNode, NodeOrToken, SyntaxElement, SyntaxKind, SyntaxNode,
    SyntaxRewriter,
};

use crate::tree::{is_trivia, trivia_between};

/// Indentation unit and line terminator of one document.
#[derive(Debug, Clone)]
pub(crate) struct Layout {
    pub(crate) unit: String,
    pub(crate) eol: &'static str,
}

impl Layout {
    pub(crate) fn of(root: &SyntaxNode) -> Self {
        Self {
            unit: trivia::indent_unit(root),
            eol: trivia::end_of_line(root),
        }
    }

    pub(crate) fn line_break(&self, indent: &str) -> Vec<GreenElement> {
        make::line_break(self.eol, indent)
    }

    pub(crate) fn indented(&self, indent: &str) -> String {
        format!("{indent}{}", self.unit)
    }

    /// `{`, the statements one per line at `indent + unit`, `}` at `indent`.
    pub(crate) fn block(&self, statements: Vec<GreenNode>, indent: &str) -> GreenNode {
        make::block(statements, indent, &self.unit, self.eol)
    }

    /// Replace the trivia between `before` and `after` with a line break to
    /// `indent`. Comments in the old trivia stay in front of the break.
    pub(crate) fn rebreak(&self, rewriter: &mut SyntaxRewriter, before: &SyntaxElement, after: &SyntaxElement, indent: &str) {
        let old = trivia_between(before, after);
        let last_comment = old
            .iter()
            .rposition(|e| e.as_token().map_or(false, |t| t.kind().is_comment()));
        let mut new: Vec<GreenElement> = match last_comment {
            Some(last) => old[..=last].iter().map(green_of).collect(),
            None => Vec::new(),
        };
        new.extend(self.line_break(indent));
        set_separator(rewriter, before, after, new);
    }

    /// `{ interior }` where `interior` already carries its own line structure:
    /// a line break to `indent + unit` is added before it and one to `indent`
    /// after it.
    pub(crate) fn block_around(&self, interior: Vec<GreenElement>, indent: &str) -> GreenNode {
        let mut children = self.line_break(&self.indented(indent));
        children.extend(interior);
        children.extend(self.line_break(indent));
        make::block_raw(children)
    }
}

/// Replace the trivia between two sibling elements with `new`.
pub(crate) fn set_separator(
    rewriter: &mut SyntaxRewriter,
    before: &SyntaxElement,
    after: &SyntaxElement,
    new: Vec<GreenElement>,
) {
    for element in trivia_between(before, after) {
        if is_trivia(&element) {
            rewriter.remove(element);
        }
    }
    rewriter.insert_before(after.clone(), new);
}

/// Green copies of the trivia siblings between `before` and `after`.
pub(crate) fn separator(before: &SyntaxElement, after: &SyntaxElement) -> Vec<GreenElement> {
    trivia_between(before, after)
        .iter()
        .filter(|e| is_trivia(e))
        .map(green_of)
        .collect()
}

/// Re-indent a node whose first line starts at `from` so that it starts at `to`.
pub(crate) fn reindent_node(node: &SyntaxNode, from: &str, to: &str) -> GreenNode {
    trivia::reindent(&node.green().into_owned(), from, to)
}

/// Re-indent a run of sibling elements (statements with the trivia between
/// them). Only lines that start inside the run move.
pub(crate) fn reindent_elements(elements: Vec<GreenElement>, from: &str, to: &str) -> Vec<GreenElement> {
    if from == to {
        return elements;
    }
    let wrapper = make::raw_node(SyntaxKind::Fragment, elements);
    let shifted = trivia::reindent(&wrapper, from, to);
    shifted
        .children()
        .map(|child| match child {
            NodeOrToken::Node(node) => NodeOrToken::Node(node.to_owned()),
            NodeOrToken::Token(token) => NodeOrToken::Token(token.to_owned()),
        })
        .collect()
}
