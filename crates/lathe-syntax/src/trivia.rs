//! Trivia queries over the tree.
//!
//! The parser keeps trivia as ordinary tokens placed outside the nodes they
//! surround. These helpers recover the per-token leading/trailing split: a
//! token's trailing trivia runs up to and including the first newline after
//! it, everything after that newline leads the next token.

use rowan::{GreenNode, GreenToken, Language, NodeOrToken};
use text_size::TextRange;

use crate::{CSharpLanguage, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxToken};

/// Non-trivia tokens inside `node`, in order.
pub fn significant_tokens(node: &SyntaxNode) -> impl Iterator<Item = SyntaxToken> {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .filter(|t| !t.kind().is_trivia())
}

pub fn first_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    significant_tokens(node).next()
}

pub fn last_significant_token(node: &SyntaxNode) -> Option<SyntaxToken> {
    let last = node.last_token()?;
    if last.kind().is_trivia() {
        previous_significant_token(&last).filter(|t| node.text_range().contains_range(t.text_range()))
    } else {
        Some(last)
    }
}

pub fn previous_significant_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut current = token.prev_token();
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            return Some(tok);
        }
        current = tok.prev_token();
    }
    None
}

pub fn next_significant_token(token: &SyntaxToken) -> Option<SyntaxToken> {
    let mut current = token.next_token();
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            return Some(tok);
        }
        current = tok.next_token();
    }
    None
}

/// Trivia tokens attached in front of `token`.
pub fn leading_trivia(token: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut run = Vec::new();
    let mut current = token.prev_token();
    let mut has_previous = false;
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            has_previous = true;
            break;
        }
        current = tok.prev_token();
        run.push(tok);
    }
    run.reverse();
    if !has_previous {
        return run;
    }
    match run.iter().position(|t| t.kind() == SyntaxKind::Newline) {
        Some(idx) => run.split_off(idx + 1),
        None => Vec::new(),
    }
}

/// Trivia tokens attached behind `token`: up to and including the first newline.
pub fn trailing_trivia(token: &SyntaxToken) -> Vec<SyntaxToken> {
    let mut run = Vec::new();
    let mut current = token.next_token();
    while let Some(tok) = current {
        if !tok.kind().is_trivia() {
            break;
        }
        current = tok.next_token();
        let newline = tok.kind() == SyntaxKind::Newline;
        run.push(tok);
        if newline {
            break;
        }
    }
    run
}

pub fn leading_trivia_of(node: &SyntaxNode) -> Vec<SyntaxToken> {
    first_significant_token(node)
        .map(|t| leading_trivia(&t))
        .unwrap_or_default()
}

pub fn trailing_trivia_of(node: &SyntaxNode) -> Vec<SyntaxToken> {
    last_significant_token(node)
        .map(|t| trailing_trivia(&t))
        .unwrap_or_default()
}

/// `text_range()` widened by the node's leading and trailing trivia.
pub fn full_range(node: &SyntaxNode) -> TextRange {
    let range = node.text_range();
    let start = leading_trivia_of(node)
        .first()
        .map_or(range.start(), |t| t.text_range().start());
    let end = trailing_trivia_of(node)
        .last()
        .map_or(range.end(), |t| t.text_range().end());
    TextRange::new(start, end)
}

pub fn text_of(tokens: &[SyntaxToken]) -> String {
    tokens.iter().map(|t| t.text()).collect()
}

pub fn contains_comment(tokens: &[SyntaxToken]) -> bool {
    tokens
        .iter()
        .any(|t| t.kind().is_comment() || t.kind() == SyntaxKind::Directive)
}

/// True if any trivia strictly inside `node` is a comment or directive.
pub fn has_comments_or_directives(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|t| t.kind().is_comment() || t.kind() == SyntaxKind::Directive)
}

/// True if `node` spans more than one line.
pub fn is_multiline(node: &SyntaxNode) -> bool {
    node.descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .any(|t| {
            t.kind() == SyntaxKind::Newline
                || (t.kind() == SyntaxKind::BlockComment && t.text().contains('\n'))
                || (t.kind() == SyntaxKind::VerbatimStringLiteral && t.text().contains('\n'))
        })
}

/// Whitespace at the start of the line containing `element`.
pub fn line_indentation(element: &SyntaxElement) -> String {
    let first = match element {
        NodeOrToken::Node(node) => node.first_token(),
        NodeOrToken::Token(token) => Some(token.clone()),
    };
    let mut indentation = String::new();
    let mut current = first.and_then(|t| t.prev_token());
    while let Some(tok) = current {
        match tok.kind() {
            SyntaxKind::Newline => break,
            SyntaxKind::Whitespace => indentation = tok.text().to_string(),
            _ => indentation.clear(),
        }
        current = tok.prev_token();
    }
    indentation
}

pub fn node_indentation(node: &SyntaxNode) -> String {
    line_indentation(&NodeOrToken::Node(node.clone()))
}

/// True if nothing but whitespace precedes `node` on its line.
pub fn starts_line(node: &SyntaxNode) -> bool {
    let mut current = node.first_token().and_then(|t| t.prev_token());
    while let Some(tok) = current {
        match tok.kind() {
            SyntaxKind::Newline => return true,
            SyntaxKind::Whitespace => {}
            _ => return false,
        }
        current = tok.prev_token();
    }
    true
}

/// The document's indentation unit: a tab if tabs are used, otherwise the
/// smallest indentation width found (default four spaces).
pub fn indent_unit(root: &SyntaxNode) -> String {
    let mut smallest: Option<usize> = None;
    let mut after_newline = false;
    for token in root.descendants_with_tokens().filter_map(|it| it.into_token()) {
        if after_newline && token.kind() == SyntaxKind::Whitespace {
            let text = token.text();
            if text.starts_with('\t') {
                return "\t".to_string();
            }
            let width = text.chars().take_while(|c| *c == ' ').count();
            if width > 0 {
                smallest = Some(smallest.map_or(width, |s| s.min(width)));
            }
        }
        after_newline = token.kind() == SyntaxKind::Newline;
    }
    " ".repeat(smallest.unwrap_or(4))
}

/// The document's line terminator (first one found, default `\n`).
pub fn end_of_line(root: &SyntaxNode) -> &'static str {
    let first = root
        .descendants_with_tokens()
        .filter_map(|it| it.into_token())
        .find(|t| t.kind() == SyntaxKind::Newline);
    match first {
        Some(tok) if tok.text() == "\r\n" => "\r\n",
        _ => "\n",
    }
}

/// Rebuild `green`, re-indenting every line that starts inside it: leading
/// whitespace beginning with `from` gets that prefix replaced with `to`.
pub fn reindent(green: &GreenNode, from: &str, to: &str) -> GreenNode {
    if from == to {
        return green.clone();
    }
    let mut after_newline = false;
    reindent_node(green, from, to, &mut after_newline)
}

fn reindent_node(green: &GreenNode, from: &str, to: &str, after_newline: &mut bool) -> GreenNode {
    let children: Vec<NodeOrToken<GreenNode, GreenToken>> = green
        .children()
        .map(|child| match child {
            NodeOrToken::Node(node) => NodeOrToken::Node(reindent_node(&node.to_owned(), from, to, after_newline)),
            NodeOrToken::Token(token) => {
                let kind = CSharpLanguage::kind_from_raw(token.kind());
                let new_token = if *after_newline && kind == SyntaxKind::Whitespace {
                    GreenToken::new(token.kind(), &shift_indentation(token.text(), from, to))
                } else {
                    token.to_owned()
                };
                *after_newline = kind == SyntaxKind::Newline;
                NodeOrToken::Token(new_token)
            }
        })
        .collect();
    GreenNode::new(green.kind(), children)
}

fn shift_indentation(text: &str, from: &str, to: &str) -> String {
    match text.strip_prefix(from) {
        Some(rest) => format!("{to}{rest}"),
        // Less indented than expected: keep whatever part of the new prefix fits.
        None if from.len() > to.len() => {
            let removed = from.len() - to.len();
            text.get(removed.min(text.len())..).unwrap_or("").to_string()
        }
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{ast::AstNode, ast::ExpressionStatement, parse};

    fn statements(text: &str) -> Vec<SyntaxNode> {
        parse(text)
            .syntax()
            .descendants()
            .filter(|n| ExpressionStatement::can_cast(n.kind()))
            .collect()
    }

    #[test]
    fn trailing_trivia_stops_after_newline() {
        let text = "class C { void M() {\n    a(); // first\n    b();\n} }";
        let stmts = statements(text);
        assert_eq!(text_of(&trailing_trivia_of(&stmts[0])), " // first\n");
        assert_eq!(text_of(&leading_trivia_of(&stmts[1])), "    ");
        assert_eq!(text_of(&leading_trivia_of(&stmts[0])), "    ");
        let full = full_range(&stmts[0]);
        assert_eq!(&text[full], "    a(); // first\n");
    }

    #[test]
    fn indentation_helpers() {
        let text = "class C\n{\n\tvoid M()\n\t{\n\t\ta();\n\t}\n}\r\n";
        let root = parse(text).syntax();
        assert_eq!(indent_unit(&root), "\t");
        assert_eq!(end_of_line(&root), "\n");
        let stmt = &statements(text)[0];
        assert_eq!(node_indentation(stmt), "\t\t");
        assert!(starts_line(stmt));
    }

    #[test]
    fn reindent_shifts_inner_lines() {
        let text = "class C { void M() {\n        a();\n    } }";
        let root = parse(text).syntax();
        let block = root
            .descendants()
            .find(|n| n.kind() == SyntaxKind::Block)
            .unwrap();
        let shifted = reindent(&block.green().into_owned(), "    ", "");
        assert_eq!(SyntaxNode::new_root(shifted).to_string(), "{\n    a();\n}");
    }
}
