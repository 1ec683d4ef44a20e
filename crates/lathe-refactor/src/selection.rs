//! Span algebra over selections.

use lathe_core::TextSpan;
use lathe_syntax::{AstNode, SyntaxToken};

use crate::tree::{span, token_span};

/// True if `span` is a caret sitting at or between the end of `first` and
/// the start of `last`: on the connective syntax of a node (an operator, a
/// `?`/`:`, a keyword) but not inside either operand.
pub fn is_between_spans(span: TextSpan, first: TextSpan, last: TextSpan) -> bool {
    span.is_empty() && first.end <= span.start && span.end <= last.start
}

/// True if `span` is a caret inside `target`, boundaries included.
pub fn is_empty_and_contained_in_span(span: TextSpan, target: TextSpan) -> bool {
    span.is_empty() && target.contains_inclusive(span.start)
}

/// Caret touching `token` or a selection inside it.
pub(crate) fn is_on_token(span: TextSpan, token: &SyntaxToken) -> bool {
    let target = token_span(token);
    target.start <= span.start && span.end <= target.end
}

/// Caret on the connective syntax between two nodes, or a selection that
/// covers the whole `outer` node exactly.
pub(crate) fn is_on_connective(span: TextSpan, first: TextSpan, last: TextSpan, outer: TextSpan) -> bool {
    is_between_spans(span, first, last) || (!span.is_empty() && span == outer)
}

/// The maximal run of `children` fully inside a non-empty `selection`.
///
/// Returns `None` when the selection is empty, cuts through some child, or
/// contains no child at all. Children must be given in source order.
pub(crate) fn selected_nodes<N: AstNode>(children: impl IntoIterator<Item = N>, selection: TextSpan) -> Option<Vec<N>> {
    if selection.is_empty() {
        return None;
    }
    let mut selected = Vec::new();
    for child in children {
        let child_span = span(child.syntax());
        if selection.contains_span(child_span) {
            selected.push(child);
        } else if selection.overlaps(child_span) {
            return None;
        }
    }
    (!selected.is_empty()).then_some(selected)
}

#[cfg(test)]
mod tests {
    use lathe_syntax::{parse, ExpressionStatement, SyntaxKind};
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn between_spans_covers_the_operator_only() {
        // "ab + cd": lhs 0..2, operator 3..4, rhs 5..7
        let lhs = TextSpan::new(0, 2);
        let rhs = TextSpan::new(5, 7);
        for offset in 2..=5 {
            assert!(is_between_spans(TextSpan::at(offset), lhs, rhs), "offset {offset}");
        }
        assert!(!is_between_spans(TextSpan::at(1), lhs, rhs));
        assert!(!is_between_spans(TextSpan::at(6), lhs, rhs));
        assert!(!is_between_spans(TextSpan::new(2, 3), lhs, rhs));
    }

    #[test]
    fn caret_containment_is_inclusive() {
        let target = TextSpan::new(4, 8);
        assert!(is_empty_and_contained_in_span(TextSpan::at(4), target));
        assert!(is_empty_and_contained_in_span(TextSpan::at(8), target));
        assert!(!is_empty_and_contained_in_span(TextSpan::at(9), target));
        assert!(!is_empty_and_contained_in_span(TextSpan::new(4, 5), target));
    }

    #[test]
    fn selected_statements() {
        let text = "class C { void M() { a(); b(); c(); } }";
        let root = parse(text).syntax();
        let stmts = || {
            root.descendants()
                .filter(|n| n.kind() == SyntaxKind::ExpressionStatement)
                .filter_map(ExpressionStatement::cast)
                .collect::<Vec<_>>()
        };
        let at = |needle: &str| text.find(needle).unwrap();

        let run = selected_nodes(stmts(), TextSpan::new(at("a()") - 1, at("c()") - 1)).unwrap();
        let names: Vec<String> = run.iter().map(|s| s.syntax().to_string()).collect();
        assert_eq!(names, vec!["a();", "b();"]);

        assert!(selected_nodes(stmts(), TextSpan::new(at("a()") + 1, at("c()"))).is_none());
        assert!(selected_nodes(stmts(), TextSpan::at(at("b()"))).is_none());
        assert!(selected_nodes(stmts(), TextSpan::new(at("b()"), at("b()") + 2)).is_none());
    }
}
