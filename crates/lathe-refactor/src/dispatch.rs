use std::panic::{self, AssertUnwindSafe};

use lathe_config::{FailurePolicy, RefactoringsConfig};
use lathe_core::{CancellationToken, CancellationTokenExt, TextSpan};
use lathe_syntax::{NodeOrToken, SyntaxKind, SyntaxNode, SyntaxToken, TextRange};

use crate::error::panic_message;
use crate::{refactorings, Document, RefactorError, RefactoringAction, RefactoringContext};

/// Every refactoring applicable to `span` in `document`.
///
/// Starting at the innermost node at `span`, each ancestor up to the root is
/// offered to the routines registered for its kind; the returned actions are
/// ordered innermost first. An empty list is a normal answer.
///
/// Errors are limited to cancellation and a `span` outside the document.
/// Under [`FailurePolicy::Swallow`] a defect in a predicate (an error or a
/// panic) is logged and turned into an empty list; under
/// [`FailurePolicy::FailFast`] it is returned, or the panic resumes.
pub fn compute_refactorings(
    document: &Document,
    span: TextSpan,
    config: &RefactoringsConfig,
    cancel: &CancellationToken,
) -> Result<Vec<RefactoringAction>, RefactorError> {
    cancel.check_cancelled()?;
    if span.end > document.text().len() {
        return Err(RefactorError::invalid_target(format!(
            "span {span:?} is outside of {} ({} bytes)",
            document.id(),
            document.text().len()
        )));
    }

    let result = match config.failure_policy {
        FailurePolicy::FailFast => dispatch(document, span, config, cancel),
        FailurePolicy::Swallow => {
            match panic::catch_unwind(AssertUnwindSafe(|| dispatch(document, span, config, cancel))) {
                Ok(Err(err)) if !err.is_cancelled() => {
                    tracing::error!(
                        target: "lathe.refactor",
                        file = %document.id(),
                        error = %err,
                        "computing refactorings failed"
                    );
                    Ok(Vec::new())
                }
                Ok(result) => result,
                Err(payload) => {
                    tracing::error!(
                        target: "lathe.refactor",
                        file = %document.id(),
                        panic = %panic_message(&*payload),
                        "computing refactorings panicked"
                    );
                    Ok(Vec::new())
                }
            }
        }
    };
    if let Err(RefactorError::Cancelled) = &result {
        tracing::debug!(target: "lathe.refactor", file = %document.id(), "computing refactorings cancelled");
    }
    result
}

fn dispatch(
    document: &Document,
    span: TextSpan,
    config: &RefactoringsConfig,
    cancel: &CancellationToken,
) -> Result<Vec<RefactoringAction>, RefactorError> {
    let root = document.syntax();
    let Some(anchor) = anchor_node(&root, span) else {
        return Ok(Vec::new());
    };
    tracing::debug!(
        target: "lathe.refactor",
        file = %document.id(),
        start = span.start,
        end = span.end,
        anchor = ?anchor.kind(),
        "computing refactorings"
    );

    let context = RefactoringContext::new(document, root, span, config, cancel);
    for node in anchor.ancestors() {
        context.check_cancelled()?;
        refactorings::compute_for_node(&context, &node)?;
    }
    let actions = context.into_actions();
    tracing::debug!(target: "lathe.refactor", count = actions.len(), "computed refactorings");
    Ok(actions)
}

/// The innermost node at `span`.
///
/// A selection resolves to the node covering it. A caret between two tokens
/// prefers the token to its right, unless that is trivia or the caret ends a
/// word (`foo|(`, `x|;`) and the right token is punctuation.
fn anchor_node(root: &SyntaxNode, span: TextSpan) -> Option<SyntaxNode> {
    let range: TextRange = span.into();
    if !span.is_empty() {
        return match root.covering_element(range) {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(token) => token.parent(),
        };
    }
    let candidates: Vec<SyntaxToken> = root.token_at_offset(range.start()).collect();
    let token = match candidates.as_slice() {
        [] => return Some(root.clone()),
        [single] => single.clone(),
        [left, right, ..] => {
            if right.kind().is_trivia() || (is_word(left.kind()) && !is_word(right.kind())) {
                left.clone()
            } else {
                right.clone()
            }
        }
    };
    token.parent()
}

fn is_word(kind: SyntaxKind) -> bool {
    kind == SyntaxKind::Identifier || kind.is_keyword() || kind.is_literal_token()
}

#[cfg(test)]
mod tests {
    use lathe_syntax::parse;
    use pretty_assertions::assert_eq;

    use super::*;

    fn anchor_kind(text: &str, span: TextSpan) -> SyntaxKind {
        anchor_node(&parse(text).syntax(), span).unwrap().kind()
    }

    #[test]
    fn caret_prefers_the_word_it_touches() {
        let text = "class C { void M() { Run(x); } }";
        let at = |needle: &str| text.find(needle).unwrap();
        // `Run|(`: the identifier wins over the parenthesis.
        assert_eq!(anchor_kind(text, TextSpan::at(at("(x)"))), SyntaxKind::NameExpression);
        // `(|x`: the argument wins.
        assert_eq!(anchor_kind(text, TextSpan::at(at("x)"))), SyntaxKind::NameExpression);
        // `x)|;`
        assert_eq!(anchor_kind(text, TextSpan::at(at("; }"))), SyntaxKind::ExpressionStatement);
    }

    #[test]
    fn selection_uses_the_covering_node() {
        let text = "class C { int F() => a + b; }";
        let start = text.find("a + b").unwrap();
        assert_eq!(anchor_kind(text, TextSpan::from_len(start, 5)), SyntaxKind::BinaryExpression);
    }
}
