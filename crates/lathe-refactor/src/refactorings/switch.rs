//! `switch` sections: braces around their statements and label order.

use std::cmp::Ordering;

use lathe_config::RefactoringId;
use lathe_syntax::{
    parse_int_literal, rewrite::green_range, trivia, unescape_char_literal, unescape_string_literal, AstNode, Block,
    CaseSwitchLabel, Expr, NodeOrToken, Stmt, SwitchLabel, SwitchSection, SyntaxKind, SyntaxNode, SyntaxRewriter,
};

use super::members::{gaps_are_plain, permute, sorted_order};
use crate::layout::{reindent_elements, Layout};
use crate::selection::selected_nodes;
use crate::tree::{span, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

pub(super) fn compute(ctx: &RefactoringContext<'_>, section: &SwitchSection) {
    if is_on_labels(ctx, section) {
        compute_braces(ctx, section);
    }
    compute_sort_labels(ctx, section);
}

fn is_on_labels(ctx: &RefactoringContext<'_>, section: &SwitchSection) -> bool {
    let labels: Vec<SwitchLabel> = section.labels().collect();
    match (labels.first(), labels.last()) {
        (Some(first), Some(last)) => span(first.syntax()).cover(span(last.syntax())).contains_span(ctx.span()),
        _ => false,
    }
}

fn compute_braces(ctx: &RefactoringContext<'_>, section: &SwitchSection) {
    let statements: Vec<Stmt> = section.statements().collect();
    match statements.as_slice() {
        [] => {}
        [Stmt::Block(block)] => {
            if ctx.is_enabled(RefactoringId::RemoveBracesFromSwitchSection) && can_unwrap(block) {
                let ptr = NodePtr::new(block.syntax());
                ctx.register(RefactoringId::RemoveBracesFromSwitchSection, "Remove braces from section", move |doc, _| {
                    let root = doc.syntax();
                    let block: Block = ptr.cast(&root)?;
                    let layout = Layout::of(&root);
                    let mut rewriter = SyntaxRewriter::new();
                    unwrap_block(&mut rewriter, &layout, &block)?;
                    Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
                });
            }
        }
        [_, ..] => {
            if !ctx.is_enabled(RefactoringId::AddBracesToSwitchSection) {
                return;
            }
            let ptr = NodePtr::new(section.syntax());
            let count = statements.len();
            ctx.register(RefactoringId::AddBracesToSwitchSection, "Add braces to section", move |doc, _| {
                let root = doc.syntax();
                let section: SwitchSection = ptr.cast(&root)?;
                let statements: Vec<SyntaxNode> = section.statements().map(|s| s.syntax().clone()).collect();
                if statements.len() != count {
                    return Err(RefactorError::invalid_target("section statements changed"));
                }
                let layout = Layout::of(&root);
                let mut rewriter = SyntaxRewriter::new();
                wrap_statements(&mut rewriter, &layout, &statements)?;
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            });
        }
    }
}

/// A block whose locals cannot leak into sibling sections once unwrapped.
fn can_unwrap(block: &Block) -> bool {
    let mut statements = block.statements().peekable();
    statements.peek().is_some()
        && statements.all(|s| !matches!(s, Stmt::LocalDeclarationStatement(_)))
        && !trivia::contains_comment(&brace_trivia(block))
}

/// Trivia just inside the braces.
fn brace_trivia(block: &Block) -> Vec<lathe_syntax::SyntaxToken> {
    let mut tokens = Vec::new();
    if let Some(l_brace) = block.l_brace_token() {
        tokens.extend(trivia::trailing_trivia(&l_brace));
    }
    if let Some(r_brace) = block.r_brace_token() {
        tokens.extend(trivia::leading_trivia(&r_brace));
    }
    tokens
}

fn wrap_statements(rewriter: &mut SyntaxRewriter, layout: &Layout, statements: &[SyntaxNode]) -> Result<(), RefactorError> {
    let (Some(first), Some(last)) = (statements.first(), statements.last()) else {
        return Err(RefactorError::invalid_target("empty switch section"));
    };
    let indent = trivia::node_indentation(first);
    let interior = reindent_elements(
        green_range(&NodeOrToken::Node(first.clone()), &NodeOrToken::Node(last.clone())),
        &indent,
        &layout.indented(&indent),
    );
    let block = layout.block_around(interior, &indent);
    rewriter.remove_range(first.clone(), last.clone());
    rewriter.insert_before(first.clone(), vec![NodeOrToken::Node(block)]);
    Ok(())
}

fn unwrap_block(rewriter: &mut SyntaxRewriter, layout: &Layout, block: &Block) -> Result<(), RefactorError> {
    let statements: Vec<Stmt> = block.statements().collect();
    let (Some(first), Some(last)) = (statements.first(), statements.last()) else {
        return Err(RefactorError::invalid_target("empty block"));
    };
    let outer = trivia::node_indentation(block.syntax());
    let inner = trivia::node_indentation(first.syntax());
    let expected_inner = layout.indented(&outer);
    let from = if inner.is_empty() { expected_inner.as_str() } else { inner.as_str() };
    let interior = reindent_elements(
        green_range(&NodeOrToken::Node(first.syntax().clone()), &NodeOrToken::Node(last.syntax().clone())),
        from,
        &outer,
    );
    rewriter.replace_with_many(block.syntax().clone(), interior);
    Ok(())
}

/// Constant of a `case` label, comparable within one kind.
#[derive(Debug, Clone, PartialEq)]
enum LabelValue {
    Int(i128),
    Text(String),
}

impl LabelValue {
    fn of(label: &CaseSwitchLabel) -> Option<LabelValue> {
        let (negative, expr) = match label.value()? {
            Expr::PrefixUnaryExpression(unary) if unary.op_kind() == Some(SyntaxKind::Minus) => (true, unary.operand()?),
            expr => (false, expr),
        };
        let Expr::LiteralExpression(literal) = expr else {
            return None;
        };
        let token = literal.token()?;
        match token.kind() {
            SyntaxKind::IntLiteral => {
                let value = i128::from(parse_int_literal(token.text()).ok()?);
                Some(LabelValue::Int(if negative { -value } else { value }))
            }
            SyntaxKind::CharLiteral if !negative => {
                unescape_char_literal(token.text()).ok().map(|c| LabelValue::Int(i128::from(u32::from(c))))
            }
            SyntaxKind::StringLiteral if !negative => unescape_string_literal(token.text()).ok().map(LabelValue::Text),
            _ => None,
        }
    }

    fn compare(&self, other: &LabelValue) -> Ordering {
        match (self, other) {
            (LabelValue::Int(a), LabelValue::Int(b)) => a.cmp(b),
            (LabelValue::Text(a), LabelValue::Text(b)) => a.cmp(b),
            (LabelValue::Int(_), LabelValue::Text(_)) => Ordering::Less,
            (LabelValue::Text(_), LabelValue::Int(_)) => Ordering::Greater,
        }
    }
}

fn compute_sort_labels(ctx: &RefactoringContext<'_>, section: &SwitchSection) {
    if !ctx.is_enabled(RefactoringId::SortCaseLabels) {
        return;
    }
    let Some(labels) = selected_nodes(section.labels(), ctx.span()) else {
        return;
    };
    let cases: Vec<CaseSwitchLabel> = labels
        .iter()
        .filter_map(|label| match label {
            SwitchLabel::CaseSwitchLabel(case) => Some(case.clone()),
            SwitchLabel::DefaultSwitchLabel(_) => None,
        })
        .collect();
    if cases.len() < 2 || cases.len() != labels.len() || !gaps_are_plain(&cases) {
        return;
    }
    let Some(values) = cases.iter().map(LabelValue::of).collect::<Option<Vec<_>>>() else {
        return;
    };
    let same_kind = values.windows(2).all(|pair| {
        matches!(
            (&pair[0], &pair[1]),
            (LabelValue::Int(_), LabelValue::Int(_)) | (LabelValue::Text(_), LabelValue::Text(_))
        )
    });
    if !same_kind {
        return;
    }
    let Some(permutation) = sorted_order(&values, LabelValue::compare) else {
        return;
    };
    let ptrs: Vec<NodePtr> = cases.iter().map(|c| NodePtr::new(c.syntax())).collect();
    ctx.register(RefactoringId::SortCaseLabels, "Sort case labels", move |doc, _| {
        let root = doc.syntax();
        let nodes = ptrs.iter().map(|ptr| ptr.to_node(&root)).collect::<Result<Vec<_>, _>>()?;
        let mut rewriter = SyntaxRewriter::new();
        permute(&mut rewriter, &nodes, &permutation);
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}
