//! String concatenation and interpolated string conversions.

use lathe_config::RefactoringId;
use lathe_core::{Cancelled, TextSpan};
use lathe_syntax::{
    interpolated_text_to_literal_text, make, make::InterpolatedPart, AstNode, BinaryExpression, Expr, GreenNode,
    InterpolatedStringExpression, Interpolation, NodeOrToken, SyntaxKind, SyntaxNode, SyntaxRewriter,
};

use crate::precedence::{green_precedence, parenthesize_below, required_precedence, ADDITIVE, CONDITIONAL, MULTIPLICATIVE};
use crate::tree::{green, span, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

/// One operand of a `+` chain, classified for folding.
enum Operand {
    Literal { verbatim: bool, inner: String },
    Interpolated { verbatim: bool, node: InterpolatedStringExpression },
    Other(Expr),
}

impl Operand {
    fn classify(expr: &Expr) -> Operand {
        match expr {
            Expr::LiteralExpression(literal) => {
                let Some(token) = literal.token() else {
                    return Operand::Other(expr.clone());
                };
                let text = token.text();
                let inner = match token.kind() {
                    SyntaxKind::StringLiteral => text.strip_prefix('"').and_then(|t| t.strip_suffix('"')),
                    SyntaxKind::VerbatimStringLiteral => text.strip_prefix("@\"").and_then(|t| t.strip_suffix('"')),
                    _ => None,
                };
                match inner {
                    Some(inner) => Operand::Literal {
                        verbatim: token.kind() == SyntaxKind::VerbatimStringLiteral,
                        inner: inner.to_string(),
                    },
                    None => Operand::Other(expr.clone()),
                }
            }
            Expr::InterpolatedStringExpression(node) => Operand::Interpolated {
                verbatim: node.is_verbatim(),
                node: node.clone(),
            },
            other => Operand::Other(other.clone()),
        }
    }

    fn is_string(&self) -> bool {
        !matches!(self, Operand::Other(_))
    }

    fn verbatim(&self) -> Option<bool> {
        match self {
            Operand::Literal { verbatim, .. } | Operand::Interpolated { verbatim, .. } => Some(*verbatim),
            Operand::Other(_) => None,
        }
    }
}

/// Operands of a left-associative `+` chain, left to right.
fn chain_operands(expr: &Expr) -> Vec<Expr> {
    match expr {
        Expr::BinaryExpression(binary) if binary.op_kind() == Some(SyntaxKind::Plus) => {
            let (Some(lhs), Some(rhs)) = (binary.lhs(), binary.rhs()) else {
                return vec![expr.clone()];
            };
            let mut operands = chain_operands(&lhs);
            operands.push(rhs);
            operands
        }
        _ => vec![expr.clone()],
    }
}

fn is_chain_top(binary: &BinaryExpression) -> bool {
    if binary.op_kind() != Some(SyntaxKind::Plus) {
        return false;
    }
    let parent = binary.syntax().parent().and_then(BinaryExpression::cast);
    !parent.map_or(false, |p| {
        p.op_kind() == Some(SyntaxKind::Plus) && p.lhs().as_ref().map(|l| l.syntax()) == Some(binary.syntax())
    })
}

/// Index range of the operands to join, given the selection.
fn selected_run(operands: &[Expr], selection: TextSpan, chain: TextSpan) -> Option<(usize, usize)> {
    if selection.is_empty() {
        return chain.contains_inclusive(selection.start).then_some((0, operands.len() - 1));
    }
    if !chain.contains_span(selection) {
        return None;
    }
    let inside: Vec<usize> = operands
        .iter()
        .enumerate()
        .filter(|(_, o)| selection.contains_span(span(o.syntax())))
        .map(|(i, _)| i)
        .collect();
    let (&first, &last) = (inside.first()?, inside.last()?);
    // A selection cutting through an operand joins nothing.
    let cut = operands
        .iter()
        .any(|o| !selection.contains_span(span(o.syntax())) && selection.overlaps(span(o.syntax())));
    (!cut && last > first).then_some((first, last))
}

struct JoinPlan {
    first: usize,
    last: usize,
    all_literals: bool,
}

fn plan_join(operands: &[Operand], first: usize, last: usize) -> Option<JoinPlan> {
    // The chain must be string concatenation from the start.
    if !operands.iter().take(2).any(Operand::is_string) {
        return None;
    }
    let run = &operands[first..=last];
    if !run.iter().any(Operand::is_string) {
        return None;
    }
    let mut flavors = run.iter().filter_map(Operand::verbatim);
    let flavor = flavors.next()?;
    if !flavors.all(|v| v == flavor) {
        return None;
    }
    Some(JoinPlan {
        first,
        last,
        all_literals: run.iter().all(|o| matches!(o, Operand::Literal { .. })),
    })
}

pub(super) fn compute_join(ctx: &RefactoringContext<'_>, binary: &BinaryExpression) -> Result<(), Cancelled> {
    if !ctx.is_enabled(RefactoringId::JoinStringExpressions) || !is_chain_top(binary) {
        return Ok(());
    }
    let top = Expr::BinaryExpression(binary.clone());
    let exprs = chain_operands(&top);
    let Some((first, last)) = selected_run(&exprs, ctx.span(), span(binary.syntax())) else {
        return Ok(());
    };
    let operands: Vec<Operand> = exprs.iter().map(Operand::classify).collect();
    let Some(plan) = plan_join(&operands, first, last) else {
        return Ok(());
    };
    if let Some(model) = ctx.semantic_model()? {
        if !model.type_of_expression(binary.syntax()).is_string() {
            return Ok(());
        }
    }

    let title = if plan.all_literals {
        "Join string literals"
    } else {
        "Join to interpolated string"
    };
    let ptr = NodePtr::new(binary.syntax());
    let (first, last) = (plan.first, plan.last);
    ctx.register(RefactoringId::JoinStringExpressions, title, move |doc, _| {
        let root = doc.syntax();
        let binary: BinaryExpression = ptr.cast(&root)?;
        let exprs = chain_operands(&Expr::BinaryExpression(binary));
        let operands: Vec<Operand> = exprs.iter().map(Operand::classify).collect();
        let plan = plan_join(&operands, first, last)
            .ok_or_else(|| RefactorError::invalid_target("operands no longer join"))?;
        let joined = join(&operands[plan.first..=plan.last], plan.all_literals);

        let mut rewriter = SyntaxRewriter::new();
        // Node spanning operands `0..=last`: the operand itself at 0, else its `+` parent.
        let covering = |index: usize| -> Result<SyntaxNode, RefactorError> {
            let operand = exprs[index].syntax();
            if index == 0 {
                return Ok(operand.clone());
            }
            operand
                .parent()
                .ok_or_else(|| RefactorError::invalid_target("operand has no parent"))
        };
        let replaced = covering(plan.last)?;
        if plan.first == 0 {
            rewriter.replace(replaced, joined);
        } else {
            let kept = covering(plan.first)?;
            let mut sub = SyntaxRewriter::new();
            sub.replace(exprs[plan.first].syntax().clone(), joined);
            rewriter.replace(replaced, sub.rewrite(&kept));
        }
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
    Ok(())
}

fn join(run: &[Operand], all_literals: bool) -> GreenNode {
    let verbatim = run.iter().find_map(Operand::verbatim).unwrap_or(false);
    if all_literals {
        let inner: String = run
            .iter()
            .filter_map(|o| match o {
                Operand::Literal { inner, .. } => Some(inner.as_str()),
                _ => None,
            })
            .collect();
        return if verbatim {
            make::literal(SyntaxKind::VerbatimStringLiteral, &format!("@\"{inner}\""))
        } else {
            make::literal(SyntaxKind::StringLiteral, &format!("\"{inner}\""))
        };
    }

    let mut parts = Vec::new();
    let mut text = String::new();
    let flush = |text: &mut String, parts: &mut Vec<InterpolatedPart>| {
        if !text.is_empty() {
            parts.push(InterpolatedPart::Text(std::mem::take(text)));
        }
    };
    for operand in run {
        match operand {
            Operand::Literal { inner, .. } => text.push_str(&inner.replace('{', "{{").replace('}', "}}")),
            Operand::Interpolated { node, .. } => {
                for child in node.syntax().children_with_tokens() {
                    match child {
                        NodeOrToken::Token(token) if token.kind() == SyntaxKind::InterpolatedStringText => {
                            text.push_str(token.text())
                        }
                        NodeOrToken::Node(interpolation) if interpolation.kind() == SyntaxKind::Interpolation => {
                            flush(&mut text, &mut parts);
                            parts.push(InterpolatedPart::Interpolation(green(&interpolation)));
                        }
                        _ => {}
                    }
                }
            }
            Operand::Other(expr) => {
                flush(&mut text, &mut parts);
                let hole = green(expr.syntax());
                let hole = if green_precedence(&hole) <= CONDITIONAL {
                    make::parenthesized(hole)
                } else {
                    hole
                };
                parts.push(InterpolatedPart::Hole(hole));
            }
        }
    }
    flush(&mut text, &mut parts);
    interpolated(parts, verbatim)
}

fn interpolated(parts: Vec<InterpolatedPart>, verbatim: bool) -> GreenNode {
    let node = make::interpolated_string(parts);
    if verbatim {
        node.replace_child(0, make::token_with_text(SyntaxKind::InterpolatedStringStart, "$@\"").into())
    } else {
        node
    }
}

/// The pieces of an interpolated string: literal text (still escaped for
/// the interpolated form) and holes.
enum Piece {
    Text(String),
    Hole(Expr),
}

/// `None` if some hole has an alignment or format clause.
fn pieces(node: &InterpolatedStringExpression) -> Option<Vec<Piece>> {
    let mut pieces: Vec<Piece> = Vec::new();
    for child in node.syntax().children_with_tokens() {
        match child {
            NodeOrToken::Token(token) if token.kind() == SyntaxKind::InterpolatedStringText => match pieces.last_mut() {
                Some(Piece::Text(text)) => text.push_str(token.text()),
                _ => pieces.push(Piece::Text(token.text().to_string())),
            },
            NodeOrToken::Node(child) if child.kind() == SyntaxKind::Interpolation => {
                let interpolation = Interpolation::cast(child)?;
                if interpolation.alignment().is_some() || interpolation.format().is_some() {
                    return None;
                }
                pieces.push(Piece::Hole(interpolation.expr()?));
            }
            _ => {}
        }
    }
    Some(pieces)
}

fn string_literal(raw_interpolated_text: &str, verbatim: bool) -> GreenNode {
    let text = interpolated_text_to_literal_text(raw_interpolated_text);
    if verbatim {
        make::literal(SyntaxKind::VerbatimStringLiteral, &format!("@\"{text}\""))
    } else {
        make::literal(SyntaxKind::StringLiteral, &format!("\"{text}\""))
    }
}

pub(super) fn compute_interpolated(ctx: &RefactoringContext<'_>, node: &InterpolatedStringExpression) {
    if !span(node.syntax()).contains_span(ctx.span()) {
        return;
    }
    let Some(parts) = pieces(node) else {
        return;
    };
    let has_holes = parts.iter().any(|p| matches!(p, Piece::Hole(_)));

    if has_holes
        && ctx.is_enabled(RefactoringId::ConvertInterpolatedStringToConcatenation)
        && matches!(parts.first(), Some(Piece::Text(_)))
    {
        let ptr = NodePtr::new(node.syntax());
        ctx.register(
            RefactoringId::ConvertInterpolatedStringToConcatenation,
            "Convert to concatenation",
            move |doc, _| {
                let root = doc.syntax();
                let node: InterpolatedStringExpression = ptr.cast(&root)?;
                let verbatim = node.is_verbatim();
                let parts = pieces(&node).ok_or_else(|| RefactorError::invalid_target("interpolation has a format"))?;
                let mut operands = parts.iter().map(|piece| match piece {
                    Piece::Text(text) => string_literal(text.as_str(), verbatim),
                    Piece::Hole(expr) => parenthesize_below(green(expr.syntax()), MULTIPLICATIVE),
                });
                let head = operands
                    .next()
                    .ok_or_else(|| RefactorError::invalid_target("empty interpolated string"))?;
                let chain = operands.fold(head, |acc, next| make::binary(acc, SyntaxKind::Plus, next));
                let chain = if ADDITIVE < required_precedence(node.syntax()) {
                    make::parenthesized(chain)
                } else {
                    chain
                };
                let mut rewriter = SyntaxRewriter::new();
                rewriter.replace(node.syntax().clone(), chain);
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            },
        );
    }

    if !has_holes && ctx.is_enabled(RefactoringId::ConvertInterpolatedStringToStringLiteral) {
        let ptr = NodePtr::new(node.syntax());
        ctx.register(
            RefactoringId::ConvertInterpolatedStringToStringLiteral,
            "Remove '$'",
            move |doc, _| {
                let root = doc.syntax();
                let node: InterpolatedStringExpression = ptr.cast(&root)?;
                let text: String = node
                    .syntax()
                    .children_with_tokens()
                    .filter_map(|c| c.into_token())
                    .filter(|t| t.kind() == SyntaxKind::InterpolatedStringText)
                    .map(|t| t.text().to_string())
                    .collect();
                let mut rewriter = SyntaxRewriter::new();
                rewriter.replace(node.syntax().clone(), string_literal(&text, node.is_verbatim()));
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            },
        );
    }
}
