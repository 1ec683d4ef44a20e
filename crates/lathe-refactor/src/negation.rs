//! Logical negation of boolean expressions.

use lathe_syntax::{make, AstNode, BinaryExpression, Expr, GreenNode, SyntaxKind, SyntaxRewriter};

use crate::precedence::{self, green_precedence, UNARY};

fn green(expr: &Expr) -> GreenNode {
    expr.syntax().green().into_owned()
}

fn mirrored_comparison(op: SyntaxKind) -> Option<SyntaxKind> {
    Some(match op {
        SyntaxKind::EqEq => SyntaxKind::BangEq,
        SyntaxKind::BangEq => SyntaxKind::EqEq,
        SyntaxKind::Less => SyntaxKind::GreaterEq,
        SyntaxKind::GreaterEq => SyntaxKind::Less,
        SyntaxKind::Greater => SyntaxKind::LessEq,
        SyntaxKind::LessEq => SyntaxKind::Greater,
        _ => return None,
    })
}

/// The logical negation of `expr`, simplified where that is cheap:
/// `!x` loses its `!`, comparisons flip their operator, `&&`/`||` follow
/// De Morgan's laws. Everything else gets a `!` prefix, parenthesized when
/// the operand binds looser than a unary operator.
///
/// The result carries the trivia found inside `expr`; callers substitute it
/// for `expr` in place.
pub(crate) fn negate(expr: &Expr) -> GreenNode {
    match expr {
        Expr::PrefixUnaryExpression(unary) if unary.op_kind() == Some(SyntaxKind::Bang) => {
            if let Some(operand) = unary.operand() {
                return green(&operand);
            }
        }
        Expr::LiteralExpression(_) if expr.is_literal_of(SyntaxKind::TrueKw) => return make::bool_literal(false),
        Expr::LiteralExpression(_) if expr.is_literal_of(SyntaxKind::FalseKw) => return make::bool_literal(true),
        Expr::BinaryExpression(binary) => {
            if let Some(negated) = negate_binary(binary) {
                return negated;
            }
        }
        Expr::ParenthesizedExpression(paren) => {
            if let Some(inner) = paren.expr() {
                if matches!(inner, Expr::BinaryExpression(_) | Expr::ConditionalExpression(_)) {
                    let mut rewriter = SyntaxRewriter::new();
                    rewriter.replace(inner.syntax().clone(), negate(&inner));
                    return rewriter.rewrite(paren.syntax());
                }
                return negate(&inner);
            }
        }
        _ => {}
    }
    let operand = green(expr);
    if precedence::precedence(expr) >= UNARY {
        make::prefix_unary(SyntaxKind::Bang, operand)
    } else {
        make::prefix_unary(SyntaxKind::Bang, make::parenthesized(operand))
    }
}

fn negate_binary(binary: &BinaryExpression) -> Option<GreenNode> {
    let op_token = binary.op_token()?;
    let op = op_token.kind();
    let mut rewriter = SyntaxRewriter::new();
    if let Some(mirrored) = mirrored_comparison(op).filter(|_| !binary.is_shift_right()) {
        rewriter.replace(op_token, make::token(mirrored));
        return Some(rewriter.rewrite(binary.syntax()));
    }
    let new_op = match op {
        SyntaxKind::AmpAmp => SyntaxKind::PipePipe,
        SyntaxKind::PipePipe => SyntaxKind::AmpAmp,
        _ => return None,
    };
    let lhs = binary.lhs()?;
    let rhs = binary.rhs()?;
    let min = precedence::binary_precedence(new_op, false);
    for operand in [&lhs, &rhs] {
        let negated = negate(operand);
        let negated = if green_precedence(&negated) < min {
            make::parenthesized(negated)
        } else {
            negated
        };
        rewriter.replace(operand.syntax().clone(), negated);
    }
    rewriter.replace(op_token, make::token(new_op));
    Some(rewriter.rewrite(binary.syntax()))
}

#[cfg(test)]
mod tests {
    use lathe_syntax::SyntaxNode;
    use pretty_assertions::assert_eq;

    use super::*;

    fn negated(text: &str) -> String {
        let expr = Expr::cast(SyntaxNode::new_root(make::expr_from_text(text).unwrap())).unwrap();
        SyntaxNode::new_root(negate(&expr)).to_string()
    }

    #[test]
    fn simplifies_simple_forms() {
        assert_eq!(negated("!ready"), "ready");
        assert_eq!(negated("true"), "false");
        assert_eq!(negated("a == b"), "a != b");
        assert_eq!(negated("a < b"), "a >= b");
        assert_eq!(negated("a >= b"), "a < b");
        assert_eq!(negated("ready"), "!ready");
        assert_eq!(negated("x.IsEmpty()"), "!x.IsEmpty()");
    }

    #[test]
    fn applies_de_morgan() {
        assert_eq!(negated("a && b"), "!a || !b");
        assert_eq!(negated("a || b && c"), "!a && (!b || !c)");
        assert_eq!(negated("(a && b)"), "(!a || !b)");
        assert_eq!(negated("x > 0 && !done"), "x <= 0 || done");
    }

    #[test]
    fn wraps_loose_operands() {
        assert_eq!(negated("a ? b : c"), "!(a ? b : c)");
        assert_eq!(negated("x is string"), "!(x is string)");
        assert_eq!(negated("a >> 1 == b"), "a >> 1 != b");
    }
}
