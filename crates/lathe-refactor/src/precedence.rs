//! Operator precedence, used to decide where synthesized expressions need
//! parentheses.

use lathe_syntax::{make, AstNode, Expr, GreenNode, SyntaxKind, SyntaxNode};

pub(crate) const ASSIGNMENT: u8 = 1;
pub(crate) const CONDITIONAL: u8 = 2;
pub(crate) const COALESCE: u8 = 3;
pub(crate) const LOGICAL_OR: u8 = 4;
pub(crate) const LOGICAL_AND: u8 = 5;
pub(crate) const EQUALITY: u8 = 9;
pub(crate) const ADDITIVE: u8 = 12;
pub(crate) const MULTIPLICATIVE: u8 = 13;
pub(crate) const UNARY: u8 = 14;
pub(crate) const PRIMARY: u8 = 15;

pub(crate) fn binary_precedence(op: SyntaxKind, shift_right: bool) -> u8 {
    match op {
        SyntaxKind::QuestionQuestion => COALESCE,
        SyntaxKind::PipePipe => LOGICAL_OR,
        SyntaxKind::AmpAmp => LOGICAL_AND,
        SyntaxKind::Pipe => 6,
        SyntaxKind::Caret => 7,
        SyntaxKind::Amp => 8,
        SyntaxKind::EqEq | SyntaxKind::BangEq => EQUALITY,
        SyntaxKind::Greater if shift_right => 11,
        SyntaxKind::Less
        | SyntaxKind::Greater
        | SyntaxKind::LessEq
        | SyntaxKind::GreaterEq
        | SyntaxKind::IsKw
        | SyntaxKind::AsKw => 10,
        SyntaxKind::LessLess => 11,
        SyntaxKind::Plus | SyntaxKind::Minus => ADDITIVE,
        SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => MULTIPLICATIVE,
        _ => PRIMARY,
    }
}

pub(crate) fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::AssignmentExpression(_) | Expr::LambdaExpression(_) | Expr::ThrowExpression(_) => ASSIGNMENT,
        Expr::ConditionalExpression(_) => CONDITIONAL,
        Expr::BinaryExpression(binary) => match binary.op_kind() {
            Some(op) => binary_precedence(op, binary.is_shift_right()),
            None => PRIMARY,
        },
        Expr::PrefixUnaryExpression(_) | Expr::CastExpression(_) => UNARY,
        _ => PRIMARY,
    }
}

pub(crate) fn green_precedence(green: &GreenNode) -> u8 {
    match Expr::cast(SyntaxNode::new_root(green.clone())) {
        Some(expr) => precedence(&expr),
        None => PRIMARY,
    }
}

/// Wrap `green` in parentheses when its precedence is below `min`.
pub(crate) fn parenthesize_below(green: GreenNode, min: u8) -> GreenNode {
    if green_precedence(&green) < min {
        make::parenthesized(green)
    } else {
        green
    }
}

/// The lowest precedence an expression may have to stand where `node` is
/// without parentheses.
pub(crate) fn required_precedence(node: &SyntaxNode) -> u8 {
    let Some(parent) = node.parent() else {
        return ASSIGNMENT;
    };
    let is_first_child = parent.children().next().as_ref() == Some(node);
    match parent.kind() {
        SyntaxKind::MemberAccessExpression
        | SyntaxKind::InvocationExpression
        | SyntaxKind::ElementAccessExpression
        | SyntaxKind::PostfixUnaryExpression => {
            if is_first_child {
                PRIMARY
            } else {
                ASSIGNMENT
            }
        }
        SyntaxKind::PrefixUnaryExpression | SyntaxKind::CastExpression => UNARY,
        SyntaxKind::BinaryExpression => {
            let Some(binary) = lathe_syntax::BinaryExpression::cast(parent.clone()) else {
                return ASSIGNMENT;
            };
            let Some(op) = binary.op_kind() else {
                return ASSIGNMENT;
            };
            let level = binary_precedence(op, binary.is_shift_right());
            // Left associative, except `??`.
            match (is_first_child, op == SyntaxKind::QuestionQuestion) {
                (true, false) | (false, true) => level,
                (true, true) | (false, false) => level + 1,
            }
        }
        SyntaxKind::ConditionalExpression => {
            if is_first_child {
                COALESCE
            } else {
                CONDITIONAL
            }
        }
        SyntaxKind::AssignmentExpression => {
            if is_first_child {
                PRIMARY
            } else {
                ASSIGNMENT
            }
        }
        // `:` would start a format clause.
        SyntaxKind::Interpolation => CONDITIONAL + 1,
        _ => ASSIGNMENT,
    }
}

/// Operators for which `(a op b) op c == a op (b op c)`.
pub(crate) fn is_associative(op: SyntaxKind) -> bool {
    matches!(
        op,
        SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::Amp
            | SyntaxKind::Pipe
            | SyntaxKind::Caret
            | SyntaxKind::Star
            | SyntaxKind::Plus
            | SyntaxKind::QuestionQuestion
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expr_precedence(text: &str) -> u8 {
        green_precedence(&make::expr_from_text(text).unwrap())
    }

    #[test]
    fn levels_follow_the_language() {
        assert_eq!(expr_precedence("a = b"), ASSIGNMENT);
        assert_eq!(expr_precedence("a ? b : c"), CONDITIONAL);
        assert_eq!(expr_precedence("a || b"), LOGICAL_OR);
        assert_eq!(expr_precedence("a && b"), LOGICAL_AND);
        assert_eq!(expr_precedence("a == b"), EQUALITY);
        assert_eq!(expr_precedence("a >> 1"), 11);
        assert_eq!(expr_precedence("a > 1"), 10);
        assert_eq!(expr_precedence("a + b * c"), ADDITIVE);
        assert_eq!(expr_precedence("!a"), UNARY);
        assert_eq!(expr_precedence("a.b(c)"), PRIMARY);
    }

    #[test]
    fn parenthesizes_only_lower_levels() {
        let sum = make::expr_from_text("a + b").unwrap();
        let text = |g: GreenNode| SyntaxNode::new_root(g).to_string();
        assert_eq!(text(parenthesize_below(sum.clone(), MULTIPLICATIVE)), "(a + b)");
        assert_eq!(text(parenthesize_below(sum, ADDITIVE)), "a + b");
    }
}
