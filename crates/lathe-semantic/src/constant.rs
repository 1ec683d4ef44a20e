use lathe_syntax::{parse_int_literal, unescape_char_literal, Expr, SyntaxKind};

/// Fold an integer constant expression. Names (simple or the last segment of
/// a member access) are looked up through `resolve`.
pub fn evaluate_constant(expr: &Expr, resolve: &mut dyn FnMut(&str) -> Option<i64>) -> Option<i64> {
    match expr {
        Expr::LiteralExpression(lit) => {
            let token = lit.token()?;
            match token.kind() {
                SyntaxKind::IntLiteral => parse_int_literal(token.text()).ok()?.try_into().ok(),
                SyntaxKind::CharLiteral => unescape_char_literal(token.text()).ok().map(|c| c as i64),
                _ => None,
            }
        }
        Expr::ParenthesizedExpression(paren) => evaluate_constant(&paren.expr()?, resolve),
        Expr::CastExpression(cast) => evaluate_constant(&cast.expr()?, resolve),
        Expr::NameExpression(name) => resolve(&name.name()?),
        Expr::MemberAccessExpression(access) => resolve(access.name_token()?.text()),
        Expr::PrefixUnaryExpression(unary) => {
            let operand = evaluate_constant(&unary.operand()?, resolve)?;
            match unary.op_kind()? {
                SyntaxKind::Minus => operand.checked_neg(),
                SyntaxKind::Plus => Some(operand),
                SyntaxKind::Tilde => Some(!operand),
                _ => None,
            }
        }
        Expr::BinaryExpression(binary) => {
            let lhs = evaluate_constant(&binary.lhs()?, resolve)?;
            let rhs = evaluate_constant(&binary.rhs()?, resolve)?;
            if binary.is_shift_right() {
                return lhs.checked_shr(u32::try_from(rhs).ok()?);
            }
            match binary.op_kind()? {
                SyntaxKind::Plus => lhs.checked_add(rhs),
                SyntaxKind::Minus => lhs.checked_sub(rhs),
                SyntaxKind::Star => lhs.checked_mul(rhs),
                SyntaxKind::Slash => lhs.checked_div(rhs),
                SyntaxKind::Percent => lhs.checked_rem(rhs),
                SyntaxKind::LessLess => lhs.checked_shl(u32::try_from(rhs).ok()?),
                SyntaxKind::Pipe => Some(lhs | rhs),
                SyntaxKind::Amp => Some(lhs & rhs),
                SyntaxKind::Caret => Some(lhs ^ rhs),
                _ => None,
            }
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use lathe_syntax::{parse_expression_fragment, AstNode};

    use super::*;

    fn eval(text: &str) -> Option<i64> {
        let parse = parse_expression_fragment(text);
        let expr = parse.syntax().first_child().and_then(Expr::cast)?;
        evaluate_constant(&expr, &mut |name| (name == "A").then_some(4))
    }

    #[test]
    fn folds_integer_arithmetic() {
        assert_eq!(eval("1 << 3 | 1"), Some(9));
        assert_eq!(eval("-(2 + 3) * 2"), Some(-10));
        assert_eq!(eval("Flags.A + 1"), Some(5));
        assert_eq!(eval("0x10 >> 2"), Some(4));
        assert_eq!(eval("'a'"), Some(97));
        assert_eq!(eval("1 / 0"), None);
        assert_eq!(eval("B"), None);
        assert_eq!(eval("\"s\""), None);
    }
}
