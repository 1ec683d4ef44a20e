//! Constructors for fresh green syntax.
//!
//! Everything built here has the same shape the parser would produce for the
//! equivalent text, so a rewritten tree re-parses to the same structure.
//! Builders emit minimal spacing (single spaces around binary operators,
//! none inside parentheses); callers add layout trivia explicitly.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::literals::escape_string_literal_text;
use crate::parser::{parse_expression_fragment, parse_statement_fragment, parse_type_fragment, Parse};
use crate::rewrite::GreenElement;
use crate::SyntaxKind;

fn node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    GreenNode::new(kind.into(), children)
}

/// A token whose text is fixed by its kind (keywords and punctuation).
///
/// Kinds without fixed text produce an empty token.
pub fn token(kind: SyntaxKind) -> GreenToken {
    GreenToken::new(kind.into(), kind.text().unwrap_or(""))
}

pub fn token_with_text(kind: SyntaxKind, text: &str) -> GreenToken {
    GreenToken::new(kind.into(), text)
}

pub fn ident(name: &str) -> GreenToken {
    GreenToken::new(SyntaxKind::Identifier.into(), name)
}

pub fn whitespace(text: &str) -> GreenToken {
    GreenToken::new(SyntaxKind::Whitespace.into(), text)
}

pub fn space() -> GreenElement {
    whitespace(" ").into()
}

pub fn newline(eol: &str) -> GreenToken {
    GreenToken::new(SyntaxKind::Newline.into(), eol)
}

/// Newline followed by `indent` (omitted if empty).
pub fn line_break(eol: &str, indent: &str) -> Vec<GreenElement> {
    let mut out: Vec<GreenElement> = vec![newline(eol).into()];
    if !indent.is_empty() {
        out.push(whitespace(indent).into());
    }
    out
}

fn tok(kind: SyntaxKind) -> GreenElement {
    token(kind).into()
}

// --- Expressions ---------------------------------------------------------

pub fn name_expr(name: &str) -> GreenNode {
    node(SyntaxKind::NameExpression, vec![ident(name).into()])
}

pub fn literal(kind: SyntaxKind, text: &str) -> GreenNode {
    node(SyntaxKind::LiteralExpression, vec![token_with_text(kind, text).into()])
}

pub fn bool_literal(value: bool) -> GreenNode {
    node(
        SyntaxKind::LiteralExpression,
        vec![tok(if value { SyntaxKind::TrueKw } else { SyntaxKind::FalseKw })],
    )
}

pub fn null_literal() -> GreenNode {
    node(SyntaxKind::LiteralExpression, vec![tok(SyntaxKind::NullKw)])
}

/// Integer literal; negative values become a prefix `-` expression.
pub fn int_literal(value: i64) -> GreenNode {
    let magnitude = literal(SyntaxKind::IntLiteral, &value.unsigned_abs().to_string());
    if value < 0 {
        prefix_unary(SyntaxKind::Minus, magnitude)
    } else {
        magnitude
    }
}

/// A regular string literal with `value` escaped.
pub fn string_literal(value: &str) -> GreenNode {
    literal(
        SyntaxKind::StringLiteral,
        &format!("\"{}\"", escape_string_literal_text(value)),
    )
}

pub fn parenthesized(expr: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ParenthesizedExpression,
        vec![tok(SyntaxKind::LParen), expr.into(), tok(SyntaxKind::RParen)],
    )
}

pub fn prefix_unary(op: SyntaxKind, operand: GreenNode) -> GreenNode {
    node(SyntaxKind::PrefixUnaryExpression, vec![tok(op), operand.into()])
}

pub fn postfix_unary(operand: GreenNode, op: SyntaxKind) -> GreenNode {
    node(SyntaxKind::PostfixUnaryExpression, vec![operand.into(), tok(op)])
}

/// Binary expression with single spaces around the operator.
pub fn binary(lhs: GreenNode, op: SyntaxKind, rhs: GreenNode) -> GreenNode {
    node(
        SyntaxKind::BinaryExpression,
        vec![lhs.into(), space(), tok(op), space(), rhs.into()],
    )
}

pub fn binary_with_trivia(
    lhs: GreenNode,
    before_op: Vec<GreenElement>,
    op: Vec<GreenElement>,
    after_op: Vec<GreenElement>,
    rhs: GreenNode,
) -> GreenNode {
    let mut children: Vec<GreenElement> = vec![lhs.into()];
    children.extend(before_op);
    children.extend(op);
    children.extend(after_op);
    children.push(rhs.into());
    node(SyntaxKind::BinaryExpression, children)
}

pub fn assignment(lhs: GreenNode, op: SyntaxKind, rhs: GreenNode) -> GreenNode {
    node(
        SyntaxKind::AssignmentExpression,
        vec![lhs.into(), space(), tok(op), space(), rhs.into()],
    )
}

pub fn conditional(condition: GreenNode, when_true: GreenNode, when_false: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ConditionalExpression,
        vec![
            condition.into(),
            space(),
            tok(SyntaxKind::Question),
            space(),
            when_true.into(),
            space(),
            tok(SyntaxKind::Colon),
            space(),
            when_false.into(),
        ],
    )
}

pub fn member_access(expr: GreenNode, name: &str) -> GreenNode {
    node(
        SyntaxKind::MemberAccessExpression,
        vec![expr.into(), tok(SyntaxKind::Dot), ident(name).into()],
    )
}

pub fn this_access(name: &str) -> GreenNode {
    member_access(node(SyntaxKind::ThisExpression, vec![tok(SyntaxKind::ThisKw)]), name)
}

pub fn argument_list(args: Vec<GreenNode>) -> GreenNode {
    let mut children = vec![tok(SyntaxKind::LParen)];
    for (i, arg) in args.into_iter().enumerate() {
        if i > 0 {
            children.push(tok(SyntaxKind::Comma));
            children.push(space());
        }
        children.push(node(SyntaxKind::Argument, vec![arg.into()]).into());
    }
    children.push(tok(SyntaxKind::RParen));
    node(SyntaxKind::ArgumentList, children)
}

pub fn invocation(expr: GreenNode, args: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::InvocationExpression,
        vec![expr.into(), argument_list(args).into()],
    )
}

pub fn object_creation(ty: GreenNode, args: Vec<GreenNode>) -> GreenNode {
    node(
        SyntaxKind::ObjectCreationExpression,
        vec![tok(SyntaxKind::NewKw), space(), ty.into(), argument_list(args).into()],
    )
}

pub fn name_of(name: &str) -> GreenNode {
    invocation(name_expr("nameof"), vec![name_expr(name)])
}

/// `$"..."` from alternating text and expression parts. Text parts are
/// inserted verbatim and must already be escaped for an interpolated string.
pub fn interpolated_string(parts: Vec<InterpolatedPart>) -> GreenNode {
    let mut children = vec![token_with_text(SyntaxKind::InterpolatedStringStart, "$\"").into()];
    for part in parts {
        match part {
            InterpolatedPart::Text(text) if text.is_empty() => {}
            InterpolatedPart::Text(text) => {
                children.push(token_with_text(SyntaxKind::InterpolatedStringText, &text).into())
            }
            InterpolatedPart::Hole(expr) => children.push(
                node(
                    SyntaxKind::Interpolation,
                    vec![tok(SyntaxKind::LBrace), expr.into(), tok(SyntaxKind::RBrace)],
                )
                .into(),
            ),
            InterpolatedPart::Interpolation(green) => children.push(green.into()),
        }
    }
    children.push(token_with_text(SyntaxKind::InterpolatedStringEnd, "\"").into());
    node(SyntaxKind::InterpolatedStringExpression, children)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpolatedPart {
    Text(String),
    Hole(GreenNode),
    /// An existing `Interpolation` node, kept with its alignment and format.
    Interpolation(GreenNode),
}

// --- Types ---------------------------------------------------------------

pub fn predefined_type(keyword: SyntaxKind) -> GreenNode {
    node(SyntaxKind::PredefinedType, vec![tok(keyword)])
}

pub fn named_type(name: &str) -> GreenNode {
    node(SyntaxKind::NamedType, vec![ident(name).into()])
}

pub fn var_type() -> GreenNode {
    named_type("var")
}

// --- Statements ----------------------------------------------------------

pub fn expr_stmt(expr: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ExpressionStatement,
        vec![expr.into(), tok(SyntaxKind::Semicolon)],
    )
}

pub fn return_stmt(expr: Option<GreenNode>) -> GreenNode {
    let mut children = vec![tok(SyntaxKind::ReturnKw)];
    if let Some(expr) = expr {
        children.push(space());
        children.push(expr.into());
    }
    children.push(tok(SyntaxKind::Semicolon));
    node(SyntaxKind::ReturnStatement, children)
}

pub fn throw_stmt(expr: GreenNode) -> GreenNode {
    node(
        SyntaxKind::ThrowStatement,
        vec![tok(SyntaxKind::ThrowKw), space(), expr.into(), tok(SyntaxKind::Semicolon)],
    )
}

pub fn break_stmt() -> GreenNode {
    node(
        SyntaxKind::BreakStatement,
        vec![tok(SyntaxKind::BreakKw), tok(SyntaxKind::Semicolon)],
    )
}

pub fn equals_value(value: GreenNode) -> GreenNode {
    node(
        SyntaxKind::EqualsValueClause,
        vec![tok(SyntaxKind::Eq), space(), value.into()],
    )
}

pub fn variable_declarator(name: &str, init: Option<GreenNode>) -> GreenNode {
    let mut children: Vec<GreenElement> = vec![ident(name).into()];
    if let Some(init) = init {
        children.push(space());
        children.push(equals_value(init).into());
    }
    node(SyntaxKind::VariableDeclarator, children)
}

/// `ty d1, d2` from already-built declarators.
pub fn variable_declaration(ty: GreenNode, declarators: Vec<GreenNode>) -> GreenNode {
    let mut children: Vec<GreenElement> = vec![ty.into(), space()];
    for (i, declarator) in declarators.into_iter().enumerate() {
        if i > 0 {
            children.push(tok(SyntaxKind::Comma));
            children.push(space());
        }
        children.push(declarator.into());
    }
    node(SyntaxKind::VariableDeclaration, children)
}

pub fn local_decl(ty: GreenNode, name: &str, init: Option<GreenNode>) -> GreenNode {
    local_decl_from(variable_declaration(ty, vec![variable_declarator(name, init)]))
}

pub fn local_decl_from(declaration: GreenNode) -> GreenNode {
    node(
        SyntaxKind::LocalDeclarationStatement,
        vec![declaration.into(), tok(SyntaxKind::Semicolon)],
    )
}

/// `keyword (condition)` followed by `separator` and `body`.
fn headed_statement(
    keyword: SyntaxKind,
    condition: GreenNode,
    separator: Vec<GreenElement>,
    body: GreenNode,
) -> Vec<GreenElement> {
    let mut children = vec![
        tok(keyword),
        space(),
        tok(SyntaxKind::LParen),
        condition.into(),
        tok(SyntaxKind::RParen),
    ];
    children.extend(separator);
    children.push(body.into());
    children
}

pub fn if_stmt(
    condition: GreenNode,
    separator: Vec<GreenElement>,
    body: GreenNode,
    else_clause: Option<(Vec<GreenElement>, GreenNode)>,
) -> GreenNode {
    let mut children = headed_statement(SyntaxKind::IfKw, condition, separator, body);
    if let Some((before_else, clause)) = else_clause {
        children.extend(before_else);
        children.push(clause.into());
    }
    node(SyntaxKind::IfStatement, children)
}

pub fn else_clause(separator: Vec<GreenElement>, body: GreenNode) -> GreenNode {
    let mut children = vec![tok(SyntaxKind::ElseKw)];
    children.extend(separator);
    children.push(body.into());
    node(SyntaxKind::ElseClause, children)
}

pub fn while_stmt(condition: GreenNode, separator: Vec<GreenElement>, body: GreenNode) -> GreenNode {
    node(
        SyntaxKind::WhileStatement,
        headed_statement(SyntaxKind::WhileKw, condition, separator, body),
    )
}

/// A block with `statements` one per line. Statement greens are placed
/// as-is; multi-line statements must already carry `indent + unit`
/// indentation on their inner lines.
pub fn block(statements: Vec<GreenNode>, indent: &str, unit: &str, eol: &str) -> GreenNode {
    let inner = format!("{indent}{unit}");
    let mut children = vec![tok(SyntaxKind::LBrace)];
    for stmt in statements {
        children.extend(line_break(eol, &inner));
        children.push(stmt.into());
    }
    children.extend(line_break(eol, indent));
    children.push(tok(SyntaxKind::RBrace));
    node(SyntaxKind::Block, children)
}

/// A block whose interior is given verbatim (statements plus their trivia).
pub fn block_raw(interior: Vec<GreenElement>) -> GreenNode {
    let mut children = vec![tok(SyntaxKind::LBrace)];
    children.extend(interior);
    children.push(tok(SyntaxKind::RBrace));
    node(SyntaxKind::Block, children)
}

/// Generic node constructor for shapes without a dedicated builder.
pub fn raw_node(kind: SyntaxKind, children: Vec<GreenElement>) -> GreenNode {
    node(kind, children)
}

// --- Parsing helpers -----------------------------------------------------

fn fragment_root(parse: Parse) -> Option<GreenNode> {
    if parse.has_errors() {
        return None;
    }
    parse.syntax().first_child().map(|n| n.green().into_owned())
}

/// Parse `text` as an expression; `None` if it does not parse cleanly.
pub fn expr_from_text(text: &str) -> Option<GreenNode> {
    fragment_root(parse_expression_fragment(text))
}

pub fn stmt_from_text(text: &str) -> Option<GreenNode> {
    fragment_root(parse_statement_fragment(text))
}

pub fn type_from_text(text: &str) -> Option<GreenNode> {
    fragment_root(parse_type_fragment(text))
}

/// Green node or token as a generic element.
pub fn element(node: GreenNode) -> GreenElement {
    NodeOrToken::Node(node)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::SyntaxNode;

    fn text(green: GreenNode) -> String {
        SyntaxNode::new_root(green).to_string()
    }

    #[test]
    fn expressions_render_like_source() {
        let sum = binary(name_expr("a"), SyntaxKind::Plus, int_literal(-1));
        assert_eq!(text(sum.clone()), "a + -1");
        assert_eq!(text(parenthesized(sum)), "(a + -1)");
        assert_eq!(
            text(invocation(member_access(name_expr("s"), "Trim"), vec![string_literal("a\"b")])),
            "s.Trim(\"a\\\"b\")"
        );
        assert_eq!(
            text(object_creation(named_type("ArgumentNullException"), vec![name_of("value")])),
            "new ArgumentNullException(nameof(value))"
        );
    }

    #[test]
    fn built_statements_reparse_identically() {
        let stmt = if_stmt(
            binary(name_expr("a"), SyntaxKind::EqEq, null_literal()),
            vec![space()],
            throw_stmt(object_creation(named_type("Exception"), vec![])),
            None,
        );
        let rendered = text(stmt.clone());
        assert_eq!(rendered, "if (a == null) throw new Exception();");
        assert_eq!(stmt_from_text(&rendered), Some(stmt));

        let decl = local_decl(var_type(), "value", Some(int_literal(3)));
        assert_eq!(stmt_from_text("var value = 3;"), Some(decl));
    }

    #[test]
    fn block_layout() {
        let body = block(
            vec![expr_stmt(name_expr("a")), break_stmt()],
            "    ",
            "    ",
            "\n",
        );
        assert_eq!(text(body), "{\n        a;\n        break;\n    }");
    }

    #[test]
    fn interpolated_strings() {
        let s = interpolated_string(vec![
            InterpolatedPart::Text("ab".into()),
            InterpolatedPart::Hole(name_expr("x")),
            InterpolatedPart::Text("c".into()),
        ]);
        assert_eq!(text(s.clone()), "$\"ab{x}c\"");
        assert_eq!(expr_from_text("$\"ab{x}c\""), Some(s));
    }
}
