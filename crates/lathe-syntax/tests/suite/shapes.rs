use pretty_assertions::assert_eq;

use lathe_syntax::SyntaxKind::*;
use lathe_syntax::{parse, parse_expression_fragment, AstNode, BinaryExpression, Expr};

use super::{first_of, node_kinds};

#[test]
fn binary_precedence() {
    let parse = parse_expression_fragment("a + b * c == d && e || f");
    assert_eq!(
        node_kinds(&parse.syntax()),
        vec![
            BinaryExpression, // ||
            BinaryExpression, // &&
            BinaryExpression, // ==
            BinaryExpression, // +
            NameExpression,
            BinaryExpression, // *
            NameExpression,
            NameExpression,
            NameExpression,
            NameExpression,
            NameExpression,
        ]
    );
}

#[test]
fn shift_right_is_two_adjacent_tokens() {
    let node = first_of("class C { int M() => a >> 2; }", BinaryExpression);
    let binary = BinaryExpression::cast(node).unwrap();
    assert!(binary.is_shift_right());
    assert_eq!(binary.syntax().to_string(), "a >> 2");
}

#[test]
fn generic_type_vs_comparison() {
    let decl = first_of("class C { void M() { List<int> xs = null; } }", LocalDeclarationStatement);
    assert!(decl.descendants().any(|n| n.kind() == TypeArgumentList));

    let stmt = first_of("class C { void M() { a = b < c; } }", ExpressionStatement);
    assert!(stmt.descendants().any(|n| n.kind() == BinaryExpression));
}

#[test]
fn trivia_sits_outside_nodes() {
    let text = "class C { void M() {\n    // lead\n    x = 1; // trail\n} }";
    let stmt = first_of(text, ExpressionStatement);
    assert_eq!(stmt.to_string(), "x = 1;");
}

#[test]
fn conditional_and_assignment_associativity() {
    let parse = parse_expression_fragment("a = b = c ? d : e ? f : g");
    let root = parse.syntax();
    let top = root.first_child().and_then(Expr::cast).unwrap();
    let Expr::AssignmentExpression(outer) = top else {
        panic!("expected assignment");
    };
    let Some(Expr::AssignmentExpression(inner)) = outer.rhs() else {
        panic!("expected nested assignment");
    };
    let Some(Expr::ConditionalExpression(cond)) = inner.rhs() else {
        panic!("expected conditional");
    };
    assert!(matches!(cond.when_false(), Some(Expr::ConditionalExpression(_))));
}

#[test]
fn member_kinds() {
    let root = parse(
        "class C { int f; int P { get; } int M() => 1; C() { } class N { } enum E { A } }",
    )
    .syntax();
    let class = root.first_child().unwrap();
    let kinds: Vec<_> = class
        .children()
        .map(|n| n.kind())
        .filter(|k| *k != Modifiers)
        .collect();
    assert_eq!(
        kinds,
        vec![
            FieldDeclaration,
            PropertyDeclaration,
            MethodDeclaration,
            ConstructorDeclaration,
            ClassDeclaration,
            EnumDeclaration,
        ]
    );
}
