use pretty_assertions::assert_eq;

use super::*;
use crate::parse;

fn first<N: AstNode>(text: &str) -> N {
    parse(text)
        .syntax()
        .descendants()
        .find_map(N::cast)
        .expect("node of requested kind")
}

#[test]
fn method_accessors() {
    let method: MethodDeclaration =
        first("class C { public static int Add(int a, int b) => a + b; }");
    assert_eq!(method.name().as_deref(), Some("Add"));
    assert!(method.has_modifier(SyntaxKind::StaticKw));
    assert_eq!(method.parameter_list().unwrap().parameters().count(), 2);
    assert_eq!(
        method.expression_body().unwrap().expr().unwrap().syntax().to_string(),
        "a + b"
    );
    assert!(method.body().is_none());
}

#[test]
fn for_statement_sections() {
    let stmt: ForStatement = first("class C { void M() { for (i = 0, j = 1; i < n; i++, j--) {} } }");
    assert_eq!(stmt.initializers().len(), 2);
    assert_eq!(stmt.condition().unwrap().syntax().to_string(), "i < n");
    assert_eq!(
        stmt.incrementors()
            .iter()
            .map(|e| e.syntax().to_string())
            .collect::<Vec<_>>(),
        vec!["i++", "j--"]
    );
}

#[test]
fn field_member_name_is_first_declarator() {
    let ty: TypeDeclaration = first("class C { int a, b; string S { get; set; } }");
    let names: Vec<_> = ty.members().filter_map(|m| m.name()).collect();
    assert_eq!(names, vec!["a", "S"]);
}

#[test]
fn var_detection() {
    let decl: VariableDeclaration = first("class C { void M() { var x = 1; } }");
    match decl.ty().unwrap() {
        Type::NamedType(named) => assert!(named.is_var()),
        other => panic!("unexpected type {other:?}"),
    }
}

#[test]
fn without_parentheses_strips_nesting() {
    let expr: Expr = first::<ParenthesizedExpression>("class C { int X => ((a)); }").into();
    assert_eq!(expr.without_parentheses().unwrap().syntax().to_string(), "a");
}
