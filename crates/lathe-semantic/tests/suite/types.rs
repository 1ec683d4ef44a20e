use pretty_assertions::assert_eq;

use lathe_semantic::{PredefinedType, SemanticModel, SymbolKind, TypeInfo, TypeKind};
use lathe_syntax::SyntaxKind::*;

use super::{declarator, model, node};

fn predefined(p: PredefinedType) -> TypeInfo {
    TypeInfo::Predefined(p)
}

#[test]
fn binary_operators() {
    let m = model(
        "class C { void M(double? d) { var a = 1 + 2L; var s = \"x\" + 1; var b = 1 < 2; var e = d ?? 0.5; var f = d * 2; } }",
    );
    let ty = |text: &str| m.type_of_expression(&node(&m, BinaryExpression, text));
    assert_eq!(ty("1 + 2L"), predefined(PredefinedType::Long));
    assert_eq!(ty("\"x\" + 1"), predefined(PredefinedType::String));
    assert_eq!(ty("1 < 2"), predefined(PredefinedType::Bool));
    assert_eq!(ty("d ?? 0.5"), predefined(PredefinedType::Double));
    assert_eq!(ty("d * 2"), TypeInfo::Nullable(Box::new(predefined(PredefinedType::Double))));
}

#[test]
fn var_and_foreach_inference() {
    let m = model(
        "class C { void M() { var xs = new List<int>(); foreach (var x in xs) { var y = x; } var n = xs.Count; } }",
    );
    let list = TypeInfo::Named {
        name: "List".into(),
        args: vec![predefined(PredefinedType::Int)],
        kind: TypeKind::Class,
    };
    let ty = |name: &str| m.declared_symbol(&declarator(&m, name)).unwrap().ty;
    assert_eq!(ty("xs"), list);
    assert_eq!(ty("y"), predefined(PredefinedType::Int));
    assert_eq!(ty("n"), predefined(PredefinedType::Int));
}

#[test]
fn members_of_source_types() {
    let m = model(
        "class P { public int Count { get; set; } private readonly string _name; void M() { var n = this.Count; var l = _name.Length; } }",
    );
    assert_eq!(
        m.type_of_expression(&node(&m, MemberAccessExpression, "this.Count")),
        predefined(PredefinedType::Int)
    );
    assert_eq!(
        m.type_of_expression(&node(&m, MemberAccessExpression, "_name.Length")),
        predefined(PredefinedType::Int)
    );

    let field = m.symbol_of(&node(&m, NameExpression, "_name")).unwrap();
    assert_eq!(field.kind, SymbolKind::Field);
    assert!(field.modifiers.is_readonly);
    assert!(field.modifiers.is_private);
    assert_eq!(field.container.as_deref(), Some("P"));

    let count = m.symbol_of(&node(&m, MemberAccessExpression, "this.Count")).unwrap();
    assert_eq!(count.kind, SymbolKind::Property);
    assert!(count.modifiers.has_setter);
}

#[test]
fn enum_member_values() {
    let m = model("enum E { A, B = 4, C, D = B | A }");
    let values: Vec<_> = m
        .root()
        .descendants()
        .filter(|n| n.kind() == EnumMemberDeclaration)
        .map(|n| m.declared_symbol(&n).unwrap().constant_value)
        .collect();
    assert_eq!(values, vec![Some(0), Some(4), Some(5), Some(4)]);
}

#[test]
fn cyclic_constants_do_not_fold() {
    let m = model("class C { const int A = B; const int B = A; }");
    let a = m.declared_symbol(&declarator(&m, "A")).unwrap();
    assert_eq!(a.constant_value, None);
    assert!(a.modifiers.is_const);
}

#[test]
fn var_is_not_a_type() {
    let m = model("class C { void M() { var x = 1; } }");
    assert_eq!(m.type_from_syntax(&node(&m, NamedType, "var")), TypeInfo::Error);
}

#[test]
fn interfaces_through_bases() {
    let m = model("class Bag : IDisposable { } class Sack : Bag { }");
    let sack = TypeInfo::named("Sack", TypeKind::Class);
    assert!(m.implements_interface(&sack, "IDisposable"));
    assert!(!m.implements_interface(&sack, "IEnumerable"));

    let list = TypeInfo::Named {
        name: "List".into(),
        args: vec![predefined(PredefinedType::Int)],
        kind: TypeKind::Class,
    };
    assert!(m.implements_interface(&list, "IEnumerable"));
    assert!(m.implements_interface(&predefined(PredefinedType::String), "IEnumerable"));
}
