use lathe_semantic::{SemanticModel, SymbolKind};

use super::model;

const TEXT: &str = "class C { int f; void M(int p) { int a = 1; /*here*/ int b = 2; } }";

#[test]
fn locals_become_visible_after_their_statement() {
    let m = model(TEXT);
    let offset = TEXT.find("/*here*/").unwrap();
    let names: Vec<_> = m.lookup_symbols(offset).into_iter().map(|s| s.name).collect();
    assert!(names.iter().any(|n| n == "a"));
    assert!(names.iter().any(|n| n == "p"));
    assert!(names.iter().any(|n| n == "f"));
    assert!(names.iter().any(|n| n == "C"));
    assert!(!names.iter().any(|n| n == "b"));
}

#[test]
fn locals_are_listed_before_members() {
    let m = model(TEXT);
    let offset = TEXT.find("/*here*/").unwrap();
    let symbols = m.lookup_symbols(offset);
    let first_member = symbols.iter().position(|s| s.kind == SymbolKind::Field).unwrap();
    let last_local = symbols
        .iter()
        .rposition(|s| s.kind.is_local_or_parameter())
        .unwrap();
    assert!(last_local < first_member);
}

#[test]
fn names_declared_later_in_the_member_still_conflict() {
    let m = model(TEXT);
    let offset = TEXT.find("/*here*/").unwrap();
    assert!(m.is_name_visible("b", offset));
    assert!(!m.is_name_visible("z", offset));
}
