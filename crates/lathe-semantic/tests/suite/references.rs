use pretty_assertions::assert_eq;

use lathe_core::{CancellationToken, TextSpan};
use lathe_semantic::SemanticModel;

use super::{declarator, model};

fn spans_of(text: &str, needle: &str) -> Vec<TextSpan> {
    text.match_indices(needle)
        .map(|(i, _)| TextSpan::from_len(i, needle.len()))
        .collect()
}

#[test]
fn local_references() {
    let text = "class C { void M(int p) { int x = p; x = x + p; } }";
    let m = model(text);
    let x = m.declared_symbol(&declarator(&m, "x")).unwrap();
    let refs = m.find_references(&x, &CancellationToken::new()).unwrap();
    assert_eq!(refs, spans_of(text, "x"));
}

#[test]
fn shadowed_field_is_distinct() {
    let text = "class C { int v; void M() { int v = 1; } void N() { v = 2; } }";
    let m = model(text);
    let field = m.declared_symbol(&declarator(&m, "v")).unwrap();
    let refs = m.find_references(&field, &CancellationToken::new()).unwrap();
    let declaration = text.find("v;").unwrap();
    let usage = text.find("v = 2").unwrap();
    assert_eq!(
        refs,
        vec![TextSpan::from_len(declaration, 1), TextSpan::from_len(usage, 1)]
    );
}

#[test]
fn cancelled_search() {
    let m = model("class C { int v; }");
    let field = m.declared_symbol(&declarator(&m, "v")).unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    assert!(m.find_references(&field, &cancel).is_err());
}
