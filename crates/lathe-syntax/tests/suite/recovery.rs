use lathe_syntax::{parse, SyntaxKind};

#[test]
fn missing_semicolon_reports_error_and_keeps_going() {
    let parsed = parse("class C { void M() { a() b(); } void N() { } }");
    assert!(parsed.has_errors());
    let methods = parsed
        .syntax()
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::MethodDeclaration)
        .count();
    assert_eq!(methods, 2);
}

#[test]
fn garbage_member_is_wrapped_in_error_node() {
    let parsed = parse("class C { ) int x; }");
    assert!(parsed.has_errors());
    let root = parsed.syntax();
    assert!(root.descendants().any(|n| n.kind() == SyntaxKind::Error));
    assert!(root.descendants().any(|n| n.kind() == SyntaxKind::FieldDeclaration));
}

#[test]
fn recovery_stops_in_front_of_the_next_member() {
    let text = "class C { ) ) int x; public ) void M() { } }";
    let parsed = parse(text);
    assert!(parsed.has_errors());
    let root = parsed.syntax();
    assert_eq!(parsed.syntax().to_string(), text);
    let errors: Vec<String> = root
        .descendants()
        .filter(|n| n.kind() == SyntaxKind::Error)
        .map(|n| n.text().to_string().trim().to_string())
        .collect();
    assert_eq!(errors, vec![") )".to_string(), "public )".to_string()]);
    assert_eq!(root.descendants().filter(|n| n.kind() == SyntaxKind::FieldDeclaration).count(), 1);
    assert_eq!(root.descendants().filter(|n| n.kind() == SyntaxKind::MethodDeclaration).count(), 1);
}

#[test]
fn unterminated_block_reaches_end_of_file() {
    let text = "class C { void M() { if (a) {";
    let parsed = parse(text);
    assert!(parsed.has_errors());
    assert_eq!(parsed.syntax().to_string(), text);
}
