use lathe_refactor::RefactoringId;

use super::{check, check_key, check_not_offered, offered_ids, title};

#[test]
fn arrow_body_becomes_block() {
    let fixture = r#"
class C
{
    int Get() /*caret*/=> 42;
}
"#;
    let expected = r#"
class C
{
    int Get()
    {
        return 42;
    }
}
"#;
    check(RefactoringId::ExpandExpressionBody, fixture, expected);
}

#[test]
fn arrow_body_of_void_method_becomes_statement() {
    let fixture = r#"
class C
{
    void Run() /*caret*/=> Work();
}
"#;
    let expected = r#"
class C
{
    void Run()
    {
        Work();
    }
}
"#;
    check(RefactoringId::ExpandExpressionBody, fixture, expected);
}

#[test]
fn arrow_property_gets_a_getter() {
    let fixture = r#"
class C
{
    int Value /*caret*/=> 1;
}
"#;
    let expected = r#"
class C
{
    int Value { get { return 1; } }
}
"#;
    check(RefactoringId::ExpandExpressionBody, fixture, expected);
}

#[test]
fn block_body_becomes_arrow() {
    let fixture = r#"
class C
{
    int Get()
    {
        /*caret*/return 42;
    }
}
"#;
    let expected = r#"
class C
{
    int Get() => 42;
}
"#;
    check(RefactoringId::UseExpressionBody, fixture, expected);
}

#[test]
fn getter_only_property_becomes_arrow() {
    let fixture = r#"
class C
{
    int Value
    {
        get { /*caret*/return 1; }
    }
}
"#;
    let expected = r#"
class C
{
    int Value => 1;
}
"#;
    check(RefactoringId::UseExpressionBody, fixture, expected);
}

#[test]
fn block_with_two_statements_keeps_its_body() {
    let fixture = r#"
class C
{
    void Run()
    {
        /*caret*/Work();
        Work();
    }
}
"#;
    check_not_offered(RefactoringId::UseExpressionBody, fixture);
}

#[test]
fn remove_member_takes_its_comment_along() {
    let fixture = r#"
class C
{
    // counter
    /*caret*/int a;
    int b;
}
"#;
    let expected = r#"
class C
{
    int b;
}
"#;
    check(RefactoringId::RemoveMember, fixture, expected);
}

#[test]
fn remove_member_keeps_blank_lines_before_it() {
    let fixture = r#"
class C
{
    int a;

    /*caret*/void M()
    {
    }
}
"#;
    let expected = r#"
class C
{
    int a;

}
"#;
    check(RefactoringId::RemoveMember, fixture, expected);
}

#[test]
fn member_actions_need_the_caret_on_the_header() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/Work();
    }
}
"#;
    let ids = offered_ids(fixture, false);
    assert!(!ids.contains(&RefactoringId::RemoveMember));
    assert!(!ids.contains(&RefactoringId::DuplicateMember));
}

#[test]
fn duplicate_method() {
    let fixture = r#"
class C
{
    /*caret*/void M()
    {
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
    }

    void M()
    {
    }
}
"#;
    check(RefactoringId::DuplicateMember, fixture, expected);
}

#[test]
fn duplicate_field() {
    let fixture = r#"
class C
{
    /*caret*/int a;
}
"#;
    let expected = r#"
class C
{
    int a;
    int a;
}
"#;
    check(RefactoringId::DuplicateMember, fixture, expected);
}

#[test]
fn comment_out_member() {
    let fixture = r#"
class C
{
    /*caret*/void M()
    {
    }
}
"#;
    let expected = r#"
class C
{
    // void M()
    // {
    // }
}
"#;
    check(RefactoringId::CommentOutMember, fixture, expected);
}

#[test]
fn change_accessibility_replaces_the_keyword() {
    check_key(
        "change-accessibility.private",
        "class C { /*caret*/public void M() { } }",
        "class C { private void M() { } }",
    );
    check_key(
        "change-accessibility.protected-internal",
        "class C { /*caret*/public void M() { } }",
        "class C { protected internal void M() { } }",
    );
}

#[test]
fn change_accessibility_keeps_other_modifiers() {
    check_key(
        "change-accessibility.internal",
        "class C { /*caret*/public static void M() { } }",
        "class C { internal static void M() { } }",
    );
}

#[test]
fn change_accessibility_adds_a_missing_modifier() {
    check_key(
        "change-accessibility.public",
        "class C { void /*caret*/M() { } }",
        "class C { public void M() { } }",
    );
    assert_eq!(
        title(RefactoringId::ChangeAccessibility, "class C { void /*caret*/M() { } }", false),
        "Change accessibility to 'public'"
    );
}

#[test]
fn struct_members_cannot_be_protected() {
    let (_, actions) = super::actions("struct S { /*caret*/public void M() { } }", false);
    let keys: Vec<String> = actions
        .into_iter()
        .filter(|a| a.id == RefactoringId::ChangeAccessibility)
        .filter_map(|a| a.equivalence_key)
        .collect();
    assert_eq!(keys, vec!["change-accessibility.internal", "change-accessibility.private"]);
}

#[test]
fn overrides_keep_their_accessibility() {
    check_not_offered(
        RefactoringId::ChangeAccessibility,
        "class C { /*caret*/public override string ToString() => \"\"; }",
    );
}

#[test]
fn sort_members_by_name() {
    let fixture = r#"
class C
{
    /*start*/int b;
    int a;/*end*/
}
"#;
    let expected = r#"
class C
{
    int a;
    int b;
}
"#;
    check_key("sort-member-declarations.name", fixture, expected);
}

#[test]
fn sort_members_by_kind() {
    let fixture = r#"
class C
{
    /*start*/void M() { }
    int a;/*end*/
}
"#;
    let expected = r#"
class C
{
    int a;
    void M() { }
}
"#;
    check_key("sort-member-declarations.kind", fixture, expected);
}

#[test]
fn sort_members_skips_commented_gaps() {
    let fixture = r#"
class C
{
    /*start*/int b;
    // keep
    int a;/*end*/
}
"#;
    check_not_offered(RefactoringId::SortMemberDeclarations, fixture);
}

#[test]
fn accessibility_titles_spell_every_keyword() {
    let (_, actions) = super::actions("class C { /*caret*/public void M() { } }", false);
    let titles: Vec<(Option<String>, String)> = actions
        .into_iter()
        .filter(|a| a.id == RefactoringId::ChangeAccessibility)
        .map(|a| (a.equivalence_key, a.title))
        .collect();
    assert!(
        titles.contains(&(
            Some("change-accessibility.protected-internal".to_string()),
            "Change accessibility to 'protected internal'".to_string()
        )),
        "{titles:?}"
    );
    assert!(
        titles.contains(&(
            Some("change-accessibility.private-protected".to_string()),
            "Change accessibility to 'private protected'".to_string()
        )),
        "{titles:?}"
    );
}
