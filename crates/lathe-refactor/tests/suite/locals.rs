use lathe_refactor::RefactoringId;

use super::{check_not_offered, check_semantic, offered_ids, title};

#[test]
fn introduce_local_names_the_value_after_its_type() {
    let fixture = r#"
class Item { }

class C
{
    void M()
    {
        /*caret*/new Item();
    }
}
"#;
    let expected = r#"
class Item { }

class C
{
    void M()
    {
        var item = new Item();
    }
}
"#;
    check_semantic(RefactoringId::IntroduceLocalVariable, fixture, expected);
}

#[test]
fn introduce_local_avoids_taken_names() {
    let fixture = r#"
class Item { }

class C
{
    void M(int item)
    {
        /*caret*/new Item();
    }
}
"#;
    let expected = r#"
class Item { }

class C
{
    void M(int item)
    {
        var item2 = new Item();
    }
}
"#;
    check_semantic(RefactoringId::IntroduceLocalVariable, fixture, expected);
}

#[test]
fn introduce_local_skips_assignments() {
    let fixture = r#"
class C
{
    void M(int x)
    {
        /*caret*/x = 1;
    }
}
"#;
    check_not_offered(RefactoringId::IntroduceLocalVariable, fixture);
}

#[test]
fn introduce_local_needs_a_model() {
    let fixture = r#"
class Item { }

class C
{
    void M()
    {
        /*caret*/new Item();
    }
}
"#;
    assert!(!offered_ids(fixture, false).contains(&RefactoringId::IntroduceLocalVariable));
}

#[test]
fn use_explicit_type() {
    let fixture = r#"
class C
{
    void M()
    {
        v/*caret*/ar count = 1;
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        int count = 1;
    }
}
"#;
    check_semantic(RefactoringId::UseExplicitType, fixture, expected);
    assert_eq!(title(RefactoringId::UseExplicitType, fixture, true), "Use explicit type 'int'");
}

#[test]
fn use_implicit_type() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/string name = "x";
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        var name = "x";
    }
}
"#;
    check_semantic(RefactoringId::UseImplicitType, fixture, expected);
}

#[test]
fn implicit_type_would_change_the_type() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/long count = 1;
    }
}
"#;
    check_not_offered(RefactoringId::UseImplicitType, fixture);
}

#[test]
fn implicit_type_for_constants() {
    let fixture = r#"
class C
{
    void M()
    {
        const /*caret*/int count = 1;
    }
}
"#;
    check_not_offered(RefactoringId::UseImplicitType, fixture);
}

#[test]
fn null_check_goes_before_the_body() {
    let fixture = r#"
class C
{
    void M(string /*caret*/name)
    {
        Use(name);
    }
}
"#;
    let expected = r#"
class C
{
    void M(string name)
    {
        if (name == null)
            throw new ArgumentNullException(nameof(name));

        Use(name);
    }
}
"#;
    check_semantic(RefactoringId::AddParameterNullCheck, fixture, expected);
}

#[test]
fn null_check_goes_after_existing_checks() {
    let fixture = r#"
class C
{
    void M(string name, string /*caret*/other)
    {
        if (name == null) throw new ArgumentNullException(nameof(name));
        Use(name, other);
    }
}
"#;
    let expected = r#"
class C
{
    void M(string name, string other)
    {
        if (name == null) throw new ArgumentNullException(nameof(name));
        if (other == null)
            throw new ArgumentNullException(nameof(other));
        Use(name, other);
    }
}
"#;
    check_semantic(RefactoringId::AddParameterNullCheck, fixture, expected);
}

#[test]
fn null_check_not_repeated() {
    let fixture = r#"
class C
{
    void M(string /*caret*/name)
    {
        if (null == name) throw new ArgumentNullException(nameof(name));
    }
}
"#;
    check_not_offered(RefactoringId::AddParameterNullCheck, fixture);
}

#[test]
fn null_check_skips_value_types() {
    let fixture = r#"
class C
{
    void M(int /*caret*/count)
    {
        Use(count);
    }
}
"#;
    check_not_offered(RefactoringId::AddParameterNullCheck, fixture);
}

#[test]
fn null_check_skips_nullable_parameters() {
    let fixture = r#"
class C
{
    void M(string? /*caret*/name)
    {
        Use(name);
    }
}
"#;
    check_not_offered(RefactoringId::AddParameterNullCheck, fixture);
}

#[test]
fn rename_local_after_its_type() {
    let fixture = r#"
class Item { }

class C
{
    void M()
    {
        var /*caret*/x = new Item();
        Use(x);
    }
}
"#;
    let expected = r#"
class Item { }

class C
{
    void M()
    {
        var item = new Item();
        Use(item);
    }
}
"#;
    check_semantic(RefactoringId::RenameAccordingToTypeName, fixture, expected);
    assert_eq!(
        title(RefactoringId::RenameAccordingToTypeName, fixture, true),
        "Rename 'x' to 'item'"
    );
}

#[test]
fn rename_skips_names_that_already_match() {
    let fixture = r#"
class Item { }

class C
{
    void M()
    {
        var /*caret*/item = new Item();
    }
}
"#;
    check_not_offered(RefactoringId::RenameAccordingToTypeName, fixture);
}

#[test]
fn rename_skips_fields() {
    let fixture = r#"
class Item { }

class C
{
    private Item /*caret*/x = new Item();
}
"#;
    check_not_offered(RefactoringId::RenameAccordingToTypeName, fixture);
}
