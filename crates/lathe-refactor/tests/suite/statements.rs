use lathe_refactor::RefactoringId;

use super::{check, check_not_offered, check_semantic};

#[test]
fn consecutive_ifs_with_same_body_merge() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        /*start*/if (a) return;
        if (b) return;/*end*/
        x();
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a || b) return;
        x();
    }
}
"#;
    check(RefactoringId::MergeIfStatements, fixture, expected);
}

#[test]
fn ifs_with_different_bodies_do_not_merge() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        /*start*/if (a) return;
        if (b) x();/*end*/
    }
}
"#;
    check_not_offered(RefactoringId::MergeIfStatements, fixture);
}

#[test]
fn local_declarations_of_same_type_merge() {
    let fixture = r#"
class C
{
    void M()
    {
        /*start*/int a = 1;
        int b = 2;/*end*/
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        int a = 1, b = 2;
    }
}
"#;
    check(RefactoringId::MergeLocalDeclarations, fixture, expected);
}

#[test]
fn implicitly_typed_declarations_do_not_merge() {
    let fixture = r#"
class C
{
    void M()
    {
        /*start*/var a = 1;
        var b = 2;/*end*/
    }
}
"#;
    check_not_offered(RefactoringId::MergeLocalDeclarations, fixture);
}

#[test]
fn declaration_followed_by_return_merges_without_semantics() {
    let fixture = r#"
class C
{
    int M()
    {
        /*start*/var total = Sum();
        return total;/*end*/
    }
}
"#;
    let expected = r#"
class C
{
    int M()
    {
        return Sum();
    }
}
"#;
    check(RefactoringId::MergeAssignmentWithReturn, fixture, expected);
}

#[test]
fn assignment_to_a_field_is_not_merged() {
    let fixture = r#"
class C
{
    int result;

    int M()
    {
        /*start*/result = Compute();
        return result;/*end*/
    }
}
"#;
    check_not_offered(RefactoringId::MergeAssignmentWithReturn, fixture);
}

#[test]
fn statements_wrap_in_try_catch() {
    let fixture = r#"
class C
{
    void M()
    {
        /*start*/a();
        b();/*end*/
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        try
        {
            a();
            b();
        }
        catch (Exception ex)
        {
            throw;
        }
    }
}
"#;
    check(RefactoringId::WrapInTryCatch, fixture, expected);
}

#[test]
fn catch_variable_avoids_existing_names() {
    let fixture = r#"
class C
{
    void M(int ex)
    {
        /*start*/a();/*end*/
    }
}
"#;
    let expected = r#"
class C
{
    void M(int ex)
    {
        try
        {
            a();
        }
        catch (Exception ex2)
        {
            throw;
        }
    }
}
"#;
    check(RefactoringId::WrapInTryCatch, fixture, expected);
}

#[test]
fn statements_wrap_in_condition() {
    let fixture = r#"
class C
{
    void M()
    {
        /*start*/a();
        b();/*end*/
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        if (condition)
        {
            a();
            b();
        }
    }
}
"#;
    check(RefactoringId::WrapInIf, fixture, expected);
}

#[test]
fn lone_declaration_is_not_wrapped() {
    let fixture = r#"
class C
{
    void M()
    {
        /*start*/int a = 1;/*end*/
        Use(a);
    }
}
"#;
    check_not_offered(RefactoringId::WrapInTryCatch, fixture);
    check_not_offered(RefactoringId::WrapInIf, fixture);
}

#[test]
fn local_declaration_splits() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/int a = 1, b;
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        int a = 1;
        int b;
    }
}
"#;
    check(RefactoringId::SplitVariableDeclaration, fixture, expected);
}

#[test]
fn field_declaration_splits_with_modifiers() {
    let fixture = r#"
class C
{
    private /*caret*/int a, b;
}
"#;
    let expected = r#"
class C
{
    private int a;
    private int b;
}
"#;
    check(RefactoringId::SplitVariableDeclaration, fixture, expected);
}

#[test]
fn caret_inside_an_initializer_does_not_split() {
    let fixture = r#"
class C
{
    void M()
    {
        int a = 1/*caret*/0, b;
    }
}
"#;
    check_not_offered(RefactoringId::SplitVariableDeclaration, fixture);
}

#[test]
fn merge_needs_a_model_to_prove_the_target_is_local() {
    let fixture = r#"
class C
{
    int M()
    {
        int result;
        /*start*/result = Compute();
        return result;/*end*/
    }
}
"#;
    check_semantic(RefactoringId::MergeAssignmentWithReturn, fixture, r#"
class C
{
    int M()
    {
        int result;
        return Compute();
    }
}
"#);
    let ids = super::offered_ids(fixture, false);
    assert!(!ids.contains(&RefactoringId::MergeAssignmentWithReturn));
}
