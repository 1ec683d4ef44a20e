use lathe_refactor::RefactoringId;

use super::{check, check_not_offered};

#[test]
fn add_braces_to_embedded_statement() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        if (a)
            b/*caret*/();
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a)
    {
        if (a)
        {
            b();
        }
    }
}
"#;
    check(RefactoringId::AddBraces, fixture, expected);
}

#[test]
fn added_braces_are_not_offered_again() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        if (a)
        {
            b/*caret*/();
        }
    }
}
"#;
    check_not_offered(RefactoringId::AddBraces, fixture);
}

#[test]
fn remove_braces_from_single_statement_block() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        if (a)
        /*caret*/{
            b();
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a)
    {
        if (a)
            b();
    }
}
"#;
    check(RefactoringId::RemoveBraces, fixture, expected);
}

#[test]
fn braces_stay_around_a_declaration() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        if (a)
        /*caret*/{
            int x = 1;
        }
    }
}
"#;
    check_not_offered(RefactoringId::RemoveBraces, fixture);
}

#[test]
fn braces_stay_when_an_inner_if_would_capture_the_else() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a)
        /*caret*/{
            if (b) x();
        }
        else
            y();
    }
}
"#;
    check_not_offered(RefactoringId::RemoveBraces, fixture);
}

#[test]
fn add_braces_to_whole_if_else_cascade() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        /*caret*/if (a)
            b();
        else
            c();
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a)
    {
        if (a)
        {
            b();
        }
        else
        {
            c();
        }
    }
}
"#;
    check(RefactoringId::AddBracesToIfElse, fixture, expected);
}

#[test]
fn remove_braces_from_whole_if_else_cascade() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        i/*caret*/f (a)
        {
            b();
        }
        else
        {
            c();
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a)
    {
        if (a)
            b();
        else
            c();
    }
}
"#;
    check(RefactoringId::RemoveBracesFromIfElse, fixture, expected);
}

#[test]
fn cascade_actions_need_an_else() {
    let fixture = r#"
class C
{
    void M(bool a)
    {
        /*caret*/if (a)
            b();
    }
}
"#;
    check_not_offered(RefactoringId::AddBracesToIfElse, fixture);
    check_not_offered(RefactoringId::RemoveBracesFromIfElse, fixture);
}
