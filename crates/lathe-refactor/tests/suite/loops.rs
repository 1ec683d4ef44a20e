use lathe_refactor::RefactoringId;

use super::{check, check_not_offered};

#[test]
fn while_becomes_do() {
    let fixture = r#"
class C
{
    void M(bool c)
    {
        /*caret*/while (c) { x(); }
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool c)
    {
        if (c)
        {
            do { x(); } while (c);
        }
    }
}
"#;
    check(RefactoringId::ConvertWhileToDo, fixture, expected);
}

#[test]
fn while_true_becomes_do_without_guard() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/while (true)
        {
            x();
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        do
        {
            x();
        } while (true);
    }
}
"#;
    check(RefactoringId::ConvertWhileToDo, fixture, expected);
}

#[test]
fn guarded_do_keeps_multiline_body_indented() {
    let fixture = r#"
class C
{
    void M(int i)
    {
        /*caret*/while (i < 0)
        {
            i++;
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(int i)
    {
        if (i < 0)
        {
            do
            {
                i++;
            } while (i < 0);
        }
    }
}
"#;
    check(RefactoringId::ConvertWhileToDo, fixture, expected);
}

#[test]
fn while_becomes_for() {
    let fixture = r#"
class C
{
    void M(bool c)
    {
        /*caret*/while (c) { x(); }
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool c)
    {
        for (; c;) { x(); }
    }
}
"#;
    check(RefactoringId::ConvertWhileToFor, fixture, expected);
}

#[test]
fn for_becomes_while_with_hoisted_declaration() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 0; i < n; i++)
        {
            Use(i);
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(int n)
    {
        int i = 0;
        while (i < n)
        {
            Use(i);
            i++;
        }
    }
}
"#;
    check(RefactoringId::ConvertForToWhile, fixture, expected);
}

#[test]
fn for_with_continue_keeps_its_incrementor() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 0; i < n; i++)
        {
            if (i == 2) continue;
            Use(i);
        }
    }
}
"#;
    check_not_offered(RefactoringId::ConvertForToWhile, fixture);
}

#[test]
fn hoisted_variable_must_not_clash() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 0; i < n; i++)
        {
            Use(i);
        }
        int i = 5;
    }
}
"#;
    check_not_offered(RefactoringId::ConvertForToWhile, fixture);
}

#[test]
fn reverse_inclusive_bound() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 1; i <= n; i++) Use(i);
    }
}
"#;
    let expected = r#"
class C
{
    void M(int n)
    {
        for (int i = n; i >= 1; i--) Use(i);
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn reverse_exclusive_symbolic_bound() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 0; i < n; i++) Use(i);
    }
}
"#;
    let expected = r#"
class C
{
    void M(int n)
    {
        for (int i = n - 1; i >= 0; i--) Use(i);
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn reverse_from_a_nonzero_start() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 1; i < n; i++) Use(i);
    }
}
"#;
    let expected = r#"
class C
{
    void M(int n)
    {
        for (int i = n - 1; i >= 1; i--) Use(i);
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn reverse_descending_back_to_exclusive() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = n - 1; i >= 0; i--) Use(i);
    }
}
"#;
    let expected = r#"
class C
{
    void M(int n)
    {
        for (int i = 0; i < n; i++) Use(i);
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn reverse_descending_to_inclusive() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = n; i >= 1; i--) Use(i);
    }
}
"#;
    let expected = r#"
class C
{
    void M(int n)
    {
        for (int i = 1; i <= n; i++) Use(i);
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn counter_on_the_right_of_the_condition_is_not_reversed() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 0; n > i; i++) Use(i);
    }
}
"#;
    check_not_offered(RefactoringId::ReverseForLoop, fixture);
}

#[test]
fn loops_with_steps_other_than_one_are_not_reversed() {
    let fixture = r#"
class C
{
    void M(int n)
    {
        /*caret*/for (int i = 0; i < n; i += 2) Use(i);
    }
}
"#;
    check_not_offered(RefactoringId::ReverseForLoop, fixture);
}

#[test]
fn do_with_comment_before_while_is_left_alone() {
    let fixture = r#"
class C
{
    void M(bool c)
    {
        /*caret*/do { x(); } // again
        while (c);
    }
}
"#;
    check_not_offered(RefactoringId::ConvertDoToWhile, fixture);
}
