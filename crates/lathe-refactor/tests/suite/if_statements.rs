use lathe_refactor::RefactoringId;

use super::{check, check_not_offered, title};

#[test]
fn nested_if_merges_into_parent() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a)
        {
            /*caret*/if (b)
            {
                c();
            }
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a && b)
        {
            c();
        }
    }
}
"#;
    check(RefactoringId::MergeIfWithParentIf, fixture, expected);
}

#[test]
fn merged_disjunctions_are_parenthesized() {
    let fixture = r#"
class C
{
    void M(bool a, bool b, bool c)
    {
        if (a || b)
            /*caret*/if (c) d();
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a, bool b, bool c)
    {
        if ((a || b) && c) d();
    }
}
"#;
    check(RefactoringId::MergeIfWithParentIf, fixture, expected);
}

#[test]
fn nested_if_with_else_does_not_merge() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a)
        {
            /*caret*/if (b) c(); else d();
        }
    }
}
"#;
    check_not_offered(RefactoringId::MergeIfWithParentIf, fixture);
}

#[test]
fn conjunction_splits_into_nested_ifs() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        /*caret*/if (a && b)
        {
            c();
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a)
        {
            if (b)
            {
                c();
            }
        }
    }
}
"#;
    check(RefactoringId::SplitIfWithAndCondition, fixture, expected);
}

#[test]
fn disjunction_with_jump_body_splits_into_sibling_ifs() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        /*caret*/if (a || b)
        {
            return;
        }
        c();
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a, bool b)
    {
        if (a)
        {
            return;
        }
        if (b)
        {
            return;
        }
        c();
    }
}
"#;
    check(RefactoringId::SplitIfWithOrCondition, fixture, expected);
}

#[test]
fn disjunction_without_jump_does_not_split() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        /*caret*/if (a || b)
        {
            c();
        }
    }
}
"#;
    check_not_offered(RefactoringId::SplitIfWithOrCondition, fixture);
}

#[test]
fn invert_if_swaps_branches() {
    let fixture = r#"
class C
{
    void M(int x)
    {
        /*caret*/if (x > 0)
            a();
        else
            b();
    }
}
"#;
    let expected = r#"
class C
{
    void M(int x)
    {
        if (x <= 0)
            b();
        else
            a();
    }
}
"#;
    check(RefactoringId::InvertIf, fixture, expected);
}

#[test]
fn invert_if_applies_de_morgan() {
    let fixture = r#"
class C
{
    void M(bool a, bool b)
    {
        /*caret*/if (a && !b) x(); else y();
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool a, bool b)
    {
        if (!a || b) y(); else x();
    }
}
"#;
    check(RefactoringId::InvertIf, fixture, expected);
}

#[test]
fn if_else_returns_become_conditional_return() {
    let fixture = r#"
class C
{
    int M(bool c)
    {
        /*caret*/if (c)
            return 1;
        else
            return 2;
    }
}
"#;
    let expected = r#"
class C
{
    int M(bool c)
    {
        return c ? 1 : 2;
    }
}
"#;
    check(RefactoringId::ConvertIfToConditional, fixture, expected);
    assert_eq!(title(RefactoringId::ConvertIfToConditional, fixture, false), "Use conditional return");
}

#[test]
fn if_followed_by_return_becomes_conditional_return() {
    let fixture = r#"
class C
{
    int M(bool c)
    {
        /*caret*/if (c)
        {
            return 1;
        }
        return 2;
    }
}
"#;
    let expected = r#"
class C
{
    int M(bool c)
    {
        return c ? 1 : 2;
    }
}
"#;
    check(RefactoringId::ConvertIfToConditional, fixture, expected);
}

#[test]
fn if_else_assignments_become_conditional_assignment() {
    let fixture = r#"
class C
{
    void M(bool c)
    {
        int x;
        /*caret*/if (c)
            x = 1;
        else
            x = 2;
    }
}
"#;
    let expected = r#"
class C
{
    void M(bool c)
    {
        int x;
        x = c ? 1 : 2;
    }
}
"#;
    check(RefactoringId::ConvertIfToConditional, fixture, expected);
    assert_eq!(title(RefactoringId::ConvertIfToConditional, fixture, false), "Use conditional assignment");
}

#[test]
fn assignments_to_different_targets_do_not_convert() {
    let fixture = r#"
class C
{
    void M(bool c)
    {
        int x, y;
        /*caret*/if (c)
            x = 1;
        else
            y = 2;
    }
}
"#;
    check_not_offered(RefactoringId::ConvertIfToConditional, fixture);
}
