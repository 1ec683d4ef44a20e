use lathe_refactor::RefactoringId;

use super::{actions, check, check_key, check_semantic};

#[test]
fn do_loop_becomes_while_loop() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/do { x++; } while (cond);
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        while (cond) { x++; }
    }
}
"#;
    check(RefactoringId::ConvertDoToWhile, fixture, expected);
}

#[test]
fn do_loop_on_its_own_lines_keeps_brace_placement() {
    let fixture = r#"
class C
{
    void M()
    {
        do
        {
            x++;
        }
        /*caret*/while (cond);
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        while (cond)
        {
            x++;
        }
    }
}
"#;
    check(RefactoringId::ConvertDoToWhile, fixture, expected);
}

#[test]
fn assignment_followed_by_return_of_a_local_is_merged() {
    let fixture = r#"
class C
{
    int M()
    {
        int result;
        /*start*/result = Compute();
        return result;/*end*/
    }

    int Compute() => 1;
}
"#;
    let expected = r#"
class C
{
    int M()
    {
        int result;
        return Compute();
    }

    int Compute() => 1;
}
"#;
    check_semantic(RefactoringId::MergeAssignmentWithReturn, fixture, expected);
}

#[test]
fn enum_is_sorted_by_value_but_not_by_name() {
    let fixture = "enum Color { /*start*/Blue = 2, Red = 1/*end*/ }";
    check_key("sort-enum-members.value", fixture, "enum Color { Red = 1, Blue = 2 }");

    let (_, offered) = actions(fixture, false);
    let keys: Vec<String> = offered.into_iter().filter_map(|a| a.equivalence_key).collect();
    assert!(!keys.iter().any(|k| k == "sort-enum-members.name"), "{keys:?}");
}

#[test]
fn ascending_for_loop_is_reversed() {
    let fixture = r#"
class C
{
    void M()
    {
        f/*caret*/or (int i = 0; i < 10; i++) { Use(i); }
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        for (int i = 9; i >= 0; i--) { Use(i); }
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn descending_for_loop_is_reversed_back() {
    let fixture = r#"
class C
{
    void M()
    {
        /*caret*/for (int i = 9; i >= 0; i--) { Use(i); }
    }
}
"#;
    let expected = r#"
class C
{
    void M()
    {
        for (int i = 0; i < 10; i++) { Use(i); }
    }
}
"#;
    check(RefactoringId::ReverseForLoop, fixture, expected);
}

#[test]
fn mixed_concatenation_joins_into_interpolated_string() {
    let fixture = r#"
class C
{
    string M(int x)
    {
        return /*start*/"a" + "b" + x + "c"/*end*/;
    }
}
"#;
    let expected = r#"
class C
{
    string M(int x)
    {
        return $"ab{x}c";
    }
}
"#;
    check(RefactoringId::JoinStringExpressions, fixture, expected);
    check_semantic(RefactoringId::JoinStringExpressions, fixture, expected);
}
