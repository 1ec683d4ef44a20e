use lathe_refactor::RefactoringId;

use super::{check, check_not_offered, title};

#[test]
fn adjacent_literals_join_into_one_literal() {
    let fixture = r#"
class C
{
    string M()
    {
        return "Hello, " /*caret*/+ "world";
    }
}
"#;
    let expected = r#"
class C
{
    string M()
    {
        return "Hello, world";
    }
}
"#;
    check(RefactoringId::JoinStringExpressions, fixture, expected);
    assert_eq!(title(RefactoringId::JoinStringExpressions, fixture, false), "Join string literals");
}

#[test]
fn only_the_selected_operands_are_joined() {
    let fixture = r#"
class C
{
    string M(int x)
    {
        return x + /*start*/"a" + "b"/*end*/ + x;
    }
}
"#;
    let expected = r#"
class C
{
    string M(int x)
    {
        return x + "ab" + x;
    }
}
"#;
    check(RefactoringId::JoinStringExpressions, fixture, expected);
}

#[test]
fn braces_in_literals_are_escaped_in_the_interpolation() {
    let fixture = r#"
class C
{
    string M(int x)
    {
        return /*start*/"{" + x + "}"/*end*/;
    }
}
"#;
    let expected = r#"
class C
{
    string M(int x)
    {
        return $"{{{x}}}";
    }
}
"#;
    check(RefactoringId::JoinStringExpressions, fixture, expected);
}

#[test]
fn numeric_addition_is_not_joined() {
    let fixture = r#"
class C
{
    int M(int x)
    {
        return 1 /*caret*/+ x;
    }
}
"#;
    check_not_offered(RefactoringId::JoinStringExpressions, fixture);
}

#[test]
fn interpolated_string_becomes_concatenation() {
    let fixture = r#"
class C
{
    string M(string name)
    {
        return $"Hello /*caret*/{name}!";
    }
}
"#;
    let expected = r#"
class C
{
    string M(string name)
    {
        return "Hello " + name + "!";
    }
}
"#;
    check(RefactoringId::ConvertInterpolatedStringToConcatenation, fixture, expected);
}

#[test]
fn interpolated_string_without_holes_loses_its_dollar() {
    let fixture = r#"
class C
{
    string M()
    {
        return /*caret*/$"{{literal}}";
    }
}
"#;
    let expected = r#"
class C
{
    string M()
    {
        return "{literal}";
    }
}
"#;
    check(RefactoringId::ConvertInterpolatedStringToStringLiteral, fixture, expected);
    check_not_offered(RefactoringId::ConvertInterpolatedStringToConcatenation, fixture);
}

#[test]
fn formatted_holes_are_not_converted() {
    let fixture = r#"
class C
{
    string M(double d)
    {
        return $"Value: /*caret*/{d:F2}";
    }
}
"#;
    check_not_offered(RefactoringId::ConvertInterpolatedStringToConcatenation, fixture);
}
