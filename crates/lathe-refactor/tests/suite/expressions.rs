use lathe_refactor::RefactoringId;

use super::{check, check_not_offered, check_semantic, title};

fn method(body: &str) -> String {
    format!("class C\n{{\n    object M(int a, int b, int c, bool f, bool? g)\n    {{\n        {body}\n    }}\n}}\n")
}

#[test]
fn swap_equality_operands() {
    check(
        RefactoringId::SwapBinaryOperands,
        &method("return a /*caret*/== b;"),
        &method("return b == a;"),
    );
}

#[test]
fn swap_mirrors_relational_operators() {
    check(
        RefactoringId::SwapBinaryOperands,
        &method("return a /*caret*/< 10;"),
        &method("return 10 > a;"),
    );
}

#[test]
fn swap_parenthesizes_the_moved_left_operand() {
    check(
        RefactoringId::SwapBinaryOperands,
        &method("return a * b /*caret*/* c;"),
        &method("return c * (a * b);"),
    );
}

#[test]
fn swapping_addition_needs_numeric_operands() {
    let fixture = method("return a /*caret*/+ b;");
    check_semantic(RefactoringId::SwapBinaryOperands, &fixture, &method("return b + a;"));
    assert!(!super::offered_ids(&fixture, false).contains(&RefactoringId::SwapBinaryOperands));
    check_not_offered(RefactoringId::SwapBinaryOperands, &method("return \"x\" /*caret*/+ a;"));
}

#[test]
fn caret_inside_an_operand_does_not_swap() {
    check_not_offered(RefactoringId::SwapBinaryOperands, &method("return a/*caret*/a == b;"));
}

#[test]
fn conditional_is_inverted() {
    check(
        RefactoringId::InvertConditionalExpression,
        &method("return f /*caret*/? 1 : 2;"),
        &method("return !f ? 2 : 1;"),
    );
}

#[test]
fn conditional_return_becomes_if() {
    let fixture = method("return f /*caret*/? a : b;");
    let expected = method(
        "if (f)\n        {\n            return a;\n        }\n        else\n        {\n            return b;\n        }",
    );
    check(RefactoringId::ConvertConditionalToIf, &fixture, &expected);
}

#[test]
fn conditional_initializer_becomes_if_after_the_declaration() {
    let fixture = method("int x = f /*caret*/? a : b;\n        return x;");
    let expected = method(
        "int x;\n        if (f)\n        {\n            x = a;\n        }\n        else\n        {\n            x = b;\n        }\n        return x;",
    );
    check(RefactoringId::ConvertConditionalToIf, &fixture, &expected);
}

#[test]
fn implicitly_typed_initializer_gets_its_type_spelled_out() {
    let fixture = method("var x = f /*caret*/? a : b;\n        return x;");
    let expected = method(
        "int x;\n        if (f)\n        {\n            x = a;\n        }\n        else\n        {\n            x = b;\n        }\n        return x;",
    );
    check_semantic(RefactoringId::ConvertConditionalToIf, &fixture, &expected);
    assert!(!super::offered_ids(&fixture, false).contains(&RefactoringId::ConvertConditionalToIf));
}

#[test]
fn conditional_argument_is_not_converted_to_if() {
    check_not_offered(RefactoringId::ConvertConditionalToIf, &method("return Use(f /*caret*/? a : b);"));
}

#[test]
fn redundant_parentheses_are_removed() {
    check(
        RefactoringId::RemoveParentheses,
        &method("return /*caret*/(a * b) + c;"),
        &method("return a * b + c;"),
    );
}

#[test]
fn needed_parentheses_stay() {
    check_not_offered(RefactoringId::RemoveParentheses, &method("return /*caret*/(a + b) * c;"));
    check_not_offered(RefactoringId::RemoveParentheses, &method("return a - /*caret*/(b - c);"));
}

#[test]
fn selected_expression_is_parenthesized() {
    check(
        RefactoringId::AddParentheses,
        &method("return /*start*/a * b/*end*/ + c;"),
        &method("return (a * b) + c;"),
    );
}

#[test]
fn caret_does_not_parenthesize() {
    check_not_offered(RefactoringId::AddParentheses, &method("return a */*caret*/ b;"));
}

#[test]
fn boolean_literal_is_inverted() {
    let fixture = method("return tr/*caret*/ue;");
    check(RefactoringId::InvertBooleanLiteral, &fixture, &method("return false;"));
    assert_eq!(title(RefactoringId::InvertBooleanLiteral, &fixture, false), "Replace with 'false'");
}

#[test]
fn compound_assignment_is_expanded() {
    check(
        RefactoringId::ExpandCompoundAssignment,
        &method("a /*caret*/-= b - c;\n        return a;"),
        &method("a = a - (b - c);\n        return a;"),
    );
}

#[test]
fn assignment_uses_compound_operator() {
    check(
        RefactoringId::UseCompoundAssignment,
        &method("a /*caret*/= a * b;\n        return a;"),
        &method("a *= b;\n        return a;"),
    );
}

#[test]
fn assignment_of_other_variable_is_not_compound() {
    check_not_offered(
        RefactoringId::UseCompoundAssignment,
        &method("a /*caret*/= b * a;\n        return a;"),
    );
}

#[test]
fn nullable_boolean_condition_gets_explicit_comparison() {
    check_semantic(
        RefactoringId::AddBooleanComparison,
        &method("if (/*caret*/g) return 1;\n        return 0;"),
        &method("if (g == true) return 1;\n        return 0;"),
    );
}

#[test]
fn plain_boolean_condition_is_left_alone() {
    check_not_offered(
        RefactoringId::AddBooleanComparison,
        &method("if (/*caret*/f) return 1;\n        return 0;"),
    );
}
