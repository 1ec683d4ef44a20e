use lathe_refactor::RefactoringId;

use super::{check, check_not_offered};

fn method(sections: &str) -> String {
    format!(
        r#"
class C
{{
    void M(int x)
    {{
        switch (x)
        {{
{sections}
        }}
    }}
}}
"#
    )
}

#[test]
fn add_braces_to_section() {
    let fixture = method(
        r#"            /*caret*/case 1:
                a();
                break;"#,
    );
    let expected = method(
        r#"            case 1:
                {
                    a();
                    break;
                }"#,
    );
    check(RefactoringId::AddBracesToSwitchSection, &fixture, &expected);
}

#[test]
fn remove_braces_from_section() {
    let fixture = method(
        r#"            case /*caret*/1:
                {
                    a();
                    break;
                }"#,
    );
    let expected = method(
        r#"            case 1:
                a();
                break;"#,
    );
    check(RefactoringId::RemoveBracesFromSwitchSection, &fixture, &expected);
}

#[test]
fn braces_stay_around_locals() {
    let fixture = method(
        r#"            /*caret*/case 1:
                {
                    int y = 1;
                    a(y);
                    break;
                }"#,
    );
    check_not_offered(RefactoringId::RemoveBracesFromSwitchSection, &fixture);
}

#[test]
fn section_braces_need_the_caret_on_a_label() {
    let fixture = method(
        r#"            case 1:
                /*caret*/a();
                break;"#,
    );
    check_not_offered(RefactoringId::AddBracesToSwitchSection, &fixture);
}

#[test]
fn sort_numeric_labels() {
    let fixture = method(
        r#"            /*start*/case 3:
            case 1:
            case 2:/*end*/
                a();
                break;"#,
    );
    let expected = method(
        r#"            case 1:
            case 2:
            case 3:
                a();
                break;"#,
    );
    check(RefactoringId::SortCaseLabels, &fixture, &expected);
}

#[test]
fn sort_string_labels() {
    let fixture = r#"
class C
{
    void M(string s)
    {
        switch (s)
        {
            /*start*/case "b":
            case "a":/*end*/
                break;
        }
    }
}
"#;
    let expected = r#"
class C
{
    void M(string s)
    {
        switch (s)
        {
            case "a":
            case "b":
                break;
        }
    }
}
"#;
    check(RefactoringId::SortCaseLabels, fixture, expected);
}

#[test]
fn sort_skips_default_labels() {
    let fixture = method(
        r#"            /*start*/case 2:
            default:
            case 1:/*end*/
                break;"#,
    );
    check_not_offered(RefactoringId::SortCaseLabels, &fixture);
}

#[test]
fn sorted_labels_are_left_alone() {
    let fixture = method(
        r#"            /*start*/case 1:
            case 2:/*end*/
                break;"#,
    );
    check_not_offered(RefactoringId::SortCaseLabels, &fixture);
}
