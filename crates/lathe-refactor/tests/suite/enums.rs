use lathe_refactor::RefactoringId;

use super::{check, check_key, check_not_offered, offered_ids, title};

#[test]
fn generate_values_continues_from_explicit_ones() {
    check(
        RefactoringId::GenerateEnumValues,
        "enum Co/*caret*/lor { Red, Green = 5, Blue }",
        "enum Color { Red = 0, Green = 5, Blue = 6 }",
    );
}

#[test]
fn generate_values_needs_the_caret_on_the_name() {
    check_not_offered(RefactoringId::GenerateEnumValues, "enum Color { /*caret*/Red, Green }");
}

#[test]
fn generate_values_when_every_member_is_explicit() {
    check_not_offered(RefactoringId::GenerateEnumValues, "enum /*caret*/Color { Red = 1, Green = 2 }");
}

#[test]
fn generate_values_when_a_value_does_not_fold() {
    check_not_offered(RefactoringId::GenerateEnumValues, "enum /*caret*/E { A = Other.X, B }");
}

#[test]
fn sort_by_name() {
    check_key(
        "sort-enum-members.name",
        "enum Color { /*start*/Red = 1, Blue = 2/*end*/ }",
        "enum Color { Blue = 2, Red = 1 }",
    );
    assert_eq!(
        title(RefactoringId::SortEnumMembers, "enum Color { /*start*/Red = 1, Blue = 2/*end*/ }", false),
        "Sort enum members by name"
    );
}

#[test]
fn sort_hex_values_by_value() {
    check_key(
        "sort-enum-members.value",
        "enum Flags { /*start*/B = 0x2, A = 0x1/*end*/ }",
        "enum Flags { A = 0x1, B = 0x2 }",
    );
}

#[test]
fn generate_values_after_a_hex_value() {
    check(
        RefactoringId::GenerateEnumValues,
        "enum /*caret*/Flags { A = 0x10, B }",
        "enum Flags { A = 0x10, B = 17 }",
    );
}

#[test]
fn sort_skips_implicit_members() {
    check_not_offered(RefactoringId::SortEnumMembers, "enum E { /*start*/B, A/*end*/ }");
}

#[test]
fn sort_keeps_the_value_of_the_following_member() {
    // `C` continues from whatever precedes it.
    check_not_offered(RefactoringId::SortEnumMembers, "enum E { /*start*/B = 2, A = 1/*end*/, C }");
}

#[test]
fn sort_needs_two_members() {
    let ids = offered_ids("enum E { /*start*/B = 2/*end*/, A = 1 }", false);
    assert!(!ids.contains(&RefactoringId::SortEnumMembers));
}
