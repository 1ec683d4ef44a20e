use std::sync::Arc;

use lathe_refactor::{
    compute_refactorings, CancellationToken, Document, FileId, RefactoringAction, RefactoringId, RefactoringsConfig,
};
use lathe_semantic::LocalSemanticModelProvider;
use lathe_syntax::parse;
use lathe_test_utils::extract_selection;
use pretty_assertions::assert_eq;

mod braces;
mod dispatch;
mod enums;
mod expressions;
mod if_statements;
mod locals;
mod loops;
mod members;
mod properties;
mod scenarios;
mod statements;
mod strings;
mod switch;

pub(crate) fn document(text: &str, semantic: bool) -> Document {
    let document = Document::new(FileId::new("Test.cs"), text);
    if semantic {
        document.with_semantics(Arc::new(LocalSemanticModelProvider))
    } else {
        document
    }
}

/// Every action offered at the fixture's selection, failing fast on defects.
pub(crate) fn actions(fixture: &str, semantic: bool) -> (Document, Vec<RefactoringAction>) {
    let (text, span) = extract_selection(fixture);
    let document = document(&text, semantic);
    let actions = compute_refactorings(&document, span, &RefactoringsConfig::fail_fast(), &CancellationToken::new())
        .expect("computing refactorings");
    (document, actions)
}

pub(crate) fn offered_ids(fixture: &str, semantic: bool) -> Vec<RefactoringId> {
    actions(fixture, semantic).1.into_iter().map(|action| action.id).collect()
}

fn apply_one(fixture: &str, semantic: bool, matches: impl Fn(&RefactoringAction) -> bool, what: &str) -> String {
    let (document, actions) = actions(fixture, semantic);
    let offered: Vec<String> = actions
        .iter()
        .map(|a| a.equivalence_key.clone().unwrap_or_default())
        .collect();
    let action = actions
        .into_iter()
        .find(|action| matches(action))
        .unwrap_or_else(|| panic!("{what} not offered; offered: {offered:?}"));
    let change = action.apply(&CancellationToken::new()).expect("applying refactoring");
    assert_eq!(change.original_text(), document.text());
    assert_eq!(change.apply_to(document.text()).unwrap(), change.new_text());
    let reparsed = parse(change.new_text());
    assert!(!reparsed.has_errors(), "result does not parse: {:?}\n{}", reparsed.errors, change.new_text());
    change.new_text().to_string()
}

/// Apply the first `id` action offered at the fixture's selection and
/// compare the result with `expected`.
#[track_caller]
pub(crate) fn check(id: RefactoringId, fixture: &str, expected: &str) {
    let actual = apply_one(fixture, false, |a| a.id == id, id.as_str());
    assert_eq!(actual, expected);
}

/// Like [`check`], with the local semantic model attached.
#[track_caller]
pub(crate) fn check_semantic(id: RefactoringId, fixture: &str, expected: &str) {
    let actual = apply_one(fixture, true, |a| a.id == id, id.as_str());
    assert_eq!(actual, expected);
}

/// Apply the action with equivalence key `key` (`id` or `id.variant`).
#[track_caller]
pub(crate) fn check_key(key: &str, fixture: &str, expected: &str) {
    let actual = apply_one(fixture, true, |a| a.equivalence_key.as_deref() == Some(key), key);
    assert_eq!(actual, expected);
}

#[track_caller]
pub(crate) fn check_not_offered(id: RefactoringId, fixture: &str) {
    for semantic in [false, true] {
        let ids = offered_ids(fixture, semantic);
        assert!(!ids.contains(&id), "{id} offered (semantic: {semantic})");
    }
}

/// The title of the `id` action offered at the fixture's selection.
#[track_caller]
pub(crate) fn title(id: RefactoringId, fixture: &str, semantic: bool) -> String {
    let (_, actions) = actions(fixture, semantic);
    actions
        .into_iter()
        .find(|a| a.id == id)
        .map(|a| a.title)
        .unwrap_or_else(|| panic!("{id} not offered"))
}
