use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lathe_refactor::{
    compute_refactorings, CancellationToken, Document, FailurePolicy, FileId, RefactorError, RefactoringId,
    RefactoringsConfig, TextSpan,
};
use lathe_semantic::{LocalSemanticModelProvider, SemanticModel, SemanticModelProvider};
use lathe_syntax::GreenNode;
use lathe_test_utils::{capture_logs, extract_selection};
use pretty_assertions::assert_eq;

use super::{actions, document, offered_ids};

const IF_ELSE: &str = r#"
class C
{
    void M(bool a)
    {
        /*caret*/if (a) Run(); else Stop();
    }
}
"#;

#[test]
fn disabled_refactorings_are_not_offered() {
    let (text, span) = extract_selection(IF_ELSE);
    let document = document(&text, false);
    let mut config = RefactoringsConfig::fail_fast();
    config.disable(RefactoringId::InvertIf);

    let ids: Vec<RefactoringId> = compute_refactorings(&document, span, &config, &CancellationToken::new())
        .unwrap()
        .into_iter()
        .map(|action| action.id)
        .collect();
    assert!(!ids.contains(&RefactoringId::InvertIf));
    assert!(offered_ids(IF_ELSE, false).contains(&RefactoringId::InvertIf));
}

#[test]
fn cancelled_before_dispatch() {
    let (text, span) = extract_selection(IF_ELSE);
    let document = document(&text, true);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = compute_refactorings(&document, span, &RefactoringsConfig::fail_fast(), &cancel);
    assert!(matches!(result, Err(RefactorError::Cancelled)));
}

#[test]
fn cancellation_is_not_swallowed() {
    let (text, span) = extract_selection(IF_ELSE);
    let document = document(&text, true);
    let cancel = CancellationToken::new();
    cancel.cancel();

    let result = compute_refactorings(&document, span, &RefactoringsConfig::default(), &cancel);
    assert!(matches!(result, Err(RefactorError::Cancelled)));
}

#[test]
fn cancelled_before_apply() {
    let (_, actions) = actions(IF_ELSE, false);
    let action = actions
        .into_iter()
        .find(|a| a.id == RefactoringId::InvertIf)
        .unwrap();
    let cancel = CancellationToken::new();
    cancel.cancel();
    assert!(matches!(action.apply(&cancel), Err(RefactorError::Cancelled)));
}

#[test]
fn span_outside_the_document() {
    let document = document("class C { }", false);
    let result = compute_refactorings(
        &document,
        TextSpan::new(5, 500),
        &RefactoringsConfig::default(),
        &CancellationToken::new(),
    );
    assert!(matches!(result, Err(RefactorError::InvalidTarget(_))));
}

#[test]
fn nothing_applicable_is_an_empty_list() {
    let ids = offered_ids("/*caret*/", true);
    assert_eq!(ids, Vec::<RefactoringId>::new());
}

#[test]
fn innermost_actions_come_first() {
    let fixture = r#"
class C
{
    bool M()
    {
        return /*caret*/true;
    }
}
"#;
    let ids = offered_ids(fixture, false);
    let literal = ids.iter().position(|id| *id == RefactoringId::InvertBooleanLiteral).unwrap();
    let body = ids.iter().position(|id| *id == RefactoringId::UseExpressionBody).unwrap();
    assert!(literal < body, "{ids:?}");
}

#[test]
fn equivalence_keys_default_to_the_id() {
    let (_, actions) = actions(IF_ELSE, false);
    let invert = actions.iter().find(|a| a.id == RefactoringId::InvertIf).unwrap();
    assert_eq!(invert.equivalence_key.as_deref(), Some("invert-if"));
}

#[test]
fn syntactic_rules_do_not_fetch_the_model() {
    let (text, span) = extract_selection("enum Co/*caret*/lor { Red, Green }");
    let document = document(&text, true);
    let (result, logs) = capture_logs(|| {
        compute_refactorings(&document, span, &RefactoringsConfig::fail_fast(), &CancellationToken::new())
    });
    assert!(!result.unwrap().is_empty());
    assert!(logs.contains("registered refactoring"), "{}", logs.text());
    assert!(!logs.contains("fetched semantic model"), "{}", logs.text());
}

#[test]
fn semantic_rules_fetch_the_model_once() {
    let fixture = r#"
class C
{
    void M(string /*caret*/name)
    {
        Use(name);
    }
}
"#;
    let (text, span) = extract_selection(fixture);
    let document = document(&text, true);
    let (result, logs) = capture_logs(|| {
        compute_refactorings(&document, span, &RefactoringsConfig::fail_fast(), &CancellationToken::new())
    });
    assert!(result.unwrap().iter().any(|a| a.id == RefactoringId::AddParameterNullCheck));
    assert_eq!(logs.text().matches("fetched semantic model").count(), 1, "{}", logs.text());
}

#[test]
fn applying_reports_through_the_log() {
    let (_, actions) = actions(IF_ELSE, false);
    let action = actions
        .into_iter()
        .find(|a| a.id == RefactoringId::InvertIf)
        .unwrap();
    let (change, logs) = capture_logs(|| action.apply(&CancellationToken::new()));
    assert!(change.is_ok());
    assert!(logs.contains("applied refactoring"), "{}", logs.text());
    assert!(logs.contains("invert-if"), "{}", logs.text());
}

#[test]
fn swallow_policy_is_the_default() {
    assert_eq!(RefactoringsConfig::default().failure_policy, FailurePolicy::Swallow);
    assert_eq!(RefactoringsConfig::fail_fast().failure_policy, FailurePolicy::FailFast);
}

/// Hands out local models until `healthy` requests were served, then panics.
#[derive(Debug)]
struct FailingProvider {
    healthy: usize,
    served: AtomicUsize,
}

impl FailingProvider {
    fn after(healthy: usize) -> Arc<Self> {
        Arc::new(Self {
            healthy,
            served: AtomicUsize::new(0),
        })
    }
}

impl SemanticModelProvider for FailingProvider {
    fn semantic_model(
        &self,
        green: &GreenNode,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn SemanticModel>, lathe_core::Cancelled> {
        if self.served.fetch_add(1, Ordering::SeqCst) >= self.healthy {
            panic!("semantic model unavailable");
        }
        LocalSemanticModelProvider.semantic_model(green, cancel)
    }
}

const NULL_CHECK: &str = r#"
class C
{
    void M(string /*caret*/name)
    {
        Use(name);
    }
}
"#;

const RENAME: &str = r#"
class Item { }

class C
{
    void M()
    {
        var /*caret*/x = new Item();
        Use(x);
    }
}
"#;

fn failing_document(fixture: &str, healthy: usize) -> (Document, TextSpan) {
    let (text, span) = extract_selection(fixture);
    let document = Document::new(FileId::new("Test.cs"), text.as_str()).with_semantics(FailingProvider::after(healthy));
    (document, span)
}

#[test]
fn swallowed_defect_is_logged_and_yields_nothing() {
    let (document, span) = failing_document(NULL_CHECK, 0);
    let (result, logs) = capture_logs(|| {
        compute_refactorings(&document, span, &RefactoringsConfig::default(), &CancellationToken::new())
    });
    assert_eq!(result.unwrap().len(), 0);
    assert!(logs.contains("ERROR"), "{}", logs.text());
    assert!(logs.contains("computing refactorings panicked"), "{}", logs.text());
    assert!(logs.contains("semantic model unavailable"), "{}", logs.text());
}

#[test]
fn fail_fast_lets_the_defect_through() {
    let (document, span) = failing_document(NULL_CHECK, 0);
    let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
        compute_refactorings(&document, span, &RefactoringsConfig::fail_fast(), &CancellationToken::new())
    }));
    assert!(outcome.is_err());
}

#[test]
fn swallowed_apply_panic_becomes_a_logged_error() {
    // The predicate's fetch succeeds; the rewrite's own fetch panics.
    let (document, span) = failing_document(RENAME, 1);
    let actions = compute_refactorings(&document, span, &RefactoringsConfig::default(), &CancellationToken::new())
        .unwrap();
    let rename = actions
        .into_iter()
        .find(|a| a.id == RefactoringId::RenameAccordingToTypeName)
        .unwrap();

    let (result, logs) = capture_logs(|| rename.apply(&CancellationToken::new()));
    match result {
        Err(RefactorError::Panicked { id, message }) => {
            assert_eq!(id, RefactoringId::RenameAccordingToTypeName);
            assert!(message.contains("semantic model unavailable"), "{message}");
        }
        other => panic!("expected a caught panic, got {other:?}"),
    }
    assert!(logs.contains("ERROR"), "{}", logs.text());
    assert!(logs.contains("refactoring failed"), "{}", logs.text());
}
