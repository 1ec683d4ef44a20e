use pretty_assertions::assert_eq;

use lathe_config::{
    load_for_workspace, ConfigError, ConfigWarning, FailurePolicy, LatheConfig, RefactoringId,
};
use tempfile::tempdir;

#[test]
fn empty_file_gives_defaults() {
    let (config, diagnostics) = LatheConfig::load_from_str_with_diagnostics("").unwrap();
    assert_eq!(config, LatheConfig::default());
    assert!(diagnostics.is_empty());
    assert_eq!(config.refactorings.failure_policy, FailurePolicy::Swallow);
    assert!(config.refactorings.prefix_field_identifier_with_underscore);
}

#[test]
fn full_file() {
    let text = r#"
[refactorings]
disabled = ["remove-braces", "sort-member-declarations"]
failure_policy = "fail-fast"
prefix_field_identifier_with_underscore = false

[logging]
level = "debug"
json = true
"#;
    let (config, diagnostics) = LatheConfig::load_from_str_with_diagnostics(text).unwrap();
    assert!(diagnostics.is_empty(), "{diagnostics:?}");
    assert!(!config.refactorings.is_enabled(RefactoringId::RemoveBraces));
    assert!(!config.refactorings.is_enabled(RefactoringId::SortMemberDeclarations));
    assert!(config.refactorings.is_enabled(RefactoringId::AddBraces));
    assert_eq!(config.refactorings.failure_policy, FailurePolicy::FailFast);
    assert!(!config.refactorings.prefix_field_identifier_with_underscore);
    assert_eq!(config.logging.level, "debug");
    assert!(config.logging.json);
}

#[test]
fn reports_unknown_keys_with_full_paths() {
    let text = r#"
typo = 1

[refactorings]
disabeld = []

[logging]
levle = "info"
"#;
    let (_config, diagnostics) = LatheConfig::load_from_str_with_diagnostics(text).unwrap();
    assert_eq!(
        diagnostics.unknown_keys,
        vec!["logging.levle", "refactorings.disabeld", "typo"]
    );
}

#[test]
fn reports_duplicate_disabled_ids() {
    let text = "[refactorings]\ndisabled = [\"invert-if\", \"invert-if\", \"invert-if\"]\n";
    let (config, diagnostics) = LatheConfig::load_from_str_with_diagnostics(text).unwrap();
    assert_eq!(config.refactorings.disabled.len(), 1);
    assert_eq!(
        diagnostics.warnings,
        vec![ConfigWarning::DuplicateDisabledId {
            id: "invert-if".to_owned()
        }]
    );
}

#[test]
fn unknown_refactoring_id_is_an_error() {
    let text = "[refactorings]\ndisabled = [\"frobnicate\"]\n";
    let err = LatheConfig::load_from_str_with_diagnostics(text).unwrap_err();
    assert!(matches!(err, ConfigError::Toml(_)), "{err:?}");
}

#[test]
fn workspace_without_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let (config, diagnostics) = load_for_workspace(dir.path()).unwrap();
    assert_eq!(config, LatheConfig::default());
    assert!(diagnostics.is_empty());
}

#[test]
fn workspace_config_is_discovered() {
    let dir = tempdir().unwrap();
    std::fs::write(
        dir.path().join("lathe.toml"),
        "[refactorings]\ndisabled = [\"wrap-in-if\"]\n",
    )
    .unwrap();
    let (config, _) = load_for_workspace(dir.path()).unwrap();
    assert!(!config.refactorings.is_enabled(RefactoringId::WrapInIf));
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempdir().unwrap();
    let err = LatheConfig::load_from_path(dir.path().join("nope.toml")).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
}
