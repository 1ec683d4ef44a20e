use lathe_config::RefactoringId;
use lathe_core::{Cancelled, EditError, TextSpan};
use lathe_syntax::SyntaxKind;
use thiserror::Error;

/// Failure of a dispatch or of an applied action.
///
/// Only [`RefactorError::Cancelled`] is an expected outcome; every other
/// variant reports a defect in a rule whose predicate claimed it applies.
#[derive(Debug, Error)]
pub enum RefactorError {
    #[error("operation cancelled")]
    Cancelled,
    #[error("expected {kind:?} at {range:?} is missing from the tree")]
    MissingNode { kind: SyntaxKind, range: TextSpan },
    #[error("invalid refactoring target: {0}")]
    InvalidTarget(String),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error("refactoring `{id}` panicked: {message}")]
    Panicked { id: RefactoringId, message: String },
}

impl RefactorError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RefactorError::Cancelled)
    }

    pub(crate) fn invalid_target(message: impl Into<String>) -> Self {
        RefactorError::InvalidTarget(message.into())
    }
}

impl From<Cancelled> for RefactorError {
    fn from(_: Cancelled) -> Self {
        RefactorError::Cancelled
    }
}

/// Text of a panic payload, for logging.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
