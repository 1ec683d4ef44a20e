use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use lathe_config::{FailurePolicy, RefactoringId};
use lathe_core::{CancellationToken, CancellationTokenExt};

use crate::error::panic_message;
use crate::{RefactorError, SourceChange};

pub(crate) type ApplyFn = Box<dyn FnOnce(&CancellationToken) -> Result<SourceChange, RefactorError> + Send>;

/// An offered refactoring. Holds everything needed to run it later; nothing
/// is rewritten until [`RefactoringAction::apply`] is called.
pub struct RefactoringAction {
    pub id: RefactoringId,
    pub title: String,
    /// Groups equivalent actions across documents; `id` or `id.variant`.
    pub equivalence_key: Option<String>,
    policy: FailurePolicy,
    apply: ApplyFn,
}

impl RefactoringAction {
    pub(crate) fn new(
        id: RefactoringId,
        title: String,
        equivalence_key: Option<String>,
        policy: FailurePolicy,
        apply: ApplyFn,
    ) -> Self {
        Self {
            id,
            title,
            equivalence_key,
            policy,
            apply,
        }
    }

    /// Run the rewrite.
    ///
    /// Under [`FailurePolicy::Swallow`] a panicking rule is reported as
    /// [`RefactorError::Panicked`]; under [`FailurePolicy::FailFast`] the
    /// panic propagates.
    pub fn apply(self, cancel: &CancellationToken) -> Result<SourceChange, RefactorError> {
        let RefactoringAction { id, apply, policy, .. } = self;
        cancel.check_cancelled()?;
        let result = match policy {
            FailurePolicy::FailFast => apply(cancel),
            FailurePolicy::Swallow => match panic::catch_unwind(AssertUnwindSafe(|| apply(cancel))) {
                Ok(result) => result,
                Err(payload) => Err(RefactorError::Panicked {
                    id,
                    message: panic_message(&*payload),
                }),
            },
        };
        match &result {
            Ok(change) => tracing::debug!(
                target: "lathe.refactor",
                id = %id,
                start = change.edit.range.start,
                end = change.edit.range.end,
                "applied refactoring"
            ),
            Err(RefactorError::Cancelled) => {
                tracing::debug!(target: "lathe.refactor", id = %id, "refactoring cancelled")
            }
            Err(err) => tracing::error!(target: "lathe.refactor", id = %id, error = %err, "refactoring failed"),
        }
        result
    }
}

impl fmt::Debug for RefactoringAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RefactoringAction")
            .field("id", &self.id)
            .field("title", &self.title)
            .field("equivalence_key", &self.equivalence_key)
            .finish_non_exhaustive()
    }
}
