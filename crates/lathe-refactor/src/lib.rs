//! Refactoring dispatch and transformation engine for Lathe.
//!
//! [`compute_refactorings`] is the single entry point: given a [`Document`],
//! a selection and the host configuration it walks from the innermost syntax
//! node at the selection up to the root, lets every node-kind specific routine
//! register the refactorings that apply there, and returns them as lazy
//! [`RefactoringAction`]s. Nothing is rewritten until the host picks an action
//! and calls [`RefactoringAction::apply`], which produces a [`SourceChange`].
//!
//! The rules live in [`refactorings`]-private modules grouped by concern
//! (braces, loops, `if` statements, statement selections, strings,
//! expressions, locals, members, properties, enums and `switch`).

mod action;
mod change;
mod context;
mod dispatch;
mod document;
mod error;
mod layout;
mod naming;
mod negation;
mod precedence;
mod refactorings;
mod selection;
mod tree;

pub use action::RefactoringAction;
pub use change::SourceChange;
pub use context::RefactoringContext;
pub use dispatch::compute_refactorings;
pub use document::Document;
pub use error::RefactorError;
pub use naming::{derive_name, ensure_unique_with};
pub use selection::{is_between_spans, is_empty_and_contained_in_span};

pub use lathe_config::{FailurePolicy, RefactoringId, RefactoringsConfig};
pub use lathe_core::{CancellationToken, FileId, TextEdit, TextSpan};
