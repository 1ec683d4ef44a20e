use std::cell::{OnceCell, RefCell};

use lathe_config::{RefactoringId, RefactoringsConfig};
use lathe_core::{CancellationToken, CancellationTokenExt, Cancelled, TextSpan};
use lathe_semantic::SemanticModel;
use lathe_syntax::SyntaxNode;

use crate::{Document, RefactorError, RefactoringAction, SourceChange};

/// Per-dispatch state shared by every registration routine.
///
/// Created once by [`crate::compute_refactorings`] and dropped when it
/// returns. The semantic model is requested lazily, at most once, the first
/// time a routine asks for it.
pub struct RefactoringContext<'a> {
    span: TextSpan,
    document: &'a Document,
    root: SyntaxNode,
    config: &'a RefactoringsConfig,
    cancel: &'a CancellationToken,
    semantic: OnceCell<Option<Box<dyn SemanticModel>>>,
    actions: RefCell<Vec<RefactoringAction>>,
}

impl<'a> RefactoringContext<'a> {
    pub(crate) fn new(
        document: &'a Document,
        root: SyntaxNode,
        span: TextSpan,
        config: &'a RefactoringsConfig,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            span,
            document,
            root,
            config,
            cancel,
            semantic: OnceCell::new(),
            actions: RefCell::new(Vec::new()),
        }
    }

    pub fn span(&self) -> TextSpan {
        self.span
    }

    pub fn document(&self) -> &Document {
        self.document
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    pub fn config(&self) -> &RefactoringsConfig {
        self.config
    }

    pub fn is_enabled(&self, id: RefactoringId) -> bool {
        self.config.is_enabled(id)
    }

    /// True if any of `ids` is enabled; lets routines skip shared predicate work.
    pub fn any_enabled(&self, ids: &[RefactoringId]) -> bool {
        ids.iter().any(|id| self.is_enabled(*id))
    }

    pub fn check_cancelled(&self) -> Result<(), Cancelled> {
        self.cancel.check_cancelled()
    }

    /// The document's semantic model, fetched on first use.
    ///
    /// `Ok(None)` when the document has no semantic provider; semantic
    /// predicates then report "not applicable".
    pub fn semantic_model(&self) -> Result<Option<&dyn SemanticModel>, Cancelled> {
        if self.semantic.get().is_none() {
            let model = self.document.semantic_model(self.cancel)?;
            tracing::trace!(
                target: "lathe.refactor",
                available = model.is_some(),
                "fetched semantic model"
            );
            // Cannot already be set: the context is confined to one thread.
            let _ = self.semantic.set(model);
        }
        Ok(self.semantic.get().and_then(|model| model.as_deref()))
    }

    /// Offer `id` with the default equivalence key (the id itself).
    pub fn register<F>(&self, id: RefactoringId, title: impl Into<String>, rule: F)
    where
        F: FnOnce(&Document, &CancellationToken) -> Result<SourceChange, RefactorError> + Send + 'static,
    {
        self.push(id, title.into(), id.as_str().to_string(), rule);
    }

    /// Offer one variant of `id`; the equivalence key is `id.variant`.
    pub fn register_variant<F>(&self, id: RefactoringId, variant: &str, title: impl Into<String>, rule: F)
    where
        F: FnOnce(&Document, &CancellationToken) -> Result<SourceChange, RefactorError> + Send + 'static,
    {
        self.push(id, title.into(), format!("{}.{variant}", id.as_str()), rule);
    }

    fn push<F>(&self, id: RefactoringId, title: String, key: String, rule: F)
    where
        F: FnOnce(&Document, &CancellationToken) -> Result<SourceChange, RefactorError> + Send + 'static,
    {
        if !self.is_enabled(id) {
            return;
        }
        tracing::trace!(target: "lathe.refactor", id = %id, title = %title, "registered refactoring");
        let document = self.document.clone();
        let action = RefactoringAction::new(
            id,
            title,
            Some(key),
            self.config.failure_policy,
            Box::new(move |cancel: &CancellationToken| rule(&document, cancel)),
        );
        self.actions.borrow_mut().push(action);
    }

    pub(crate) fn into_actions(self) -> Vec<RefactoringAction> {
        self.actions.into_inner()
    }
}
