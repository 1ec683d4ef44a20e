use std::sync::Arc;

use lathe_core::{CancellationToken, Cancelled, FileId};
use lathe_semantic::{SemanticModel, SemanticModelProvider};
use lathe_syntax::{parse, GreenNode, SyntaxNode};

/// One source file as seen by the engine: its text, its syntax tree and the
/// optional semantic oracle the host attached to it.
///
/// Cloning is cheap; the text, the green tree and the provider are shared.
#[derive(Debug, Clone)]
pub struct Document {
    id: FileId,
    green: GreenNode,
    text: Arc<str>,
    semantics: Option<Arc<dyn SemanticModelProvider>>,
}

impl Document {
    /// Parse `text`. Parsing is error tolerant, so this never fails.
    pub fn new(id: FileId, text: impl Into<Arc<str>>) -> Self {
        let text: Arc<str> = text.into();
        let green = parse(&text).green;
        Self {
            id,
            green,
            text,
            semantics: None,
        }
    }

    #[must_use]
    pub fn with_semantics(mut self, provider: Arc<dyn SemanticModelProvider>) -> Self {
        self.semantics = Some(provider);
        self
    }

    pub fn id(&self) -> &FileId {
        &self.id
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn shared_text(&self) -> Arc<str> {
        self.text.clone()
    }

    pub fn green(&self) -> &GreenNode {
        &self.green
    }

    /// A fresh red tree over the document's green root.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn has_semantics(&self) -> bool {
        self.semantics.is_some()
    }

    /// Ask the provider for a model of this document; `Ok(None)` when the
    /// host supplied no provider.
    pub fn semantic_model(&self, cancel: &CancellationToken) -> Result<Option<Box<dyn SemanticModel>>, Cancelled> {
        match &self.semantics {
            Some(provider) => provider.semantic_model(&self.green, cancel).map(Some),
            None => Ok(None),
        }
    }

    /// The same document with a rewritten tree. Untouched green subtrees are
    /// shared with `self`.
    pub(crate) fn with_green(&self, green: GreenNode) -> Document {
        let text: Arc<str> = SyntaxNode::new_root(green.clone()).to_string().into();
        Document {
            id: self.id.clone(),
            green,
            text,
            semantics: self.semantics.clone(),
        }
    }
}
