use std::fmt;

use lathe_core::{CancellationToken, Cancelled, TextSpan};
use lathe_syntax::{GreenNode, SyntaxNode};

use crate::{Symbol, TypeInfo};

/// Read-only type and symbol queries over one syntax tree.
///
/// Nodes passed in may come from any red tree built over the same green root
/// the model was created for; lookups go by kind and range, not node
/// identity. Unknown information is reported as [`TypeInfo::Error`] or
/// `None`, never as an error: callers treat it as "not applicable".
pub trait SemanticModel {
    /// Type of an expression node.
    fn type_of_expression(&self, expr: &SyntaxNode) -> TypeInfo;

    /// Symbol referenced by a name, member access or invocation.
    fn symbol_of(&self, node: &SyntaxNode) -> Option<Symbol>;

    /// Symbol introduced by a declaration node (declarator, parameter, member, type).
    fn declared_symbol(&self, decl: &SyntaxNode) -> Option<Symbol>;

    /// Type denoted by a type syntax node. `var` resolves to [`TypeInfo::Error`].
    fn type_from_syntax(&self, ty: &SyntaxNode) -> TypeInfo;

    /// Every symbol whose simple name is bindable at `offset`, innermost first.
    fn lookup_symbols(&self, offset: usize) -> Vec<Symbol>;

    /// Whether `ty` is, derives from or implements the type named `interface`.
    fn implements_interface(&self, ty: &TypeInfo, interface: &str) -> bool;

    /// Spans of every identifier in the document bound to `symbol`, including
    /// its declaration.
    fn find_references(
        &self,
        symbol: &Symbol,
        cancel: &CancellationToken,
    ) -> Result<Vec<TextSpan>, Cancelled>;

    /// True if `name` binds to some symbol at `offset`.
    fn is_name_visible(&self, name: &str, offset: usize) -> bool {
        self.lookup_symbols(offset).iter().any(|s| s.name == name)
    }
}

/// Host-supplied factory for semantic models.
///
/// The engine asks for a model at most once per dispatch and only after a
/// structural check passed.
pub trait SemanticModelProvider: Send + Sync + fmt::Debug {
    fn semantic_model(
        &self,
        green: &GreenNode,
        cancel: &CancellationToken,
    ) -> Result<Box<dyn SemanticModel>, Cancelled>;
}
