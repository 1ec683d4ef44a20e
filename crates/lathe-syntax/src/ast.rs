//! Typed wrappers over [`SyntaxNode`]s.
//!
//! Each wrapper is a zero-cost view that checks the node kind once in
//! [`AstNode::cast`]. Syntactic categories (expressions, statements, members,
//! types) are closed enums so that dispatch over them is an exhaustive `match`.

use crate::parser::SyntaxNode;
use crate::syntax_kind::SyntaxKind;

pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(syntax: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

pub mod support {
    use crate::ast::AstNode;
    use crate::parser::{SyntaxNode, SyntaxToken};
    use crate::syntax_kind::SyntaxKind;

    pub fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
        node.children().find_map(N::cast)
    }

    pub fn children<'a, N: AstNode + 'a>(node: &'a SyntaxNode) -> impl Iterator<Item = N> + 'a {
        node.children().filter_map(N::cast)
    }

    pub fn nth_child<N: AstNode>(node: &SyntaxNode, n: usize) -> Option<N> {
        node.children().filter_map(N::cast).nth(n)
    }

    pub fn token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| tok.kind() == kind)
    }

    pub fn tokens<'a>(
        node: &'a SyntaxNode,
        kind: SyntaxKind,
    ) -> impl Iterator<Item = SyntaxToken> + 'a {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(move |tok| tok.kind() == kind)
    }

    /// First non-trivia direct token child.
    pub fn first_token(node: &SyntaxNode) -> Option<SyntaxToken> {
        node.children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|tok| !tok.kind().is_trivia())
    }

    /// The declared name: first identifier among the node's direct tokens.
    pub fn name_token(node: &SyntaxNode) -> Option<SyntaxToken> {
        token(node, SyntaxKind::Identifier)
    }
}

mod ext;
mod nodes;

pub use ext::{HasBody, HasModifiers, HasName};
pub use nodes::*;

#[cfg(test)]
mod tests;
