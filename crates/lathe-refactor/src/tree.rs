//! Tree navigation shared by the rules.

use lathe_core::TextSpan;
use lathe_syntax::{
    ast::support, trivia, AstNode, GreenNode, NodeOrToken, Stmt, SyntaxElement, SyntaxKind, SyntaxNode,
    SyntaxToken, TextRange,
};

use crate::RefactorError;

/// A `Send` handle to a node: its kind and range. Registered actions keep
/// these instead of red nodes and resolve them again when applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodePtr {
    kind: SyntaxKind,
    range: TextRange,
}

impl NodePtr {
    pub(crate) fn new(node: &SyntaxNode) -> Self {
        Self {
            kind: node.kind(),
            range: node.text_range(),
        }
    }

    pub(crate) fn to_node(self, root: &SyntaxNode) -> Result<SyntaxNode, RefactorError> {
        let start = match root.covering_element(self.range) {
            NodeOrToken::Node(node) => Some(node),
            NodeOrToken::Token(token) => token.parent(),
        };
        start
            .and_then(|node| {
                node.ancestors()
                    .find(|n| n.kind() == self.kind && n.text_range() == self.range)
            })
            .ok_or(RefactorError::MissingNode {
                kind: self.kind,
                range: self.range.into(),
            })
    }

    pub(crate) fn cast<N: AstNode>(self, root: &SyntaxNode) -> Result<N, RefactorError> {
        let node = self.to_node(root)?;
        N::cast(node).ok_or(RefactorError::MissingNode {
            kind: self.kind,
            range: self.range.into(),
        })
    }
}

/// Same as [`NodePtr`] for tokens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct TokenPtr {
    kind: SyntaxKind,
    range: TextRange,
}

impl TokenPtr {
    pub(crate) fn new(token: &SyntaxToken) -> Self {
        Self {
            kind: token.kind(),
            range: token.text_range(),
        }
    }

    pub(crate) fn to_token(self, root: &SyntaxNode) -> Result<SyntaxToken, RefactorError> {
        match root.covering_element(self.range) {
            NodeOrToken::Token(token) if token.kind() == self.kind && token.text_range() == self.range => Ok(token),
            _ => Err(RefactorError::MissingNode {
                kind: self.kind,
                range: self.range.into(),
            }),
        }
    }
}

/// Unwrap a child the predicate already checked for.
pub(crate) fn required<T>(value: Option<T>, parent: &SyntaxNode) -> Result<T, RefactorError> {
    value.ok_or(RefactorError::MissingNode {
        kind: parent.kind(),
        range: span(parent),
    })
}

pub(crate) fn green(node: &SyntaxNode) -> GreenNode {
    node.green().into_owned()
}

pub(crate) fn span(node: &SyntaxNode) -> TextSpan {
    node.text_range().into()
}

pub(crate) fn token_span(token: &SyntaxToken) -> TextSpan {
    token.text_range().into()
}

/// Concatenated text of the significant tokens; formatting-insensitive
/// structural comparison key.
pub(crate) fn significant_text(node: &SyntaxNode) -> String {
    trivia::significant_tokens(node)
        .map(|t| t.text().to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn equivalent(a: &SyntaxNode, b: &SyntaxNode) -> bool {
    a.kind() == b.kind() && significant_text(a) == significant_text(b)
}

/// True if `node`'s parent holds a list of statements (a block or switch section).
pub(crate) fn is_in_statement_list(node: &SyntaxNode) -> bool {
    node.parent()
        .map_or(false, |p| matches!(p.kind(), SyntaxKind::Block | SyntaxKind::SwitchSection))
}

/// The statement that embeds `stmt` without braces (`if`, `else`, loops),
/// or `None` when `stmt` sits in a statement list.
pub(crate) fn embedding_owner(stmt: &SyntaxNode) -> Option<SyntaxNode> {
    let parent = stmt.parent()?;
    match parent.kind() {
        SyntaxKind::IfStatement
        | SyntaxKind::ElseClause
        | SyntaxKind::WhileStatement
        | SyntaxKind::DoStatement
        | SyntaxKind::ForStatement
        | SyntaxKind::ForEachStatement => {
            Stmt::can_cast(stmt.kind()).then_some(parent)
        }
        _ => None,
    }
}

/// Trivia-only siblings strictly between `first` and `last`.
pub(crate) fn trivia_between(first: &SyntaxElement, last: &SyntaxElement) -> Vec<SyntaxElement> {
    let mut out = Vec::new();
    let mut current = first.next_sibling_or_token();
    while let Some(element) = current {
        if &element == last {
            break;
        }
        current = element.next_sibling_or_token();
        out.push(element);
    }
    out
}

pub(crate) fn elements_contain_newline(elements: &[SyntaxElement]) -> bool {
    elements
        .iter()
        .any(|e| e.as_token().map_or(false, |t| t.kind() == SyntaxKind::Newline))
}

pub(crate) fn elements_contain_comment(elements: &[SyntaxElement]) -> bool {
    elements.iter().any(|e| match e {
        NodeOrToken::Token(t) => t.kind().is_comment() || t.kind() == SyntaxKind::Directive,
        NodeOrToken::Node(n) => trivia::has_comments_or_directives(n),
    })
}

/// Previous sibling element that is not trivia.
pub(crate) fn prev_significant_sibling(element: &SyntaxElement) -> Option<SyntaxElement> {
    let mut current = element.prev_sibling_or_token();
    while let Some(e) = current {
        if !is_trivia(&e) {
            return Some(e);
        }
        current = e.prev_sibling_or_token();
    }
    None
}

pub(crate) fn next_significant_sibling(element: &SyntaxElement) -> Option<SyntaxElement> {
    let mut current = element.next_sibling_or_token();
    while let Some(e) = current {
        if !is_trivia(&e) {
            return Some(e);
        }
        current = e.next_sibling_or_token();
    }
    None
}

pub(crate) fn is_trivia(element: &SyntaxElement) -> bool {
    element.as_token().map_or(false, |t| t.kind().is_trivia())
}

/// The innermost declaration that owns local scopes (method, constructor,
/// accessor, property) around `node`, or the nearest type otherwise.
pub(crate) fn enclosing_member(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.ancestors().find(|n| {
        matches!(
            n.kind(),
            SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::FieldDeclaration
                | SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
        )
    })
}

pub(crate) fn enclosing_type(node: &SyntaxNode) -> Option<SyntaxNode> {
    node.ancestors().skip(1).find(|n| {
        matches!(
            n.kind(),
            SyntaxKind::ClassDeclaration | SyntaxKind::StructDeclaration | SyntaxKind::InterfaceDeclaration
        )
    })
}

/// Names introduced anywhere inside `scope` by declarators, parameters,
/// `foreach` variables and `catch` declarations.
pub(crate) fn declared_names(scope: &SyntaxNode) -> Vec<String> {
    scope
        .descendants()
        .filter(|n| {
            matches!(
                n.kind(),
                SyntaxKind::VariableDeclarator
                    | SyntaxKind::Parameter
                    | SyntaxKind::ForEachStatement
                    | SyntaxKind::CatchDeclaration
                    | SyntaxKind::MethodDeclaration
                    | SyntaxKind::PropertyDeclaration
                    | SyntaxKind::EnumMemberDeclaration
            )
        })
        .filter_map(|n| support::name_token(&n))
        .map(|t| t.text().to_string())
        .collect()
}
