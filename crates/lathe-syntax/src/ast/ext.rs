//! Hand-written accessors shared by several node kinds.

use super::support;
use super::*;
use crate::{SyntaxKind, SyntaxToken};

/// Declarations with an optional [`Modifiers`] list.
pub trait HasModifiers: AstNode {
    fn modifiers(&self) -> Option<Modifiers> {
        support::child(self.syntax())
    }

    fn has_modifier(&self, kind: SyntaxKind) -> bool {
        self.modifiers().map_or(false, |m| m.has(kind))
    }
}

/// Declarations whose name is a direct identifier token.
pub trait HasName: AstNode {
    fn name_token(&self) -> Option<SyntaxToken> {
        support::name_token(self.syntax())
    }

    fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }
}

/// Members that have either a block body, an `=> expr;` body, or neither.
pub trait HasBody: AstNode {
    fn body(&self) -> Option<Block> {
        support::child(self.syntax())
    }

    fn expression_body(&self) -> Option<ArrowExpressionClause> {
        support::child(self.syntax())
    }

    fn semicolon_token(&self) -> Option<SyntaxToken> {
        support::token(self.syntax(), SyntaxKind::Semicolon)
    }
}

macro_rules! impl_traits {
    ($trait:ident for $($ty:ident),*) => {
        $(impl $trait for $ty {})*
    };
}

impl_traits!(HasModifiers for FieldDeclaration, PropertyDeclaration, MethodDeclaration, ConstructorDeclaration,
    ClassDeclaration, StructDeclaration, InterfaceDeclaration, EnumDeclaration, AccessorDeclaration, Member, TypeDeclaration);
impl_traits!(HasName for PropertyDeclaration, MethodDeclaration, ConstructorDeclaration, ClassDeclaration,
    StructDeclaration, InterfaceDeclaration, EnumDeclaration, EnumMemberDeclaration, Parameter, VariableDeclarator,
    ForEachStatement, CatchDeclaration, TypeDeclaration);
impl_traits!(HasBody for MethodDeclaration, ConstructorDeclaration, AccessorDeclaration);

impl TypeDeclaration {
    pub fn members(&self) -> impl Iterator<Item = Member> + '_ {
        support::children(self.syntax())
    }

    pub fn base_list(&self) -> Option<BaseList> {
        support::child(self.syntax())
    }

    pub fn l_brace_token(&self) -> Option<SyntaxToken> {
        support::token(self.syntax(), SyntaxKind::LBrace)
    }

    pub fn r_brace_token(&self) -> Option<SyntaxToken> {
        support::token(self.syntax(), SyntaxKind::RBrace)
    }
}

impl BaseList {
    pub fn types(&self) -> impl Iterator<Item = Type> + '_ {
        support::children(self.syntax())
    }
}

impl Member {
    /// Declared name; for fields, the first declarator's name.
    pub fn name_token(&self) -> Option<SyntaxToken> {
        match self {
            Member::FieldDeclaration(field) => field
                .declaration()?
                .declarators()
                .next()?
                .name_token(),
            _ => support::name_token(self.syntax()),
        }
    }

    pub fn name(&self) -> Option<String> {
        self.name_token().map(|t| t.text().to_string())
    }

    pub fn as_type_declaration(&self) -> Option<TypeDeclaration> {
        TypeDeclaration::cast(self.syntax().clone())
    }
}

impl Expr {
    /// Innermost expression after stripping any number of parentheses.
    pub fn without_parentheses(&self) -> Option<Expr> {
        let mut expr = self.clone();
        while let Expr::ParenthesizedExpression(paren) = &expr {
            expr = paren.expr()?;
        }
        Some(expr)
    }

    pub fn is_literal_of(&self, kind: SyntaxKind) -> bool {
        matches!(self, Expr::LiteralExpression(lit) if lit.kind() == Some(kind))
    }
}

impl Stmt {
    /// `return`, `throw`, `break` or `continue`.
    pub fn is_jump(&self) -> bool {
        matches!(
            self,
            Stmt::ReturnStatement(_)
                | Stmt::ThrowStatement(_)
                | Stmt::BreakStatement(_)
                | Stmt::ContinueStatement(_)
        )
    }
}
