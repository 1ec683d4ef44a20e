//! Lexical scope walking for locals and parameters.

use lathe_syntax::{
    ast::support, AccessorDeclaration, AstNode, CatchDeclaration, ForEachStatement, ForStatement, HasName,
    LocalDeclarationStatement, Parameter, PropertyDeclaration, SyntaxKind, SyntaxNode, SyntaxToken, TextSize,
    VariableDeclaration, VariableDeclarator,
};

/// A local-level declaration visible at some position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Binding {
    Local(VariableDeclarator),
    Parameter(Parameter),
    ForEach(ForEachStatement),
    Catch(CatchDeclaration),
    /// The implicit `value` parameter of a property setter.
    SetterValue(PropertyDeclaration),
}

impl Binding {
    pub(crate) fn name(&self) -> Option<String> {
        match self {
            Binding::Local(it) => it.name(),
            Binding::Parameter(it) => it.name(),
            Binding::ForEach(it) => it.name(),
            Binding::Catch(it) => it.name(),
            Binding::SetterValue(_) => Some("value".to_string()),
        }
    }

    pub(crate) fn name_token(&self) -> Option<SyntaxToken> {
        match self {
            Binding::Local(it) => it.name_token(),
            Binding::Parameter(it) => it.name_token(),
            Binding::ForEach(it) => it.name_token(),
            Binding::Catch(it) => it.name_token(),
            Binding::SetterValue(_) => None,
        }
    }
}

/// Locals and parameters visible at `offset`, innermost first. The walk
/// starts at `start` and stops at the enclosing type declaration.
///
/// A local is visible once its declaring statement has ended, so a
/// declarator never sees itself in its own initializer.
pub(crate) fn local_bindings(start: &SyntaxNode, offset: TextSize) -> Vec<Binding> {
    let mut out = Vec::new();
    for node in start.ancestors() {
        match node.kind() {
            SyntaxKind::Block | SyntaxKind::SwitchSection => {
                let earlier: Vec<_> = node
                    .children()
                    .filter(|stmt| stmt.text_range().end() <= offset)
                    .filter_map(LocalDeclarationStatement::cast)
                    .collect();
                for stmt in earlier.iter().rev() {
                    push_declarators(stmt.declaration(), &mut out);
                }
            }
            SyntaxKind::ForStatement => {
                let Some(stmt) = ForStatement::cast(node.clone()) else { continue };
                let declaration = stmt
                    .declaration()
                    .filter(|decl| decl.syntax().text_range().end() <= offset);
                push_declarators(declaration, &mut out);
            }
            SyntaxKind::ForEachStatement => {
                let Some(stmt) = ForEachStatement::cast(node.clone()) else { continue };
                let after_header = stmt
                    .statement()
                    .map_or(false, |body| body.syntax().text_range().start() <= offset);
                if after_header {
                    out.push(Binding::ForEach(stmt));
                }
            }
            SyntaxKind::CatchClause => {
                if let Some(decl) = support::child::<CatchDeclaration>(&node) {
                    if decl.name_token().is_some() && decl.syntax().text_range().end() <= offset {
                        out.push(Binding::Catch(decl));
                    }
                }
            }
            SyntaxKind::LambdaExpression => {
                for child in node.children() {
                    match child.kind() {
                        SyntaxKind::Parameter => out.extend(Parameter::cast(child).map(Binding::Parameter)),
                        SyntaxKind::ParameterList => {
                            out.extend(child.children().filter_map(Parameter::cast).map(Binding::Parameter))
                        }
                        _ => {}
                    }
                }
            }
            SyntaxKind::MethodDeclaration | SyntaxKind::ConstructorDeclaration => {
                if let Some(list) = node.children().find(|n| n.kind() == SyntaxKind::ParameterList) {
                    out.extend(list.children().filter_map(Parameter::cast).map(Binding::Parameter));
                }
            }
            SyntaxKind::AccessorDeclaration => {
                let accessor = AccessorDeclaration::cast(node.clone());
                let property = node
                    .ancestors()
                    .find_map(PropertyDeclaration::cast);
                if let (Some(accessor), Some(property)) = (accessor, property) {
                    if accessor.is_setter() {
                        out.push(Binding::SetterValue(property));
                    }
                }
            }
            SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::EnumDeclaration => break,
            _ => {}
        }
    }
    out
}

fn push_declarators(declaration: Option<VariableDeclaration>, out: &mut Vec<Binding>) {
    if let Some(declaration) = declaration {
        let declarators: Vec<_> = declaration.declarators().collect();
        out.extend(declarators.into_iter().rev().map(Binding::Local));
    }
}

/// Every local, parameter, loop and catch variable declared anywhere in the
/// member enclosing `node`, regardless of position.
pub(crate) fn bindings_in_member(node: &SyntaxNode) -> Vec<Binding> {
    let member = node.ancestors().find(|n| {
        matches!(
            n.kind(),
            SyntaxKind::MethodDeclaration
                | SyntaxKind::ConstructorDeclaration
                | SyntaxKind::PropertyDeclaration
                | SyntaxKind::FieldDeclaration
        )
    });
    let Some(member) = member else {
        return Vec::new();
    };
    member
        .descendants()
        .filter_map(|n| {
            if let Some(declarator) = VariableDeclarator::cast(n.clone()) {
                let is_field = n.ancestors().nth(2).map_or(false, |a| a.kind() == SyntaxKind::FieldDeclaration);
                return (!is_field).then_some(Binding::Local(declarator));
            }
            if let Some(param) = Parameter::cast(n.clone()) {
                return Some(Binding::Parameter(param));
            }
            if let Some(stmt) = ForEachStatement::cast(n.clone()) {
                return Some(Binding::ForEach(stmt));
            }
            CatchDeclaration::cast(n).filter(|c| c.name_token().is_some()).map(Binding::Catch)
        })
        .collect()
}

/// Names of generic type parameters visible at `node`.
pub(crate) fn type_parameters_in_scope(node: &SyntaxNode) -> Vec<String> {
    node.ancestors()
        .filter_map(|n| n.children().find(|c| c.kind() == SyntaxKind::TypeParameterList))
        .flat_map(|list| {
            list.children()
                .filter(|c| c.kind() == SyntaxKind::TypeParameter)
                .filter_map(|c| support::name_token(&c))
                .map(|t| t.text().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}
