//! Single-document semantic model.

use std::cell::Cell;
use std::collections::HashMap;

use lathe_core::{CancellationToken, CancellationTokenExt, Cancelled, SmolStr, TextSpan};
use lathe_syntax::{
    AstNode, EnumDeclaration, EnumMemberDeclaration, Expr, FieldDeclaration, GreenNode, HasModifiers, HasName,
    LocalDeclarationStatement, Member, MethodDeclaration, PropertyDeclaration, SyntaxKind, SyntaxNode, SyntaxToken, TextSize, Type,
    TypeDeclaration, VariableDeclarator,
};

use crate::constant::evaluate_constant;
use crate::scope::{bindings_in_member, local_bindings, Binding};
use crate::well_known::external_derives_from;
use crate::{SemanticModel, SemanticModelProvider, Symbol, SymbolKind, SymbolModifiers, TypeInfo, TypeKind};

/// Nesting limit for `var` inference chains.
const MAX_INFERENCE_DEPTH: u32 = 32;

#[derive(Debug, Clone)]
pub(crate) struct TypeEntry {
    pub(crate) kind: TypeKind,
    pub(crate) node: SyntaxNode,
    pub(crate) bases: Vec<SmolStr>,
}

/// [`SemanticModel`] over one document's syntax tree.
#[derive(Debug)]
pub struct LocalSemanticModel {
    root: SyntaxNode,
    pub(crate) types: HashMap<SmolStr, TypeEntry>,
    pub(crate) depth: Cell<u32>,
}

impl LocalSemanticModel {
    pub fn new(green: GreenNode) -> Self {
        let root = SyntaxNode::new_root(green);
        let mut types = HashMap::new();
        for node in root.descendants() {
            let kind = match node.kind() {
                SyntaxKind::ClassDeclaration => TypeKind::Class,
                SyntaxKind::StructDeclaration => TypeKind::Struct,
                SyntaxKind::InterfaceDeclaration => TypeKind::Interface,
                SyntaxKind::EnumDeclaration => TypeKind::Enum,
                _ => continue,
            };
            let Some(name) = lathe_syntax::ast::support::name_token(&node) else {
                continue;
            };
            let bases = node
                .children()
                .find(|c| c.kind() == SyntaxKind::BaseList)
                .map(|list| {
                    list.children()
                        .filter_map(Type::cast)
                        .filter_map(|ty| simple_type_name(&ty))
                        .collect()
                })
                .unwrap_or_default();
            types
                .entry(SmolStr::new(name.text()))
                .or_insert(TypeEntry { kind, node, bases });
        }
        tracing::trace!(target: "lathe.semantic", types = types.len(), "bound document");
        Self {
            root,
            types,
            depth: Cell::new(0),
        }
    }

    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Run `f` one inference level deeper; `None` past the nesting limit.
    pub(crate) fn nested<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        let depth = self.depth.get();
        if depth >= MAX_INFERENCE_DEPTH {
            return None;
        }
        self.depth.set(depth + 1);
        let result = f();
        self.depth.set(depth);
        Some(result)
    }

    // --- symbols -------------------------------------------------------

    pub(crate) fn binding_symbol(&self, binding: &Binding) -> Symbol {
        let name = binding.name().unwrap_or_default();
        let declaration = binding.name_token().map(|t| span_of(&t));
        let (kind, ty, modifiers, constant_value) = match binding {
            Binding::Local(declarator) => {
                let is_const = declarator
                    .syntax()
                    .ancestors()
                    .nth(2)
                    .and_then(LocalDeclarationStatement::cast)
                    .map_or(false, |stmt| stmt.is_const());
                let constant = if is_const {
                    declarator.value().and_then(|v| self.constant_value(&v))
                } else {
                    None
                };
                let modifiers = SymbolModifiers {
                    is_const,
                    ..SymbolModifiers::default()
                };
                (SymbolKind::Local, self.declarator_type(declarator), modifiers, constant)
            }
            Binding::Parameter(param) => {
                let ty = param.ty().map_or(TypeInfo::Error, |ty| self.resolve_type(&ty));
                (SymbolKind::Parameter, ty, SymbolModifiers::default(), None)
            }
            Binding::ForEach(stmt) => {
                let ty = match stmt.ty() {
                    Some(Type::NamedType(named)) if named.is_var() => stmt
                        .expr()
                        .map_or(TypeInfo::Error, |e| self.element_type(&self.infer(&e))),
                    Some(ty) => self.resolve_type(&ty),
                    None => TypeInfo::Error,
                };
                (SymbolKind::Local, ty, SymbolModifiers::default(), None)
            }
            Binding::Catch(decl) => {
                let ty = lathe_syntax::ast::support::child::<Type>(decl.syntax())
                    .map_or(TypeInfo::Error, |ty| self.resolve_type(&ty));
                (SymbolKind::Local, ty, SymbolModifiers::default(), None)
            }
            Binding::SetterValue(property) => {
                let ty = property.ty().map_or(TypeInfo::Error, |ty| self.resolve_type(&ty));
                (SymbolKind::Parameter, ty, SymbolModifiers::default(), None)
            }
        };
        Symbol {
            name: name.into(),
            kind,
            ty,
            declaration,
            container: None,
            modifiers,
            constant_value,
        }
    }

    fn declarator_type(&self, declarator: &VariableDeclarator) -> TypeInfo {
        let declared = declarator
            .syntax()
            .parent()
            .and_then(lathe_syntax::VariableDeclaration::cast)
            .and_then(|decl| decl.ty());
        match declared {
            Some(Type::NamedType(named)) if named.is_var() => declarator
                .value()
                .and_then(|value| self.nested(|| self.infer(&value)))
                .map(|ty| if ty == TypeInfo::Null { TypeInfo::Error } else { ty })
                .unwrap_or(TypeInfo::Error),
            Some(ty) => self.resolve_type(&ty),
            None => TypeInfo::Error,
        }
    }

    pub(crate) fn constant_value(&self, expr: &Expr) -> Option<i64> {
        let anchor = expr.syntax().clone();
        evaluate_constant(expr, &mut |name| {
            self.resolve_name(&anchor, name)
                .and_then(|symbol| symbol.constant_value)
        })
    }

    /// Symbols of every member declared directly in `decl`. Fields yield one
    /// symbol per declarator.
    pub(crate) fn members_of_declaration(&self, decl: &SyntaxNode) -> Vec<Symbol> {
        let container = lathe_syntax::ast::support::name_token(decl).map(|t| SmolStr::new(t.text()));
        if let Some(enum_decl) = EnumDeclaration::cast(decl.clone()) {
            return self.enum_member_symbols(&enum_decl);
        }
        let Some(type_decl) = TypeDeclaration::cast(decl.clone()) else {
            return Vec::new();
        };
        let mut out = Vec::new();
        for member in type_decl.members() {
            match &member {
                Member::FieldDeclaration(field) => out.extend(self.field_symbols(field, container.clone())),
                Member::PropertyDeclaration(property) => {
                    out.extend(self.property_symbol(property, container.clone()))
                }
                Member::MethodDeclaration(method) => out.extend(self.method_symbol(method, container.clone())),
                Member::ConstructorDeclaration(_) => {}
                Member::ClassDeclaration(_)
                | Member::StructDeclaration(_)
                | Member::InterfaceDeclaration(_)
                | Member::EnumDeclaration(_) => {
                    if let Some(name) = member.name() {
                        if let Some(mut symbol) = self.type_symbol(&name) {
                            symbol.container = container.clone();
                            out.push(symbol);
                        }
                    }
                }
            }
        }
        out
    }

    fn member_modifiers(&self, member: &impl HasModifiers) -> SymbolModifiers {
        let has_accessibility = member
            .modifiers()
            .map_or(false, |m| m.tokens().any(|t| t.kind().is_accessibility_modifier()));
        SymbolModifiers {
            is_static: member.has_modifier(SyntaxKind::StaticKw) || member.has_modifier(SyntaxKind::ConstKw),
            is_readonly: member.has_modifier(SyntaxKind::ReadonlyKw),
            is_const: member.has_modifier(SyntaxKind::ConstKw),
            has_setter: false,
            is_private: member.has_modifier(SyntaxKind::PrivateKw) || !has_accessibility,
        }
    }

    pub(crate) fn field_symbols(&self, field: &FieldDeclaration, container: Option<SmolStr>) -> Vec<Symbol> {
        let Some(declaration) = field.declaration() else {
            return Vec::new();
        };
        let ty = declaration
            .ty()
            .map_or(TypeInfo::Error, |ty| self.resolve_type(&ty));
        let modifiers = self.member_modifiers(field);
        declaration
            .declarators()
            .filter_map(|declarator| {
                let name = declarator.name_token()?;
                let constant_value = if modifiers.is_const {
                    declarator
                        .value()
                        .and_then(|v| self.nested(|| self.constant_value(&v)).flatten())
                } else {
                    None
                };
                Some(Symbol {
                    name: SmolStr::new(name.text()),
                    kind: SymbolKind::Field,
                    ty: ty.clone(),
                    declaration: Some(span_of(&name)),
                    container: container.clone(),
                    modifiers,
                    constant_value,
                })
            })
            .collect()
    }

    pub(crate) fn property_symbol(&self, property: &PropertyDeclaration, container: Option<SmolStr>) -> Option<Symbol> {
        let name = property.name_token()?;
        let mut modifiers = self.member_modifiers(property);
        modifiers.has_setter = property
            .accessor_list()
            .map_or(false, |list| list.accessors().any(|a| a.is_setter()));
        Some(Symbol {
            name: SmolStr::new(name.text()),
            kind: SymbolKind::Property,
            ty: property.ty().map_or(TypeInfo::Error, |ty| self.resolve_type(&ty)),
            declaration: Some(span_of(&name)),
            container,
            modifiers,
            constant_value: None,
        })
    }

    pub(crate) fn method_symbol(&self, method: &MethodDeclaration, container: Option<SmolStr>) -> Option<Symbol> {
        let name = method.name_token()?;
        Some(Symbol {
            name: SmolStr::new(name.text()),
            kind: SymbolKind::Method,
            ty: method.return_type().map_or(TypeInfo::Error, |ty| self.resolve_type(&ty)),
            declaration: Some(span_of(&name)),
            container,
            modifiers: self.member_modifiers(method),
            constant_value: None,
        })
    }

    /// Enum members with their values: explicit values fold, implicit ones
    /// continue from the previous member (starting at 0).
    pub(crate) fn enum_member_symbols(&self, decl: &EnumDeclaration) -> Vec<Symbol> {
        let Some(enum_name) = decl.name() else {
            return Vec::new();
        };
        let ty = TypeInfo::named(enum_name.as_str(), TypeKind::Enum);
        let mut known: HashMap<String, i64> = HashMap::new();
        let mut previous: Option<i64> = Some(-1);
        let mut out = Vec::new();
        for member in decl.members() {
            let Some(name) = member.name_token() else { continue };
            let value = match member.value() {
                Some(expr) => evaluate_constant(&expr, &mut |n| known.get(n).copied()),
                None => previous.and_then(|p| p.checked_add(1)),
            };
            if let Some(value) = value {
                known.insert(name.text().to_string(), value);
            }
            previous = value;
            out.push(Symbol {
                name: SmolStr::new(name.text()),
                kind: SymbolKind::EnumMember,
                ty: ty.clone(),
                declaration: Some(span_of(&name)),
                container: Some(SmolStr::new(&enum_name)),
                modifiers: SymbolModifiers {
                    is_static: true,
                    is_const: true,
                    ..SymbolModifiers::default()
                },
                constant_value: value,
            });
        }
        out
    }

    pub(crate) fn type_symbol(&self, name: &str) -> Option<Symbol> {
        let ty = self.resolve_type_name(name, Vec::new(), None);
        if ty.is_error() {
            return None;
        }
        let declaration = self
            .types
            .get(name)
            .and_then(|entry| lathe_syntax::ast::support::name_token(&entry.node))
            .map(|t| span_of(&t));
        Some(Symbol {
            name: SmolStr::new(name),
            kind: SymbolKind::Type,
            ty,
            declaration,
            container: None,
            modifiers: SymbolModifiers::default(),
            constant_value: None,
        })
    }

    /// Type declarations enclosing `node`, innermost first.
    pub(crate) fn enclosing_types(&self, node: &SyntaxNode) -> Vec<SyntaxNode> {
        node.ancestors()
            .filter(|n| {
                matches!(
                    n.kind(),
                    SyntaxKind::ClassDeclaration
                        | SyntaxKind::StructDeclaration
                        | SyntaxKind::InterfaceDeclaration
                        | SyntaxKind::EnumDeclaration
                )
            })
            .collect()
    }

    /// Resolve a simple name used at `node`: locals and parameters, then
    /// members of enclosing types (with inherited ones), then type names.
    pub(crate) fn resolve_name(&self, node: &SyntaxNode, name: &str) -> Option<Symbol> {
        let offset = node.text_range().start();
        if let Some(binding) = local_bindings(node, offset)
            .into_iter()
            .find(|b| b.name().as_deref() == Some(name))
        {
            return Some(self.binding_symbol(&binding));
        }
        for decl in self.enclosing_types(node) {
            let Some(type_name) = lathe_syntax::ast::support::name_token(&decl) else {
                continue;
            };
            let ty = self.resolve_type_name(type_name.text(), Vec::new(), None);
            if let Some(symbol) = self.member_of_type(&ty, name) {
                return Some(symbol);
            }
        }
        self.type_symbol(name)
    }

    fn symbol_at_token(&self, token: &SyntaxToken) -> Option<Symbol> {
        let parent = token.parent()?;
        match parent.kind() {
            SyntaxKind::NameExpression | SyntaxKind::MemberAccessExpression => self.symbol_of(&parent),
            SyntaxKind::NamedType => self.type_symbol(token.text()),
            _ => self.declared_symbol(&parent),
        }
    }
}

pub(crate) fn span_of(token: &SyntaxToken) -> TextSpan {
    token.text_range().into()
}

fn simple_type_name(ty: &Type) -> Option<SmolStr> {
    match ty {
        Type::NamedType(named) => named.simple_name().map(|t| SmolStr::new(t.text())),
        _ => None,
    }
}

impl SemanticModel for LocalSemanticModel {
    fn type_of_expression(&self, expr: &SyntaxNode) -> TypeInfo {
        match Expr::cast(expr.clone()) {
            Some(expr) => self.infer(&expr),
            None => TypeInfo::Error,
        }
    }

    fn symbol_of(&self, node: &SyntaxNode) -> Option<Symbol> {
        match Expr::cast(node.clone()) {
            Some(Expr::NameExpression(name)) => self.resolve_name(node, &name.name()?),
            Some(Expr::MemberAccessExpression(access)) => self.member_access_symbol(&access),
            Some(Expr::InvocationExpression(invocation)) => self.symbol_of(invocation.expr()?.syntax()),
            Some(Expr::ParenthesizedExpression(paren)) => self.symbol_of(paren.expr()?.syntax()),
            Some(_) => None,
            None => self.declared_symbol(node),
        }
    }

    fn declared_symbol(&self, decl: &SyntaxNode) -> Option<Symbol> {
        let container = || {
            decl.ancestors()
                .skip(1)
                .find(|n| {
                    matches!(
                        n.kind(),
                        SyntaxKind::ClassDeclaration
                            | SyntaxKind::StructDeclaration
                            | SyntaxKind::InterfaceDeclaration
                            | SyntaxKind::EnumDeclaration
                    )
                })
                .and_then(|n| lathe_syntax::ast::support::name_token(&n))
                .map(|t| SmolStr::new(t.text()))
        };
        match decl.kind() {
            SyntaxKind::VariableDeclarator => {
                let declarator = VariableDeclarator::cast(decl.clone())?;
                let owner = decl.ancestors().nth(2)?;
                if let Some(field) = FieldDeclaration::cast(owner) {
                    let name = declarator.name()?;
                    return self
                        .field_symbols(&field, container())
                        .into_iter()
                        .find(|s| s.name == name.as_str());
                }
                Some(self.binding_symbol(&Binding::Local(declarator)))
            }
            SyntaxKind::Parameter => lathe_syntax::Parameter::cast(decl.clone())
                .map(|p| self.binding_symbol(&Binding::Parameter(p))),
            SyntaxKind::ForEachStatement => lathe_syntax::ForEachStatement::cast(decl.clone())
                .map(|s| self.binding_symbol(&Binding::ForEach(s))),
            SyntaxKind::CatchDeclaration => lathe_syntax::CatchDeclaration::cast(decl.clone())
                .filter(|c| c.name_token().is_some())
                .map(|c| self.binding_symbol(&Binding::Catch(c))),
            SyntaxKind::PropertyDeclaration => {
                self.property_symbol(&PropertyDeclaration::cast(decl.clone())?, container())
            }
            SyntaxKind::MethodDeclaration => {
                self.method_symbol(&MethodDeclaration::cast(decl.clone())?, container())
            }
            SyntaxKind::EnumMemberDeclaration => {
                let member = EnumMemberDeclaration::cast(decl.clone())?;
                let enum_decl = decl.parent().and_then(EnumDeclaration::cast)?;
                let name = member.name()?;
                self.enum_member_symbols(&enum_decl)
                    .into_iter()
                    .find(|s| s.name == name.as_str())
            }
            SyntaxKind::ClassDeclaration
            | SyntaxKind::StructDeclaration
            | SyntaxKind::InterfaceDeclaration
            | SyntaxKind::EnumDeclaration => {
                let name = lathe_syntax::ast::support::name_token(decl)?;
                self.type_symbol(name.text())
            }
            _ => None,
        }
    }

    fn type_from_syntax(&self, ty: &SyntaxNode) -> TypeInfo {
        match Type::cast(ty.clone()) {
            Some(ty) => self.resolve_type(&ty),
            None => TypeInfo::Error,
        }
    }

    fn lookup_symbols(&self, offset: usize) -> Vec<Symbol> {
        let offset = TextSize::from(offset as u32);
        let node = match self.root.token_at_offset(offset).right_biased() {
            Some(token) => token.parent(),
            None => Some(self.root.clone()),
        };
        let Some(node) = node else {
            return Vec::new();
        };
        let mut out: Vec<Symbol> = local_bindings(&node, offset)
            .iter()
            .map(|b| self.binding_symbol(b))
            .collect();
        for decl in self.enclosing_types(&node) {
            out.extend(self.members_of_declaration(&decl));
        }
        let mut type_names: Vec<&SmolStr> = self.types.keys().collect();
        type_names.sort();
        out.extend(type_names.into_iter().filter_map(|name| self.type_symbol(name)));
        out
    }

    fn implements_interface(&self, ty: &TypeInfo, interface: &str) -> bool {
        let name = match ty {
            TypeInfo::Named { name, .. } => name.clone(),
            TypeInfo::Predefined(p) if p.is_reference_type() => match p.keyword() {
                "string" => SmolStr::new("String"),
                _ => SmolStr::new("Object"),
            },
            TypeInfo::Array(_) => {
                return matches!(interface, "IEnumerable" | "ICollection" | "IList" | "IReadOnlyList")
            }
            _ => return false,
        };
        let mut pending = vec![name];
        let mut seen: Vec<SmolStr> = Vec::new();
        while let Some(current) = pending.pop() {
            if current == interface {
                return true;
            }
            if seen.contains(&current) {
                continue;
            }
            seen.push(current.clone());
            match self.types.get(&current) {
                Some(entry) => pending.extend(entry.bases.iter().cloned()),
                None => {
                    if external_derives_from(&current, interface) {
                        return true;
                    }
                }
            }
        }
        false
    }

    fn find_references(&self, symbol: &Symbol, cancel: &CancellationToken) -> Result<Vec<TextSpan>, Cancelled> {
        let mut spans = Vec::new();
        if let Some(declaration) = symbol.declaration {
            spans.push(declaration);
        }
        let candidates = self
            .root
            .descendants_with_tokens()
            .filter_map(|it| it.into_token())
            .filter(|t| t.kind() == SyntaxKind::Identifier && t.text() == symbol.name.as_str());
        for (i, token) in candidates.enumerate() {
            if i % 64 == 0 {
                cancel.check_cancelled()?;
            }
            let span = span_of(&token);
            if Some(span) == symbol.declaration {
                continue;
            }
            if self.symbol_at_token(&token).as_ref() == Some(symbol) {
                spans.push(span);
            }
        }
        spans.sort();
        spans.dedup();
        Ok(spans)
    }

    fn is_name_visible(&self, name: &str, offset: usize) -> bool {
        let offset_size = TextSize::from(offset as u32);
        let node = self
            .root
            .token_at_offset(offset_size)
            .right_biased()
            .and_then(|t| t.parent())
            .unwrap_or_else(|| self.root.clone());
        let in_member = bindings_in_member(&node)
            .iter()
            .any(|b| b.name().as_deref() == Some(name));
        in_member || self.lookup_symbols(offset).iter().any(|s| s.name == name)
    }
}

/// Builds a [`LocalSemanticModel`] per request.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalSemanticModelProvider;

impl SemanticModelProvider for LocalSemanticModelProvider {
    fn semantic_model(&self, green: &GreenNode, cancel: &CancellationToken) -> Result<Box<dyn SemanticModel>, Cancelled> {
        cancel.check_cancelled()?;
        Ok(Box::new(LocalSemanticModel::new(green.clone())))
    }
}
