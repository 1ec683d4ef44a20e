//! Expression typing and type resolution for [`LocalSemanticModel`].

use lathe_core::SmolStr;
use lathe_syntax::{
    ast::support, AstNode, BinaryExpression, EnumDeclaration, Expr, FieldDeclaration, HasName, Member,
    MemberAccessExpression, SyntaxKind, SyntaxNode, Type, TypeDeclaration,
};

use crate::local::{LocalSemanticModel, TypeEntry};
use crate::scope::type_parameters_in_scope;
use crate::well_known::{external_member, external_type, predefined_alias, ExternalTy, STRING_TYPE};
use crate::{PredefinedType, SemanticModel, Symbol, SymbolKind, SymbolModifiers, TypeInfo, TypeKind};

impl LocalSemanticModel {
    pub(crate) fn infer(&self, expr: &Expr) -> TypeInfo {
        self.nested(|| self.infer_inner(expr))
            .unwrap_or(TypeInfo::Error)
    }

    fn infer_inner(&self, expr: &Expr) -> TypeInfo {
        match expr {
            Expr::LiteralExpression(lit) => {
                let Some(token) = lit.token() else {
                    return TypeInfo::Error;
                };
                match token.kind() {
                    SyntaxKind::IntLiteral => TypeInfo::Predefined(int_literal_type(token.text())),
                    SyntaxKind::RealLiteral => TypeInfo::Predefined(real_literal_type(token.text())),
                    SyntaxKind::CharLiteral => TypeInfo::Predefined(PredefinedType::Char),
                    SyntaxKind::StringLiteral | SyntaxKind::VerbatimStringLiteral => {
                        TypeInfo::Predefined(PredefinedType::String)
                    }
                    SyntaxKind::TrueKw | SyntaxKind::FalseKw => TypeInfo::Predefined(PredefinedType::Bool),
                    SyntaxKind::NullKw => TypeInfo::Null,
                    SyntaxKind::DefaultKw => support::child::<Type>(lit.syntax())
                        .map_or(TypeInfo::Error, |ty| self.resolve_type(&ty)),
                    _ => TypeInfo::Error,
                }
            }
            Expr::InterpolatedStringExpression(_) => TypeInfo::Predefined(PredefinedType::String),
            Expr::NameExpression(name) => {
                let Some(text) = name.name() else {
                    return TypeInfo::Error;
                };
                match self.resolve_name(name.syntax(), &text) {
                    Some(symbol) if symbol.kind == SymbolKind::Method => TypeInfo::Error,
                    Some(symbol) => symbol.ty,
                    None => TypeInfo::Error,
                }
            }
            Expr::ThisExpression(this) => self.enclosing_type_info(this.syntax()),
            Expr::BaseExpression(base) => self
                .enclosing_types(base.syntax())
                .first()
                .and_then(|decl| TypeDeclaration::cast(decl.clone()))
                .and_then(|decl| decl.base_list())
                .and_then(|list| list.types().next())
                .map_or(TypeInfo::Error, |ty| self.resolve_type(&ty)),
            Expr::ParenthesizedExpression(paren) => paren.expr().map_or(TypeInfo::Error, |e| self.infer(&e)),
            Expr::MemberAccessExpression(access) => match self.member_access_symbol(access) {
                Some(symbol) if symbol.kind == SymbolKind::Method => TypeInfo::Error,
                Some(symbol) => symbol.ty,
                None => TypeInfo::Error,
            },
            Expr::InvocationExpression(invocation) => {
                let Some(callee) = invocation.expr() else {
                    return TypeInfo::Error;
                };
                if let Expr::NameExpression(name) = &callee {
                    if name.name().as_deref() == Some("nameof") {
                        return TypeInfo::Predefined(PredefinedType::String);
                    }
                }
                let first_argument = || {
                    invocation
                        .argument_list()
                        .and_then(|list| list.arguments().next())
                        .and_then(|arg| arg.expr())
                        .map_or(TypeInfo::Error, |e| self.infer(&e))
                };
                match &callee {
                    Expr::MemberAccessExpression(access) => {
                        let receiver = access.expr().map(|e| self.receiver_type(&e));
                        let name = access.name_token();
                        match (receiver, name) {
                            (Some(receiver), Some(name)) => match self.external_member_ty(&receiver, name.text()) {
                                Some(ExternalTy::FirstArgument) => first_argument(),
                                _ => self.symbol_of(callee.syntax()).map_or(TypeInfo::Error, |s| s.ty),
                            },
                            _ => TypeInfo::Error,
                        }
                    }
                    _ => match self.symbol_of(callee.syntax()) {
                        Some(symbol) if symbol.kind == SymbolKind::Method => symbol.ty,
                        _ => TypeInfo::Error,
                    },
                }
            }
            Expr::ElementAccessExpression(access) => {
                let receiver = access.expr().map_or(TypeInfo::Error, |e| self.infer(&e));
                match receiver.strip_nullable() {
                    TypeInfo::Array(elem) => (**elem).clone(),
                    TypeInfo::Predefined(PredefinedType::String) => TypeInfo::Predefined(PredefinedType::Char),
                    TypeInfo::Named { name, args, .. } => match (name.as_str(), args.as_slice()) {
                        ("List" | "IList" | "IReadOnlyList", [elem]) => elem.clone(),
                        ("Dictionary" | "IDictionary", [_, value]) => value.clone(),
                        _ => TypeInfo::Error,
                    },
                    _ => TypeInfo::Error,
                }
            }
            Expr::ObjectCreationExpression(creation) => {
                creation.ty().map_or(TypeInfo::Error, |ty| self.resolve_type(&ty))
            }
            Expr::ArrayCreationExpression(creation) => match creation.ty() {
                Some(Type::ArrayType(array)) => self.resolve_type(&Type::ArrayType(array)),
                Some(elem) => TypeInfo::Array(Box::new(self.resolve_type(&elem))),
                None => {
                    let first = creation
                        .syntax()
                        .children()
                        .find(|n| n.kind() == SyntaxKind::InitializerExpression)
                        .and_then(|init| init.children().find_map(Expr::cast));
                    match first.map(|e| self.infer(&e)) {
                        Some(elem) if elem.is_speakable() => TypeInfo::Array(Box::new(elem)),
                        _ => TypeInfo::Error,
                    }
                }
            },
            Expr::InitializerExpression(_) => TypeInfo::Error,
            Expr::PrefixUnaryExpression(prefix) => {
                let operand = prefix.operand().map_or(TypeInfo::Error, |e| self.infer(&e));
                match prefix.op_kind() {
                    Some(SyntaxKind::Bang) => {
                        if operand.is_nullable_boolean() {
                            operand
                        } else {
                            TypeInfo::Predefined(PredefinedType::Bool)
                        }
                    }
                    Some(SyntaxKind::Minus | SyntaxKind::Plus | SyntaxKind::Tilde) => unary_numeric(operand),
                    Some(SyntaxKind::PlusPlus | SyntaxKind::MinusMinus) => operand,
                    _ => TypeInfo::Error,
                }
            }
            Expr::PostfixUnaryExpression(postfix) => {
                postfix.operand().map_or(TypeInfo::Error, |e| self.infer(&e))
            }
            Expr::BinaryExpression(binary) => self.infer_binary(binary),
            Expr::AssignmentExpression(assignment) => {
                assignment.lhs().map_or(TypeInfo::Error, |e| self.infer(&e))
            }
            Expr::ConditionalExpression(conditional) => {
                let when_true = conditional.when_true().map_or(TypeInfo::Error, |e| self.infer(&e));
                let when_false = conditional.when_false().map_or(TypeInfo::Error, |e| self.infer(&e));
                common_type(when_true, when_false)
            }
            Expr::CastExpression(cast) => cast.ty().map_or(TypeInfo::Error, |ty| self.resolve_type(&ty)),
            Expr::TypeOfExpression(_) => TypeInfo::named("Type", TypeKind::Class),
            Expr::ThrowExpression(_) | Expr::LambdaExpression(_) => TypeInfo::Error,
        }
    }

    fn infer_binary(&self, binary: &BinaryExpression) -> TypeInfo {
        let Some(op) = binary.op_kind() else {
            return TypeInfo::Error;
        };
        let lhs = || binary.lhs().map_or(TypeInfo::Error, |e| self.infer(&e));
        let rhs = || binary.rhs().map_or(TypeInfo::Error, |e| self.infer(&e));
        match op {
            SyntaxKind::IsKw => TypeInfo::Predefined(PredefinedType::Bool),
            SyntaxKind::AsKw => match binary.rhs_type().map(|ty| self.resolve_type(&ty)) {
                Some(ty) if ty.is_value_type() && !matches!(ty, TypeInfo::Nullable(_)) => {
                    TypeInfo::Nullable(Box::new(ty))
                }
                Some(ty) => ty,
                None => TypeInfo::Error,
            },
            SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::Less
            | SyntaxKind::LessEq
            | SyntaxKind::GreaterEq
                if !binary.is_shift_right() =>
            {
                TypeInfo::Predefined(PredefinedType::Bool)
            }
            SyntaxKind::Greater if !binary.is_shift_right() => TypeInfo::Predefined(PredefinedType::Bool),
            SyntaxKind::AmpAmp | SyntaxKind::PipePipe => TypeInfo::Predefined(PredefinedType::Bool),
            SyntaxKind::QuestionQuestion => {
                let left = lhs();
                let right = rhs();
                match left {
                    TypeInfo::Nullable(inner) if right == *inner => *inner,
                    TypeInfo::Null => right,
                    left => common_type(left, right),
                }
            }
            SyntaxKind::Greater | SyntaxKind::LessLess => unary_numeric(lhs()),
            SyntaxKind::Plus => {
                let (left, right) = (lhs(), rhs());
                if left.is_string() || right.is_string() {
                    TypeInfo::Predefined(PredefinedType::String)
                } else {
                    arithmetic(left, right)
                }
            }
            SyntaxKind::Amp | SyntaxKind::Pipe | SyntaxKind::Caret => {
                let (left, right) = (lhs(), rhs());
                if left.strip_nullable().is_boolean() && right.strip_nullable().is_boolean() {
                    if matches!(left, TypeInfo::Nullable(_)) || matches!(right, TypeInfo::Nullable(_)) {
                        TypeInfo::Nullable(Box::new(TypeInfo::Predefined(PredefinedType::Bool)))
                    } else {
                        TypeInfo::Predefined(PredefinedType::Bool)
                    }
                } else if left.is_enum() && left == right {
                    left
                } else {
                    arithmetic(left, right)
                }
            }
            SyntaxKind::Minus | SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => {
                arithmetic(lhs(), rhs())
            }
            _ => TypeInfo::Error,
        }
    }

    /// Type of a member-access receiver; for a bare type name this is the
    /// type itself (static access).
    fn receiver_type(&self, expr: &Expr) -> TypeInfo {
        if let Expr::NameExpression(name) = expr {
            if let Some(text) = name.name() {
                if let Some(symbol) = self.resolve_name(name.syntax(), &text) {
                    return symbol.ty;
                }
                if let Some(kind) = name.token().map(|t| t.kind()) {
                    if let Some(predefined) = PredefinedType::from_keyword(kind) {
                        return TypeInfo::Predefined(predefined);
                    }
                }
            }
            return TypeInfo::Error;
        }
        self.infer(expr)
    }

    pub(crate) fn member_access_symbol(&self, access: &MemberAccessExpression) -> Option<Symbol> {
        let name = access.name_token()?;
        let receiver = self.receiver_type(&access.expr()?);
        if let TypeInfo::Array(_) = receiver.strip_nullable() {
            return (name.text() == "Length").then(|| {
                Symbol::new("Length", SymbolKind::Property, TypeInfo::Predefined(PredefinedType::Int))
            });
        }
        self.member_of_type(receiver.strip_nullable(), name.text())
    }

    /// Member named `name` on `ty`: source declarations (walking source and
    /// framework bases) first, then the known framework members.
    pub(crate) fn member_of_type(&self, ty: &TypeInfo, name: &str) -> Option<Symbol> {
        let type_name: SmolStr = match ty {
            TypeInfo::Named { name, .. } => name.clone(),
            TypeInfo::Predefined(PredefinedType::String) => SmolStr::new("String"),
            TypeInfo::Predefined(PredefinedType::Object) => SmolStr::new("Object"),
            _ => return None,
        };
        let mut current = Some(type_name);
        let mut seen: Vec<SmolStr> = Vec::new();
        while let Some(type_name) = current.take() {
            if seen.contains(&type_name) {
                break;
            }
            seen.push(type_name.clone());
            match self.types.get(&type_name) {
                Some(entry) => {
                    if let Some(symbol) = self.declared_member(entry, &type_name, name) {
                        return Some(symbol);
                    }
                    current = entry.bases.first().cloned();
                }
                None => return self.external_member_symbol(ty, &type_name, name),
            }
        }
        external_member("Object", name).map(|member| self.external_symbol(ty, member))
    }

    fn declared_member(&self, entry: &TypeEntry, container: &SmolStr, name: &str) -> Option<Symbol> {
        if let Some(decl) = EnumDeclaration::cast(entry.node.clone()) {
            return self
                .enum_member_symbols(&decl)
                .into_iter()
                .find(|s| s.name == name);
        }
        let decl = TypeDeclaration::cast(entry.node.clone())?;
        for member in decl.members() {
            match &member {
                Member::FieldDeclaration(field) => {
                    if field_declares(field, name) {
                        return self
                            .field_symbols(field, Some(container.clone()))
                            .into_iter()
                            .find(|s| s.name == name);
                    }
                }
                Member::PropertyDeclaration(property) if property.name().as_deref() == Some(name) => {
                    return self.property_symbol(property, Some(container.clone()));
                }
                Member::MethodDeclaration(method) if method.name().as_deref() == Some(name) => {
                    return self.method_symbol(method, Some(container.clone()));
                }
                Member::ClassDeclaration(_)
                | Member::StructDeclaration(_)
                | Member::InterfaceDeclaration(_)
                | Member::EnumDeclaration(_)
                    if member.name().as_deref() == Some(name) =>
                {
                    let mut symbol = self.type_symbol(name)?;
                    symbol.container = Some(container.clone());
                    return Some(symbol);
                }
                _ => {}
            }
        }
        None
    }

    fn external_member_symbol(&self, receiver: &TypeInfo, type_name: &str, name: &str) -> Option<Symbol> {
        let member = external_member(type_name, name)?;
        Some(self.external_symbol(receiver, member))
    }

    fn external_symbol(&self, receiver: &TypeInfo, member: &crate::well_known::ExternalMember) -> Symbol {
        let ty = substitute(receiver, member.ty);
        let kind = if member.is_method {
            SymbolKind::Method
        } else {
            SymbolKind::Property
        };
        let container = match receiver {
            TypeInfo::Named { name, .. } => Some(name.clone()),
            TypeInfo::Predefined(p) => Some(SmolStr::new(p.keyword())),
            _ => None,
        };
        Symbol {
            name: SmolStr::new(member.name),
            kind,
            ty,
            declaration: None,
            container,
            modifiers: SymbolModifiers {
                is_static: member.is_static,
                ..SymbolModifiers::default()
            },
            constant_value: None,
        }
    }

    /// Framework member descriptor for `name` on `receiver`, if any.
    fn external_member_ty(&self, receiver: &TypeInfo, name: &str) -> Option<ExternalTy> {
        let type_name = match receiver.strip_nullable() {
            TypeInfo::Named { name, .. } if !self.types.contains_key(name) => name.as_str(),
            TypeInfo::Predefined(PredefinedType::String) => STRING_TYPE.name,
            TypeInfo::Predefined(PredefinedType::Object) => "Object",
            _ => return None,
        };
        external_member(type_name, name).map(|m| m.ty)
    }

    fn enclosing_type_info(&self, node: &SyntaxNode) -> TypeInfo {
        self.enclosing_types(node)
            .first()
            .and_then(support::name_token)
            .map_or(TypeInfo::Error, |name| self.resolve_type_name(name.text(), Vec::new(), Some(node)))
    }

    pub(crate) fn resolve_type(&self, ty: &Type) -> TypeInfo {
        match ty {
            Type::PredefinedType(predefined) => match predefined.keyword_kind() {
                Some(SyntaxKind::VoidKw) => TypeInfo::Void,
                Some(kind) => PredefinedType::from_keyword(kind).map_or(TypeInfo::Error, TypeInfo::Predefined),
                None => TypeInfo::Error,
            },
            Type::NamedType(named) => {
                if named.is_var() {
                    return TypeInfo::Error;
                }
                let Some(simple) = named.simple_name() else {
                    return TypeInfo::Error;
                };
                let args = named
                    .type_arguments()
                    .map(|list| list.types().map(|arg| self.resolve_type(&arg)).collect())
                    .unwrap_or_default();
                self.resolve_type_name(simple.text(), args, Some(named.syntax()))
            }
            Type::ArrayType(array) => array
                .element_type()
                .map_or(TypeInfo::Error, |elem| TypeInfo::Array(Box::new(self.resolve_type(&elem)))),
            Type::NullableType(nullable) => nullable.underlying_type().map_or(TypeInfo::Error, |inner| {
                let inner = self.resolve_type(&inner);
                if inner.is_value_type() {
                    TypeInfo::Nullable(Box::new(inner))
                } else {
                    inner
                }
            }),
        }
    }

    /// Resolve a simple type name: type parameters in scope at `anchor`,
    /// source types, framework aliases of predefined types, framework types.
    pub(crate) fn resolve_type_name(&self, name: &str, args: Vec<TypeInfo>, anchor: Option<&SyntaxNode>) -> TypeInfo {
        if let Some(anchor) = anchor {
            if type_parameters_in_scope(anchor).iter().any(|p| p == name) {
                return TypeInfo::TypeParameter(SmolStr::new(name));
            }
        }
        if let Some(entry) = self.types.get(name) {
            return TypeInfo::Named {
                name: SmolStr::new(name),
                args,
                kind: entry.kind,
            };
        }
        if args.is_empty() {
            if let Some(predefined) = predefined_alias(name) {
                return TypeInfo::Predefined(predefined);
            }
        }
        match external_type(name) {
            Some(external) => TypeInfo::Named {
                name: SmolStr::new(name),
                args,
                kind: external.kind,
            },
            None => TypeInfo::Error,
        }
    }

    /// Element type produced by enumerating a value of type `ty`.
    pub(crate) fn element_type(&self, ty: &TypeInfo) -> TypeInfo {
        match ty.strip_nullable() {
            TypeInfo::Array(elem) => (**elem).clone(),
            TypeInfo::Predefined(PredefinedType::String) => TypeInfo::Predefined(PredefinedType::Char),
            TypeInfo::Named { name, args, .. } => match (name.as_str(), args.as_slice()) {
                ("Dictionary" | "IDictionary", [key, value]) => TypeInfo::Named {
                    name: SmolStr::new("KeyValuePair"),
                    args: vec![key.clone(), value.clone()],
                    kind: TypeKind::Struct,
                },
                (_, [elem]) if self.implements_enumerable(name) => elem.clone(),
                _ => TypeInfo::Error,
            },
            _ => TypeInfo::Error,
        }
    }

    fn implements_enumerable(&self, name: &str) -> bool {
        self.implements_interface(&TypeInfo::named(name, TypeKind::Class), "IEnumerable")
    }
}

fn field_declares(field: &FieldDeclaration, name: &str) -> bool {
    field
        .declaration()
        .map_or(false, |decl| decl.declarators().any(|d| d.name().as_deref() == Some(name)))
}

fn substitute(receiver: &TypeInfo, ty: ExternalTy) -> TypeInfo {
    let arg = |n: usize| match receiver {
        TypeInfo::Named { args, .. } => args.get(n).cloned().unwrap_or(TypeInfo::Error),
        _ => TypeInfo::Error,
    };
    match ty {
        ExternalTy::Predefined(p) => TypeInfo::Predefined(p),
        ExternalTy::Void => TypeInfo::Void,
        ExternalTy::Arg(n) => arg(n),
        ExternalTy::ArrayOfArg(n) => TypeInfo::Array(Box::new(arg(n))),
        ExternalTy::SelfType => receiver.clone(),
        ExternalTy::FirstArgument => TypeInfo::Error,
        ExternalTy::Named(name) => match external_type(name) {
            Some(external) => TypeInfo::named(name, external.kind),
            None => TypeInfo::Error,
        },
    }
}

fn int_literal_type(text: &str) -> PredefinedType {
    let lower = text.to_ascii_lowercase();
    let is_hex = lower.starts_with("0x");
    let unsigned = lower.ends_with('u') || lower.ends_with("ul") || lower.ends_with("lu");
    let long = lower.ends_with('l') || lower.ends_with("lu");
    match (unsigned, long) {
        (true, true) => PredefinedType::ULong,
        (false, true) => PredefinedType::Long,
        (true, false) => PredefinedType::UInt,
        (false, false) => {
            let value = lathe_syntax::parse_int_literal(text).unwrap_or(0);
            if value <= i32::MAX as u64 {
                PredefinedType::Int
            } else if is_hex && value <= u32::MAX as u64 {
                PredefinedType::UInt
            } else if value <= i64::MAX as u64 {
                PredefinedType::Long
            } else {
                PredefinedType::ULong
            }
        }
    }
}

fn real_literal_type(text: &str) -> PredefinedType {
    match text.chars().last().map(|c| c.to_ascii_lowercase()) {
        Some('f') => PredefinedType::Float,
        Some('m') => PredefinedType::Decimal,
        _ => PredefinedType::Double,
    }
}

fn unary_numeric(operand: TypeInfo) -> TypeInfo {
    match operand {
        TypeInfo::Predefined(p) => p.promote(p).map_or(TypeInfo::Error, TypeInfo::Predefined),
        TypeInfo::Nullable(inner) => match unary_numeric(*inner) {
            TypeInfo::Error => TypeInfo::Error,
            lifted => TypeInfo::Nullable(Box::new(lifted)),
        },
        _ => TypeInfo::Error,
    }
}

/// Result of a binary arithmetic operator, lifted when either side is nullable.
fn arithmetic(left: TypeInfo, right: TypeInfo) -> TypeInfo {
    let lifted = matches!(left, TypeInfo::Nullable(_)) || matches!(right, TypeInfo::Nullable(_));
    let result = match (left.strip_nullable(), right.strip_nullable()) {
        (TypeInfo::Predefined(a), TypeInfo::Predefined(b)) => {
            a.promote(*b).map_or(TypeInfo::Error, TypeInfo::Predefined)
        }
        (l @ TypeInfo::Named { kind: TypeKind::Enum, .. }, TypeInfo::Predefined(p)) if p.is_numeric() => l.clone(),
        _ => TypeInfo::Error,
    };
    if lifted && !result.is_error() {
        TypeInfo::Nullable(Box::new(result))
    } else {
        result
    }
}

/// Type of `c ? a : b` (and the fallback of `??`).
fn common_type(a: TypeInfo, b: TypeInfo) -> TypeInfo {
    match (a, b) {
        (a, b) if a == b => a,
        (TypeInfo::Null, b) if b.is_reference_type() || matches!(b, TypeInfo::Nullable(_)) => b,
        (a, TypeInfo::Null) if a.is_reference_type() || matches!(a, TypeInfo::Nullable(_)) => a,
        (TypeInfo::Predefined(a), TypeInfo::Predefined(b)) if a.is_numeric() && b.is_numeric() => {
            a.promote(b).map_or(TypeInfo::Error, TypeInfo::Predefined)
        }
        _ => TypeInfo::Error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_literals_pick_the_smallest_fitting_type() {
        assert_eq!(int_literal_type("1"), PredefinedType::Int);
        assert_eq!(int_literal_type("1L"), PredefinedType::Long);
        assert_eq!(int_literal_type("1u"), PredefinedType::UInt);
        assert_eq!(int_literal_type("1UL"), PredefinedType::ULong);
        assert_eq!(int_literal_type("0xFFFFFFFF"), PredefinedType::UInt);
        assert_eq!(int_literal_type("3000000000"), PredefinedType::Long);
    }

    #[test]
    fn real_literal_suffixes() {
        assert_eq!(real_literal_type("1.5"), PredefinedType::Double);
        assert_eq!(real_literal_type("1.5f"), PredefinedType::Float);
        assert_eq!(real_literal_type("1.5m"), PredefinedType::Decimal);
    }

    #[test]
    fn arithmetic_is_lifted_over_nullables() {
        let int = TypeInfo::Predefined(PredefinedType::Int);
        let nullable = TypeInfo::Nullable(Box::new(int.clone()));
        assert_eq!(arithmetic(int.clone(), int.clone()), int);
        assert_eq!(arithmetic(nullable.clone(), int.clone()), nullable);
    }
}
