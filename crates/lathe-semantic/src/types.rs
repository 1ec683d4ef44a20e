use std::fmt;

use lathe_core::SmolStr;
use lathe_syntax::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PredefinedType {
    Bool,
    Byte,
    SByte,
    Char,
    Short,
    UShort,
    Int,
    UInt,
    Long,
    ULong,
    Float,
    Double,
    Decimal,
    Object,
    String,
}

impl PredefinedType {
    pub fn from_keyword(kind: SyntaxKind) -> Option<PredefinedType> {
        Some(match kind {
            SyntaxKind::BoolKw => PredefinedType::Bool,
            SyntaxKind::ByteKw => PredefinedType::Byte,
            SyntaxKind::SbyteKw => PredefinedType::SByte,
            SyntaxKind::CharKw => PredefinedType::Char,
            SyntaxKind::ShortKw => PredefinedType::Short,
            SyntaxKind::UshortKw => PredefinedType::UShort,
            SyntaxKind::IntKw => PredefinedType::Int,
            SyntaxKind::UintKw => PredefinedType::UInt,
            SyntaxKind::LongKw => PredefinedType::Long,
            SyntaxKind::UlongKw => PredefinedType::ULong,
            SyntaxKind::FloatKw => PredefinedType::Float,
            SyntaxKind::DoubleKw => PredefinedType::Double,
            SyntaxKind::DecimalKw => PredefinedType::Decimal,
            SyntaxKind::ObjectKw => PredefinedType::Object,
            SyntaxKind::StringKw => PredefinedType::String,
            _ => return None,
        })
    }

    pub fn keyword(self) -> &'static str {
        match self {
            PredefinedType::Bool => "bool",
            PredefinedType::Byte => "byte",
            PredefinedType::SByte => "sbyte",
            PredefinedType::Char => "char",
            PredefinedType::Short => "short",
            PredefinedType::UShort => "ushort",
            PredefinedType::Int => "int",
            PredefinedType::UInt => "uint",
            PredefinedType::Long => "long",
            PredefinedType::ULong => "ulong",
            PredefinedType::Float => "float",
            PredefinedType::Double => "double",
            PredefinedType::Decimal => "decimal",
            PredefinedType::Object => "object",
            PredefinedType::String => "string",
        }
    }

    pub fn is_numeric(self) -> bool {
        self.numeric_rank().is_some()
    }

    pub fn is_reference_type(self) -> bool {
        matches!(self, PredefinedType::Object | PredefinedType::String)
    }

    /// Position in the implicit numeric conversion order; `decimal` sits apart
    /// but ranks above `double` for promotion purposes.
    fn numeric_rank(self) -> Option<u8> {
        Some(match self {
            PredefinedType::SByte => 0,
            PredefinedType::Byte => 1,
            PredefinedType::Short => 2,
            PredefinedType::UShort => 3,
            PredefinedType::Char => 4,
            PredefinedType::Int => 5,
            PredefinedType::UInt => 6,
            PredefinedType::Long => 7,
            PredefinedType::ULong => 8,
            PredefinedType::Float => 9,
            PredefinedType::Double => 10,
            PredefinedType::Decimal => 11,
            _ => return None,
        })
    }

    /// Result type of a binary arithmetic operator, with small types widened to `int`.
    pub fn promote(self, other: PredefinedType) -> Option<PredefinedType> {
        let a = self.numeric_rank()?;
        let b = other.numeric_rank()?;
        let wider = if a >= b { self } else { other };
        Some(match wider {
            PredefinedType::SByte
            | PredefinedType::Byte
            | PredefinedType::Short
            | PredefinedType::UShort
            | PredefinedType::Char => PredefinedType::Int,
            other => other,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
}

/// A resolved type. Structural equality is type identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeInfo {
    Predefined(PredefinedType),
    Named {
        name: SmolStr,
        args: Vec<TypeInfo>,
        kind: TypeKind,
    },
    /// A generic type parameter in scope.
    TypeParameter(SmolStr),
    Array(Box<TypeInfo>),
    Nullable(Box<TypeInfo>),
    /// Type of the `null` literal.
    Null,
    Void,
    /// Unknown or unresolvable.
    Error,
}

impl TypeInfo {
    pub fn named(name: impl Into<SmolStr>, kind: TypeKind) -> TypeInfo {
        TypeInfo::Named {
            name: name.into(),
            args: Vec::new(),
            kind,
        }
    }

    pub fn is_error(&self) -> bool {
        match self {
            TypeInfo::Error => true,
            TypeInfo::Named { args, .. } => args.iter().any(TypeInfo::is_error),
            TypeInfo::Array(elem) | TypeInfo::Nullable(elem) => elem.is_error(),
            _ => false,
        }
    }

    pub fn is_reference_type(&self) -> bool {
        match self {
            TypeInfo::Predefined(p) => p.is_reference_type(),
            TypeInfo::Named { kind, .. } => matches!(kind, TypeKind::Class | TypeKind::Interface),
            TypeInfo::Array(_) => true,
            _ => false,
        }
    }

    pub fn is_value_type(&self) -> bool {
        match self {
            TypeInfo::Predefined(p) => !p.is_reference_type(),
            TypeInfo::Named { kind, .. } => matches!(kind, TypeKind::Struct | TypeKind::Enum),
            TypeInfo::Nullable(_) => true,
            _ => false,
        }
    }

    pub fn is_boolean(&self) -> bool {
        *self == TypeInfo::Predefined(PredefinedType::Bool)
    }

    pub fn is_nullable_boolean(&self) -> bool {
        matches!(self, TypeInfo::Nullable(inner) if inner.is_boolean())
    }

    pub fn is_string(&self) -> bool {
        *self == TypeInfo::Predefined(PredefinedType::String)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeInfo::Predefined(p) if p.is_numeric())
    }

    pub fn is_enum(&self) -> bool {
        matches!(self, TypeInfo::Named { kind: TypeKind::Enum, .. })
    }

    pub fn as_predefined(&self) -> Option<PredefinedType> {
        match self {
            TypeInfo::Predefined(p) => Some(*p),
            _ => None,
        }
    }

    /// Underlying type of `T?`, or the type itself.
    pub fn strip_nullable(&self) -> &TypeInfo {
        match self {
            TypeInfo::Nullable(inner) => inner,
            other => other,
        }
    }

    /// True if the type can be written in source (no error, `null` or `void` parts).
    pub fn is_speakable(&self) -> bool {
        match self {
            TypeInfo::Error | TypeInfo::Null | TypeInfo::Void => false,
            TypeInfo::Named { args, .. } => args.iter().all(TypeInfo::is_speakable),
            TypeInfo::Array(elem) | TypeInfo::Nullable(elem) => elem.is_speakable(),
            TypeInfo::Predefined(_) | TypeInfo::TypeParameter(_) => true,
        }
    }

    /// Source spelling, e.g. `List<int>`, `string[]`, `int?`.
    pub fn display(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TypeInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeInfo::Predefined(p) => f.write_str(p.keyword()),
            TypeInfo::Named { name, args, .. } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{arg}")?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeInfo::TypeParameter(name) => f.write_str(name),
            TypeInfo::Array(elem) => write!(f, "{elem}[]"),
            TypeInfo::Nullable(inner) => write!(f, "{inner}?"),
            TypeInfo::Null => f.write_str("null"),
            TypeInfo::Void => f.write_str("void"),
            TypeInfo::Error => f.write_str("?"),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn display_spells_source_types() {
        let list = TypeInfo::Named {
            name: "Dictionary".into(),
            args: vec![
                TypeInfo::Predefined(PredefinedType::String),
                TypeInfo::Array(Box::new(TypeInfo::Predefined(PredefinedType::Int))),
            ],
            kind: TypeKind::Class,
        };
        assert_eq!(list.display(), "Dictionary<string, int[]>");
        assert_eq!(
            TypeInfo::Nullable(Box::new(TypeInfo::Predefined(PredefinedType::Bool))).display(),
            "bool?"
        );
    }

    #[test]
    fn promotion_widens_small_types() {
        use PredefinedType::*;
        assert_eq!(Byte.promote(Short), Some(Int));
        assert_eq!(Int.promote(Long), Some(Long));
        assert_eq!(Float.promote(Int), Some(Float));
        assert_eq!(Int.promote(String), None);
    }

    #[test]
    fn classification() {
        let error_list = TypeInfo::Named {
            name: "List".into(),
            args: vec![TypeInfo::Error],
            kind: TypeKind::Class,
        };
        assert!(error_list.is_error());
        assert!(!error_list.is_speakable());
        assert!(TypeInfo::Predefined(PredefinedType::String).is_reference_type());
        assert!(TypeInfo::named("DateTime", TypeKind::Struct).is_value_type());
        assert!(TypeInfo::Nullable(Box::new(TypeInfo::Predefined(PredefinedType::Bool)))
            .is_nullable_boolean());
    }
}
