use lathe_core::{SmolStr, TextSpan};

use crate::TypeInfo;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    Local,
    Parameter,
    Field,
    Property,
    Method,
    EnumMember,
    Type,
}

impl SymbolKind {
    pub fn is_local_or_parameter(self) -> bool {
        matches!(self, SymbolKind::Local | SymbolKind::Parameter)
    }
}

/// A named entity resolved by the model.
///
/// Two symbols are the same entity iff they compare equal; source symbols
/// carry the span of their declaring name token, external ones do not.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: SmolStr,
    pub kind: SymbolKind,
    /// Declared type; the return type for methods.
    pub ty: TypeInfo,
    /// Span of the declaring identifier, `None` for external symbols.
    pub declaration: Option<TextSpan>,
    /// Name of the declaring type for members.
    pub container: Option<SmolStr>,
    pub modifiers: SymbolModifiers,
    /// Value of `const` locals/fields and enum members when it folds to an integer.
    pub constant_value: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SymbolModifiers {
    pub is_static: bool,
    pub is_readonly: bool,
    pub is_const: bool,
    /// Properties only: has a `set` or `init` accessor.
    pub has_setter: bool,
    pub is_private: bool,
}

impl Symbol {
    pub fn new(name: impl Into<SmolStr>, kind: SymbolKind, ty: TypeInfo) -> Symbol {
        Symbol {
            name: name.into(),
            kind,
            ty,
            declaration: None,
            container: None,
            modifiers: SymbolModifiers::default(),
            constant_value: None,
        }
    }

    pub fn is_source(&self) -> bool {
        self.declaration.is_some()
    }
}
