//! The fixed slice of the base class library the local model knows about.

use crate::types::{PredefinedType, TypeKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ExternalTy {
    Predefined(PredefinedType),
    Void,
    /// The n-th type argument of the receiver.
    Arg(usize),
    /// Array of the n-th type argument of the receiver.
    ArrayOfArg(usize),
    /// The receiver type itself.
    SelfType,
    /// The type of the invocation's first argument.
    FirstArgument,
    Named(&'static str),
}

#[derive(Debug)]
pub(crate) struct ExternalMember {
    pub(crate) name: &'static str,
    pub(crate) is_method: bool,
    pub(crate) is_static: bool,
    pub(crate) ty: ExternalTy,
}

#[derive(Debug)]
pub(crate) struct ExternalType {
    pub(crate) name: &'static str,
    pub(crate) kind: TypeKind,
    pub(crate) bases: &'static [&'static str],
    pub(crate) members: &'static [ExternalMember],
}

const fn prop(name: &'static str, ty: ExternalTy) -> ExternalMember {
    ExternalMember { name, is_method: false, is_static: false, ty }
}

const fn method(name: &'static str, ty: ExternalTy) -> ExternalMember {
    ExternalMember { name, is_method: true, is_static: false, ty }
}

const fn static_prop(name: &'static str, ty: ExternalTy) -> ExternalMember {
    ExternalMember { name, is_method: false, is_static: true, ty }
}

const fn static_method(name: &'static str, ty: ExternalTy) -> ExternalMember {
    ExternalMember { name, is_method: true, is_static: true, ty }
}

const BOOL: ExternalTy = ExternalTy::Predefined(PredefinedType::Bool);
const INT: ExternalTy = ExternalTy::Predefined(PredefinedType::Int);
const DOUBLE: ExternalTy = ExternalTy::Predefined(PredefinedType::Double);
const STRING: ExternalTy = ExternalTy::Predefined(PredefinedType::String);
const VOID: ExternalTy = ExternalTy::Void;

/// Members every type inherits from `object`.
pub(crate) static OBJECT_MEMBERS: &[ExternalMember] = &[
    method("ToString", STRING),
    method("Equals", BOOL),
    method("GetHashCode", INT),
    method("GetType", ExternalTy::Named("Type")),
];

pub(crate) static STRING_TYPE: ExternalType = ExternalType {
    name: "String",
    kind: TypeKind::Class,
    bases: &["IEnumerable", "IComparable", "IEquatable"],
    members: &[
        prop("Length", INT),
        method("Trim", STRING),
        method("TrimStart", STRING),
        method("TrimEnd", STRING),
        method("ToUpper", STRING),
        method("ToLower", STRING),
        method("Substring", STRING),
        method("Replace", STRING),
        method("Insert", STRING),
        method("PadLeft", STRING),
        method("PadRight", STRING),
        method("Contains", BOOL),
        method("StartsWith", BOOL),
        method("EndsWith", BOOL),
        method("IndexOf", INT),
        static_prop("Empty", STRING),
        static_method("IsNullOrEmpty", BOOL),
        static_method("IsNullOrWhiteSpace", BOOL),
        static_method("Format", STRING),
        static_method("Concat", STRING),
        static_method("Join", STRING),
    ],
};

static TYPES: &[ExternalType] = &[
    ExternalType {
        name: "Object",
        kind: TypeKind::Class,
        bases: &[],
        members: &[],
    },
    ExternalType {
        name: "List",
        kind: TypeKind::Class,
        bases: &["IList", "IReadOnlyList"],
        members: &[
            prop("Count", INT),
            method("Add", VOID),
            method("Remove", BOOL),
            method("Contains", BOOL),
            method("Clear", VOID),
            method("IndexOf", INT),
            method("Insert", VOID),
            method("ToArray", ExternalTy::ArrayOfArg(0)),
        ],
    },
    ExternalType {
        name: "Dictionary",
        kind: TypeKind::Class,
        bases: &["IDictionary"],
        members: &[
            prop("Count", INT),
            method("Add", VOID),
            method("ContainsKey", BOOL),
            method("Remove", BOOL),
            method("TryGetValue", BOOL),
            method("Clear", VOID),
        ],
    },
    ExternalType {
        name: "HashSet",
        kind: TypeKind::Class,
        bases: &["ISet"],
        members: &[
            prop("Count", INT),
            method("Add", BOOL),
            method("Contains", BOOL),
            method("Remove", BOOL),
        ],
    },
    ExternalType {
        name: "IEnumerable",
        kind: TypeKind::Interface,
        bases: &[],
        members: &[],
    },
    ExternalType {
        name: "ICollection",
        kind: TypeKind::Interface,
        bases: &["IEnumerable"],
        members: &[prop("Count", INT), method("Add", VOID), method("Contains", BOOL)],
    },
    ExternalType {
        name: "IList",
        kind: TypeKind::Interface,
        bases: &["ICollection"],
        members: &[method("IndexOf", INT)],
    },
    ExternalType {
        name: "IReadOnlyList",
        kind: TypeKind::Interface,
        bases: &["IEnumerable"],
        members: &[prop("Count", INT)],
    },
    ExternalType {
        name: "ISet",
        kind: TypeKind::Interface,
        bases: &["ICollection"],
        members: &[],
    },
    ExternalType {
        name: "IDictionary",
        kind: TypeKind::Interface,
        bases: &["ICollection"],
        members: &[method("ContainsKey", BOOL)],
    },
    ExternalType {
        name: "IDisposable",
        kind: TypeKind::Interface,
        bases: &[],
        members: &[method("Dispose", VOID)],
    },
    ExternalType {
        name: "IComparable",
        kind: TypeKind::Interface,
        bases: &[],
        members: &[method("CompareTo", INT)],
    },
    ExternalType {
        name: "IEquatable",
        kind: TypeKind::Interface,
        bases: &[],
        members: &[],
    },
    ExternalType {
        name: "Exception",
        kind: TypeKind::Class,
        bases: &[],
        members: &[prop("Message", STRING), prop("InnerException", ExternalTy::Named("Exception"))],
    },
    ExternalType {
        name: "ArgumentException",
        kind: TypeKind::Class,
        bases: &["Exception"],
        members: &[prop("ParamName", STRING)],
    },
    ExternalType {
        name: "ArgumentNullException",
        kind: TypeKind::Class,
        bases: &["ArgumentException"],
        members: &[],
    },
    ExternalType {
        name: "ArgumentOutOfRangeException",
        kind: TypeKind::Class,
        bases: &["ArgumentException"],
        members: &[],
    },
    ExternalType {
        name: "InvalidOperationException",
        kind: TypeKind::Class,
        bases: &["Exception"],
        members: &[],
    },
    ExternalType {
        name: "NotSupportedException",
        kind: TypeKind::Class,
        bases: &["Exception"],
        members: &[],
    },
    ExternalType {
        name: "NotImplementedException",
        kind: TypeKind::Class,
        bases: &["Exception"],
        members: &[],
    },
    ExternalType {
        name: "StringBuilder",
        kind: TypeKind::Class,
        bases: &[],
        members: &[
            prop("Length", INT),
            method("Append", ExternalTy::SelfType),
            method("AppendLine", ExternalTy::SelfType),
            method("Clear", ExternalTy::SelfType),
        ],
    },
    ExternalType {
        name: "Task",
        kind: TypeKind::Class,
        bases: &[],
        members: &[prop("Result", ExternalTy::Arg(0)), method("Wait", VOID)],
    },
    ExternalType {
        name: "Type",
        kind: TypeKind::Class,
        bases: &[],
        members: &[prop("Name", STRING), prop("FullName", STRING)],
    },
    ExternalType {
        name: "DateTime",
        kind: TypeKind::Struct,
        bases: &["IComparable", "IEquatable"],
        members: &[
            static_prop("Now", ExternalTy::SelfType),
            static_prop("UtcNow", ExternalTy::SelfType),
            static_prop("Today", ExternalTy::SelfType),
            prop("Year", INT),
            prop("Month", INT),
            prop("Day", INT),
            method("AddDays", ExternalTy::SelfType),
        ],
    },
    ExternalType {
        name: "TimeSpan",
        kind: TypeKind::Struct,
        bases: &["IComparable", "IEquatable"],
        members: &[
            static_prop("Zero", ExternalTy::SelfType),
            prop("TotalSeconds", DOUBLE),
            prop("TotalMilliseconds", DOUBLE),
        ],
    },
    ExternalType {
        name: "Guid",
        kind: TypeKind::Struct,
        bases: &["IEquatable"],
        members: &[
            static_prop("Empty", ExternalTy::SelfType),
            static_method("NewGuid", ExternalTy::SelfType),
        ],
    },
    ExternalType {
        name: "Console",
        kind: TypeKind::Class,
        bases: &[],
        members: &[
            static_method("WriteLine", VOID),
            static_method("Write", VOID),
            static_method("ReadLine", STRING),
        ],
    },
    ExternalType {
        name: "Math",
        kind: TypeKind::Class,
        bases: &[],
        members: &[
            static_prop("PI", DOUBLE),
            static_method("Abs", ExternalTy::FirstArgument),
            static_method("Max", ExternalTy::FirstArgument),
            static_method("Min", ExternalTy::FirstArgument),
            static_method("Sqrt", DOUBLE),
            static_method("Pow", DOUBLE),
        ],
    },
    ExternalType {
        name: "Random",
        kind: TypeKind::Class,
        bases: &[],
        members: &[method("Next", INT), method("NextDouble", DOUBLE)],
    },
];

/// Aliases of predefined types that can be named with their framework names.
pub(crate) fn predefined_alias(name: &str) -> Option<PredefinedType> {
    Some(match name {
        "Boolean" => PredefinedType::Bool,
        "Byte" => PredefinedType::Byte,
        "Char" => PredefinedType::Char,
        "Int16" => PredefinedType::Short,
        "Int32" => PredefinedType::Int,
        "Int64" => PredefinedType::Long,
        "Single" => PredefinedType::Float,
        "Double" => PredefinedType::Double,
        "Decimal" => PredefinedType::Decimal,
        "String" => PredefinedType::String,
        "Object" => PredefinedType::Object,
        _ => return None,
    })
}

pub(crate) fn external_type(name: &str) -> Option<&'static ExternalType> {
    TYPES.iter().find(|ty| ty.name == name)
}

/// Member lookup through the base chain, falling back to `object` members.
pub(crate) fn external_member(type_name: &str, member: &str) -> Option<&'static ExternalMember> {
    let mut pending = vec![type_name];
    let mut seen = Vec::new();
    while let Some(name) = pending.pop() {
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let ty = if name == "String" {
            Some(&STRING_TYPE)
        } else {
            external_type(name)
        };
        let Some(ty) = ty else { continue };
        if let Some(found) = ty.members.iter().find(|m| m.name == member) {
            return Some(found);
        }
        pending.extend(ty.bases.iter().rev().copied());
    }
    OBJECT_MEMBERS.iter().find(|m| m.name == member)
}

/// True if `type_name` is `target` or (transitively) lists it as a base.
pub(crate) fn external_derives_from(type_name: &str, target: &str) -> bool {
    let mut pending = vec![type_name];
    let mut seen = Vec::new();
    while let Some(name) = pending.pop() {
        if name == target {
            return true;
        }
        if seen.contains(&name) {
            continue;
        }
        seen.push(name);
        let bases = if name == "String" {
            STRING_TYPE.bases
        } else {
            external_type(name).map_or(&[][..], |ty| ty.bases)
        };
        pending.extend(bases.iter().copied());
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn members_are_found_through_bases() {
        assert!(external_member("ArgumentNullException", "Message").is_some());
        assert!(external_member("List", "ToString").is_some());
        assert!(external_member("List", "Frobnicate").is_none());
    }

    #[test]
    fn interface_closure() {
        assert!(external_derives_from("List", "IEnumerable"));
        assert!(external_derives_from("String", "IEnumerable"));
        assert!(!external_derives_from("Exception", "IEnumerable"));
    }
}
