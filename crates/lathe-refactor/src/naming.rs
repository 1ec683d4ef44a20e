//! Identifier derivation and collision avoidance.

use lathe_semantic::{PredefinedType, SemanticModel, TypeInfo, TypeKind};
use lathe_syntax::{SyntaxKind, SyntaxNode};

use crate::tree::declared_names;

/// A conventional variable name for a value of type `ty`.
///
/// `List<int>` becomes `list`, `IEnumerable<T>` becomes `enumerable`,
/// `Item[]` becomes `items`; predefined types map to short idiomatic names
/// (`bool` → `flag`, `string` → `text`). Returns `None` when nothing sensible
/// can be derived (`null`, `void`, unresolved types).
pub fn derive_name(ty: &TypeInfo, first_char_to_lower: bool) -> Option<String> {
    let base = match ty {
        TypeInfo::Named { name, kind, .. } => {
            let name = name.as_str();
            if *kind == TypeKind::Interface {
                strip_marker(name, 'I')
            } else {
                name
            }
            .to_string()
        }
        TypeInfo::TypeParameter(name) => strip_marker(name.as_str(), 'T').to_string(),
        TypeInfo::Nullable(inner) => return derive_name(inner, first_char_to_lower),
        TypeInfo::Array(element) => match element.as_ref() {
            TypeInfo::Named { .. } | TypeInfo::TypeParameter(_) => {
                format!("{}s", derive_name(element, first_char_to_lower)?)
            }
            _ => "items".to_string(),
        },
        TypeInfo::Predefined(predefined) => predefined_name(*predefined).to_string(),
        TypeInfo::Null | TypeInfo::Void | TypeInfo::Error => return None,
    };
    if base.is_empty() {
        return None;
    }
    let name = if first_char_to_lower { decapitalize(&base) } else { base };
    if SyntaxKind::from_keyword(&name).is_some() {
        return Some(format!("{name}Value"));
    }
    Some(name)
}

fn predefined_name(ty: PredefinedType) -> &'static str {
    match ty {
        PredefinedType::Bool => "flag",
        PredefinedType::Char => "ch",
        PredefinedType::String => "text",
        PredefinedType::Object => "obj",
        _ => "value",
    }
}

/// `IList` → `List`, `TItem` → `Item`; single letters and names where the
/// marker is not followed by an upper-case letter are kept.
fn strip_marker(name: &str, marker: char) -> &str {
    let mut chars = name.chars();
    match (chars.next(), chars.next()) {
        (Some(first), Some(second)) if first == marker && second.is_uppercase() => &name[1..],
        _ => name,
    }
}

fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `candidate`, or `candidate` followed by the smallest integer suffix from 2
/// upwards for which `is_taken` returns false.
pub fn ensure_unique_with(candidate: &str, mut is_taken: impl FnMut(&str) -> bool) -> String {
    if !is_taken(candidate) {
        return candidate.to_string();
    }
    let mut suffix = 2usize;
    loop {
        let name = format!("{candidate}{suffix}");
        if !is_taken(&name) {
            return name;
        }
        suffix += 1;
    }
}

/// A name that neither binds at `offset` (per the model) nor is declared
/// anywhere inside `scope`.
pub(crate) fn unique_name(
    candidate: &str,
    model: Option<&dyn SemanticModel>,
    scope: &SyntaxNode,
    offset: usize,
) -> String {
    let declared = declared_names(scope);
    ensure_unique_with(candidate, |name| {
        declared.iter().any(|d| d == name) || model.map_or(false, |m| m.is_name_visible(name, offset))
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn named(name: &str, kind: TypeKind) -> TypeInfo {
        TypeInfo::named(name, kind)
    }

    #[test]
    fn names_from_types() {
        assert_eq!(derive_name(&named("StringBuilder", TypeKind::Class), true).as_deref(), Some("stringBuilder"));
        assert_eq!(derive_name(&named("IEnumerable", TypeKind::Interface), true).as_deref(), Some("enumerable"));
        assert_eq!(derive_name(&named("Index", TypeKind::Interface), true).as_deref(), Some("index"));
        assert_eq!(derive_name(&TypeInfo::TypeParameter("TKey".into()), true).as_deref(), Some("key"));
        assert_eq!(
            derive_name(&TypeInfo::Array(Box::new(named("Order", TypeKind::Class))), true).as_deref(),
            Some("orders")
        );
        assert_eq!(
            derive_name(&TypeInfo::Array(Box::new(TypeInfo::Predefined(PredefinedType::Int))), true).as_deref(),
            Some("items")
        );
        assert_eq!(derive_name(&TypeInfo::Predefined(PredefinedType::Bool), true).as_deref(), Some("flag"));
        assert_eq!(
            derive_name(&TypeInfo::Nullable(Box::new(TypeInfo::Predefined(PredefinedType::Int))), true).as_deref(),
            Some("value")
        );
        assert_eq!(derive_name(&named("Order", TypeKind::Class), false).as_deref(), Some("Order"));
    }

    #[test]
    fn no_name_for_unspeakable_types() {
        assert_eq!(derive_name(&TypeInfo::Error, true), None);
        assert_eq!(derive_name(&TypeInfo::Null, true), None);
        assert_eq!(derive_name(&TypeInfo::Void, true), None);
    }

    #[test]
    fn keywords_are_avoided() {
        assert_eq!(derive_name(&named("Object", TypeKind::Class), true).as_deref(), Some("objectValue"));
        assert_eq!(derive_name(&named("Event", TypeKind::Class), true).as_deref(), Some("eventValue"));
    }

    #[test]
    fn suffixes_start_at_two_and_are_deterministic() {
        let taken = ["value", "value2"];
        let pick = || ensure_unique_with("value", |n| taken.contains(&n));
        assert_eq!(pick(), "value3");
        assert_eq!(pick(), pick());
        assert_eq!(ensure_unique_with("other", |n| taken.contains(&n)), "other");
    }
}
