//! Enum member order and explicit values.

use std::collections::HashMap;

use lathe_config::RefactoringId;
use lathe_semantic::evaluate_constant;
use lathe_syntax::{make, AstNode, EnumDeclaration, EnumMemberDeclaration, HasName, NodeOrToken, SyntaxRewriter};

use super::members::{compare_name_text, gaps_are_plain, permute, sorted_order};
use crate::selection::{is_on_token, selected_nodes};
use crate::tree::NodePtr;
use crate::{RefactorError, RefactoringContext, SourceChange};

/// Value of every member in declaration order; implicit values continue
/// from the previous member. `None` from the first value that does not fold.
fn member_values(members: &[EnumMemberDeclaration]) -> Vec<Option<i64>> {
    let mut known: HashMap<String, i64> = HashMap::new();
    let mut values = Vec::with_capacity(members.len());
    let mut previous: Option<Option<i64>> = None;
    for member in members {
        let value = match member.value() {
            Some(expr) => evaluate_constant(&expr, &mut |name| known.get(name).copied()),
            None => match previous {
                None => Some(0),
                Some(prev) => prev.and_then(|v| v.checked_add(1)),
            },
        };
        if let (Some(name), Some(value)) = (member.name(), value) {
            known.insert(name, value);
        }
        values.push(value);
        previous = Some(value);
    }
    values
}

#[derive(Debug, Clone, Copy)]
enum EnumOrder {
    Name,
    Value,
}

pub(super) fn compute(ctx: &RefactoringContext<'_>, declaration: &EnumDeclaration) {
    compute_sort(ctx, declaration);
    compute_generate(ctx, declaration);
}

fn compute_sort(ctx: &RefactoringContext<'_>, declaration: &EnumDeclaration) {
    if !ctx.is_enabled(RefactoringId::SortEnumMembers) {
        return;
    }
    let all: Vec<EnumMemberDeclaration> = declaration.members().collect();
    let Some(selected) = selected_nodes(all.iter().cloned(), ctx.span()) else {
        return;
    };
    if selected.len() < 2 || !gaps_are_plain(&selected) {
        return;
    }
    let first_index = all.iter().position(|m| m == &selected[0]).unwrap_or_default();
    let run = first_index..first_index + selected.len();
    // Moving a member must not change any implicit value.
    let after_run_is_explicit = all.get(run.end).map_or(true, |next| next.value().is_some());
    if !after_run_is_explicit || selected.iter().any(|m| m.value().is_none()) {
        return;
    }
    let values = member_values(&all);
    let Some(run_values) = values[run].iter().copied().collect::<Option<Vec<i64>>>() else {
        return;
    };

    for order in [EnumOrder::Name, EnumOrder::Value] {
        let permutation = match order {
            EnumOrder::Name => {
                let names: Vec<String> = selected.iter().map(|m| m.name().unwrap_or_default()).collect();
                sorted_order(&names, |a, b| compare_name_text(a, b))
            }
            EnumOrder::Value => sorted_order(&run_values, |a: &i64, b: &i64| a.cmp(b)),
        };
        let Some(permutation) = permutation else {
            continue;
        };
        let (variant, title) = match order {
            EnumOrder::Name => ("name", "Sort enum members by name"),
            EnumOrder::Value => ("value", "Sort enum members by value"),
        };
        let ptrs: Vec<NodePtr> = selected.iter().map(|m| NodePtr::new(m.syntax())).collect();
        ctx.register_variant(RefactoringId::SortEnumMembers, variant, title, move |doc, _| {
            let root = doc.syntax();
            let nodes = ptrs.iter().map(|ptr| ptr.to_node(&root)).collect::<Result<Vec<_>, _>>()?;
            let mut rewriter = SyntaxRewriter::new();
            permute(&mut rewriter, &nodes, &permutation);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
}

fn compute_generate(ctx: &RefactoringContext<'_>, declaration: &EnumDeclaration) {
    if !ctx.is_enabled(RefactoringId::GenerateEnumValues) {
        return;
    }
    let Some(name) = declaration.name_token() else {
        return;
    };
    if !is_on_token(ctx.span(), &name) {
        return;
    }
    let members: Vec<EnumMemberDeclaration> = declaration.members().collect();
    if !members.iter().any(|m| m.value().is_none()) {
        return;
    }
    if member_values(&members).iter().any(Option::is_none) {
        return;
    }
    let ptr = NodePtr::new(declaration.syntax());
    ctx.register(RefactoringId::GenerateEnumValues, "Generate enum values", move |doc, _| {
        let root = doc.syntax();
        let declaration: EnumDeclaration = ptr.cast(&root)?;
        let members: Vec<EnumMemberDeclaration> = declaration.members().collect();
        let values = member_values(&members);
        let mut rewriter = SyntaxRewriter::new();
        for (member, value) in members.iter().zip(values) {
            if member.value().is_some() {
                continue;
            }
            let value = value.ok_or_else(|| RefactorError::invalid_target("enum value does not fold"))?;
            let name = member
                .name_token()
                .ok_or_else(|| RefactorError::invalid_target("enum member without a name"))?;
            rewriter.insert_after(
                name,
                vec![make::space(), NodeOrToken::Node(make::equals_value(make::int_literal(value)))],
            );
        }
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use lathe_syntax::parse;
    use pretty_assertions::assert_eq;

    use super::*;

    fn values(text: &str) -> Vec<Option<i64>> {
        let root = parse(text).syntax();
        let declaration = root.descendants().find_map(EnumDeclaration::cast).unwrap();
        let members: Vec<_> = declaration.members().collect();
        member_values(&members)
    }

    #[test]
    fn implicit_values_continue_from_the_previous_member() {
        assert_eq!(values("enum E { A, B = 5, C, D = B + 10 }"), vec![Some(0), Some(5), Some(6), Some(15)]);
    }

    #[test]
    fn unresolvable_values_poison_the_rest() {
        assert_eq!(values("enum E { A = Other.X, B }"), vec![None, None]);
    }

    #[test]
    fn ordering_by_value_is_numeric() {
        assert_eq!(sorted_order(&[10i64, 9, 100], |a, b| a.cmp(b)), Some(vec![1, 0, 2]));
        assert_eq!(compare_name_text("Blue", "red"), Ordering::Less);
    }
}
