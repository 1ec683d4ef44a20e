use lathe_semantic::LocalSemanticModel;
use lathe_syntax::{parse, SyntaxKind, SyntaxNode};

mod references;
mod scopes;
mod types;

pub(crate) fn model(text: &str) -> LocalSemanticModel {
    let parse = parse(text);
    assert!(!parse.has_errors(), "{:?}", parse.errors);
    LocalSemanticModel::new(parse.green)
}

/// Outermost node of `kind` whose text is exactly `needle`.
pub(crate) fn node(model: &LocalSemanticModel, kind: SyntaxKind, needle: &str) -> SyntaxNode {
    model
        .root()
        .descendants()
        .find(|n| n.kind() == kind && n.text() == needle)
        .unwrap_or_else(|| panic!("no {kind:?} with text {needle:?}"))
}

/// The declarator introducing `name`.
pub(crate) fn declarator(model: &LocalSemanticModel, name: &str) -> SyntaxNode {
    model
        .root()
        .descendants()
        .find(|n| {
            n.kind() == SyntaxKind::VariableDeclarator
                && n.first_token().map_or(false, |t| t.text() == name)
        })
        .unwrap_or_else(|| panic!("no declarator {name:?}"))
}
