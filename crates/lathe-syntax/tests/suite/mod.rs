use lathe_syntax::{parse, SyntaxKind, SyntaxNode};

mod recovery;
mod round_trip;
mod shapes;

/// Node kinds in preorder, skipping the root.
pub(crate) fn node_kinds(root: &SyntaxNode) -> Vec<SyntaxKind> {
    root.descendants().skip(1).map(|n| n.kind()).collect()
}

pub(crate) fn first_of(text: &str, kind: SyntaxKind) -> SyntaxNode {
    parse(text)
        .syntax()
        .descendants()
        .find(|n| n.kind() == kind)
        .unwrap_or_else(|| panic!("no {kind:?} in {text:?}"))
}
