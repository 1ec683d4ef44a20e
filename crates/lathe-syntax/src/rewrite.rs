//! Batch, path-copying tree edits.
//!
//! A [`SyntaxRewriter`] collects replacements, removals and insertions keyed
//! by elements of one tree, then produces a new root in a single pass. Only
//! the ancestors of edited elements are rebuilt; every other subtree reuses
//! its green node, so the result shares structure with the input.

use std::collections::{HashMap, HashSet};

use rowan::{GreenNode, GreenToken, NodeOrToken};

use crate::{SyntaxElement, SyntaxNode};

pub type GreenElement = NodeOrToken<GreenNode, GreenToken>;

#[derive(Debug, Default, Clone)]
pub struct SyntaxRewriter {
    replacements: HashMap<SyntaxElement, Vec<GreenElement>>,
    before: HashMap<SyntaxElement, Vec<GreenElement>>,
    after: HashMap<SyntaxElement, Vec<GreenElement>>,
}

impl SyntaxRewriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty() && self.before.is_empty() && self.after.is_empty()
    }

    pub fn replace(&mut self, old: impl Into<SyntaxElement>, new: impl Into<GreenElement>) {
        self.replacements.insert(old.into(), vec![new.into()]);
    }

    pub fn replace_with_many(&mut self, old: impl Into<SyntaxElement>, new: Vec<GreenElement>) {
        self.replacements.insert(old.into(), new);
    }

    pub fn remove(&mut self, old: impl Into<SyntaxElement>) {
        self.replacements.insert(old.into(), Vec::new());
    }

    /// Remove `first`, `last` and every sibling between them.
    pub fn remove_range(&mut self, first: impl Into<SyntaxElement>, last: impl Into<SyntaxElement>) {
        let first = first.into();
        let last = last.into();
        let mut current = Some(first);
        while let Some(element) = current {
            let done = element == last;
            current = element.next_sibling_or_token();
            self.remove(element);
            if done {
                break;
            }
        }
    }

    pub fn insert_before(&mut self, anchor: impl Into<SyntaxElement>, new: Vec<GreenElement>) {
        self.before.entry(anchor.into()).or_default().extend(new);
    }

    pub fn insert_after(&mut self, anchor: impl Into<SyntaxElement>, new: Vec<GreenElement>) {
        let entry = self.after.entry(anchor.into()).or_default();
        // Later insertions after the same anchor land closer to it.
        let mut combined = new;
        combined.append(entry);
        *entry = combined;
    }

    /// Apply every recorded edit to the tree rooted at `root`.
    pub fn rewrite(&self, root: &SyntaxNode) -> GreenNode {
        let touched = self.touched_nodes();
        if let Some(replacement) = self.replacements.get(&NodeOrToken::Node(root.clone())) {
            if let [NodeOrToken::Node(node)] = replacement.as_slice() {
                return node.clone();
            }
        }
        self.rewrite_node(root, &touched)
    }

    /// Rewrite and wrap the result in a fresh root.
    pub fn rewrite_root(&self, root: &SyntaxNode) -> SyntaxNode {
        SyntaxNode::new_root(self.rewrite(root))
    }

    fn touched_nodes(&self) -> HashSet<SyntaxNode> {
        let mut touched = HashSet::new();
        let keys = self
            .replacements
            .keys()
            .chain(self.before.keys())
            .chain(self.after.keys());
        for key in keys {
            let mut parent = key.parent();
            while let Some(node) = parent {
                if !touched.insert(node.clone()) {
                    break;
                }
                parent = node.parent();
            }
        }
        touched
    }

    fn rewrite_node(&self, node: &SyntaxNode, touched: &HashSet<SyntaxNode>) -> GreenNode {
        if !touched.contains(node) {
            return node.green().into_owned();
        }
        let mut children: Vec<GreenElement> = Vec::new();
        for child in node.children_with_tokens() {
            if let Some(inserted) = self.before.get(&child) {
                children.extend(inserted.iter().cloned());
            }
            match self.replacements.get(&child) {
                Some(replacement) => children.extend(replacement.iter().cloned()),
                None => children.push(match &child {
                    NodeOrToken::Node(n) => NodeOrToken::Node(self.rewrite_node(n, touched)),
                    NodeOrToken::Token(t) => NodeOrToken::Token(t.green().to_owned()),
                }),
            }
            if let Some(inserted) = self.after.get(&child) {
                children.extend(inserted.iter().cloned());
            }
        }
        GreenNode::new(node.green().kind(), children)
    }
}

/// Green copy of an element.
pub fn green_of(element: &SyntaxElement) -> GreenElement {
    match element {
        NodeOrToken::Node(node) => NodeOrToken::Node(node.green().into_owned()),
        NodeOrToken::Token(token) => NodeOrToken::Token(token.green().to_owned()),
    }
}

/// Green copies of `first..=last`, which must be siblings.
pub fn green_range(first: &SyntaxElement, last: &SyntaxElement) -> Vec<GreenElement> {
    let mut out = Vec::new();
    let mut current = Some(first.clone());
    while let Some(element) = current {
        out.push(green_of(&element));
        if &element == last {
            break;
        }
        current = element.next_sibling_or_token();
    }
    out
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{make, parse, SyntaxKind};

    #[test]
    fn untouched_subtrees_are_shared() {
        let root = parse("class A { int x; } class B { int y; }").syntax();
        let classes: Vec<_> = root
            .children()
            .filter(|n| n.kind() == SyntaxKind::ClassDeclaration)
            .collect();
        let name = classes[0]
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| t.kind() == SyntaxKind::Identifier)
            .unwrap();
        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(name, make::ident("Renamed"));
        let new_root = rewriter.rewrite_root(&root);
        assert_eq!(new_root.to_string(), "class Renamed { int x; } class B { int y; }");
        let new_b = new_root.children().nth(1).unwrap();
        assert!(std::ptr::eq(&*new_b.green(), &*classes[1].green()));
    }

    #[test]
    fn insertions_and_removals() {
        let root = parse("class C { int a; int b; }").syntax();
        let fields: Vec<_> = root
            .descendants()
            .filter(|n| n.kind() == SyntaxKind::FieldDeclaration)
            .collect();
        let mut rewriter = SyntaxRewriter::new();
        rewriter.remove(fields[0].clone());
        rewriter.insert_after(
            fields[1].clone(),
            vec![make::whitespace(" ").into(), green_of(&fields[0].clone().into())],
        );
        assert_eq!(
            rewriter.rewrite_root(&root).to_string(),
            "class C {  int b; int a; }"
        );
    }
}
