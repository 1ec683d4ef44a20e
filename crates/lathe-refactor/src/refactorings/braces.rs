//! Adding and removing braces around embedded statements.

use lathe_config::RefactoringId;
use lathe_syntax::{
    trivia, AstNode, Block, IfStatement, NodeOrToken, Stmt, SyntaxElement, SyntaxKind, SyntaxNode,
    SyntaxRewriter,
};

use crate::layout::{reindent_node, Layout};
use crate::selection::is_on_token;
use crate::tree::{embedding_owner, next_significant_sibling, prev_significant_sibling, span, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

/// Routines for a statement embedded in `if`/`else`/loop without a list.
pub(super) fn compute_embedded(ctx: &RefactoringContext<'_>, stmt: &Stmt) {
    let node = stmt.syntax();
    let Some(owner) = embedding_owner(node) else {
        return;
    };
    match stmt {
        Stmt::Block(block) => {
            if ctx.is_enabled(RefactoringId::RemoveBraces) && is_on_brace(ctx, block) && can_remove_braces(block) {
                let ptr = NodePtr::new(block.syntax());
                ctx.register(RefactoringId::RemoveBraces, "Remove braces", move |doc, _| {
                    let root = doc.syntax();
                    let block: Block = ptr.cast(&root)?;
                    let layout = Layout::of(&root);
                    let mut rewriter = SyntaxRewriter::new();
                    let indent = owner_indentation(block.syntax());
                    remove_braces(&mut rewriter, &layout, &block, &indent)?;
                    Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
                });
            }
        }
        _ => {
            // `else if` is a cascade, not a missing block.
            if owner.kind() == SyntaxKind::ElseClause && matches!(stmt, Stmt::IfStatement(_)) {
                return;
            }
            if !ctx.is_enabled(RefactoringId::AddBraces) || !span(node).contains_span(ctx.span()) {
                return;
            }
            if has_inner_embedded_statement_at(node, ctx) {
                return;
            }
            let ptr = NodePtr::new(node);
            ctx.register(RefactoringId::AddBraces, "Add braces", move |doc, _| {
                let root = doc.syntax();
                let stmt = ptr.to_node(&root)?;
                let layout = Layout::of(&root);
                let mut rewriter = SyntaxRewriter::new();
                let indent = owner_indentation(&stmt);
                add_braces(&mut rewriter, &layout, &stmt, &indent);
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            });
        }
    }
}

/// Cascade-wide variants, offered with the caret on the first `if`.
pub(super) fn compute_if_cascade(ctx: &RefactoringContext<'_>, if_stmt: &IfStatement) {
    if !ctx.any_enabled(&[RefactoringId::AddBracesToIfElse, RefactoringId::RemoveBracesFromIfElse]) {
        return;
    }
    let is_top = if_stmt
        .syntax()
        .parent()
        .map_or(true, |p| p.kind() != SyntaxKind::ElseClause);
    let on_keyword = if_stmt.if_token().map_or(false, |t| is_on_token(ctx.span(), &t));
    if !is_top || !on_keyword || if_stmt.else_clause().is_none() {
        return;
    }
    let Some(branches) = cascade_branches(if_stmt) else {
        return;
    };

    if ctx.is_enabled(RefactoringId::AddBracesToIfElse) && branches.iter().any(|b| !matches!(b, Stmt::Block(_))) {
        let ptr = NodePtr::new(if_stmt.syntax());
        ctx.register(RefactoringId::AddBracesToIfElse, "Add braces to if-else", move |doc, _| {
            let root = doc.syntax();
            let if_stmt: IfStatement = ptr.cast(&root)?;
            let branches = cascade_branches(&if_stmt).ok_or_else(|| RefactorError::invalid_target("incomplete if-else"))?;
            let layout = Layout::of(&root);
            let indent = trivia::node_indentation(if_stmt.syntax());
            let mut rewriter = SyntaxRewriter::new();
            for branch in branches.iter().filter(|b| !matches!(b, Stmt::Block(_))) {
                add_braces(&mut rewriter, &layout, branch.syntax(), &indent);
            }
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    let all_removable = branches
        .iter()
        .all(|b| matches!(b, Stmt::Block(block) if can_remove_braces(block)));
    if ctx.is_enabled(RefactoringId::RemoveBracesFromIfElse) && all_removable {
        let ptr = NodePtr::new(if_stmt.syntax());
        ctx.register(RefactoringId::RemoveBracesFromIfElse, "Remove braces from if-else", move |doc, _| {
            let root = doc.syntax();
            let if_stmt: IfStatement = ptr.cast(&root)?;
            let branches = cascade_branches(&if_stmt).ok_or_else(|| RefactorError::invalid_target("incomplete if-else"))?;
            let layout = Layout::of(&root);
            let indent = trivia::node_indentation(if_stmt.syntax());
            let mut rewriter = SyntaxRewriter::new();
            for branch in &branches {
                if let Stmt::Block(block) = branch {
                    remove_braces(&mut rewriter, &layout, block, &indent)?;
                }
            }
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
}

/// The statements of every branch of an `if`/`else if`/`else` cascade.
pub(super) fn cascade_branches(if_stmt: &IfStatement) -> Option<Vec<Stmt>> {
    let mut branches = Vec::new();
    let mut current = if_stmt.clone();
    loop {
        branches.push(current.statement()?);
        let Some(else_clause) = current.else_clause() else {
            return Some(branches);
        };
        match else_clause.statement()? {
            Stmt::IfStatement(nested) => current = nested,
            other => {
                branches.push(other);
                return Some(branches);
            }
        }
    }
}

fn is_on_brace(ctx: &RefactoringContext<'_>, block: &Block) -> bool {
    let span = ctx.span();
    block.l_brace_token().map_or(false, |t| is_on_token(span, &t))
        || block.r_brace_token().map_or(false, |t| is_on_token(span, &t))
        || (!span.is_empty() && span == crate::tree::span(block.syntax()))
}

/// A block holding exactly one statement that can stand on its own in the
/// block's place.
pub(super) fn can_remove_braces(block: &Block) -> bool {
    let mut statements = block.statements();
    let (Some(single), None) = (statements.next(), statements.next()) else {
        return false;
    };
    if matches!(single, Stmt::LocalDeclarationStatement(_)) || trivia::has_comments_or_directives(block.syntax()) {
        return false;
    }
    // `if (a) { if (b) x(); } else y();` must keep its braces.
    let owner_has_else = block
        .syntax()
        .parent()
        .and_then(IfStatement::cast)
        .map_or(false, |owner| owner.else_clause().is_some());
    !(owner_has_else && ends_with_open_if(&single))
}

fn ends_with_open_if(stmt: &Stmt) -> bool {
    let tail = match stmt {
        Stmt::IfStatement(if_stmt) => match if_stmt.else_clause() {
            None => return true,
            Some(else_clause) => else_clause.statement(),
        },
        Stmt::WhileStatement(s) => s.statement(),
        Stmt::ForStatement(s) => s.statement(),
        Stmt::ForEachStatement(s) => s.statement(),
        _ => None,
    };
    tail.map_or(false, |s| ends_with_open_if(&s))
}

/// True if some embedded statement strictly inside `node` also contains the
/// selection; the innermost one gets the action.
fn has_inner_embedded_statement_at(node: &SyntaxNode, ctx: &RefactoringContext<'_>) -> bool {
    node.descendants().skip(1).any(|inner| {
        Stmt::can_cast(inner.kind())
            && inner.kind() != SyntaxKind::Block
            && embedding_owner(&inner).is_some()
            && span(&inner).contains_span(ctx.span())
    })
}

/// Indentation of the line holding the statement that embeds `stmt`; for an
/// `else` branch, the line of the `else` keyword.
fn owner_indentation(stmt: &SyntaxNode) -> String {
    match embedding_owner(stmt) {
        Some(owner) => trivia::node_indentation(&owner),
        None => trivia::node_indentation(stmt),
    }
}

/// Wrap the embedded `stmt` in an Allman block whose braces sit at `indent`.
pub(super) fn add_braces(rewriter: &mut SyntaxRewriter, layout: &Layout, stmt: &SyntaxNode, indent: &str) {
    let element: SyntaxElement = NodeOrToken::Node(stmt.clone());
    let inner = layout.indented(indent);
    let body = reindent_node(stmt, &trivia::node_indentation(stmt), &inner);
    let block = layout.block(vec![body], indent);
    if let Some(previous) = prev_significant_sibling(&element) {
        layout.rebreak(rewriter, &previous, &element, indent);
    }
    if let Some(next) = next_significant_sibling(&element) {
        layout.rebreak(rewriter, &element, &next, indent);
    }
    rewriter.replace(stmt.clone(), block);
}

/// Replace an embedded `block` by its single statement.
pub(super) fn remove_braces(
    rewriter: &mut SyntaxRewriter,
    layout: &Layout,
    block: &Block,
    indent: &str,
) -> Result<(), RefactorError> {
    let single = block
        .statements()
        .next()
        .ok_or_else(|| RefactorError::invalid_target("block has no statement"))?;
    let element: SyntaxElement = NodeOrToken::Node(block.syntax().clone());
    if !trivia::is_multiline(block.syntax()) {
        rewriter.replace(block.syntax().clone(), single.syntax().green().into_owned());
        return Ok(());
    }
    let inner = layout.indented(indent);
    let body = reindent_node(single.syntax(), &trivia::node_indentation(single.syntax()), &inner);
    if let Some(previous) = prev_significant_sibling(&element) {
        layout.rebreak(rewriter, &previous, &element, &inner);
    }
    if let Some(next) = next_significant_sibling(&element) {
        layout.rebreak(rewriter, &element, &next, indent);
    }
    rewriter.replace(block.syntax().clone(), body);
    Ok(())
}

