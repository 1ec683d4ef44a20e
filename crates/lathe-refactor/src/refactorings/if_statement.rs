//! Refactorings anchored on the `if` keyword.

use lathe_config::RefactoringId;
use lathe_syntax::{
    make, trivia, AstNode, Block, Expr, GreenElement, GreenNode, IfStatement, NodeOrToken, Stmt, SyntaxElement,
    SyntaxKind, SyntaxNode, SyntaxRewriter,
};

use crate::layout::{reindent_node, set_separator, Layout};
use crate::negation::negate;
use crate::precedence::{parenthesize_below, COALESCE, CONDITIONAL, LOGICAL_AND};
use crate::selection::is_on_token;
use crate::tree::{
    elements_contain_comment, elements_contain_newline, equivalent, green, is_in_statement_list, is_trivia,
    next_significant_sibling, required, trivia_between, NodePtr,
};
use crate::{RefactorError, RefactoringContext, SourceChange};

pub(super) fn compute(ctx: &RefactoringContext<'_>, if_stmt: &IfStatement) {
    let on_keyword = if_stmt.if_token().map_or(false, |t| is_on_token(ctx.span(), &t));
    if !on_keyword || if_stmt.condition().is_none() || if_stmt.statement().is_none() {
        return;
    }

    if ctx.is_enabled(RefactoringId::MergeIfWithParentIf) && parent_if(if_stmt).is_some() {
        let ptr = NodePtr::new(if_stmt.syntax());
        ctx.register(RefactoringId::MergeIfWithParentIf, "Merge 'if' with parent 'if'", move |doc, _| {
            let root = doc.syntax();
            let nested: IfStatement = ptr.cast(&root)?;
            let parent = parent_if(&nested).ok_or_else(|| RefactorError::invalid_target("no parent 'if' to merge with"))?;
            let layout = Layout::of(&root);
            let mut rewriter = SyntaxRewriter::new();
            merge_with_parent(&mut rewriter, &layout, &parent, &nested)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::SplitIfWithOrCondition) && can_split_or(if_stmt) {
        let ptr = NodePtr::new(if_stmt.syntax());
        ctx.register(RefactoringId::SplitIfWithOrCondition, "Split 'if'", move |doc, _| {
            let root = doc.syntax();
            let if_stmt: IfStatement = ptr.cast(&root)?;
            let layout = Layout::of(&root);
            let node = if_stmt.syntax();
            let condition = required(if_stmt.condition(), node)?;
            let indent = trivia::node_indentation(node);
            let mut replacement: Vec<GreenElement> = Vec::new();
            for (i, disjunct) in flatten(&condition, SyntaxKind::PipePipe).iter().enumerate() {
                if i > 0 {
                    replacement.extend(layout.line_break(&indent));
                }
                let mut sub = SyntaxRewriter::new();
                sub.replace(condition.syntax().clone(), green(stripped(disjunct).syntax()));
                replacement.push(NodeOrToken::Node(sub.rewrite(node)));
            }
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace_with_many(node.clone(), replacement);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::SplitIfWithAndCondition) && can_split_and(if_stmt) {
        let ptr = NodePtr::new(if_stmt.syntax());
        ctx.register(RefactoringId::SplitIfWithAndCondition, "Split 'if'", move |doc, _| {
            let root = doc.syntax();
            let if_stmt: IfStatement = ptr.cast(&root)?;
            let layout = Layout::of(&root);
            let mut rewriter = SyntaxRewriter::new();
            split_and(&mut rewriter, &layout, &if_stmt)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::InvertIf) && can_invert(if_stmt) {
        let ptr = NodePtr::new(if_stmt.syntax());
        ctx.register(RefactoringId::InvertIf, "Invert 'if'", move |doc, _| {
            let root = doc.syntax();
            let if_stmt: IfStatement = ptr.cast(&root)?;
            let node = if_stmt.syntax();
            let condition = required(if_stmt.condition(), node)?;
            let when_true = required(if_stmt.statement(), node)?;
            let else_clause = required(if_stmt.else_clause(), node)?;
            let when_false = required(else_clause.statement(), else_clause.syntax())?;

            let true_indent = trivia::node_indentation(when_true.syntax());
            let false_indent = trivia::node_indentation(when_false.syntax());
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace(condition.syntax().clone(), negate(&condition));
            rewriter.replace(
                when_true.syntax().clone(),
                reindent_node(when_false.syntax(), &false_indent, &true_indent),
            );
            rewriter.replace(
                when_false.syntax().clone(),
                reindent_node(when_true.syntax(), &true_indent, &false_indent),
            );
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::ConvertIfToConditional) {
        if let Some(shape) = ConditionalShape::match_if(if_stmt) {
            let title = match shape {
                ConditionalShape::Assign { .. } => "Use conditional assignment",
                _ => "Use conditional return",
            };
            let ptr = NodePtr::new(if_stmt.syntax());
            ctx.register(RefactoringId::ConvertIfToConditional, title, move |doc, _| {
                let root = doc.syntax();
                let if_stmt: IfStatement = ptr.cast(&root)?;
                let shape = ConditionalShape::match_if(&if_stmt)
                    .ok_or_else(|| RefactorError::invalid_target("'if' no longer converts to a conditional"))?;
                let mut rewriter = SyntaxRewriter::new();
                shape.apply(&mut rewriter, &if_stmt)?;
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            });
        }
    }
}

/// The enclosing `if` that `nested` can merge into: neither has an `else`,
/// and `nested` is the parent's whole body.
fn parent_if(nested: &IfStatement) -> Option<IfStatement> {
    if nested.else_clause().is_some() {
        return None;
    }
    let parent_node = nested.syntax().parent()?;
    let parent = match parent_node.kind() {
        SyntaxKind::IfStatement => IfStatement::cast(parent_node)?,
        SyntaxKind::Block => {
            let block = Block::cast(parent_node.clone())?;
            if block.statements().count() != 1 || block_trivia_has_comment(&block) {
                return None;
            }
            IfStatement::cast(parent_node.parent()?)?
        }
        _ => return None,
    };
    if parent.else_clause().is_some() || parent.condition().is_none() {
        return None;
    }
    // The nested `if` must be the body, not the condition.
    let body = parent.statement()?;
    (body.syntax() == nested.syntax() || body.syntax() == &nested.syntax().parent()?).then_some(parent)
}

fn block_trivia_has_comment(block: &Block) -> bool {
    let direct: Vec<SyntaxElement> = block.syntax().children_with_tokens().filter(is_trivia).collect();
    elements_contain_comment(&direct)
}

fn merge_with_parent(
    rewriter: &mut SyntaxRewriter,
    layout: &Layout,
    parent: &IfStatement,
    nested: &IfStatement,
) -> Result<(), RefactorError> {
    let parent_node = parent.syntax();
    let nested_node = nested.syntax();
    let outer_condition = required(parent.condition(), parent_node)?;
    let inner_condition = required(nested.condition(), nested_node)?;
    let parent_body = required(parent.statement(), parent_node)?;
    let nested_body = required(nested.statement(), nested_node)?;

    let merged = make::binary(
        parenthesize_below(green(outer_condition.syntax()), LOGICAL_AND),
        SyntaxKind::AmpAmp,
        parenthesize_below(green(inner_condition.syntax()), LOGICAL_AND),
    );
    rewriter.replace(outer_condition.syntax().clone(), merged);

    let parent_indent = trivia::node_indentation(parent_node);
    let nested_indent = trivia::node_indentation(nested_node);
    let body = reindent_node(nested_body.syntax(), &nested_indent, &parent_indent);

    // A block body keeps the parent's brace placement; an embedded one keeps
    // the nested statement's line structure.
    if !matches!(nested_body, Stmt::Block(_)) {
        let r_paren: SyntaxElement = NodeOrToken::Token(required(parent.r_paren_token(), parent_node)?);
        let body_element: SyntaxElement = NodeOrToken::Node(parent_body.syntax().clone());
        let nested_paren: SyntaxElement = NodeOrToken::Token(required(nested.r_paren_token(), nested_node)?);
        let nested_sep = trivia_between(&nested_paren, &NodeOrToken::Node(nested_body.syntax().clone()));
        let new_sep = if elements_contain_newline(&nested_sep) {
            layout.line_break(&layout.indented(&parent_indent))
        } else {
            vec![make::space()]
        };
        set_separator(rewriter, &r_paren, &body_element, new_sep);
    }
    rewriter.replace(parent_body.syntax().clone(), body);
    Ok(())
}

/// Operands of a chain of `op`, left to right.
fn flatten(expr: &Expr, op: SyntaxKind) -> Vec<Expr> {
    match expr {
        Expr::BinaryExpression(binary) if binary.op_kind() == Some(op) => {
            let (Some(lhs), Some(rhs)) = (binary.lhs(), binary.rhs()) else {
                return vec![expr.clone()];
            };
            let mut operands = flatten(&lhs, op);
            operands.extend(flatten(&rhs, op));
            operands
        }
        _ => vec![expr.clone()],
    }
}

fn stripped(expr: &Expr) -> Expr {
    expr.without_parentheses().unwrap_or_else(|| expr.clone())
}

fn has_operator(if_stmt: &IfStatement, op: SyntaxKind) -> bool {
    matches!(if_stmt.condition(), Some(Expr::BinaryExpression(b)) if b.op_kind() == Some(op))
}

fn can_split_or(if_stmt: &IfStatement) -> bool {
    if if_stmt.else_clause().is_some() || !has_operator(if_stmt, SyntaxKind::PipePipe) {
        return false;
    }
    if !is_in_statement_list(if_stmt.syntax()) {
        return false;
    }
    match if_stmt.statement() {
        Some(Stmt::Block(block)) => {
            let mut statements = block.statements();
            matches!((statements.next(), statements.next()), (Some(single), None) if single.is_jump())
        }
        Some(stmt) => stmt.is_jump(),
        None => false,
    }
}

fn can_split_and(if_stmt: &IfStatement) -> bool {
    if_stmt.else_clause().is_none() && has_operator(if_stmt, SyntaxKind::AmpAmp)
}

fn split_and(rewriter: &mut SyntaxRewriter, layout: &Layout, if_stmt: &IfStatement) -> Result<(), RefactorError> {
    let node = if_stmt.syntax();
    let condition = required(if_stmt.condition(), node)?;
    let conjuncts = flatten(&condition, SyntaxKind::AmpAmp);
    let indent = trivia::node_indentation(node);
    let depth = conjuncts.len().saturating_sub(1);
    let indent_at = |level: usize| format!("{indent}{}", layout.unit.repeat(level));

    let Some((innermost, outer)) = conjuncts.split_last() else {
        return Err(RefactorError::invalid_target("condition has no operands"));
    };
    // The innermost `if` keeps the original body and layout.
    let mut sub = SyntaxRewriter::new();
    sub.replace(condition.syntax().clone(), green(stripped(innermost).syntax()));
    let mut current = trivia::reindent(&sub.rewrite(node), &indent, &indent_at(depth));

    for (level, conjunct) in outer.iter().enumerate().rev() {
        let at = indent_at(level);
        current = make::if_stmt(
            green(stripped(conjunct).syntax()),
            layout.line_break(&at),
            layout.block(vec![current], &at),
            None,
        );
    }
    rewriter.replace(node.clone(), current);
    Ok(())
}

fn can_invert(if_stmt: &IfStatement) -> bool {
    if_stmt
        .else_clause()
        .and_then(|clause| clause.statement())
        .map_or(false, |stmt| !matches!(stmt, Stmt::IfStatement(_)))
}

/// The single statement of an embedded statement or a one-statement block.
fn single_statement(stmt: &Stmt) -> Option<Stmt> {
    match stmt {
        Stmt::Block(block) => {
            let mut statements = block.statements();
            match (statements.next(), statements.next()) {
                (Some(single), None) => Some(single),
                _ => None,
            }
        }
        other => Some(other.clone()),
    }
}

fn returned_value(stmt: &Stmt) -> Option<Expr> {
    match single_statement(stmt)? {
        Stmt::ReturnStatement(ret) => ret.expr(),
        _ => None,
    }
}

/// `(target, value)` of a single `target = value;`.
fn simple_assignment(stmt: &Stmt) -> Option<(Expr, Expr)> {
    let Stmt::ExpressionStatement(expr_stmt) = single_statement(stmt)? else {
        return None;
    };
    let Some(Expr::AssignmentExpression(assignment)) = expr_stmt.expr() else {
        return None;
    };
    if assignment.op_kind()? != SyntaxKind::Eq {
        return None;
    }
    Some((assignment.lhs()?, assignment.rhs()?))
}

enum ConditionalShape {
    /// `if (c) return a; else return b;`
    Return { when_true: Expr, when_false: Expr },
    /// `if (c) return a; return b;`, the second `return` following the `if`.
    ReturnFallthrough { when_true: Expr, when_false: Expr, next: SyntaxNode },
    /// `if (c) x = a; else x = b;`
    Assign { target: Expr, when_true: Expr, when_false: Expr },
}

impl ConditionalShape {
    fn match_if(if_stmt: &IfStatement) -> Option<ConditionalShape> {
        let node = if_stmt.syntax();
        if trivia::has_comments_or_directives(node) {
            return None;
        }
        let body = if_stmt.statement()?;
        let Some(else_clause) = if_stmt.else_clause() else {
            let when_true = returned_value(&body)?;
            if !is_in_statement_list(node) {
                return None;
            }
            let next = next_significant_sibling(&NodeOrToken::Node(node.clone()))?.into_node()?;
            let Some(Stmt::ReturnStatement(ret)) = Stmt::cast(next.clone()) else {
                return None;
            };
            let between = trivia_between(&NodeOrToken::Node(node.clone()), &NodeOrToken::Node(next.clone()));
            if elements_contain_comment(&between) || trivia::has_comments_or_directives(&next) {
                return None;
            }
            return Some(ConditionalShape::ReturnFallthrough {
                when_true,
                when_false: ret.expr()?,
                next,
            });
        };
        let otherwise = else_clause.statement()?;
        if matches!(otherwise, Stmt::IfStatement(_)) {
            return None;
        }
        if let (Some(when_true), Some(when_false)) = (returned_value(&body), returned_value(&otherwise)) {
            return Some(ConditionalShape::Return { when_true, when_false });
        }
        let (target, when_true) = simple_assignment(&body)?;
        let (other_target, when_false) = simple_assignment(&otherwise)?;
        equivalent(target.syntax(), other_target.syntax()).then_some(ConditionalShape::Assign {
            target,
            when_true,
            when_false,
        })
    }

    fn apply(&self, rewriter: &mut SyntaxRewriter, if_stmt: &IfStatement) -> Result<(), RefactorError> {
        let node = if_stmt.syntax();
        let condition = required(if_stmt.condition(), node)?;
        let conditional = |when_true: &Expr, when_false: &Expr| -> GreenNode {
            make::conditional(
                parenthesize_below(green(condition.syntax()), COALESCE),
                parenthesize_below(green(when_true.syntax()), CONDITIONAL),
                parenthesize_below(green(when_false.syntax()), CONDITIONAL),
            )
        };
        let replacement = match self {
            ConditionalShape::Return { when_true, when_false } => make::return_stmt(Some(conditional(when_true, when_false))),
            ConditionalShape::ReturnFallthrough { when_true, when_false, next } => {
                let start = node
                    .next_sibling_or_token()
                    .ok_or_else(|| RefactorError::invalid_target("missing trailing 'return'"))?;
                rewriter.remove_range(start, next.clone());
                make::return_stmt(Some(conditional(when_true, when_false)))
            }
            ConditionalShape::Assign { target, when_true, when_false } => make::expr_stmt(make::assignment(
                green(target.syntax()),
                SyntaxKind::Eq,
                conditional(when_true, when_false),
            )),
        };
        rewriter.replace(node.clone(), replacement);
        Ok(())
    }
}
