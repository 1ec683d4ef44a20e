//! Registration routines, one module per concern.
//!
//! [`compute_for_node`] is called once for every ancestor of the anchor node
//! and forwards to the routines interested in that node's kind. Each routine
//! checks whether its refactorings are enabled, evaluates its structural
//! predicate, asks for the semantic model only if the structure fits, and
//! registers a lazy rewrite.

mod braces;
mod enums;
mod expressions;
mod if_statement;
mod locals;
mod loops;
mod members;
mod properties;
mod statements;
mod strings;
mod switch;

use lathe_core::Cancelled;
use lathe_syntax::{
    ArrowExpressionClause, AstNode, Expr, Member, Parameter, Stmt, SwitchSection, SyntaxKind, SyntaxNode,
    VariableDeclarator,
};

use crate::RefactoringContext;

pub(crate) fn compute_for_node(ctx: &RefactoringContext<'_>, node: &SyntaxNode) -> Result<(), Cancelled> {
    if let Some(stmt) = Stmt::cast(node.clone()) {
        compute_statement(ctx, &stmt)?;
    }
    if let Some(expr) = Expr::cast(node.clone()) {
        compute_expression(ctx, &expr)?;
    }
    if let Some(member) = Member::cast(node.clone()) {
        compute_member(ctx, &member)?;
    }

    match node.kind() {
        SyntaxKind::SwitchSection => {
            if let Some(section) = SwitchSection::cast(node.clone()) {
                statements::compute_selection(ctx, node)?;
                switch::compute(ctx, &section);
            }
        }
        SyntaxKind::Parameter => {
            if let Some(parameter) = Parameter::cast(node.clone()) {
                locals::compute_parameter(ctx, &parameter)?;
            }
        }
        SyntaxKind::VariableDeclarator => {
            if let Some(declarator) = VariableDeclarator::cast(node.clone()) {
                locals::compute_declarator(ctx, &declarator)?;
            }
        }
        SyntaxKind::ArrowExpressionClause => {
            if let Some(arrow) = ArrowExpressionClause::cast(node.clone()) {
                members::compute_arrow(ctx, &arrow);
            }
        }
        _ => {}
    }
    Ok(())
}

fn compute_statement(ctx: &RefactoringContext<'_>, stmt: &Stmt) -> Result<(), Cancelled> {
    braces::compute_embedded(ctx, stmt);
    match stmt {
        Stmt::Block(block) => {
            statements::compute_selection(ctx, block.syntax())?;
            members::compute_block_body(ctx, block);
        }
        Stmt::IfStatement(if_stmt) => {
            if_statement::compute(ctx, if_stmt);
            braces::compute_if_cascade(ctx, if_stmt);
        }
        Stmt::DoStatement(do_stmt) => loops::compute_do(ctx, do_stmt),
        Stmt::WhileStatement(while_stmt) => loops::compute_while(ctx, while_stmt),
        Stmt::ForStatement(for_stmt) => loops::compute_for(ctx, for_stmt),
        Stmt::ForEachStatement(foreach) => locals::compute_foreach(ctx, foreach)?,
        Stmt::LocalDeclarationStatement(declaration) => {
            statements::compute_split_declaration(ctx, declaration.syntax());
            locals::compute_local_declaration(ctx, declaration)?;
        }
        Stmt::ExpressionStatement(statement) => locals::compute_expression_statement(ctx, statement)?,
        _ => {}
    }
    Ok(())
}

fn compute_expression(ctx: &RefactoringContext<'_>, expr: &Expr) -> Result<(), Cancelled> {
    match expr {
        Expr::BinaryExpression(binary) => {
            expressions::compute_binary(ctx, binary)?;
            strings::compute_join(ctx, binary)?;
        }
        Expr::InterpolatedStringExpression(interpolated) => strings::compute_interpolated(ctx, interpolated),
        Expr::ConditionalExpression(conditional) => expressions::compute_conditional(ctx, conditional)?,
        Expr::ParenthesizedExpression(paren) => expressions::compute_parenthesized(ctx, paren),
        Expr::LiteralExpression(literal) => expressions::compute_literal(ctx, literal),
        Expr::AssignmentExpression(assignment) => expressions::compute_assignment(ctx, assignment),
        _ => {}
    }
    expressions::compute_any(ctx, expr)
}

fn compute_member(ctx: &RefactoringContext<'_>, member: &Member) -> Result<(), Cancelled> {
    members::compute_member(ctx, member);
    members::compute_accessibility(ctx, member);
    match member {
        Member::FieldDeclaration(field) => statements::compute_split_declaration(ctx, field.syntax()),
        Member::PropertyDeclaration(property) => properties::compute(ctx, property)?,
        Member::EnumDeclaration(declaration) => enums::compute(ctx, declaration),
        _ => {}
    }
    if let Some(ty) = member.as_type_declaration() {
        members::compute_sort(ctx, &ty);
    }
    Ok(())
}
