//! Expression-level rewrites.

use lathe_config::RefactoringId;
use lathe_core::Cancelled;
use lathe_syntax::{
    make, trivia, AssignmentExpression, AstNode, BinaryExpression, ConditionalExpression, Expr, GreenElement,
    GreenNode, LiteralExpression, LocalDeclarationStatement, NodeOrToken, ParenthesizedExpression,
    SyntaxElement, SyntaxKind, SyntaxNode, SyntaxRewriter, Type,
};

use crate::layout::Layout;
use crate::negation::negate;
use crate::precedence::{
    binary_precedence, parenthesize_below, precedence, required_precedence, EQUALITY,
};
use crate::selection::{is_between_spans, is_on_token};
use crate::tree::{elements_contain_comment, equivalent, green, required, span, trivia_between, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

fn mirrored(op: SyntaxKind) -> SyntaxKind {
    match op {
        SyntaxKind::Less => SyntaxKind::Greater,
        SyntaxKind::Greater => SyntaxKind::Less,
        SyntaxKind::LessEq => SyntaxKind::GreaterEq,
        SyntaxKind::GreaterEq => SyntaxKind::LessEq,
        other => other,
    }
}

fn is_swappable(op: SyntaxKind) -> bool {
    matches!(
        op,
        SyntaxKind::EqEq
            | SyntaxKind::BangEq
            | SyntaxKind::Less
            | SyntaxKind::LessEq
            | SyntaxKind::Greater
            | SyntaxKind::GreaterEq
            | SyntaxKind::AmpAmp
            | SyntaxKind::PipePipe
            | SyntaxKind::Star
            | SyntaxKind::Amp
            | SyntaxKind::Pipe
            | SyntaxKind::Caret
            | SyntaxKind::Plus
    )
}

pub(super) fn compute_binary(ctx: &RefactoringContext<'_>, binary: &BinaryExpression) -> Result<(), Cancelled> {
    if !ctx.is_enabled(RefactoringId::SwapBinaryOperands) {
        return Ok(());
    }
    let (Some(lhs), Some(rhs), Some(op)) = (binary.lhs(), binary.rhs(), binary.op_kind()) else {
        return Ok(());
    };
    if binary.is_shift_right() || !is_swappable(op) {
        return Ok(());
    }
    if !is_between_spans(ctx.span(), span(lhs.syntax()), span(rhs.syntax())) {
        return Ok(());
    }
    if op == SyntaxKind::Plus {
        let Some(model) = ctx.semantic_model()? else {
            return Ok(());
        };
        let numeric = |e: &Expr| model.type_of_expression(e.syntax()).is_numeric();
        if !numeric(&lhs) || !numeric(&rhs) {
            return Ok(());
        }
    }

    let ptr = NodePtr::new(binary.syntax());
    ctx.register(RefactoringId::SwapBinaryOperands, "Swap operands", move |doc, _| {
        let root = doc.syntax();
        let binary: BinaryExpression = ptr.cast(&root)?;
        let node = binary.syntax();
        let lhs = required(binary.lhs(), node)?;
        let rhs = required(binary.rhs(), node)?;
        let op_token = required(binary.op_token(), node)?;
        let level = binary_precedence(op_token.kind(), false);

        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(lhs.syntax().clone(), parenthesize_below(green(rhs.syntax()), level));
        rewriter.replace(rhs.syntax().clone(), parenthesize_below(green(lhs.syntax()), level + 1));
        let flipped = mirrored(op_token.kind());
        if flipped != op_token.kind() {
            rewriter.replace(op_token, make::token(flipped));
        }
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
    Ok(())
}

fn is_on_conditional_operator(ctx: &RefactoringContext<'_>, conditional: &ConditionalExpression) -> bool {
    let span = ctx.span();
    conditional.question_token().map_or(false, |t| is_on_token(span, &t))
        || conditional.colon_token().map_or(false, |t| is_on_token(span, &t))
        || (!span.is_empty() && span == crate::tree::span(conditional.syntax()))
}

pub(super) fn compute_conditional(
    ctx: &RefactoringContext<'_>,
    conditional: &ConditionalExpression,
) -> Result<(), Cancelled> {
    if !ctx.any_enabled(&[RefactoringId::InvertConditionalExpression, RefactoringId::ConvertConditionalToIf]) {
        return Ok(());
    }
    if !is_on_conditional_operator(ctx, conditional) {
        return Ok(());
    }
    let (Some(_), Some(_), Some(_)) = (conditional.condition(), conditional.when_true(), conditional.when_false()) else {
        return Ok(());
    };

    let ptr = NodePtr::new(conditional.syntax());
    ctx.register(RefactoringId::InvertConditionalExpression, "Invert conditional expression", move |doc, _| {
        let root = doc.syntax();
        let conditional: ConditionalExpression = ptr.cast(&root)?;
        let node = conditional.syntax();
        let condition = required(conditional.condition(), node)?;
        let when_true = required(conditional.when_true(), node)?;
        let when_false = required(conditional.when_false(), node)?;
        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(condition.syntax().clone(), negate(&condition));
        rewriter.replace(when_true.syntax().clone(), green(when_false.syntax()));
        rewriter.replace(when_false.syntax().clone(), green(when_true.syntax()));
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });

    if ctx.is_enabled(RefactoringId::ConvertConditionalToIf) {
        let Some(target) = IfTarget::of(conditional) else {
            return Ok(());
        };
        if let IfTarget::Local { declaration, .. } = &target {
            if declaration.is_const() {
                return Ok(());
            }
            if is_var(declaration) {
                let Some(model) = ctx.semantic_model()? else {
                    return Ok(());
                };
                let ty = model.type_of_expression(conditional.syntax());
                if !ty.is_speakable() || ty.is_error() {
                    return Ok(());
                }
            }
        }
        let ptr = NodePtr::new(conditional.syntax());
        ctx.register(RefactoringId::ConvertConditionalToIf, "Convert to 'if'", move |doc, cancel| {
            let root = doc.syntax();
            let conditional: ConditionalExpression = ptr.cast(&root)?;
            let target = IfTarget::of(&conditional)
                .ok_or_else(|| RefactorError::invalid_target("conditional is no longer a statement value"))?;
            let layout = Layout::of(&root);
            let spelled_type = match &target {
                IfTarget::Local { declaration, .. } if is_var(declaration) => {
                    let model = doc
                        .semantic_model(cancel)?
                        .ok_or_else(|| RefactorError::invalid_target("no semantic model"))?;
                    let ty = model.type_of_expression(conditional.syntax());
                    Some(
                        make::type_from_text(&ty.display())
                            .ok_or_else(|| RefactorError::invalid_target("type has no spelling"))?,
                    )
                }
                _ => None,
            };
            let mut rewriter = SyntaxRewriter::new();
            conditional_to_if(&mut rewriter, &layout, &conditional, &target, spelled_type)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
    Ok(())
}

fn is_var(declaration: &LocalDeclarationStatement) -> bool {
    matches!(
        declaration.declaration().and_then(|d| d.ty()),
        Some(Type::NamedType(named)) if named.is_var()
    )
}

/// Statement whose value is the conditional.
enum IfTarget {
    Return(SyntaxNode),
    /// `x op= c ? a : b;`
    Assign { statement: SyntaxNode, assignment: AssignmentExpression },
    /// `T x = c ? a : b;`
    Local { declaration: LocalDeclarationStatement, name: String },
}

impl IfTarget {
    fn of(conditional: &ConditionalExpression) -> Option<IfTarget> {
        let node = conditional.syntax();
        let parent = node.parent()?;
        let target = match parent.kind() {
            SyntaxKind::ReturnStatement => IfTarget::Return(parent),
            SyntaxKind::AssignmentExpression => {
                let assignment = AssignmentExpression::cast(parent.clone())?;
                if assignment.rhs()?.syntax() != node || assignment.op_kind()? != SyntaxKind::Eq {
                    return None;
                }
                let statement = parent.parent().filter(|p| p.kind() == SyntaxKind::ExpressionStatement)?;
                IfTarget::Assign { statement, assignment }
            }
            SyntaxKind::EqualsValueClause => {
                let declarator = parent.parent().filter(|p| p.kind() == SyntaxKind::VariableDeclarator)?;
                let declaration = declarator.parent()?;
                if declaration.children().filter(|c| c.kind() == SyntaxKind::VariableDeclarator).count() != 1 {
                    return None;
                }
                let local = LocalDeclarationStatement::cast(declaration.parent()?)?;
                let name = lathe_syntax::ast::support::name_token(&declarator)?.text().to_string();
                IfTarget::Local { declaration: local, name }
            }
            _ => return None,
        };
        let statement = target.statement();
        // The new statements must land in a statement list.
        crate::tree::is_in_statement_list(&statement).then_some(target)
    }

    fn statement(&self) -> SyntaxNode {
        match self {
            IfTarget::Return(statement) | IfTarget::Assign { statement, .. } => statement.clone(),
            IfTarget::Local { declaration, .. } => declaration.syntax().clone(),
        }
    }
}

fn conditional_to_if(
    rewriter: &mut SyntaxRewriter,
    layout: &Layout,
    conditional: &ConditionalExpression,
    target: &IfTarget,
    spelled_type: Option<GreenNode>,
) -> Result<(), RefactorError> {
    let node = conditional.syntax();
    let condition = required(conditional.condition(), node)?;
    let when_true = required(conditional.when_true(), node)?;
    let when_false = required(conditional.when_false(), node)?;
    let statement = target.statement();
    let indent = trivia::node_indentation(&statement);

    let branch = |value: &Expr| -> GreenNode {
        let value = green(value.syntax());
        match target {
            IfTarget::Return(_) => make::return_stmt(Some(value)),
            IfTarget::Assign { assignment, .. } => {
                let target = assignment.lhs().map(|lhs| green(lhs.syntax()));
                match target {
                    Some(lhs) => make::expr_stmt(make::assignment(lhs, SyntaxKind::Eq, value)),
                    None => make::expr_stmt(value),
                }
            }
            IfTarget::Local { name, .. } => make::expr_stmt(make::assignment(make::name_expr(name), SyntaxKind::Eq, value)),
        }
    };
    let else_clause = make::else_clause(
        layout.line_break(&indent),
        layout.block(vec![branch(&when_false)], &indent),
    );
    let if_stmt = make::if_stmt(
        green(condition.syntax()),
        layout.line_break(&indent),
        layout.block(vec![branch(&when_true)], &indent),
        Some((layout.line_break(&indent), else_clause)),
    );

    match target {
        IfTarget::Local { declaration, .. } => {
            // `T x = c ? a : b;` keeps its declaration without the initializer.
            let declarator = node
                .ancestors()
                .find(|n| n.kind() == SyntaxKind::VariableDeclarator)
                .ok_or_else(|| RefactorError::invalid_target("missing declarator"))?;
            let initializer = required(
                declarator.children().find(|c| c.kind() == SyntaxKind::EqualsValueClause),
                &declarator,
            )?;
            let name_end: SyntaxElement = required(
                lathe_syntax::ast::support::name_token(&declarator).map(NodeOrToken::Token),
                &declarator,
            )?;
            for element in trivia_between(&name_end, &NodeOrToken::Node(initializer.clone())) {
                rewriter.remove(element);
            }
            rewriter.remove(initializer);
            if let Some(ty) = spelled_type {
                let declared = required(declaration.declaration().and_then(|d| d.ty()), declaration.syntax())?;
                rewriter.replace(declared.syntax().clone(), ty);
            }
            let mut after: Vec<GreenElement> = layout.line_break(&indent);
            after.push(NodeOrToken::Node(if_stmt));
            rewriter.insert_after(declaration.syntax().clone(), after);
        }
        _ => rewriter.replace(statement, if_stmt),
    }
    Ok(())
}

pub(super) fn compute_parenthesized(ctx: &RefactoringContext<'_>, paren: &ParenthesizedExpression) {
    if !ctx.is_enabled(RefactoringId::RemoveParentheses) {
        return;
    }
    let node = paren.syntax();
    let on_paren = [SyntaxKind::LParen, SyntaxKind::RParen]
        .into_iter()
        .filter_map(|kind| lathe_syntax::ast::support::token(node, kind))
        .any(|t| is_on_token(ctx.span(), &t));
    if !on_paren && ctx.span() != span(node) {
        return;
    }
    let Some(inner) = paren.expr() else {
        return;
    };
    if precedence(&inner) < required_precedence(node) {
        return;
    }
    let ptr = NodePtr::new(node);
    ctx.register(RefactoringId::RemoveParentheses, "Remove parentheses", move |doc, _| {
        let root = doc.syntax();
        let paren: ParenthesizedExpression = ptr.cast(&root)?;
        let node = paren.syntax();
        let inner = required(paren.expr(), node)?;
        let l_paren = required(lathe_syntax::ast::support::token(node, SyntaxKind::LParen), node)?;
        let r_paren = required(lathe_syntax::ast::support::token(node, SyntaxKind::RParen), node)?;
        let inside = trivia_between(&NodeOrToken::Token(l_paren), &NodeOrToken::Token(r_paren));
        let mut rewriter = SyntaxRewriter::new();
        if elements_contain_comment(&inside) {
            rewriter.replace_with_many(node.clone(), inside.iter().map(lathe_syntax::rewrite::green_of).collect());
        } else {
            rewriter.replace(node.clone(), green(inner.syntax()));
        }
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

/// Routines that apply to any expression.
pub(super) fn compute_any(ctx: &RefactoringContext<'_>, expr: &Expr) -> Result<(), Cancelled> {
    let node = expr.syntax();
    if ctx.is_enabled(RefactoringId::AddParentheses) && can_add_parentheses(ctx, expr) {
        let ptr = NodePtr::new(node);
        ctx.register(RefactoringId::AddParentheses, "Parenthesize expression", move |doc, _| {
            let root = doc.syntax();
            let node = ptr.to_node(&root)?;
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace(node.clone(), make::parenthesized(green(&node)));
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::AddBooleanComparison)
        && is_condition(node)
        && span(node).contains_span(ctx.span())
    {
        let Some(model) = ctx.semantic_model()? else {
            return Ok(());
        };
        if !model.type_of_expression(node).is_nullable_boolean() {
            return Ok(());
        }
        let ptr = NodePtr::new(node);
        ctx.register(RefactoringId::AddBooleanComparison, "Add '== true'", move |doc, _| {
            let root = doc.syntax();
            let node = ptr.to_node(&root)?;
            let comparison = make::binary(
                parenthesize_below(green(&node), EQUALITY),
                SyntaxKind::EqEq,
                make::bool_literal(true),
            );
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace(node.clone(), comparison);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
    Ok(())
}

fn can_add_parentheses(ctx: &RefactoringContext<'_>, expr: &Expr) -> bool {
    let node = expr.syntax();
    if ctx.span().is_empty() || ctx.span() != span(node) || matches!(expr, Expr::ParenthesizedExpression(_)) {
        return false;
    }
    // `(F)(x)` would read as a cast.
    let is_invoked = node.parent().map_or(false, |p| {
        p.kind() == SyntaxKind::InvocationExpression && p.children().next().as_ref() == Some(node)
    });
    !is_invoked
}

/// The condition of an `if`, loop or conditional expression.
fn is_condition(node: &SyntaxNode) -> bool {
    let Some(parent) = node.parent() else {
        return false;
    };
    match parent.kind() {
        SyntaxKind::IfStatement | SyntaxKind::WhileStatement | SyntaxKind::DoStatement => Expr::can_cast(node.kind()),
        SyntaxKind::ConditionalExpression => parent.children().next().as_ref() == Some(node),
        SyntaxKind::ForStatement => lathe_syntax::ForStatement::cast(parent)
            .and_then(|f| f.condition())
            .map_or(false, |c| c.syntax() == node),
        _ => false,
    }
}

pub(super) fn compute_literal(ctx: &RefactoringContext<'_>, literal: &LiteralExpression) {
    if !ctx.is_enabled(RefactoringId::InvertBooleanLiteral) {
        return;
    }
    let value = match literal.kind() {
        Some(SyntaxKind::TrueKw) => false,
        Some(SyntaxKind::FalseKw) => true,
        _ => return,
    };
    if !span(literal.syntax()).contains_span(ctx.span()) {
        return;
    }
    let ptr = NodePtr::new(literal.syntax());
    let title = if value { "Replace with 'true'" } else { "Replace with 'false'" };
    ctx.register(RefactoringId::InvertBooleanLiteral, title, move |doc, _| {
        let root = doc.syntax();
        let node = ptr.to_node(&root)?;
        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(node, make::bool_literal(value));
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

pub(super) fn compute_assignment(ctx: &RefactoringContext<'_>, assignment: &AssignmentExpression) {
    let (Some(lhs), Some(rhs), Some(op)) = (assignment.lhs(), assignment.rhs(), assignment.op_kind()) else {
        return;
    };
    if !is_between_spans(ctx.span(), span(lhs.syntax()), span(rhs.syntax())) {
        return;
    }

    if let Some(binary_op) = op.compound_assignment_to_binary() {
        if ctx.is_enabled(RefactoringId::ExpandCompoundAssignment) {
            let ptr = NodePtr::new(assignment.syntax());
            ctx.register(RefactoringId::ExpandCompoundAssignment, "Expand compound assignment", move |doc, _| {
                let root = doc.syntax();
                let assignment: AssignmentExpression = ptr.cast(&root)?;
                let node = assignment.syntax();
                let lhs = required(assignment.lhs(), node)?;
                let rhs = required(assignment.rhs(), node)?;
                let op_token = required(assignment.op_token(), node)?;
                let level = binary_precedence(binary_op, false);
                // `??` groups to the right.
                let rhs_level = if binary_op == SyntaxKind::QuestionQuestion { level } else { level + 1 };
                let expanded = make::binary(
                    green(lhs.syntax()),
                    binary_op,
                    parenthesize_below(green(rhs.syntax()), rhs_level),
                );
                let mut rewriter = SyntaxRewriter::new();
                rewriter.replace(op_token, make::token(SyntaxKind::Eq));
                rewriter.replace(rhs.syntax().clone(), expanded);
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            });
        }
        return;
    }

    if op == SyntaxKind::Eq && ctx.is_enabled(RefactoringId::UseCompoundAssignment) && compound_form(assignment).is_some() {
        let ptr = NodePtr::new(assignment.syntax());
        ctx.register(RefactoringId::UseCompoundAssignment, "Use compound assignment", move |doc, _| {
            let root = doc.syntax();
            let assignment: AssignmentExpression = ptr.cast(&root)?;
            let node = assignment.syntax();
            let (compound, operand) =
                compound_form(&assignment).ok_or_else(|| RefactorError::invalid_target("not a compound form"))?;
            let op_token = required(assignment.op_token(), node)?;
            let rhs = required(assignment.rhs(), node)?;
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace(op_token, make::token(compound));
            rewriter.replace(rhs.syntax().clone(), green(operand.syntax()));
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
}

/// `a = a op b` as `(op=, b)`.
fn compound_form(assignment: &AssignmentExpression) -> Option<(SyntaxKind, Expr)> {
    let target = assignment.lhs()?;
    if !matches!(target, Expr::NameExpression(_) | Expr::MemberAccessExpression(_)) {
        return None;
    }
    let Expr::BinaryExpression(binary) = assignment.rhs()? else {
        return None;
    };
    if binary.is_shift_right() {
        return None;
    }
    let compound = binary.op_kind()?.binary_to_compound_assignment()?;
    let left = binary.lhs()?;
    if !equivalent(left.syntax(), target.syntax()) || trivia::has_comments_or_directives(binary.syntax()) {
        return None;
    }
    Some((compound, binary.rhs()?))
}
