//! Locals and parameters: introducing, retyping, renaming and guarding them.

use lathe_config::RefactoringId;
use lathe_core::{CancellationToken, Cancelled, TextSpan};
use lathe_semantic::{SemanticModel, Symbol, SymbolKind, TypeInfo};
use lathe_syntax::{
    make, trivia, AstNode, Block, ExpressionStatement, Expr, ForEachStatement, GreenElement, HasBody, HasName,
    LocalDeclarationStatement, NodeOrToken, Parameter, Stmt, SyntaxKind, SyntaxNode, SyntaxRewriter, SyntaxToken,
    Type, VariableDeclarator,
};

use crate::layout::Layout;
use crate::naming::{derive_name, unique_name};
use crate::selection::is_on_token;
use crate::tree::{enclosing_member, required, span, token_span, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

pub(super) fn compute_expression_statement(
    ctx: &RefactoringContext<'_>,
    statement: &ExpressionStatement,
) -> Result<(), Cancelled> {
    if !ctx.is_enabled(RefactoringId::IntroduceLocalVariable) || !span(statement.syntax()).contains_span(ctx.span()) {
        return Ok(());
    }
    let Some(expr) = statement.expr() else {
        return Ok(());
    };
    // Assignments and increments are already used for their side effect.
    if matches!(
        expr,
        Expr::AssignmentExpression(_) | Expr::PostfixUnaryExpression(_) | Expr::ThrowExpression(_)
    ) {
        return Ok(());
    }
    if !crate::tree::is_in_statement_list(statement.syntax()) {
        return Ok(());
    }
    let Some(model) = ctx.semantic_model()? else {
        return Ok(());
    };
    let ty = model.type_of_expression(expr.syntax());
    if ty.is_error() || matches!(ty, TypeInfo::Void | TypeInfo::Null) {
        return Ok(());
    }
    let candidate = derive_name(&ty, true).unwrap_or_else(|| "value".to_string());
    let scope = enclosing_member(statement.syntax()).unwrap_or_else(|| ctx.root().clone());
    let name = unique_name(&candidate, Some(model), &scope, span(statement.syntax()).start);

    let ptr = NodePtr::new(statement.syntax());
    ctx.register(RefactoringId::IntroduceLocalVariable, "Introduce local", move |doc, _| {
        let root = doc.syntax();
        let statement: ExpressionStatement = ptr.cast(&root)?;
        let expr = required(statement.expr(), statement.syntax())?;
        let declaration = make::local_decl(make::var_type(), &name, Some(expr.syntax().green().into_owned()));
        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(statement.syntax().clone(), declaration);
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
    Ok(())
}

/// The declared type and single initialized declarator of a local declaration.
fn single_initialized(declaration: &LocalDeclarationStatement) -> Option<(Type, VariableDeclarator, Expr)> {
    let variables = declaration.declaration()?;
    let mut declarators = variables.declarators();
    let declarator = declarators.next()?;
    if declarators.next().is_some() {
        return None;
    }
    let value = declarator.value()?;
    Some((variables.ty()?, declarator, value))
}

pub(super) fn compute_local_declaration(
    ctx: &RefactoringContext<'_>,
    declaration: &LocalDeclarationStatement,
) -> Result<(), Cancelled> {
    if !ctx.any_enabled(&[RefactoringId::UseExplicitType, RefactoringId::UseImplicitType]) || declaration.is_const() {
        return Ok(());
    }
    let Some((ty, _, value)) = single_initialized(declaration) else {
        return Ok(());
    };
    if !span(ty.syntax()).contains_span(ctx.span()) {
        return Ok(());
    }
    let is_var = matches!(&ty, Type::NamedType(named) if named.is_var());
    let id = if is_var { RefactoringId::UseExplicitType } else { RefactoringId::UseImplicitType };
    if !ctx.is_enabled(id) {
        return Ok(());
    }
    let Some(model) = ctx.semantic_model()? else {
        return Ok(());
    };
    let value_type = model.type_of_expression(value.syntax());
    if value_type.is_error() || !value_type.is_speakable() {
        return Ok(());
    }

    let ptr = NodePtr::new(ty.syntax());
    if is_var {
        let spelled = value_type.display();
        if make::type_from_text(&spelled).is_none() {
            return Ok(());
        }
        ctx.register(id, format!("Use explicit type '{spelled}'"), move |doc, _| {
            let root = doc.syntax();
            let ty = ptr.to_node(&root)?;
            let new_type = make::type_from_text(&spelled)
                .ok_or_else(|| RefactorError::invalid_target(format!("`{spelled}` is not a type")))?;
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace(ty, new_type);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    } else {
        if model.type_from_syntax(ty.syntax()) != value_type {
            return Ok(());
        }
        ctx.register(id, "Use 'var'", move |doc, _| {
            let root = doc.syntax();
            let ty = ptr.to_node(&root)?;
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace(ty, make::var_type());
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
    Ok(())
}

pub(super) fn compute_parameter(ctx: &RefactoringContext<'_>, parameter: &Parameter) -> Result<(), Cancelled> {
    compute_rename(ctx, parameter.syntax(), parameter.name_token())?;
    if !ctx.is_enabled(RefactoringId::AddParameterNullCheck) || !span(parameter.syntax()).contains_span(ctx.span()) {
        return Ok(());
    }
    let (Some(name), Some(ty)) = (parameter.name(), parameter.ty()) else {
        return Ok(());
    };
    if parameter.has_modifier(SyntaxKind::OutKw) || matches!(ty, Type::NullableType(_)) {
        return Ok(());
    }
    let Some(body) = owner_body(parameter.syntax()) else {
        return Ok(());
    };
    if body.statements().any(|s| null_checked_name(&s).as_deref() == Some(name.as_str())) {
        return Ok(());
    }
    let Some(model) = ctx.semantic_model()? else {
        return Ok(());
    };
    if !model.type_from_syntax(ty.syntax()).is_reference_type() {
        return Ok(());
    }

    let ptr = NodePtr::new(parameter.syntax());
    ctx.register(RefactoringId::AddParameterNullCheck, "Add null check", move |doc, _| {
        let root = doc.syntax();
        let parameter: Parameter = ptr.cast(&root)?;
        let body = owner_body(parameter.syntax())
            .ok_or_else(|| RefactorError::invalid_target("parameter owner has no block body"))?;
        let layout = Layout::of(&root);
        let mut rewriter = SyntaxRewriter::new();
        add_null_check(&mut rewriter, &layout, &body, &name)?;
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
    Ok(())
}

/// Block body of the method or constructor declaring a parameter.
fn owner_body(parameter: &SyntaxNode) -> Option<Block> {
    let owner = parameter.parent()?.parent()?;
    match owner.kind() {
        SyntaxKind::MethodDeclaration => lathe_syntax::MethodDeclaration::cast(owner)?.body(),
        SyntaxKind::ConstructorDeclaration => lathe_syntax::ConstructorDeclaration::cast(owner)?.body(),
        _ => None,
    }
}

/// `p` for `if (p == null) …`, `if (null == p) …` and `if (p is null) …`.
fn null_checked_name(stmt: &Stmt) -> Option<String> {
    let Stmt::IfStatement(if_stmt) = stmt else {
        return None;
    };
    if if_stmt.else_clause().is_some() {
        return None;
    }
    let Expr::BinaryExpression(binary) = if_stmt.condition()? else {
        return None;
    };
    let (lhs, rhs) = (binary.lhs()?, binary.rhs()?);
    match binary.op_kind()? {
        SyntaxKind::EqEq => match (&lhs, &rhs) {
            (Expr::NameExpression(name), other) | (other, Expr::NameExpression(name))
                if other.is_literal_of(SyntaxKind::NullKw) =>
            {
                name.name()
            }
            _ => None,
        },
        // `is not null` carries an identifier between the operands.
        SyntaxKind::IsKw if lathe_syntax::ast::support::token(binary.syntax(), SyntaxKind::Identifier).is_none() => {
            match &lhs {
                Expr::NameExpression(name) if rhs.is_literal_of(SyntaxKind::NullKw) => name.name(),
                _ => None,
            }
        }
        _ => None,
    }
}

fn add_null_check(rewriter: &mut SyntaxRewriter, layout: &Layout, body: &Block, name: &str) -> Result<(), RefactorError> {
    let statements: Vec<Stmt> = body.statements().collect();
    let member_indent = body
        .syntax()
        .parent()
        .map(|member| trivia::node_indentation(&member))
        .unwrap_or_default();
    let indent = match statements.first() {
        Some(first) => trivia::node_indentation(first.syntax()),
        None => layout.indented(&member_indent),
    };
    let check_text = format!(
        "if ({name} == null){eol}{inner}throw new ArgumentNullException(nameof({name}));",
        eol = layout.eol,
        inner = layout.indented(&indent),
    );
    let check = make::stmt_from_text(&check_text)
        .ok_or_else(|| RefactorError::invalid_target(format!("`{name}` is not a valid identifier")))?;

    let last_check = statements.iter().take_while(|s| null_checked_name(s).is_some()).last();
    match (last_check, statements.first()) {
        (Some(last), _) => {
            let mut new = layout.line_break(&indent);
            new.push(NodeOrToken::Node(check));
            rewriter.insert_after(last.syntax().clone(), new);
        }
        (None, Some(first)) => {
            let mut new: Vec<GreenElement> = vec![NodeOrToken::Node(check)];
            // A blank line separates the guard from the code it protects.
            new.extend(layout.line_break(""));
            new.extend(layout.line_break(&indent));
            rewriter.insert_before(first.syntax().clone(), new);
        }
        (None, None) => {
            rewriter.replace(body.syntax().clone(), layout.block(vec![check], &member_indent));
        }
    }
    Ok(())
}

pub(super) fn compute_declarator(ctx: &RefactoringContext<'_>, declarator: &VariableDeclarator) -> Result<(), Cancelled> {
    // Fields are members, not locals.
    let is_local = declarator
        .syntax()
        .ancestors()
        .nth(2)
        .map_or(false, |owner| owner.kind() == SyntaxKind::LocalDeclarationStatement);
    if is_local {
        compute_rename(ctx, declarator.syntax(), declarator.name_token())?;
    }
    Ok(())
}

pub(super) fn compute_foreach(ctx: &RefactoringContext<'_>, foreach: &ForEachStatement) -> Result<(), Cancelled> {
    compute_rename(ctx, foreach.syntax(), foreach.name_token())
}

fn compute_rename(
    ctx: &RefactoringContext<'_>,
    declaration: &SyntaxNode,
    name_token: Option<SyntaxToken>,
) -> Result<(), Cancelled> {
    if !ctx.is_enabled(RefactoringId::RenameAccordingToTypeName) {
        return Ok(());
    }
    let Some(name_token) = name_token else {
        return Ok(());
    };
    if !is_on_token(ctx.span(), &name_token) {
        return Ok(());
    }
    let Some(model) = ctx.semantic_model()? else {
        return Ok(());
    };
    let Some(symbol) = model.declared_symbol(declaration) else {
        return Ok(());
    };
    if !symbol.kind.is_local_or_parameter() {
        return Ok(());
    }
    let Some(candidate) = derive_name(&symbol.ty, true) else {
        return Ok(());
    };
    let old = name_token.text().to_string();
    if candidate == old {
        return Ok(());
    }
    let scope = enclosing_member(declaration).unwrap_or_else(|| ctx.root().clone());
    let new = unique_name(&candidate, Some(model), &scope, token_span(&name_token).start);
    if new == old {
        return Ok(());
    }

    let ptr = NodePtr::new(declaration);
    ctx.register(
        RefactoringId::RenameAccordingToTypeName,
        format!("Rename '{old}' to '{new}'"),
        move |doc, cancel| {
            let root = doc.syntax();
            let declaration = ptr.to_node(&root)?;
            let model = doc
                .semantic_model(cancel)?
                .ok_or_else(|| RefactorError::invalid_target("renaming needs a semantic model"))?;
            let symbol = model
                .declared_symbol(&declaration)
                .filter(|s| matches!(s.kind, SymbolKind::Local | SymbolKind::Parameter))
                .ok_or_else(|| RefactorError::invalid_target(format!("`{old}` no longer declares a local")))?;
            let mut rewriter = SyntaxRewriter::new();
            rename_references(&mut rewriter, &root, model.as_ref(), &symbol, &new, cancel)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        },
    );
    Ok(())
}

/// Replace every identifier bound to `symbol` with `new_name`.
pub(super) fn rename_references(
    rewriter: &mut SyntaxRewriter,
    root: &SyntaxNode,
    model: &dyn SemanticModel,
    symbol: &Symbol,
    new_name: &str,
    cancel: &CancellationToken,
) -> Result<(), RefactorError> {
    for reference in model.find_references(symbol, cancel)? {
        let token = identifier_at(root, reference)
            .ok_or_else(|| RefactorError::invalid_target(format!("no identifier at {reference:?}")))?;
        rewriter.replace(token, make::ident(new_name));
    }
    Ok(())
}

pub(super) fn identifier_at(root: &SyntaxNode, span: TextSpan) -> Option<SyntaxToken> {
    match root.covering_element(span.into()) {
        NodeOrToken::Token(token) if token.kind() == SyntaxKind::Identifier => Some(token),
        _ => None,
    }
}
