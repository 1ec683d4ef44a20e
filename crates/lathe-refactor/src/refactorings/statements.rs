//! Refactorings over a selection of statements, and declaration splitting.

use lathe_config::RefactoringId;
use lathe_core::Cancelled;
use lathe_semantic::SymbolKind;
use lathe_syntax::{
    make, rewrite::green_of, rewrite::green_range, trivia, AstNode, Block, Expr, GreenElement, GreenNode, HasName,
    IfStatement, LocalDeclarationStatement, NodeOrToken, Stmt, SwitchSection, SyntaxElement, SyntaxKind, SyntaxNode,
    SyntaxRewriter, VariableDeclaration,
};

use crate::layout::{reindent_elements, Layout};
use crate::naming::unique_name;
use crate::precedence::{parenthesize_below, LOGICAL_OR};
use crate::selection::selected_nodes;
use crate::tree::{
    elements_contain_comment, enclosing_member, equivalent, green, required, significant_text, span, trivia_between,
    NodePtr,
};
use crate::{RefactorError, RefactoringContext, SourceChange};

/// Statements of a block or switch section fully covered by the selection.
fn selected_statements(list: &SyntaxNode, ctx: &RefactoringContext<'_>) -> Option<Vec<Stmt>> {
    if let Some(block) = Block::cast(list.clone()) {
        return selected_nodes(block.statements(), ctx.span());
    }
    let section = SwitchSection::cast(list.clone())?;
    selected_nodes(section.statements(), ctx.span())
}

/// Re-resolves the selected run when an action is applied.
#[derive(Clone, Copy)]
struct RunPtr {
    first: NodePtr,
    last: NodePtr,
}

impl RunPtr {
    fn new(statements: &[Stmt]) -> Option<RunPtr> {
        Some(RunPtr {
            first: NodePtr::new(statements.first()?.syntax()),
            last: NodePtr::new(statements.last()?.syntax()),
        })
    }

    fn resolve(self, root: &SyntaxNode) -> Result<Vec<Stmt>, RefactorError> {
        let first = self.first.to_node(root)?;
        let last = self.last.to_node(root)?;
        let mut run = Vec::new();
        let mut current = Some(first);
        while let Some(node) = current {
            let done = node == last;
            current = node.next_sibling();
            if let Some(stmt) = Stmt::cast(node) {
                run.push(stmt);
            }
            if done {
                return Ok(run);
            }
        }
        Err(RefactorError::invalid_target("statement run is no longer contiguous"))
    }
}

/// Everything after `first` up to and including `last`.
fn remove_after(rewriter: &mut SyntaxRewriter, first: &SyntaxNode, last: &SyntaxNode) {
    if first == last {
        return;
    }
    if let Some(start) = first.next_sibling_or_token() {
        rewriter.remove_range(start, last.clone());
    }
}

/// No comment or directive hides between consecutive statements.
fn gaps_are_plain(statements: &[Stmt]) -> bool {
    statements.windows(2).all(|pair| {
        let between = trivia_between(
            &NodeOrToken::Node(pair[0].syntax().clone()),
            &NodeOrToken::Node(pair[1].syntax().clone()),
        );
        !elements_contain_comment(&between)
    })
}

pub(super) fn compute_selection(ctx: &RefactoringContext<'_>, list: &SyntaxNode) -> Result<(), Cancelled> {
    if ctx.span().is_empty() {
        return Ok(());
    }
    let Some(statements) = selected_statements(list, ctx) else {
        return Ok(());
    };
    let Some(run) = RunPtr::new(&statements) else {
        return Ok(());
    };

    if ctx.is_enabled(RefactoringId::MergeIfStatements) && can_merge_ifs(&statements) {
        ctx.register(RefactoringId::MergeIfStatements, "Merge 'if' statements", move |doc, _| {
            let root = doc.syntax();
            let statements = run.resolve(&root)?;
            let mut rewriter = SyntaxRewriter::new();
            merge_ifs(&mut rewriter, &statements)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::MergeLocalDeclarations) && can_merge_declarations(&statements) {
        ctx.register(RefactoringId::MergeLocalDeclarations, "Merge local declarations", move |doc, _| {
            let root = doc.syntax();
            let statements = run.resolve(&root)?;
            let mut rewriter = SyntaxRewriter::new();
            merge_declarations(&mut rewriter, &statements)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::MergeAssignmentWithReturn) {
        if let Some(returned) = assignment_then_return(&statements) {
            let is_local = match &returned {
                AssignedValue::Declared(_) => true,
                AssignedValue::Assigned { target, .. } => match ctx.semantic_model()? {
                    Some(model) => model
                        .symbol_of(target.syntax())
                        .map_or(false, |symbol| symbol.kind == SymbolKind::Local),
                    None => false,
                },
            };
            if is_local {
                ctx.register(RefactoringId::MergeAssignmentWithReturn, "Merge statements", move |doc, _| {
                    let root = doc.syntax();
                    let statements = run.resolve(&root)?;
                    let value = assignment_then_return(&statements)
                        .ok_or_else(|| RefactorError::invalid_target("statements no longer assign then return"))?;
                    let [first, last] = statements.as_slice() else {
                        return Err(RefactorError::invalid_target("expected two statements"));
                    };
                    let mut rewriter = SyntaxRewriter::new();
                    rewriter.replace(first.syntax().clone(), make::return_stmt(Some(green(value.value().syntax()))));
                    remove_after(&mut rewriter, first.syntax(), last.syntax());
                    Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
                });
            }
        }
    }

    // A lone local declaration would go out of scope inside the new block.
    let wraps = !(statements.len() == 1 && matches!(statements[0], Stmt::LocalDeclarationStatement(_)));
    if wraps && ctx.is_enabled(RefactoringId::WrapInTryCatch) {
        ctx.register(RefactoringId::WrapInTryCatch, "Wrap in try-catch", move |doc, _| {
            let root = doc.syntax();
            let statements = run.resolve(&root)?;
            let layout = Layout::of(&root);
            let mut rewriter = SyntaxRewriter::new();
            wrap_in_try_catch(&mut rewriter, &layout, &statements)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
    if wraps && ctx.is_enabled(RefactoringId::WrapInIf) {
        ctx.register(RefactoringId::WrapInIf, "Wrap in condition", move |doc, _| {
            let root = doc.syntax();
            let statements = run.resolve(&root)?;
            let layout = Layout::of(&root);
            let mut rewriter = SyntaxRewriter::new();
            let (first, last, indent, block) = wrapped_block(&layout, &statements)?;
            let wrapped = make::if_stmt(make::name_expr("condition"), layout.line_break(&indent), block, None);
            rewriter.replace(first.clone(), wrapped);
            remove_after(&mut rewriter, &first, &last);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
    Ok(())
}

fn can_merge_ifs(statements: &[Stmt]) -> bool {
    if statements.len() < 2 || !gaps_are_plain(statements) {
        return false;
    }
    let ifs: Vec<&IfStatement> = statements
        .iter()
        .filter_map(|s| match s {
            Stmt::IfStatement(if_stmt) => Some(if_stmt),
            _ => None,
        })
        .collect();
    if ifs.len() != statements.len() {
        return false;
    }
    let bodies: Option<Vec<Stmt>> = ifs
        .iter()
        .map(|if_stmt| {
            if if_stmt.else_clause().is_some() || if_stmt.condition().is_none() {
                return None;
            }
            if_stmt.statement()
        })
        .collect();
    let Some(bodies) = bodies else {
        return false;
    };
    bodies.windows(2).all(|pair| equivalent(pair[0].syntax(), pair[1].syntax()))
}

fn merge_ifs(rewriter: &mut SyntaxRewriter, statements: &[Stmt]) -> Result<(), RefactorError> {
    let conditions: Vec<Expr> = statements
        .iter()
        .filter_map(|s| match s {
            Stmt::IfStatement(if_stmt) => if_stmt.condition(),
            _ => None,
        })
        .collect();
    let (Some(first), Some(last)) = (statements.first(), statements.last()) else {
        return Err(RefactorError::invalid_target("empty selection"));
    };
    let mut operands = conditions.iter().map(|c| parenthesize_below(green(c.syntax()), LOGICAL_OR));
    let head = operands
        .next()
        .ok_or_else(|| RefactorError::invalid_target("no condition to merge"))?;
    let merged = operands.fold(head, |acc, next| make::binary(acc, SyntaxKind::PipePipe, next));
    let first_condition = required(conditions.first().cloned(), first.syntax())?;
    rewriter.replace(first_condition.syntax().clone(), merged);
    remove_after(rewriter, first.syntax(), last.syntax());
    Ok(())
}

fn declaration_of(stmt: &Stmt) -> Option<(LocalDeclarationStatement, VariableDeclaration)> {
    match stmt {
        Stmt::LocalDeclarationStatement(local) => {
            let declaration = local.declaration()?;
            Some((local.clone(), declaration))
        }
        _ => None,
    }
}

fn can_merge_declarations(statements: &[Stmt]) -> bool {
    if statements.len() < 2 || !gaps_are_plain(statements) {
        return false;
    }
    let Some(declarations) = statements.iter().map(declaration_of).collect::<Option<Vec<_>>>() else {
        return false;
    };
    let Some((first_stmt, first_decl)) = declarations.first() else {
        return false;
    };
    let Some(first_ty) = first_decl.ty() else {
        return false;
    };
    if matches!(&first_ty, lathe_syntax::Type::NamedType(named) if named.is_var()) {
        return false;
    }
    let type_text = significant_text(first_ty.syntax());
    declarations.iter().all(|(stmt, decl)| {
        stmt.is_const() == first_stmt.is_const()
            && decl.ty().map_or(false, |ty| significant_text(ty.syntax()) == type_text)
    })
}

fn merge_declarations(rewriter: &mut SyntaxRewriter, statements: &[Stmt]) -> Result<(), RefactorError> {
    let declarations: Vec<(LocalDeclarationStatement, VariableDeclaration)> =
        statements.iter().filter_map(declaration_of).collect();
    let (Some((first_stmt, first_decl)), Some(last)) = (declarations.first(), statements.last()) else {
        return Err(RefactorError::invalid_target("no declarations to merge"));
    };
    let last_declarator = required(first_decl.declarators().last(), first_decl.syntax())?;
    let mut appended: Vec<GreenElement> = Vec::new();
    for (_, declaration) in &declarations[1..] {
        for declarator in declaration.declarators() {
            appended.push(make::token(SyntaxKind::Comma).into());
            appended.push(make::space());
            appended.push(NodeOrToken::Node(green(declarator.syntax())));
        }
    }
    rewriter.insert_after(last_declarator.syntax().clone(), appended);
    remove_after(rewriter, first_stmt.syntax(), last.syntax());
    Ok(())
}

enum AssignedValue {
    /// `var x = E; return x;`
    Declared(Expr),
    /// `x = E; return x;`
    Assigned { target: Expr, value: Expr },
}

impl AssignedValue {
    fn value(&self) -> &Expr {
        match self {
            AssignedValue::Declared(value) | AssignedValue::Assigned { value, .. } => value,
        }
    }
}

fn assignment_then_return(statements: &[Stmt]) -> Option<AssignedValue> {
    let [first, Stmt::ReturnStatement(ret)] = statements else {
        return None;
    };
    let Some(Expr::NameExpression(returned)) = ret.expr() else {
        return None;
    };
    let returned = returned.name()?;
    if !gaps_are_plain(statements) {
        return None;
    }
    match first {
        Stmt::ExpressionStatement(expr_stmt) => {
            let Some(Expr::AssignmentExpression(assignment)) = expr_stmt.expr() else {
                return None;
            };
            let target = assignment.lhs()?;
            let is_target = matches!(&target, Expr::NameExpression(name) if name.name().as_deref() == Some(returned.as_str()));
            (assignment.op_kind()? == SyntaxKind::Eq && is_target).then_some(())?;
            Some(AssignedValue::Assigned {
                target,
                value: assignment.rhs()?,
            })
        }
        Stmt::LocalDeclarationStatement(local) => {
            let mut declarators = local.declaration()?.declarators().collect::<Vec<_>>().into_iter();
            let (Some(declarator), None) = (declarators.next(), declarators.next()) else {
                return None;
            };
            (declarator.name()? == returned).then_some(())?;
            Some(AssignedValue::Declared(declarator.value()?))
        }
        _ => None,
    }
}

/// The first and last statements of the run, their indentation, and a block
/// holding the run one level deeper.
fn wrapped_block(layout: &Layout, statements: &[Stmt]) -> Result<(SyntaxNode, SyntaxNode, String, GreenNode), RefactorError> {
    let (Some(first), Some(last)) = (statements.first(), statements.last()) else {
        return Err(RefactorError::invalid_target("empty selection"));
    };
    let first = first.syntax().clone();
    let last = last.syntax().clone();
    let indent = trivia::node_indentation(&first);
    let interior = reindent_elements(
        green_range(&NodeOrToken::Node(first.clone()), &NodeOrToken::Node(last.clone())),
        &indent,
        &layout.indented(&indent),
    );
    let block = layout.block_around(interior, &indent);
    Ok((first, last, indent, block))
}

fn wrap_in_try_catch(rewriter: &mut SyntaxRewriter, layout: &Layout, statements: &[Stmt]) -> Result<(), RefactorError> {
    let (first, last, indent, try_block) = wrapped_block(layout, statements)?;
    let scope = enclosing_member(&first).unwrap_or_else(|| first.clone());
    let name = unique_name("ex", None, &scope, span(&first).start);

    let declaration = make::raw_node(
        SyntaxKind::CatchDeclaration,
        vec![
            make::token(SyntaxKind::LParen).into(),
            NodeOrToken::Node(make::named_type("Exception")),
            make::space(),
            make::ident(&name).into(),
            make::token(SyntaxKind::RParen).into(),
        ],
    );
    let rethrow = make::raw_node(
        SyntaxKind::ThrowStatement,
        vec![make::token(SyntaxKind::ThrowKw).into(), make::token(SyntaxKind::Semicolon).into()],
    );
    let mut catch_children: Vec<GreenElement> = vec![
        make::token(SyntaxKind::CatchKw).into(),
        make::space(),
        NodeOrToken::Node(declaration),
    ];
    catch_children.extend(layout.line_break(&indent));
    catch_children.push(NodeOrToken::Node(layout.block(vec![rethrow], &indent)));

    let mut try_children: Vec<GreenElement> = vec![make::token(SyntaxKind::TryKw).into()];
    try_children.extend(layout.line_break(&indent));
    try_children.push(NodeOrToken::Node(try_block));
    try_children.extend(layout.line_break(&indent));
    try_children.push(NodeOrToken::Node(make::raw_node(SyntaxKind::CatchClause, catch_children)));

    rewriter.replace(first.clone(), make::raw_node(SyntaxKind::TryStatement, try_children));
    remove_after(rewriter, &first, &last);
    Ok(())
}

/// `int a = 1, b;` into one declaration per declarator; locals and fields.
pub(super) fn compute_split_declaration(ctx: &RefactoringContext<'_>, node: &SyntaxNode) {
    if !ctx.is_enabled(RefactoringId::SplitVariableDeclaration) || !span(node).contains_span(ctx.span()) {
        return;
    }
    let Some(declaration) = node.children().find_map(VariableDeclaration::cast) else {
        return;
    };
    let declarators: Vec<_> = declaration.declarators().collect();
    if declarators.len() < 2 {
        return;
    }
    let inside_initializer = declarators
        .iter()
        .filter_map(|d| d.initializer())
        .any(|init| span(init.syntax()).contains_span(ctx.span()));
    if inside_initializer || trivia::has_comments_or_directives(declaration.syntax()) {
        return;
    }
    let ptr = NodePtr::new(node);
    ctx.register(RefactoringId::SplitVariableDeclaration, "Split declaration", move |doc, _| {
        let root = doc.syntax();
        let node = ptr.to_node(&root)?;
        let layout = Layout::of(&root);
        let mut rewriter = SyntaxRewriter::new();
        split_declaration(&mut rewriter, &layout, &node)?;
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

fn split_declaration(rewriter: &mut SyntaxRewriter, layout: &Layout, node: &SyntaxNode) -> Result<(), RefactorError> {
    let declaration = required(node.children().find_map(VariableDeclaration::cast), node)?;
    let ty = required(declaration.ty(), declaration.syntax())?;
    let indent = trivia::node_indentation(node);

    let prefix: Vec<GreenElement> = node
        .children_with_tokens()
        .take_while(|e| e.as_node() != Some(declaration.syntax()))
        .map(|e| green_of(&e))
        .collect();
    let suffix: Vec<GreenElement> = node
        .children_with_tokens()
        .skip_while(|e| e.as_node() != Some(declaration.syntax()))
        .skip(1)
        .map(|e| green_of(&e))
        .collect();

    let ty_element: SyntaxElement = NodeOrToken::Node(ty.syntax().clone());
    let gap = match ty_element.next_sibling_or_token() {
        Some(NodeOrToken::Token(t)) if t.kind() == SyntaxKind::Whitespace => NodeOrToken::Token(t.green().to_owned()),
        _ => make::space(),
    };
    let mut replacement: Vec<GreenElement> = Vec::new();
    for (i, declarator) in declaration.declarators().enumerate() {
        if i > 0 {
            replacement.extend(layout.line_break(&indent));
        }
        let decl_children = vec![
            green_of(&ty_element),
            gap.clone(),
            NodeOrToken::Node(green(declarator.syntax())),
        ];

        let mut children = prefix.clone();
        children.push(NodeOrToken::Node(make::raw_node(SyntaxKind::VariableDeclaration, decl_children)));
        children.extend(suffix.iter().cloned());
        replacement.push(NodeOrToken::Node(make::raw_node(node.kind(), children)));
    }
    rewriter.replace_with_many(node.clone(), replacement);
    Ok(())
}
