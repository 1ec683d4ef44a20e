//! Auto-properties and their backing fields.

use lathe_config::RefactoringId;
use lathe_core::{CancellationToken, Cancelled};
use lathe_semantic::SemanticModel;
use lathe_syntax::{
    make, rewrite::green_of, trivia, AccessorDeclaration, AstNode, Expr,
    FieldDeclaration, GreenElement, GreenNode, HasBody, HasModifiers, HasName, Member, NodeOrToken,
    PropertyDeclaration, Stmt, SyntaxKind, SyntaxNode, SyntaxRewriter, TypeDeclaration,
};

use super::locals::identifier_at;
use super::members::{is_on_header, line_extent};
use crate::layout::{set_separator, Layout};
use crate::naming::unique_name;
use crate::tree::{enclosing_type, equivalent, green, prev_significant_sibling, required, span, trivia_between, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

pub(super) fn compute(ctx: &RefactoringContext<'_>, property: &PropertyDeclaration) -> Result<(), Cancelled> {
    let Some(member) = Member::cast(property.syntax().clone()) else {
        return Ok(());
    };
    if !is_on_header(ctx, &member) {
        return Ok(());
    }
    if ctx.is_enabled(RefactoringId::ExpandProperty) {
        compute_expand(ctx, property)?;
    }
    if ctx.is_enabled(RefactoringId::ConvertToAutoProperty) {
        compute_to_auto(ctx, property)?;
    }
    Ok(())
}

// --- Expand -------------------------------------------------------------

/// Accessors of an auto-property: `{ get; set; }`, `{ get; init; }`, `{ get; }`.
fn auto_accessors(property: &PropertyDeclaration) -> Option<Vec<AccessorDeclaration>> {
    let accessors: Vec<AccessorDeclaration> = property.accessor_list()?.accessors().collect();
    let is_auto = !accessors.is_empty()
        && accessors
            .iter()
            .all(|a| a.body().is_none() && a.expression_body().is_none() && a.semicolon_token().is_some());
    let has_getter = accessors.iter().any(AccessorDeclaration::is_getter);
    (is_auto && has_getter).then_some(accessors)
}

fn is_read_only(accessors: &[AccessorDeclaration]) -> bool {
    !accessors.iter().any(AccessorDeclaration::is_setter)
}

fn compute_expand(ctx: &RefactoringContext<'_>, property: &PropertyDeclaration) -> Result<(), Cancelled> {
    let Some(accessors) = auto_accessors(property) else {
        return Ok(());
    };
    let node = property.syntax();
    let Some(ty_node) = enclosing_type(node) else {
        return Ok(());
    };
    if ty_node.kind() == SyntaxKind::InterfaceDeclaration
        || property.has_modifier(SyntaxKind::AbstractKw)
        || property.has_modifier(SyntaxKind::ExternKw)
    {
        return Ok(());
    }
    let Some(name) = property.name() else {
        return Ok(());
    };
    let model = ctx.semantic_model()?;
    // Assignments to a getter-only property must be redirected to the field.
    if is_read_only(&accessors) && model.is_none() {
        return Ok(());
    }
    let candidate = field_name(&name, ctx.config().prefix_field_identifier_with_underscore);
    let field = unique_name(&candidate, model, &ty_node, span(node).start);

    let ptr = NodePtr::new(node);
    ctx.register(RefactoringId::ExpandProperty, "Expand property", move |doc, cancel| {
        let root = doc.syntax();
        let property: PropertyDeclaration = ptr.cast(&root)?;
        let layout = Layout::of(&root);
        let mut rewriter = SyntaxRewriter::new();
        expand(&mut rewriter, &layout, &property, &field)?;
        let accessors = auto_accessors(&property)
            .ok_or_else(|| RefactorError::invalid_target("property is no longer an auto-property"))?;
        if is_read_only(&accessors) {
            let model = doc
                .semantic_model(cancel)?
                .ok_or_else(|| RefactorError::invalid_target("getter-only property needs a semantic model"))?;
            redirect_references(&mut rewriter, &root, model.as_ref(), property.syntax(), &field, cancel)?;
        }
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
    Ok(())
}

/// `_value` or `value` for a property named `Value`.
fn field_name(property: &str, underscore: bool) -> String {
    let mut chars = property.chars();
    let camel = match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    };
    if underscore {
        format!("_{camel}")
    } else {
        camel
    }
}

fn expand(
    rewriter: &mut SyntaxRewriter,
    layout: &Layout,
    property: &PropertyDeclaration,
    field: &str,
) -> Result<(), RefactorError> {
    let node = property.syntax();
    let list = required(property.accessor_list(), node)?;
    let ty = required(property.ty(), node)?;
    let indent = trivia::node_indentation(node);
    let accessors = auto_accessors(property)
        .ok_or_else(|| RefactorError::invalid_target("property is not an auto-property"))?;

    // private [static] [readonly] T field [= initializer];
    let mut field_text = String::from("private ");
    if property.has_modifier(SyntaxKind::StaticKw) {
        field_text.push_str("static ");
    }
    if is_read_only(&accessors) {
        field_text.push_str("readonly ");
    }
    field_text.push_str(&ty.syntax().to_string());
    field_text.push(' ');
    field_text.push_str(field);
    if let Some(value) = property.initializer().and_then(|i| i.value()) {
        field_text.push_str(" = ");
        field_text.push_str(&value.syntax().to_string());
    }
    field_text.push(';');
    let declaration = field_from_text(&field_text)
        .ok_or_else(|| RefactorError::invalid_target(format!("`{field_text}` is not a field declaration")))?;
    let mut before = vec![NodeOrToken::Node(declaration)];
    before.extend(layout.line_break(&indent));
    rewriter.insert_before(node.clone(), before);

    // Accessors with bodies, one per line.
    let inner = layout.indented(&indent);
    let mut children = vec![NodeOrToken::Token(make::token(SyntaxKind::LBrace))];
    for accessor in &accessors {
        children.extend(layout.line_break(&inner));
        children.push(NodeOrToken::Node(accessor_with_body(accessor, field)?));
    }
    children.extend(layout.line_break(&indent));
    children.push(NodeOrToken::Token(make::token(SyntaxKind::RBrace)));

    let list_element = NodeOrToken::Node(list.syntax().clone());
    let previous = required(prev_significant_sibling(&list_element), node)?;
    set_separator(rewriter, &previous, &list_element, layout.line_break(&indent));
    rewriter.replace(list.syntax().clone(), make::raw_node(SyntaxKind::AccessorList, children));

    // The initializer moved to the field.
    if let Some(initializer) = property.initializer() {
        let semicolon = required(property.semicolon_token(), node)?;
        for element in trivia_between(&list_element, &NodeOrToken::Node(initializer.syntax().clone())) {
            rewriter.remove(element);
        }
        rewriter.remove_range(initializer.syntax().clone(), semicolon);
    }
    Ok(())
}

fn field_from_text(text: &str) -> Option<GreenNode> {
    let parse = lathe_syntax::parse_member_fragment(text);
    if parse.has_errors() {
        return None;
    }
    parse
        .syntax()
        .descendants()
        .find(|n| n.kind() == SyntaxKind::FieldDeclaration)
        .map(|n| green(&n))
}

/// `get { return field; }` or `set { field = value; }`, modifiers kept.
fn accessor_with_body(accessor: &AccessorDeclaration, field: &str) -> Result<GreenNode, RefactorError> {
    let keyword = required(accessor.keyword_token(), accessor.syntax())?;
    let statement = if accessor.is_getter() {
        make::return_stmt(Some(make::name_expr(field)))
    } else {
        make::expr_stmt(make::assignment(make::name_expr(field), SyntaxKind::Eq, make::name_expr("value")))
    };
    let mut children: Vec<GreenElement> = Vec::new();
    if let Some(modifiers) = accessor.modifiers() {
        children.push(NodeOrToken::Node(green(modifiers.syntax())));
        children.push(make::space());
    }
    children.push(green_of(&NodeOrToken::Token(keyword)));
    children.push(make::space());
    children.push(NodeOrToken::Node(make::block_raw(vec![
        make::space(),
        NodeOrToken::Node(statement),
        make::space(),
    ])));
    Ok(make::raw_node(SyntaxKind::AccessorDeclaration, children))
}

/// Point every use of the property inside its type, outside the
/// declaration itself, at the field.
fn redirect_references(
    rewriter: &mut SyntaxRewriter,
    root: &SyntaxNode,
    model: &dyn SemanticModel,
    property: &SyntaxNode,
    field: &str,
    cancel: &CancellationToken,
) -> Result<(), RefactorError> {
    let symbol = model
        .declared_symbol(property)
        .ok_or_else(|| RefactorError::invalid_target("property has no symbol"))?;
    let container = required(enclosing_type(property), property)?;
    let inside = span(&container);
    let declaration = span(property);
    for reference in model.find_references(&symbol, cancel)? {
        if !inside.contains_span(reference) || declaration.contains_span(reference) {
            continue;
        }
        let token = identifier_at(root, reference)
            .ok_or_else(|| RefactorError::invalid_target(format!("no identifier at {reference:?}")))?;
        rewriter.replace(token, make::ident(field));
    }
    Ok(())
}

// --- Convert to auto-property -------------------------------------------

/// The field a full property wraps.
struct BackingField {
    field: FieldDeclaration,
    name: String,
    has_setter: bool,
}

/// The identifier a getter returns, allowing `this.`.
fn returned_name(expr: &Expr) -> Option<String> {
    match expr.without_parentheses()? {
        Expr::NameExpression(name) => name.name(),
        Expr::MemberAccessExpression(access) => match access.expr()? {
            Expr::ThisExpression(_) => access.name_token().map(|t| t.text().to_string()),
            _ => None,
        },
        _ => None,
    }
}

/// `f` from `return f;` / `=> f`.
fn getter_field(accessor: &AccessorDeclaration) -> Option<String> {
    if let Some(arrow) = accessor.expression_body() {
        return returned_name(&arrow.expr()?);
    }
    let body = accessor.body()?;
    let mut statements = body.statements();
    let Some(Stmt::ReturnStatement(ret)) = statements.next() else {
        return None;
    };
    if statements.next().is_some() {
        return None;
    }
    returned_name(&ret.expr()?)
}

/// `f` from `f = value;` / `=> f = value`.
fn setter_field(accessor: &AccessorDeclaration) -> Option<String> {
    let assignment = match (accessor.expression_body(), accessor.body()) {
        (Some(arrow), _) => arrow.expr()?,
        (None, Some(body)) => {
            let mut statements = body.statements();
            let Some(Stmt::ExpressionStatement(stmt)) = statements.next() else {
                return None;
            };
            if statements.next().is_some() {
                return None;
            }
            stmt.expr()?
        }
        (None, None) => return None,
    };
    let Expr::AssignmentExpression(assignment) = assignment else {
        return None;
    };
    if assignment.op_kind()? != SyntaxKind::Eq {
        return None;
    }
    match assignment.rhs()? {
        Expr::NameExpression(value) if value.name().as_deref() == Some("value") => returned_name(&assignment.lhs()?),
        _ => None,
    }
}

fn backing_field(property: &PropertyDeclaration) -> Option<BackingField> {
    let node = property.syntax();
    let (name, has_setter) = match (property.expression_body(), property.accessor_list()) {
        (Some(arrow), _) => (returned_name(&arrow.expr()?)?, false),
        (None, Some(list)) => {
            let accessors: Vec<AccessorDeclaration> = list.accessors().collect();
            let getter = accessors.iter().find(|a| a.is_getter())?;
            let name = getter_field(getter)?;
            let mut has_setter = false;
            for accessor in accessors.iter().filter(|a| !a.is_getter()) {
                if setter_field(accessor)? != name {
                    return None;
                }
                has_setter = true;
            }
            if accessors.len() > 2 || trivia::has_comments_or_directives(list.syntax()) {
                return None;
            }
            (name, has_setter)
        }
        (None, None) => return None,
    };
    let container = TypeDeclaration::cast(enclosing_type(node)?)?;
    let field = container.members().find_map(|member| match member {
        Member::FieldDeclaration(field) => {
            let declaration = field.declaration()?;
            let mut declarators = declaration.declarators();
            let declarator = declarators.next()?;
            (declarators.next().is_none() && declarator.name().as_deref() == Some(name.as_str())).then_some(field)
        }
        _ => None,
    })?;
    let is_private = field
        .modifiers()
        .map_or(true, |m| !m.tokens().any(|t| t.kind().is_accessibility_modifier() && t.kind() != SyntaxKind::PrivateKw));
    let same_type = match (field.declaration()?.ty(), property.ty()) {
        (Some(a), Some(b)) => equivalent(a.syntax(), b.syntax()),
        _ => false,
    };
    let same_storage = field.has_modifier(SyntaxKind::StaticKw) == property.has_modifier(SyntaxKind::StaticKw);
    // A getter-only result can only be assigned where a readonly field could.
    let writable = has_setter || field.has_modifier(SyntaxKind::ReadonlyKw);
    let eligible = is_private && same_type && same_storage && writable && !field.has_modifier(SyntaxKind::ConstKw);
    eligible.then_some(BackingField {
        field,
        name,
        has_setter,
    })
}

fn compute_to_auto(ctx: &RefactoringContext<'_>, property: &PropertyDeclaration) -> Result<(), Cancelled> {
    if auto_accessors(property).is_some() || backing_field(property).is_none() {
        return Ok(());
    }
    // References to the field elsewhere in the type are redirected.
    if ctx.semantic_model()?.is_none() {
        return Ok(());
    }
    let ptr = NodePtr::new(property.syntax());
    ctx.register(RefactoringId::ConvertToAutoProperty, "Convert to auto-property", move |doc, cancel| {
        let root = doc.syntax();
        let property: PropertyDeclaration = ptr.cast(&root)?;
        let backing = backing_field(&property)
            .ok_or_else(|| RefactorError::invalid_target("property no longer wraps a field"))?;
        let model = doc
            .semantic_model(cancel)?
            .ok_or_else(|| RefactorError::invalid_target("converting needs a semantic model"))?;
        let mut rewriter = SyntaxRewriter::new();
        to_auto_property(&mut rewriter, &root, model.as_ref(), &property, &backing, cancel)?;
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
    Ok(())
}

fn to_auto_property(
    rewriter: &mut SyntaxRewriter,
    root: &SyntaxNode,
    model: &dyn SemanticModel,
    property: &PropertyDeclaration,
    backing: &BackingField,
    cancel: &CancellationToken,
) -> Result<(), RefactorError> {
    let node = property.syntax();
    let name = required(property.name(), node)?;
    let declarator = required(
        backing.field.declaration().and_then(|d| d.declarators().next()),
        backing.field.syntax(),
    )?;

    // Field references, outside the property and the field, now use the property.
    let symbol = model
        .declared_symbol(declarator.syntax())
        .ok_or_else(|| RefactorError::invalid_target(format!("`{}` has no symbol", backing.name)))?;
    let skipped = [span(node), span(backing.field.syntax())];
    for reference in model.find_references(&symbol, cancel)? {
        if skipped.iter().any(|s| s.contains_span(reference)) {
            continue;
        }
        let token = identifier_at(root, reference)
            .ok_or_else(|| RefactorError::invalid_target(format!("no identifier at {reference:?}")))?;
        rewriter.replace(token, make::ident(&name));
    }

    let (first, last) = line_extent(backing.field.syntax());
    rewriter.remove_range(first, last);

    // `{ get; set; }` on the name's line, then the field's initializer.
    let mut accessors: Vec<GreenElement> = vec![
        NodeOrToken::Token(make::token(SyntaxKind::LBrace)),
        make::space(),
        NodeOrToken::Node(auto_accessor("get", None)),
    ];
    if backing.has_setter {
        let setter = property
            .accessor_list()
            .and_then(|list| list.accessors().find(|a| !a.is_getter()));
        let keyword = setter
            .as_ref()
            .and_then(AccessorDeclaration::keyword_token)
            .map_or_else(|| "set".to_string(), |t| t.text().to_string());
        accessors.push(make::space());
        accessors.push(NodeOrToken::Node(auto_accessor(&keyword, setter.and_then(|s| s.modifiers()))));
    }
    accessors.push(make::space());
    accessors.push(NodeOrToken::Token(make::token(SyntaxKind::RBrace)));
    let mut replacement = vec![NodeOrToken::Node(make::raw_node(SyntaxKind::AccessorList, accessors))];
    if let Some(value) = declarator.value() {
        replacement.push(make::space());
        replacement.push(NodeOrToken::Node(make::equals_value(green(value.syntax()))));
        replacement.push(NodeOrToken::Token(make::token(SyntaxKind::Semicolon)));
    }

    let body: SyntaxNode = match (property.accessor_list(), property.expression_body()) {
        (Some(list), _) => list.syntax().clone(),
        (None, Some(arrow)) => {
            // `=> f;` also drops its semicolon.
            if let Some(semicolon) = property.semicolon_token() {
                for element in trivia_between(&NodeOrToken::Node(arrow.syntax().clone()), &NodeOrToken::Token(semicolon.clone())) {
                    rewriter.remove(element);
                }
                rewriter.remove(semicolon);
            }
            arrow.syntax().clone()
        }
        (None, None) => return Err(RefactorError::invalid_target("property has no body")),
    };
    let body_element = NodeOrToken::Node(body.clone());
    let previous = required(prev_significant_sibling(&body_element), node)?;
    set_separator(rewriter, &previous, &body_element, vec![make::space()]);
    rewriter.replace_with_many(body, replacement);
    Ok(())
}

fn auto_accessor(keyword: &str, modifiers: Option<lathe_syntax::Modifiers>) -> GreenNode {
    let mut children: Vec<GreenElement> = Vec::new();
    if let Some(modifiers) = modifiers {
        children.push(NodeOrToken::Node(green(modifiers.syntax())));
        children.push(make::space());
    }
    children.push(NodeOrToken::Token(make::ident(keyword)));
    children.push(NodeOrToken::Token(make::token(SyntaxKind::Semicolon)));
    make::raw_node(SyntaxKind::AccessorDeclaration, children)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn field_names_follow_the_prefix_setting() {
        assert_eq!(field_name("Value", true), "_value");
        assert_eq!(field_name("Value", false), "value");
    }
}
