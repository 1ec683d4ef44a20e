//! Member-level actions: bodies, removal, duplication, accessibility and order.

use std::cmp::Ordering;

use lathe_config::RefactoringId;
use lathe_core::TextSpan;
use lathe_syntax::{
    ast::support, make, rewrite::green_of, trivia, AccessorDeclaration, AccessorList, ArrowExpressionClause, AstNode,
    Block, Expr, GreenElement, GreenNode, HasBody, HasModifiers, Member, MethodDeclaration,
    NodeOrToken, PropertyDeclaration, Stmt, SyntaxElement, SyntaxKind, SyntaxNode, SyntaxRewriter, SyntaxToken,
    TypeDeclaration,
};

use crate::layout::{set_separator, Layout};
use crate::selection::{is_on_token, selected_nodes};
use crate::tree::{elements_contain_comment, green, prev_significant_sibling, required, span, trivia_between, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

// --- Expression bodies ---------------------------------------------------

/// What `=> E;` means in its owner.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BodyKind {
    /// Methods returning a value, getters, expression-bodied properties.
    Value,
    /// `void` methods, constructors, setters.
    Effect,
}

fn body_kind(owner: &SyntaxNode) -> Option<BodyKind> {
    match owner.kind() {
        SyntaxKind::MethodDeclaration => {
            let method = MethodDeclaration::cast(owner.clone())?;
            Some(if method.returns_void() { BodyKind::Effect } else { BodyKind::Value })
        }
        SyntaxKind::ConstructorDeclaration => Some(BodyKind::Effect),
        SyntaxKind::AccessorDeclaration => {
            let accessor = AccessorDeclaration::cast(owner.clone())?;
            Some(if accessor.is_getter() { BodyKind::Value } else { BodyKind::Effect })
        }
        SyntaxKind::PropertyDeclaration => Some(BodyKind::Value),
        _ => None,
    }
}

fn statement_for(kind: BodyKind, expr: &Expr) -> GreenNode {
    match (expr, kind) {
        (Expr::ThrowExpression(throw), _) => {
            let thrown = throw
                .syntax()
                .children()
                .find_map(Expr::cast)
                .map(|e| green(e.syntax()));
            match thrown {
                Some(thrown) => make::throw_stmt(thrown),
                None => make::expr_stmt(green(expr.syntax())),
            }
        }
        (_, BodyKind::Value) => make::return_stmt(Some(green(expr.syntax()))),
        (_, BodyKind::Effect) => make::expr_stmt(green(expr.syntax())),
    }
}

pub(super) fn compute_arrow(ctx: &RefactoringContext<'_>, arrow: &ArrowExpressionClause) {
    if !ctx.is_enabled(RefactoringId::ExpandExpressionBody) || !span(arrow.syntax()).contains_span(ctx.span()) {
        return;
    }
    let Some(owner) = arrow.syntax().parent() else {
        return;
    };
    if body_kind(&owner).is_none() || arrow.expr().is_none() {
        return;
    }
    let ptr = NodePtr::new(arrow.syntax());
    ctx.register(RefactoringId::ExpandExpressionBody, "Use block body", move |doc, _| {
        let root = doc.syntax();
        let arrow: ArrowExpressionClause = ptr.cast(&root)?;
        let layout = Layout::of(&root);
        let mut rewriter = SyntaxRewriter::new();
        expand_expression_body(&mut rewriter, &layout, &arrow)?;
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

fn expand_expression_body(
    rewriter: &mut SyntaxRewriter,
    layout: &Layout,
    arrow: &ArrowExpressionClause,
) -> Result<(), RefactorError> {
    let clause = arrow.syntax();
    let owner = required(clause.parent(), clause)?;
    let kind = body_kind(&owner).ok_or_else(|| RefactorError::invalid_target("arrow clause has no member"))?;
    let expr = required(arrow.expr(), clause)?;
    let semicolon = required(support::token(&owner, SyntaxKind::Semicolon), &owner)?;
    let indent = trivia::node_indentation(&owner);
    let multiline = trivia::is_multiline(expr.syntax());

    let body = match owner.kind() {
        SyntaxKind::PropertyDeclaration => {
            let getter = single_line_accessor("get", statement_for(BodyKind::Value, &expr));
            make::raw_node(
                SyntaxKind::AccessorList,
                if multiline {
                    let mut children = vec![NodeOrToken::Token(make::token(SyntaxKind::LBrace))];
                    children.extend(layout.line_break(&layout.indented(&indent)));
                    children.push(NodeOrToken::Node(getter));
                    children.extend(layout.line_break(&indent));
                    children.push(NodeOrToken::Token(make::token(SyntaxKind::RBrace)));
                    children
                } else {
                    vec![
                        NodeOrToken::Token(make::token(SyntaxKind::LBrace)),
                        make::space(),
                        NodeOrToken::Node(getter),
                        make::space(),
                        NodeOrToken::Token(make::token(SyntaxKind::RBrace)),
                    ]
                },
            )
        }
        SyntaxKind::AccessorDeclaration if !multiline => single_line_block(statement_for(kind, &expr)),
        _ => layout.block(vec![statement_for(kind, &expr)], &indent),
    };

    let before = required(prev_significant_sibling(&NodeOrToken::Node(clause.clone())), &owner)?;
    let inline = !multiline
        && matches!(owner.kind(), SyntaxKind::AccessorDeclaration | SyntaxKind::PropertyDeclaration);
    let separator: Vec<GreenElement> = if inline {
        vec![make::space()]
    } else {
        layout.line_break(&indent)
    };
    set_separator(rewriter, &before, &NodeOrToken::Node(clause.clone()), separator);
    for element in trivia_between(&NodeOrToken::Node(clause.clone()), &NodeOrToken::Token(semicolon.clone())) {
        rewriter.remove(element);
    }
    rewriter.replace(clause.clone(), body);
    rewriter.remove(semicolon);
    Ok(())
}

/// `{ stmt }` on one line.
fn single_line_block(statement: GreenNode) -> GreenNode {
    make::block_raw(vec![make::space(), NodeOrToken::Node(statement), make::space()])
}

fn single_line_accessor(keyword: &str, statement: GreenNode) -> GreenNode {
    make::raw_node(
        SyntaxKind::AccessorDeclaration,
        vec![
            NodeOrToken::Token(make::ident(keyword)),
            make::space(),
            NodeOrToken::Node(single_line_block(statement)),
        ],
    )
}

/// The expression a one-statement body reduces to.
fn expression_of_body(kind: BodyKind, block: &Block) -> Option<(Expr, bool)> {
    let mut statements = block.statements();
    let statement = statements.next()?;
    if statements.next().is_some() || trivia::has_comments_or_directives(block.syntax()) {
        return None;
    }
    match (statement, kind) {
        (Stmt::ReturnStatement(ret), BodyKind::Value) => Some((ret.expr()?, false)),
        (Stmt::ThrowStatement(throw), _) => Some((throw.expr()?, true)),
        (Stmt::ExpressionStatement(stmt), BodyKind::Effect) => Some((stmt.expr()?, false)),
        _ => None,
    }
}

pub(super) fn compute_block_body(ctx: &RefactoringContext<'_>, block: &Block) {
    if !ctx.is_enabled(RefactoringId::UseExpressionBody) {
        return;
    }
    let Some(owner) = block.syntax().parent() else {
        return;
    };
    let Some(kind) = body_kind(&owner) else {
        return;
    };
    if owner.kind() == SyntaxKind::PropertyDeclaration || expression_of_body(kind, block).is_none() {
        return;
    }
    // Inside the body, or on its braces.
    let on_braces = [block.l_brace_token(), block.r_brace_token()]
        .into_iter()
        .flatten()
        .any(|t| is_on_token(ctx.span(), &t));
    if !on_braces && !span(block.syntax()).contains_span(ctx.span()) {
        return;
    }
    let whole_property = sole_getter_property(&owner);
    let ptr = NodePtr::new(block.syntax());
    ctx.register(RefactoringId::UseExpressionBody, "Use expression-bodied member", move |doc, _| {
        let root = doc.syntax();
        let block: Block = ptr.cast(&root)?;
        let owner = required(block.syntax().parent(), block.syntax())?;
        let kind = body_kind(&owner).ok_or_else(|| RefactorError::invalid_target("block is not a member body"))?;
        let (expr, is_throw) =
            expression_of_body(kind, &block).ok_or_else(|| RefactorError::invalid_target("body is not one statement"))?;
        let value = if is_throw {
            make::raw_node(
                SyntaxKind::ThrowExpression,
                vec![
                    NodeOrToken::Token(make::token(SyntaxKind::ThrowKw)),
                    make::space(),
                    NodeOrToken::Node(green(expr.syntax())),
                ],
            )
        } else {
            green(expr.syntax())
        };
        let arrow = make::raw_node(
            SyntaxKind::ArrowExpressionClause,
            vec![
                NodeOrToken::Token(make::token(SyntaxKind::Arrow)),
                make::space(),
                NodeOrToken::Node(value),
            ],
        );
        let mut rewriter = SyntaxRewriter::new();
        match (whole_property, owner.parent().and_then(|list| list.parent())) {
            (true, Some(property)) => {
                // `T P { get { return E; } }` becomes `T P => E;`.
                let list = required(support::child::<AccessorList>(&property), &property)?;
                let before = required(prev_significant_sibling(&NodeOrToken::Node(list.syntax().clone())), &property)?;
                set_separator(&mut rewriter, &before, &NodeOrToken::Node(list.syntax().clone()), vec![make::space()]);
                rewriter.replace_with_many(
                    list.syntax().clone(),
                    vec![NodeOrToken::Node(arrow), NodeOrToken::Token(make::token(SyntaxKind::Semicolon))],
                );
            }
            _ => {
                let before = required(prev_significant_sibling(&NodeOrToken::Node(block.syntax().clone())), &owner)?;
                set_separator(&mut rewriter, &before, &NodeOrToken::Node(block.syntax().clone()), vec![make::space()]);
                rewriter.replace_with_many(
                    block.syntax().clone(),
                    vec![NodeOrToken::Node(arrow), NodeOrToken::Token(make::token(SyntaxKind::Semicolon))],
                );
            }
        }
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

/// An accessor that is the only one of its property: a plain `get`.
fn sole_getter_property(accessor: &SyntaxNode) -> bool {
    let Some(accessor) = AccessorDeclaration::cast(accessor.clone()) else {
        return false;
    };
    let Some(list) = accessor.syntax().parent().and_then(AccessorList::cast) else {
        return false;
    };
    let has_initializer = list
        .syntax()
        .parent()
        .and_then(PropertyDeclaration::cast)
        .map_or(true, |p| p.initializer().is_some());
    accessor.is_getter()
        && accessor.modifiers().is_none()
        && support::child::<lathe_syntax::AttributeList>(accessor.syntax()).is_none()
        && list.accessors().count() == 1
        && !has_initializer
        && !trivia::has_comments_or_directives(list.syntax())
}

// --- Remove, duplicate, comment out ---------------------------------------

/// Where a member's header (modifiers, type, name, parameters) ends.
fn header_end(member: &Member) -> usize {
    let node = member.syntax();
    let body_start = node
        .children_with_tokens()
        .find(|element| match element {
            NodeOrToken::Node(child) => matches!(
                child.kind(),
                SyntaxKind::Block | SyntaxKind::ArrowExpressionClause | SyntaxKind::AccessorList
            ),
            NodeOrToken::Token(token) => token.kind() == SyntaxKind::LBrace,
        })
        .map(|element| usize::from(element.text_range().start()));
    body_start.unwrap_or_else(|| span(node).end)
}

pub(super) fn is_on_header(ctx: &RefactoringContext<'_>, member: &Member) -> bool {
    let node = span(member.syntax());
    let header = TextSpan::new(node.start, header_end(member));
    header.contains_span(ctx.span())
}

pub(super) fn compute_member(ctx: &RefactoringContext<'_>, member: &Member) {
    if !is_on_header(ctx, member) {
        return;
    }
    let node = member.syntax();
    if !matches!(
        node.parent().map(|p| p.kind()),
        Some(
            SyntaxKind::ClassDeclaration
                | SyntaxKind::StructDeclaration
                | SyntaxKind::InterfaceDeclaration
                | SyntaxKind::NamespaceDeclaration
                | SyntaxKind::CompilationUnit
        )
    ) {
        return;
    }

    if ctx.is_enabled(RefactoringId::RemoveMember) {
        let ptr = NodePtr::new(node);
        ctx.register(RefactoringId::RemoveMember, "Remove member", move |doc, _| {
            let root = doc.syntax();
            let node = ptr.to_node(&root)?;
            let (first, last) = line_extent(&node);
            let mut rewriter = SyntaxRewriter::new();
            rewriter.remove_range(first, last);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::DuplicateMember) {
        let ptr = NodePtr::new(node);
        ctx.register(RefactoringId::DuplicateMember, "Duplicate member", move |doc, _| {
            let root = doc.syntax();
            let node = ptr.to_node(&root)?;
            let layout = Layout::of(&root);
            let indent = trivia::node_indentation(&node);
            let mut copy = Vec::new();
            // Members with a body get a blank line between the copies.
            if node.kind() != SyntaxKind::FieldDeclaration {
                copy.extend(layout.line_break(""));
            }
            copy.extend(layout.line_break(&indent));
            copy.push(NodeOrToken::Node(green(&node)));
            let mut rewriter = SyntaxRewriter::new();
            rewriter.insert_after(node, copy);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::CommentOutMember) {
        let ptr = NodePtr::new(node);
        ctx.register(RefactoringId::CommentOutMember, "Comment out member", move |doc, _| {
            let root = doc.syntax();
            let node = ptr.to_node(&root)?;
            let layout = Layout::of(&root);
            let indent = trivia::node_indentation(&node);
            let mut rewriter = SyntaxRewriter::new();
            rewriter.replace_with_many(node.clone(), commented_lines(&node.to_string(), &indent, layout.eol));
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
}

/// The first and last element to delete so that a member disappears with
/// its own lines: attached comments above it, its indentation and the rest
/// of its last line. Blank lines before it survive.
pub(super) fn line_extent(node: &SyntaxNode) -> (SyntaxElement, SyntaxElement) {
    let leading = trivia::leading_trivia_of(node);
    let mut line_is_blank = true;
    let mut start = 0;
    for (index, token) in leading.iter().enumerate() {
        match token.kind() {
            SyntaxKind::Newline => {
                if line_is_blank {
                    start = index + 1;
                }
                line_is_blank = true;
            }
            SyntaxKind::Whitespace => {}
            _ => line_is_blank = false,
        }
    }
    let first = leading
        .get(start)
        .map(|t| NodeOrToken::Token(t.clone()))
        .unwrap_or_else(|| NodeOrToken::Node(node.clone()));
    let last = trivia::trailing_trivia_of(node)
        .last()
        .filter(|t| t.kind() == SyntaxKind::Newline)
        .map(|t| NodeOrToken::Token(t.clone()))
        .unwrap_or_else(|| NodeOrToken::Node(node.clone()));
    (first, last)
}

/// `text` as `//` comment lines; continuation lines keep their indentation.
fn commented_lines(text: &str, indent: &str, eol: &str) -> Vec<GreenElement> {
    let mut out = Vec::new();
    for (index, line) in text.split('\n').enumerate() {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let body = if index == 0 { line } else { line.strip_prefix(indent).unwrap_or(line.trim_start()) };
        if index > 0 {
            out.extend(make::line_break(eol, indent));
        }
        let comment = if body.is_empty() { "//".to_string() } else { format!("// {body}") };
        out.push(NodeOrToken::Token(make::token_with_text(SyntaxKind::LineComment, &comment)));
    }
    out
}

// --- Accessibility ------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Accessibility {
    Public,
    Internal,
    ProtectedInternal,
    Protected,
    PrivateProtected,
    Private,
}

impl Accessibility {
    const ALL: [Accessibility; 6] = [
        Accessibility::Public,
        Accessibility::Internal,
        Accessibility::ProtectedInternal,
        Accessibility::Protected,
        Accessibility::PrivateProtected,
        Accessibility::Private,
    ];

    fn keywords(self) -> &'static [SyntaxKind] {
        match self {
            Accessibility::Public => &[SyntaxKind::PublicKw],
            Accessibility::Internal => &[SyntaxKind::InternalKw],
            Accessibility::ProtectedInternal => &[SyntaxKind::ProtectedKw, SyntaxKind::InternalKw],
            Accessibility::Protected => &[SyntaxKind::ProtectedKw],
            Accessibility::PrivateProtected => &[SyntaxKind::PrivateKw, SyntaxKind::ProtectedKw],
            Accessibility::Private => &[SyntaxKind::PrivateKw],
        }
    }

    fn key(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::Internal => "internal",
            Accessibility::ProtectedInternal => "protected-internal",
            Accessibility::Protected => "protected",
            Accessibility::PrivateProtected => "private-protected",
            Accessibility::Private => "private",
        }
    }

    fn spelling(self) -> String {
        self.keywords().iter().filter_map(|k| k.text()).collect::<Vec<_>>().join(" ")
    }

    fn of(tokens: &[SyntaxKind]) -> Option<Accessibility> {
        let has = |kind| tokens.contains(&kind);
        match (has(SyntaxKind::PublicKw), has(SyntaxKind::InternalKw), has(SyntaxKind::ProtectedKw), has(SyntaxKind::PrivateKw)) {
            (true, _, _, _) => Some(Accessibility::Public),
            (_, true, true, _) => Some(Accessibility::ProtectedInternal),
            (_, _, true, true) => Some(Accessibility::PrivateProtected),
            (_, true, _, _) => Some(Accessibility::Internal),
            (_, _, true, _) => Some(Accessibility::Protected),
            (_, _, _, true) => Some(Accessibility::Private),
            _ => None,
        }
    }
}

/// Accessibilities a declaration may take in its container.
fn legal_accessibilities(member: &Member) -> Vec<Accessibility> {
    let container = member.syntax().parent().map(|p| p.kind());
    match container {
        Some(SyntaxKind::ClassDeclaration) => Accessibility::ALL.to_vec(),
        // Structs cannot be inherited from.
        Some(SyntaxKind::StructDeclaration) => {
            vec![Accessibility::Public, Accessibility::Internal, Accessibility::Private]
        }
        Some(SyntaxKind::NamespaceDeclaration | SyntaxKind::CompilationUnit) => {
            vec![Accessibility::Public, Accessibility::Internal]
        }
        _ => Vec::new(),
    }
}

fn current_accessibility(member: &Member) -> Accessibility {
    let tokens: Vec<SyntaxKind> = member
        .modifiers()
        .map(|m| m.tokens().map(|t| t.kind()).collect())
        .unwrap_or_default();
    Accessibility::of(&tokens).unwrap_or_else(|| match member.syntax().parent().map(|p| p.kind()) {
        Some(SyntaxKind::NamespaceDeclaration | SyntaxKind::CompilationUnit) => Accessibility::Internal,
        _ => Accessibility::Private,
    })
}

pub(super) fn compute_accessibility(ctx: &RefactoringContext<'_>, member: &Member) {
    if !ctx.is_enabled(RefactoringId::ChangeAccessibility) {
        return;
    }
    let on_modifiers = member
        .modifiers()
        .map_or(false, |m| span(m.syntax()).contains_span(ctx.span()));
    let on_name = member.name_token().map_or(false, |t| is_on_token(ctx.span(), &t));
    if !on_modifiers && !on_name {
        return;
    }
    // Overrides inherit their accessibility; static constructors have none.
    let is_static_constructor =
        matches!(member, Member::ConstructorDeclaration(_)) && member.has_modifier(SyntaxKind::StaticKw);
    if member.has_modifier(SyntaxKind::OverrideKw) || is_static_constructor {
        return;
    }
    let current = current_accessibility(member);
    for accessibility in legal_accessibilities(member) {
        if accessibility == current {
            continue;
        }
        let ptr = NodePtr::new(member.syntax());
        ctx.register_variant(
            RefactoringId::ChangeAccessibility,
            accessibility.key(),
            format!("Change accessibility to '{}'", accessibility.spelling()),
            move |doc, _| {
                let root = doc.syntax();
                let member: Member = ptr.cast(&root)?;
                let mut rewriter = SyntaxRewriter::new();
                set_accessibility(&mut rewriter, &member, accessibility)?;
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            },
        );
    }
}

fn set_accessibility(
    rewriter: &mut SyntaxRewriter,
    member: &Member,
    accessibility: Accessibility,
) -> Result<(), RefactorError> {
    let new_keywords = accessibility.keywords().iter().map(|&kind| make::token(kind));
    match member.modifiers() {
        Some(modifiers) => {
            let kept: Vec<SyntaxToken> = modifiers.tokens().filter(|t| !t.kind().is_accessibility_modifier()).collect();
            let mut children: Vec<GreenElement> = Vec::new();
            for token in new_keywords.map(NodeOrToken::Token).chain(kept.iter().map(|t| green_of(&NodeOrToken::Token(t.clone())))) {
                if !children.is_empty() {
                    children.push(make::space());
                }
                children.push(token);
            }
            rewriter.replace(modifiers.syntax().clone(), make::raw_node(SyntaxKind::Modifiers, children));
        }
        None => {
            let node = member.syntax();
            let first = node
                .children_with_tokens()
                .find(|e| match e {
                    NodeOrToken::Node(child) => child.kind() != SyntaxKind::AttributeList,
                    NodeOrToken::Token(token) => !token.kind().is_trivia(),
                })
                .ok_or_else(|| RefactorError::invalid_target("declaration has no keyword"))?;
            let mut children: Vec<GreenElement> = Vec::new();
            for token in new_keywords {
                if !children.is_empty() {
                    children.push(make::space());
                }
                children.push(NodeOrToken::Token(token));
            }
            rewriter.insert_before(
                first,
                vec![NodeOrToken::Node(make::raw_node(SyntaxKind::Modifiers, children)), make::space()],
            );
        }
    }
    Ok(())
}

// --- Sorting ------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MemberOrder {
    Kind,
    Name,
    KindThenName,
}

impl MemberOrder {
    fn key(self) -> &'static str {
        match self {
            MemberOrder::Kind => "kind",
            MemberOrder::Name => "name",
            MemberOrder::KindThenName => "kind-name",
        }
    }

    fn title(self) -> &'static str {
        match self {
            MemberOrder::Kind => "Sort members by kind",
            MemberOrder::Name => "Sort members by name",
            MemberOrder::KindThenName => "Sort members by kind, then by name",
        }
    }

    fn compare(self, a: &Member, b: &Member) -> Ordering {
        match self {
            MemberOrder::Kind => kind_rank(a).cmp(&kind_rank(b)),
            MemberOrder::Name => compare_names(a, b),
            MemberOrder::KindThenName => kind_rank(a).cmp(&kind_rank(b)).then_with(|| compare_names(a, b)),
        }
    }
}

fn kind_rank(member: &Member) -> u8 {
    match member {
        Member::FieldDeclaration(field) if field.has_modifier(SyntaxKind::ConstKw) => 0,
        Member::FieldDeclaration(_) => 1,
        Member::ConstructorDeclaration(_) => 2,
        Member::PropertyDeclaration(_) => 3,
        Member::MethodDeclaration(_) => 4,
        Member::EnumDeclaration(_) => 5,
        Member::InterfaceDeclaration(_) => 6,
        Member::StructDeclaration(_) => 7,
        Member::ClassDeclaration(_) => 8,
    }
}

/// Case-insensitive first, ordinal to break ties.
pub(super) fn compare_name_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase()).then_with(|| a.cmp(b))
}

fn compare_names(a: &Member, b: &Member) -> Ordering {
    compare_name_text(&a.name().unwrap_or_default(), &b.name().unwrap_or_default())
}

/// Permutation of `items` sorted by `compare`, if it differs from the identity.
pub(super) fn sorted_order<T>(items: &[T], compare: impl Fn(&T, &T) -> Ordering) -> Option<Vec<usize>> {
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| compare(&items[a], &items[b]));
    order.iter().enumerate().any(|(position, &index)| position != index).then_some(order)
}

pub(super) fn compute_sort(ctx: &RefactoringContext<'_>, ty: &TypeDeclaration) {
    if !ctx.is_enabled(RefactoringId::SortMemberDeclarations) {
        return;
    }
    let Some(members) = selected_nodes(ty.members(), ctx.span()) else {
        return;
    };
    if members.len() < 2 || !gaps_are_plain(&members) {
        return;
    }
    for order in [MemberOrder::Kind, MemberOrder::Name, MemberOrder::KindThenName] {
        let Some(permutation) = sorted_order(&members, |a, b| order.compare(a, b)) else {
            continue;
        };
        let ptrs: Vec<NodePtr> = members.iter().map(|m| NodePtr::new(m.syntax())).collect();
        ctx.register_variant(RefactoringId::SortMemberDeclarations, order.key(), order.title(), move |doc, _| {
            let root = doc.syntax();
            let nodes = ptrs.iter().map(|ptr| ptr.to_node(&root)).collect::<Result<Vec<_>, _>>()?;
            let mut rewriter = SyntaxRewriter::new();
            permute(&mut rewriter, &nodes, &permutation);
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }
}

/// No comments or directives between consecutive members, so that moving
/// them cannot detach a comment from its declaration.
pub(super) fn gaps_are_plain<N: AstNode>(nodes: &[N]) -> bool {
    nodes.windows(2).all(|pair| {
        let gap = trivia_between(
            &NodeOrToken::Node(pair[0].syntax().clone()),
            &NodeOrToken::Node(pair[1].syntax().clone()),
        );
        !elements_contain_comment(&gap)
    }) && nodes
        .first()
        .map_or(true, |first| !trivia::contains_comment(&trivia::leading_trivia_of(first.syntax())))
}

/// Put the node at `permutation[i]` where `nodes[i]` was.
pub(super) fn permute(rewriter: &mut SyntaxRewriter, nodes: &[SyntaxNode], permutation: &[usize]) {
    for (position, &source) in permutation.iter().enumerate() {
        if position != source {
            rewriter.replace(nodes[position].clone(), green(&nodes[source]));
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn names_compare_case_insensitively_first() {
        assert_eq!(compare_name_text("apple", "Banana"), Ordering::Less);
        assert_eq!(compare_name_text("Item", "item"), Ordering::Less);
        assert_eq!(compare_name_text("b", "a"), Ordering::Greater);
    }

    #[test]
    fn sorted_order_is_none_when_already_sorted() {
        assert_eq!(sorted_order(&[1, 2, 3], |a, b| a.cmp(b)), None);
        assert_eq!(sorted_order(&[2, 1, 3], |a, b| a.cmp(b)), Some(vec![1, 0, 2]));
    }

    #[test]
    fn commented_lines_keep_relative_indentation() {
        let lines = commented_lines("void M()\n    {\n    }", "    ", "\n");
        let text: String = lines
            .into_iter()
            .map(|element| match element {
                NodeOrToken::Token(token) => token.text().to_string(),
                NodeOrToken::Node(node) => node.to_string(),
            })
            .collect();
        assert_eq!(text, "// void M()\n    // {\n    // }");
    }
}
