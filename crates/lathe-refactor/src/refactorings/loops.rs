//! Loop conversions.

use lathe_config::RefactoringId;
use lathe_syntax::{
    ast::support, make, parse_int_literal, rewrite::green_range, trivia, AstNode, BinaryExpression, DoStatement,
    Expr, ForStatement, GreenElement, GreenNode, HasName, NodeOrToken, Stmt, SyntaxElement, SyntaxKind,
    SyntaxNode, SyntaxRewriter, WhileStatement,
};

use crate::layout::{reindent_node, separator, Layout};
use crate::precedence::{parenthesize_below, ADDITIVE};
use crate::selection::is_on_token;
use crate::tree::{elements_contain_comment, green, is_in_statement_list, required, span, trivia_between, NodePtr};
use crate::{RefactorError, RefactoringContext, SourceChange};

fn token_element(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxElement> {
    support::token(node, kind).map(NodeOrToken::Token)
}

pub(super) fn compute_do(ctx: &RefactoringContext<'_>, do_stmt: &DoStatement) {
    if !ctx.is_enabled(RefactoringId::ConvertDoToWhile) {
        return;
    }
    let on_keyword = [do_stmt.do_token(), do_stmt.while_token()]
        .into_iter()
        .flatten()
        .any(|t| is_on_token(ctx.span(), &t));
    if !on_keyword || do_stmt.statement().is_none() || do_stmt.condition().is_none() {
        return;
    }
    if loses_comments(do_stmt) {
        return;
    }
    let ptr = NodePtr::new(do_stmt.syntax());
    ctx.register(RefactoringId::ConvertDoToWhile, "Convert to 'while'", move |doc, _| {
        let root = doc.syntax();
        let do_stmt: DoStatement = ptr.cast(&root)?;
        let node = do_stmt.syntax();
        let do_token: SyntaxElement = NodeOrToken::Token(required(do_stmt.do_token(), node)?);
        let while_token: SyntaxElement = NodeOrToken::Token(required(do_stmt.while_token(), node)?);
        let r_paren = required(token_element(node, SyntaxKind::RParen), node)?;
        let body = required(do_stmt.statement(), node)?;
        let body_element: SyntaxElement = NodeOrToken::Node(body.syntax().clone());

        let mut children = green_range(&while_token, &r_paren);
        let relocated = separator(&do_token, &body_element);
        if relocated.is_empty() {
            children.push(make::space());
        } else {
            children.extend(relocated);
        }
        children.push(NodeOrToken::Node(green(body.syntax())));

        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(node.clone(), make::raw_node(SyntaxKind::WhileStatement, children));
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

/// Comments between the body and the `while`, or between `)` and `;`, have
/// no place in a `while` statement.
fn loses_comments(do_stmt: &DoStatement) -> bool {
    let node = do_stmt.syntax();
    let (Some(body), Some(while_token)) = (do_stmt.statement(), do_stmt.while_token()) else {
        return true;
    };
    let tail_start = NodeOrToken::Node(body.syntax().clone());
    let mut between = trivia_between(&tail_start, &NodeOrToken::Token(while_token));
    if let (Some(r_paren), Some(semicolon)) = (
        token_element(node, SyntaxKind::RParen),
        token_element(node, SyntaxKind::Semicolon),
    ) {
        between.extend(trivia_between(&r_paren, &semicolon));
    }
    elements_contain_comment(&between)
}

pub(super) fn compute_while(ctx: &RefactoringContext<'_>, while_stmt: &WhileStatement) {
    if !ctx.any_enabled(&[RefactoringId::ConvertWhileToDo, RefactoringId::ConvertWhileToFor]) {
        return;
    }
    let on_keyword = while_stmt.while_token().map_or(false, |t| is_on_token(ctx.span(), &t));
    if !on_keyword || while_stmt.statement().is_none() || while_stmt.condition().is_none() {
        return;
    }

    let ptr = NodePtr::new(while_stmt.syntax());
    ctx.register(RefactoringId::ConvertWhileToDo, "Convert to 'do'", move |doc, _| {
        let root = doc.syntax();
        let while_stmt: WhileStatement = ptr.cast(&root)?;
        let node = while_stmt.syntax();
        let while_token: SyntaxElement = NodeOrToken::Token(required(while_stmt.while_token(), node)?);
        let r_paren: SyntaxElement = NodeOrToken::Token(required(while_stmt.r_paren_token(), node)?);
        let body = required(while_stmt.statement(), node)?;
        let body_element: SyntaxElement = NodeOrToken::Node(body.syntax().clone());

        let mut children: Vec<GreenElement> = vec![make::token(SyntaxKind::DoKw).into()];
        let before_body = separator(&r_paren, &body_element);
        if before_body.is_empty() {
            children.push(make::space());
        } else {
            children.extend(before_body);
        }
        children.push(NodeOrToken::Node(green(body.syntax())));
        children.push(make::space());
        children.extend(green_range(&while_token, &r_paren));
        children.push(make::token(SyntaxKind::Semicolon).into());
        let do_stmt = make::raw_node(SyntaxKind::DoStatement, children);

        // A `do` runs its body once before testing, so a condition that may
        // start out false keeps its guard.
        let condition = required(while_stmt.condition(), node)?;
        let replacement = if condition.is_literal_of(SyntaxKind::TrueKw) {
            do_stmt
        } else {
            let layout = Layout::of(&root);
            let indent = trivia::node_indentation(node);
            let shifted = trivia::reindent(&do_stmt, &indent, &layout.indented(&indent));
            make::if_stmt(
                green(condition.syntax()),
                layout.line_break(&indent),
                layout.block(vec![shifted], &indent),
                None,
            )
        };

        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(node.clone(), replacement);
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });

    let ptr = NodePtr::new(while_stmt.syntax());
    ctx.register(RefactoringId::ConvertWhileToFor, "Convert to 'for'", move |doc, _| {
        let root = doc.syntax();
        let while_stmt: WhileStatement = ptr.cast(&root)?;
        let node = while_stmt.syntax();
        let while_token = required(while_stmt.while_token(), node)?;
        let condition = required(while_stmt.condition(), node)?;
        let r_paren: SyntaxElement = NodeOrToken::Token(required(while_stmt.r_paren_token(), node)?);
        let body = required(while_stmt.statement(), node)?;
        let body_element: SyntaxElement = NodeOrToken::Node(body.syntax().clone());

        let mut children: Vec<GreenElement> = vec![make::token(SyntaxKind::ForKw).into()];
        let l_paren = required(token_element(node, SyntaxKind::LParen), node)?;
        children.extend(separator(&NodeOrToken::Token(while_token), &l_paren));
        children.extend([
            make::token(SyntaxKind::LParen).into(),
            make::token(SyntaxKind::Semicolon).into(),
            make::space(),
            NodeOrToken::Node(green(condition.syntax())),
            make::token(SyntaxKind::Semicolon).into(),
            make::token(SyntaxKind::RParen).into(),
        ]);
        children.extend(separator(&r_paren, &body_element));
        children.push(NodeOrToken::Node(green(body.syntax())));

        let mut rewriter = SyntaxRewriter::new();
        rewriter.replace(node.clone(), make::raw_node(SyntaxKind::ForStatement, children));
        Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
    });
}

pub(super) fn compute_for(ctx: &RefactoringContext<'_>, for_stmt: &ForStatement) {
    if !ctx.any_enabled(&[RefactoringId::ConvertForToWhile, RefactoringId::ReverseForLoop]) {
        return;
    }
    let on_keyword = for_stmt.for_token().map_or(false, |t| is_on_token(ctx.span(), &t));
    if !on_keyword || for_stmt.statement().is_none() {
        return;
    }

    if ctx.is_enabled(RefactoringId::ConvertForToWhile) && can_convert_to_while(for_stmt) {
        let ptr = NodePtr::new(for_stmt.syntax());
        ctx.register(RefactoringId::ConvertForToWhile, "Convert to 'while'", move |doc, _| {
            let root = doc.syntax();
            let for_stmt: ForStatement = ptr.cast(&root)?;
            let layout = Layout::of(&root);
            let mut rewriter = SyntaxRewriter::new();
            for_to_while(&mut rewriter, &layout, &for_stmt)?;
            Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
        });
    }

    if ctx.is_enabled(RefactoringId::ReverseForLoop) {
        if LoopShape::match_for(for_stmt).is_some() {
            let ptr = NodePtr::new(for_stmt.syntax());
            ctx.register(RefactoringId::ReverseForLoop, "Reverse 'for' loop", move |doc, _| {
                let root = doc.syntax();
                let for_stmt: ForStatement = ptr.cast(&root)?;
                let shape = LoopShape::match_for(&for_stmt)
                    .ok_or_else(|| RefactorError::invalid_target("loop no longer has a reversible shape"))?;
                let mut rewriter = SyntaxRewriter::new();
                shape.reverse(&mut rewriter);
                Ok(SourceChange::from_rewrite(doc, &root, &rewriter))
            });
        }
    }
}

fn can_convert_to_while(for_stmt: &ForStatement) -> bool {
    let node = for_stmt.syntax();
    let hoists = for_stmt.declaration().is_some() || !for_stmt.initializers().is_empty();
    if hoists && !is_in_statement_list(node) {
        return false;
    }
    if !for_stmt.incrementors().is_empty() && has_continue_targeting(for_stmt) {
        return false;
    }
    // Hoisted variables must not clash with names declared next to the loop.
    let (Some(declaration), Some(scope)) = (for_stmt.declaration(), node.parent()) else {
        return true;
    };
    let loop_span = span(node);
    let hoisted: Vec<String> = declaration.declarators().filter_map(|d| d.name()).collect();
    !scope.descendants().any(|other| {
        matches!(
            other.kind(),
            SyntaxKind::VariableDeclarator | SyntaxKind::ForEachStatement | SyntaxKind::CatchDeclaration
        ) && !loop_span.contains_span(span(&other))
            && support::name_token(&other).map_or(false, |t| hoisted.iter().any(|h| h == t.text()))
    })
}

fn has_continue_targeting(for_stmt: &ForStatement) -> bool {
    let node = for_stmt.syntax();
    node.descendants()
        .filter(|n| n.kind() == SyntaxKind::ContinueStatement)
        .any(|cont| {
            cont.ancestors()
                .find(|a| {
                    matches!(
                        a.kind(),
                        SyntaxKind::WhileStatement
                            | SyntaxKind::DoStatement
                            | SyntaxKind::ForStatement
                            | SyntaxKind::ForEachStatement
                    )
                })
                .as_ref()
                == Some(node)
        })
}

fn for_to_while(rewriter: &mut SyntaxRewriter, layout: &Layout, for_stmt: &ForStatement) -> Result<(), RefactorError> {
    let node = for_stmt.syntax();
    let indent = trivia::node_indentation(node);
    let body = required(for_stmt.statement(), node)?;
    let r_paren: SyntaxElement = required(token_element(node, SyntaxKind::RParen), node)?;
    let body_element: SyntaxElement = NodeOrToken::Node(body.syntax().clone());

    let mut hoisted: Vec<GreenElement> = Vec::new();
    let mut push_hoisted = |stmt: GreenNode| {
        hoisted.push(NodeOrToken::Node(stmt));
        hoisted.extend(layout.line_break(&indent));
    };
    if let Some(declaration) = for_stmt.declaration() {
        push_hoisted(make::local_decl_from(green(declaration.syntax())));
    }
    for init in for_stmt.initializers() {
        push_hoisted(make::expr_stmt(green(init.syntax())));
    }
    if !hoisted.is_empty() {
        rewriter.insert_before(node.clone(), hoisted);
    }

    let condition = match for_stmt.condition() {
        Some(condition) => green(condition.syntax()),
        None => make::bool_literal(true),
    };
    let incrementors: Vec<GreenNode> = for_stmt
        .incrementors()
        .iter()
        .map(|inc| make::expr_stmt(green(inc.syntax())))
        .collect();

    let (separator_before_body, new_body) = match (&body, incrementors.is_empty()) {
        (_, true) => (separator(&r_paren, &body_element), green(body.syntax())),
        (Stmt::Block(block), false) => match block.statements().last() {
            Some(last) => {
                let inner = trivia::node_indentation(last.syntax());
                let mut appended = Vec::new();
                for inc in incrementors {
                    appended.extend(layout.line_break(&inner));
                    appended.push(NodeOrToken::Node(inc));
                }
                let mut body_rewriter = SyntaxRewriter::new();
                body_rewriter.insert_after(last.syntax().clone(), appended);
                (separator(&r_paren, &body_element), body_rewriter.rewrite(block.syntax()))
            }
            None => (separator(&r_paren, &body_element), layout.block(incrementors, &indent)),
        },
        (_, false) => {
            let inner = layout.indented(&indent);
            let mut statements = vec![reindent_node(body.syntax(), &trivia::node_indentation(body.syntax()), &inner)];
            statements.extend(incrementors);
            (layout.line_break(&indent), layout.block(statements, &indent))
        }
    };

    let while_stmt = make::while_stmt(condition, separator_before_body, new_body);
    rewriter.replace(node.clone(), while_stmt);
    Ok(())
}

/// A `for` loop counting a single variable up or down by one.
struct LoopShape {
    name: String,
    ascending: bool,
    /// The declarator's initial value.
    init: Expr,
    condition: BinaryExpression,
    /// Bound compared against in the condition.
    bound: Expr,
    incrementor: Expr,
}

impl LoopShape {
    fn match_for(for_stmt: &ForStatement) -> Option<LoopShape> {
        if !for_stmt.initializers().is_empty() {
            return None;
        }
        let mut declarators = for_stmt.declaration()?.declarators().collect::<Vec<_>>().into_iter();
        let (Some(declarator), None) = (declarators.next(), declarators.next()) else {
            return None;
        };
        let name = declarator.name()?;
        let init = declarator.value()?;

        let Expr::BinaryExpression(condition) = for_stmt.condition()? else {
            return None;
        };
        if !is_name(&condition.lhs()?, &name) || condition.is_shift_right() {
            return None;
        }
        let bound = condition.rhs()?;

        let incrementors = for_stmt.incrementors();
        let [incrementor] = incrementors.as_slice() else {
            return None;
        };
        let step = match incrementor {
            Expr::PostfixUnaryExpression(e) if is_name(&e.operand()?, &name) => e.op_kind()?,
            Expr::PrefixUnaryExpression(e) if is_name(&e.operand()?, &name) => e.op_kind()?,
            _ => return None,
        };
        let ascending = match (condition.op_kind()?, step) {
            (SyntaxKind::Less | SyntaxKind::LessEq, SyntaxKind::PlusPlus) => true,
            (SyntaxKind::GreaterEq, SyntaxKind::MinusMinus) => false,
            _ => return None,
        };
        Some(LoopShape {
            name,
            ascending,
            init,
            condition,
            bound,
            incrementor: incrementor.clone(),
        })
    }

    /// `i = A; i < B; i++` ⇄ `i = B - 1; i >= A; i--`.
    fn reverse(&self, rewriter: &mut SyntaxRewriter) {
        let counter = || make::name_expr(&self.name);
        let (new_init, new_condition, new_step) = if self.ascending {
            let last = match self.condition.op_kind() {
                Some(SyntaxKind::Less) => minus_one(&self.bound),
                _ => green(self.bound.syntax()),
            };
            let first = parenthesize_below(green(self.init.syntax()), 11);
            (
                last,
                make::binary(counter(), SyntaxKind::GreaterEq, first),
                make::postfix_unary(counter(), SyntaxKind::MinusMinus),
            )
        } else {
            let (op, limit) = match plus_one(&self.init) {
                Some(limit) => (SyntaxKind::Less, limit),
                None => (SyntaxKind::LessEq, parenthesize_below(green(self.init.syntax()), 11)),
            };
            (
                green(self.bound.syntax()),
                make::binary(counter(), op, limit),
                make::postfix_unary(counter(), SyntaxKind::PlusPlus),
            )
        };
        rewriter.replace(self.init.syntax().clone(), new_init);
        rewriter.replace(self.condition.syntax().clone(), new_condition);
        rewriter.replace(self.incrementor.syntax().clone(), new_step);
    }
}

fn is_name(expr: &Expr, name: &str) -> bool {
    matches!(expr, Expr::NameExpression(n) if n.name().as_deref() == Some(name))
}

fn int_value(expr: &Expr) -> Option<u64> {
    let Expr::LiteralExpression(literal) = expr else {
        return None;
    };
    let token = literal.token()?;
    if token.kind() != SyntaxKind::IntLiteral || !token.text().bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    parse_int_literal(token.text()).ok()
}

/// `e ± 1` split into `e` when `expr` has that shape.
fn offset_by_one(expr: &Expr, op: SyntaxKind) -> Option<GreenNode> {
    let Expr::BinaryExpression(binary) = expr else {
        return None;
    };
    (binary.op_kind()? == op && int_value(&binary.rhs()?) == Some(1)).then_some(())?;
    Some(green(binary.lhs()?.syntax()))
}

fn minus_one(bound: &Expr) -> GreenNode {
    if let Some(value) = int_value(bound).filter(|v| *v > 0) {
        return make::literal(SyntaxKind::IntLiteral, &(value - 1).to_string());
    }
    if let Some(inner) = offset_by_one(bound, SyntaxKind::Plus) {
        return inner;
    }
    make::binary(parenthesize_below(green(bound.syntax()), ADDITIVE), SyntaxKind::Minus, make::int_literal(1))
}

/// `n + 1` for literals and `e` for `e - 1`; `None` otherwise.
fn plus_one(init: &Expr) -> Option<GreenNode> {
    if let Some(value) = int_value(init) {
        return value
            .checked_add(1)
            .map(|v| make::literal(SyntaxKind::IntLiteral, &v.to_string()));
    }
    offset_by_one(init, SyntaxKind::Minus)
}
