//! Error-tolerant recursive-descent parser producing a rowan green tree.
//!
//! Trivia placement rule: trivia between two tokens of a node belongs to that
//! node; trivia before a node's first token or after its last token belongs to
//! an ancestor. A node's `text_range()` therefore covers exactly its own
//! tokens, and trivia queries (see [`crate::trivia`]) recover the usual
//! leading/trailing split on demand.

use lathe_core::TextSpan;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder};
use thiserror::Error;

use crate::lexer::{lex, Token};
use crate::syntax_kind::{CSharpLanguage, SyntaxKind};

pub type SyntaxNode = rowan::SyntaxNode<CSharpLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<CSharpLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<CSharpLanguage>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at {range:?}")]
pub struct ParseError {
    pub message: String,
    pub range: TextSpan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<ParseError>,
}

impl Parse {
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Parse a whole compilation unit. Never fails; malformed input produces
/// `Error` nodes plus [`ParseError`]s and the tree still round-trips the text.
pub fn parse(text: &str) -> Parse {
    let mut p = Parser::new(text);
    p.builder.start_node(SyntaxKind::CompilationUnit.into());
    while !p.at(SyntaxKind::Eof) {
        let before = p.sig_pos;
        p.parse_namespace_member();
        if p.sig_pos == before {
            p.error_and_bump("unexpected token at top level");
        }
    }
    p.eat_trivia();
    p.builder.finish_node();
    let parse = p.finish();
    if parse.has_errors() {
        tracing::debug!(
            target: "lathe.syntax",
            errors = parse.errors.len(),
            "compilation unit parsed with errors"
        );
    }
    parse
}

/// Parse a single expression. The expression is the first child of the `Fragment` root.
pub fn parse_expression_fragment(text: &str) -> Parse {
    parse_fragment(text, |p| p.parse_expr())
}

/// Parse a single statement. The statement is the first child of the `Fragment` root.
pub fn parse_statement_fragment(text: &str) -> Parse {
    parse_fragment(text, |p| p.parse_statement())
}

/// Parse a type reference. The type is the first child of the `Fragment` root.
pub fn parse_type_fragment(text: &str) -> Parse {
    parse_fragment(text, |p| p.parse_type())
}

/// Parse a single member declaration. The member is the first child of the `Fragment` root.
pub fn parse_member_fragment(text: &str) -> Parse {
    parse_fragment(text, |p| p.parse_member())
}

fn parse_fragment(text: &str, f: impl FnOnce(&mut Parser<'_>)) -> Parse {
    let mut p = Parser::new(text);
    p.builder.start_node(SyntaxKind::Fragment.into());
    f(&mut p);
    if !p.at(SyntaxKind::Eof) {
        p.eat_trivia();
        p.builder.start_node(SyntaxKind::Error.into());
        p.error_here("unexpected trailing input");
        while p.pos < p.tokens.len() {
            p.bump_any();
        }
        p.builder.finish_node();
    }
    p.eat_trivia();
    p.builder.finish_node();
    p.finish()
}

struct Parser<'a> {
    input: &'a str,
    tokens: Vec<Token>,
    /// Indices of non-trivia tokens.
    significant: Vec<usize>,
    pos: usize,
    sig_pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<ParseError>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        let tokens = lex(input);
        let significant = tokens
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.kind.is_trivia())
            .map(|(idx, _)| idx)
            .collect();
        Self {
            input,
            tokens,
            significant,
            pos: 0,
            sig_pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // --- Token plumbing -------------------------------------------------

    fn nth_token(&self, n: usize) -> Option<&Token> {
        self.significant
            .get(self.sig_pos + n)
            .map(|&idx| &self.tokens[idx])
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map_or(SyntaxKind::Eof, |t| t.kind)
    }

    fn nth_text(&self, n: usize) -> &'a str {
        self.nth_token(n).map_or("", |t| t.text(self.input))
    }

    fn current(&self) -> SyntaxKind {
        self.nth(0)
    }

    /// Kind of the last significant token consumed.
    fn previous(&self) -> SyntaxKind {
        self.sig_pos
            .checked_sub(1)
            .and_then(|idx| self.significant.get(idx))
            .map_or(SyntaxKind::Eof, |&idx| self.tokens[idx].kind)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    fn at_contextual(&self, text: &str) -> bool {
        self.at(SyntaxKind::Identifier) && self.nth_text(0) == text
    }

    /// True if the `n`th and `n + 1`th significant tokens touch.
    fn adjacent(&self, n: usize) -> bool {
        match (self.nth_token(n), self.nth_token(n + 1)) {
            (Some(a), Some(b)) => a.range.end() == b.range.start(),
            _ => false,
        }
    }

    fn eat_trivia(&mut self) {
        while self
            .tokens
            .get(self.pos)
            .map_or(false, |t| t.kind.is_trivia())
        {
            self.bump_any();
        }
    }

    fn bump_any(&mut self) {
        if let Some(tok) = self.tokens.get(self.pos).copied() {
            self.builder.token(tok.kind.into(), tok.text(self.input));
            self.pos += 1;
            if !tok.kind.is_trivia() {
                self.sig_pos += 1;
            }
        }
    }

    fn bump(&mut self) {
        self.eat_trivia();
        self.bump_any();
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            self.error_here(message);
            false
        }
    }

    fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn error_here(&mut self, message: &str) {
        let range = match self.nth_token(0) {
            Some(tok) => TextSpan::from(tok.range),
            None => TextSpan::at(self.input.len()),
        };
        self.errors.push(ParseError {
            message: message.to_string(),
            range,
        });
    }

    fn error_and_bump(&mut self, message: &str) {
        self.start_node(SyntaxKind::Error);
        self.error_here(message);
        self.bump();
        self.finish_node();
    }

    // --- Speculative scanning ----------------------------------------------

    /// Scans a type starting at significant token `n`; returns the position after it.
    fn scan_type(&self, mut n: usize) -> Option<usize> {
        match self.nth(n) {
            k if k.is_predefined_type() => n += 1,
            SyntaxKind::Identifier => {
                n += 1;
                loop {
                    if self.nth(n) == SyntaxKind::Less {
                        n = self.scan_type_arguments(n)?;
                    }
                    if self.nth(n) == SyntaxKind::Dot && self.nth(n + 1) == SyntaxKind::Identifier {
                        n += 2;
                        continue;
                    }
                    break;
                }
            }
            _ => return None,
        }
        loop {
            match self.nth(n) {
                SyntaxKind::Question => n += 1,
                SyntaxKind::LBracket if self.nth(n + 1) == SyntaxKind::RBracket => n += 2,
                _ => break,
            }
        }
        Some(n)
    }

    fn scan_type_arguments(&self, mut n: usize) -> Option<usize> {
        n += 1;
        loop {
            n = self.scan_type(n)?;
            match self.nth(n) {
                SyntaxKind::Comma => n += 1,
                SyntaxKind::Greater => return Some(n + 1),
                _ => return None,
            }
        }
    }

    /// Position of the `)` matching the `(` at `n`.
    fn scan_matching_paren(&self, n: usize) -> Option<usize> {
        let mut depth = 0usize;
        let mut i = n;
        loop {
            match self.nth(i) {
                SyntaxKind::LParen => depth += 1,
                SyntaxKind::RParen => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                SyntaxKind::Eof | SyntaxKind::Semicolon | SyntaxKind::LBrace | SyntaxKind::RBrace => {
                    return None
                }
                _ => {}
            }
            i += 1;
        }
    }

    fn at_local_declaration(&self) -> bool {
        let start = usize::from(self.at(SyntaxKind::ConstKw));
        let Some(after_type) = self.scan_type(start) else {
            return false;
        };
        self.nth(after_type) == SyntaxKind::Identifier
            && matches!(
                self.nth(after_type + 1),
                SyntaxKind::Eq | SyntaxKind::Semicolon | SyntaxKind::Comma
            )
    }

    fn at_lambda(&self) -> bool {
        match self.current() {
            SyntaxKind::Identifier => self.nth(1) == SyntaxKind::Arrow,
            SyntaxKind::LParen => self
                .scan_matching_paren(0)
                .map_or(false, |close| self.nth(close + 1) == SyntaxKind::Arrow),
            _ => false,
        }
    }

    fn at_cast(&self) -> bool {
        if !self.at(SyntaxKind::LParen) {
            return false;
        }
        let Some(after_type) = self.scan_type(1) else {
            return false;
        };
        if self.nth(after_type) != SyntaxKind::RParen {
            return false;
        }
        if self.nth(1).is_predefined_type() {
            return true;
        }
        let next = self.nth(after_type + 1);
        matches!(
            next,
            SyntaxKind::Identifier
                | SyntaxKind::LParen
                | SyntaxKind::ThisKw
                | SyntaxKind::BaseKw
                | SyntaxKind::NewKw
                | SyntaxKind::TypeofKw
                | SyntaxKind::Bang
                | SyntaxKind::Tilde
                | SyntaxKind::InterpolatedStringStart
        ) || next.is_literal_token()
            || next.is_predefined_type()
    }

    // --- Declarations ----------------------------------------------------

    fn parse_namespace_member(&mut self) {
        match self.current() {
            SyntaxKind::UsingKw => self.parse_using_directive(),
            SyntaxKind::NamespaceKw => self.parse_namespace(),
            _ => self.parse_member(),
        }
    }

    fn parse_using_directive(&mut self) {
        self.start_node(SyntaxKind::UsingDirective);
        self.bump();
        if self.at(SyntaxKind::StaticKw) {
            self.bump();
        }
        if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::Eq {
            self.bump();
            self.bump();
        }
        self.parse_qualified_name();
        self.expect(SyntaxKind::Semicolon, "expected `;` after using directive");
        self.finish_node();
    }

    fn parse_namespace(&mut self) {
        self.start_node(SyntaxKind::NamespaceDeclaration);
        self.bump();
        self.parse_qualified_name();
        if self.at(SyntaxKind::Semicolon) {
            // File-scoped namespace: the rest of the file are its members.
            self.bump();
            while !self.at(SyntaxKind::Eof) {
                let before = self.sig_pos;
                self.parse_namespace_member();
                if self.sig_pos == before {
                    self.error_and_bump("unexpected token in namespace");
                }
            }
        } else {
            self.expect(SyntaxKind::LBrace, "expected `{` after namespace name");
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                let before = self.sig_pos;
                self.parse_namespace_member();
                if self.sig_pos == before {
                    self.error_and_bump("unexpected token in namespace");
                }
            }
            self.expect(SyntaxKind::RBrace, "expected `}` to close namespace");
        }
        self.finish_node();
    }

    fn parse_qualified_name(&mut self) {
        self.start_node(SyntaxKind::QualifiedName);
        self.expect(SyntaxKind::Identifier, "expected name");
        while self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
            self.bump();
            self.bump();
        }
        self.finish_node();
    }

    fn parse_attribute_lists(&mut self) {
        while self.at(SyntaxKind::LBracket) {
            self.start_node(SyntaxKind::AttributeList);
            let mut depth = 0usize;
            loop {
                match self.current() {
                    SyntaxKind::LBracket => depth += 1,
                    SyntaxKind::RBracket => {
                        depth -= 1;
                        if depth == 0 {
                            self.bump();
                            break;
                        }
                    }
                    SyntaxKind::Eof => {
                        self.error_here("expected `]` to close attribute list");
                        break;
                    }
                    _ => {}
                }
                self.bump();
            }
            self.finish_node();
        }
    }

    fn at_modifier(&self) -> bool {
        let kind = self.current();
        if kind.is_modifier() {
            // `new` starting an expression is not a modifier, but members never start with one.
            return true;
        }
        (self.at_contextual("partial") || self.at_contextual("async"))
            && (self.nth(1) == SyntaxKind::Identifier || self.nth(1).is_keyword())
    }

    fn parse_modifiers(&mut self) {
        if !self.at_modifier() {
            return;
        }
        self.start_node(SyntaxKind::Modifiers);
        while self.at_modifier() {
            self.bump();
        }
        self.finish_node();
    }

    /// Type or member declaration, starting with optional attributes and modifiers.
    fn parse_member(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_attribute_lists();
        self.parse_modifiers();

        match self.current() {
            SyntaxKind::ClassKw => self.parse_type_declaration(checkpoint, SyntaxKind::ClassDeclaration),
            SyntaxKind::StructKw => {
                self.parse_type_declaration(checkpoint, SyntaxKind::StructDeclaration)
            }
            SyntaxKind::InterfaceKw => {
                self.parse_type_declaration(checkpoint, SyntaxKind::InterfaceDeclaration)
            }
            SyntaxKind::EnumKw => self.parse_enum_declaration(checkpoint),
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::LParen => {
                self.parse_constructor(checkpoint)
            }
            _ => match self.scan_type(0) {
                Some(after_type) if self.nth(after_type) == SyntaxKind::Identifier => {
                    match self.nth(after_type + 1) {
                        SyntaxKind::LParen | SyntaxKind::Less => self.parse_method(checkpoint),
                        SyntaxKind::LBrace | SyntaxKind::Arrow => self.parse_property(checkpoint),
                        _ => self.parse_field(checkpoint),
                    }
                }
                _ => self.recover_member(checkpoint),
            },
        }
    }

    fn recover_member(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::Error);
        self.error_here("expected member declaration");
        let mut depth = 0usize;
        let mut skipped = false;
        loop {
            match self.current() {
                SyntaxKind::Eof => break,
                SyntaxKind::RBrace if depth == 0 => break,
                _ if depth == 0 && skipped && self.at_member_start() => break,
                SyntaxKind::LBrace => depth += 1,
                SyntaxKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        self.bump();
                        break;
                    }
                }
                SyntaxKind::Semicolon if depth == 0 => {
                    self.bump();
                    break;
                }
                _ => {}
            }
            self.bump();
            skipped = true;
        }
        self.finish_node();
    }

    /// Whether the current token can begin a member, so recovery can stop
    /// in front of it.
    fn at_member_start(&self) -> bool {
        if self.at_modifier() {
            return true;
        }
        match self.current() {
            SyntaxKind::ClassKw
            | SyntaxKind::StructKw
            | SyntaxKind::InterfaceKw
            | SyntaxKind::EnumKw
            | SyntaxKind::LBracket => true,
            SyntaxKind::Identifier if self.nth(1) == SyntaxKind::LParen => true,
            _ => matches!(self.scan_type(0), Some(after_type) if self.nth(after_type) == SyntaxKind::Identifier),
        }
    }

    fn parse_type_declaration(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.start_node_at(checkpoint, kind);
        self.bump();
        self.expect(SyntaxKind::Identifier, "expected type name");
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        if self.expect(SyntaxKind::LBrace, "expected `{`") {
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                let before = self.sig_pos;
                self.parse_member();
                if self.sig_pos == before {
                    self.error_and_bump("unexpected token in type body");
                }
            }
            self.expect(SyntaxKind::RBrace, "expected `}`");
        }
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        }
        self.finish_node();
    }

    fn parse_type_parameter_list(&mut self) {
        self.start_node(SyntaxKind::TypeParameterList);
        self.bump();
        loop {
            self.start_node(SyntaxKind::TypeParameter);
            if self.at_contextual("in") || self.at(SyntaxKind::InKw) || self.at(SyntaxKind::OutKw) {
                self.bump();
            }
            self.expect(SyntaxKind::Identifier, "expected type parameter name");
            self.finish_node();
            if self.at(SyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(SyntaxKind::Greater, "expected `>`");
        self.finish_node();
    }

    fn parse_base_list(&mut self) {
        self.start_node(SyntaxKind::BaseList);
        self.bump();
        self.parse_type();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
        self.finish_node();
    }

    fn parse_enum_declaration(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::EnumDeclaration);
        self.bump();
        self.expect(SyntaxKind::Identifier, "expected enum name");
        if self.at(SyntaxKind::Colon) {
            self.parse_base_list();
        }
        if self.expect(SyntaxKind::LBrace, "expected `{`") {
            while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                self.start_node(SyntaxKind::EnumMemberDeclaration);
                self.parse_attribute_lists();
                self.expect(SyntaxKind::Identifier, "expected enum member name");
                if self.at(SyntaxKind::Eq) {
                    self.parse_equals_value_clause();
                }
                self.finish_node();
                if self.at(SyntaxKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
            self.expect(SyntaxKind::RBrace, "expected `}`");
        }
        if self.at(SyntaxKind::Semicolon) {
            self.bump();
        }
        self.finish_node();
    }

    fn parse_field(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::FieldDeclaration);
        self.parse_variable_declaration();
        self.expect(SyntaxKind::Semicolon, "expected `;` after field declaration");
        self.finish_node();
    }

    fn parse_property(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::PropertyDeclaration);
        self.parse_type();
        self.bump();
        if self.at(SyntaxKind::Arrow) {
            self.parse_arrow_expression_clause();
            self.expect(SyntaxKind::Semicolon, "expected `;`");
        } else {
            self.parse_accessor_list();
            if self.at(SyntaxKind::Eq) {
                self.parse_equals_value_clause();
                self.expect(SyntaxKind::Semicolon, "expected `;` after property initializer");
            }
        }
        self.finish_node();
    }

    fn parse_accessor_list(&mut self) {
        self.start_node(SyntaxKind::AccessorList);
        self.bump();
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            self.start_node(SyntaxKind::AccessorDeclaration);
            self.parse_attribute_lists();
            self.parse_modifiers();
            if self.at_contextual("get") || self.at_contextual("set") || self.at_contextual("init") {
                self.bump();
            } else {
                self.error_here("expected `get`, `set` or `init`");
                if !self.at(SyntaxKind::RBrace) {
                    self.bump();
                }
            }
            self.parse_member_body();
            self.finish_node();
        }
        self.expect(SyntaxKind::RBrace, "expected `}` to close accessor list");
        self.finish_node();
    }

    fn parse_method(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::MethodDeclaration);
        self.parse_type();
        self.bump();
        if self.at(SyntaxKind::Less) {
            self.parse_type_parameter_list();
        }
        self.parse_parameter_list();
        self.parse_member_body();
        self.finish_node();
    }

    fn parse_constructor(&mut self, checkpoint: Checkpoint) {
        self.start_node_at(checkpoint, SyntaxKind::ConstructorDeclaration);
        self.bump();
        self.parse_parameter_list();
        if self.at(SyntaxKind::Colon) {
            self.start_node(SyntaxKind::ConstructorInitializer);
            self.bump();
            if self.at(SyntaxKind::BaseKw) || self.at(SyntaxKind::ThisKw) {
                self.bump();
            } else {
                self.error_here("expected `base` or `this`");
            }
            self.parse_argument_list();
            self.finish_node();
        }
        self.parse_member_body();
        self.finish_node();
    }

    /// `{ ... }`, `=> expr;` or `;`.
    fn parse_member_body(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::Arrow => {
                self.parse_arrow_expression_clause();
                self.expect(SyntaxKind::Semicolon, "expected `;`");
            }
            _ => {
                self.expect(SyntaxKind::Semicolon, "expected body or `;`");
            }
        }
    }

    fn parse_arrow_expression_clause(&mut self) {
        self.start_node(SyntaxKind::ArrowExpressionClause);
        self.bump();
        self.parse_expr();
        self.finish_node();
    }

    fn parse_parameter_list(&mut self) {
        self.start_node(SyntaxKind::ParameterList);
        self.expect(SyntaxKind::LParen, "expected `(`");
        if !self.at(SyntaxKind::RParen) {
            loop {
                self.parse_parameter();
                if self.at(SyntaxKind::Comma) {
                    self.bump();
                } else {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.finish_node();
    }

    fn parse_parameter(&mut self) {
        self.start_node(SyntaxKind::Parameter);
        self.parse_attribute_lists();
        while matches!(
            self.current(),
            SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw | SyntaxKind::ParamsKw | SyntaxKind::ThisKw
        ) {
            self.bump();
        }
        let implicit = self.at(SyntaxKind::Identifier)
            && matches!(self.nth(1), SyntaxKind::Comma | SyntaxKind::RParen);
        if !implicit {
            self.parse_type();
        }
        self.expect(SyntaxKind::Identifier, "expected parameter name");
        if self.at(SyntaxKind::Eq) {
            self.parse_equals_value_clause();
        }
        self.finish_node();
    }

    fn parse_variable_declaration(&mut self) {
        self.start_node(SyntaxKind::VariableDeclaration);
        self.parse_type();
        self.parse_variable_declarator();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_variable_declarator();
        }
        self.finish_node();
    }

    fn parse_variable_declarator(&mut self) {
        self.start_node(SyntaxKind::VariableDeclarator);
        self.expect(SyntaxKind::Identifier, "expected variable name");
        if self.at(SyntaxKind::Eq) {
            self.parse_equals_value_clause();
        }
        self.finish_node();
    }

    fn parse_equals_value_clause(&mut self) {
        self.start_node(SyntaxKind::EqualsValueClause);
        self.bump();
        if self.at(SyntaxKind::LBrace) {
            self.parse_initializer();
        } else {
            self.parse_expr();
        }
        self.finish_node();
    }

    // --- Types -----------------------------------------------------------

    fn parse_type(&mut self) {
        self.parse_type_with(true);
    }

    /// Types after `is`/`as` only take a `?` suffix when nothing expression-like follows.
    fn parse_type_in_expression(&mut self) {
        self.parse_type_with(false);
    }

    fn parse_type_with(&mut self, greedy_nullable: bool) {
        let checkpoint = self.checkpoint();
        match self.current() {
            kind if kind.is_predefined_type() => {
                self.start_node(SyntaxKind::PredefinedType);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::Identifier => {
                self.start_node(SyntaxKind::NamedType);
                self.bump();
                loop {
                    if self.at(SyntaxKind::Less) && self.scan_type_arguments(0).is_some() {
                        self.parse_type_argument_list();
                    }
                    if self.at(SyntaxKind::Dot) && self.nth(1) == SyntaxKind::Identifier {
                        self.bump();
                        self.bump();
                        continue;
                    }
                    break;
                }
                self.finish_node();
            }
            _ => {
                self.error_here("expected type");
                return;
            }
        }
        loop {
            match self.current() {
                SyntaxKind::Question
                    if greedy_nullable
                        || matches!(
                            self.nth(1),
                            SyntaxKind::RParen
                                | SyntaxKind::Semicolon
                                | SyntaxKind::Comma
                                | SyntaxKind::RBracket
                                | SyntaxKind::RBrace
                                | SyntaxKind::Eof
                        ) =>
                {
                    self.start_node_at(checkpoint, SyntaxKind::NullableType);
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::LBracket if self.nth(1) == SyntaxKind::RBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::ArrayType);
                    self.bump();
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_type_argument_list(&mut self) {
        self.start_node(SyntaxKind::TypeArgumentList);
        self.bump();
        self.parse_type();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_type();
        }
        self.expect(SyntaxKind::Greater, "expected `>`");
        self.finish_node();
    }

    // --- Statements ------------------------------------------------------

    fn parse_block(&mut self) {
        self.start_node(SyntaxKind::Block);
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            let before = self.sig_pos;
            self.parse_statement();
            if self.sig_pos == before {
                self.error_and_bump("expected statement");
            }
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.finish_node();
    }

    fn parse_statement(&mut self) {
        match self.current() {
            SyntaxKind::LBrace => self.parse_block(),
            SyntaxKind::Semicolon => {
                self.start_node(SyntaxKind::EmptyStatement);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::IfKw => self.parse_if(),
            SyntaxKind::WhileKw => self.parse_while(),
            SyntaxKind::DoKw => self.parse_do(),
            SyntaxKind::ForKw => self.parse_for(),
            SyntaxKind::ForeachKw => self.parse_foreach(),
            SyntaxKind::ReturnKw => self.parse_jump_with_expression(SyntaxKind::ReturnStatement),
            SyntaxKind::ThrowKw => self.parse_jump_with_expression(SyntaxKind::ThrowStatement),
            SyntaxKind::BreakKw => self.parse_simple_jump(SyntaxKind::BreakStatement),
            SyntaxKind::ContinueKw => self.parse_simple_jump(SyntaxKind::ContinueStatement),
            SyntaxKind::TryKw => self.parse_try(),
            SyntaxKind::SwitchKw => self.parse_switch(),
            SyntaxKind::RBrace | SyntaxKind::Eof => self.error_here("expected statement"),
            _ if self.at_local_declaration() => {
                self.start_node(SyntaxKind::LocalDeclarationStatement);
                if self.at(SyntaxKind::ConstKw) {
                    self.bump();
                }
                self.parse_variable_declaration();
                self.expect(SyntaxKind::Semicolon, "expected `;` after local declaration");
                self.finish_node();
            }
            _ => {
                self.start_node(SyntaxKind::ExpressionStatement);
                self.parse_expr();
                self.expect(SyntaxKind::Semicolon, "expected `;` after expression");
                self.finish_node();
            }
        }
    }

    fn parse_parenthesized_condition(&mut self) {
        self.expect(SyntaxKind::LParen, "expected `(`");
        self.parse_expr();
        self.expect(SyntaxKind::RParen, "expected `)`");
    }

    fn parse_if(&mut self) {
        self.start_node(SyntaxKind::IfStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_statement();
        if self.at(SyntaxKind::ElseKw) {
            self.start_node(SyntaxKind::ElseClause);
            self.bump();
            self.parse_statement();
            self.finish_node();
        }
        self.finish_node();
    }

    fn parse_while(&mut self) {
        self.start_node(SyntaxKind::WhileStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.parse_statement();
        self.finish_node();
    }

    fn parse_do(&mut self) {
        self.start_node(SyntaxKind::DoStatement);
        self.bump();
        self.parse_statement();
        self.expect(SyntaxKind::WhileKw, "expected `while` after do body");
        self.parse_parenthesized_condition();
        self.expect(SyntaxKind::Semicolon, "expected `;` after do statement");
        self.finish_node();
    }

    fn parse_expression_list_until(&mut self, terminator: SyntaxKind) {
        if self.at(terminator) {
            return;
        }
        self.parse_expr();
        while self.at(SyntaxKind::Comma) {
            self.bump();
            self.parse_expr();
        }
    }

    fn parse_for(&mut self) {
        self.start_node(SyntaxKind::ForStatement);
        self.bump();
        self.expect(SyntaxKind::LParen, "expected `(`");
        if self.at_local_declaration() {
            self.parse_variable_declaration();
        } else {
            self.parse_expression_list_until(SyntaxKind::Semicolon);
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after for initializer");
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expr();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;` after for condition");
        self.parse_expression_list_until(SyntaxKind::RParen);
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.parse_statement();
        self.finish_node();
    }

    fn parse_foreach(&mut self) {
        self.start_node(SyntaxKind::ForEachStatement);
        self.bump();
        self.expect(SyntaxKind::LParen, "expected `(`");
        self.parse_type();
        self.expect(SyntaxKind::Identifier, "expected loop variable name");
        self.expect(SyntaxKind::InKw, "expected `in`");
        self.parse_expr();
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.parse_statement();
        self.finish_node();
    }

    fn parse_jump_with_expression(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        if !self.at(SyntaxKind::Semicolon) {
            self.parse_expr();
        }
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        self.finish_node();
    }

    fn parse_simple_jump(&mut self, kind: SyntaxKind) {
        self.start_node(kind);
        self.bump();
        self.expect(SyntaxKind::Semicolon, "expected `;`");
        self.finish_node();
    }

    fn parse_try(&mut self) {
        self.start_node(SyntaxKind::TryStatement);
        self.bump();
        self.parse_block();
        while self.at(SyntaxKind::CatchKw) {
            self.start_node(SyntaxKind::CatchClause);
            self.bump();
            if self.at(SyntaxKind::LParen) {
                self.start_node(SyntaxKind::CatchDeclaration);
                self.bump();
                self.parse_type();
                if self.at(SyntaxKind::Identifier) {
                    self.bump();
                }
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.finish_node();
            }
            if self.at_contextual("when") {
                self.bump();
                self.parse_parenthesized_condition();
            }
            self.parse_block();
            self.finish_node();
        }
        if self.at(SyntaxKind::FinallyKw) {
            self.start_node(SyntaxKind::FinallyClause);
            self.bump();
            self.parse_block();
            self.finish_node();
        }
        self.finish_node();
    }

    fn at_switch_label(&self) -> bool {
        self.at(SyntaxKind::CaseKw) || (self.at(SyntaxKind::DefaultKw) && self.nth(1) == SyntaxKind::Colon)
    }

    fn parse_switch(&mut self) {
        self.start_node(SyntaxKind::SwitchStatement);
        self.bump();
        self.parse_parenthesized_condition();
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if !self.at_switch_label() {
                self.error_and_bump("expected `case` or `default`");
                continue;
            }
            self.start_node(SyntaxKind::SwitchSection);
            while self.at_switch_label() {
                if self.at(SyntaxKind::CaseKw) {
                    self.start_node(SyntaxKind::CaseSwitchLabel);
                    self.bump();
                    self.parse_expr();
                } else {
                    self.start_node(SyntaxKind::DefaultSwitchLabel);
                    self.bump();
                }
                self.expect(SyntaxKind::Colon, "expected `:`");
                self.finish_node();
            }
            while !self.at_switch_label() && !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
                let before = self.sig_pos;
                self.parse_statement();
                if self.sig_pos == before {
                    self.error_and_bump("expected statement");
                }
            }
            self.finish_node();
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.finish_node();
    }

    // --- Expressions -----------------------------------------------------

    fn parse_expr(&mut self) {
        if self.at_lambda() {
            self.parse_lambda();
            return;
        }
        if self.at(SyntaxKind::ThrowKw) {
            self.start_node(SyntaxKind::ThrowExpression);
            self.bump();
            self.parse_expr();
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();
        self.parse_conditional();
        if self.current().is_assignment_operator() {
            self.start_node_at(checkpoint, SyntaxKind::AssignmentExpression);
            self.bump();
            self.parse_expr();
            self.finish_node();
        }
    }

    fn parse_conditional(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_binary(0);
        if self.at(SyntaxKind::Question) {
            self.start_node_at(checkpoint, SyntaxKind::ConditionalExpression);
            self.bump();
            self.parse_expr();
            self.expect(SyntaxKind::Colon, "expected `:` in conditional expression");
            self.parse_expr();
            self.finish_node();
        }
    }

    /// Operator at the cursor: (token count, left binding power, right binding power).
    fn binary_operator(&self) -> Option<(usize, u8, u8)> {
        Some(match self.current() {
            SyntaxKind::QuestionQuestion => (1, 3, 3),
            SyntaxKind::PipePipe => (1, 4, 5),
            SyntaxKind::AmpAmp => (1, 5, 6),
            SyntaxKind::Pipe => (1, 6, 7),
            SyntaxKind::Caret => (1, 7, 8),
            SyntaxKind::Amp => (1, 8, 9),
            SyntaxKind::EqEq | SyntaxKind::BangEq => (1, 9, 10),
            SyntaxKind::Greater if self.nth(1) == SyntaxKind::Greater && self.adjacent(0) => (2, 11, 12),
            SyntaxKind::Less
            | SyntaxKind::LessEq
            | SyntaxKind::Greater
            | SyntaxKind::GreaterEq
            | SyntaxKind::IsKw
            | SyntaxKind::AsKw => (1, 10, 11),
            SyntaxKind::LessLess => (1, 11, 12),
            SyntaxKind::Plus | SyntaxKind::Minus => (1, 12, 13),
            SyntaxKind::Star | SyntaxKind::Slash | SyntaxKind::Percent => (1, 13, 14),
            _ => return None,
        })
    }

    fn parse_binary(&mut self, min_bp: u8) {
        let checkpoint = self.checkpoint();
        self.parse_unary();
        while let Some((tokens, l_bp, r_bp)) = self.binary_operator() {
            if l_bp < min_bp {
                break;
            }
            let is_type_test = matches!(self.current(), SyntaxKind::IsKw | SyntaxKind::AsKw);
            self.start_node_at(checkpoint, SyntaxKind::BinaryExpression);
            for _ in 0..tokens {
                self.bump();
            }
            if is_type_test {
                self.parse_type_pattern();
            } else {
                self.parse_binary(r_bp);
            }
            self.finish_node();
        }
    }

    /// Right-hand side of `is`/`as`: a type or a constant pattern (`null`, `not null`, literals).
    fn parse_type_pattern(&mut self) {
        if self.at_contextual("not") {
            self.bump();
        }
        if self.current().is_literal_token() || self.at(SyntaxKind::Minus) {
            self.parse_unary();
        } else {
            self.parse_type_in_expression();
        }
    }

    fn parse_unary(&mut self) {
        match self.current() {
            SyntaxKind::Plus
            | SyntaxKind::Minus
            | SyntaxKind::Bang
            | SyntaxKind::Tilde
            | SyntaxKind::PlusPlus
            | SyntaxKind::MinusMinus => {
                self.start_node(SyntaxKind::PrefixUnaryExpression);
                self.bump();
                self.parse_unary();
                self.finish_node();
            }
            SyntaxKind::LParen if self.at_cast() => {
                self.start_node(SyntaxKind::CastExpression);
                self.bump();
                self.parse_type();
                self.expect(SyntaxKind::RParen, "expected `)` in cast");
                self.parse_unary();
                self.finish_node();
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) {
        let checkpoint = self.checkpoint();
        self.parse_primary();
        loop {
            match self.current() {
                SyntaxKind::Dot if self.nth(1) == SyntaxKind::Identifier => {
                    self.start_node_at(checkpoint, SyntaxKind::MemberAccessExpression);
                    self.bump();
                    self.bump();
                    self.finish_node();
                }
                SyntaxKind::LParen => {
                    self.start_node_at(checkpoint, SyntaxKind::InvocationExpression);
                    self.parse_argument_list();
                    self.finish_node();
                }
                SyntaxKind::LBracket => {
                    self.start_node_at(checkpoint, SyntaxKind::ElementAccessExpression);
                    self.parse_bracketed_argument_list();
                    self.finish_node();
                }
                SyntaxKind::PlusPlus | SyntaxKind::MinusMinus => {
                    self.start_node_at(checkpoint, SyntaxKind::PostfixUnaryExpression);
                    self.bump();
                    self.finish_node();
                }
                _ => break,
            }
        }
    }

    fn parse_primary(&mut self) {
        match self.current() {
            kind if kind.is_literal_token() && kind != SyntaxKind::DefaultKw => {
                self.start_node(SyntaxKind::LiteralExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::DefaultKw => {
                self.start_node(SyntaxKind::LiteralExpression);
                self.bump();
                if self.at(SyntaxKind::LParen) {
                    self.bump();
                    self.parse_type();
                    self.expect(SyntaxKind::RParen, "expected `)`");
                }
                self.finish_node();
            }
            SyntaxKind::InterpolatedStringStart => self.parse_interpolated_string(),
            SyntaxKind::Identifier => {
                self.start_node(SyntaxKind::NameExpression);
                self.bump();
                self.finish_node();
            }
            kind if kind.is_predefined_type() => {
                self.start_node(SyntaxKind::NameExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::ThisKw => {
                self.start_node(SyntaxKind::ThisExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::BaseKw => {
                self.start_node(SyntaxKind::BaseExpression);
                self.bump();
                self.finish_node();
            }
            SyntaxKind::NewKw => self.parse_creation(),
            SyntaxKind::TypeofKw => {
                self.start_node(SyntaxKind::TypeOfExpression);
                self.bump();
                self.expect(SyntaxKind::LParen, "expected `(`");
                self.parse_type();
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.finish_node();
            }
            SyntaxKind::LParen => {
                self.start_node(SyntaxKind::ParenthesizedExpression);
                self.bump();
                self.parse_expr();
                self.expect(SyntaxKind::RParen, "expected `)`");
                self.finish_node();
            }
            SyntaxKind::RBrace
            | SyntaxKind::RParen
            | SyntaxKind::RBracket
            | SyntaxKind::Semicolon
            | SyntaxKind::Comma
            | SyntaxKind::Eof => self.error_here("expected expression"),
            _ => self.error_and_bump("expected expression"),
        }
    }

    fn parse_creation(&mut self) {
        let checkpoint = self.checkpoint();
        self.bump();
        if self.at(SyntaxKind::LBracket) {
            self.start_node_at(checkpoint, SyntaxKind::ArrayCreationExpression);
            self.bump();
            self.expect(SyntaxKind::RBracket, "expected `]`");
            self.parse_initializer();
            self.finish_node();
            return;
        }
        self.parse_type();
        if self.at(SyntaxKind::LBracket) {
            self.start_node_at(checkpoint, SyntaxKind::ArrayCreationExpression);
            self.parse_bracketed_argument_list();
            if self.at(SyntaxKind::LBrace) {
                self.parse_initializer();
            }
            self.finish_node();
            return;
        }
        if self.previous() == SyntaxKind::RBracket {
            // `new T[] { ... }`: the rank was parsed into the array type.
            self.start_node_at(checkpoint, SyntaxKind::ArrayCreationExpression);
            if self.at(SyntaxKind::LBrace) {
                self.parse_initializer();
            }
            self.finish_node();
            return;
        }
        self.start_node_at(checkpoint, SyntaxKind::ObjectCreationExpression);
        if self.at(SyntaxKind::LParen) {
            self.parse_argument_list();
        }
        if self.at(SyntaxKind::LBrace) {
            self.parse_initializer();
        }
        self.finish_node();
    }

    fn parse_initializer(&mut self) {
        self.start_node(SyntaxKind::InitializerExpression);
        self.expect(SyntaxKind::LBrace, "expected `{`");
        while !self.at(SyntaxKind::RBrace) && !self.at(SyntaxKind::Eof) {
            if self.at(SyntaxKind::LBrace) {
                self.parse_initializer();
            } else {
                let before = self.sig_pos;
                self.parse_expr();
                if self.sig_pos == before {
                    self.error_and_bump("expected initializer element");
                    continue;
                }
            }
            if self.at(SyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
        self.expect(SyntaxKind::RBrace, "expected `}`");
        self.finish_node();
    }

    fn parse_argument_list(&mut self) {
        self.start_node(SyntaxKind::ArgumentList);
        self.bump();
        self.parse_arguments(SyntaxKind::RParen);
        self.expect(SyntaxKind::RParen, "expected `)`");
        self.finish_node();
    }

    fn parse_bracketed_argument_list(&mut self) {
        self.start_node(SyntaxKind::BracketedArgumentList);
        self.bump();
        self.parse_arguments(SyntaxKind::RBracket);
        self.expect(SyntaxKind::RBracket, "expected `]`");
        self.finish_node();
    }

    fn parse_arguments(&mut self, terminator: SyntaxKind) {
        if self.at(terminator) {
            return;
        }
        loop {
            self.start_node(SyntaxKind::Argument);
            if self.at(SyntaxKind::Identifier) && self.nth(1) == SyntaxKind::Colon {
                self.bump();
                self.bump();
            }
            if matches!(self.current(), SyntaxKind::RefKw | SyntaxKind::OutKw | SyntaxKind::InKw) {
                let is_out = self.at(SyntaxKind::OutKw);
                self.bump();
                let declares = is_out
                    && self.scan_type(0).map_or(false, |after| {
                        self.nth(after) == SyntaxKind::Identifier
                            && matches!(self.nth(after + 1), SyntaxKind::Comma | SyntaxKind::RParen)
                    });
                if declares {
                    self.parse_type();
                    self.bump();
                    self.finish_node();
                    if self.at(SyntaxKind::Comma) {
                        self.bump();
                        continue;
                    }
                    break;
                }
            }
            self.parse_expr();
            self.finish_node();
            if self.at(SyntaxKind::Comma) {
                self.bump();
            } else {
                break;
            }
        }
    }

    fn parse_interpolated_string(&mut self) {
        self.start_node(SyntaxKind::InterpolatedStringExpression);
        self.bump();
        loop {
            match self.current() {
                SyntaxKind::InterpolatedStringText => self.bump(),
                SyntaxKind::LBrace => {
                    self.start_node(SyntaxKind::Interpolation);
                    self.bump();
                    self.parse_expr();
                    if self.at(SyntaxKind::Comma) {
                        self.start_node(SyntaxKind::InterpolationAlignmentClause);
                        self.bump();
                        self.parse_expr();
                        self.finish_node();
                    }
                    if self.at(SyntaxKind::Colon) {
                        self.start_node(SyntaxKind::InterpolationFormatClause);
                        self.bump();
                        if self.at(SyntaxKind::InterpolatedFormatText) {
                            self.bump();
                        }
                        self.finish_node();
                    }
                    self.expect(SyntaxKind::RBrace, "expected `}` to close interpolation");
                    self.finish_node();
                }
                SyntaxKind::InterpolatedStringEnd => {
                    self.bump();
                    break;
                }
                _ => {
                    self.error_here("unterminated interpolated string");
                    break;
                }
            }
        }
        self.finish_node();
    }

    fn parse_lambda(&mut self) {
        self.start_node(SyntaxKind::LambdaExpression);
        if self.at(SyntaxKind::Identifier) {
            self.start_node(SyntaxKind::Parameter);
            self.bump();
            self.finish_node();
        } else {
            self.parse_parameter_list();
        }
        self.expect(SyntaxKind::Arrow, "expected `=>`");
        if self.at(SyntaxKind::LBrace) {
            self.parse_block();
        } else {
            self.parse_expr();
        }
        self.finish_node();
    }
}
