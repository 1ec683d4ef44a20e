//! Lossless syntax trees for a C#-like language.
//!
//! - [`parse`] builds a rowan tree for a whole compilation unit; the
//!   `parse_*_fragment` functions parse snippets used when synthesizing code.
//! - [`ast`] provides typed views over the tree.
//! - [`trivia`], [`rewrite`] and [`make`] are the building blocks for
//!   trivia-preserving transformations.

pub mod ast;
mod lexer;
mod literals;
pub mod make;
mod parser;
pub mod rewrite;
mod syntax_kind;
pub mod trivia;

pub use ast::*;
pub use lexer::{lex, Lexer, Token};
pub use literals::{
    escape_interpolated_text, escape_string_literal_text, interpolated_text_to_literal_text,
    parse_int_literal, parse_literal, parse_real_literal, unescape_char_literal,
    unescape_string_literal, LiteralError, LiteralValue,
};
pub use parser::{
    parse, parse_expression_fragment, parse_member_fragment, parse_statement_fragment,
    parse_type_fragment, Parse, ParseError, SyntaxElement, SyntaxNode, SyntaxToken,
};
pub use rewrite::{GreenElement, SyntaxRewriter};
pub use rowan::{GreenNode, GreenToken, NodeOrToken, TextRange, TextSize, WalkEvent};
pub use syntax_kind::{CSharpLanguage, SyntaxKind};
