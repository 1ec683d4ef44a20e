//! Lossless tokenizer for the C# subset.
//!
//! Every byte of the input ends up in exactly one token, so concatenating the
//! token texts reproduces the source. Interpolated strings are split into
//! start/text/end tokens with ordinary tokens for the holes in between.

use text_size::{TextRange, TextSize};

use crate::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl Token {
    pub fn text<'a>(&self, input: &'a str) -> &'a str {
        &input[self.range]
    }
}

pub fn lex(input: &str) -> Vec<Token> {
    Lexer::new(input).collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mode {
    Normal,
    /// Literal text of an interpolated string.
    Text { verbatim: bool },
    /// Expression tokens inside `{ ... }`; `depth` counts nested brackets.
    Hole { depth: u32 },
    /// Format clause after `:` inside a hole.
    Format,
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    modes: Vec<Mode>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            modes: vec![Mode::Normal],
        }
    }

    fn mode(&self) -> Mode {
        self.modes.last().copied().unwrap_or(Mode::Normal)
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn peek_char(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn nth_char(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    fn bump_char(&mut self) -> Option<char> {
        let c = self.peek_char()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn bump_while(&mut self, mut pred: impl FnMut(char) -> bool) {
        while let Some(c) = self.peek_char() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }

    fn token(&self, kind: SyntaxKind, start: usize) -> Token {
        Token {
            kind,
            range: TextRange::new(TextSize::from(start as u32), TextSize::from(self.pos as u32)),
        }
    }

    fn at_line_start(&self, offset: usize) -> bool {
        self.input[..offset]
            .chars()
            .rev()
            .take_while(|c| *c != '\n' && *c != '\r')
            .all(|c| c == ' ' || c == '\t')
    }

    fn next_text_token(&mut self, verbatim: bool) -> Token {
        let start = self.pos;
        loop {
            let Some(c) = self.peek_char() else {
                // Unterminated at end of input.
                self.modes.pop();
                return self.token(SyntaxKind::InterpolatedStringText, start);
            };
            match c {
                '"' if verbatim && self.nth_char(1) == Some('"') => {
                    self.pos += 2;
                }
                '"' => {
                    if self.pos > start {
                        return self.token(SyntaxKind::InterpolatedStringText, start);
                    }
                    self.pos += 1;
                    self.modes.pop();
                    return self.token(SyntaxKind::InterpolatedStringEnd, start);
                }
                '\\' if !verbatim => {
                    self.pos += 1;
                    self.bump_char();
                }
                '{' if self.nth_char(1) == Some('{') => self.pos += 2,
                '}' if self.nth_char(1) == Some('}') => self.pos += 2,
                '{' => {
                    if self.pos > start {
                        return self.token(SyntaxKind::InterpolatedStringText, start);
                    }
                    self.pos += 1;
                    self.modes.push(Mode::Hole { depth: 0 });
                    return self.token(SyntaxKind::LBrace, start);
                }
                '\n' | '\r' if !verbatim => {
                    // Unterminated regular string: give the rest of the line back to normal lexing.
                    self.modes.pop();
                    if self.pos > start {
                        return self.token(SyntaxKind::InterpolatedStringText, start);
                    }
                    return self.next_normal_token();
                }
                _ => {
                    self.bump_char();
                }
            }
        }
    }

    fn next_format_token(&mut self) -> Token {
        let start = self.pos;
        if self.peek_char() == Some('}') {
            self.pos += 1;
            self.modes.pop();
            return self.token(SyntaxKind::RBrace, start);
        }
        self.bump_while(|c| c != '}' && c != '"' && c != '\n' && c != '\r');
        if self.pos == start {
            // `"` or newline inside a format clause: close the hole.
            self.modes.pop();
            return self.next_token_inner();
        }
        self.token(SyntaxKind::InterpolatedFormatText, start)
    }

    fn next_token_inner(&mut self) -> Token {
        match self.mode() {
            Mode::Text { verbatim } => self.next_text_token(verbatim),
            Mode::Format => self.next_format_token(),
            Mode::Hole { depth } => {
                let token = self.next_normal_token();
                if let Some(Mode::Hole { depth: d }) = self.modes.last_mut() {
                    match token.kind {
                        SyntaxKind::LBrace | SyntaxKind::LParen | SyntaxKind::LBracket => *d += 1,
                        SyntaxKind::RParen | SyntaxKind::RBracket if depth > 0 => *d -= 1,
                        SyntaxKind::RBrace if depth > 0 => *d -= 1,
                        SyntaxKind::RBrace => {
                            self.modes.pop();
                        }
                        SyntaxKind::Colon if depth == 0 => {
                            if let Some(top) = self.modes.last_mut() {
                                *top = Mode::Format;
                            }
                        }
                        _ => {}
                    }
                }
                token
            }
            Mode::Normal => self.next_normal_token(),
        }
    }

    fn next_normal_token(&mut self) -> Token {
        let start = self.pos;
        let Some(c) = self.bump_char() else {
            return self.token(SyntaxKind::Eof, start);
        };

        let kind = match c {
            '\n' => SyntaxKind::Newline,
            '\r' => {
                if self.peek_char() == Some('\n') {
                    self.pos += 1;
                }
                SyntaxKind::Newline
            }
            c if c.is_whitespace() => {
                self.bump_while(|c| c.is_whitespace() && c != '\n' && c != '\r');
                SyntaxKind::Whitespace
            }
            '/' if self.peek_char() == Some('/') => {
                let doc = self.rest().starts_with("//") && !self.rest().starts_with("///");
                self.bump_while(|c| c != '\n' && c != '\r');
                if doc {
                    SyntaxKind::DocComment
                } else {
                    SyntaxKind::LineComment
                }
            }
            '/' if self.peek_char() == Some('*') => {
                self.pos += 1;
                match self.rest().find("*/") {
                    Some(end) => self.pos += end + 2,
                    None => self.pos = self.input.len(),
                }
                SyntaxKind::BlockComment
            }
            '#' if self.at_line_start(start) => {
                self.bump_while(|c| c != '\n' && c != '\r');
                SyntaxKind::Directive
            }
            '$' if self.rest().starts_with('"') => {
                self.pos += 1;
                self.modes.push(Mode::Text { verbatim: false });
                SyntaxKind::InterpolatedStringStart
            }
            '$' if self.rest().starts_with("@\"") => {
                self.pos += 2;
                self.modes.push(Mode::Text { verbatim: true });
                SyntaxKind::InterpolatedStringStart
            }
            '@' if self.rest().starts_with("$\"") => {
                self.pos += 2;
                self.modes.push(Mode::Text { verbatim: true });
                SyntaxKind::InterpolatedStringStart
            }
            '@' if self.rest().starts_with('"') => {
                self.pos += 1;
                self.lex_verbatim_string_body();
                SyntaxKind::VerbatimStringLiteral
            }
            '@' if self.peek_char().map_or(false, is_ident_start) => {
                self.bump_while(is_ident_continue);
                SyntaxKind::Identifier
            }
            '"' => {
                self.lex_quoted_body('"');
                SyntaxKind::StringLiteral
            }
            '\'' => {
                self.lex_quoted_body('\'');
                SyntaxKind::CharLiteral
            }
            c if c.is_ascii_digit() => {
                self.pos -= 1;
                self.lex_number()
            }
            '.' if self.peek_char().map_or(false, |c| c.is_ascii_digit()) => {
                self.pos -= 1;
                self.lex_number()
            }
            c if is_ident_start(c) => {
                self.bump_while(is_ident_continue);
                SyntaxKind::from_keyword(&self.input[start..self.pos])
                    .unwrap_or(SyntaxKind::Identifier)
            }
            _ => self.lex_punctuation(c),
        };
        self.token(kind, start)
    }

    fn lex_quoted_body(&mut self, quote: char) {
        while let Some(c) = self.peek_char() {
            match c {
                '\\' => {
                    self.pos += 1;
                    if matches!(self.peek_char(), Some('\n' | '\r') | None) {
                        continue;
                    }
                    self.bump_char();
                }
                '\n' | '\r' => return,
                c if c == quote => {
                    self.pos += 1;
                    return;
                }
                _ => {
                    self.bump_char();
                }
            }
        }
    }

    fn lex_verbatim_string_body(&mut self) {
        while let Some(c) = self.bump_char() {
            if c == '"' {
                if self.peek_char() == Some('"') {
                    self.pos += 1;
                } else {
                    return;
                }
            }
        }
    }

    fn lex_number(&mut self) -> SyntaxKind {
        let rest = self.rest();
        if rest.starts_with("0x") || rest.starts_with("0X") || rest.starts_with("0b") || rest.starts_with("0B") {
            self.pos += 2;
            self.bump_while(|c| c.is_ascii_hexdigit() || c == '_');
            self.bump_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            return SyntaxKind::IntLiteral;
        }

        let mut real = false;
        self.bump_while(|c| c.is_ascii_digit() || c == '_');
        if self.peek_char() == Some('.') && self.nth_char(1).map_or(false, |c| c.is_ascii_digit()) {
            real = true;
            self.pos += 1;
            self.bump_while(|c| c.is_ascii_digit() || c == '_');
        }
        if matches!(self.peek_char(), Some('e' | 'E')) {
            let sign = matches!(self.nth_char(1), Some('+' | '-'));
            let digit_at = if sign { 2 } else { 1 };
            if self.nth_char(digit_at).map_or(false, |c| c.is_ascii_digit()) {
                real = true;
                self.pos += digit_at;
                self.bump_while(|c| c.is_ascii_digit());
            }
        }
        match self.peek_char() {
            Some('f' | 'F' | 'd' | 'D' | 'm' | 'M') => {
                self.pos += 1;
                real = true;
            }
            Some('u' | 'U' | 'l' | 'L') => {
                self.bump_while(|c| matches!(c, 'u' | 'U' | 'l' | 'L'));
            }
            _ => {}
        }
        if real {
            SyntaxKind::RealLiteral
        } else {
            SyntaxKind::IntLiteral
        }
    }

    fn lex_punctuation(&mut self, c: char) -> SyntaxKind {
        let next = self.peek_char();
        let next2 = self.nth_char(1);
        let (kind, extra) = match (c, next, next2) {
            ('?', Some('?'), Some('=')) => (SyntaxKind::QuestionQuestionEq, 2),
            ('<', Some('<'), Some('=')) => (SyntaxKind::LessLessEq, 2),
            ('?', Some('?'), _) => (SyntaxKind::QuestionQuestion, 1),
            ('=', Some('>'), _) => (SyntaxKind::Arrow, 1),
            ('=', Some('='), _) => (SyntaxKind::EqEq, 1),
            ('!', Some('='), _) => (SyntaxKind::BangEq, 1),
            ('<', Some('='), _) => (SyntaxKind::LessEq, 1),
            ('>', Some('='), _) => (SyntaxKind::GreaterEq, 1),
            ('<', Some('<'), _) => (SyntaxKind::LessLess, 1),
            ('+', Some('+'), _) => (SyntaxKind::PlusPlus, 1),
            ('-', Some('-'), _) => (SyntaxKind::MinusMinus, 1),
            ('&', Some('&'), _) => (SyntaxKind::AmpAmp, 1),
            ('|', Some('|'), _) => (SyntaxKind::PipePipe, 1),
            ('+', Some('='), _) => (SyntaxKind::PlusEq, 1),
            ('-', Some('='), _) => (SyntaxKind::MinusEq, 1),
            ('*', Some('='), _) => (SyntaxKind::StarEq, 1),
            ('/', Some('='), _) => (SyntaxKind::SlashEq, 1),
            ('%', Some('='), _) => (SyntaxKind::PercentEq, 1),
            ('&', Some('='), _) => (SyntaxKind::AmpEq, 1),
            ('|', Some('='), _) => (SyntaxKind::PipeEq, 1),
            ('^', Some('='), _) => (SyntaxKind::CaretEq, 1),
            ('{', ..) => (SyntaxKind::LBrace, 0),
            ('}', ..) => (SyntaxKind::RBrace, 0),
            ('(', ..) => (SyntaxKind::LParen, 0),
            (')', ..) => (SyntaxKind::RParen, 0),
            ('[', ..) => (SyntaxKind::LBracket, 0),
            (']', ..) => (SyntaxKind::RBracket, 0),
            (';', ..) => (SyntaxKind::Semicolon, 0),
            (',', ..) => (SyntaxKind::Comma, 0),
            ('.', ..) => (SyntaxKind::Dot, 0),
            (':', ..) => (SyntaxKind::Colon, 0),
            ('?', ..) => (SyntaxKind::Question, 0),
            ('+', ..) => (SyntaxKind::Plus, 0),
            ('-', ..) => (SyntaxKind::Minus, 0),
            ('*', ..) => (SyntaxKind::Star, 0),
            ('/', ..) => (SyntaxKind::Slash, 0),
            ('%', ..) => (SyntaxKind::Percent, 0),
            ('&', ..) => (SyntaxKind::Amp, 0),
            ('|', ..) => (SyntaxKind::Pipe, 0),
            ('^', ..) => (SyntaxKind::Caret, 0),
            ('!', ..) => (SyntaxKind::Bang, 0),
            ('~', ..) => (SyntaxKind::Tilde, 0),
            ('=', ..) => (SyntaxKind::Eq, 0),
            ('<', ..) => (SyntaxKind::Less, 0),
            // `>>` and `>>=` are assembled by the parser so that nested generic
            // argument lists close one `>` at a time.
            ('>', ..) => (SyntaxKind::Greater, 0),
            _ => (SyntaxKind::Unknown, 0),
        };
        self.pos += extra;
        kind
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.input.len() {
            return None;
        }
        let token = self.next_token_inner();
        if token.kind == SyntaxKind::Eof {
            return None;
        }
        Some(token)
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || unicode_ident::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    unicode_ident::is_xid_continue(c)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn kinds(input: &str) -> Vec<(SyntaxKind, &str)> {
        lex(input)
            .into_iter()
            .map(|t| (t.kind, t.text(input)))
            .collect()
    }

    #[test]
    fn lexes_trivia_and_keywords() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("if (x) // c\r\n  return;"),
            vec![
                (IfKw, "if"),
                (Whitespace, " "),
                (LParen, "("),
                (Identifier, "x"),
                (RParen, ")"),
                (Whitespace, " "),
                (LineComment, "// c"),
                (Newline, "\r\n"),
                (Whitespace, "  "),
                (ReturnKw, "return"),
                (Semicolon, ";"),
            ]
        );
    }

    #[test]
    fn lexes_interpolated_string_with_hole_and_format() {
        use SyntaxKind::*;
        assert_eq!(
            kinds(r#"$"a{{b}}{x:N2} {f(1)}c""#),
            vec![
                (InterpolatedStringStart, "$\""),
                (InterpolatedStringText, "a{{b}}"),
                (LBrace, "{"),
                (Identifier, "x"),
                (Colon, ":"),
                (InterpolatedFormatText, "N2"),
                (RBrace, "}"),
                (InterpolatedStringText, " "),
                (LBrace, "{"),
                (Identifier, "f"),
                (LParen, "("),
                (IntLiteral, "1"),
                (RParen, ")"),
                (RBrace, "}"),
                (InterpolatedStringText, "c"),
                (InterpolatedStringEnd, "\""),
            ]
        );
    }

    #[test]
    fn lexes_literals() {
        use SyntaxKind::*;
        assert_eq!(
            kinds(r#"1 2.5f 0xFF 'a' "s\"t" @"v""w" 10L"#)
                .into_iter()
                .filter(|(k, _)| *k != Whitespace)
                .collect::<Vec<_>>(),
            vec![
                (IntLiteral, "1"),
                (RealLiteral, "2.5f"),
                (IntLiteral, "0xFF"),
                (CharLiteral, "'a'"),
                (StringLiteral, r#""s\"t""#),
                (VerbatimStringLiteral, r#"@"v""w""#),
                (IntLiteral, "10L"),
            ]
        );
    }

    #[test]
    fn prefixed_integers_are_one_token() {
        use SyntaxKind::*;
        assert_eq!(
            kinds("0x1F 0b1010 0XffUL 0")
                .into_iter()
                .filter(|(k, _)| *k != Whitespace)
                .collect::<Vec<_>>(),
            vec![(IntLiteral, "0x1F"), (IntLiteral, "0b1010"), (IntLiteral, "0XffUL"), (IntLiteral, "0")]
        );
    }

    #[test]
    fn directive_only_at_line_start() {
        let tokens = kinds("#region A\nx");
        assert_eq!(tokens[0], (SyntaxKind::Directive, "#region A"));
    }

    #[test]
    fn lexing_is_lossless() {
        let input = "class C { string s = $\"{a}\" + @\"x\"; /* unterminated";
        let text: String = lex(input).iter().map(|t| t.text(input)).collect();
        assert_eq!(text, input);
    }
}
