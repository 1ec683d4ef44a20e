use std::ops::Range;

use crate::syntax_kind::SyntaxKind;

#[derive(Debug, Clone, PartialEq)]
pub enum LiteralValue {
    Int(u64),
    Real(f64),
    Char(char),
    String(String),
    Bool(bool),
    Null,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct LiteralError {
    pub message: String,
    /// Byte range within the provided literal text (not file offsets).
    pub span: Range<usize>,
}

fn err(message: impl Into<String>, span: Range<usize>) -> LiteralError {
    LiteralError {
        message: message.into(),
        span,
    }
}

pub fn parse_literal(kind: SyntaxKind, text: &str) -> Result<LiteralValue, LiteralError> {
    match kind {
        SyntaxKind::IntLiteral => Ok(LiteralValue::Int(parse_int_literal(text)?)),
        SyntaxKind::RealLiteral => Ok(LiteralValue::Real(parse_real_literal(text)?)),
        SyntaxKind::CharLiteral => Ok(LiteralValue::Char(unescape_char_literal(text)?)),
        SyntaxKind::StringLiteral | SyntaxKind::VerbatimStringLiteral => {
            Ok(LiteralValue::String(unescape_string_literal(text)?))
        }
        SyntaxKind::TrueKw => Ok(LiteralValue::Bool(true)),
        SyntaxKind::FalseKw => Ok(LiteralValue::Bool(false)),
        SyntaxKind::NullKw => Ok(LiteralValue::Null),
        _ => Err(err(
            format!("unsupported literal kind: {kind:?}"),
            0..text.len(),
        )),
    }
}

/// Integer literal value, ignoring `_` separators and `u`/`l` suffixes.
pub fn parse_int_literal(text: &str) -> Result<u64, LiteralError> {
    let body = text.trim_end_matches(['u', 'U', 'l', 'L']);
    if body.is_empty() {
        return Err(err("empty integer literal", 0..text.len()));
    }
    let (radix, digits) = if let Some(rest) = body.strip_prefix("0x").or_else(|| body.strip_prefix("0X")) {
        (16, rest)
    } else if let Some(rest) = body.strip_prefix("0b").or_else(|| body.strip_prefix("0B")) {
        (2, rest)
    } else {
        (10, body)
    };
    let cleaned: String = digits.chars().filter(|c| *c != '_').collect();
    if cleaned.is_empty() {
        return Err(err("integer literal has no digits", 0..text.len()));
    }
    u64::from_str_radix(&cleaned, radix).map_err(|e| err(format!("invalid integer literal: {e}"), 0..body.len()))
}

pub fn parse_real_literal(text: &str) -> Result<f64, LiteralError> {
    let body = text.trim_end_matches(['f', 'F', 'd', 'D', 'm', 'M']);
    let cleaned: String = body.chars().filter(|c| *c != '_').collect();
    cleaned
        .parse::<f64>()
        .map_err(|e| err(format!("invalid real literal: {e}"), 0..body.len()))
}

pub fn unescape_char_literal(text: &str) -> Result<char, LiteralError> {
    let inner = text
        .strip_prefix('\'')
        .and_then(|t| t.strip_suffix('\''))
        .ok_or_else(|| err("char literal must be quoted", 0..text.len()))?;
    let value = unescape(inner, 1)?;
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(err("char literal must contain exactly one character", 0..text.len())),
    }
}

/// Value of a regular (`"..."`) or verbatim (`@"..."`) string literal.
pub fn unescape_string_literal(text: &str) -> Result<String, LiteralError> {
    if let Some(rest) = text.strip_prefix('@') {
        let inner = rest
            .strip_prefix('"')
            .and_then(|t| t.strip_suffix('"'))
            .ok_or_else(|| err("verbatim string literal must be quoted", 0..text.len()))?;
        return Ok(inner.replace("\"\"", "\""));
    }
    let inner = text
        .strip_prefix('"')
        .and_then(|t| t.strip_suffix('"'))
        .ok_or_else(|| err("string literal must be quoted", 0..text.len()))?;
    unescape(inner, 1)
}

fn unescape(inner: &str, offset: usize) -> Result<String, LiteralError> {
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.char_indices().peekable();
    while let Some((idx, c)) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let start = offset + idx;
        let Some((_, escape)) = chars.next() else {
            return Err(err("dangling escape", start..start + 1));
        };
        let decoded = match escape {
            '\'' => '\'',
            '"' => '"',
            '\\' => '\\',
            '0' => '\0',
            'a' => '\u{7}',
            'b' => '\u{8}',
            'f' => '\u{c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            'v' => '\u{b}',
            'u' | 'x' => {
                let mut hex = String::new();
                while hex.len() < 4 {
                    match chars.peek() {
                        Some((_, h)) if h.is_ascii_hexdigit() => {
                            hex.push(*h);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                if hex.is_empty() || (escape == 'u' && hex.len() != 4) {
                    return Err(err("invalid unicode escape", start..start + 2 + hex.len()));
                }
                u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .ok_or_else(|| err("invalid unicode escape", start..start + 2 + hex.len()))?
            }
            other => {
                return Err(err(
                    format!("unknown escape sequence `\\{other}`"),
                    start..start + 1 + other.len_utf8(),
                ))
            }
        };
        out.push(decoded);
    }
    Ok(out)
}

/// Escape `value` for the body of a regular string literal.
pub fn escape_string_literal_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '\0' => out.push_str("\\0"),
            c => out.push(c),
        }
    }
    out
}

/// Escape `value` for a text segment of a regular interpolated string.
pub fn escape_interpolated_text(value: &str) -> String {
    escape_string_literal_text(value)
        .replace('{', "{{")
        .replace('}', "}}")
}

/// Convert raw interpolated-string text (still escaped) to raw regular
/// string literal text: only the doubled braces differ.
pub fn interpolated_text_to_literal_text(raw: &str) -> String {
    raw.replace("{{", "{").replace("}}", "}")
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn integers() {
        assert_eq!(parse_int_literal("42"), Ok(42));
        assert_eq!(parse_int_literal("0x1F"), Ok(31));
        assert_eq!(parse_int_literal("0b1010"), Ok(10));
        assert_eq!(parse_int_literal("1_000UL"), Ok(1000));
        assert!(parse_int_literal("0x").is_err());
    }

    #[test]
    fn strings() {
        assert_eq!(unescape_string_literal(r#""a\tb\"c""#).unwrap(), "a\tb\"c");
        assert_eq!(unescape_string_literal(r#"@"C:\x""y""#).unwrap(), "C:\\x\"y");
        assert_eq!(unescape_string_literal(r#""\u0041""#).unwrap(), "A");
        assert!(unescape_string_literal(r#""\q""#).is_err());
        assert_eq!(unescape_char_literal("'\\n'"), Ok('\n'));
    }

    #[test]
    fn escaping() {
        assert_eq!(escape_string_literal_text("a\"b\\"), "a\\\"b\\\\");
        assert_eq!(escape_interpolated_text("{x}"), "{{x}}");
        assert_eq!(interpolated_text_to_literal_text("a{{b}}"), "a{b}");
    }
}
