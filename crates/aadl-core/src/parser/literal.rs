//! Literal values and dotted type names

use super::{ParseErrorKind, ParseResult, Parser};
use crate::ast::{Expr, ExprKind, Literal, TypeName};
use crate::lexer::{TokenKind, TokenSource};

/// Resolve the escape sequences of a string or character body
///
/// Recognised escapes are `\n \t \r \\ \" \' \0`.
pub fn unescape(body: &str) -> Result<String, ParseErrorKind> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let escaped = match chars.next() {
            Some('n') => '\n',
            Some('t') => '\t',
            Some('r') => '\r',
            Some('\\') => '\\',
            Some('"') => '"',
            Some('\'') => '\'',
            Some('0') => '\0',
            Some(other) => return Err(ParseErrorKind::InvalidEscape(format!("\\{other}"))),
            None => return Err(ParseErrorKind::InvalidEscape("\\".to_string())),
        };
        out.push(escaped);
    }
    Ok(out)
}

/// Decimal integer, or octal when written with a leading zero
fn int_literal(lexeme: &str) -> Result<Literal, ParseErrorKind> {
    let invalid = || ParseErrorKind::InvalidNumber(lexeme.to_string());
    if lexeme.len() > 1 && lexeme.starts_with('0') {
        i64::from_str_radix(&lexeme[1..], 8)
            .map(Literal::Octal)
            .map_err(|_| invalid())
    } else {
        lexeme.parse().map(Literal::Int).map_err(|_| invalid())
    }
}

fn hex_literal(lexeme: &str) -> Result<Literal, ParseErrorKind> {
    let digits = lexeme
        .strip_prefix("0x")
        .or_else(|| lexeme.strip_prefix("0X"))
        .unwrap_or(lexeme);
    i64::from_str_radix(digits, 16)
        .map(Literal::Hex)
        .map_err(|_| ParseErrorKind::InvalidNumber(lexeme.to_string()))
}

fn float_literal(lexeme: &str) -> Result<Literal, ParseErrorKind> {
    lexeme
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite())
        .map(Literal::Float)
        .ok_or_else(|| ParseErrorKind::InvalidNumber(lexeme.to_string()))
}

/// Strip the delimiters around a quoted lexeme
fn quoted_body(lexeme: &str) -> &str {
    lexeme
        .get(1..lexeme.len().saturating_sub(1))
        .unwrap_or_default()
}

fn char_literal(lexeme: &str) -> Result<Literal, ParseErrorKind> {
    let text = unescape(quoted_body(lexeme))?;
    let mut chars = text.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(Literal::Char(c)),
        _ => Err(ParseErrorKind::InvalidChar(lexeme.to_string())),
    }
}

/// Convert a literal token into its value
pub(super) fn literal_value(kind: TokenKind, lexeme: &str) -> Result<Literal, ParseErrorKind> {
    match kind {
        TokenKind::Int => int_literal(lexeme),
        TokenKind::HexInt => hex_literal(lexeme),
        TokenKind::Float => float_literal(lexeme),
        TokenKind::Char => char_literal(lexeme),
        TokenKind::String => unescape(quoted_body(lexeme)).map(Literal::String),
        TokenKind::True => Ok(Literal::Bool(true)),
        TokenKind::False => Ok(Literal::Bool(false)),
        TokenKind::Null => Ok(Literal::Null),
        _ => Err(ParseErrorKind::ExpectedExpression(lexeme.to_string())),
    }
}

/// Strip `@{` and `}@` from a host code lexeme
pub(super) fn host_code_body(lexeme: &str) -> String {
    lexeme
        .strip_prefix("@{")
        .and_then(|s| s.strip_suffix("}@"))
        .unwrap_or(lexeme)
        .to_string()
}

impl<S: TokenSource> Parser<S> {
    /// Parse a literal token
    pub(super) fn literal(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let value = literal_value(token.kind, &token.lexeme)
            .map_err(|kind| Self::error_at(&token, kind))?;
        Ok(Expr::new(ExprKind::Literal(value), token.span))
    }

    /// Parse a dotted type name `a.b.C`
    pub(super) fn type_name(&mut self) -> ParseResult<TypeName> {
        if !self.check(TokenKind::Ident) {
            return Err(self.error_here(ParseErrorKind::ExpectedType(
                self.current().display_text(),
            )));
        }
        let start = self.current().span.start;
        let mut segments = vec![self.expect_ident()?];
        while self.check(TokenKind::Dot) && self.peek_kind(2) == TokenKind::Ident {
            self.advance();
            segments.push(self.expect_ident()?);
        }
        Ok(TypeName::new(segments, self.span_from(start)))
    }
}
