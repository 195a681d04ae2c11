//! Parser error types for AADL

use crate::lexer::{Location, Span, SpannedError, TokenKind};
use thiserror::Error;

/// A parser error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    /// The kind of error
    pub kind: ParseErrorKind,
    /// Source range of the offending token
    pub span: Span,
    /// Line and column of the offending token
    pub location: Location,
    /// Optional hint for fixing the error
    pub hint: Option<String>,
}

impl ParseError {
    #[must_use]
    pub fn new(kind: ParseErrorKind, span: Span, location: Location) -> Self {
        Self {
            kind,
            span,
            location,
            hint: None,
        }
    }

    /// Add a hint to this error
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    /// The diagnostic text without position
    #[must_use]
    pub fn message(&self) -> String {
        match &self.hint {
            Some(hint) => format!("{} (hint: {hint})", self.kind),
            None => self.kind.to_string(),
        }
    }
}

impl From<SpannedError> for ParseError {
    fn from(error: SpannedError) -> Self {
        Self::new(
            ParseErrorKind::Lexical(error.error.to_string()),
            error.span,
            error.location,
        )
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.message(), self.location)
    }
}

impl std::error::Error for ParseError {}

/// The kind of parse error
///
/// Token texts are quoted the way they appear in the source, `<EOF>` for
/// the end of input.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    #[error("mismatched input '{found}' expecting {expected}")]
    UnexpectedToken {
        found: String,
        expected: ExpectedToken,
    },

    /// One stray token was deleted before the expected one
    #[error("extraneous input '{found}' expecting {expected}")]
    ExtraneousInput {
        found: String,
        expected: ExpectedToken,
    },

    /// A missing token was assumed present
    #[error("missing '{expected}' at '{found}'")]
    MissingToken { expected: TokenKind, found: String },

    #[error("no viable alternative at input '{0}', expected expression")]
    ExpectedExpression(String),

    #[error("no viable alternative at input '{0}', expected statement")]
    ExpectedStatement(String),

    #[error("expected identifier at '{0}'")]
    ExpectedIdentifier(String),

    #[error("expected type name at '{0}'")]
    ExpectedType(String),

    /// A brace block whose leading expression is followed by neither `|` nor `;`
    #[error("ambiguous block at '{0}': expected '|' or ';' after the leading expression")]
    AmbiguousBlock(String),

    #[error("invalid list source '{0}': expected a file, name, array or method call")]
    InvalidListSource(String),

    #[error("invalid number literal: {0}")]
    InvalidNumber(String),

    #[error("invalid escape sequence: {0}")]
    InvalidEscape(String),

    #[error("invalid character literal: {0}")]
    InvalidChar(String),

    #[error("{0}")]
    Lexical(String),
}

/// What token was expected
#[derive(Debug, Clone, PartialEq)]
pub enum ExpectedToken {
    /// A specific token kind
    Token(TokenKind),
    /// One of several possible tokens
    OneOf(Vec<TokenKind>),
    /// A description of what was expected
    Description(String),
}

fn quoted(kind: TokenKind) -> String {
    if kind.is_literal() || matches!(kind, TokenKind::Ident | TokenKind::HostCode | TokenKind::Eof)
    {
        kind.to_string()
    } else {
        format!("'{kind}'")
    }
}

impl std::fmt::Display for ExpectedToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpectedToken::Token(kind) => write!(f, "{}", quoted(*kind)),
            ExpectedToken::OneOf(kinds) => {
                let names: Vec<String> = kinds.iter().map(|k| quoted(*k)).collect();
                write!(f, "{{{}}}", names.join(", "))
            }
            ExpectedToken::Description(desc) => write!(f, "{desc}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::LexError;

    #[test]
    fn messages_quote_tokens() {
        let kind = ParseErrorKind::ExtraneousInput {
            found: ")".to_string(),
            expected: ExpectedToken::Token(TokenKind::Semicolon),
        };
        assert_eq!(kind.to_string(), "extraneous input ')' expecting ';'");

        let kind = ParseErrorKind::MissingToken {
            expected: TokenKind::Semicolon,
            found: "y".to_string(),
        };
        assert_eq!(kind.to_string(), "missing ';' at 'y'");

        let kind = ParseErrorKind::UnexpectedToken {
            found: "<EOF>".to_string(),
            expected: ExpectedToken::OneOf(vec![TokenKind::Ident, TokenKind::RBrace]),
        };
        assert_eq!(
            kind.to_string(),
            "mismatched input '<EOF>' expecting {identifier, '}'}"
        );
    }

    #[test]
    fn hint_is_appended() {
        let error = ParseError::new(
            ParseErrorKind::AmbiguousBlock("x".to_string()),
            Span::new(4, 5),
            Location::new(1, 5),
        )
        .with_hint("terminate the expression with ';'");
        assert!(error.message().ends_with("(hint: terminate the expression with ';')"));
        assert!(error.to_string().ends_with("at 1:5"));
    }

    #[test]
    fn lexer_errors_convert() {
        let spanned = SpannedError::new(
            LexError::UnexpectedInput("#".to_string()),
            Span::new(2, 3),
            Location::new(1, 3),
        );
        let error = ParseError::from(spanned);
        assert!(matches!(error.kind, ParseErrorKind::Lexical(_)));
        assert_eq!(error.location, Location::new(1, 3));
    }
}
