//! Tokenizer and token-source contract for AADL
//!
//! The parser only depends on [`TokenSource`]; any external lexer can feed it.
//! [`Lexer`] is a `logos`-based tokenizer for the surface syntax, used by the
//! convenience entry points and by tests.

#![allow(clippy::cast_possible_truncation)] // u32 offsets; sources over 4GB are unsupported

mod span;
mod token;

pub use span::{LineIndex, Location, Span};
pub use token::TokenKind;

use logos::Logos;
use thiserror::Error;

/// A token with its kind, span, source text and line/column position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
    /// The source text of the token
    pub lexeme: String,
    pub location: Location,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, span: Span, lexeme: impl Into<String>, location: Location) -> Self {
        Self {
            kind,
            span,
            lexeme: lexeme.into(),
            location,
        }
    }

    /// Text used when quoting the token in a diagnostic
    #[must_use]
    pub fn display_text(&self) -> String {
        if self.kind == TokenKind::Eof {
            "<EOF>".to_string()
        } else {
            self.lexeme.clone()
        }
    }
}

/// Ordered tokens with bounded lookahead
///
/// `peek(1)` is the current token. The parser never peeks further than
/// [`MAX_LOOKAHEAD`]. Once the input is exhausted every call returns the
/// end-of-input token, so a source must never run dry.
pub trait TokenSource {
    /// Look at the `k`-th token ahead without consuming it (1-based)
    fn peek(&self, k: usize) -> &Token;

    /// Consume and return the current token
    fn advance(&mut self) -> Token;

    /// Position of the current token, for diagnostics
    fn position(&self) -> Location {
        self.peek(1).location
    }
}

/// Deepest lookahead any grammar decision needs
pub const MAX_LOOKAHEAD: usize = 4;

/// An in-memory [`TokenSource`]
#[derive(Debug, Clone)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
}

impl TokenStream {
    /// Build a stream from lexer output, dropping trivia
    ///
    /// An end-of-input token is appended when the input does not already end
    /// with one.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut tokens: Vec<Token> = tokens
            .into_iter()
            .filter(|t| !t.kind.is_trivia() && t.kind != TokenKind::Error)
            .collect();
        if tokens.last().map(|t| t.kind) != Some(TokenKind::Eof) {
            let (span, location) = tokens.last().map_or_else(
                || (Span::default(), Location::default()),
                |t| (Span::new(t.span.end, t.span.end), t.location),
            );
            tokens.push(Token::new(TokenKind::Eof, span, "", location));
        }
        Self {
            tokens,
            position: 0,
        }
    }

    /// Tokenize source text; lexer errors are returned alongside the stream
    #[must_use]
    pub fn from_source(source: &str) -> (Self, Vec<SpannedError>) {
        let (tokens, errors) = Lexer::tokenize(source);
        (Self::new(tokens), errors)
    }

    fn last_index(&self) -> usize {
        self.tokens.len() - 1
    }
}

impl TokenSource for TokenStream {
    fn peek(&self, k: usize) -> &Token {
        debug_assert!((1..=MAX_LOOKAHEAD).contains(&k), "lookahead {k} out of range");
        let index = (self.position + k.saturating_sub(1)).min(self.last_index());
        &self.tokens[index]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.position.min(self.last_index())].clone();
        if self.position < self.last_index() {
            self.position += 1;
        }
        token
    }
}

/// Lexer error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LexError {
    #[error("unrecognized input '{0}'")]
    UnexpectedInput(String),
    #[error("unterminated host code block, expected '}}@'")]
    UnterminatedHostCode,
}

/// A lexer error with location information
#[derive(Debug, Clone, PartialEq)]
pub struct SpannedError {
    pub error: LexError,
    pub span: Span,
    pub location: Location,
}

impl SpannedError {
    #[must_use]
    pub fn new(error: LexError, span: Span, location: Location) -> Self {
        Self {
            error,
            span,
            location,
        }
    }
}

impl std::fmt::Display for SpannedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.error, self.location)
    }
}

impl std::error::Error for SpannedError {}

/// The AADL tokenizer
pub struct Lexer<'source> {
    source: &'source str,
    lines: LineIndex<'source>,
    errors: Vec<SpannedError>,
}

impl<'source> Lexer<'source> {
    #[must_use]
    pub fn new(source: &'source str) -> Self {
        Self {
            source,
            lines: LineIndex::new(source),
            errors: Vec::new(),
        }
    }

    /// Tokenize the entire source, returning all tokens and any errors
    ///
    /// The token list always ends with [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize(source: &str) -> (Vec<Token>, Vec<SpannedError>) {
        let mut lexer = Lexer::new(source);
        let tokens = lexer.collect_all();
        (tokens, lexer.errors)
    }

    /// Collect all tokens from the source
    pub fn collect_all(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();
        let mut logos_lexer = TokenKind::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            let span = Span::from_range(logos_lexer.span());
            let lexeme = logos_lexer.slice();
            let location = self.lines.location(span.start);

            match result {
                Ok(kind) => tokens.push(Token::new(kind, span, lexeme, location)),
                Err(()) => {
                    let error = if lexeme.starts_with("@{") {
                        LexError::UnterminatedHostCode
                    } else {
                        LexError::UnexpectedInput(lexeme.to_string())
                    };
                    self.errors.push(SpannedError::new(error, span, location));
                    tokens.push(Token::new(TokenKind::Error, span, lexeme, location));
                }
            }
        }

        let end = self.source.len() as u32;
        tokens.push(Token::new(
            TokenKind::Eof,
            Span::new(end, end),
            "",
            self.lines.location(end),
        ));
        tokens
    }
}
