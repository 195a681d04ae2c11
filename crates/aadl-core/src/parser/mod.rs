//! Parser for AADL
//!
//! A hand-written recursive-descent parser. Every grammar decision is made
//! by a named classifier in [`lookahead`] that peeks at most
//! [`MAX_LOOKAHEAD`](crate::lexer::MAX_LOOKAHEAD) tokens; rule functions then
//! build the tree bottom-up.
//!
//! Errors never stop the parse. Each one is written to the error sink as
//! `source:line:column:message`, the failure flag is set, and the enclosing
//! list rule resynchronises.
//!
//! # Example
//!
//! ```
//! use aadl_core::{ParseOptions, Parser};
//!
//! let source = r#"
//!     function twice(x : Exalge) : Exalge { return x + x; }
//!     program Ledger {
//!         var total : Exalge = twice($1);
//!     }
//! "#;
//! let output = Parser::parse_source(source, ParseOptions::default());
//! assert!(!output.failed);
//! assert_eq!(output.info.class_name, "Ledger");
//! assert_eq!(output.info.functions.len(), 1);
//! assert_eq!(output.info.command_args.len(), 1);
//!
//! let expr = Parser::parse_expression("1 + 2 * 3").unwrap();
//! assert_eq!(expr.to_string(), "(1 + (2 * 3))");
//! ```

mod context;
mod error;
mod expr;
mod involving;
mod item;
mod literal;
mod lookahead;
mod recovery;
mod stmt;

pub use error::{ExpectedToken, ParseError, ParseErrorKind};
pub use literal::unescape;
pub use lookahead::{
    classify_block, classify_condition, classify_primary, classify_statement, BlockShape,
    ConditionShape, PrimaryShape, StmtShape,
};

use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::ast::{Expr, Ident, ProgramInfo, ProgramTree};
use crate::config::ParseOptions;
use crate::diagnostics::{Diagnostic, MemorySink, MessageSink, Reporter};
use crate::lexer::{Span, Token, TokenKind, TokenSource, TokenStream};

use context::BuildContext;

/// Result type for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;

/// Everything one parse produces
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseOutput {
    pub info: ProgramInfo,
    pub tree: ProgramTree,
    /// Set when any lexical or syntax error was reported
    pub failed: bool,
    pub diagnostics: Vec<Diagnostic>,
}

impl ParseOutput {
    /// Dump the whole result as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// The AADL parser
///
/// A parser owns its token source and its build context and is consumed by
/// [`Parser::parse_program`], so no state survives into another parse.
pub struct Parser<S: TokenSource> {
    tokens: S,
    context: BuildContext,
    reporter: Reporter,
    output_sink: Rc<dyn MessageSink>,
    verbose: bool,
    /// End offset of the most recently consumed token
    last_end: u32,
    /// Number of tokens consumed so far
    consumed: usize,
    /// Set once a missing `}` has been reported at end of input
    unclosed_at_eof: bool,
}

impl<S: TokenSource> Parser<S> {
    /// Create a parser over any token source
    #[must_use]
    pub fn new(tokens: S, options: &ParseOptions) -> Self {
        let last_end = tokens.peek(1).span.start;
        Self {
            tokens,
            context: BuildContext::default(),
            reporter: Reporter::new(options),
            output_sink: Rc::clone(&options.output_sink),
            verbose: options.verbose,
            last_end,
            consumed: 0,
            unclosed_at_eof: false,
        }
    }

    /// Parse a complete program and build both roots
    #[must_use]
    pub fn parse_program(mut self) -> ParseOutput {
        let parts = self.program();
        let failed = self.reporter.failed();
        let (info, consts) = self.context.finish();
        let tree = parts.into_tree(consts);

        debug!(
            "parse finished: {} function(s), {} const(s), {} command arg(s), {} error(s)",
            info.functions.len(),
            tree.consts.len(),
            info.command_args.len(),
            self.reporter.len()
        );
        if self.verbose {
            self.output_sink.write_line(&format!(
                "parsed program '{}': {} function(s), {} const(s), {} command argument(s), {} error(s)",
                info.class_name,
                info.functions.len(),
                tree.consts.len(),
                info.command_args.len(),
                self.reporter.len()
            ));
        }

        ParseOutput {
            info,
            tree,
            failed,
            diagnostics: self.reporter.into_diagnostics(),
        }
    }

    // ==================== Token Management ====================

    /// Get the current token
    fn current(&self) -> &Token {
        self.tokens.peek(1)
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    /// Kind of the `k`-th token ahead, 1 being the current one
    fn peek_kind(&self, k: usize) -> TokenKind {
        self.tokens.peek(k).kind
    }

    fn is_eof(&self) -> bool {
        self.check(TokenKind::Eof)
    }

    /// Consume the current token
    fn advance(&mut self) -> Token {
        let token = self.tokens.advance();
        if token.kind != TokenKind::Eof {
            self.last_end = token.span.end;
            self.consumed += 1;
        }
        token
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn check_any(&self, kinds: &[TokenKind]) -> bool {
        kinds.contains(&self.current_kind())
    }

    /// Consume a token if it matches, returning it
    fn eat(&mut self, kind: TokenKind) -> Option<Token> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Expect an identifier token
    fn expect_ident(&mut self) -> ParseResult<Ident> {
        if self.check(TokenKind::Ident) {
            let token = self.advance();
            Ok(Ident::new(token.lexeme, token.span))
        } else {
            Err(self.error_here(ParseErrorKind::ExpectedIdentifier(
                self.current().display_text(),
            )))
        }
    }

    /// Span from `start` to the end of the last consumed token
    fn span_from(&self, start: u32) -> Span {
        Span::new(start, self.last_end.max(start))
    }

    /// Build an error pointing at the current token
    fn error_here(&self, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, self.current().span, self.tokens.position())
    }

    /// Build an error pointing at `token`
    fn error_at(token: &Token, kind: ParseErrorKind) -> ParseError {
        ParseError::new(kind, token.span, token.location)
    }

    /// Record an error but continue parsing
    fn report(&mut self, error: ParseError) {
        self.reporter.report(error);
    }
}

impl Parser<TokenStream> {
    /// Tokenize `source` with the bundled lexer and create a parser
    ///
    /// Lexical errors are reported immediately; the offending input is
    /// dropped from the stream.
    #[must_use]
    pub fn from_source(source: &str, options: &ParseOptions) -> Self {
        let (stream, lex_errors) = TokenStream::from_source(source);
        let mut parser = Parser::new(stream, options);
        for error in lex_errors {
            parser.report(error.into());
        }
        parser
    }

    /// Parse a complete program from source text
    #[must_use]
    pub fn parse_source(source: &str, options: ParseOptions) -> ParseOutput {
        Parser::from_source(source, &options).parse_program()
    }

    /// Parse a single expression; diagnostics are returned, not printed
    pub fn parse_expression(source: &str) -> Result<Expr, Vec<Diagnostic>> {
        let options = ParseOptions::default().with_error_sink(MemorySink::new());
        let mut parser = Parser::from_source(source, &options);
        match parser.expression() {
            Ok(expr) => {
                if !parser.is_eof() {
                    let error = parser.error_here(ParseErrorKind::UnexpectedToken {
                        found: parser.current().display_text(),
                        expected: ExpectedToken::Token(TokenKind::Eof),
                    });
                    parser.report(error);
                }
                if parser.reporter.failed() {
                    Err(parser.reporter.into_diagnostics())
                } else {
                    Ok(expr)
                }
            }
            Err(error) => {
                parser.report(error);
                Err(parser.reporter.into_diagnostics())
            }
        }
    }
}
