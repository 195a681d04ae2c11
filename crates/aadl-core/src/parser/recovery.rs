//! Error recovery
//!
//! Three mechanisms, from cheapest to most disruptive:
//!
//! * a stray token in front of an expected one is deleted ([`Parser::expect`]);
//! * a missing `;` is assumed when the next token can already follow a
//!   statement ([`Parser::terminate`]);
//! * otherwise the rule fails and the enclosing list rule skips to its own
//!   continuation set (`synchronize_*`).
//!
//! Brace-delimited regions are always skipped as a whole.

use log::debug;

use super::{ExpectedToken, ParseErrorKind, ParseResult, Parser};
use crate::lexer::{Token, TokenKind, TokenSource};

/// Tokens that may directly follow a complete statement
fn can_follow_statement(kind: TokenKind) -> bool {
    kind.begins_expression()
        || matches!(
            kind,
            TokenKind::RBrace
                | TokenKind::Pipe
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::Sif
                | TokenKind::Selse
                | TokenKind::Break
                | TokenKind::Return
                | TokenKind::Function
                | TokenKind::Program
                | TokenKind::Eof
        )
}

impl<S: TokenSource> Parser<S> {
    /// Expect and consume a specific token
    ///
    /// When the current token is wrong but the one after it is the expected
    /// kind, the current token is reported as extraneous and skipped.
    pub(super) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token> {
        if self.check(kind) {
            return Ok(self.advance());
        }
        if !self.is_eof() && self.peek_kind(2) == kind {
            let stray = self.advance();
            debug!("deleting extraneous '{}' before '{kind}'", stray.lexeme);
            self.report(Self::error_at(
                &stray,
                ParseErrorKind::ExtraneousInput {
                    found: stray.display_text(),
                    expected: ExpectedToken::Token(kind),
                },
            ));
            return Ok(self.advance());
        }
        Err(self.error_here(ParseErrorKind::UnexpectedToken {
            found: self.current().display_text(),
            expected: ExpectedToken::Token(kind),
        }))
    }

    /// Consume the `;` that ends a statement or declaration
    pub(super) fn terminate(&mut self) -> ParseResult<()> {
        if self.eat(TokenKind::Semicolon).is_some() {
            return Ok(());
        }
        if can_follow_statement(self.current_kind()) {
            debug!("assuming missing ';' before '{}'", self.current().lexeme);
            let error = self.error_here(ParseErrorKind::MissingToken {
                expected: TokenKind::Semicolon,
                found: self.current().display_text(),
            });
            self.report(error);
            return Ok(());
        }
        self.expect(TokenKind::Semicolon).map(|_| ())
    }

    /// Consume the `}` closing a block
    ///
    /// At end of input the missing brace is reported once for all the
    /// blocks still open, and the caller keeps what it has parsed.
    pub(super) fn close_block(&mut self) -> ParseResult<()> {
        if !self.is_eof() {
            return self.expect(TokenKind::RBrace).map(|_| ());
        }
        if !self.unclosed_at_eof {
            self.unclosed_at_eof = true;
            let error = self.error_here(ParseErrorKind::MissingToken {
                expected: TokenKind::RBrace,
                found: self.current().display_text(),
            });
            self.report(error);
        }
        Ok(())
    }

    /// Skip a `{ ... }` region starting at the current `{`
    pub(super) fn skip_balanced(&mut self) {
        if self.eat(TokenKind::LBrace).is_some() {
            self.skip_to_closing_brace();
        }
    }

    /// Skip past the `}` closing a block whose `{` was already consumed
    pub(super) fn skip_to_closing_brace(&mut self) {
        let mut depth = 1usize;
        let mut skipped = 0usize;
        while !self.is_eof() {
            let token = self.advance();
            match token.kind {
                TokenKind::LBrace => depth += 1,
                TokenKind::RBrace => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                _ => {}
            }
            skipped += 1;
        }
        debug!("skipped {skipped} token(s) to the closing brace");
    }

    /// Continuation set of statement lists
    pub(super) fn synchronize_statement(&mut self) {
        let start = self.consumed;
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    break;
                }
                TokenKind::RBrace
                | TokenKind::Pipe
                | TokenKind::Var
                | TokenKind::Const
                | TokenKind::Sif
                | TokenKind::Break
                | TokenKind::Return => break,
                TokenKind::LBrace => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
        debug!("statement recovery skipped {} token(s)", self.consumed - start);
    }

    /// Continuation set of the top-level declaration lists
    pub(super) fn synchronize_submodule(&mut self) {
        let start = self.consumed;
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Function
                | TokenKind::Const
                | TokenKind::HostCode
                | TokenKind::Header
                | TokenKind::Program => break,
                TokenKind::LBrace => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
        debug!("declaration recovery skipped {} token(s)", self.consumed - start);
    }

    /// Continuation set of condition lists
    pub(super) fn synchronize_condition(&mut self) {
        let start = self.consumed;
        while !self.is_eof() {
            match self.current_kind() {
                TokenKind::Comma | TokenKind::RBrace => break,
                TokenKind::LBrace => self.skip_balanced(),
                _ => {
                    self.advance();
                }
            }
        }
        debug!("condition recovery skipped {} token(s)", self.consumed - start);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParseOptions;
    use crate::diagnostics::MemorySink;
    use crate::lexer::TokenStream;

    fn parser_for(source: &str) -> (Parser<TokenStream>, MemorySink) {
        let sink = MemorySink::new();
        let options = ParseOptions::default().with_error_sink(sink.clone());
        (Parser::from_source(source, &options), sink)
    }

    #[test]
    fn expect_deletes_a_single_stray_token() {
        let (mut parser, sink) = parser_for("] ;");
        let token = parser.expect(TokenKind::Semicolon).unwrap();
        assert_eq!(token.kind, TokenKind::Semicolon);
        assert!(parser.is_eof());
        assert_eq!(
            sink.lines(),
            vec!["<input>:1:1:extraneous input ']' expecting ';'"]
        );
    }

    #[test]
    fn unclosed_blocks_at_eof_are_reported_once() {
        let (mut parser, sink) = parser_for("x");
        parser.advance();
        parser.close_block().unwrap();
        parser.close_block().unwrap();
        assert_eq!(sink.lines(), vec!["<input>:1:2:missing '}' at '<EOF>'"]);

        let (mut parser, _) = parser_for("] }");
        assert!(parser.close_block().is_ok());
        assert!(parser.is_eof());
    }

    #[test]
    fn expect_fails_without_consuming_when_deletion_cannot_help() {
        let (mut parser, sink) = parser_for("] ] ;");
        let error = parser.expect(TokenKind::Semicolon).unwrap_err();
        assert!(matches!(error.kind, ParseErrorKind::UnexpectedToken { .. }));
        assert_eq!(parser.current_kind(), TokenKind::RBracket);
        assert!(sink.lines().is_empty());
    }

    #[test]
    fn terminate_assumes_missing_semicolon_before_a_statement() {
        let (mut parser, sink) = parser_for("y = 2;");
        parser.terminate().unwrap();
        assert_eq!(parser.current_kind(), TokenKind::Ident);
        assert_eq!(sink.lines(), vec!["<input>:1:1:missing ';' at 'y'"]);
        assert!(parser.reporter.failed());
    }

    #[test]
    fn statement_synchronization_skips_nested_braces() {
        let (mut parser, _) = parser_for(") { a; } b; c");
        parser.synchronize_statement();
        assert_eq!(parser.current().lexeme, "c");
    }

    #[test]
    fn statement_synchronization_stops_at_keywords_and_block_end() {
        let (mut parser, _) = parser_for(") ] var x : T;");
        parser.synchronize_statement();
        assert_eq!(parser.current_kind(), TokenKind::Var);

        let (mut parser, _) = parser_for("= = }");
        parser.synchronize_statement();
        assert_eq!(parser.current_kind(), TokenKind::RBrace);
    }

    #[test]
    fn condition_synchronization_stops_before_comma() {
        let (mut parser, _) = parser_for(") { x } ] , y");
        parser.synchronize_condition();
        assert_eq!(parser.current_kind(), TokenKind::Comma);
    }

    #[test]
    fn submodule_synchronization_stops_at_declarations() {
        let (mut parser, _) = parser_for("junk { var x : T; } more program P { }");
        parser.synchronize_submodule();
        assert_eq!(parser.current_kind(), TokenKind::Program);
    }

    #[test]
    fn skip_to_closing_brace_consumes_the_brace() {
        let (mut parser, _) = parser_for("a { b } c } d");
        parser.skip_to_closing_brace();
        assert_eq!(parser.current().lexeme, "d");
    }
}
