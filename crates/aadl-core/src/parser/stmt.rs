//! Statement parsing
//!
//! A brace after a statement boundary can open an ordinary block, a void
//! involving `{ expr | conds }` or an involving block `{ stmts | conds }`.
//! [`classify_block`] picks the reading from the tokens after the brace; an
//! expression-led block is settled by the token following the expression.

use log::{debug, trace};

use super::lookahead::{classify_block, classify_statement, BlockShape, StmtShape};
use super::{ParseErrorKind, ParseResult, Parser};
use crate::ast::{
    Assign, AssignKind, Block, ConstDef, InvolvingBlock, Stmt, StmtKind, VarDef, VarInit,
};
use crate::lexer::{TokenKind, TokenSource};

/// Which statements a position accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum StmtMode {
    Full,
    /// First statement of a statement-led block; never a bare expression
    NoBareExpression,
    /// Braceless `sif`/`selse` body; never a block
    Single,
}

impl<S: TokenSource> Parser<S> {
    fn statement_in(&mut self, mode: StmtMode) -> ParseResult<Stmt> {
        let start = self.current().span.start;
        let kind = match classify_statement(&self.tokens) {
            StmtShape::Block if mode != StmtMode::Single => return self.block_statement(),
            StmtShape::If => return self.if_statement(),
            StmtShape::Var => StmtKind::Var(self.var_def()?),
            StmtShape::Const => StmtKind::Const(self.const_def()?),
            StmtShape::Break => {
                self.advance();
                self.terminate()?;
                StmtKind::Break
            }
            StmtShape::Return => {
                self.advance();
                let value = if self.current_kind().begins_expression() {
                    Some(self.expression()?)
                } else {
                    None
                };
                self.terminate()?;
                StmtKind::Return(value)
            }
            StmtShape::Empty => {
                self.advance();
                StmtKind::Empty
            }
            StmtShape::Assign | StmtShape::InputBind | StmtShape::OutputBind => {
                StmtKind::Assign(self.assignment()?)
            }
            StmtShape::Expr if mode != StmtMode::NoBareExpression => {
                let expr = self.expression()?;
                self.terminate()?;
                StmtKind::Expr(expr)
            }
            StmtShape::Block | StmtShape::Expr | StmtShape::Invalid => {
                return Err(self.error_here(ParseErrorKind::ExpectedStatement(
                    self.current().display_text(),
                )));
            }
        };
        Ok(Stmt::new(kind, self.span_from(start)))
    }

    /// Parse a statement into `stmts`, or report and resynchronise
    fn statement_or_recover(&mut self, mode: StmtMode, stmts: &mut Vec<Stmt>) {
        let before = self.consumed;
        match self.statement_in(mode) {
            Ok(stmt) => stmts.push(stmt),
            Err(error) => {
                self.report(error);
                self.synchronize_statement();
                if self.consumed == before && !self.is_eof() {
                    let skipped = self.advance();
                    debug!("skipping '{}' to make progress", skipped.lexeme);
                }
            }
        }
    }

    /// A brace block in statement position
    pub(super) fn block_statement(&mut self) -> ParseResult<Stmt> {
        trace!("block at {}", self.current().location);
        let start = self.current().span.start;
        match classify_block(&self.tokens) {
            BlockShape::Empty => {
                self.advance();
                self.advance();
                let span = self.span_from(start);
                Ok(Stmt::new(StmtKind::Block(Block::empty(span)), span))
            }
            BlockShape::StatementLed => {
                self.advance();
                let mut stmts = Vec::new();
                self.statement_or_recover(StmtMode::NoBareExpression, &mut stmts);
                self.statement_list_tail(start, stmts)
            }
            BlockShape::ExpressionLed => {
                self.advance();
                self.expression_led_block(start)
            }
            BlockShape::Unrecognized => {
                self.advance();
                self.report_ambiguous_block();
                let span = self.span_from(start);
                Ok(Stmt::new(StmtKind::Block(Block::empty(span)), span))
            }
        }
    }

    fn expression_led_block(&mut self, start: u32) -> ParseResult<Stmt> {
        let expr = match self.expression() {
            Ok(expr) => expr,
            Err(error) => {
                self.report(error);
                self.synchronize_statement();
                return self.statement_list_tail(start, Vec::new());
            }
        };
        match self.current_kind() {
            TokenKind::Pipe => {
                let involving = self.involving_tail(expr, start)?;
                let span = involving.span;
                Ok(Stmt::new(StmtKind::VoidInvolving(involving), span))
            }
            TokenKind::Semicolon => {
                self.advance();
                let span = self.span_from(expr.span.start);
                self.statement_list_tail(start, vec![Stmt::new(StmtKind::Expr(expr), span)])
            }
            _ => {
                let span = expr.span;
                self.report_ambiguous_block();
                let block_span = self.span_from(start);
                Ok(Stmt::new(
                    StmtKind::Block(Block::new(
                        vec![Stmt::new(StmtKind::Expr(expr), span)],
                        block_span,
                    )),
                    block_span,
                ))
            }
        }
    }

    /// Report an ambiguous block and skip to its closing brace
    fn report_ambiguous_block(&mut self) {
        let error = self
            .error_here(ParseErrorKind::AmbiguousBlock(self.current().display_text()))
            .with_hint("end the expression with ';' or start conditions with '|'");
        self.report(error);
        self.skip_to_closing_brace();
    }

    /// Remaining statements of a block, then `}` or `| conditions }`
    fn statement_list_tail(&mut self, start: u32, mut stmts: Vec<Stmt>) -> ParseResult<Stmt> {
        while !self.check_any(&[TokenKind::RBrace, TokenKind::Pipe, TokenKind::Eof]) {
            self.statement_or_recover(StmtMode::Full, &mut stmts);
        }
        if self.eat(TokenKind::Pipe).is_some() {
            let conditions = self.conditions();
            self.close_block()?;
            let span = self.span_from(start);
            return Ok(Stmt::new(
                StmtKind::InvolvingBlock(InvolvingBlock::new(stmts, conditions, span)),
                span,
            ));
        }
        self.close_block()?;
        let span = self.span_from(start);
        Ok(Stmt::new(StmtKind::Block(Block::new(stmts, span)), span))
    }

    /// `{ statement* }` for function and program bodies and sub-filters
    pub(super) fn body_block(&mut self) -> ParseResult<Block> {
        let start = self.current().span.start;
        self.expect(TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check_any(&[TokenKind::RBrace, TokenKind::Eof]) {
            self.statement_or_recover(StmtMode::Full, &mut stmts);
        }
        self.close_block()?;
        Ok(Block::new(stmts, self.span_from(start)))
    }

    /// `sif (cond) body [selse body]`
    ///
    /// A `selse` always belongs to the nearest unmatched `sif`.
    fn if_statement(&mut self) -> ParseResult<Stmt> {
        trace!("sif at {}", self.current().location);
        let start = self.current().span.start;
        self.expect(TokenKind::Sif)?;
        self.expect(TokenKind::LParen)?;
        let cond = self.expression()?;
        self.expect(TokenKind::RParen)?;
        let then_branch = Box::new(self.branch_body()?);
        let else_branch = if self.eat(TokenKind::Selse).is_some() {
            Some(Box::new(self.branch_body()?))
        } else {
            None
        };
        Ok(Stmt::new(
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            },
            self.span_from(start),
        ))
    }

    fn branch_body(&mut self) -> ParseResult<Stmt> {
        if self.check(TokenKind::LBrace) {
            self.block_statement()
        } else {
            self.statement_in(StmtMode::Single)
        }
    }

    /// `var name : Type [= expr | = new(args) | <<- file];`
    fn var_def(&mut self) -> ParseResult<VarDef> {
        let start = self.current().span.start;
        self.expect(TokenKind::Var)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.type_name()?;
        let init = match self.current_kind() {
            TokenKind::Eq => {
                self.advance();
                if self.eat(TokenKind::New).is_some() {
                    Some(VarInit::New(self.call_args()?))
                } else {
                    Some(VarInit::Value(self.expression()?))
                }
            }
            TokenKind::InputBind => {
                self.advance();
                Some(VarInit::FileBind(self.file_declarator()?))
            }
            _ => None,
        };
        self.terminate()?;
        Ok(VarDef {
            name,
            ty,
            init,
            span: self.span_from(start),
        })
    }

    /// `const NAME : Type = value;`
    pub(super) fn const_def(&mut self) -> ParseResult<ConstDef> {
        let start = self.current().span.start;
        self.expect(TokenKind::Const)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.type_name()?;
        self.expect(TokenKind::Eq)?;
        let value = self.expression()?;
        self.terminate()?;
        Ok(ConstDef {
            name,
            ty,
            value,
            span: self.span_from(start),
        })
    }

    /// `name = expr;`, `name <<- file;` or `name ->> file;`
    fn assignment(&mut self) -> ParseResult<Assign> {
        let target = self.expect_ident()?;
        let kind = match self.advance().kind {
            TokenKind::InputBind => AssignKind::Input(self.file_declarator()?),
            TokenKind::OutputBind => AssignKind::Output(self.file_declarator()?),
            _ => AssignKind::Value(self.expression()?),
        };
        self.terminate()?;
        Ok(Assign { target, kind })
    }
}
