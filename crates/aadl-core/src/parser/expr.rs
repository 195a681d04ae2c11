//! Expression parsing
//!
//! One function per precedence level, lowest first. Every binary level
//! loops, so operators of equal precedence build a left-leaning tree.

use log::trace;

use super::literal::host_code_body;
use super::lookahead::{classify_primary, is_named_operator, PrimaryShape};
use super::{ExpectedToken, ParseErrorKind, ParseResult, Parser};
use crate::ast::{
    ArrayEntry, BinOp, CommandArgRef, Expr, ExprKind, FileDeclarator, FileKind, Ident, Involving,
    MethodCall, SystemCallKind, UnaryOp,
};
use crate::lexer::{TokenKind, TokenSource};

impl<S: TokenSource> Parser<S> {
    /// Parse an expression
    pub(super) fn expression(&mut self) -> ParseResult<Expr> {
        self.or_expr()
    }

    fn binary(left: Expr, op: BinOp, right: Expr) -> Expr {
        let span = left.span.merge(right.span);
        Expr::new(
            ExprKind::Binary {
                left: Box::new(left),
                op,
                right: Box::new(right),
            },
            span,
        )
    }

    /// Parse one left-associative level
    fn binary_level(
        &mut self,
        operator: fn(TokenKind) -> Option<BinOp>,
        operand: fn(&mut Self) -> ParseResult<Expr>,
    ) -> ParseResult<Expr> {
        let mut left = operand(self)?;
        while let Some(op) = operator(self.current_kind()) {
            self.advance();
            let right = operand(self)?;
            left = Self::binary(left, op, right);
        }
        Ok(left)
    }

    fn or_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            |kind| (kind == TokenKind::Or).then_some(BinOp::Or),
            Self::and_expr,
        )
    }

    fn and_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            |kind| (kind == TokenKind::And).then_some(BinOp::And),
            Self::equality_expr,
        )
    }

    fn equality_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            |kind| match kind {
                TokenKind::EqEq => Some(BinOp::Eq),
                TokenKind::NotEq => Some(BinOp::Ne),
                _ => None,
            },
            Self::relational_expr,
        )
    }

    fn relational_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            |kind| match kind {
                TokenKind::Lt => Some(BinOp::Lt),
                TokenKind::LtEq => Some(BinOp::Le),
                TokenKind::Gt => Some(BinOp::Gt),
                TokenKind::GtEq => Some(BinOp::Ge),
                _ => None,
            },
            Self::named_op_expr,
        )
    }

    /// `left name right`, an identifier used as an infix operator
    ///
    /// Also the level at which composite-literal elements are parsed.
    pub(super) fn named_op_expr(&mut self) -> ParseResult<Expr> {
        let mut left = self.additive_expr()?;
        while is_named_operator(&self.tokens) {
            let op = self.expect_ident()?;
            let right = self.additive_expr()?;
            let span = left.span.merge(right.span);
            left = Expr::new(
                ExprKind::NamedOp {
                    left: Box::new(left),
                    op,
                    right: Box::new(right),
                },
                span,
            );
        }
        Ok(left)
    }

    fn additive_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            |kind| match kind {
                TokenKind::Plus => Some(BinOp::Add),
                TokenKind::Minus => Some(BinOp::Sub),
                _ => None,
            },
            Self::multiplicative_expr,
        )
    }

    fn multiplicative_expr(&mut self) -> ParseResult<Expr> {
        self.binary_level(
            |kind| match kind {
                TokenKind::Star => Some(BinOp::Mul),
                TokenKind::Slash => Some(BinOp::Div),
                TokenKind::Percent => Some(BinOp::Mod),
                TokenKind::At => Some(BinOp::At),
                _ => None,
            },
            Self::unary_expr,
        )
    }

    fn unary_expr(&mut self) -> ParseResult<Expr> {
        let op = match self.current_kind() {
            TokenKind::Plus => UnaryOp::Plus,
            TokenKind::Minus => UnaryOp::Neg,
            TokenKind::Tilde => UnaryOp::Tilde,
            TokenKind::Not => UnaryOp::Not,
            TokenKind::Caret => UnaryOp::Caret,
            _ => return self.postfix_expr(),
        };
        let op_token = self.advance();
        let expr = self.unary_expr()?;
        let span = op_token.span.merge(expr.span);
        Ok(Expr::new(
            ExprKind::Unary {
                op,
                expr: Box::new(expr),
            },
            span,
        ))
    }

    /// A primary followed by any number of `.name(args)` instance calls
    pub(super) fn postfix_expr(&mut self) -> ParseResult<Expr> {
        let mut expr = self.primary_expr()?;
        while self.eat(TokenKind::Dot).is_some() {
            let name = self.expect_ident()?;
            let args = self.call_args()?;
            let span = self.span_from(expr.span.start);
            expr = Expr::new(
                ExprKind::Call(MethodCall::Instance {
                    receiver: Box::new(expr),
                    name,
                    args,
                }),
                span,
            );
        }
        Ok(expr)
    }

    fn primary_expr(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        match classify_primary(&self.tokens) {
            PrimaryShape::Paren => {
                self.advance();
                let inner = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::new(
                    ExprKind::Paren(Box::new(inner)),
                    self.span_from(start),
                ))
            }
            PrimaryShape::Array => self.array_literal(),
            PrimaryShape::Literal => self.literal(),
            PrimaryShape::ExBase => {
                let elements = self.composite_elements(TokenKind::Lt, 1)?;
                Ok(Expr::new(ExprKind::ExBase(elements), self.span_from(start)))
            }
            PrimaryShape::DtBase => {
                let elements = self.composite_elements(TokenKind::LtLt, 2)?;
                Ok(Expr::new(ExprKind::DtBase(elements), self.span_from(start)))
            }
            PrimaryShape::SystemCall => self.system_call(),
            PrimaryShape::RegisteredCall => {
                let name = self.expect_ident()?;
                let args = self.call_args()?;
                Ok(Expr::new(
                    ExprKind::Call(MethodCall::Registered { name, args }),
                    self.span_from(start),
                ))
            }
            PrimaryShape::SpecialCall => {
                let name = self.expect_ident()?;
                self.expect(TokenKind::LBracket)?;
                let args = self.expression_list(TokenKind::RBracket)?;
                self.expect(TokenKind::RBracket)?;
                self.expect(TokenKind::LParen)?;
                let path = self.expression()?;
                self.expect(TokenKind::RParen)?;
                Ok(Expr::new(
                    ExprKind::Call(MethodCall::Special {
                        name,
                        args,
                        path: Box::new(path),
                    }),
                    self.span_from(start),
                ))
            }
            PrimaryShape::ModuleCall => {
                let ty = self.type_name()?;
                self.expect(TokenKind::ColonColon)?;
                let name = self.expect_ident()?;
                let args = self.call_args()?;
                Ok(Expr::new(
                    ExprKind::Call(MethodCall::Module { ty, name, args }),
                    self.span_from(start),
                ))
            }
            PrimaryShape::Ident => {
                let ident = self.expect_ident()?;
                let span = ident.span;
                Ok(Expr::new(ExprKind::Ident(ident), span))
            }
            PrimaryShape::HostCode => {
                let token = self.advance();
                Ok(Expr::new(
                    ExprKind::HostCode(host_code_body(&token.lexeme)),
                    token.span,
                ))
            }
            PrimaryShape::CommandArg => self.command_arg(),
            PrimaryShape::Involving => {
                let involving = self.involving_expr()?;
                let span = involving.span;
                Ok(Expr::new(ExprKind::Involving(involving), span))
            }
            PrimaryShape::Invalid => Err(self.error_here(ParseErrorKind::ExpectedExpression(
                self.current().display_text(),
            ))),
        }
    }

    /// Comma-separated expressions up to (not including) `close`
    pub(super) fn expression_list(&mut self, close: TokenKind) -> ParseResult<Vec<Expr>> {
        let mut items = Vec::new();
        if self.check(close) {
            return Ok(items);
        }
        loop {
            items.push(self.expression()?);
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(items)
    }

    /// `( args )`
    pub(super) fn call_args(&mut self) -> ParseResult<Vec<Expr>> {
        self.expect(TokenKind::LParen)?;
        let args = self.expression_list(TokenKind::RParen)?;
        self.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// `[ e, ... ]` or `[ k : v, ... ]`
    fn array_literal(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        self.expect(TokenKind::LBracket)?;
        let mut entries = Vec::new();
        if !self.check(TokenKind::RBracket) {
            loop {
                let value = self.expression()?;
                let entry = if self.eat(TokenKind::Colon).is_some() {
                    ArrayEntry::KeyValue {
                        key: value,
                        value: self.expression()?,
                    }
                } else {
                    ArrayEntry::Value(value)
                };
                entries.push(entry);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RBracket)?;
        Ok(Expr::new(ExprKind::Array(entries), self.span_from(start)))
    }

    /// Elements of `< ... >` and `<< ... >>`
    ///
    /// Elements stop below the relational level so the closing delimiter is
    /// never read as a comparison. The literal closes with `width` adjacent
    /// `>` tokens.
    fn composite_elements(&mut self, open: TokenKind, width: usize) -> ParseResult<Vec<Expr>> {
        self.expect(open)?;
        let mut elements = Vec::new();
        if !self.check(TokenKind::Gt) {
            loop {
                elements.push(self.named_op_expr()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        let mut end = self.expect(TokenKind::Gt)?.span.end;
        for _ in 1..width {
            if !(self.check(TokenKind::Gt) && self.current().span.start == end) {
                return Err(self.error_here(ParseErrorKind::UnexpectedToken {
                    found: self.current().display_text(),
                    expected: ExpectedToken::Description("'>>'".to_string()),
                }));
            }
            end = self.advance().span.end;
        }
        Ok(elements)
    }

    /// `cast[Type](expr)` / `typeof[Type](expr)`
    fn system_call(&mut self) -> ParseResult<Expr> {
        let start = self.current().span.start;
        let kind = match self.advance().kind {
            TokenKind::Typeof => SystemCallKind::InstanceOf,
            _ => SystemCallKind::Cast,
        };
        self.expect(TokenKind::LBracket)?;
        let ty = self.type_name()?;
        self.expect(TokenKind::RBracket)?;
        self.expect(TokenKind::LParen)?;
        let expr = self.expression()?;
        self.expect(TokenKind::RParen)?;
        Ok(Expr::new(
            ExprKind::Call(MethodCall::System {
                kind,
                ty,
                expr: Box::new(expr),
            }),
            self.span_from(start),
        ))
    }

    /// `$n`, recorded in the build context when parsed
    fn command_arg(&mut self) -> ParseResult<Expr> {
        let token = self.advance();
        let index = token.lexeme[1..].parse::<u32>().map_err(|_| {
            Self::error_at(&token, ParseErrorKind::InvalidNumber(token.lexeme.clone()))
        })?;
        trace!("command argument ${index} at {}", token.location);
        let arg = CommandArgRef {
            index,
            text: token.lexeme.clone(),
            span: token.span,
            location: token.location,
        };
        self.context.record_command_arg(arg.clone());
        Ok(Expr::new(ExprKind::CommandArg(arg), token.span))
    }

    /// `{ template | conditions }` in expression position
    pub(super) fn involving_expr(&mut self) -> ParseResult<Involving> {
        let start = self.current().span.start;
        self.expect(TokenKind::LBrace)?;
        let template = self.expression()?;
        self.involving_tail(template, start)
    }

    /// The rest of an involving after its template: `| conditions }`
    pub(super) fn involving_tail(&mut self, template: Expr, start: u32) -> ParseResult<Involving> {
        self.expect(TokenKind::Pipe)?;
        let conditions = self.conditions();
        self.close_block()?;
        Ok(Involving::new(template, conditions, self.span_from(start)))
    }

    /// `txtfile|csvfile|xmlfile [opts] ( path [, second] )`
    pub(super) fn file_declarator(&mut self) -> ParseResult<FileDeclarator> {
        let start = self.current().span.start;
        let kind = match self.current_kind() {
            TokenKind::TxtFile => FileKind::Txt,
            TokenKind::CsvFile => FileKind::Csv,
            TokenKind::XmlFile => FileKind::Xml,
            _ => {
                return Err(self.error_here(ParseErrorKind::UnexpectedToken {
                    found: self.current().display_text(),
                    expected: ExpectedToken::OneOf(vec![
                        TokenKind::TxtFile,
                        TokenKind::CsvFile,
                        TokenKind::XmlFile,
                    ]),
                }))
            }
        };
        self.advance();

        let mut options: Vec<Ident> = Vec::new();
        if self.eat(TokenKind::LBracket).is_some() {
            loop {
                options.push(self.expect_ident()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
            self.expect(TokenKind::RBracket)?;
        }

        self.expect(TokenKind::LParen)?;
        let path = self.expression()?;
        let second = if self.eat(TokenKind::Comma).is_some() {
            Some(Box::new(self.expression()?))
        } else {
            None
        };
        self.expect(TokenKind::RParen)?;

        Ok(FileDeclarator {
            kind,
            options,
            path: Box::new(path),
            second,
            span: self.span_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{ArrayEntry, BinOp, ExprKind, Literal, MethodCall, SystemCallKind};
    use crate::parser::{ParseErrorKind, Parser};

    fn parse(source: &str) -> String {
        Parser::parse_expression(source)
            .unwrap_or_else(|errors| panic!("{source}: {errors:?}"))
            .to_string()
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(parse("1 + 2 * 3"), "(1 + (2 * 3))");
        assert_eq!(parse("1 * 2 + 3"), "((1 * 2) + 3)");
        assert_eq!(parse("a @ b + c % d"), "((a @ b) + (c % d))");
    }

    #[test]
    fn binary_levels_are_left_associative() {
        assert_eq!(parse("a - b - c"), "((a - b) - c)");
        assert_eq!(parse("a / b * c"), "((a / b) * c)");
        assert_eq!(parse("a < b < c"), "((a < b) < c)");
        assert_eq!(parse("a == b != c"), "((a == b) != c)");
    }

    #[test]
    fn logical_and_comparison_levels() {
        assert_eq!(parse("a || b && c"), "(a || (b && c))");
        assert_eq!(parse("a == b && c <= d"), "((a == b) && (c <= d))");
        assert_eq!(parse("a < b == c >= d"), "((a < b) == (c >= d))");
    }

    #[test]
    fn named_operator_sits_between_relational_and_additive() {
        assert_eq!(parse("a proj b + c"), "(a proj (b + c))");
        assert_eq!(parse("a proj b < c"), "((a proj b) < c)");
        assert_eq!(parse("a proj b join c"), "((a proj b) join c)");
    }

    #[test]
    fn unary_prefixes_nest() {
        assert_eq!(parse("-a * b"), "(-a * b)");
        assert_eq!(parse("!~^+a"), "!~^+a");
        assert_eq!(parse("- -1"), "--1");
    }

    #[test]
    fn parentheses_are_kept() {
        let expr = Parser::parse_expression("(1 + 2) * 3").unwrap();
        let ExprKind::Binary { left, op, .. } = expr.kind else {
            panic!("expected binary");
        };
        assert_eq!(op, BinOp::Mul);
        assert!(matches!(left.kind, ExprKind::Paren(_)));
    }

    #[test]
    fn call_forms() {
        let expr = Parser::parse_expression("sum(a, b)").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Call(MethodCall::Registered { ref args, .. }) if args.len() == 2
        ));

        let expr = Parser::parse_expression("pick[1, 2](src)").unwrap();
        assert!(matches!(expr.kind, ExprKind::Call(MethodCall::Special { .. })));

        let expr = Parser::parse_expression("dtalge.Util::convert(x)").unwrap();
        let ExprKind::Call(MethodCall::Module { ty, name, args }) = expr.kind else {
            panic!("expected module call");
        };
        assert_eq!(ty.path(), "dtalge.Util");
        assert_eq!(name.name, "convert");
        assert_eq!(args.len(), 1);

        let expr = Parser::parse_expression("typeof[Exalge](x)").unwrap();
        assert!(matches!(
            expr.kind,
            ExprKind::Call(MethodCall::System {
                kind: SystemCallKind::InstanceOf,
                ..
            })
        ));
        assert_eq!(parse("cast[dtalge.DtBase](x)"), "cast[dtalge.DtBase](x)");
    }

    #[test]
    fn instance_calls_chain_left_to_right() {
        assert_eq!(parse("x.f(1).g()"), "x.f(1).g()");
        let expr = Parser::parse_expression("x.f(1).g()").unwrap();
        let ExprKind::Call(MethodCall::Instance { receiver, name, .. }) = expr.kind else {
            panic!("expected instance call");
        };
        assert_eq!(name.name, "g");
        assert!(matches!(
            receiver.kind,
            ExprKind::Call(MethodCall::Instance { .. })
        ));
        assert_eq!(parse("-x.f()"), "-x.f()");
    }

    #[test]
    fn composite_literals() {
        assert_eq!(parse("[1, 2, 3]"), "[1, 2, 3]");
        assert_eq!(parse("[]"), "[]");
        let expr = Parser::parse_expression("[\"a\" : 1, \"b\" : 2]").unwrap();
        let ExprKind::Array(entries) = expr.kind else {
            panic!("expected array");
        };
        assert!(matches!(entries[0], ArrayEntry::KeyValue { .. }));

        assert_eq!(parse("<1, \"yen\", \"cash\">"), "<1, \"yen\", \"cash\">");
        assert_eq!(parse("<a + 1, b>"), "<(a + 1), b>");
        assert_eq!(parse("<<\"2024\", x>>"), "<<\"2024\", x>>");
        assert_eq!(parse("<a> + <b>"), "(<a> + <b>)");
    }

    #[test]
    fn nested_composites_share_closing_angles() {
        assert_eq!(parse("<a, <b, c>>"), "<a, <b, c>>");
        assert_eq!(parse("<<a, <b, c>>>"), "<<a, <b, c>>>");
        assert_eq!(parse("<<x, <<y, z>>>>"), "<<x, <<y, z>>>>");

        let errors = Parser::parse_expression("<<a, b> >").unwrap_err();
        assert_eq!(errors[0].message, "mismatched input '>' expecting '>>'");
    }

    #[test]
    fn literal_kinds() {
        let cases = [
            ("0x10", Literal::Hex(16)),
            ("010", Literal::Octal(8)),
            ("2.5", Literal::Float(2.5)),
            ("'x'", Literal::Char('x')),
            ("true", Literal::Bool(true)),
            ("null", Literal::Null),
        ];
        for (source, expected) in cases {
            let expr = Parser::parse_expression(source).unwrap();
            assert_eq!(expr.kind, ExprKind::Literal(expected), "{source}");
        }
    }

    #[test]
    fn host_code_and_command_args() {
        let expr = Parser::parse_expression("@{ Math.abs(x) }@").unwrap();
        assert_eq!(expr.kind, ExprKind::HostCode(" Math.abs(x) ".to_string()));

        let expr = Parser::parse_expression("$3").unwrap();
        let ExprKind::CommandArg(arg) = expr.kind else {
            panic!("expected command arg");
        };
        assert_eq!(arg.index, 3);
        assert_eq!(arg.text, "$3");
    }

    #[test]
    fn involving_expression() {
        assert_eq!(
            parse("{ x * 2 | x <- src, x > 1 }"),
            "{ (x * 2) | x <- src, (x > 1) }"
        );
    }

    #[test]
    fn missing_operand_is_an_error() {
        let errors = Parser::parse_expression("1 + ").unwrap_err();
        assert!(matches!(errors[0].kind, ParseErrorKind::ExpectedExpression(_)));
        assert_eq!(
            errors[0].message,
            "no viable alternative at input '<EOF>', expected expression"
        );
    }

    #[test]
    fn stray_token_in_call_is_deleted() {
        let errors = Parser::parse_expression("f(a b)").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].message, "extraneous input 'b' expecting ')'");
    }
}
