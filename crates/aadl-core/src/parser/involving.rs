//! Filter conditions
//!
//! The comma-separated list after `|` in `{ template | c1, c2, ... }`.
//! Conditions are kept in source order. Whether a condition uses a name
//! bound only by a later one is left to [`Involving::forward_references`].
//!
//! [`Involving::forward_references`]: crate::ast::Involving::forward_references

use log::trace;

use super::lookahead::{classify_condition, ConditionShape};
use super::{ParseErrorKind, ParseResult, Parser};
use crate::ast::{AliasExpr, Condition, ExprKind, IterSource, IterateExpr};
use crate::lexer::{TokenKind, TokenSource};

impl<S: TokenSource> Parser<S> {
    /// Parse conditions up to (not including) the closing `}`
    pub(super) fn conditions(&mut self) -> Vec<Condition> {
        trace!("conditions at {}", self.current().location);
        let mut conditions = Vec::new();
        loop {
            match self.condition() {
                Ok(condition) => conditions.push(condition),
                Err(error) => {
                    self.report(error);
                    self.synchronize_condition();
                }
            }
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        conditions
    }

    fn condition(&mut self) -> ParseResult<Condition> {
        let start = self.current().span.start;
        match classify_condition(&self.tokens) {
            ConditionShape::List => {
                let binding = self.expect_ident()?;
                self.expect(TokenKind::LArrow)?;
                let source = self.list_source()?;
                Ok(Condition::List(IterateExpr {
                    binding,
                    source,
                    span: self.span_from(start),
                }))
            }
            ConditionShape::Alias => {
                let name = self.expect_ident()?;
                let ty = if self.eat(TokenKind::Colon).is_some() {
                    Some(self.type_name()?)
                } else {
                    None
                };
                self.expect(TokenKind::Eq)?;
                let value = self.expression()?;
                Ok(Condition::Alias(AliasExpr {
                    name,
                    ty,
                    value,
                    span: self.span_from(start),
                }))
            }
            ConditionShape::Block => Ok(Condition::Block(self.body_block()?)),
            ConditionShape::Filter => Ok(Condition::Filter(self.expression()?)),
        }
    }

    /// What a list binding iterates over
    fn list_source(&mut self) -> ParseResult<IterSource> {
        if self.current_kind().is_file_kind() {
            return Ok(IterSource::File(self.file_declarator()?));
        }
        let token = self.current().clone();
        let expr = self.postfix_expr()?;
        match expr.kind {
            ExprKind::Ident(name) => Ok(IterSource::Name(name)),
            ExprKind::Array(_) => Ok(IterSource::Array(Box::new(expr))),
            ExprKind::Call(_) => Ok(IterSource::Call(Box::new(expr))),
            _ => Err(Self::error_at(
                &token,
                ParseErrorKind::InvalidListSource(token.display_text()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{Condition, ExprKind, FileKind, IterSource, MethodCall};
    use crate::parser::{ParseErrorKind, Parser};

    fn conditions(source: &str) -> Vec<Condition> {
        let expr = Parser::parse_expression(source)
            .unwrap_or_else(|errors| panic!("{source}: {errors:?}"));
        let ExprKind::Involving(involving) = expr.kind else {
            panic!("expected involving");
        };
        involving.conditions
    }

    #[test]
    fn condition_kinds_in_order() {
        let found = conditions("{ y | x <- src, y : Exalge = x * 2, y > 0, { z = y; } }");
        assert_eq!(found.len(), 4);
        assert!(matches!(found[0], Condition::List(_)));
        assert!(matches!(&found[1], Condition::Alias(a) if a.ty.is_some()));
        assert!(matches!(found[2], Condition::Filter(_)));
        assert!(matches!(&found[3], Condition::Block(b) if b.stmts.len() == 1));
    }

    #[test]
    fn list_sources() {
        let found = conditions(
            r#"{ x | a <- csvfile("a.csv"), b <- items, c <- [1, 2], d <- load("q"), e <- items.rows().take(3), f <- Util::all() }"#,
        );
        let sources: Vec<&IterSource> = found
            .iter()
            .map(|c| match c {
                Condition::List(iterate) => &iterate.source,
                _ => panic!("expected list binding"),
            })
            .collect();
        assert!(matches!(sources[0], IterSource::File(f) if f.kind == FileKind::Csv));
        assert!(matches!(sources[1], IterSource::Name(n) if n.name == "items"));
        assert!(matches!(sources[2], IterSource::Array(_)));
        assert!(matches!(
            sources[3].as_call(),
            Some(MethodCall::Registered { .. })
        ));
        assert!(matches!(
            sources[4].as_call(),
            Some(MethodCall::Instance { name, .. }) if name.name == "take"
        ));
        assert!(matches!(sources[5].as_call(), Some(MethodCall::Module { .. })));
    }

    #[test]
    fn untyped_alias() {
        let found = conditions("{ y | y = 1 }");
        assert!(matches!(&found[0], Condition::Alias(a) if a.ty.is_none()));
    }

    #[test]
    fn literal_list_source_is_rejected() {
        let errors = Parser::parse_expression("{ x | x <- 42, x > 1 }").unwrap_err();
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0].kind, ParseErrorKind::InvalidListSource(_)));
    }

    #[test]
    fn later_binding_is_accepted_and_flagged() {
        let expr = Parser::parse_expression("{ y | y = x * 2, x <- src }").unwrap();
        let ExprKind::Involving(involving) = expr.kind else {
            panic!("expected involving");
        };
        let forward = involving.forward_references();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].reference.name, "x");
        assert_eq!(forward[0].condition, 0);

        let expr = Parser::parse_expression("{ y | x <- src, y = x * 2 }").unwrap();
        let ExprKind::Involving(involving) = expr.kind else {
            panic!("expected involving");
        };
        assert!(involving.forward_references().is_empty());
    }

    #[test]
    fn bad_condition_recovers_at_comma() {
        let errors = Parser::parse_expression("{ x | x <- src, ) ], x > 1 }").unwrap_err();
        assert_eq!(errors.len(), 1);
    }
}
