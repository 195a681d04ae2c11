//! Program structure and top-level declarations
//!
//! `package? header* submodule? program Name { ... } submodule? EOF`
//!
//! Functions and constants from either submodule are also appended to the
//! build context as soon as they are parsed.

use log::trace;

use super::literal::host_code_body;
use super::{ExpectedToken, ParseErrorKind, ParseResult, Parser};
use crate::ast::{
    ConstDef, FunctionDef, HeaderAction, MainModule, PackageDecl, Param, ProgramTree, Submodule,
    SubmoduleItem,
};
use crate::lexer::{Span, TokenKind, TokenSource};

/// The tree root before the combined constants are attached
pub(super) struct ProgramParts {
    package: Option<PackageDecl>,
    header_actions: Vec<HeaderAction>,
    leading: Option<Submodule>,
    main: Option<MainModule>,
    trailing: Option<Submodule>,
    span: Span,
}

impl ProgramParts {
    pub(super) fn into_tree(self, consts: Vec<ConstDef>) -> ProgramTree {
        ProgramTree {
            package: self.package,
            header_actions: self.header_actions,
            consts,
            leading: self.leading,
            trailing: self.trailing,
            main: self.main,
            span: self.span,
        }
    }
}

impl<S: TokenSource> Parser<S> {
    pub(super) fn program(&mut self) -> ProgramParts {
        trace!("program at {}", self.current().location);
        let start = self.current().span.start;

        let mut package = None;
        if self.check(TokenKind::Package) {
            match self.package_decl() {
                Ok(decl) => package = Some(decl),
                Err(error) => {
                    self.report(error);
                    self.synchronize_submodule();
                }
            }
        }

        let mut header_actions = Vec::new();
        while self.check(TokenKind::Header) {
            match self.header_action() {
                Ok(action) => header_actions.push(action),
                Err(error) => {
                    self.report(error);
                    self.synchronize_submodule();
                }
            }
        }

        let leading = self.submodule(true);

        let main = if self.check(TokenKind::Program) {
            match self.main_module() {
                Ok(main) => Some(main),
                Err(error) => {
                    self.report(error);
                    self.synchronize_submodule();
                    None
                }
            }
        } else {
            let error = self.error_here(ParseErrorKind::UnexpectedToken {
                found: self.current().display_text(),
                expected: ExpectedToken::Token(TokenKind::Program),
            });
            self.report(error);
            None
        };

        let trailing = self.submodule(false);

        let end = self.current().span.end;
        ProgramParts {
            package,
            header_actions,
            leading,
            main,
            trailing,
            span: Span::new(start, end.max(start)),
        }
    }

    /// `package a.b.c;`
    fn package_decl(&mut self) -> ParseResult<PackageDecl> {
        let start = self.current().span.start;
        self.expect(TokenKind::Package)?;
        let path = self.type_name()?;
        self.terminate()?;
        Ok(PackageDecl {
            path,
            span: self.span_from(start),
        })
    }

    /// `header @{ ... }@`
    fn header_action(&mut self) -> ParseResult<HeaderAction> {
        let start = self.current().span.start;
        self.expect(TokenKind::Header)?;
        let code = self.expect(TokenKind::HostCode)?;
        Ok(HeaderAction {
            code: host_code_body(&code.lexeme),
            span: self.span_from(start),
        })
    }

    /// Declarations before the main module (`leading`) or after it
    ///
    /// Returns `None` when there are no declarations.
    fn submodule(&mut self, leading: bool) -> Option<Submodule> {
        let start = self.current().span.start;
        let mut items = Vec::new();
        while !self.is_eof() && !(leading && self.check(TokenKind::Program)) {
            match self.submodule_item() {
                Ok(item) => items.push(item),
                Err(error) => {
                    self.report(error);
                    self.synchronize_submodule();
                }
            }
        }
        if items.is_empty() {
            return None;
        }
        Some(Submodule {
            items,
            span: self.span_from(start),
        })
    }

    fn submodule_item(&mut self) -> ParseResult<SubmoduleItem> {
        match self.current_kind() {
            TokenKind::HostCode => {
                let token = self.advance();
                Ok(SubmoduleItem::HostCode {
                    code: host_code_body(&token.lexeme),
                    span: token.span,
                })
            }
            TokenKind::Function => {
                let def = self.function_def()?;
                self.context.record_function(&def);
                Ok(SubmoduleItem::Function(def))
            }
            TokenKind::Const => {
                let def = self.const_def()?;
                self.context.record_const(&def);
                Ok(SubmoduleItem::Const(def))
            }
            _ => {
                let token = self.advance();
                Err(Self::error_at(
                    &token,
                    ParseErrorKind::UnexpectedToken {
                        found: token.display_text(),
                        expected: ExpectedToken::OneOf(vec![
                            TokenKind::Function,
                            TokenKind::Const,
                            TokenKind::HostCode,
                        ]),
                    },
                ))
            }
        }
    }

    /// `function name(params) [: Type] { body }`
    fn function_def(&mut self) -> ParseResult<FunctionDef> {
        trace!("function at {}", self.current().location);
        let start = self.current().span.start;
        self.expect(TokenKind::Function)?;
        let name = self.expect_ident()?;
        self.expect(TokenKind::LParen)?;
        let mut params = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                params.push(self.param()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen)?;
        let return_type = if self.eat(TokenKind::Colon).is_some() {
            Some(self.type_name()?)
        } else {
            None
        };
        let body = self.body_block()?;
        Ok(FunctionDef {
            name,
            params,
            return_type,
            body,
            span: self.span_from(start),
        })
    }

    /// `name : Type`
    fn param(&mut self) -> ParseResult<Param> {
        let start = self.current().span.start;
        let name = self.expect_ident()?;
        self.expect(TokenKind::Colon)?;
        let ty = self.type_name()?;
        Ok(Param {
            name,
            ty,
            span: self.span_from(start),
        })
    }

    /// `program Name { body }`
    fn main_module(&mut self) -> ParseResult<MainModule> {
        trace!("main module at {}", self.current().location);
        let start = self.current().span.start;
        self.expect(TokenKind::Program)?;
        let name = self.expect_ident()?;
        self.context.set_class_name(&name.name);
        let body = self.body_block()?;
        Ok(MainModule {
            name,
            body,
            span: self.span_from(start),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::ast::{StmtKind, SubmoduleItem};
    use crate::config::ParseOptions;
    use crate::diagnostics::MemorySink;
    use crate::parser::{ParseOutput, Parser};

    fn parse(source: &str) -> ParseOutput {
        let options = ParseOptions::default().with_error_sink(MemorySink::new());
        Parser::parse_source(source, options)
    }

    #[test]
    fn full_program_layout() {
        let output = parse(
            r#"
            package org.ledger.app;
            header @{ import java.util.*; }@
            header @{ import java.io.*; }@
            @{ static int counter; }@
            const RATE : Decimal = 1.08;
            function f(a : Exalge, b : dtalge.DtBase) : Exalge { return a; }
            program Main {
                var x : Exalge = f($1, $2);
            }
            function g() { }
            const LIMIT : Int = 10;
            "#,
        );
        assert!(!output.failed, "{:?}", output.diagnostics);

        let tree = &output.tree;
        assert_eq!(tree.package.as_ref().unwrap().path.path(), "org.ledger.app");
        assert_eq!(tree.header_actions.len(), 2);
        assert_eq!(tree.header_actions[0].code, " import java.util.*; ");
        let leading = tree.leading.as_ref().unwrap();
        assert_eq!(leading.items.len(), 3);
        assert!(matches!(leading.items[0], SubmoduleItem::HostCode { .. }));
        assert_eq!(tree.trailing.as_ref().unwrap().items.len(), 2);

        let names: Vec<_> = output.info.functions.iter().map(|f| f.name.name.as_str()).collect();
        assert_eq!(names, ["f", "g"]);
        let consts: Vec<_> = tree.consts.iter().map(|c| c.name.name.as_str()).collect();
        assert_eq!(consts, ["RATE", "LIMIT"]);
        assert_eq!(output.info.class_name, "Main");
        assert_eq!(output.info.functions[0].params.len(), 2);
        assert!(output.info.functions[1].return_type.is_none());
    }

    #[test]
    fn minimal_program_has_no_submodules() {
        let output = parse("program P { }");
        assert!(!output.failed);
        assert!(output.tree.leading.is_none());
        assert!(output.tree.trailing.is_none());
        assert!(output.tree.package.is_none());
    }

    #[test]
    fn missing_main_module_is_reported() {
        let output = parse("function f() { }");
        assert!(output.failed);
        assert!(output.tree.main.is_none());
        assert_eq!(output.info.functions.len(), 1);
        assert_eq!(
            output.diagnostics[0].message,
            "mismatched input '<EOF>' expecting 'program'"
        );
    }

    #[test]
    fn unclosed_main_module_keeps_its_statements() {
        let output = parse("function f() { } program P { x = 1; y = 2; ");
        assert!(output.failed);
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.diagnostics[0].message, "missing '}' at '<EOF>'");
        let main = output.tree.main.as_ref().unwrap();
        assert_eq!(main.body.stmts.len(), 2);
        assert_eq!(output.info.functions.len(), 1);
    }

    #[test]
    fn nested_unclosed_blocks_report_one_missing_brace() {
        let output = parse("program P { sif (a) { x = 1; ");
        assert_eq!(output.diagnostics.len(), 1);
        let main = output.tree.main.as_ref().unwrap();
        assert!(matches!(
            &main.body.stmts[0].kind,
            StmtKind::If { then_branch, .. }
                if matches!(&then_branch.kind, StmtKind::Block(b) if b.stmts.len() == 1)
        ));
    }

    #[test]
    fn junk_between_declarations_is_skipped() {
        let output = parse("function f() { } 42 ] function g() { } program P { }");
        assert_eq!(output.diagnostics.len(), 1);
        assert_eq!(output.info.functions.len(), 2);
        assert_eq!(output.info.class_name, "P");
    }

    #[test]
    fn second_program_in_trailing_position_is_an_error() {
        let output = parse("program P { } program Q { } function h() { }");
        assert!(output.failed);
        assert_eq!(output.info.class_name, "P");
        assert_eq!(output.info.functions.len(), 1);
    }
}
