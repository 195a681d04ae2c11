//! Syntax tree for AADL programs
//!
//! Every node carries its source [`Span`]. Nodes built around a named token
//! (functions, variables, bindings, calls) keep that name as an [`Ident`]
//! with the token's own span so diagnostics can point at the name.
//!
//! Nodes are plain values: the parser constructs them bottom-up and never
//! mutates a node after it has been built.

mod expr;
mod involving;
mod item;
mod pretty;
mod stmt;
mod types;

pub use expr::*;
pub use involving::*;
pub use item::*;
pub use stmt::*;
pub use types::*;

pub use crate::lexer::{Location, Span};

use serde::Serialize;

/// A trait for syntax nodes with a source location
pub trait Spanned {
    fn span(&self) -> Span;
}

/// An identifier with its source location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    #[must_use]
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}

impl Spanned for Ident {
    fn span(&self) -> Span {
        self.span
    }
}

/// A brace-delimited statement sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    /// Includes both braces
    pub span: Span,
}

impl Block {
    #[must_use]
    pub fn new(stmts: Vec<Stmt>, span: Span) -> Self {
        Self { stmts, span }
    }

    #[must_use]
    pub fn empty(span: Span) -> Self {
        Self {
            stmts: Vec::new(),
            span,
        }
    }
}

impl Spanned for Block {
    fn span(&self) -> Span {
        self.span
    }
}
