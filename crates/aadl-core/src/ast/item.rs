//! Declarations and the two program roots
//!
//! A parse produces two sibling roots. [`ProgramInfo`] carries what code
//! generation needs up front (class name, command-line argument uses and
//! every function). [`ProgramTree`] carries the program structure together
//! with every top-level constant.

use serde::Serialize;

use crate::lexer::Span;

use super::{Block, CommandArgRef, ConstDef, Ident, Spanned, TypeName};

/// `package a.b.c;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PackageDecl {
    pub path: TypeName,
    pub span: Span,
}

/// `header @{ ... }@`, host code emitted ahead of the generated class
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderAction {
    pub code: String,
    pub span: Span,
}

/// A function parameter `name : Type`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Param {
    pub name: Ident,
    pub ty: TypeName,
    pub span: Span,
}

/// `function name(params) [: Type] { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: Ident,
    pub params: Vec<Param>,
    /// `None` for functions without a result
    pub return_type: Option<TypeName>,
    pub body: Block,
    pub span: Span,
}

impl Spanned for FunctionDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// One declaration inside a submodule
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum SubmoduleItem {
    /// `@{ ... }@`, delimiters stripped
    HostCode { code: String, span: Span },
    Function(FunctionDef),
    Const(ConstDef),
}

/// Declarations placed before or after the main module
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submodule {
    pub items: Vec<SubmoduleItem>,
    pub span: Span,
}

impl Submodule {
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.items.iter().filter_map(|item| match item {
            SubmoduleItem::Function(def) => Some(def),
            _ => None,
        })
    }
}

/// `program Name { body }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MainModule {
    pub name: Ident,
    pub body: Block,
    pub span: Span,
}

/// First synthesized root
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ProgramInfo {
    /// Name of the main module
    pub class_name: String,
    /// Every `$n` use, in token order
    pub command_args: Vec<CommandArgRef>,
    /// Functions from both submodules, in encounter order
    pub functions: Vec<FunctionDef>,
}

/// Second synthesized root
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramTree {
    pub package: Option<PackageDecl>,
    pub header_actions: Vec<HeaderAction>,
    /// Top-level constants from both submodules, in encounter order
    pub consts: Vec<ConstDef>,
    pub leading: Option<Submodule>,
    pub trailing: Option<Submodule>,
    /// `None` only when the parse failed before finding the main module
    pub main: Option<MainModule>,
    /// Ends at the end-of-input token
    pub span: Span,
}

impl Spanned for ProgramTree {
    fn span(&self) -> Span {
        self.span
    }
}
