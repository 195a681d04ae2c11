//! Expression nodes

use serde::Serialize;

use crate::lexer::{Location, Span};

use super::{Ident, Involving, Spanned, TypeName};

/// Binary operators written with a symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum BinOp {
    /// `||`
    Or,
    /// `&&`
    And,
    /// `==`
    Eq,
    /// `!=`
    Ne,
    /// `<`
    Lt,
    /// `<=`
    Le,
    /// `>`
    Gt,
    /// `>=`
    Ge,
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `@`
    At,
}

impl BinOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            BinOp::Or => "||",
            BinOp::And => "&&",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::At => "@",
        }
    }
}

/// Prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Neg,
    /// `~`
    Tilde,
    /// `!`
    Not,
    /// `^`
    Caret,
}

impl UnaryOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Plus => "+",
            UnaryOp::Neg => "-",
            UnaryOp::Tilde => "~",
            UnaryOp::Not => "!",
            UnaryOp::Caret => "^",
        }
    }
}

/// Literal values
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Literal {
    /// Decimal integer (`42`)
    Int(i64),
    /// Hexadecimal integer (`0x2A`)
    Hex(i64),
    /// Octal integer (`052`)
    Octal(i64),
    Float(f64),
    Char(char),
    /// String with escapes resolved
    String(String),
    Bool(bool),
    Null,
}

/// An expression with source location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    #[must_use]
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span }
    }

    #[must_use]
    pub fn ident(name: impl Into<String>, span: Span) -> Self {
        Self::new(ExprKind::Ident(Ident::new(name, span)), span)
    }

    /// The identifier, if this expression is a bare name
    #[must_use]
    pub fn as_ident(&self) -> Option<&Ident> {
        match &self.kind {
            ExprKind::Ident(ident) => Some(ident),
            _ => None,
        }
    }

    /// Bare identifiers referenced by this expression, in source order
    ///
    /// Names bound inside a nested involving expression are not reported
    /// for the conditions and template that can see them.
    #[must_use]
    pub fn references(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    pub(crate) fn collect_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match &self.kind {
            ExprKind::Ident(ident) => out.push(ident),
            ExprKind::Literal(_) | ExprKind::HostCode(_) | ExprKind::CommandArg(_) => {}
            ExprKind::Binary { left, right, .. } | ExprKind::NamedOp { left, right, .. } => {
                left.collect_references(out);
                right.collect_references(out);
            }
            ExprKind::Unary { expr, .. } | ExprKind::Paren(expr) => expr.collect_references(out),
            ExprKind::Call(call) => call.collect_references(out),
            ExprKind::Array(entries) => {
                for entry in entries {
                    match entry {
                        ArrayEntry::Value(value) => value.collect_references(out),
                        ArrayEntry::KeyValue { key, value } => {
                            key.collect_references(out);
                            value.collect_references(out);
                        }
                    }
                }
            }
            ExprKind::ExBase(elements) | ExprKind::DtBase(elements) => {
                for element in elements {
                    element.collect_references(out);
                }
            }
            ExprKind::Involving(involving) => involving.collect_free_references(out),
        }
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// The kind of expression
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExprKind {
    Literal(Literal),

    Ident(Ident),

    /// Symbolic binary operation (`a + b`, `x <= y`)
    Binary {
        left: Box<Expr>,
        op: BinOp,
        right: Box<Expr>,
    },

    /// Binary operation named by an identifier used infix (`a proj b`)
    NamedOp {
        left: Box<Expr>,
        op: Ident,
        right: Box<Expr>,
    },

    Unary { op: UnaryOp, expr: Box<Expr> },

    Paren(Box<Expr>),

    Call(MethodCall),

    /// `[a, b]` or `["k" : v, ...]`
    Array(Vec<ArrayEntry>),

    /// Extended-base literal `< e1, e2 >`
    ExBase(Vec<Expr>),

    /// Date-time-base literal `<< e1, e2 >>`
    DtBase(Vec<Expr>),

    /// Embedded host code, delimiters stripped
    HostCode(String),

    CommandArg(CommandArgRef),

    /// Value-producing filter `{ template | conditions }`
    Involving(Involving),
}

/// One entry of an array or hash literal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ArrayEntry {
    Value(Expr),
    KeyValue { key: Expr, value: Expr },
}

/// Built-in calls taking a type argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SystemCallKind {
    /// `cast[Type](expr)`
    Cast,
    /// `typeof[Type](expr)`
    InstanceOf,
}

/// The four call syntaxes plus postfix instance calls
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum MethodCall {
    /// `name(args)`
    Registered { name: Ident, args: Vec<Expr> },

    /// `name[args](path)`
    Special {
        name: Ident,
        args: Vec<Expr>,
        path: Box<Expr>,
    },

    /// `pkg.Type::name(args)`
    Module {
        ty: TypeName,
        name: Ident,
        args: Vec<Expr>,
    },

    /// `cast[Type](expr)` / `typeof[Type](expr)`
    System {
        kind: SystemCallKind,
        ty: TypeName,
        expr: Box<Expr>,
    },

    /// `receiver.name(args)`
    Instance {
        receiver: Box<Expr>,
        name: Ident,
        args: Vec<Expr>,
    },
}

impl MethodCall {
    /// The called method's name; `cast`/`typeof` for system calls
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            MethodCall::Registered { name, .. }
            | MethodCall::Special { name, .. }
            | MethodCall::Module { name, .. }
            | MethodCall::Instance { name, .. } => &name.name,
            MethodCall::System {
                kind: SystemCallKind::Cast,
                ..
            } => "cast",
            MethodCall::System {
                kind: SystemCallKind::InstanceOf,
                ..
            } => "typeof",
        }
    }

    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match self {
            MethodCall::Registered { args, .. } | MethodCall::Module { args, .. } => {
                args.iter().for_each(|a| a.collect_references(out));
            }
            MethodCall::Special { args, path, .. } => {
                args.iter().for_each(|a| a.collect_references(out));
                path.collect_references(out);
            }
            MethodCall::System { expr, .. } => expr.collect_references(out),
            MethodCall::Instance { receiver, args, .. } => {
                receiver.collect_references(out);
                args.iter().for_each(|a| a.collect_references(out));
            }
        }
    }
}

/// File formats a declarator can name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FileKind {
    Txt,
    Csv,
    Xml,
}

impl FileKind {
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            FileKind::Txt => "txtfile",
            FileKind::Csv => "csvfile",
            FileKind::Xml => "xmlfile",
        }
    }
}

/// `csvfile[opts](path, encoding)`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileDeclarator {
    pub kind: FileKind,
    pub options: Vec<Ident>,
    pub path: Box<Expr>,
    /// Optional second argument, usually an encoding name
    pub second: Option<Box<Expr>>,
    pub span: Span,
}

impl FileDeclarator {
    pub(crate) fn collect_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        self.path.collect_references(out);
        if let Some(second) = &self.second {
            second.collect_references(out);
        }
    }
}

impl Spanned for FileDeclarator {
    fn span(&self) -> Span {
        self.span
    }
}

/// A `$n` placeholder for a command-line argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandArgRef {
    /// The number after `$`
    pub index: u32,
    pub text: String,
    pub span: Span,
    pub location: Location,
}

impl Spanned for CommandArgRef {
    fn span(&self) -> Span {
        self.span
    }
}
