//! Statement nodes

use serde::Serialize;

use crate::lexer::Span;

use super::{Block, Expr, FileDeclarator, Ident, Involving, InvolvingBlock, Spanned, TypeName};

/// A statement with source location
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    #[must_use]
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Bare identifiers read by this statement, in source order
    #[must_use]
    pub fn references(&self) -> Vec<&Ident> {
        let mut out = Vec::new();
        self.collect_references(&mut out);
        out
    }

    pub(crate) fn collect_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match &self.kind {
            StmtKind::Block(block) => {
                for stmt in &block.stmts {
                    stmt.collect_references(out);
                }
            }
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                cond.collect_references(out);
                then_branch.collect_references(out);
                if let Some(else_branch) = else_branch {
                    else_branch.collect_references(out);
                }
            }
            StmtKind::Var(var) => match &var.init {
                Some(VarInit::Value(expr)) => expr.collect_references(out),
                Some(VarInit::New(args)) => args.iter().for_each(|a| a.collect_references(out)),
                Some(VarInit::FileBind(file)) => file.collect_references(out),
                None => {}
            },
            StmtKind::Const(def) => def.value.collect_references(out),
            StmtKind::Assign(assign) => match &assign.kind {
                AssignKind::Value(expr) => expr.collect_references(out),
                AssignKind::Input(file) => file.collect_references(out),
                AssignKind::Output(file) => {
                    out.push(&assign.target);
                    file.collect_references(out);
                }
            },
            StmtKind::Return(Some(expr)) | StmtKind::Expr(expr) => expr.collect_references(out),
            StmtKind::Return(None) | StmtKind::Break | StmtKind::Empty => {}
            StmtKind::VoidInvolving(involving) => involving.collect_free_references(out),
            StmtKind::InvolvingBlock(block) => block.collect_free_references(out),
        }
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// The kind of statement
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum StmtKind {
    Block(Block),

    /// `sif (cond) then selse else`
    If {
        cond: Expr,
        then_branch: Box<Stmt>,
        else_branch: Option<Box<Stmt>>,
    },

    Var(VarDef),

    Const(ConstDef),

    Assign(Assign),

    Break,

    Return(Option<Expr>),

    /// `expr;`
    Expr(Expr),

    /// A lone `;`
    Empty,

    /// `{ expr | conditions }` evaluated for effect
    VoidInvolving(Involving),

    /// `{ stmt* | conditions }`
    InvolvingBlock(InvolvingBlock),
}

/// `var name : Type [init];`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarDef {
    pub name: Ident,
    pub ty: TypeName,
    pub init: Option<VarInit>,
    pub span: Span,
}

/// How a declared variable is initialised
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum VarInit {
    /// `= expr`
    Value(Expr),
    /// `= new(args)`
    New(Vec<Expr>),
    /// `<<- csvfile(..)`, read from a file
    FileBind(FileDeclarator),
}

/// `const NAME : Type = value;`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConstDef {
    pub name: Ident,
    pub ty: TypeName,
    pub value: Expr,
    pub span: Span,
}

impl Spanned for ConstDef {
    fn span(&self) -> Span {
        self.span
    }
}

/// Assignment to a variable
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Assign {
    pub target: Ident,
    pub kind: AssignKind,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum AssignKind {
    /// `x = expr;`
    Value(Expr),
    /// `x <<- file;`, bind from an input file
    Input(FileDeclarator),
    /// `x ->> file;`, write to an output file
    Output(FileDeclarator),
}
