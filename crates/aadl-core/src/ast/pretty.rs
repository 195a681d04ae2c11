//! Pretty printing for syntax nodes
//!
//! Binary operations print fully parenthesised so the tree shape is visible:
//! `1 + 2 * 3` prints as `(1 + (2 * 3))`.

use std::fmt::{self, Display, Formatter};

use super::{
    AliasExpr, ArrayEntry, Assign, AssignKind, BinOp, Block, CommandArgRef, Condition, ConstDef,
    Expr, ExprKind, FileDeclarator, FunctionDef, Ident, Involving, InvolvingBlock, IterSource,
    IterateExpr, Literal, MethodCall, Param, Stmt, StmtKind, SystemCallKind, TypeName, UnaryOp,
    VarDef, VarInit,
};

// ============================================================================
// Helpers
// ============================================================================

fn write_comma_separated<T: Display>(f: &mut Formatter<'_>, items: &[T]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

fn write_stmts(f: &mut Formatter<'_>, stmts: &[Stmt]) -> fmt::Result {
    for stmt in stmts {
        write!(f, " {stmt}")?;
    }
    Ok(())
}

// ============================================================================
// Basic types
// ============================================================================

impl Display for Ident {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Display for Literal {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int(n) => write!(f, "{n}"),
            Literal::Hex(n) => write!(f, "0x{n:X}"),
            Literal::Octal(n) => write!(f, "0{n:o}"),
            Literal::Float(n) => {
                if n.fract() == 0.0 {
                    write!(f, "{n}.0")
                } else {
                    write!(f, "{n}")
                }
            }
            Literal::Char(c) => write!(f, "'{}'", c.escape_default()),
            Literal::String(s) => write!(f, "\"{}\"", s.escape_default()),
            Literal::Bool(b) => write!(f, "{b}"),
            Literal::Null => write!(f, "null"),
        }
    }
}

impl Display for CommandArgRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.index)
    }
}

// ============================================================================
// Expressions
// ============================================================================

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for ExprKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExprKind::Literal(lit) => write!(f, "{lit}"),
            ExprKind::Ident(name) => write!(f, "{name}"),
            ExprKind::Binary { left, op, right } => write!(f, "({left} {op} {right})"),
            ExprKind::NamedOp { left, op, right } => write!(f, "({left} {op} {right})"),
            ExprKind::Unary { op, expr } => write!(f, "{op}{expr}"),
            ExprKind::Paren(expr) => write!(f, "({expr})"),
            ExprKind::Call(call) => write!(f, "{call}"),
            ExprKind::Array(entries) => {
                write!(f, "[")?;
                write_comma_separated(f, entries)?;
                write!(f, "]")
            }
            ExprKind::ExBase(elements) => {
                write!(f, "<")?;
                write_comma_separated(f, elements)?;
                write!(f, ">")
            }
            ExprKind::DtBase(elements) => {
                write!(f, "<<")?;
                write_comma_separated(f, elements)?;
                write!(f, ">>")
            }
            ExprKind::HostCode(code) => write!(f, "@{{{code}}}@"),
            ExprKind::CommandArg(arg) => write!(f, "{arg}"),
            ExprKind::Involving(involving) => write!(f, "{involving}"),
        }
    }
}

impl Display for ArrayEntry {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ArrayEntry::Value(value) => write!(f, "{value}"),
            ArrayEntry::KeyValue { key, value } => write!(f, "{key} : {value}"),
        }
    }
}

impl Display for MethodCall {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            MethodCall::Registered { name, args } => {
                write!(f, "{name}(")?;
                write_comma_separated(f, args)?;
                write!(f, ")")
            }
            MethodCall::Special { name, args, path } => {
                write!(f, "{name}[")?;
                write_comma_separated(f, args)?;
                write!(f, "]({path})")
            }
            MethodCall::Module { ty, name, args } => {
                write!(f, "{ty}::{name}(")?;
                write_comma_separated(f, args)?;
                write!(f, ")")
            }
            MethodCall::System { kind, ty, expr } => {
                let keyword = match kind {
                    SystemCallKind::Cast => "cast",
                    SystemCallKind::InstanceOf => "typeof",
                };
                write!(f, "{keyword}[{ty}]({expr})")
            }
            MethodCall::Instance {
                receiver,
                name,
                args,
            } => {
                write!(f, "{receiver}.{name}(")?;
                write_comma_separated(f, args)?;
                write!(f, ")")
            }
        }
    }
}

impl Display for FileDeclarator {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind.keyword())?;
        if !self.options.is_empty() {
            write!(f, "[")?;
            write_comma_separated(f, &self.options)?;
            write!(f, "]")?;
        }
        write!(f, "({}", self.path)?;
        if let Some(second) = &self.second {
            write!(f, ", {second}")?;
        }
        write!(f, ")")
    }
}

// ============================================================================
// Filters
// ============================================================================

impl Display for Involving {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} | ", self.template)?;
        write_comma_separated(f, &self.conditions)?;
        write!(f, " }}")
    }
}

impl Display for InvolvingBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        write_stmts(f, &self.body)?;
        write!(f, " | ")?;
        write_comma_separated(f, &self.conditions)?;
        write!(f, " }}")
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Condition::List(iterate) => write!(f, "{iterate}"),
            Condition::Alias(alias) => write!(f, "{alias}"),
            Condition::Filter(expr) => write!(f, "{expr}"),
            Condition::Block(block) => write!(f, "{block}"),
        }
    }
}

impl Display for IterateExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} <- {}", self.binding, self.source)
    }
}

impl Display for IterSource {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            IterSource::File(file) => write!(f, "{file}"),
            IterSource::Name(name) => write!(f, "{name}"),
            IterSource::Array(expr) | IterSource::Call(expr) => write!(f, "{expr}"),
        }
    }
}

impl Display for AliasExpr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if let Some(ty) = &self.ty {
            write!(f, " : {ty}")?;
        }
        write!(f, " = {}", self.value)
    }
}

// ============================================================================
// Statements
// ============================================================================

impl Display for Block {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        write_stmts(f, &self.stmts)?;
        write!(f, " }}")
    }
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

impl Display for StmtKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            StmtKind::Block(block) => write!(f, "{block}"),
            StmtKind::If {
                cond,
                then_branch,
                else_branch,
            } => {
                write!(f, "sif ({cond}) {then_branch}")?;
                if let Some(else_branch) = else_branch {
                    write!(f, " selse {else_branch}")?;
                }
                Ok(())
            }
            StmtKind::Var(var) => write!(f, "{var}"),
            StmtKind::Const(def) => write!(f, "{def}"),
            StmtKind::Assign(assign) => write!(f, "{assign}"),
            StmtKind::Break => write!(f, "break;"),
            StmtKind::Return(Some(value)) => write!(f, "return {value};"),
            StmtKind::Return(None) => write!(f, "return;"),
            StmtKind::Expr(expr) => write!(f, "{expr};"),
            StmtKind::Empty => write!(f, ";"),
            StmtKind::VoidInvolving(involving) => write!(f, "{involving}"),
            StmtKind::InvolvingBlock(block) => write!(f, "{block}"),
        }
    }
}

impl Display for VarDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "var {} : {}", self.name, self.ty)?;
        match &self.init {
            Some(VarInit::Value(value)) => write!(f, " = {value}")?,
            Some(VarInit::New(args)) => {
                write!(f, " = new(")?;
                write_comma_separated(f, args)?;
                write!(f, ")")?;
            }
            Some(VarInit::FileBind(file)) => write!(f, " <<- {file}")?,
            None => {}
        }
        write!(f, ";")
    }
}

impl Display for ConstDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "const {} : {} = {};", self.name, self.ty, self.value)
    }
}

impl Display for Assign {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AssignKind::Value(value) => write!(f, "{} = {value};", self.target),
            AssignKind::Input(file) => write!(f, "{} <<- {file};", self.target),
            AssignKind::Output(file) => write!(f, "{} ->> {file};", self.target),
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

impl Display for Param {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.ty)
    }
}

impl Display for FunctionDef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "function {}(", self.name)?;
        write_comma_separated(f, &self.params)?;
        write!(f, ")")?;
        if let Some(ret) = &self.return_type {
            write!(f, " : {ret}")?;
        }
        write!(f, " {}", self.body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Span;

    fn lit(n: i64) -> Expr {
        Expr::new(ExprKind::Literal(Literal::Int(n)), Span::default())
    }

    #[test]
    fn binary_prints_parenthesised() {
        let expr = Expr::new(
            ExprKind::Binary {
                left: Box::new(lit(1)),
                op: BinOp::Add,
                right: Box::new(Expr::new(
                    ExprKind::Binary {
                        left: Box::new(lit(2)),
                        op: BinOp::Mul,
                        right: Box::new(lit(3)),
                    },
                    Span::default(),
                )),
            },
            Span::default(),
        );
        assert_eq!(expr.to_string(), "(1 + (2 * 3))");
    }

    #[test]
    fn literals_keep_their_radix() {
        assert_eq!(Literal::Hex(42).to_string(), "0x2A");
        assert_eq!(Literal::Octal(42).to_string(), "052");
        assert_eq!(Literal::Float(2.0).to_string(), "2.0");
        assert_eq!(Literal::String("a\"b".into()).to_string(), "\"a\\\"b\"");
        assert_eq!(Literal::Char('\n').to_string(), "'\\n'");
    }
}
