//! Filter ("involving") constructs
//!
//! `{ template | c1, c2, ... }` evaluates its conditions strictly left to
//! right. List and alias bindings introduce names visible to every later
//! condition and to the template or body. The parser does not enforce that
//! rule; [`Involving::forward_references`] exposes violations for the
//! semantic pass.

use serde::Serialize;

use crate::lexer::Span;

use super::{Block, Expr, FileDeclarator, Ident, MethodCall, Spanned, Stmt, TypeName};

/// Value-producing filter `{ template | conditions }`
///
/// Also used as a statement (evaluated for effect) when it opens a block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Involving {
    pub template: Box<Expr>,
    pub conditions: Vec<Condition>,
    pub span: Span,
}

impl Involving {
    #[must_use]
    pub fn new(template: Expr, conditions: Vec<Condition>, span: Span) -> Self {
        Self {
            template: Box::new(template),
            conditions,
            span,
        }
    }

    /// Conditions that use a name before the condition binding it
    #[must_use]
    pub fn forward_references(&self) -> Vec<ForwardReference> {
        forward_references(&self.conditions)
    }

    /// Names introduced by the conditions, in order
    #[must_use]
    pub fn bindings(&self) -> Vec<&Ident> {
        self.conditions.iter().filter_map(Condition::binding).collect()
    }

    pub(crate) fn collect_free_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        let mut inner = Vec::new();
        for condition in &self.conditions {
            condition.collect_references(&mut inner);
        }
        self.template.collect_references(&mut inner);
        push_unbound(&self.conditions, inner, out);
    }
}

impl Spanned for Involving {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement filter `{ stmt* | conditions }`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InvolvingBlock {
    pub body: Vec<Stmt>,
    pub conditions: Vec<Condition>,
    pub span: Span,
}

impl InvolvingBlock {
    #[must_use]
    pub fn new(body: Vec<Stmt>, conditions: Vec<Condition>, span: Span) -> Self {
        Self {
            body,
            conditions,
            span,
        }
    }

    #[must_use]
    pub fn forward_references(&self) -> Vec<ForwardReference> {
        forward_references(&self.conditions)
    }

    pub(crate) fn collect_free_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        let mut inner = Vec::new();
        for condition in &self.conditions {
            condition.collect_references(&mut inner);
        }
        for stmt in &self.body {
            stmt.collect_references(&mut inner);
        }
        push_unbound(&self.conditions, inner, out);
    }
}

impl Spanned for InvolvingBlock {
    fn span(&self) -> Span {
        self.span
    }
}

/// One comma-separated entry after the `|`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Condition {
    /// `x <- source`
    List(IterateExpr),
    /// `x [: Type] = expr`
    Alias(AliasExpr),
    /// A predicate; introduces no binding
    Filter(Expr),
    /// A nested `{ stmt* }` sub-filter
    Block(Block),
}

impl Condition {
    /// The name this condition introduces, if any
    #[must_use]
    pub fn binding(&self) -> Option<&Ident> {
        match self {
            Condition::List(iterate) => Some(&iterate.binding),
            Condition::Alias(alias) => Some(&alias.name),
            Condition::Filter(_) | Condition::Block(_) => None,
        }
    }

    /// Identifiers this condition reads
    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match self {
            Condition::List(iterate) => iterate.source.collect_references(out),
            Condition::Alias(alias) => alias.value.collect_references(out),
            Condition::Filter(expr) => expr.collect_references(out),
            Condition::Block(block) => {
                for stmt in &block.stmts {
                    stmt.collect_references(out);
                }
            }
        }
    }
}

impl Spanned for Condition {
    fn span(&self) -> Span {
        match self {
            Condition::List(iterate) => iterate.span,
            Condition::Alias(alias) => alias.span,
            Condition::Filter(expr) => expr.span,
            Condition::Block(block) => block.span,
        }
    }
}

/// List binding `name <- source`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IterateExpr {
    pub binding: Ident,
    pub source: IterSource,
    pub span: Span,
}

/// What a list binding iterates over
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum IterSource {
    File(FileDeclarator),
    /// A named collection
    Name(Ident),
    /// An array literal; holds the whole literal expression
    Array(Box<Expr>),
    /// A method call, possibly chained; holds the call expression
    Call(Box<Expr>),
}

impl IterSource {
    fn collect_references<'a>(&'a self, out: &mut Vec<&'a Ident>) {
        match self {
            IterSource::File(file) => file.collect_references(out),
            IterSource::Name(name) => out.push(name),
            IterSource::Array(expr) | IterSource::Call(expr) => expr.collect_references(out),
        }
    }

    /// The call, when the source is a method call
    #[must_use]
    pub fn as_call(&self) -> Option<&MethodCall> {
        match self {
            IterSource::Call(expr) => match &expr.kind {
                super::ExprKind::Call(call) => Some(call),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Alias binding `name [: Type] = value`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AliasExpr {
    pub name: Ident,
    pub ty: Option<TypeName>,
    pub value: Expr,
    pub span: Span,
}

/// A name used by a condition before the condition that binds it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForwardReference {
    /// The offending use
    pub reference: Ident,
    /// The later binding it resolves to
    pub binding: Ident,
    /// Index of the condition containing the use
    pub condition: usize,
}

fn forward_references(conditions: &[Condition]) -> Vec<ForwardReference> {
    let mut found = Vec::new();
    for (index, condition) in conditions.iter().enumerate() {
        let visible: Vec<&str> = conditions[..index]
            .iter()
            .filter_map(Condition::binding)
            .map(|b| b.name.as_str())
            .collect();

        let mut references = Vec::new();
        condition.collect_references(&mut references);

        for reference in references {
            if visible.contains(&reference.name.as_str()) {
                continue;
            }
            let later = conditions[index + 1..]
                .iter()
                .filter_map(Condition::binding)
                .find(|b| b.name == reference.name);
            if let Some(binding) = later {
                found.push(ForwardReference {
                    reference: reference.clone(),
                    binding: binding.clone(),
                    condition: index,
                });
            }
        }
    }
    found
}

fn push_unbound<'a>(conditions: &'a [Condition], inner: Vec<&'a Ident>, out: &mut Vec<&'a Ident>) {
    let bound: Vec<&str> = conditions
        .iter()
        .filter_map(Condition::binding)
        .map(|b| b.name.as_str())
        .collect();
    out.extend(
        inner
            .into_iter()
            .filter(|r| !bound.contains(&r.name.as_str())),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{ExprKind, StmtKind};
    use crate::config::ParseOptions;
    use crate::diagnostics::MemorySink;
    use crate::parser::Parser;

    fn involving(source: &str) -> Involving {
        match Parser::parse_expression(source).map(|e| e.kind) {
            Ok(ExprKind::Involving(involving)) => involving,
            other => panic!("expected involving, got {other:?}"),
        }
    }

    #[test]
    fn bindings_in_order() {
        let inv = involving("{ a + b | a <- xs, a > 0, b = a * 2, { c = b; } }");
        let names: Vec<_> = inv.bindings().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, ["a", "b"]);
        assert!(inv.forward_references().is_empty());
    }

    #[test]
    fn template_sees_every_binding() {
        let mut free = Vec::new();
        let inv = involving("{ a + b + c | a <- xs, b = a }");
        inv.collect_free_references(&mut free);
        let names: Vec<_> = free.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["xs", "c"]);
    }

    #[test]
    fn forward_use_inside_a_filter() {
        let inv = involving("{ a | a <- xs, a > b, b = 1 }");
        let forward = inv.forward_references();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].reference.name, "b");
        assert_eq!(forward[0].condition, 1);
    }

    #[test]
    fn binding_may_shadow_an_outer_name() {
        assert!(involving("{ r | r <- r.rows() }").forward_references().is_empty());
        assert!(involving("{ t | t = t + 1 }").forward_references().is_empty());

        let forward = involving("{ t | t = u, u = t }").forward_references();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].reference.name, "u");
    }

    #[test]
    fn involving_block_forward_references() {
        let options = ParseOptions::default().with_error_sink(MemorySink::new());
        let output = Parser::parse_source(
            "program P { { total = total + v; | v = w, w <- rows } }",
            options,
        );
        assert!(!output.failed, "{:?}", output.diagnostics);
        let body = &output.tree.main.as_ref().unwrap().body.stmts;
        let StmtKind::InvolvingBlock(block) = &body[0].kind else {
            panic!("expected involving block");
        };
        let forward = block.forward_references();
        assert_eq!(forward.len(), 1);
        assert_eq!(forward[0].binding.name, "w");
    }
}
