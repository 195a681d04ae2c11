//! Per-parse accumulation of program-level facts
//!
//! Functions and top-level constants from both submodules and every `$n`
//! reference are appended here as they are parsed. One context belongs to
//! exactly one parse; [`BuildContext::finish`] consumes it.

use log::debug;

use crate::ast::{CommandArgRef, ConstDef, FunctionDef, ProgramInfo};

#[derive(Debug, Default)]
pub(crate) struct BuildContext {
    class_name: String,
    command_args: Vec<CommandArgRef>,
    functions: Vec<FunctionDef>,
    consts: Vec<ConstDef>,
}

impl BuildContext {
    pub(crate) fn set_class_name(&mut self, name: &str) {
        self.class_name = name.to_string();
    }

    pub(crate) fn record_command_arg(&mut self, arg: CommandArgRef) {
        self.command_args.push(arg);
    }

    pub(crate) fn record_function(&mut self, def: &FunctionDef) {
        self.functions.push(def.clone());
    }

    pub(crate) fn record_const(&mut self, def: &ConstDef) {
        self.consts.push(def.clone());
    }

    /// The info root and the combined top-level constants for the tree root
    pub(crate) fn finish(self) -> (ProgramInfo, Vec<ConstDef>) {
        debug!(
            "build context for '{}': {} function(s), {} const(s), {} command arg(s)",
            self.class_name,
            self.functions.len(),
            self.consts.len(),
            self.command_args.len()
        );
        let info = ProgramInfo {
            class_name: self.class_name,
            command_args: self.command_args,
            functions: self.functions,
        };
        (info, self.consts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{Block, Expr, ExprKind, Ident, Literal, TypeName};
    use crate::lexer::{Location, Span};

    fn function(name: &str) -> FunctionDef {
        FunctionDef {
            name: Ident::new(name, Span::default()),
            params: Vec::new(),
            return_type: None,
            body: Block::empty(Span::default()),
            span: Span::default(),
        }
    }

    #[test]
    fn finish_keeps_encounter_order() {
        let mut context = BuildContext::default();
        context.set_class_name("Main");
        context.record_function(&function("f"));
        context.record_function(&function("g"));
        context.record_const(&ConstDef {
            name: Ident::new("RATE", Span::default()),
            ty: TypeName::simple("Decimal", Span::default()),
            value: Expr::new(ExprKind::Literal(Literal::Int(3)), Span::default()),
            span: Span::default(),
        });
        for index in [2, 1] {
            context.record_command_arg(CommandArgRef {
                index,
                text: format!("${index}"),
                span: Span::default(),
                location: Location::default(),
            });
        }

        let (info, consts) = context.finish();
        assert_eq!(info.class_name, "Main");
        let names: Vec<_> = info.functions.iter().map(|f| f.name.name.as_str()).collect();
        assert_eq!(names, ["f", "g"]);
        let indexes: Vec<_> = info.command_args.iter().map(|a| a.index).collect();
        assert_eq!(indexes, [2, 1]);
        assert_eq!(consts.len(), 1);
    }

    #[test]
    fn default_context_is_empty() {
        let (info, consts) = BuildContext::default().finish();
        assert_eq!(info, ProgramInfo::default());
        assert!(consts.is_empty());
    }
}
