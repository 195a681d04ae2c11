//! AADL Core - Parser and syntax tree builder for the algebraic accounting
//! description language
//!
//! This crate provides:
//! - Lexer: Tokenization of AADL source, including embedded host code blocks
//! - AST: Program tree, statements, expressions and filter expressions
//! - Parser: Recursive-descent parser with error recovery
//! - Diagnostics: `source:line:col:message` reporting through message sinks
//! - Config: Parse options loadable from TOML

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lexer module - tokenization of AADL source code
pub mod lexer;

/// Abstract Syntax Tree - parsed representation of an AADL program
pub mod ast;

/// Parser module - converts tokens into the program tree
pub mod parser;

/// Parse options
pub mod config;

/// Diagnostic messages and output sinks
pub mod diagnostics;

/// Convenience re-export of lexer
pub use lexer::Lexer;

/// Convenience re-export of parser
pub use parser::{ParseOutput, Parser};

/// Convenience re-export of parse options
pub use config::{ConfigError, ParseOptions};

/// Convenience re-export of diagnostic types
pub use diagnostics::{Diagnostic, MemorySink, MessageSink, StderrSink, StdoutSink};

/// Convenience re-export of the program roots
pub use ast::{ProgramInfo, ProgramTree};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn parse_through_crate_root() {
        let sink = MemorySink::new();
        let options = ParseOptions::default().with_error_sink(sink.clone());
        let output = Parser::parse_source("program Main { x = 1; }", options);
        assert!(!output.failed);
        assert_eq!(output.info.class_name, "Main");
        assert!(sink.lines().is_empty());
    }
}
