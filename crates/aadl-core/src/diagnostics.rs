//! Diagnostic reporting
//!
//! Every syntax error becomes one line `source:line:column:message` written
//! to the configured error sink. Diagnostics are also kept in memory and
//! returned with the parse result.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use log::debug;
use serde::Serialize;

use crate::config::ParseOptions;
use crate::lexer::{Location, Span};
use crate::parser::{ParseError, ParseErrorKind};

/// Accepts one line of text
pub trait MessageSink: fmt::Debug {
    fn write_line(&self, line: &str);
}

/// Writes lines to standard output
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutSink;

impl MessageSink for StdoutSink {
    fn write_line(&self, line: &str) {
        println!("{line}");
    }
}

/// Writes lines to standard error
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrSink;

impl MessageSink for StderrSink {
    fn write_line(&self, line: &str) {
        eprintln!("{line}");
    }
}

/// Collects lines in memory
///
/// Clones share the same buffer, so a test can keep one handle and pass
/// another to [`ParseOptions`].
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    lines: Rc<RefCell<Vec<String>>>,
}

impl MemorySink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every line written so far
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    /// Remove and return every line written so far
    pub fn take(&self) -> Vec<String> {
        std::mem::take(&mut *self.lines.borrow_mut())
    }
}

impl MessageSink for MemorySink {
    fn write_line(&self, line: &str) {
        self.lines.borrow_mut().push(line.to_string());
    }
}

/// One reported syntax error
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    /// Source name from [`ParseOptions::source_name`]
    pub source: String,
    pub location: Location,
    pub span: Span,
    pub message: String,
    #[serde(skip)]
    pub kind: ParseErrorKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}:{}:{}",
            self.source, self.location.line, self.location.column, self.message
        )
    }
}

/// Formats, prints and records diagnostics for one parse
#[derive(Debug)]
pub(crate) struct Reporter {
    source_name: String,
    max_printed: Option<usize>,
    sink: Rc<dyn MessageSink>,
    diagnostics: Vec<Diagnostic>,
    failed: bool,
}

impl Reporter {
    pub(crate) fn new(options: &ParseOptions) -> Self {
        Self {
            source_name: options.source_name.clone(),
            max_printed: options.max_diagnostics,
            sink: Rc::clone(&options.error_sink),
            diagnostics: Vec::new(),
            failed: false,
        }
    }

    pub(crate) fn report(&mut self, error: ParseError) {
        self.failed = true;
        let diagnostic = Diagnostic {
            source: self.source_name.clone(),
            location: error.location,
            span: error.span,
            message: error.message(),
            kind: error.kind,
        };
        if self
            .max_printed
            .map_or(true, |max| self.diagnostics.len() < max)
        {
            self.sink.write_line(&diagnostic.to_string());
        } else {
            debug!("diagnostic limit reached, suppressing: {diagnostic}");
        }
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn failed(&self) -> bool {
        self.failed
    }

    pub(crate) fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub(crate) fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}
