//! Type names

use serde::Serialize;

use crate::lexer::Span;

use super::{Ident, Spanned};

/// A dotted type path such as `Exalge` or `dtalge.DtBase`
///
/// Also used for package names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TypeName {
    /// At least one segment
    pub segments: Vec<Ident>,
    pub span: Span,
}

impl TypeName {
    #[must_use]
    pub fn new(segments: Vec<Ident>, span: Span) -> Self {
        Self { segments, span }
    }

    /// A single-segment type name
    #[must_use]
    pub fn simple(name: impl Into<String>, span: Span) -> Self {
        Self::new(vec![Ident::new(name, span)], span)
    }

    /// The last segment, e.g. `DtBase` for `dtalge.DtBase`
    #[must_use]
    pub fn base_name(&self) -> &str {
        self.segments.last().map_or("", |s| s.name.as_str())
    }

    /// The full dotted path
    #[must_use]
    pub fn path(&self) -> String {
        self.segments
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl Spanned for TypeName {
    fn span(&self) -> Span {
        self.span
    }
}
