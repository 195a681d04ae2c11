//! Parser configuration
//!
//! Options can be built in code or loaded from TOML:
//!
//! ```
//! use aadl_core::ParseOptions;
//!
//! let options = ParseOptions::from_toml_str(
//!     r#"
//!     source_name = "ledger.aadl"
//!     max_diagnostics = 20
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(options.source_name, "ledger.aadl");
//! assert!(!options.verbose);
//! ```

use std::fmt;
use std::path::Path;
use std::rc::Rc;

use serde::Deserialize;
use thiserror::Error;

use crate::diagnostics::{MessageSink, StderrSink, StdoutSink};

/// Errors loading [`ParseOptions`]
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read options file: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid options: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Settings for one parse
#[derive(Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParseOptions {
    /// Name shown at the start of every diagnostic line
    pub source_name: String,

    /// Stop printing after this many diagnostics; all are still recorded
    pub max_diagnostics: Option<usize>,

    /// Write a one-line summary to the output sink after parsing
    pub verbose: bool,

    #[serde(skip, default = "default_output_sink")]
    pub(crate) output_sink: Rc<dyn MessageSink>,

    #[serde(skip, default = "default_error_sink")]
    pub(crate) error_sink: Rc<dyn MessageSink>,
}

fn default_output_sink() -> Rc<dyn MessageSink> {
    Rc::new(StdoutSink)
}

fn default_error_sink() -> Rc<dyn MessageSink> {
    Rc::new(StderrSink)
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            source_name: "<input>".to_string(),
            max_diagnostics: None,
            verbose: false,
            output_sink: default_output_sink(),
            error_sink: default_error_sink(),
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("source_name", &self.source_name)
            .field("max_diagnostics", &self.max_diagnostics)
            .field("verbose", &self.verbose)
            .finish_non_exhaustive()
    }
}

impl ParseOptions {
    /// Parse options from TOML text; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load options from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    #[must_use]
    pub fn with_source_name(mut self, name: impl Into<String>) -> Self {
        self.source_name = name.into();
        self
    }

    /// Replace the sink receiving the verbose summary
    #[must_use]
    pub fn with_output_sink(mut self, sink: impl MessageSink + 'static) -> Self {
        self.output_sink = Rc::new(sink);
        self
    }

    /// Replace the sink receiving diagnostics
    #[must_use]
    pub fn with_error_sink(mut self, sink: impl MessageSink + 'static) -> Self {
        self.error_sink = Rc::new(sink);
        self
    }
}
