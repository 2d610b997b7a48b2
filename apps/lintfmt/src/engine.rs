//! Engine handles injected by the caller.
//!
//! The core never locates or loads a formatter or linter itself; it only calls
//! these two capabilities. Implementations must treat each call as blocking to
//! completion.

use crate::fixable::{FixConfig, RuleCatalog};
use crate::models::options::FormattingOptions;
use crate::models::rule::Severity;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("{message}")]
/// The formatter could not parse its input.
pub struct FormatError {
    pub message: String,
    pub line: Option<usize>,
    pub column: Option<usize>,
}

impl FormatError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            line: None,
            column: None,
        }
    }

    pub fn at(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
/// The linter crashed. Rule violations are reported in `FixReport`, never here.
pub struct LintEngineError {
    pub message: String,
}

impl LintEngineError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
/// A violation the autofix pass left behind.
pub struct LintMessage {
    pub rule_id: Option<String>,
    pub severity: Severity,
    pub message: String,
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Result of one autofix run.
pub struct FixReport {
    /// Corrected text; `None` when nothing was fixed.
    pub output: Option<String>,
    pub remaining: Vec<LintMessage>,
}

/// Re-lays out text from a fixed option set.
pub trait Formatter {
    fn format(&self, text: &str, options: &FormattingOptions) -> Result<String, FormatError>;
}

/// Applies rule autofixes to text.
pub trait LintFixer {
    /// `file` is a virtual identity used for file-pattern matching only.
    fn lint_fix(
        &self,
        text: &str,
        file: Option<&Path>,
        config: &FixConfig,
    ) -> Result<FixReport, LintEngineError>;

    /// Rules the engine has loaded, with fixability metadata.
    fn rule_catalog(&self) -> RuleCatalog {
        RuleCatalog::fallback()
    }
}

impl<T: Formatter + ?Sized> Formatter for &T {
    fn format(&self, text: &str, options: &FormattingOptions) -> Result<String, FormatError> {
        (**self).format(text, options)
    }
}

impl<T: LintFixer + ?Sized> LintFixer for &T {
    fn lint_fix(
        &self,
        text: &str,
        file: Option<&Path>,
        config: &FixConfig,
    ) -> Result<FixReport, LintEngineError> {
        (**self).lint_fix(text, file, config)
    }

    fn rule_catalog(&self) -> RuleCatalog {
        (**self).rule_catalog()
    }
}
