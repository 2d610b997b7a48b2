//! lintfmt core library.
//!
//! Turns linter rule configuration into formatter options and runs text
//! through two injected engines: a formatter and a linter with autofix.
//!
//! High-level modules:
//! - `translate`: rule values to formatter options (`options_for_formatting`).
//! - `fixable`: fix-pass linter config with non-fixable rules forced off.
//! - `pipeline`: plans and runs the fix and format stages in order.
//! - `resolver`: per-file discovery of linter and formatter config files.
//! - `engine`: the `Formatter` and `LintFixer` capabilities callers supply.
//! - `models`: rule, option and linter config data models.
//! - `config`: tool settings discovery and effective settings resolution.
//! - `inspect`: batch runners behind the CLI commands.
//! - `output`: human/JSON printers.
//! - `cli`: CLI argument parsing (binary uses this).
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod fixable;
pub mod inspect;
pub mod models;
pub mod output;
pub mod pipeline;
pub mod resolver;
pub mod translate;

pub use engine::{Formatter, LintFixer};
pub use error::{ConfigLookupError, PipelineError};
pub use pipeline::{format, FormatRequest, Pipeline, StageOrder};
pub use translate::options_for_formatting;
