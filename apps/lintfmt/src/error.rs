//! Error types for option resolution and the format/fix pipeline.
//!
//! - `ConfigLookupError` is never fatal: callers log it and fall back to
//!   default configuration.
//! - `PipelineError` aborts the call; no partial text is returned.

use crate::engine::{FormatError, LintEngineError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigLookupError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("formatter could not parse {file}: {source}")]
    ParseFailure {
        file: String,
        #[source]
        source: FormatError,
    },
    #[error("lint engine failed on {file}: {source}")]
    LintEngineFailure {
        file: String,
        #[source]
        source: LintEngineError,
    },
    #[error("no source text: {reason}")]
    SourceUnavailable { reason: String },
}

/// Display name for an optional file identity.
pub(crate) fn display_file(file: Option<&std::path::Path>) -> String {
    file.map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "<text>".to_string())
}
