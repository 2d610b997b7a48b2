//! Shared data models for rule configs, formatter options, and CLI reports.

pub mod lint_config;
pub mod options;
pub mod rule;

use crate::fixable::FixConfig;
use crate::pipeline::StageOrder;
use options::FormattingOptions;
use serde::Serialize;

#[derive(Serialize)]
/// Derived formatter options for a single file.
pub struct OptionsReport {
    pub file: String,
    pub options: FormattingOptions,
    /// Whether the autofix stage would run for this file.
    pub fix_stage: bool,
    pub order: StageOrder,
}

#[derive(Serialize)]
/// Fix-pass configuration for a single file.
pub struct FixConfigReport {
    pub file: String,
    pub fix_stage: bool,
    /// Rules forced off because they cannot autofix anything.
    pub disabled: Vec<String>,
    pub config: FixConfig,
}
