//! Two-pass orchestration: linter autofix and formatter over one text.
//!
//! A call is planned first (config lookup, option derivation, fix config)
//! and then run. Planning never fails; lookup problems degrade to defaults.
//! Running fails on the first engine error and returns no partial text.

use crate::engine::{Formatter, LintFixer};
use crate::error::{display_file, PipelineError};
use crate::fixable::{fix_config, FixConfig, RuleCatalog};
use crate::models::lint_config::LintConfig;
use crate::models::options::FormattingOptions;
use crate::resolver::{lookup_or_default, ConfigResolver};
use crate::translate::options_for_formatting;
use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Pass-through option carrying the file identity to the formatter.
pub const FILEPATH_OPTION: &str = "filepath";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StageOrder {
    #[default]
    FixThenFormat,
    FormatThenFix,
}

impl StageOrder {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "fix-then-format" => Some(StageOrder::FixThenFormat),
            "format-then-fix" => Some(StageOrder::FormatThenFix),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            StageOrder::FixThenFormat => "fix-then-format",
            StageOrder::FormatThenFix => "format-then-fix",
        }
    }

    fn stages(self) -> [Stage; 2] {
        match self {
            StageOrder::FixThenFormat => [Stage::Fix, Stage::Format],
            StageOrder::FormatThenFix => [Stage::Format, Stage::Fix],
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Stage {
    Fix,
    Format,
}

#[derive(Debug, Clone, PartialEq)]
/// Everything one run needs besides the text.
pub struct PipelineConfig {
    pub order: StageOrder,
    /// `None` when the linter does not handle the file.
    pub fix: Option<FixConfig>,
    pub formatting: FormattingOptions,
}

#[derive(Debug, Clone, Default)]
/// One format call.
pub struct FormatRequest {
    /// Source text; read from `file_path` when absent.
    pub text: Option<String>,
    /// Virtual identity used for config lookup and pattern matching.
    pub file_path: Option<PathBuf>,
    /// Merged over the discovered linter config.
    pub lint_config: LintConfig,
    /// Highest-precedence formatter options.
    pub formatter_options: FormattingOptions,
    /// Used only where neither explicit options nor rules give a value.
    pub fallback_options: FormattingOptions,
    pub stage_order: StageOrder,
}

impl FormatRequest {
    pub fn for_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn for_file(path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: Some(path.into()),
            ..Self::default()
        }
    }

    pub fn with_file_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.file_path = Some(path.into());
        self
    }

    pub fn with_lint_config(mut self, config: LintConfig) -> Self {
        self.lint_config = config;
        self
    }

    pub fn with_formatter_options(mut self, options: FormattingOptions) -> Self {
        self.formatter_options = options;
        self
    }

    pub fn with_fallback_options(mut self, options: FormattingOptions) -> Self {
        self.fallback_options = options;
        self
    }

    pub fn with_stage_order(mut self, order: StageOrder) -> Self {
        self.stage_order = order;
        self
    }

    /// The text to process: given text, else the file contents.
    pub fn source(&self) -> Result<String, PipelineError> {
        if let Some(text) = &self.text {
            return Ok(text.clone());
        }
        let Some(path) = &self.file_path else {
            return Err(PipelineError::SourceUnavailable {
                reason: "neither text nor file path given".to_string(),
            });
        };
        fs::read_to_string(path).map_err(|e| PipelineError::SourceUnavailable {
            reason: format!("cannot read {}: {}", path.display(), e),
        })
    }
}

/// Linter config in effect for the request's file: discovered, then the
/// explicit config, then matching override blocks.
pub fn effective_lint_config<R>(request: &FormatRequest, resolver: &R) -> LintConfig
where
    R: ConfigResolver + ?Sized,
{
    let file = request.file_path.as_deref();
    lookup_or_default(resolver.lint_config(file))
        .merged(request.lint_config.clone())
        .for_file(file)
}

/// Explicit formatter options in precedence order, lowest first: the file
/// path hint, discovered options, caller options.
pub fn explicit_formatter_options<R>(request: &FormatRequest, resolver: &R) -> FormattingOptions
where
    R: ConfigResolver + ?Sized,
{
    let file = request.file_path.as_deref();
    let mut explicit = FormattingOptions::new();
    if let Some(path) = file {
        explicit.set_extra(FILEPATH_OPTION, Json::from(path.to_string_lossy()));
    }
    explicit.overlay(&lookup_or_default(resolver.formatter_options(file)));
    explicit.overlay(&request.formatter_options);
    explicit
}

/// Resolve everything a run needs. Pure apart from config lookup.
pub fn plan<R>(request: &FormatRequest, resolver: &R, catalog: &RuleCatalog) -> PipelineConfig
where
    R: ConfigResolver + ?Sized,
{
    let lint = effective_lint_config(request, resolver);
    let explicit = explicit_formatter_options(request, resolver);
    let formatting = options_for_formatting(&lint.rules, &explicit, &request.fallback_options);

    let fix = fix_config(&lint, catalog);
    let fix = match request.file_path.as_deref() {
        Some(path) if !fix.handles(path) => {
            debug!(file = %path.display(), "extension not linted; fix stage skipped");
            None
        }
        Some(path) => Some(fix.with_default_parser(path)),
        None => Some(fix),
    };

    PipelineConfig {
        order: request.stage_order,
        fix,
        formatting,
    }
}

/// Engine pair driving the two passes.
pub struct Pipeline<F, L> {
    formatter: F,
    linter: L,
}

impl<F: Formatter, L: LintFixer> Pipeline<F, L> {
    pub fn new(formatter: F, linter: L) -> Self {
        Self { formatter, linter }
    }

    pub fn plan<R>(&self, request: &FormatRequest, resolver: &R) -> PipelineConfig
    where
        R: ConfigResolver + ?Sized,
    {
        plan(request, resolver, &self.linter.rule_catalog())
    }

    /// Run both stages in the configured order.
    pub fn run(
        &self,
        text: &str,
        file: Option<&Path>,
        config: &PipelineConfig,
    ) -> Result<String, PipelineError> {
        let mut text = text.to_string();
        for stage in config.order.stages() {
            text = match stage {
                Stage::Format => self.format_stage(&text, file, &config.formatting)?,
                Stage::Fix => match &config.fix {
                    Some(fix) => self.fix_stage(text, file, fix)?,
                    None => text,
                },
            };
        }
        Ok(text)
    }

    /// Plan and run a request end to end.
    pub fn format<R>(&self, request: &FormatRequest, resolver: &R) -> Result<String, PipelineError>
    where
        R: ConfigResolver + ?Sized,
    {
        let text = request.source()?;
        let config = self.plan(request, resolver);
        self.run(&text, request.file_path.as_deref(), &config)
    }

    fn format_stage(
        &self,
        text: &str,
        file: Option<&Path>,
        options: &FormattingOptions,
    ) -> Result<String, PipelineError> {
        debug!(file = %display_file(file), "format stage");
        self.formatter
            .format(text, options)
            .map_err(|source| PipelineError::ParseFailure {
                file: display_file(file),
                source,
            })
    }

    fn fix_stage(
        &self,
        text: String,
        file: Option<&Path>,
        config: &FixConfig,
    ) -> Result<String, PipelineError> {
        debug!(file = %display_file(file), "fix stage");
        let report = self
            .linter
            .lint_fix(&text, file, config)
            .map_err(|source| PipelineError::LintEngineFailure {
                file: display_file(file),
                source,
            })?;
        if !report.remaining.is_empty() {
            debug!(count = report.remaining.len(), "violations left after autofix");
        }
        Ok(report.output.unwrap_or(text))
    }
}

/// Format one request with the given engines.
pub fn format<R, F, L>(
    request: &FormatRequest,
    resolver: &R,
    formatter: F,
    linter: L,
) -> Result<String, PipelineError>
where
    R: ConfigResolver + ?Sized,
    F: Formatter,
    L: LintFixer,
{
    Pipeline::new(formatter, linter).format(request, resolver)
}
