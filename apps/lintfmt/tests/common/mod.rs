//! Fake engines shared by the integration tests.
//!
//! The formatter only honours `semi`; the linter only fixes `no-var`.

#![allow(dead_code)]

use lintfmt::engine::{FixReport, FormatError, LintEngineError, LintMessage};
use lintfmt::fixable::{FixConfig, FixKind, RuleCatalog, RuleMeta};
use lintfmt::models::options::{FormattingOptions, OptionKey, OptionValue};
use lintfmt::models::rule::Severity;
use lintfmt::{Formatter, LintFixer};
use std::path::Path;
use std::sync::{Arc, Mutex};

pub type CallLog = Arc<Mutex<Vec<String>>>;

pub fn call_log() -> CallLog {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn calls(log: &CallLog) -> Vec<String> {
    log.lock().unwrap().clone()
}

pub struct SemiFormatter {
    pub log: CallLog,
}

impl SemiFormatter {
    pub fn new(log: &CallLog) -> Self {
        Self { log: log.clone() }
    }
}

impl Formatter for SemiFormatter {
    fn format(&self, text: &str, options: &FormattingOptions) -> Result<String, FormatError> {
        self.log.lock().unwrap().push("format".to_string());
        if let Some(col) = text.find("<<<") {
            return Err(FormatError::new("Unexpected token").at(1, col + 1));
        }
        let semi = options.get(OptionKey::Semicolons) != Some(OptionValue::Bool(false));
        let mut lines: Vec<String> = Vec::new();
        for line in text.lines() {
            let line = line.trim_end();
            let out = if line.is_empty() {
                String::new()
            } else if semi && !line.ends_with(';') {
                format!("{};", line)
            } else if !semi {
                line.trim_end_matches(';').to_string()
            } else {
                line.to_string()
            };
            lines.push(out);
        }
        let mut out = lines.join("\n");
        if text.ends_with('\n') {
            out.push('\n');
        }
        Ok(out)
    }
}

pub struct NoVarLinter {
    pub log: CallLog,
    pub seen: Arc<Mutex<Vec<FixConfig>>>,
}

impl NoVarLinter {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            seen: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn last_config(&self) -> Option<FixConfig> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl LintFixer for NoVarLinter {
    fn lint_fix(
        &self,
        text: &str,
        _file: Option<&Path>,
        config: &FixConfig,
    ) -> Result<FixReport, LintEngineError> {
        self.log.lock().unwrap().push("fix".to_string());
        self.seen.lock().unwrap().push(config.clone());
        if text.contains("crash!") {
            return Err(LintEngineError::new("rule threw while linting"));
        }
        let enabled = config.rules.get("no-var").is_some_and(|r| !r.is_off());
        if !enabled || !text.contains("var ") {
            return Ok(FixReport::default());
        }
        Ok(FixReport {
            output: Some(text.replace("var ", "let ")),
            remaining: vec![LintMessage {
                rule_id: Some("no-undef".to_string()),
                severity: Severity::Error,
                message: "'y' is not defined".to_string(),
                line: 1,
                column: 9,
            }],
        })
    }

    fn rule_catalog(&self) -> RuleCatalog {
        RuleCatalog::new()
            .with_rule("no-var", RuleMeta::fixable(FixKind::Code))
            .with_rule("semi", RuleMeta::fixable(FixKind::Code))
            .with_rule("quotes", RuleMeta::fixable(FixKind::Code))
            .with_rule("no-undef", RuleMeta::default())
    }
}
