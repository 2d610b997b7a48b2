//! Batch runners behind the `options` and `fix-config` commands.
//!
//! Targets are expanded from globs under the repository root, planned in
//! parallel, and returned sorted by file so output is deterministic.

use crate::fixable::{fix_config, non_fixable_rules, RuleCatalog};
use crate::models::{FixConfigReport, OptionsReport};
use crate::pipeline::{effective_lint_config, plan, FormatRequest};
use crate::resolver::ConfigResolver;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Expand each pattern relative to `root`. Literal paths are kept even when
/// the file does not exist, since a file identity may be virtual.
pub fn collect_targets(root: &Path, patterns: &[String]) -> Vec<PathBuf> {
    let mut targets: Vec<PathBuf> = Vec::new();
    for pat in patterns {
        let abs = root.join(pat);
        if !pat.contains(&['*', '?', '['][..]) {
            targets.push(abs);
            continue;
        }
        let pattern = abs.to_string_lossy().to_string();
        match glob::glob(&pattern) {
            Ok(paths) => targets.extend(paths.flatten().filter(|p| p.is_file())),
            Err(e) => warn!(pattern = %pat, error = %e, "skipping invalid glob"),
        }
    }
    targets.sort();
    targets.dedup();
    targets
}

/// Path shown to users: relative to `root` when possible.
pub fn display_path(root: &Path, path: &Path) -> String {
    pathdiff::diff_paths(path, root)
        .filter(|rel| !rel.as_os_str().is_empty())
        .unwrap_or_else(|| path.to_path_buf())
        .to_string_lossy()
        .to_string()
}

/// Derive formatter options for every target. `template` supplies the
/// explicit settings shared by all files.
pub fn run_options<R>(
    root: &Path,
    targets: &[PathBuf],
    template: &FormatRequest,
    resolver: &R,
    catalog: &RuleCatalog,
) -> Vec<OptionsReport>
where
    R: ConfigResolver + Sync + ?Sized,
{
    let mut reports: Vec<OptionsReport> = targets
        .par_iter()
        .map(|path| {
            let request = template.clone().with_file_path(path.clone());
            let config = plan(&request, resolver, catalog);
            OptionsReport {
                file: display_path(root, path),
                options: config.formatting,
                fix_stage: config.fix.is_some(),
                order: config.order,
            }
        })
        .collect();
    reports.sort_by(|a, b| a.file.cmp(&b.file));
    reports
}

/// Describe the fix-pass configuration for one file.
pub fn run_fix_config<R>(
    root: &Path,
    path: &Path,
    template: &FormatRequest,
    resolver: &R,
    catalog: &RuleCatalog,
) -> FixConfigReport
where
    R: ConfigResolver + ?Sized,
{
    let request = template.clone().with_file_path(path);
    let lint = effective_lint_config(&request, resolver);
    let config = fix_config(&lint, catalog);
    FixConfigReport {
        file: display_path(root, path),
        fix_stage: config.handles(path),
        disabled: non_fixable_rules(&lint, catalog),
        config: config.with_default_parser(path),
    }
}
