//! Tool settings discovery and effective settings resolution.
//!
//! lintfmt reads `lintfmt.toml|yaml|yml` from the repository root (or closest
//! ancestor) and merges it with CLI flags to produce an `Effective` config.
//! Defaults:
//! - `output`: `human`
//! - `order`: `fix-then-format`
//! - `catalog`: none (the linter's fallback catalog)
//! - `fallback`: empty
//! - `extensions`: none (the linter's defaults)
//!
//! Overrides precedence: CLI > config file > defaults.

use crate::models::options::FormattingOptions;
use crate::pipeline::StageOrder;
use serde::Deserialize;
use serde_json::{Map, Value as Json};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

const SETTINGS_FILES: [&str; 3] = ["lintfmt.toml", "lintfmt.yaml", "lintfmt.yml"];

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `lintfmt.toml|yaml`.
pub struct ToolConfig {
    pub output: Option<String>,
    pub order: Option<StageOrder>,
    /// Path to a JSON rule catalog, relative to the repository root.
    pub catalog: Option<String>,
    /// Formatter options used when neither rules nor explicit options decide.
    pub fallback: Option<Map<String, Json>>,
    /// Extensions the linter handles, replacing its defaults.
    pub extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
/// Fully-resolved settings used by commands after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    pub output: String,
    pub order: StageOrder,
    pub catalog: Option<PathBuf>,
    pub fallback: FormattingOptions,
    pub extensions: Option<Vec<String>>,
}

/// Walk upward from `start` to detect the repository root.
///
/// Stops when a `lintfmt.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let mut cur = start;
    loop {
        if SETTINGS_FILES.iter().any(|f| cur.join(f).exists()) || cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start.to_path_buf(),
        }
    }
}

/// Load `ToolConfig` from `lintfmt.toml` or `lintfmt.yaml|yml` if present.
///
/// An unreadable or malformed file is logged and treated as absent.
pub fn load_config(root: &Path) -> Option<ToolConfig> {
    let path = SETTINGS_FILES
        .iter()
        .map(|f| root.join(f))
        .find(|p| p.exists())?;
    let s = match fs::read_to_string(&path) {
        Ok(s) => s,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "cannot read settings");
            return None;
        }
    };
    let parsed = if path.extension().is_some_and(|e| e == "toml") {
        toml::from_str::<ToolConfig>(&s).map_err(|e| e.to_string())
    } else {
        serde_yaml::from_str::<ToolConfig>(&s).map_err(|e| e.to_string())
    };
    match parsed {
        Ok(cfg) => Some(cfg),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "ignoring malformed settings");
            None
        }
    }
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_order: Option<StageOrder>,
    cli_catalog: Option<&str>,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let cfg = load_config(&repo_root).unwrap_or_default();

    let output = cli_output
        .map(|s| s.to_string())
        .or(cfg.output)
        .unwrap_or_else(|| "human".to_string());
    let order = cli_order.or(cfg.order).unwrap_or_default();

    // CLI catalog paths are taken as given; settings paths are repo-relative
    let catalog = cli_catalog
        .map(PathBuf::from)
        .or_else(|| cfg.catalog.map(|c| repo_root.join(c)));

    let fallback = cfg
        .fallback
        .map(|m| FormattingOptions::from_json_map(&m))
        .unwrap_or_default();

    Effective {
        repo_root,
        output,
        order,
        catalog,
        fallback,
        extensions: cfg.extensions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::options::{OptionKey, OptionValue};
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("lintfmt.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "json"
order = "format-then-fix"
catalog = "rules.json"
[fallback]
printWidth = 100
semi = false
    "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.output, "json");
        assert_eq!(eff.order, StageOrder::FormatThenFix);
        assert_eq!(eff.catalog, Some(root.join("rules.json")));
        assert_eq!(
            eff.fallback.get(OptionKey::PrintWidth),
            Some(OptionValue::Width(100))
        );
    }

    #[test]
    fn test_load_yaml_and_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("lintfmt.yaml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
extensions: [".js", ".cjs"]
            "#
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.output, "human");
        assert_eq!(eff.order, StageOrder::FixThenFormat);
        assert!(eff.catalog.is_none());
        assert!(eff.fallback.is_empty());
        assert_eq!(
            eff.extensions,
            Some(vec![".js".to_string(), ".cjs".to_string()])
        );
    }

    #[test]
    fn test_cli_takes_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        let mut f = fs::File::create(root.join("lintfmt.toml")).unwrap();
        writeln!(f, "output = \"json\"\norder = \"format-then-fix\"").unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("human"),
            Some(StageOrder::FixThenFormat),
            Some("/tmp/catalog.json"),
        );
        assert_eq!(eff.output, "human");
        assert_eq!(eff.order, StageOrder::FixThenFormat);
        assert_eq!(eff.catalog, Some(PathBuf::from("/tmp/catalog.json")));
    }

    #[test]
    fn test_malformed_settings_fall_back_to_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("lintfmt.toml"), "order = \"sideways\"").unwrap();
        assert!(load_config(root).is_none());
        let eff = resolve_effective(root.to_str(), None, None, None);
        assert_eq!(eff.order, StageOrder::FixThenFormat);
    }

    #[test]
    fn test_detect_repo_root_walks_up_to_git() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join(".git")).unwrap();
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(detect_repo_root(&nested), root.to_path_buf());
    }
}
