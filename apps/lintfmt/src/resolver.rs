//! Per-file lookup of linter configuration and formatter options.
//!
//! `FsConfigResolver` mirrors how the two tools find their own config:
//! - Linter config cascades. Every `.eslintrc.{json,yaml,yml}` from the
//!   file's directory up to the filesystem root is merged, outermost first,
//!   stopping at the first config that sets `root: true`.
//! - Formatter options do not cascade. The nearest `.prettierrc*` wins.
//!
//! Lookups are pure functions of the file identity. A failing lookup is
//! reported as `ConfigLookupError`; `lookup_or_default` turns it into
//! defaults so an unconfigured file stays formattable.

use crate::error::ConfigLookupError;
use crate::models::lint_config::LintConfig;
use crate::models::options::FormattingOptions;
use serde_json::Value as Json;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const LINT_CONFIG_FILES: [&str; 3] = [".eslintrc.json", ".eslintrc.yaml", ".eslintrc.yml"];
pub const FORMAT_CONFIG_FILES: [&str; 5] = [
    ".prettierrc",
    ".prettierrc.json",
    ".prettierrc.yaml",
    ".prettierrc.yml",
    ".prettierrc.toml",
];

/// Source of per-file configuration.
pub trait ConfigResolver {
    /// Merged linter config for `file`, overrides not yet flattened.
    fn lint_config(&self, file: Option<&Path>) -> Result<LintConfig, ConfigLookupError>;

    /// Formatter options configured for `file`.
    fn formatter_options(&self, file: Option<&Path>)
        -> Result<FormattingOptions, ConfigLookupError>;
}

/// Resolver for callers that pass every setting explicitly.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoConfig;

impl ConfigResolver for NoConfig {
    fn lint_config(&self, _file: Option<&Path>) -> Result<LintConfig, ConfigLookupError> {
        Ok(LintConfig::default())
    }

    fn formatter_options(
        &self,
        _file: Option<&Path>,
    ) -> Result<FormattingOptions, ConfigLookupError> {
        Ok(FormattingOptions::default())
    }
}

#[derive(Debug, Clone)]
/// Discovers config files on disk, starting next to the file.
pub struct FsConfigResolver {
    cwd: PathBuf,
}

impl FsConfigResolver {
    /// `cwd` anchors relative file paths and is the start directory when no
    /// file identity is given.
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self { cwd: cwd.into() }
    }

    fn start_dir(&self, file: Option<&Path>) -> PathBuf {
        match file {
            Some(f) => {
                let abs = if f.is_absolute() {
                    f.to_path_buf()
                } else {
                    self.cwd.join(f)
                };
                abs.parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| self.cwd.clone())
            }
            None => self.cwd.clone(),
        }
    }
}

impl ConfigResolver for FsConfigResolver {
    fn lint_config(&self, file: Option<&Path>) -> Result<LintConfig, ConfigLookupError> {
        let start = self.start_dir(file);
        let mut layers: Vec<LintConfig> = Vec::new();
        let mut cur = start.as_path();
        loop {
            if let Some(path) = first_existing(cur, &LINT_CONFIG_FILES) {
                debug!(path = %path.display(), "found linter config");
                let cfg = load_lint_config(&path)?;
                let root = cfg.root;
                layers.push(cfg);
                if root {
                    break;
                }
            }
            match cur.parent() {
                Some(p) => cur = p,
                None => break,
            }
        }
        Ok(layers
            .into_iter()
            .rev()
            .fold(LintConfig::default(), LintConfig::merged))
    }

    fn formatter_options(
        &self,
        file: Option<&Path>,
    ) -> Result<FormattingOptions, ConfigLookupError> {
        let start = self.start_dir(file);
        let mut cur = start.as_path();
        loop {
            if let Some(path) = first_existing(cur, &FORMAT_CONFIG_FILES) {
                debug!(path = %path.display(), "found formatter config");
                return load_formatter_options(&path);
            }
            match cur.parent() {
                Some(p) => cur = p,
                None => return Ok(FormattingOptions::default()),
            }
        }
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|n| dir.join(n)).find(|p| p.is_file())
}

fn read(path: &Path) -> Result<String, ConfigLookupError> {
    fs::read_to_string(path).map_err(|source| ConfigLookupError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, message: impl ToString) -> ConfigLookupError {
    ConfigLookupError::Parse {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Parse a file into JSON by its extension; extensionless files are YAML
/// (which also accepts JSON).
fn read_structured(path: &Path) -> Result<Json, ConfigLookupError> {
    let s = read(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&s).map_err(|e| parse_error(path, e)),
        Some("toml") => toml::from_str(&s).map_err(|e| parse_error(path, e)),
        _ => serde_yaml::from_str(&s).map_err(|e| parse_error(path, e)),
    }
}

pub fn load_lint_config(path: &Path) -> Result<LintConfig, ConfigLookupError> {
    let json = read_structured(path)?;
    serde_json::from_value(json).map_err(|e| parse_error(path, e))
}

pub fn load_formatter_options(path: &Path) -> Result<FormattingOptions, ConfigLookupError> {
    match read_structured(path)? {
        Json::Object(map) => Ok(FormattingOptions::from_json_map(&map)),
        Json::Null => Ok(FormattingOptions::default()),
        _ => Err(parse_error(path, "expected a table of options")),
    }
}

/// Swallow a lookup failure, logging it, and use defaults instead.
pub fn lookup_or_default<T: Default>(result: Result<T, ConfigLookupError>) -> T {
    result.unwrap_or_else(|e| {
        warn!(error = %e, "config lookup failed; using defaults");
        T::default()
    })
}
