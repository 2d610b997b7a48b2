//! Typed linter configuration and its field-by-field merge.
//!
//! Precedence when layering configs: the upper layer wins per field. Rules
//! merge per rule name (see `RuleConfig::merged_onto`), maps merge per key,
//! `plugins` is an ordered union, scalars are replaced only when set.

use super::rule::RuleSet;
use glob::{MatchOptions, Pattern};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};
use tracing::warn;

/// File extensions the linter handles when none are configured.
pub const DEFAULT_EXTENSIONS: [&str; 6] = [".js", ".jsx", ".ts", ".tsx", ".mjs", ".vue"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LintConfig {
    /// Stop cascading discovery at this config.
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub root: bool,
    pub rules: RuleSet,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub settings: Map<String, Json>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub globals: BTreeMap<String, GlobalAccess>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub plugins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub parser_options: Map<String, Json>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extensions: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub overrides: Vec<OverrideBlock>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
/// Config applied only to files matching `files` and not `excluded_files`.
pub struct OverrideBlock {
    pub files: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub excluded_files: Vec<String>,
    #[serde(flatten)]
    pub config: LintConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "Json", rename_all = "lowercase")]
/// Access granted to a declared global.
pub enum GlobalAccess {
    Readonly,
    Writable,
    Off,
}

impl GlobalAccess {
    pub fn as_str(self) -> &'static str {
        match self {
            GlobalAccess::Readonly => "readonly",
            GlobalAccess::Writable => "writable",
            GlobalAccess::Off => "off",
        }
    }
}

impl TryFrom<Json> for GlobalAccess {
    type Error = String;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        match &value {
            Json::Bool(true) => Ok(GlobalAccess::Writable),
            Json::Bool(false) => Ok(GlobalAccess::Readonly),
            Json::String(s) => match s.as_str() {
                "writable" | "writeable" | "true" => Ok(GlobalAccess::Writable),
                "readonly" | "readable" | "false" => Ok(GlobalAccess::Readonly),
                "off" => Ok(GlobalAccess::Off),
                _ => Err(format!("invalid global access: {value}")),
            },
            _ => Err(format!("invalid global access: {value}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
/// An explicit `name:access` global declaration.
pub struct GlobalDecl {
    pub name: String,
    pub access: GlobalAccess,
}

impl fmt::Display for GlobalDecl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.access.as_str())
    }
}

impl From<GlobalDecl> for String {
    fn from(decl: GlobalDecl) -> Self {
        decl.to_string()
    }
}

impl LintConfig {
    /// Layer `over` on top of `self`.
    pub fn merge(&mut self, over: LintConfig) {
        self.root = self.root || over.root;
        for (name, rule) in over.rules {
            let merged = match self.rules.get(&name) {
                Some(base) => rule.merged_onto(base),
                None => rule,
            };
            self.rules.insert(name, merged);
        }
        self.settings.extend(over.settings);
        self.globals.extend(over.globals);
        self.env.extend(over.env);
        for plugin in over.plugins {
            if !self.plugins.contains(&plugin) {
                self.plugins.push(plugin);
            }
        }
        if over.parser.is_some() {
            self.parser = over.parser;
        }
        self.parser_options.extend(over.parser_options);
        if over.extensions.is_some() {
            self.extensions = over.extensions;
        }
        self.overrides.extend(over.overrides);
    }

    pub fn merged(mut self, over: LintConfig) -> Self {
        self.merge(over);
        self
    }

    /// Flatten `overrides` that apply to `file` into a single config.
    ///
    /// Without a file identity no override block applies.
    pub fn for_file(&self, file: Option<&Path>) -> LintConfig {
        let mut base = LintConfig {
            overrides: Vec::new(),
            ..self.clone()
        };
        let Some(file) = file else {
            return base;
        };
        for block in &self.overrides {
            if matches_any(&block.files, file) && !matches_any(&block.excluded_files, file) {
                base.merge(block.config.for_file(Some(file)));
            }
        }
        base
    }

    /// Configured extensions, or `DEFAULT_EXTENSIONS`.
    pub fn effective_extensions(&self) -> Vec<String> {
        match &self.extensions {
            Some(exts) => exts.clone(),
            None => DEFAULT_EXTENSIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Globals as explicit declarations, sorted by name.
    pub fn expanded_globals(&self) -> Vec<GlobalDecl> {
        self.globals
            .iter()
            .map(|(name, access)| GlobalDecl {
                name: name.clone(),
                access: *access,
            })
            .collect()
    }
}

/// Patterns without a `/` match the file name; others match any trailing
/// run of path components.
fn matches_any(patterns: &[String], file: &Path) -> bool {
    let opts = MatchOptions {
        case_sensitive: true,
        require_literal_separator: true,
        require_literal_leading_dot: false,
    };
    patterns.iter().any(|raw| {
        let pattern = match Pattern::new(raw) {
            Ok(p) => p,
            Err(e) => {
                warn!(pattern = %raw, error = %e, "ignoring invalid override pattern");
                return false;
            }
        };
        if !raw.contains('/') {
            return file
                .file_name()
                .map(|name| pattern.matches_with(&name.to_string_lossy(), opts))
                .unwrap_or(false);
        }
        let parts: Vec<_> = file
            .components()
            .filter(|c| matches!(c, Component::Normal(_)))
            .collect();
        (0..parts.len()).any(|start| {
            let tail: PathBuf = parts[start..].iter().collect();
            pattern.matches_path_with(&tail, opts)
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::{RuleConfig, Severity};
    use serde_json::json;

    fn parse(v: Json) -> LintConfig {
        serde_json::from_value(v).unwrap()
    }

    #[test]
    fn test_merge_layers_rules_and_maps() {
        let base = parse(json!({
            "rules": { "quotes": ["error", "double"], "semi": ["error", "never"] },
            "settings": { "react": { "version": "18" } },
            "plugins": ["react"],
            "parser": "espree"
        }));
        let over = parse(json!({
            "rules": { "quotes": "warn", "semi": ["error", "always"] },
            "plugins": ["react", "import"]
        }));
        let merged = base.merged(over);
        assert_eq!(
            merged.rules["quotes"],
            RuleConfig::new(Severity::Warn).with_option(json!("double"))
        );
        assert_eq!(merged.rules["semi"].options, vec![json!("always")]);
        assert_eq!(merged.plugins, vec!["react", "import"]);
        assert_eq!(merged.parser.as_deref(), Some("espree"));
        assert!(merged.settings.contains_key("react"));
    }

    #[test]
    fn test_overrides_apply_by_file_name_and_path() {
        let cfg = parse(json!({
            "rules": { "semi": ["error", "always"] },
            "overrides": [
                { "files": ["*.test.js"], "rules": { "semi": "off" } },
                { "files": ["src/legacy/**/*.js"], "excludedFiles": ["keep.js"], "rules": { "quotes": ["error", "double"] } }
            ]
        }));
        let test_file = cfg.for_file(Some(Path::new("/repo/src/a.test.js")));
        assert!(test_file.rules["semi"].is_off());
        assert!(!test_file.rules.contains_key("quotes"));

        let legacy = cfg.for_file(Some(Path::new("/repo/src/legacy/x/y.js")));
        assert!(legacy.rules.contains_key("quotes"));
        assert!(!legacy.rules["semi"].is_off());

        let excluded = cfg.for_file(Some(Path::new("/repo/src/legacy/keep.js")));
        assert!(!excluded.rules.contains_key("quotes"));

        let no_file = cfg.for_file(None);
        assert!(no_file.overrides.is_empty());
        assert!(!no_file.rules["semi"].is_off());
    }

    #[test]
    fn test_globals_expand_to_pairs() {
        let cfg = parse(json!({
            "globals": { "window": true, "$": "readonly", "legacy": "off" }
        }));
        let decls: Vec<String> = cfg.expanded_globals().into_iter().map(String::from).collect();
        assert_eq!(decls, vec!["$:readonly", "legacy:off", "window:writable"]);
    }

    #[test]
    fn test_default_extensions_when_unset() {
        let cfg = LintConfig::default();
        assert!(cfg.effective_extensions().contains(&".tsx".to_string()));
        let custom = parse(json!({ "extensions": [".cjs"] }));
        assert_eq!(custom.effective_extensions(), vec![".cjs"]);
    }
}
