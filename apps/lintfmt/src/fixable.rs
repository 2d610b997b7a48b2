//! Linter configuration for the autofix pass.
//!
//! Rules the linter knows to be non-fixable cannot change the text, so they
//! are forced off for the fix pass. Rules missing from the catalog (plugins
//! the engine did not report) are left exactly as configured.

use crate::error::ConfigLookupError;
use crate::models::lint_config::{GlobalDecl, LintConfig};
use crate::models::rule::{RuleConfig, RuleSet};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FixKind {
    Code,
    Whitespace,
    /// Fixable, but the catalog did not say how.
    Unspecified,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
/// Metadata the linter reports for a loaded rule.
pub struct RuleMeta {
    #[serde(deserialize_with = "fixable_flag")]
    pub fixable: Option<FixKind>,
}

/// `true` or any non-empty string marks a rule fixable; `false`, `null` and
/// `""` do not.
fn fixable_flag<'de, D: Deserializer<'de>>(d: D) -> Result<Option<FixKind>, D::Error> {
    match Json::deserialize(d)? {
        Json::Null | Json::Bool(false) => Ok(None),
        Json::Bool(true) => Ok(Some(FixKind::Unspecified)),
        Json::String(s) => Ok(match s.as_str() {
            "" => None,
            "code" => Some(FixKind::Code),
            "whitespace" => Some(FixKind::Whitespace),
            _ => Some(FixKind::Unspecified),
        }),
        other => Err(D::Error::custom(format!("invalid fixable flag: {other}"))),
    }
}

impl RuleMeta {
    pub fn fixable(kind: FixKind) -> Self {
        Self {
            fixable: Some(kind),
        }
    }

    pub fn is_fixable(&self) -> bool {
        self.fixable.is_some()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
/// Rules loaded by the linter, keyed by name.
pub struct RuleCatalog {
    rules: BTreeMap<String, RuleMeta>,
}

impl RuleCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog used when the engine cannot list its rules.
    pub fn fallback() -> Self {
        RuleCatalog::new()
            .with_rule("global-require", RuleMeta::default())
            .with_rule("no-with", RuleMeta::default())
    }

    /// Read a JSON catalog mapping rule name to `{ "fixable": ... }`.
    pub fn load(path: &Path) -> Result<Self, ConfigLookupError> {
        let s = fs::read_to_string(path).map_err(|source| ConfigLookupError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&s).map_err(|e| ConfigLookupError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    pub fn with_rule(mut self, name: &str, meta: RuleMeta) -> Self {
        self.rules.insert(name.to_string(), meta);
        self
    }

    pub fn get(&self, name: &str) -> Option<&RuleMeta> {
        self.rules.get(name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// True only for rules the catalog knows and marks non-fixable.
    pub fn is_known_unfixable(&self, name: &str) -> bool {
        self.get(name).is_some_and(|meta| !meta.is_fixable())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
/// Configuration handed to the linter for the autofix pass.
pub struct FixConfig {
    /// Always false: the merged config is authoritative.
    pub discover_config: bool,
    /// Always true.
    pub fix: bool,
    pub rules: RuleSet,
    pub settings: Map<String, Json>,
    pub globals: Vec<GlobalDecl>,
    pub env: BTreeMap<String, bool>,
    pub plugins: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parser: Option<String>,
    pub parser_options: Map<String, Json>,
    pub extensions: Vec<String>,
}

impl FixConfig {
    /// Whether the linter handles `file`, judged by its extension.
    pub fn handles(&self, file: &Path) -> bool {
        let ext = file
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default();
        self.extensions.iter().any(|e| *e == ext)
    }

    /// Pick a parser for TypeScript and Vue files when none is configured.
    pub fn with_default_parser(mut self, file: &Path) -> Self {
        if self.parser.is_some() {
            return self;
        }
        let parser = match file.extension().and_then(|e| e.to_str()) {
            Some("ts" | "tsx") => Some("@typescript-eslint/parser"),
            Some("vue") => Some("vue-eslint-parser"),
            _ => None,
        };
        self.parser = parser.map(str::to_string);
        self
    }
}

/// Names of configured rules the fix pass turns off.
pub fn non_fixable_rules(config: &LintConfig, catalog: &RuleCatalog) -> Vec<String> {
    config
        .rules
        .keys()
        .filter(|name| catalog.is_known_unfixable(name))
        .cloned()
        .collect()
}

/// Derive the fix-pass configuration. `config` is left untouched.
pub fn fix_config(config: &LintConfig, catalog: &RuleCatalog) -> FixConfig {
    let rules: RuleSet = config
        .rules
        .iter()
        .map(|(name, rule)| {
            if catalog.is_known_unfixable(name) {
                debug!(rule = %name, "disabling non-fixable rule for fix pass");
                (name.clone(), RuleConfig::off())
            } else {
                (name.clone(), rule.clone())
            }
        })
        .collect();

    FixConfig {
        discover_config: false,
        fix: true,
        rules,
        settings: config.settings.clone(),
        globals: config.expanded_globals(),
        env: config.env.clone(),
        plugins: config.plugins.clone(),
        parser: config.parser.clone(),
        parser_options: config.parser_options.clone(),
        extensions: config.effective_extensions(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::rule::Severity;
    use serde_json::json;

    fn config(v: Json) -> LintConfig {
        serde_json::from_value(v).unwrap()
    }

    fn catalog() -> RuleCatalog {
        RuleCatalog::new()
            .with_rule("semi", RuleMeta::fixable(FixKind::Code))
            .with_rule("indent", RuleMeta::fixable(FixKind::Whitespace))
            .with_rule("no-unused-vars", RuleMeta::default())
            .with_rule("complexity", RuleMeta::default())
    }

    #[test]
    fn test_non_fixable_known_rules_forced_off() {
        let cfg = config(json!({
            "rules": {
                "semi": ["error", "always"],
                "no-unused-vars": ["error", { "args": "none" }],
                "complexity": ["warn", 10]
            }
        }));
        let fix = fix_config(&cfg, &catalog());
        assert_eq!(fix.rules["no-unused-vars"], RuleConfig::off());
        assert_eq!(fix.rules["complexity"], RuleConfig::off());
        assert_eq!(fix.rules["semi"], cfg.rules["semi"]);
        assert_eq!(
            non_fixable_rules(&cfg, &catalog()),
            vec!["complexity", "no-unused-vars"]
        );
    }

    #[test]
    fn test_unknown_rules_pass_through() {
        let cfg = config(json!({
            "rules": { "my-plugin/custom": ["error", { "deep": [1, 2] }] }
        }));
        let fix = fix_config(&cfg, &catalog());
        assert_eq!(fix.rules["my-plugin/custom"], cfg.rules["my-plugin/custom"]);
        assert_eq!(fix.rules["my-plugin/custom"].severity, Severity::Error);
    }

    #[test]
    fn test_flags_and_globals() {
        let cfg = config(json!({
            "rules": {},
            "globals": { "jQuery": "readonly" },
            "settings": { "react": { "version": "18" } }
        }));
        let fix = fix_config(&cfg, &RuleCatalog::fallback());
        assert!(!fix.discover_config);
        assert!(fix.fix);
        assert_eq!(fix.globals[0].to_string(), "jQuery:readonly");
        assert!(fix.settings.contains_key("react"));
    }

    #[test]
    fn test_input_not_mutated() {
        let cfg = config(json!({ "rules": { "no-with": "error" } }));
        let before = cfg.clone();
        let fix = fix_config(&cfg, &RuleCatalog::fallback());
        assert!(fix.rules["no-with"].is_off());
        assert_eq!(cfg, before);
    }

    #[test]
    fn test_handles_by_extension_and_default_parser() {
        let fix = fix_config(&LintConfig::default(), &RuleCatalog::new());
        assert!(fix.handles(Path::new("src/a.tsx")));
        assert!(!fix.handles(Path::new("README.md")));
        assert!(!fix.handles(Path::new("Makefile")));

        let ts = fix.clone().with_default_parser(Path::new("a.ts"));
        assert_eq!(ts.parser.as_deref(), Some("@typescript-eslint/parser"));
        let vue = fix.clone().with_default_parser(Path::new("App.vue"));
        assert_eq!(vue.parser.as_deref(), Some("vue-eslint-parser"));
        let js = fix.with_default_parser(Path::new("a.js"));
        assert!(js.parser.is_none());
    }

    #[test]
    fn test_catalog_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rules.json");
        fs::write(&path, r#"{ "semi": { "fixable": "whitespace" } }"#).unwrap();
        let cat = RuleCatalog::load(&path).unwrap();
        assert_eq!(cat.len(), 1);
        fs::write(&path, "[]").unwrap();
        assert!(matches!(
            RuleCatalog::load(&path),
            Err(ConfigLookupError::Parse { .. })
        ));
    }

    #[test]
    fn test_catalog_accepts_boolean_and_free_form_flags() {
        let cat: RuleCatalog = serde_json::from_value(json!({
            "semi": { "fixable": true },
            "no-undef": { "fixable": false },
            "eqeqeq": { "fixable": "problem" },
            "no-alert": { "fixable": null },
            "no-eval": { "fixable": "" }
        }))
        .unwrap();
        assert_eq!(cat.get("semi").unwrap().fixable, Some(FixKind::Unspecified));
        assert!(!cat.is_known_unfixable("semi"));
        assert!(!cat.is_known_unfixable("eqeqeq"));
        assert!(cat.is_known_unfixable("no-undef"));
        assert!(cat.is_known_unfixable("no-alert"));
        assert!(cat.is_known_unfixable("no-eval"));
        assert!(serde_json::from_value::<RuleCatalog>(json!({ "x": { "fixable": 3 } })).is_err());
    }

    #[test]
    fn test_catalog_parses_from_json() {
        let cat: RuleCatalog = serde_json::from_value(json!({
            "semi": { "fixable": "code" },
            "no-undef": {}
        }))
        .unwrap();
        assert!(!cat.is_known_unfixable("semi"));
        assert!(cat.is_known_unfixable("no-undef"));
        assert!(!cat.is_known_unfixable("unknown"));
    }
}
