//! Linter rule configuration as written in config files.
//!
//! A rule is either a bare severity (`"error"`, `2`) or an array whose first
//! element is the severity and whose remaining elements are rule options
//! (`["error", "single", { "avoidEscape": true }]`).

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;
use std::collections::BTreeMap;
use std::fmt;

/// Rules keyed by name. Ordered so derived configs serialize deterministically.
pub type RuleSet = BTreeMap<String, RuleConfig>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Rule severity; `Off` disables the rule.
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    /// Parse `off|warn|error` or the numeric forms `0|1|2`. String
    /// severities are case-insensitive, as the linter reads them.
    pub fn from_json(v: &Json) -> Option<Self> {
        match v {
            Json::String(s) => match s.to_ascii_lowercase().as_str() {
                "off" => Some(Severity::Off),
                "warn" => Some(Severity::Warn),
                "error" => Some(Severity::Error),
                _ => None,
            },
            Json::Number(n) => match n.as_u64()? {
                0 => Some(Severity::Off),
                1 => Some(Severity::Warn),
                2 => Some(Severity::Error),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configured state of a rule as seen by option derivation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleSetting<'a> {
    Off,
    OnNoValue,
    OnWithValue(&'a Json),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Json", into = "Json")]
/// A single rule entry: severity plus ordered option values.
pub struct RuleConfig {
    pub severity: Severity,
    pub options: Vec<Json>,
}

impl RuleConfig {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    /// The canonical disabled entry; carries no options.
    pub fn off() -> Self {
        Self::new(Severity::Off)
    }

    pub fn with_option(mut self, value: Json) -> Self {
        self.options.push(value);
        self
    }

    pub fn is_off(&self) -> bool {
        self.severity == Severity::Off
    }

    /// First option value decides the setting; later options are rule-specific
    /// extras that option derivation never looks at.
    pub fn setting(&self) -> RuleSetting<'_> {
        if self.is_off() {
            return RuleSetting::Off;
        }
        match self.options.first() {
            Some(v) => RuleSetting::OnWithValue(v),
            None => RuleSetting::OnNoValue,
        }
    }

    /// Layer `self` over `base`.
    ///
    /// A bare severity only changes the severity and keeps the base options;
    /// an entry with options replaces the base options wholesale.
    pub fn merged_onto(self, base: &RuleConfig) -> RuleConfig {
        if self.options.is_empty() {
            RuleConfig {
                severity: self.severity,
                options: base.options.clone(),
            }
        } else {
            self
        }
    }
}

impl TryFrom<Json> for RuleConfig {
    type Error = String;

    fn try_from(value: Json) -> Result<Self, Self::Error> {
        match value {
            Json::Array(items) => {
                let mut items = items.into_iter();
                let first = items
                    .next()
                    .ok_or_else(|| "rule array must start with a severity".to_string())?;
                let severity = Severity::from_json(&first)
                    .ok_or_else(|| format!("invalid rule severity: {first}"))?;
                Ok(RuleConfig {
                    severity,
                    options: items.collect(),
                })
            }
            other => Severity::from_json(&other)
                .map(RuleConfig::new)
                .ok_or_else(|| format!("invalid rule severity: {other}")),
        }
    }
}

impl From<RuleConfig> for Json {
    fn from(rule: RuleConfig) -> Self {
        let severity = Json::String(rule.severity.as_str().to_string());
        if rule.options.is_empty() {
            return severity;
        }
        let mut items = Vec::with_capacity(rule.options.len() + 1);
        items.push(severity);
        items.extend(rule.options);
        Json::Array(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_bare_and_array_forms() {
        let bare: RuleConfig = serde_json::from_value(json!("warn")).unwrap();
        assert_eq!(bare.severity, Severity::Warn);
        assert!(bare.options.is_empty());
        assert_eq!(bare.setting(), RuleSetting::OnNoValue);

        let arr: RuleConfig = serde_json::from_value(json!([2, "single"])).unwrap();
        assert_eq!(arr.severity, Severity::Error);
        assert_eq!(arr.setting(), RuleSetting::OnWithValue(&json!("single")));
    }

    #[test]
    fn test_off_wins_over_options() {
        let rule: RuleConfig = serde_json::from_value(json!(["off", "tab"])).unwrap();
        assert_eq!(rule.setting(), RuleSetting::Off);
        let zero: RuleConfig = serde_json::from_value(json!(0)).unwrap();
        assert!(zero.is_off());
    }

    #[test]
    fn test_invalid_severity_is_rejected() {
        assert!(serde_json::from_value::<RuleConfig>(json!("loud")).is_err());
        assert!(serde_json::from_value::<RuleConfig>(json!([])).is_err());
        assert!(serde_json::from_value::<RuleConfig>(json!([7, "x"])).is_err());
        assert!(serde_json::from_value::<RuleConfig>(json!("warning")).is_err());
        let upper: RuleConfig = serde_json::from_value(json!("ERROR")).unwrap();
        assert_eq!(upper.severity, Severity::Error);
    }

    #[test]
    fn test_bare_severity_keeps_base_options() {
        let base = RuleConfig::new(Severity::Error).with_option(json!("single"));
        let merged = RuleConfig::new(Severity::Warn).merged_onto(&base);
        assert_eq!(merged.severity, Severity::Warn);
        assert_eq!(merged.options, vec![json!("single")]);

        let replaced = RuleConfig::new(Severity::Error)
            .with_option(json!("double"))
            .merged_onto(&base);
        assert_eq!(replaced.options, vec![json!("double")]);
    }

    #[test]
    fn test_serializes_back_to_config_shape() {
        assert_eq!(serde_json::to_value(RuleConfig::off()).unwrap(), json!("off"));
        let rule = RuleConfig::new(Severity::Error).with_option(json!({"code": 80}));
        assert_eq!(
            serde_json::to_value(rule).unwrap(),
            json!(["error", {"code": 80}])
        );
    }
}
