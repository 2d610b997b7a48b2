//! Derive formatter options from linter rule configuration.
//!
//! Each `OptionKey` has one entry in `TRANSLATIONS`: an extractor that reads
//! the relevant rule into a `Sentinel<Json>`, and a normalizer that parses the
//! raw value into its rule family and maps it to a formatter value.
//!
//! Precedence per key, highest first:
//! 1. explicit options passed by the caller,
//! 2. the options object embedded in the `prettier/prettier` rule,
//! 3. the value derived from rules via `TRANSLATIONS`,
//! 4. the caller's fallback options,
//! 5. omitted (the formatter's built-in default applies).
//!
//! Nothing here fails. Values of an unknown shape become
//! `Sentinel::NotConfigured` and fall through to the fallback tier, since
//! plugins can put anything into a rule's options.

use crate::models::options::{
    ArrowParens, FormattingOptions, OptionKey, OptionValue, Sentinel, TrailingComma,
};
use crate::models::rule::{RuleSet, RuleSetting};
use serde_json::Value as Json;
use tracing::debug;

/// Rule that carries an options object for the formatter integration.
pub const FORMATTER_RULE: &str = "prettier/prettier";

pub const MAX_LEN: &str = "max-len";
pub const INDENT: &str = "indent";
pub const QUOTES: &str = "quotes";
pub const COMMA_DANGLE: &str = "comma-dangle";
pub const OBJECT_CURLY_SPACING: &str = "object-curly-spacing";
pub const SEMI: &str = "semi";
pub const JSX_CLOSING_BRACKET: &str = "react/jsx-closing-bracket-location";
pub const ARROW_PARENS: &str = "arrow-parens";

/// Which part of a rule's first option value to read.
#[derive(Clone, Copy)]
enum ValuePath {
    /// Only a string/number/bool value counts.
    Primitive,
    /// The value as-is, structured or not.
    Whole,
    /// A field of an object value; a primitive value stands for the field.
    Field(&'static str),
    /// A field of an object value; primitives do not count.
    SubSetting(&'static str),
}

fn pick(value: &Json, path: ValuePath) -> Option<&Json> {
    if value.is_null() {
        return None;
    }
    let structured = value.is_object() || value.is_array();
    match path {
        ValuePath::Primitive => (!structured).then_some(value),
        ValuePath::Whole => Some(value),
        ValuePath::Field(key) if structured => value.get(key),
        ValuePath::Field(_) => Some(value),
        ValuePath::SubSetting(key) => value.as_object()?.get(key),
    }
}

fn rule_value(rules: &RuleSet, name: &str, path: ValuePath) -> Sentinel<Json> {
    let Some(rule) = rules.get(name) else {
        return Sentinel::NotConfigured;
    };
    match rule.setting() {
        RuleSetting::Off => Sentinel::Disabled,
        RuleSetting::OnNoValue => Sentinel::NotConfigured,
        RuleSetting::OnWithValue(v) => pick(v, path)
            .cloned()
            .map_or(Sentinel::NotConfigured, Sentinel::Concrete),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSetting {
    Single,
    Double,
    Backtick,
}

impl QuoteSetting {
    pub fn parse(v: &Json) -> Option<Self> {
        match v.as_str()? {
            "single" => Some(QuoteSetting::Single),
            "double" => Some(QuoteSetting::Double),
            "backtick" => Some(QuoteSetting::Backtick),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// `always|never` switch shared by spacing and semicolon rules.
pub enum Toggle {
    Always,
    Never,
}

impl Toggle {
    pub fn parse(v: &Json) -> Option<Self> {
        match v.as_str()? {
            "always" => Some(Toggle::Always),
            "never" => Some(Toggle::Never),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndentSetting {
    Tab,
    Spaces(u32),
}

impl IndentSetting {
    pub fn parse(v: &Json) -> Option<Self> {
        match v {
            Json::String(s) if s == "tab" => Some(IndentSetting::Tab),
            _ => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(IndentSetting::Spaces),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrailingCommaSetting {
    Never,
    /// `always`, `always-multiline`, ...
    Always(String),
    PerConstruct {
        arrays: String,
        objects: String,
        functions: String,
    },
}

impl TrailingCommaSetting {
    pub fn parse(v: &Json) -> Option<Self> {
        match v {
            Json::String(s) if s == "never" => Some(TrailingCommaSetting::Never),
            Json::String(s) if s.starts_with("always") => Some(TrailingCommaSetting::Always(s.clone())),
            Json::Object(map) => {
                let field = |name: &str| {
                    map.get(name)
                        .and_then(Json::as_str)
                        .unwrap_or_default()
                        .to_string()
                };
                Some(TrailingCommaSetting::PerConstruct {
                    arrays: field("arrays"),
                    objects: field("objects"),
                    functions: field("functions"),
                })
            }
            _ => None,
        }
    }

    pub fn to_trailing_comma(&self) -> TrailingComma {
        let always = |s: &str| s.starts_with("always");
        match self {
            TrailingCommaSetting::Never => TrailingComma::None,
            TrailingCommaSetting::Always(_) => TrailingComma::Es5,
            TrailingCommaSetting::PerConstruct {
                arrays,
                objects,
                functions,
            } => {
                if always(functions) {
                    TrailingComma::All
                } else if always(arrays) || always(objects) {
                    TrailingComma::Es5
                } else {
                    TrailingComma::None
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsxClosingBracket {
    AfterProps,
    TagAligned,
    LineAligned,
    PropsAligned,
}

impl JsxClosingBracket {
    pub fn parse(v: &Json) -> Option<Self> {
        match v.as_str()? {
            "after-props" => Some(JsxClosingBracket::AfterProps),
            "tag-aligned" => Some(JsxClosingBracket::TagAligned),
            "line-aligned" => Some(JsxClosingBracket::LineAligned),
            "props-aligned" => Some(JsxClosingBracket::PropsAligned),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArrowParensSetting {
    AsNeeded,
    Always,
}

impl ArrowParensSetting {
    pub fn parse(v: &Json) -> Option<Self> {
        match v.as_str()? {
            "as-needed" => Some(ArrowParensSetting::AsNeeded),
            "always" => Some(ArrowParensSetting::Always),
            _ => None,
        }
    }
}

/// Extraction and normalization for one formatter option.
pub struct TranslationRule {
    pub key: OptionKey,
    pub extract: fn(&RuleSet) -> Sentinel<Json>,
    pub normalize: fn(Sentinel<Json>) -> Sentinel<OptionValue>,
}

pub static TRANSLATIONS: [TranslationRule; 9] = [
    TranslationRule {
        key: OptionKey::PrintWidth,
        extract: |rules| rule_value(rules, MAX_LEN, ValuePath::Field("code")),
        normalize: width,
    },
    TranslationRule {
        key: OptionKey::TabWidth,
        extract: tab_width_value,
        normalize: width,
    },
    TranslationRule {
        key: OptionKey::QuoteStyle,
        extract: |rules| rule_value(rules, QUOTES, ValuePath::Primitive),
        normalize: single_quote,
    },
    TranslationRule {
        key: OptionKey::TrailingComma,
        extract: |rules| rule_value(rules, COMMA_DANGLE, ValuePath::Whole),
        normalize: trailing_comma,
    },
    TranslationRule {
        key: OptionKey::BracketSpacing,
        extract: |rules| rule_value(rules, OBJECT_CURLY_SPACING, ValuePath::Primitive),
        normalize: toggle,
    },
    TranslationRule {
        key: OptionKey::Semicolons,
        extract: |rules| rule_value(rules, SEMI, ValuePath::Primitive),
        normalize: toggle,
    },
    TranslationRule {
        key: OptionKey::UseTabs,
        extract: |rules| rule_value(rules, INDENT, ValuePath::Primitive),
        normalize: use_tabs,
    },
    TranslationRule {
        key: OptionKey::JsxBracketPlacement,
        extract: |rules| rule_value(rules, JSX_CLOSING_BRACKET, ValuePath::Field("nonEmpty")),
        normalize: jsx_bracket_same_line,
    },
    TranslationRule {
        key: OptionKey::ArrowParens,
        extract: |rules| rule_value(rules, ARROW_PARENS, ValuePath::Primitive),
        normalize: arrow_parens,
    },
];

/// `indent: "tab"` says nothing about width; the width then comes from
/// `max-len`'s `tabWidth` sub-setting.
fn tab_width_value(rules: &RuleSet) -> Sentinel<Json> {
    let indent = rule_value(rules, INDENT, ValuePath::Primitive);
    if matches!(&indent, Sentinel::Concrete(Json::String(s)) if s == "tab") {
        return rule_value(rules, MAX_LEN, ValuePath::SubSetting("tabWidth"));
    }
    indent
}

fn width(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| match IndentSetting::parse(&v)? {
        IndentSetting::Spaces(n) => Some(OptionValue::Width(n)),
        IndentSetting::Tab => None,
    })
}

fn single_quote(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| match QuoteSetting::parse(&v) {
        Some(QuoteSetting::Single) => Some(OptionValue::Bool(true)),
        Some(QuoteSetting::Double | QuoteSetting::Backtick) => Some(OptionValue::Bool(false)),
        None => v.as_bool().map(OptionValue::Bool),
    })
}

fn trailing_comma(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| {
        TrailingCommaSetting::parse(&v).map(|tc| OptionValue::TrailingComma(tc.to_trailing_comma()))
    })
}

fn toggle(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| match Toggle::parse(&v) {
        Some(Toggle::Always) => Some(OptionValue::Bool(true)),
        Some(Toggle::Never) => Some(OptionValue::Bool(false)),
        None => v.as_bool().map(OptionValue::Bool),
    })
}

fn use_tabs(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| match IndentSetting::parse(&v)? {
        IndentSetting::Tab => Some(OptionValue::Bool(true)),
        IndentSetting::Spaces(_) => None,
    })
}

fn jsx_bracket_same_line(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| match JsxClosingBracket::parse(&v) {
        Some(JsxClosingBracket::AfterProps) => Some(OptionValue::Bool(true)),
        Some(
            JsxClosingBracket::TagAligned
            | JsxClosingBracket::LineAligned
            | JsxClosingBracket::PropsAligned,
        ) => Some(OptionValue::Bool(false)),
        None => v.as_bool().map(OptionValue::Bool),
    })
}

fn arrow_parens(s: Sentinel<Json>) -> Sentinel<OptionValue> {
    s.and_then(|v| match ArrowParensSetting::parse(&v)? {
        ArrowParensSetting::AsNeeded => Some(OptionValue::ArrowParens(ArrowParens::Avoid)),
        ArrowParensSetting::Always => Some(OptionValue::ArrowParens(ArrowParens::Always)),
    })
}

fn translation(key: OptionKey) -> &'static TranslationRule {
    // TRANSLATIONS is ordered like OptionKey::ALL
    &TRANSLATIONS[key as usize]
}

/// Value derived from rules alone for `key`, before fallbacks.
pub fn derive_option(rules: &RuleSet, key: OptionKey) -> Sentinel<OptionValue> {
    let rule = translation(key);
    (rule.normalize)((rule.extract)(rules))
}

/// Options object embedded in the formatter-integration rule, if the rule is
/// on and its value is an object.
pub fn embedded_options(rules: &RuleSet) -> Option<FormattingOptions> {
    match rule_value(rules, FORMATTER_RULE, ValuePath::Whole) {
        Sentinel::Concrete(Json::Object(map)) => Some(FormattingOptions::from_json_map(&map)),
        _ => None,
    }
}

/// Build the complete formatter options for one call.
pub fn options_for_formatting(
    rules: &RuleSet,
    explicit: &FormattingOptions,
    fallbacks: &FormattingOptions,
) -> FormattingOptions {
    let mut given = embedded_options(rules).unwrap_or_default();
    given.overlay(explicit);

    let mut out = given.clone();
    for key in OptionKey::ALL {
        if given.contains(key) {
            continue;
        }
        let value = derive_option(rules, key)
            .concrete()
            .or_else(|| fallbacks.get(key));
        if let Some(v) = value {
            out.insert(key, v);
        }
    }
    debug!(options = %Json::Object(out.to_json_map()), "derived formatter options");
    out
}
