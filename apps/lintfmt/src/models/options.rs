//! Formatter option model.
//!
//! `OptionKey` is the closed set of options that can be derived from linter
//! rules. Anything else the caller passes to the formatter (`filepath`,
//! `endOfLine`, `parser`, ...) travels untouched in `FormattingOptions::extra`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Formatter options that linter rules can drive.
pub enum OptionKey {
    PrintWidth,
    TabWidth,
    QuoteStyle,
    TrailingComma,
    BracketSpacing,
    Semicolons,
    UseTabs,
    JsxBracketPlacement,
    ArrowParens,
}

impl OptionKey {
    pub const ALL: [OptionKey; 9] = [
        OptionKey::PrintWidth,
        OptionKey::TabWidth,
        OptionKey::QuoteStyle,
        OptionKey::TrailingComma,
        OptionKey::BracketSpacing,
        OptionKey::Semicolons,
        OptionKey::UseTabs,
        OptionKey::JsxBracketPlacement,
        OptionKey::ArrowParens,
    ];

    /// Option name as the formatter spells it.
    pub fn name(self) -> &'static str {
        match self {
            OptionKey::PrintWidth => "printWidth",
            OptionKey::TabWidth => "tabWidth",
            OptionKey::QuoteStyle => "singleQuote",
            OptionKey::TrailingComma => "trailingComma",
            OptionKey::BracketSpacing => "bracketSpacing",
            OptionKey::Semicolons => "semi",
            OptionKey::UseTabs => "useTabs",
            OptionKey::JsxBracketPlacement => "jsxBracketSameLine",
            OptionKey::ArrowParens => "arrowParens",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        OptionKey::ALL.into_iter().find(|k| k.name() == name)
    }

    /// Interpret a raw JSON value as this option's typed value.
    pub fn value_from_json(self, v: &Json) -> Option<OptionValue> {
        match self {
            OptionKey::PrintWidth | OptionKey::TabWidth => v
                .as_u64()
                .and_then(|n| u32::try_from(n).ok())
                .map(OptionValue::Width),
            OptionKey::QuoteStyle
            | OptionKey::BracketSpacing
            | OptionKey::Semicolons
            | OptionKey::UseTabs
            | OptionKey::JsxBracketPlacement => v.as_bool().map(OptionValue::Bool),
            OptionKey::TrailingComma => match v.as_str()? {
                "none" => Some(OptionValue::TrailingComma(TrailingComma::None)),
                "es5" => Some(OptionValue::TrailingComma(TrailingComma::Es5)),
                "all" => Some(OptionValue::TrailingComma(TrailingComma::All)),
                _ => None,
            },
            OptionKey::ArrowParens => match v.as_str()? {
                "avoid" => Some(OptionValue::ArrowParens(ArrowParens::Avoid)),
                "always" => Some(OptionValue::ArrowParens(ArrowParens::Always)),
                _ => None,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrailingComma {
    None,
    Es5,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrowParens {
    Avoid,
    Always,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// A concrete formatter value.
pub enum OptionValue {
    Bool(bool),
    Width(u32),
    TrailingComma(TrailingComma),
    ArrowParens(ArrowParens),
}

impl OptionValue {
    pub fn to_json(self) -> Json {
        match self {
            OptionValue::Bool(b) => Json::Bool(b),
            OptionValue::Width(n) => Json::from(n),
            OptionValue::TrailingComma(tc) => match tc {
                TrailingComma::None => Json::from("none"),
                TrailingComma::Es5 => Json::from("es5"),
                TrailingComma::All => Json::from("all"),
            },
            OptionValue::ArrowParens(ap) => match ap {
                ArrowParens::Avoid => Json::from("avoid"),
                ArrowParens::Always => Json::from("always"),
            },
        }
    }
}

/// Result of deriving a value for one option from linter rules.
#[derive(Debug, Clone, PartialEq)]
pub enum Sentinel<T> {
    /// Rule absent, carries no value, or the value shape is not understood.
    NotConfigured,
    /// Rule explicitly turned off.
    Disabled,
    Concrete(T),
}

impl<T> Sentinel<T> {
    /// Map a concrete value; `None` from `f` demotes it to `NotConfigured`.
    pub fn and_then<U>(self, f: impl FnOnce(T) -> Option<U>) -> Sentinel<U> {
        match self {
            Sentinel::NotConfigured => Sentinel::NotConfigured,
            Sentinel::Disabled => Sentinel::Disabled,
            Sentinel::Concrete(v) => f(v).map_or(Sentinel::NotConfigured, Sentinel::Concrete),
        }
    }

    pub fn concrete(self) -> Option<T> {
        match self {
            Sentinel::Concrete(v) => Some(v),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "Map<String, Json>", into = "Map<String, Json>")]
/// Options handed to the formatter. Built per call, never cached.
pub struct FormattingOptions {
    values: BTreeMap<OptionKey, OptionValue>,
    extra: Map<String, Json>,
}

impl FormattingOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: OptionKey) -> Option<OptionValue> {
        self.values.get(&key).copied()
    }

    pub fn contains(&self, key: OptionKey) -> bool {
        self.values.contains_key(&key)
    }

    pub fn insert(&mut self, key: OptionKey, value: OptionValue) {
        self.values.insert(key, value);
    }

    pub fn with(mut self, key: OptionKey, value: OptionValue) -> Self {
        self.insert(key, value);
        self
    }

    /// Set an option the translator does not own.
    ///
    /// Names that belong to an `OptionKey` are routed to the typed map.
    pub fn set_extra(&mut self, name: &str, value: Json) {
        match OptionKey::from_name(name) {
            Some(key) => match key.value_from_json(&value) {
                Some(v) => self.insert(key, v),
                None => warn!(option = name, value = %value, "ignoring option with unusable value"),
            },
            None => {
                self.extra.insert(name.to_string(), value);
            }
        }
    }

    pub fn extra(&self) -> &Map<String, Json> {
        &self.extra
    }

    pub fn iter(&self) -> impl Iterator<Item = (OptionKey, OptionValue)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty() && self.extra.is_empty()
    }

    /// Layer `over` on top of `self`; entries in `over` win.
    pub fn overlay(&mut self, over: &FormattingOptions) {
        for (k, v) in over.iter() {
            self.insert(k, v);
        }
        for (k, v) in over.extra.iter() {
            self.extra.insert(k.clone(), v.clone());
        }
    }

    pub fn from_json_map(map: &Map<String, Json>) -> Self {
        let mut out = FormattingOptions::new();
        for (k, v) in map {
            out.set_extra(k, v.clone());
        }
        out
    }

    /// Typed options first (in key order), then pass-through options.
    pub fn to_json_map(&self) -> Map<String, Json> {
        let mut map = Map::new();
        for (k, v) in self.iter() {
            map.insert(k.name().to_string(), v.to_json());
        }
        for (k, v) in self.extra.iter() {
            map.insert(k.clone(), v.clone());
        }
        map
    }
}

impl From<Map<String, Json>> for FormattingOptions {
    fn from(map: Map<String, Json>) -> Self {
        FormattingOptions::from_json_map(&map)
    }
}

impl From<FormattingOptions> for Map<String, Json> {
    fn from(opts: FormattingOptions) -> Self {
        opts.to_json_map()
    }
}
