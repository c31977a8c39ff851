//! Range configuration
//!
//! Four tables drive formatting:
//!
//! - `none.<style>` - text shown in place of a missing date
//! - `styles.<style>` - date pattern for a style
//! - `range.<style>` - delimiter set for a style
//! - `calculations.<name>` - derived attributes computed by a function
//!
//! plus the [`Calculator`] strategy and the [`OrderPolicy`]. A configuration
//! is built once and shared read-only behind an `Arc`; it is never mutated
//! while ranges use it.
//!
//! Lookups never fail. A missing key is "not configured" and callers fall
//! back; an empty style pattern or prefix counts as missing.

mod calculation;
mod delimiters;
mod loader;

pub use calculation::Calculation;
pub use delimiters::Delimiters;
pub use loader::ConfigLoader;
pub use ::config::FileFormat;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use daterange_domain::{Calculator, StandardCalculator};
use serde::{Deserialize, Serialize};

/// Style whose pattern, delimiters and fallback apply when nothing more
/// specific is configured
pub const DEFAULT_STYLE: &str = "default";

/// `none` key consulted when a calculation is requested for a missing date
pub const CALCULATIONS_KEY: &str = "calculations";

// =============================================================================
// OrderPolicy
// =============================================================================

/// What to do when the end of a range precedes its start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderPolicy {
    /// Swap the endpoints so start <= end
    #[default]
    Swap,
    /// Refuse to build the range
    Reject,
}

// =============================================================================
// Lookup results
// =============================================================================

/// Result of a `none.<style>` lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoneValue {
    NotConfigured,
    /// Configured as an explicit null
    Null,
    Text(String),
}

/// Result of a dotted-path lookup.
#[derive(Debug, Clone)]
pub enum ConfigValue {
    Missing,
    Null,
    Text(String),
    Delimiters(Delimiters),
    Calculation(Calculation),
}

impl ConfigValue {
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigValue::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(text) => Some(text),
            _ => None,
        }
    }
}

// =============================================================================
// RangeConfig
// =============================================================================

#[derive(Clone)]
pub struct RangeConfig {
    none: HashMap<String, Option<String>>,
    styles: HashMap<String, String>,
    range: HashMap<String, Delimiters>,
    calculations: HashMap<String, Calculation>,
    calculator: Arc<dyn Calculator>,
    order_policy: OrderPolicy,
}

impl Default for RangeConfig {
    /// The shipped configuration.
    fn default() -> Self {
        Self::empty()
            .with_none(DEFAULT_STYLE, "(n/a)")
            .with_null_none("sql")
            .with_style(DEFAULT_STYLE, "n/j/Y")
            .with_style("short", "n/j/Y")
            .with_style("tiny", "n/j/y")
            .with_style("pad", "m/d/y")
            .with_style("padded", "m/d/Y")
            .with_style("sql", "Y-m-d")
            .with_style("full", "Y-m-d H:i:s")
            .with_style("title", "l, F j, Y")
            .with_style("long", "D, M j, Y h:ia")
            .with_style("month", "F Y")
            .with_style("time", "g:ia")
            .with_style("url", "Y-m-d")
            .with_delimiters(DEFAULT_STYLE, Delimiters::new("", " \u{2013} ", "", ""))
            .with_delimiters("title", Delimiters::new("From ", " to ", "", "For "))
            .with_delimiters("url", Delimiters::new("start=", "&end=", "", "date="))
            .with_calculation("days", Calculation::days())
            .with_calculation("decimal", Calculation::decimal())
    }
}

impl RangeConfig {
    /// A configuration with no keys at all and the standard calculator.
    pub fn empty() -> Self {
        Self {
            none: HashMap::new(),
            styles: HashMap::new(),
            range: HashMap::new(),
            calculations: HashMap::new(),
            calculator: Arc::new(StandardCalculator::new()),
            order_policy: OrderPolicy::default(),
        }
    }

    // Builders

    pub fn with_style(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.styles.insert(name.into(), pattern.into());
        self
    }

    pub fn without_style(mut self, name: &str) -> Self {
        self.styles.remove(name);
        self
    }

    pub fn with_delimiters(mut self, name: impl Into<String>, delimiters: Delimiters) -> Self {
        self.range.insert(name.into(), delimiters);
        self
    }

    pub fn without_delimiters(mut self, name: &str) -> Self {
        self.range.remove(name);
        self
    }

    pub fn with_none(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.none.insert(name.into(), Some(text.into()));
        self
    }

    /// Configure `none.<name>` as an explicit null.
    pub fn with_null_none(mut self, name: impl Into<String>) -> Self {
        self.none.insert(name.into(), None);
        self
    }

    pub fn without_none(mut self, name: &str) -> Self {
        self.none.remove(name);
        self
    }

    pub fn with_calculation(mut self, name: impl Into<String>, calculation: Calculation) -> Self {
        self.calculations.insert(name.into(), calculation);
        self
    }

    pub fn without_calculation(mut self, name: &str) -> Self {
        self.calculations.remove(name);
        self
    }

    pub fn with_calculator(mut self, calculator: Arc<dyn Calculator>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn with_order_policy(mut self, policy: OrderPolicy) -> Self {
        self.order_policy = policy;
        self
    }

    // Typed lookups

    /// Pattern for `styles.<name>`, if configured and non-empty.
    pub fn style(&self, name: &str) -> Option<&str> {
        self.styles
            .get(name)
            .map(String::as_str)
            .filter(|pattern| !pattern.is_empty())
    }

    /// Delimiter set for `range.<name>`.
    pub fn delimiters(&self, name: &str) -> Option<&Delimiters> {
        self.range.get(name)
    }

    /// `range.<name>`, falling back to `range.default`, then to an empty set.
    pub fn delimiters_or_default(&self, name: &str) -> Delimiters {
        self.delimiters(name)
            .or_else(|| self.delimiters(DEFAULT_STYLE))
            .cloned()
            .unwrap_or_default()
    }

    /// `range.<name>.only`, if configured and non-empty.
    pub fn only_prefix(&self, name: &str) -> Option<&str> {
        self.delimiters(name)
            .map(|delimiters| delimiters.only.as_str())
            .filter(|prefix| !prefix.is_empty())
    }

    pub fn none_value(&self, name: &str) -> NoneValue {
        match self.none.get(name) {
            None => NoneValue::NotConfigured,
            Some(None) => NoneValue::Null,
            Some(Some(text)) => NoneValue::Text(text.clone()),
        }
    }

    pub fn calculation(&self, name: &str) -> Option<&Calculation> {
        self.calculations.get(name)
    }

    pub fn calculator(&self) -> &Arc<dyn Calculator> {
        &self.calculator
    }

    pub fn order_policy(&self) -> OrderPolicy {
        self.order_policy
    }

    // Dotted paths

    /// Look up a dotted path such as `styles.short`, `range.title`,
    /// `range.title.only`, `none.sql` or `calculations.days`.
    pub fn get(&self, path: &str) -> ConfigValue {
        let Some((section, key)) = path.split_once('.') else {
            return ConfigValue::Missing;
        };

        match section {
            "none" => match self.none_value(key) {
                NoneValue::NotConfigured => ConfigValue::Missing,
                NoneValue::Null => ConfigValue::Null,
                NoneValue::Text(text) => ConfigValue::Text(text),
            },
            "styles" => self
                .styles
                .get(key)
                .map(|pattern| ConfigValue::Text(pattern.clone()))
                .unwrap_or(ConfigValue::Missing),
            "range" => match key.split_once('.') {
                Some((name, field)) => self
                    .delimiters(name)
                    .and_then(|delimiters| delimiters.field(field))
                    .map(|text| ConfigValue::Text(text.to_string()))
                    .unwrap_or(ConfigValue::Missing),
                None => self
                    .delimiters(key)
                    .map(|delimiters| ConfigValue::Delimiters(delimiters.clone()))
                    .unwrap_or(ConfigValue::Missing),
            },
            "calculations" => self
                .calculation(key)
                .map(|calculation| ConfigValue::Calculation(calculation.clone()))
                .unwrap_or(ConfigValue::Missing),
            _ => ConfigValue::Missing,
        }
    }

    /// [`RangeConfig::get`] with a fallback for missing keys.
    pub fn get_or(&self, path: &str, default: ConfigValue) -> ConfigValue {
        match self.get(path) {
            ConfigValue::Missing => default,
            value => value,
        }
    }

    pub(crate) fn merge_none(&mut self, none: HashMap<String, Option<String>>) {
        self.none.extend(none);
    }

    pub(crate) fn merge_styles(&mut self, styles: HashMap<String, String>) {
        self.styles.extend(styles);
    }

    pub(crate) fn merge_range(&mut self, range: HashMap<String, Delimiters>) {
        self.range.extend(range);
    }
}

impl fmt::Debug for RangeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut calculations: Vec<&str> = self.calculations.keys().map(String::as_str).collect();
        calculations.sort_unstable();
        f.debug_struct("RangeConfig")
            .field("none", &self.none)
            .field("styles", &self.styles)
            .field("range", &self.range)
            .field("calculations", &calculations)
            .field("calculator", &self.calculator.calculator_id())
            .field("order_policy", &self.order_policy)
            .finish()
    }
}
