//! Attribute resolution against a configuration.
//!
//! Lookup always goes from specific to general: an explicit argument beats a
//! named style, which beats the default style; a configured calculation beats
//! plain formatting.

use daterange_domain::{CalendarDate, Endpoints};

use crate::attribute::{split_range_style, AttributeValue, Target};
use crate::config::{NoneValue, RangeConfig, CALCULATIONS_KEY, DEFAULT_STYLE};

/// Renders endpoints and runs configured calculations for one configuration.
#[derive(Debug, Clone, Copy)]
pub struct RangeFormatter<'a> {
    config: &'a RangeConfig,
}

impl<'a> RangeFormatter<'a> {
    pub fn new(config: &'a RangeConfig) -> Self {
        Self { config }
    }

    /// Run `calculations.<name>` for a target.
    ///
    /// The range target passes both dates, a single target passes one. If a
    /// needed date is missing the `none.calculations` fallback is returned
    /// instead.
    pub fn calculate(&self, target: Target, name: &str, endpoints: Endpoints) -> AttributeValue {
        let Some(calculation) = self.config.calculation(name) else {
            return AttributeValue::Null;
        };

        let value = match target {
            Target::Range => endpoints
                .both()
                .map(|(start, end)| calculation.call(&start, Some(&end))),
            Target::Start => endpoints.start.map(|start| calculation.call(&start, None)),
            Target::End => endpoints.end.map(|end| calculation.call(&end, None)),
        };

        match value {
            Some(value) => {
                tracing::debug!(calculation = name, target = %target, "Calculation answered request");
                value
            }
            None => {
                tracing::warn!(
                    calculation = name,
                    target = %target,
                    "Calculation requested for a missing date"
                );
                self.calculation_fallback()
            }
        }
    }

    /// Render one target in a style.
    ///
    /// For the range target `style` may name a date style and a delimiter
    /// set as `<date>_<delimiters>`.
    pub fn format(
        &self,
        target: Target,
        style: &str,
        endpoints: Endpoints,
        explicit_format: Option<&str>,
    ) -> AttributeValue {
        match target {
            Target::Range => {
                let (date_style, delimiter_style) = split_range_style(style);
                self.format_range(endpoints, date_style, delimiter_style, explicit_format)
            }
            Target::Start => self.format_single(endpoints.start, style, explicit_format),
            Target::End => self.format_single(endpoints.end, style, explicit_format),
        }
    }

    /// Render both endpoints joined by the `range.<delimiter_style>` set.
    ///
    /// Endpoints that are the same instant (or both missing) render once
    /// behind the `only` prefix.
    pub fn format_range(
        &self,
        endpoints: Endpoints,
        date_style: &str,
        delimiter_style: &str,
        explicit_format: Option<&str>,
    ) -> AttributeValue {
        let delimiters = self.config.delimiters_or_default(delimiter_style);
        let start = self.format_date(endpoints.start, date_style, explicit_format, None);

        if endpoints.start == endpoints.end {
            return AttributeValue::Text(delimiters.single(&start.to_string()));
        }

        let end = self.format_date(endpoints.end, date_style, explicit_format, None);
        AttributeValue::Text(delimiters.join(&start.to_string(), &end.to_string()))
    }

    /// Render one date, prefixed by `range.<style>.only` when that is set.
    pub fn format_single(
        &self,
        date: Option<CalendarDate>,
        style: &str,
        explicit_format: Option<&str>,
    ) -> AttributeValue {
        let formatted = self.format_date(date, style, explicit_format, None);
        match self.config.only_prefix(style) {
            Some(prefix) => AttributeValue::Text(format!("{prefix}{formatted}")),
            None => formatted,
        }
    }

    /// Render a possibly missing date.
    ///
    /// A missing date yields `explicit_fallback`, else `none.<style>`, else
    /// the unset marker. A present date uses `styles.<style>`, else
    /// `explicit_format`, else `styles.default`.
    pub fn format_date(
        &self,
        date: Option<CalendarDate>,
        style: &str,
        explicit_format: Option<&str>,
        explicit_fallback: Option<&str>,
    ) -> AttributeValue {
        let Some(date) = date else {
            if let Some(fallback) = explicit_fallback {
                return AttributeValue::from(fallback);
            }
            return match self.config.none_value(style) {
                NoneValue::Text(text) => AttributeValue::Text(text),
                NoneValue::Null => AttributeValue::Null,
                NoneValue::NotConfigured => self.unset_marker(),
            };
        };

        let pattern = self
            .config
            .style(style)
            .or(explicit_format.filter(|format| !format.is_empty()))
            .or_else(|| self.config.style(DEFAULT_STYLE))
            .unwrap_or_default();

        AttributeValue::Text(date.format(pattern))
    }

    /// What a missing date reads as: the `none.default` text.
    pub fn unset_marker(&self) -> AttributeValue {
        match self.config.none_value(DEFAULT_STYLE) {
            NoneValue::Text(text) => AttributeValue::Text(text),
            NoneValue::Null => AttributeValue::Null,
            NoneValue::NotConfigured => AttributeValue::Text(String::new()),
        }
    }

    /// `none.calculations`; empty text when not configured.
    fn calculation_fallback(&self) -> AttributeValue {
        match self.config.none_value(CALCULATIONS_KEY) {
            NoneValue::Text(text) => AttributeValue::Text(text),
            NoneValue::Null => AttributeValue::Null,
            NoneValue::NotConfigured => AttributeValue::Text(String::new()),
        }
    }
}
