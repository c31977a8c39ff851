//! Attribute requests and the values they resolve to.
//!
//! Callers ask a range for a named attribute such as `start_short`,
//! `range_title`, `short_title`, `hours` or `decimal`. The name is parsed
//! once into an [`AttributeRequest`] and then dispatched with a `match`.

use std::fmt;
use std::str::FromStr;

use daterange_domain::CalendarDate;

use crate::config::RangeConfig;

// =============================================================================
// Target
// =============================================================================

/// Which part of the range a request is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Start,
    End,
    Range,
}

impl Target {
    pub fn as_str(&self) -> &'static str {
        match self {
            Target::Start => "start",
            Target::End => "end",
            Target::Range => "range",
        }
    }

    /// Split `<target>_<style>` into its parts. Names without a target
    /// prefix address the whole range and are entirely style.
    pub fn split(name: &str) -> (Target, &str) {
        for target in [Target::Start, Target::End, Target::Range] {
            if let Some(style) = name
                .strip_prefix(target.as_str())
                .and_then(|rest| rest.strip_prefix('_'))
            {
                return (target, style);
            }
        }
        (Target::Range, name)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" => Ok(Target::Start),
            "end" => Ok(Target::End),
            "range" => Ok(Target::Range),
            other => Err(format!("Unknown target: {other}")),
        }
    }
}

// =============================================================================
// Method
// =============================================================================

/// Attributes answered by an explicit range or calculator method.
///
/// These win over configuration: `decimal` is the calculator's decimal time
/// even when a `decimal` calculation is configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RangeMethod {
    Start,
    End,
    IsSameDay,
    OnSameDay,
    Hours,
    HoursRoundedToNearest,
    Days,
    Months,
    Decimal,
}

impl RangeMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RangeMethod::Start => "start",
            RangeMethod::End => "end",
            RangeMethod::IsSameDay => "is_same_day",
            RangeMethod::OnSameDay => "on_same_day",
            RangeMethod::Hours => "hours",
            RangeMethod::HoursRoundedToNearest => "hours_rounded_to_nearest",
            RangeMethod::Days => "days",
            RangeMethod::Months => "months",
            RangeMethod::Decimal => "decimal",
        }
    }

    pub fn all() -> [RangeMethod; 9] {
        [
            RangeMethod::Start,
            RangeMethod::End,
            RangeMethod::IsSameDay,
            RangeMethod::OnSameDay,
            RangeMethod::Hours,
            RangeMethod::HoursRoundedToNearest,
            RangeMethod::Days,
            RangeMethod::Months,
            RangeMethod::Decimal,
        ]
    }
}

impl FromStr for RangeMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RangeMethod::all()
            .into_iter()
            .find(|method| method.as_str() == s)
            .ok_or_else(|| format!("Unknown method: {s}"))
    }
}

// =============================================================================
// AttributeRequest
// =============================================================================

/// A parsed attribute name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeRequest {
    /// An explicit method of the range or its calculator
    Method(RangeMethod),
    /// A configured calculation, applied to one endpoint or to both
    Calculation { target: Target, name: String },
    /// One endpoint rendered in a style
    DateFormat { target: Target, style: String },
    /// The whole range rendered with a date style and a delimiter set
    RangeFormat {
        date_style: String,
        delimiter_style: String,
    },
}

impl AttributeRequest {
    /// Parse an attribute name against a configuration.
    ///
    /// Order: explicit method, then a configured calculation named by the
    /// style part, then plain formatting. For the range target a style of
    /// the form `<date>_<delimiters>` picks the two independently; a single
    /// word is used for both.
    pub fn parse(name: &str, config: &RangeConfig) -> Self {
        if let Ok(method) = name.parse::<RangeMethod>() {
            return AttributeRequest::Method(method);
        }

        let (target, style) = Target::split(name);

        if config.calculation(style).is_some() {
            return AttributeRequest::Calculation {
                target,
                name: style.to_string(),
            };
        }

        match target {
            Target::Range => {
                let (date_style, delimiter_style) = split_range_style(style);
                AttributeRequest::RangeFormat {
                    date_style: date_style.to_string(),
                    delimiter_style: delimiter_style.to_string(),
                }
            }
            target => AttributeRequest::DateFormat {
                target,
                style: style.to_string(),
            },
        }
    }
}

/// `short_title` -> (`short`, `title`); `title` -> (`title`, `title`).
///
/// Only the first two segments count: `short_title_x` is (`short`, `title`).
pub fn split_range_style(style: &str) -> (&str, &str) {
    let mut segments = style.split('_');
    match (segments.next(), segments.next()) {
        (Some(date_style), Some(delimiter_style)) if !date_style.is_empty() => {
            (date_style, delimiter_style)
        }
        _ => (style, style),
    }
}

// =============================================================================
// AttributeValue
// =============================================================================

/// What an attribute resolves to.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Integer(i64),
    Bool(bool),
    Date(CalendarDate),
    /// Explicitly configured as "nothing" (e.g. `none.sql`)
    Null,
}

impl AttributeValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Numeric view of `Number` and `Integer` values.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            AttributeValue::Number(n) => Some(*n),
            AttributeValue::Integer(n) => Some(*n as f64),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<CalendarDate> {
        match self {
            AttributeValue::Date(date) => Some(*date),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, AttributeValue::Null)
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(text) => write!(f, "{text}"),
            AttributeValue::Number(n) => write!(f, "{n}"),
            AttributeValue::Integer(n) => write!(f, "{n}"),
            AttributeValue::Bool(b) => write!(f, "{b}"),
            AttributeValue::Date(date) => write!(f, "{date}"),
            AttributeValue::Null => Ok(()),
        }
    }
}

impl From<String> for AttributeValue {
    fn from(text: String) -> Self {
        AttributeValue::Text(text)
    }
}

impl From<&str> for AttributeValue {
    fn from(text: &str) -> Self {
        AttributeValue::Text(text.to_string())
    }
}

impl From<f64> for AttributeValue {
    fn from(n: f64) -> Self {
        AttributeValue::Number(n)
    }
}

impl From<i64> for AttributeValue {
    fn from(n: i64) -> Self {
        AttributeValue::Integer(n)
    }
}

impl From<bool> for AttributeValue {
    fn from(b: bool) -> Self {
        AttributeValue::Bool(b)
    }
}

impl From<CalendarDate> for AttributeValue {
    fn from(date: CalendarDate) -> Self {
        AttributeValue::Date(date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Calculation;

    fn request(name: &str) -> AttributeRequest {
        AttributeRequest::parse(name, &RangeConfig::default())
    }

    fn range_format(date_style: &str, delimiter_style: &str) -> AttributeRequest {
        AttributeRequest::RangeFormat {
            date_style: date_style.to_string(),
            delimiter_style: delimiter_style.to_string(),
        }
    }

    #[test]
    fn splits_target_from_style() {
        assert_eq!(Target::split("start_short"), (Target::Start, "short"));
        assert_eq!(Target::split("end_sql"), (Target::End, "sql"));
        assert_eq!(Target::split("range_short_title"), (Target::Range, "short_title"));
        assert_eq!(Target::split("short"), (Target::Range, "short"));
        assert_eq!(Target::split("startle"), (Target::Range, "startle"));
    }

    #[test]
    fn methods_win() {
        assert_eq!(request("hours"), AttributeRequest::Method(RangeMethod::Hours));
        assert_eq!(request("start"), AttributeRequest::Method(RangeMethod::Start));
        assert_eq!(request("decimal"), AttributeRequest::Method(RangeMethod::Decimal));
    }

    #[test]
    fn configured_calculations_come_next() {
        assert_eq!(
            request("start_decimal"),
            AttributeRequest::Calculation {
                target: Target::Start,
                name: "decimal".to_string()
            }
        );
        assert_eq!(
            request("range_days"),
            AttributeRequest::Calculation {
                target: Target::Range,
                name: "days".to_string()
            }
        );
    }

    #[test]
    fn custom_calculations_are_picked_up() {
        let config = RangeConfig::default()
            .with_calculation("weekday", Calculation::new(|date, _| date.format("l").into()));
        assert_eq!(
            AttributeRequest::parse("end_weekday", &config),
            AttributeRequest::Calculation {
                target: Target::End,
                name: "weekday".to_string()
            }
        );
    }

    #[test]
    fn single_dates_keep_the_whole_style() {
        assert_eq!(
            request("start_short"),
            AttributeRequest::DateFormat {
                target: Target::Start,
                style: "short".to_string()
            }
        );
    }

    #[test]
    fn range_styles_split_date_from_delimiters() {
        assert_eq!(request("short"), range_format("short", "short"));
        assert_eq!(request("range_title"), range_format("title", "title"));
        assert_eq!(request("short_title"), range_format("short", "title"));
        assert_eq!(request("range_short_url"), range_format("short", "url"));
        assert_eq!(request("_title"), range_format("_title", "_title"));
        assert_eq!(request("short_title_x"), range_format("short", "title"));
        assert_eq!(split_range_style("short_"), ("short", ""));
    }

    #[test]
    fn targets_parse_from_their_names() {
        for target in [Target::Start, Target::End, Target::Range] {
            assert_eq!(target.as_str().parse::<Target>(), Ok(target));
            assert_eq!(target.to_string(), target.as_str());
        }
        assert!("middle".parse::<Target>().is_err());
    }

    #[test]
    fn values_display_like_their_contents() {
        assert_eq!(AttributeValue::from("x").to_string(), "x");
        assert_eq!(AttributeValue::from(4.0).to_string(), "4");
        assert_eq!(AttributeValue::from(4.25).to_string(), "4.25");
        assert_eq!(AttributeValue::from(3_i64).to_string(), "3");
        assert_eq!(AttributeValue::Null.to_string(), "");
        assert_eq!(AttributeValue::from(3_i64).as_f64(), Some(3.0));
        assert!(AttributeValue::Null.is_null());
    }

    #[test]
    fn dates_are_only_readable_from_date_values() {
        let date = CalendarDate::from_ymd_hms(2014, 1, 2, 16, 20, 0).unwrap();
        assert_eq!(AttributeValue::from(date).as_date(), Some(date));
        assert_eq!(AttributeValue::from("2014-01-02").as_date(), None);
        assert_eq!(AttributeValue::Null.as_date(), None);
    }
}
