//! Raw date input and its coercion into a [`CalendarDate`]

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone};

use crate::calendar::CalendarDate;
use crate::error::DateError;

/// Anything a caller may hand over as a range endpoint.
///
/// `Omitted` means "nothing was passed": a start falls back to the current
/// time and an end falls back to the start. `Unset` is the explicit marker
/// for "there is no date", which resolves to no date at all.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum DateInput {
    #[default]
    Omitted,
    Unset,
    Date(CalendarDate),
    Native(NaiveDateTime),
    Timestamp(i64),
    Text(String),
}

impl DateInput {
    /// True when an end input should be replaced by the start input.
    ///
    /// Besides `Omitted`, blank text and a zero (`0` or `"0"`) count as
    /// "nothing passed".
    pub fn is_omitted(&self) -> bool {
        match self {
            DateInput::Omitted => true,
            DateInput::Timestamp(seconds) => *seconds == 0,
            DateInput::Text(text) => matches!(text.trim(), "" | "0"),
            _ => false,
        }
    }

    /// Resolve to a date, or `None` for the `Unset` marker.
    ///
    /// Numeric text is read as a Unix timestamp, any other text goes
    /// through [`CalendarDate::parse`] anchored at `now`.
    ///
    /// # Errors
    ///
    /// Returns `DateError` for unparseable text or out-of-range timestamps.
    pub fn resolve(&self, now: CalendarDate) -> Result<Option<CalendarDate>, DateError> {
        match self {
            DateInput::Unset => Ok(None),
            DateInput::Omitted => Ok(Some(now)),
            DateInput::Date(date) => Ok(Some(*date)),
            DateInput::Native(datetime) => Ok(Some(CalendarDate::new(*datetime))),
            DateInput::Timestamp(seconds) => CalendarDate::from_timestamp(*seconds).map(Some),
            DateInput::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Ok(Some(now));
                }
                match trimmed.parse::<i64>() {
                    Ok(seconds) => CalendarDate::from_timestamp(seconds).map(Some),
                    Err(_) => CalendarDate::parse(trimmed, now).map(Some),
                }
            }
        }
    }
}

impl From<CalendarDate> for DateInput {
    fn from(date: CalendarDate) -> Self {
        DateInput::Date(date)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(datetime: NaiveDateTime) -> Self {
        DateInput::Native(datetime)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Date(CalendarDate::from(date))
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for DateInput {
    fn from(datetime: DateTime<Tz>) -> Self {
        DateInput::Native(datetime.naive_local())
    }
}

impl From<i64> for DateInput {
    fn from(seconds: i64) -> Self {
        DateInput::Timestamp(seconds)
    }
}

impl From<&str> for DateInput {
    fn from(text: &str) -> Self {
        DateInput::Text(text.to_string())
    }
}

impl From<String> for DateInput {
    fn from(text: String) -> Self {
        DateInput::Text(text)
    }
}

impl<T: Into<DateInput>> From<Option<T>> for DateInput {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(DateInput::Omitted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn now() -> CalendarDate {
        CalendarDate::from_ymd_hms(2014, 1, 2, 16, 20, 0).unwrap()
    }

    #[test]
    fn omitted_and_blank_resolve_to_now() {
        assert_eq!(DateInput::Omitted.resolve(now()).unwrap(), Some(now()));
        assert_eq!(DateInput::from("  ").resolve(now()).unwrap(), Some(now()));
        assert!(DateInput::from("").is_omitted());
        assert!(DateInput::from(None::<&str>).is_omitted());
    }

    #[test]
    fn zero_counts_as_omitted() {
        assert!(DateInput::from(0_i64).is_omitted());
        assert!(DateInput::from("0").is_omitted());
        assert!(DateInput::from(" 0 ").is_omitted());
        assert!(!DateInput::from(1_i64).is_omitted());
        assert!(!DateInput::from("00:30").is_omitted());
    }

    #[test]
    fn unset_resolves_to_nothing() {
        assert_eq!(DateInput::Unset.resolve(now()).unwrap(), None);
        assert!(!DateInput::Unset.is_omitted());
    }

    #[test]
    fn numeric_text_is_a_timestamp() {
        let resolved = DateInput::from("1388679600").resolve(now()).unwrap();
        assert_eq!(resolved, Some(now()));
        let resolved = DateInput::from(1_388_679_600_i64).resolve(now()).unwrap();
        assert_eq!(resolved, Some(now()));
    }

    #[test]
    fn native_values_are_wrapped() {
        let naive = now().as_naive();
        assert_eq!(DateInput::from(naive).resolve(now()).unwrap(), Some(now()));

        let zoned = Utc.from_utc_datetime(&naive);
        assert_eq!(DateInput::from(zoned).resolve(now()).unwrap(), Some(now()));
    }

    #[test]
    fn bad_text_propagates_the_parse_error() {
        let err = DateInput::from("the day after never").resolve(now()).unwrap_err();
        assert!(matches!(err, DateError::Unparseable(_)));
    }
}
