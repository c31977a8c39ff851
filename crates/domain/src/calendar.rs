//! Calendar date value object
//!
//! `CalendarDate` is the single point-in-time type the rest of the workspace
//! works with. It wraps a `chrono::NaiveDateTime` (wall-clock time, no zone)
//! and exposes the small set of operations the range engine needs:
//! comparison, whole-unit differences, day normalisation, day arithmetic,
//! parsing of human date text and rendering through letter-token date patterns
//! (`n/j/Y`, `l, F j, Y`, `g:ia`, ...).

use chrono::{
    DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, TimeZone, Timelike,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::error::DateError;

/// Pattern used by `Display`
const DISPLAY_PATTERN: &str = "Y-m-d H:i:s";

// =============================================================================
// CalendarDate
// =============================================================================

/// An immutable point in time, ordered chronologically.
///
/// Mutating operations return a new value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalendarDate(NaiveDateTime);

impl CalendarDate {
    pub fn new(datetime: NaiveDateTime) -> Self {
        Self(datetime)
    }

    /// Build a date from its components, `None` if they are not a real date.
    pub fn from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|date| date.and_hms_opt(hour, minute, second))
            .map(Self)
    }

    /// Interpret a Unix timestamp (seconds) as UTC wall-clock time.
    pub fn from_timestamp(seconds: i64) -> Result<Self, DateError> {
        DateTime::from_timestamp(seconds, 0)
            .map(|utc| Self(utc.naive_utc()))
            .ok_or_else(|| DateError::invalid_timestamp(seconds))
    }

    /// Take the local wall-clock time of a zoned chrono value.
    pub fn from_native<Tz: TimeZone>(datetime: &DateTime<Tz>) -> Self {
        Self(datetime.naive_local())
    }

    /// Parse human date text.
    ///
    /// `now` anchors relative input: the keywords `now`, `today`,
    /// `tomorrow` and `yesterday`, and bare times such as `10:14:00 pm`,
    /// which land on `now`'s calendar day.
    ///
    /// # Errors
    ///
    /// Returns `DateError::Unparseable` when the text matches no layout.
    pub fn parse(text: &str, now: CalendarDate) -> Result<Self, DateError> {
        let trimmed = text.trim();
        let lower = trimmed.to_ascii_lowercase();

        match lower.as_str() {
            "now" => return Ok(now),
            "today" => return Ok(now.start_of_day()),
            "tomorrow" => return Ok(now.add_days(1).start_of_day()),
            "yesterday" => return Ok(now.add_days(-1).start_of_day()),
            _ => {}
        }

        if let Some(parsed) = parse_numeric(&lower, now.date()) {
            return Ok(Self(parsed));
        }

        if let Ok(zoned) = DateTime::parse_from_rfc3339(trimmed) {
            return Ok(Self(zoned.naive_utc()));
        }

        parse_textual(trimmed)
            .map(Self)
            .ok_or_else(|| DateError::unparseable(text))
    }

    // Accessors

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// The calendar day, without the time of day.
    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    // Differences (always absolute, truncated to whole units)

    pub fn diff_in_minutes(&self, other: &CalendarDate) -> i64 {
        (other.0 - self.0).num_minutes().abs()
    }

    pub fn diff_in_days(&self, other: &CalendarDate) -> i64 {
        (other.0 - self.0).num_days().abs()
    }

    /// Whole calendar months between the two dates.
    ///
    /// A month is only counted once the later date has reached the same
    /// day-of-month and time of day as the earlier one.
    pub fn diff_in_months(&self, other: &CalendarDate) -> i64 {
        let (earlier, later) = if self.0 <= other.0 {
            (self.0, other.0)
        } else {
            (other.0, self.0)
        };

        let mut months = i64::from(later.year() - earlier.year()) * 12
            + i64::from(later.month())
            - i64::from(earlier.month());

        if (later.day(), later.time()) < (earlier.day(), earlier.time()) {
            months -= 1;
        }

        months
    }

    // Normalisation and arithmetic

    /// Midnight at the start of this date's day.
    pub fn start_of_day(&self) -> Self {
        self.0
            .date()
            .and_hms_opt(0, 0, 0)
            .map(Self)
            .unwrap_or(*self)
    }

    /// The last whole second of this date's day (23:59:59).
    pub fn end_of_day(&self) -> Self {
        self.0
            .date()
            .and_hms_opt(23, 59, 59)
            .map(Self)
            .unwrap_or(*self)
    }

    /// Shift by whole days. Saturates at the edges of chrono's range.
    pub fn add_days(&self, days: i64) -> Self {
        TimeDelta::try_days(days)
            .and_then(|delta| self.0.checked_add_signed(delta))
            .map(Self)
            .unwrap_or(*self)
    }

    pub fn is_same_day(&self, other: &CalendarDate) -> bool {
        self.date() == other.date()
    }

    /// Render through a letter-token date pattern.
    ///
    /// Recognised tokens: `d D j l N S w z W F m M n t L Y y a A g G h H i s
    /// U`. A backslash emits the next character literally; every other
    /// character is copied through unchanged.
    pub fn format(&self, pattern: &str) -> String {
        let dt = self.0;
        let mut out = String::with_capacity(pattern.len() * 2);
        let mut chars = pattern.chars();

        while let Some(token) = chars.next() {
            match token {
                '\\' => {
                    if let Some(literal) = chars.next() {
                        out.push(literal);
                    }
                }
                // Day
                'd' => out.push_str(&format!("{:02}", dt.day())),
                'D' => out.push_str(&dt.format("%a").to_string()),
                'j' => out.push_str(&dt.day().to_string()),
                'l' => out.push_str(&dt.format("%A").to_string()),
                'N' => out.push_str(&dt.weekday().number_from_monday().to_string()),
                'S' => out.push_str(ordinal_suffix(dt.day())),
                'w' => out.push_str(&dt.weekday().num_days_from_sunday().to_string()),
                'z' => out.push_str(&dt.ordinal0().to_string()),
                // Week
                'W' => out.push_str(&format!("{:02}", dt.iso_week().week())),
                // Month
                'F' => out.push_str(&dt.format("%B").to_string()),
                'm' => out.push_str(&format!("{:02}", dt.month())),
                'M' => out.push_str(&dt.format("%b").to_string()),
                'n' => out.push_str(&dt.month().to_string()),
                't' => out.push_str(&days_in_month(dt.year(), dt.month()).to_string()),
                // Year
                'L' => out.push(if dt.date().leap_year() { '1' } else { '0' }),
                'Y' => out.push_str(&dt.year().to_string()),
                'y' => out.push_str(&format!("{:02}", dt.year().rem_euclid(100))),
                // Time
                'a' => out.push_str(if dt.hour() < 12 { "am" } else { "pm" }),
                'A' => out.push_str(if dt.hour() < 12 { "AM" } else { "PM" }),
                'g' => out.push_str(&twelve_hour(dt.hour()).to_string()),
                'G' => out.push_str(&dt.hour().to_string()),
                'h' => out.push_str(&format!("{:02}", twelve_hour(dt.hour()))),
                'H' => out.push_str(&format!("{:02}", dt.hour())),
                'i' => out.push_str(&format!("{:02}", dt.minute())),
                's' => out.push_str(&format!("{:02}", dt.second())),
                'U' => out.push_str(&dt.and_utc().timestamp().to_string()),
                other => out.push(other),
            }
        }

        out
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format(DISPLAY_PATTERN))
    }
}

impl From<NaiveDateTime> for CalendarDate {
    fn from(datetime: NaiveDateTime) -> Self {
        Self::new(datetime)
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self(date.and_time(NaiveTime::MIN))
    }
}

// =============================================================================
// Pattern helpers
// =============================================================================

fn twelve_hour(hour: u32) -> u32 {
    match hour % 12 {
        0 => 12,
        h => h,
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}

fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

// =============================================================================
// Parsing
// =============================================================================

/// `Y-m-d` or `n/j/Y` / `n/j/y`, optionally followed by a time after a space
/// or `t`.
static NUMERIC_DATE: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d{4})-(\d{1,2})-(\d{1,2})|(\d{1,2})/(\d{1,2})/(\d{1,4}))(?:[t ]\s*(.+))?$")
        .ok()
});

/// `H:i`, `H:i:s`, `H:i:s.u`, optionally followed by `am`/`pm`; with a
/// meridiem the minutes may be omitted (`4pm`).
static TIME_OF_DAY: LazyLock<Option<Regex>> = LazyLock::new(|| {
    Regex::new(r"^(\d{1,2})(?::(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?)?\s*(am|pm)?$").ok()
});

/// Numeric layouts with an optional time, or a bare time on the reference
/// day. Expects lowercase input.
fn parse_numeric(lower: &str, today: NaiveDate) -> Option<NaiveDateTime> {
    let Some(caps) = NUMERIC_DATE.as_ref()?.captures(lower) else {
        return parse_time(lower).map(|time| today.and_time(time));
    };

    let date = match (caps.get(1), caps.get(4)) {
        (Some(year), _) => NaiveDate::from_ymd_opt(
            year.as_str().parse().ok()?,
            caps.get(2)?.as_str().parse().ok()?,
            caps.get(3)?.as_str().parse().ok()?,
        )?,
        (None, Some(month)) => {
            let year_text = caps.get(6)?.as_str();
            let year: i32 = year_text.parse().ok()?;
            let year = match year_text.len() {
                1 | 2 if year < 70 => 2000 + year,
                1 | 2 => 1900 + year,
                _ => year,
            };
            NaiveDate::from_ymd_opt(
                year,
                month.as_str().parse().ok()?,
                caps.get(5)?.as_str().parse().ok()?,
            )?
        }
        (None, None) => return None,
    };

    let time = match caps.get(7) {
        Some(time) => parse_time(time.as_str().trim())?,
        None => NaiveTime::MIN,
    };

    Some(date.and_time(time))
}

fn parse_time(text: &str) -> Option<NaiveTime> {
    let caps = TIME_OF_DAY.as_ref()?.captures(text)?;
    let meridiem = caps.get(5).map(|m| m.as_str() == "pm");

    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    let minute: u32 = match caps.get(2) {
        Some(minute) => minute.as_str().parse().ok()?,
        None if meridiem.is_some() => 0,
        None => return None,
    };
    let second: u32 = match caps.get(3) {
        Some(second) => second.as_str().parse().ok()?,
        None => 0,
    };
    let nanos = match caps.get(4) {
        Some(fraction) => {
            let digits = fraction.as_str();
            let scale = 10u32.pow(9 - digits.len() as u32);
            digits.parse::<u32>().ok()? * scale
        }
        None => 0,
    };

    if let Some(is_pm) = meridiem {
        if !(1..=12).contains(&hour) {
            return None;
        }
        hour = hour % 12 + if is_pm { 12 } else { 0 };
    }

    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

/// Month-name layouts, including the ones the default styles render.
fn parse_textual(text: &str) -> Option<NaiveDateTime> {
    const DATETIME_LAYOUTS: [&str; 2] = ["%a, %b %d, %Y %I:%M%p", "%A, %B %d, %Y %I:%M%p"];
    const DATE_LAYOUTS: [&str; 4] = ["%A, %B %d, %Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

    DATETIME_LAYOUTS
        .iter()
        .find_map(|layout| NaiveDateTime::parse_from_str(text, layout).ok())
        .or_else(|| {
            DATE_LAYOUTS
                .iter()
                .find_map(|layout| NaiveDate::parse_from_str(text, layout).ok())
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> CalendarDate {
        CalendarDate::parse(text, reference()).unwrap()
    }

    fn reference() -> CalendarDate {
        CalendarDate::from_ymd_hms(2014, 1, 2, 16, 20, 0).unwrap()
    }

    mod parsing {
        use super::*;

        #[test]
        fn numeric_layouts_land_on_the_same_day() {
            let expected = NaiveDate::from_ymd_opt(2014, 1, 2).unwrap();
            for text in ["1/2/14", "1/2/2014", "2014-01-02", "2014-01-02 4:20pm"] {
                assert_eq!(date(text).date(), expected, "{text}");
            }
        }

        #[test]
        fn meridiem_times_are_24_hour_internally() {
            let parsed = date("2014-01-02 4:20pm");
            assert_eq!((parsed.hour(), parsed.minute()), (16, 20));

            let midnight = date("12:05am");
            assert_eq!(midnight.hour(), 0);
        }

        #[test]
        fn bare_times_use_the_reference_day() {
            let parsed = date("10:14:00 pm");
            assert_eq!(parsed.date(), reference().date());
            assert_eq!((parsed.hour(), parsed.minute()), (22, 14));
        }

        #[test]
        fn iso_separator_and_bare_meridiem() {
            let parsed = date("2014-01-02T16:20:00");
            assert_eq!(parsed, reference());
            assert_eq!(date("4pm").hour(), 16);
            assert!(CalendarDate::parse("10", reference()).is_err());
        }

        #[test]
        fn fractional_seconds_are_kept() {
            let parsed = date("2014-01-09 11:14:15.638276");
            assert_eq!(parsed.as_naive().nanosecond(), 638_276_000);
        }

        #[test]
        fn keywords_are_relative_to_now() {
            assert_eq!(date("now"), reference());
            assert_eq!(date("Today"), reference().start_of_day());
            assert_eq!(date("tomorrow").date(), reference().add_days(1).date());
        }

        #[test]
        fn textual_layouts() {
            assert_eq!(date("Thursday, January 2, 2014").date(), reference().date());
            assert_eq!(date("Jan 2, 2014").date(), reference().date());
        }

        #[test]
        fn garbage_is_an_error() {
            let err = CalendarDate::parse("next blursday", reference()).unwrap_err();
            assert!(matches!(err, DateError::Unparseable(_)));
            assert!(CalendarDate::parse("13/45/2014", reference()).is_err());
            assert!(CalendarDate::parse("25:00", reference()).is_err());
        }

        #[test]
        fn timestamps_are_utc() {
            let parsed = CalendarDate::from_timestamp(1_388_679_600).unwrap();
            assert_eq!(parsed, reference());
        }
    }

    mod arithmetic {
        use super::*;

        #[test]
        fn differences_are_absolute_and_truncated() {
            let start = date("2016-01-01 10:00:00");
            let end = date("2016-01-04 14:12:00");
            assert_eq!(start.diff_in_days(&end), 3);
            assert_eq!(end.diff_in_days(&start), 3);
            assert_eq!(start.diff_in_minutes(&end), 3 * 24 * 60 + 4 * 60 + 12);
        }

        #[test]
        fn month_difference_needs_a_full_month() {
            let start = date("2016-01-31");
            assert_eq!(start.diff_in_months(&date("2016-02-29")), 0);
            assert_eq!(start.diff_in_months(&date("2016-03-31")), 2);
            assert_eq!(date("2016-03-31").diff_in_months(&start), 2);
        }

        #[test]
        fn day_boundaries() {
            let parsed = date("2014-01-02 4:20pm");
            assert_eq!(parsed.start_of_day().to_string(), "2014-01-02 00:00:00");
            assert_eq!(parsed.end_of_day().to_string(), "2014-01-02 23:59:59");
        }

        #[test]
        fn add_days_crosses_months() {
            assert_eq!(date("2016-02-16").add_days(14).date(), date("2016-03-01").date());
        }
    }

    mod formatting {
        use super::*;

        #[test]
        fn renders_pattern_tokens() {
            let d = reference();
            assert_eq!(d.format("n/j/Y"), "1/2/2014");
            assert_eq!(d.format("n/j/y"), "1/2/14");
            assert_eq!(d.format("m/d/y"), "01/02/14");
            assert_eq!(d.format("Y-m-d H:i:s"), "2014-01-02 16:20:00");
            assert_eq!(d.format("l, F j, Y"), "Thursday, January 2, 2014");
            assert_eq!(d.format("D, M j, Y h:ia"), "Thu, Jan 2, 2014 04:20pm");
            assert_eq!(d.format("F Y"), "January 2014");
            assert_eq!(d.format("g:ia"), "4:20pm");
            assert_eq!(d.format("jS \\o\\f F"), "2nd of January");
        }

        #[test]
        fn unknown_characters_pass_through() {
            assert_eq!(reference().format("x"), "x");
            assert_eq!(reference().format("X"), "X");
        }

        #[test]
        fn sql_format_round_trips_to_the_same_day() {
            let original = date("2014-01-05 4:20pm");
            let reparsed = date(&original.format("Y-m-d"));
            assert!(original.is_same_day(&reparsed));
        }

        #[test]
        fn serializes_transparently() {
            let json = serde_json::to_string(&reference()).unwrap();
            assert_eq!(json, "\"2014-01-02T16:20:00\"");
        }
    }
}
