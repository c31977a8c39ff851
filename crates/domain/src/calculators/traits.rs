//! Core calculator contract shared by every elapsed-time strategy.

use std::fmt;

use crate::calendar::CalendarDate;

// =============================================================================
// Rounding
// =============================================================================

/// How elapsed hours are snapped and rounded.
///
/// The result is first snapped to the nearest `granularity_minutes` boundary
/// (expressed in hours), then rounded to `decimal_places` digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RoundingPolicy {
    granularity_minutes: u32,
    decimal_places: u32,
}

impl RoundingPolicy {
    /// Create a policy. A zero granularity is treated as one minute.
    pub fn new(granularity_minutes: u32, decimal_places: u32) -> Self {
        Self {
            granularity_minutes: granularity_minutes.max(1),
            decimal_places,
        }
    }

    pub fn granularity_minutes(&self) -> u32 {
        self.granularity_minutes
    }

    pub fn decimal_places(&self) -> u32 {
        self.decimal_places
    }

    /// Number of rounding periods in one hour (may be fractional).
    pub fn periods_per_hour(&self) -> f64 {
        60.0 / f64::from(self.granularity_minutes)
    }

    /// Snap a number of hours to the nearest period, then to the decimals.
    pub fn snap_hours(&self, hours: f64) -> f64 {
        let periods = self.periods_per_hour();
        round_half_away(
            round_half_away(hours * periods, 0) / periods,
            self.decimal_places,
        )
    }
}

impl Default for RoundingPolicy {
    fn default() -> Self {
        Self::new(1, 2)
    }
}

/// Round half away from zero to `places` decimal digits.
pub fn round_half_away(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places.min(15) as i32);
    (value * factor).round() / factor
}

// =============================================================================
// Endpoints
// =============================================================================

/// The two (possibly missing) dates a calculation runs over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Endpoints {
    pub start: Option<CalendarDate>,
    pub end: Option<CalendarDate>,
}

impl Endpoints {
    pub fn new(start: Option<CalendarDate>, end: Option<CalendarDate>) -> Self {
        Self { start, end }
    }

    /// Both dates, or `None` if either is missing.
    pub fn both(&self) -> Option<(CalendarDate, CalendarDate)> {
        Some((self.start?, self.end?))
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// A replaceable strategy for the numbers derived from a range.
///
/// Every operation is total: a missing endpoint yields zero, never an error.
/// Only `hours` must be supplied; the other three default to the standard
/// behaviour so a strategy can override just the piece it changes.
pub trait Calculator: Send + Sync + fmt::Debug {
    /// Stable identifier used when selecting a calculator by name.
    fn calculator_id(&self) -> &'static str;

    /// Rounding used when a caller does not pass one.
    fn default_rounding(&self) -> RoundingPolicy {
        RoundingPolicy::default()
    }

    /// Elapsed hours between the endpoints.
    fn hours(&self, endpoints: Endpoints, rounding: RoundingPolicy) -> f64;

    /// Alias of [`Calculator::hours`].
    fn hours_rounded_to_nearest(&self, endpoints: Endpoints, rounding: RoundingPolicy) -> f64 {
        self.hours(endpoints, rounding)
    }

    /// Whole days between the endpoints.
    fn days(&self, endpoints: Endpoints) -> i64 {
        match endpoints.both() {
            Some((start, end)) => end.diff_in_days(&start),
            None => 0,
        }
    }

    /// Months between the endpoints, rounded to the nearest month.
    ///
    /// The end is pushed forward 14 days to the end of its day and the start
    /// back to midnight before counting whole months, so a span that reaches
    /// half way into the next month counts as that month.
    fn months(&self, endpoints: Endpoints) -> i64 {
        match endpoints.both() {
            Some((start, end)) => end
                .add_days(14)
                .end_of_day()
                .diff_in_months(&start.start_of_day()),
            None => 0,
        }
    }

    /// Start time of day as decimal hours, one decimal place.
    fn decimal(&self, endpoints: Endpoints) -> f64 {
        match endpoints.start {
            Some(start) => decimal_time(&start),
            None => 0.0,
        }
    }
}

/// `hour + minute / 60`, rounded to one decimal place.
pub fn decimal_time(date: &CalendarDate) -> f64 {
    let hours = f64::from(date.hour()) + f64::from(date.minute()) / 60.0;
    round_half_away(hours, 1)
}
