//! Date ranges and the factory that makes them.
//!
//! A [`DateRangeFactory`] holds the shared configuration and a clock. Each
//! call to [`DateRangeFactory::make`] normalizes two raw inputs into an
//! independent [`DateRange`] value; nothing is shared between ranges except
//! the read-only configuration.

use std::fmt;
use std::sync::Arc;

use daterange_domain::{CalendarDate, Calculator, DateInput, Endpoints, RoundingPolicy};

use crate::attribute::{AttributeRequest, AttributeValue, RangeMethod, Target};
use crate::config::{OrderPolicy, RangeConfig, DEFAULT_STYLE};
use crate::error::EngineError;
use crate::formatter::RangeFormatter;
use crate::ports::{ClockPort, SystemClock};

// =============================================================================
// Factory
// =============================================================================

/// Makes ranges against one configuration and one clock.
#[derive(Clone)]
pub struct DateRangeFactory {
    config: Arc<RangeConfig>,
    clock: Arc<dyn ClockPort>,
}

impl DateRangeFactory {
    /// A factory reading the system clock.
    pub fn new(config: impl Into<Arc<RangeConfig>>) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: impl Into<Arc<RangeConfig>>, clock: Arc<dyn ClockPort>) -> Self {
        Self {
            config: config.into(),
            clock,
        }
    }

    pub fn config(&self) -> &Arc<RangeConfig> {
        &self.config
    }

    /// The marker input for "there is no date".
    pub fn none(&self) -> DateInput {
        DateInput::Unset
    }

    /// The clock's current time.
    pub fn now(&self) -> CalendarDate {
        CalendarDate::from_native(&self.clock.now())
    }

    /// Make a range from two raw inputs.
    ///
    /// An omitted end copies the start input; an omitted start is the
    /// current time. When both dates are known and the end precedes the
    /// start, the order policy either swaps them or rejects the range.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Date` for unparseable input and
    /// `EngineError::DateOrder` for out-of-order dates under
    /// [`OrderPolicy::Reject`].
    pub fn make(
        &self,
        start: impl Into<DateInput>,
        end: impl Into<DateInput>,
    ) -> Result<DateRange, EngineError> {
        let start_input = start.into();
        let mut end_input = end.into();
        if end_input.is_omitted() {
            end_input = start_input.clone();
        }

        let now = self.now();
        let mut start = start_input.resolve(now)?;
        let mut end = end_input.resolve(now)?;

        if let (Some(first), Some(last)) = (start, end) {
            if first > last {
                match self.config.order_policy() {
                    OrderPolicy::Swap => {
                        tracing::debug!(start = %first, end = %last, "Swapping out-of-order dates");
                        std::mem::swap(&mut start, &mut end);
                    }
                    OrderPolicy::Reject => return Err(EngineError::date_order(first, last)),
                }
            }
        }

        tracing::debug!(start = ?start, end = ?end, "Made date range");

        Ok(DateRange {
            config: Arc::clone(&self.config),
            start,
            end,
        })
    }

    /// Make a range covering a single instant.
    ///
    /// # Errors
    ///
    /// See [`DateRangeFactory::make`].
    pub fn at(&self, date: impl Into<DateInput>) -> Result<DateRange, EngineError> {
        self.make(date, DateInput::Omitted)
    }
}

impl fmt::Debug for DateRangeFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DateRangeFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// DateRange
// =============================================================================

/// Two possibly missing dates with `start <= end` when both are known.
#[derive(Debug, Clone)]
pub struct DateRange {
    config: Arc<RangeConfig>,
    start: Option<CalendarDate>,
    end: Option<CalendarDate>,
}

impl PartialEq for DateRange {
    fn eq(&self, other: &Self) -> bool {
        self.start == other.start && self.end == other.end
    }
}

impl DateRange {
    pub fn start(&self) -> Option<CalendarDate> {
        self.start
    }

    pub fn end(&self) -> Option<CalendarDate> {
        self.end
    }

    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.start, self.end)
    }

    pub fn config(&self) -> &RangeConfig {
        &self.config
    }

    pub fn calculator(&self) -> &Arc<dyn Calculator> {
        self.config.calculator()
    }

    /// True when both dates fall on the same calendar day, or when either
    /// is missing.
    pub fn is_same_day(&self) -> bool {
        match self.endpoints().both() {
            Some((start, end)) => start == end || start.is_same_day(&end),
            None => true,
        }
    }

    pub fn on_same_day(&self) -> bool {
        self.is_same_day()
    }

    /// Stretch the range to cover whole days: start at midnight, end at
    /// 23:59:59.
    pub fn full_day(&mut self) -> &mut Self {
        self.start = self.start.map(|start| start.start_of_day());
        self.end = self.end.map(|end| end.end_of_day());
        self
    }

    /// Strict overlap; ranges that only touch do not overlap.
    pub fn overlaps(&self, other: &DateRange) -> bool {
        match (self.endpoints().both(), other.endpoints().both()) {
            (Some((start, end)), Some((other_start, other_end))) => {
                start < other_end && end > other_start
            }
            _ => false,
        }
    }

    /// True when one range ends exactly where the other starts.
    pub fn is_adjacent_to(&self, other: &DateRange) -> bool {
        match (self.endpoints().both(), other.endpoints().both()) {
            (Some((start, end)), Some((other_start, other_end))) => {
                start == other_end || end == other_start
            }
            _ => false,
        }
    }

    // Calculator

    /// Elapsed hours with the calculator's default rounding.
    pub fn hours(&self) -> f64 {
        self.hours_with(self.calculator().default_rounding())
    }

    pub fn hours_with(&self, rounding: RoundingPolicy) -> f64 {
        self.calculator().hours(self.endpoints(), rounding)
    }

    pub fn hours_rounded_to_nearest(&self, minutes: u32, decimal_places: u32) -> f64 {
        self.calculator()
            .hours_rounded_to_nearest(self.endpoints(), RoundingPolicy::new(minutes, decimal_places))
    }

    pub fn days(&self) -> i64 {
        self.calculator().days(self.endpoints())
    }

    pub fn months(&self) -> i64 {
        self.calculator().months(self.endpoints())
    }

    pub fn decimal(&self) -> f64 {
        self.calculator().decimal(self.endpoints())
    }

    // Attributes

    /// Resolve an attribute by name, e.g. `start_short`, `short_title`,
    /// `hours` or `range_days`.
    pub fn attribute(&self, name: &str) -> AttributeValue {
        self.resolve(&AttributeRequest::parse(name, &self.config))
    }

    pub fn resolve(&self, request: &AttributeRequest) -> AttributeValue {
        let formatter = self.formatter();
        match request {
            AttributeRequest::Method(method) => self.call(*method),
            AttributeRequest::Calculation { target, name } => {
                formatter.calculate(*target, name, self.endpoints())
            }
            AttributeRequest::DateFormat { target, style } => {
                formatter.format(*target, style, self.endpoints(), None)
            }
            AttributeRequest::RangeFormat {
                date_style,
                delimiter_style,
            } => formatter.format_range(self.endpoints(), date_style, delimiter_style, None),
        }
    }

    /// Render one target in a style, with a pattern to use when the style
    /// has none.
    pub fn format(&self, target: Target, style: &str, explicit_format: Option<&str>) -> AttributeValue {
        self.formatter()
            .format(target, style, self.endpoints(), explicit_format)
    }

    pub fn format_date(
        &self,
        date: Option<CalendarDate>,
        style: &str,
        explicit_format: Option<&str>,
        explicit_fallback: Option<&str>,
    ) -> AttributeValue {
        self.formatter()
            .format_date(date, style, explicit_format, explicit_fallback)
    }

    fn formatter(&self) -> RangeFormatter<'_> {
        RangeFormatter::new(&self.config)
    }

    fn call(&self, method: RangeMethod) -> AttributeValue {
        match method {
            RangeMethod::Start => self.date_or_marker(self.start),
            RangeMethod::End => self.date_or_marker(self.end),
            RangeMethod::IsSameDay => self.is_same_day().into(),
            RangeMethod::OnSameDay => self.on_same_day().into(),
            RangeMethod::Hours => self.hours().into(),
            RangeMethod::HoursRoundedToNearest => {
                let rounding = self.calculator().default_rounding();
                self.calculator()
                    .hours_rounded_to_nearest(self.endpoints(), rounding)
                    .into()
            }
            RangeMethod::Days => self.days().into(),
            RangeMethod::Months => self.months().into(),
            RangeMethod::Decimal => self.decimal().into(),
        }
    }

    fn date_or_marker(&self, date: Option<CalendarDate>) -> AttributeValue {
        match date {
            Some(date) => date.into(),
            None => self.formatter().unset_marker(),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered =
            self.formatter()
                .format_range(self.endpoints(), DEFAULT_STYLE, DEFAULT_STYLE, None);
        write!(f, "{rendered}")
    }
}
