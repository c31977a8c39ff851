//! Named calculations stored in configuration.

use std::fmt;
use std::sync::Arc;

use daterange_domain::{decimal_time, CalendarDate};

use crate::attribute::AttributeValue;

type CalculationFn = dyn Fn(&CalendarDate, Option<&CalendarDate>) -> AttributeValue + Send + Sync;

/// A configured function computing a derived attribute.
///
/// Range requests call it with `(start, Some(end))`, single-date requests
/// with `(date, None)`.
#[derive(Clone)]
pub struct Calculation(Arc<CalculationFn>);

impl Calculation {
    pub fn new<F>(function: F) -> Self
    where
        F: Fn(&CalendarDate, Option<&CalendarDate>) -> AttributeValue + Send + Sync + 'static,
    {
        Self(Arc::new(function))
    }

    pub fn call(&self, date: &CalendarDate, end: Option<&CalendarDate>) -> AttributeValue {
        (self.0)(date, end)
    }

    /// Whole days between the endpoints; zero for a single date.
    pub fn days() -> Self {
        Self::new(|start, end| {
            let days = end.map(|end| end.diff_in_days(start)).unwrap_or(0);
            AttributeValue::Integer(days)
        })
    }

    /// Time of day of the (first) date as decimal hours.
    pub fn decimal() -> Self {
        Self::new(|date, _| AttributeValue::Number(decimal_time(date)))
    }
}

impl fmt::Debug for Calculation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Calculation(..)")
    }
}
