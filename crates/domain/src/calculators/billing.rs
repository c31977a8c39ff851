//! Billing-style calculator that rounds elapsed time down.

use super::traits::{round_half_away, Calculator, Endpoints, RoundingPolicy};

/// Rounds elapsed hours down to the granularity boundary.
///
/// Half a period is taken off before snapping, so anything short of a full
/// period is dropped. When the elapsed minutes sit exactly on a boundary and
/// the snapped result ends one period past the whole hour, one more period is
/// removed: 2h15m bills as 2h at quarter-hour granularity while 2h16m bills
/// as 2.25h. The result never goes below zero.
///
/// Defaults to fifteen-minute granularity and two decimal places.
#[derive(Debug, Clone, Copy, Default)]
pub struct BillingCalculator;

impl BillingCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Calculator for BillingCalculator {
    fn calculator_id(&self) -> &'static str {
        "billing"
    }

    fn default_rounding(&self) -> RoundingPolicy {
        RoundingPolicy::new(15, 2)
    }

    fn hours(&self, endpoints: Endpoints, rounding: RoundingPolicy) -> f64 {
        let Some((start, end)) = endpoints.both() else {
            return 0.0;
        };

        let elapsed = start.diff_in_minutes(&end);
        let granularity = rounding.granularity_minutes();
        let minutes = elapsed as f64 - f64::from(granularity) / 2.0;
        let rounded = rounding.snap_hours(minutes / 60.0);

        let fraction = round_half_away(rounded - rounded.floor(), 2);
        let period = round_half_away(1.0 / rounding.periods_per_hour(), 2);

        let hours = if fraction == period && elapsed % i64::from(granularity) == 0 {
            round_half_away(rounded - period, rounding.decimal_places())
        } else {
            rounded
        };

        hours.max(0.0)
    }
}
