//! Standard elapsed-time calculator.

use super::traits::{Calculator, Endpoints, RoundingPolicy};

/// Rounds elapsed hours to the nearest granularity boundary.
///
/// Defaults to one-minute granularity and two decimal places.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardCalculator;

impl StandardCalculator {
    pub fn new() -> Self {
        Self
    }
}

impl Calculator for StandardCalculator {
    fn calculator_id(&self) -> &'static str {
        "standard"
    }

    fn hours(&self, endpoints: Endpoints, rounding: RoundingPolicy) -> f64 {
        let Some((start, end)) = endpoints.both() else {
            return 0.0;
        };
        let minutes = start.diff_in_minutes(&end) as f64;
        rounding.snap_hours(minutes / 60.0)
    }
}
