//! Date range domain
//!
//! Pure value types used by the range engine: the [`CalendarDate`] point in
//! time, [`DateInput`] coercion of raw caller input, and the replaceable
//! [`Calculator`] strategies that derive elapsed hours, days, months and
//! decimal time from a pair of endpoints. Nothing here logs or reads
//! configuration.

pub mod calculators;
pub mod calendar;
pub mod error;
pub mod input;

pub use calculators::{
    decimal_time, round_half_away, BillingCalculator, Calculator, CalculatorRegistry, Endpoints,
    RoundingPolicy, StandardCalculator,
};
pub use calendar::CalendarDate;
pub use error::DateError;
pub use input::DateInput;
