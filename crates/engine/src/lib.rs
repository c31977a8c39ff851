//! Date range engine.
//!
//! Turns pairs of raw date inputs into [`DateRange`] values and resolves
//! named attributes on them (`start_short`, `short_title`, `hours`, ...)
//! against a shared, read-only [`RangeConfig`].
//!
//! ## Structure
//!
//! - `config/` - styles, delimiters, fallbacks, calculations and loading
//! - `attribute` - attribute name parsing and resolved values
//! - `formatter` - style and fallback lookup
//! - `range` - the range value and its factory
//! - `ports/` - the clock

pub mod attribute;
pub mod config;
pub mod error;
pub mod formatter;
pub mod ports;
pub mod range;

pub use attribute::{AttributeRequest, AttributeValue, RangeMethod, Target};
pub use config::{
    Calculation, ConfigLoader, ConfigValue, Delimiters, NoneValue, OrderPolicy, RangeConfig,
};
pub use error::EngineError;
pub use formatter::RangeFormatter;
pub use ports::{ClockPort, FixedClock, SystemClock};
pub use range::{DateRange, DateRangeFactory};

pub use daterange_domain::{
    BillingCalculator, CalendarDate, Calculator, CalculatorRegistry, DateError, DateInput,
    Endpoints, RoundingPolicy, StandardCalculator,
};
