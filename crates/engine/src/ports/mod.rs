//! Port traits for what the engine takes from its host.

mod clock;

pub use clock::{ClockPort, FixedClock, SystemClock};

#[cfg(test)]
pub use clock::MockClockPort;
