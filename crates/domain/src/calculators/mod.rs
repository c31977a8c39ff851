//! Elapsed-time calculators.
//!
//! A calculator turns a pair of range endpoints into numbers: elapsed hours,
//! whole days, rounded months and the decimal time of day. Callers pick one
//! strategy per configuration; each implements the contract in `traits.rs`.
//!
//! # Built-in strategies
//!
//! - `standard` - nearest-boundary rounding (`StandardCalculator`)
//! - `billing` - round-down billing increments (`BillingCalculator`)

mod billing;
mod standard;
mod traits;

pub use billing::BillingCalculator;
pub use standard::StandardCalculator;
pub use traits::{decimal_time, round_half_away, Calculator, Endpoints, RoundingPolicy};

use std::sync::Arc;

/// Registry of available calculators.
#[derive(Debug)]
pub struct CalculatorRegistry {
    calculators: Vec<Arc<dyn Calculator>>,
}

impl Default for CalculatorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl CalculatorRegistry {
    /// Create a new registry with all built-in calculators.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(StandardCalculator::new()));
        registry.register(Arc::new(BillingCalculator::new()));
        registry
    }

    /// Create an empty registry without built-in calculators.
    pub fn empty() -> Self {
        Self {
            calculators: Vec::new(),
        }
    }

    /// Register a calculator. A later registration shadows an earlier one
    /// with the same id.
    pub fn register(&mut self, calculator: Arc<dyn Calculator>) {
        self.calculators.insert(0, calculator);
    }

    /// Get a calculator by its id.
    pub fn get(&self, calculator_id: &str) -> Option<Arc<dyn Calculator>> {
        self.calculators
            .iter()
            .find(|c| c.calculator_id() == calculator_id)
            .cloned()
    }

    /// List all registered calculator ids.
    pub fn list_calculators(&self) -> Vec<&str> {
        self.calculators.iter().map(|c| c.calculator_id()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_includes_builtins() {
        let registry = CalculatorRegistry::new();
        assert!(registry.list_calculators().contains(&"standard"));
        assert!(registry.get("billing").is_some());
        assert!(registry.get("unknown").is_none());
    }

    #[test]
    fn empty_registry_has_nothing() {
        assert!(CalculatorRegistry::empty().list_calculators().is_empty());
    }

    #[test]
    fn later_registration_wins() {
        #[derive(Debug)]
        struct Flat;

        impl Calculator for Flat {
            fn calculator_id(&self) -> &'static str {
                "standard"
            }

            fn hours(&self, _endpoints: Endpoints, _rounding: RoundingPolicy) -> f64 {
                1.0
            }
        }

        let mut registry = CalculatorRegistry::new();
        registry.register(Arc::new(Flat));
        let calc = registry.get("standard").unwrap();
        assert_eq!(calc.hours(Endpoints::default(), RoundingPolicy::default()), 1.0);
    }
}
