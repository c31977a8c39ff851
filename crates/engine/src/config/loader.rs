//! Loading range configuration from files and the environment.
//!
//! Sources are layered in the order they are added; later sources win key by
//! key. The result is merged over a base [`RangeConfig`] (the shipped
//! defaults unless told otherwise), so a file only needs the keys it changes.
//!
//! ```toml
//! calculator = "billing"
//! order_policy = "reject"
//!
//! [styles]
//! short = "m/d/Y"
//!
//! [range.title]
//! before = "Between "
//! middle = " and "
//! ```
//!
//! Environment overrides use the `DATE_RANGE` prefix with `__` as the path
//! separator, e.g. `DATE_RANGE__STYLES__SHORT=m/d/Y`.

use std::collections::HashMap;
use std::path::Path;

use ::config::builder::DefaultState;
use ::config::{Config, ConfigBuilder, Environment, File, FileFormat};
use daterange_domain::CalculatorRegistry;
use serde::Deserialize;

use super::{Delimiters, OrderPolicy, RangeConfig};
use crate::error::EngineError;

pub const ENV_PREFIX: &str = "DATE_RANGE";
pub const ENV_SEPARATOR: &str = "__";

/// The loadable subset of a [`RangeConfig`].
///
/// Calculations are code and cannot come from a file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigOverrides {
    none: HashMap<String, Option<String>>,
    styles: HashMap<String, String>,
    range: HashMap<String, Delimiters>,
    calculator: Option<String>,
    order_policy: Option<OrderPolicy>,
}

pub struct ConfigLoader {
    builder: ConfigBuilder<DefaultState>,
    calculators: CalculatorRegistry,
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            calculators: CalculatorRegistry::new(),
        }
    }

    /// Add a required file; the format follows its extension.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self.builder.add_source(File::from(path.as_ref()));
        self
    }

    /// Add a file that is skipped when it does not exist.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Add an in-memory source.
    pub fn with_str(mut self, text: &str, format: FileFormat) -> Self {
        self.builder = self.builder.add_source(File::from_str(text, format));
        self
    }

    /// Add `DATE_RANGE__*` environment overrides.
    pub fn with_environment(mut self) -> Self {
        self.builder = self.builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator(ENV_SEPARATOR)
                .separator(ENV_SEPARATOR),
        );
        self
    }

    /// Resolve `calculator = "<id>"` against this registry instead of the
    /// built-in one.
    pub fn with_calculators(mut self, calculators: CalculatorRegistry) -> Self {
        self.calculators = calculators;
        self
    }

    /// Load over the shipped defaults.
    ///
    /// # Errors
    ///
    /// Returns `EngineError::Config` when a source cannot be read or has the
    /// wrong shape, and `EngineError::UnknownCalculator` when the named
    /// calculator is not registered.
    pub fn load(self) -> Result<RangeConfig, EngineError> {
        self.load_over(RangeConfig::default())
    }

    /// Load over an explicit base configuration.
    ///
    /// # Errors
    ///
    /// See [`ConfigLoader::load`].
    pub fn load_over(self, mut base: RangeConfig) -> Result<RangeConfig, EngineError> {
        let overrides: ConfigOverrides = self.builder.build()?.try_deserialize()?;

        tracing::debug!(
            none = overrides.none.len(),
            styles = overrides.styles.len(),
            range = overrides.range.len(),
            calculator = overrides.calculator.as_deref(),
            "Loaded range configuration overrides"
        );

        base.merge_none(overrides.none);
        base.merge_styles(overrides.styles);
        base.merge_range(overrides.range);

        if let Some(name) = overrides.calculator {
            let calculator = self
                .calculators
                .get(&name)
                .ok_or_else(|| EngineError::unknown_calculator(&name))?;
            base = base.with_calculator(calculator);
        }
        if let Some(policy) = overrides.order_policy {
            base = base.with_order_policy(policy);
        }

        Ok(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::NoneValue;
    use std::io::Write;
    use std::sync::Arc;

    use daterange_domain::{Calculator, Endpoints, RoundingPolicy};

    const TOML: &str = r#"
calculator = "billing"
order_policy = "reject"

[none]
default = "--"

[styles]
short = "m/d/Y"

[range.title]
before = "Between "
middle = " and "
end = "."
"#;

    #[test]
    fn no_sources_keeps_the_defaults() {
        let config = ConfigLoader::new().load().unwrap();
        assert_eq!(config.style("short"), Some("n/j/Y"));
        assert_eq!(config.calculator().calculator_id(), "standard");
        assert_eq!(config.order_policy(), OrderPolicy::Swap);
    }

    #[test]
    fn toml_overrides_merge_key_by_key() {
        let config = ConfigLoader::new()
            .with_str(TOML, FileFormat::Toml)
            .load()
            .unwrap();

        assert_eq!(config.style("short"), Some("m/d/Y"));
        assert_eq!(config.style("tiny"), Some("n/j/y"));
        assert_eq!(config.none_value("default"), NoneValue::Text("--".to_string()));
        assert_eq!(config.none_value("sql"), NoneValue::Null);

        let title = config.delimiters("title").unwrap();
        assert_eq!(title, &Delimiters::new("Between ", " and ", ".", ""));
        assert!(config.delimiters("url").is_some());
        assert!(config.calculation("days").is_some());

        assert_eq!(config.calculator().calculator_id(), "billing");
        assert_eq!(config.order_policy(), OrderPolicy::Reject);
    }

    #[test]
    fn json_can_configure_a_null_fallback() {
        let config = ConfigLoader::new()
            .with_str(r#"{"none": {"short": null}}"#, FileFormat::Json)
            .load_over(RangeConfig::empty())
            .unwrap();
        assert_eq!(config.none_value("short"), NoneValue::Null);
        assert_eq!(config.style("default"), None);
    }

    #[test]
    fn later_sources_win() {
        let config = ConfigLoader::new()
            .with_str(TOML, FileFormat::Toml)
            .with_str("[styles]\nshort = \"Y\"", FileFormat::Toml)
            .load()
            .unwrap();
        assert_eq!(config.style("short"), Some("Y"));
    }

    #[test]
    fn reads_files_from_disk() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(TOML.as_bytes()).unwrap();

        let config = ConfigLoader::new().with_file(file.path()).load().unwrap();
        assert_eq!(config.style("short"), Some("m/d/Y"));
    }

    #[test]
    fn missing_optional_file_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = ConfigLoader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .load()
            .unwrap();
        assert_eq!(config.style("short"), Some("n/j/Y"));
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = ConfigLoader::new()
            .with_file(dir.path().join("absent.toml"))
            .load();
        assert!(matches!(result, Err(EngineError::Config(_))));
    }

    #[test]
    fn unknown_calculator_is_an_error() {
        let result = ConfigLoader::new()
            .with_str("calculator = \"lunar\"", FileFormat::Toml)
            .load();
        assert!(matches!(result, Err(EngineError::UnknownCalculator(name)) if name == "lunar"));
    }

    #[test]
    fn custom_registries_resolve_custom_calculators() {
        #[derive(Debug)]
        struct Flat;

        impl Calculator for Flat {
            fn calculator_id(&self) -> &'static str {
                "flat"
            }

            fn hours(&self, _: Endpoints, _: RoundingPolicy) -> f64 {
                1.0
            }
        }

        let mut registry = CalculatorRegistry::new();
        registry.register(Arc::new(Flat));

        let config = ConfigLoader::new()
            .with_str("calculator = \"flat\"", FileFormat::Toml)
            .with_calculators(registry)
            .load()
            .unwrap();
        assert_eq!(config.calculator().calculator_id(), "flat");
    }
}
