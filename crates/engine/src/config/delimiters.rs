//! Delimiter sets used to join two endpoints into one string.

use serde::{Deserialize, Serialize};

/// Literal text placed around a rendered range.
///
/// A two-date range renders as `before + start + middle + end + after`; a
/// range whose endpoints are the same instant renders as `only + date`.
/// Missing fields deserialize as empty strings. `end` is accepted as an
/// alias of `after`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Delimiters {
    pub before: String,
    pub middle: String,
    #[serde(alias = "end")]
    pub after: String,
    pub only: String,
}

impl Delimiters {
    pub fn new(
        before: impl Into<String>,
        middle: impl Into<String>,
        after: impl Into<String>,
        only: impl Into<String>,
    ) -> Self {
        Self {
            before: before.into(),
            middle: middle.into(),
            after: after.into(),
            only: only.into(),
        }
    }

    /// A set that only carries the single-date prefix.
    pub fn only(prefix: impl Into<String>) -> Self {
        Self {
            only: prefix.into(),
            ..Self::default()
        }
    }

    /// Join two already formatted endpoints.
    pub fn join(&self, start: &str, end: &str) -> String {
        format!("{}{}{}{}{}", self.before, start, self.middle, end, self.after)
    }

    /// Prefix a single formatted date.
    pub fn single(&self, date: &str) -> String {
        format!("{}{}", self.only, date)
    }

    /// Look up one field by name (`before`, `middle`, `after`/`end`, `only`).
    pub fn field(&self, name: &str) -> Option<&str> {
        match name {
            "before" => Some(&self.before),
            "middle" => Some(&self.middle),
            "after" | "end" => Some(&self.after),
            "only" => Some(&self.only),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_two_dates() {
        let delimiters = Delimiters::new("a ", " - ", " b", "");
        assert_eq!(delimiters.join("x", "y"), "a x - y b");
    }

    #[test]
    fn prefixes_one_date() {
        assert_eq!(Delimiters::only("For ").single("x"), "For x");
    }

    #[test]
    fn partial_tables_default_to_empty() {
        let parsed: Delimiters = serde_json::from_str(r#"{"only": "prefix "}"#).unwrap();
        assert_eq!(parsed, Delimiters::only("prefix "));
    }

    #[test]
    fn end_is_an_alias_of_after() {
        let parsed: Delimiters =
            serde_json::from_str(r#"{"before": "From ", "middle": " to ", "end": "!"}"#).unwrap();
        assert_eq!(parsed.after, "!");
        assert_eq!(parsed.field("end"), Some("!"));
        assert_eq!(parsed.field("sideways"), None);
    }
}
