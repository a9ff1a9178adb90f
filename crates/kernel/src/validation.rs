//! Field-level constraint checks.
//!
//! Records implement [`Validate`] by chaining constraints on a [`Constraints`]
//! builder. A non-empty violation list means the record must not be written.

use serde::Serialize;

/// One failed constraint, addressed by the field's wire name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub property_path: String,
    pub message: String,
}

impl Violation {
    pub fn new(property_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property_path: property_path.into(),
            message: message.into(),
        }
    }
}

/// Implemented by every record accepted from a request body.
pub trait Validate {
    fn validate(&self) -> Vec<Violation>;
}

/// Accumulates violations for a single record.
#[derive(Debug, Default)]
pub struct Constraints {
    violations: Vec<Violation>,
}

impl Constraints {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails when the value is missing, empty, or whitespace only.
    pub fn not_blank(mut self, field: &str, value: Option<&str>) -> Self {
        if value.map_or(true, |v| v.trim().is_empty()) {
            self.violations
                .push(Violation::new(field, "This value should not be blank."));
        }
        self
    }

    /// Fails when the value is longer than `max` characters. Missing values pass.
    pub fn max_length(mut self, field: &str, value: Option<&str>, max: usize) -> Self {
        if let Some(value) = value {
            if value.chars().count() > max {
                self.violations.push(Violation::new(
                    field,
                    format!("This value is too long. It should have {max} characters or less."),
                ));
            }
        }
        self
    }

    pub fn finish(self) -> Vec<Violation> {
        self.violations
    }
}
