//! Field-level validation failures
//!
//! A rejected payload reports every violated rule, one entry each.

use std::fmt;

use serde::Serialize;

/// A single violated field rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Field name (e.g., "name")
    pub field: String,
    /// Human-readable description of the rule
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Required field missing or empty on create
    pub fn required(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} is required", field);
        Self { field, message }
    }

    /// Supplied field is empty
    pub fn empty(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} must not be empty", field);
        Self { field, message }
    }

    /// Supplied field is an object or array
    pub fn not_text(field: impl Into<String>) -> Self {
        let field = field.into();
        let message = format!("{} must be a string", field);
        Self { field, message }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "field '{}': {}", self.field, self.message)
    }
}

/// Result type for validation
pub type ValidationResult<T> = Result<T, Vec<FieldViolation>>;
