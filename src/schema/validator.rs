//! Store payload validation
//!
//! Validation semantics:
//! - Runs against the normalized, envelope-unwrapped record
//! - `name` and `address` are required on create, non-empty when supplied
//!   on update
//! - `phone` and `email` are optional and nullable
//! - Every violation is collected; validation never stops at the first one
//! - Unknown fields (including `id` and the timestamps) are ignored
//!
//! A successful validation yields the typed input for the storage layer.

use serde_json::Value;

use super::errors::{FieldViolation, ValidationResult};
use crate::rest_api::Record;
use crate::storage::{NewStore, StorePatch};

/// A field as it appears in a payload
#[derive(Debug, Clone, PartialEq, Eq)]
enum FieldValue {
    Absent,
    Null,
    Text(String),
    /// Object or array
    Compound,
}

impl FieldValue {
    fn read(record: &Record, field: &str) -> Self {
        match record.get(field) {
            None => FieldValue::Absent,
            Some(Value::Null) => FieldValue::Null,
            Some(Value::String(s)) => FieldValue::Text(s.clone()),
            Some(Value::Number(n)) => FieldValue::Text(n.to_string()),
            Some(Value::Bool(b)) => FieldValue::Text(b.to_string()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => FieldValue::Compound,
        }
    }
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Validates a create payload.
///
/// # Errors
///
/// Returns every violation if `name` or `address` is missing, null or
/// empty, or if any known field holds a compound value.
pub fn validate_create(record: &Record) -> ValidationResult<NewStore> {
    let mut violations = Vec::new();

    let name = required_field(record, "name", &mut violations);
    let address = required_field(record, "address", &mut violations);
    let phone = optional_field(record, "phone", &mut violations);
    let email = optional_field(record, "email", &mut violations);

    match (name, address) {
        (Some(name), Some(address)) if violations.is_empty() => Ok(NewStore {
            name,
            address,
            phone: phone.flatten(),
            email: email.flatten(),
        }),
        _ => Err(violations),
    }
}

/// Validates an update payload.
///
/// Callers must confirm the target row exists first, so a missing row is
/// reported before any field violation.
///
/// # Errors
///
/// Returns every violation if a supplied `name` or `address` is null or
/// empty, or if any known field holds a compound value.
pub fn validate_update(record: &Record) -> ValidationResult<StorePatch> {
    let mut violations = Vec::new();

    let name = supplied_required(record, "name", &mut violations);
    let address = supplied_required(record, "address", &mut violations);
    let phone = optional_field(record, "phone", &mut violations);
    let email = optional_field(record, "email", &mut violations);

    if !violations.is_empty() {
        return Err(violations);
    }

    Ok(StorePatch {
        name,
        address,
        phone,
        email,
    })
}

/// A required column on create
fn required_field(
    record: &Record,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match FieldValue::read(record, field) {
        FieldValue::Text(s) if !is_blank(&s) => Some(s),
        FieldValue::Compound => {
            violations.push(FieldViolation::not_text(field));
            None
        }
        FieldValue::Absent | FieldValue::Null | FieldValue::Text(_) => {
            violations.push(FieldViolation::required(field));
            None
        }
    }
}

/// A required column on update: may be absent, must not be blank
fn supplied_required(
    record: &Record,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    match FieldValue::read(record, field) {
        FieldValue::Absent => None,
        FieldValue::Text(s) if !is_blank(&s) => Some(s),
        FieldValue::Compound => {
            violations.push(FieldViolation::not_text(field));
            None
        }
        FieldValue::Null | FieldValue::Text(_) => {
            violations.push(FieldViolation::empty(field));
            None
        }
    }
}

/// A nullable column: absent -> `None`, null -> `Some(None)`
fn optional_field(
    record: &Record,
    field: &str,
    violations: &mut Vec<FieldViolation>,
) -> Option<Option<String>> {
    match FieldValue::read(record, field) {
        FieldValue::Absent => None,
        FieldValue::Null => Some(None),
        FieldValue::Text(s) => Some(Some(s)),
        FieldValue::Compound => {
            violations.push(FieldViolation::not_text(field));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => map,
            _ => panic!("test record must be an object"),
        }
    }

    fn fields(violations: &[FieldViolation]) -> Vec<&str> {
        violations.iter().map(|v| v.field.as_str()).collect()
    }

    #[test]
    fn test_create_minimal() {
        let store = validate_create(&record(json!({"name": "Acme", "address": "1 Main St"}))).unwrap();
        assert_eq!(store, NewStore::new("Acme", "1 Main St"));
    }

    #[test]
    fn test_create_with_optionals() {
        let store = validate_create(&record(json!({
            "name": "Acme",
            "address": "1 Main St",
            "phone": 5551234,
            "email": null,
            "id": 99
        })))
        .unwrap();
        assert_eq!(store.phone.as_deref(), Some("5551234"));
        assert_eq!(store.email, None);
    }

    #[test]
    fn test_create_missing_name() {
        let violations = validate_create(&record(json!({"address": "1 Main St"}))).unwrap_err();
        assert_eq!(fields(&violations), vec!["name"]);
        assert_eq!(violations[0].message, "name is required");
    }

    #[test]
    fn test_create_reports_every_violation() {
        let violations =
            validate_create(&record(json!({"name": "  ", "phone": {"x": 1}}))).unwrap_err();
        assert_eq!(fields(&violations), vec!["name", "address", "phone"]);
    }

    #[test]
    fn test_create_null_required_field() {
        let violations =
            validate_create(&record(json!({"name": null, "address": "1 Main St"}))).unwrap_err();
        assert_eq!(fields(&violations), vec!["name"]);
    }

    #[test]
    fn test_update_partial() {
        let patch = validate_update(&record(json!({"phone": "555-1234"}))).unwrap();
        assert_eq!(patch.name, None);
        assert_eq!(patch.address, None);
        assert_eq!(patch.phone, Some(Some("555-1234".to_string())));
        assert_eq!(patch.email, None);
    }

    #[test]
    fn test_update_empty_payload() {
        assert_eq!(validate_update(&Record::new()).unwrap(), StorePatch::default());
    }

    #[test]
    fn test_update_rejects_blank_required_fields() {
        let violations =
            validate_update(&record(json!({"name": "", "address": null}))).unwrap_err();
        assert_eq!(fields(&violations), vec!["name", "address"]);
        assert_eq!(violations[0].message, "name must not be empty");
    }

    #[test]
    fn test_update_null_clears_optional() {
        let patch = validate_update(&record(json!({"email": null}))).unwrap();
        assert_eq!(patch.email, Some(None));
    }
}
