//! Field validation for store payloads
//!
//! # Design Principles
//!
//! - Validation runs on the canonical record, never on the raw wire body
//! - Every violated rule is reported, not only the first
//! - Validators do not mutate the record; they produce typed storage input

mod errors;
mod validator;

pub use errors::{FieldViolation, ValidationResult};
pub use validator::{validate_create, validate_update};
