//! # Store REST API Module
//!
//! Format bridge between the HTTP wire (JSON or XML) and the canonical
//! records the validator and storage layers work with.

pub mod errors;
pub mod format;
pub mod record;
pub mod response;
pub mod xml;

pub use errors::{ApiError, ApiResult};
pub use format::{BodyFormat, WireFormat};
pub use record::{scalar_text, unwrap_store_envelope, InboundPayload, Record};
pub use response::{MessageResponse, Responder, XmlRootPolicy};
pub use xml::XmlError;
