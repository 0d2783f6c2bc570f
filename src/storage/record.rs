//! Store row types
//!
//! `Store` is the persisted shape. `NewStore` and `StorePatch` are the
//! validated inputs the schema layer hands to the repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted store row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Store {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated input for creating a store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewStore {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub email: Option<String>,
}

impl NewStore {
    pub fn new(name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            phone: None,
            email: None,
        }
    }
}

/// Validated partial update.
///
/// Outer `None` means the field was not supplied and keeps its value.
/// For the nullable columns, `Some(None)` clears the column.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StorePatch {
    pub name: Option<String>,
    pub address: Option<String>,
    pub phone: Option<Option<String>>,
    pub email: Option<Option<String>>,
}

impl StorePatch {
    /// Merge this patch over an existing row, leaving identity and timestamps alone
    pub fn apply_to(&self, store: &mut Store) {
        if let Some(name) = &self.name {
            store.name = name.clone();
        }
        if let Some(address) = &self.address {
            store.address = address.clone();
        }
        if let Some(phone) = &self.phone {
            store.phone = phone.clone();
        }
        if let Some(email) = &self.email {
            store.email = email.clone();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Store {
        let now = Utc::now();
        Store {
            id: 1,
            name: "Acme".to_string(),
            address: "1 Main St".to_string(),
            phone: Some("555-0000".to_string()),
            email: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_patch_keeps_absent_fields() {
        let mut store = sample();
        let patch = StorePatch {
            address: Some("2 Side St".to_string()),
            ..Default::default()
        };
        patch.apply_to(&mut store);

        assert_eq!(store.name, "Acme");
        assert_eq!(store.address, "2 Side St");
        assert_eq!(store.phone.as_deref(), Some("555-0000"));
    }

    #[test]
    fn test_patch_clears_nullable_field() {
        let mut store = sample();
        let patch = StorePatch {
            phone: Some(None),
            email: Some(Some("hi@acme.test".to_string())),
            ..Default::default()
        };
        patch.apply_to(&mut store);

        assert_eq!(store.phone, None);
        assert_eq!(store.email.as_deref(), Some("hi@acme.test"));
    }

    #[test]
    fn test_empty_patch_leaves_row_unchanged() {
        let mut store = sample();
        let before = store.clone();
        StorePatch::default().apply_to(&mut store);
        assert_eq!(store, before);
    }

    #[test]
    fn test_store_serializes_timestamps_as_strings() {
        let store = sample();
        let json = serde_json::to_value(&store).unwrap();
        assert!(json["created_at"].is_string());
        assert!(json["email"].is_null());
        assert_eq!(json["id"], 1);
    }
}
