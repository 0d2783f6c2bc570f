//! Storage accessor for store records
//!
//! Owns the single `stores` table. Identity assignment and timestamp
//! bookkeeping happen here; no other layer mutates rows.

mod errors;
mod migration;
mod record;
mod repository;
mod sqlite;

pub use errors::{StorageError, StorageResult};
pub use migration::{current_version, migrate, CURRENT_VERSION};
pub use record::{NewStore, Store, StorePatch};
pub use repository::StoreRepository;
pub use sqlite::SqliteStoreRepository;
