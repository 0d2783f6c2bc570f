//! Storage accessor trait
//!
//! Route handlers only see this trait. Each method is one independently
//! committed row-level operation; nothing spans requests.

use super::errors::StorageResult;
use super::record::{NewStore, Store, StorePatch};

/// Row-level access to the `stores` table
pub trait StoreRepository: Send + Sync {
    /// All rows, newest id first
    fn list(&self) -> StorageResult<Vec<Store>>;

    /// A single row by id
    fn get(&self, id: i64) -> StorageResult<Option<Store>>;

    /// Insert a row; the backend assigns `id` and both timestamps
    fn insert(&self, store: NewStore) -> StorageResult<Store>;

    /// Merge `patch` into an existing row and refresh `updated_at`.
    ///
    /// Returns `None` if no row has this id.
    fn update(&self, id: i64, patch: StorePatch) -> StorageResult<Option<Store>>;

    /// Hard-delete a row; returns whether one was removed
    fn delete(&self, id: i64) -> StorageResult<bool>;

    /// Number of rows
    fn count(&self) -> StorageResult<u64>;
}
