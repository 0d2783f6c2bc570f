//! SQLite implementation of the store repository.
//!
//! One connection behind a mutex. Callers on the async runtime go through
//! `tokio::task::spawn_blocking`, never call these methods directly.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};

use super::errors::{StorageError, StorageResult};
use super::migration;
use super::record::{NewStore, Store, StorePatch};
use super::repository::StoreRepository;

const SELECT_COLUMNS: &str = "SELECT id, name, address, phone, email, created_at, updated_at FROM stores";

/// SQLite-backed store repository
pub struct SqliteStoreRepository {
    conn: Mutex<Connection>,
}

impl SqliteStoreRepository {
    /// Open (or create) a database file and bring its schema up to date.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        tracing::debug!(path = %path.display(), "opened store database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Open an in-memory database. Used by tests.
    pub fn open_in_memory() -> StorageResult<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> StorageResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StorageError::LockPoisoned(e.to_string()))
    }
}

fn row_to_store(row: &rusqlite::Row<'_>) -> rusqlite::Result<Store> {
    Ok(Store {
        id: row.get(0)?,
        name: row.get(1)?,
        address: row.get(2)?,
        phone: row.get(3)?,
        email: row.get(4)?,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

fn select_by_id(conn: &Connection, id: i64) -> rusqlite::Result<Option<Store>> {
    conn.query_row(
        &format!("{} WHERE id = ?1", SELECT_COLUMNS),
        [id],
        row_to_store,
    )
    .optional()
}

/// Next `updated_at` for a row last touched at `previous`.
///
/// The wall clock may not have advanced since the previous write, so the
/// result is bumped past `previous` when needed.
fn next_timestamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > previous {
        now
    } else {
        previous + Duration::microseconds(1)
    }
}

impl StoreRepository for SqliteStoreRepository {
    fn list(&self) -> StorageResult<Vec<Store>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("{} ORDER BY id DESC", SELECT_COLUMNS))?;
        let stores = stmt
            .query_map([], row_to_store)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(stores)
    }

    fn get(&self, id: i64) -> StorageResult<Option<Store>> {
        let conn = self.lock()?;
        Ok(select_by_id(&conn, id)?)
    }

    fn insert(&self, store: NewStore) -> StorageResult<Store> {
        let conn = self.lock()?;
        let now = Utc::now();

        conn.execute(
            "INSERT INTO stores (name, address, phone, email, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?5)",
            params![store.name, store.address, store.phone, store.email, now],
        )?;
        let id = conn.last_insert_rowid();

        Ok(Store {
            id,
            name: store.name,
            address: store.address,
            phone: store.phone,
            email: store.email,
            created_at: now,
            updated_at: now,
        })
    }

    fn update(&self, id: i64, patch: StorePatch) -> StorageResult<Option<Store>> {
        let conn = self.lock()?;

        let Some(mut store) = select_by_id(&conn, id)? else {
            return Ok(None);
        };

        patch.apply_to(&mut store);
        store.updated_at = next_timestamp(store.updated_at);

        conn.execute(
            "UPDATE stores SET name = ?1, address = ?2, phone = ?3, email = ?4, updated_at = ?5
             WHERE id = ?6",
            params![
                store.name,
                store.address,
                store.phone,
                store.email,
                store.updated_at,
                id
            ],
        )?;

        Ok(Some(store))
    }

    fn delete(&self, id: i64) -> StorageResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM stores WHERE id = ?1", [id])?;
        Ok(removed > 0)
    }

    fn count(&self) -> StorageResult<u64> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM stores", [], |row| row.get(0))?;
        Ok(count.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> SqliteStoreRepository {
        SqliteStoreRepository::open_in_memory().unwrap()
    }

    #[test]
    fn test_insert_assigns_id_and_equal_timestamps() {
        let repo = repo();
        let store = repo.insert(NewStore::new("Acme", "1 Main St")).unwrap();

        assert!(store.id > 0);
        assert_eq!(store.created_at, store.updated_at);
        assert_eq!(store.phone, None);
        assert_eq!(store.email, None);
    }

    #[test]
    fn test_get_round_trips_row() {
        let repo = repo();
        let mut new = NewStore::new("Acme", "1 Main St");
        new.phone = Some("555-1234".to_string());
        let created = repo.insert(new).unwrap();

        let fetched = repo.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, created);
    }

    #[test]
    fn test_get_missing_returns_none() {
        assert!(repo().get(42).unwrap().is_none());
    }

    #[test]
    fn test_list_orders_by_id_descending() {
        let repo = repo();
        let a = repo.insert(NewStore::new("A", "1 A St")).unwrap();
        let b = repo.insert(NewStore::new("B", "2 B St")).unwrap();
        let c = repo.insert(NewStore::new("C", "3 C St")).unwrap();

        let ids: Vec<i64> = repo.list().unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[test]
    fn test_update_merges_and_bumps_updated_at() {
        let repo = repo();
        let created = repo.insert(NewStore::new("Acme", "1 Main St")).unwrap();

        let patch = StorePatch {
            phone: Some(Some("555-1234".to_string())),
            ..Default::default()
        };
        let updated = repo.update(created.id, patch).unwrap().unwrap();

        assert_eq!(updated.name, "Acme");
        assert_eq!(updated.address, "1 Main St");
        assert_eq!(updated.phone.as_deref(), Some("555-1234"));
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);

        let fetched = repo.get(created.id).unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn test_repeated_updates_strictly_increase() {
        let repo = repo();
        let created = repo.insert(NewStore::new("Acme", "1 Main St")).unwrap();

        let mut last = created.updated_at;
        for _ in 0..20 {
            let updated = repo
                .update(created.id, StorePatch::default())
                .unwrap()
                .unwrap();
            assert!(updated.updated_at > last);
            last = updated.updated_at;
        }
    }

    #[test]
    fn test_update_missing_returns_none() {
        assert!(repo().update(7, StorePatch::default()).unwrap().is_none());
    }

    #[test]
    fn test_delete() {
        let repo = repo();
        let created = repo.insert(NewStore::new("Acme", "1 Main St")).unwrap();

        assert!(repo.delete(created.id).unwrap());
        assert!(!repo.delete(created.id).unwrap());
        assert!(repo.get(created.id).unwrap().is_none());
        assert_eq!(repo.count().unwrap(), 0);
    }

    #[test]
    fn test_next_timestamp_never_goes_backwards() {
        let future = Utc::now() + Duration::seconds(60);
        assert!(next_timestamp(future) > future);
    }
}
