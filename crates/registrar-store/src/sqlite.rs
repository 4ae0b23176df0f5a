use crate::backend::RecordStore;
use crate::error::{Result, StoreError};
use crate::repo::RecordsRepo;
use crate::{db, migrate};
use registrar_core::{Record, RecordRow};
use rusqlite::Connection;
use std::path::Path;
use std::sync::Mutex;

/// Document store on SQLite; `phone` carries a UNIQUE constraint. Both
/// constructors return a migrated database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = db::open(path)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = db::open_in_memory()?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    pub fn schema_version(&self) -> Result<i64> {
        self.with_connection(migrate::schema_version)
    }

    pub fn records<T>(&self, f: impl FnOnce(RecordsRepo<'_>) -> Result<T>) -> Result<T> {
        self.with_connection(|conn| f(RecordsRepo::new(conn)))
    }

    pub fn with_connection<T>(&self, f: impl FnOnce(&Connection) -> Result<T>) -> Result<T> {
        let conn = self
            .conn
            .lock()
            .map_err(|_| StoreError::Unavailable("sqlite connection lock poisoned".to_string()))?;
        f(&*conn)
    }
}

impl RecordStore for SqliteStore {
    fn backend_name(&self) -> &'static str {
        "sqlite"
    }

    fn contains_phone(&self, phone: &str) -> Result<bool> {
        self.records(|repo| repo.exists_by_phone(phone))
    }

    fn insert(&self, record: &Record) -> Result<()> {
        self.records(|repo| repo.insert(record))
    }

    fn list(&self) -> Result<Vec<RecordRow>> {
        self.records(|repo| repo.list_rows())
    }
}
