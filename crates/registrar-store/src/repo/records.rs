use crate::error::{Result, StoreError};
use registrar_core::time::from_unix_millis;
use registrar_core::{Record, RecordRow};
use rusqlite::{params, Connection, OptionalExtension, Row};

const RECORD_COLUMNS: &str = "name, phone, region, enrollment_type, program, created_at";

pub struct RecordsRepo<'a> {
    conn: &'a Connection,
}

impl<'a> RecordsRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn insert(&self, record: &Record) -> Result<()> {
        let result = self.conn.execute(
            "INSERT INTO records (name, phone, region, enrollment_type, program, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6);",
            params![
                record.name,
                record.phone,
                record.region,
                record.enrollment_type,
                record.program,
                record.created_at.timestamp_millis(),
            ],
        );
        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::DuplicatePhone(record.phone.clone()))
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn exists_by_phone(&self, phone: &str) -> Result<bool> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM records WHERE phone = ?1 LIMIT 1;",
                [phone],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn find_by_phone(&self, phone: &str) -> Result<Option<Record>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {RECORD_COLUMNS} FROM records WHERE phone = ?1;"
        ))?;
        let mut rows = stmt.query([phone])?;
        if let Some(row) = rows.next()? {
            Ok(Some(record_from_row(row)?))
        } else {
            Ok(None)
        }
    }

    pub fn list(&self) -> Result<Vec<Record>> {
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {RECORD_COLUMNS} FROM records ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(record_from_row(row)?);
        }
        Ok(records)
    }

    pub fn list_rows(&self) -> Result<Vec<RecordRow>> {
        Ok(self.list()?.iter().map(RecordRow::from).collect())
    }

    pub fn count(&self) -> Result<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM records;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn record_from_row(row: &Row<'_>) -> Result<Record> {
    let phone: String = row.get(1)?;
    let millis: i64 = row.get(5)?;
    let created_at = from_unix_millis(millis).ok_or_else(|| {
        StoreError::InvalidData(format!("created_at {millis} for phone {phone}"))
    })?;
    Ok(Record {
        name: row.get(0)?,
        phone,
        region: row.get(2)?,
        enrollment_type: row.get(3)?,
        program: row.get(4)?,
        created_at,
    })
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(failure, _)
            if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
    )
}
