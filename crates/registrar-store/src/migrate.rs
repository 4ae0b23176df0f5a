use crate::error::{Result, StoreError};
use rusqlite::Connection;

// Applied in order; the schema version is the number of steps applied and
// lives in SQLite's `user_version` header field.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/001_init.sql")];

const RECORD_COLUMNS: [&str; 7] = [
    "id",
    "name",
    "phone",
    "region",
    "enrollment_type",
    "program",
    "created_at",
];

pub fn latest_version() -> i64 {
    MIGRATIONS.len() as i64
}

pub fn run_migrations(conn: &Connection) -> Result<()> {
    let current = schema_version(conn)?;
    let latest = latest_version();
    if !(0..=latest).contains(&current) {
        return Err(StoreError::Migration(format!(
            "database schema version {current} is not supported (latest is {latest})"
        )));
    }

    for (version, sql) in (1..=latest).zip(MIGRATIONS).skip(current as usize) {
        let tx = conn.unchecked_transaction()?;
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", version)?;
        tx.commit()?;
    }

    check_records_table(conn)
}

pub fn schema_version(conn: &Connection) -> Result<i64> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    Ok(version)
}

fn check_records_table(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info('records') ORDER BY cid;")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    if columns != RECORD_COLUMNS {
        return Err(StoreError::Migration(format!(
            "records table has unexpected columns: [{}]",
            columns.join(", ")
        )));
    }

    // Duplicate rejection under concurrent submissions depends on this index.
    let unique_indexes: i64 = conn.query_row(
        "SELECT COUNT(*) FROM pragma_index_list('records') AS il, pragma_index_info(il.name) AS ii \
         WHERE il.\"unique\" = 1 AND ii.name = 'phone';",
        [],
        |row| row.get(0),
    )?;
    if unique_indexes == 0 {
        return Err(StoreError::Migration(
            "records.phone is missing its unique index".to_string(),
        ));
    }
    Ok(())
}
