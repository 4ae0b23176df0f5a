use crate::error::Result;
use crate::migrate;
use crate::paths::ensure_parent_dir;
use rusqlite::Connection;
use std::fs;
use std::path::Path;
use std::time::Duration;

const BUSY_TIMEOUT: Duration = Duration::from_secs(2);

/// Opens the records database ready for use: parent directory created,
/// file readable by the owner only, schema migrated to the latest version.
pub fn open(path: &Path) -> Result<Connection> {
    ensure_parent_dir(path)?;
    let conn = Connection::open(path)?;
    restrict_to_owner(path)?;

    conn.busy_timeout(BUSY_TIMEOUT)?;
    // Request threads read the listing while a submission is being written.
    conn.pragma_update(None, "journal_mode", "WAL")?;
    conn.pragma_update(None, "synchronous", "NORMAL")?;

    migrate::run_migrations(&conn)?;
    Ok(conn)
}

pub fn open_in_memory() -> Result<Connection> {
    let conn = Connection::open_in_memory()?;
    migrate::run_migrations(&conn)?;
    Ok(conn)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    let mode = fs::metadata(path)?.permissions().mode() & 0o777;
    if mode != 0o600 {
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }
    Ok(())
}

#[cfg(not(unix))]
fn restrict_to_owner(path: &Path) -> Result<()> {
    fs::metadata(path)?;
    Ok(())
}
