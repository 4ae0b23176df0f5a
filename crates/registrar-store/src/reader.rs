use crate::backend::StoreTarget;
use crate::error::Result;
use registrar_core::RecordRow;
use tracing::debug;

/// All records in the target's native order. An empty store is `Ok(vec![])`.
pub fn read_records(target: &StoreTarget) -> Result<Vec<RecordRow>> {
    let records = target.store.list()?;
    debug!(store = %target.name, count = records.len(), "records read");
    Ok(records)
}
