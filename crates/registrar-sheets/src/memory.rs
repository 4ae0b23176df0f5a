use crate::error::{Result, SheetError};
use crate::range::ColumnSpan;
use crate::service::{Row, SheetService};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Default)]
pub struct MemorySheet {
    rows: Mutex<Vec<Row>>,
    unavailable: AtomicBool,
}

impl MemorySheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows: Mutex::new(rows),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Makes every subsequent call fail until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    pub fn rows(&self) -> Result<Vec<Row>> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Row>>> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(SheetError::Unavailable("memory sheet is offline".to_string()));
        }
        self.rows
            .lock()
            .map_err(|_| SheetError::Unavailable("memory sheet lock poisoned".to_string()))
    }
}

impl SheetService for MemorySheet {
    fn service_name(&self) -> &'static str {
        "memory"
    }

    fn get(&self, range: &str) -> Result<Vec<Row>> {
        let span = ColumnSpan::parse(range)?;
        Ok(self.lock()?.iter().map(|row| span.slice(row)).collect())
    }

    fn append(&self, range: &str, row: Row) -> Result<()> {
        ColumnSpan::parse(range)?;
        self.lock()?.push(row);
        Ok(())
    }
}
