use crate::backend::RecordStore;
use crate::error::Result;
use registrar_core::{Record, RecordRow};
use registrar_sheets::{Row, SheetService};

pub const DEFAULT_SHEET_NAME: &str = "Registration users";

// Columns: A name, B phone, C region, D enrollment type, E program, F created_at.
const PHONE_COLUMN: &str = "B:B";
const RECORD_COLUMNS: &str = "A:F";
const APPEND_ANCHOR: &str = "A1";

/// Records kept one per row in a single spreadsheet tab.
pub struct SheetStore<S> {
    sheet: S,
    sheet_name: String,
}

impl<S: SheetService> SheetStore<S> {
    pub fn new(sheet: S, sheet_name: impl Into<String>) -> Self {
        Self {
            sheet,
            sheet_name: sheet_name.into(),
        }
    }

    pub fn sheet(&self) -> &S {
        &self.sheet
    }

    fn range(&self, cells: &str) -> String {
        format!("{}!{}", self.sheet_name, cells)
    }
}

impl<S: SheetService> RecordStore for SheetStore<S> {
    fn backend_name(&self) -> &'static str {
        self.sheet.service_name()
    }

    fn contains_phone(&self, phone: &str) -> Result<bool> {
        let cells = self.sheet.get(&self.range(PHONE_COLUMN))?;
        Ok(cells
            .iter()
            .any(|row| row.first().map(String::as_str) == Some(phone)))
    }

    fn insert(&self, record: &Record) -> Result<()> {
        self.sheet
            .append(&self.range(APPEND_ANCHOR), record_cells(record))?;
        Ok(())
    }

    fn list(&self) -> Result<Vec<RecordRow>> {
        let rows = self.sheet.get(&self.range(RECORD_COLUMNS))?;
        Ok(rows.iter().map(row_to_record).collect())
    }
}

fn record_cells(record: &Record) -> Row {
    let row = RecordRow::from(record);
    vec![
        row.name,
        row.phone,
        row.region,
        row.enrollment_type,
        row.program,
        row.created_at,
    ]
}

fn row_to_record(row: &Row) -> RecordRow {
    let cell = |index: usize| row.get(index).cloned().unwrap_or_default();
    RecordRow {
        name: cell(0),
        phone: cell(1),
        region: cell(2),
        enrollment_type: cell(3),
        program: cell(4),
        created_at: cell(5),
    }
}
