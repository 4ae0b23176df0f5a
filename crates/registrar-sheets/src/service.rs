use crate::Result;

pub type Row = Vec<String>;

/// Spreadsheet values API: ranges use A1 notation, e.g. `Sheet1!B:B`.
pub trait SheetService: Send + Sync {
    fn service_name(&self) -> &'static str;
    fn get(&self, range: &str) -> Result<Vec<Row>>;
    fn append(&self, range: &str, row: Row) -> Result<()>;
}

impl<T: SheetService + ?Sized> SheetService for std::sync::Arc<T> {
    fn service_name(&self) -> &'static str {
        (**self).service_name()
    }

    fn get(&self, range: &str) -> Result<Vec<Row>> {
        (**self).get(range)
    }

    fn append(&self, range: &str, row: Row) -> Result<()> {
        (**self).append(range, row)
    }
}
