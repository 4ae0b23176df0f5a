use crate::error::{Result, SheetError};
use crate::range::ColumnSpan;
use crate::service::{Row, SheetService};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Sheet rows kept as a JSON array of string arrays on local disk.
#[derive(Debug)]
pub struct FileSheet {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileSheet {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_rows(&self) -> Result<Vec<Row>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_str(&contents)?)
    }

    fn write_rows(&self, rows: &[Row]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec_pretty(rows)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl SheetService for FileSheet {
    fn service_name(&self) -> &'static str {
        "file"
    }

    fn get(&self, range: &str) -> Result<Vec<Row>> {
        let span = ColumnSpan::parse(range)?;
        Ok(self
            .read_rows()?
            .iter()
            .map(|row| span.slice(row))
            .collect())
    }

    fn append(&self, range: &str, row: Row) -> Result<()> {
        ColumnSpan::parse(range)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SheetError::Unavailable("file sheet lock poisoned".to_string()))?;
        let mut rows = self.read_rows()?;
        rows.push(row);
        self.write_rows(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::FileSheet;
    use crate::service::SheetService;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn missing_file_reads_as_empty() {
        let temp = TempDir::new().expect("tempdir");
        let sheet = FileSheet::new(temp.path().join("rows.json"));
        assert!(sheet.get("Users!A:F").expect("get").is_empty());
    }

    #[test]
    fn append_persists_between_instances() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("nested").join("rows.json");
        FileSheet::new(&path)
            .append("Users!A1", vec!["Ali".to_string(), "+998901234567".to_string()])
            .expect("append");

        let reopened = FileSheet::new(&path);
        let phones = reopened.get("Users!B:B").expect("get");
        assert_eq!(phones, vec![vec!["+998901234567".to_string()]]);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let temp = TempDir::new().expect("tempdir");
        let path = temp.path().join("rows.json");
        fs::write(&path, "{not json").expect("write");
        assert!(FileSheet::new(&path).get("Users!A:F").is_err());
    }
}
