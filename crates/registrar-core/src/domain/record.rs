use crate::time::format_timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub phone: String,
    pub region: Option<String>,
    pub enrollment_type: Option<String>,
    pub program: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub name: String,
    pub phone: String,
    pub region: Option<String>,
    pub enrollment_type: Option<String>,
    pub program: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Record {
    pub fn new(submission: Submission, created_at: DateTime<Utc>) -> Self {
        let Submission {
            name,
            phone,
            region,
            enrollment_type,
            program,
        } = submission;
        Self {
            name,
            phone,
            region,
            enrollment_type,
            program,
            created_at,
        }
    }
}

/// Listing shape: every field present, missing values read back as "".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordRow {
    pub name: String,
    pub phone: String,
    pub region: String,
    pub enrollment_type: String,
    pub program: String,
    pub created_at: String,
}

impl From<&Record> for RecordRow {
    fn from(record: &Record) -> Self {
        Self {
            name: record.name.clone(),
            phone: record.phone.clone(),
            region: record.region.clone().unwrap_or_default(),
            enrollment_type: record.enrollment_type.clone().unwrap_or_default(),
            program: record.program.clone().unwrap_or_default(),
            created_at: format_timestamp(&record.created_at),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Record, RecordRow, Submission};
    use chrono::{TimeZone, Utc};

    #[test]
    fn record_row_fills_missing_fields_with_empty_strings() {
        let created_at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let record = Record::new(
            Submission {
                name: "Aziza".to_string(),
                phone: "998901234567".to_string(),
                region: None,
                enrollment_type: None,
                program: None,
            },
            created_at,
        );
        let row = RecordRow::from(&record);
        assert_eq!(row.name, "Aziza");
        assert_eq!(row.region, "");
        assert_eq!(row.program, "");
        assert_eq!(row.created_at, "2025-01-02T03:04:05.000Z");
    }

    #[test]
    fn record_row_serializes_timestamp_as_text() {
        let created_at = Utc.with_ymd_and_hms(2025, 6, 1, 8, 30, 0).unwrap();
        let record = Record::new(
            Submission {
                name: "Bekzod".to_string(),
                phone: "998935550000".to_string(),
                region: Some("Samarqand".to_string()),
                enrollment_type: None,
                program: None,
            },
            created_at,
        );
        let value = serde_json::to_value(RecordRow::from(&record)).expect("serialize");
        assert_eq!(value["created_at"], "2025-06-01T08:30:00.000Z");
        assert_eq!(value["region"], "Samarqand");
        assert_eq!(value["enrollment_type"], "");
    }
}
