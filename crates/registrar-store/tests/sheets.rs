use chrono::{TimeZone, Utc};
use registrar_core::{Record, Submission};
use registrar_sheets::{FileSheet, MemorySheet, SheetService};
use registrar_store::{RecordStore, SheetStore, StoreErrorKind, DEFAULT_SHEET_NAME};
use std::sync::Arc;
use tempfile::TempDir;

fn record(phone: &str) -> Record {
    Record::new(
        Submission {
            name: "Madina".to_string(),
            phone: phone.to_string(),
            region: Some("Buxoro".to_string()),
            enrollment_type: Some("Magistratura".to_string()),
            program: Some("Economics".to_string()),
        },
        Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).unwrap(),
    )
}

#[test]
fn insert_appends_six_columns() {
    let sheet = Arc::new(MemorySheet::new());
    let store = SheetStore::new(sheet.clone(), DEFAULT_SHEET_NAME);
    store.insert(&record("+998901234567")).expect("insert");

    let rows = sheet.rows().expect("rows");
    assert_eq!(
        rows,
        vec![vec![
            "Madina".to_string(),
            "+998901234567".to_string(),
            "Buxoro".to_string(),
            "Magistratura".to_string(),
            "Economics".to_string(),
            "2025-06-01T09:00:00.000Z".to_string(),
        ]]
    );
}

#[test]
fn column_scan_finds_existing_phone() {
    let sheet = MemorySheet::with_rows(vec![vec![
        "Ali".to_string(),
        "+998901234567".to_string(),
    ]]);
    let store = SheetStore::new(sheet, DEFAULT_SHEET_NAME);
    assert!(store.contains_phone("+998901234567").expect("lookup"));
    assert!(!store.contains_phone("+998911234567").expect("lookup"));
}

#[test]
fn list_maps_rows_to_records() {
    let sheet = Arc::new(MemorySheet::new());
    let store = SheetStore::new(sheet.clone(), DEFAULT_SHEET_NAME);
    store.insert(&record("+998901234567")).expect("insert");
    sheet
        .append("Registration users!A1", vec!["Partial".to_string()])
        .expect("append partial");

    let rows = store.list().expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].program, "Economics");
    assert_eq!(rows[1].name, "Partial");
    assert_eq!(rows[1].phone, "");
}

#[test]
fn unavailable_sheet_surfaces_sheet_error() {
    let sheet = MemorySheet::new();
    sheet.set_unavailable(true);
    let store = SheetStore::new(sheet, DEFAULT_SHEET_NAME);
    let err = store.list().unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Sheet);
    assert_eq!(err.reason(), "sheet unavailable: memory sheet is offline");
}

#[test]
fn file_sheet_backs_a_store() {
    let temp = TempDir::new().expect("temp dir");
    let path = temp.path().join("registrations.json");
    let store = SheetStore::new(FileSheet::new(&path), DEFAULT_SHEET_NAME);
    store.insert(&record("+998901234567")).expect("insert");

    let reopened = SheetStore::new(FileSheet::new(&path), DEFAULT_SHEET_NAME);
    assert!(reopened.contains_phone("+998901234567").expect("lookup"));
    assert_eq!(reopened.list().expect("list").len(), 1);
}
