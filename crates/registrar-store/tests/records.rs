use chrono::{TimeZone, Utc};
use registrar_core::{Record, Submission};
use registrar_store::{RecordStore, SqliteStore, StoreErrorKind};

fn record(name: &str, phone: &str, seconds: i64) -> Record {
    Record::new(
        Submission {
            name: name.to_string(),
            phone: phone.to_string(),
            region: Some("Toshkent".to_string()),
            enrollment_type: None,
            program: None,
        },
        Utc.timestamp_opt(1_700_000_000 + seconds, 0).unwrap(),
    )
}

fn migrated_store() -> SqliteStore {
    SqliteStore::open_in_memory().expect("open in memory")
}

#[test]
fn insert_then_list_keeps_insertion_order() {
    let store = migrated_store();
    store
        .insert(&record("Ali", "998901234567", 0))
        .expect("insert first");
    store
        .insert(&record("Vali", "998911234567", 10))
        .expect("insert second");

    let rows = store.list().expect("list");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Ali");
    assert_eq!(rows[1].phone, "998911234567");
    assert_eq!(rows[0].region, "Toshkent");
    assert_eq!(rows[0].program, "");
    assert_eq!(rows[0].created_at, "2023-11-14T22:13:20.000Z");
}

#[test]
fn contains_phone_uses_exact_match() {
    let store = migrated_store();
    store
        .insert(&record("Ali", "998901234567", 0))
        .expect("insert");

    assert!(store.contains_phone("998901234567").expect("lookup"));
    assert!(!store.contains_phone("901234567").expect("lookup"));
}

#[test]
fn unique_phone_is_enforced_by_the_database() {
    let store = migrated_store();
    store
        .insert(&record("Ali", "998901234567", 0))
        .expect("insert");

    let err = store
        .insert(&record("Ali again", "998901234567", 5))
        .unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::DuplicatePhone);
    assert_eq!(store.records(|repo| repo.count()).expect("count"), 1);
}

#[test]
fn find_by_phone_round_trips_optional_fields() {
    let store = migrated_store();
    let original = record("Ali", "998901234567", 0);
    store.insert(&original).expect("insert");

    let found = store
        .records(|repo| repo.find_by_phone("998901234567"))
        .expect("find")
        .expect("record exists");
    assert_eq!(found, original);

    let missing = store
        .records(|repo| repo.find_by_phone("998000000000"))
        .expect("find");
    assert!(missing.is_none());
}

#[test]
fn unmigrated_store_fails_lookups() {
    let store = SqliteStore::open_in_memory().expect("open in memory");
    let err = store.contains_phone("998901234567").unwrap_err();
    assert_eq!(err.kind(), StoreErrorKind::Sql);
}
