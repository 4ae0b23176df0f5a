pub mod backend;
pub mod db;
pub mod dedup;
pub mod error;
pub mod migrate;
pub mod paths;
pub mod reader;
pub mod repo;
pub mod sheet;
pub mod sqlite;
pub mod writer;

pub use backend::{LookupPolicy, RecordStore, StoreTarget};
pub use dedup::phone_exists;
pub use error::{Result, StoreError, StoreErrorKind};
pub use reader::read_records;
pub use sheet::{SheetStore, DEFAULT_SHEET_NAME};
pub use sqlite::SqliteStore;
pub use writer::{MirrorFailure, MirrorReport, SubmissionWriter, SubmitError};
