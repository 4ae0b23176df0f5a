pub mod auth;
pub mod error;
pub mod file;
pub mod google;
pub mod memory;
pub mod range;
pub mod service;

pub use auth::{AccessToken, TokenCache, TokenSource};
pub use error::{Result, SheetError};
pub use file::FileSheet;
pub use google::{GoogleSheets, DEFAULT_ENDPOINT, SHEETS_SCOPE};
pub use memory::MemorySheet;
pub use range::ColumnSpan;
pub use service::{Row, SheetService};
