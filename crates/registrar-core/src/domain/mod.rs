pub mod phone;
pub mod record;

pub use phone::{is_prefixed_phone, normalize_phone, PhonePolicy, COUNTRY_PREFIX};
pub use record::{Record, RecordRow, Submission};
