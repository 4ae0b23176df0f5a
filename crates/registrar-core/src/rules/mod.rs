pub mod messages;
pub mod schema;
pub mod validation;

pub use messages::message_for;
pub use schema::{Field, FieldSpec, Rule, Schema, SchemaVariant, DEFAULT_ENROLLMENT_TYPES};
