use crate::error::Violation;
use crate::rules::schema::Field;

pub const UNKNOWN_FIELD_MESSAGE: &str = "field is not allowed";

// `None` rows are the per-field fallback.
const MESSAGES: &[(Field, Option<Violation>, &str)] = &[
    (Field::Name, Some(Violation::Missing), "name is required"),
    (Field::Name, Some(Violation::TooShort), "name is too short"),
    (Field::Name, Some(Violation::TooLong), "name is too long"),
    (Field::Name, None, "name is invalid"),
    (Field::Phone, Some(Violation::Missing), "phone number is required"),
    (
        Field::Phone,
        Some(Violation::Pattern),
        "phone number format is invalid, example: {example}",
    ),
    (Field::Phone, None, "phone number is invalid"),
    (Field::Region, None, "region name is invalid or too short"),
    (
        Field::EnrollmentType,
        None,
        "enrollment type is invalid, allowed: {allowed}",
    ),
    (Field::Program, None, "program is invalid or too short"),
];

pub fn message_for(field: Field, violation: Violation) -> &'static str {
    MESSAGES
        .iter()
        .find(|(f, v, _)| *f == field && *v == Some(violation))
        .or_else(|| MESSAGES.iter().find(|(f, v, _)| *f == field && v.is_none()))
        .map(|(_, _, message)| *message)
        .unwrap_or(UNKNOWN_FIELD_MESSAGE)
}
