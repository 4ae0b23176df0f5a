use crate::domain::{PhonePolicy, Submission};
use crate::error::{ValidationError, Violation};
use crate::rules::messages::{message_for, UNKNOWN_FIELD_MESSAGE};
use crate::rules::schema::{Field, FieldSpec, Rule, Schema};
use serde_json::{Map, Value};
use std::collections::HashMap;

impl Schema {
    pub fn validate(&self, input: &Map<String, Value>) -> Result<Submission, ValidationError> {
        let mut values: HashMap<Field, String> = HashMap::new();
        for spec in self.fields() {
            let value = check_field(spec, input.get(spec.field.key()))
                .map_err(|violation| field_error(spec, violation))?;
            values.insert(spec.field, value);
        }

        if let Some(key) = input.keys().find(|key| !self.declares(key)) {
            return Err(ValidationError {
                field: key.clone(),
                violation: Violation::Unknown,
                message: UNKNOWN_FIELD_MESSAGE.to_string(),
            });
        }

        Ok(Submission {
            name: values.remove(&Field::Name).unwrap_or_default(),
            phone: values.remove(&Field::Phone).unwrap_or_default(),
            region: values.remove(&Field::Region),
            enrollment_type: values.remove(&Field::EnrollmentType),
            program: values.remove(&Field::Program),
        })
    }
}

fn check_field(spec: &FieldSpec, value: Option<&Value>) -> Result<String, Violation> {
    let value = match value {
        None => return Err(Violation::Missing),
        Some(Value::String(value)) => value.trim(),
        Some(_) => return Err(Violation::NotString),
    };
    if value.is_empty() {
        return Err(Violation::Empty);
    }

    match &spec.rule {
        Rule::Text { min, max } => {
            let len = value.chars().count();
            if len < *min {
                Err(Violation::TooShort)
            } else if len > *max {
                Err(Violation::TooLong)
            } else {
                Ok(value.to_string())
            }
        }
        Rule::Phone(policy) => {
            if *policy == PhonePolicy::Normalize && !has_phone_shape(value) {
                return Err(Violation::Pattern);
            }
            policy.apply(value).ok_or(Violation::Pattern)
        }
        Rule::OneOf(allowed) => {
            if allowed.iter().any(|candidate| candidate == value) {
                Ok(value.to_string())
            } else {
                Err(Violation::NotAllowed)
            }
        }
    }
}

// Optional leading `+`, then digits with common separators.
fn has_phone_shape(value: &str) -> bool {
    let body = value.strip_prefix('+').unwrap_or(value);
    body.chars().any(|ch| ch.is_ascii_digit())
        && body
            .chars()
            .all(|ch| ch.is_ascii_digit() || matches!(ch, ' ' | '-' | '(' | ')'))
}

fn field_error(spec: &FieldSpec, violation: Violation) -> ValidationError {
    let template = message_for(spec.field, violation);
    let message = match &spec.rule {
        Rule::Phone(policy) => template.replace("{example}", policy.example()),
        Rule::OneOf(allowed) => template.replace("{allowed}", &allowed.join(", ")),
        Rule::Text { .. } => template.to_string(),
    };
    ValidationError {
        field: spec.field.key().to_string(),
        violation,
        message,
    }
}
