use crate::domain::PhonePolicy;
use serde::Deserialize;

pub const DEFAULT_ENROLLMENT_TYPES: [&str; 2] = ["Bakalavr kunduzgi", "Magistratura"];

pub const NAME_MIN: usize = 2;
pub const TEXT_MIN: usize = 3;
pub const TEXT_MAX: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaVariant {
    Basic,
    Extended,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Phone,
    Region,
    EnrollmentType,
    Program,
}

impl Field {
    pub fn key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Phone => "phone",
            Field::Region => "region",
            Field::EnrollmentType => "enrollment_type",
            Field::Program => "program",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    Text { min: usize, max: usize },
    Phone(PhonePolicy),
    OneOf(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    pub field: Field,
    pub rule: Rule,
}

/// Fields are evaluated in the order they appear here; the first failure wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: Vec<FieldSpec>,
}

impl Schema {
    pub fn new(
        variant: SchemaVariant,
        phone_policy: PhonePolicy,
        enrollment_types: Vec<String>,
    ) -> Self {
        let mut fields = vec![
            FieldSpec {
                field: Field::Name,
                rule: Rule::Text {
                    min: NAME_MIN,
                    max: TEXT_MAX,
                },
            },
            FieldSpec {
                field: Field::Phone,
                rule: Rule::Phone(phone_policy),
            },
        ];

        if variant == SchemaVariant::Extended {
            fields.extend([
                FieldSpec {
                    field: Field::Region,
                    rule: Rule::Text {
                        min: TEXT_MIN,
                        max: TEXT_MAX,
                    },
                },
                FieldSpec {
                    field: Field::EnrollmentType,
                    rule: Rule::OneOf(enrollment_types),
                },
                FieldSpec {
                    field: Field::Program,
                    rule: Rule::Text {
                        min: TEXT_MIN,
                        max: TEXT_MAX,
                    },
                },
            ]);
        }

        Self { fields }
    }

    pub fn basic(phone_policy: PhonePolicy) -> Self {
        Self::new(SchemaVariant::Basic, phone_policy, Vec::new())
    }

    pub fn extended(phone_policy: PhonePolicy) -> Self {
        Self::new(
            SchemaVariant::Extended,
            phone_policy,
            DEFAULT_ENROLLMENT_TYPES
                .iter()
                .map(|value| value.to_string())
                .collect(),
        )
    }

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn declares(&self, key: &str) -> bool {
        self.fields.iter().any(|spec| spec.field.key() == key)
    }
}
