use serde::Deserialize;

pub const COUNTRY_PREFIX: &str = "998";

const NATIONAL_LEN: usize = 9;
const FULL_LEN: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhonePolicy {
    /// Accept national or full numbers in loose formatting and store the
    /// bare 12-digit form.
    Normalize,
    /// Require `+998XXXXXXXXX` exactly and store it untouched.
    Prefixed,
}

impl PhonePolicy {
    pub fn apply(self, value: &str) -> Option<String> {
        match self {
            PhonePolicy::Normalize => normalize_phone(value),
            PhonePolicy::Prefixed => {
                let trimmed = value.trim();
                is_prefixed_phone(trimmed).then(|| trimmed.to_string())
            }
        }
    }

    pub fn example(self) -> &'static str {
        match self {
            PhonePolicy::Normalize => "998901234567",
            PhonePolicy::Prefixed => "+998901234567",
        }
    }
}

pub fn normalize_phone(value: &str) -> Option<String> {
    let digits: String = value.chars().filter(|ch| ch.is_ascii_digit()).collect();

    if digits.len() == FULL_LEN && digits.starts_with(COUNTRY_PREFIX) {
        return Some(digits);
    }

    if digits.len() == NATIONAL_LEN && digits.starts_with('9') {
        return Some(format!("{COUNTRY_PREFIX}{digits}"));
    }

    None
}

pub fn is_prefixed_phone(value: &str) -> bool {
    let Some(rest) = value.strip_prefix('+') else {
        return false;
    };
    let Some(local) = rest.strip_prefix(COUNTRY_PREFIX) else {
        return false;
    };
    local.len() == NATIONAL_LEN && local.chars().all(|ch| ch.is_ascii_digit())
}
