use chrono::{DateTime, SecondsFormat, TimeZone, Utc};

pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn from_unix_millis(millis: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(millis).single()
}

#[cfg(test)]
mod tests {
    use super::{format_timestamp, from_unix_millis};
    use chrono::{TimeZone, Utc};

    #[test]
    fn format_timestamp_uses_millis_and_zulu() {
        let value = Utc.with_ymd_and_hms(2024, 9, 1, 8, 30, 0).unwrap();
        assert_eq!(format_timestamp(&value), "2024-09-01T08:30:00.000Z");
    }

    #[test]
    fn from_unix_millis_keeps_precision() {
        let value = from_unix_millis(1_700_000_000_123).expect("valid millis");
        assert_eq!(value.timestamp_millis(), 1_700_000_000_123);
    }
}
