//! Wire timestamp handling.
//!
//! The backend is inconsistent: some endpoints emit `2024-03-01T09:30:00`
//! (sometimes with fractional seconds), others `2024-03-01 09:30`. Records
//! keep the raw string; these helpers parse on demand.

use chrono::NaiveDateTime;

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";
const ACCEPTED_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Parse any timestamp shape the backend is known to emit.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    ACCEPTED_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
}

pub fn format_timestamp(value: &NaiveDateTime) -> String {
    value.format(WIRE_FORMAT).to_string()
}

/// `#[serde(with = ...)]` adapter for outbound dates.
pub mod wire {
    use chrono::NaiveDateTime;
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &NaiveDateTime,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&super::format_timestamp(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        super::parse_timestamp(&raw)
            .ok_or_else(|| de::Error::custom(format!("unrecognized timestamp: {raw}")))
    }
}
