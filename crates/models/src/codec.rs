//! Record codec: converts entities to and from their JSON object form.
//!
//! JSON has no native identifier or timestamp types, so identifiers are
//! written as strings (see [`crate::RecordId`]) and timestamps as RFC 3339
//! UTC strings. Decoding accepts a few more timestamp spellings, listed on
//! [`parse_timestamp`].

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::validation::Validate;

/// Encode an entity into a JSON object map.
pub fn encode<T: Serialize>(entity: &T) -> Result<Map<String, Value>, ModelError> {
    match serde_json::to_value(entity) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(ModelError::Validation(format!(
            "record must encode to a JSON object, got {}",
            kind_of(&other)
        ))),
        Err(e) => Err(ModelError::Validation(e.to_string())),
    }
}

/// Decode and validate an entity from untrusted JSON.
pub fn decode<T: DeserializeOwned + Validate>(value: Value) -> Result<T, ModelError> {
    let entity = decode_unvalidated::<T>(value)?;
    entity.validate()?;
    Ok(entity)
}

/// Decode an entity without running field-range rules.
///
/// Used for records read back from storage, where stored values (for example
/// password hashes) may legitimately fall outside the input ranges.
pub fn decode_unvalidated<T: DeserializeOwned>(value: Value) -> Result<T, ModelError> {
    if !value.is_object() {
        return Err(ModelError::Validation(format!("expected a JSON object, got {}", kind_of(&value))));
    }
    serde_json::from_value(value).map_err(|e| ModelError::Validation(e.to_string()))
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse a timestamp.
///
/// Accepted forms:
/// - RFC 3339 (`2024-05-01T10:00:00Z`, `2024-05-01T12:00:00+02:00`)
/// - offset with a space separator (`2024-05-01 12:00:00+02:00`)
/// - naive date-time with `T` or space, optional fraction, taken as UTC
/// - bare date (`2024-05-01`), midnight UTC
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, ModelError> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f%:z") {
        return Ok(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(Utc.from_utc_datetime(&naive));
    }
    Err(ModelError::Validation(format!("invalid timestamp: {raw}")))
}

/// Serde adapter for required timestamps.
pub mod timestamp {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&super::format_timestamp(ts))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        super::parse_timestamp(&raw).map_err(de::Error::custom)
    }
}

/// Serde adapter for optional timestamps. Pair with `#[serde(default)]`.
///
/// `null`, `""` and `"None"` all decode to `None`; the last one shows up in
/// files written by older versions of the service.
pub mod timestamp_opt {
    use chrono::{DateTime, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(ts: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error> {
        match ts {
            Some(ts) => s.serialize_some(&super::format_timestamp(ts)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() || raw.trim() == "None" => Ok(None),
            Some(raw) => super::parse_timestamp(&raw).map(Some).map_err(de::Error::custom),
        }
    }
}
