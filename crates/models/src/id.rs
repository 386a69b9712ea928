use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ModelError;

const MAX_ID_LEN: usize = 64;

/// Primary key of a stored record.
///
/// UUIDs are normalized to lowercase hyphenated form so that every spelling of
/// the same UUID addresses the same record. Other identifiers must be 1..=64
/// characters of `[A-Za-z0-9_-]` and are kept as given.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    pub fn parse(raw: &str) -> Result<Self, ModelError> {
        let raw = raw.trim();
        if let Ok(uuid) = Uuid::parse_str(raw) {
            return Ok(Self(uuid.hyphenated().to_string()));
        }
        if raw.is_empty() {
            return Err(ModelError::field("id", "must not be empty"));
        }
        if raw.len() > MAX_ID_LEN {
            return Err(ModelError::field("id", format!("must be at most {MAX_ID_LEN} characters")));
        }
        if !raw.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_') {
            return Err(ModelError::field("id", format!("invalid identifier: {raw}")));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn new_v4() -> Self {
        Self::from(Uuid::new_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<Uuid> for RecordId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid.hyphenated().to_string())
    }
}

impl TryFrom<String> for RecordId {
    type Error = ModelError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl FromStr for RecordId {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
