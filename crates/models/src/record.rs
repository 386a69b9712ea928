use serde::{de::DeserializeOwned, Serialize};

use crate::id::RecordId;

/// An entity that lives in a collection, addressed by its primary key.
pub trait Record: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    /// Entity kind, used in messages and logs (`"user"`, `"tweet"`).
    const KIND: &'static str;

    fn key(&self) -> &RecordId;
}
