use std::fmt::Display;
use std::path::Path;

use models::{ModelError, RecordId};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("storage error: {0}")]
    Storage(String),
    #[error("internal error: {0}")]
    Internal(String),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ServiceError {
    pub fn not_found(entity: &str, key: &RecordId) -> Self {
        Self::NotFound(format!("{entity} {key} not found"))
    }

    pub fn conflict(entity: &str, key: &RecordId) -> Self {
        Self::Conflict(format!("{entity} {key} already exists"))
    }

    pub fn storage(path: &Path, action: &str, err: impl Display) -> Self {
        Self::Storage(format!("{action} {}: {err}", path.display()))
    }

    /// Short label for metrics and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Validation(_) | Self::Model(_) => "validation",
            Self::NotFound(_) => "not_found",
            Self::Conflict(_) => "conflict",
            Self::Storage(_) => "storage",
            Self::Internal(_) => "internal",
        }
    }
}
