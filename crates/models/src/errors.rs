use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("validation error: {0}")]
    Validation(String),
}

impl ModelError {
    pub fn field(field: &str, msg: impl std::fmt::Display) -> Self {
        Self::Validation(format!("{field}: {msg}"))
    }
}
