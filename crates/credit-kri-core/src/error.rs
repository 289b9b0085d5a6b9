use thiserror::Error;

#[derive(Debug, Error)]
pub enum KriError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl KriError {
    pub(crate) fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        KriError::InvalidInput {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for KriError {
    fn from(e: serde_json::Error) -> Self {
        KriError::SerializationError(e.to_string())
    }
}
