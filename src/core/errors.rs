use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Clone, Serialize, PartialEq)]
pub enum ReceiptError {
    /// No acting user, or the acting user does not own the receipt
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Receipt {0} not found")]
    ReceiptNotFound(String),

    /// Item index outside `[0, len)` of the stored item list
    #[error("Invalid item index {index} for receipt with {len} items")]
    InvalidIndex { index: i64, len: usize },

    /// The document store read or write itself failed
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),

    #[error("Cache error: {0}")]
    CacheError(String),

    #[error("Logging error: {0}")]
    LoggingError(String),

    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl ReceiptError {
    pub fn invalid_input(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        ReceiptError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.into(),
                description: description.into(),
            },
        )
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ReceiptError::Unauthorized(_))
    }
}
