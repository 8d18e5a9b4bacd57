//! Error types for the storefront bot Lambda functions.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the bot Lambda functions.
#[derive(Error, Debug)]
pub enum Error {
    /// Store (DynamoDB) error
    #[error("Store error: {0}")]
    Store(String),

    /// A store record is missing an expected attribute or holds the wrong type
    #[error("Malformed record: {0}")]
    Record(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Intent name outside the bot's dispatch table
    #[error("Intent with name {0} not supported")]
    UnsupportedIntent(String),

    /// Ran out of attempts while sampling a free order number
    #[error("Could not allocate a unique order number after {0} attempts")]
    OrderNumbersExhausted(usize),
}
