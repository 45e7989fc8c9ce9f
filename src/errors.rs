//! Crate-level error type
//!
//! Wraps the three error families so callers crossing module boundaries
//! (registry lookup + validation + encoding) can use `?` throughout.

use thiserror::Error;

use crate::schema::SchemaError;
use crate::serialize::SerializeError;
use crate::validate::ValidationError;

/// Result type for operations spanning schema lookup and validation
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Serialize(#[from] SerializeError),
}

impl Error {
    /// Returns the validation failure, if that is what this is
    pub fn as_validation(&self) -> Option<&ValidationError> {
        match self {
            Error::Validation(e) => Some(e),
            _ => None,
        }
    }
}
