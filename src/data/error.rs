//! Data Error Module
//! Error taxonomy shared by the loader, the codec and the table store.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DataError {
    /// Directory to list is missing or unreadable.
    #[error("Invalid directory: {0}")]
    PathError(String),
    /// CSV source could not be read or parsed.
    #[error("Failed to load CSV: {0}")]
    ParseError(String),
    /// CSV source does not exist.
    #[error("File not found: {0}")]
    NotFoundError(String),
    /// Serialized store or table is malformed.
    #[error("Malformed serialized data: {0}")]
    FormatError(String),
}

impl From<PolarsError> for DataError {
    fn from(err: PolarsError) -> Self {
        DataError::ParseError(err.to_string())
    }
}

impl From<serde_json::Error> for DataError {
    fn from(err: serde_json::Error) -> Self {
        DataError::FormatError(err.to_string())
    }
}
