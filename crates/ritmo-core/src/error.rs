//! Error types for Ritmo
//!
//! The analytics functions themselves never fail on malformed records;
//! they degrade to `None`/empty results instead. This error type covers
//! the ambient surface: decoding records handed over by the storage
//! collaborator and parsing month keys.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid month key: {0}")]
    InvalidMonthKey(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

pub type Result<T> = std::result::Result<T, Error>;
