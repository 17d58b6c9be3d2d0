use std::fmt;
use std::io;

use serde::Serialize;
use thiserror::Error;

/// Request fields that must be filled before a document is generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    ClientName,
    Items,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::ClientName => f.write_str("client name"),
            Field::Items => f.write_str("line items"),
        }
    }
}

#[derive(Error, Debug)]
pub enum QuoteError {
    #[error("Invalid number format: {0:?}")]
    InvalidNumberFormat(String),

    #[error("Missing required field: {0}")]
    MissingRequiredField(Field),

    #[error("Counter store unavailable: {0}")]
    CounterStoreUnavailable(String),

    #[error("Failed to decode image: {0}")]
    ImageDecodeFailure(String),

    #[error("Failed to render PDF: {0}")]
    Render(#[from] io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, QuoteError>;
