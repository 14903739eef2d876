use thiserror::Error;

/// Error for token id parsing failures.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenIdError {
    #[error("Token id is empty")]
    Empty,

    #[error("Malformed token id: {0}")]
    Malformed(String),
}
