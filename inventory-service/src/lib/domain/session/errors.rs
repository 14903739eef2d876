use thiserror::Error;

/// Top-level error for login and token operations.
///
/// Every variant is reported to HTTP callers as a bare 401; the detail is
/// only for logs.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token is unknown or expired")]
    InvalidToken,

    #[error("Token is stale and the request carries no credentials")]
    ReverificationRequired,

    #[error("Token owner {owner} does not match account {username}")]
    OwnerMismatch { owner: String, username: String },

    #[error("Password error: {0}")]
    Password(#[from] auth::PasswordError),

    #[error("Storage error: {0}")]
    Storage(String),
}

