use std::fmt;

use auth::TokenId;
use serde::Deserialize;

pub use auth::SessionToken;

/// Username/password pair presented at login or for stale-token
/// re-verification.
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Identity resolved for the current request.
///
/// Produced only by a successful authentication and carried in the request
/// extensions for downstream handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedSession {
    pub username: String,
    pub token: TokenId,
}

/// A token that exists and is not dead, without a resolved account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresentedToken(pub TokenId);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_redacts_password() {
        let credentials = Credentials::new("admin", "secret");
        let rendered = format!("{:?}", credentials);

        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("secret"));
    }
}
