use std::fmt;
use std::str::FromStr;

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::errors::TokenIdError;

/// Opaque session token identifier.
///
/// A random UUID v4; it encodes nothing about its owner and is only
/// meaningful as a key into a token store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TokenId(Uuid);

impl TokenId {
    /// Generate a fresh random token id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a token id presented by a client.
    ///
    /// # Errors
    /// * `Empty` - Input is blank
    /// * `Malformed` - Input is not a UUID
    pub fn parse(raw: &str) -> Result<Self, TokenIdError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(TokenIdError::Empty);
        }
        Uuid::parse_str(raw)
            .map(TokenId)
            .map_err(|e| TokenIdError::Malformed(e.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TokenId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for TokenId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for TokenId {
    type Err = TokenIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for TokenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// An issued session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionToken {
    pub id: TokenId,
    pub owner: String,
    pub expires_at: DateTime<Utc>,
}

impl SessionToken {
    /// Whether the session has passed its expiry at `now`.
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }

    /// Human-readable expiry, e.g. `2026-10-20 09:15:00`.
    pub fn expire_display(&self) -> String {
        self.expires_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

/// Lifecycle of a stored token at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenState {
    /// Not yet expired.
    Active,
    /// Expired, but still inside the grace window where the owner may
    /// re-prove their credentials.
    Stale,
    /// Expired beyond the grace window; equivalent to an absent token.
    Dead,
}
