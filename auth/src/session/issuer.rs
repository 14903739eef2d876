use chrono::DateTime;
use chrono::Duration;
use chrono::Utc;

use super::token::SessionToken;
use super::token::TokenId;
use super::token::TokenState;

/// Mints and ages session tokens.
///
/// Holds the session lifetime and the grace window after expiry during
/// which a token is `Stale` rather than `Dead`.
#[derive(Debug, Clone)]
pub struct SessionIssuer {
    lifetime: Duration,
    grace: Duration,
}

impl SessionIssuer {
    /// Create an issuer.
    ///
    /// # Arguments
    /// * `lifetime` - How long a new or refreshed session stays active
    /// * `grace` - How long after expiry a session counts as stale
    pub fn new(lifetime: Duration, grace: Duration) -> Self {
        Self { lifetime, grace }
    }

    /// Mint a new session for `owner`, expiring one lifetime from now.
    pub fn issue(&self, owner: impl Into<String>) -> SessionToken {
        SessionToken {
            id: TokenId::new(),
            owner: owner.into(),
            expires_at: self.next_expiry(Utc::now()),
        }
    }

    /// Expiry for a session refreshed at `now`.
    pub fn next_expiry(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now + self.lifetime
    }

    /// Tokens with an expiry before this instant are dead at `now`.
    pub fn dead_before(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - self.grace
    }

    /// Classify a stored token at `now`.
    pub fn classify(&self, token: &SessionToken, now: DateTime<Utc>) -> TokenState {
        if !token.is_expired(now) {
            TokenState::Active
        } else if token.expires_at > self.dead_before(now) {
            TokenState::Stale
        } else {
            TokenState::Dead
        }
    }
}

impl Default for SessionIssuer {
    fn default() -> Self {
        Self::new(Duration::hours(24), Duration::hours(24))
    }
}
