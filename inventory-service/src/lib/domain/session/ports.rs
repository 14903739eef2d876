use async_trait::async_trait;
use auth::TokenId;
use chrono::DateTime;
use chrono::Utc;

use super::errors::SessionError;
use super::models::AuthenticatedSession;
use super::models::Credentials;
use super::models::PresentedToken;
use super::models::SessionToken;

/// Port for session (login/token) operations.
#[async_trait]
pub trait SessionServicePort: Send + Sync + 'static {
    /// Verify credentials and open a new session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Credential store rejected the pair
    /// * `Storage` - Credential or token store failed
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, SessionError>;

    /// Resolve a presented token to the owning account.
    ///
    /// An active token resolves directly. A stale token resolves only when
    /// `credentials` verify and name the token's owner; its expiry is left
    /// untouched.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is absent or dead
    /// * `ReverificationRequired` - Token is stale and `credentials` is `None`
    /// * `InvalidCredentials` - Re-verification credentials were rejected
    /// * `OwnerMismatch` - Credentials belong to another account
    async fn authenticate(
        &self,
        token: &TokenId,
        credentials: Option<&Credentials>,
    ) -> Result<AuthenticatedSession, SessionError>;

    /// Accept any token that exists and is not dead, active or stale.
    ///
    /// # Errors
    /// * `InvalidToken` - Token is absent or dead
    async fn authenticate_without_account(
        &self,
        token: &TokenId,
    ) -> Result<PresentedToken, SessionError>;

    /// Push an authenticated session's expiry one lifetime past now.
    ///
    /// # Errors
    /// * `InvalidToken` - Token vanished or died since authentication
    /// * `OwnerMismatch` - Token now belongs to a different account
    async fn refresh(&self, session: &AuthenticatedSession) -> Result<SessionToken, SessionError>;

    /// Delete a token. Revoking an unknown token is not an error.
    async fn revoke(&self, token: &TokenId) -> Result<(), SessionError>;

    /// Delete every dead token, returning how many were removed.
    async fn purge_expired(&self) -> Result<u64, SessionError>;
}

/// Account credential verification.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Check a username/password pair. Unknown users verify as `false`.
    ///
    /// # Errors
    /// * `Password` - Stored hash is unreadable
    /// * `Storage` - Backing store failed
    async fn verify(&self, username: &str, password: &str) -> Result<bool, SessionError>;

    /// Create or overwrite an account. Used for startup seeding only.
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    /// * `Storage` - Backing store failed
    async fn upsert_account(&self, username: &str, password: &str) -> Result<(), SessionError>;
}

/// Persistence of issued session tokens. Every operation touches a single
/// token id.
#[async_trait]
pub trait TokenStore: Send + Sync + 'static {
    async fn create(&self, token: &SessionToken) -> Result<(), SessionError>;

    /// Fetch a token regardless of expiry.
    async fn find(&self, id: &TokenId) -> Result<Option<SessionToken>, SessionError>;

    /// Set a new expiry. Returns `false` if the token does not exist.
    async fn extend(&self, id: &TokenId, expires_at: DateTime<Utc>)
        -> Result<bool, SessionError>;

    /// Returns `false` if the token did not exist.
    async fn delete(&self, id: &TokenId) -> Result<bool, SessionError>;

    /// Delete tokens whose expiry is strictly before `cutoff`.
    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionError>;
}
