use std::sync::Arc;

use async_trait::async_trait;
use auth::SessionIssuer;
use auth::TokenId;
use auth::TokenState;
use chrono::Utc;

use super::errors::SessionError;
use super::models::AuthenticatedSession;
use super::models::Credentials;
use super::models::PresentedToken;
use super::models::SessionToken;
use super::ports::CredentialStore;
use super::ports::SessionServicePort;
use super::ports::TokenStore;

/// Domain service implementation for login and token lifecycle.
///
/// Generic over the credential and token stores for testability.
pub struct SessionService<CS, TS>
where
    CS: CredentialStore,
    TS: TokenStore,
{
    credentials: Arc<CS>,
    tokens: Arc<TS>,
    issuer: SessionIssuer,
}

impl<CS, TS> SessionService<CS, TS>
where
    CS: CredentialStore,
    TS: TokenStore,
{
    pub fn new(credentials: Arc<CS>, tokens: Arc<TS>, issuer: SessionIssuer) -> Self {
        Self {
            credentials,
            tokens,
            issuer,
        }
    }

    /// Look up a token that is still usable, i.e. not absent or dead.
    async fn find_live(&self, id: &TokenId) -> Result<(SessionToken, TokenState), SessionError> {
        let token = self
            .tokens
            .find(id)
            .await?
            .ok_or(SessionError::InvalidToken)?;

        match self.issuer.classify(&token, Utc::now()) {
            TokenState::Dead => Err(SessionError::InvalidToken),
            state => Ok((token, state)),
        }
    }

    // TODO: stale tokens are re-verified with a password carried in the
    // request body; replace with a dedicated re-login endpoint once clients
    // stop relying on it.
    async fn reverify(
        &self,
        token: &TokenId,
        credentials: &Credentials,
    ) -> Result<AuthenticatedSession, SessionError> {
        if !self
            .credentials
            .verify(&credentials.username, &credentials.password)
            .await?
        {
            return Err(SessionError::InvalidCredentials);
        }

        // Re-read so an owner change between lookup and verification is seen.
        let current = self
            .tokens
            .find(token)
            .await?
            .ok_or(SessionError::InvalidToken)?;

        if current.owner != credentials.username {
            return Err(SessionError::OwnerMismatch {
                owner: current.owner,
                username: credentials.username.clone(),
            });
        }

        Ok(AuthenticatedSession {
            username: current.owner,
            token: current.id,
        })
    }
}

#[async_trait]
impl<CS, TS> SessionServicePort for SessionService<CS, TS>
where
    CS: CredentialStore,
    TS: TokenStore,
{
    async fn login(&self, credentials: &Credentials) -> Result<SessionToken, SessionError> {
        if !self
            .credentials
            .verify(&credentials.username, &credentials.password)
            .await?
        {
            return Err(SessionError::InvalidCredentials);
        }

        let token = self.issuer.issue(credentials.username.clone());
        self.tokens.create(&token).await?;

        tracing::info!(
            username = %token.owner,
            expires_at = %token.expires_at,
            "Session opened"
        );

        Ok(token)
    }

    async fn authenticate(
        &self,
        token: &TokenId,
        credentials: Option<&Credentials>,
    ) -> Result<AuthenticatedSession, SessionError> {
        let (session, state) = self.find_live(token).await?;

        match state {
            TokenState::Active => Ok(AuthenticatedSession {
                username: session.owner,
                token: session.id,
            }),
            _ => {
                let credentials = credentials.ok_or(SessionError::ReverificationRequired)?;
                let resolved = self.reverify(token, credentials).await?;
                tracing::debug!(username = %resolved.username, "Stale token re-verified");
                Ok(resolved)
            }
        }
    }

    async fn authenticate_without_account(
        &self,
        token: &TokenId,
    ) -> Result<PresentedToken, SessionError> {
        self.find_live(token)
            .await
            .map(|(session, _)| PresentedToken(session.id))
    }

    async fn refresh(&self, session: &AuthenticatedSession) -> Result<SessionToken, SessionError> {
        let (mut token, _) = self.find_live(&session.token).await?;

        if token.owner != session.username {
            return Err(SessionError::OwnerMismatch {
                owner: token.owner,
                username: session.username.clone(),
            });
        }

        let expires_at = self.issuer.next_expiry(Utc::now());
        if !self.tokens.extend(&token.id, expires_at).await? {
            return Err(SessionError::InvalidToken);
        }
        token.expires_at = expires_at;

        tracing::debug!(username = %token.owner, expires_at = %expires_at, "Session refreshed");

        Ok(token)
    }

    async fn revoke(&self, token: &TokenId) -> Result<(), SessionError> {
        if self.tokens.delete(token).await? {
            tracing::info!(token = %token, "Session revoked");
        }
        Ok(())
    }

    async fn purge_expired(&self) -> Result<u64, SessionError> {
        let cutoff = self.issuer.dead_before(Utc::now());
        self.tokens.purge_expired_before(cutoff).await
    }
}
