//! Process-local stores used when no database is configured, and by tests.

use std::collections::BTreeMap;
use std::collections::HashMap;

use async_trait::async_trait;
use auth::PasswordHasher;
use auth::TokenId;
use chrono::DateTime;
use chrono::Utc;
use tokio::sync::RwLock;

use super::accounts::hash_password;
use super::accounts::verify_password;
use crate::inventory::errors::InventoryError;
use crate::inventory::kinds::ResourceKind;
use crate::inventory::models::Resource;
use crate::inventory::models::ResourceName;
use crate::inventory::ports::InventoryRepository;
use crate::session::errors::SessionError;
use crate::session::models::SessionToken;
use crate::session::ports::CredentialStore;
use crate::session::ports::TokenStore;

#[derive(Default)]
pub struct InMemoryCredentialStore {
    accounts: RwLock<HashMap<String, String>>,
    hasher: PasswordHasher,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, SessionError> {
        // Clone the hash out so the lock is not held while Argon2 runs.
        let stored = self.accounts.read().await.get(username).cloned();
        match stored {
            Some(hash) => verify_password(&self.hasher, password, hash).await,
            None => Ok(false),
        }
    }

    async fn upsert_account(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let hash = hash_password(&self.hasher, password).await?;
        self.accounts
            .write()
            .await
            .insert(username.to_string(), hash);
        Ok(())
    }
}

#[derive(Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<TokenId, SessionToken>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn create(&self, token: &SessionToken) -> Result<(), SessionError> {
        let mut tokens = self.tokens.write().await;
        if tokens.contains_key(&token.id) {
            return Err(SessionError::Storage(format!(
                "Token {} already exists",
                token.id
            )));
        }
        tokens.insert(token.id, token.clone());
        Ok(())
    }

    async fn find(&self, id: &TokenId) -> Result<Option<SessionToken>, SessionError> {
        Ok(self.tokens.read().await.get(id).cloned())
    }

    async fn extend(
        &self,
        id: &TokenId,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        match self.tokens.write().await.get_mut(id) {
            Some(token) => {
                token.expires_at = expires_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &TokenId) -> Result<bool, SessionError> {
        Ok(self.tokens.write().await.remove(id).is_some())
    }

    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionError> {
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|_, token| token.expires_at >= cutoff);
        Ok((before - tokens.len()) as u64)
    }
}

/// Resources keyed by (type name, resource name); iteration order gives
/// name-sorted listings per kind.
#[derive(Default)]
pub struct InMemoryInventoryRepository {
    resources: RwLock<BTreeMap<(&'static str, ResourceName), Resource>>,
}

impl InMemoryInventoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InventoryRepository for InMemoryInventoryRepository {
    async fn list(&self, kind: &'static ResourceKind) -> Result<Vec<Resource>, InventoryError> {
        Ok(self
            .resources
            .read()
            .await
            .iter()
            .filter(|((type_name, _), _)| *type_name == kind.type_name)
            .map(|(_, resource)| resource.clone())
            .collect())
    }

    async fn find(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<Option<Resource>, InventoryError> {
        Ok(self
            .resources
            .read()
            .await
            .get(&(kind.type_name, name.clone()))
            .cloned())
    }

    async fn upsert(&self, resource: Resource) -> Result<Resource, InventoryError> {
        self.resources.write().await.insert(
            (resource.kind.type_name, resource.name.clone()),
            resource.clone(),
        );
        Ok(resource)
    }

    async fn delete(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<bool, InventoryError> {
        Ok(self
            .resources
            .write()
            .await
            .remove(&(kind.type_name, name.clone()))
            .is_some())
    }
}
