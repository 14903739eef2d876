use async_trait::async_trait;
use auth::PasswordHasher;
use sqlx::PgPool;

use crate::session::errors::SessionError;
use crate::session::ports::CredentialStore;

/// Accounts table holding Argon2id password hashes.
pub struct PostgresCredentialStore {
    pool: PgPool,
    hasher: PasswordHasher,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            hasher: PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<bool, SessionError> {
        let stored: Option<String> = sqlx::query_scalar(
            r#"
            SELECT password_hash
            FROM accounts
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        match stored {
            Some(hash) => verify_password(&self.hasher, password, hash).await,
            None => Ok(false),
        }
    }

    async fn upsert_account(&self, username: &str, password: &str) -> Result<(), SessionError> {
        let hash = hash_password(&self.hasher, password).await?;

        sqlx::query(
            r#"
            INSERT INTO accounts (username, password_hash)
            VALUES ($1, $2)
            ON CONFLICT (username) DO UPDATE SET password_hash = EXCLUDED.password_hash
            "#,
        )
        .bind(username)
        .bind(hash)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(())
    }
}

/// Argon2 verification on the blocking pool.
pub(super) async fn verify_password(
    hasher: &PasswordHasher,
    password: &str,
    hash: String,
) -> Result<bool, SessionError> {
    let hasher = hasher.clone();
    let password = password.to_string();

    tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .map_err(|e| SessionError::Storage(format!("Password verification task failed: {}", e)))?
        .map_err(SessionError::from)
}

/// Argon2 hashing on the blocking pool.
pub(super) async fn hash_password(
    hasher: &PasswordHasher,
    password: &str,
) -> Result<String, SessionError> {
    let hasher = hasher.clone();
    let password = password.to_string();

    tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| SessionError::Storage(format!("Password hashing task failed: {}", e)))?
        .map_err(SessionError::from)
}
