use async_trait::async_trait;
use auth::TokenId;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::session::errors::SessionError;
use crate::session::models::SessionToken;
use crate::session::ports::TokenStore;

pub struct PostgresTokenStore {
    pool: PgPool,
}

impl PostgresTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct SessionTokenRow {
    id: Uuid,
    owner: String,
    expires_at: DateTime<Utc>,
}

impl From<SessionTokenRow> for SessionToken {
    fn from(row: SessionTokenRow) -> Self {
        SessionToken {
            id: TokenId::from(row.id),
            owner: row.owner,
            expires_at: row.expires_at,
        }
    }
}

#[async_trait]
impl TokenStore for PostgresTokenStore {
    async fn create(&self, token: &SessionToken) -> Result<(), SessionError> {
        sqlx::query(
            r#"
            INSERT INTO session_tokens (id, owner, expires_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(*token.id.as_uuid())
        .bind(&token.owner)
        .bind(token.expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(())
    }

    async fn find(&self, id: &TokenId) -> Result<Option<SessionToken>, SessionError> {
        let row = sqlx::query_as::<_, SessionTokenRow>(
            r#"
            SELECT id, owner, expires_at
            FROM session_tokens
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(row.map(SessionToken::from))
    }

    async fn extend(
        &self,
        id: &TokenId,
        expires_at: DateTime<Utc>,
    ) -> Result<bool, SessionError> {
        let result = sqlx::query(
            r#"
            UPDATE session_tokens
            SET expires_at = $2
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .bind(expires_at)
        .execute(&self.pool)
        .await
        .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &TokenId) -> Result<bool, SessionError> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn purge_expired_before(&self, cutoff: DateTime<Utc>) -> Result<u64, SessionError> {
        let result = sqlx::query("DELETE FROM session_tokens WHERE expires_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| SessionError::Storage(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
