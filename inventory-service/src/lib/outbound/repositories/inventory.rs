use async_trait::async_trait;
use serde_json::Map;
use serde_json::Value;
use sqlx::types::Json;
use sqlx::PgPool;

use crate::inventory::errors::InventoryError;
use crate::inventory::kinds::ResourceKind;
use crate::inventory::models::Resource;
use crate::inventory::models::ResourceName;
use crate::inventory::ports::InventoryRepository;

/// Inventory records stored as JSONB attribute maps keyed by (kind, name).
pub struct PostgresInventoryRepository {
    pool: PgPool,
}

impl PostgresInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct ResourceRow {
    name: String,
    attributes: Json<Map<String, Value>>,
}

impl ResourceRow {
    fn into_resource(self, kind: &'static ResourceKind) -> Result<Resource, InventoryError> {
        let name = ResourceName::new(self.name)
            .map_err(|e| InventoryError::Storage(format!("Stored {} has bad name: {}", kind, e)))?;

        Ok(Resource {
            kind,
            name,
            attributes: self.attributes.0,
        })
    }
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    async fn list(&self, kind: &'static ResourceKind) -> Result<Vec<Resource>, InventoryError> {
        let rows = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT name, attributes
            FROM inventory_resources
            WHERE kind = $1
            ORDER BY name
            "#,
        )
        .bind(kind.type_name)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| InventoryError::Storage(e.to_string()))?;

        rows.into_iter()
            .map(|row| row.into_resource(kind))
            .collect()
    }

    async fn find(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<Option<Resource>, InventoryError> {
        let row = sqlx::query_as::<_, ResourceRow>(
            r#"
            SELECT name, attributes
            FROM inventory_resources
            WHERE kind = $1 AND name = $2
            "#,
        )
        .bind(kind.type_name)
        .bind(name.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| InventoryError::Storage(e.to_string()))?;

        row.map(|row| row.into_resource(kind)).transpose()
    }

    async fn upsert(&self, resource: Resource) -> Result<Resource, InventoryError> {
        sqlx::query(
            r#"
            INSERT INTO inventory_resources (kind, name, attributes)
            VALUES ($1, $2, $3)
            ON CONFLICT (kind, name)
            DO UPDATE SET attributes = EXCLUDED.attributes, updated_at = NOW()
            "#,
        )
        .bind(resource.kind.type_name)
        .bind(resource.name.as_str())
        .bind(Json(&resource.attributes))
        .execute(&self.pool)
        .await
        .map_err(|e| InventoryError::Storage(e.to_string()))?;

        Ok(resource)
    }

    async fn delete(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<bool, InventoryError> {
        let result = sqlx::query("DELETE FROM inventory_resources WHERE kind = $1 AND name = $2")
            .bind(kind.type_name)
            .bind(name.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| InventoryError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}
