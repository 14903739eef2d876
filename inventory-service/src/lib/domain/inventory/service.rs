use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use serde_json::Value;

use super::errors::InventoryError;
use super::kinds::ResourceKind;
use super::kinds::OSDISTRO;
use super::models::CopiedMedia;
use super::models::Resource;
use super::models::ResourceName;
use super::ports::InventoryRepository;
use super::ports::InventoryServicePort;
use super::ports::ProvisioningClient;

/// Concrete implementation of InventoryServicePort.
///
/// Stateless: each operation is a single pass through the repository or
/// provisioning client.
pub struct InventoryService<IR, PC>
where
    IR: InventoryRepository,
    PC: ProvisioningClient,
{
    repository: Arc<IR>,
    provisioning: Arc<PC>,
}

impl<IR, PC> InventoryService<IR, PC>
where
    IR: InventoryRepository,
    PC: ProvisioningClient,
{
    pub fn new(repository: Arc<IR>, provisioning: Arc<PC>) -> Self {
        Self {
            repository,
            provisioning,
        }
    }

    fn not_found(kind: &'static ResourceKind, name: &ResourceName) -> InventoryError {
        InventoryError::NotFound {
            kind: kind.label,
            name: name.to_string(),
        }
    }

    /// Store the distro for a copied media tree, folding the tree into an
    /// existing distro of the same name.
    async fn record_distro(&self, media: &CopiedMedia) -> Result<Resource, InventoryError> {
        let fresh = Resource::from_payload(&OSDISTRO, media.distro_payload(), None)?;

        let distro = match self.repository.find(&OSDISTRO, &fresh.name).await? {
            Some(existing) => existing.patched(&json!({
                "spec": {
                    "basename": media.basename,
                    "arch": media.arch,
                    "dirpaths": merged_dirpaths(&existing, &media.directory),
                }
            }))?,
            None => fresh,
        };

        self.repository.upsert(distro).await
    }
}

fn merged_dirpaths(existing: &Resource, directory: &str) -> Vec<Value> {
    let mut dirpaths = existing
        .attributes
        .get("dirpaths")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    if !dirpaths.iter().any(|path| path.as_str() == Some(directory)) {
        dirpaths.push(Value::from(directory));
    }
    dirpaths
}

#[async_trait]
impl<IR, PC> InventoryServicePort for InventoryService<IR, PC>
where
    IR: InventoryRepository,
    PC: ProvisioningClient,
{
    async fn list(&self, kind: &'static ResourceKind) -> Result<Vec<Resource>, InventoryError> {
        self.repository.list(kind).await
    }

    async fn get(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<Resource, InventoryError> {
        self.repository
            .find(kind, name)
            .await?
            .ok_or_else(|| Self::not_found(kind, name))
    }

    async fn create(
        &self,
        kind: &'static ResourceKind,
        payload: Value,
    ) -> Result<Resource, InventoryError> {
        let resource = Resource::from_payload(kind, payload, None)?;
        let stored = self.repository.upsert(resource).await?;

        tracing::info!(kind = kind.type_name, name = %stored.name, "Resource stored");

        Ok(stored)
    }

    async fn replace(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
        payload: Value,
    ) -> Result<Resource, InventoryError> {
        let resource = Resource::from_payload(kind, payload, Some(name))?;
        let stored = self.repository.upsert(resource).await?;

        tracing::info!(kind = kind.type_name, name = %stored.name, "Resource replaced");

        Ok(stored)
    }

    async fn patch(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
        patch: Value,
    ) -> Result<Resource, InventoryError> {
        let current = self.get(kind, name).await?;
        let patched = current.patched(&patch)?;
        let stored = self.repository.upsert(patched).await?;

        tracing::info!(kind = kind.type_name, name = %stored.name, "Resource patched");

        Ok(stored)
    }

    async fn delete(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<(), InventoryError> {
        if !self.repository.delete(kind, name).await? {
            return Err(Self::not_found(kind, name));
        }

        tracing::info!(kind = kind.type_name, name = %name, "Resource deleted");

        Ok(())
    }

    async fn import_distro(&self, paths: Vec<String>) -> Result<Vec<Resource>, InventoryError> {
        let paths: Vec<String> = paths
            .into_iter()
            .map(|path| path.trim().to_string())
            .filter(|path| !path.is_empty())
            .collect();

        if paths.is_empty() {
            return Err(InventoryError::NoImagePaths);
        }

        let copied = self.provisioning.copy_installation_media(&paths).await?;

        tracing::info!(paths = ?paths, trees = copied.len(), "Installation media copied");

        let mut distros = BTreeMap::new();
        for media in &copied {
            let distro = self.record_distro(media).await?;
            distros.insert(distro.name.clone(), distro);
        }

        Ok(distros.into_values().collect())
    }
}
