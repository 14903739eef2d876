use async_trait::async_trait;
use serde_json::Value;

use super::errors::InventoryError;
use super::errors::ProvisioningError;
use super::kinds::ResourceKind;
use super::models::CopiedMedia;
use super::models::Resource;
use super::models::ResourceName;

/// Port for inventory operations, generic over resource kind.
#[async_trait]
pub trait InventoryServicePort: Send + Sync + 'static {
    /// All resources of `kind`, ordered by name.
    ///
    /// # Errors
    /// * `Storage` - Inventory store failed
    async fn list(&self, kind: &'static ResourceKind) -> Result<Vec<Resource>, InventoryError>;

    /// # Errors
    /// * `NotFound` - No resource of `kind` with this name
    /// * `Storage` - Inventory store failed
    async fn get(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<Resource, InventoryError>;

    /// Validate and store a new or overwritten resource.
    ///
    /// # Errors
    /// * `InvalidResource` - Payload failed validation; nothing is stored
    /// * `Storage` - Inventory store failed
    async fn create(
        &self,
        kind: &'static ResourceKind,
        payload: Value,
    ) -> Result<Resource, InventoryError>;

    /// Like `create`, but the payload must name `name`.
    ///
    /// # Errors
    /// * `InvalidResource` - Payload failed validation or names another resource
    /// * `Storage` - Inventory store failed
    async fn replace(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
        payload: Value,
    ) -> Result<Resource, InventoryError>;

    /// Merge-patch an existing resource.
    ///
    /// # Errors
    /// * `NotFound` - No resource of `kind` with this name
    /// * `InvalidResource` - Patched resource failed validation
    /// * `Storage` - Inventory store failed
    async fn patch(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
        patch: Value,
    ) -> Result<Resource, InventoryError>;

    /// # Errors
    /// * `NotFound` - No resource of `kind` with this name
    /// * `Storage` - Inventory store failed
    async fn delete(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<(), InventoryError>;

    /// Copy installation media into the provisioning server and record the
    /// resulting distros.
    ///
    /// A distro that already exists keeps its attributes and gains the new
    /// media directory.
    ///
    /// # Returns
    /// The stored `osdistro` resources, one per distinct distro
    ///
    /// # Errors
    /// * `NoImagePaths` - No non-blank path given; the client is not called
    /// * `Provisioning` - Client command failed
    /// * `InvalidResource` - Copied media does not describe a valid distro
    /// * `Storage` - Inventory store failed
    async fn import_distro(&self, paths: Vec<String>) -> Result<Vec<Resource>, InventoryError>;
}

/// Persistence of inventory resources, keyed by kind and name.
#[async_trait]
pub trait InventoryRepository: Send + Sync + 'static {
    async fn list(&self, kind: &'static ResourceKind) -> Result<Vec<Resource>, InventoryError>;

    async fn find(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<Option<Resource>, InventoryError>;

    /// Insert, or overwrite the attributes of an existing resource.
    async fn upsert(&self, resource: Resource) -> Result<Resource, InventoryError>;

    /// Returns `false` if nothing was deleted.
    async fn delete(
        &self,
        kind: &'static ResourceKind,
        name: &ResourceName,
    ) -> Result<bool, InventoryError>;
}

/// Operational commands against the provisioning infrastructure.
#[async_trait]
pub trait ProvisioningClient: Send + Sync + 'static {
    /// Copy installation media (ISO paths) into the provisioning server,
    /// reporting the media trees it populated.
    async fn copy_installation_media(
        &self,
        paths: &[String],
    ) -> Result<Vec<CopiedMedia>, ProvisioningError>;
}
