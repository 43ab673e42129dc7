use crate::db::models::{Exhibit, ORDER_INDEX_LAST};
use crate::db::store::ExhibitStore;
use crate::services::error::ServiceError;
use crate::storage::gateway::{StorageGateway, UploadFile};
use crate::storage::object_store::ObjectStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Service for the exhibits ("moments") gallery. Every moment is an
/// image; creating one is an upload, updating one is a replacement.
pub struct ExhibitService<D: ExhibitStore, S: ObjectStore> {
    store: D,
    gateway: Arc<StorageGateway<S>>,
}

impl<D: ExhibitStore, S: ObjectStore> ExhibitService<D, S> {
    pub fn new(store: D, gateway: Arc<StorageGateway<S>>) -> Self {
        ExhibitService { store, gateway }
    }

    pub async fn list(&self) -> Result<Vec<Exhibit>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<Exhibit, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    /// Upload the image and create the record, placed last until the
    /// admin reorders it.
    pub async fn add(&self, file: UploadFile) -> Result<Uuid, ServiceError> {
        let uploaded = self.gateway.upload_moment_image(file).await?;
        let id = self
            .store
            .insert(uploaded.url, uploaded.path, ORDER_INDEX_LAST)
            .await?;
        info!("Added moment {}", id);
        Ok(id)
    }

    /// Swap a moment's image. Upload completes and is referenced by the
    /// row before the old object is deleted; old-object cleanup failure
    /// is logged, not fatal.
    pub async fn replace_image(&self, id: Uuid, file: UploadFile) -> Result<(), ServiceError> {
        let old_path = self.store.get(id).await?.image_path;

        let uploaded = self.gateway.upload_moment_image(file).await?;
        self.store
            .update_image(id, uploaded.url, uploaded.path)
            .await?;

        if let Err(e) = self.gateway.delete_image(&old_path).await {
            warn!("Failed to delete replaced moment image {}: {}", old_path, e);
        }
        Ok(())
    }

    /// Remove the storage object, then the record. Object deletion
    /// failure is logged and does not block record deletion; record
    /// deletion failure propagates.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let exhibit = self.store.get(id).await?;

        if let Err(e) = self.gateway.delete_image(&exhibit.image_path).await {
            warn!(
                "Failed to delete image {} for moment {}: {}",
                exhibit.image_path, id, e
            );
        }

        self.store.delete(id).await?;
        info!("Deleted moment {}", id);
        Ok(())
    }
}
