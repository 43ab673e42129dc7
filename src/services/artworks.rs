use crate::auth::AuthSession;
use crate::db::models::{Artwork, ArtworkPatch, Category, NewArtwork};
use crate::db::store::ArtworkStore;
use crate::services::delete_flow::DeleteAllToken;
use crate::services::error::ServiceError;
use crate::storage::gateway::{StorageGateway, UploadFile};
use crate::storage::object_store::ObjectStore;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// CRUD service for gallery artworks. Owns the mapping between admin
/// intent and the store/gateway pair; creation and bulk deletion are
/// scoped to the authenticated session.
pub struct ArtworkService<D: ArtworkStore, S: ObjectStore> {
    store: D,
    gateway: Arc<StorageGateway<S>>,
    session: Option<AuthSession>,
}

impl<D: ArtworkStore, S: ObjectStore> ArtworkService<D, S> {
    pub fn new(store: D, gateway: Arc<StorageGateway<S>>, session: Option<AuthSession>) -> Self {
        ArtworkService {
            store,
            gateway,
            session,
        }
    }

    fn require_session(&self) -> Result<AuthSession, ServiceError> {
        self.session.ok_or(ServiceError::Auth)
    }

    pub async fn list(&self) -> Result<Vec<Artwork>, ServiceError> {
        Ok(self.store.list().await?)
    }

    /// Homepage listing: artwork_number ascending, unnumbered last.
    pub async fn featured(&self) -> Result<Vec<Artwork>, ServiceError> {
        Ok(self.store.list_featured().await?)
    }

    /// `None` means the "All" filter.
    pub async fn by_category(
        &self,
        category: Option<Category>,
    ) -> Result<Vec<Artwork>, ServiceError> {
        match category {
            Some(category) => Ok(self.store.list_by_category(category).await?),
            None => Ok(self.store.list().await?),
        }
    }

    pub async fn get(&self, id: Uuid) -> Result<Artwork, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    /// Create an artwork row. The owner is taken from the session; the
    /// caller never supplies one.
    pub async fn create(&self, artwork: NewArtwork) -> Result<Uuid, ServiceError> {
        let session = self.require_session()?;
        validate_new(&artwork)?;
        let id = self.store.insert(session.user_id, artwork).await?;
        info!("Created artwork {}", id);
        Ok(id)
    }

    /// Upload the image first, then create the row referencing it.
    pub async fn create_with_image(
        &self,
        file: UploadFile,
        mut artwork: NewArtwork,
    ) -> Result<Uuid, ServiceError> {
        let session = self.require_session()?;
        validate_new(&artwork)?;
        let uploaded = self.gateway.upload_image(file, session.user_id).await?;
        artwork.image_url = Some(uploaded.url);
        artwork.image_path = Some(uploaded.path);
        let id = self.store.insert(session.user_id, artwork).await?;
        info!("Created artwork {} with uploaded image", id);
        Ok(id)
    }

    pub async fn update(&self, id: Uuid, patch: ArtworkPatch) -> Result<(), ServiceError> {
        validate_patch(&patch)?;
        Ok(self.store.update(id, patch).await?)
    }

    /// Replace an artwork's image: upload the new object, point the row
    /// at it, then drop the old object. The old object is only deleted
    /// after the row references the new one, so a crash in between
    /// leaks a blob rather than dangling a URL.
    pub async fn replace_image(&self, id: Uuid, file: UploadFile) -> Result<(), ServiceError> {
        let session = self.require_session()?;
        let old_path = self.store.get(id).await?.image_path;

        let uploaded = self.gateway.upload_image(file, session.user_id).await?;
        self.store
            .update(
                id,
                ArtworkPatch {
                    image_url: Some(uploaded.url),
                    image_path: Some(uploaded.path),
                    ..Default::default()
                },
            )
            .await?;

        if let Some(old_path) = old_path {
            if let Err(e) = self.gateway.delete_image(&old_path).await {
                warn!("Failed to delete replaced image {}: {}", old_path, e);
            }
        }
        Ok(())
    }

    /// Delete one artwork. The storage object is freed first; if that
    /// fails the row is still deleted and the failure is only logged.
    /// A row deletion failure propagates.
    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        let artwork = self.store.get(id).await?;

        if let Some(path) = &artwork.image_path {
            if let Err(e) = self.gateway.delete_image(path).await {
                warn!("Failed to delete image {} for artwork {}: {}", path, id, e);
            }
        }

        self.store.delete(id).await?;
        info!("Deleted artwork {}", id);
        Ok(())
    }

    /// Delete every artwork owned by the current user. Requires a
    /// [`DeleteAllToken`] from the two-step confirmation flow. Storage
    /// objects are intentionally not purged.
    pub async fn delete_all(&self, _token: DeleteAllToken) -> Result<(), ServiceError> {
        let session = self.require_session()?;
        self.store.delete_all_owned(session.user_id).await?;
        info!("Deleted all artworks owned by {}", session.user_id);
        Ok(())
    }
}

fn validate_new(artwork: &NewArtwork) -> Result<(), ServiceError> {
    if artwork.title.trim().is_empty() {
        return Err(ServiceError::Validation("title is required".to_string()));
    }
    if artwork.artist.trim().is_empty() {
        return Err(ServiceError::Validation("artist is required".to_string()));
    }
    if matches!(artwork.artwork_number, Some(n) if n <= 0) {
        return Err(ServiceError::Validation(
            "artwork number must be a positive integer".to_string(),
        ));
    }
    if artwork.image_url.is_some() != artwork.image_path.is_some() {
        return Err(ServiceError::Validation(
            "image URL and storage path must be set together".to_string(),
        ));
    }
    Ok(())
}

fn validate_patch(patch: &ArtworkPatch) -> Result<(), ServiceError> {
    if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
        return Err(ServiceError::Validation("title cannot be empty".to_string()));
    }
    if matches!(&patch.artist, Some(a) if a.trim().is_empty()) {
        return Err(ServiceError::Validation(
            "artist cannot be empty".to_string(),
        ));
    }
    if matches!(patch.artwork_number, Some(Some(n)) if n <= 0) {
        return Err(ServiceError::Validation(
            "artwork number must be a positive integer".to_string(),
        ));
    }
    Ok(())
}
