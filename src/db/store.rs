use crate::db::error::DatabaseError;
use crate::db::models::{
    Artwork, ArtworkPatch, Category, Exhibit, NewArtwork, NewTimelineEvent, Setting,
    TimelineEvent, TimelineEventPatch,
};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// CRUD contract over the artworks table.
///
/// Ordering is part of the contract: `list` and `list_by_category` are
/// newest-first, `list_featured` is artwork_number ascending with
/// unnumbered rows last, ties broken newest-first.
#[async_trait]
pub trait ArtworkStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Artwork>, DatabaseError>;

    async fn list_featured(&self) -> Result<Vec<Artwork>, DatabaseError>;

    async fn list_by_category(&self, category: Category) -> Result<Vec<Artwork>, DatabaseError>;

    /// Fails with [`DatabaseError::NotFound`] when no row matches.
    async fn get(&self, id: Uuid) -> Result<Artwork, DatabaseError>;

    /// Insert a new row owned by `owner` and return its server-assigned id.
    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> Result<Uuid, DatabaseError>;

    /// Apply a partial update; absent fields are left untouched.
    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> Result<(), DatabaseError>;

    /// Row deletion. Deleting an id with no row is not an error.
    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;

    /// Delete every row owned by `owner`.
    async fn delete_all_owned(&self, owner: Uuid) -> Result<(), DatabaseError>;
}

/// CRUD contract over the exhibits ("moments") table, ordered by
/// order_index ascending.
#[async_trait]
pub trait ExhibitStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<Exhibit>, DatabaseError>;

    async fn get(&self, id: Uuid) -> Result<Exhibit, DatabaseError>;

    async fn insert(
        &self,
        image_url: String,
        image_path: String,
        order_index: i32,
    ) -> Result<Uuid, DatabaseError>;

    /// Exhibits are only ever updated by replacing their image.
    async fn update_image(
        &self,
        id: Uuid,
        image_url: String,
        image_path: String,
    ) -> Result<(), DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;
}

/// CRUD contract over the timeline_events table, ordered by the explicit
/// order column ascending. No ownership scoping.
#[async_trait]
pub trait TimelineStore: Send + Sync + 'static {
    async fn list(&self) -> Result<Vec<TimelineEvent>, DatabaseError>;

    async fn get(&self, id: Uuid) -> Result<TimelineEvent, DatabaseError>;

    async fn insert(&self, event: NewTimelineEvent) -> Result<Uuid, DatabaseError>;

    async fn update(&self, id: Uuid, patch: TimelineEventPatch) -> Result<(), DatabaseError>;

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError>;
}

/// Key-value singleton rows. A missing key is a normal "not configured
/// yet" state, hence `Option` rather than an error.
#[async_trait]
pub trait SettingsStore: Send + Sync + 'static {
    async fn get(&self, key: &str) -> Result<Option<Setting>, DatabaseError>;

    async fn upsert(&self, setting: Setting) -> Result<(), DatabaseError>;
}

// Arc pass-throughs so services can share one database handle without
// owning its lifecycle.

#[async_trait]
impl<T: ArtworkStore + ?Sized> ArtworkStore for Arc<T> {
    async fn list(&self) -> Result<Vec<Artwork>, DatabaseError> {
        (**self).list().await
    }

    async fn list_featured(&self) -> Result<Vec<Artwork>, DatabaseError> {
        (**self).list_featured().await
    }

    async fn list_by_category(&self, category: Category) -> Result<Vec<Artwork>, DatabaseError> {
        (**self).list_by_category(category).await
    }

    async fn get(&self, id: Uuid) -> Result<Artwork, DatabaseError> {
        (**self).get(id).await
    }

    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> Result<Uuid, DatabaseError> {
        (**self).insert(owner, artwork).await
    }

    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> Result<(), DatabaseError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        (**self).delete(id).await
    }

    async fn delete_all_owned(&self, owner: Uuid) -> Result<(), DatabaseError> {
        (**self).delete_all_owned(owner).await
    }
}

#[async_trait]
impl<T: ExhibitStore + ?Sized> ExhibitStore for Arc<T> {
    async fn list(&self) -> Result<Vec<Exhibit>, DatabaseError> {
        (**self).list().await
    }

    async fn get(&self, id: Uuid) -> Result<Exhibit, DatabaseError> {
        (**self).get(id).await
    }

    async fn insert(
        &self,
        image_url: String,
        image_path: String,
        order_index: i32,
    ) -> Result<Uuid, DatabaseError> {
        (**self).insert(image_url, image_path, order_index).await
    }

    async fn update_image(
        &self,
        id: Uuid,
        image_url: String,
        image_path: String,
    ) -> Result<(), DatabaseError> {
        (**self).update_image(id, image_url, image_path).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<T: TimelineStore + ?Sized> TimelineStore for Arc<T> {
    async fn list(&self) -> Result<Vec<TimelineEvent>, DatabaseError> {
        (**self).list().await
    }

    async fn get(&self, id: Uuid) -> Result<TimelineEvent, DatabaseError> {
        (**self).get(id).await
    }

    async fn insert(&self, event: NewTimelineEvent) -> Result<Uuid, DatabaseError> {
        (**self).insert(event).await
    }

    async fn update(&self, id: Uuid, patch: TimelineEventPatch) -> Result<(), DatabaseError> {
        (**self).update(id, patch).await
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        (**self).delete(id).await
    }
}

#[async_trait]
impl<T: SettingsStore + ?Sized> SettingsStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Setting>, DatabaseError> {
        (**self).get(key).await
    }

    async fn upsert(&self, setting: Setting) -> Result<(), DatabaseError> {
        (**self).upsert(setting).await
    }
}
