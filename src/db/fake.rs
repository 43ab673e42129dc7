use crate::db::error::DatabaseError;
use crate::db::models::{
    Artwork, ArtworkPatch, Category, Exhibit, NewArtwork, NewTimelineEvent, Setting,
    TimelineEvent, TimelineEventPatch,
};
use crate::db::store::{ArtworkStore, ExhibitStore, SettingsStore, TimelineStore};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory implementation of all entity stores for testing. Ordering
/// semantics mirror the SQL implementations exactly.
#[derive(Clone, Default)]
pub struct FakeDatabase {
    artworks: Arc<RwLock<HashMap<Uuid, Artwork>>>,
    exhibits: Arc<RwLock<HashMap<Uuid, Exhibit>>>,
    timeline: Arc<RwLock<HashMap<Uuid, TimelineEvent>>>,
    settings: Arc<RwLock<HashMap<String, Setting>>>,
    failing: Arc<AtomicBool>,
}

impl FakeDatabase {
    pub fn new() -> Self {
        FakeDatabase::default()
    }

    /// When set, every operation fails with a query error. Used to
    /// exercise error propagation paths.
    pub fn fake_set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn fake_add_artwork(&self, artwork: Artwork) {
        let mut artworks = self.artworks.write().unwrap();
        artworks.insert(artwork.id, artwork);
    }

    pub fn fake_artwork_count(&self) -> usize {
        self.artworks.read().unwrap().len()
    }

    fn check_failing(&self) -> Result<(), DatabaseError> {
        if self.failing.load(Ordering::SeqCst) {
            Err(DatabaseError::Query("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

fn newest_first(a: &Artwork, b: &Artwork) -> std::cmp::Ordering {
    b.created_at.cmp(&a.created_at)
}

#[async_trait]
impl ArtworkStore for FakeDatabase {
    async fn list(&self) -> Result<Vec<Artwork>, DatabaseError> {
        self.check_failing()?;
        let artworks = self.artworks.read().unwrap();
        let mut all: Vec<Artwork> = artworks.values().cloned().collect();
        all.sort_by(newest_first);
        Ok(all)
    }

    async fn list_featured(&self) -> Result<Vec<Artwork>, DatabaseError> {
        self.check_failing()?;
        let artworks = self.artworks.read().unwrap();
        let mut featured: Vec<Artwork> =
            artworks.values().filter(|a| a.featured).cloned().collect();
        // artwork_number ascending, unnumbered rows last, ties newest-first
        featured.sort_by(|a, b| match (a.artwork_number, b.artwork_number) {
            (Some(x), Some(y)) => x.cmp(&y).then_with(|| newest_first(a, b)),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => newest_first(a, b),
        });
        Ok(featured)
    }

    async fn list_by_category(&self, category: Category) -> Result<Vec<Artwork>, DatabaseError> {
        self.check_failing()?;
        let artworks = self.artworks.read().unwrap();
        let mut matching: Vec<Artwork> = artworks
            .values()
            .filter(|a| a.category == category)
            .cloned()
            .collect();
        matching.sort_by(newest_first);
        Ok(matching)
    }

    async fn get(&self, id: Uuid) -> Result<Artwork, DatabaseError> {
        self.check_failing()?;
        let artworks = self.artworks.read().unwrap();
        artworks
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("artwork {}", id)))
    }

    async fn insert(&self, owner: Uuid, artwork: NewArtwork) -> Result<Uuid, DatabaseError> {
        self.check_failing()?;
        let id = Uuid::new_v4();
        let now = Utc::now();
        let row = Artwork {
            id,
            title: artwork.title,
            artist: artwork.artist,
            year: artwork.year,
            medium: artwork.medium,
            dimensions: artwork.dimensions,
            description: artwork.description,
            category: artwork.category.unwrap_or(Category::Other),
            price: artwork.price,
            image_url: artwork.image_url,
            image_path: artwork.image_path,
            featured: artwork.featured,
            artwork_number: artwork.artwork_number,
            user_id: owner,
            created_at: now,
            updated_at: now,
        };
        let mut artworks = self.artworks.write().unwrap();
        artworks.insert(id, row);
        Ok(id)
    }

    async fn update(&self, id: Uuid, patch: ArtworkPatch) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut artworks = self.artworks.write().unwrap();
        let artwork = artworks
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("artwork {}", id)))?;

        if let Some(title) = patch.title {
            artwork.title = title;
        }
        if let Some(artist) = patch.artist {
            artwork.artist = artist;
        }
        if let Some(year) = patch.year {
            artwork.year = Some(year);
        }
        if let Some(medium) = patch.medium {
            artwork.medium = Some(medium);
        }
        if let Some(dimensions) = patch.dimensions {
            artwork.dimensions = Some(dimensions);
        }
        if let Some(description) = patch.description {
            artwork.description = Some(description);
        }
        if let Some(category) = patch.category {
            artwork.category = category;
        }
        if let Some(price) = patch.price {
            artwork.price = Some(price);
        }
        if let Some(image_url) = patch.image_url {
            artwork.image_url = Some(image_url);
        }
        if let Some(image_path) = patch.image_path {
            artwork.image_path = Some(image_path);
        }
        if let Some(featured) = patch.featured {
            artwork.featured = featured;
        }
        if let Some(artwork_number) = patch.artwork_number {
            artwork.artwork_number = artwork_number;
        }
        artwork.updated_at = Utc::now();
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut artworks = self.artworks.write().unwrap();
        artworks.remove(&id);
        Ok(())
    }

    async fn delete_all_owned(&self, owner: Uuid) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut artworks = self.artworks.write().unwrap();
        artworks.retain(|_, a| a.user_id != owner);
        Ok(())
    }
}

#[async_trait]
impl ExhibitStore for FakeDatabase {
    async fn list(&self) -> Result<Vec<Exhibit>, DatabaseError> {
        self.check_failing()?;
        let exhibits = self.exhibits.read().unwrap();
        let mut all: Vec<Exhibit> = exhibits.values().cloned().collect();
        all.sort_by(|a, b| {
            a.order_index
                .cmp(&b.order_index)
                .then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> Result<Exhibit, DatabaseError> {
        self.check_failing()?;
        let exhibits = self.exhibits.read().unwrap();
        exhibits
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("exhibit {}", id)))
    }

    async fn insert(
        &self,
        image_url: String,
        image_path: String,
        order_index: i32,
    ) -> Result<Uuid, DatabaseError> {
        self.check_failing()?;
        let id = Uuid::new_v4();
        let exhibit = Exhibit {
            id,
            image_url,
            image_path,
            order_index,
            created_at: Utc::now(),
        };
        let mut exhibits = self.exhibits.write().unwrap();
        exhibits.insert(id, exhibit);
        Ok(id)
    }

    async fn update_image(
        &self,
        id: Uuid,
        image_url: String,
        image_path: String,
    ) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut exhibits = self.exhibits.write().unwrap();
        let exhibit = exhibits
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("exhibit {}", id)))?;
        exhibit.image_url = image_url;
        exhibit.image_path = image_path;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut exhibits = self.exhibits.write().unwrap();
        exhibits.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl TimelineStore for FakeDatabase {
    async fn list(&self) -> Result<Vec<TimelineEvent>, DatabaseError> {
        self.check_failing()?;
        let timeline = self.timeline.read().unwrap();
        let mut all: Vec<TimelineEvent> = timeline.values().cloned().collect();
        all.sort_by_key(|e| e.order);
        Ok(all)
    }

    async fn get(&self, id: Uuid) -> Result<TimelineEvent, DatabaseError> {
        self.check_failing()?;
        let timeline = self.timeline.read().unwrap();
        timeline
            .get(&id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("timeline event {}", id)))
    }

    async fn insert(&self, event: NewTimelineEvent) -> Result<Uuid, DatabaseError> {
        self.check_failing()?;
        let id = Uuid::new_v4();
        let row = TimelineEvent {
            id,
            time: event.time,
            title: event.title,
            description: event.description,
            order: event.order,
        };
        let mut timeline = self.timeline.write().unwrap();
        timeline.insert(id, row);
        Ok(id)
    }

    async fn update(&self, id: Uuid, patch: TimelineEventPatch) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut timeline = self.timeline.write().unwrap();
        let event = timeline
            .get_mut(&id)
            .ok_or_else(|| DatabaseError::NotFound(format!("timeline event {}", id)))?;
        if let Some(time) = patch.time {
            event.time = time;
        }
        if let Some(title) = patch.title {
            event.title = title;
        }
        if let Some(description) = patch.description {
            event.description = description;
        }
        if let Some(order) = patch.order {
            event.order = order;
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), DatabaseError> {
        self.check_failing()?;
        let mut timeline = self.timeline.write().unwrap();
        timeline.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl SettingsStore for FakeDatabase {
    async fn get(&self, key: &str) -> Result<Option<Setting>, DatabaseError> {
        self.check_failing()?;
        let settings = self.settings.read().unwrap();
        Ok(settings.get(key).cloned())
    }

    async fn upsert(&self, mut setting: Setting) -> Result<(), DatabaseError> {
        self.check_failing()?;
        setting.updated_at = Utc::now();
        let mut settings = self.settings.write().unwrap();
        settings.insert(setting.key.clone(), setting);
        Ok(())
    }
}
