use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// New exhibits are placed last until the admin reorders them.
pub const ORDER_INDEX_LAST: i32 = 1_000_000;

/// Settings row key for the CV/resume image.
pub const SETTING_CV: &str = "cv";
/// Settings row key for the exhibition date string. The date text is
/// stored in the generic `image_url` value column.
pub const SETTING_EXHIBITION_DATE: &str = "exhibition_date";

/// Fixed category set for gallery filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Abstract,
    Contemporary,
    Nature,
    Portrait,
    Landscape,
    StillLife,
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Abstract => "Abstract",
            Category::Contemporary => "Contemporary",
            Category::Nature => "Nature",
            Category::Portrait => "Portrait",
            Category::Landscape => "Landscape",
            Category::StillLife => "Still Life",
            Category::Other => "Other",
        }
    }

    /// Lossy wire decoding: anything outside the fixed set reads as Other,
    /// so legacy rows with free-text categories stay listable.
    pub fn from_wire(s: &str) -> Category {
        match s {
            "Abstract" => Category::Abstract,
            "Contemporary" => Category::Contemporary,
            "Nature" => Category::Nature,
            "Portrait" => Category::Portrait,
            "Landscape" => Category::Landscape,
            "Still Life" => Category::StillLife,
            _ => Category::Other,
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A gallery item as the application sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Artwork {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub category: Category,
    /// Free text; may hold labels like "Sold".
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub featured: bool,
    pub artwork_number: Option<i32>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating an artwork. The owner comes from the
/// session, never from this struct.
#[derive(Debug, Clone, Default)]
pub struct NewArtwork {
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub featured: bool,
    pub artwork_number: Option<i32>,
}

/// Partial update: `None` leaves the column untouched. `artwork_number`
/// is doubly optional so the display number can be cleared explicitly.
#[derive(Debug, Clone, Default)]
pub struct ArtworkPatch {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub year: Option<i32>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub category: Option<Category>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub featured: Option<bool>,
    pub artwork_number: Option<Option<i32>>,
}

impl ArtworkPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.artist.is_none()
            && self.year.is_none()
            && self.medium.is_none()
            && self.dimensions.is_none()
            && self.description.is_none()
            && self.category.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.image_path.is_none()
            && self.featured.is_none()
            && self.artwork_number.is_none()
    }
}

/// A standalone gallery photo in the exhibits ("moments") section.
/// Always carries an image; there is no text-only exhibit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Exhibit {
    pub id: Uuid,
    pub image_url: String,
    pub image_path: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

/// An entry in the exhibition-day schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineEvent {
    pub id: Uuid,
    /// Canonical `HH:MM`, 24-hour.
    pub time: String,
    pub title: String,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct NewTimelineEvent {
    pub time: String,
    pub title: String,
    pub description: String,
    pub order: i32,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineEventPatch {
    pub time: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub order: Option<i32>,
}

/// Key-value singleton row. The `image_url` column doubles as a generic
/// value slot for non-image settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Setting {
    pub key: String,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

// ---------------------------------------------------------------------------
// Wire rows. Each table has an explicit snake_case row struct and typed
// conversions in both directions, so the mapping is testable in isolation.
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, FromRow)]
pub struct ArtworkRow {
    pub id: Uuid,
    pub title: String,
    pub artist: String,
    pub year: Option<i32>,
    pub medium: Option<String>,
    pub dimensions: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub price: Option<String>,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub featured: bool,
    pub artwork_number: Option<i32>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArtworkRow> for Artwork {
    fn from(row: ArtworkRow) -> Self {
        Artwork {
            id: row.id,
            title: row.title,
            artist: row.artist,
            year: row.year,
            medium: row.medium,
            dimensions: row.dimensions,
            description: row.description,
            category: row
                .category
                .as_deref()
                .map_or(Category::Other, Category::from_wire),
            price: row.price,
            image_url: row.image_url,
            image_path: row.image_path,
            featured: row.featured,
            artwork_number: row.artwork_number,
            user_id: row.user_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<Artwork> for ArtworkRow {
    fn from(a: Artwork) -> Self {
        ArtworkRow {
            id: a.id,
            title: a.title,
            artist: a.artist,
            year: a.year,
            medium: a.medium,
            dimensions: a.dimensions,
            description: a.description,
            category: Some(a.category.as_str().to_string()),
            price: a.price,
            image_url: a.image_url,
            image_path: a.image_path,
            featured: a.featured,
            artwork_number: a.artwork_number,
            user_id: a.user_id,
            created_at: a.created_at,
            updated_at: a.updated_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ExhibitRow {
    pub id: Uuid,
    pub image_url: String,
    pub image_path: String,
    pub order_index: i32,
    pub created_at: DateTime<Utc>,
}

impl From<ExhibitRow> for Exhibit {
    fn from(row: ExhibitRow) -> Self {
        Exhibit {
            id: row.id,
            image_url: row.image_url,
            image_path: row.image_path,
            order_index: row.order_index,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct TimelineEventRow {
    pub id: Uuid,
    pub time: String,
    pub title: String,
    pub description: String,
    pub order: i32,
}

impl From<TimelineEventRow> for TimelineEvent {
    fn from(row: TimelineEventRow) -> Self {
        TimelineEvent {
            id: row.id,
            time: row.time,
            title: row.title,
            description: row.description,
            order: row.order,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct SettingRow {
    pub key: String,
    pub image_url: Option<String>,
    pub image_path: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub user_id: Option<Uuid>,
}

impl From<SettingRow> for Setting {
    fn from(row: SettingRow) -> Self {
        Setting {
            key: row.key,
            image_url: row.image_url,
            image_path: row.image_path,
            updated_at: row.updated_at,
            user_id: row.user_id,
        }
    }
}
