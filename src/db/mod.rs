pub mod error;
pub mod fake;
pub mod models;
pub mod postgres;
pub mod store;


pub use error::DatabaseError;
pub use fake::FakeDatabase;
pub use models::{
    Artwork, ArtworkPatch, Category, Exhibit, NewArtwork, NewTimelineEvent, Setting,
    TimelineEvent, TimelineEventPatch, ORDER_INDEX_LAST, SETTING_CV, SETTING_EXHIBITION_DATE,
};
pub use postgres::PostgresDatabase;
pub use store::{ArtworkStore, ExhibitStore, SettingsStore, TimelineStore};
