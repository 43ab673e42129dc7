pub mod artworks;
pub mod delete_flow;
pub mod error;
pub mod exhibits;
pub mod settings;
pub mod timeline;

#[cfg(test)]
mod tests;

pub use artworks::ArtworkService;
pub use delete_flow::{DeleteAllFlow, DeleteAllToken};
pub use error::ServiceError;
pub use exhibits::ExhibitService;
pub use settings::{SettingsService, DEFAULT_EXHIBITION_DATE};
pub use timeline::{valid_event_time, TimelineService};
