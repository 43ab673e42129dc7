use crate::db::models::{NewTimelineEvent, TimelineEvent, TimelineEventPatch};
use crate::db::store::TimelineStore;
use crate::services::error::ServiceError;
use tracing::info;
use uuid::Uuid;

/// Service for the exhibition-day schedule. Pure CRUD over the timeline
/// store plus input validation; no storage involvement.
pub struct TimelineService<D: TimelineStore> {
    store: D,
}

impl<D: TimelineStore> TimelineService<D> {
    pub fn new(store: D) -> Self {
        TimelineService { store }
    }

    pub async fn list(&self) -> Result<Vec<TimelineEvent>, ServiceError> {
        Ok(self.store.list().await?)
    }

    pub async fn get(&self, id: Uuid) -> Result<TimelineEvent, ServiceError> {
        Ok(self.store.get(id).await?)
    }

    pub async fn create(&self, event: NewTimelineEvent) -> Result<Uuid, ServiceError> {
        if event.title.trim().is_empty() {
            return Err(ServiceError::Validation("title is required".to_string()));
        }
        if event.description.trim().is_empty() {
            return Err(ServiceError::Validation(
                "description is required".to_string(),
            ));
        }
        if !valid_event_time(&event.time) {
            return Err(ServiceError::Validation(format!(
                "invalid time '{}', expected HH:MM (24-hour)",
                event.time
            )));
        }
        let id = self.store.insert(event).await?;
        info!("Created timeline event {}", id);
        Ok(id)
    }

    pub async fn update(&self, id: Uuid, patch: TimelineEventPatch) -> Result<(), ServiceError> {
        if matches!(&patch.title, Some(t) if t.trim().is_empty()) {
            return Err(ServiceError::Validation("title cannot be empty".to_string()));
        }
        if matches!(&patch.description, Some(d) if d.trim().is_empty()) {
            return Err(ServiceError::Validation(
                "description cannot be empty".to_string(),
            ));
        }
        if let Some(time) = &patch.time {
            if !valid_event_time(time) {
                return Err(ServiceError::Validation(format!(
                    "invalid time '{}', expected HH:MM (24-hour)",
                    time
                )));
            }
        }
        Ok(self.store.update(id, patch).await?)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), ServiceError> {
        self.store.delete(id).await?;
        info!("Deleted timeline event {}", id);
        Ok(())
    }
}

/// 24-hour `H:MM`/`HH:MM`: hour 0-23 with optional leading zero, minute
/// always two digits 00-59.
pub fn valid_event_time(s: &str) -> bool {
    let Some((hour, minute)) = s.split_once(':') else {
        return false;
    };
    let hour_ok = match hour.len() {
        1 | 2 => hour.bytes().all(|b| b.is_ascii_digit()) && hour.parse::<u32>().is_ok_and(|h| h <= 23),
        _ => false,
    };
    let minute_ok = minute.len() == 2
        && minute.bytes().all(|b| b.is_ascii_digit())
        && minute.parse::<u32>().is_ok_and(|m| m <= 59);
    hour_ok && minute_ok
}
