use crate::auth::AuthSession;
use crate::db::models::{Setting, SETTING_CV, SETTING_EXHIBITION_DATE};
use crate::db::store::SettingsStore;
use crate::services::error::ServiceError;
use crate::storage::gateway::{StorageGateway, UploadFile};
use crate::storage::object_store::ObjectStore;
use chrono::Utc;
use std::sync::Arc;
use tracing::{info, warn};

/// Shown until the admin sets an exhibition date of their own.
pub const DEFAULT_EXHIBITION_DATE: &str = "9 January 2026";

/// Service over the settings key-value rows: the CV image and the
/// exhibition date text.
pub struct SettingsService<D: SettingsStore, S: ObjectStore> {
    store: D,
    gateway: Arc<StorageGateway<S>>,
    session: Option<AuthSession>,
}

impl<D: SettingsStore, S: ObjectStore> SettingsService<D, S> {
    pub fn new(store: D, gateway: Arc<StorageGateway<S>>, session: Option<AuthSession>) -> Self {
        SettingsService {
            store,
            gateway,
            session,
        }
    }

    fn require_session(&self) -> Result<AuthSession, ServiceError> {
        self.session.ok_or(ServiceError::Auth)
    }

    /// The current CV image setting, or `None` when no CV was uploaded yet.
    pub async fn cv(&self) -> Result<Option<Setting>, ServiceError> {
        Ok(self.store.get(SETTING_CV).await?)
    }

    /// Upload a new CV image and point the setting row at it. The old
    /// object is deleted only after the row references the new one, and
    /// its cleanup failure is logged, not fatal.
    pub async fn set_cv(&self, file: UploadFile) -> Result<(), ServiceError> {
        let session = self.require_session()?;
        let old_path = self
            .store
            .get(SETTING_CV)
            .await?
            .and_then(|s| s.image_path);

        let uploaded = self.gateway.upload_image(file, session.user_id).await?;
        self.store
            .upsert(Setting {
                key: SETTING_CV.to_string(),
                image_url: Some(uploaded.url),
                image_path: Some(uploaded.path),
                updated_at: Utc::now(),
                user_id: Some(session.user_id),
            })
            .await?;
        info!("Updated CV image");

        if let Some(old_path) = old_path {
            if let Err(e) = self.gateway.delete_image(&old_path).await {
                warn!("Failed to delete replaced CV image {}: {}", old_path, e);
            }
        }
        Ok(())
    }

    /// Exhibition date display text, falling back to the built-in default
    /// when the row is absent or empty.
    pub async fn exhibition_date(&self) -> Result<String, ServiceError> {
        let stored = self
            .store
            .get(SETTING_EXHIBITION_DATE)
            .await?
            .and_then(|s| s.image_url)
            .filter(|v| !v.trim().is_empty());
        Ok(stored.unwrap_or_else(|| DEFAULT_EXHIBITION_DATE.to_string()))
    }

    /// Free-text date; the row's value column holds the text directly.
    pub async fn set_exhibition_date(&self, text: &str) -> Result<(), ServiceError> {
        let session = self.require_session()?;
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::Validation(
                "exhibition date cannot be empty".to_string(),
            ));
        }
        self.store
            .upsert(Setting {
                key: SETTING_EXHIBITION_DATE.to_string(),
                image_url: Some(text.to_string()),
                image_path: None,
                updated_at: Utc::now(),
                user_id: Some(session.user_id),
            })
            .await?;
        info!("Updated exhibition date");
        Ok(())
    }
}
