use crate::storage::error::StorageError;
use crate::storage::image::{preprocess, PreprocessOptions};
use crate::storage::object_store::ObjectStore;
use anyhow::anyhow;
use bytes::Bytes;
use chrono::Utc;
use rand::{distributions::Alphanumeric, Rng};
use tracing::{debug, info};
use uuid::Uuid;

/// Maximum accepted upload size for artwork assets.
pub const MAX_UPLOAD_BYTES: u64 = 25 * 1024 * 1024;

const ALLOWED_MIME_TYPES: &[&str] = &[
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/webp",
    "image/gif",
];

/// A user-supplied file as it arrives from the admin form.
#[derive(Debug, Clone)]
pub struct UploadFile {
    pub filename: String,
    pub content_type: String,
    pub data: Bytes,
}

/// Handle returned by a successful upload. `path` is the storage key
/// and must be persisted next to `url`; it is the only way to delete
/// the object later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    pub url: String,
    pub path: String,
}

/// Uploads and deletes image objects in the site bucket. No caching,
/// no retry; transient failures surface to the caller.
pub struct StorageGateway<S: ObjectStore> {
    store: S,
    options: PreprocessOptions,
}

impl<S: ObjectStore> StorageGateway<S> {
    pub fn new(store: S) -> Self {
        StorageGateway {
            store,
            options: PreprocessOptions::default(),
        }
    }

    pub fn with_options(store: S, options: PreprocessOptions) -> Self {
        StorageGateway { store, options }
    }

    /// Enforce the MIME allow-list and size cap. Must pass before any
    /// preprocessing or upload is attempted.
    pub fn validate(file: &UploadFile) -> Result<(), StorageError> {
        if !ALLOWED_MIME_TYPES.contains(&file.content_type.as_str()) {
            return Err(StorageError::InvalidFileType(file.content_type.clone()));
        }
        let size = file.data.len() as u64;
        if size > MAX_UPLOAD_BYTES {
            return Err(StorageError::FileTooLarge {
                size,
                max: MAX_UPLOAD_BYTES,
            });
        }
        Ok(())
    }

    /// Upload an artwork or CV image under the owner's namespace.
    /// Key layout: `{user_id}/{timestamp}_{random}.jpg`.
    pub async fn upload_image(
        &self,
        file: UploadFile,
        owner: Uuid,
    ) -> Result<UploadedImage, StorageError> {
        let key = format!(
            "{}/{}_{}.jpg",
            owner,
            Utc::now().timestamp_millis(),
            random_suffix()
        );
        self.upload_as(file, key).await
    }

    /// Upload an exhibit ("moment") image. Moments live at the bucket
    /// root with key layout `{random}-{timestamp}.jpg`.
    pub async fn upload_moment_image(
        &self,
        file: UploadFile,
    ) -> Result<UploadedImage, StorageError> {
        let key = format!("{}-{}.jpg", random_suffix(), Utc::now().timestamp_millis());
        self.upload_as(file, key).await
    }

    async fn upload_as(&self, file: UploadFile, key: String) -> Result<UploadedImage, StorageError> {
        Self::validate(&file)?;

        let options = self.options;
        let processed =
            tokio::task::spawn_blocking(move || preprocess(&file.data, &file.filename, options))
                .await
                .map_err(|e| StorageError::Other(anyhow!("preprocess task panicked: {}", e)))??;

        debug!(
            "Preprocessed {} to {}x{} ({} bytes)",
            processed.filename,
            processed.width,
            processed.height,
            processed.data.len()
        );

        self.store
            .put_object(&key, processed.data, processed.content_type)
            .await?;

        info!("Uploaded image {}", key);
        Ok(UploadedImage {
            url: self.store.public_url(&key),
            path: key,
        })
    }

    /// Idempotent delete: a path with no object behind it is treated as
    /// already deleted. Any other failure propagates. An empty path is
    /// a no-op so callers can pass an entity's imagePath unchecked.
    pub async fn delete_image(&self, path: &str) -> Result<(), StorageError> {
        if path.is_empty() {
            return Ok(());
        }
        match self.store.delete_object(path).await {
            Ok(()) => Ok(()),
            Err(StorageError::NotFound(_)) => {
                debug!("Object {} already gone", path);
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

fn random_suffix() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(12)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}
