use crate::storage::error::StorageError;
use async_trait::async_trait;
use bytes::Bytes;
use std::sync::Arc;

/// Interface to the object storage bucket backing image uploads.
///
/// The key returned to callers is the only handle capable of deleting
/// the object later; whoever stores a URL must store the key beside it.
#[async_trait]
pub trait ObjectStore: Send + Sync + 'static {
    /// Write an object under `key`.
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError>;

    /// Remove an object. Fails with [`StorageError::NotFound`] when the
    /// key does not exist; the gateway decides whether that matters.
    async fn delete_object(&self, key: &str) -> Result<(), StorageError>;

    /// Publicly fetchable URL for `key`.
    fn public_url(&self, key: &str) -> String;
}

/// Arc pass-through so one bucket handle can back several gateways.
#[async_trait]
impl<T: ObjectStore + ?Sized> ObjectStore for Arc<T> {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        (**self).put_object(key, data, content_type).await
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete_object(key).await
    }

    fn public_url(&self, key: &str) -> String {
        (**self).public_url(key)
    }
}
