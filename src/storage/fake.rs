use crate::storage::error::StorageError;
use crate::storage::object_store::ObjectStore;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// `FakeObjectStore` is an in-memory implementation of the `ObjectStore`
/// trait for testing, with hooks to simulate write and delete failures.
#[derive(Clone, Default)]
pub struct FakeObjectStore {
    objects: Arc<Mutex<HashMap<String, (Bytes, String)>>>,
    fail_puts: Arc<AtomicBool>,
    fail_deletes: Arc<AtomicBool>,
}

impl FakeObjectStore {
    pub fn new() -> Self {
        FakeObjectStore::default()
    }

    /// After this, every put_object fails with a write error.
    pub fn fake_fail_puts(&self, fail: bool) {
        self.fail_puts.store(fail, Ordering::SeqCst);
    }

    /// After this, every delete_object fails with a non-NotFound error.
    pub fn fake_fail_deletes(&self, fail: bool) {
        self.fail_deletes.store(fail, Ordering::SeqCst);
    }

    pub fn fake_object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    pub fn fake_has_object(&self, key: &str) -> bool {
        self.objects.lock().unwrap().contains_key(key)
    }

    pub fn fake_content_type(&self, key: &str) -> Option<String> {
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .map(|(_, ct)| ct.clone())
    }
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn put_object(
        &self,
        key: &str,
        data: Bytes,
        content_type: &str,
    ) -> Result<(), StorageError> {
        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(StorageError::Write(
                key.to_string(),
                "injected failure".to_string(),
            ));
        }
        let mut objects = self.objects.lock().unwrap();
        objects.insert(key.to_string(), (data, content_type.to_string()));
        Ok(())
    }

    async fn delete_object(&self, key: &str) -> Result<(), StorageError> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Err(StorageError::Delete(
                key.to_string(),
                "injected failure".to_string(),
            ));
        }
        let mut objects = self.objects.lock().unwrap();
        if objects.remove(key).is_some() {
            Ok(())
        } else {
            Err(StorageError::NotFound(key.to_string()))
        }
    }

    fn public_url(&self, key: &str) -> String {
        format!("https://fake.storage.test/{}", key)
    }
}
