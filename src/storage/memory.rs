use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::error::AppError;
use crate::storage::client::StorageClient;

/// In-memory blob store for demo mode and tests.
#[derive(Default)]
pub struct MemoryStorageClient {
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStorageClient {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StorageClient for MemoryStorageClient {
    async fn put_object(&self, key: &str, content: Vec<u8>) -> Result<(), AppError> {
        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), content);
        Ok(())
    }

    async fn get_object(&self, key: &str) -> Result<Option<Vec<u8>>, AppError> {
        Ok(self.objects.lock().unwrap().get(key).cloned())
    }
}
