use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::db::repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::{Category, ContentItem};

/// In-memory implementation of the ContentRepository.
///
/// Backs demo mode (`DEMO_MODE=true`) and the integration tests; nothing
/// survives a restart.
#[derive(Default)]
pub struct MemoryContentRepository {
    items: Mutex<HashMap<Category, Vec<ContentItem>>>,
}

impl MemoryContentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for MemoryContentRepository {
    async fn list_category(&self, category: Category) -> Result<Vec<ContentItem>, AppError> {
        let items = self.items.lock().unwrap();
        let mut listed = items.get(&category).cloned().unwrap_or_default();
        listed.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(listed)
    }

    async fn insert(&self, category: Category, item: ContentItem) -> Result<(), AppError> {
        self.items
            .lock()
            .unwrap()
            .entry(category)
            .or_default()
            .push(item);
        Ok(())
    }

    async fn delete(&self, category: Category, id: &str) -> Result<(), AppError> {
        let mut items = self.items.lock().unwrap();
        let bucket = items.entry(category).or_default();
        let before = bucket.len();
        bucket.retain(|item| item.id != id);
        if bucket.len() == before {
            return Err(AppError::NotFound(format!(
                "No item '{}' in {}",
                id, category
            )));
        }
        Ok(())
    }
}
