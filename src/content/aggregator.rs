use std::sync::{Arc, RwLock};

use crate::db::repository::ContentRepository;
use crate::error::AppError;
use crate::models::content::{Category, ContentItem};

/// Fetch every item across the four categories into one list.
///
/// Categories are visited in fixed order; within a category items come
/// back newest first. Each item is tagged with its source category. Always
/// a full reload — no pagination, no incremental fetch. Any per-category
/// failure aborts the whole aggregation.
pub async fn aggregate(repo: &dyn ContentRepository) -> Result<Vec<ContentItem>, AppError> {
    let mut all = Vec::new();

    for category in Category::ALL {
        let mut items = repo.list_category(category).await?;
        for item in &mut items {
            item.category = category;
        }
        all.append(&mut items);
    }

    Ok(all)
}

/// The latest aggregate snapshot, shared across requests.
///
/// Readers clone an `Arc` to the current snapshot; a refresh swaps the
/// whole list at once. A failed refresh is logged and leaves the previous
/// snapshot in place, so readers never observe a partial aggregate.
pub struct ContentCatalog {
    snapshot: RwLock<Arc<Vec<ContentItem>>>,
}

impl Default for ContentCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentCatalog {
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Arc::new(Vec::new())),
        }
    }

    /// The current aggregate. Cheap; safe to hold across awaits.
    pub fn snapshot(&self) -> Arc<Vec<ContentItem>> {
        self.snapshot.read().unwrap().clone()
    }

    /// Re-run the aggregation and swap the snapshot in.
    ///
    /// On failure the previous snapshot stays readable.
    pub async fn refresh(&self, repo: &dyn ContentRepository) {
        match aggregate(repo).await {
            Ok(items) => {
                tracing::debug!(count = items.len(), "content catalog refreshed");
                *self.snapshot.write().unwrap() = Arc::new(items);
            }
            Err(e) => {
                tracing::warn!("content aggregation failed, keeping previous snapshot: {e}");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{Duration, Utc};
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FlakyRepo {
        fail: AtomicBool,
    }

    impl FlakyRepo {
        fn new() -> Self {
            Self {
                fail: AtomicBool::new(false),
            }
        }
    }

    fn item(id: &str, category: Category, age_days: i64) -> ContentItem {
        ContentItem {
            id: id.to_string(),
            name: Some(id.to_string()),
            title: None,
            content: None,
            url: None,
            uploaded_by: "Prof X".to_string(),
            date: Utc::now() - Duration::days(age_days),
            due_date: None,
            category,
            file_name: None,
            file_url: None,
        }
    }

    #[async_trait]
    impl ContentRepository for FlakyRepo {
        async fn list_category(&self, category: Category) -> Result<Vec<ContentItem>, AppError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(AppError::Database("connection reset".into()));
            }
            Ok(match category {
                Category::Slides => vec![item("s1", category, 2), item("s2", category, 5)],
                Category::Assignments => vec![item("a1", category, 1)],
                Category::Links => vec![],
                Category::Announcements => vec![item("n1", category, 0)],
            })
        }

        async fn insert(&self, _: Category, _: ContentItem) -> Result<(), AppError> {
            unreachable!("aggregation never inserts")
        }

        async fn delete(&self, _: Category, _: &str) -> Result<(), AppError> {
            unreachable!("aggregation never deletes")
        }
    }

    #[tokio::test]
    async fn test_aggregate_tags_and_concatenates_in_category_order() {
        let repo = FlakyRepo::new();
        let all = aggregate(&repo).await.unwrap();

        assert_eq!(all.len(), 4);
        let ids: Vec<&str> = all.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["s1", "s2", "a1", "n1"]);
        assert_eq!(all[0].category, Category::Slides);
        assert_eq!(all[2].category, Category::Assignments);
        assert_eq!(all[3].category, Category::Announcements);
    }

    #[tokio::test]
    async fn test_aggregate_propagates_fetch_errors() {
        let repo = FlakyRepo::new();
        repo.fail.store(true, Ordering::SeqCst);
        assert!(aggregate(&repo).await.is_err());
    }

    #[tokio::test]
    async fn test_failed_refresh_keeps_previous_snapshot() {
        let repo = FlakyRepo::new();
        let catalog = ContentCatalog::new();

        catalog.refresh(&repo).await;
        assert_eq!(catalog.snapshot().len(), 4);

        repo.fail.store(true, Ordering::SeqCst);
        catalog.refresh(&repo).await;
        // Still the old aggregate — degradation is silent.
        assert_eq!(catalog.snapshot().len(), 4);
    }

    #[tokio::test]
    async fn test_empty_catalog_before_first_refresh() {
        let catalog = ContentCatalog::new();
        assert!(catalog.snapshot().is_empty());
    }
}
