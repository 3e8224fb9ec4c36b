use async_trait::async_trait;

use crate::error::AppError;
use crate::models::content::{Category, ContentItem};

/// Repository trait for portal content.
///
/// One backing collection per category. This trait is the single seam to
/// the row store, so demo mode and tests can swap in an in-memory
/// implementation.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    /// List every item in a category, newest first.
    async fn list_category(&self, category: Category) -> Result<Vec<ContentItem>, AppError>;

    /// Insert a new item into its category.
    async fn insert(&self, category: Category, item: ContentItem) -> Result<(), AppError>;

    /// Delete an item by id. Fails with `NotFound` if no such item exists.
    async fn delete(&self, category: Category, id: &str) -> Result<(), AppError>;
}

/// MongoDB implementation of the ContentRepository.
pub struct MongoContentRepository {
    db: mongodb::Database,
}

impl MongoContentRepository {
    pub fn new(db: mongodb::Database) -> Self {
        Self { db }
    }

    fn collection(&self, category: Category) -> mongodb::Collection<ContentItem> {
        self.db.collection(category.as_str())
    }
}

#[async_trait]
impl ContentRepository for MongoContentRepository {
    async fn list_category(&self, category: Category) -> Result<Vec<ContentItem>, AppError> {
        use mongodb::bson::doc;
        use mongodb::options::FindOptions;

        // `date` is stored as an RFC 3339 UTC string, so a lexicographic
        // descending sort is a chronological one.
        let options = FindOptions::builder().sort(doc! { "date": -1 }).build();

        let mut cursor = self
            .collection(category)
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        let mut items = Vec::new();
        use futures::TryStreamExt;
        while let Some(item) = cursor
            .try_next()
            .await
            .map_err(|e| AppError::Database(e.to_string()))?
        {
            items.push(item);
        }

        Ok(items)
    }

    async fn insert(&self, category: Category, item: ContentItem) -> Result<(), AppError> {
        self.collection(category)
            .insert_one(&item)
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, category: Category, id: &str) -> Result<(), AppError> {
        use mongodb::bson::doc;

        let result = self
            .collection(category)
            .delete_one(doc! { "id": id })
            .await
            .map_err(|e| AppError::Database(e.to_string()))?;

        if result.deleted_count == 0 {
            return Err(AppError::NotFound(format!(
                "No item '{}' in {}",
                id, category
            )));
        }

        Ok(())
    }
}
