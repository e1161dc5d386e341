//! Title-keyed article storage.

use crate::error::StoreError;
use crate::storage::KvStore;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// A stored title/content pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContentItem {
    pub title: String,
    pub content: String,
}

impl ContentItem {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}

/// Articles keyed by title. Titles are unique; `create` never overwrites.
#[derive(Clone)]
pub struct ContentStore {
    records: Arc<dyn KvStore<String>>,
}

impl ContentStore {
    pub fn new(records: Arc<dyn KvStore<String>>) -> Self {
        Self { records }
    }

    /// # Errors
    ///
    /// Returns the store error if the lookup fails.
    pub fn get_by_title(&self, title: &str) -> Result<Option<ContentItem>, StoreError> {
        Ok(self
            .records
            .get(title)?
            .map(|content| ContentItem::new(title, content)))
    }

    /// Every stored item, in the substrate's iteration order.
    ///
    /// # Errors
    ///
    /// Returns the store error if the snapshot fails.
    pub fn list_all(&self) -> Result<Vec<ContentItem>, StoreError> {
        Ok(self
            .records
            .entries()?
            .into_iter()
            .map(|(title, content)| ContentItem { title, content })
            .collect())
    }

    /// Insert a new item. Returns `false` and leaves the store untouched
    /// when `title` already exists.
    ///
    /// # Errors
    ///
    /// Returns the store error if the insert cannot be persisted.
    pub fn create(&self, title: &str, content: &str) -> Result<bool, StoreError> {
        let created = self.records.insert_new(title, content.to_string())?;
        if created {
            info!(title = %title, content_len = content.len(), "Text created");
        } else {
            debug!(title = %title, "Text already exists");
        }
        Ok(created)
    }

    /// Remove an item. Not reachable from any route.
    ///
    /// # Errors
    ///
    /// Returns the store error if the removal cannot be persisted.
    pub fn delete(&self, title: &str) -> Result<bool, StoreError> {
        self.records.delete(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn store() -> ContentStore {
        ContentStore::new(Arc::new(MemoryStore::new()))
    }

    #[test]
    fn test_create_rejects_duplicate_title_without_overwrite() {
        let texts = store();
        assert!(texts.create("Alpha", "Hello").unwrap());
        assert!(!texts.create("Alpha", "World").unwrap());
        assert_eq!(
            texts.get_by_title("Alpha").unwrap(),
            Some(ContentItem::new("Alpha", "Hello"))
        );
    }

    #[test]
    fn test_empty_content_is_still_an_item() {
        let texts = store();
        assert!(texts.create("Blank", "").unwrap());
        assert_eq!(
            texts.get_by_title("Blank").unwrap(),
            Some(ContentItem::new("Blank", ""))
        );
    }

    #[test]
    fn test_delete_then_recreate() {
        let texts = store();
        texts.create("Alpha", "one").unwrap();
        assert!(texts.delete("Alpha").unwrap());
        assert!(texts.list_all().unwrap().is_empty());
        assert!(texts.create("Alpha", "two").unwrap());
    }
}
