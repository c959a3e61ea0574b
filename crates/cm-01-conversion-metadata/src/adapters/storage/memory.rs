use std::collections::HashMap;

use parking_lot::RwLock;

use crate::domain::errors::RepositoryError;
use crate::domain::item::MetadataItem;
use crate::ports::outbound::MetadataRepository;

/// In-memory metadata table for tests and embedded hosts.
///
/// Each `put_item` replaces the whole item, like a store-level put.
#[derive(Default)]
pub struct InMemoryMetadataRepository {
    items: RwLock<HashMap<String, MetadataItem>>,
}

impl InMemoryMetadataRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored items.
    pub fn len(&self) -> usize {
        self.items.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.read().is_empty()
    }
}

impl MetadataRepository for InMemoryMetadataRepository {
    fn put_item(&self, id: &str, item: MetadataItem) -> Result<(), RepositoryError> {
        self.items.write().insert(id.to_string(), item);
        Ok(())
    }

    fn get_item(&self, id: &str) -> Result<Option<MetadataItem>, RepositoryError> {
        Ok(self.items.read().get(id).cloned())
    }

    fn scan(&self) -> Result<Vec<MetadataItem>, RepositoryError> {
        Ok(self.items.read().values().cloned().collect())
    }
}
