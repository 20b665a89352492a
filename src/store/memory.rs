//! In-memory document store, ordered by insertion

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{DocumentData, DocumentStore, FieldFilter, StoreError, StoreResult, StoredDocument};

type Collection = IndexMap<String, DocumentData>;

#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    collections: Arc<RwLock<HashMap<String, Collection>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents in a collection
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(|c| c.len())
            .unwrap_or(0)
    }
}

fn stored(id: &str, data: &DocumentData) -> StoredDocument {
    StoredDocument {
        id: id.to_string(),
        data: data.clone(),
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| docs.iter().map(|(id, data)| stored(id, data)).collect())
            .unwrap_or_default())
    }

    async fn find_many(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<StoredDocument>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|(_, data)| filter.matches(data))
                    .map(|(id, data)| stored(id, data))
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn insert(&self, collection: &str, data: DocumentData) -> StoreResult<String> {
        let id = Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), data);
        Ok(id)
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(id))
            .ok_or_else(|| StoreError::DocumentNotFound {
                collection: collection.to_string(),
                id: id.to_string(),
            })?;
        doc.extend(patch);
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        if let Some(docs) = self.collections.write().await.get_mut(collection) {
            docs.shift_remove(id);
        }
        Ok(())
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("Memory store closed");
    }
}
