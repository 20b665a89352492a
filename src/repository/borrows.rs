//! Borrow records repository

use std::sync::Arc;

use crate::{
    error::AppResult,
    models::borrow::BorrowRecord,
    store::{to_document, DocumentStore},
};

#[derive(Clone)]
pub struct BorrowsRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl BorrowsRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &str) -> Self {
        Self {
            store,
            collection: collection.to_string(),
        }
    }

    /// Append a borrow record and return its document id
    pub async fn create(&self, record: &BorrowRecord) -> AppResult<String> {
        let data = to_document(record)?;
        Ok(self.store.insert(&self.collection, data).await?)
    }
}
