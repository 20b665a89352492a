//! Books repository

use std::sync::Arc;

use futures::future::try_join_all;
use serde_json::Value;

use super::{delete_all, update_all};
use crate::{
    error::{AppError, AppResult},
    models::book::{Book, BookChanges, BookStatus},
    store::{to_document, DocumentData, DocumentStore, FieldFilter, StoredDocument},
};

pub const CATALOG_CODE_FIELD: &str = "DeweyDec";
pub const STATUS_FIELD: &str = "Status";

/// Status a book carried before a borrow overwrote it
#[derive(Debug, Clone)]
pub struct PreviousStatus {
    pub id: String,
    pub status: Option<Value>,
}

#[derive(Clone)]
pub struct BooksRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl BooksRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &str) -> Self {
        Self {
            store,
            collection: collection.to_string(),
        }
    }

    async fn find_by_dewey_dec(&self, dewey_dec: &str) -> AppResult<Vec<StoredDocument>> {
        let filter = FieldFilter::eq(CATALOG_CODE_FIELD, dewey_dec);
        Ok(self.store.find_many(&self.collection, &filter).await?)
    }

    /// List all books, bodies returned as stored
    pub async fn list(&self) -> AppResult<Vec<DocumentData>> {
        let docs = self.store.list(&self.collection).await?;
        Ok(docs.into_iter().map(|doc| doc.data).collect())
    }

    /// Get the first book carrying a catalog code, body returned as stored
    pub async fn get_by_dewey_dec(&self, dewey_dec: &str) -> AppResult<DocumentData> {
        self.find_by_dewey_dec(dewey_dec)
            .await?
            .into_iter()
            .next()
            .map(|doc| doc.data)
            .ok_or_else(|| AppError::NotFound("Book not found".to_string()))
    }

    /// Create a book and return its document id
    pub async fn create(&self, book: &Book) -> AppResult<String> {
        let data = to_document(book)?;
        Ok(self.store.insert(&self.collection, data).await?)
    }

    /// Update every book carrying a catalog code
    pub async fn update_by_dewey_dec(&self, dewey_dec: &str, changes: &BookChanges) -> AppResult<usize> {
        let docs = self.find_by_dewey_dec(dewey_dec).await?;
        let patch = to_document(changes)?;
        update_all(self.store.as_ref(), &self.collection, &docs, &patch).await
    }

    /// Overwrite the status of every book carrying a catalog code.
    ///
    /// Returns the statuses that were replaced so the caller can undo the
    /// write.
    pub async fn set_status_by_dewey_dec(
        &self,
        dewey_dec: &str,
        status: BookStatus,
    ) -> AppResult<Vec<PreviousStatus>> {
        let docs = self.find_by_dewey_dec(dewey_dec).await?;

        let mut patch = DocumentData::new();
        patch.insert(STATUS_FIELD.to_string(), Value::String(status.to_string()));
        update_all(self.store.as_ref(), &self.collection, &docs, &patch).await?;

        Ok(docs
            .into_iter()
            .map(|doc| PreviousStatus {
                status: doc.data.get(STATUS_FIELD).cloned(),
                id: doc.id,
            })
            .collect())
    }

    /// Put back statuses captured by `set_status_by_dewey_dec`
    pub async fn restore_statuses(&self, previous: &[PreviousStatus]) -> AppResult<()> {
        try_join_all(previous.iter().map(|prev| {
            let mut patch = DocumentData::new();
            patch.insert(
                STATUS_FIELD.to_string(),
                prev.status.clone().unwrap_or(Value::Null),
            );
            self.store.update(&self.collection, &prev.id, patch)
        }))
        .await?;
        Ok(())
    }

    /// Delete every book carrying a catalog code
    pub async fn delete_by_dewey_dec(&self, dewey_dec: &str) -> AppResult<usize> {
        let docs = self.find_by_dewey_dec(dewey_dec).await?;
        delete_all(self.store.as_ref(), &self.collection, &docs).await
    }
}
