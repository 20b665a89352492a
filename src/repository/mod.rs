//! Repository layer for document collections
//!
//! Every lookup is `find_many(filter)` followed by one mutation per
//! returned document. Mutations run concurrently and are all awaited
//! before the caller gets control back; there is no rollback when one of
//! them fails.

pub mod books;
pub mod borrows;
pub mod students;

use std::sync::Arc;

use futures::future::try_join_all;

use crate::{
    config::CollectionsConfig,
    error::AppResult,
    store::{DocumentData, DocumentStore, StoredDocument},
};

/// Main repository struct holding the injected document store
#[derive(Clone)]
pub struct Repository {
    pub books: books::BooksRepository,
    pub borrows: borrows::BorrowsRepository,
    pub students: students::StudentsRepository,
}

impl Repository {
    /// Create a new repository over the given store
    pub fn new(store: Arc<dyn DocumentStore>, collections: &CollectionsConfig) -> Self {
        Self {
            books: books::BooksRepository::new(store.clone(), &collections.books),
            borrows: borrows::BorrowsRepository::new(store.clone(), &collections.borrows),
            students: students::StudentsRepository::new(store, &collections.students),
        }
    }
}

/// Apply the same patch to every document, returning how many were updated
pub(crate) async fn update_all(
    store: &dyn DocumentStore,
    collection: &str,
    docs: &[StoredDocument],
    patch: &DocumentData,
) -> AppResult<usize> {
    try_join_all(
        docs.iter()
            .map(|doc| store.update(collection, &doc.id, patch.clone())),
    )
    .await?;
    Ok(docs.len())
}

/// Delete every document, returning how many were removed
pub(crate) async fn delete_all(
    store: &dyn DocumentStore,
    collection: &str,
    docs: &[StoredDocument],
) -> AppResult<usize> {
    try_join_all(docs.iter().map(|doc| store.delete(collection, &doc.id))).await?;
    Ok(docs.len())
}
