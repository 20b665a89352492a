//! Catalog management service

use crate::{
    error::AppResult,
    models::book::{Book, BookChanges, CreateBook, UpdateBook},
    repository::Repository,
    store::DocumentData,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List every book in the catalog
    pub async fn list_books(&self) -> AppResult<Vec<DocumentData>> {
        self.repository.books.list().await
    }

    /// Get the first book filed under a catalog code
    pub async fn get_book(&self, dewey_dec: &str) -> AppResult<DocumentData> {
        self.repository.books.get_by_dewey_dec(dewey_dec).await
    }

    /// Create a new book, always `Available`
    pub async fn create_book(&self, data: CreateBook) -> AppResult<String> {
        let book = Book::from(data);
        let id = self.repository.books.create(&book).await?;
        tracing::info!("Catalog: created book {} under {:?}", id, book.dewey_dec);
        Ok(id)
    }

    /// Update every book filed under a catalog code
    pub async fn update_book(&self, dewey_dec: &str, data: UpdateBook) -> AppResult<usize> {
        let updated = self
            .repository
            .books
            .update_by_dewey_dec(dewey_dec, &BookChanges::from(data))
            .await?;
        tracing::info!("Catalog: updated {} book(s) under {}", updated, dewey_dec);
        Ok(updated)
    }

    /// Delete every book filed under a catalog code
    pub async fn delete_book(&self, dewey_dec: &str) -> AppResult<usize> {
        let deleted = self.repository.books.delete_by_dewey_dec(dewey_dec).await?;
        tracing::info!("Catalog: deleted {} book(s) under {}", deleted, dewey_dec);
        Ok(deleted)
    }
}
