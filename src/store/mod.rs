//! Document store abstraction
//!
//! Collections hold schemaless JSON objects addressed by a store-generated
//! id. Lookups are field-equality filters, never primary keys, so every
//! filtered operation may touch any number of documents.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Raw document body
pub type DocumentData = Map<String, Value>;

/// Errors raised by a store backend
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Document {id} not found in {collection}")]
    DocumentNotFound { collection: String, id: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// A document together with the handle needed to mutate it
#[derive(Debug, Clone, PartialEq)]
pub struct StoredDocument {
    pub id: String,
    pub data: DocumentData,
}

/// Equality filter on a single top-level field
#[derive(Debug, Clone)]
pub struct FieldFilter {
    pub field: String,
    pub value: String,
}

impl FieldFilter {
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Strings compare directly; other scalars compare by their JSON text,
    /// which is also what `->>` yields on the PostgreSQL side.
    pub fn matches(&self, data: &DocumentData) -> bool {
        match data.get(&self.field) {
            Some(Value::String(s)) => s == &self.value,
            Some(Value::Null) | None => false,
            Some(other) => other.to_string() == self.value,
        }
    }
}

/// Capability set of the document database injected into the application
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// All documents of a collection
    async fn list(&self, collection: &str) -> StoreResult<Vec<StoredDocument>>;

    /// Documents whose field equals the filter value
    async fn find_many(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<StoredDocument>>;

    /// Insert a new document and return its generated id
    async fn insert(&self, collection: &str, data: DocumentData) -> StoreResult<String>;

    /// Shallow-merge `patch` into an existing document
    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()>;

    /// Delete a document; deleting a missing id is not an error
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()>;

    /// Connectivity check used by the readiness endpoint
    async fn ping(&self) -> StoreResult<()>;

    /// Release backend resources
    async fn close(&self);
}

/// Serialize a typed value into a document body
pub fn to_document<T: Serialize>(value: &T) -> StoreResult<DocumentData> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(StoreError::InvalidDocument(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}
