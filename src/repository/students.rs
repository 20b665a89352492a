//! Students repository

use std::sync::Arc;

use super::{delete_all, update_all};
use crate::{
    error::AppResult,
    models::student::StudentChanges,
    store::{to_document, DocumentStore, FieldFilter, StoredDocument},
};

pub const STUDENT_ID_FIELD: &str = "StudentID";

#[derive(Clone)]
pub struct StudentsRepository {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl StudentsRepository {
    pub fn new(store: Arc<dyn DocumentStore>, collection: &str) -> Self {
        Self {
            store,
            collection: collection.to_string(),
        }
    }

    async fn find_by_student_id(&self, student_id: &str) -> AppResult<Vec<StoredDocument>> {
        let filter = FieldFilter::eq(STUDENT_ID_FIELD, student_id);
        Ok(self.store.find_many(&self.collection, &filter).await?)
    }

    /// Update every student document carrying a student ID
    pub async fn update_by_student_id(&self, student_id: &str, changes: &StudentChanges) -> AppResult<usize> {
        let docs = self.find_by_student_id(student_id).await?;
        let patch = to_document(changes)?;
        update_all(self.store.as_ref(), &self.collection, &docs, &patch).await
    }

    /// Delete every student document carrying a student ID
    pub async fn delete_by_student_id(&self, student_id: &str) -> AppResult<usize> {
        let docs = self.find_by_student_id(student_id).await?;
        delete_all(self.store.as_ref(), &self.collection, &docs).await
    }
}
