//! Student (user) service

use crate::{
    error::AppResult,
    models::student::{StudentChanges, UpdateStudent},
    repository::Repository,
};

#[derive(Clone)]
pub struct StudentsService {
    repository: Repository,
}

impl StudentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn update_student(&self, student_id: &str, data: UpdateStudent) -> AppResult<usize> {
        let updated = self
            .repository
            .students
            .update_by_student_id(student_id, &StudentChanges::from(data))
            .await?;
        tracing::info!("Students: updated {} record(s) for {}", updated, student_id);
        Ok(updated)
    }

    pub async fn delete_student(&self, student_id: &str) -> AppResult<usize> {
        let deleted = self.repository.students.delete_by_student_id(student_id).await?;
        tracing::info!("Students: deleted {} record(s) for {}", deleted, student_id);
        Ok(deleted)
    }
}
