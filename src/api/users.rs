//! Student (user) handlers

use axum::Json;

use crate::{
    error::{AppError, AppResult},
    models::{student::UpdateStudent, MessageResponse},
    AppState,
};

/// Update every student record matching the `StudentID` in the body
pub async fn update_user(state: &AppState, data: UpdateStudent) -> AppResult<Json<MessageResponse>> {
    let student_id = data
        .student_id
        .clone()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::MalformedRequest("StudentID is required to update a user".to_string()))?;

    state.services.students.update_student(&student_id, data).await?;
    Ok(Json(MessageResponse::new("User updated successfully")))
}

/// Delete every student record matching a student ID
pub async fn delete_user(state: &AppState, student_id: Option<&str>) -> AppResult<Json<MessageResponse>> {
    let student_id = student_id
        .ok_or_else(|| AppError::MalformedRequest("StudentID is required to delete a user".to_string()))?;

    state.services.students.delete_student(student_id).await?;
    Ok(Json(MessageResponse::new("User deleted successfully")))
}
