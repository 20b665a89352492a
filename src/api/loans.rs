//! Borrowing handler

use axum::Json;

use crate::{
    error::{AppError, AppResult},
    models::{borrow::BorrowBook, MessageResponse},
    AppState,
};

/// Borrow a book on behalf of a student
pub async fn borrow_book(state: &AppState, student_id: &str, data: BorrowBook) -> AppResult<Json<MessageResponse>> {
    let dewey_dec = data
        .dewey_dec
        .clone()
        .filter(|code| !code.is_empty())
        .ok_or_else(|| AppError::MalformedRequest("DeweyDec is required to borrow a book".to_string()))?;

    state
        .services
        .loans
        .borrow_book(student_id, &dewey_dec, data)
        .await?;

    Ok(Json(MessageResponse::new("Book borrowed successfully")))
}
