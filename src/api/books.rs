//! Book (catalog) handlers

use axum::Json;

use crate::{
    error::AppResult,
    models::{
        book::{CreateBook, CreatedResponse, UpdateBook},
        MessageResponse,
    },
    store::DocumentData,
    AppState,
};

/// List all books
pub async fn list_books(state: &AppState) -> AppResult<Json<Vec<DocumentData>>> {
    let books = state.services.catalog.list_books().await?;
    Ok(Json(books))
}

/// Get the first book filed under a catalog code
pub async fn get_book(state: &AppState, dewey_dec: &str) -> AppResult<Json<DocumentData>> {
    let book = state.services.catalog.get_book(dewey_dec).await?;
    Ok(Json(book))
}

/// Create a book
pub async fn create_book(state: &AppState, data: CreateBook) -> AppResult<Json<CreatedResponse>> {
    let id = state.services.catalog.create_book(data).await?;
    Ok(Json(CreatedResponse { id }))
}

/// Update books filed under a catalog code
pub async fn update_book(state: &AppState, dewey_dec: &str, data: UpdateBook) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.update_book(dewey_dec, data).await?;
    Ok(Json(MessageResponse::new("Book updated successfully")))
}

/// Delete books filed under a catalog code
pub async fn delete_book(state: &AppState, dewey_dec: &str) -> AppResult<Json<MessageResponse>> {
    state.services.catalog.delete_book(dewey_dec).await?;
    Ok(Json(MessageResponse::new("Book deleted successfully")))
}
