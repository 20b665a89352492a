//! Data models for Libris

pub mod book;
pub mod borrow;
pub mod student;

use serde::Serialize;
use utoipa::ToSchema;

// Re-export commonly used types
pub use book::{Book, BookChanges, BookStatus, CreateBook, CreatedResponse, UpdateBook};
pub use borrow::{BorrowBook, BorrowRecord};
pub use student::{StudentChanges, UpdateStudent};

/// Acknowledgement returned by mutating handlers
#[derive(Debug, Serialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
