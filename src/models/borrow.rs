//! Borrow record model

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Borrow request body
///
/// The student comes from the query string. The catalog code has to be in
/// the body because a `DeweyDec` query parameter selects the book update
/// route instead.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct BorrowBook {
    pub dewey_dec: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub date_borrow: Option<String>,
    pub due_date: Option<String>,
}

/// Append-only lending event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct BorrowRecord {
    #[serde(rename = "StudentID")]
    pub student_id: String,
    pub dewey_dec: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub genre: Option<String>,
    #[serde(default)]
    pub date_borrow: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
}

impl BorrowRecord {
    pub fn new(student_id: &str, dewey_dec: &str, data: BorrowBook) -> Self {
        Self {
            student_id: student_id.to_string(),
            dewey_dec: dewey_dec.to_string(),
            title: data.title,
            author: data.author,
            genre: data.genre,
            date_borrow: data.date_borrow,
            due_date: data.due_date,
        }
    }
}
