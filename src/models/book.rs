//! Book model and related request types

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Circulation status of a book
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum BookStatus {
    Available,
    Borrowed,
}

impl std::fmt::Display for BookStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            BookStatus::Available => "Available",
            BookStatus::Borrowed => "Borrowed",
        };
        write!(f, "{}", label)
    }
}

/// Book document as stored in the books collection
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct Book {
    /// Dewey decimal catalog code, used as lookup key (not unique)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dewey_dec: Option<String>,
    #[serde(rename = "ISBN", default, skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<BookStatus>,
}

/// Create book request
///
/// Any `Status` sent by the caller is ignored; new books are always
/// `Available`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CreateBook {
    pub dewey_dec: String,
    #[serde(rename = "isbn")]
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
}

impl From<CreateBook> for Book {
    fn from(data: CreateBook) -> Self {
        Self {
            dewey_dec: Some(data.dewey_dec),
            isbn: data.isbn,
            title: data.title,
            author: data.author,
            publisher: data.publisher,
            genre: data.genre,
            status: Some(BookStatus::Available),
        }
    }
}

/// Update book request
///
/// The catalog code and status are not part of this payload and can never
/// be changed through it.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct UpdateBook {
    #[serde(rename = "isbn")]
    pub isbn: Option<String>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
}

/// Fields written to every book matched by an update
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct BookChanges {
    #[serde(rename = "ISBN", skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl From<UpdateBook> for BookChanges {
    fn from(data: UpdateBook) -> Self {
        Self {
            isbn: data.isbn,
            title: data.title,
            author: data.author,
            publisher: data.publisher,
            genre: data.genre,
        }
    }
}

/// Response to a successful book creation
#[derive(Debug, Serialize, ToSchema)]
pub struct CreatedResponse {
    /// Generated document id
    pub id: String,
}
