//! Method-polymorphic library endpoint
//!
//! One path serves every operation. The HTTP method picks the family and
//! the presence of `DeweyDec` / `StudentID` in the query string picks the
//! handler inside it:
//!
//! | Method | `DeweyDec` | `StudentID` | Handler |
//! |--------|-----------|-------------|---------|
//! | GET    | yes       | -           | get book |
//! | GET    | no        | -           | list books |
//! | POST   | -         | -           | create book |
//! | PUT    | yes       | -           | update book |
//! | PUT    | no        | yes         | borrow book |
//! | PUT    | no        | no          | update user |
//! | DELETE | yes       | -           | delete book |
//! | DELETE | no        | -           | delete user |

use axum::{
    body::Bytes,
    extract::{rejection::QueryRejection, Query, State},
    http::{header, Method, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{de::DeserializeOwned, Deserialize};
use utoipa::IntoParams;

use super::{books, loans, users};
use crate::{
    error::{AppError, AppResult},
    AppState,
};

/// Value of the `Allow` header on 405 responses
pub const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE";

/// Query parameters that select the handler
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RouteQuery {
    /// Catalog code of the book(s) to act on
    #[serde(rename = "DeweyDec")]
    pub dewey_dec: Option<String>,
    /// Borrowing student (PUT) or student to delete (DELETE)
    #[serde(rename = "StudentID")]
    pub student_id: Option<String>,
}

impl RouteQuery {
    /// Catalog code, if present and non-empty
    pub fn dewey_dec(&self) -> Option<&str> {
        self.dewey_dec.as_deref().filter(|v| !v.is_empty())
    }

    /// Student ID, if present and non-empty
    pub fn student_id(&self) -> Option<&str> {
        self.student_id.as_deref().filter(|v| !v.is_empty())
    }
}

/// Which handler a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    ListBooks,
    GetBook,
    CreateBook,
    UpdateBook,
    BorrowBook,
    UpdateUser,
    DeleteBook,
    DeleteUser,
}

impl Route {
    /// Resolve the handler for a method and query, `None` for unsupported methods
    pub fn resolve(method: &Method, query: &RouteQuery) -> Option<Self> {
        let route = match *method {
            Method::GET if query.dewey_dec().is_some() => Route::GetBook,
            Method::GET => Route::ListBooks,
            Method::POST => Route::CreateBook,
            Method::PUT if query.dewey_dec().is_some() => Route::UpdateBook,
            Method::PUT if query.student_id().is_some() => Route::BorrowBook,
            Method::PUT => Route::UpdateUser,
            Method::DELETE if query.dewey_dec().is_some() => Route::DeleteBook,
            Method::DELETE => Route::DeleteUser,
            _ => return None,
        };
        Some(route)
    }
}

fn is_supported(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::POST | Method::PUT | Method::DELETE)
}

fn method_not_allowed(method: &Method) -> Response {
    tracing::debug!("Rejected method {}", method);
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, ALLOWED_METHODS)],
        format!("Method {} Not Allowed", method),
    )
        .into_response()
}

/// Decode a JSON body; malformed input is an internal error, not a 400
fn parse_body<T: DeserializeOwned>(body: &Bytes) -> AppResult<T> {
    serde_json::from_slice(body).map_err(|e| AppError::MalformedRequest(format!("Invalid JSON body: {}", e)))
}

/// Entry point for every request to the library endpoint
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    query: Result<Query<RouteQuery>, QueryRejection>,
    body: Bytes,
) -> Response {
    if !is_supported(&method) {
        return method_not_allowed(&method);
    }

    let query = match query {
        Ok(Query(query)) => query,
        Err(rejection) => {
            return AppError::MalformedRequest(format!("Invalid query string: {}", rejection.body_text()))
                .into_response()
        }
    };

    let Some(route) = Route::resolve(&method, &query) else {
        return method_not_allowed(&method);
    };
    tracing::debug!("{} resolved to {:?}", method, route);

    match handle(&state, route, &query, &body).await {
        Ok(response) => response,
        Err(e) => e.into_response(),
    }
}

async fn handle(state: &AppState, route: Route, query: &RouteQuery, body: &Bytes) -> AppResult<Response> {
    // `resolve` only yields a route when the key it branched on is present
    let dewey_dec = query.dewey_dec().unwrap_or_default();
    let student_id = query.student_id().unwrap_or_default();

    let response = match route {
        Route::ListBooks => books::list_books(state).await?.into_response(),
        Route::GetBook => books::get_book(state, dewey_dec).await?.into_response(),
        Route::CreateBook => books::create_book(state, parse_body(body)?).await?.into_response(),
        Route::UpdateBook => books::update_book(state, dewey_dec, parse_body(body)?)
            .await?
            .into_response(),
        Route::BorrowBook => loans::borrow_book(state, student_id, parse_body(body)?)
            .await?
            .into_response(),
        Route::UpdateUser => users::update_user(state, parse_body(body)?).await?.into_response(),
        Route::DeleteBook => books::delete_book(state, dewey_dec).await?.into_response(),
        Route::DeleteUser => users::delete_user(state, query.student_id()).await?.into_response(),
    };
    Ok(response)
}

// OpenAPI descriptions of the four method families. Requests are served by
// `dispatch`; these only carry the documentation.

/// List books, or fetch one by catalog code
#[utoipa::path(
    get,
    path = "/routes",
    tag = "library",
    params(RouteQuery),
    responses(
        (status = 200, description = "Array of books, or the first book matching DeweyDec", body = Vec<crate::models::book::Book>),
        (status = 404, description = "No book with this DeweyDec", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_routes() {}

/// Create a book; its status is always `Available`
#[utoipa::path(
    post,
    path = "/routes",
    tag = "library",
    request_body = crate::models::book::CreateBook,
    responses(
        (status = 200, description = "Book created", body = crate::models::book::CreatedResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn post_routes() {}

/// Update books (DeweyDec), borrow a book (StudentID) or update a user (neither)
#[utoipa::path(
    put,
    path = "/routes",
    tag = "library",
    params(RouteQuery),
    request_body(
        content = crate::models::book::UpdateBook,
        description = "UpdateBook with DeweyDec, BorrowBook with StudentID, UpdateStudent otherwise"
    ),
    responses(
        (status = 200, description = "Change applied", body = crate::models::MessageResponse),
        (status = 404, description = "Borrowed book does not exist", body = crate::error::ErrorResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn put_routes() {}

/// Delete books (DeweyDec) or users (StudentID)
#[utoipa::path(
    delete,
    path = "/routes",
    tag = "library",
    params(RouteQuery),
    responses(
        (status = 200, description = "Matching documents deleted", body = crate::models::MessageResponse),
        (status = 500, description = "Internal error", body = crate::error::ErrorResponse)
    )
)]
pub async fn delete_routes() {}
