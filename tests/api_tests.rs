//! API integration tests against the in-memory document store

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use libris_server::{
    api::create_router,
    store::{DocumentData, DocumentStore, FieldFilter, MemoryDocumentStore, StoreError, StoreResult, StoredDocument},
    AppConfig, AppState,
};

const ROUTES: &str = "/api/routes";

/// Memory store that can be told to fail
#[derive(Clone, Default)]
struct FlakyStore {
    inner: MemoryDocumentStore,
    fail_everything: bool,
    fail_inserts_into: Option<&'static str>,
    /// Number of updates/deletes allowed to succeed before the rest fail
    mutation_budget: Option<usize>,
    mutations: Arc<AtomicUsize>,
}

impl FlakyStore {
    fn check(&self) -> StoreResult<()> {
        if self.fail_everything {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_mutation(&self, id: &str) -> StoreResult<()> {
        self.check()?;
        let done = self.mutations.fetch_add(1, Ordering::SeqCst);
        match self.mutation_budget {
            Some(budget) if done >= budget => Err(StoreError::Unavailable(format!("write of {} timed out", id))),
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn list(&self, collection: &str) -> StoreResult<Vec<StoredDocument>> {
        self.check()?;
        self.inner.list(collection).await
    }

    async fn find_many(&self, collection: &str, filter: &FieldFilter) -> StoreResult<Vec<StoredDocument>> {
        self.check()?;
        self.inner.find_many(collection, filter).await
    }

    async fn insert(&self, collection: &str, data: DocumentData) -> StoreResult<String> {
        self.check()?;
        if self.fail_inserts_into == Some(collection) {
            return Err(StoreError::Unavailable(format!("{} is read-only", collection)));
        }
        self.inner.insert(collection, data).await
    }

    async fn update(&self, collection: &str, id: &str, patch: DocumentData) -> StoreResult<()> {
        self.check_mutation(id)?;
        self.inner.update(collection, id, patch).await
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<()> {
        self.check_mutation(id)?;
        self.inner.delete(collection, id).await
    }

    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    async fn close(&self) {}
}

fn app(store: Arc<dyn DocumentStore>) -> Router {
    create_router(AppState::new(AppConfig::default(), store))
}

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    text: String,
}

impl TestResponse {
    fn json(&self) -> Value {
        serde_json::from_str(&self.text).expect("response is JSON")
    }
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        headers,
        text: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

async fn create_book(app: &Router, code: &str, title: &str) -> String {
    let response = send(
        app,
        Method::POST,
        ROUTES,
        Some(json!({
            "DeweyDec": code,
            "isbn": "978-0-00-000000-0",
            "Title": title,
            "Author": "Test Author",
            "Publisher": "Test Press",
            "Genre": "Reference"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    response.json()["id"].as_str().expect("id in response").to_string()
}

async fn seed_student(store: &MemoryDocumentStore, student_id: &str, last_name: &str) {
    let data = json!({
        "StudentID": student_id,
        "LastName": last_name,
        "FirstName": "Sam",
        "MidInitial": "Q",
        "Email": "sam@example.edu",
        "ContactNum": "555-0100"
    });
    store
        .insert("student_t", data.as_object().cloned().unwrap())
        .await
        .unwrap();
}

#[tokio::test]
async fn test_list_books_empty() {
    let app = app(Arc::new(MemoryDocumentStore::new()));

    let response = send(&app, Method::GET, ROUTES, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([]));
}

#[tokio::test]
async fn test_list_books_returns_every_document() {
    let app = app(Arc::new(MemoryDocumentStore::new()));
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "823", "Novel").await;

    let response = send(&app, Method::GET, ROUTES, None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json().as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_reads_return_stored_documents_verbatim() {
    let store = MemoryDocumentStore::new();
    let numeric = json!({"DeweyDec": 510, "ISBN": 9780000000000u64, "Title": "Calculus"});
    let extended = json!({"DeweyDec": "530", "Title": "Physics", "Status": "Lost", "Copies": 3});
    for doc in [&numeric, &extended] {
        store
            .insert("books_t", doc.as_object().cloned().unwrap())
            .await
            .unwrap();
    }
    let app = app(Arc::new(store));

    let response = send(&app, Method::GET, ROUTES, None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!([numeric.clone(), extended.clone()]));

    let response = send(&app, Method::GET, &format!("{}?DeweyDec=510", ROUTES), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), numeric);

    let response = send(&app, Method::GET, &format!("{}?DeweyDec=530", ROUTES), None).await;
    assert_eq!(response.json()["Copies"], 3);
    assert_eq!(response.json()["Status"], "Lost");
}

#[tokio::test]
async fn test_empty_dewey_dec_lists_books() {
    let app = app(Arc::new(MemoryDocumentStore::new()));
    create_book(&app, "510", "Calculus").await;

    let response = send(&app, Method::GET, &format!("{}?DeweyDec=", ROUTES), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json().is_array());
}

#[tokio::test]
async fn test_create_book_is_always_available() {
    let app = app(Arc::new(MemoryDocumentStore::new()));

    let response = send(
        &app,
        Method::POST,
        ROUTES,
        Some(json!({
            "DeweyDec": "005.1",
            "isbn": "978-1-59327-828-1",
            "Title": "The Rust Programming Language",
            "Author": "Klabnik & Nichols",
            "Publisher": "No Starch Press",
            "Genre": "Computing",
            "Status": "Borrowed"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.json()["id"].is_string());

    let response = send(&app, Method::GET, &format!("{}?DeweyDec=005.1", ROUTES), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(
        response.json(),
        json!({
            "DeweyDec": "005.1",
            "ISBN": "978-1-59327-828-1",
            "Title": "The Rust Programming Language",
            "Author": "Klabnik & Nichols",
            "Publisher": "No Starch Press",
            "Genre": "Computing",
            "Status": "Available"
        })
    );
}

#[tokio::test]
async fn test_get_book_returns_first_match() {
    let app = app(Arc::new(MemoryDocumentStore::new()));
    create_book(&app, "510", "First").await;
    create_book(&app, "510", "Second").await;

    let response = send(&app, Method::GET, &format!("{}?DeweyDec=510", ROUTES), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["Title"], "First");
}

#[tokio::test]
async fn test_get_unknown_book_is_not_found() {
    let app = app(Arc::new(MemoryDocumentStore::new()));
    create_book(&app, "510", "Calculus").await;

    let response = send(&app, Method::GET, &format!("{}?DeweyDec=999", ROUTES), None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({"error": "Book not found"}));
}

#[tokio::test]
async fn test_update_book_never_changes_catalog_code() {
    let app = app(Arc::new(MemoryDocumentStore::new()));
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "510", "Calculus").await;

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?DeweyDec=510", ROUTES),
        Some(json!({
            "DeweyDec": "999",
            "isbn": "978-1-11-111111-1",
            "Title": "Calculus, 2nd ed.",
            "Status": "Borrowed"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"message": "Book updated successfully"}));

    let books = send(&app, Method::GET, ROUTES, None).await.json();
    for book in books.as_array().unwrap() {
        assert_eq!(book["DeweyDec"], "510");
        assert_eq!(book["ISBN"], "978-1-11-111111-1");
        assert_eq!(book["Title"], "Calculus, 2nd ed.");
        assert_eq!(book["Author"], "Test Author");
        assert_eq!(book["Status"], "Available");
    }

    let missing = send(&app, Method::GET, &format!("{}?DeweyDec=999", ROUTES), None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_update_without_matches_still_succeeds() {
    let app = app(Arc::new(MemoryDocumentStore::new()));

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?DeweyDec=404", ROUTES),
        Some(json!({"Title": "Ghost"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["message"], "Book updated successfully");
}

#[tokio::test]
async fn test_delete_book_removes_only_matching_code() {
    let store = MemoryDocumentStore::new();
    let app = app(Arc::new(store.clone()));
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "530", "Physics").await;

    let response = send(&app, Method::DELETE, &format!("{}?DeweyDec=510", ROUTES), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"message": "Book deleted successfully"}));
    assert_eq!(store.count("books_t").await, 1);

    let remaining = send(&app, Method::GET, ROUTES, None).await.json();
    assert_eq!(remaining[0]["DeweyDec"], "530");
}

#[tokio::test]
async fn test_borrow_book_marks_status_and_records_loan() {
    let store = MemoryDocumentStore::new();
    let app = app(Arc::new(store.clone()));
    create_book(&app, "813.54", "Beloved").await;

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?StudentID=2023-0001", ROUTES),
        Some(json!({
            "DeweyDec": "813.54",
            "Title": "Beloved",
            "Author": "Toni Morrison",
            "Genre": "Fiction",
            "DateBorrow": "2024-03-01",
            "DueDate": "2024-03-15"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"message": "Book borrowed successfully"}));

    let book = send(&app, Method::GET, &format!("{}?DeweyDec=813.54", ROUTES), None).await;
    assert_eq!(book.json()["Status"], "Borrowed");

    let records = store.list("borrow_t").await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(
        Value::Object(records[0].data.clone()),
        json!({
            "StudentID": "2023-0001",
            "DeweyDec": "813.54",
            "Title": "Beloved",
            "Author": "Toni Morrison",
            "Genre": "Fiction",
            "DateBorrow": "2024-03-01",
            "DueDate": "2024-03-15"
        })
    );
}

#[tokio::test]
async fn test_borrow_already_borrowed_book_is_allowed() {
    let store = MemoryDocumentStore::new();
    let app = app(Arc::new(store.clone()));
    create_book(&app, "500", "Science").await;

    for student in ["S1", "S2"] {
        let response = send(
            &app,
            Method::PUT,
            &format!("{}?StudentID={}", ROUTES, student),
            Some(json!({"DeweyDec": "500"})),
        )
        .await;
        assert_eq!(response.status, StatusCode::OK);
    }

    assert_eq!(store.count("borrow_t").await, 2);
}

#[tokio::test]
async fn test_borrow_unknown_book_inserts_nothing() {
    let store = MemoryDocumentStore::new();
    let app = app(Arc::new(store.clone()));

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?StudentID=2023-0001", ROUTES),
        Some(json!({"DeweyDec": "000.0", "Title": "Missing"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.json(), json!({"error": "Book not found"}));
    assert_eq!(store.count("borrow_t").await, 0);
}

#[tokio::test]
async fn test_borrow_without_catalog_code_is_internal_error() {
    let store = MemoryDocumentStore::new();
    let app = app(Arc::new(store.clone()));

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?StudentID=2023-0001", ROUTES),
        Some(json!({"Title": "Anything"})),
    )
    .await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(store.count("borrow_t").await, 0);
}

#[tokio::test]
async fn test_failed_borrow_record_restores_status() {
    let store = FlakyStore {
        fail_inserts_into: Some("borrow_t"),
        ..Default::default()
    };
    let app = app(Arc::new(store.clone()));
    create_book(&app, "700", "Art").await;

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?StudentID=S9", ROUTES),
        Some(json!({"DeweyDec": "700"})),
    )
    .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Internal Server Error"}));

    let book = send(&app, Method::GET, &format!("{}?DeweyDec=700", ROUTES), None).await;
    assert_eq!(book.json()["Status"], "Available");
    assert_eq!(store.inner.count("borrow_t").await, 0);
}

#[tokio::test]
async fn test_update_user_by_student_id_in_body() {
    let store = MemoryDocumentStore::new();
    seed_student(&store, "S1", "Garcia").await;
    seed_student(&store, "S2", "Lopez").await;
    let app = app(Arc::new(store.clone()));

    let response = send(
        &app,
        Method::PUT,
        ROUTES,
        Some(json!({
            "StudentID": "S1",
            "lastName": "Garcia-Lopez",
            "email": "garcia.lopez@example.edu"
        })),
    )
    .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"message": "User updated successfully"}));

    let students = store.list("student_t").await.unwrap();
    assert_eq!(students[0].data["LastName"], "Garcia-Lopez");
    assert_eq!(students[0].data["Email"], "garcia.lopez@example.edu");
    assert_eq!(students[0].data["FirstName"], "Sam");
    assert_eq!(students[1].data["LastName"], "Lopez");
}

#[tokio::test]
async fn test_update_user_without_student_id_is_internal_error() {
    let store = MemoryDocumentStore::new();
    seed_student(&store, "S1", "Garcia").await;
    let app = app(Arc::new(store.clone()));

    let response = send(&app, Method::PUT, ROUTES, Some(json!({"lastName": "Nobody"}))).await;

    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    let students = store.list("student_t").await.unwrap();
    assert_eq!(students[0].data["LastName"], "Garcia");
}

#[tokio::test]
async fn test_delete_user_by_student_id() {
    let store = MemoryDocumentStore::new();
    seed_student(&store, "S1", "Garcia").await;
    seed_student(&store, "S1", "Garcia").await;
    seed_student(&store, "S2", "Lopez").await;
    let app = app(Arc::new(store.clone()));

    let response = send(&app, Method::DELETE, &format!("{}?StudentID=S1", ROUTES), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json(), json!({"message": "User deleted successfully"}));
    assert_eq!(store.count("student_t").await, 1);
}

#[tokio::test]
async fn test_unsupported_method_is_rejected() {
    let app = app(Arc::new(MemoryDocumentStore::new()));

    let response = send(&app, Method::PATCH, &format!("{}?DeweyDec=510", ROUTES), None).await;

    assert_eq!(response.status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(response.headers[header::ALLOW], "GET, POST, PUT, DELETE");
    assert_eq!(response.text, "Method PATCH Not Allowed");
}

#[tokio::test]
async fn test_malformed_body_is_internal_error() {
    let store = MemoryDocumentStore::new();
    let app = app(Arc::new(store.clone()));

    let request = Request::builder()
        .method(Method::POST)
        .uri(ROUTES)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"DeweyDec\": "))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, json!({"error": "Internal Server Error"}));
    assert_eq!(store.count("books_t").await, 0);
}

#[tokio::test]
async fn test_store_failure_is_internal_error() {
    let store = FlakyStore {
        fail_everything: true,
        ..Default::default()
    };
    let app = app(Arc::new(store));

    let response = send(&app, Method::GET, ROUTES, None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Internal Server Error"}));

    let response = send(&app, Method::DELETE, &format!("{}?DeweyDec=1", ROUTES), None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_partial_update_failure_is_internal_error() {
    let store = FlakyStore {
        mutation_budget: Some(1),
        ..Default::default()
    };
    let app = app(Arc::new(store.clone()));
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "510", "Calculus").await;

    let response = send(
        &app,
        Method::PUT,
        &format!("{}?DeweyDec=510", ROUTES),
        Some(json!({"Title": "Calculus, 2nd ed."})),
    )
    .await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Internal Server Error"}));

    // The write that went through is kept
    let books = store.inner.list("books_t").await.unwrap();
    let updated = books
        .iter()
        .filter(|doc| doc.data["Title"] == "Calculus, 2nd ed.")
        .count();
    assert_eq!(updated, 1);
}

#[tokio::test]
async fn test_partial_delete_failure_is_internal_error() {
    let store = FlakyStore {
        mutation_budget: Some(1),
        ..Default::default()
    };
    let app = app(Arc::new(store.clone()));
    create_book(&app, "510", "Calculus").await;
    create_book(&app, "510", "Calculus").await;

    let response = send(&app, Method::DELETE, &format!("{}?DeweyDec=510", ROUTES), None).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.json(), json!({"error": "Internal Server Error"}));
    assert_eq!(store.inner.count("books_t").await, 1);
}

#[tokio::test]
async fn test_health_and_readiness() {
    let app = app(Arc::new(MemoryDocumentStore::new()));

    let health = send(&app, Method::GET, "/api/health", None).await;
    assert_eq!(health.status, StatusCode::OK);
    assert_eq!(health.json()["status"], "healthy");

    let ready = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(ready.status, StatusCode::OK);
    assert_eq!(ready.json()["status"], "ready");
}

#[tokio::test]
async fn test_readiness_reports_store_outage() {
    let store = FlakyStore {
        fail_everything: true,
        ..Default::default()
    };
    let app = app(Arc::new(store));

    let ready = send(&app, Method::GET, "/api/ready", None).await;
    assert_eq!(ready.status, StatusCode::INTERNAL_SERVER_ERROR);
}
