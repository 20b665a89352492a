//! Libris Library Desk
//!
//! A REST JSON API over a document database for a small library: books,
//! borrow records and student users, all served from one
//! method-polymorphic endpoint.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;
pub mod store;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

use repository::Repository;
use services::Services;
use store::DocumentStore;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub store: Arc<dyn DocumentStore>,
    pub services: Arc<Services>,
}

impl AppState {
    /// Wire repositories and services over an opened document store
    pub fn new(config: AppConfig, store: Arc<dyn DocumentStore>) -> Self {
        let repository = Repository::new(store.clone(), &config.collections);
        Self {
            config: Arc::new(config),
            store,
            services: Arc::new(Services::new(repository)),
        }
    }
}
