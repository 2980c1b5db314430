//! HTTP API for the todo list.
//!
//! # Overview
//! A thin pass-through from REST routes under `/api` to a `TodoStore`.
//! Handlers validate input, map failures onto the error taxonomy and wrap
//! every body in the uniform `Envelope`.
//!
//! # Design
//! - The router holds no mutable state of its own; the store serializes
//!   conflicting writes.
//! - Two stores are provided: `SqliteStore` for persistence and
//!   `MemoryStore` for tests and throwaway instances.

pub mod config;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod model;
pub mod routes;
pub mod store;

use std::sync::Arc;

use axum::{
    routing::{get, patch},
    Router,
};
use tokio::net::TcpListener;

pub use config::{Config, RunMode, Settings};
pub use envelope::Envelope;
pub use error::ApiError;
pub use model::{CreateRule, Todo, TodoId};
pub use routes::{AppState, Health};
pub use store::{MemoryStore, SqliteStore, StoreError, TodoStore};

use routes::{
    create_todo, delete_todo, get_todo, health, list_todos, route_not_found, toggle_todo,
    update_todo,
};

pub fn app(store: Arc<dyn TodoStore>, settings: Settings) -> Router {
    Router::new()
        .route("/api/todos", get(list_todos).post(create_todo))
        .route(
            "/api/todos/{id}",
            get(get_todo).put(update_todo).delete(delete_todo),
        )
        .route("/api/todos/{id}/toggle", patch(toggle_todo))
        .route("/api/health", get(health))
        .fallback(route_not_found)
        .method_not_allowed_fallback(route_not_found)
        .with_state(AppState { store, settings })
}

/// Router over an empty `MemoryStore` with default settings.
pub fn in_memory_app() -> Router {
    app(Arc::new(MemoryStore::new()), Settings::default())
}

pub async fn run(listener: TcpListener, app: Router) -> Result<(), std::io::Error> {
    axum::serve(listener, app).await
}
