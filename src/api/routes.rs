//! Router construction.
//!
//! Shared by the server binary and the integration tests so both exercise
//! the same middleware stack.

use axum::Router;
use axum::routing::get;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{AppState, create_task, delete_task, health_check, list_tasks, update_task};

/// Path of the task endpoint.
pub const TASKS_PATH: &str = "/api/tasks";

/// Builds the application router with tracing and permissive CORS.
///
/// # Routes
///
/// - `GET /health`
/// - `GET | POST | PATCH | DELETE /api/tasks`
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route(
            TASKS_PATH,
            get(list_tasks)
                .post(create_task)
                .patch(update_task)
                .delete(delete_task),
        )
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
