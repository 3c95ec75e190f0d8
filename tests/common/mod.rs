//! Common test helpers for integration tests.
//!
//! # Note
//!
//! The `#![allow(dead_code)]` attribute is necessary because Rust compiles each
//! integration test file as a separate crate, and not every file uses every
//! helper.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use serde_json::Value;
use tokio::net::TcpListener;
use tower::ServiceExt;

use task_tracker::api::{AppState, TASKS_PATH, build_router};
use task_tracker::domain::{NewTask, Task, TaskId};
use task_tracker::infrastructure::{InMemoryTaskRepository, RepositoryError, TaskRepository};

// =============================================================================
// Router Helpers
// =============================================================================

/// Creates a router over a fresh in-memory repository.
pub fn create_test_router() -> Router {
    build_router(AppState::new(Arc::new(InMemoryTaskRepository::new())))
}

/// Creates a router whose repository fails every call with `message`.
pub fn create_failing_router(message: &str) -> Router {
    build_router(AppState::new(Arc::new(FailingTaskRepository {
        message: message.to_string(),
    })))
}

/// Sends one request with an optional raw JSON body and returns status and parsed body.
pub async fn send(router: &Router, method: Method, body: Option<&str>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(TASKS_PATH);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = router
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    read_json(response).await
}

/// Splits a response into status and JSON body.
pub async fn read_json(response: Response<Body>) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

// =============================================================================
// Live Server Helpers
// =============================================================================

/// Serves `router` on an ephemeral local port and returns its base URL.
pub async fn spawn_server(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{address}")
}

// =============================================================================
// Failing Repository
// =============================================================================

/// Repository whose every call fails with the same database error.
pub struct FailingTaskRepository {
    pub message: String,
}

impl FailingTaskRepository {
    fn error(&self) -> RepositoryError {
        RepositoryError::DatabaseError(self.message.clone())
    }
}

#[async_trait]
impl TaskRepository for FailingTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        Err(self.error())
    }

    async fn create(&self, _new_task: NewTask) -> Result<Task, RepositoryError> {
        Err(self.error())
    }

    async fn set_completed(&self, _id: TaskId, _completed: bool) -> Result<bool, RepositoryError> {
        Err(self.error())
    }

    async fn delete(&self, _id: TaskId) -> Result<bool, RepositoryError> {
        Err(self.error())
    }
}
