//! HTTP handlers for the task endpoint.
//!
//! Each handler performs exactly one repository call. Update and delete
//! acknowledge with `{ "success": true }` whether or not a row matched.

use std::sync::Arc;

use axum::{Json, extract::State, extract::rejection::JsonRejection};

use super::dto::{
    CreateTaskRequest, DeleteTaskRequest, SuccessResponse, TaskResponse, UpdateTaskRequest,
};
use super::error::ApiErrorResponse;
use crate::domain::NewTask;
use crate::infrastructure::TaskRepository;

// =============================================================================
// Application State
// =============================================================================

/// Shared application dependencies.
///
/// Holds the repository as a trait object so the backend can be chosen at
/// start-up by `RepositoryFactory`.
#[derive(Clone)]
pub struct AppState {
    /// Task repository for persistence.
    pub task_repository: Arc<dyn TaskRepository>,
}

impl AppState {
    /// Creates a new `AppState` around an initialized repository.
    #[must_use]
    pub fn new(task_repository: Arc<dyn TaskRepository>) -> Self {
        Self { task_repository }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("AppState")
            .field("task_repository", &"Arc<dyn TaskRepository>")
            .finish()
    }
}

// =============================================================================
// GET /api/tasks
// =============================================================================

/// Lists all tasks, newest first.
///
/// # Response
///
/// - **200 OK**: JSON array of tasks
/// - **500 Internal Server Error**: `{ "error": "<storage message>" }`
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] when the storage call fails.
pub async fn list_tasks(
    State(state): State<AppState>,
) -> Result<Json<Vec<TaskResponse>>, ApiErrorResponse> {
    let tasks = state.task_repository.list().await?;
    tracing::debug!(count = tasks.len(), "Listed tasks");
    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

// =============================================================================
// POST /api/tasks
// =============================================================================

/// Creates a task with `completed = false` and returns the stored record.
///
/// # Request Body
///
/// ```json
/// { "title": "Buy milk" }
/// ```
///
/// The title is not validated; an absent title is stored as `null`.
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on a malformed body (400) or a storage
/// failure (500).
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<Json<TaskResponse>, ApiErrorResponse> {
    let Json(request) = payload?;

    let task = state
        .task_repository
        .create(NewTask {
            title: request.title,
        })
        .await?;

    tracing::info!(task_id = %task.id, "Created task");
    Ok(Json(TaskResponse::from(task)))
}

// =============================================================================
// PATCH /api/tasks
// =============================================================================

/// Sets the completion flag of one task.
///
/// # Request Body
///
/// ```json
/// { "id": 1, "completed": true }
/// ```
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on a malformed body (400) or a storage
/// failure (500). An unknown id is not an error.
pub async fn update_task(
    State(state): State<AppState>,
    payload: Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiErrorResponse> {
    let Json(request) = payload?;

    let matched = state
        .task_repository
        .set_completed(request.id, request.completed)
        .await?;

    tracing::info!(
        task_id = %request.id,
        completed = request.completed,
        matched,
        "Updated task"
    );
    Ok(Json(SuccessResponse::OK))
}

// =============================================================================
// DELETE /api/tasks
// =============================================================================

/// Deletes one task.
///
/// # Request Body
///
/// ```json
/// { "id": 1 }
/// ```
///
/// # Errors
///
/// Returns [`ApiErrorResponse`] on a malformed body (400) or a storage
/// failure (500). An unknown id is not an error.
pub async fn delete_task(
    State(state): State<AppState>,
    payload: Result<Json<DeleteTaskRequest>, JsonRejection>,
) -> Result<Json<SuccessResponse>, ApiErrorResponse> {
    let Json(request) = payload?;

    let matched = state.task_repository.delete(request.id).await?;

    tracing::info!(task_id = %request.id, matched, "Deleted task");
    Ok(Json(SuccessResponse::OK))
}

// =============================================================================
// GET /health
// =============================================================================

/// Health check response body.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HealthResponse {
    /// Service status.
    pub status: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Health check endpoint.
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TaskId;
    use crate::infrastructure::InMemoryTaskRepository;
    use rstest::rstest;

    fn test_state() -> AppState {
        AppState::new(Arc::new(InMemoryTaskRepository::new()))
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_then_list() {
        let state = test_state();

        let Json(created) = create_task(
            State(state.clone()),
            Ok(Json(CreateTaskRequest {
                title: Some("Buy milk".to_string()),
            })),
        )
        .await
        .unwrap();
        assert_eq!(created.id, 1);
        assert!(!created.completed);

        let Json(tasks) = list_tasks(State(state)).await.unwrap();
        assert_eq!(tasks, vec![created]);
    }

    #[rstest]
    #[tokio::test]
    async fn test_update_unknown_id_still_succeeds() {
        let Json(response) = update_task(
            State(test_state()),
            Ok(Json(UpdateTaskRequest {
                id: TaskId::new(42),
                completed: true,
            })),
        )
        .await
        .unwrap();
        assert!(response.success);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_unknown_id_still_succeeds() {
        let Json(response) = delete_task(
            State(test_state()),
            Ok(Json(DeleteTaskRequest {
                id: TaskId::new(42),
            })),
        )
        .await
        .unwrap();
        assert!(response.success);
    }

    #[rstest]
    #[tokio::test]
    async fn test_health_check() {
        let Json(response) = health_check().await;
        assert_eq!(response.status, "healthy");
    }

    #[rstest]
    fn test_app_state_debug() {
        let debug_string = format!("{:?}", test_state());
        assert!(debug_string.contains("task_repository"));
    }
}
