//! Data Transfer Objects for API requests and responses.
//!
//! These mirror the JSON bodies of `/api/tasks` and are kept separate from
//! the domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::{Task, TaskId};

// =============================================================================
// Request DTOs
// =============================================================================

/// Request body for `POST /api/tasks`.
///
/// `title` may be absent; it is stored as `null` without validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Title of the new task.
    #[serde(default)]
    pub title: Option<String>,
}

/// Request body for `PATCH /api/tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    /// Task to update.
    pub id: TaskId,
    /// New completion flag.
    pub completed: bool,
}

/// Request body for `DELETE /api/tasks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteTaskRequest {
    /// Task to delete.
    pub id: TaskId,
}

// =============================================================================
// Response DTOs
// =============================================================================

/// Response DTO for a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskResponse {
    /// Storage-assigned id.
    pub id: i64,
    /// Title, `null` if none was given.
    pub title: Option<String>,
    /// Completion flag.
    pub completed: bool,
    /// Creation time (RFC 3339).
    pub created_at: DateTime<Utc>,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.value(),
            title: task.title,
            completed: task.completed,
            created_at: *task.created_at.as_datetime(),
        }
    }
}

/// Acknowledgement body for update and delete.
///
/// Always `true` on a 200 response, including when no row matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// Success flag.
    pub success: bool,
}

impl SuccessResponse {
    /// The only acknowledgement the endpoint sends.
    pub const OK: Self = Self { success: true };
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use rstest::rstest;

    #[rstest]
    #[case(r#"{"title":"Buy milk"}"#, Some("Buy milk"))]
    #[case(r"{}", None)]
    #[case(r#"{"title":null}"#, None)]
    #[case(r#"{"title":""}"#, Some(""))]
    fn test_create_request_accepts_any_title(#[case] body: &str, #[case] expected: Option<&str>) {
        let request: CreateTaskRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.title.as_deref(), expected);
    }

    #[rstest]
    fn test_update_request_requires_both_fields() {
        let request: UpdateTaskRequest =
            serde_json::from_str(r#"{"id":1,"completed":true}"#).unwrap();
        assert_eq!(request.id, TaskId::new(1));
        assert!(request.completed);

        assert!(serde_json::from_str::<UpdateTaskRequest>(r#"{"id":1}"#).is_err());
    }

    #[rstest]
    fn test_task_response_from_task() {
        let task = Task::new(TaskId::new(3), Some("x".to_string()), Timestamp::now());
        let response = TaskResponse::from(task);
        assert_eq!(response.id, 3);
        assert_eq!(response.title.as_deref(), Some("x"));
        assert!(!response.completed);
    }

    #[rstest]
    fn test_success_response_serializes() {
        let json = serde_json::to_string(&SuccessResponse::OK).unwrap();
        assert_eq!(json, r#"{"success":true}"#);
    }
}
