//! Repository trait for the task table.
//!
//! Every method is a single storage call; implementations hold no
//! per-request state.

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{NewTask, Task, TaskId};

// =============================================================================
// Repository Error
// =============================================================================

/// Errors that can occur during repository operations.
///
/// Each variant carries the backend's own message, which is what the
/// endpoint reports to callers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    /// Database driver or query error.
    #[error("Database error: {0}")]
    DatabaseError(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Managed storage service rejected or failed the request.
    #[error("Storage service error: {0}")]
    ServiceError(String),
}

impl RepositoryError {
    /// Returns the raw backend message without the variant prefix.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::DatabaseError(message)
            | Self::SerializationError(message)
            | Self::ServiceError(message) => message,
        }
    }
}

// =============================================================================
// Task Repository
// =============================================================================

/// Repository trait for Task records.
///
/// `set_completed` and `delete` return whether a row matched. Callers are
/// free to ignore it; the HTTP endpoint does.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists every task, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Task>, RepositoryError>;

    /// Inserts a task with `completed = false` and returns the stored row.
    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError>;

    /// Sets the completion flag of the task with the given id.
    ///
    /// Returns `Ok(false)` if no task matched.
    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<bool, RepositoryError>;

    /// Deletes the task with the given id.
    ///
    /// Returns `Ok(false)` if no task matched.
    async fn delete(&self, id: TaskId) -> Result<bool, RepositoryError>;
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn test_repository_error_display() {
        let error = RepositoryError::DatabaseError("connection refused".to_string());
        assert_eq!(format!("{error}"), "Database error: connection refused");

        let error = RepositoryError::ServiceError("permission denied".to_string());
        assert_eq!(
            format!("{error}"),
            "Storage service error: permission denied"
        );
    }

    #[rstest]
    #[case(RepositoryError::DatabaseError("a".to_string()), "a")]
    #[case(RepositoryError::SerializationError("b".to_string()), "b")]
    #[case(RepositoryError::ServiceError("c".to_string()), "c")]
    fn test_repository_error_message_is_raw(
        #[case] error: RepositoryError,
        #[case] expected: &str,
    ) {
        assert_eq!(error.message(), expected);
    }
}
