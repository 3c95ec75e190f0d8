//! `PostgreSQL` repository implementation.
//!
//! Uses `sqlx` with a shared connection pool; each operation is one
//! statement, no transactions.
//!
//! # Table Schema
//!
//! The table is expected to exist already:
//!
//! ```sql
//! CREATE TABLE tasks (
//!     id BIGSERIAL PRIMARY KEY,
//!     title TEXT,
//!     completed BOOLEAN NOT NULL DEFAULT FALSE,
//!     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
//! );
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::domain::{NewTask, Task, TaskId, Timestamp};
use crate::infrastructure::{RepositoryError, TaskRepository};

type TaskRow = (i64, Option<String>, bool, DateTime<Utc>);

fn task_from_row((id, title, completed, created_at): TaskRow) -> Task {
    Task {
        id: TaskId::new(id),
        title,
        completed,
        created_at: Timestamp::from_datetime(created_at),
    }
}

/// `PostgreSQL` implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let pool = PgPool::connect("postgres://localhost/tasks").await?;
/// let repository = PostgresTaskRepository::new(pool);
/// let tasks = repository.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a new `PostgreSQL` task repository with the given connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let rows: Vec<TaskRow> = sqlx::query_as(
            "SELECT id, title, completed, created_at FROM tasks \
             ORDER BY created_at DESC, id DESC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| RepositoryError::DatabaseError(error.to_string()))?;

        Ok(rows.into_iter().map(task_from_row).collect())
    }

    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        let row: TaskRow = sqlx::query_as(
            "INSERT INTO tasks (title, completed) VALUES ($1, FALSE) \
             RETURNING id, title, completed, created_at",
        )
        .bind(new_task.title)
        .fetch_one(&self.pool)
        .await
        .map_err(|error| RepositoryError::DatabaseError(error.to_string()))?;

        Ok(task_from_row(row))
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<bool, RepositoryError> {
        let result = sqlx::query("UPDATE tasks SET completed = $1 WHERE id = $2")
            .bind(completed)
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|error| RepositoryError::DatabaseError(error.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: TaskId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(id.value())
            .execute(&self.pool)
            .await
            .map_err(|error| RepositoryError::DatabaseError(error.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

// =============================================================================
// Tests
// =============================================================================
