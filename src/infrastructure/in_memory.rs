//! In-memory repository implementation.
//!
//! Suitable for development and tests. Ids come from a counter and
//! `created_at` is clamped so it never moves backwards, mirroring what a
//! serial primary key and `DEFAULT NOW()` give in the database.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::{NewTask, Task, TaskId, Timestamp, sort_newest_first};
use crate::infrastructure::{RepositoryError, TaskRepository};

#[derive(Debug, Default)]
struct TaskTable {
    rows: BTreeMap<TaskId, Task>,
    last_id: i64,
    last_created_at: Option<Timestamp>,
}

impl TaskTable {
    fn next_id(&mut self) -> TaskId {
        self.last_id += 1;
        TaskId::new(self.last_id)
    }

    fn next_created_at(&mut self, now: Timestamp) -> Timestamp {
        let created_at = match self.last_created_at {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last_created_at = Some(created_at);
        created_at
    }
}

/// In-memory implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let repository = InMemoryTaskRepository::new();
/// let task = repository.create(NewTask::titled("Buy milk")).await?;
/// assert_eq!(task.id, TaskId::new(1));
/// ```
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskRepository {
    table: Arc<RwLock<TaskTable>>,
}

impl InMemoryTaskRepository {
    /// Creates a new empty in-memory task repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[allow(clippy::significant_drop_tightening)]
#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let guard = self.table.read().await;
        let mut tasks: Vec<Task> = guard.rows.values().cloned().collect();
        sort_newest_first(&mut tasks);
        Ok(tasks)
    }

    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        let mut guard = self.table.write().await;
        let id = guard.next_id();
        let created_at = guard.next_created_at(Timestamp::now());
        let task = Task::new(id, new_task.title, created_at);
        guard.rows.insert(id, task.clone());
        Ok(task)
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<bool, RepositoryError> {
        let mut guard = self.table.write().await;
        let Some(task) = guard.rows.get_mut(&id) else {
            return Ok(false);
        };
        task.completed = completed;
        Ok(true)
    }

    async fn delete(&self, id: TaskId) -> Result<bool, RepositoryError> {
        let mut guard = self.table.write().await;
        Ok(guard.rows.remove(&id).is_some())
    }
}

// =============================================================================
// Tests
// =============================================================================
