//! View controller.
//!
//! `TaskView` pairs a `TaskApi` with the caller's `TaskListState`. Each
//! action sends its request first and applies the matching local delta only
//! when the request succeeded. Failures are logged and leave the state
//! untouched; nothing is surfaced to the user.

use crate::domain::TaskId;

use super::client::TaskApi;
use super::state::TaskListState;

/// Drives a `TaskListState` through a `TaskApi`.
#[derive(Debug)]
pub struct TaskView<C> {
    client: C,
    state: TaskListState,
}

impl<C: TaskApi> TaskView<C> {
    /// Creates a view with an empty task list.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_state(client, TaskListState::new())
    }

    /// Creates a view around an existing state.
    #[must_use]
    pub const fn with_state(client: C, state: TaskListState) -> Self {
        Self { client, state }
    }

    /// Current state.
    #[must_use]
    pub const fn state(&self) -> &TaskListState {
        &self.state
    }

    /// Mutable access to the state, used for editing the input text.
    pub const fn state_mut(&mut self) -> &mut TaskListState {
        &mut self.state
    }

    /// The underlying client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Fetches the task list and replaces the local copy.
    ///
    /// Returns `true` if the list was replaced.
    pub async fn load(&mut self) -> bool {
        match self.client.list().await {
            Ok(tasks) => {
                tracing::debug!(count = tasks.len(), "Fetched tasks");
                self.state.replace_all(tasks);
                true
            }
            Err(error) => {
                tracing::error!(%error, "Error fetching tasks");
                false
            }
        }
    }

    /// Creates a task from the pending title.
    ///
    /// A blank title sends nothing. On success the new task is prepended
    /// and the input cleared. Returns `true` if the state changed.
    pub async fn submit(&mut self) -> bool {
        let Some(title) = self.state.submittable_title().map(str::to_owned) else {
            return false;
        };

        match self.client.create(&title).await {
            Ok(task) => {
                tracing::debug!(task_id = %task.id, "Added task");
                self.state.prepend_created(task);
                true
            }
            Err(error) => {
                tracing::error!(%error, "Error adding task");
                false
            }
        }
    }

    /// Flips the completion flag of a task shown in the list.
    ///
    /// Returns `true` if the state changed.
    pub async fn toggle(&mut self, id: TaskId) -> bool {
        let Some(completed) = self.state.find(id).map(|task| !task.completed) else {
            tracing::warn!(task_id = %id, "Toggle requested for a task not in the list");
            return false;
        };

        match self.client.update(id, completed).await {
            Ok(()) => {
                self.state.apply_toggle(id);
                true
            }
            Err(error) => {
                tracing::error!(%error, task_id = %id, "Error updating task");
                false
            }
        }
    }

    /// Deletes a task.
    ///
    /// Returns `true` if the state changed.
    pub async fn delete(&mut self, id: TaskId) -> bool {
        match self.client.delete(id).await {
            Ok(()) => {
                self.state.apply_delete(id);
                true
            }
            Err(error) => {
                tracing::error!(%error, task_id = %id, "Error deleting task");
                false
            }
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
