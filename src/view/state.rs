//! Client-side task list state.
//!
//! The state is an ordinary value owned by whoever drives the view. Every
//! change goes through one of the local-delta methods below, which are
//! applied only after the endpoint acknowledged the matching request. The
//! list is never re-fetched to reconcile, so its order and staleness are
//! exactly what those deltas produce.

use crate::domain::{Task, TaskId};

/// Ordered local copy of the task list plus the pending new-task title.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskListState {
    tasks: Vec<Task>,
    pending_title: String,
}

impl TaskListState {
    /// Creates an empty state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks in display order.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Text currently typed into the new-task input.
    #[must_use]
    pub fn pending_title(&self) -> &str {
        &self.pending_title
    }

    /// Replaces the input text.
    pub fn set_pending_title(&mut self, title: impl Into<String>) {
        self.pending_title = title.into();
    }

    /// Appends one character to the input text.
    pub fn push_pending_char(&mut self, character: char) {
        self.pending_title.push(character);
    }

    /// Removes the last character of the input text.
    pub fn pop_pending_char(&mut self) {
        self.pending_title.pop();
    }

    /// Returns the title to submit, or `None` if the input is blank.
    ///
    /// The title is returned untrimmed; only the blank check ignores
    /// surrounding whitespace.
    #[must_use]
    pub fn submittable_title(&self) -> Option<&str> {
        if self.pending_title.trim().is_empty() {
            None
        } else {
            Some(&self.pending_title)
        }
    }

    /// Looks up a task by id.
    #[must_use]
    pub fn find(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Replaces the whole list with a freshly fetched one.
    pub fn replace_all(&mut self, tasks: Vec<Task>) {
        self.tasks = tasks;
    }

    /// Puts a newly created task at the front and clears the input.
    pub fn prepend_created(&mut self, task: Task) {
        self.tasks.insert(0, task);
        self.pending_title.clear();
    }

    /// Flips the completion flag of the task with the given id, if present.
    pub fn apply_toggle(&mut self, id: TaskId) {
        if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
            task.completed = !task.completed;
        }
    }

    /// Removes the task with the given id, if present.
    pub fn apply_delete(&mut self, id: TaskId) {
        self.tasks.retain(|task| task.id != id);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Timestamp;
    use rstest::rstest;

    fn task(id: i64, title: &str) -> Task {
        Task::new(TaskId::new(id), Some(title.to_string()), Timestamp::now())
    }

    fn state_with(tasks: Vec<Task>) -> TaskListState {
        let mut state = TaskListState::new();
        state.replace_all(tasks);
        state
    }

    #[rstest]
    #[case("", None)]
    #[case("   ", None)]
    #[case("\t\n", None)]
    #[case("Buy milk", Some("Buy milk"))]
    #[case("  padded  ", Some("  padded  "))]
    fn test_submittable_title(#[case] input: &str, #[case] expected: Option<&str>) {
        let mut state = TaskListState::new();
        state.set_pending_title(input);
        assert_eq!(state.submittable_title(), expected);
    }

    #[rstest]
    fn test_prepend_created_puts_task_first_and_clears_input() {
        let mut state = state_with(vec![task(1, "old")]);
        state.set_pending_title("new");

        state.prepend_created(task(2, "new"));

        let ids: Vec<i64> = state.tasks().iter().map(|task| task.id.value()).collect();
        assert_eq!(ids, vec![2, 1]);
        assert_eq!(state.pending_title(), "");
    }

    #[rstest]
    fn test_apply_toggle_twice_restores_flag() {
        let mut state = state_with(vec![task(1, "a"), task(2, "b")]);

        state.apply_toggle(TaskId::new(2));
        assert!(state.find(TaskId::new(2)).unwrap().completed);
        assert!(!state.find(TaskId::new(1)).unwrap().completed);

        state.apply_toggle(TaskId::new(2));
        assert!(!state.find(TaskId::new(2)).unwrap().completed);
    }

    #[rstest]
    fn test_apply_delete_removes_only_matching_task() {
        let mut state = state_with(vec![task(1, "a"), task(2, "b")]);
        state.apply_delete(TaskId::new(1));
        assert_eq!(state.tasks().len(), 1);
        assert_eq!(state.tasks()[0].id, TaskId::new(2));
    }

    #[rstest]
    fn test_deltas_for_unknown_id_are_no_ops() {
        let mut state = state_with(vec![task(1, "a")]);
        let before = state.clone();

        state.apply_toggle(TaskId::new(9));
        state.apply_delete(TaskId::new(9));

        assert_eq!(state, before);
    }

    #[rstest]
    fn test_pending_char_editing() {
        let mut state = TaskListState::new();
        state.push_pending_char('h');
        state.push_pending_char('i');
        state.pop_pending_char();
        assert_eq!(state.pending_title(), "h");
    }
}
