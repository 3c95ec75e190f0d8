//! Task domain model.
//!
//! A task is the only record the tracker persists: an id and a creation
//! time assigned by storage, a title fixed at creation, and a completion
//! flag that is the only mutable field.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Value Objects - Newtypes
// =============================================================================

/// Storage-assigned identifier for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(i64);

impl TaskId {
    /// Creates a `TaskId` from a raw storage key.
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw storage key.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

impl From<i64> for TaskId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// A timestamp wrapper for `DateTime<Utc>`.
///
/// Serializes as RFC 3339, which is what the managed REST storage emits
/// for `timestamptz` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// Creates a `Timestamp` from a `DateTime<Utc>`.
    #[must_use]
    pub const fn from_datetime(datetime: DateTime<Utc>) -> Self {
        Self(datetime)
    }

    /// Returns the inner `DateTime<Utc>`.
    #[must_use]
    pub const fn as_datetime(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Returns the current time as a `Timestamp`.
    #[must_use]
    pub fn now() -> Self {
        Self(Utc::now())
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(formatter, "{}", self.0.format("%Y-%m-%d %H:%M:%S UTC"))
    }
}

// =============================================================================
// Task Entity
// =============================================================================

/// A persisted to-do item.
///
/// `title` is `None` when the create request carried no title; storage
/// accepts that as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Storage-assigned identifier.
    pub id: TaskId,
    /// Title given at creation.
    pub title: Option<String>,
    /// Completion flag, the only field updates touch.
    pub completed: bool,
    /// Storage-assigned creation time, used for ordering only.
    pub created_at: Timestamp,
}

impl Task {
    /// Creates a task as storage would return it right after insertion.
    #[must_use]
    pub fn new(id: TaskId, title: Option<String>, created_at: Timestamp) -> Self {
        Self {
            id,
            title,
            completed: false,
            created_at,
        }
    }

    /// Returns a copy with the given completion flag.
    #[must_use]
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }

    /// Returns the title, or an empty string when none was stored.
    #[must_use]
    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Listing order: newest `created_at` first, ties broken by higher id.
    #[must_use]
    pub fn newest_first(left: &Self, right: &Self) -> Ordering {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id))
    }
}

/// Sorts tasks in listing order (see [`Task::newest_first`]).
pub fn sort_newest_first(tasks: &mut [Task]) {
    tasks.sort_by(Task::newest_first);
}

/// Insert payload: everything the caller supplies for a new task.
///
/// `completed` is not part of it; storage always starts a task open.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    /// Title for the new task, stored verbatim.
    pub title: Option<String>,
}

impl NewTask {
    /// Creates an insert payload with the given title.
    #[must_use]
    pub fn titled(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rstest::rstest;

    fn at(seconds: i64) -> Timestamp {
        Timestamp::from_datetime(Utc.timestamp_opt(seconds, 0).unwrap())
    }

    #[rstest]
    fn test_new_task_starts_open() {
        let task = Task::new(TaskId::new(1), Some("Buy milk".to_string()), at(0));
        assert!(!task.completed);
        assert_eq!(task.title_or_empty(), "Buy milk");
    }

    #[rstest]
    fn test_title_or_empty_without_title() {
        let task = Task::new(TaskId::new(1), None, at(0));
        assert_eq!(task.title_or_empty(), "");
    }

    #[rstest]
    fn test_sort_newest_first_orders_by_created_at_descending() {
        let mut tasks = vec![
            Task::new(TaskId::new(1), None, at(10)),
            Task::new(TaskId::new(2), None, at(30)),
            Task::new(TaskId::new(3), None, at(20)),
        ];
        sort_newest_first(&mut tasks);
        let ids: Vec<i64> = tasks.iter().map(|task| task.id.value()).collect();
        assert_eq!(ids, vec![2, 3, 1]);
    }

    #[rstest]
    fn test_sort_newest_first_breaks_ties_by_id() {
        let mut tasks = vec![
            Task::new(TaskId::new(4), None, at(10)),
            Task::new(TaskId::new(7), None, at(10)),
        ];
        sort_newest_first(&mut tasks);
        assert_eq!(tasks[0].id, TaskId::new(7));
    }

    #[rstest]
    fn test_task_serializes_with_wire_field_names() {
        let task = Task::new(TaskId::new(1), Some("Buy milk".to_string()), at(0));
        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Buy milk");
        assert_eq!(json["completed"], false);
        assert_eq!(json["created_at"], "1970-01-01T00:00:00Z");
    }

    #[rstest]
    fn test_task_without_title_serializes_null() {
        let task = Task::new(TaskId::new(1), None, at(0));
        let json = serde_json::to_value(&task).unwrap();
        assert!(json["title"].is_null());
    }

    #[rstest]
    fn test_task_deserializes_postgrest_timestamp() {
        let json = r#"{"id":5,"title":"x","completed":true,"created_at":"2024-05-01T12:30:00.123456+00:00"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.id, TaskId::new(5));
        assert!(task.completed);
    }
}
