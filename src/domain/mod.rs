//! Domain module for task tracking.
//!
//! This module contains the single persisted entity and its value objects.

pub mod task;

pub use task::{NewTask, Task, TaskId, Timestamp, sort_newest_first};
