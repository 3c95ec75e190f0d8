//! Client view over the task endpoint.
//!
//! `state` holds the local task list, `client` talks HTTP, `controller`
//! reconciles the two, and `tui` puts it on a terminal.

pub mod client;
pub mod controller;
pub mod state;
pub mod tui;

pub use client::{ClientError, HttpTaskClient, TaskApi};
pub use controller::TaskView;
pub use state::TaskListState;
pub use tui::{Action, App, InputMode, render, run_app};
