//! API module for HTTP handlers.
//!
//! This module contains the route table and the request/response handlers
//! of the task endpoint.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;

pub use dto::{
    CreateTaskRequest, DeleteTaskRequest, SuccessResponse, TaskResponse, UpdateTaskRequest,
};
pub use error::{ApiErrorResponse, ErrorBody};
pub use handlers::{
    AppState, HealthResponse, create_task, delete_task, health_check, list_tasks, update_task,
};
pub use routes::{TASKS_PATH, build_router};
