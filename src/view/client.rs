//! HTTP client for the task endpoint.
//!
//! `TaskApi` is the seam the view talks through; `HttpTaskClient` is the
//! `reqwest` implementation used by the terminal front end.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use thiserror::Error;

use crate::api::{CreateTaskRequest, DeleteTaskRequest, TASKS_PATH, UpdateTaskRequest};
use crate::domain::{Task, TaskId};

// =============================================================================
// Client Error
// =============================================================================

/// Errors a view request can end in.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ClientError {
    /// The request never produced a response.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The endpoint answered with a non-2xx status.
    #[error("Request failed with {status}: {body}")]
    Status {
        /// Response status.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// The response body was not what the endpoint promises.
    #[error("Decode error: {0}")]
    Decode(String),
}

// =============================================================================
// Task API
// =============================================================================

/// Operations the view needs from the task endpoint.
#[async_trait]
pub trait TaskApi: Send + Sync {
    /// Fetches the full task list.
    async fn list(&self) -> Result<Vec<Task>, ClientError>;

    /// Creates a task and returns the stored record.
    async fn create(&self, title: &str) -> Result<Task, ClientError>;

    /// Sets the completion flag of a task.
    async fn update(&self, id: TaskId, completed: bool) -> Result<(), ClientError>;

    /// Deletes a task.
    async fn delete(&self, id: TaskId) -> Result<(), ClientError>;
}

// =============================================================================
// HTTP Task Client
// =============================================================================

/// `reqwest` implementation of `TaskApi`.
///
/// # Example
///
/// ```ignore
/// let client = HttpTaskClient::new("http://127.0.0.1:3000");
/// let tasks = client.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct HttpTaskClient {
    client: reqwest::Client,
    tasks_url: String,
}

impl HttpTaskClient {
    /// Creates a client for the server at `base_url`.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            client: reqwest::Client::new(),
            tasks_url: format!("{}{TASKS_PATH}", base_url.as_ref().trim_end_matches('/')),
        }
    }

    /// Returns the task endpoint URL this client talks to.
    #[must_use]
    pub fn tasks_url(&self) -> &str {
        &self.tasks_url
    }
}

async fn send(request: RequestBuilder) -> Result<Response, ClientError> {
    let response = request
        .send()
        .await
        .map_err(|error| ClientError::Transport(error.to_string()))?;

    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        let body = response.text().await.unwrap_or_default();
        Err(ClientError::Status { status, body })
    }
}

#[async_trait]
impl TaskApi for HttpTaskClient {
    async fn list(&self) -> Result<Vec<Task>, ClientError> {
        send(self.client.get(&self.tasks_url))
            .await?
            .json()
            .await
            .map_err(|error| ClientError::Decode(error.to_string()))
    }

    async fn create(&self, title: &str) -> Result<Task, ClientError> {
        let body = CreateTaskRequest {
            title: Some(title.to_string()),
        };
        send(self.client.post(&self.tasks_url).json(&body))
            .await?
            .json()
            .await
            .map_err(|error| ClientError::Decode(error.to_string()))
    }

    async fn update(&self, id: TaskId, completed: bool) -> Result<(), ClientError> {
        let body = UpdateTaskRequest { id, completed };
        send(self.client.patch(&self.tasks_url).json(&body)).await?;
        Ok(())
    }

    async fn delete(&self, id: TaskId) -> Result<(), ClientError> {
        let body = DeleteTaskRequest { id };
        send(self.client.delete(&self.tasks_url).json(&body)).await?;
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
