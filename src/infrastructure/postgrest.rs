//! Managed REST storage repository implementation.
//!
//! Talks to a hosted `PostgreSQL` exposed through a `PostgREST`-compatible
//! interface. Two credentials are needed: the service endpoint URL and an
//! API key, sent both as the `apikey` header and as a bearer token.
//!
//! Each repository method issues exactly one HTTP request against
//! `{base_url}/rest/v1/tasks`.

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::domain::{NewTask, Task, TaskId};
use crate::infrastructure::{RepositoryError, TaskRepository};

/// Path of the tasks table below the service base URL.
const TASKS_PATH: &str = "/rest/v1/tasks";

/// Listing order understood by the service: newest first, ties by id.
const LIST_ORDER: &str = "created_at.desc,id.desc";

/// Error body returned by the service on failure.
#[derive(Debug, Deserialize)]
struct ServiceErrorBody {
    message: Option<String>,
}

/// `PostgREST` implementation of `TaskRepository`.
///
/// # Example
///
/// ```ignore
/// let repository = PostgrestTaskRepository::new("https://project.example.co", "anon-key");
/// let tasks = repository.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct PostgrestTaskRepository {
    client: reqwest::Client,
    tasks_url: String,
    api_key: String,
}

impl PostgrestTaskRepository {
    /// Creates a repository for the service at `base_url` authenticated with `api_key`.
    #[must_use]
    pub fn new(base_url: impl AsRef<str>, api_key: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url, api_key)
    }

    /// Creates a repository that reuses an existing HTTP client.
    #[must_use]
    pub fn with_client(
        client: reqwest::Client,
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            tasks_url: format!("{}{TASKS_PATH}", base_url.as_ref().trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
    }

    /// Builds a request whose response carries the affected rows.
    fn returning_rows(&self, request: RequestBuilder) -> RequestBuilder {
        self.authorized(request)
            .header("Prefer", "return=representation")
    }

    fn id_filter(id: TaskId) -> [(&'static str, String); 1] {
        [("id", format!("eq.{id}"))]
    }
}

/// Sends a request and decodes the returned rows.
async fn send_for_rows(request: RequestBuilder) -> Result<Vec<Task>, RepositoryError> {
    let response = request
        .send()
        .await
        .map_err(|error| RepositoryError::ServiceError(error.to_string()))?;

    let response = ensure_success(response).await?;

    response
        .json()
        .await
        .map_err(|error| RepositoryError::SerializationError(error.to_string()))
}

/// Converts a non-2xx response into a `ServiceError` carrying the service message.
async fn ensure_success(response: Response) -> Result<Response, RepositoryError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(RepositoryError::ServiceError(service_error_message(
        status, &body,
    )))
}

fn service_error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ServiceErrorBody>(body)
        .ok()
        .and_then(|error| error.message)
        .unwrap_or_else(|| format!("HTTP {status}"))
}

#[async_trait]
impl TaskRepository for PostgrestTaskRepository {
    async fn list(&self) -> Result<Vec<Task>, RepositoryError> {
        let request = self
            .authorized(self.client.get(&self.tasks_url))
            .query(&[("select", "*"), ("order", LIST_ORDER)]);

        send_for_rows(request).await
    }

    async fn create(&self, new_task: NewTask) -> Result<Task, RepositoryError> {
        let request = self
            .returning_rows(self.client.post(&self.tasks_url))
            .json(&json!([{ "title": new_task.title, "completed": false }]));

        send_for_rows(request)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RepositoryError::ServiceError("insert returned no rows".to_string()))
    }

    async fn set_completed(&self, id: TaskId, completed: bool) -> Result<bool, RepositoryError> {
        let request = self
            .returning_rows(self.client.patch(&self.tasks_url))
            .query(&Self::id_filter(id))
            .json(&json!({ "completed": completed }));

        Ok(!send_for_rows(request).await?.is_empty())
    }

    async fn delete(&self, id: TaskId) -> Result<bool, RepositoryError> {
        let request = self
            .returning_rows(self.client.delete(&self.tasks_url))
            .query(&Self::id_filter(id));

        Ok(!send_for_rows(request).await?.is_empty())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use rstest::rstest;

    const API_KEY: &str = "test-anon-key";

    const TASK_ROW: &str =
        r#"{"id":1,"title":"Buy milk","completed":false,"created_at":"2024-05-01T12:00:00+00:00"}"#;

    #[rstest]
    fn test_tasks_url_strips_trailing_slash() {
        let repository = PostgrestTaskRepository::new("https://example.test/", API_KEY);
        assert_eq!(repository.tasks_url, "https://example.test/rest/v1/tasks");
    }

    #[rstest]
    #[case(
        r#"{"message":"permission denied for table tasks"}"#,
        "permission denied for table tasks"
    )]
    #[case("not json", "HTTP 500 Internal Server Error")]
    #[case(r#"{"code":"42P01"}"#, "HTTP 500 Internal Server Error")]
    fn test_service_error_message(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(
            service_error_message(StatusCode::INTERNAL_SERVER_ERROR, body),
            expected
        );
    }

    #[rstest]
    #[tokio::test]
    async fn test_list_sends_credentials_and_order() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/tasks")
            .match_header("apikey", API_KEY)
            .match_header("authorization", format!("Bearer {API_KEY}").as_str())
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("select".into(), "*".into()),
                Matcher::UrlEncoded("order".into(), LIST_ORDER.into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{TASK_ROW}]"))
            .create_async()
            .await;

        let repository = PostgrestTaskRepository::new(server.url(), API_KEY);
        let tasks = repository.list().await.unwrap();

        mock.assert_async().await;
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title.as_deref(), Some("Buy milk"));
    }

    #[rstest]
    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/rest/v1/tasks")
            .match_header("prefer", "return=representation")
            .match_body(Matcher::Json(
                json!([{ "title": "Buy milk", "completed": false }]),
            ))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(format!("[{TASK_ROW}]"))
            .create_async()
            .await;

        let repository = PostgrestTaskRepository::new(server.url(), API_KEY);
        let task = repository
            .create(NewTask::titled("Buy milk"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(task.id, TaskId::new(1));
        assert!(!task.completed);
    }

    #[rstest]
    #[tokio::test]
    async fn test_set_completed_filters_by_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PATCH", "/rest/v1/tasks")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.7".into()))
            .match_body(Matcher::Json(json!({ "completed": true })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let repository = PostgrestTaskRepository::new(server.url(), API_KEY);
        let matched = repository
            .set_completed(TaskId::new(7), true)
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(!matched);
    }

    #[rstest]
    #[tokio::test]
    async fn test_delete_reports_match() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("DELETE", "/rest/v1/tasks")
            .match_query(Matcher::UrlEncoded("id".into(), "eq.1".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!("[{TASK_ROW}]"))
            .create_async()
            .await;

        let repository = PostgrestTaskRepository::new(server.url(), API_KEY);
        assert!(repository.delete(TaskId::new(1)).await.unwrap());
        mock.assert_async().await;
    }

    #[rstest]
    #[tokio::test]
    async fn test_service_failure_carries_message() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/rest/v1/tasks")
            .match_query(Matcher::Any)
            .with_status(401)
            .with_header("content-type", "application/json")
            .with_body(r#"{"message":"Invalid API key"}"#)
            .create_async()
            .await;

        let repository = PostgrestTaskRepository::new(server.url(), "wrong-key");
        let error = repository.list().await.unwrap_err();

        assert_eq!(
            error,
            RepositoryError::ServiceError("Invalid API key".to_string())
        );
    }
}
