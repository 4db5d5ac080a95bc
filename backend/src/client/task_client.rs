//! Typed HTTP client for the task endpoints.

use reqwest::Response;
use uuid::Uuid;

use crate::{
    create_task_request::NewTask,
    error_body::ErrorBody,
    health_response::HealthResponse,
    task::Task,
    task_controller::NEXT_CURSOR_HEADER,
    task_list_query::TaskPage,
    task_status::TaskStatus,
    update_task_request::TaskPatch,
};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("server answered {}: {}", .0.code, .0.message)]
    Api(ErrorBody),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Http(e) => e.status().map(|s| s.as_u16()),
            ClientError::Api(body) => Some(body.code),
        }
    }
}

#[derive(Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    base_url: String,
}

impl TaskClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Every task, following `x-next-cursor` until the server reports no more pages.
    pub async fn fetch_tasks(&self, status: Option<TaskStatus>) -> Result<Vec<Task>, ClientError> {
        let mut tasks = Vec::new();
        let mut cursor = None;
        loop {
            let page = self.fetch_page(status, None, cursor).await?;
            tasks.extend(page.tasks);
            match page.next_cursor {
                Some(next) => cursor = Some(next),
                None => return Ok(tasks),
            }
        }
    }

    pub async fn fetch_page(
        &self,
        status: Option<TaskStatus>,
        limit: Option<usize>,
        cursor: Option<Uuid>,
    ) -> Result<TaskPage, ClientError> {
        let mut query: Vec<(&str, String)> = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.as_str().to_string()));
        }
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        if let Some(cursor) = cursor {
            query.push(("cursor", cursor.to_string()));
        }

        let response = check(self.http.get(self.url("/tasks")).query(&query).send().await?).await?;
        let next_cursor = response
            .headers()
            .get(NEXT_CURSOR_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok());
        let tasks = response.json().await?;
        Ok(TaskPage { tasks, next_cursor })
    }

    pub async fn fetch_task(&self, id: Uuid) -> Result<Task, ClientError> {
        let response = self.http.get(self.url(&format!("/tasks/{id}"))).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn create_task(&self, input: &NewTask) -> Result<Task, ClientError> {
        let response = self.http.post(self.url("/tasks")).json(input).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn update_task(&self, id: Uuid, patch: &TaskPatch) -> Result<Task, ClientError> {
        let response = self.http.put(self.url(&format!("/tasks/{id}"))).json(patch).send().await?;
        Ok(check(response).await?.json().await?)
    }

    pub async fn delete_task(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self.http.delete(self.url(&format!("/tasks/{id}"))).send().await?;
        check(response).await?;
        Ok(())
    }

    pub async fn health(&self) -> Result<HealthResponse, ClientError> {
        let response = self.http.get(self.url("/health")).send().await?;
        Ok(check(response).await?.json().await?)
    }
}

/// Pass successful responses through; turn anything else into `ClientError::Api`.
async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let text = response.text().await?;
    let body = serde_json::from_str::<ErrorBody>(&text).unwrap_or_else(|_| {
        let message = if text.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            text
        };
        ErrorBody::new(status.as_u16(), message)
    });
    tracing::debug!(code = body.code, message = %body.message, "request rejected");
    Err(ClientError::Api(body))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_trailing_slash_is_ignored() {
        let client = TaskClient::new("http://localhost:3001/");
        assert_eq!(client.url("/tasks"), "http://localhost:3001/tasks");
    }

    #[test]
    fn api_errors_expose_their_code() {
        let error = ClientError::Api(ErrorBody::new(404, "Task with ID x not found"));
        assert_eq!(error.status(), Some(404));
        assert_eq!(error.to_string(), "server answered 404: Task with ID x not found");
    }
}
