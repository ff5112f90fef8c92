use async_trait::async_trait;
use serde::Deserialize;

use crate::types::Task;
use crate::upstream::UpstreamError;

#[async_trait]
pub trait TaskSource: Send + Sync {
    async fn fetch_tasks(&self, token: &str) -> Result<Vec<Task>, UpstreamError>;
}

/// Task source backed by the task service's `GET /task` endpoint,
/// authenticated with the caller's bearer credential.
pub struct HttpTaskSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTaskSource {
    pub fn new(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TasksResponse {
    #[serde(default)]
    tareas: Vec<Task>,
}

#[async_trait]
impl TaskSource for HttpTaskSource {
    async fn fetch_tasks(&self, token: &str) -> Result<Vec<Task>, UpstreamError> {
        let response = self
            .client
            .get(format!("{}/task", self.base_url))
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }

        let body: TasksResponse = response
            .json()
            .await
            .map_err(|_| UpstreamError::MalformedResponse)?;

        Ok(body.tareas)
    }
}
