//! HTTP client for the task API.
//!
//! Every call is a single attempt: any non-success status becomes
//! `TaskApiError::Rejected`, transport and decode failures become
//! `TaskApiError::Network`. Nothing is retried.

use std::sync::Arc;

use reqwest::{header, Client, Response};
use url::Url;

use crate::error::TaskApiError;
use crate::task::{ApiInfo, Priority, Task, TaskDraft, TaskStatus};

/// Task API client
#[derive(Debug, Clone)]
pub struct TaskClient {
    base_url: Url,
    prefix: String,
    client: Arc<Client>,
}

impl TaskClient {
    /// Create a client for `base_url`, with routes under `/api`.
    pub fn new(base_url: &str) -> Result<Self, TaskApiError> {
        Self::with_options(base_url, "/api", false)
    }

    /// Create a client with an explicit route prefix.
    ///
    /// `allow_invalid_certs` is honored in debug builds only.
    pub fn with_options(
        base_url: &str,
        prefix: &str,
        allow_invalid_certs: bool,
    ) -> Result<Self, TaskApiError> {
        let base_url = Url::parse(base_url)?;

        let accept_invalid = cfg!(debug_assertions) && allow_invalid_certs;
        if accept_invalid {
            tracing::warn!("Accepting invalid TLS certificates for {}", base_url);
        }

        let client = Client::builder()
            .danger_accept_invalid_certs(accept_invalid)
            .build()?;

        Ok(Self {
            base_url,
            prefix: prefix.trim_end_matches('/').to_string(),
            client: Arc::new(client),
        })
    }

    /// Base URL this client talks to.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url, TaskApiError> {
        Ok(self.base_url.join(&format!("{}{}", self.prefix, path))?)
    }

    /// Build request with JSON headers
    fn build_request(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header(header::ACCEPT, "application/json")
    }

    /// Check response status and extract error
    async fn check_response(response: Response) -> Result<Response, TaskApiError> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TaskApiError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// List all tasks (`GET /api/tasks`).
    pub async fn list_tasks(&self) -> Result<Vec<Task>, TaskApiError> {
        self.list_tasks_filtered(None, None).await
    }

    /// List tasks, letting the server filter by status and/or priority.
    pub async fn list_tasks_filtered(
        &self,
        status: Option<&TaskStatus>,
        priority: Option<&Priority>,
    ) -> Result<Vec<Task>, TaskApiError> {
        let mut url = self.endpoint("/tasks")?;
        {
            let mut query = url.query_pairs_mut();
            if let Some(status) = status {
                query.append_pair("status", status.as_str());
            }
            if let Some(priority) = priority {
                query.append_pair("priority", priority.as_str());
            }
        }
        // An empty query_pairs_mut() still leaves a trailing '?'
        if url.query() == Some("") {
            url.set_query(None);
        }

        tracing::debug!("GET {}", url);

        let response = self.build_request(self.client.get(url)).send().await?;
        let tasks: Vec<Task> = Self::check_response(response).await?.json().await?;

        tracing::debug!("Fetched {} tasks", tasks.len());
        Ok(tasks)
    }

    /// Fetch one task (`GET /api/tasks/{id}`).
    pub async fn get_task(&self, id: i64) -> Result<Task, TaskApiError> {
        let url = self.endpoint(&format!("/tasks/{}", id))?;
        tracing::debug!("GET {}", url);

        let response = self.build_request(self.client.get(url)).send().await?;
        Ok(Self::check_response(response).await?.json().await?)
    }

    /// Create a task (`POST /api/tasks`); returns the record with its assigned id.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, TaskApiError> {
        let url = self.endpoint("/tasks")?;
        tracing::debug!(title = %draft.title, "POST {}", url);

        let response = self
            .build_request(self.client.post(url).json(draft))
            .send()
            .await?;
        Ok(Self::check_response(response).await?.json().await?)
    }

    /// Replace a task's fields (`PUT /api/tasks/{id}`).
    pub async fn update_task(&self, id: i64, draft: &TaskDraft) -> Result<Task, TaskApiError> {
        let url = self.endpoint(&format!("/tasks/{}", id))?;
        tracing::debug!("PUT {}", url);

        let response = self
            .build_request(self.client.put(url).json(draft))
            .send()
            .await?;
        Ok(Self::check_response(response).await?.json().await?)
    }

    /// Delete a task (`DELETE /api/tasks/{id}`). Any response body is ignored.
    pub async fn delete_task(&self, id: i64) -> Result<(), TaskApiError> {
        let url = self.endpoint(&format!("/tasks/{}", id))?;
        tracing::debug!("DELETE {}", url);

        let response = self.build_request(self.client.delete(url)).send().await?;
        Self::check_response(response).await?;
        Ok(())
    }

    /// Probe `GET /api/health`.
    ///
    /// Returns `Ok(false)` when the server answers with a failure status and
    /// `Err` only when it cannot be reached.
    pub async fn health_check(&self) -> Result<bool, TaskApiError> {
        let url = self.endpoint("/health")?;
        let response = self.build_request(self.client.get(url)).send().await?;
        let healthy = response.status().is_success();
        if !healthy {
            tracing::warn!("Health check returned {}", response.status());
        }
        Ok(healthy)
    }

    /// Fetch the service description (`GET /api`).
    pub async fn api_info(&self) -> Result<ApiInfo, TaskApiError> {
        let url = self.endpoint("")?;
        let response = self.build_request(self.client.get(url)).send().await?;
        Ok(Self::check_response(response).await?.json().await?)
    }
}
