//! Asana HTTP client.
//!
//! Wraps the Asana REST API 1.0 calls used by the task reconciler: listing
//! a project's tasks, creating and updating tasks, and adding stories.

use async_trait::async_trait;
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{AsanaConfig, BoardTask, TaskFields};
use crate::domain::ports::TaskBoard;
use crate::infrastructure::logging::scrub;

use super::models::{AsanaEnvelope, AsanaPage, AsanaStoryRequest, AsanaTask};

/// Base URL for the Asana API.
pub const ASANA_API_BASE: &str = "https://app.asana.com/api/1.0";

/// Page size requested from listing endpoints (the API maximum).
const PAGE_LIMIT: u32 = 100;

/// Task fields returned by every task endpoint.
const TASK_FIELDS: &str = "name,completed";

/// HTTP client for the Asana REST API.
///
/// All methods return [`SyncResult`] and map HTTP / network errors to
/// [`SyncError::BoardUnavailable`].
#[derive(Debug, Clone)]
pub struct AsanaClient {
    http: Client,
    /// Personal access token.
    token: String,
    api_base: String,
}

impl AsanaClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, ASANA_API_BASE)
    }

    pub fn with_base_url(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the `asana` config section.
    pub fn from_config(config: &AsanaConfig) -> SyncResult<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SyncError::Configuration("Asana token is not set".to_string()))?;
        Ok(Self::with_base_url(token, config.api_base.as_str()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
    }

    async fn send<T: DeserializeOwned>(
        operation: &'static str,
        request: RequestBuilder,
    ) -> SyncResult<T> {
        let resp: Response = request.send().await.map_err(|e| {
            SyncError::board(operation, scrub(&format!("Asana request failed: {e}")))
        })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::board(
                operation,
                scrub(&format!("Asana returned {status}: {body}")),
            ));
        }

        resp.json::<T>().await.map_err(|e| {
            SyncError::board(operation, format!("Asana response parse failed: {e}"))
        })
    }

    async fn write<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        operation: &'static str,
        method: Method,
        path: &str,
        body: &B,
    ) -> SyncResult<T> {
        let request = self
            .request(method, path)
            .query(&[("opt_fields", TASK_FIELDS)])
            .json(&AsanaEnvelope { data: body });
        let envelope: AsanaEnvelope<T> = Self::send(operation, request).await?;
        Ok(envelope.data)
    }

    async fn tasks_page(
        &self,
        project_gid: &str,
        offset: Option<String>,
    ) -> SyncResult<AsanaPage<AsanaTask>> {
        let mut query = vec![
            ("opt_fields", TASK_FIELDS.to_string()),
            ("limit", PAGE_LIMIT.to_string()),
        ];
        if let Some(offset) = offset {
            query.push(("offset", offset));
        }
        let request = self
            .request(Method::GET, &format!("/projects/{project_gid}/tasks"))
            .query(&query);
        Self::send("list_tasks", request).await
    }

    /// Every task in a project, following `next_page` cursors.
    pub fn list_project_tasks<'a>(
        &'a self,
        project_gid: &'a str,
    ) -> impl Stream<Item = SyncResult<AsanaTask>> + Send + 'a {
        // None: done; Some(None): first page; Some(Some(offset)): later pages.
        stream::try_unfold(Some(None), move |cursor: Option<Option<String>>| async move {
            let Some(offset) = cursor else {
                return Ok::<_, SyncError>(None);
            };
            let page = self.tasks_page(project_gid, offset).await?;
            let next = page.next_page.map(|next| Some(next.offset));
            let items = stream::iter(page.data.into_iter().map(Ok::<AsanaTask, SyncError>));
            Ok(Some((items, next)))
        })
        .try_flatten()
    }

    /// Create a task from the given fields.
    pub async fn create(&self, fields: &TaskFields) -> SyncResult<AsanaTask> {
        self.write("create_task", Method::POST, "/tasks", fields)
            .await
    }

    /// Update the given fields of a task.
    pub async fn update(&self, task_gid: &str, fields: &TaskFields) -> SyncResult<AsanaTask> {
        self.write("update_task", Method::PUT, &format!("/tasks/{task_gid}"), fields)
            .await
    }

    /// Add a comment story to a task.
    pub async fn add_story(&self, task_gid: &str, text: &str) -> SyncResult<()> {
        let request = self
            .request(Method::POST, &format!("/tasks/{task_gid}/stories"))
            .json(&AsanaEnvelope {
                data: AsanaStoryRequest {
                    text: text.to_string(),
                },
            });
        let _: AsanaEnvelope<serde_json::Value> = Self::send("add_story", request).await?;
        Ok(())
    }
}

#[async_trait]
impl TaskBoard for AsanaClient {
    fn project_tasks<'a>(&'a self, project_gid: &'a str) -> BoxStream<'a, SyncResult<BoardTask>> {
        self.list_project_tasks(project_gid)
            .map_ok(BoardTask::from)
            .boxed()
    }

    async fn create_task(&self, fields: &TaskFields) -> SyncResult<BoardTask> {
        Ok(self.create(fields).await?.into())
    }

    async fn update_task(&self, task_gid: &str, fields: &TaskFields) -> SyncResult<BoardTask> {
        Ok(self.update(task_gid, fields).await?.into())
    }

    async fn add_comment(&self, task_gid: &str, text: &str) -> SyncResult<()> {
        self.add_story(task_gid, text).await
    }
}
