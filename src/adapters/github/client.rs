//! GitHub HTTP client.
//!
//! Wraps the read-only parts of the GitHub REST API v3 used by the issue
//! collector. Listing endpoints are exposed as lazy streams that request
//! one page of 100 items at a time.

use std::future::Future;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use futures::stream::{self, BoxStream, Stream, StreamExt, TryStreamExt};
use reqwest::{Client, Method, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{GitHubConfig, RepositoryName, TrackerComment, TrackerIssue};
use crate::domain::ports::IssueTracker;
use crate::infrastructure::logging::scrub;

use super::models::{GitHubComment, GitHubIssue, GitHubOrg, GitHubUser};

/// Base URL for the GitHub REST API v3.
pub const GITHUB_API_BASE: &str = "https://api.github.com";

/// Page size requested from listing endpoints (the API maximum).
const PER_PAGE: usize = 100;

type Query = Vec<(&'static str, String)>;

/// Stream every item of a page/per_page listing.
///
/// A page shorter than [`PER_PAGE`] is the last one.
fn paginate<'a, T, F, Fut>(fetch: F) -> impl Stream<Item = SyncResult<T>> + Send + 'a
where
    T: Send + 'a,
    F: Fn(u32) -> Fut + Send + 'a,
    Fut: Future<Output = SyncResult<Vec<T>>> + Send + 'a,
{
    stream::try_unfold(Some(1u32), move |page| {
        let request = page.map(|page| (page, fetch(page)));
        async move {
            let Some((page, request)) = request else {
                return Ok::<_, SyncError>(None);
            };
            let items = request.await?;
            let next = (items.len() >= PER_PAGE).then_some(page + 1);
            Ok(Some((stream::iter(items.into_iter().map(Ok::<T, SyncError>)), next)))
        }
    })
    .try_flatten()
}

/// HTTP client for the GitHub REST API v3.
///
/// All methods return [`SyncResult`] and map HTTP / network errors to
/// [`SyncError::TrackerUnavailable`].
#[derive(Debug, Clone)]
pub struct GitHubClient {
    http: Client,
    /// Personal access token or fine-grained token.
    token: String,
    api_base: String,
}

impl GitHubClient {
    /// Create a client against the public API.
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_base_url(token, GITHUB_API_BASE)
    }

    /// Create a client against another API root (GitHub Enterprise, tests).
    pub fn with_base_url(token: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            token: token.into(),
            api_base: api_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client from the `github` config section.
    pub fn from_config(config: &GitHubConfig) -> SyncResult<Self> {
        let token = config
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| SyncError::Configuration("GitHub token is not set".to_string()))?;
        Ok(Self::with_base_url(token, config.api_base.as_str()))
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, format!("{}{}", self.api_base, path))
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28")
            .header("User-Agent", "issuesync")
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        operation: &'static str,
        path: String,
        query: Query,
    ) -> SyncResult<T> {
        let resp = self
            .request(Method::GET, &path)
            .query(&query)
            .send()
            .await
            .map_err(|e| {
                SyncError::tracker(operation, scrub(&format!("GitHub request failed: {e}")))
            })?;

        if !resp.status().is_success() {
            let status = resp.status();
            let body = resp.text().await.unwrap_or_default();
            return Err(SyncError::tracker(
                operation,
                scrub(&format!("GitHub returned {status}: {body}")),
            ));
        }

        resp.json::<T>().await.map_err(|e| {
            SyncError::tracker(operation, format!("GitHub response parse failed: {e}"))
        })
    }

    fn list<'a, T>(
        &'a self,
        operation: &'static str,
        path: String,
        query: Query,
    ) -> impl Stream<Item = SyncResult<T>> + Send + 'a
    where
        T: DeserializeOwned + Send + 'a,
    {
        paginate(move |page| {
            let mut query = query.clone();
            query.push(("per_page", PER_PAGE.to_string()));
            query.push(("page", page.to_string()));
            self.get_json::<Vec<T>>(operation, path.clone(), query)
        })
    }

    /// Open issues (and pull requests) updated at or after `since`, most
    /// recently updated first.
    pub fn list_open_issues<'a>(
        &'a self,
        repository: &RepositoryName,
        since: DateTime<Utc>,
    ) -> impl Stream<Item = SyncResult<GitHubIssue>> + Send + 'a {
        let path = format!("/repos/{}/{}/issues", repository.owner(), repository.name());
        self.list(
            "list_issues",
            path,
            vec![
                ("state", "open".to_string()),
                ("sort", "updated".to_string()),
                ("direction", "desc".to_string()),
                ("since", since.to_rfc3339_opts(SecondsFormat::Secs, true)),
            ],
        )
    }

    /// Comments on an issue, oldest first.
    pub fn list_issue_comments<'a>(
        &'a self,
        repository: &RepositoryName,
        issue_number: u64,
    ) -> impl Stream<Item = SyncResult<GitHubComment>> + Send + 'a {
        let path = format!(
            "/repos/{}/{}/issues/{}/comments",
            repository.owner(),
            repository.name(),
            issue_number
        );
        self.list("list_comments", path, Vec::new())
    }

    /// Public organisation memberships of a user.
    pub async fn list_user_orgs(&self, login: &str) -> SyncResult<Vec<GitHubOrg>> {
        self.list("list_user_orgs", format!("/users/{login}/orgs"), Vec::new())
            .try_collect()
            .await
    }

    /// Organisations of the authenticated user, private memberships included.
    pub async fn list_authenticated_orgs(&self) -> SyncResult<Vec<GitHubOrg>> {
        self.list("list_own_orgs", "/user/orgs".to_string(), Vec::new())
            .try_collect()
            .await
    }

    /// Login of the token's owner.
    pub async fn authenticated_login(&self) -> SyncResult<String> {
        let user: GitHubUser = self
            .get_json("get_user", "/user".to_string(), Vec::new())
            .await?;
        Ok(user.login)
    }
}

#[async_trait]
impl IssueTracker for GitHubClient {
    fn open_issues<'a>(
        &'a self,
        repository: &'a RepositoryName,
        since: DateTime<Utc>,
    ) -> BoxStream<'a, SyncResult<TrackerIssue>> {
        self.list_open_issues(repository, since)
            .map_ok(TrackerIssue::from)
            .boxed()
    }

    fn issue_comments<'a>(
        &'a self,
        repository: &'a RepositoryName,
        issue_number: u64,
    ) -> BoxStream<'a, SyncResult<TrackerComment>> {
        self.list_issue_comments(repository, issue_number)
            .map_ok(TrackerComment::from)
            .boxed()
    }

    async fn user_orgs(&self, login: &str) -> SyncResult<Vec<String>> {
        let orgs = self.list_user_orgs(login).await?;
        Ok(orgs.into_iter().map(|org| org.login).collect())
    }
}
