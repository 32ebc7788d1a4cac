//! Issue tracker port.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;

use crate::domain::errors::SyncResult;
use crate::domain::models::{RepositoryName, TrackerComment, TrackerIssue};

/// Read-only access to the code-hosting service's issues.
///
/// Listing methods return lazy, finite, single-pass streams: pages are
/// fetched only as the stream is polled, and a failed page ends the run.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Open issues of a repository updated at or after `since`.
    ///
    /// `since` is a server-side hint; callers still apply their own recency
    /// rule to each item.
    fn open_issues<'a>(
        &'a self,
        repository: &'a RepositoryName,
        since: DateTime<Utc>,
    ) -> BoxStream<'a, SyncResult<TrackerIssue>>;

    /// Comments on an issue, oldest first.
    fn issue_comments<'a>(
        &'a self,
        repository: &'a RepositoryName,
        issue_number: u64,
    ) -> BoxStream<'a, SyncResult<TrackerComment>>;

    /// Organisation logins the user belongs to.
    async fn user_orgs(&self, login: &str) -> SyncResult<Vec<String>>;
}
