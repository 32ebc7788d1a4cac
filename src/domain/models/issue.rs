//! Issue-side models.
//!
//! [`TrackerIssue`] and [`TrackerComment`] are what the issue tracker port
//! yields; [`IssueRecord`] is the normalized record the collector hands to
//! the reconciler. None of these outlive a single run.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An open issue as listed by the issue tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerIssue {
    /// Tracker-wide numeric identifier.
    pub id: u64,
    /// Sequential number within the repository.
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub updated_at: DateTime<Utc>,
    /// Canonical URL to view the issue.
    pub html_url: String,
    /// Number of comments on the issue.
    pub comments: u64,
    /// The tracker lists pull requests alongside issues.
    pub is_pull_request: bool,
}

/// A comment on an issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerComment {
    pub id: u64,
    /// Login of the comment author.
    pub author: String,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

/// The most recent comment on an issue, kept only when its author is outside
/// the team organisation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LastComment {
    /// Author handle.
    pub author: String,
    pub body: String,
    /// Comment id, as text.
    pub id: String,
}

impl From<TrackerComment> for LastComment {
    fn from(comment: TrackerComment) -> Self {
        Self {
            author: comment.author,
            body: comment.body,
            id: comment.id.to_string(),
        }
    }
}

/// A qualifying issue, normalized for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueRecord {
    /// Repository text as it appears in task names.
    pub repository: String,
    /// Issue id, as text.
    pub id: String,
    pub title: String,
    /// Issue body; empty when the issue has none.
    pub body: String,
    pub updated_at: DateTime<Utc>,
    pub url: String,
    pub last_comment: Option<LastComment>,
}

impl IssueRecord {
    /// Build a record from a tracker issue with no qualifying comment.
    pub fn from_issue(repository: impl Into<String>, issue: &TrackerIssue) -> Self {
        Self {
            repository: repository.into(),
            id: issue.id.to_string(),
            title: issue.title.clone(),
            body: issue.body.clone().unwrap_or_default(),
            updated_at: issue.updated_at,
            url: issue.html_url.clone(),
            last_comment: None,
        }
    }

    #[must_use]
    pub fn with_last_comment(mut self, comment: LastComment) -> Self {
        self.last_comment = Some(comment);
        self
    }

    /// The comment id to carry in the task name, if any.
    pub fn last_comment_id(&self) -> Option<&str> {
        self.last_comment.as_ref().map(|c| c.id.as_str())
    }
}

/// Qualifying issues of one repository, in tracker order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryIssues {
    pub repository: String,
    pub issues: Vec<IssueRecord>,
}

/// Collector output: repository → issues, in configured repository order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectedIssues {
    pub repositories: Vec<RepositoryIssues>,
}

impl CollectedIssues {
    /// Total number of collected issues across all repositories.
    pub fn issue_count(&self) -> usize {
        self.repositories.iter().map(|r| r.issues.len()).sum()
    }

    /// Issues collected for a repository, if it was scanned.
    pub fn for_repository(&self, repository: &str) -> Option<&[IssueRecord]> {
        self.repositories
            .iter()
            .find(|r| r.repository == repository)
            .map(|r| r.issues.as_slice())
    }

    /// Iterate over every collected issue in order.
    pub fn iter(&self) -> impl Iterator<Item = &IssueRecord> {
        self.repositories.iter().flat_map(|r| r.issues.iter())
    }
}
