//! GitHub REST API response models.
//!
//! These structs map to the GitHub REST API v3 JSON payloads. They stay
//! inside the adapter; the rest of the crate sees [`TrackerIssue`] and
//! [`TrackerComment`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::models::{TrackerComment, TrackerIssue};

/// An issue returned by the GitHub API.
///
/// Issues and pull requests share the same endpoint. Pull requests carry a
/// non-null `pull_request` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubIssue {
    /// Unique numeric identifier for the issue.
    pub id: u64,
    /// Sequential number within the repository (e.g., 42 -> "#42").
    pub number: u64,
    pub title: String,
    /// Issue body text (may be absent or null).
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub pull_request: Option<GitHubPullRequestRef>,
    pub updated_at: DateTime<Utc>,
    /// URL to view the issue in the GitHub UI.
    pub html_url: String,
    /// Number of comments on the issue.
    #[serde(default)]
    pub comments: u64,
}

/// Reference object present on pull requests (absent on plain issues).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubPullRequestRef {
    /// API URL of the pull request resource.
    #[serde(default)]
    pub url: Option<String>,
}

/// The account that wrote a comment. Null for deleted accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
    pub login: String,
}

/// A comment on an issue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubComment {
    pub id: u64,
    #[serde(default)]
    pub user: Option<GitHubUser>,
    #[serde(default)]
    pub body: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An organisation in a user's membership listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOrg {
    pub login: String,
}

/// Login placed on comments whose author account no longer exists.
pub const GHOST_LOGIN: &str = "ghost";

impl From<GitHubIssue> for TrackerIssue {
    fn from(issue: GitHubIssue) -> Self {
        Self {
            id: issue.id,
            number: issue.number,
            title: issue.title,
            body: issue.body,
            updated_at: issue.updated_at,
            html_url: issue.html_url,
            comments: issue.comments,
            is_pull_request: issue.pull_request.is_some(),
        }
    }
}

impl From<GitHubComment> for TrackerComment {
    fn from(comment: GitHubComment) -> Self {
        Self {
            id: comment.id,
            author: comment
                .user
                .map_or_else(|| GHOST_LOGIN.to_string(), |user| user.login),
            body: comment.body.unwrap_or_default(),
            created_at: comment.created_at,
        }
    }
}
