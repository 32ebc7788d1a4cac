//! GitHub issue tracker adapter.
//!
//! Lists open issues, their comments and user organisation memberships
//! through the REST API, and implements [`IssueTracker`](crate::domain::ports::IssueTracker).

pub mod client;
pub mod models;

pub use client::{GitHubClient, GITHUB_API_BASE};
