pub mod config;
pub mod issue;
pub mod repository;
pub mod task;

pub use config::{AsanaConfig, Config, GitHubConfig, LoggingConfig, SyncConfig};
pub use issue::{
    CollectedIssues, IssueRecord, LastComment, RepositoryIssues, TrackerComment, TrackerIssue,
};
pub use repository::{RepositoryLabel, RepositoryName};
pub use task::{BoardTask, CommentMarker, TaskFields, TaskKey, TrackingTask, NEW_MARKER};
