//! issuesync - GitHub issue to Asana task synchronization
//!
//! Finds open issues that were updated recently and are still waiting on a
//! team response, and keeps one tracking task per issue in an Asana project.
//! The task name carries the correlation back to the issue, so no local state
//! is kept between runs.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and the tracker/board ports
//! - **Service Layer** (`services`): name codec, issue collection, task reconciliation
//! - **Application Layer** (`application`): the single-pass sync run
//! - **Adapters** (`adapters`): GitHub and Asana HTTP clients
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use issuesync::{ConfigLoader, SyncRunner};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ConfigLoader::load()?;
//!     let report = SyncRunner::from_config(&config)?.run(false).await?;
//!     println!("created {} tasks", report.created);
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use application::{SyncReport, SyncRunner, SyncSettings};
pub use domain::errors::{SyncError, SyncResult};
pub use domain::models::{
    BoardTask, CollectedIssues, CommentMarker, Config, IssueRecord, LastComment, RepositoryName,
    TaskKey,
};
pub use domain::ports::{IssueTracker, TaskBoard};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{IssueCollector, TaskReconciler};
