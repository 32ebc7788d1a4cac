//! Port trait definitions (Hexagonal Architecture)
//!
//! This module defines the async trait interfaces that the two external
//! collaborators must implement:
//! - IssueTracker: read-only issue, comment and membership queries
//! - TaskBoard: task listing, create/update and comments
//!
//! The collector and reconciler only ever see these traits, so both can be
//! exercised against in-memory fakes.

pub mod issue_tracker;
pub mod task_board;

pub use issue_tracker::IssueTracker;
pub use task_board::TaskBoard;
