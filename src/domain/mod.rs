//! Domain layer for issuesync
//!
//! This module contains the issue and task models, the domain error type and
//! the collaborator ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{SyncError, SyncResult};
