//! Asana API request and response models.
//!
//! Every Asana payload is wrapped in a `data` envelope; listings add a
//! `next_page` cursor.

use serde::{Deserialize, Serialize};

use crate::domain::models::BoardTask;

/// `{"data": ...}` wrapper used by both requests and responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsanaEnvelope<T> {
    pub data: T,
}

/// One page of a listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsanaPage<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub next_page: Option<AsanaNextPage>,
}

/// Cursor for the following page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsanaNextPage {
    pub offset: String,
}

/// A task with the fields requested through `opt_fields`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsanaTask {
    pub gid: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// Request body for adding a story to a task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsanaStoryRequest {
    pub text: String,
}

impl From<AsanaTask> for BoardTask {
    fn from(task: AsanaTask) -> Self {
        Self {
            gid: task.gid,
            name: task.name,
            completed: task.completed,
        }
    }
}
