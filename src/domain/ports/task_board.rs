//! Task board port.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::errors::SyncResult;
use crate::domain::models::{BoardTask, TaskFields};

/// Access to the task-tracking board.
///
/// Tasks are never deleted through this port; only their name, notes and
/// completion flag are written.
#[async_trait]
pub trait TaskBoard: Send + Sync {
    /// Every task in a project, as a lazy single-pass stream.
    fn project_tasks<'a>(&'a self, project_gid: &'a str) -> BoxStream<'a, SyncResult<BoardTask>>;

    /// Create a task; `fields.projects` places it in the project.
    async fn create_task(&self, fields: &TaskFields) -> SyncResult<BoardTask>;

    /// Update the given fields of an existing task.
    async fn update_task(&self, task_gid: &str, fields: &TaskFields) -> SyncResult<BoardTask>;

    /// Append a comment (story) to a task.
    async fn add_comment(&self, task_gid: &str, text: &str) -> SyncResult<()>;
}
