//! Board-side models.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Literal used in place of a comment id when no external comment is known.
pub const NEW_MARKER: &str = "NEW";

/// The last-comment part of a task identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CommentMarker {
    /// Not yet responded to.
    New,
    /// Id of the latest external comment reflected by the task.
    Comment(String),
}

impl CommentMarker {
    /// Marker for an issue's current latest external comment id, if any.
    pub fn from_comment_id(id: Option<&str>) -> Self {
        match id {
            Some(id) => Self::Comment(id.to_string()),
            None => Self::New,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::New => NEW_MARKER,
            Self::Comment(id) => id,
        }
    }

    /// Whether this marker records exactly the given comment id.
    pub fn matches_comment(&self, id: &str) -> bool {
        matches!(self, Self::Comment(stored) if stored == id)
    }
}

impl fmt::Display for CommentMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The composite key encoded into a tracking task's name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskKey {
    pub repository: String,
    pub issue_id: String,
    pub marker: CommentMarker,
    pub title: String,
}

impl TaskKey {
    pub fn new(
        repository: impl Into<String>,
        issue_id: impl Into<String>,
        marker: CommentMarker,
        title: impl Into<String>,
    ) -> Self {
        Self {
            repository: repository.into(),
            issue_id: issue_id.into(),
            marker,
            title: title.into(),
        }
    }
}

/// A task as listed from the board project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardTask {
    /// Opaque task handle.
    pub gid: String,
    pub name: String,
    #[serde(default)]
    pub completed: bool,
}

/// A board task whose name decoded into a [`TaskKey`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackingTask {
    pub gid: String,
    pub key: TaskKey,
    pub completed: bool,
}

/// Fields sent when creating or updating a task.
///
/// `projects` is only set on create; `completed` is only set on update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub name: String,
    pub notes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projects: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
}
