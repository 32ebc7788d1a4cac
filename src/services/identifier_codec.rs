//! Task name codec.
//!
//! A tracking task carries its correlation to an issue only in its name:
//!
//! ```text
//! <repository>-[<issue id>-<comment id | NEW>]- <title>
//! ```
//!
//! The shape is shared with boards populated by earlier tooling, so it is not
//! escaped. Instead, [`encode`] refuses inputs that [`decode`] could not
//! recover: repository text outside `[A-Za-z0-9_./-]`, non-numeric ids, or an
//! empty title.

use std::sync::LazyLock;

use regex::Regex;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{CommentMarker, TaskKey, NEW_MARKER};

static TASK_NAME_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^([A-Za-z0-9_./-]+)-\[([0-9]+)-([0-9]+|NEW)\]- (.+)$")
        .expect("task name pattern is valid")
});

static REPOSITORY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_./-]+$").expect("repository pattern is valid"));

fn is_numeric(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

/// Encode a key into a task name.
pub fn encode(key: &TaskKey) -> SyncResult<String> {
    if !REPOSITORY_PATTERN.is_match(&key.repository) {
        return Err(SyncError::InvalidKey(format!(
            "repository '{}' contains characters outside [A-Za-z0-9_./-]",
            key.repository
        )));
    }
    if !is_numeric(&key.issue_id) {
        return Err(SyncError::InvalidKey(format!(
            "issue id '{}' is not numeric",
            key.issue_id
        )));
    }
    if let CommentMarker::Comment(id) = &key.marker {
        if !is_numeric(id) {
            return Err(SyncError::InvalidKey(format!("comment id '{id}' is not numeric")));
        }
    }
    if key.title.is_empty() {
        return Err(SyncError::InvalidKey(format!(
            "issue {} in {} has an empty title",
            key.issue_id, key.repository
        )));
    }

    Ok(format!(
        "{}-[{}-{}]- {}",
        key.repository, key.issue_id, key.marker, key.title
    ))
}

/// Decode a task name; `None` means the task is not one of ours.
pub fn decode(name: &str) -> Option<TaskKey> {
    let captures = TASK_NAME_PATTERN.captures(name)?;
    let marker = match &captures[3] {
        NEW_MARKER => CommentMarker::New,
        id => CommentMarker::Comment(id.to_string()),
    };
    Some(TaskKey::new(&captures[1], &captures[2], marker, &captures[4]))
}

/// Decode a task name, reporting a mismatch as [`SyncError::DecodeFailure`].
pub fn parse(name: &str) -> SyncResult<TaskKey> {
    decode(name).ok_or_else(|| SyncError::DecodeFailure(name.to_string()))
}
