//! Implementation of the `issuesync decode` command.

use anyhow::Result;
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::CommentMarker;
use crate::services::identifier_codec;

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Task name, e.g. "org/repo-[42-NEW]- Crash on start"
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct DecodeOutput {
    pub repository: String,
    pub issue_id: String,
    /// Comment id, or null for a task written before any external comment
    pub comment_id: Option<String>,
    pub title: String,
}

impl CommandOutput for DecodeOutput {
    fn to_human(&self) -> String {
        format!(
            "Repository: {}\nIssue:      {}\nComment:    {}\nTitle:      {}",
            self.repository,
            self.issue_id,
            self.comment_id.as_deref().unwrap_or("none (NEW)"),
            self.title
        )
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn decode_name(name: &str) -> Result<DecodeOutput> {
    let key = identifier_codec::parse(name)?;
    Ok(DecodeOutput {
        repository: key.repository,
        issue_id: key.issue_id,
        comment_id: match key.marker {
            CommentMarker::New => None,
            CommentMarker::Comment(id) => Some(id),
        },
        title: key.title,
    })
}

pub fn execute(args: DecodeArgs, json_mode: bool) -> Result<()> {
    output(&decode_name(&args.name)?, json_mode);
    Ok(())
}
