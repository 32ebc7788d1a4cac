//! Task reconciler.
//!
//! Maps collected issues onto tracking tasks in the board project. Existing
//! tasks are found only through their encoded names; each issue is then
//! skipped, or its task is updated (renamed and re-opened), or a new task is
//! created. The latest external comment is attached as a story.

use std::collections::HashMap;
use std::sync::Arc;

use futures::TryStreamExt;
use serde::{Deserialize, Serialize};

use crate::domain::errors::SyncResult;
use crate::domain::models::{
    BoardTask, CollectedIssues, CommentMarker, IssueRecord, LastComment, TaskFields, TaskKey,
    TrackingTask,
};
use crate::domain::ports::TaskBoard;

use super::identifier_codec;

/// Existing tracking tasks keyed by (repository, issue id).
#[derive(Debug, Default)]
pub struct TaskIndex {
    entries: HashMap<(String, String), TrackingTask>,
    listed: usize,
    unrecognized: usize,
}

impl TaskIndex {
    /// Index board tasks by their decoded key.
    ///
    /// Tasks whose names do not decode are left out. When two tasks decode to
    /// the same key, the one listed last wins.
    pub fn from_tasks(tasks: impl IntoIterator<Item = BoardTask>) -> Self {
        let mut index = Self::default();
        for task in tasks {
            index.insert(task);
        }
        index
    }

    fn insert(&mut self, task: BoardTask) {
        self.listed += 1;
        let Some(key) = identifier_codec::decode(&task.name) else {
            self.unrecognized += 1;
            return;
        };
        self.entries.insert(
            (key.repository.clone(), key.issue_id.clone()),
            TrackingTask {
                gid: task.gid,
                key,
                completed: task.completed,
            },
        );
    }

    pub fn get(&self, repository: &str, issue_id: &str) -> Option<&TrackingTask> {
        self.entries
            .get(&(repository.to_string(), issue_id.to_string()))
    }

    /// Number of distinct (repository, issue id) keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of tasks listed from the project.
    pub fn listed(&self) -> usize {
        self.listed
    }

    /// Number of listed tasks whose names did not decode.
    pub fn unrecognized(&self) -> usize {
        self.unrecognized
    }
}

/// What to do with one collected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncAction {
    Create,
    Update,
    Skip,
}

impl std::fmt::Display for SyncAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Skip => write!(f, "skip"),
        }
    }
}

/// A decision for one issue, carrying the existing task handle on update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedAction {
    pub issue: IssueRecord,
    pub action: SyncAction,
    pub existing_task: Option<String>,
}

/// Decide skip / update / create for every collected issue, in order.
pub fn plan(index: &TaskIndex, collected: &CollectedIssues) -> Vec<PlannedAction> {
    collected
        .iter()
        .map(|issue| {
            let (action, existing_task) = match index.get(&issue.repository, &issue.id) {
                Some(task) => match issue.last_comment_id() {
                    // Nothing new from outside the team since the task was written.
                    None => (SyncAction::Skip, Some(task.gid.clone())),
                    Some(id) if task.key.marker.matches_comment(id) => {
                        (SyncAction::Skip, Some(task.gid.clone()))
                    }
                    Some(_) => (SyncAction::Update, Some(task.gid.clone())),
                },
                None => (SyncAction::Create, None),
            };
            PlannedAction {
                issue: issue.clone(),
                action,
                existing_task,
            }
        })
        .collect()
}

/// Encoded task name for an issue's current state.
pub fn task_name(issue: &IssueRecord) -> SyncResult<String> {
    identifier_codec::encode(&TaskKey::new(
        issue.repository.as_str(),
        issue.id.as_str(),
        CommentMarker::from_comment_id(issue.last_comment_id()),
        issue.title.as_str(),
    ))
}

/// Task notes: title and link, last update time and the issue body.
pub fn task_notes(issue: &IssueRecord) -> String {
    format!(
        "Title: {} {}\nLast Updated: {}\nDescription: {}",
        issue.title,
        issue.url,
        issue.updated_at.format("%Y-%m-%d %H:%M:%S"),
        issue.body
    )
}

/// Story text for the latest external comment.
pub fn comment_story(comment: &LastComment) -> String {
    format!("User: {}\n{}", comment.author, comment.body)
}

/// Fields to send for a planned create or update.
///
/// Creates place the task in the project; updates re-open the task instead.
pub fn task_fields(issue: &IssueRecord, action: SyncAction, project_gid: &str) -> SyncResult<TaskFields> {
    let mut fields = TaskFields {
        name: task_name(issue)?,
        notes: task_notes(issue),
        projects: None,
        completed: None,
    };
    match action {
        SyncAction::Create => fields.projects = Some(vec![project_gid.to_string()]),
        SyncAction::Update => fields.completed = Some(false),
        SyncAction::Skip => {}
    }
    Ok(fields)
}

/// Result of handling one issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionOutcome {
    pub repository: String,
    pub issue_id: String,
    pub url: String,
    pub action: SyncAction,
    /// Task handle written (or matched, for skips); absent for dry-run creates.
    pub task_gid: Option<String>,
    /// Task name written; absent for skips.
    pub task_name: Option<String>,
    pub comment_attached: bool,
}

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconcileReport {
    pub tasks_listed: usize,
    pub tasks_unrecognized: usize,
    pub outcomes: Vec<ActionOutcome>,
}

impl ReconcileReport {
    pub fn count(&self, action: SyncAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }

    pub fn comments_attached(&self) -> usize {
        self.outcomes.iter().filter(|o| o.comment_attached).count()
    }
}

/// Applies plans against a [`TaskBoard`] project.
pub struct TaskReconciler {
    board: Arc<dyn TaskBoard>,
    project_gid: String,
}

impl TaskReconciler {
    pub fn new(board: Arc<dyn TaskBoard>, project_gid: impl Into<String>) -> Self {
        Self {
            board,
            project_gid: project_gid.into(),
        }
    }

    pub fn project_gid(&self) -> &str {
        &self.project_gid
    }

    /// Read every task of the project and index the ones we recognise.
    pub async fn index_tasks(&self) -> SyncResult<TaskIndex> {
        let mut index = TaskIndex::default();
        let mut stream = self.board.project_tasks(&self.project_gid);
        while let Some(task) = stream.try_next().await? {
            index.insert(task);
        }
        tracing::info!(
            project = %self.project_gid,
            listed = index.listed(),
            indexed = index.len(),
            unrecognized = index.unrecognized(),
            "Indexed existing tracking tasks"
        );
        Ok(index)
    }

    /// Index, plan and apply.
    pub async fn reconcile(&self, collected: &CollectedIssues) -> SyncResult<ReconcileReport> {
        let index = self.index_tasks().await?;
        let planned = plan(&index, collected);
        let outcomes = self.apply(&planned).await?;
        Ok(ReconcileReport {
            tasks_listed: index.listed(),
            tasks_unrecognized: index.unrecognized(),
            outcomes,
        })
    }

    /// Index and plan without writing to the board.
    pub async fn preview(&self, collected: &CollectedIssues) -> SyncResult<ReconcileReport> {
        let index = self.index_tasks().await?;
        let outcomes = plan(&index, collected)
            .into_iter()
            .map(|planned| -> SyncResult<ActionOutcome> {
                let name = match planned.action {
                    SyncAction::Skip => None,
                    SyncAction::Create | SyncAction::Update => Some(task_name(&planned.issue)?),
                };
                Ok(ActionOutcome {
                    repository: planned.issue.repository.clone(),
                    issue_id: planned.issue.id.clone(),
                    url: planned.issue.url.clone(),
                    action: planned.action,
                    task_gid: planned.existing_task,
                    task_name: name,
                    comment_attached: false,
                })
            })
            .collect::<SyncResult<Vec<_>>>()?;
        Ok(ReconcileReport {
            tasks_listed: index.listed(),
            tasks_unrecognized: index.unrecognized(),
            outcomes,
        })
    }

    /// Write every non-skipped action to the board, in order.
    ///
    /// There is no rollback: a failure stops the pass and leaves earlier
    /// writes in place.
    pub async fn apply(&self, planned: &[PlannedAction]) -> SyncResult<Vec<ActionOutcome>> {
        let mut outcomes = Vec::with_capacity(planned.len());
        for action in planned {
            outcomes.push(self.apply_one(action).await?);
        }
        Ok(outcomes)
    }

    async fn apply_one(&self, planned: &PlannedAction) -> SyncResult<ActionOutcome> {
        let issue = &planned.issue;
        let mut outcome = ActionOutcome {
            repository: issue.repository.clone(),
            issue_id: issue.id.clone(),
            url: issue.url.clone(),
            action: planned.action,
            task_gid: planned.existing_task.clone(),
            task_name: None,
            comment_attached: false,
        };

        let task = match (planned.action, planned.existing_task.as_deref()) {
            (SyncAction::Skip, _) => {
                tracing::debug!(url = %issue.url, "No new external activity, skipping");
                return Ok(outcome);
            }
            (SyncAction::Update, Some(task_gid)) => {
                let fields = task_fields(issue, SyncAction::Update, &self.project_gid)?;
                tracing::info!(
                    task_gid = %task_gid,
                    name = %fields.name,
                    "Updating tracking task"
                );
                self.board.update_task(task_gid, &fields).await?;
                outcome.task_name = Some(fields.name);
                task_gid.to_string()
            }
            // An update without a handle cannot happen through `plan`; create instead.
            (SyncAction::Create | SyncAction::Update, _) => {
                let fields = task_fields(issue, SyncAction::Create, &self.project_gid)?;
                tracing::info!(
                    project = %self.project_gid,
                    name = %fields.name,
                    "Creating tracking task"
                );
                let created = self.board.create_task(&fields).await?;
                outcome.action = SyncAction::Create;
                outcome.task_name = Some(fields.name);
                created.gid
            }
        };

        if let Some(comment) = issue.last_comment.as_ref().filter(|c| !c.id.is_empty()) {
            tracing::info!(
                task_gid = %task,
                author = %comment.author,
                "Attaching latest external comment"
            );
            self.board.add_comment(&task, &comment_story(comment)).await?;
            outcome.comment_attached = true;
        }

        outcome.task_gid = Some(task);
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RepositoryIssues;

    fn issue(id: &str, comment_id: Option<&str>) -> IssueRecord {
        IssueRecord {
            repository: "org/repo".to_string(),
            id: id.to_string(),
            title: "Crash on start".to_string(),
            body: "Steps to reproduce".to_string(),
            updated_at: "2024-01-15T10:30:00Z".parse().unwrap(),
            url: format!("https://github.com/org/repo/issues/{id}"),
            last_comment: comment_id.map(|cid| LastComment {
                author: "octocat".to_string(),
                body: "Still broken".to_string(),
                id: cid.to_string(),
            }),
        }
    }

    fn collected(issues: Vec<IssueRecord>) -> CollectedIssues {
        CollectedIssues {
            repositories: vec![RepositoryIssues {
                repository: "org/repo".to_string(),
                issues,
            }],
        }
    }

    fn board_task(gid: &str, name: &str) -> BoardTask {
        BoardTask {
            gid: gid.to_string(),
            name: name.to_string(),
            completed: false,
        }
    }

    #[test]
    fn test_index_skips_unrecognized_names() {
        let index = TaskIndex::from_tasks(vec![
            board_task("1", "org/repo-[42-NEW]- Crash on start"),
            board_task("2", "Quarterly planning"),
        ]);
        assert_eq!(index.listed(), 2);
        assert_eq!(index.unrecognized(), 1);
        assert_eq!(index.len(), 1);
        assert_eq!(index.get("org/repo", "42").unwrap().gid, "1");
        assert!(index.get("org/repo", "43").is_none());
    }

    #[test]
    fn test_index_last_duplicate_wins() {
        let index = TaskIndex::from_tasks(vec![
            board_task("1", "org/repo-[42-NEW]- Crash on start"),
            board_task("2", "org/repo-[42-99]- Crash on start"),
        ]);
        assert_eq!(index.len(), 1);
        let task = index.get("org/repo", "42").unwrap();
        assert_eq!(task.gid, "2");
        assert!(task.key.marker.matches_comment("99"));
    }

    #[test]
    fn test_plan_create_when_unindexed() {
        let planned = plan(&TaskIndex::default(), &collected(vec![issue("42", None)]));
        assert_eq!(planned.len(), 1);
        assert_eq!(planned[0].action, SyncAction::Create);
        assert!(planned[0].existing_task.is_none());
    }

    #[test]
    fn test_plan_skip_without_new_comment() {
        let index = TaskIndex::from_tasks(vec![board_task("1", "org/repo-[42-77]- Crash on start")]);
        let planned = plan(&index, &collected(vec![issue("42", None)]));
        assert_eq!(planned[0].action, SyncAction::Skip);
    }

    #[test]
    fn test_plan_skip_when_comment_already_recorded() {
        let index = TaskIndex::from_tasks(vec![board_task("1", "org/repo-[42-99]- Crash on start")]);
        let planned = plan(&index, &collected(vec![issue("42", Some("99"))]));
        assert_eq!(planned[0].action, SyncAction::Skip);
    }

    #[test]
    fn test_plan_update_on_new_comment() {
        let index = TaskIndex::from_tasks(vec![board_task("1", "org/repo-[42-NEW]- Crash on start")]);
        let planned = plan(&index, &collected(vec![issue("42", Some("99"))]));
        assert_eq!(planned[0].action, SyncAction::Update);
        assert_eq!(planned[0].existing_task.as_deref(), Some("1"));
    }

    #[test]
    fn test_task_notes_format() {
        let notes = task_notes(&issue("42", None));
        assert_eq!(
            notes,
            "Title: Crash on start https://github.com/org/repo/issues/42\n\
             Last Updated: 2024-01-15 10:30:00\n\
             Description: Steps to reproduce"
        );
    }

    #[test]
    fn test_comment_story_format() {
        let record = issue("42", Some("99"));
        let story = comment_story(record.last_comment.as_ref().unwrap());
        assert_eq!(story, "User: octocat\nStill broken");
    }

    #[test]
    fn test_task_fields_create_sets_project() {
        let fields = task_fields(&issue("42", None), SyncAction::Create, "1173").unwrap();
        assert_eq!(fields.name, "org/repo-[42-NEW]- Crash on start");
        assert_eq!(fields.projects, Some(vec!["1173".to_string()]));
        assert_eq!(fields.completed, None);
    }

    #[test]
    fn test_task_fields_update_reopens() {
        let fields = task_fields(&issue("42", Some("99")), SyncAction::Update, "1173").unwrap();
        assert_eq!(fields.name, "org/repo-[42-99]- Crash on start");
        assert_eq!(fields.projects, None);
        assert_eq!(fields.completed, Some(false));
    }

    #[test]
    fn test_report_counts() {
        let outcome = |action, comment_attached| ActionOutcome {
            repository: "org/repo".to_string(),
            issue_id: "1".to_string(),
            url: String::new(),
            action,
            task_gid: None,
            task_name: None,
            comment_attached,
        };
        let report = ReconcileReport {
            tasks_listed: 3,
            tasks_unrecognized: 1,
            outcomes: vec![
                outcome(SyncAction::Create, true),
                outcome(SyncAction::Create, false),
                outcome(SyncAction::Skip, false),
            ],
        };
        assert_eq!(report.count(SyncAction::Create), 2);
        assert_eq!(report.count(SyncAction::Update), 0);
        assert_eq!(report.count(SyncAction::Skip), 1);
        assert_eq!(report.comments_attached(), 1);
    }
}
