//! Common test utilities for integration tests
//!
//! In-memory issue tracker and task board used by the sync flow tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, BoxStream, StreamExt};

use issuesync::domain::models::{
    BoardTask, RepositoryLabel, RepositoryName, TaskFields, TrackerComment, TrackerIssue,
};
use issuesync::domain::ports::{IssueTracker, TaskBoard};
use issuesync::services::{IssueCollector, TaskReconciler};
use issuesync::{SyncError, SyncResult, SyncRunner, SyncSettings};

pub const PROJECT: &str = "1173676030516145";
pub const TEAM_ORG: &str = "awslabs";

/// Setup test logging
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn repo(full_name: &str) -> RepositoryName {
    full_name.parse().unwrap()
}

pub fn days_ago(days: i64) -> DateTime<Utc> {
    Utc::now() - Duration::days(days)
}

pub fn issue(id: u64, number: u64, title: &str, comments: u64) -> TrackerIssue {
    TrackerIssue {
        id,
        number,
        title: title.to_string(),
        body: Some("Steps to reproduce".to_string()),
        updated_at: days_ago(1),
        html_url: format!("https://github.com/org/repo/issues/{number}"),
        comments,
        is_pull_request: false,
    }
}

pub fn comment(id: u64, author: &str, body: &str, created_at: DateTime<Utc>) -> TrackerComment {
    TrackerComment {
        id,
        author: author.to_string(),
        body: body.to_string(),
        created_at,
    }
}

/// Issue tracker backed by maps, keyed by repository full name.
#[derive(Default)]
pub struct FakeTracker {
    issues: Mutex<HashMap<String, Vec<TrackerIssue>>>,
    comments: Mutex<HashMap<(String, u64), Vec<TrackerComment>>>,
    orgs: HashMap<String, Vec<String>>,
    failing_repository: Option<String>,
    pub org_lookups: Mutex<Vec<String>>,
    pub since_requested: Mutex<Vec<DateTime<Utc>>>,
}

impl FakeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_issue(self, repository: &str, issue: TrackerIssue) -> Self {
        self.add_issue(repository, issue);
        self
    }

    pub fn with_comment(self, repository: &str, issue_number: u64, comment: TrackerComment) -> Self {
        self.comments
            .lock()
            .unwrap()
            .entry((repository.to_string(), issue_number))
            .or_default()
            .push(comment);
        self
    }

    pub fn with_member(mut self, login: &str, orgs: &[&str]) -> Self {
        self.orgs.insert(
            login.to_string(),
            orgs.iter().map(|org| (*org).to_string()).collect(),
        );
        self
    }

    pub fn failing_on(mut self, repository: &str) -> Self {
        self.failing_repository = Some(repository.to_string());
        self
    }

    pub fn add_issue(&self, repository: &str, issue: TrackerIssue) {
        self.issues
            .lock()
            .unwrap()
            .entry(repository.to_string())
            .or_default()
            .push(issue);
    }

    pub fn add_comment(&self, repository: &str, issue_number: u64, comment: TrackerComment) {
        self.comments
            .lock()
            .unwrap()
            .entry((repository.to_string(), issue_number))
            .or_default()
            .push(comment);
    }
}

#[async_trait]
impl IssueTracker for FakeTracker {
    fn open_issues<'a>(
        &'a self,
        repository: &'a RepositoryName,
        since: DateTime<Utc>,
    ) -> BoxStream<'a, SyncResult<TrackerIssue>> {
        self.since_requested.lock().unwrap().push(since);
        if self.failing_repository.as_deref() == Some(repository.full_name().as_str()) {
            return stream::once(async {
                Err(SyncError::tracker("list_issues", "GitHub returned 503 Service Unavailable"))
            })
            .boxed();
        }
        let issues = self
            .issues
            .lock()
            .unwrap()
            .get(&repository.full_name())
            .cloned()
            .unwrap_or_default();
        stream::iter(issues.into_iter().map(Ok)).boxed()
    }

    fn issue_comments<'a>(
        &'a self,
        repository: &'a RepositoryName,
        issue_number: u64,
    ) -> BoxStream<'a, SyncResult<TrackerComment>> {
        let comments = self
            .comments
            .lock()
            .unwrap()
            .get(&(repository.full_name(), issue_number))
            .cloned()
            .unwrap_or_default();
        stream::iter(comments.into_iter().map(Ok)).boxed()
    }

    async fn user_orgs(&self, login: &str) -> SyncResult<Vec<String>> {
        self.org_lookups.lock().unwrap().push(login.to_string());
        Ok(self.orgs.get(login).cloned().unwrap_or_default())
    }
}

/// A write the board received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardCall {
    Create(TaskFields),
    Update(String, TaskFields),
    Comment(String, String),
}

/// Single-project task board held in memory.
#[derive(Default)]
pub struct FakeBoard {
    tasks: Mutex<Vec<BoardTask>>,
    calls: Mutex<Vec<BoardCall>>,
    next_gid: AtomicUsize,
    creates_allowed: Mutex<Option<usize>>,
    fail_listing: AtomicBool,
    fail_comments: AtomicBool,
}

impl FakeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_task(self, gid: &str, name: &str) -> Self {
        self.tasks.lock().unwrap().push(BoardTask {
            gid: gid.to_string(),
            name: name.to_string(),
            completed: false,
        });
        self
    }

    pub fn with_completed_task(self, gid: &str, name: &str) -> Self {
        self.tasks.lock().unwrap().push(BoardTask {
            gid: gid.to_string(),
            name: name.to_string(),
            completed: true,
        });
        self
    }

    /// Fail every create after the first `allowed`.
    pub fn failing_creates_after(self, allowed: usize) -> Self {
        *self.creates_allowed.lock().unwrap() = Some(allowed);
        self
    }

    pub fn failing_listing(self) -> Self {
        self.fail_listing.store(true, Ordering::SeqCst);
        self
    }

    /// Reject every story write.
    pub fn failing_comments(self) -> Self {
        self.fail_comments.store(true, Ordering::SeqCst);
        self
    }

    pub fn tasks(&self) -> Vec<BoardTask> {
        self.tasks.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<BoardCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn task(&self, gid: &str) -> Option<BoardTask> {
        self.tasks().into_iter().find(|task| task.gid == gid)
    }
}

#[async_trait]
impl TaskBoard for FakeBoard {
    fn project_tasks<'a>(&'a self, project_gid: &'a str) -> BoxStream<'a, SyncResult<BoardTask>> {
        assert_eq!(project_gid, PROJECT);
        if self.fail_listing.load(Ordering::SeqCst) {
            return stream::once(async {
                Err(SyncError::board("list_tasks", "Asana returned 500 Internal Server Error"))
            })
            .boxed();
        }
        stream::iter(self.tasks().into_iter().map(Ok)).boxed()
    }

    async fn create_task(&self, fields: &TaskFields) -> SyncResult<BoardTask> {
        {
            let mut allowed = self.creates_allowed.lock().unwrap();
            if let Some(remaining) = allowed.as_mut() {
                if *remaining == 0 {
                    return Err(SyncError::board("create_task", "Asana returned 403 Forbidden"));
                }
                *remaining -= 1;
            }
        }
        self.calls.lock().unwrap().push(BoardCall::Create(fields.clone()));
        let task = BoardTask {
            gid: format!("task-{}", self.next_gid.fetch_add(1, Ordering::SeqCst) + 1),
            name: fields.name.clone(),
            completed: fields.completed.unwrap_or(false),
        };
        self.tasks.lock().unwrap().push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, task_gid: &str, fields: &TaskFields) -> SyncResult<BoardTask> {
        self.calls
            .lock()
            .unwrap()
            .push(BoardCall::Update(task_gid.to_string(), fields.clone()));
        let mut tasks = self.tasks.lock().unwrap();
        let task = tasks
            .iter_mut()
            .find(|task| task.gid == task_gid)
            .ok_or_else(|| SyncError::board("update_task", format!("Asana returned 404 for {task_gid}")))?;
        task.name = fields.name.clone();
        if let Some(completed) = fields.completed {
            task.completed = completed;
        }
        Ok(task.clone())
    }

    async fn add_comment(&self, task_gid: &str, text: &str) -> SyncResult<()> {
        if self.fail_comments.load(Ordering::SeqCst) {
            return Err(SyncError::board(
                "add_story",
                format!("Asana returned 500 Internal Server Error for {task_gid}"),
            ));
        }
        self.calls
            .lock()
            .unwrap()
            .push(BoardCall::Comment(task_gid.to_string(), text.to_string()));
        Ok(())
    }
}

/// Runner over the fakes with the default settings used across tests.
pub fn runner(
    tracker: Arc<FakeTracker>,
    board: Arc<FakeBoard>,
    repositories: &[&str],
    label: RepositoryLabel,
) -> SyncRunner {
    SyncRunner::new(
        IssueCollector::new(tracker, label),
        TaskReconciler::new(board, PROJECT),
        SyncSettings {
            repositories: repositories.iter().map(|name| repo(name)).collect(),
            lookback_days: 14,
            team_org: TEAM_ORG.to_string(),
        },
    )
}
