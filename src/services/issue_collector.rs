//! Issue collector.
//!
//! Scans the configured repositories for open issues that were updated within
//! the lookback window and are still waiting on a team response: either
//! nobody has commented yet, or the latest commenter is not a member of the
//! team organisation.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use futures::TryStreamExt;

use crate::domain::errors::{SyncError, SyncResult};
use crate::domain::models::{
    CollectedIssues, IssueRecord, RepositoryIssues, RepositoryLabel, RepositoryName,
    TrackerComment,
};
use crate::domain::ports::IssueTracker;

/// Whether an update falls within the lookback window.
///
/// Granularity is the calendar day (UTC): an issue last updated exactly
/// `lookback_days` days before `now` still qualifies, one updated a day
/// earlier does not. This admits up to one day more than an exact
/// `updated_at > now - lookback_days` cutoff: the whole cutoff day counts.
pub fn is_within_lookback(updated_at: DateTime<Utc>, now: DateTime<Utc>, lookback_days: u32) -> bool {
    (now.date_naive() - updated_at.date_naive()).num_days() <= i64::from(lookback_days)
}

/// Start of the first day inside the lookback window.
pub fn lookback_start(now: DateTime<Utc>, lookback_days: u32) -> DateTime<Utc> {
    now.date_naive()
        .checked_sub_days(Days::new(u64::from(lookback_days)))
        .unwrap_or(NaiveDate::MIN)
        .and_time(NaiveTime::MIN)
        .and_utc()
}

/// Team membership: any organisation login equal to the team org.
pub fn is_team_member(orgs: &[String], team_org: &str) -> bool {
    orgs.iter().any(|org| org == team_org)
}

/// Collects qualifying issues through an [`IssueTracker`].
pub struct IssueCollector {
    tracker: Arc<dyn IssueTracker>,
    repository_label: RepositoryLabel,
    include_pull_requests: bool,
}

impl IssueCollector {
    pub fn new(tracker: Arc<dyn IssueTracker>, repository_label: RepositoryLabel) -> Self {
        Self {
            tracker,
            repository_label,
            include_pull_requests: true,
        }
    }

    /// Whether pull requests listed by the tracker count as issues (default: yes).
    #[must_use]
    pub fn with_pull_requests(mut self, include: bool) -> Self {
        self.include_pull_requests = include;
        self
    }

    /// Collect qualifying issues as of now.
    pub async fn collect(
        &self,
        repositories: &[RepositoryName],
        lookback_days: u32,
        team_org: &str,
    ) -> SyncResult<CollectedIssues> {
        self.collect_at(Utc::now(), repositories, lookback_days, team_org)
            .await
    }

    /// Collect qualifying issues relative to `now`.
    ///
    /// Any tracker failure aborts the whole collection.
    pub async fn collect_at(
        &self,
        now: DateTime<Utc>,
        repositories: &[RepositoryName],
        lookback_days: u32,
        team_org: &str,
    ) -> SyncResult<CollectedIssues> {
        let since = lookback_start(now, lookback_days);
        let mut memberships: HashMap<String, bool> = HashMap::new();
        let mut collected = CollectedIssues::default();

        for repository in repositories {
            let label = repository.label(self.repository_label);
            let mut issues = Vec::new();
            let mut listed = 0usize;

            tracing::info!(
                repository = %repository,
                since = %since,
                "Collecting open issues"
            );

            let mut stream = self.tracker.open_issues(repository, since);
            while let Some(issue) = stream.try_next().await? {
                listed += 1;
                if issue.is_pull_request && !self.include_pull_requests {
                    continue;
                }
                if !is_within_lookback(issue.updated_at, now, lookback_days) {
                    continue;
                }

                tracing::info!(url = %issue.html_url, "Collected issue");

                let record = IssueRecord::from_issue(label.as_str(), &issue);
                if issue.comments == 0 {
                    issues.push(record);
                    continue;
                }

                let Some(comment) = self.latest_comment(repository, issue.number).await? else {
                    // The comment count was stale; nothing to attribute.
                    issues.push(record);
                    continue;
                };

                if self
                    .is_member_cached(&comment.author, team_org, &mut memberships)
                    .await?
                {
                    tracing::debug!(
                        url = %issue.html_url,
                        author = %comment.author,
                        "Latest comment is from the team, skipping issue"
                    );
                    continue;
                }

                issues.push(record.with_last_comment(comment.into()));
            }

            tracing::info!(
                repository = %repository,
                listed,
                qualifying = issues.len(),
                "Repository collection complete"
            );

            collected.repositories.push(RepositoryIssues {
                repository: label,
                issues,
            });
        }

        Ok(collected)
    }

    /// The most recently posted comment on an issue.
    async fn latest_comment(
        &self,
        repository: &RepositoryName,
        issue_number: u64,
    ) -> SyncResult<Option<TrackerComment>> {
        self.tracker
            .issue_comments(repository, issue_number)
            .try_fold(None, |latest: Option<TrackerComment>, comment| async move {
                Ok::<_, SyncError>(match latest {
                    Some(current) if current.created_at > comment.created_at => Some(current),
                    _ => Some(comment),
                })
            })
            .await
    }

    async fn is_member_cached(
        &self,
        login: &str,
        team_org: &str,
        memberships: &mut HashMap<String, bool>,
    ) -> SyncResult<bool> {
        if let Some(&member) = memberships.get(login) {
            return Ok(member);
        }
        let orgs = self.tracker.user_orgs(login).await?;
        let member = is_team_member(&orgs, team_org);
        memberships.insert(login.to_string(), member);
        Ok(member)
    }
}
