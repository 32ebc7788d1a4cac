//! Single-pass synchronization run.
//!
//! Collects qualifying issues, then reconciles them against the board
//! project. The run aborts on the first collaborator failure; anything
//! already written to the board stays written.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, Instrument};
use uuid::Uuid;

use crate::adapters::asana::AsanaClient;
use crate::adapters::github::GitHubClient;
use crate::domain::models::{Config, RepositoryName};
use crate::domain::ports::{IssueTracker, TaskBoard};
use crate::infrastructure::config::ConfigLoader;
use crate::services::{ActionOutcome, IssueCollector, SyncAction, TaskReconciler};

/// What one run scans.
#[derive(Debug, Clone)]
pub struct SyncSettings {
    pub repositories: Vec<RepositoryName>,
    pub lookback_days: u32,
    pub team_org: String,
}

/// Summary of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncReport {
    pub run_id: Uuid,
    pub dry_run: bool,
    pub started_at: DateTime<Utc>,
    pub repositories: usize,
    pub issues_collected: usize,
    pub created: usize,
    pub updated: usize,
    pub skipped: usize,
    pub comments_attached: usize,
    pub tasks_listed: usize,
    pub tasks_unrecognized: usize,
    pub outcomes: Vec<ActionOutcome>,
}

/// Wires the collector and reconciler for one run.
pub struct SyncRunner {
    collector: IssueCollector,
    reconciler: TaskReconciler,
    settings: SyncSettings,
}

impl SyncRunner {
    pub fn new(collector: IssueCollector, reconciler: TaskReconciler, settings: SyncSettings) -> Self {
        Self {
            collector,
            reconciler,
            settings,
        }
    }

    /// Build a runner over the given collaborators from validated config.
    pub fn with_collaborators(
        config: &Config,
        tracker: Arc<dyn IssueTracker>,
        board: Arc<dyn TaskBoard>,
    ) -> Result<Self> {
        let repositories = ConfigLoader::repository_names(&config.sync)?;
        let collector = IssueCollector::new(tracker, config.sync.repository_label)
            .with_pull_requests(config.sync.include_pull_requests);
        let reconciler = TaskReconciler::new(board, config.asana.project_gid.clone());
        Ok(Self::new(
            collector,
            reconciler,
            SyncSettings {
                repositories,
                lookback_days: config.sync.lookback_days,
                team_org: config.sync.team_org.clone(),
            },
        ))
    }

    /// Build a runner over the GitHub and Asana HTTP clients.
    pub fn from_config(config: &Config) -> Result<Self> {
        let tracker = GitHubClient::from_config(&config.github)
            .context("Failed to create GitHub client")?;
        let board =
            AsanaClient::from_config(&config.asana).context("Failed to create Asana client")?;
        Self::with_collaborators(config, Arc::new(tracker), Arc::new(board))
    }

    pub fn settings(&self) -> &SyncSettings {
        &self.settings
    }

    /// Run once. With `dry_run`, the board is read but never written.
    pub async fn run(&self, dry_run: bool) -> Result<SyncReport> {
        let run_id = Uuid::new_v4();
        let span = tracing::info_span!("sync_run", %run_id, dry_run);
        self.run_inner(run_id, dry_run).instrument(span).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_inner(&self, run_id: Uuid, dry_run: bool) -> Result<SyncReport> {
        let started_at = Utc::now();
        info!(
            repositories = self.settings.repositories.len(),
            lookback_days = self.settings.lookback_days,
            team_org = %self.settings.team_org,
            project = %self.reconciler.project_gid(),
            "Starting synchronization"
        );

        let collected = self
            .collector
            .collect_at(
                started_at,
                &self.settings.repositories,
                self.settings.lookback_days,
                &self.settings.team_org,
            )
            .await
            .context("Failed to collect issues")?;

        let report = if dry_run {
            self.reconciler.preview(&collected).await
        } else {
            self.reconciler.reconcile(&collected).await
        }
        .context("Failed to reconcile tracking tasks")?;

        let summary = SyncReport {
            run_id,
            dry_run,
            started_at,
            repositories: collected.repositories.len(),
            issues_collected: collected.issue_count(),
            created: report.count(SyncAction::Create),
            updated: report.count(SyncAction::Update),
            skipped: report.count(SyncAction::Skip),
            comments_attached: report.comments_attached(),
            tasks_listed: report.tasks_listed,
            tasks_unrecognized: report.tasks_unrecognized,
            outcomes: report.outcomes,
        };

        info!(
            issues = summary.issues_collected,
            created = summary.created,
            updated = summary.updated,
            skipped = summary.skipped,
            comments = summary.comments_attached,
            "Synchronization complete"
        );

        Ok(summary)
    }
}
