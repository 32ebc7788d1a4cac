//! Implementation of the `issuesync sync` command.

use anyhow::Result;
use clap::Args;

use crate::application::{SyncReport, SyncRunner};
use crate::cli::output::table::TableFormatter;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug, Default)]
pub struct SyncArgs {
    /// Read both services and report planned actions without writing tasks
    #[arg(long)]
    pub dry_run: bool,
}

impl CommandOutput for SyncReport {
    fn to_human(&self) -> String {
        let formatter = TableFormatter::new();
        let mut lines = vec![if self.dry_run {
            format!("Dry run {} (no tasks written)", self.run_id)
        } else {
            format!("Sync run {}", self.run_id)
        }];

        lines.push(formatter.format_summary(&[
            ("Repositories", self.repositories.to_string()),
            ("Issues collected", self.issues_collected.to_string()),
            ("Created", self.created.to_string()),
            ("Updated", self.updated.to_string()),
            ("Skipped", self.skipped.to_string()),
            ("Comments attached", self.comments_attached.to_string()),
            (
                "Board tasks",
                format!("{} ({} unrecognized)", self.tasks_listed, self.tasks_unrecognized),
            ),
        ]));

        if self.outcomes.is_empty() {
            lines.push("No issues awaiting a team response.".to_string());
        } else {
            lines.push(formatter.format_outcomes(&self.outcomes));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: SyncArgs, config: &Config, json_mode: bool) -> Result<()> {
    ConfigLoader::validate(config)?;
    let runner = SyncRunner::from_config(config)?;
    let report = runner.run(args.dry_run).await?;
    output(&report, json_mode);
    Ok(())
}
