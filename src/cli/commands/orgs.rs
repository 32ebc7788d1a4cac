//! Implementation of the `issuesync orgs` command.
//!
//! Lists organisation logins so the right `sync.team_org` can be picked.

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::github::GitHubClient;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::services::issue_collector::is_team_member;

#[derive(Args, Debug)]
pub struct OrgsArgs {
    /// GitHub login to inspect (public memberships only); defaults to the token's owner
    #[arg(long, short)]
    pub user: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct OrgsOutput {
    pub user: String,
    pub orgs: Vec<String>,
    /// Configured team organisation, when set
    pub team_org: Option<String>,
    pub is_team_member: bool,
}

impl CommandOutput for OrgsOutput {
    fn to_human(&self) -> String {
        if self.orgs.is_empty() {
            return format!("{} belongs to no visible organisations", self.user);
        }
        let mut lines = vec![format!("Organisations of {}:", self.user)];
        for org in &self.orgs {
            let marker = if self.team_org.as_deref() == Some(org.as_str()) {
                " (team)"
            } else {
                ""
            };
            lines.push(format!("  - {org}{marker}"));
        }
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub async fn execute(args: OrgsArgs, config: &Config, json_mode: bool) -> Result<()> {
    let client =
        GitHubClient::from_config(&config.github).context("Failed to create GitHub client")?;

    let (user, orgs) = match args.user {
        Some(login) => {
            let orgs = client.list_user_orgs(&login).await?;
            (login, orgs)
        }
        None => {
            let login = client.authenticated_login().await?;
            let orgs = client.list_authenticated_orgs().await?;
            (login, orgs)
        }
    };

    let orgs: Vec<String> = orgs.into_iter().map(|org| org.login).collect();
    let team_org = Some(config.sync.team_org.clone()).filter(|org| !org.is_empty());
    let is_team_member = team_org
        .as_deref()
        .is_some_and(|team| is_team_member(&orgs, team));

    output(
        &OrgsOutput {
            user,
            orgs,
            team_org,
            is_team_member,
        },
        json_mode,
    );
    Ok(())
}
