//! Implementation of the `issuesync init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

const TEMPLATE_HEADER: &str = "\
# issuesync configuration
#
# Tokens are read from GITHUB_TOKEN and ASANA_TOKEN when not set here.
# Any key can be overridden with ISSUESYNC_<SECTION>__<KEY>, for example
# ISSUESYNC_SYNC__LOOKBACK_DAYS=7.
";

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Overwrite an existing configuration file
    #[arg(long, short)]
    pub force: bool,

    /// Target directory (defaults to current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: PathBuf,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        if self.success {
            format!(
                "{}\n\nEdit {} to set sync.repositories, sync.team_org and asana.project_gid.",
                self.message,
                self.config_path.display()
            )
        } else {
            self.message.clone()
        }
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// Template config: every default spelled out, tokens left to the environment.
pub fn render_template() -> Result<String> {
    let body = serde_yaml::to_string(&Config::default()).context("Failed to serialize config template")?;
    Ok(format!("{TEMPLATE_HEADER}{body}"))
}

/// Write the template under `root`, refusing to overwrite unless `force`.
pub async fn write_template(root: &Path, force: bool) -> Result<InitOutput> {
    let config_path = ConfigLoader::project_config_path(root);

    if config_path.exists() && !force {
        return Ok(InitOutput {
            success: false,
            message: format!(
                "{} already exists. Use --force to overwrite.",
                config_path.display()
            ),
            config_path,
        });
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    fs::write(&config_path, render_template()?)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(InitOutput {
        success: true,
        message: format!("Wrote {}", config_path.display()),
        config_path,
    })
}

pub async fn execute(args: InitArgs, json_mode: bool) -> Result<()> {
    let target_path = if args.path.is_absolute() {
        args.path.clone()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(&args.path)
    };

    let result = write_template(&target_path, args.force).await?;
    output(&result, json_mode);
    Ok(())
}
