use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::repository::RepositoryLabel;

/// Main configuration structure for issuesync
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Issue tracker (GitHub) connection
    #[serde(default)]
    pub github: GitHubConfig,

    /// Task board (Asana) connection and target project
    #[serde(default)]
    pub asana: AsanaConfig,

    /// Collection and reconciliation settings
    #[serde(default)]
    pub sync: SyncConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GitHubConfig {
    /// Access token (can also be set via GITHUB_TOKEN env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL for the REST API (for testing / GitHub Enterprise)
    #[serde(default = "default_github_api_base")]
    pub api_base: String,
}

fn default_github_api_base() -> String {
    "https://api.github.com".to_string()
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_github_api_base(),
        }
    }
}

/// Asana configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AsanaConfig {
    /// Personal access token (can also be set via ASANA_TOKEN env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// Base URL for the REST API (for testing/proxies)
    #[serde(default = "default_asana_api_base")]
    pub api_base: String,

    /// Project that holds the tracking tasks
    #[serde(default)]
    pub project_gid: String,
}

fn default_asana_api_base() -> String {
    "https://app.asana.com/api/1.0".to_string()
}

impl Default for AsanaConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_base: default_asana_api_base(),
            project_gid: String::new(),
        }
    }
}

/// Synchronization settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SyncConfig {
    /// Organisation whose members count as the team
    #[serde(default)]
    pub team_org: String,

    /// Days before today within which an issue update still qualifies
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,

    /// Repository full names (`owner/name`), scanned in order
    #[serde(default)]
    pub repositories: Vec<String>,

    /// Repository text placed in task names
    #[serde(default)]
    pub repository_label: RepositoryLabel,

    /// Treat pull requests listed by the issues endpoint as issues
    #[serde(default = "default_include_pull_requests")]
    pub include_pull_requests: bool,
}

const fn default_lookback_days() -> u32 {
    14
}

const fn default_include_pull_requests() -> bool {
    true
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            team_org: String::new(),
            lookback_days: default_lookback_days(),
            repositories: vec![],
            repository_label: RepositoryLabel::default(),
            include_pull_requests: default_include_pull_requests(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for daily-rotated JSON log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
        }
    }
}
