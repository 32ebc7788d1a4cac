use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Yaml};
use thiserror::Error;

use crate::domain::models::config::{Config, SyncConfig};
use crate::domain::models::RepositoryName;

/// Project config file, created by `issuesync init`
pub const PROJECT_CONFIG_PATH: &str = ".issuesync/config.yaml";

/// Optional local overrides, not meant to be committed
pub const LOCAL_CONFIG_PATH: &str = ".issuesync/local.yaml";

const ENV_PREFIX: &str = "ISSUESYNC_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("No repositories configured. Set sync.repositories to a list of owner/name entries")]
    EmptyRepositories,

    #[error("Invalid repository: {0}")]
    InvalidRepository(String),

    #[error("Repository listed more than once: {0}")]
    DuplicateRepository(String),

    #[error("sync.team_org cannot be empty")]
    EmptyTeamOrg,

    #[error("asana.project_gid cannot be empty")]
    EmptyProjectGid,

    #[error("Missing {0} token. Set it in the config file or via the {1} environment variable")]
    MissingToken(&'static str, &'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and fully validate configuration from the project directory.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. .issuesync/config.yaml (project config, created by init)
    /// 3. .issuesync/local.yaml (local overrides, optional)
    /// 4. Environment variables (ISSUESYNC_* prefix, `__` for nesting)
    ///
    /// `GITHUB_TOKEN` and `ASANA_TOKEN` fill token fields left empty by
    /// every layer above.
    pub fn load() -> Result<Config> {
        let config = Self::extract(None)?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Load and fully validate configuration from a specific file.
    ///
    /// The file replaces both project YAML layers; environment overrides
    /// still apply.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config = Self::extract(Some(path.as_ref()))?;
        Self::validate(&config)?;
        Ok(config)
    }

    /// Merge all layers without validating the sync settings.
    ///
    /// Commands that do not talk to both services (`decode`, `orgs`) only need
    /// a usable logging section, which is checked here.
    pub fn extract(path: Option<&Path>) -> Result<Config> {
        if let Some(path) = path {
            anyhow::ensure!(path.is_file(), "Config file not found: {}", path.display());
        }

        let mut config: Config = Self::figment(path)
            .extract()
            .context(match path {
                Some(path) => format!("Failed to load config from {}", path.display()),
                None => "Failed to extract configuration from figment".to_string(),
            })?;

        Self::apply_token_fallbacks(&mut config);
        Self::validate_logging(&config)?;
        Ok(config)
    }

    fn figment(path: Option<&Path>) -> Figment {
        let figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let figment = match path {
            Some(path) => figment.merge(Yaml::file(path)),
            None => figment
                .merge(Yaml::file(PROJECT_CONFIG_PATH))
                .merge(Yaml::file(LOCAL_CONFIG_PATH)),
        };
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    fn apply_token_fallbacks(config: &mut Config) {
        fill_from_env(&mut config.github.token, "GITHUB_TOKEN");
        fill_from_env(&mut config.asana.token, "ASANA_TOKEN");
    }

    /// Validate everything a sync run needs
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        Self::validate_logging(config)?;
        Self::repository_names(&config.sync)?;

        if config.sync.team_org.trim().is_empty() {
            return Err(ConfigError::EmptyTeamOrg);
        }

        if config.asana.project_gid.trim().is_empty() {
            return Err(ConfigError::EmptyProjectGid);
        }

        if is_blank(config.github.token.as_deref()) {
            return Err(ConfigError::MissingToken("GitHub", "GITHUB_TOKEN"));
        }

        if is_blank(config.asana.token.as_deref()) {
            return Err(ConfigError::MissingToken("Asana", "ASANA_TOKEN"));
        }

        Ok(())
    }

    /// Validate the logging section
    pub fn validate_logging(config: &Config) -> Result<(), ConfigError> {
        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        Ok(())
    }

    /// Parse the configured repositories, in order.
    pub fn repository_names(sync: &SyncConfig) -> Result<Vec<RepositoryName>, ConfigError> {
        if sync.repositories.is_empty() {
            return Err(ConfigError::EmptyRepositories);
        }

        let mut seen = HashSet::new();
        sync.repositories
            .iter()
            .map(|raw| {
                let name: RepositoryName = raw
                    .parse()
                    .map_err(|e| ConfigError::InvalidRepository(format!("{e}")))?;
                if !seen.insert(name.full_name().to_lowercase()) {
                    return Err(ConfigError::DuplicateRepository(name.full_name()));
                }
                Ok(name)
            })
            .collect()
    }

    /// Path of the project config file under `root`
    pub fn project_config_path(root: impl AsRef<Path>) -> PathBuf {
        root.as_ref().join(PROJECT_CONFIG_PATH)
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

fn fill_from_env(slot: &mut Option<String>, var: &str) {
    if !is_blank(slot.as_deref()) {
        return;
    }
    if let Ok(value) = std::env::var(var) {
        if !value.trim().is_empty() {
            *slot = Some(value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::RepositoryLabel;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn valid_config() -> Config {
        let mut config = Config::default();
        config.github.token = Some("gh-token".to_string());
        config.asana.token = Some("asana-token".to_string());
        config.asana.project_gid = "1173676030516145".to_string();
        config.sync.team_org = "awslabs".to_string();
        config.sync.repositories = vec!["awslabs/aws-sdk".to_string()];
        config
    }

    fn write_yaml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sync.lookback_days, 14);
        assert_eq!(config.sync.repository_label, RepositoryLabel::FullName);
        assert!(config.sync.include_pull_requests);
        assert_eq!(config.github.api_base, "https://api.github.com");
        assert_eq!(config.asana.api_base, "https://app.asana.com/api/1.0");
        assert_eq!(config.logging.level, "info");
        assert!(ConfigLoader::validate_logging(&config).is_ok());
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyRepositories)
        ));
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
asana:
  project_gid: '1173676030516145'
sync:
  team_org: awslabs
  lookback_days: 7
  repository_label: name
  repositories:
    - awslabs/aws-sdk
    - awslabs/aws-cdk
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.asana.project_gid, "1173676030516145");
        assert_eq!(config.sync.team_org, "awslabs");
        assert_eq!(config.sync.lookback_days, 7);
        assert_eq!(config.sync.repository_label, RepositoryLabel::Name);
        assert_eq!(config.sync.repositories.len(), 2);
        assert_eq!(config.logging.format, "json");
        assert_eq!(config.github.api_base, "https://api.github.com");
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(ConfigLoader::validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_validate_invalid_repository() {
        let mut config = valid_config();
        config.sync.repositories = vec!["just-a-name".to_string()];
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRepository(_))
        ));
    }

    #[test]
    fn test_validate_duplicate_repository() {
        let mut config = valid_config();
        config.sync.repositories = vec!["awslabs/aws-sdk".to_string(), "AWSLabs/AWS-SDK".to_string()];
        match ConfigLoader::validate(&config) {
            Err(ConfigError::DuplicateRepository(name)) => assert_eq!(name, "AWSLabs/AWS-SDK"),
            other => panic!("Expected DuplicateRepository, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_empty_team_org() {
        let mut config = valid_config();
        config.sync.team_org = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyTeamOrg)
        ));
    }

    #[test]
    fn test_validate_empty_project() {
        let mut config = valid_config();
        config.asana.project_gid = String::new();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyProjectGid)
        ));
    }

    #[test]
    fn test_validate_missing_tokens() {
        let mut config = valid_config();
        config.github.token = None;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingToken("GitHub", _))
        ));

        let mut config = valid_config();
        config.asana.token = Some(String::new());
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::MissingToken("Asana", _))
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = valid_config();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = valid_config();
        config.logging.format = "xml".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogFormat(format) => assert_eq!(format, "xml"),
            other => panic!("Expected InvalidLogFormat error, got {other:?}"),
        }
    }

    #[test]
    fn test_repository_names_keep_order() {
        let mut sync = SyncConfig::default();
        sync.repositories = vec!["b/two".to_string(), "a/one".to_string()];
        let names = ConfigLoader::repository_names(&sync).unwrap();
        assert_eq!(names[0].full_name(), "b/two");
        assert_eq!(names[1].full_name(), "a/one");
    }

    #[test]
    fn test_load_from_file_with_env_tokens() {
        let file = write_yaml(
            r"
asana:
  project_gid: '42'
sync:
  team_org: awslabs
  repositories: [awslabs/aws-sdk]
",
        );

        temp_env::with_vars(
            [
                ("GITHUB_TOKEN", Some("gh-from-env")),
                ("ASANA_TOKEN", Some("asana-from-env")),
                ("ISSUESYNC_SYNC__LOOKBACK_DAYS", Some("3")),
            ],
            || {
                let config = ConfigLoader::load_from_file(file.path()).unwrap();
                assert_eq!(config.github.token.as_deref(), Some("gh-from-env"));
                assert_eq!(config.asana.token.as_deref(), Some("asana-from-env"));
                assert_eq!(config.sync.lookback_days, 3);
                assert_eq!(config.asana.project_gid, "42");
            },
        );
    }

    #[test]
    fn test_configured_token_wins_over_fallback() {
        let file = write_yaml(
            r"
github:
  token: from-file
",
        );

        temp_env::with_vars([("GITHUB_TOKEN", Some("from-env"))], || {
            let config = ConfigLoader::extract(Some(file.path())).unwrap();
            assert_eq!(config.github.token.as_deref(), Some("from-file"));
        });
    }

    #[test]
    fn test_prefixed_env_overrides_file() {
        let file = write_yaml(
            r"
github:
  token: from-file
",
        );

        temp_env::with_vars([("ISSUESYNC_GITHUB__TOKEN", Some("from-prefixed-env"))], || {
            let config = ConfigLoader::extract(Some(file.path())).unwrap();
            assert_eq!(config.github.token.as_deref(), Some("from-prefixed-env"));
        });
    }

    #[test]
    fn test_explicit_config_file_must_exist() {
        let err = ConfigLoader::extract(Some(Path::new("/nonexistent/issuesync.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Config file not found"));
    }

    #[test]
    fn test_extract_rejects_bad_log_format() {
        let file = write_yaml(
            r"
logging:
  format: xml
",
        );

        temp_env::with_vars_unset(["ISSUESYNC_LOGGING__FORMAT"], || {
            assert!(ConfigLoader::extract(Some(file.path())).is_err());
        });
    }
}
