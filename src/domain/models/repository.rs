//! Repository identity.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::SyncError;

/// Which repository text is placed in task names.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepositoryLabel {
    /// `owner/name`
    #[default]
    FullName,
    /// `name` only, as boards populated by earlier tooling expect.
    Name,
}

/// A repository full name of the form `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RepositoryName {
    owner: String,
    name: String,
}

impl RepositoryName {
    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// The repository text used as the first part of a task identifier.
    pub fn label(&self, label: RepositoryLabel) -> String {
        match label {
            RepositoryLabel::FullName => self.full_name(),
            RepositoryLabel::Name => self.name.clone(),
        }
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}

impl FromStr for RepositoryName {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (owner, name) = s.trim().split_once('/').ok_or_else(|| {
            SyncError::Configuration(format!("repository '{s}' must be of the form owner/name"))
        })?;
        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(SyncError::Configuration(format!(
                "repository '{s}' must be of the form owner/name using letters, digits, '-', '_' or '.'"
            )));
        }
        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl TryFrom<String> for RepositoryName {
    type Error = SyncError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<RepositoryName> for String {
    fn from(value: RepositoryName) -> Self {
        value.full_name()
    }
}

impl fmt::Display for RepositoryName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_name() {
        let repo: RepositoryName = "awslabs/aws-instance-scheduler".parse().unwrap();
        assert_eq!(repo.owner(), "awslabs");
        assert_eq!(repo.name(), "aws-instance-scheduler");
        assert_eq!(repo.to_string(), "awslabs/aws-instance-scheduler");
    }

    #[test]
    fn test_parse_rejects_missing_owner() {
        assert!("aws-instance-scheduler".parse::<RepositoryName>().is_err());
        assert!("/repo".parse::<RepositoryName>().is_err());
        assert!("org/".parse::<RepositoryName>().is_err());
    }

    #[test]
    fn test_parse_rejects_nested_path() {
        assert!("org/repo/extra".parse::<RepositoryName>().is_err());
        assert!("org/re po".parse::<RepositoryName>().is_err());
    }

    #[test]
    fn test_label() {
        let repo: RepositoryName = "org/repo".parse().unwrap();
        assert_eq!(repo.label(RepositoryLabel::FullName), "org/repo");
        assert_eq!(repo.label(RepositoryLabel::Name), "repo");
    }

    #[test]
    fn test_serde_as_string() {
        let repo: RepositoryName = serde_json::from_str("\"org/repo\"").unwrap();
        assert_eq!(repo.name(), "repo");
        assert_eq!(serde_json::to_string(&repo).unwrap(), "\"org/repo\"");
        assert!(serde_json::from_str::<RepositoryName>("\"repo\"").is_err());
    }
}
