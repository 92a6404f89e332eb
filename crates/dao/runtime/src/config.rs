//! DAO configuration
//!
//! A [`DaoConfig`] is the explicit construction input for one DAO instance.
//! It is usually read from TOML:
//!
//! ```toml
//! name = "treasury-council"
//! resource_policy = "reject"
//!
//! [[members]]
//! id = "alice"
//! roles = ["admin"]
//!
//! [[resources]]
//! kind = "gov/dao.text"
//! display_name = "Text proposal"
//! condition = { type = "members_threshold", threshold = 0.6 }
//! ```

use crate::condition::ConditionSpec;
use crate::membership::InMemoryDirectory;
use crate::resource::ResourcePolicy;
use dao_types::{DaoError, DaoResult, RoleId, VoterId};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Construction input for a DAO
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DaoConfig {
    /// DAO name, used in events and logs
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Duplicate resource registration policy
    #[serde(default)]
    pub resource_policy: ResourcePolicy,

    /// Register the built-in members extension
    #[serde(default = "default_true")]
    pub members_extension: bool,

    #[serde(default)]
    pub logging: LoggingConfig,

    /// Seed for an in-memory member directory
    #[serde(default)]
    pub members: Vec<MemberConfig>,

    /// Resources registered at construction
    #[serde(default)]
    pub resources: Vec<ResourceConfig>,
}

impl Default for DaoConfig {
    fn default() -> Self {
        Self::new("dao")
    }
}

/// One member and the roles it holds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberConfig {
    pub id: VoterId,
    #[serde(default)]
    pub roles: Vec<RoleId>,
}

/// A resource declared in configuration. The handler for `kind` is supplied
/// by the host at construction time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    pub kind: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub description: String,
    pub condition: ConditionSpec,
}

/// Logging configuration, applied by the host binary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaoConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            resource_policy: ResourcePolicy::default(),
            members_extension: true,
            logging: LoggingConfig::default(),
            members: Vec::new(),
            resources: Vec::new(),
        }
    }

    pub fn with_resource_policy(mut self, policy: ResourcePolicy) -> Self {
        self.resource_policy = policy;
        self
    }

    pub fn with_member(mut self, id: impl Into<String>, roles: &[&str]) -> Self {
        self.members.push(MemberConfig {
            id: VoterId::new(id),
            roles: roles.iter().map(|r| RoleId::new(*r)).collect(),
        });
        self
    }

    pub fn with_resource(mut self, kind: impl Into<String>, condition: ConditionSpec) -> Self {
        self.resources.push(ResourceConfig {
            kind: kind.into(),
            display_name: None,
            description: String::new(),
            condition,
        });
        self
    }

    pub fn from_toml_str(contents: &str) -> DaoResult<Self> {
        let config: DaoConfig =
            toml::from_str(contents).map_err(|e| DaoError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> DaoResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| DaoError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&contents)
    }

    /// Structural checks that do not need a member directory
    pub fn validate(&self) -> DaoResult<()> {
        if self.name.trim().is_empty() {
            return Err(DaoError::Config("name must not be empty".into()));
        }
        let mut kinds = std::collections::BTreeSet::new();
        for resource in &self.resources {
            if resource.kind.trim().is_empty() {
                return Err(DaoError::Config("resource kind must not be empty".into()));
            }
            if !kinds.insert(resource.kind.as_str())
                && self.resource_policy == ResourcePolicy::Reject
            {
                return Err(DaoError::DuplicateResourceKind(resource.kind.clone()));
            }
        }
        Ok(())
    }

    /// Build an in-memory directory from `members`
    pub fn directory(&self) -> InMemoryDirectory {
        InMemoryDirectory::with_members(
            self.members
                .iter()
                .map(|m| (m.id.clone(), m.roles.clone())),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::membership::MemberDirectory;

    const COUNCIL: &str = r#"
        name = "council"
        description = "Treasury council"
        resource_policy = "reject"

        [logging]
        level = "debug"

        [[members]]
        id = "alice"
        roles = ["admin"]

        [[members]]
        id = "bob"
        roles = ["admin", "CFO"]

        [[members]]
        id = "carol"

        [[resources]]
        kind = "gov/dao.text"
        display_name = "Text proposal"
        condition = { type = "members_threshold", threshold = 0.6 }
    "#;

    #[test]
    fn test_parse_full_config() {
        let config = DaoConfig::from_toml_str(COUNCIL).unwrap();
        assert_eq!(config.name, "council");
        assert_eq!(config.resource_policy, ResourcePolicy::Reject);
        assert!(config.members_extension);
        assert_eq!(config.logging.level, "debug");
        assert!(!config.logging.json);
        assert_eq!(config.members.len(), 3);
        assert!(config.members[2].roles.is_empty());
        assert_eq!(
            config.resources[0].condition,
            ConditionSpec::MembersThreshold { threshold: 0.6 }
        );
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config = DaoConfig::from_toml_str(r#"name = "tiny""#).unwrap();
        assert_eq!(config.resource_policy, ResourcePolicy::Replace);
        assert_eq!(config.logging, LoggingConfig::default());
        assert!(config.resources.is_empty());
    }

    #[test]
    fn test_directory_from_members() {
        let directory = DaoConfig::from_toml_str(COUNCIL).unwrap().directory();
        assert_eq!(directory.members_count(), 3);
        assert_eq!(directory.role_count(&RoleId::new("admin")), 2);
    }

    #[test]
    fn test_duplicate_kinds_rejected_under_reject_policy() {
        let spec = ConditionSpec::MembersThreshold { threshold: 0.5 };
        let config = DaoConfig::new("dup")
            .with_resource_policy(ResourcePolicy::Reject)
            .with_resource("gov/dao.text", spec.clone())
            .with_resource("gov/dao.text", spec);
        assert!(matches!(
            config.validate(),
            Err(DaoError::DuplicateResourceKind(_))
        ));
    }

    #[test]
    fn test_bad_toml_is_config_error() {
        assert!(matches!(
            DaoConfig::from_toml_str("name = "),
            Err(DaoError::Config(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            DaoConfig::load("/nonexistent/dao.toml"),
            Err(DaoError::Config(_))
        ));
    }
}
