//! Declarative condition trees, as written in configuration

use super::{And, MembersThreshold, Or, RoleCount, RoleThreshold, SharedCondition};
use crate::membership::DirectoryLookups;
use dao_types::{DaoResult, RoleId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Serializable description of a built-in condition tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ConditionSpec {
    MembersThreshold { threshold: f64 },
    RoleThreshold { threshold: f64, role: RoleId },
    RoleCount { count: u64, role: RoleId },
    And { conditions: Vec<ConditionSpec> },
    Or { conditions: Vec<ConditionSpec> },
}

impl ConditionSpec {
    /// Build the condition tree bound to `lookups`.
    ///
    /// Fails with `InvalidCondition` if any threshold is outside `(0, 1]`.
    pub fn build(&self, lookups: &DirectoryLookups) -> DaoResult<SharedCondition> {
        let condition: SharedCondition = match self {
            ConditionSpec::MembersThreshold { threshold } => {
                Arc::new(MembersThreshold::from_lookups(*threshold, lookups)?)
            }
            ConditionSpec::RoleThreshold { threshold, role } => Arc::new(
                RoleThreshold::from_lookups(*threshold, role.clone(), lookups)?,
            ),
            ConditionSpec::RoleCount { count, role } => {
                Arc::new(RoleCount::from_lookups(*count, role.clone(), lookups))
            }
            ConditionSpec::And { conditions } => {
                Arc::new(And::new(Self::build_all(conditions, lookups)?))
            }
            ConditionSpec::Or { conditions } => {
                Arc::new(Or::new(Self::build_all(conditions, lookups)?))
            }
        };
        Ok(condition)
    }

    fn build_all(
        specs: &[ConditionSpec],
        lookups: &DirectoryLookups,
    ) -> DaoResult<Vec<SharedCondition>> {
        specs.iter().map(|spec| spec.build(lookups)).collect()
    }
}
