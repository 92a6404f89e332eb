//! Absolute count of approving role holders

use super::Condition;
use crate::membership::{DirectoryLookups, HasRoleFn};
use dao_types::{Ballot, RoleId};

/// Satisfied once at least `count` holders of `role` voted `Yes`.
///
/// A count of zero is vacuously satisfied with a signal of `1.0`.
pub struct RoleCount {
    count: u64,
    role: RoleId,
    has_role: HasRoleFn,
}

impl RoleCount {
    pub fn new(count: u64, role: RoleId, has_role: HasRoleFn) -> Self {
        Self {
            count,
            role,
            has_role,
        }
    }

    pub fn from_lookups(count: u64, role: impl Into<RoleId>, lookups: &DirectoryLookups) -> Self {
        Self::new(count, role.into(), lookups.has_role.clone())
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn role(&self) -> &RoleId {
        &self.role
    }

    fn approvals(&self, ballot: &Ballot) -> u64 {
        ballot
            .yes_voters()
            .filter(|voter| (self.has_role)(*voter, &self.role))
            .count() as u64
    }
}

impl Condition for RoleCount {
    fn eval(&self, ballot: &Ballot) -> bool {
        self.approvals(ballot) >= self.count
    }

    fn signal(&self, ballot: &Ballot) -> f64 {
        if self.count == 0 {
            return 1.0;
        }
        (self.approvals(ballot) as f64 / self.count as f64).min(1.0)
    }

    fn render(&self) -> String {
        format!("{} {}", self.count, self.role)
    }

    fn render_with_votes(&self, ballot: &Ballot) -> String {
        format!(
            "{} ({}/{} yes, signal {:.2})",
            self.render(),
            self.approvals(ballot),
            self.count,
            self.signal(ballot)
        )
    }
}
