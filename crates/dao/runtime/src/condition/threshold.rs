//! Fractional threshold conditions over members or role holders

use super::{format_percent, ratio, validate_threshold, Condition};
use crate::membership::{DirectoryLookups, HasRoleFn, IsMemberFn, MembersCountFn, RoleCountFn};
use dao_types::{Ballot, DaoResult, RoleId};

/// Satisfied once `approvals / membersCount() >= threshold`, where
/// approvals are `Yes` votes cast by members.
pub struct MembersThreshold {
    threshold: f64,
    is_member: IsMemberFn,
    members_count: MembersCountFn,
}

impl MembersThreshold {
    pub fn new(
        threshold: f64,
        is_member: IsMemberFn,
        members_count: MembersCountFn,
    ) -> DaoResult<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
            is_member,
            members_count,
        })
    }

    pub fn from_lookups(threshold: f64, lookups: &DirectoryLookups) -> DaoResult<Self> {
        Self::new(
            threshold,
            lookups.is_member.clone(),
            lookups.members_count.clone(),
        )
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    fn approvals(&self, ballot: &Ballot) -> u64 {
        ballot
            .yes_voters()
            .filter(|voter| (self.is_member)(*voter))
            .count() as u64
    }
}

impl Condition for MembersThreshold {
    fn eval(&self, ballot: &Ballot) -> bool {
        let total = (self.members_count)();
        if total == 0 {
            return false;
        }
        self.approvals(ballot) as f64 / total as f64 >= self.threshold
    }

    fn signal(&self, ballot: &Ballot) -> f64 {
        ratio(self.approvals(ballot), (self.members_count)())
    }

    fn render(&self) -> String {
        format!("{} of members", format_percent(self.threshold))
    }

    fn render_with_votes(&self, ballot: &Ballot) -> String {
        format!(
            "{} ({}/{} yes, signal {:.2})",
            self.render(),
            self.approvals(ballot),
            (self.members_count)(),
            self.signal(ballot)
        )
    }
}

/// Like [`MembersThreshold`], restricted to holders of one role.
pub struct RoleThreshold {
    threshold: f64,
    role: RoleId,
    has_role: HasRoleFn,
    role_count: RoleCountFn,
}

impl RoleThreshold {
    pub fn new(
        threshold: f64,
        role: RoleId,
        has_role: HasRoleFn,
        role_count: RoleCountFn,
    ) -> DaoResult<Self> {
        Ok(Self {
            threshold: validate_threshold(threshold)?,
            role,
            has_role,
            role_count,
        })
    }

    pub fn from_lookups(
        threshold: f64,
        role: impl Into<RoleId>,
        lookups: &DirectoryLookups,
    ) -> DaoResult<Self> {
        Self::new(
            threshold,
            role.into(),
            lookups.has_role.clone(),
            lookups.role_count.clone(),
        )
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

impl Condition for RoleThreshold {
    fn eval(&self, ballot: &Ballot) -> bool {
        let total = (self.role_count)(&self.role);
        if total == 0 {
            return false;
        }
        self.approvals(ballot) as f64 / total as f64 >= self.threshold
    }

    fn signal(&self, ballot: &Ballot) -> f64 {
        ratio(self.approvals(ballot), (self.role_count)(&self.role))
    }

    fn render(&self) -> String {
        format!("{} of {}", format_percent(self.threshold), self.role)
    }

    fn render_with_votes(&self, ballot: &Ballot) -> String {
        format!(
            "{} ({}/{} yes, signal {:.2})",
            self.render(),
            self.approvals(ballot),
            (self.role_count)(&self.role),
            self.signal(ballot)
        )
    }
}
