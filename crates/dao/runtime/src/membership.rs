//! Member and role lookups consumed by leaf conditions
//!
//! Membership storage belongs to the host. The engine only reads it, through
//! the function-shaped lookups a condition captures at construction time.
//! [`InMemoryDirectory`] is a reference directory for hosts and tests.

use dao_types::{RoleId, VoterId};
use parking_lot::RwLock;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;
use tracing::debug;

/// `isMember(id)`
pub type IsMemberFn = Arc<dyn Fn(&VoterId) -> bool + Send + Sync>;
/// `membersCount()`
pub type MembersCountFn = Arc<dyn Fn() -> u64 + Send + Sync>;
/// `hasRole(id, role)`
pub type HasRoleFn = Arc<dyn Fn(&VoterId, &RoleId) -> bool + Send + Sync>;
/// `roleCount(role)`
pub type RoleCountFn = Arc<dyn Fn(&RoleId) -> u64 + Send + Sync>;

/// Read access to a DAO's members and their roles
pub trait MemberDirectory: Send + Sync {
    fn is_member(&self, id: &VoterId) -> bool;

    fn members_count(&self) -> u64;

    fn has_role(&self, id: &VoterId, role: &RoleId) -> bool;

    fn role_count(&self, role: &RoleId) -> u64;
}

/// Lookups bound to one directory, ready to hand to conditions
#[derive(Clone)]
pub struct DirectoryLookups {
    pub is_member: IsMemberFn,
    pub members_count: MembersCountFn,
    pub has_role: HasRoleFn,
    pub role_count: RoleCountFn,
}

impl DirectoryLookups {
    pub fn from_directory(directory: Arc<dyn MemberDirectory>) -> Self {
        let d1 = Arc::clone(&directory);
        let d2 = Arc::clone(&directory);
        let d3 = Arc::clone(&directory);
        let d4 = directory;
        Self {
            is_member: Arc::new(move |id: &VoterId| d1.is_member(id)),
            members_count: Arc::new(move || d2.members_count()),
            has_role: Arc::new(move |id: &VoterId, role: &RoleId| d3.has_role(id, role)),
            role_count: Arc::new(move |role: &RoleId| d4.role_count(role)),
        }
    }
}

/// In-memory member directory: member → role set
#[derive(Debug, Default)]
pub struct InMemoryDirectory {
    members: RwLock<BTreeMap<VoterId, BTreeSet<RoleId>>>,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory from `(member, roles)` pairs
    pub fn with_members<I, R>(members: I) -> Self
    where
        I: IntoIterator<Item = (VoterId, R)>,
        R: IntoIterator<Item = RoleId>,
    {
        let directory = Self::new();
        for (id, roles) in members {
            directory.add_member(id, roles);
        }
        directory
    }

    /// Add a member, merging roles if it already exists.
    ///
    /// Returns `true` if the member was new.
    pub fn add_member(&self, id: VoterId, roles: impl IntoIterator<Item = RoleId>) -> bool {
        let mut members = self.members.write();
        let is_new = !members.contains_key(&id);
        let entry = members.entry(id.clone()).or_default();
        entry.extend(roles);
        debug!(member = %id, roles = ?entry, is_new, "Member recorded");
        is_new
    }

    pub fn remove_member(&self, id: &VoterId) -> bool {
        let removed = self.members.write().remove(id).is_some();
        if removed {
            debug!(member = %id, "Member removed");
        }
        removed
    }

    /// Grant a role to an existing member. Returns `false` for non-members.
    pub fn grant_role(&self, id: &VoterId, role: RoleId) -> bool {
        match self.members.write().get_mut(id) {
            Some(roles) => {
                roles.insert(role);
                true
            }
            None => false,
        }
    }

    pub fn revoke_role(&self, id: &VoterId, role: &RoleId) -> bool {
        self.members.write()
            .get_mut(id)
            .map(|roles| roles.remove(role))
            .unwrap_or(false)
    }

    /// Members in id order
    pub fn members(&self) -> Vec<VoterId> {
        self.members.read().keys().cloned().collect()
    }
}

impl MemberDirectory for InMemoryDirectory {
    fn is_member(&self, id: &VoterId) -> bool {
        self.members.read().contains_key(id)
    }

    fn members_count(&self) -> u64 {
        self.members.read().len() as u64
    }

    fn has_role(&self, id: &VoterId, role: &RoleId) -> bool {
        self.members.read()
            .get(id)
            .map(|roles| roles.contains(role))
            .unwrap_or(false)
    }

    fn role_count(&self, role: &RoleId) -> u64 {
        self.members.read()
            .values()
            .filter(|roles| roles.contains(role))
            .count() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn council() -> InMemoryDirectory {
        InMemoryDirectory::with_members([
            (VoterId::new("alice"), vec![RoleId::new("admin")]),
            (VoterId::new("bob"), vec![RoleId::new("admin"), RoleId::new("CFO")]),
            (VoterId::new("carol"), vec![]),
        ])
    }

    #[test]
    fn test_counts() {
        let directory = council();
        assert_eq!(directory.members_count(), 3);
        assert_eq!(directory.role_count(&RoleId::new("admin")), 2);
        assert_eq!(directory.role_count(&RoleId::new("CFO")), 1);
        assert_eq!(directory.role_count(&RoleId::new("auditor")), 0);
    }

    #[test]
    fn test_role_lookup() {
        let directory = council();
        assert!(directory.has_role(&VoterId::new("bob"), &RoleId::new("CFO")));
        assert!(!directory.has_role(&VoterId::new("alice"), &RoleId::new("CFO")));
        assert!(!directory.has_role(&VoterId::new("mallory"), &RoleId::new("admin")));
    }

    #[test]
    fn test_add_merges_roles() {
        let directory = council();
        assert!(!directory.add_member(VoterId::new("carol"), vec![RoleId::new("CFO")]));
        assert_eq!(directory.role_count(&RoleId::new("CFO")), 2);
        assert_eq!(directory.members_count(), 3);
    }

    #[test]
    fn test_grant_and_revoke() {
        let directory = council();
        assert!(directory.grant_role(&VoterId::new("carol"), RoleId::new("admin")));
        assert!(!directory.grant_role(&VoterId::new("mallory"), RoleId::new("admin")));
        assert_eq!(directory.role_count(&RoleId::new("admin")), 3);

        assert!(directory.revoke_role(&VoterId::new("alice"), &RoleId::new("admin")));
        assert!(!directory.revoke_role(&VoterId::new("alice"), &RoleId::new("admin")));
        assert_eq!(directory.role_count(&RoleId::new("admin")), 2);
    }

    #[test]
    fn test_lookups_track_directory_changes() {
        let directory = Arc::new(council());
        let lookups = DirectoryLookups::from_directory(directory.clone());

        assert_eq!((lookups.members_count)(), 3);
        directory.remove_member(&VoterId::new("carol"));
        assert_eq!((lookups.members_count)(), 2);
        assert!(!(lookups.is_member)(&VoterId::new("carol")));
    }

    #[test]
    fn test_concurrent_updates_are_all_recorded() {
        let directory = Arc::new(InMemoryDirectory::new());
        let handles: Vec<_> = (0..4)
            .map(|t| {
                let directory = Arc::clone(&directory);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        directory.add_member(VoterId::new(format!("m{t}-{i}")), Vec::new());
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(directory.members_count(), 100);
    }
}
