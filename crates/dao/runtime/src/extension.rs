//! Extension registry: named, versioned read-only capabilities
//!
//! Extensions let a DAO answer questions outside the proposal flow, such as
//! "is this address a member". They are keyed by path; non-private ones are
//! also reachable by external callers through their query path.

use crate::membership::{IsMemberFn, MembersCountFn};
use dao_types::{DaoError, DaoResult, ExtensionInfo, VoterId};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::debug;

/// A read-only capability exposed by a DAO
pub trait Extension: Send + Sync {
    fn info(&self) -> ExtensionInfo;

    /// Answer a query addressed to this extension's query path.
    fn query(&self, args: &str) -> DaoResult<serde_json::Value>;
}

/// Shared handle to any extension
pub type SharedExtension = Arc<dyn Extension>;

/// Where a query comes from
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QueryOrigin {
    /// The DAO's own execution context; sees private extensions
    Internal,
    /// Any other caller; sees public extensions only
    External,
}

/// Extensions keyed by path
#[derive(Default)]
pub struct ExtensionRegistry {
    extensions: BTreeMap<String, SharedExtension>,
}

impl ExtensionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace by `info().path`. Returns `true` if replaced.
    pub fn set(&mut self, extension: SharedExtension) -> bool {
        let info = extension.info();
        let replaced = self.extensions.insert(info.path.clone(), extension).is_some();
        debug!(path = %info.path, version = %info.version, replaced, "Extension registered");
        replaced
    }

    pub fn get(&self, path: &str) -> Option<SharedExtension> {
        self.extensions.get(path).cloned()
    }

    /// Like [`get`](Self::get), failing with `ExtensionNotFound`.
    pub fn require(&self, path: &str) -> DaoResult<SharedExtension> {
        self.get(path)
            .ok_or_else(|| DaoError::ExtensionNotFound(path.to_string()))
    }

    /// Returns `true` if the path was registered.
    pub fn remove(&mut self, path: &str) -> bool {
        self.extensions.remove(path).is_some()
    }

    /// Metadata of every extension, in path order
    pub fn list(&self) -> Vec<ExtensionInfo> {
        self.extensions.values().map(|ext| ext.info()).collect()
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Route a query by query path, honouring `private`.
    pub fn query(
        &self,
        query_path: &str,
        args: &str,
        origin: QueryOrigin,
    ) -> DaoResult<serde_json::Value> {
        let extension = self
            .extensions
            .values()
            .find(|ext| {
                let info = ext.info();
                info.query_path == query_path
                    && (origin == QueryOrigin::Internal || !info.private)
            })
            .ok_or_else(|| DaoError::ExtensionNotFound(query_path.to_string()))?;
        extension.query(args)
    }
}

/// Answers membership questions: `query("alice")` → `{"member": true}`,
/// `query("")` → `{"count": 3}`.
pub struct MembersExtension {
    is_member: IsMemberFn,
    members_count: MembersCountFn,
}

impl MembersExtension {
    pub const PATH: &'static str = "gov/dao/members";
    pub const VERSION: &'static str = "v1";
    pub const QUERY_PATH: &'static str = "members";

    pub fn new(is_member: IsMemberFn, members_count: MembersCountFn) -> Self {
        Self {
            is_member,
            members_count,
        }
    }

    pub fn is_member(&self, id: &VoterId) -> bool {
        (self.is_member)(id)
    }
}

impl Extension for MembersExtension {
    fn info(&self) -> ExtensionInfo {
        ExtensionInfo::new(Self::PATH, Self::VERSION, Self::QUERY_PATH)
    }

    fn query(&self, args: &str) -> DaoResult<serde_json::Value> {
        let args = args.trim();
        if args.is_empty() {
            return Ok(json!({ "count": (self.members_count)() }));
        }
        Ok(json!({ "member": self.is_member(&VoterId::new(args)) }))
    }
}
